use mufuzz_emit::Operator;

mod bool_const_flip;
pub use bool_const_flip::*;

mod call_delete;
pub use call_delete::*;

mod const_load_perturb;
pub use const_load_perturb::*;

mod iinc_negate;
pub use iinc_negate::*;

mod jump_cond_invert;
pub use jump_cond_invert::*;

mod jump_force;
pub use jump_force::*;

mod math_op_swap;
pub use math_op_swap::*;

/// Every operator of the catalog, in catalog order.
pub static ALL: &[&dyn Operator] = &[
    &JumpCondInvert,
    &JumpForceTaken,
    &JumpForceNotTaken,
    &ConstLoadPerturb,
    &ConstLoadStringAlter,
    &BoolConstFlip,
    &MathOpAddSubSwap,
    &MathOpMulDivSwap,
    &MathOpDivRemSwap,
    &IincNegate,
    &CallVoidDelete,
    &CallValueDefault,
];

pub fn operator_by_name(name: &str) -> Option<&'static dyn Operator> {
    ALL.iter().copied().find(|operator| operator.name() == name)
}
