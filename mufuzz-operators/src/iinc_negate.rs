use mufuzz_emit::{MutCtxt, Operator};
use mufuzz_emit::insn::{mk, Insn, InsnCategory};
use mufuzz_emit::smallvec::{smallvec, SmallVec};

pub const IINC_NEGATE: &str = "iinc_negate";

/// Negate the step of local-variable increments.
pub struct IincNegate;

impl Operator for IincNegate {
    fn name(&self) -> &'static str { IINC_NEGATE }

    fn category(&self) -> InsnCategory { InsnCategory::Increment }

    fn is_opportunity(&self, mcx: &MutCtxt) -> bool {
        // Negating a zero step yields the original instruction.
        matches!(mcx.insn, Insn::Iinc { delta, .. } if *delta != 0)
    }

    fn replace_with(&self, mcx: &MutCtxt, _is_static_call_site: bool) -> SmallVec<[Insn; 2]> {
        let Insn::Iinc { var, delta } = mcx.insn else { return smallvec![mcx.insn.clone()]; };
        smallvec![mk::iinc(*var, delta.wrapping_neg())]
    }

    fn display_name(&self, mcx: &MutCtxt) -> String {
        let Insn::Iinc { var, delta } = mcx.insn else { return "negate increment".to_owned(); };
        format!("negate increment of local {var} by {delta}")
    }
}
