use mufuzz_emit::{MutCtxt, Operator};
use mufuzz_emit::insn::{mk, Insn, InsnCategory, SimpleOp};
use mufuzz_emit::smallvec::{smallvec, SmallVec};

macro_rules! define_math_op_swap_operator {
    (
        $(#[$meta:meta])*
        $vis:vis $operator:ident as $op_name_ident:ident = $op_name:literal {
            $($op_from:ident => $op_to:ident),+ $(,)?
        }
    ) => {
        $vis const $op_name_ident: &str = $op_name;

        $(#[$meta])*
        $vis struct $operator;

        impl $operator {
            fn swapped(op: SimpleOp) -> Option<SimpleOp> {
                match op {
                    $(SimpleOp::$op_from => Some(SimpleOp::$op_to),)+
                    _ => None,
                }
            }
        }

        impl Operator for $operator {
            fn name(&self) -> &'static str { $op_name }

            fn category(&self) -> InsnCategory { InsnCategory::Generic }

            fn is_opportunity(&self, mcx: &MutCtxt) -> bool {
                let Insn::Op { op } = mcx.insn else { return false; };
                Self::swapped(*op).is_some()
            }

            fn replace_with(&self, mcx: &MutCtxt, _is_static_call_site: bool) -> SmallVec<[Insn; 2]> {
                let Insn::Op { op } = mcx.insn else { return smallvec![mcx.insn.clone()]; };
                let Some(swapped_op) = Self::swapped(*op) else { return smallvec![mcx.insn.clone()]; };
                smallvec![mk::op(swapped_op)]
            }

            fn display_name(&self, mcx: &MutCtxt) -> String {
                let Insn::Op { op } = mcx.insn else { return "swap math operator".to_owned(); };
                format!("swap math operator `{original}` for `{replacement}`",
                    original = op.mnemonic(),
                    replacement = Self::swapped(*op).map_or("?", |op| op.mnemonic()),
                )
            }
        }
    };
}

define_math_op_swap_operator! {
    /// Swap addition for subtraction and vice versa.
    pub MathOpAddSubSwap as MATH_OP_ADD_SUB_SWAP = "math_op_add_sub_swap" {
        Iadd => Isub, Isub => Iadd,
        Ladd => Lsub, Lsub => Ladd,
        Fadd => Fsub, Fsub => Fadd,
        Dadd => Dsub, Dsub => Dadd,
    }
}

define_math_op_swap_operator! {
    /// Swap multiplication for division and vice versa.
    pub MathOpMulDivSwap as MATH_OP_MUL_DIV_SWAP = "math_op_mul_div_swap" {
        Imul => Idiv, Idiv => Imul,
        Lmul => Ldiv, Ldiv => Lmul,
        Fmul => Fdiv, Fdiv => Fmul,
        Dmul => Ddiv, Ddiv => Dmul,
    }
}

define_math_op_swap_operator! {
    /// Swap division for remainder and vice versa.
    pub MathOpDivRemSwap as MATH_OP_DIV_REM_SWAP = "math_op_div_rem_swap" {
        Idiv => Irem, Irem => Idiv,
        Ldiv => Lrem, Lrem => Ldiv,
        Fdiv => Frem, Frem => Fdiv,
        Ddiv => Drem, Drem => Ddiv,
    }
}
