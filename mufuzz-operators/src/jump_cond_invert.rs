use mufuzz_emit::{MutCtxt, Operator};
use mufuzz_emit::insn::{mk, Insn, InsnCategory};
use mufuzz_emit::smallvec::{smallvec, SmallVec};

pub const JUMP_COND_INVERT: &str = "jump_cond_invert";

/// Negate the condition of conditional jumps, keeping their target.
pub struct JumpCondInvert;

impl Operator for JumpCondInvert {
    fn name(&self) -> &'static str { JUMP_COND_INVERT }

    fn category(&self) -> InsnCategory { InsnCategory::Jump }

    fn is_opportunity(&self, mcx: &MutCtxt) -> bool {
        let Insn::Jump { op, .. } = mcx.insn else { return false; };
        op.negate().is_some()
    }

    fn replace_with(&self, mcx: &MutCtxt, _is_static_call_site: bool) -> SmallVec<[Insn; 2]> {
        let Insn::Jump { op, target } = mcx.insn else { return smallvec![mcx.insn.clone()]; };
        let Some(negated_op) = op.negate() else { return smallvec![mcx.insn.clone()]; };
        smallvec![mk::jump(negated_op, *target)]
    }

    fn display_name(&self, mcx: &MutCtxt) -> String {
        let Insn::Jump { op, .. } = mcx.insn else { return "invert jump condition".to_owned(); };
        format!("invert jump condition `{original}` for `{replacement}`",
            original = op.mnemonic(),
            replacement = op.negate().map_or("?", |op| op.mnemonic()),
        )
    }
}
