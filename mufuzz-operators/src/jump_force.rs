use mufuzz_emit::{MutCtxt, Operator};
use mufuzz_emit::insn::{mk, Insn, InsnCategory, JumpOp, SimpleOp};
use mufuzz_emit::smallvec::{smallvec, SmallVec};

pub const JUMP_FORCE_TAKEN: &str = "jump_force_taken";
pub const JUMP_FORCE_NOT_TAKEN: &str = "jump_force_not_taken";

// The operands of conditional jumps are single-slot values, so two of them fit one `pop2`.
fn pop_operands(op: JumpOp) -> SmallVec<[Insn; 2]> {
    match op.operand_count() {
        0 => smallvec![],
        1 => smallvec![mk::op(SimpleOp::Pop)],
        _ => smallvec![mk::op(SimpleOp::Pop2)],
    }
}

/// Replace conditional jumps with unconditional ones to the same target.
pub struct JumpForceTaken;

impl Operator for JumpForceTaken {
    fn name(&self) -> &'static str { JUMP_FORCE_TAKEN }

    fn category(&self) -> InsnCategory { InsnCategory::Jump }

    fn is_opportunity(&self, mcx: &MutCtxt) -> bool {
        let Insn::Jump { op, .. } = mcx.insn else { return false; };
        op.is_conditional()
    }

    fn replace_with(&self, mcx: &MutCtxt, _is_static_call_site: bool) -> SmallVec<[Insn; 2]> {
        let Insn::Jump { op, target } = mcx.insn else { return smallvec![mcx.insn.clone()]; };
        let mut insns = pop_operands(*op);
        insns.push(mk::goto(*target));
        insns
    }

    fn display_name(&self, mcx: &MutCtxt) -> String {
        let Insn::Jump { op, target } = mcx.insn else { return "force jump".to_owned(); };
        format!("force `{op}` to always jump to {target}", op = op.mnemonic())
    }
}

/// Remove conditional jumps, so that execution always falls through.
pub struct JumpForceNotTaken;

impl Operator for JumpForceNotTaken {
    fn name(&self) -> &'static str { JUMP_FORCE_NOT_TAKEN }

    fn category(&self) -> InsnCategory { InsnCategory::Jump }

    fn is_opportunity(&self, mcx: &MutCtxt) -> bool {
        let Insn::Jump { op, .. } = mcx.insn else { return false; };
        op.is_conditional()
    }

    fn replace_with(&self, mcx: &MutCtxt, _is_static_call_site: bool) -> SmallVec<[Insn; 2]> {
        let Insn::Jump { op, .. } = mcx.insn else { return smallvec![mcx.insn.clone()]; };
        pop_operands(*op)
    }

    fn display_name(&self, mcx: &MutCtxt) -> String {
        let Insn::Jump { op, .. } = mcx.insn else { return "remove jump".to_owned(); };
        format!("force `{op}` to never jump", op = op.mnemonic())
    }
}
