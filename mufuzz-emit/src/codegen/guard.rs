//! The step-check call planted before every control transfer of a rewritten unit.
//!
//! The call carries no operands. Whatever executes the rewritten unit resolves it to the
//! timeout guard of the mutant whose namespace defined the unit.

use crate::insn::{mk, Insn, InvokeOp};

pub const GUARD_OWNER: &str = "mufuzz/runtime/Guard";
pub const GUARD_CHECK_STEP: &str = "checkStep";
pub const GUARD_DESCRIPTOR: &str = "()V";

pub fn mk_guard_check() -> Insn {
    mk::invoke_static(GUARD_OWNER, GUARD_CHECK_STEP, GUARD_DESCRIPTOR)
}

pub fn is_guard_check(insn: &Insn) -> bool {
    let Insn::Invoke { op: InvokeOp::Static, owner, name, descriptor, .. } = insn else { return false; };
    owner == GUARD_OWNER && name == GUARD_CHECK_STEP && descriptor == GUARD_DESCRIPTOR
}
