use std::fmt;

use smallvec::SmallVec;

use crate::insn::{Insn, InsnCategory, InvokeOp, Method, MethodDescriptor, Unit};

/// Position of an instruction within its unit, in program order.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct MutLoc {
    pub method_idx: usize,
    pub insn_idx: usize,
}

pub struct MutCtxt<'a> {
    pub unit: &'a Unit,
    pub method: &'a Method,
    pub insn: &'a Insn,
    pub location: MutLoc,
}

impl<'a> MutCtxt<'a> {
    /// A call site is static iff it has no implicit receiver on the operand stack.
    pub fn is_static_call_site(&self) -> bool {
        matches!(self.insn, Insn::Invoke { op: InvokeOp::Static, .. })
    }

    /// Descriptor of the method containing the instruction.
    pub fn method_descriptor(&self) -> Option<MethodDescriptor> {
        MethodDescriptor::parse(&self.method.descriptor).ok()
    }
}

/// A rule deciding which instructions are mutation opportunities and what replaces them.
///
/// Operators are stateless. The replacement must be substitutable at exactly the position of the
/// original instruction without upsetting stack or control balance elsewhere in the method.
pub trait Operator: Send + Sync {
    fn name(&self) -> &'static str;

    fn category(&self) -> InsnCategory;

    fn is_opportunity(&self, mcx: &MutCtxt) -> bool;

    fn replace_with(&self, mcx: &MutCtxt, is_static_call_site: bool) -> SmallVec<[Insn; 2]>;

    fn display_name(&self, mcx: &MutCtxt) -> String;
}

impl fmt::Debug for dyn Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Operator").field(&self.name()).finish()
    }
}

/// The single opportunity rewritten for a mutant.
#[derive(Clone, Debug, PartialEq)]
pub struct MutationSite {
    pub op_name: &'static str,
    pub method: String,
    pub location: MutLoc,
    pub original: Insn,
    pub replacement: SmallVec<[Insn; 2]>,
    pub display_name: String,
}

impl fmt::Display for MutationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{op_name}] {display_name} in `{method}` at instruction {insn_idx}",
            op_name = self.op_name,
            display_name = self.display_name,
            method = self.method,
            insn_idx = self.location.insn_idx,
        )
    }
}
