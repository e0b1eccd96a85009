use mufuzz_emit::{MutCtxt, Operator};
use mufuzz_emit::codegen::guard;
use mufuzz_emit::insn::{mk, Insn, InsnCategory, MethodDescriptor, SimpleOp, TypeSort};
use mufuzz_emit::smallvec::{smallvec, SmallVec};

pub const CALL_VOID_DELETE: &str = "call_void_delete";
pub const CALL_VALUE_DEFAULT: &str = "call_value_default";

/// Descriptor of a call that may be removed. Constructor calls are never removed, as the
/// receiver would be left uninitialized.
fn removable_call(mcx: &MutCtxt) -> Option<MethodDescriptor> {
    let Insn::Invoke { name, descriptor, .. } = mcx.insn else { return None; };
    if name == "<init>" || guard::is_guard_check(mcx.insn) { return None; }
    MethodDescriptor::parse(descriptor).ok()
}

fn pop_call_operands(descriptor: &MethodDescriptor, is_static_call_site: bool) -> SmallVec<[Insn; 2]> {
    let mut insns = descriptor.args.iter().rev()
        .filter_map(|&sort| mk::pop_value(sort))
        .collect::<SmallVec<[Insn; 2]>>();
    if !is_static_call_site {
        insns.push(mk::op(SimpleOp::Pop));
    }
    insns
}

fn callee(mcx: &MutCtxt) -> String {
    match mcx.insn {
        Insn::Invoke { owner, name, .. } => format!("{owner}.{name}"),
        _ => "?".to_owned(),
    }
}

/// Delete calls to methods returning `void`, discarding their arguments.
pub struct CallVoidDelete;

impl Operator for CallVoidDelete {
    fn name(&self) -> &'static str { CALL_VOID_DELETE }

    fn category(&self) -> InsnCategory { InsnCategory::Call }

    fn is_opportunity(&self, mcx: &MutCtxt) -> bool {
        removable_call(mcx).is_some_and(|descriptor| descriptor.ret == TypeSort::Void)
    }

    fn replace_with(&self, mcx: &MutCtxt, is_static_call_site: bool) -> SmallVec<[Insn; 2]> {
        let Some(descriptor) = removable_call(mcx) else { return smallvec![mcx.insn.clone()]; };
        pop_call_operands(&descriptor, is_static_call_site)
    }

    fn display_name(&self, mcx: &MutCtxt) -> String {
        format!("delete call to `{callee}`", callee = callee(mcx))
    }
}

/// Delete calls to methods returning a value, and push the default value of the return type
/// instead.
pub struct CallValueDefault;

impl Operator for CallValueDefault {
    fn name(&self) -> &'static str { CALL_VALUE_DEFAULT }

    fn category(&self) -> InsnCategory { InsnCategory::Call }

    fn is_opportunity(&self, mcx: &MutCtxt) -> bool {
        removable_call(mcx).is_some_and(|descriptor| descriptor.ret != TypeSort::Void)
    }

    fn replace_with(&self, mcx: &MutCtxt, is_static_call_site: bool) -> SmallVec<[Insn; 2]> {
        let Some(descriptor) = removable_call(mcx) else { return smallvec![mcx.insn.clone()]; };
        let mut insns = pop_call_operands(&descriptor, is_static_call_site);
        insns.extend(mk::default_value(descriptor.ret));
        insns
    }

    fn display_name(&self, mcx: &MutCtxt) -> String {
        format!("replace call to `{callee}` with the default value of its return type", callee = callee(mcx))
    }
}

#[cfg(test)]
mod tests {
    use mufuzz_emit::codegen::guard;
    use mufuzz_emit::insn::{mk, InvokeOp, SimpleOp};

    use crate::test_util::{apply, replacement, unit};

    use super::{CallValueDefault, CallVoidDelete};

    fn calls() -> mufuzz_emit::insn::Unit {
        unit("()V", vec![
            mk::invoke(InvokeOp::Special, "demo/A", "<init>", "()V"),
            mk::invoke_static("demo/A", "log", "(JI)V"),
            mk::invoke(InvokeOp::Virtual, "demo/A", "size", "()I"),
            guard::mk_guard_check(),
            mk::invoke(InvokeOp::Interface, "demo/I", "name", "(Ljava/lang/String;D)Ljava/lang/String;"),
            mk::invoke(InvokeOp::Virtual, "demo/A", "reset", "()V"),
            mk::invoke_static("demo/A", "total", "()J"),
            mk::op(SimpleOp::Return),
        ])
    }

    #[test]
    fn test_delete_void_calls() {
        let unit = calls();
        assert_eq!(apply(&CallVoidDelete, &unit, 0).opportunities, 2);
        // Static: `(JI)V` pops the int, then the long.
        assert_eq!(replacement(&CallVoidDelete, &unit, 0), vec![mk::op(SimpleOp::Pop), mk::op(SimpleOp::Pop2)]);
        // Virtual without arguments pops the receiver only.
        assert_eq!(replacement(&CallVoidDelete, &unit, 1), vec![mk::op(SimpleOp::Pop)]);
    }

    #[test]
    fn test_replace_value_calls_with_defaults() {
        let unit = calls();
        assert_eq!(apply(&CallValueDefault, &unit, 0).opportunities, 3);
        assert_eq!(replacement(&CallValueDefault, &unit, 0), vec![mk::op(SimpleOp::Pop), mk::op(SimpleOp::Iconst0)]);
        assert_eq!(replacement(&CallValueDefault, &unit, 1), vec![
            mk::op(SimpleOp::Pop2),
            mk::op(SimpleOp::Pop),
            mk::op(SimpleOp::Pop),
            mk::op(SimpleOp::AconstNull),
        ]);
        assert_eq!(replacement(&CallValueDefault, &unit, 2), vec![mk::op(SimpleOp::Lconst0)]);
    }

    #[test]
    fn test_display_name() {
        let unit = calls();
        assert_eq!(apply(&CallVoidDelete, &unit, 0).mutation.unwrap().display_name, "delete call to `demo/A.log`");
    }
}
