use crate::insn::{Constant, Insn, InvokeOp, JumpOp, LabelId, PushOp, SimpleOp, TypeSort, VarOp};

pub fn label(id: u32) -> Insn {
    Insn::Label { label: LabelId(id) }
}

pub fn jump(op: JumpOp, target: LabelId) -> Insn {
    Insn::Jump { op, target }
}

pub fn goto(target: LabelId) -> Insn {
    jump(JumpOp::Goto, target)
}

pub fn ldc(value: Constant) -> Insn {
    Insn::Ldc { value }
}

pub fn iinc(var: u16, delta: i32) -> Insn {
    Insn::Iinc { var, delta }
}

pub fn invoke(op: InvokeOp, owner: &str, name: &str, descriptor: &str) -> Insn {
    Insn::Invoke {
        op,
        owner: owner.to_owned(),
        name: name.to_owned(),
        descriptor: descriptor.to_owned(),
        is_interface: matches!(op, InvokeOp::Interface),
    }
}

pub fn invoke_static(owner: &str, name: &str, descriptor: &str) -> Insn {
    invoke(InvokeOp::Static, owner, name, descriptor)
}

pub fn var(op: VarOp, var: u16) -> Insn {
    Insn::Var { op, var }
}

pub fn iload(v: u16) -> Insn {
    var(VarOp::Iload, v)
}

pub fn istore(v: u16) -> Insn {
    var(VarOp::Istore, v)
}

pub fn push(op: PushOp, value: i32) -> Insn {
    Insn::Push { op, value }
}

pub fn op(op: SimpleOp) -> Insn {
    Insn::Op { op }
}

/// Discards a value of the given type from the operand stack.
pub fn pop_value(sort: TypeSort) -> Option<Insn> {
    match sort.size() {
        0 => None,
        1 => Some(op(SimpleOp::Pop)),
        _ => Some(op(SimpleOp::Pop2)),
    }
}

/// Pushes the zero value of the given type, if it has one.
pub fn default_value(sort: TypeSort) -> Option<Insn> {
    Some(op(match sort {
        TypeSort::Void => { return None; }
        TypeSort::Boolean | TypeSort::Char | TypeSort::Byte | TypeSort::Short | TypeSort::Int => SimpleOp::Iconst0,
        TypeSort::Long => SimpleOp::Lconst0,
        TypeSort::Float => SimpleOp::Fconst0,
        TypeSort::Double => SimpleOp::Dconst0,
        TypeSort::Object | TypeSort::Array => SimpleOp::AconstNull,
    }))
}
