//! A minimal interpreter for integer-only instruction streams, calling into the step guard of
//! the mutant whose namespace defined the unit.

#![allow(dead_code)]

use mufuzz_emit::codegen::guard;
use mufuzz_emit::insn::{mk, Insn, JumpOp, LabelId, Method, SimpleOp, Unit, VarOp};
use mufuzz_runtime::{Mutant, TimeoutFault};
use rustc_hash::FxHashMap;

/// Counts up to `n`, returning `n` for non-negative inputs. Has three conditional jumps.
///
/// ```text
///     iconst_0; istore 1
/// L0: iload 1; iload 0; if_icmpge L1    // #0: exit once i >= n
///     iload 1; iflt L3                  // #1: never taken
///     iinc 1 1
/// L3: goto L0
/// L1: iload 1; ifge L4                  // #2: taken for n >= 0
///     iconst_m1; ireturn
/// L4: iload 1; ireturn
/// ```
pub fn count_unit() -> Unit {
    Unit {
        name: "demo/Loop".to_owned(),
        methods: vec![Method {
            name: "count".to_owned(),
            descriptor: "(I)I".to_owned(),
            is_static: true,
            insns: vec![
                mk::op(SimpleOp::Iconst0),
                mk::istore(1),
                mk::label(0),
                mk::iload(1),
                mk::iload(0),
                mk::jump(JumpOp::IfIcmpge, LabelId(1)),
                mk::iload(1),
                mk::jump(JumpOp::Iflt, LabelId(3)),
                mk::iinc(1, 1),
                mk::label(3),
                mk::goto(LabelId(0)),
                mk::label(1),
                mk::iload(1),
                mk::jump(JumpOp::Ifge, LabelId(4)),
                mk::op(SimpleOp::IconstM1),
                mk::op(SimpleOp::Ireturn),
                mk::label(4),
                mk::iload(1),
                mk::op(SimpleOp::Ireturn),
            ],
        }],
    }
}

fn jump_taken(op: JumpOp, stack: &mut Vec<i32>) -> bool {
    let mut pop = || stack.pop().expect("operand stack underflow");
    match op {
        JumpOp::Goto => true,
        JumpOp::Ifeq => pop() == 0,
        JumpOp::Ifne => pop() != 0,
        JumpOp::Iflt => pop() < 0,
        JumpOp::Ifge => pop() >= 0,
        JumpOp::Ifgt => pop() > 0,
        JumpOp::Ifle => pop() <= 0,
        _ => {
            let b = pop();
            let a = pop();
            match op {
                JumpOp::IfIcmpeq => a == b,
                JumpOp::IfIcmpne => a != b,
                JumpOp::IfIcmplt => a < b,
                JumpOp::IfIcmpge => a >= b,
                JumpOp::IfIcmpgt => a > b,
                JumpOp::IfIcmple => a <= b,
                _ => panic!("unsupported jump `{}`", op.mnemonic()),
            }
        }
    }
}

/// Executes `method` of `unit` with the given integer arguments.
pub fn run(mutant: &Mutant, unit: &Unit, method: &str, args: &[i32]) -> Result<i32, TimeoutFault> {
    let method = unit.method(method).expect("no such method");

    let labels = method.insns.iter().enumerate()
        .filter_map(|(idx, insn)| match insn {
            Insn::Label { label } => Some((*label, idx)),
            _ => None,
        })
        .collect::<FxHashMap<_, _>>();

    let mut locals = vec![0; 8];
    locals[..args.len()].copy_from_slice(args);
    let mut stack = Vec::<i32>::new();

    let mut pc = 0;
    loop {
        let insn = &method.insns[pc];
        pc += 1;

        match insn {
            Insn::Label { .. } => {}
            Insn::Jump { op, target } => {
                if jump_taken(*op, &mut stack) { pc = labels[target]; }
            }
            Insn::Iinc { var, delta } => { locals[*var as usize] = locals[*var as usize].wrapping_add(*delta); }
            Insn::Var { op: VarOp::Iload, var } => stack.push(locals[*var as usize]),
            Insn::Var { op: VarOp::Istore, var } => { locals[*var as usize] = stack.pop().expect("operand stack underflow"); }
            Insn::Push { value, .. } => stack.push(*value),
            Insn::Invoke { .. } if guard::is_guard_check(insn) => mutant.check_step()?,
            Insn::Op { op } => match op {
                SimpleOp::Nop => {}
                SimpleOp::IconstM1 => stack.push(-1),
                SimpleOp::Iconst0 => stack.push(0),
                SimpleOp::Iconst1 => stack.push(1),
                SimpleOp::Pop => { stack.pop(); }
                SimpleOp::Pop2 => { stack.pop(); stack.pop(); }
                SimpleOp::Iadd => { let b = stack.pop().unwrap(); let a = stack.pop().unwrap(); stack.push(a.wrapping_add(b)); }
                SimpleOp::Isub => { let b = stack.pop().unwrap(); let a = stack.pop().unwrap(); stack.push(a.wrapping_sub(b)); }
                SimpleOp::Ireturn => return Ok(stack.pop().expect("operand stack underflow")),
                _ => panic!("unsupported instruction `{insn}`"),
            },
            _ => panic!("unsupported instruction `{insn}`"),
        }
    }
}
