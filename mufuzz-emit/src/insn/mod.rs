//! Method-grouped, order-preserving instruction streams.
//!
//! The instruction set follows the shape of JVM bytecode as seen through a visitor: labels are
//! pseudo-instructions interleaved with real instructions, and every instruction carries the
//! operands and descriptors needed to re-emit it verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod descriptor;
pub mod mk;

pub use descriptor::{DescriptorError, MethodDescriptor, TypeSort};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelId(pub u32);

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpOp {
    Ifeq,
    Ifne,
    Iflt,
    Ifge,
    Ifgt,
    Ifle,
    IfIcmpeq,
    IfIcmpne,
    IfIcmplt,
    IfIcmpge,
    IfIcmpgt,
    IfIcmple,
    IfAcmpeq,
    IfAcmpne,
    Ifnull,
    Ifnonnull,
    Goto,
}

impl JumpOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Ifeq => "ifeq",
            Self::Ifne => "ifne",
            Self::Iflt => "iflt",
            Self::Ifge => "ifge",
            Self::Ifgt => "ifgt",
            Self::Ifle => "ifle",
            Self::IfIcmpeq => "if_icmpeq",
            Self::IfIcmpne => "if_icmpne",
            Self::IfIcmplt => "if_icmplt",
            Self::IfIcmpge => "if_icmpge",
            Self::IfIcmpgt => "if_icmpgt",
            Self::IfIcmple => "if_icmple",
            Self::IfAcmpeq => "if_acmpeq",
            Self::IfAcmpne => "if_acmpne",
            Self::Ifnull => "ifnull",
            Self::Ifnonnull => "ifnonnull",
            Self::Goto => "goto",
        }
    }

    pub fn is_conditional(&self) -> bool {
        !matches!(self, Self::Goto)
    }

    /// Number of stack values consumed by the jump.
    pub fn operand_count(&self) -> usize {
        match self {
            Self::Goto => 0,
            Self::Ifeq | Self::Ifne | Self::Iflt | Self::Ifge | Self::Ifgt | Self::Ifle => 1,
            Self::Ifnull | Self::Ifnonnull => 1,
            Self::IfIcmpeq | Self::IfIcmpne | Self::IfIcmplt | Self::IfIcmpge | Self::IfIcmpgt | Self::IfIcmple => 2,
            Self::IfAcmpeq | Self::IfAcmpne => 2,
        }
    }

    /// The conditional jump taken exactly when this one is not.
    pub fn negate(&self) -> Option<JumpOp> {
        Some(match self {
            Self::Ifeq => Self::Ifne,
            Self::Ifne => Self::Ifeq,
            Self::Iflt => Self::Ifge,
            Self::Ifge => Self::Iflt,
            Self::Ifgt => Self::Ifle,
            Self::Ifle => Self::Ifgt,
            Self::IfIcmpeq => Self::IfIcmpne,
            Self::IfIcmpne => Self::IfIcmpeq,
            Self::IfIcmplt => Self::IfIcmpge,
            Self::IfIcmpge => Self::IfIcmplt,
            Self::IfIcmpgt => Self::IfIcmple,
            Self::IfIcmple => Self::IfIcmpgt,
            Self::IfAcmpeq => Self::IfAcmpne,
            Self::IfAcmpne => Self::IfAcmpeq,
            Self::Ifnull => Self::Ifnonnull,
            Self::Ifnonnull => Self::Ifnull,
            Self::Goto => { return None; }
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvokeOp {
    Virtual,
    Special,
    Static,
    Interface,
}

impl InvokeOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Virtual => "invokevirtual",
            Self::Special => "invokespecial",
            Self::Static => "invokestatic",
            Self::Interface => "invokeinterface",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarOp {
    Iload,
    Lload,
    Fload,
    Dload,
    Aload,
    Istore,
    Lstore,
    Fstore,
    Dstore,
    Astore,
}

impl VarOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Iload => "iload",
            Self::Lload => "lload",
            Self::Fload => "fload",
            Self::Dload => "dload",
            Self::Aload => "aload",
            Self::Istore => "istore",
            Self::Lstore => "lstore",
            Self::Fstore => "fstore",
            Self::Dstore => "dstore",
            Self::Astore => "astore",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushOp {
    Bipush,
    Sipush,
}

impl PushOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Bipush => "bipush",
            Self::Sipush => "sipush",
        }
    }
}

/// Instructions without operands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimpleOp {
    Nop,
    AconstNull,
    IconstM1,
    #[serde(rename = "iconst_0")] Iconst0,
    #[serde(rename = "iconst_1")] Iconst1,
    #[serde(rename = "iconst_2")] Iconst2,
    #[serde(rename = "iconst_3")] Iconst3,
    #[serde(rename = "iconst_4")] Iconst4,
    #[serde(rename = "iconst_5")] Iconst5,
    #[serde(rename = "lconst_0")] Lconst0,
    #[serde(rename = "lconst_1")] Lconst1,
    #[serde(rename = "fconst_0")] Fconst0,
    #[serde(rename = "fconst_1")] Fconst1,
    #[serde(rename = "fconst_2")] Fconst2,
    #[serde(rename = "dconst_0")] Dconst0,
    #[serde(rename = "dconst_1")] Dconst1,
    Iadd, Ladd, Fadd, Dadd,
    Isub, Lsub, Fsub, Dsub,
    Imul, Lmul, Fmul, Dmul,
    Idiv, Ldiv, Fdiv, Ddiv,
    Irem, Lrem, Frem, Drem,
    Ineg, Lneg, Fneg, Dneg,
    Pop,
    Pop2,
    Dup,
    Swap,
    Ireturn,
    Lreturn,
    Freturn,
    Dreturn,
    Areturn,
    Return,
    Athrow,
}

impl SimpleOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Nop => "nop",
            Self::AconstNull => "aconst_null",
            Self::IconstM1 => "iconst_m1",
            Self::Iconst0 => "iconst_0",
            Self::Iconst1 => "iconst_1",
            Self::Iconst2 => "iconst_2",
            Self::Iconst3 => "iconst_3",
            Self::Iconst4 => "iconst_4",
            Self::Iconst5 => "iconst_5",
            Self::Lconst0 => "lconst_0",
            Self::Lconst1 => "lconst_1",
            Self::Fconst0 => "fconst_0",
            Self::Fconst1 => "fconst_1",
            Self::Fconst2 => "fconst_2",
            Self::Dconst0 => "dconst_0",
            Self::Dconst1 => "dconst_1",
            Self::Iadd => "iadd",
            Self::Ladd => "ladd",
            Self::Fadd => "fadd",
            Self::Dadd => "dadd",
            Self::Isub => "isub",
            Self::Lsub => "lsub",
            Self::Fsub => "fsub",
            Self::Dsub => "dsub",
            Self::Imul => "imul",
            Self::Lmul => "lmul",
            Self::Fmul => "fmul",
            Self::Dmul => "dmul",
            Self::Idiv => "idiv",
            Self::Ldiv => "ldiv",
            Self::Fdiv => "fdiv",
            Self::Ddiv => "ddiv",
            Self::Irem => "irem",
            Self::Lrem => "lrem",
            Self::Frem => "frem",
            Self::Drem => "drem",
            Self::Ineg => "ineg",
            Self::Lneg => "lneg",
            Self::Fneg => "fneg",
            Self::Dneg => "dneg",
            Self::Pop => "pop",
            Self::Pop2 => "pop2",
            Self::Dup => "dup",
            Self::Swap => "swap",
            Self::Ireturn => "ireturn",
            Self::Lreturn => "lreturn",
            Self::Freturn => "freturn",
            Self::Dreturn => "dreturn",
            Self::Areturn => "areturn",
            Self::Return => "return",
            Self::Athrow => "athrow",
        }
    }
}

/// Literal operand of a constant load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Constant {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}L"),
            Self::Float(v) => write!(f, "{v:?}F"),
            Self::Double(v) => write!(f, "{v:?}D"),
            Self::String(v) => write!(f, "{v:?}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insn {
    Label { label: LabelId },
    Jump { op: JumpOp, target: LabelId },
    Ldc { value: Constant },
    Iinc { var: u16, delta: i32 },
    Invoke {
        op: InvokeOp,
        owner: String,
        name: String,
        descriptor: String,
        #[serde(default)]
        is_interface: bool,
    },
    Var { op: VarOp, var: u16 },
    Push { op: PushOp, value: i32 },
    Op { op: SimpleOp },
}

/// The family of instructions an operator targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InsnCategory {
    Jump,
    ConstLoad,
    Increment,
    Call,
    Generic,
}

impl Insn {
    pub fn category(&self) -> InsnCategory {
        match self {
            Self::Jump { .. } => InsnCategory::Jump,
            Self::Ldc { .. } => InsnCategory::ConstLoad,
            Self::Iinc { .. } => InsnCategory::Increment,
            Self::Invoke { .. } => InsnCategory::Call,
            Self::Label { .. } | Self::Var { .. } | Self::Push { .. } | Self::Op { .. } => InsnCategory::Generic,
        }
    }

    pub fn is_control_transfer(&self) -> bool {
        matches!(self, Self::Jump { .. })
    }
}

impl fmt::Display for Insn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label { label } => write!(f, "{label}:"),
            Self::Jump { op, target } => write!(f, "{} {target}", op.mnemonic()),
            Self::Ldc { value } => write!(f, "ldc {value}"),
            Self::Iinc { var, delta } => write!(f, "iinc {var} {delta}"),
            Self::Invoke { op, owner, name, descriptor, is_interface: _ } => write!(f, "{} {owner}.{name}{descriptor}", op.mnemonic()),
            Self::Var { op, var } => write!(f, "{} {var}", op.mnemonic()),
            Self::Push { op, value } => write!(f, "{} {value}", op.mnemonic()),
            Self::Op { op } => f.write_str(op.mnemonic()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub descriptor: String,
    #[serde(default)]
    pub is_static: bool,
    pub insns: Vec<Insn>,
}

/// A loadable program unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub methods: Vec<Method>,
}

impl Unit {
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|method| method.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negate_is_involution() {
        let ops = [
            JumpOp::Ifeq, JumpOp::Ifne, JumpOp::Iflt, JumpOp::Ifge, JumpOp::Ifgt, JumpOp::Ifle,
            JumpOp::IfIcmpeq, JumpOp::IfIcmpne, JumpOp::IfIcmplt, JumpOp::IfIcmpge, JumpOp::IfIcmpgt, JumpOp::IfIcmple,
            JumpOp::IfAcmpeq, JumpOp::IfAcmpne, JumpOp::Ifnull, JumpOp::Ifnonnull,
        ];
        for op in ops {
            let negated = op.negate().unwrap();
            assert_ne!(negated, op);
            assert_eq!(negated.negate(), Some(op));
            assert_eq!(negated.operand_count(), op.operand_count());
        }
        assert_eq!(JumpOp::Goto.negate(), None);
    }

    #[test]
    fn test_insn_categories() {
        assert_eq!(mk::goto(LabelId(0)).category(), InsnCategory::Jump);
        assert_eq!(mk::ldc(Constant::Int(3)).category(), InsnCategory::ConstLoad);
        assert_eq!(mk::iinc(1, 1).category(), InsnCategory::Increment);
        assert_eq!(mk::invoke_static("a/B", "c", "()V").category(), InsnCategory::Call);
        assert_eq!(mk::label(0).category(), InsnCategory::Generic);
        assert_eq!(mk::op(SimpleOp::Iadd).category(), InsnCategory::Generic);
    }

    #[test]
    fn test_insn_display() {
        assert_eq!(mk::jump(JumpOp::IfIcmpge, LabelId(2)).to_string(), "if_icmpge L2");
        assert_eq!(mk::ldc(Constant::Int(42)).to_string(), "ldc 42");
        assert_eq!(mk::ldc(Constant::String("hi".to_owned())).to_string(), "ldc \"hi\"");
        assert_eq!(mk::iinc(1, -1).to_string(), "iinc 1 -1");
        assert_eq!(mk::invoke_static("a/B", "c", "(I)V").to_string(), "invokestatic a/B.c(I)V");
        assert_eq!(mk::label(3).to_string(), "L3:");
        assert_eq!(mk::op(SimpleOp::Iconst0).to_string(), "iconst_0");
    }
}
