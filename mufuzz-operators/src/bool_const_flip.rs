use mufuzz_emit::{MutCtxt, Operator};
use mufuzz_emit::insn::{mk, Insn, InsnCategory, SimpleOp, TypeSort};
use mufuzz_emit::smallvec::{smallvec, SmallVec};

pub const BOOL_CONST_FLIP: &str = "bool_const_flip";

fn flipped(op: SimpleOp) -> Option<SimpleOp> {
    match op {
        SimpleOp::Iconst0 => Some(SimpleOp::Iconst1),
        SimpleOp::Iconst1 => Some(SimpleOp::Iconst0),
        _ => None,
    }
}

/// Flip `0`/`1` integer constants in methods returning `boolean`, where they most likely encode
/// `false`/`true`.
pub struct BoolConstFlip;

impl Operator for BoolConstFlip {
    fn name(&self) -> &'static str { BOOL_CONST_FLIP }

    fn category(&self) -> InsnCategory { InsnCategory::Generic }

    fn is_opportunity(&self, mcx: &MutCtxt) -> bool {
        let Insn::Op { op } = mcx.insn else { return false; };
        if flipped(*op).is_none() { return false; }

        mcx.method_descriptor().is_some_and(|descriptor| descriptor.ret == TypeSort::Boolean)
    }

    fn replace_with(&self, mcx: &MutCtxt, _is_static_call_site: bool) -> SmallVec<[Insn; 2]> {
        let Insn::Op { op } = mcx.insn else { return smallvec![mcx.insn.clone()]; };
        let Some(flipped_op) = flipped(*op) else { return smallvec![mcx.insn.clone()]; };
        smallvec![mk::op(flipped_op)]
    }

    fn display_name(&self, mcx: &MutCtxt) -> String {
        match mcx.insn {
            Insn::Op { op: SimpleOp::Iconst0 } => "flip boolean constant `false` for `true`".to_owned(),
            _ => "flip boolean constant `true` for `false`".to_owned(),
        }
    }
}
