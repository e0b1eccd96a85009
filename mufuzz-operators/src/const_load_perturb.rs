use mufuzz_emit::{MutCtxt, Operator};
use mufuzz_emit::insn::{mk, Constant, Insn, InsnCategory};
use mufuzz_emit::smallvec::{smallvec, SmallVec};

pub const CONST_LOAD_PERTURB: &str = "const_load_perturb";
pub const CONST_LOAD_STRING_ALTER: &str = "const_load_string_alter";

fn perturb(value: &Constant) -> Option<Constant> {
    Some(match *value {
        Constant::Int(v) => Constant::Int(v.wrapping_add(1)),
        Constant::Long(v) => Constant::Long(v.wrapping_add(1)),
        Constant::Float(v) => Constant::Float(v + 1.0),
        Constant::Double(v) => Constant::Double(v + 1.0),
        Constant::String(_) => { return None; }
    })
}

fn alter(value: &Constant) -> Option<Constant> {
    let Constant::String(s) = value else { return None; };

    let mut chars = s.chars();
    Some(Constant::String(match chars.next_back() {
        Some(_) => chars.as_str().to_owned(),
        None => " ".to_owned(),
    }))
}

/// Add one to numeric constants.
pub struct ConstLoadPerturb;

impl Operator for ConstLoadPerturb {
    fn name(&self) -> &'static str { CONST_LOAD_PERTURB }

    fn category(&self) -> InsnCategory { InsnCategory::ConstLoad }

    fn is_opportunity(&self, mcx: &MutCtxt) -> bool {
        let Insn::Ldc { value } = mcx.insn else { return false; };
        perturb(value).is_some()
    }

    fn replace_with(&self, mcx: &MutCtxt, _is_static_call_site: bool) -> SmallVec<[Insn; 2]> {
        let Insn::Ldc { value } = mcx.insn else { return smallvec![mcx.insn.clone()]; };
        let Some(perturbed) = perturb(value) else { return smallvec![mcx.insn.clone()]; };
        smallvec![mk::ldc(perturbed)]
    }

    fn display_name(&self, mcx: &MutCtxt) -> String {
        let Insn::Ldc { value } = mcx.insn else { return "perturb constant".to_owned(); };
        match perturb(value) {
            Some(perturbed) => format!("perturb constant `{value}` to `{perturbed}`"),
            None => format!("perturb constant `{value}`"),
        }
    }
}

/// Shorten string constants by their last character; empty strings become a single space.
pub struct ConstLoadStringAlter;

impl Operator for ConstLoadStringAlter {
    fn name(&self) -> &'static str { CONST_LOAD_STRING_ALTER }

    fn category(&self) -> InsnCategory { InsnCategory::ConstLoad }

    fn is_opportunity(&self, mcx: &MutCtxt) -> bool {
        matches!(mcx.insn, Insn::Ldc { value: Constant::String(_) })
    }

    fn replace_with(&self, mcx: &MutCtxt, _is_static_call_site: bool) -> SmallVec<[Insn; 2]> {
        let Insn::Ldc { value } = mcx.insn else { return smallvec![mcx.insn.clone()]; };
        let Some(altered) = alter(value) else { return smallvec![mcx.insn.clone()]; };
        smallvec![mk::ldc(altered)]
    }

    fn display_name(&self, mcx: &MutCtxt) -> String {
        let Insn::Ldc { value } = mcx.insn else { return "alter string constant".to_owned(); };
        match alter(value) {
            Some(altered) => format!("alter string constant {value} to {altered}"),
            None => format!("alter string constant {value}"),
        }
    }
}
