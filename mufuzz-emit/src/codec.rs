use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::insn::{Constant, DescriptorError, Insn, LabelId, MethodDescriptor, Unit};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("cannot parse instruction stream: {0}")]
    Json(#[from] serde_json::Error),
    #[error("jump in method `{method}` targets undefined label {label}")]
    UndefinedLabel { method: String, label: LabelId },
    #[error("label {label} is defined more than once in method `{method}`")]
    DuplicateLabel { method: String, label: LabelId },
    #[error("constant `{value}` in method `{method}` has no finite value")]
    NonFiniteConstant { method: String, value: Constant },
    #[error("malformed descriptor in method `{method}`")]
    Descriptor {
        method: String,
        #[source]
        source: DescriptorError,
    },
}

/// Converts between the serialized bytes of a unit and its instruction stream.
pub trait Codec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Unit, CodecError>;

    fn encode(&self, unit: &Unit) -> Result<Vec<u8>, CodecError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Unit, CodecError> {
        let unit = serde_json::from_slice::<Unit>(bytes)?;
        validate(&unit)?;
        Ok(unit)
    }

    fn encode(&self, unit: &Unit) -> Result<Vec<u8>, CodecError> {
        validate(unit)?;
        Ok(serde_json::to_vec_pretty(unit)?)
    }
}

/// Checks that every jump resolves to a label of its own method, that every descriptor parses and
/// that every floating-point constant is finite. JSON has no representation for NaN or infinity.
pub fn validate(unit: &Unit) -> Result<(), CodecError> {
    for method in &unit.methods {
        let descriptor_err = |source| CodecError::Descriptor { method: method.name.clone(), source };

        MethodDescriptor::parse(&method.descriptor).map_err(descriptor_err)?;

        let mut labels = FxHashSet::default();
        for insn in &method.insns {
            match insn {
                Insn::Label { label } => {
                    if !labels.insert(*label) {
                        return Err(CodecError::DuplicateLabel { method: method.name.clone(), label: *label });
                    }
                }
                Insn::Invoke { descriptor, .. } => {
                    MethodDescriptor::parse(descriptor).map_err(descriptor_err)?;
                }
                Insn::Ldc { value } if !is_finite(value) => {
                    return Err(CodecError::NonFiniteConstant { method: method.name.clone(), value: value.clone() });
                }
                _ => {}
            }
        }

        for insn in &method.insns {
            let Insn::Jump { target, .. } = insn else { continue; };
            if !labels.contains(target) {
                return Err(CodecError::UndefinedLabel { method: method.name.clone(), label: *target });
            }
        }
    }

    Ok(())
}

fn is_finite(value: &Constant) -> bool {
    match value {
        Constant::Float(v) => v.is_finite(),
        Constant::Double(v) => v.is_finite(),
        Constant::Int(_) | Constant::Long(_) | Constant::String(_) => true,
    }
}
