use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeSort {
    Void,
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Float,
    Long,
    Double,
    Object,
    Array,
}

impl TypeSort {
    /// Number of operand stack slots occupied by a value of this type.
    pub fn size(&self) -> usize {
        match self {
            Self::Void => 0,
            Self::Long | Self::Double => 2,
            _ => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid descriptor `{descriptor}`: {reason}")]
pub struct DescriptorError {
    pub descriptor: String,
    pub reason: &'static str,
}

/// Argument and return types of a method descriptor such as `(IJLjava/lang/String;)Z`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub args: Vec<TypeSort>,
    pub ret: TypeSort,
}

impl MethodDescriptor {
    pub fn parse(descriptor: &str) -> Result<Self, DescriptorError> {
        let err = |reason| DescriptorError { descriptor: descriptor.to_owned(), reason };

        let bytes = descriptor.as_bytes();
        if bytes.first() != Some(&b'(') { return Err(err("expected `(`")); }

        let mut pos = 1;
        let mut args = vec![];
        loop {
            match bytes.get(pos) {
                Some(b')') => { pos += 1; break; }
                Some(_) => {
                    let (sort, next) = parse_field_type(bytes, pos).map_err(err)?;
                    args.push(sort);
                    pos = next;
                }
                None => { return Err(err("unterminated argument list")); }
            }
        }

        let ret = match bytes.get(pos) {
            Some(b'V') => { pos += 1; TypeSort::Void }
            Some(_) => {
                let (sort, next) = parse_field_type(bytes, pos).map_err(err)?;
                pos = next;
                sort
            }
            None => { return Err(err("missing return type")); }
        };

        if pos != bytes.len() { return Err(err("trailing characters after return type")); }

        Ok(Self { args, ret })
    }
}

fn parse_field_type(bytes: &[u8], pos: usize) -> Result<(TypeSort, usize), &'static str> {
    let sort = match bytes.get(pos) {
        Some(b'Z') => TypeSort::Boolean,
        Some(b'C') => TypeSort::Char,
        Some(b'B') => TypeSort::Byte,
        Some(b'S') => TypeSort::Short,
        Some(b'I') => TypeSort::Int,
        Some(b'F') => TypeSort::Float,
        Some(b'J') => TypeSort::Long,
        Some(b'D') => TypeSort::Double,
        Some(b'L') => {
            let Some(len) = bytes[pos + 1..].iter().position(|&b| b == b';') else { return Err("unterminated class name"); };
            if len == 0 { return Err("empty class name"); }
            return Ok((TypeSort::Object, pos + 1 + len + 1));
        }
        Some(b'[') => {
            let mut elem_pos = pos;
            while bytes.get(elem_pos) == Some(&b'[') { elem_pos += 1; }
            let (_, next) = parse_field_type(bytes, elem_pos)?;
            return Ok((TypeSort::Array, next));
        }
        Some(b'V') => { return Err("`V` is only valid as a return type"); }
        Some(_) => { return Err("unknown type character"); }
        None => { return Err("unexpected end of descriptor"); }
    };

    Ok((sort, pos + 1))
}

#[cfg(test)]
mod tests {
    use super::{MethodDescriptor, TypeSort};

    #[test]
    fn test_parse_primitive_and_reference_args() {
        let desc = MethodDescriptor::parse("(IJLjava/lang/String;[[DZ)Z").unwrap();
        assert_eq!(desc.args, vec![TypeSort::Int, TypeSort::Long, TypeSort::Object, TypeSort::Array, TypeSort::Boolean]);
        assert_eq!(desc.ret, TypeSort::Boolean);
    }

    #[test]
    fn test_parse_void_no_args() {
        let desc = MethodDescriptor::parse("()V").unwrap();
        assert!(desc.args.is_empty());
        assert_eq!(desc.ret, TypeSort::Void);
    }

    #[test]
    fn test_reject_malformed() {
        assert!(MethodDescriptor::parse("").is_err());
        assert!(MethodDescriptor::parse("I)V").is_err());
        assert!(MethodDescriptor::parse("(I").is_err());
        assert!(MethodDescriptor::parse("(V)V").is_err());
        assert!(MethodDescriptor::parse("(Ljava/lang/String)V").is_err());
        assert!(MethodDescriptor::parse("(L;)V").is_err());
        assert!(MethodDescriptor::parse("()VV").is_err());
        assert!(MethodDescriptor::parse("(Q)V").is_err());
        assert!(MethodDescriptor::parse("([)V").is_err());
    }
}
