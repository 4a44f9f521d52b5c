//! Binary object codec: self-describing, recursive encoding of [`Object`].
//!
//! Every encoding starts with the value's tag byte, followed by a
//! type-specific payload. Multi-byte fields are little-endian. Lists
//! recurse, so the constant pool can hold arbitrarily nested values with
//! no external schema.
//!
//! Wire format:
//! ```text
//! NULL     tag
//! INTEGER  tag | i32
//! FLOAT    tag | f64
//! STRING   tag | u32 length | bytes
//! BOOLEAN  tag | u8 (0 or 1)
//! LIST     tag | u32 count | element encodings...
//! ```

use crate::error::DecodeError;
use crate::object::{Object, ObjectType};

/// Append the encoding of `obj` to `out`.
pub fn encode_object(obj: &Object, out: &mut Vec<u8>) {
    out.push(obj.kind() as u8);
    match obj {
        Object::Null => {}
        Object::Integer(v) => out.extend_from_slice(&v.to_le_bytes()),
        Object::Float(v) => out.extend_from_slice(&v.to_le_bytes()),
        Object::String(v) => {
            out.extend_from_slice(&(v.len() as u32).to_le_bytes());
            out.extend_from_slice(v.as_bytes());
        }
        Object::Boolean(v) => out.push(*v as u8),
        Object::List(items) => {
            out.extend_from_slice(&(items.len() as u32).to_le_bytes());
            for item in items {
                encode_object(item, out);
            }
        }
    }
}

/// Encode `obj` into a fresh buffer.
pub fn encode(obj: &Object) -> Vec<u8> {
    let mut out = Vec::new();
    encode_object(obj, &mut out);
    out
}

/// Decode one object from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed. Decoding is the
/// exact inverse of [`encode_object`]: for any value `v`,
/// `decode_object(&encode(&v))` yields `(v, encode(&v).len())`.
pub fn decode_object(bytes: &[u8]) -> Result<(Object, usize), DecodeError> {
    let (&tag, rest) = bytes.split_first().ok_or(DecodeError::TruncatedEncoding)?;

    match tag {
        t if t == ObjectType::Null as u8 => Ok((Object::Null, 1)),
        t if t == ObjectType::Integer as u8 => {
            let raw = take::<4>(rest)?;
            Ok((Object::Integer(i32::from_le_bytes(raw)), 5))
        }
        t if t == ObjectType::Float as u8 => {
            let raw = take::<8>(rest)?;
            Ok((Object::Float(f64::from_le_bytes(raw)), 9))
        }
        t if t == ObjectType::String as u8 => {
            let len = u32::from_le_bytes(take::<4>(rest)?) as usize;
            let payload = rest.get(4..4 + len).ok_or(DecodeError::TruncatedEncoding)?;
            let text = std::str::from_utf8(payload).map_err(|_| DecodeError::InvalidUtf8)?;
            Ok((Object::String(text.to_owned()), 1 + 4 + len))
        }
        t if t == ObjectType::Boolean as u8 => {
            let raw = take::<1>(rest)?;
            Ok((Object::Boolean(raw[0] != 0), 2))
        }
        t if t == ObjectType::List as u8 => {
            let count = u32::from_le_bytes(take::<4>(rest)?) as usize;
            let mut consumed = 1 + 4;
            let mut items = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                let (item, n) = decode_object(&bytes[consumed..])?;
                items.push(item);
                consumed += n;
            }
            Ok((Object::List(items), consumed))
        }
        other => Err(DecodeError::UnknownObjectType(other)),
    }
}

/// Read the first `N` bytes of `bytes` as a fixed-size array.
fn take<const N: usize>(bytes: &[u8]) -> Result<[u8; N], DecodeError> {
    let slice = bytes.get(..N).ok_or(DecodeError::TruncatedEncoding)?;
    Ok(slice.try_into().expect("get(..N) guarantees N bytes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(obj: Object) {
        let bytes = encode(&obj);
        let (decoded, consumed) = decode_object(&bytes).unwrap();
        assert_eq!(decoded, obj);
        assert_eq!(consumed, bytes.len(), "must consume exactly its encoding");
    }

    #[test]
    fn null_is_a_bare_tag() {
        assert_eq!(encode(&Object::Null), vec![0x00]);
        roundtrip(Object::Null);
    }

    #[test]
    fn integer_wire_format() {
        assert_eq!(encode(&Object::Integer(1)), vec![0x01, 1, 0, 0, 0]);
        assert_eq!(
            encode(&Object::Integer(-2)),
            vec![0x01, 0xFE, 0xFF, 0xFF, 0xFF]
        );
        roundtrip(Object::Integer(i32::MIN));
        roundtrip(Object::Integer(i32::MAX));
    }

    #[test]
    fn float_wire_format() {
        let bytes = encode(&Object::Float(1.5));
        assert_eq!(bytes[0], 0x02);
        assert_eq!(bytes[1..], 1.5f64.to_le_bytes());
        roundtrip(Object::Float(82.2842));
        roundtrip(Object::Float(-0.0));
    }

    #[test]
    fn string_wire_format() {
        let bytes = encode(&Object::String("hi".into()));
        assert_eq!(bytes, vec![0x03, 2, 0, 0, 0, b'h', b'i']);
        roundtrip(Object::String(String::new()));
        roundtrip(Object::String("Hello, World!".into()));
    }

    #[test]
    fn boolean_wire_format() {
        assert_eq!(encode(&Object::Boolean(false)), vec![0x04, 0]);
        assert_eq!(encode(&Object::Boolean(true)), vec![0x04, 1]);
        roundtrip(Object::Boolean(true));
    }

    #[test]
    fn boolean_nonzero_payload_decodes_true() {
        let (obj, consumed) = decode_object(&[0x04, 7]).unwrap();
        assert_eq!(obj, Object::Boolean(true));
        assert_eq!(consumed, 2);
    }

    #[test]
    fn empty_list() {
        assert_eq!(encode(&Object::List(vec![])), vec![0x05, 0, 0, 0, 0]);
        roundtrip(Object::List(vec![]));
    }

    #[test]
    fn nested_list_roundtrip() {
        roundtrip(Object::List(vec![
            Object::Integer(43),
            Object::String("Hello, World!".into()),
            Object::Boolean(true),
            Object::Float(10.2841),
            Object::List(vec![Object::Null, Object::List(vec![Object::Integer(1)])]),
        ]));
    }

    #[test]
    fn sequential_decode_of_concatenated_objects() {
        let objs = [
            Object::List(vec![Object::Integer(10), Object::Integer(12)]),
            Object::Integer(10),
            Object::Null,
        ];
        let mut bytes = Vec::new();
        for obj in &objs {
            encode_object(obj, &mut bytes);
        }

        let mut rest = &bytes[..];
        let mut decoded = Vec::new();
        while !rest.is_empty() {
            let (obj, n) = decode_object(rest).unwrap();
            decoded.push(obj);
            rest = &rest[n..];
        }
        assert_eq!(decoded, objs);
    }

    #[test]
    fn unknown_tag_rejected() {
        assert_eq!(
            decode_object(&[0x2A]),
            Err(DecodeError::UnknownObjectType(0x2A))
        );
    }

    #[test]
    fn empty_buffer_rejected() {
        assert_eq!(decode_object(&[]), Err(DecodeError::TruncatedEncoding));
    }

    #[test]
    fn truncated_integer_payload() {
        assert_eq!(
            decode_object(&[0x01, 1, 2]),
            Err(DecodeError::TruncatedEncoding)
        );
    }

    #[test]
    fn truncated_string_payload() {
        // declares 5 bytes, supplies 2
        assert_eq!(
            decode_object(&[0x03, 5, 0, 0, 0, b'a', b'b']),
            Err(DecodeError::TruncatedEncoding)
        );
    }

    #[test]
    fn truncated_list_element() {
        // one-element list whose element is cut off
        assert_eq!(
            decode_object(&[0x05, 1, 0, 0, 0, 0x01, 9]),
            Err(DecodeError::TruncatedEncoding)
        );
    }

    #[test]
    fn invalid_utf8_rejected() {
        assert_eq!(
            decode_object(&[0x03, 1, 0, 0, 0, 0xFF]),
            Err(DecodeError::InvalidUtf8)
        );
    }
}
