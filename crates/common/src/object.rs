//! Runtime value representation for the Lode VM.
//!
//! Objects live on the operand stack and in a module's constant pool.

use std::fmt;

/// The tag identifying which variant an [`Object`] holds.
///
/// Tag bytes double as the on-wire discriminator in the object codec, so
/// the `#[repr(u8)]` values are part of the module format.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    /// The null value.
    Null = 0x00,
    /// Signed 32-bit integer.
    Integer = 0x01,
    /// IEEE 754 64-bit float.
    Float = 0x02,
    /// UTF-8 string.
    String = 0x03,
    /// Boolean value.
    Boolean = 0x04,
    /// Ordered sequence of objects.
    List = 0x05,
}

/// All valid object types, in tag order. Useful for exhaustive testing.
pub const ALL_OBJECT_TYPES: [ObjectType; 6] = [
    ObjectType::Null,
    ObjectType::Integer,
    ObjectType::Float,
    ObjectType::String,
    ObjectType::Boolean,
    ObjectType::List,
];

impl ObjectType {
    /// Returns the diagnostic name for this type, as it appears in
    /// runtime error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ObjectType::Null => "NULL",
            ObjectType::Integer => "INTEGER",
            ObjectType::Float => "FLOAT",
            ObjectType::String => "STRING",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::List => "LIST",
        }
    }
}

/// A dynamically-typed runtime value.
///
/// The enum discriminant is the tag, so a value whose tag disagrees with
/// its payload cannot be constructed.
#[derive(Debug, Clone)]
pub enum Object {
    /// The null value.
    Null,
    /// Signed 32-bit integer.
    Integer(i32),
    /// IEEE 754 64-bit float.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Boolean value.
    Boolean(bool),
    /// Ordered sequence of objects. Lists own their elements; cloning a
    /// list clones the whole tree.
    List(Vec<Object>),
}

// F64 payloads compare bitwise via to_bits(), which keeps Object Eq-able
// and usable in round-trip assertions even for NaN payloads that survive
// the codec bit-for-bit. Opcode-level numeric comparison is done in the
// VM, not through this impl.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Null, Object::Null) => true,
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Float(a), Object::Float(b)) => a.to_bits() == b.to_bits(),
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::List(a), Object::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Object {}

impl Object {
    /// Returns the type tag for this value.
    pub fn kind(&self) -> ObjectType {
        match self {
            Object::Null => ObjectType::Null,
            Object::Integer(_) => ObjectType::Integer,
            Object::Float(_) => ObjectType::Float,
            Object::String(_) => ObjectType::String,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::List(_) => ObjectType::List,
        }
    }

    /// Diagnostic name of this value's type.
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Null => write!(f, "null"),
            Object::Integer(v) => write!(f, "{v}"),
            Object::Float(v) => write!(f, "{v}"),
            Object::String(v) => write!(f, "{v}"),
            Object::Boolean(v) => write!(f, "{v}"),
            Object::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}
