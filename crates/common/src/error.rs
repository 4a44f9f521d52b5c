//! Format-level errors for the Lode object codec and module container.

use thiserror::Error;

/// Errors from decoding an encoded object or an opcode byte.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Object tag byte outside the known set.
    #[error("unknown object type tag: {0:#04x}")]
    UnknownObjectType(u8),

    /// Buffer ended before the declared payload.
    #[error("truncated object encoding")]
    TruncatedEncoding,

    /// String payload is not valid UTF-8.
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    /// Opcode byte outside the instruction set.
    #[error("unknown opcode: {0:#04x}")]
    UnknownOpcode(u8),
}

/// Errors from parsing a module out of a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
    /// Buffer is smaller than the fixed header.
    #[error("file too small for module header: {0} bytes")]
    TruncatedHeader(usize),

    /// Magic number mismatch.
    #[error("bad magic number: {0:#010x}")]
    BadMagic(u32),

    /// A section's declared offset/size falls outside the buffer.
    #[error("{section} section out of bounds: offset {offset}, size {size}, file length {len}")]
    SectionOutOfBounds {
        section: &'static str,
        offset: u32,
        size: u32,
        len: usize,
    },

    /// The constant pool does not start where the bytecode section ends.
    #[error("constant pool offset {const_pool_offset} does not follow bytecode section ending at {bytecode_end}")]
    MisalignedSections {
        bytecode_end: u32,
        const_pool_offset: u32,
    },

    /// Constant pool decoding failed.
    #[error(transparent)]
    Object(#[from] DecodeError),
}

/// Errors from loading or writing a module file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be opened, read, or written.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The file's contents are not a valid module.
    #[error(transparent)]
    Module(#[from] ModuleError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_object_type() {
        assert_eq!(
            DecodeError::UnknownObjectType(0x2A).to_string(),
            "unknown object type tag: 0x2a"
        );
    }

    #[test]
    fn display_truncated_encoding() {
        assert_eq!(
            DecodeError::TruncatedEncoding.to_string(),
            "truncated object encoding"
        );
    }

    #[test]
    fn display_bad_magic() {
        assert_eq!(
            ModuleError::BadMagic(0xDEADBEEF).to_string(),
            "bad magic number: 0xdeadbeef"
        );
    }

    #[test]
    fn display_section_out_of_bounds() {
        let err = ModuleError::SectionOutOfBounds {
            section: "bytecode",
            offset: 28,
            size: 100,
            len: 64,
        };
        assert_eq!(
            err.to_string(),
            "bytecode section out of bounds: offset 28, size 100, file length 64"
        );
    }

    #[test]
    fn decode_error_flows_through_module_error() {
        let err: ModuleError = DecodeError::UnknownObjectType(0xFF).into();
        assert_eq!(err.to_string(), "unknown object type tag: 0xff");
    }
}
