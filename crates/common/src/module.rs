//! Module container format: header, bytecode section, constant pool.
//!
//! A module file is a fixed header followed by two back-to-back sections:
//!
//! ```text
//! magic:u32 | major:u16 | minor:u16
//! bytecode_offset:u32 | bytecode_size:u32
//! const_pool_offset:u32 | const_pool_size:u32
//! entry_pc:u32
//! <bytecode_size bytes of opcodes>
//! <const_pool_size bytes of concatenated object encodings>
//! ```
//!
//! All fields are little-endian. Offsets are relative to the start of the
//! file. The writer recomputes every offset and size from the actual
//! section contents; stored offsets are never trusted on write.

use std::fs;
use std::path::Path;

use crate::codec::{decode_object, encode_object};
use crate::error::{LoadError, ModuleError};
use crate::object::Object;

/// Magic number at the start of every module file.
pub const MAGIC: u32 = 0xC1A0_C0DE;

/// Fixed header length in bytes: magic + versions + two offset/size pairs
/// + entry pc.
pub const HEADER_LEN: usize = 4 + 2 + 2 + 4 + 4 + 4 + 4 + 4;

/// An in-memory module: versions, bytecode, decoded constant pool, and the
/// program counter at which execution begins.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    /// Format major version. Compatibility policy is the embedder's call.
    pub major: u16,
    /// Format minor version.
    pub minor: u16,
    /// Raw opcode bytes.
    pub bytecode: Vec<u8>,
    /// Constants referenced by PUSH, in pool order.
    pub const_pool: Vec<Object>,
    /// Bytecode offset at which execution begins.
    pub entry_pc: u32,
}

impl Module {
    /// Serialize this module, recomputing all section offsets and sizes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut pool = Vec::new();
        for obj in &self.const_pool {
            encode_object(obj, &mut pool);
        }

        let bytecode_offset = HEADER_LEN as u32;
        let bytecode_size = self.bytecode.len() as u32;
        let const_pool_offset = bytecode_offset + bytecode_size;
        let const_pool_size = pool.len() as u32;

        let mut out = Vec::with_capacity(HEADER_LEN + self.bytecode.len() + pool.len());
        out.extend_from_slice(&MAGIC.to_le_bytes());
        out.extend_from_slice(&self.major.to_le_bytes());
        out.extend_from_slice(&self.minor.to_le_bytes());
        out.extend_from_slice(&bytecode_offset.to_le_bytes());
        out.extend_from_slice(&bytecode_size.to_le_bytes());
        out.extend_from_slice(&const_pool_offset.to_le_bytes());
        out.extend_from_slice(&const_pool_size.to_le_bytes());
        out.extend_from_slice(&self.entry_pc.to_le_bytes());
        out.extend_from_slice(&self.bytecode);
        out.extend_from_slice(&pool);
        out
    }

    /// Parse a module out of a byte buffer.
    ///
    /// The header is validated before any section is sliced: the magic
    /// must match, both sections must fall inside the buffer, and the
    /// constant pool must start exactly where the bytecode ends.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ModuleError> {
        if bytes.len() < HEADER_LEN {
            return Err(ModuleError::TruncatedHeader(bytes.len()));
        }

        let magic = read_u32(bytes, 0);
        if magic != MAGIC {
            return Err(ModuleError::BadMagic(magic));
        }

        let major = u16::from_le_bytes([bytes[4], bytes[5]]);
        let minor = u16::from_le_bytes([bytes[6], bytes[7]]);
        let bytecode_offset = read_u32(bytes, 8);
        let bytecode_size = read_u32(bytes, 12);
        let const_pool_offset = read_u32(bytes, 16);
        let const_pool_size = read_u32(bytes, 20);
        let entry_pc = read_u32(bytes, 24);

        let bytecode = section(bytes, "bytecode", bytecode_offset, bytecode_size)?;
        let pool_bytes = section(bytes, "constant pool", const_pool_offset, const_pool_size)?;

        let bytecode_end = bytecode_offset + bytecode_size;
        if bytecode_end != const_pool_offset {
            return Err(ModuleError::MisalignedSections {
                bytecode_end,
                const_pool_offset,
            });
        }

        let mut const_pool = Vec::new();
        let mut rest = pool_bytes;
        while !rest.is_empty() {
            let (obj, consumed) = decode_object(rest)?;
            const_pool.push(obj);
            rest = &rest[consumed..];
        }

        Ok(Self {
            major,
            minor,
            bytecode: bytecode.to_vec(),
            const_pool,
            entry_pc,
        })
    }

    /// Load a module from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let bytes = fs::read(path)?;
        Ok(Self::from_bytes(&bytes)?)
    }

    /// Write this module to a file, recomputing the section layout.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        fs::write(path, self.to_bytes())?;
        Ok(())
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Slice a section out of the buffer, rejecting offsets or sizes that
/// fall outside it. Checked in u64 so hostile headers cannot overflow.
fn section<'a>(
    bytes: &'a [u8],
    name: &'static str,
    offset: u32,
    size: u32,
) -> Result<&'a [u8], ModuleError> {
    let end = offset as u64 + size as u64;
    if (offset as u64) < HEADER_LEN as u64 || end > bytes.len() as u64 {
        return Err(ModuleError::SectionOutOfBounds {
            section: name,
            offset,
            size,
            len: bytes.len(),
        });
    }
    Ok(&bytes[offset as usize..end as usize])
}
