//! Lode common types: the value model, object codec, opcode table, and
//! module container format.
//!
//! This crate provides everything the VM and the CLI share:
//!
//! - [`Object`] / [`ObjectType`] — the dynamically-typed runtime value
//! - [`Opcode`] — the instruction set and its mnemonics
//! - [`codec`] — recursive binary encode/decode of objects
//! - [`Module`] — the on-disk container (header + bytecode + constant pool)
//! - [`DecodeError`] / [`ModuleError`] / [`LoadError`] — format errors
//!
//! # Dependencies
//!
//! This crate uses `thiserror` (compile-time proc-macro, zero runtime
//! cost) and has no other dependencies.

pub mod codec;
pub mod error;
pub mod module;
pub mod object;
pub mod opcode;

// Re-export commonly used types at the crate root.
pub use error::{DecodeError, LoadError, ModuleError};
pub use module::{Module, HEADER_LEN, MAGIC};
pub use object::{Object, ObjectType};
pub use opcode::Opcode;
