//! Opcode definitions for the Lode instruction set.
//!
//! Every instruction is a single opcode byte. PUSH is the only opcode
//! followed by an operand: a 4-byte little-endian constant-pool index.

use crate::error::DecodeError;

/// Identifies the operation to perform.
///
/// The `#[repr(u8)]` values are the on-wire opcode bytes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Arithmetic
    /// Pop two values, push their sum. Also concatenates strings.
    Add = 0x00,
    /// Pop two values, push (deeper - top).
    Sub = 0x01,
    /// Pop two values, push their product. Also repeats a string by an
    /// integer count.
    Mul = 0x02,
    /// Pop two values, push the floating-point quotient. Always FLOAT.
    Div = 0x03,
    /// Pop two values, push the quotient truncated toward zero. Always INTEGER.
    Idiv = 0x04,

    // Stack & control
    /// Push the constant at the 4-byte pool index that follows the opcode.
    Push = 0x05,
    /// Discard the top of stack.
    Pop = 0x06,
    /// Stop execution. The stack is left as the program's final state.
    Halt = 0x07,

    // Comparison
    /// Pop two values, push BOOLEAN equality.
    Eq = 0x08,
    /// Pop two values, push BOOLEAN inequality.
    Neq = 0x09,
    /// Pop two numeric values, push BOOLEAN (deeper < top).
    Lt = 0x0A,
    /// Pop two numeric values, push BOOLEAN (deeper > top).
    Gt = 0x0B,
    /// Pop two numeric values, push BOOLEAN (deeper <= top).
    Lte = 0x0C,
    /// Pop two numeric values, push BOOLEAN (deeper >= top).
    Gte = 0x0D,

    // Logic
    /// Pop two BOOLEANs, push their conjunction.
    LogAnd = 0x0E,
    /// Pop two BOOLEANs, push their disjunction.
    LogOr = 0x0F,
    /// Pop one BOOLEAN, push its negation.
    LogNot = 0x10,

    // Bitwise (INTEGER only)
    /// Pop two INTEGERs, push bitwise AND.
    BitAnd = 0x11,
    /// Pop two INTEGERs, push bitwise OR.
    BitOr = 0x12,
    /// Pop one INTEGER, push bitwise complement.
    BitNot = 0x13,
    /// Pop two INTEGERs, push bitwise XOR.
    Xor = 0x14,
}

/// All valid opcodes, in byte-value order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 21] = [
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Idiv,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Halt,
    Opcode::Eq,
    Opcode::Neq,
    Opcode::Lt,
    Opcode::Gt,
    Opcode::Lte,
    Opcode::Gte,
    Opcode::LogAnd,
    Opcode::LogOr,
    Opcode::LogNot,
    Opcode::BitAnd,
    Opcode::BitOr,
    Opcode::BitNot,
    Opcode::Xor,
];

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Opcode::Add),
            0x01 => Ok(Opcode::Sub),
            0x02 => Ok(Opcode::Mul),
            0x03 => Ok(Opcode::Div),
            0x04 => Ok(Opcode::Idiv),
            0x05 => Ok(Opcode::Push),
            0x06 => Ok(Opcode::Pop),
            0x07 => Ok(Opcode::Halt),
            0x08 => Ok(Opcode::Eq),
            0x09 => Ok(Opcode::Neq),
            0x0A => Ok(Opcode::Lt),
            0x0B => Ok(Opcode::Gt),
            0x0C => Ok(Opcode::Lte),
            0x0D => Ok(Opcode::Gte),
            0x0E => Ok(Opcode::LogAnd),
            0x0F => Ok(Opcode::LogOr),
            0x10 => Ok(Opcode::LogNot),
            0x11 => Ok(Opcode::BitAnd),
            0x12 => Ok(Opcode::BitOr),
            0x13 => Ok(Opcode::BitNot),
            0x14 => Ok(Opcode::Xor),
            _ => Err(DecodeError::UnknownOpcode(value)),
        }
    }
}

impl Opcode {
    /// Returns the mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Idiv => "IDIV",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Halt => "HALT",
            Opcode::Eq => "EQ",
            Opcode::Neq => "NEQ",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Lte => "LTE",
            Opcode::Gte => "GTE",
            Opcode::LogAnd => "LOG_AND",
            Opcode::LogOr => "LOG_OR",
            Opcode::LogNot => "LOG_NOT",
            Opcode::BitAnd => "BIT_AND",
            Opcode::BitOr => "BIT_OR",
            Opcode::BitNot => "BIT_NOT",
            Opcode::Xor => "XOR",
        }
    }

    /// Number of operand bytes following the opcode byte.
    pub fn operand_width(&self) -> usize {
        match self {
            Opcode::Push => 4,
            _ => 0,
        }
    }

    /// Total encoded width of the instruction, opcode byte included.
    pub fn width(&self) -> usize {
        1 + self.operand_width()
    }
}
