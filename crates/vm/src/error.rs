//! Runtime errors for the Lode VM.
//!
//! Every fault is fatal to the running VM instance; nothing here is
//! recovered or retried. Each variant carries the bytecode offset (`at`)
//! of the faulting instruction.

use thiserror::Error;

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Pop on an empty operand stack.
    #[error("stack underflow at offset {at}")]
    StackUnderflow { at: usize },

    /// PUSH with a constant-pool index past the end of the pool.
    #[error("constant pool index {index} out of bounds (pool size {len}) at offset {at}")]
    ConstantPoolIndexOutOfBounds { at: usize, index: u32, len: usize },

    /// Binary opcode applied to operand types outside its accepted set.
    #[error("type error in {op}: unsupported operand types '{lhs}' and '{rhs}' at offset {at}")]
    BinaryTypeError {
        at: usize,
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    /// Unary opcode applied to an operand type outside its accepted set.
    #[error("type error in {op}: unsupported operand type '{operand}' at offset {at}")]
    UnaryTypeError {
        at: usize,
        op: &'static str,
        operand: &'static str,
    },

    /// DIV or IDIV with a zero divisor.
    #[error("division by zero at offset {at}")]
    DivisionByZero { at: usize },

    /// Fetch past the end of the bytecode without reaching HALT.
    #[error("program counter {pc} out of bounds (bytecode length {len})")]
    ProgramCounterOutOfBounds { pc: usize, len: usize },

    /// An opcode's trailing operand extends past the end of the bytecode.
    #[error("truncated operand at offset {at}")]
    TruncatedOperand { at: usize },

    /// Opcode byte outside the instruction set.
    #[error("illegal instruction {byte:#04x} at offset {at}")]
    IllegalInstruction { at: usize, byte: u8 },
}
