//! Lode virtual machine — executes module bytecode over a constant pool.
//!
//! The VM is a stack machine with:
//! - An operand stack of dynamically-typed [`Object`](lode_common::Object)s
//! - A program counter into a borrowed bytecode buffer
//! - A one-way halt flag set by the HALT opcode
//!
//! Execution is single-threaded and synchronous; a VM exclusively owns its
//! stack, and bytecode and constant pool are read-only borrows, so
//! independent VMs may run on separate threads.
//!
//! # Usage
//!
//! ```
//! use lode_common::{Module, Object, Opcode};
//! use lode_vm::run;
//!
//! let module = Module {
//!     major: 1,
//!     minor: 0,
//!     bytecode: vec![
//!         Opcode::Push as u8, 0, 0, 0, 0,
//!         Opcode::Halt as u8,
//!     ],
//!     const_pool: vec![Object::Integer(42)],
//!     entry_pc: 0,
//! };
//!
//! let result = run(&module).unwrap();
//! assert_eq!(result, Some(Object::Integer(42)));
//! ```

pub mod error;
pub mod execute;
pub mod machine;

pub use error::RuntimeError;
pub use machine::{VmConfig, VM};

use lode_common::{Module, Object};

/// Execute a module and return the value left on top of the stack.
///
/// Constructs a VM at the module's entry pc, runs until HALT, and pops
/// the result (`None` if the program left the stack empty).
///
/// # Errors
///
/// Returns [`RuntimeError`] if execution faults (stack underflow, type
/// error, bad constant index, runaway program counter, etc.). Faults are
/// terminal; the VM is not resumable afterwards.
pub fn run(module: &Module) -> Result<Option<Object>, RuntimeError> {
    let mut vm = VM::from_module(module, VmConfig::default());
    vm.run()?;
    Ok(vm.into_result())
}
