//! Fetch-decode-execute loop and opcode implementations for the Lode VM.
//!
//! Binary opcodes pop the right operand first, then the left (the left
//! operand was pushed first and sits deeper). Coercion rules:
//!
//! - INTEGER op INTEGER stays INTEGER for ADD/SUB/MUL and the bitwise ops.
//! - Any FLOAT operand promotes ADD/SUB/MUL and the ordering ops to f64.
//! - DIV always divides in f64 and produces FLOAT; IDIV divides in f64 and
//!   truncates toward zero into INTEGER.
//! - ADD concatenates STRING + STRING; MUL repeats STRING * INTEGER.

use crate::error::RuntimeError;
use crate::machine::VM;
use lode_common::{Object, Opcode};

/// Numeric view of an operand: INTEGER widened to f64, FLOAT as-is.
fn numeric(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(v) => Some(*v as f64),
        Object::Float(v) => Some(*v),
        _ => None,
    }
}

impl<'a> VM<'a> {
    /// Execute until HALT or a fault.
    ///
    /// The halt flag is checked before each fetch; once set, the loop
    /// returns and the stack holds the program's final state.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        while !self.halted {
            if self.config.trace {
                self.trace_state();
            }
            self.step()?;
        }
        Ok(())
    }

    /// Fetch, decode, and execute one instruction.
    fn step(&mut self) -> Result<(), RuntimeError> {
        let at = self.pc;
        let byte = self.fetch()?;
        let op = Opcode::try_from(byte)
            .map_err(|_| RuntimeError::IllegalInstruction { at, byte })?;

        match op {
            Opcode::Add => self.exec_add(at)?,
            Opcode::Sub => self.exec_sub(at)?,
            Opcode::Mul => self.exec_mul(at)?,
            Opcode::Div => self.exec_div(at)?,
            Opcode::Idiv => self.exec_idiv(at)?,
            Opcode::Push => self.exec_push(at)?,
            Opcode::Pop => {
                self.pop()?;
            }
            Opcode::Halt => self.halted = true,
            Opcode::Eq => self.exec_equality(at, Opcode::Eq)?,
            Opcode::Neq => self.exec_equality(at, Opcode::Neq)?,
            Opcode::Lt => self.exec_ordering(at, Opcode::Lt, |x, y| x < y)?,
            Opcode::Gt => self.exec_ordering(at, Opcode::Gt, |x, y| x > y)?,
            Opcode::Lte => self.exec_ordering(at, Opcode::Lte, |x, y| x <= y)?,
            Opcode::Gte => self.exec_ordering(at, Opcode::Gte, |x, y| x >= y)?,
            Opcode::LogAnd => self.exec_logic(at, Opcode::LogAnd, |x, y| x && y)?,
            Opcode::LogOr => self.exec_logic(at, Opcode::LogOr, |x, y| x || y)?,
            Opcode::LogNot => self.exec_log_not(at)?,
            Opcode::BitAnd => self.exec_bitwise(at, Opcode::BitAnd, |x, y| x & y)?,
            Opcode::BitOr => self.exec_bitwise(at, Opcode::BitOr, |x, y| x | y)?,
            Opcode::BitNot => self.exec_bit_not(at)?,
            Opcode::Xor => self.exec_bitwise(at, Opcode::Xor, |x, y| x ^ y)?,
        }

        self.pc = at + op.width();
        Ok(())
    }

    // ---- Arithmetic ----

    fn exec_add(&mut self, at: usize) -> Result<(), RuntimeError> {
        let b = self.pop()?;
        let a = self.pop()?;

        let result = match (a, b) {
            (Object::Integer(x), Object::Integer(y)) => Object::Integer(x.wrapping_add(y)),
            (Object::String(x), Object::String(y)) => Object::String(x + &y),
            (a, b) => match (numeric(&a), numeric(&b)) {
                (Some(x), Some(y)) => Object::Float(x + y),
                _ => return Err(type_error_binary(at, Opcode::Add, &a, &b)),
            },
        };

        self.push(result);
        Ok(())
    }

    fn exec_sub(&mut self, at: usize) -> Result<(), RuntimeError> {
        let b = self.pop()?;
        let a = self.pop()?;

        let result = match (a, b) {
            (Object::Integer(x), Object::Integer(y)) => Object::Integer(x.wrapping_sub(y)),
            (a, b) => match (numeric(&a), numeric(&b)) {
                (Some(x), Some(y)) => Object::Float(x - y),
                _ => return Err(type_error_binary(at, Opcode::Sub, &a, &b)),
            },
        };

        self.push(result);
        Ok(())
    }

    fn exec_mul(&mut self, at: usize) -> Result<(), RuntimeError> {
        let b = self.pop()?;
        let a = self.pop()?;

        let result = match (a, b) {
            (Object::Integer(x), Object::Integer(y)) => Object::Integer(x.wrapping_mul(y)),
            // Non-positive counts repeat into the empty string.
            (Object::String(x), Object::Integer(y)) => {
                Object::String(x.repeat(y.max(0) as usize))
            }
            (a, b) => match (numeric(&a), numeric(&b)) {
                (Some(x), Some(y)) => Object::Float(x * y),
                _ => return Err(type_error_binary(at, Opcode::Mul, &a, &b)),
            },
        };

        self.push(result);
        Ok(())
    }

    fn exec_div(&mut self, at: usize) -> Result<(), RuntimeError> {
        let b = self.pop()?;
        let a = self.pop()?;

        match (numeric(&a), numeric(&b)) {
            (Some(_), Some(y)) if y == 0.0 => Err(RuntimeError::DivisionByZero { at }),
            (Some(x), Some(y)) => {
                self.push(Object::Float(x / y));
                Ok(())
            }
            _ => Err(type_error_binary(at, Opcode::Div, &a, &b)),
        }
    }

    fn exec_idiv(&mut self, at: usize) -> Result<(), RuntimeError> {
        let b = self.pop()?;
        let a = self.pop()?;

        match (numeric(&a), numeric(&b)) {
            (Some(_), Some(y)) if y == 0.0 => Err(RuntimeError::DivisionByZero { at }),
            // `as i32` truncates toward zero, saturating at the i32 range.
            (Some(x), Some(y)) => {
                self.push(Object::Integer((x / y) as i32));
                Ok(())
            }
            _ => Err(type_error_binary(at, Opcode::Idiv, &a, &b)),
        }
    }

    // ---- Stack ----

    fn exec_push(&mut self, at: usize) -> Result<(), RuntimeError> {
        let index = self.read_u32(at + 1)?;
        let constant = self.const_pool.get(index as usize).ok_or(
            RuntimeError::ConstantPoolIndexOutOfBounds {
                at,
                index,
                len: self.const_pool.len(),
            },
        )?;
        self.push(constant.clone());
        Ok(())
    }

    // ---- Comparison ----

    /// EQ/NEQ. Values of different tags are never equal; within a tag,
    /// INTEGER/FLOAT/STRING/BOOLEAN compare by value. NULL and LIST
    /// operands are outside the comparable set.
    fn exec_equality(&mut self, at: usize, op: Opcode) -> Result<(), RuntimeError> {
        let b = self.pop()?;
        let a = self.pop()?;

        let equal = if a.kind() != b.kind() {
            false
        } else {
            match (&a, &b) {
                (Object::Integer(x), Object::Integer(y)) => x == y,
                (Object::Float(x), Object::Float(y)) => x == y,
                (Object::String(x), Object::String(y)) => x == y,
                (Object::Boolean(x), Object::Boolean(y)) => x == y,
                _ => return Err(type_error_binary(at, op, &a, &b)),
            }
        };

        let result = if op == Opcode::Neq { !equal } else { equal };
        self.push(Object::Boolean(result));
        Ok(())
    }

    /// LT/GT/LTE/GTE over numeric pairs, promoted to f64.
    fn exec_ordering(
        &mut self,
        at: usize,
        op: Opcode,
        cmp: fn(f64, f64) -> bool,
    ) -> Result<(), RuntimeError> {
        let b = self.pop()?;
        let a = self.pop()?;

        match (numeric(&a), numeric(&b)) {
            (Some(x), Some(y)) => {
                self.push(Object::Boolean(cmp(x, y)));
                Ok(())
            }
            _ => Err(type_error_binary(at, op, &a, &b)),
        }
    }

    // ---- Logic & bitwise ----

    fn exec_logic(
        &mut self,
        at: usize,
        op: Opcode,
        apply: fn(bool, bool) -> bool,
    ) -> Result<(), RuntimeError> {
        let b = self.pop()?;
        let a = self.pop()?;

        match (&a, &b) {
            (Object::Boolean(x), Object::Boolean(y)) => {
                self.push(Object::Boolean(apply(*x, *y)));
                Ok(())
            }
            _ => Err(type_error_binary(at, op, &a, &b)),
        }
    }

    fn exec_log_not(&mut self, at: usize) -> Result<(), RuntimeError> {
        let a = self.pop()?;

        match a {
            Object::Boolean(x) => {
                self.push(Object::Boolean(!x));
                Ok(())
            }
            a => Err(type_error_unary(at, Opcode::LogNot, &a)),
        }
    }

    fn exec_bitwise(
        &mut self,
        at: usize,
        op: Opcode,
        apply: fn(i32, i32) -> i32,
    ) -> Result<(), RuntimeError> {
        let b = self.pop()?;
        let a = self.pop()?;

        match (&a, &b) {
            (Object::Integer(x), Object::Integer(y)) => {
                self.push(Object::Integer(apply(*x, *y)));
                Ok(())
            }
            _ => Err(type_error_binary(at, op, &a, &b)),
        }
    }

    fn exec_bit_not(&mut self, at: usize) -> Result<(), RuntimeError> {
        let a = self.pop()?;

        match a {
            Object::Integer(x) => {
                self.push(Object::Integer(!x));
                Ok(())
            }
            a => Err(type_error_unary(at, Opcode::BitNot, &a)),
        }
    }
}

fn type_error_binary(at: usize, op: Opcode, a: &Object, b: &Object) -> RuntimeError {
    RuntimeError::BinaryTypeError {
        at,
        op: op.mnemonic(),
        lhs: a.type_name(),
        rhs: b.type_name(),
    }
}

fn type_error_unary(at: usize, op: Opcode, a: &Object) -> RuntimeError {
    RuntimeError::UnaryTypeError {
        at,
        op: op.mnemonic(),
        operand: a.type_name(),
    }
}
