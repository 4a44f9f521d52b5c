//! Integration tests for the Lode CLI.
//!
//! These tests invoke the `lode` binary as a subprocess and check exit
//! codes, stdout, and stderr. Module files are built with `lode-common`
//! and written into a temp directory.

use assert_cmd::Command;
use lode_common::{Module, Object, Opcode};
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn lode() -> Command {
    Command::cargo_bin("lode").unwrap()
}

/// `PUSH 0; PUSH 1; ADD; HALT` over `[40, 2]`, result 42.
fn sample_module() -> Module {
    Module {
        major: 1,
        minor: 1,
        bytecode: vec![
            Opcode::Push as u8,
            0,
            0,
            0,
            0,
            Opcode::Push as u8,
            1,
            0,
            0,
            0,
            Opcode::Add as u8,
            Opcode::Halt as u8,
        ],
        const_pool: vec![Object::Integer(40), Object::Integer(2)],
        entry_pc: 0,
    }
}

fn write_module(dir: &TempDir, module: &Module) -> PathBuf {
    let path = dir.path().join("test.lodm");
    module.write(&path).unwrap();
    path
}

// ---- No-args / help ----

#[test]
fn no_args_prints_usage_and_exits_1() {
    lode()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage: lode"));
}

#[test]
fn help_flag_exits_0() {
    lode()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Commands:"));
}

#[test]
fn unknown_command_exits_1() {
    lode()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown command"));
}

#[test]
fn run_without_file_exits_1() {
    lode()
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("requires an input file"));
}

// ---- Run ----

#[test]
fn run_executes_module_and_prints_result() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir, &sample_module());

    lode()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("42"));
}

#[test]
fn run_missing_file_exits_1() {
    lode()
        .args(["run", "/definitely/not/here.lodm"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot load"));
}

#[test]
fn run_garbage_file_exits_1() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("junk.lodm");
    fs::write(&path, b"not a module").unwrap();

    lode()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot load"));
}

#[test]
fn run_incompatible_major_exits_2() {
    let dir = TempDir::new().unwrap();
    let mut module = sample_module();
    module.major = 9;
    let path = write_module(&dir, &module);

    lode()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("incompatible major version"));
}

#[test]
fn run_newer_minor_exits_2() {
    let dir = TempDir::new().unwrap();
    let mut module = sample_module();
    module.minor = 99;
    let path = write_module(&dir, &module);

    lode()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("incompatible minor version"));
}

#[test]
fn run_runtime_fault_exits_3() {
    let dir = TempDir::new().unwrap();
    let module = Module {
        major: 1,
        minor: 0,
        bytecode: vec![Opcode::Pop as u8, Opcode::Halt as u8],
        const_pool: vec![],
        entry_pc: 0,
    };
    let path = write_module(&dir, &module);

    lode()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("runtime error"))
        .stderr(predicate::str::contains("stack underflow"));
}

#[test]
fn run_debug_flag_traces_to_stderr() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir, &sample_module());

    lode()
        .args(["run", path.to_str().unwrap(), "--debug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("42"))
        .stderr(predicate::str::contains("PUSH"))
        .stderr(predicate::str::contains("HALT"));
}

#[test]
fn run_halting_with_empty_stack_prints_nothing() {
    let dir = TempDir::new().unwrap();
    let module = Module {
        major: 1,
        minor: 0,
        bytecode: vec![Opcode::Halt as u8],
        const_pool: vec![],
        entry_pc: 0,
    };
    let path = write_module(&dir, &module);

    lode()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// ---- Dump ----

#[test]
fn dump_shows_header_disassembly_and_constants() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir, &sample_module());

    lode()
        .args(["dump", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("version    1.1"))
        .stdout(predicate::str::contains("bytecode   12 bytes"))
        .stdout(predicate::str::contains("PUSH 0"))
        .stdout(predicate::str::contains("PUSH 1"))
        .stdout(predicate::str::contains("ADD"))
        .stdout(predicate::str::contains("HALT"))
        .stdout(predicate::str::contains("INTEGER"))
        .stdout(predicate::str::contains("40"));
}

#[test]
fn dump_without_file_exits_1() {
    lode()
        .arg("dump")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("requires an input file"));
}
