//! CLI command implementations.
//!
//! The libraries return errors; this module presents them and picks the
//! process exit code. Version compatibility is also decided here: the
//! loader treats version fields as informational, and the embedder
//! rejects modules it cannot execute.

use lode_common::{Module, Opcode};
use lode_vm::{VmConfig, VM};

/// Module major version this runtime executes. Majors must match exactly.
const MAJOR: u16 = 1;
/// Highest minor version understood within [`MAJOR`].
const MINOR: u16 = 1;

/// Execute a module file and print the value left on top of the stack.
pub fn run(args: &[String]) -> Result<(), i32> {
    let mut input = None;
    let mut debug = false;

    for arg in args {
        match arg.as_str() {
            "--debug" | "-d" => debug = true,
            other => {
                if input.is_none() {
                    input = Some(other);
                }
            }
        }
    }

    let Some(input) = input else {
        eprintln!("error: run requires an input file");
        eprintln!("Usage: lode run <module.lodm> [--debug|-d]");
        return Err(1);
    };

    let module = load(input)?;
    check_version(&module)?;

    let mut vm = VM::from_module(&module, VmConfig { trace: debug });
    vm.run().map_err(|e| {
        eprintln!("runtime error: {e}");
        3
    })?;

    if let Some(result) = vm.into_result() {
        println!("{result}");
    }
    Ok(())
}

/// Show a module's header fields, disassembled bytecode, and constants.
pub fn dump(args: &[String]) -> Result<(), i32> {
    let Some(input) = args.first() else {
        eprintln!("error: dump requires an input file");
        eprintln!("Usage: lode dump <module.lodm>");
        return Err(1);
    };

    let module = load(input)?;

    println!("module {input}");
    println!("  version    {}.{}", module.major, module.minor);
    println!("  bytecode   {} bytes", module.bytecode.len());
    println!("  constants  {}", module.const_pool.len());
    println!("  entry pc   {}", module.entry_pc);

    println!();
    print!("{}", disassemble(&module.bytecode));

    if !module.const_pool.is_empty() {
        println!();
        for (i, obj) in module.const_pool.iter().enumerate() {
            println!("{i:4}  {:8} {obj}", obj.type_name());
        }
    }

    Ok(())
}

fn load(input: &str) -> Result<Module, i32> {
    Module::load(input).map_err(|e| {
        eprintln!("error: cannot load '{input}': {e}");
        1
    })
}

fn check_version(module: &Module) -> Result<(), i32> {
    if module.major != MAJOR {
        eprintln!(
            "error: incompatible major version, file={} vm={MAJOR}",
            module.major
        );
        return Err(2);
    }
    if module.minor > MINOR {
        eprintln!(
            "error: incompatible minor version, file={} vm={MINOR}",
            module.minor
        );
        return Err(2);
    }
    Ok(())
}

/// Render bytecode one instruction per line. Bytes outside the opcode
/// table are shown as UNKNOWN so a damaged module can still be inspected.
fn disassemble(bytecode: &[u8]) -> String {
    let mut out = String::new();
    let mut pc = 0;

    while pc < bytecode.len() {
        let byte = bytecode[pc];
        match Opcode::try_from(byte) {
            Ok(Opcode::Push) => {
                let operand = bytecode.get(pc + 1..pc + 5).map(|raw| {
                    u32::from_le_bytes(raw.try_into().expect("slice is 4 bytes"))
                });
                match operand {
                    Some(index) => out.push_str(&format!("{pc:6}  PUSH {index}\n")),
                    None => out.push_str(&format!("{pc:6}  PUSH <truncated>\n")),
                }
                pc += Opcode::Push.width();
            }
            Ok(op) => {
                out.push_str(&format!("{pc:6}  {}\n", op.mnemonic()));
                pc += op.width();
            }
            Err(_) => {
                out.push_str(&format!("{pc:6}  UNKNOWN ({byte:#04x})\n"));
                pc += 1;
            }
        }
    }

    out
}
