//! RiSC-32 command line tools.
//!
//! This binary provides a single entry point for the toolchain:
//! 1. **asm:** Assemble a source file into textual bytecode.
//! 2. **run:** Load a bytecode file into a fresh machine and execute it.
//! 3. **exec:** Assemble a source file and execute it directly.

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, BufRead, Write};
use std::process;

use risc32_core::asm::{assemble, assemble_words, write_bytecode};
use risc32_core::common::error::StepError;
use risc32_core::config::Config;
use risc32_core::isa::disasm::disassemble;
use risc32_core::sim::loader::parse_bytecode;
use risc32_core::soc::tty::SerialTty;
use risc32_core::Cpu;

#[derive(Parser, Debug)]
#[command(
    name = "risc32",
    author,
    version,
    about = "RiSC-32 assembler and virtual machine",
    long_about = "Assemble RiSC-32 source into textual bytecode, run bytecode in the \
virtual machine, or do both in one go.\n\nExamples:\n  risc32 asm -f prog.s -o prog.bc\n  \
risc32 run -f prog.bc -v\n  risc32 exec -f prog.s --tty"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble a source file into bytecode text.
    Asm {
        /// Source file to assemble.
        #[arg(short, long)]
        file: String,

        /// Output file (defaults to stdout).
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Run a bytecode file.
    Run {
        /// Bytecode file to run.
        #[arg(short, long)]
        file: String,

        #[command(flatten)]
        run: RunFlags,
    },

    /// Assemble a source file and run it directly.
    Exec {
        /// Source file to assemble and run.
        #[arg(short, long)]
        file: String,

        #[command(flatten)]
        run: RunFlags,
    },
}

#[derive(clap::Args, Debug)]
struct RunFlags {
    /// Pause for Enter before each instruction.
    #[arg(short = 'd', long)]
    debug: bool,

    /// Dump machine state and disassembly before each instruction.
    #[arg(short, long)]
    verbose: bool,

    /// Attach the serial TTY console (waits for a TCP connection).
    #[arg(long)]
    tty: bool,

    /// Clock interrupt period in milliseconds (0 disables the clock).
    #[arg(long, default_value_t = 0)]
    clock_ms: u32,

    /// JSON configuration file; flags override its settings.
    #[arg(long)]
    config: Option<String>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Asm { file, output } => cmd_asm(&file, output.as_deref()),
        Commands::Run { file, run } => {
            let words = parse_bytecode(&read_file(&file)).unwrap_or_else(|err| {
                eprintln!("risc32: {}: {}", file, err);
                process::exit(1);
            });
            cmd_run(&words, &run);
        }
        Commands::Exec { file, run } => {
            let words = assemble_words(&read_file(&file)).unwrap_or_else(|err| {
                eprintln!("risc32: {}: {}", file, err);
                process::exit(1);
            });
            cmd_run(&words, &run);
        }
    }
}

/// Reads a file or exits with a diagnostic.
fn read_file(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("risc32: cannot read {}: {}", path, err);
        process::exit(1);
    })
}

/// Assembles `file` and writes bytecode text to `output` or stdout.
fn cmd_asm(file: &str, output: Option<&str>) {
    let words = assemble(&read_file(file)).unwrap_or_else(|err| {
        eprintln!("risc32: {}: {}", file, err);
        process::exit(1);
    });
    let result = match output {
        Some(path) => {
            fs::File::create(path).and_then(|out| write_bytecode(&words, io::BufWriter::new(out)))
        }
        None => write_bytecode(&words, io::stdout().lock()),
    };
    if let Err(err) = result {
        eprintln!("risc32: cannot write bytecode: {}", err);
        process::exit(1);
    }
}

/// Builds the machine from config and flags, then drives the run loop.
fn cmd_run(words: &[u32], flags: &RunFlags) {
    let mut config: Config = match &flags.config {
        Some(path) => serde_json::from_str(&read_file(path)).unwrap_or_else(|err| {
            eprintln!("risc32: bad config {}: {}", path, err);
            process::exit(1);
        }),
        None => Config::default(),
    };
    config.general.step |= flags.debug;
    config.general.trace |= flags.verbose;
    config.devices.tty |= flags.tty;
    if flags.clock_ms != 0 {
        config.devices.clock_freq_ms = flags.clock_ms;
    }

    let mut cpu = Cpu::new();
    cpu.load_words(words);
    config.apply(&mut cpu);

    if config.devices.tty {
        let tty = SerialTty::attach().unwrap_or_else(|err| {
            eprintln!("risc32: cannot attach tty: {}", err);
            process::exit(1);
        });
        cpu.attach_tty(Box::new(tty));
    }

    run_loop(&mut cpu);
}

/// Drives fetch/execute/poll until the machine halts or faults.
fn run_loop(cpu: &mut Cpu) {
    let stdin = io::stdin();
    loop {
        let fetch_pc = cpu.pc;
        let word = match cpu.fetch() {
            Ok(word) => word,
            Err(fault) => fatal(cpu, fetch_pc, None, &StepError::Fault(fault)),
        };
        if cpu.tracing() {
            eprint!("{}", cpu);
            eprintln!("vm: {:#010x} {}", word, disassemble(word));
        }
        if cpu.stepping() {
            eprint!("vm: paused... ");
            io::stderr().flush().ok();
            let mut line = String::new();
            stdin.lock().read_line(&mut line).ok();
        }
        match cpu.retire(word) {
            Ok(()) => {}
            Err(err) if err.is_halt() => {
                cpu.stats.print();
                return;
            }
            Err(err) => fatal(cpu, fetch_pc, Some(word), &err),
        }
    }
}

/// Reports a fatal fault with the faulting address and mnemonic, then exits.
fn fatal(cpu: &Cpu, pc: u32, word: Option<u32>, err: &StepError) -> ! {
    match word {
        Some(word) => eprintln!("risc32: fault at {:#x} ({}): {}", pc, disassemble(word), err),
        None => eprintln!("risc32: fault at {:#x}: {}", pc, err),
    }
    eprint!("{}", cpu);
    process::exit(1);
}
