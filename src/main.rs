use std::fs;
use std::io::{stdin, stdout};
use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result};
use clap::Parser;

use forth_engine::bytecode::{listing, parse_assembly};
use forth_engine::io::{LineWriter, TokenReader};
use forth_engine::{DEFAULT_SEGMENTS, FVM};

#[derive(Parser, Debug)]
#[command(name = "fvm", version)]
/// Assembles a Forth program and runs it on the segmented stack machine.
///
/// `COUT` and `SOUT` write to standard output, and `CIN` reads whitespace separated tokens from
/// standard input.
struct CliArgs {
  /// Program source file.
  file: PathBuf,
  /// Number of 1024 cell memory segments to install, 1 through 16.
  #[arg(long, default_value_t = DEFAULT_SEGMENTS)]
  mem: u8,
  /// Print the assembled program before running and the machine state after.
  #[arg(long)]
  debug: bool,
}

fn main() {
  let args = CliArgs::parse();

  if let Err(e) = interpret(&args) {
    eprintln!("Error: {:#}", e);
    exit(1);
  }
}

fn interpret(args: &CliArgs) -> Result<()> {
  let text = fs::read_to_string(&args.file)
    .with_context(|| format!("could not read {}", args.file.display()))?;
  let words = parse_assembly(&text)
    .with_context(|| format!("could not assemble {}", args.file.display()))?;

  if args.debug {
    println!("# Assembled {} cells\n{}", words.len(), listing(&words));
  }

  let mut machine = FVM::new(args.mem)?;
  machine.load(words).context("program does not fit in memory")?;

  let stdin = stdin();
  let mut input = TokenReader::new(stdin.lock());
  let mut output = LineWriter::new(stdout());
  let result = machine.run(&mut output, &mut input);

  if args.debug {
    println!("{}", machine);
  }

  result.context("the machine faulted")?;
  Ok(())
}
