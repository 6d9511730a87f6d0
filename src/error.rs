//! Errors raised while building, loading, assembling, or running a machine.

use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::address::Address;

/// Which of the engine's two stacks an operation touched.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum StackKind {
  Data,
  Return
}

impl Display for StackKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      StackKind::Data   => write!(f, "data"),
      StackKind::Return => write!(f, "return")
    }
  }
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum Error {
  /// The addressing scheme has a single hex digit for the segment.
  #[error(
    "{0} memory segments requested, but the addressing system supports at most 16. \
     Please request fewer segments."
  )]
  TooMuchMemoryRequested(u8),

  #[error("at least one memory segment is required")]
  NoMemoryRequested,

  #[error("address {0} is outside of the configured memory")]
  OutOfBounds(Address),

  #[error("pop on empty {stack} stack")]
  StackUnderflow { stack: StackKind },

  #[error("malformed address literal `{0}`")]
  MalformedAddress(String),

  #[error("unknown mnemonic `{0}`")]
  UnknownMnemonic(String),

  #[error("unknown opcode 0x{0:02X}")]
  UnknownOpcode(u8),

  #[error("cell {0} carries no operand")]
  NoOperand(String),

  #[error("invalid operand: {0}")]
  InvalidOperand(String),

  #[error("the input source has no more tokens")]
  InputExhausted,

  #[error("line {line}: {source}")]
  Assembly {
    line: usize,
    #[source]
    source: Box<Error>
  },
}

pub type Result<T> = std::result::Result<T, Error>;

/**
  A fatal error raised while the engine was running. Records the opcode that was executing and
  where the cursor stood, so that a failed run can be reported and restarted from scratch.
*/
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("{error} (opcode 0x{opcode:02X} at {location})")]
pub struct Fault {
  pub opcode   : u8,
  pub location : Address,
  #[source]
  pub error    : Error,
}
