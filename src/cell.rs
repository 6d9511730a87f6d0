//! The contents of one memory cell, which is also what the stacks hold.

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Opcode implicitly carried by every `Word::Text`.
pub const TEXT_MARKER_OPCODE: u8 = 0x14;

const OPCODE_SHIFT: u32 = 24;
const OPERAND_SHIFT: u32 = 8;

/**
  A cell's canonical form is a fixed width hex rendering of 32 bits, `0x` plus 8 digits:
  ```text
  [OpCode:8][Operand:16][Reserved:8]   Instruction
  [Value:32]                           Literal, low 32 bits, two's complement
  [0x14:8][Reserved:24]                Text, payload carried alongside
  ```
  Equality is equality of canonical forms, except that a `Text` cell only equals another `Text`
  cell carrying the same payload. `Hash` is consistent with this.
*/
#[derive(Clone, Debug)]
pub enum Word {
  Instruction {
    opcode  : u8,
    operand : Option<u16>
  },
  Literal(i64),
  Text(String),
}

impl Word {

  /// The sentinel pushed for a true condition; `IF` branches on any cell whose canonical form
  /// begins with the digit `1`.
  pub const TRUE: Word = Word::Literal(0x1000_0000);
  pub const FALSE: Word = Word::Literal(0);
  /// Zeroed memory is all `NOP`.
  pub const NOP: Word = Word::Instruction{ opcode: 0x00, operand: None };

  /// The 32 bits rendered by the canonical form.
  pub fn bits(&self) -> u32 {
    match self {

      Word::Instruction{ opcode, operand } => {
        ((*opcode as u32) << OPCODE_SHIFT) | ((operand.unwrap_or(0) as u32) << OPERAND_SHIFT)
      }

      Word::Literal(value) => {
        *value as u32
      }

      Word::Text(_) => {
        (TEXT_MARKER_OPCODE as u32) << OPCODE_SHIFT
      }

    }
  }

  /// `0x` followed by 8 uppercase hex digits.
  pub fn canonical_hex(&self) -> String {
    format!("0x{:08X}", self.bits())
  }

  /// Integer interpretation used by the arithmetic and logic opcodes.
  pub fn to_int(&self) -> i64 {
    match self {
      Word::Literal(value) => *value,
      _                    => self.bits() as i64
    }
  }

  /// Truth is the most significant hex digit of the canonical form being `1`.
  pub fn is_true(&self) -> bool {
    self.bits() >> 28 == 1
  }

  pub fn is_text(&self) -> bool {
    matches!(self, Word::Text(_))
  }

}

impl Default for Word {
  fn default() -> Word {
    Word::NOP
  }
}

impl PartialEq for Word {
  fn eq(&self, other: &Word) -> bool {
    match (self, other) {
      (Word::Text(a), Word::Text(b))          => a == b,
      (Word::Text(_), _) | (_, Word::Text(_)) => false,
      _                                       => self.bits() == other.bits()
    }
  }
}

impl Eq for Word {}

impl Hash for Word {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.bits().hash(state);
    if let Word::Text(text) = self {
      text.hash(state);
    }
  }
}

impl From<i64> for Word {
  fn from(value: i64) -> Word {
    Word::Literal(value)
  }
}

impl From<&str> for Word {
  fn from(text: &str) -> Word {
    Word::Text(text.to_string())
  }
}

/// What `COUT` emits: literals in decimal, text as itself, instructions in canonical form.
impl Display for Word {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Word::Literal(value) => write!(f, "{}", value),
      Word::Text(text)     => write!(f, "{}", text),
      _                    => write!(f, "{}", self.canonical_hex())
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn canonical_form_is_ten_characters() {
    assert_eq!(Word::NOP.canonical_hex(), "0x00000000");
    assert_eq!(
      Word::Instruction{ opcode: 0x0F, operand: Some(0x0562) }.canonical_hex(),
      "0x0F056200"
    );
    assert_eq!(
      Word::Instruction{ opcode: 0x12, operand: Some(0xF562) }.canonical_hex(),
      "0x12F56200"
    );
    assert_eq!(Word::Instruction{ opcode: 0x0F, operand: None }.canonical_hex(), "0x0F000000");
    assert_eq!(Word::Literal(10).canonical_hex(), "0x0000000A");
    assert_eq!(Word::Literal(-1).canonical_hex(), "0xFFFFFFFF");
    assert_eq!(Word::from("hello").canonical_hex(), "0x14000000");
  }

  #[test]
  fn equality_follows_canonical_form() {
    assert_eq!(Word::Instruction{ opcode: 2, operand: None }, Word::Literal(0x0200_0000));
    assert_eq!(
      Word::Instruction{ opcode: 5, operand: Some(0) },
      Word::Instruction{ opcode: 5, operand: None }
    );
    assert_ne!(Word::Literal(1), Word::Literal(2));
    assert_eq!(Word::from("a"), Word::from("a"));
    assert_ne!(Word::from("a"), Word::from("b"));
    assert_ne!(Word::from("a"), Word::Instruction{ opcode: 0x14, operand: None });
  }

  #[test]
  fn truth_is_the_leading_hex_digit() {
    assert!(Word::TRUE.is_true());
    assert!(!Word::FALSE.is_true());
    assert!(!Word::Literal(1).is_true());
    assert!(Word::Literal(0x1FFF_FFFF).is_true());
    assert!(!Word::Literal(0x2000_0000).is_true());
    // EXIT and the text marker both lead with 1.
    assert!(Word::Instruction{ opcode: 0x10, operand: None }.is_true());
    assert!(Word::from("x").is_true());
  }

  #[test]
  fn display_is_what_cout_prints() {
    assert_eq!(Word::Literal(-42).to_string(), "-42");
    assert_eq!(Word::from("hi there").to_string(), "hi there");
    assert_eq!(Word::Instruction{ opcode: 0x10, operand: None }.to_string(), "0x10000000");
  }
}
