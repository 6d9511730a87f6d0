/*!
  This module is responsible for the encoding and decoding of memory cells.

  Encoding is checked against the opcode table, so a well formed program image never holds an
  instruction cell with a missing or superfluous operand. Decoding is a pure read of the cell.
*/

use super::Opcode;
use crate::cell::{Word, TEXT_MARKER_OPCODE};
use crate::error::{Error, Result};

/**
  Builds an instruction cell. `operand` is the raw operand value and must fit in 16 bits. It must
  be present exactly when the opcode's table entry requires one.
*/
pub fn encode_instruction(opcode: u8, operand: Option<u32>) -> Result<Word> {
  let operation = Opcode::from_code(opcode)?;

  let operand =
    match (operation.operand_count(), operand) {

      (1, Some(value)) => {
        match u16::try_from(value) {
          Ok(value) => Some(value),
          Err(_)    => {
            return Err(Error::InvalidOperand(
              format!("{} operand 0x{:X} exceeds 16 bits", operation, value)
            ));
          }
        }
      }

      (1, None) => {
        return Err(Error::InvalidOperand(format!("{} requires an operand", operation)));
      }

      (_, Some(value)) => {
        return Err(Error::InvalidOperand(
          format!("{} takes no operand but was given 0x{:X}", operation, value)
        ));
      }

      (_, None) => None

    };

  Ok(Word::Instruction{ opcode, operand })
}

/// Convenience for emitting bytecode from an already decoded operation.
pub fn encode(operation: Opcode, operand: Option<u16>) -> Result<Word> {
  encode_instruction(operation.code(), operand.map(u32::from))
}

/// Builds a text cell. It carries the string literal marker opcode implicitly.
pub fn encode_text(text: &str) -> Word {
  Word::Text(text.to_string())
}

pub fn canonical_hex(word: &Word) -> String {
  word.canonical_hex()
}

/// The numeric opcode in the top byte of the cell. Literal cells decode like any other 32 bits.
pub fn decode_opcode(word: &Word) -> u8 {
  match word {
    Word::Instruction{ opcode, .. } => *opcode,
    Word::Text(_)                   => TEXT_MARKER_OPCODE,
    Word::Literal(_)                => (word.bits() >> 24) as u8
  }
}

pub fn decode_operand(word: &Word) -> Result<u16> {
  match word {
    Word::Instruction{ operand: Some(operand), .. } => Ok(*operand),
    _                                               => Err(Error::NoOperand(word.canonical_hex()))
  }
}
