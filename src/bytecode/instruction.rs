use std::str::FromStr;

use strum_macros::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};
use num_enum::{TryFromPrimitive, IntoPrimitive};

use crate::error::{Error, Result};

/**
  Opcodes of the virtual machine.

  The discriminants are the numeric opcodes embedded in instruction cells and are shared with
  anything that emits bytecode, so they must not be reordered. Mnemonics come from the `strum`
  derives and are matched case-insensitively.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq,         PartialEq, Debug,    Hash
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[repr(u8)]
pub enum Opcode {
  Nop     = 0x00,  // nop
  Store   = 0x01,  // store( address )
  Add     = 0x02,
  Sub     = 0x03,
  #[strum(to_string = "RSTORE", serialize = ">R")]
  RStore  = 0x04,
  Fetch   = 0x05,  // fetch( address )
  And     = 0x06,
  Drop    = 0x07,
  Dup     = 0x08,
  Or      = 0x09,
  Over    = 0x0A,
  #[strum(to_string = "RFETCH", serialize = "R>")]
  RFetch  = 0x0B,
  Swap    = 0x0C,
  Xor     = 0x0D,
  If      = 0x0E,  // if( address )
  Call    = 0x0F,  // call( address )
  Exit    = 0x10,
  Lit     = 0x11,  // lit, followed by an inline cell
  Cout    = 0x12,
  Cin     = 0x13,
  StrLit  = 0x14,  // strlit( address ), also carried by every text cell
  Sout    = 0x15,  // sout( address )
}

impl Opcode {

  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  /// Looks up a numeric opcode, failing with `UnknownOpcode` for codes outside the table.
  pub fn from_code(code: u8) -> Result<Opcode> {
    Opcode::try_from(code).map_err(|_| Error::UnknownOpcode(code))
  }

  pub fn from_mnemonic(mnemonic: &str) -> Result<Opcode> {
    Opcode::from_str(mnemonic).map_err(|_| Error::UnknownMnemonic(mnemonic.to_string()))
  }

  pub fn mnemonic(&self) -> &'static str {
    self.into()
  }

  /// The number of address operands the instruction cell itself carries, 0 or 1. The cell
  /// following a `LIT` is data, not an operand.
  pub fn operand_count(&self) -> u8 {
    match self {
      | Opcode::Store
      | Opcode::Fetch
      | Opcode::If
      | Opcode::Call
      | Opcode::StrLit
      | Opcode::Sout => 1,
      _              => 0
    }
  }

}

pub fn opcode_of(mnemonic: &str) -> Result<u8> {
  Opcode::from_mnemonic(mnemonic).map(|opcode| opcode.code())
}

pub fn required_operand_count(mnemonic: &str) -> Result<u8> {
  Opcode::from_mnemonic(mnemonic).map(|opcode| opcode.operand_count())
}


#[cfg(test)]
mod tests {
  use super::*;
  use strum::IntoEnumIterator;

  #[test]
  fn mnemonics_map_to_their_opcodes() {
    let table = [
      ("NOP", 0x00), ("STORE", 0x01), ("ADD", 0x02), ("SUB", 0x03), ("RSTORE", 0x04),
      ("FETCH", 0x05), ("AND", 0x06), ("DROP", 0x07), ("DUP", 0x08), ("OR", 0x09),
      ("OVER", 0x0A), ("RFETCH", 0x0B), ("SWAP", 0x0C), ("XOR", 0x0D), ("IF", 0x0E),
      ("CALL", 0x0F), ("EXIT", 0x10), ("LIT", 0x11), ("COUT", 0x12), ("CIN", 0x13),
      ("STRLIT", 0x14), ("SOUT", 0x15),
    ];
    for (mnemonic, code) in table.iter() {
      assert_eq!(opcode_of(mnemonic).unwrap(), *code, "{}", mnemonic);
      assert_eq!(Opcode::from_code(*code).unwrap().mnemonic(), *mnemonic);
    }
    assert_eq!(Opcode::iter().count(), table.len());
  }

  #[test]
  fn return_stack_aliases_and_case() {
    assert_eq!(Opcode::from_mnemonic(">R").unwrap(), Opcode::RStore);
    assert_eq!(Opcode::from_mnemonic("R>").unwrap(), Opcode::RFetch);
    assert_eq!(Opcode::from_mnemonic("dup").unwrap(), Opcode::Dup);
    assert_eq!(Opcode::RStore.to_string(), "RSTORE");
  }

  #[test]
  fn operand_counts() {
    assert_eq!(required_operand_count("STORE").unwrap(), 1);
    assert_eq!(required_operand_count("CALL").unwrap(), 1);
    assert_eq!(required_operand_count("SOUT").unwrap(), 1);
    assert_eq!(required_operand_count("LIT").unwrap(), 0);
    assert_eq!(required_operand_count("SWAP").unwrap(), 0);
  }

  #[test]
  fn unknown_names_and_codes() {
    assert_eq!(opcode_of("FROB"), Err(Error::UnknownMnemonic("FROB".to_string())));
    assert_eq!(required_operand_count(""), Err(Error::UnknownMnemonic(String::new())));
    assert_eq!(Opcode::from_code(0x16), Err(Error::UnknownOpcode(0x16)));
    assert_eq!(Opcode::from_code(0xFF), Err(Error::UnknownOpcode(0xFF)));
  }
}
