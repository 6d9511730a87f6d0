//! A location in the machine's two dimensional memory, an ordered pair of a segment and an
//! offset within that segment, with conversions to and from the flat sequential form.

use std::fmt::{Display, Formatter};

use nom::{
  bytes::complete::{tag_no_case, take_while_m_n},
  combinator::{all_consuming, opt},
  sequence::preceded,
  IResult
};

use crate::error::{Error, Result};

/// Number of cells in one memory segment.
pub const SEGMENT_SIZE: u16 = 1024;
/// The segment occupies a single hex digit of an operand.
pub const MAX_SEGMENTS: u8 = 16;

// An operand is [Segment:4][Offset:12].
const OPERAND_SEGMENT_SHIFT: u16 = 12;
const OPERAND_OFFSET_MASK: u16 = 0x0FFF;

/// Addresses are plain values. Whether one is valid depends on the memory it is used with.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Default)]
pub struct Address {
  pub segment : u8,
  pub offset  : u16
}

impl Address {

  pub const ZERO: Address = Address{ segment: 0, offset: 0 };

  pub fn new(segment: u8, offset: u16) -> Address {
    Address{ segment, offset }
  }

  /**
    Converts a flat sequential address to a `(segment, offset)` pair. Flat addresses beyond the
    largest representable segment saturate to segment 255, which no memory contains.
  */
  pub fn from_flat(n: u32) -> Address {
    let size = SEGMENT_SIZE as u32;
    Address {
      segment : u8::try_from(n / size).unwrap_or(u8::MAX),
      offset  : (n % size) as u16
    }
  }

  pub fn to_flat(&self) -> u32 {
    self.segment as u32 * SEGMENT_SIZE as u32 + self.offset as u32
  }

  /// Decodes the 16 bit operand form: the top hex digit is the segment, the rest the offset.
  pub fn from_operand(operand: u16) -> Address {
    Address {
      segment : (operand >> OPERAND_SEGMENT_SHIFT) as u8,
      offset  : operand & OPERAND_OFFSET_MASK
    }
  }

  /// Packs the address into an instruction operand. Fails if either component cannot be
  /// represented in its hex digits.
  pub fn to_operand(&self) -> Result<u16> {
    match self.segment < MAX_SEGMENTS && self.offset <= OPERAND_OFFSET_MASK {
      true  => Ok(((self.segment as u16) << OPERAND_SEGMENT_SHIFT) | self.offset),
      false => Err(Error::InvalidOperand(format!("{} does not fit in an operand", self)))
    }
  }

  /// True if the address names a cell in a memory of `segment_count` segments.
  pub fn is_within(&self, segment_count: u8) -> bool {
    self.segment < segment_count && self.offset < SEGMENT_SIZE
  }

  /// Returns the address itself, or `OutOfBounds` if it lies outside `segment_count` segments.
  pub fn require_within(self, segment_count: u8) -> Result<Address> {
    match self.is_within(segment_count) {
      true  => Ok(self),
      false => Err(Error::OutOfBounds(self))
    }
  }

}

impl Display for Address {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "[{:X}:{:03X}]", self.segment, self.offset)
  }
}

fn hex_digits(text: &str) -> IResult<&str, &str> {
  all_consuming(
    preceded(
      opt(tag_no_case("0x")),
      take_while_m_n(1, 4, |c: char| c.is_ascii_hexdigit())
    )
  )(text)
}

/**
  Parses the textual address form used by `STORE`, `FETCH`, `IF`, `CALL`, and the string
  opcodes. The text is hex, optionally prefixed with `0x`. When it is longer than three digits
  the first digit is the segment and the remainder the offset; otherwise the segment is 0 and the
  whole string is the offset.

  The result is not bounds checked, since the size of memory is the engine's business.
*/
pub fn parse_address_literal(text: &str) -> Result<Address> {
  let digits =
    match hex_digits(text.trim()) {
      Ok((_, digits)) => digits,
      Err(_)          => return Err(Error::MalformedAddress(text.to_string()))
    };

  let (segment, offset) =
    match digits.len() > 3 {
      true  => digits.split_at(1),
      false => ("0", digits)
    };

  // Both halves are known to be hex digits, so these only fail on a bug in `hex_digits`.
  let segment = u8::from_str_radix(segment, 16)
    .map_err(|_| Error::MalformedAddress(text.to_string()))?;
  let offset = u16::from_str_radix(offset, 16)
    .map_err(|_| Error::MalformedAddress(text.to_string()))?;

  Ok(Address{ segment, offset })
}


#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;

  #[test]
  fn flat_addresses_split_on_segment_size() {
    assert_eq!(Address::from_flat(0), Address::new(0, 0));
    assert_eq!(Address::from_flat(1023), Address::new(0, 1023));
    assert_eq!(Address::from_flat(1024), Address::new(1, 0));
    assert_eq!(Address::from_flat(5 * 1024 + 7), Address::new(5, 7));
    assert_eq!(Address::new(3, 17).to_flat(), 3 * 1024 + 17);
  }

  #[test]
  fn huge_flat_address_is_out_of_every_memory() {
    let address = Address::from_flat(u32::MAX);
    assert_eq!(address.segment, u8::MAX);
    assert!(!address.is_within(MAX_SEGMENTS));
  }

  #[test]
  fn short_literals_live_in_segment_zero() {
    assert_eq!(parse_address_literal("5").unwrap(), Address::new(0, 5));
    assert_eq!(parse_address_literal("1A3").unwrap(), Address::new(0, 0x1A3));
    assert_eq!(parse_address_literal("0x3ff").unwrap(), Address::new(0, 0x3FF));
  }

  #[test]
  fn long_literals_lead_with_the_segment() {
    assert_eq!(parse_address_literal("11A3").unwrap(), Address::new(1, 0x1A3));
    assert_eq!(parse_address_literal("0xF000").unwrap(), Address::new(15, 0));
  }

  #[test]
  fn non_hex_literals_are_malformed() {
    for text in &["", "0x", "G12", "12345", "-1", "1 2"] {
      assert_eq!(
        parse_address_literal(text),
        Err(Error::MalformedAddress(text.to_string())),
        "{:?}", text
      );
    }
  }

  #[test]
  fn bounds_depend_on_segment_count() {
    let address = Address::new(1, 0);
    assert!(address.is_within(2));
    assert_eq!(address.require_within(1), Err(Error::OutOfBounds(address)));
    assert_eq!(
      Address::new(0, SEGMENT_SIZE).require_within(1),
      Err(Error::OutOfBounds(Address::new(0, SEGMENT_SIZE)))
    );
  }

  proptest! {
    #[test]
    fn flat_and_pair_forms_agree(n in 0u32..(16 * 1024)) {
      prop_assert_eq!(Address::from_flat(n).to_flat(), n);
    }

    #[test]
    fn operands_recover_the_address(segment in 0u8..16, offset in 0u16..SEGMENT_SIZE) {
      let address = Address::new(segment, offset);
      let operand = address.to_operand().unwrap();
      prop_assert_eq!(Address::from_operand(operand), address);
      prop_assert_eq!(parse_address_literal(&format!("{:04X}", operand)).unwrap(), address);
    }
  }
}
