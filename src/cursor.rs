//! The program counter, a position in memory that knows how to advance.

use std::fmt::{Display, Formatter};

use crate::address::{Address, SEGMENT_SIZE};
use crate::error::Result;

/**
  A cursor holds an `Address` and the number of segments it moves through. Advancing past the
  end of a segment rolls into the next one, and advancing past the end of the last segment wraps
  to `(0, 0)`. That is the only place the address space wraps.
*/
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Cursor {
  position      : Address,
  segment_count : u8
}

impl Cursor {

  pub fn new(segment_count: u8) -> Cursor {
    Cursor {
      position: Address::ZERO,
      segment_count
    }
  }

  pub fn position(&self) -> Address {
    self.position
  }

  fn successor(&self) -> Address {
    let Address{ segment, offset } = self.position;
    match (offset + 1 >= SEGMENT_SIZE, segment + 1 >= self.segment_count) {
      (false, _)    => Address::new(segment, offset + 1),
      (true, false) => Address::new(segment + 1, 0),
      (true, true)  => Address::ZERO
    }
  }

  pub fn increment(&mut self) {
    self.position = self.successor();
  }

  /// The address `increment` would move to.
  pub fn lookahead(&self) -> Address {
    self.successor()
  }

  /// Moves the cursor to `target`, which must lie within the cursor's memory.
  pub fn branch(&mut self, target: Address) -> Result<()> {
    self.position = target.require_within(self.segment_count)?;
    Ok(())
  }

  pub fn reset(&mut self) {
    self.position = Address::ZERO;
  }

}

impl Display for Cursor {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.position)
  }
}
