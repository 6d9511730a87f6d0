//! The segmented memory store. Every accessor is bounds checked; nothing wraps on access.

use crate::address::{Address, MAX_SEGMENTS, SEGMENT_SIZE};
use crate::cell::Word;
use crate::error::{Error, Result};

#[derive(Clone, Debug)]
pub struct Memory {
  segments: Vec<Vec<Word>>
}

impl Memory {

  /// Allocates `segment_count` segments of `NOP` cells.
  pub fn new(segment_count: u8) -> Result<Memory> {
    match segment_count {
      0                         => Err(Error::NoMemoryRequested),
      n if n > MAX_SEGMENTS     => Err(Error::TooMuchMemoryRequested(n)),
      n                         => {
        Ok(Memory {
          segments: vec![vec![Word::NOP; SEGMENT_SIZE as usize]; n as usize]
        })
      }
    }
  }

  pub fn segment_count(&self) -> u8 {
    self.segments.len() as u8
  }

  /// Total number of cells.
  pub fn capacity(&self) -> u32 {
    self.segments.len() as u32 * SEGMENT_SIZE as u32
  }

  pub fn get(&self, address: Address) -> Result<&Word> {
    self.segments
        .get(address.segment as usize)
        .and_then(|segment| segment.get(address.offset as usize))
        .ok_or(Error::OutOfBounds(address))
  }

  pub fn set(&mut self, address: Address, word: Word) -> Result<()> {
    let cell =
      self.segments
          .get_mut(address.segment as usize)
          .and_then(|segment| segment.get_mut(address.offset as usize))
          .ok_or(Error::OutOfBounds(address))?;
    *cell = word;
    Ok(())
  }

  /// Resets every cell to `NOP`.
  pub fn clear(&mut self) {
    for segment in self.segments.iter_mut() {
      for cell in segment.iter_mut() {
        *cell = Word::NOP;
      }
    }
  }

  /// Cells from `start` onward, crossing segment boundaries, for at most `count` cells.
  pub fn window(&self, start: Address, count: usize) -> Vec<(Address, &Word)> {
    (start.to_flat()..self.capacity())
      .take(count)
      .filter_map(|n| {
        let address = Address::from_flat(n);
        self.get(address).ok().map(|word| (address, word))
      })
      .collect()
  }

}
