//! The data and return stacks.

use crate::error::{Error, Result, StackKind};

/// A last-in-first-out store that knows which of the machine's stacks it is, for error reports.
#[derive(Clone, Debug)]
pub struct Stack<T> {
  kind  : StackKind,
  items : Vec<T>
}

impl<T> Stack<T> {

  pub fn new(kind: StackKind) -> Stack<T> {
    Stack{ kind, items: vec![] }
  }

  pub fn push(&mut self, item: T) {
    self.items.push(item);
  }

  pub fn pop(&mut self) -> Result<T> {
    self.items.pop().ok_or(Error::StackUnderflow{ stack: self.kind })
  }

  /// The item `depth` places below the top, where 0 is the top itself.
  pub fn peek(&self, depth: usize) -> Result<&T> {
    match self.items.len().checked_sub(depth + 1) {
      Some(i) => Ok(&self.items[i]),
      None    => Err(Error::StackUnderflow{ stack: self.kind })
    }
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn clear(&mut self) {
    self.items.clear();
  }

  /// Bottom to top.
  pub fn as_slice(&self) -> &[T] {
    &self.items
  }

}
