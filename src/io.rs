/*!
  The machine's two collaborators: somewhere for `COUT`/`SOUT` to write and somewhere for `CIN`
  to read from. Implementations are provided for standard I/O and for in-memory buffers.
*/

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use crate::error::{Error, Result};

/// Emitting cannot fault the machine. Sinks that can fail drop their errors.
pub trait Output {
  fn emit(&mut self, text: &str);
}

pub trait Input {
  /// Blocks until the next whitespace delimited token is available.
  fn read_token(&mut self) -> Result<String>;
}

/// Collects every emitted string.
impl Output for Vec<String> {
  fn emit(&mut self, text: &str) {
    self.push(text.to_string());
  }
}

/// Hands out queued tokens in order.
impl Input for VecDeque<String> {
  fn read_token(&mut self) -> Result<String> {
    self.pop_front().ok_or(Error::InputExhausted)
  }
}

/// Writes each emitted string to a writer on its own line.
pub struct LineWriter<W: Write> {
  writer: W
}

impl<W: Write> LineWriter<W> {
  pub fn new(writer: W) -> LineWriter<W> {
    LineWriter{ writer }
  }
}

impl<W: Write> Output for LineWriter<W> {
  fn emit(&mut self, text: &str) {
    let _ = writeln!(self.writer, "{}", text);
    let _ = self.writer.flush();
  }
}

/// Splits a reader into whitespace delimited tokens, reading a line at a time on demand.
pub struct TokenReader<R: BufRead> {
  reader  : R,
  pending : VecDeque<String>
}

impl<R: BufRead> TokenReader<R> {
  pub fn new(reader: R) -> TokenReader<R> {
    TokenReader{ reader, pending: VecDeque::new() }
  }
}

impl<R: BufRead> Input for TokenReader<R> {
  fn read_token(&mut self) -> Result<String> {
    while self.pending.is_empty() {
      let mut line = String::new();
      match self.reader.read_line(&mut line) {
        Ok(0) | Err(_) => return Err(Error::InputExhausted),
        Ok(_)          => {
          self.pending.extend(line.split_whitespace().map(str::to_string));
        }
      }
    }
    self.pending.read_token()
  }
}
