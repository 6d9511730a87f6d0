//! The Forth Virtual Machine, an execution engine for the fixed instruction set in
//! `crate::bytecode` running over segmented memory with a data stack and a return stack.

use std::fmt::{Display, Formatter};

use prettytable::{format as TableFormat, Table};

use crate::address::Address;
use crate::bytecode::{decode_opcode, decode_operand, parse_number, Opcode};
use crate::cell::Word;
use crate::cursor::Cursor;
use crate::error::{Error, Fault, Result, StackKind};
use crate::io::{Input, Output};
use crate::memory::Memory;
use crate::stack::Stack;

/// Segments installed when the caller has no preference.
pub const DEFAULT_SEGMENTS: u8 = 2;
// Rows of memory shown around the cursor when displaying the machine.
const MEMORY_WINDOW: u32 = 8;

/// What the cursor does after an instruction has executed.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Flow {
  /// Advance one cell.
  Next,
  /// Advance two cells, stepping over an inline cell.
  Skip,
  /// The instruction already placed the cursor.
  Jump,
  Halt
}

pub struct FVM {

  // Flags
  running: bool,

  // Memory Stores
  memory       : Memory,
  data_stack   : Stack<Word>,
  return_stack : Stack<Word>,

  // Registers //
  cursor : Cursor,
  /// Cells written by `fill_next` since the last `clear`.
  filled : u32,

}

impl FVM {

  // region Display methods

  fn make_cell_table<'a, I>(rows: I, highlight: Option<usize>) -> Table
    where I: IntoIterator<Item = (String, &'a Word)>
  {

    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Contents"]);

    for (i, (label, cell)) in rows.into_iter().enumerate() {
      match Some(i) == highlight {

        true  => {
          table.add_row(
            row![r->format!("* --> {} =", label), cell.canonical_hex()]
          );
        }

        false => {
          table.add_row(
            row![r->format!("{} =", label), cell.canonical_hex()]
          );
        }

      } // end match on highlight
    } // end for
    table
  }

  /// Top of stack first, with the top highlighted.
  fn make_stack_table(name: char, stack: &Stack<Word>) -> Table {
    let rows =
      stack.as_slice()
           .iter()
           .enumerate()
           .rev()
           .map(|(i, cell)| (format!("{}[{}]", name, i), cell));
    FVM::make_cell_table(rows, Some(0))
  }

  fn make_memory_table(&self) -> Table {
    let position = self.cursor.position();
    let start = position.to_flat().saturating_sub(MEMORY_WINDOW / 2);
    let window = self.memory.window(Address::from_flat(start), MEMORY_WINDOW as usize);
    let highlight = window.iter().position(|(address, _)| *address == position);
    let rows = window.into_iter().map(|(address, cell)| (format!("{}", address), cell));
    FVM::make_cell_table(rows, highlight)
  }

  // endregion

  // region Low-level utility methods

  /// Builds a machine with `segment_count` segments of zeroed memory, 1 through 16.
  pub fn new(segment_count: u8) -> Result<FVM> {
    Ok(FVM {
      running      : false,
      memory       : Memory::new(segment_count)?,
      data_stack   : Stack::new(StackKind::Data),
      return_stack : Stack::new(StackKind::Return),
      cursor       : Cursor::new(segment_count),
      filled       : 0,
    })
  }

  pub fn segment_count(&self) -> u8 {
    self.memory.segment_count()
  }

  pub fn is_running(&self) -> bool {
    self.running
  }

  pub fn cursor(&self) -> Address {
    self.cursor.position()
  }

  pub fn memory(&self) -> &Memory {
    &self.memory
  }

  pub fn data_stack(&self) -> &[Word] {
    self.data_stack.as_slice()
  }

  pub fn return_stack(&self) -> &[Word] {
    self.return_stack.as_slice()
  }

  /// Resolves an instruction's operand to an address inside this machine's memory.
  fn operand_address(&self, word: &Word) -> Result<Address> {
    let operand = decode_operand(word)?;
    Address::from_operand(operand).require_within(self.segment_count())
  }

  /// Pops `a`, then `b`, and pushes `b OP a`.
  fn binary_operation(&mut self, operation: fn(i64, i64) -> i64) -> Result<()> {
    let a = self.data_stack.pop()?.to_int();
    let b = self.data_stack.pop()?.to_int();
    self.data_stack.push(Word::Literal(operation(b, a)));
    Ok(())
  }

  /// The text cell at an instruction's operand address.
  fn text_at(&self, instruction: &Word) -> Result<&str> {
    let address = self.operand_address(instruction)?;
    match self.memory.get(address)? {
      Word::Text(text) => Ok(text),
      other            => {
        Err(Error::InvalidOperand(
          format!("expected text at {}, found {}", address, other.canonical_hex())
        ))
      }
    }
  }

  // endregion

  // region Loading

  /**
    Writes `word` at the cursor and advances it. Used to load a program before `run`; fails once
    every cell of memory has been filled.
  */
  pub fn fill_next(&mut self, word: Word) -> Result<()> {
    if self.filled >= self.memory.capacity() {
      return Err(Error::OutOfBounds(Address::from_flat(self.filled)));
    }
    self.memory.set(self.cursor.position(), word)?;
    self.cursor.increment();
    self.filled += 1;
    Ok(())
  }

  /// Fills memory with a whole program, in load order.
  pub fn load<I>(&mut self, words: I) -> Result<()>
    where I: IntoIterator<Item = Word>
  {
    for word in words {
      self.fill_next(word)?;
    }
    Ok(())
  }

  /// Rewinds the cursor to `(0, 0)` and empties both stacks, leaving memory as loaded.
  pub fn reset(&mut self) {
    self.cursor.reset();
    self.data_stack.clear();
    self.return_stack.clear();
    self.running = false;
  }

  /// Zeroes memory, empties both stacks, and rewinds the loader.
  pub fn clear(&mut self) {
    self.memory.clear();
    self.data_stack.clear();
    self.return_stack.clear();
    self.cursor.reset();
    self.filled = 0;
    self.running = false;
  }

  // endregion

  // region Execution

  /// Runs from `(0, 0)` until `EXIT` or the first fault.
  pub fn run<O, I>(&mut self, output: &mut O, input: &mut I) -> std::result::Result<(), Fault>
    where O: Output, I: Input
  {
    self.cursor.reset();
    self.running = true;

    #[cfg(feature = "trace_computation")] println!("{}", self);

    while self.running {
      self.step(output, input)?;
    }
    Ok(())
  }

  /**
    Executes the instruction under the cursor and moves the cursor to the next instruction. A
    fault stops the machine; there is no recovery short of running again from the start.
  */
  pub fn step<O, I>(&mut self, output: &mut O, input: &mut I) -> std::result::Result<(), Fault>
    where O: Output, I: Input
  {
    let location = self.cursor.position();
    let opcode =
      self.memory
          .get(location)
          .map(decode_opcode)
          .unwrap_or(0);

    let flow =
      self.execute(output, input)
          .map_err(|error| {
            self.running = false;
            Fault{ opcode, location, error }
          })?;

    match flow {
      Flow::Next => self.cursor.increment(),
      Flow::Skip => {
        self.cursor.increment();
        self.cursor.increment();
      }
      Flow::Jump => {}
      Flow::Halt => self.running = false,
    }

    #[cfg(feature = "trace_computation")] println!("{}", self);

    Ok(())
  }

  fn execute<O, I>(&mut self, output: &mut O, input: &mut I) -> Result<Flow>
    where O: Output, I: Input
  {
    let word = self.memory.get(self.cursor.position())?.clone();
    let operation = Opcode::from_code(decode_opcode(&word))?;

    #[cfg(feature = "trace_computation")] println!("{} {}", self.cursor, operation);

    match operation {

      Opcode::Nop => {}

      Opcode::Store => {
        let address = self.operand_address(&word)?;
        let value = self.data_stack.pop()?;
        self.memory.set(address, value)?;
      }

      Opcode::Add => self.binary_operation(i64::wrapping_add)?,
      Opcode::Sub => self.binary_operation(i64::wrapping_sub)?,
      Opcode::And => self.binary_operation(|b, a| b & a)?,
      Opcode::Or  => self.binary_operation(|b, a| b | a)?,
      Opcode::Xor => self.binary_operation(|b, a| b ^ a)?,

      Opcode::RStore => {
        let value = self.data_stack.pop()?;
        self.return_stack.push(value);
      }

      Opcode::RFetch => {
        let value = self.return_stack.pop()?;
        self.data_stack.push(value);
      }

      Opcode::Fetch => {
        let address = self.operand_address(&word)?;
        let value = self.memory.get(address)?.clone();
        self.data_stack.push(value);
      }

      Opcode::Drop => {
        self.data_stack.pop()?;
      }

      Opcode::Dup => {
        let top = self.data_stack.peek(0)?.clone();
        self.data_stack.push(top);
      }

      Opcode::Over => {
        let second = self.data_stack.peek(1)?.clone();
        self.data_stack.push(second);
      }

      Opcode::Swap => {
        let a = self.data_stack.pop()?;
        let b = self.data_stack.pop()?;
        self.data_stack.push(a);
        self.data_stack.push(b);
      }

      Opcode::If => {
        let target = Address::from_operand(decode_operand(&word)?);
        let condition = self.data_stack.pop()?;
        if condition.is_true() {
          self.cursor.branch(target)?;
          return Ok(Flow::Jump);
        }
      }

      Opcode::Call => {
        let target = Address::from_operand(decode_operand(&word)?);
        self.cursor.branch(target)?;
        return Ok(Flow::Jump);
      }

      Opcode::Exit => return Ok(Flow::Halt),

      Opcode::Lit => {
        let value = self.memory.get(self.cursor.lookahead())?.clone();
        self.data_stack.push(value);
        return Ok(Flow::Skip);
      }

      Opcode::Cout => {
        let value = self.data_stack.pop()?;
        output.emit(&value.to_string());
      }

      Opcode::Cin => {
        let token = input.read_token()?;
        let value =
          match parse_number(&token) {
            Some(number) => Word::Literal(number),
            None         => Word::Text(token)
          };
        self.data_stack.push(value);
      }

      Opcode::StrLit => {
        // A text cell reached by the cursor carries this opcode with no operand.
        if !word.is_text() {
          self.text_at(&word)?;
        }
      }

      Opcode::Sout => {
        let text = self.text_at(&word)?.to_string();
        output.emit(&text);
      }

    }

    Ok(Flow::Next)
  }

  // endregion

}


lazy_static! {
  pub(crate) static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for FVM {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let d_table = FVM::make_stack_table('D', &self.data_stack);
    let r_table = FVM::make_stack_table('R', &self.return_stack);
    let m_table = self.make_memory_table();

    let mut combined_table = table!([m_table, d_table, r_table]);

    combined_table.set_titles(row![ub->"Memory", ub->"Data Stack", ub->"Return Stack"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    let state = match self.running {
      true  => "Running.",
      false => "Halted."
    };

    write!(f, "Cursor: {}\t{}\n{}", self.cursor, state, combined_table)
  }
}
