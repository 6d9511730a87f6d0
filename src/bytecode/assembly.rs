/*!
  The human readable textual form of bytecode is called assembly. A program is a whitespace
  separated sequence of mnemonics, each followed by an address literal if the opcode takes an
  operand. `LIT` is followed by the value of its inline cell instead: a decimal or `0x` hex number,
  `TRUE`, `FALSE`, or a quoted string. A quoted string on its own assembles to a text cell.

  Comments are either parenthesised, `( like this )`, possibly spanning lines, or run from a
  backslash to the end of the line.
*/

use nom::{
  branch::alt,
  bytes::complete::{is_not, tag_no_case, take_until},
  character::complete::{char as one_char, hex_digit1, i64 as decimal, multispace1, not_line_ending},
  combinator::{all_consuming, map, map_res, value},
  multi::many0,
  sequence::{delimited, preceded},
  IResult
};
use prettytable::Table;

use super::{Opcode, encode, encode_text};
use crate::address::{parse_address_literal, Address};
use crate::cell::Word;
use crate::error::{Error, Result};
use crate::fvm::TABLE_DISPLAY_FORMAT;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Token<'a> {
  /// A mnemonic, address, or number.
  Bare(&'a str),
  /// The contents of a `"..."` string.
  Quoted(&'a str),
}

#[derive(Copy, Clone, Debug)]
struct Lexeme<'a> {
  token : Token<'a>,
  line  : usize
}

// region Lexing

fn skippable(text: &str) -> IResult<&str, Vec<()>> {
  many0(
    alt((
      value((), multispace1),
      value((), delimited(one_char('('), take_until(")"), one_char(')'))),
      value((), preceded(one_char('\\'), not_line_ending)),
    ))
  )(text)
}

fn token(text: &str) -> IResult<&str, Token<'_>> {
  alt((
    map(delimited(one_char('"'), take_until("\""), one_char('"')), Token::Quoted),
    map(is_not(" \t\r\n"), Token::Bare),
  ))(text)
}

/// 1-based line of the position where `rest` begins within `text`.
fn line_of(text: &str, rest: &str) -> usize {
  let consumed = &text[..text.len() - rest.len()];
  consumed.matches('\n').count() + 1
}

fn lex(text: &str) -> Result<Vec<Lexeme<'_>>> {
  let mut lexemes = vec![];
  let mut rest = text;

  loop {
    // `skippable` cannot fail, as each alternative consumes input or errors.
    rest = match skippable(rest) {
      Ok((rest, _)) => rest,
      Err(_)        => rest
    };
    if rest.is_empty() {
      break;
    }

    let line = line_of(text, rest);
    match token(rest) {
      Ok((remaining, token)) => {
        lexemes.push(Lexeme{ token, line });
        rest = remaining;
      }
      Err(_) => {
        return Err(at_line(line, Error::InvalidOperand("unreadable token".to_string())));
      }
    }
  }

  Ok(lexemes)
}

// endregion

fn at_line(line: usize, error: Error) -> Error {
  Error::Assembly{ line, source: Box::new(error) }
}

fn number(text: &str) -> IResult<&str, i64> {
  all_consuming(
    alt((
      map_res(preceded(tag_no_case("0x"), hex_digit1), |digits| i64::from_str_radix(digits, 16)),
      decimal,
    ))
  )(text)
}

/// Reads a decimal integer, optionally signed, or `0x` prefixed hex.
pub fn parse_number(text: &str) -> Option<i64> {
  number(text).ok().map(|(_, value)| value)
}

/// The cell following a `LIT`.
fn inline_cell(token: Token) -> Result<Word> {
  match token {

    Token::Quoted(text) => Ok(encode_text(text)),

    Token::Bare(text) if text.eq_ignore_ascii_case("TRUE")  => Ok(Word::TRUE),
    Token::Bare(text) if text.eq_ignore_ascii_case("FALSE") => Ok(Word::FALSE),

    Token::Bare(text) => {
      match parse_number(text) {
        Some(value) => Ok(Word::Literal(value)),
        None        => Err(Error::InvalidOperand(format!("`{}` is not a number", text)))
      }
    }

  }
}

fn operand_address(token: Token) -> Result<u16> {
  match token {
    Token::Bare(text)   => parse_address_literal(text)?.to_operand(),
    Token::Quoted(text) => Err(Error::MalformedAddress(format!("\"{}\"", text)))
  }
}

/// Assembles program text into the cells to load, in load order.
pub fn parse_assembly(text: &str) -> Result<Vec<Word>> {
  let mut words = vec![];
  let mut lexemes = lex(text)?.into_iter();

  while let Some(Lexeme{ token, line }) = lexemes.next() {
    let name =
      match token {
        Token::Quoted(text) => {
          words.push(encode_text(text));
          continue;
        }
        Token::Bare(name) if name.starts_with('"') => {
          return Err(at_line(line, Error::InvalidOperand("unterminated string".to_string())));
        }
        Token::Bare(name) => name
      };

    let operation = Opcode::from_mnemonic(name).map_err(|e| at_line(line, e))?;

    let needs_argument = operation == Opcode::Lit || operation.operand_count() == 1;
    let argument =
      match needs_argument {
        true  => {
          match lexemes.next() {
            Some(lexeme) => Some(lexeme),
            None         => {
              return Err(at_line(
                line,
                Error::InvalidOperand(format!("{} is missing its argument", operation))
              ));
            }
          }
        }
        false => None
      };

    match (operation, argument) {

      (Opcode::Lit, Some(argument)) => {
        words.push(encode(Opcode::Lit, None).map_err(|e| at_line(line, e))?);
        words.push(inline_cell(argument.token).map_err(|e| at_line(argument.line, e))?);
      }

      (_, Some(argument)) => {
        let operand = operand_address(argument.token).map_err(|e| at_line(argument.line, e))?;
        words.push(encode(operation, Some(operand)).map_err(|e| at_line(line, e))?);
      }

      (_, None) => {
        words.push(encode(operation, None).map_err(|e| at_line(line, e))?);
      }

    }
  }

  Ok(words)
}

/// Human readable reading of each cell. The cell after a `LIT` is shown as data.
pub fn disassemble(words: &[Word]) -> Vec<String> {
  let mut lines = Vec::with_capacity(words.len());
  let mut after_lit = false;

  for word in words {
    let line =
      match (after_lit, word) {

        (_, Word::Text(text))               => format!("\"{}\"", text),
        (true, _) | (_, Word::Literal(_))   => format!("{}", word),

        (false, Word::Instruction{ opcode, operand }) => {
          match (Opcode::from_code(*opcode), operand) {
            (Ok(operation), Some(operand)) => {
              format!("{} {}", operation, Address::from_operand(*operand))
            }
            (Ok(operation), None)          => format!("{}", operation),
            (Err(_), _)                    => "???".to_string()
          }
        }

      };
    after_lit = !after_lit && matches!(
      word,
      Word::Instruction{ opcode, .. } if *opcode == Opcode::Lit.code()
    );
    lines.push(line);
  }

  lines
}

/// A table of the program as it will be laid out in memory.
pub fn listing(words: &[Word]) -> Table {
  let mut table = Table::new();

  table.set_format(*TABLE_DISPLAY_FORMAT);
  table.set_titles(row![ubr->"Address", ubl->"Cell", ubl->"Assembly"]);

  for (i, (word, text)) in words.iter().zip(disassemble(words)).enumerate() {
    table.add_row(row![r->format!("{}", Address::from_flat(i as u32)), word.canonical_hex(), text]);
  }

  table
}


#[cfg(test)]
mod tests {
  use super::*;

  fn nullary(operation: Opcode) -> Word {
    encode(operation, None).unwrap()
  }

  #[test]
  fn assembles_the_addition_program() {
    let words = parse_assembly("LIT 7 LIT 3 ADD COUT EXIT").unwrap();
    assert_eq!(
      words,
      vec![
        nullary(Opcode::Lit), Word::Literal(7),
        nullary(Opcode::Lit), Word::Literal(3),
        nullary(Opcode::Add), nullary(Opcode::Cout), nullary(Opcode::Exit),
      ]
    );
  }

  #[test]
  fn operands_are_address_literals() {
    let words = parse_assembly("STORE 5\nFETCH 0x1010\n  CALL 3ff").unwrap();
    assert_eq!(
      words,
      vec![
        encode(Opcode::Store, Some(0x0005)).unwrap(),
        encode(Opcode::Fetch, Some(0x1010)).unwrap(),
        encode(Opcode::Call, Some(0x03FF)).unwrap(),
      ]
    );
  }

  #[test]
  fn comments_are_skipped() {
    let text = "( the answer\n  spans lines ) LIT 42 \\ push it\nCOUT ( show ) EXIT";
    let words = parse_assembly(text).unwrap();
    assert_eq!(words.len(), 4);
    assert_eq!(words[1], Word::Literal(42));
  }

  #[test]
  fn literal_forms() {
    let words = parse_assembly("LIT -3 LIT 0x1F LIT true LIT FALSE LIT \"hi there\"").unwrap();
    assert_eq!(words[1], Word::Literal(-3));
    assert_eq!(words[3], Word::Literal(0x1F));
    assert_eq!(words[5], Word::TRUE);
    assert_eq!(words[7], Word::FALSE);
    assert_eq!(words[9], Word::Text("hi there".to_string()));
  }

  #[test]
  fn bare_strings_are_text_cells() {
    let words = parse_assembly("SOUT 2 EXIT \"Hello, world\"").unwrap();
    assert_eq!(words[2], Word::Text("Hello, world".to_string()));
  }

  #[test]
  fn errors_carry_the_line() {
    match parse_assembly("NOP\nFROB") {
      Err(Error::Assembly{ line, source }) => {
        assert_eq!(line, 2);
        assert_eq!(*source, Error::UnknownMnemonic("FROB".to_string()));
      }
      other => panic!("unexpected {:?}", other)
    }

    match parse_assembly("NOP\n\nSTORE\n  XYZ") {
      Err(Error::Assembly{ line, source }) => {
        assert_eq!(line, 4);
        assert_eq!(*source, Error::MalformedAddress("XYZ".to_string()));
      }
      other => panic!("unexpected {:?}", other)
    }
  }

  #[test]
  fn missing_arguments_are_rejected() {
    assert!(matches!(
      parse_assembly("IF"),
      Err(Error::Assembly{ line: 1, .. })
    ));
    assert!(matches!(
      parse_assembly("LIT twelve"),
      Err(Error::Assembly{ line: 1, .. })
    ));
    assert!(matches!(
      parse_assembly("LIT \"open"),
      Err(Error::Assembly{ line: 1, .. })
    ));
  }

  #[test]
  fn disassembly_reads_lit_cells_as_data() {
    let words = parse_assembly("LIT 0x11000000 IF 1004 EXIT").unwrap();
    assert_eq!(
      disassemble(&words),
      vec!["LIT", "285212672", "IF [1:004]", "EXIT"]
    );
  }
}
