/*!

  The machine addresses cells, not bytes. A cell is rendered as 32 bits in hex, and an
  instruction cell is decoded bytewise:

    Opcode:    8 bits
    Operand:  16 bits, [Segment:4][Offset:12]
    Reserved:  8 bits

  Only `STORE`, `FETCH`, `IF`, `CALL`, `STRLIT`, and `SOUT` carry an operand. `LIT` is followed in
  memory by the cell it pushes, and a text cell carries the string literal marker opcode `0x14`
  without an operand, so the engine steps over text resident in the code.

  Cells are stored decoded. Rather than packing a program image into raw integers, memory holds
  `Word` values and the 32 bit form exists only as the canonical rendering. This keeps string
  payloads and full width literals in a single cell.

*/

mod assembly;
mod binary;
mod instruction;

pub use assembly::{disassemble, listing, parse_assembly, parse_number};
pub use binary::{
  canonical_hex, decode_opcode, decode_operand, encode, encode_instruction, encode_text
};
pub use instruction::{opcode_of, required_operand_count, Opcode};
