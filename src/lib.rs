#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod address;
pub mod bytecode;
pub mod cell;
pub mod cursor;
pub mod error;
pub mod fvm;
pub mod io;
pub mod memory;
pub mod stack;

pub use address::{Address, SEGMENT_SIZE};
pub use cell::Word;
pub use error::{Error, Fault, StackKind};
pub use fvm::{FVM, DEFAULT_SEGMENTS};
