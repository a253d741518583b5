//! A CHIP-8 virtual machine.
//!
//! The instruction interpreter lives in [`interp`], with the machine
//! state split across [`memory`] and [`registers`] and the decoded
//! instruction set in [`decode`]. [`display`] and [`keypad`] are the
//! two collaborator surfaces: the frontend renders the bitmap and
//! feeds key events, the interpreter only reads the keypad and blits
//! onto the bitmap.

use thiserror::Error;

pub mod decode;
pub mod display;
pub mod interp;
pub mod keypad;
pub mod memory;
pub mod registers;

pub use decode::Opcode;
pub use display::Display;
pub use interp::Interpreter;
pub use keypad::Keypad;

/// Conditions the machine cannot continue from. These are not caught
/// and resumed mid-instruction; the frontend reports them and exits.
#[derive(Debug, Error)]
pub enum Fault {
    /// The program image does not fit between 0x200 and the end of
    /// memory.
    #[error("program of {len} bytes does not fit in memory")]
    ProgramTooLarge { len: usize },

    /// The program counter ran outside the address space, meaning the
    /// program jumped somewhere corrupt.
    #[error("instruction fetch out of memory bounds at {addr:#06x}")]
    FetchOutOfBounds { addr: u16 },

    /// A call instruction found all 16 stack slots in use.
    #[error("call stack overflow")]
    StackOverflow,
}
