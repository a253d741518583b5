use log::warn;

use crate::memory::{Addr, PROGRAM_START};
use crate::Fault;

pub const FLAG_REGISTER: u8 = 0xF;

/// V0 through VF. VF is the flag register: the arithmetic, shift and
/// draw instructions overwrite it with their carry/borrow/collision
/// output, so programs cannot treat it as a free general register.
pub struct Registers {
    v: [u8; 16],
}

impl Registers {
    pub fn new() -> Self {
        Self { v: [0; 16] }
    }

    /// `reg` comes from a 4-bit instruction field and is always in
    /// range.
    pub fn get(&self, reg: u8) -> u8 {
        self.v[reg as usize]
    }

    pub fn set(&mut self, reg: u8, value: u8) {
        self.v[reg as usize] = value;
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.v[FLAG_REGISTER as usize] = flag as u8;
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

/// Address of the next instruction to fetch; starts at the program
/// load offset.
pub struct ProgramCounter(pub Addr);

impl ProgramCounter {
    pub fn new() -> Self {
        Self(PROGRAM_START)
    }

    /// Moves past one 2-byte instruction. Also how the skip
    /// instructions step over their target.
    pub fn advance(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    pub fn jump(&mut self, addr: Addr) {
        self.0 = addr;
    }
}

impl Default for ProgramCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// The 16-bit address register used for indirect memory access.
pub struct IndexRegister(pub Addr);

impl IndexRegister {
    pub fn set(&mut self, addr: Addr) {
        self.0 = addr;
    }

    /// FX1E: the stored value keeps 12 bits, but the overflow flag
    /// comes from the untruncated sum.
    pub fn add(&mut self, offset: u8) -> bool {
        let sum = u32::from(self.0) + u32::from(offset);
        self.0 = (sum & 0xFFF) as Addr;
        sum > 0xFFF
    }
}

pub const STACK_DEPTH: usize = 16;

/// Fixed-depth return address stack. The pointer stays in [0, 16]:
/// pushing a 17th frame is a fault, popping an empty stack is
/// tolerated and yields address 0.
pub struct Stack {
    frames: [Addr; STACK_DEPTH],
    pointer: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            frames: [0; STACK_DEPTH],
            pointer: 0,
        }
    }

    pub fn push(&mut self, addr: Addr) -> Result<(), Fault> {
        if self.pointer >= STACK_DEPTH {
            return Err(Fault::StackOverflow);
        }
        self.frames[self.pointer] = addr;
        self.pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Addr {
        if self.pointer == 0 {
            warn!("return with an empty call stack");
            return 0;
        }
        self.pointer -= 1;
        self.frames[self.pointer]
    }

    pub fn depth(&self) -> usize {
        self.pointer
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
