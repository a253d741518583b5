use log::trace;
use rand::Rng;

use crate::decode::Opcode;
use crate::display::Display;
use crate::keypad::Keypad;
use crate::memory::{Addr, Memory};
use crate::registers::{IndexRegister, ProgramCounter, Registers, Stack};
use crate::Fault;

/// The fetch/decode/execute engine plus the machine state it drives.
///
/// The frontend paces three independent cadences against it: [`cycle`]
/// at CPU speed, [`tick_timers`] at 60 Hz, and key polling feeding
/// [`resume_with_key`] while the machine waits on FX0A.
///
/// [`cycle`]: Interpreter::cycle
/// [`tick_timers`]: Interpreter::tick_timers
/// [`resume_with_key`]: Interpreter::resume_with_key
pub struct Interpreter {
    pub mem: Memory,
    pub regs: Registers,
    pc: ProgramCounter,
    index: IndexRegister,
    stack: Stack,
    delay_timer: u8,
    sound_timer: u8,
    paused: bool,
    paused_register: u8,
    chip48: bool,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_quirks(false)
    }

    /// `chip48` selects the CHIP-48 semantics for the three ambiguous
    /// families: the shifts (copy Vy first), BXNN (offset by Vx) and
    /// FX55/FX65 (leave the index register alone).
    pub fn with_quirks(chip48: bool) -> Self {
        Self {
            mem: Memory::new(),
            regs: Registers::new(),
            pc: ProgramCounter::new(),
            index: IndexRegister(0),
            stack: Stack::new(),
            delay_timer: 0,
            sound_timer: 0,
            paused: false,
            paused_register: 0,
            chip48,
        }
    }

    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Fault> {
        self.mem.load_program(program)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Completes a pending FX0A: the pressed key lands in the register
    /// the instruction named and execution continues after it. Does
    /// nothing unless the machine is actually waiting.
    pub fn resume_with_key(&mut self, key: u8) {
        if !self.paused {
            return;
        }
        self.regs.set(self.paused_register, key);
        self.paused = false;
    }

    /// Decrements both timers toward zero, never wrapping. Driven at
    /// 60 Hz by the frontend; frozen while the machine waits on a key.
    pub fn tick_timers(&mut self) {
        if self.paused {
            return;
        }
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn pc(&self) -> Addr {
        self.pc.0
    }

    pub fn index(&self) -> Addr {
        self.index.0
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    /// One fetch/decode/execute pass with the configured quirk flag;
    /// a no-op while waiting on a key.
    pub fn cycle(&mut self, display: &mut Display, keypad: &Keypad) -> Result<(), Fault> {
        if self.paused {
            return Ok(());
        }
        let word = self.mem.fetch_word(self.pc.0)?;
        self.pc.advance();
        self.exec(Opcode::decode(word), display, keypad, self.chip48)
    }

    /// Executes one already-decoded instruction with an explicit quirk
    /// flag. [`Interpreter::cycle`] funnels through here.
    pub fn exec(
        &mut self,
        op: Opcode,
        display: &mut Display,
        keypad: &Keypad,
        chip48: bool,
    ) -> Result<(), Fault> {
        match op {
            Opcode::ClearScreen => display.clear(),
            Opcode::Return => {
                let addr = self.stack.pop();
                self.pc.jump(addr);
            }
            Opcode::Jump(nnn) => self.pc.jump(nnn),
            Opcode::Call(nnn) => {
                self.stack.push(self.pc.0)?;
                self.pc.jump(nnn);
            }
            Opcode::SkipEqByte(x, nn) => {
                if self.regs.get(x) == nn {
                    self.pc.advance();
                }
            }
            Opcode::SkipNeByte(x, nn) => {
                if self.regs.get(x) != nn {
                    self.pc.advance();
                }
            }
            Opcode::SkipEqReg(x, y) => {
                if self.regs.get(x) == self.regs.get(y) {
                    self.pc.advance();
                }
            }
            Opcode::SkipNeReg(x, y) => {
                if self.regs.get(x) != self.regs.get(y) {
                    self.pc.advance();
                }
            }
            Opcode::SetByte(x, nn) => self.regs.set(x, nn),
            // wraps without touching the flag register
            Opcode::AddByte(x, nn) => self.regs.set(x, self.regs.get(x).wrapping_add(nn)),
            Opcode::Copy(x, y) => self.regs.set(x, self.regs.get(y)),
            Opcode::And(x, y) => self.regs.set(x, self.regs.get(x) & self.regs.get(y)),
            Opcode::Xor(x, y) => self.regs.set(x, self.regs.get(x) ^ self.regs.get(y)),
            Opcode::Add(x, y) => {
                let (sum, carry) = self.regs.get(x).overflowing_add(self.regs.get(y));
                self.regs.set(x, sum);
                self.regs.set_flag(carry);
            }
            Opcode::Sub(x, y) => {
                // borrow flag from the pre-subtraction values
                self.regs.set_flag(self.regs.get(x) > self.regs.get(y));
                let result = self.regs.get(x).wrapping_sub(self.regs.get(y));
                self.regs.set(x, result);
            }
            Opcode::SubFrom(x, y) => {
                // same comparison as Sub even though the operands swap
                self.regs.set_flag(self.regs.get(x) > self.regs.get(y));
                let result = self.regs.get(y).wrapping_sub(self.regs.get(x));
                self.regs.set(x, result);
            }
            Opcode::ShiftRight(x, y) => {
                if chip48 {
                    self.regs.set(x, self.regs.get(y));
                }
                self.regs.set_flag(self.regs.get(x) & 0x01 != 0);
                self.regs.set(x, self.regs.get(x) >> 1);
            }
            Opcode::ShiftLeft(x, y) => {
                if chip48 {
                    self.regs.set(x, self.regs.get(y));
                }
                self.regs.set_flag(self.regs.get(x) & 0x80 != 0);
                self.regs.set(x, self.regs.get(x) << 1);
            }
            Opcode::SetIndex(nnn) => self.index.set(nnn),
            Opcode::JumpOffset(x, nnn) => {
                let offset = if chip48 {
                    self.regs.get(x)
                } else {
                    self.regs.get(0)
                };
                self.pc.jump(nnn + Addr::from(offset));
            }
            Opcode::Random(x, nn) => {
                let byte: u8 = rand::thread_rng().gen();
                self.regs.set(x, byte & nn);
            }
            Opcode::Draw(x, y, n) => {
                let mut rows = Vec::with_capacity(n as usize);
                for offset in 0..Addr::from(n) {
                    rows.push(self.mem.read(self.index.0.wrapping_add(offset)));
                }
                let collision = display.draw_sprite(self.regs.get(x), self.regs.get(y), &rows);
                self.regs.set_flag(collision);
            }
            Opcode::SkipKeyPressed(x) => {
                if keypad.is_pressed(self.regs.get(x)) {
                    self.pc.advance();
                }
            }
            Opcode::SkipKeyNotPressed(x) => {
                if !keypad.is_pressed(self.regs.get(x)) {
                    self.pc.advance();
                }
            }
            Opcode::ReadDelay(x) => self.regs.set(x, self.delay_timer),
            Opcode::WaitKey(x) => {
                self.paused = true;
                self.paused_register = x;
            }
            Opcode::SetDelay(x) => self.delay_timer = self.regs.get(x),
            Opcode::SetSound(x) => self.sound_timer = self.regs.get(x),
            Opcode::AddIndex(x) => {
                let overflow = self.index.add(self.regs.get(x));
                self.regs.set_flag(overflow);
            }
            Opcode::FontGlyph(x) => self.index.set(Addr::from(self.regs.get(x)) * 5),
            Opcode::StoreBcd(x) => {
                let value = self.regs.get(x);
                self.mem.write(self.index.0, value / 100);
                self.mem.write(self.index.0.wrapping_add(1), (value % 100) / 10);
                self.mem.write(self.index.0.wrapping_add(2), value % 10);
            }
            Opcode::StoreRegs(x) => {
                for reg in 0..=x {
                    self.mem
                        .write(self.index.0.wrapping_add(Addr::from(reg)), self.regs.get(reg));
                }
                if !chip48 {
                    self.index.0 = self.index.0.wrapping_add(Addr::from(x) + 1);
                }
            }
            Opcode::LoadRegs(x) => {
                for reg in 0..=x {
                    self.regs
                        .set(reg, self.mem.read(self.index.0.wrapping_add(Addr::from(reg))));
                }
                if !chip48 {
                    self.index.0 = self.index.0.wrapping_add(Addr::from(x) + 1);
                }
            }
            Opcode::Unknown(word) => trace!("ignoring unrecognized opcode {word:#06x}"),
        }
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
