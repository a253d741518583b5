use log::warn;

use crate::Fault;

pub type Addr = u16; // in reality u12

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: Addr = 0x200;

/// The hex font, one 5-byte glyph per digit, living at 0x000-0x04F.
/// FX29 points the index register at a glyph as `digit * 5`.
const FONT: [u8; 5 * 16] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// The 4 KiB address space. The font is baked in at construction;
/// programs load at [`PROGRAM_START`]. Nothing stops a misbehaving
/// program from overwriting the font.
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        bytes[..FONT.len()].copy_from_slice(&FONT);
        Self { bytes }
    }

    /// Copies a program image into the load region at 0x200.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Fault> {
        let start = PROGRAM_START as usize;
        if program.len() > MEMORY_SIZE - start {
            return Err(Fault::ProgramTooLarge { len: program.len() });
        }
        self.bytes[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    /// Checked read for addresses computed from the index register.
    /// A miss reads as 0 with a diagnostic.
    pub fn read(&self, addr: Addr) -> u8 {
        match self.bytes.get(addr as usize) {
            Some(&byte) => byte,
            None => {
                warn!("read past end of memory at {addr:#06x}");
                0
            }
        }
    }

    /// Checked write; a miss is dropped with a diagnostic.
    pub fn write(&mut self, addr: Addr, value: u8) {
        match self.bytes.get_mut(addr as usize) {
            Some(byte) => *byte = value,
            None => warn!("write past end of memory at {addr:#06x}"),
        }
    }

    /// Big-endian instruction fetch. Unlike computed accesses, a fetch
    /// outside memory means the program counter has run away and the
    /// machine cannot continue.
    pub fn fetch_word(&self, addr: Addr) -> Result<u16, Fault> {
        let a = addr as usize;
        if a + 1 >= MEMORY_SIZE {
            return Err(Fault::FetchOutOfBounds { addr });
        }
        Ok((u16::from(self.bytes[a]) << 8) | u16::from(self.bytes[a + 1]))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_occupies_low_memory() {
        let m = Memory::new();
        assert_eq!(m.read(0x000), 0xF0); // top row of "0"
        assert_eq!(m.read(0x00A), 0xF0); // top row of "2"
        assert_eq!(m.read(0x04F), 0x80); // bottom row of "F"
        assert_eq!(m.read(0x050), 0x00);
    }

    #[test]
    fn program_loads_at_0x200() {
        let mut m = Memory::new();
        m.load_program(&[0x00, 0xE0, 0x12, 0x00]).unwrap();
        assert_eq!(m.read(0x200), 0x00);
        assert_eq!(m.read(0x201), 0xE0);
        assert_eq!(m.read(0x203), 0x00);
    }

    #[test]
    fn oversized_program_is_rejected() {
        let mut m = Memory::new();
        let exact = vec![0xAA; MEMORY_SIZE - PROGRAM_START as usize];
        m.load_program(&exact).unwrap();
        assert_eq!(m.read(0xFFF), 0xAA);

        let too_big = vec![0xAA; MEMORY_SIZE - PROGRAM_START as usize + 1];
        assert!(matches!(
            m.load_program(&too_big),
            Err(Fault::ProgramTooLarge { .. })
        ));
    }

    #[test]
    fn computed_access_misses_are_tolerated() {
        let mut m = Memory::new();
        assert_eq!(m.read(0x1000), 0);
        m.write(0x1000, 0xFF); // dropped
        assert_eq!(m.read(0xFFF), 0);
    }

    #[test]
    fn fetch_is_big_endian_and_bounded() {
        let mut m = Memory::new();
        m.load_program(&[0xA2, 0x2A]).unwrap();
        assert_eq!(m.fetch_word(0x200).unwrap(), 0xA22A);
        assert!(matches!(
            m.fetch_word(0xFFF),
            Err(Fault::FetchOutOfBounds { addr: 0xFFF })
        ));
    }
}
