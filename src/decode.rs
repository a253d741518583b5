use crate::memory::Addr;

/// One decoded 16-bit instruction word.
///
/// The top nibble selects the family; families 0x0, 0x8, 0xE and 0xF
/// sub-dispatch on the low nibble or byte, everything else takes its
/// operands straight from the fixed fields. Encodings outside the set
/// decode to [`Opcode::Unknown`] and execute as no-ops, matching the
/// original hardware's tolerance for unused patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump(Addr),
    /// 2NNN
    Call(Addr),
    /// 3XNN
    SkipEqByte(u8, u8),
    /// 4XNN
    SkipNeByte(u8, u8),
    /// 5XY0
    SkipEqReg(u8, u8),
    /// 9XY0
    SkipNeReg(u8, u8),
    /// 6XNN
    SetByte(u8, u8),
    /// 7XNN
    AddByte(u8, u8),
    /// 8XY0
    Copy(u8, u8),
    /// 8XY2
    And(u8, u8),
    /// 8XY3
    Xor(u8, u8),
    /// 8XY4
    Add(u8, u8),
    /// 8XY5
    Sub(u8, u8),
    /// 8XY7
    SubFrom(u8, u8),
    /// 8XY6
    ShiftRight(u8, u8),
    /// 8XYE
    ShiftLeft(u8, u8),
    /// ANNN
    SetIndex(Addr),
    /// BXNN
    JumpOffset(u8, Addr),
    /// CXNN
    Random(u8, u8),
    /// DXYN
    Draw(u8, u8, u8),
    /// EX9E
    SkipKeyPressed(u8),
    /// EXA1
    SkipKeyNotPressed(u8),
    /// FX07
    ReadDelay(u8),
    /// FX0A
    WaitKey(u8),
    /// FX15
    SetDelay(u8),
    /// FX18
    SetSound(u8),
    /// FX1E
    AddIndex(u8),
    /// FX29
    FontGlyph(u8),
    /// FX33
    StoreBcd(u8),
    /// FX55
    StoreRegs(u8),
    /// FX65
    LoadRegs(u8),
    /// Any encoding outside the set above.
    Unknown(u16),
}

impl Opcode {
    pub fn decode(word: u16) -> Self {
        let x = ((word & 0x0F00) >> 8) as u8;
        let y = ((word & 0x00F0) >> 4) as u8;
        let n = (word & 0x000F) as u8;
        let nn = (word & 0x00FF) as u8;
        let nnn = word & 0x0FFF;

        match (word & 0xF000) >> 12 {
            0x0 => match nnn {
                0x0E0 => Self::ClearScreen,
                0x0EE => Self::Return,
                _ => Self::Unknown(word),
            },
            0x1 => Self::Jump(nnn),
            0x2 => Self::Call(nnn),
            0x3 => Self::SkipEqByte(x, nn),
            0x4 => Self::SkipNeByte(x, nn),
            0x5 => Self::SkipEqReg(x, y),
            0x6 => Self::SetByte(x, nn),
            0x7 => Self::AddByte(x, nn),
            0x8 => match n {
                0x0 => Self::Copy(x, y),
                0x2 => Self::And(x, y),
                0x3 => Self::Xor(x, y),
                0x4 => Self::Add(x, y),
                0x5 => Self::Sub(x, y),
                0x6 => Self::ShiftRight(x, y),
                0x7 => Self::SubFrom(x, y),
                0xE => Self::ShiftLeft(x, y),
                _ => Self::Unknown(word),
            },
            0x9 => Self::SkipNeReg(x, y),
            0xA => Self::SetIndex(nnn),
            0xB => Self::JumpOffset(x, nnn),
            0xC => Self::Random(x, nn),
            0xD => Self::Draw(x, y, n),
            0xE => match nn {
                0x9E => Self::SkipKeyPressed(x),
                0xA1 => Self::SkipKeyNotPressed(x),
                _ => Self::Unknown(word),
            },
            _ => match nn {
                0x07 => Self::ReadDelay(x),
                0x0A => Self::WaitKey(x),
                0x15 => Self::SetDelay(x),
                0x18 => Self::SetSound(x),
                0x1E => Self::AddIndex(x),
                0x29 => Self::FontGlyph(x),
                0x33 => Self::StoreBcd(x),
                0x55 => Self::StoreRegs(x),
                0x65 => Self::LoadRegs(x),
                _ => Self::Unknown(word),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_extraction() {
        assert_eq!(Opcode::decode(0x1ABC), Opcode::Jump(0xABC));
        assert_eq!(Opcode::decode(0x6C42), Opcode::SetByte(0xC, 0x42));
        assert_eq!(Opcode::decode(0x8AB4), Opcode::Add(0xA, 0xB));
        assert_eq!(Opcode::decode(0xD12F), Opcode::Draw(1, 2, 0xF));
        assert_eq!(Opcode::decode(0xB234), Opcode::JumpOffset(2, 0x234));
    }

    #[test]
    fn zero_family_dispatches_on_nnn() {
        assert_eq!(Opcode::decode(0x00E0), Opcode::ClearScreen);
        assert_eq!(Opcode::decode(0x00EE), Opcode::Return);
        // 0NNN (machine-code jump) is outside the set
        assert_eq!(Opcode::decode(0x0123), Opcode::Unknown(0x0123));
    }

    #[test]
    fn skip_reg_families_ignore_the_low_nibble() {
        assert_eq!(Opcode::decode(0x5120), Opcode::SkipEqReg(1, 2));
        assert_eq!(Opcode::decode(0x5127), Opcode::SkipEqReg(1, 2));
        assert_eq!(Opcode::decode(0x9340), Opcode::SkipNeReg(3, 4));
        assert_eq!(Opcode::decode(0x934A), Opcode::SkipNeReg(3, 4));
    }

    #[test]
    fn or_encoding_is_not_in_the_set() {
        assert_eq!(Opcode::decode(0x8AB1), Opcode::Unknown(0x8AB1));
    }

    #[test]
    fn unused_sub_encodings_are_unknown() {
        assert_eq!(Opcode::decode(0x8AB9), Opcode::Unknown(0x8AB9));
        assert_eq!(Opcode::decode(0xE1FF), Opcode::Unknown(0xE1FF));
        assert_eq!(Opcode::decode(0xF1FF), Opcode::Unknown(0xF1FF));
    }
}
