//! # instruction
//!
//! decoding happens in two steps: slice the raw word into its nibble fields
//! (`Opcode`), then pick the single `Instruction` variant those fields mean.
//! the executor matches on `Instruction`, so a missing case is a compile error
//! rather than a silent fall-through.
use crate::error::Fault;

/// operand fields of a raw 16-bit opcode
///
/// ```text
///   15..12  11..8  7..4  3..0
///   class   x      y     n
///                  |-- nn --|
///           |----- nnn -----|
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub raw: u16,
    pub class: u8,
    pub x: u8,
    pub y: u8,
    pub n: u8,
    pub nn: u8,
    pub nnn: u16,
}

impl Opcode {
    pub fn new(raw: u16) -> Self {
        Opcode {
            raw,
            class: (raw >> 12) as u8,
            x: ((raw >> 8) & 0x0f) as u8,
            y: ((raw >> 4) & 0x0f) as u8,
            n: (raw & 0x000f) as u8,
            nn: (raw & 0x00ff) as u8,
            nnn: raw & 0x0fff,
        }
    }
}

/// register index, always 0..=15
pub type Reg = usize;

/// one variant per CHIP-8 instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearDisplay,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipEqImm(Reg, u8),
    /// 4XNN
    SkipNeImm(Reg, u8),
    /// 5XY0
    SkipEqReg(Reg, Reg),
    /// 6XNN
    LoadImm(Reg, u8),
    /// 7XNN
    AddImm(Reg, u8),
    /// 8XY0
    Move(Reg, Reg),
    /// 8XY1
    Or(Reg, Reg),
    /// 8XY2
    And(Reg, Reg),
    /// 8XY3
    Xor(Reg, Reg),
    /// 8XY4
    AddCarry(Reg, Reg),
    /// 8XY5
    Sub(Reg, Reg),
    /// 8XY6
    ShiftRight(Reg),
    /// 8XY7
    SubN(Reg, Reg),
    /// 8XYE
    ShiftLeft(Reg),
    /// 9XY0
    SkipNeReg(Reg, Reg),
    /// ANNN
    SetIndex(u16),
    /// BNNN
    JumpV0(u16),
    /// CXNN
    Random(Reg, u8),
    /// DXYN
    Draw(Reg, Reg, u8),
    /// EX9E
    SkipKeyPressed(Reg),
    /// EXA1
    SkipKeyNotPressed(Reg),
    /// FX07
    LoadDelay(Reg),
    /// FX0A
    WaitKey(Reg),
    /// FX15
    SetDelay(Reg),
    /// FX18
    SetSound(Reg),
    /// FX1E
    AddIndex(Reg),
    /// FX29
    FontAddr(Reg),
    /// FX33
    StoreBcd(Reg),
    /// FX55
    StoreRegs(Reg),
    /// FX65
    LoadRegs(Reg),
}

impl Instruction {
    pub fn decode(raw: u16) -> Result<Instruction, Fault> {
        use Instruction::*;
        let op = Opcode::new(raw);
        let (x, y) = (op.x as Reg, op.y as Reg);
        let instr = match op.class {
            0x0 => match op.nnn {
                0x0e0 => ClearDisplay,
                0x0ee => Return,
                // 0NNN machine code routines aren't supported
                _ => return Err(Fault::UnknownOpcode(raw)),
            },
            0x1 => Jump(op.nnn),
            0x2 => Call(op.nnn),
            0x3 => SkipEqImm(x, op.nn),
            0x4 => SkipNeImm(x, op.nn),
            0x5 if op.n == 0 => SkipEqReg(x, y),
            0x6 => LoadImm(x, op.nn),
            0x7 => AddImm(x, op.nn),
            0x8 => match op.n {
                0x0 => Move(x, y),
                0x1 => Or(x, y),
                0x2 => And(x, y),
                0x3 => Xor(x, y),
                0x4 => AddCarry(x, y),
                0x5 => Sub(x, y),
                0x6 => ShiftRight(x),
                0x7 => SubN(x, y),
                0xe => ShiftLeft(x),
                _ => return Err(Fault::UnknownOpcode(raw)),
            },
            0x9 if op.n == 0 => SkipNeReg(x, y),
            0xa => SetIndex(op.nnn),
            0xb => JumpV0(op.nnn),
            0xc => Random(x, op.nn),
            0xd => Draw(x, y, op.n),
            0xe => match op.nn {
                0x9e => SkipKeyPressed(x),
                0xa1 => SkipKeyNotPressed(x),
                _ => return Err(Fault::UnknownOpcode(raw)),
            },
            0xf => match op.nn {
                0x07 => LoadDelay(x),
                0x0a => WaitKey(x),
                0x15 => SetDelay(x),
                0x18 => SetSound(x),
                0x1e => AddIndex(x),
                0x29 => FontAddr(x),
                0x33 => StoreBcd(x),
                0x55 => StoreRegs(x),
                0x65 => LoadRegs(x),
                _ => return Err(Fault::UnknownOpcode(raw)),
            },
            _ => return Err(Fault::UnknownOpcode(raw)),
        };
        Ok(instr)
    }
}
