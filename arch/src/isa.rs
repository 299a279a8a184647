use color_print::cformat;
use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The fixed NDR instruction set. The discriminant is the opcode byte,
/// shared verbatim between the assembler and the emulator.
///
/// Any byte outside the table decodes to NOP, which the machine executes
/// as a two-byte no-op.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u8)]
pub enum Opcode {
    #[default]
    NOP = 0x00,
    STA = 0x10,
    LDA = 0x20,
    ADD = 0x30,
    OR = 0x40,
    AND = 0x50,
    NOT = 0x60,
    JMP = 0x80,
    JN = 0x90,
    JZ = 0xA0,
    HLT = 0xF0,
}

impl Opcode {
    pub fn parse(s: &str) -> Result<Self, String> {
        // Mnemonics are uppercase-only: `lda` is an identifier, not an
        // instruction.
        match s.parse::<Self>() {
            Ok(op) => Ok(op),
            Err(_) => Err(format!("Unknown instruction: {s}")),
        }
    }

    /// Whether the opcode word is followed by an operand word.
    pub fn has_operand(&self) -> bool {
        use Opcode::*;
        match self {
            STA | LDA | ADD | OR | AND | JMP | JN | JZ => true,
            NOP | NOT | HLT => false,
        }
    }

    pub fn cformat(&self) -> String {
        cformat!("<r>{:<3}</>", self)
    }
}
