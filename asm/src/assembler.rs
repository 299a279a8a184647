use arch::image::MemImage;
use arch::isa::Opcode;
use color_print::cprintln;
use strum::EnumString;

use crate::error::Error;
use crate::label::Labels;
use crate::lexer::{Directive, Token, TokenKind};

/// Active section. Tokens under an unrecognized marker (`.FOO`) are
/// ignored by both passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
enum Section {
    Code,
    Data,
    #[strum(disabled)]
    Other,
}

impl Section {
    fn parse(s: &str) -> Self {
        s.parse().unwrap_or(Section::Other)
    }
}

/// Two-pass assembler over a borrowed token stream.
///
/// Pass 1 binds `DATA` labels to word addresses and fixes the entry PC.
/// Pass 2 replays the stream with its own cursor and writes opcode,
/// operand and data bytes into the memory image, resolving label
/// references through the table from pass 1. Forward references from
/// `CODE` into `DATA` resolve because binding is complete before any
/// byte is written.
pub struct Assembler<'t> {
    tokens: &'t [Token],
    labels: Labels,
    start_pc: u8,
}

impl<'t> Assembler<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Assembler {
            tokens,
            labels: Labels::new(),
            start_pc: 0,
        }
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn start_pc(&self) -> u8 {
        self.start_pc
    }

    /// Pass 1: track the PC through both sections and record every label
    /// address. Fails on a directive missing its numeric operand.
    pub fn first_pass(&mut self) -> Result<(), Error> {
        let mut pc: u8 = 0;
        let mut section = Section::Code;
        let mut entry_fixed = false;

        let mut iter = self.tokens.iter();
        while let Some(token) = iter.next() {
            if token.kind == TokenKind::Section {
                section = Section::parse(&token.text);
                continue;
            }
            match section {
                Section::Code => match token.kind {
                    // Addressing-equivalent placeholders: each occupies
                    // one word, whatever pass 2 ends up writing there.
                    TokenKind::Instruction | TokenKind::Number | TokenKind::Variable => {
                        pc = pc.wrapping_add(1);
                    }
                    TokenKind::Directive => {
                        if directive(token) == Some(Directive::ORG) {
                            pc = expect_number(&mut iter, "ORG")?;
                            if !entry_fixed {
                                self.start_pc = pc;
                                entry_fixed = true;
                            }
                        }
                    }
                    _ => {}
                },
                Section::Data => match token.kind {
                    TokenKind::Variable => {
                        // Binding does not advance the PC.
                        if let Some(prev) = self.labels.insert(&token.text, pc) {
                            cprintln!(
                                "<yellow,bold>warn</>: re-defined label `{}` (was {:02X}, now {:02X})",
                                token.text,
                                prev,
                                pc
                            );
                        }
                    }
                    TokenKind::Directive => match directive(token) {
                        Some(Directive::ORG) => pc = expect_number(&mut iter, "ORG")?,
                        Some(Directive::DB) => {
                            // Operand must be present; its value is only
                            // validated in pass 2.
                            next_token(&mut iter).ok_or(Error::MissingOperand("DB"))?;
                            pc = pc.wrapping_add(1);
                        }
                        _ => {}
                    },
                    _ => {}
                },
                Section::Other => {}
            }
        }
        Ok(())
    }

    /// Pass 2: emit the 512-byte memory image. Fails on unknown
    /// instructions, undefined labels and unparsable operands; the image
    /// is not exposed to the caller on failure.
    pub fn second_pass(&self) -> Result<MemImage, Error> {
        let mut mem = MemImage::new();
        // The word cursor wraps modulo 256, so code running past word
        // 0xFF overwrites from word 0 instead of overflowing the image.
        let mut pc_code = self.start_pc;
        let mut section = Section::Code;
        let mut current_var: Option<&str> = None;

        let mut iter = self.tokens.iter();
        while let Some(token) = iter.next() {
            if token.kind == TokenKind::Section {
                section = Section::parse(&token.text);
                continue;
            }
            match section {
                Section::Code => match token.kind {
                    TokenKind::Instruction => {
                        let op = Opcode::parse(&token.text)
                            .map_err(|_| Error::UnknownInstruction(token.text.clone()))?;
                        mem.set_word(pc_code, op.into());
                        pc_code = pc_code.wrapping_add(1);
                    }
                    TokenKind::Number => {
                        mem.set_word(pc_code, parse_byte(&token.text)?);
                        pc_code = pc_code.wrapping_add(1);
                    }
                    TokenKind::Variable => {
                        let addr = self
                            .labels
                            .get(&token.text)
                            .ok_or_else(|| Error::UndefinedLabel(token.text.clone()))?;
                        mem.set_word(pc_code, addr);
                        pc_code = pc_code.wrapping_add(1);
                    }
                    TokenKind::Directive => {
                        if directive(token) == Some(Directive::ORG) {
                            pc_code = expect_number(&mut iter, "ORG")?;
                        }
                    }
                    _ => {}
                },
                Section::Data => match token.kind {
                    TokenKind::Variable => current_var = Some(&token.text),
                    TokenKind::Directive => match directive(token) {
                        Some(Directive::DB) => {
                            let value = expect_number(&mut iter, "DB")?;
                            let name = current_var.ok_or(Error::NoVariable)?;
                            let addr = self
                                .labels
                                .get(name)
                                .ok_or_else(|| Error::UndefinedLabel(name.to_string()))?;
                            mem.set_word(addr, value);
                        }
                        Some(Directive::ORG) => {
                            // Validated for well-formedness, no emission
                            // effect in DATA.
                            expect_number(&mut iter, "ORG")?;
                        }
                        _ => {}
                    },
                    _ => {}
                },
                Section::Other => {}
            }
        }
        Ok(mem)
    }
}

/// Run both passes over a token stream.
pub fn assemble(tokens: &[Token]) -> Result<MemImage, Error> {
    let mut asm = Assembler::new(tokens);
    asm.first_pass()?;
    asm.second_pass()
}

fn directive(token: &Token) -> Option<Directive> {
    token.text.parse().ok()
}

fn parse_byte(s: &str) -> Result<u8, Error> {
    u8::from_str_radix(s, 16).map_err(|_| Error::InvalidNumber(s.to_string()))
}

fn next_token<'t>(iter: &mut std::slice::Iter<'t, Token>) -> Option<&'t Token> {
    iter.next().filter(|t| t.kind != TokenKind::Eof)
}

fn expect_number(iter: &mut std::slice::Iter<'_, Token>, after: &'static str) -> Result<u8, Error> {
    let token = next_token(iter).ok_or(Error::MissingOperand(after))?;
    parse_byte(&token.text)
}
