use arch::image::{file_offset, FILE_BYTES, HEADER_BYTES};
use arch::isa::Opcode;

/// Last PC at which a full fetch is possible: the operand byte lives at
/// `PC + 2`, so the loop hard-stops here even without a HLT.
pub const PC_LIMIT: usize = FILE_BYTES - 2;

/// Machine state: accumulator, program counter and the serialized image
/// as working memory. The memory is live: STA writes into the same
/// buffer instructions are fetched from.
pub struct Machine {
    mem: [u8; FILE_BYTES],
    ac: u8,
    pc: usize,
    halted: bool,
}

/// Pre-execution snapshot of one step, for the trace line.
pub struct Trace {
    pub ac: u8,
    pub pc: usize,
    pub zero: bool,
    pub neg: bool,
    pub op: Opcode,
    pub operand: u8,
}

impl Machine {
    /// Load a serialized image. Short files are zero-extended; there is
    /// no validation — a malformed image runs with garbage results.
    pub fn new(bytes: &[u8]) -> Self {
        let mut mem = [0u8; FILE_BYTES];
        let n = bytes.len().min(FILE_BYTES);
        mem[..n].copy_from_slice(&bytes[..n]);
        Machine {
            mem,
            ac: 0,
            pc: HEADER_BYTES,
            halted: false,
        }
    }

    pub fn ac(&self) -> u8 {
        self.ac
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn mem(&self) -> &[u8] {
        &self.mem
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Flags are pure functions of the current accumulator, recomputed
    /// every step, never stored.
    pub fn flag_zero(&self) -> bool {
        self.ac == 0
    }

    pub fn flag_neg(&self) -> bool {
        self.ac & 0x80 != 0
    }

    fn operand(&self) -> u8 {
        self.mem[self.pc + 2]
    }

    /// Operand word address mapped to its byte offset past the header.
    fn target(&self) -> usize {
        file_offset(self.operand())
    }

    /// One fetch-decode-execute step. Returns `None` once the machine is
    /// terminal: a HLT fetch or the PC reaching the address bound.
    pub fn step(&mut self) -> Option<Trace> {
        if self.halted || self.pc >= PC_LIMIT {
            self.halted = true;
            return None;
        }

        let op = Opcode::from(self.mem[self.pc]);
        if op == Opcode::HLT {
            self.halted = true;
            return None;
        }

        let trace = Trace {
            ac: self.ac,
            pc: self.pc,
            zero: self.flag_zero(),
            neg: self.flag_neg(),
            op,
            operand: self.operand(),
        };

        match op {
            Opcode::STA => {
                self.mem[self.target()] = self.ac;
                self.pc += 4;
            }
            Opcode::LDA => {
                self.ac = self.mem[self.target()];
                self.pc += 4;
            }
            // The accumulator wraps at 8 bits, so flags always see the
            // masked value: 0x80 + 0x80 sets the zero flag.
            Opcode::ADD => {
                self.ac = self.ac.wrapping_add(self.mem[self.target()]);
                self.pc += 4;
            }
            Opcode::OR => {
                self.ac |= self.mem[self.target()];
                self.pc += 4;
            }
            Opcode::AND => {
                self.ac &= self.mem[self.target()];
                self.pc += 4;
            }
            Opcode::NOT => {
                self.ac = !self.ac;
                self.pc += 2;
            }
            Opcode::JMP => {
                self.pc = self.target();
            }
            Opcode::JN => {
                if self.flag_neg() {
                    self.pc = self.target();
                } else {
                    self.pc += 4;
                }
            }
            Opcode::JZ => {
                if self.flag_zero() {
                    self.pc = self.target();
                } else {
                    self.pc += 4;
                }
            }
            // Unknown bytes decode to NOP and skip one word.
            Opcode::NOP => {
                self.pc += 2;
            }
            Opcode::HLT => unreachable!(),
        }

        Some(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndrasm::{assemble, tokenize};

    fn boot(src: &str) -> Machine {
        let image = assemble(&tokenize(src)).unwrap();
        Machine::new(&image.serialize())
    }

    fn run(machine: &mut Machine) -> u64 {
        let mut steps = 0;
        while machine.step().is_some() {
            steps += 1;
        }
        steps
    }

    #[test]
    fn test_load_and_halt() {
        let mut m = boot(".CODE\nORG 00\nLDA X\nHLT\n.DATA\nORG 10\nX DB 05\n");
        run(&mut m);
        assert_eq!(m.ac(), 0x05);
        assert!(m.is_halted());
    }

    #[test]
    fn test_store_round_trip() {
        // LDA X / STA Y / HLT: the byte at Y's address equals X's value.
        let src = "\
.CODE
ORG 00
LDA X
STA Y
HLT
.DATA
ORG 20
X DB 2A
Y DB 00
";
        let mut m = boot(src);
        run(&mut m);
        assert_eq!(m.mem()[file_offset(0x21)], 0x2A);
    }

    #[test]
    fn test_jz_taken_when_zero() {
        // T is a bare label bound at code word 8 (the HLT), so JZ lands
        // on it. AC is 0: the branch is taken and Y keeps its value.
        let src = "\
.CODE
ORG 00
LDA Z
JZ T
LDA X
STA Y
HLT
.DATA
ORG 08
T
ORG 20
Z DB 00
X DB 01
Y DB 77
";
        let mut m = boot(src);
        run(&mut m);
        assert_eq!(m.mem()[file_offset(0x22)], 0x77);
    }

    #[test]
    fn test_jz_falls_through_when_nonzero() {
        let src = "\
.CODE
ORG 00
LDA X
JZ T
STA Y
HLT
.DATA
ORG 06
T
ORG 20
X DB 01
Y DB 00
";
        let mut m = boot(src);
        run(&mut m);
        // Fall through at PC+4, then STA executes.
        assert_eq!(m.mem()[file_offset(0x21)], 0x01);
    }

    #[test]
    fn test_hlt_first_halts_immediately() {
        let mut m = boot(".CODE\nORG 00\nHLT\n");
        let steps = run(&mut m);
        assert_eq!(steps, 0);
        assert_eq!(m.ac(), 0);
        assert_eq!(m.pc(), HEADER_BYTES);
    }

    #[test]
    fn test_add_wraps_and_sets_zero_flag() {
        let src = "\
.CODE
ORG 00
LDA X
ADD X
JZ T
STA Y
HLT
.DATA
ORG 08
T
ORG 20
X DB 80
Y DB 55
";
        let mut m = boot(src);
        run(&mut m);
        // 0x80 + 0x80 wraps to 0x00: JZ taken, Y untouched.
        assert_eq!(m.ac(), 0x00);
        assert_eq!(m.mem()[file_offset(0x21)], 0x55);
    }

    #[test]
    fn test_not_sets_negative_flag() {
        let src = "\
.CODE
ORG 00
NOT
JN T
STA Y
HLT
.DATA
ORG 05
T
ORG 20
Y DB 11
";
        let mut m = boot(src);
        run(&mut m);
        // NOT of 0 is 0xFF: negative, branch taken.
        assert_eq!(m.ac(), 0xFF);
        assert_eq!(m.mem()[file_offset(0x20)], 0x11);
    }

    #[test]
    fn test_jmp_is_unconditional() {
        let src = "\
.CODE
ORG 00
JMP T
LDA X
HLT
.DATA
ORG 04
T
ORG 20
X DB 09
";
        let mut m = boot(src);
        run(&mut m);
        assert_eq!(m.ac(), 0x00);
    }

    #[test]
    fn test_missing_hlt_stops_at_address_bound() {
        // An all-zero image is a NOP sled: the PC walks word by word
        // from the header to the bound and stops.
        let mut m = Machine::new(&[]);
        let steps = run(&mut m);
        assert_eq!(steps as usize, (PC_LIMIT - HEADER_BYTES) / 2);
        assert!(m.is_halted());
    }

    #[test]
    fn test_short_file_zero_extended() {
        let mut m = Machine::new(&[0x03, 0x4E, 0x44, 0x52, 0xF0]);
        assert_eq!(run(&mut m), 0);
    }

    #[test]
    fn test_unknown_opcode_is_noop() {
        let mut bytes = [0u8; FILE_BYTES];
        bytes[4] = 0x77; // not in the table
        bytes[6] = 0xF0; // HLT
        let mut m = Machine::new(&bytes);
        let steps = run(&mut m);
        assert_eq!(steps, 1);
        assert_eq!(m.pc(), 6);
    }
}
