use std::fmt;

use crate::opcode::Opcode;

/// A decoded instruction word.
///
/// Register operands are indices into V0..VF.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 0nnn; machine code routines are ignored
    Sys(u16),
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1nnn
    Jp(u16),
    /// 2nnn
    Call(u16),
    /// 3xnn
    SeByte(usize, u8),
    /// 4xnn
    SneByte(usize, u8),
    /// 5xy0
    SeReg(usize, usize),
    /// 6xnn
    LdByte(usize, u8),
    /// 7xnn
    AddByte(usize, u8),
    /// 8xy0
    LdReg(usize, usize),
    /// 8xy1
    Or(usize, usize),
    /// 8xy2
    And(usize, usize),
    /// 8xy3
    Xor(usize, usize),
    /// 8xy4
    AddReg(usize, usize),
    /// 8xy5
    Sub(usize, usize),
    /// 8xy6
    Shr(usize, usize),
    /// 8xy7
    Subn(usize, usize),
    /// 8xyE
    Shl(usize, usize),
    /// 9xy0
    SneReg(usize, usize),
    /// Annn
    LdI(u16),
    /// Bnnn
    JpV0(u16),
    /// Cxnn
    Rnd(usize, u8),
    /// Dxyn
    Drw(usize, usize, u8),
    /// Ex9E
    Skp(usize),
    /// ExA1
    Sknp(usize),
    /// Fx07
    LdFromDelay(usize),
    /// Fx0A
    LdKey(usize),
    /// Fx15
    LdDelay(usize),
    /// Fx18
    LdSound(usize),
    /// Fx1E
    AddI(usize),
    /// Fx29
    LdFont(usize),
    /// Fx33
    Bcd(usize),
    /// Fx55
    Store(usize),
    /// Fx65
    Load(usize),
    /// Anything else; executes as a no-op
    Unknown(u16),
}

impl Instruction {
    /// Selects the Instruction for a given Opcode.
    pub fn decode(word: u16) -> Self {
        use Instruction::*;

        let (x, y) = (word.x(), word.y());
        match word.nibbles() {
            (0x0, ..) if word.nn() == 0xE0 => Cls,
            (0x0, ..) if word.nn() == 0xEE => Ret,
            (0x0, ..) => Sys(word.nnn()),
            (0x1, ..) => Jp(word.nnn()),
            (0x2, ..) => Call(word.nnn()),
            (0x3, ..) => SeByte(x, word.nn()),
            (0x4, ..) => SneByte(x, word.nn()),
            (0x5, .., 0x0) => SeReg(x, y),
            (0x6, ..) => LdByte(x, word.nn()),
            (0x7, ..) => AddByte(x, word.nn()),
            (0x8, .., 0x0) => LdReg(x, y),
            (0x8, .., 0x1) => Or(x, y),
            (0x8, .., 0x2) => And(x, y),
            (0x8, .., 0x3) => Xor(x, y),
            (0x8, .., 0x4) => AddReg(x, y),
            (0x8, .., 0x5) => Sub(x, y),
            (0x8, .., 0x6) => Shr(x, y),
            (0x8, .., 0x7) => Subn(x, y),
            (0x8, .., 0xE) => Shl(x, y),
            (0x9, .., 0x0) => SneReg(x, y),
            (0xA, ..) => LdI(word.nnn()),
            (0xB, ..) => JpV0(word.nnn()),
            (0xC, ..) => Rnd(x, word.nn()),
            (0xD, ..) => Drw(x, y, word.n()),
            (0xE, _, 0x9, 0xE) => Skp(x),
            (0xE, _, 0xA, 0x1) => Sknp(x),
            (0xF, _, 0x0, 0x7) => LdFromDelay(x),
            (0xF, _, 0x0, 0xA) => LdKey(x),
            (0xF, _, 0x1, 0x5) => LdDelay(x),
            (0xF, _, 0x1, 0x8) => LdSound(x),
            (0xF, _, 0x1, 0xE) => AddI(x),
            (0xF, _, 0x2, 0x9) => LdFont(x),
            (0xF, _, 0x3, 0x3) => Bcd(x),
            (0xF, _, 0x5, 0x5) => Store(x),
            (0xF, _, 0x6, 0x5) => Load(x),
            _ => Unknown(word),
        }
    }
}

/// Assembly mnemonics
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Sys(addr) => write!(f, "SYS {:#05X}", addr),
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jp(addr) => write!(f, "JP {:#05X}", addr),
            Call(addr) => write!(f, "CALL {:#05X}", addr),
            SeByte(x, nn) => write!(f, "SE V{:X}, {:#04X}", x, nn),
            SneByte(x, nn) => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            SeReg(x, y) => write!(f, "SE V{:X}, V{:X}", x, y),
            LdByte(x, nn) => write!(f, "LD V{:X}, {:#04X}", x, nn),
            AddByte(x, nn) => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            LdReg(x, y) => write!(f, "LD V{:X}, V{:X}", x, y),
            Or(x, y) => write!(f, "OR V{:X}, V{:X}", x, y),
            And(x, y) => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor(x, y) => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg(x, y) => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub(x, y) => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr(x, y) => write!(f, "SHR V{:X}, V{:X}", x, y),
            Subn(x, y) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl(x, y) => write!(f, "SHL V{:X}, V{:X}", x, y),
            SneReg(x, y) => write!(f, "SNE V{:X}, V{:X}", x, y),
            LdI(addr) => write!(f, "LD I, {:#05X}", addr),
            JpV0(addr) => write!(f, "JP V0, {:#05X}", addr),
            Rnd(x, nn) => write!(f, "RND V{:X}, {:#04X}", x, nn),
            Drw(x, y, n) => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Skp(x) => write!(f, "SKP V{:X}", x),
            Sknp(x) => write!(f, "SKNP V{:X}", x),
            LdFromDelay(x) => write!(f, "LD V{:X}, DT", x),
            LdKey(x) => write!(f, "LD V{:X}, K", x),
            LdDelay(x) => write!(f, "LD DT, V{:X}", x),
            LdSound(x) => write!(f, "LD ST, V{:X}", x),
            AddI(x) => write!(f, "ADD I, V{:X}", x),
            LdFont(x) => write!(f, "LD F, V{:X}", x),
            Bcd(x) => write!(f, "LD B, V{:X}", x),
            Store(x) => write!(f, "LD [I], V{:X}", x),
            Load(x) => write!(f, "LD V{:X}, [I]", x),
            Unknown(word) => write!(f, "DW {:#06X}", word),
        }
    }
}

/// One disassembled word
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub address: u16,
    pub word: u16,
    pub instruction: Instruction,
}

impl Row {
    fn format(&self, is_pc: bool) -> String {
        format!(
            "{}{:#06X}   {:04X}    {}",
            if is_pc { ">" } else { " " },
            self.address,
            self.word,
            self.instruction
        )
    }
}

/// Decodes every whole word in `bytes`, the first of which lives at `origin`.
/// A trailing odd byte is ignored.
pub fn disassemble(bytes: &[u8], origin: u16) -> Vec<Row> {
    bytes
        .chunks_exact(2)
        .enumerate()
        .map(|(index, pair)| {
            let word = u16::from(pair[0]) << 8 | u16::from(pair[1]);
            Row {
                address: origin.wrapping_add(2 * index as u16),
                word,
                instruction: Instruction::decode(word),
            }
        })
        .collect()
}

/// Renders rows as the instruction window; the row at `pc`, if any, is marked.
pub fn listing(rows: &[Row], pc: Option<u16>) -> String {
    let mut out = String::from("─────── Instruction Window ───────\n");
    out.push_str(" Addr     Opcode  Assembly\n");
    for row in rows {
        out.push_str(&row.format(Some(row.address) == pc));
        out.push('\n');
    }
    out.push_str("──────────────────────────────────");
    out
}

#[cfg(test)]
mod test_instruction {
    use super::*;
    use Instruction::*;

    #[test]
    fn test_decode_system() {
        assert_eq!(Instruction::decode(0x00E0), Cls);
        assert_eq!(Instruction::decode(0x00EE), Ret);
        assert_eq!(Instruction::decode(0x0123), Sys(0x123));
    }

    #[test]
    fn test_decode_system_ignores_x() {
        assert_eq!(Instruction::decode(0x01E0), Cls);
        assert_eq!(Instruction::decode(0x0AEE), Ret);
        assert_eq!(Instruction::decode(0x01E1), Sys(0x1E1));
    }

    #[test]
    fn test_decode_flow() {
        assert_eq!(Instruction::decode(0x1ABC), Jp(0xABC));
        assert_eq!(Instruction::decode(0x2ABC), Call(0xABC));
        assert_eq!(Instruction::decode(0xBABC), JpV0(0xABC));
    }

    #[test]
    fn test_decode_skips() {
        assert_eq!(Instruction::decode(0x3122), SeByte(1, 0x22));
        assert_eq!(Instruction::decode(0x4122), SneByte(1, 0x22));
        assert_eq!(Instruction::decode(0x5120), SeReg(1, 2));
        assert_eq!(Instruction::decode(0x9120), SneReg(1, 2));
        assert_eq!(Instruction::decode(0xE19E), Skp(1));
        assert_eq!(Instruction::decode(0xE1A1), Sknp(1));
    }

    #[test]
    fn test_decode_alu() {
        assert_eq!(Instruction::decode(0x8120), LdReg(1, 2));
        assert_eq!(Instruction::decode(0x8121), Or(1, 2));
        assert_eq!(Instruction::decode(0x8122), And(1, 2));
        assert_eq!(Instruction::decode(0x8123), Xor(1, 2));
        assert_eq!(Instruction::decode(0x8124), AddReg(1, 2));
        assert_eq!(Instruction::decode(0x8125), Sub(1, 2));
        assert_eq!(Instruction::decode(0x8126), Shr(1, 2));
        assert_eq!(Instruction::decode(0x8127), Subn(1, 2));
        assert_eq!(Instruction::decode(0x812E), Shl(1, 2));
    }

    #[test]
    fn test_decode_f_family() {
        assert_eq!(Instruction::decode(0xF307), LdFromDelay(3));
        assert_eq!(Instruction::decode(0xF30A), LdKey(3));
        assert_eq!(Instruction::decode(0xF315), LdDelay(3));
        assert_eq!(Instruction::decode(0xF318), LdSound(3));
        assert_eq!(Instruction::decode(0xF31E), AddI(3));
        assert_eq!(Instruction::decode(0xF329), LdFont(3));
        assert_eq!(Instruction::decode(0xF333), Bcd(3));
        assert_eq!(Instruction::decode(0xF355), Store(3));
        assert_eq!(Instruction::decode(0xF365), Load(3));
    }

    #[test]
    fn test_decode_unknown() {
        for word in &[0x5121, 0x8128, 0x812F, 0x9121, 0xE19F, 0xE100, 0xF300, 0xF3FF] {
            assert_eq!(Instruction::decode(*word), Unknown(*word));
        }
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Instruction::decode(0x00E0).to_string(), "CLS");
        assert_eq!(Instruction::decode(0x6122).to_string(), "LD V1, 0x22");
        assert_eq!(Instruction::decode(0xD125).to_string(), "DRW V1, V2, 5");
        assert_eq!(Instruction::decode(0xA2F0).to_string(), "LD I, 0x2F0");
        assert_eq!(Instruction::decode(0xFA65).to_string(), "LD VA, [I]");
        assert_eq!(Instruction::decode(0xFFFF).to_string(), "DW 0xFFFF");
    }

    #[test]
    fn test_disassemble_ignores_odd_byte() {
        let rows = disassemble(&[0x00, 0xE0, 0x12, 0x00, 0x77], 0x200);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].address, 0x202);
        assert_eq!(rows[1].instruction, Jp(0x200));
    }

    #[test]
    fn test_listing_marks_pc() {
        let rows = disassemble(&[0x00, 0xE0, 0x12, 0x00], 0x200);
        let text = listing(&rows, Some(0x202));
        assert!(text.contains(" 0x0200   00E0    CLS"));
        assert!(text.contains(">0x0202   1200    JP 0x200"));
    }
}
