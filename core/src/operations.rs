use log::debug;
use rand::Rng;

use crate::chip8::Chip8;
use crate::config::ShiftQuirk;
use crate::constants::{FLAG, FONT_START, GLYPH_SIZE};
use crate::error::Result;
use crate::instruction::Instruction;

/// Executes decoded instructions. PC already points past the instruction.
impl Chip8 {
    pub(crate) fn execute(&mut self, instruction: Instruction) -> Result<()> {
        use Instruction::*;

        match instruction {
            Cls => self.peripherals.display.clear(),
            Ret => self.state.pc = self.state.stack_pop()?,
            Jp(addr) => self.state.pc = addr,
            Call(addr) => self.call(addr)?,
            SeByte(x, nn) => self.skip_if(self.v(x) == nn),
            SneByte(x, nn) => self.skip_if(self.v(x) != nn),
            SeReg(x, y) => self.skip_if(self.v(x) == self.v(y)),
            SneReg(x, y) => self.skip_if(self.v(x) != self.v(y)),
            LdByte(x, nn) => self.set(x, nn),
            AddByte(x, nn) => self.set(x, self.v(x).wrapping_add(nn)),
            LdReg(x, y) => self.set(x, self.v(y)),
            Or(x, y) => self.logic(x, self.v(x) | self.v(y)),
            And(x, y) => self.logic(x, self.v(x) & self.v(y)),
            Xor(x, y) => self.logic(x, self.v(x) ^ self.v(y)),
            AddReg(x, y) => self.add(x, y),
            Sub(x, y) => self.sub(x, self.v(x), self.v(y)),
            Subn(x, y) => self.sub(x, self.v(y), self.v(x)),
            Shr(x, y) => self.shr(x, y),
            Shl(x, y) => self.shl(x, y),
            LdI(addr) => self.state.i = addr,
            JpV0(addr) => self.state.pc = addr + u16::from(self.v(0x0)),
            Rnd(x, nn) => self.rnd(x, nn),
            Drw(x, y, n) => self.draw(x, y, n)?,
            Skp(x) => self.skip_if(self.peripherals.keypad.is_pressed(self.v(x))),
            Sknp(x) => self.skip_if(!self.peripherals.keypad.is_pressed(self.v(x))),
            LdFromDelay(x) => self.set(x, self.state.delay_timer),
            LdKey(x) => self.await_key(x),
            LdDelay(x) => self.state.delay_timer = self.v(x),
            LdSound(x) => self.state.sound_timer = self.v(x),
            AddI(x) => self.state.i = self.state.i.wrapping_add(u16::from(self.v(x))),
            LdFont(x) => self.state.i = FONT_START + GLYPH_SIZE * u16::from(self.v(x)),
            Bcd(x) => self.bcd(x)?,
            Store(x) => self.store(x)?,
            Load(x) => self.load(x)?,
            Sys(_) | Unknown(_) => debug!("no-op {}", instruction),
        }
        Ok(())
    }

    fn v(&self, x: usize) -> u8 {
        self.state.read_register(x)
    }

    fn set(&mut self, x: usize, value: u8) {
        self.state.write_register(x, value);
    }

    /// Written after the result so VF holds the flag even when x is F.
    fn flag(&mut self, set: bool) {
        self.state.write_register(FLAG, set as u8);
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.state.increment_pc();
        }
    }

    /// STACK.push(PC); PC = addr
    fn call(&mut self, addr: u16) -> Result<()> {
        self.state.stack_push(self.state.pc)?;
        self.state.pc = addr;
        Ok(())
    }

    /// Vx = result; VF = 0
    fn logic(&mut self, x: usize, result: u8) {
        self.set(x, result);
        self.flag(false);
    }

    /// Vx += Vy; VF = carry
    fn add(&mut self, x: usize, y: usize) {
        let (sum, carry) = self.v(x).overflowing_add(self.v(y));
        self.set(x, sum);
        self.flag(carry);
    }

    /// Vx = a - b; VF = !borrow
    fn sub(&mut self, x: usize, a: u8, b: u8) {
        self.set(x, a.wrapping_sub(b));
        self.flag(a >= b);
    }

    fn shift_source(&self, x: usize, y: usize) -> u8 {
        match self.quirks.shift {
            ShiftQuirk::InPlace => self.v(x),
            ShiftQuirk::FromVy => self.v(y),
        }
    }

    /// Vx = src >> 1; VF = lsb
    fn shr(&mut self, x: usize, y: usize) {
        let src = self.shift_source(x, y);
        self.set(x, src >> 1);
        self.flag(src & 0x1 == 1);
    }

    /// Vx = src << 1; VF = msb
    fn shl(&mut self, x: usize, y: usize) {
        let src = self.shift_source(x, y);
        self.set(x, src << 1);
        self.flag(src & 0x80 != 0);
    }

    /// Vx = rand_byte & nn
    fn rnd(&mut self, x: usize, nn: u8) {
        let byte: u8 = self.rng.gen();
        self.set(x, byte & nn);
    }

    /// draw_sprite(x=Vx y=Vy rows=mem[I..I+n]); VF = collision
    fn draw(&mut self, x: usize, y: usize, n: u8) -> Result<()> {
        let (vx, vy) = (self.v(x), self.v(y));
        let rows = self.memory.read_range(self.state.i, n as usize)?;
        let erased = self.peripherals.display.draw_sprite(vx, vy, rows);
        self.flag(erased);
        Ok(())
    }

    /// Vx = key, re-executing this instruction until one is released
    fn await_key(&mut self, x: usize) {
        match self.peripherals.keypad.poll_for_key_press() {
            Some(key) => self.set(x, key),
            None => self.state.decrement_pc(),
        }
    }

    /// mem[I..I+3] = bcd(Vx)
    fn bcd(&mut self, x: usize) -> Result<()> {
        let value = self.v(x);
        let digits = [value / 100 % 10, value / 10 % 10, value % 10];
        self.memory.write_range(self.state.i, &digits)
    }

    /// mem[I..=I+x] = V0..=Vx; I is left past the last byte written
    fn store(&mut self, x: usize) -> Result<()> {
        for reg in 0..=x {
            self.memory.write8(self.state.i, self.v(reg))?;
            self.state.i = self.state.i.wrapping_add(1);
        }
        Ok(())
    }

    /// V0..=Vx = mem[I..=I+x]; I is left past the last byte read
    fn load(&mut self, x: usize) -> Result<()> {
        for reg in 0..=x {
            let value = self.memory.read8(self.state.i)?;
            self.set(reg, value);
            self.state.i = self.state.i.wrapping_add(1);
        }
        Ok(())
    }
}
