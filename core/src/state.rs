use crate::constants::{PROGRAM_START, REGISTER_COUNT, STACK_DEPTH};
use crate::error::{Error, Result};
use crate::memory::Memory;

/// # Processor state
///
/// ## Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// ## Counter
/// - (pc) a 16-bit program counter, advanced by 2 per fetch
///
/// ## Stack
/// - 16 return addresses with a stack pointer in `0..=16`
///
/// ## Timers
/// - 2 8-bit timers (delay & sound) decremented once per timer tick
/// - the tone is audible while the sound timer is above 0
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct State {
    v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    sp: usize,
    stack: [u16; STACK_DEPTH],
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl State {
    pub fn new() -> Self {
        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            stack: [0; STACK_DEPTH],
            delay_timer: 0,
            sound_timer: 0,
        }
    }

    pub fn read_register(&self, x: usize) -> u8 {
        self.v[x & 0xF]
    }

    /// Only the low 8 bits of `value` are kept.
    pub fn write_register(&mut self, x: usize, value: impl Into<u16>) {
        self.v[x & 0xF] = (value.into() & 0xFF) as u8;
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.v
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    /// Reads the word at PC, then advances PC past it.
    pub fn fetch_instruction(&mut self, memory: &Memory) -> Result<u16> {
        let word = memory.read16(self.pc)?;
        self.increment_pc();
        Ok(word)
    }

    pub fn increment_pc(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    pub fn decrement_pc(&mut self) {
        self.pc = self.pc.wrapping_sub(2);
    }

    pub fn stack_push(&mut self, addr: u16) -> Result<()> {
        if self.sp >= STACK_DEPTH {
            return Err(Error::StackOverflow { pc: self.pc });
        }
        self.stack[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn stack_pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }

    /// Decrements both timers toward 0.
    /// Returns whether the tone should be audible.
    pub fn update_timers(&mut self) -> bool {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
        self.sound_timer > 0
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test_state {
    use super::*;

    #[test]
    fn test_register_writes_are_masked() {
        let mut state = State::new();
        for r in 0..REGISTER_COUNT {
            state.write_register(r, 0x1ABu16);
            assert_eq!(state.read_register(r), 0xAB);
            state.write_register(r, 0x7Fu8);
            assert_eq!(state.read_register(r), 0x7F);
        }
    }

    #[test]
    fn test_fetch_advances_pc() {
        let memory = Memory::with_program(&[0xAA, 0xBB, 0xFF, 0xFF]).unwrap();
        let mut state = State::new();
        assert_eq!(state.fetch_instruction(&memory).unwrap(), 0xAABB);
        assert_eq!(state.pc, 0x202);
        assert_eq!(state.fetch_instruction(&memory).unwrap(), 0xFFFF);
        assert_eq!(state.pc, 0x204);
    }

    #[test]
    fn test_fetch_out_of_bounds() {
        let memory = Memory::new();
        let mut state = State::new();
        state.pc = 0x1000;
        assert!(state.fetch_instruction(&memory).is_err());
    }

    #[test]
    fn test_increment_decrement_pc() {
        let mut state = State::new();
        state.increment_pc();
        assert_eq!(state.pc, 0x202);
        state.decrement_pc();
        state.decrement_pc();
        assert_eq!(state.pc, 0x1FE);
    }

    #[test]
    fn test_stack_is_lifo() {
        let mut state = State::new();
        state.stack_push(0x123).unwrap();
        state.stack_push(0x456).unwrap();
        assert_eq!(state.stack_pop().unwrap(), 0x456);
        assert_eq!(state.stack_pop().unwrap(), 0x123);
    }

    #[test]
    fn test_stack_overflow() {
        let mut state = State::new();
        for addr in 0..STACK_DEPTH as u16 {
            state.stack_push(addr).unwrap();
        }
        assert_eq!(state.sp(), 16);
        match state.stack_push(0x200) {
            Err(Error::StackOverflow { .. }) => (),
            _ => panic!("expected stack overflow"),
        }
        assert_eq!(state.sp(), 16);
    }

    #[test]
    fn test_stack_underflow() {
        let mut state = State::new();
        match state.stack_pop() {
            Err(Error::StackUnderflow) => (),
            _ => panic!("expected stack underflow"),
        }
    }

    #[test]
    fn test_timers_stop_at_zero() {
        let mut state = State::new();
        state.delay_timer = 5;
        for _ in 0..5 {
            state.update_timers();
        }
        assert_eq!(state.delay_timer, 0);
        state.update_timers();
        assert_eq!(state.delay_timer, 0);
    }

    #[test]
    fn test_tone_follows_sound_timer() {
        let mut state = State::new();
        state.sound_timer = 2;
        assert!(state.update_timers());
        assert!(!state.update_timers());
        assert!(!state.update_timers());
    }
}
