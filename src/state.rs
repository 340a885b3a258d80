//! # state
//!
//! the mutable heart of the machine. on the COSMAC VIP most of this lived in
//! the top pages of RAM; here it sits outside addressable memory, so a program
//! can't scribble over its own stack.
use crate::error::Fault;
use crate::framebuffer::Framebuffer;
use crate::memory::CHIP8_PROGRAM_ADDR;
use crate::timer::Timers;

/// VF doubles as carry, borrow and collision flag
pub const FLAG: usize = 0xf;

/// call depth
pub const STACK_DEPTH: usize = 16;

/// number of keys on the hex keypad
pub const KEY_COUNT: usize = 16;

/// return addresses for up to 16 nested calls
#[derive(Debug, Default, Clone)]
pub struct CallStack {
    frames: [u16; STACK_DEPTH],
    pointer: usize,
}

impl CallStack {
    pub fn push(&mut self, addr: u16) -> Result<(), Fault> {
        let slot = self
            .frames
            .get_mut(self.pointer)
            .ok_or(Fault::StackOverflow)?;
        *slot = addr;
        self.pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Fault> {
        self.pointer = self.pointer.checked_sub(1).ok_or(Fault::StackUnderflow)?;
        Ok(self.frames[self.pointer])
    }

    /// current depth, 0..=16
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// live return addresses, oldest first
    pub fn frames(&self) -> &[u16] {
        &self.frames[..self.pointer]
    }
}

/// which keys are held down right now. only the host writes to this
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyLatch([bool; KEY_COUNT]);

impl KeyLatch {
    /// indices above 0xF are ignored
    pub fn set(&mut self, key: usize, pressed: bool) {
        if let Some(k) = self.0.get_mut(key) {
            *k = pressed;
        }
    }

    pub fn is_pressed(&self, key: usize) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    /// lowest-numbered key that's down, if any
    pub fn first_pressed(&self) -> Option<u8> {
        self.0.iter().position(|k| *k).map(|k| k as u8)
    }
}

/// registers, timers, keys and screen
#[derive(Clone)]
pub struct ExecutionState {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub stack: CallStack,
    pub timers: Timers,
    pub keys: KeyLatch,
    pub framebuffer: Framebuffer,
}

impl ExecutionState {
    pub fn new() -> Self {
        ExecutionState {
            v: [0; 16],
            i: 0,
            pc: CHIP8_PROGRAM_ADDR,
            stack: CallStack::default(),
            timers: Timers::new(),
            keys: KeyLatch::default(),
            framebuffer: Framebuffer::new(),
        }
    }

    /// step over the next instruction
    pub fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }
}

impl Default for ExecutionState {
    fn default() -> Self {
        Self::new()
    }
}
