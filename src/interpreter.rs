//! # interpreter
//!
//! one `tick()` is one trip round fetch/decode/execute:
//!  1. read the big-endian word at PC
//!  2. PC += 2, so jumps and skips work relative to the next instruction
//!  3. decode into an `Instruction`; anything unrecognised is fatal
//!  4. apply it to registers, memory and the display
//!  5. decrement the timers, unless the host has taken that over
//!
//! the run state gates all of this. a paused machine does nothing on tick; a
//! halted one never runs again. faults halt the machine and are handed back
//! to the host rather than retried, with the machine state left as it was at
//! the point of failure.
use crate::error::{Fault, FaultReport, LoadError};
use crate::framebuffer::{Framebuffer, HEIGHT, WIDTH};
use crate::instruction::Instruction;
use crate::memory::{
    Chip8MemoryMap, MemoryMap, CHIP8_ADDR_MASK, CHIP8_FONT_ADDR, CHIP8_FONT_GLYPH_BYTES,
    CHIP8_MAX_PROGRAM_BYTES,
};
use crate::state::{ExecutionState, FLAG};
use log::{debug, info, trace, warn};
use rand::{Rng, RngCore};
use std::io::{self, Read};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Running,
    Paused,
    Halted,
}

/// what a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Executed,
    Paused,
    Halted,
    /// the tick hit a fatal condition; the machine is now halted
    Fault(Fault),
}

/// requests from the host that change the run state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    PauseToggle,
    Quit,
}

/// who decrements the timers
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// once per executed instruction
    #[default]
    PerTick,
    /// only when the host calls `tick_timers()`, e.g. at 60Hz of wall-clock
    External,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MachineConfig {
    pub timer_mode: TimerMode,
}

pub struct Chip8Interpreter<R> {
    memory: Chip8MemoryMap,
    state: ExecutionState,
    rng: R,
    config: MachineConfig,
    run_state: RunState,
    beep_pending: bool,
    last_fault: Option<FaultReport>,
}

impl<R: RngCore> Chip8Interpreter<R> {
    /// build a machine around a program image
    pub fn new(program: &[u8], rng: R) -> Result<Self, LoadError> {
        Self::with_config(program, rng, MachineConfig::default())
    }

    pub fn with_config(program: &[u8], rng: R, config: MachineConfig) -> Result<Self, LoadError> {
        let memory = Chip8MemoryMap::with_program(program)?;
        info!("loaded {} byte program", program.len());
        Ok(Chip8Interpreter {
            memory,
            state: ExecutionState::new(),
            rng,
            config,
            run_state: RunState::Running,
            beep_pending: false,
            last_fault: None,
        })
    }

    /// load a chip8 program from a file or whatever
    pub fn load_program(
        reader: &mut impl io::Read,
        rng: R,
        config: MachineConfig,
    ) -> Result<Self, LoadError> {
        // read one byte past the limit so oversized images are caught without
        // slurping an arbitrarily large file
        let mut buf = Vec::new();
        reader
            .take(CHIP8_MAX_PROGRAM_BYTES as u64 + 1)
            .read_to_end(&mut buf)?;
        Self::with_config(&buf, rng, config)
    }

    /// advance by at most one instruction and one timer decrement
    pub fn tick(&mut self) -> TickOutcome {
        match self.run_state {
            RunState::Paused => TickOutcome::Paused,
            RunState::Halted => TickOutcome::Halted,
            RunState::Running => {
                let pc = self.state.pc;
                match self.step() {
                    Ok(()) => {
                        if self.config.timer_mode == TimerMode::PerTick {
                            self.tick_timers();
                        }
                        TickOutcome::Executed
                    }
                    Err(kind) => {
                        let report = FaultReport { kind, pc };
                        warn!("halting: {}", report);
                        self.last_fault = Some(report);
                        self.run_state = RunState::Halted;
                        TickOutcome::Fault(kind)
                    }
                }
            }
        }
    }

    /// one timer decrement; does nothing unless running
    pub fn tick_timers(&mut self) {
        if self.run_state == RunState::Running && self.state.timers.tick() {
            self.beep_pending = true;
        }
    }

    fn step(&mut self) -> Result<(), Fault> {
        let pc = self.state.pc;
        let raw = self.memory.get_word(pc)?;
        self.state.skip();
        let instr = Instruction::decode(raw)?;
        trace!("{:03x}: {:04x} {:?}", pc, raw, instr);
        self.execute(instr)
    }

    /// apply a decoded instruction. PC must already point past it
    pub fn execute(&mut self, instr: Instruction) -> Result<(), Fault> {
        use Instruction::*;
        let s = &mut self.state;
        match instr {
            ClearDisplay => s.framebuffer.clear(),
            Return => s.pc = s.stack.pop()?,
            Jump(addr) => s.pc = addr,
            Call(addr) => {
                s.stack.push(s.pc)?;
                s.pc = addr;
            }
            SkipEqImm(x, nn) => {
                if s.v[x] == nn {
                    s.skip();
                }
            }
            SkipNeImm(x, nn) => {
                if s.v[x] != nn {
                    s.skip();
                }
            }
            SkipEqReg(x, y) => {
                if s.v[x] == s.v[y] {
                    s.skip();
                }
            }
            LoadImm(x, nn) => s.v[x] = nn,
            AddImm(x, nn) => s.v[x] = s.v[x].wrapping_add(nn),
            Move(x, y) => s.v[x] = s.v[y],
            Or(x, y) => s.v[x] |= s.v[y],
            And(x, y) => s.v[x] &= s.v[y],
            Xor(x, y) => s.v[x] ^= s.v[y],
            // flag goes in first; with VF as an operand the result is then
            // computed from the flag, so VF ends up holding the result
            AddCarry(x, y) => {
                let (sum, carry) = s.v[x].overflowing_add(s.v[y]);
                s.v[FLAG] = carry as u8;
                s.v[x] = sum;
            }
            Sub(x, y) => {
                s.v[FLAG] = (s.v[x] > s.v[y]) as u8;
                s.v[x] = s.v[x].wrapping_sub(s.v[y]);
            }
            ShiftRight(x) => {
                s.v[FLAG] = s.v[x] & 0x01;
                s.v[x] >>= 1;
            }
            SubN(x, y) => {
                s.v[FLAG] = (s.v[y] > s.v[x]) as u8;
                s.v[x] = s.v[y].wrapping_sub(s.v[x]);
            }
            ShiftLeft(x) => {
                s.v[FLAG] = s.v[x] >> 7;
                s.v[x] <<= 1;
            }
            SkipNeReg(x, y) => {
                if s.v[x] != s.v[y] {
                    s.skip();
                }
            }
            SetIndex(addr) => s.i = addr,
            JumpV0(addr) => s.pc = addr + s.v[0] as u16,
            Random(x, nn) => s.v[x] = self.rng.gen::<u8>() & nn,
            Draw(x, y, n) => {
                // cleared before the coordinates are read, so DFYN draws at x=0
                s.v[FLAG] = 0;
                let left = s.v[x] as usize % WIDTH;
                let top = s.v[y] as usize % HEIGHT;
                let mut sprite = [0u8; 15];
                let sprite = &mut sprite[..n as usize];
                for (row, b) in sprite.iter_mut().enumerate() {
                    *b = self.memory.read_byte(indexed(s.i, row))?;
                }
                s.v[FLAG] = s.framebuffer.draw_sprite(left, top, sprite) as u8;
            }
            SkipKeyPressed(x) => {
                if s.keys.is_pressed(key_index(s.v[x])) {
                    s.skip();
                }
            }
            SkipKeyNotPressed(x) => {
                if !s.keys.is_pressed(key_index(s.v[x])) {
                    s.skip();
                }
            }
            LoadDelay(x) => s.v[x] = s.timers.delay,
            WaitKey(x) => match s.keys.first_pressed() {
                Some(key) => s.v[x] = key,
                // spin on this instruction until something is pressed
                None => s.pc = s.pc.wrapping_sub(2),
            },
            SetDelay(x) => s.timers.delay = s.v[x],
            SetSound(x) => s.timers.sound = s.v[x],
            AddIndex(x) => s.i = s.i.wrapping_add(s.v[x] as u16),
            FontAddr(x) => s.i = CHIP8_FONT_ADDR + s.v[x] as u16 * CHIP8_FONT_GLYPH_BYTES,
            StoreBcd(x) => {
                let val = s.v[x];
                for (k, digit) in [val / 100, val / 10 % 10, val % 10].into_iter().enumerate() {
                    self.memory.write_byte(indexed(s.i, k), digit)?;
                }
            }
            StoreRegs(x) => {
                for r in 0..=x {
                    self.memory.write_byte(indexed(s.i, r), s.v[r])?;
                }
            }
            LoadRegs(x) => {
                for r in 0..=x {
                    s.v[r] = self.memory.read_byte(indexed(s.i, r))?;
                }
            }
        }
        Ok(())
    }

    /// react to a pause or quit request
    pub fn handle(&mut self, event: ControlEvent) {
        self.run_state = match (event, self.run_state) {
            (ControlEvent::Quit, RunState::Halted) => RunState::Halted,
            (ControlEvent::Quit, _) => {
                info!("quit requested");
                RunState::Halted
            }
            (ControlEvent::PauseToggle, RunState::Running) => {
                debug!("paused");
                RunState::Paused
            }
            (ControlEvent::PauseToggle, RunState::Paused) => {
                debug!("resumed");
                RunState::Running
            }
            (ControlEvent::PauseToggle, RunState::Halted) => RunState::Halted,
        };
    }

    /// latch a keypad key up or down
    pub fn set_key(&mut self, key: usize, pressed: bool) {
        self.state.keys.set(key, pressed);
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.state.framebuffer
    }

    /// true if the display changed since the last call
    pub fn take_redraw(&mut self) -> bool {
        self.state.framebuffer.take_dirty()
    }

    /// true once per sound timer expiry
    pub fn beep_pending(&mut self) -> bool {
        std::mem::take(&mut self.beep_pending)
    }

    pub fn config(&self) -> MachineConfig {
        self.config
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn last_fault(&self) -> Option<FaultReport> {
        self.last_fault
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn memory(&self) -> &Chip8MemoryMap {
        &self.memory
    }
}

/// I-relative address, wrapped to 12 bits
fn indexed(i: u16, offset: usize) -> u16 {
    i.wrapping_add(offset as u16) & CHIP8_ADDR_MASK
}

fn key_index(v: u8) -> usize {
    (v & 0x0f) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn assemble(words: &[u16]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    fn machine(words: &[u16]) -> Chip8Interpreter<StepRng> {
        Chip8Interpreter::new(&assemble(words), StepRng::new(0xa5, 0)).unwrap()
    }

    /// tick n times, insisting every tick executes
    fn run(m: &mut Chip8Interpreter<StepRng>, n: usize) {
        for _ in 0..n {
            assert_eq!(m.tick(), TickOutcome::Executed);
        }
    }

    #[test]
    fn test_program_load_ok() -> Result<(), LoadError> {
        let mut prog: &[u8] = &[0x00, 0xe0]; // clear screen
        let m = Chip8Interpreter::load_program(&mut prog, StepRng::new(0, 0), MachineConfig::default())?;
        assert_eq!(m.memory().get_word(0x200), Ok(0x00e0));
        assert_eq!(m.state().pc, 0x200);
        Ok(())
    }

    #[test]
    fn test_load_rejects_oversized_reader() {
        let big = vec![0u8; 5000];
        let r = Chip8Interpreter::load_program(&mut big.as_slice(), StepRng::new(0, 0), MachineConfig::default());
        assert!(matches!(
            r,
            Err(LoadError::ImageTooLarge { len: 3585, max: 3584 })
        ));
    }

    #[test]
    fn test_clear_display() {
        let mut m = machine(&[0x00e0]);
        m.state.framebuffer.draw_sprite(0, 0, &[0xff; 15]);
        run(&mut m, 1);
        assert_eq!(m.framebuffer().points(true).count(), 0);
    }

    #[test]
    fn test_jump() {
        let mut m = machine(&[0x1208, 0x0000, 0x0000, 0x0000, 0x6001]);
        run(&mut m, 2);
        assert_eq!(m.state().v[0], 1);
        assert_eq!(m.state().pc, 0x20a);
    }

    #[test]
    fn test_call_and_return() {
        // 200: call 206; 202: v1 = 2; 204: jump 204; 206: v0 = 1; 208: ret
        let mut m = machine(&[0x2206, 0x6102, 0x1204, 0x6001, 0x00ee]);
        run(&mut m, 1);
        assert_eq!(m.state().pc, 0x206);
        assert_eq!(m.state().stack.frames(), &[0x202]);
        run(&mut m, 2);
        assert_eq!(m.state().pc, 0x202);
        assert_eq!(m.state().stack.pointer(), 0);
        run(&mut m, 1);
        assert_eq!(m.state().v[..2], [1, 2]);
    }

    #[test]
    fn test_return_underflow_halts() {
        let mut m = machine(&[0x00ee]);
        assert_eq!(m.tick(), TickOutcome::Fault(Fault::StackUnderflow));
        assert_eq!(m.run_state(), RunState::Halted);
        assert_eq!(
            m.last_fault(),
            Some(FaultReport {
                kind: Fault::StackUnderflow,
                pc: 0x200
            })
        );
        assert_eq!(m.tick(), TickOutcome::Halted);
    }

    #[test]
    fn test_call_overflow_halts() {
        // calls itself forever
        let mut m = machine(&[0x2200]);
        run(&mut m, 16);
        assert_eq!(m.tick(), TickOutcome::Fault(Fault::StackOverflow));
        assert_eq!(m.state().stack.pointer(), 16);
    }

    #[test]
    fn test_unknown_opcode_halts() {
        let mut m = machine(&[0x6001, 0xffff]);
        run(&mut m, 1);
        assert_eq!(m.tick(), TickOutcome::Fault(Fault::UnknownOpcode(0xffff)));
        // register state survives for inspection
        assert_eq!(m.state().v[0], 1);
        assert_eq!(m.last_fault().map(|f| f.pc), Some(0x202));
    }

    #[test]
    fn test_skips() {
        // v0 = 5; v1 = 5; se v0,5 (skip); [v2=1]; sne v0,5 (no skip); v3=1;
        // se v0,v1 (skip); [v4=1]; sne v0,v1 (no skip); v5=1
        let mut m = machine(&[
            0x6005, 0x6105, 0x3005, 0x6201, 0x4005, 0x6301, 0x5010, 0x6401, 0x9010, 0x6501,
        ]);
        run(&mut m, 8);
        assert_eq!(m.state().v[2..6], [0, 1, 0, 1]);
        assert_eq!(m.state().pc, 0x214);
    }

    #[test]
    fn test_add_immediate_wraps_without_flag() {
        let mut m = machine(&[0x60ff, 0x7002]);
        run(&mut m, 2);
        assert_eq!(m.state().v[0], 1);
        assert_eq!(m.state().v[FLAG], 0);
    }

    #[test]
    fn test_bitwise_ops() {
        let mut m = machine(&[0x60f0, 0x613c, 0x8201, 0x8212, 0x8013, 0x8310]);
        run(&mut m, 6);
        let v = m.state().v;
        assert_eq!(v[2], 0x30); // (0 | f0) & 3c
        assert_eq!(v[0], 0xcc); // f0 ^ 3c
        assert_eq!(v[3], 0x3c);
    }

    #[test]
    fn test_add_with_carry() {
        let mut m = machine(&[0x60ff, 0x6102, 0x8014]);
        run(&mut m, 3);
        assert_eq!(m.state().v[0], 0x01);
        assert_eq!(m.state().v[FLAG], 1);
    }

    #[test]
    fn test_sub_and_subn() {
        // v0 = 3, v1 = 5; v2 = v0; v2 -= v1 (borrow); v3 = v0; v3 = v1 - v3
        let mut m = machine(&[0x6003, 0x6105, 0x8200, 0x8215, 0x8300, 0x8317]);
        run(&mut m, 4);
        assert_eq!(m.state().v[2], 0xfe);
        assert_eq!(m.state().v[FLAG], 0);
        run(&mut m, 2);
        assert_eq!(m.state().v[3], 2);
        assert_eq!(m.state().v[FLAG], 1);
    }

    #[test]
    fn test_sub_equal_values_borrows() {
        let mut m = machine(&[0x6007, 0x6107, 0x8015]);
        run(&mut m, 3);
        assert_eq!(m.state().v[0], 0);
        assert_eq!(m.state().v[FLAG], 0);
    }

    #[test]
    fn test_shifts_in_place() {
        // vy is ignored
        let mut m = machine(&[0x6081, 0x61ff, 0x8016, 0x6281, 0x821e]);
        run(&mut m, 3);
        assert_eq!(m.state().v[0], 0x40);
        assert_eq!(m.state().v[FLAG], 1);
        run(&mut m, 2);
        assert_eq!(m.state().v[2], 0x02);
        assert_eq!(m.state().v[FLAG], 1);
    }

    #[test]
    fn test_flag_register_as_destination() {
        // vf + 1 carries, but the sum lands in vf last
        let mut m = machine(&[0x6fff, 0x6101, 0x8f14]);
        run(&mut m, 3);
        assert_eq!(m.state().v[FLAG], 0x00);

        // flag (1) is stored first, then shifted
        let mut m = machine(&[0x6f03, 0x8f06]);
        run(&mut m, 2);
        assert_eq!(m.state().v[FLAG], 0x00);

        // flag (1) is stored first, then 1 - 3
        let mut m = machine(&[0x6f05, 0x6103, 0x8f15]);
        run(&mut m, 3);
        assert_eq!(m.state().v[FLAG], 0xfe);

        // flag (1) is stored first, then shifted left
        let mut m = machine(&[0x6f81, 0x8f0e]);
        run(&mut m, 2);
        assert_eq!(m.state().v[FLAG], 0x02);

        // flag (1) is stored first, then 7 - 1
        let mut m = machine(&[0x6f02, 0x6107, 0x8f17]);
        run(&mut m, 3);
        assert_eq!(m.state().v[FLAG], 0x06);
    }

    #[test]
    fn test_draw_with_flag_as_coordinate() {
        // vf = 10 but draw clears it first, so the sprite starts at x = 0
        let mut m = machine(&[0x6f0a, 0xa050, 0xdf01]);
        run(&mut m, 3);
        let fb = m.framebuffer();
        assert!((0..4).all(|x| fb.get(x, 0)));
        assert!(!fb.get(10, 0));
        assert_eq!(m.state().v[FLAG], 0);
    }

    #[test]
    fn test_index_ops() {
        let mut m = machine(&[0xa123, 0x6010, 0xf01e, 0x600a, 0xf029]);
        run(&mut m, 3);
        assert_eq!(m.state().i, 0x133);
        run(&mut m, 2);
        assert_eq!(m.state().i, CHIP8_FONT_ADDR + 50);
    }

    #[test]
    fn test_jump_v0() {
        let mut m = machine(&[0x6004, 0xb300]);
        run(&mut m, 2);
        assert_eq!(m.state().pc, 0x304);
    }

    #[test]
    fn test_jump_v0_off_the_end_faults() {
        let mut m = machine(&[0x60ff, 0xbfff]);
        run(&mut m, 2);
        assert_eq!(
            m.tick(),
            TickOutcome::Fault(Fault::AddressOutOfRange(0x10fe))
        );
    }

    #[test]
    fn test_random_masked() {
        // StepRng hands out 0xa5 every time
        let mut m = machine(&[0xc00f, 0xc1ff, 0xc200]);
        run(&mut m, 3);
        assert_eq!(m.state().v[..3], [0x05, 0xa5, 0x00]);
    }

    #[test]
    fn test_draw_font_glyph() {
        // draw "0" at (2, 1)
        let mut m = machine(&[0x6000, 0xf029, 0x6102, 0x6201, 0xd125]);
        run(&mut m, 5);
        let fb = m.framebuffer();
        assert!((2..6).all(|x| fb.get(x, 1))); // 0xF0 top row
        assert!(fb.get(2, 2) && !fb.get(3, 2) && fb.get(5, 2)); // 0x90
        assert_eq!(m.state().v[FLAG], 0);
    }

    #[test]
    fn test_draw_wraps_start_coordinate() {
        // x = 66 -> 2, y = 33 -> 1
        let mut m = machine(&[0x6042, 0x6121, 0xa050, 0xd011]);
        run(&mut m, 4);
        assert!(m.framebuffer().get(2, 1));
    }

    #[test]
    fn test_draw_collision_sets_flag() {
        let mut m = machine(&[0xa050, 0xd001, 0xd001]);
        run(&mut m, 2);
        assert_eq!(m.state().v[FLAG], 0);
        run(&mut m, 1);
        assert_eq!(m.state().v[FLAG], 1);
        assert_eq!(m.framebuffer().points(true).count(), 0);
    }

    #[test]
    fn test_keys() {
        // v0 = 7; skp v0; [v1=1]; sknp v0; v2=1
        let mut m = machine(&[0x6007, 0xe09e, 0x6101, 0xe0a1, 0x6201]);
        m.set_key(7, true);
        run(&mut m, 4);
        assert_eq!(m.state().v[1], 0);
        assert_eq!(m.state().v[2], 1);
    }

    #[test]
    fn test_key_index_masked() {
        // v0 = 0x17 reads key 7
        let mut m = machine(&[0x6017, 0xe09e, 0x6101]);
        m.set_key(7, true);
        run(&mut m, 2);
        assert_eq!(m.state().pc, 0x206);
    }

    #[test]
    fn test_wait_for_key() {
        let mut m = machine(&[0xf30a, 0x6101]);
        run(&mut m, 3);
        assert_eq!(m.state().pc, 0x200);
        m.set_key(0xc, true);
        m.set_key(0x9, true);
        run(&mut m, 1);
        assert_eq!(m.state().v[3], 0x9);
        assert_eq!(m.state().pc, 0x202);
    }

    #[test]
    fn test_timers_load_and_read() {
        let mut m = machine(&[0x6010, 0xf015, 0xf107, 0xf018]);
        run(&mut m, 3);
        // set to 0x10 then decremented at the end of ticks 2 and 3
        assert_eq!(m.state().v[1], 0x0f);
        assert_eq!(m.state().timers.delay, 0x0e);
        run(&mut m, 1);
        assert_eq!(m.state().timers.sound, 0x0f);
    }

    #[test]
    fn test_external_timer_mode() {
        let prog = assemble(&[0x6005, 0xf015, 0x1204]);
        let config = MachineConfig {
            timer_mode: TimerMode::External,
        };
        let mut m = Chip8Interpreter::with_config(&prog, StepRng::new(0, 0), config).unwrap();
        run(&mut m, 10);
        assert_eq!(m.state().timers.delay, 5);
        m.tick_timers();
        m.tick_timers();
        assert_eq!(m.state().timers.delay, 3);
    }

    #[test]
    fn test_bcd() {
        let mut m = machine(&[0x609c, 0xa300, 0xf033]);
        run(&mut m, 3);
        assert_eq!(m.memory().get_ro_slice(0x300, 3), Some(&[1, 5, 6][..]));
    }

    #[test]
    fn test_store_load_registers() {
        let mut m = machine(&[0x6011, 0x6122, 0x6233, 0xa400, 0xf155, 0x6000, 0x6100, 0xf265]);
        run(&mut m, 5);
        assert_eq!(m.memory().get_ro_slice(0x400, 3), Some(&[0x11, 0x22, 0][..]));
        run(&mut m, 3);
        // v2 reloaded from memory that was never written
        assert_eq!(m.state().v[..3], [0x11, 0x22, 0x00]);
        assert_eq!(m.state().i, 0x400);
    }

    #[test]
    fn test_index_relative_access_wraps() {
        let mut m = machine(&[0x60aa, 0x61bb, 0xafff, 0xf155]);
        run(&mut m, 4);
        assert_eq!(m.memory().read_byte(0xfff), Ok(0xaa));
        assert_eq!(m.memory().read_byte(0x000), Ok(0xbb));
    }

    #[test]
    fn test_pause_and_quit() {
        let mut m = machine(&[0x7001, 0x1200]);
        run(&mut m, 1);
        m.handle(ControlEvent::PauseToggle);
        assert_eq!(m.tick(), TickOutcome::Paused);
        assert_eq!(m.state().v[0], 1);
        m.handle(ControlEvent::PauseToggle);
        run(&mut m, 2);
        assert_eq!(m.state().v[0], 2);
        m.handle(ControlEvent::Quit);
        assert_eq!(m.tick(), TickOutcome::Halted);
        // halted is terminal
        m.handle(ControlEvent::PauseToggle);
        assert_eq!(m.run_state(), RunState::Halted);
    }

    #[test]
    fn test_paused_timers_frozen() {
        let mut m = machine(&[0x6003, 0xf018, 0x1204]);
        run(&mut m, 2);
        m.handle(ControlEvent::PauseToggle);
        m.tick_timers();
        m.tick();
        assert_eq!(m.state().timers.sound, 2);
    }

    #[test]
    fn test_beep_pending_cleared_on_read() {
        let mut m = machine(&[0x6001, 0xf018, 0x1204]);
        run(&mut m, 2);
        assert!(m.beep_pending());
        assert!(!m.beep_pending());
    }
}
