//! A CHIP-8 interpreter with a terminal front end.
//!
//! ## Design
//!
//! * the core (memory, decoder, execution state, executor, run state) knows
//!   nothing about screens, keyboards or clocks; the host drives it one tick
//!   at a time and reads back the framebuffer and a beep flag
//! * abstract display, input and sound behind traits so alternatives can plug
//!   in; the one shipped renders with TUI in-console
//! * instructions are decoded into an enum, one variant per instruction, and
//!   executed with one exhaustive match
//! * fatal conditions (stack over/underflow, unknown opcodes, running off the
//!   end of memory) halt the machine and come back as values; nothing in here
//!   exits the process
//! * the random source is handed in, so tests can script it
//!
//! Model
//!
//! Environment
//!  |-- display, input, sound, pacing (config)
//!  |-- interpreter(program, rng, machine config)
//!  |    |-- memory map (font + program)
//!  |    |-- execution state (registers, stack, timers, keys, framebuffer)
//!  |    `-- run state (running / paused / halted)
//!  `-- main loop
//!       |-- route input events to keys / pause / quit
//!       |-- interpreter.tick()
//!       |-- timers.tick() for each 1/60s that has gone by
//!       |-- beep if the sound timer ran out
//!       `-- redraw if the frame changed, then sleep until the next instruction
pub mod config;
pub mod display;
pub mod environment;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod sound;
pub mod state;
pub mod timer;

pub use error::{Fault, FaultReport, LoadError};
pub use framebuffer::Framebuffer;
pub use interpreter::{
    Chip8Interpreter, ControlEvent, MachineConfig, RunState, TickOutcome, TimerMode,
};
