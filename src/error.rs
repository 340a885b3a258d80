use std::io;
use thiserror::Error;

/// problems found while getting a program into the machine. nothing has run
/// yet when one of these comes back, so the caller just reports it
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("program is {len} bytes but only {max} bytes fit above the load address")]
    ImageTooLarge { len: usize, max: usize },

    #[error("could not read program image: {0}")]
    ImageUnreadable(#[from] io::Error),
}

/// fatal conditions raised while executing. the interpreter halts on any of
/// these and keeps its state around for inspection
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    #[error("call stack overflow")]
    StackOverflow,

    #[error("return with an empty call stack")]
    StackUnderflow,

    #[error("unknown opcode 0x{0:04x}")]
    UnknownOpcode(u16),

    #[error("memory access out of range at 0x{0:04x}")]
    AddressOutOfRange(u16),
}

/// a fault plus where it happened
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{kind} (instruction at 0x{pc:03x})")]
pub struct FaultReport {
    pub kind: Fault,
    pub pc: u16,
}
