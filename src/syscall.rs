//! Syscall numbering and the fixed dispatch table.
//!
//! ABI: the number travels in `a7`, the single argument in `a0`, and the
//! request is made with `ecall`. All registers are preserved across the
//! call except for `load_program`, which never returns.

use core::fmt;
use lazy_static::*;

use crate::context::{reg_abi, RegisterFile};

pub const SYSCALL_DUMP_REGISTERS: u32 = 0;
pub const SYSCALL_LOAD_PROGRAM: u32 = 1;
pub const SYSCALL_BREAKPOINT: u32 = 2;

pub const SYSCALL_TABLE_SIZE: usize = 32;

/// Monitor services a table slot can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    DumpRegisters,
    LoadProgram,
    Breakpoint,
    Unknown,
}

/// How the trapped program continues once a handler is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Return to the instruction after the trapping one.
    Resume,
    /// Abandon the trapped context and start executing at this address.
    Transfer(u32),
}

/// Syscall number and argument as they stood at trap entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyscallRequest {
    pub number: u32,
    pub arg: u32,
}

impl SyscallRequest {
    /// `regs` must be the snapshot taken by the trap entry stub. The ABI
    /// registers are also argument registers of the normal calling
    /// convention, so reading them after any call is meaningless.
    pub fn capture(regs: &RegisterFile) -> Self {
        Self {
            number: regs.get(reg_abi::REG_A7),
            arg: regs.get(reg_abi::REG_A0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallError {
    OutOfRange(u32),
}

impl fmt::Display for SyscallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyscallError::OutOfRange(n) => write!(
                f,
                "syscall number {} outside table of {} slots",
                n, SYSCALL_TABLE_SIZE
            ),
        }
    }
}

/// Number-to-handler map. Built once, then only read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyscallTable {
    slots: [Handler; SYSCALL_TABLE_SIZE],
}

impl SyscallTable {
    pub const fn empty() -> Self {
        Self {
            slots: [Handler::Unknown; SYSCALL_TABLE_SIZE],
        }
    }

    /// The services this monitor ships: 0 dump, 1 load, 2 breakpoint.
    pub const fn standard() -> Self {
        let mut slots = [Handler::Unknown; SYSCALL_TABLE_SIZE];
        slots[SYSCALL_DUMP_REGISTERS as usize] = Handler::DumpRegisters;
        slots[SYSCALL_LOAD_PROGRAM as usize] = Handler::LoadProgram;
        slots[SYSCALL_BREAKPOINT as usize] = Handler::Breakpoint;
        Self { slots }
    }

    pub fn register(mut self, number: u32, handler: Handler) -> Result<Self, SyscallError> {
        let slot = self
            .slots
            .get_mut(number as usize)
            .ok_or(SyscallError::OutOfRange(number))?;
        *slot = handler;
        Ok(self)
    }

    /// Out-of-range numbers read as `Unknown`.
    pub fn lookup(&self, number: u32) -> Handler {
        self.slots
            .get(number as usize)
            .copied()
            .unwrap_or(Handler::Unknown)
    }
}

impl Default for SyscallTable {
    fn default() -> Self {
        Self::standard()
    }
}

lazy_static! {
    /// The process-wide table, fixed at first use.
    pub static ref SYSCALL_TABLE: SyscallTable = SyscallTable::standard();
}
