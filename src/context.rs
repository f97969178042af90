use crate::config::INSTRUCTION_WIDTH;
use crate::syscall::Outcome;

/// Number of general-purpose registers saved at a trap (x1..x31; x0 is
/// hardwired to zero and never stored).
pub const REGISTER_COUNT: usize = 31;

#[allow(unused)]
pub mod reg_abi {
    pub const REG_ZERO: usize = 0; // zero constant
    pub const REG_RA: usize = 1; // return address
    pub const REG_SP: usize = 2; // stack pointer
    pub const REG_GP: usize = 3; // global pointer
    pub const REG_TP: usize = 4; // thread pointer
    pub const REG_T0: usize = 5;
    pub const REG_T1: usize = 6;
    pub const REG_T2: usize = 7;
    pub const REG_S0: usize = 8; // frame pointer
    pub const REG_S1: usize = 9;
    pub const REG_A0: usize = 10; // syscall argument
    pub const REG_A1: usize = 11;
    pub const REG_A2: usize = 12;
    pub const REG_A3: usize = 13;
    pub const REG_A4: usize = 14;
    pub const REG_A5: usize = 15;
    pub const REG_A6: usize = 16;
    pub const REG_A7: usize = 17; // syscall number
    pub const REG_S2: usize = 18;
    pub const REG_S3: usize = 19;
    pub const REG_S4: usize = 20;
    pub const REG_S5: usize = 21;
    pub const REG_S6: usize = 22;
    pub const REG_S7: usize = 23;
    pub const REG_S8: usize = 24;
    pub const REG_S9: usize = 25;
    pub const REG_S10: usize = 26;
    pub const REG_S11: usize = 27;
    pub const REG_T3: usize = 28;
    pub const REG_T4: usize = 29;
    pub const REG_T5: usize = 30;
    pub const REG_T6: usize = 31;
}

/// A by-value copy of x1..x31. Slot `i` holds register `x(i + 1)`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct RegisterFile {
    regs: [u32; REGISTER_COUNT],
}

impl RegisterFile {
    pub const fn new(regs: [u32; REGISTER_COUNT]) -> Self {
        Self { regs }
    }

    /// Value of register `x<index>`. `x0` reads as zero, like the hardware.
    ///
    /// Panics if `index > 31`.
    pub fn get(&self, index: usize) -> u32 {
        match index {
            0 => 0,
            _ => self.regs[index - 1],
        }
    }

    /// Writes to `x0` are discarded.
    ///
    /// Panics if `index > 31`.
    pub fn set(&mut self, index: usize, value: u32) {
        if index != 0 {
            self.regs[index - 1] = value;
        }
    }

    /// `(index, value)` pairs in ascending index order, starting at x1.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.regs.iter().enumerate().map(|(i, v)| (i + 1, *v))
    }

    pub fn as_array(&self) -> &[u32; REGISTER_COUNT] {
        &self.regs
    }
}

/// Machine state saved by the trap entry stub. The layout is shared with
/// `arch/riscv32/trap.S`: x1..x31 at word offsets 0..30, then `mepc`, then
/// `mcause`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct TrapFrame {
    pub regs: RegisterFile,
    pub mepc: u32,
    pub mcause: u32,
}

impl TrapFrame {
    pub fn new(regs: RegisterFile, mepc: u32, mcause: u32) -> Self {
        Self { regs, mepc, mcause }
    }

    pub fn get_pc(&self) -> u32 {
        self.mepc
    }

    pub fn get_sp(&self) -> u32 {
        self.regs.get(reg_abi::REG_SP)
    }

    /// Point the saved pc at wherever execution continues after `mret`.
    pub fn apply(&mut self, outcome: Outcome) {
        self.mepc = match outcome {
            Outcome::Resume => self.mepc.wrapping_add(INSTRUCTION_WIDTH),
            Outcome::Transfer(entry) => entry,
        };
    }
}
