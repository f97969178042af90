use core::arch::{asm, global_asm};

use riscv::register::{mstatus, mtvec::{self, TrapMode}};

use crate::context::{RegisterFile, REGISTER_COUNT};

global_asm!(include_str!("trap.S"));

extern "C" {
    pub fn __monitor_trap_entry();
}

/// Point `mtvec` at the trap entry stub (direct mode).
pub(crate) fn init_trap_vector() {
    unsafe { mtvec::write(__monitor_trap_entry as usize, TrapMode::Direct) };
}

pub(crate) fn intr_off() {
    unsafe { mstatus::clear_mie() };
}

pub(crate) fn wait_for_interrupt() {
    unsafe { riscv::asm::wfi() };
}

/// Make stores to instruction memory visible to fetch.
#[inline(always)]
pub(crate) fn fence_i() {
    unsafe { asm!("fence.i", options(nostack)) };
}

/// Copy x1..x31 as they are right now, without going through a call.
///
/// Only meaningful when inlined at the point of interest: whatever the
/// compiler has already done to the registers before this point is what
/// gets reported, and the register holding the buffer address reports that
/// address. Dumps of a trapped program use the trap frame instead.
#[inline(always)]
pub fn capture_registers() -> RegisterFile {
    let mut regs = [0u32; REGISTER_COUNT];
    unsafe {
        asm!(
            "sw x1, 0({0})",
            "sw x2, 4({0})",
            "sw x3, 8({0})",
            "sw x4, 12({0})",
            "sw x5, 16({0})",
            "sw x6, 20({0})",
            "sw x7, 24({0})",
            "sw x8, 28({0})",
            "sw x9, 32({0})",
            "sw x10, 36({0})",
            "sw x11, 40({0})",
            "sw x12, 44({0})",
            "sw x13, 48({0})",
            "sw x14, 52({0})",
            "sw x15, 56({0})",
            "sw x16, 60({0})",
            "sw x17, 64({0})",
            "sw x18, 68({0})",
            "sw x19, 72({0})",
            "sw x20, 76({0})",
            "sw x21, 80({0})",
            "sw x22, 84({0})",
            "sw x23, 88({0})",
            "sw x24, 92({0})",
            "sw x25, 96({0})",
            "sw x26, 100({0})",
            "sw x27, 104({0})",
            "sw x28, 108({0})",
            "sw x29, 112({0})",
            "sw x30, 116({0})",
            "sw x31, 120({0})",
            in(reg) regs.as_mut_ptr(),
            options(nostack, preserves_flags)
        );
    }
    RegisterFile::new(regs)
}
