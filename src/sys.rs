//! Syscall wrappers for code running on the board.

use core::arch::asm;

use crate::syscall::{SYSCALL_BREAKPOINT, SYSCALL_DUMP_REGISTERS, SYSCALL_LOAD_PROGRAM};

/// Raw `ecall`. The monitor restores every register on return.
#[inline(always)]
pub fn syscall(number: u32, arg: u32) {
    unsafe { asm!("ecall", in("a7") number, in("a0") arg) };
}

pub fn dump_registers() {
    syscall(SYSCALL_DUMP_REGISTERS, 0);
}

/// Stop and wait for the operator (`d` dumps, `c` continues).
pub fn breakpoint() {
    syscall(SYSCALL_BREAKPOINT, 0);
}

/// Ask the host for a program, place it at `base` and run it.
pub fn load_program(base: u32) -> ! {
    unsafe {
        asm!(
            "ecall",
            in("a7") SYSCALL_LOAD_PROGRAM,
            in("a0") base,
            options(noreturn)
        )
    };
}

/// Low 32 bits of the `cycle` counter (CSR 0xC00).
#[inline(always)]
pub fn read_cycle() -> u32 {
    riscv::register::cycle::read() as u32
}
