#![no_std]
#![no_main]

use core::arch::global_asm;
use core::panic::PanicInfo;

use monitor::{config, runtime, sys, ByteChannel};

global_asm!(
    ".section .text.start, \"ax\"
    .global _start
_start:
    li sp, {stack_top}
    jal ra, bios_main
1:
    j 1b",
    stack_top = const config::STACK_TOP,
);

#[no_mangle]
extern "C" fn bios_main() -> ! {
    let start = sys::read_cycle();
    runtime::init();
    runtime::console().write_str("Hello, UART!\n");
    log::info!(
        "boot took {} cycles",
        sys::read_cycle().wrapping_sub(start)
    );
    sys::load_program(config::DEFAULT_LOAD_ADDR)
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    runtime::report_panic(info)
}
