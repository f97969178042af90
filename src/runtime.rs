use core::panic::PanicInfo;

use lazy_static::*;
use spin::Mutex;

use crate::channel::ByteChannel;
use crate::config;
use crate::context::TrapFrame;
use crate::drivers::Uart;
use crate::logging::ChannelLogger;
use crate::memory::PhysicalMemory;
use crate::snapshot;
use crate::syscall::SYSCALL_TABLE;
use crate::trap::Monitor;

pub type BoardMonitor = Monitor<Uart, PhysicalMemory>;

static LOGGER: ChannelLogger<Uart> = ChannelLogger::new(Uart::new(config::UART_BASE));

lazy_static! {
    // Single hart, and the trap handler is the only user once booted.
    pub static ref GLOBAL_MONITOR: Mutex<BoardMonitor> = Mutex::new(Monitor::new(
        Uart::new(config::UART_BASE),
        // SAFETY: the board has one flat RAM and the loader only writes
        // where the operator tells it to.
        unsafe { PhysicalMemory::new() },
        *SYSCALL_TABLE,
    ));
}

/// Bring the monitor up: logger, masked interrupts, trap vector.
pub fn init() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(config::log_level());
    }
    crate::arch::intr_off();
    lazy_static::initialize(&GLOBAL_MONITOR);
    crate::arch::init_trap_vector();
    info!("monitor ready, uart at {:#x}", config::UART_BASE);
}

/// A fresh handle on the board UART, for output outside any trap.
pub fn console() -> Uart {
    Uart::new(config::UART_BASE)
}

/// Called by `__monitor_trap_entry` with the frame it just filled.
#[no_mangle]
pub extern "C" fn monitor_trap_handler(frame: &mut TrapFrame) {
    match GLOBAL_MONITOR.try_lock() {
        Some(mut monitor) => {
            monitor.handle_trap(frame);
        }
        None => {
            // Trapped while already inside the monitor.
            console().write_str("Nested trap, halting\n");
            halt();
        }
    }
}

pub fn halt() -> ! {
    loop {
        crate::arch::wait_for_interrupt();
    }
}

/// Print where the panic happened and the live registers, then stop.
pub fn report_panic(info: &PanicInfo) -> ! {
    let regs = crate::arch::capture_registers();
    let mut uart = console();
    uart.write_str("=== PANIC ===\n");
    if let Some(location) = info.location() {
        uart.print(format_args!("{}:{}\n", location.file(), location.line()));
    }
    snapshot::render(&regs, &mut uart);
    halt();
}
