//! Board layout and build-time knobs.

use core::str::FromStr;
use log::LevelFilter;

/// Memory-mapped UART (DATA at +0x0, STATUS at +0x4).
pub const UART_BASE: usize = 0x0000_1000;

/// Initial stack pointer, the top of on-board RAM.
pub const STACK_TOP: u32 = 0x0001_1000;

/// Where the bios asks the host to place the second-stage program.
pub const DEFAULT_LOAD_ADDR: u32 = 0x0000_4000;

/// Width of `ecall`; the trapped pc is advanced by this much on resume.
pub const INSTRUCTION_WIDTH: u32 = 4;

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

/// Log level baked in at build time from `MONITOR_LOG` (`off`, `error`,
/// `warn`, `info`, `debug`, `trace`). Unset or unparsable means `warn`.
pub fn log_level() -> LevelFilter {
    parse_level(option_env!("MONITOR_LOG"))
}

fn parse_level(raw: Option<&str>) -> LevelFilter {
    raw.and_then(|s| LevelFilter::from_str(s.trim()).ok())
        .unwrap_or(DEFAULT_LOG_LEVEL)
}
