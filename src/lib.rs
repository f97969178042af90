#![cfg_attr(not(test), no_std)]

cfg_if::cfg_if! {
  if #[cfg(target_arch = "riscv32")] {
      #[path = "arch/riscv32/mod.rs"]
      pub mod arch;
      pub mod runtime;
      pub mod sys;
  }
}

#[macro_use]
extern crate log;

pub mod breakpoint;
pub mod channel;
pub mod config;
pub mod context;
pub mod drivers;
pub mod loader;
pub mod logging;
pub mod memory;
pub mod snapshot;
pub mod syscall;
pub mod trap;

pub use channel::ByteChannel;
pub use context::{RegisterFile, TrapFrame};
pub use memory::Memory;
pub use syscall::{Handler, Outcome, SyscallRequest, SyscallTable, SYSCALL_TABLE};
pub use trap::{Monitor, TrapCause};
