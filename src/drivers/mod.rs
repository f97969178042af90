pub mod uart;

pub use uart::Uart;
