/// Byte-addressed sink the program loader writes into.
pub trait Memory {
    fn write_byte(&mut self, addr: u32, byte: u8);

    /// Make everything written so far visible to instruction fetch.
    fn sync(&mut self) {}
}

impl<M: Memory + ?Sized> Memory for &mut M {
    fn write_byte(&mut self, addr: u32, byte: u8) {
        (**self).write_byte(addr, byte)
    }

    fn sync(&mut self) {
        (**self).sync()
    }
}

/// The flat physical address space of the board.
#[derive(Debug)]
pub struct PhysicalMemory {
    _private: (),
}

impl PhysicalMemory {
    /// # Safety
    ///
    /// Every address later passed to `write_byte` must be plain RAM that
    /// nothing else (including the monitor's own stack and image) relies on.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Memory for PhysicalMemory {
    fn write_byte(&mut self, addr: u32, byte: u8) {
        unsafe { core::ptr::write_volatile(addr as usize as *mut u8, byte) };
    }

    fn sync(&mut self) {
        #[cfg(target_arch = "riscv32")]
        crate::arch::fence_i();
    }
}
