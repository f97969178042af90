use crate::channel::ByteChannel;

const UART_DATA: usize = 0x0; // Data register
const UART_STATUS: usize = 0x4; // Status register
const STATUS_TX_READY: u32 = 1 << 0;
const STATUS_RX_READY: u32 = 1 << 1;

/// Polled UART with a DATA/STATUS register pair.
#[derive(Debug, Clone, Copy)]
pub struct Uart {
    base: usize,
}

impl Uart {
    /// The registers at `base` are only touched once bytes are moved, so
    /// constructing a handle is safe; using one on a machine without the
    /// device at `base` is not.
    pub const fn new(base: usize) -> Self {
        Self { base }
    }

    pub fn base(&self) -> usize {
        self.base
    }

    #[inline(always)]
    fn status(&self) -> u32 {
        unsafe { core::ptr::read_volatile((self.base + UART_STATUS) as *const u32) }
    }
}

impl ByteChannel for Uart {
    #[inline(always)]
    fn send(&mut self, byte: u8) {
        while self.status() & STATUS_TX_READY == 0 {
            core::hint::spin_loop();
        }
        unsafe { core::ptr::write_volatile((self.base + UART_DATA) as *mut u32, byte as u32) };
    }

    #[inline(always)]
    fn receive(&mut self) -> u8 {
        while self.status() & STATUS_RX_READY == 0 {
            core::hint::spin_loop();
        }
        let data = unsafe { core::ptr::read_volatile((self.base + UART_DATA) as *const u32) };
        (data & 0xFF) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Registers backed by an ordinary buffer; status reports both ready.
    #[repr(C)]
    struct FakeRegs {
        data: u32,
        status: u32,
    }

    #[test]
    fn moves_bytes_through_data_register() {
        let mut regs = FakeRegs {
            data: 0x1_41,
            status: STATUS_TX_READY | STATUS_RX_READY,
        };
        let base = core::ptr::addr_of_mut!(regs) as usize;
        let mut uart = Uart::new(base);
        assert_eq!(uart.base(), base);
        assert_eq!(uart.receive(), 0x41);
        uart.send(b'z');
        assert_eq!(regs.data, b'z' as u32);
    }
}
