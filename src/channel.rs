use core::fmt;

/// Blocking byte-at-a-time transport between the monitor and the host.
///
/// Both operations spin until the peer is ready. There is no timeout and no
/// error path: a stalled peer stalls the whole machine.
pub trait ByteChannel {
    fn send(&mut self, byte: u8);

    fn receive(&mut self) -> u8;

    fn write_str(&mut self, s: &str) {
        for c in s.bytes() {
            self.send(c);
        }
    }

    /// Formatted output, used as `chan.print(format_args!(...))`.
    fn print(&mut self, args: fmt::Arguments) {
        let _ = fmt::write(&mut Writer(self), args);
    }
}

impl<C: ByteChannel + ?Sized> ByteChannel for &mut C {
    fn send(&mut self, byte: u8) {
        (**self).send(byte)
    }

    fn receive(&mut self) -> u8 {
        (**self).receive()
    }
}

/// Adapts a channel to `core::fmt::Write`. Never fails.
pub struct Writer<'a, C: ?Sized>(pub &'a mut C);

impl<C: ByteChannel + ?Sized> fmt::Write for Writer<'_, C> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_str(s);
        Ok(())
    }
}
