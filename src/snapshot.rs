//! Register dump in the `x<index>: 0x<hex>` text form the host terminal
//! prints verbatim.

use crate::channel::ByteChannel;
use crate::context::RegisterFile;

/// Emit one line per register, x1 first:
///
/// ```text
/// x1: 0x00000000
/// x2: 0x00010FF0
/// ...
/// ```
///
/// Values are always eight zero-padded uppercase hex digits.
pub fn render<C: ByteChannel + ?Sized>(regs: &RegisterFile, chan: &mut C) {
    trace!("register dump");
    for (index, value) in regs.iter() {
        chan.print(format_args!("x{}: 0x{:08X}\n", index, value));
    }
}
