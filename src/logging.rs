use log::{Log, Metadata, Record};
use spin::Mutex;

use crate::channel::ByteChannel;

/// `log` backend that writes `[LEVEL] message` lines to a channel.
///
/// The lock keeps lines whole; it is never taken from inside the trap
/// handler's own channel writes, which go to the channel directly.
pub struct ChannelLogger<C> {
    chan: Mutex<C>,
}

impl<C> ChannelLogger<C> {
    pub const fn new(chan: C) -> Self {
        Self {
            chan: Mutex::new(chan),
        }
    }

    pub fn into_inner(self) -> C {
        self.chan.into_inner()
    }
}

impl<C: ByteChannel + Send> Log for ChannelLogger<C> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // A log call from a nested trap must not spin on the lock.
        if let Some(mut chan) = self.chan.try_lock() {
            chan.print(format_args!("[{:>5}] {}\n", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, LevelFilter};
    use std::vec::Vec;

    struct Sink(Vec<u8>);

    impl ByteChannel for Sink {
        fn send(&mut self, byte: u8) {
            self.0.push(byte);
        }

        fn receive(&mut self) -> u8 {
            0
        }
    }

    #[test]
    fn formats_level_and_message() {
        log::set_max_level(LevelFilter::Trace);
        let logger = ChannelLogger::new(Sink(Vec::new()));
        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .args(format_args!("unknown syscall {}", 7))
                .build(),
        );
        let text = String::from_utf8(logger.into_inner().0).unwrap();
        assert_eq!(text, "[ WARN] unknown syscall 7\n");
    }
}
