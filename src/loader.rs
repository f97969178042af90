//! Program loading over the byte channel.
//!
//! Wire format: raw payload bytes, no header and no length, followed by four
//! `0xFF` bytes. Payload bytes land verbatim at `base..base + n`; the
//! terminating run is consumed but never stored.
//!
//! There is no escaping. A payload that itself contains four consecutive
//! `0xFF` bytes ends the load early and the rest of the stream is executed
//! as whatever it happens to be. A payload ending in `0xFF` loses those
//! trailing bytes to the terminator. Senders must avoid both patterns;
//! `frame` refuses to build such a stream. A stream that never sends the
//! terminator blocks forever.

use core::fmt;
use core::iter::{self, Chain, Copied, Repeat, Take};
use core::slice;

use crate::channel::ByteChannel;
use crate::memory::Memory;
use crate::syscall::Outcome;

pub const SENTINEL: u8 = 0xFF;
pub const SENTINEL_RUN: usize = 4;

/// Prefix of the line announcing that the monitor waits for a program.
pub const LOAD_REQUEST: &str = "Load program";

/// What a single received byte did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `n` bytes were committed to memory: any held-back `0xFF`s plus this
    /// byte.
    Stored(usize),
    /// A `0xFF` was held back; the run is now this long.
    Held(usize),
    /// The terminating run is complete.
    Complete,
}

/// Cursor plus sentinel run counter for one load.
///
/// `0xFF` bytes are held back while a run is in progress. If the run is
/// broken before reaching four, the held bytes are written in order ahead of
/// the breaking byte, so short runs of `0xFF` inside a payload survive
/// intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSession {
    base: u32,
    cursor: u32,
    run: usize,
}

impl LoadSession {
    pub fn new(base: u32) -> Self {
        Self {
            base,
            cursor: base,
            run: 0,
        }
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    /// Next address to be written.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Consecutive `0xFF` bytes seen and not yet written.
    pub fn run(&self) -> usize {
        self.run
    }

    pub fn bytes_written(&self) -> u32 {
        self.cursor.wrapping_sub(self.base)
    }

    pub fn is_complete(&self) -> bool {
        self.run == SENTINEL_RUN
    }

    pub fn feed<M: Memory + ?Sized>(&mut self, byte: u8, mem: &mut M) -> Step {
        debug_assert!(!self.is_complete(), "fed a finished load session");
        if byte == SENTINEL {
            self.run += 1;
            if self.is_complete() {
                return Step::Complete;
            }
            return Step::Held(self.run);
        }

        let stored = self.run + 1;
        for _ in 0..self.run {
            self.store(SENTINEL, mem);
        }
        self.run = 0;
        self.store(byte, mem);
        Step::Stored(stored)
    }

    fn store<M: Memory + ?Sized>(&mut self, byte: u8, mem: &mut M) {
        mem.write_byte(self.cursor, byte);
        self.cursor = self.cursor.wrapping_add(1);
    }
}

/// Copy a framed program from `chan` to `base` and hand back the transfer
/// to it. Blocks until the terminator arrives.
pub fn load_program<C, M>(chan: &mut C, mem: &mut M, base: u32) -> Outcome
where
    C: ByteChannel + ?Sized,
    M: Memory + ?Sized,
{
    chan.print(format_args!("{} at 0x{:08X}\n", LOAD_REQUEST, base));
    debug!("load: waiting for program at {:#x}", base);

    let mut session = LoadSession::new(base);
    loop {
        if let Step::Complete = session.feed(chan.receive(), mem) {
            break;
        }
    }
    mem.sync();

    debug!(
        "load: {} bytes at {:#x}..{:#x}",
        session.bytes_written(),
        base,
        session.cursor()
    );
    chan.print(format_args!(
        "Program loaded: 0x{:08X} bytes\n",
        session.bytes_written()
    ));
    chan.print(format_args!("Jumping to 0x{:08X}\n", base));
    Outcome::Transfer(base)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The payload holds a terminating run starting at `offset`.
    SentinelInPayload { offset: usize },
    /// The payload ends in `0xFF`, which would merge with the terminator.
    TrailingSentinel,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::SentinelInPayload { offset } => write!(
                f,
                "payload contains {} consecutive 0x{:02X} bytes at offset {}",
                SENTINEL_RUN, SENTINEL, offset
            ),
            FrameError::TrailingSentinel => {
                write!(f, "payload ends in 0x{:02X}", SENTINEL)
            }
        }
    }
}

/// Offset of the first run of four `0xFF` bytes in `payload`, if any.
pub fn find_sentinel_run(payload: &[u8]) -> Option<usize> {
    payload
        .windows(SENTINEL_RUN)
        .position(|w| w.iter().all(|b| *b == SENTINEL))
}

pub type Framed<'a> = Chain<Copied<slice::Iter<'a, u8>>, Take<Repeat<u8>>>;

/// The byte stream a sender puts on the wire for `payload`.
pub fn frame(payload: &[u8]) -> Result<Framed<'_>, FrameError> {
    if let Some(offset) = find_sentinel_run(payload) {
        return Err(FrameError::SentinelInPayload { offset });
    }
    if payload.last() == Some(&SENTINEL) {
        return Err(FrameError::TrailingSentinel);
    }
    Ok(payload
        .iter()
        .copied()
        .chain(iter::repeat(SENTINEL).take(SENTINEL_RUN)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    struct Recorder(Vec<(u32, u8)>);

    impl Memory for Recorder {
        fn write_byte(&mut self, addr: u32, byte: u8) {
            self.0.push((addr, byte));
        }
    }

    #[test]
    fn run_counter_tracks_held_bytes() {
        let mut mem = Recorder(Vec::new());
        let mut session = LoadSession::new(0x10);
        assert_eq!(session.feed(0xFF, &mut mem), Step::Held(1));
        assert_eq!(session.feed(0xFF, &mut mem), Step::Held(2));
        assert_eq!(session.run(), 2);
        assert!(mem.0.is_empty());
        assert_eq!(session.feed(0x00, &mut mem), Step::Stored(3));
        assert_eq!(session.run(), 0);
        assert_eq!(mem.0, vec![(0x10, 0xFF), (0x11, 0xFF), (0x12, 0x00)]);
        assert_eq!(session.cursor(), 0x13);
    }

    #[test]
    fn terminator_is_not_stored() {
        let mut mem = Recorder(Vec::new());
        let mut session = LoadSession::new(0x10);
        session.feed(0x13, &mut mem);
        for _ in 0..3 {
            session.feed(0xFF, &mut mem);
        }
        assert_eq!(session.feed(0xFF, &mut mem), Step::Complete);
        assert!(session.is_complete());
        assert_eq!(session.bytes_written(), 1);
        assert_eq!(session.base(), 0x10);
        assert_eq!(mem.0, vec![(0x10, 0x13)]);
    }

    #[test]
    fn frame_rejects_terminator_in_payload() {
        assert_eq!(find_sentinel_run(&[1, 0xFF, 0xFF, 0xFF, 2]), None);
        assert_eq!(
            frame(&[1, 2, 0xFF, 0xFF, 0xFF, 0xFF]).err(),
            Some(FrameError::SentinelInPayload { offset: 2 })
        );
        assert_eq!(frame(&[7, 0xFF]).err(), Some(FrameError::TrailingSentinel));
        let wire: Vec<u8> = frame(&[0xFF, 7]).unwrap().collect();
        assert_eq!(wire, vec![0xFF, 7, 0xFF, 0xFF, 0xFF, 0xFF]);
    }
}
