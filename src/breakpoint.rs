use crate::channel::ByteChannel;
use crate::context::RegisterFile;
use crate::snapshot;

pub const CMD_CONTINUE: u8 = b'c';
pub const CMD_DUMP: u8 = b'd';

/// First line sent when the loop is entered; host tools key on it.
pub const BREAKPOINT_BANNER: &str = "Breakpoint";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Continue,
    Dump,
    Ignored(u8),
}

impl From<u8> for Command {
    fn from(byte: u8) -> Self {
        match byte {
            CMD_CONTINUE => Command::Continue,
            CMD_DUMP => Command::Dump,
            other => Command::Ignored(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakpointState {
    Waiting,
    Dumping,
    Resuming,
}

impl BreakpointState {
    /// Transition on one operator command. Only `Waiting` reads input;
    /// `Dumping` returns to `Waiting` once the dump is out, and `Resuming`
    /// is terminal.
    pub fn next(self, cmd: Command) -> Self {
        match (self, cmd) {
            (BreakpointState::Waiting, Command::Continue) => BreakpointState::Resuming,
            (BreakpointState::Waiting, Command::Dump) => BreakpointState::Dumping,
            (BreakpointState::Waiting, Command::Ignored(_)) => BreakpointState::Waiting,
            (BreakpointState::Dumping, _) => BreakpointState::Waiting,
            (BreakpointState::Resuming, _) => BreakpointState::Resuming,
        }
    }
}

/// Hold the machine until the operator sends `c`. Each `d` dumps `regs`,
/// which the caller captured at trap entry so the dump shows the stopped
/// program rather than this loop. Other bytes are dropped silently.
///
/// Returns the number of dumps performed.
pub fn run<C: ByteChannel + ?Sized>(chan: &mut C, regs: &RegisterFile) -> usize {
    chan.write_str(BREAKPOINT_BANNER);
    chan.write_str("\n");
    let mut dumps = 0;
    let mut state = BreakpointState::Waiting;
    loop {
        match state {
            BreakpointState::Waiting => {
                let cmd = Command::from(chan.receive());
                trace!("breakpoint: {:?}", cmd);
                state = state.next(cmd);
            }
            BreakpointState::Dumping => {
                snapshot::render(regs, chan);
                dumps += 1;
                state = state.next(Command::Dump);
            }
            BreakpointState::Resuming => break,
        }
    }
    chan.write_str("Continuing\n");
    dumps
}
