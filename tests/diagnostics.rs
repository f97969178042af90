mod common;

use std::sync::{Arc, Mutex};

use common::{ecall_frame, VecMemory};
use log::LevelFilter;
use monitor::logging::ChannelLogger;
use monitor::{config, ByteChannel, Monitor, SYSCALL_TABLE};

/// Output-only link shared by the monitor and the logger, as the UART is on
/// the board.
#[derive(Clone, Default)]
struct SharedLink(Arc<Mutex<Vec<u8>>>);

impl SharedLink {
    fn take_text(&self) -> String {
        let bytes = std::mem::take(&mut *self.0.lock().unwrap());
        String::from_utf8(bytes).unwrap()
    }
}

impl ByteChannel for SharedLink {
    fn send(&mut self, byte: u8) {
        self.0.lock().unwrap().push(byte);
    }

    fn receive(&mut self) -> u8 {
        panic!("no input on this link")
    }
}

// One logger per process, so everything lives in this single test.
#[test]
fn each_diagnostic_appears_once_on_a_shared_link() {
    let link = SharedLink::default();
    let logger: &'static ChannelLogger<SharedLink> =
        Box::leak(Box::new(ChannelLogger::new(link.clone())));
    log::set_logger(logger).unwrap();
    log::set_max_level(config::log_level());

    let mut monitor = Monitor::new(link.clone(), VecMemory::default(), *SYSCALL_TABLE);

    monitor.handle_trap(&mut ecall_frame(5, 0, 0x200));
    let text = link.take_text();
    assert_eq!(text, "Trap occurred!\nUnknown syscall\n");
    assert_eq!(text.to_lowercase().matches("unknown syscall").count(), 1);

    let mut frame = ecall_frame(0, 0, 0x200);
    frame.mcause = 2;
    monitor.handle_trap(&mut frame);
    let text = link.take_text();
    assert_eq!(text, "Trap occurred!\nUnexpected trap: 0x00000002\n");

    // The logger is live on the link; only its level keeps it quiet.
    log::set_max_level(LevelFilter::Debug);
    monitor.handle_trap(&mut ecall_frame(5, 0, 0x200));
    let text = link.take_text();
    assert!(text.contains("[DEBUG] unknown syscall 5\n"));
    assert_eq!(text.matches("Unknown syscall\n").count(), 1);
}
