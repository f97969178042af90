//! Serial terminal for the monitor.
//!
//! Echoes every line the board prints. A `Load program` line is answered
//! with the program file framed for the loader; a `Breakpoint` line asks the
//! operator whether to dump registers before continuing.

use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serialport::StopBits;
use structopt::StructOpt;

use monitor::breakpoint::{BREAKPOINT_BANNER, CMD_CONTINUE, CMD_DUMP};
use monitor::loader::{self, LOAD_REQUEST};

#[derive(Debug, StructOpt)]
#[structopt(name = "host", about = "Terminal for the resident monitor")]
struct Opt {
    /// Serial device; picked interactively when omitted
    #[structopt(short, long)]
    port: Option<String>,

    #[structopt(short, long, default_value = "115200")]
    baud: u32,

    /// Program sent on every load request; asked for when omitted
    #[structopt(short = "f", long, parse(from_os_str))]
    program: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
enum Event<'a> {
    LoadRequest,
    Breakpoint,
    Text(&'a str),
}

fn classify(line: &str) -> Option<Event<'_>> {
    let line = line.trim();
    if line.is_empty() {
        None
    } else if line.starts_with(LOAD_REQUEST) {
        Some(Event::LoadRequest)
    } else if line.starts_with(BREAKPOINT_BANNER) {
        Some(Event::Breakpoint)
    } else {
        Some(Event::Text(line))
    }
}

/// `d` dumps and then continues, anything else just continues.
fn breakpoint_reply(answer: &str) -> &'static [u8] {
    match answer.trim() {
        "d" | "D" => &[CMD_DUMP, CMD_CONTINUE],
        _ => &[CMD_CONTINUE],
    }
}

struct Session<W, P> {
    link: W,
    program: Option<PathBuf>,
    ask: P,
}

impl<W, P> Session<W, P>
where
    W: Write,
    P: FnMut(&str) -> io::Result<String>,
{
    fn new(link: W, program: Option<PathBuf>, ask: P) -> Self {
        Self { link, program, ask }
    }

    fn handle_line(&mut self, line: &str) -> Result<()> {
        match classify(line) {
            None => {}
            Some(Event::Text(text)) => println!("{}", text),
            Some(Event::LoadRequest) => {
                println!("{}", line.trim());
                let sent = self.send_program()?;
                println!("Program of {} bytes sent.", sent);
            }
            Some(Event::Breakpoint) => {
                let answer =
                    (self.ask)("Breakpoint hit. Enter 'd' to dump registers or 'c' to continue: ")?;
                self.link.write_all(breakpoint_reply(&answer))?;
                self.link.flush()?;
            }
        }
        Ok(())
    }

    fn send_program(&mut self) -> Result<usize> {
        let path = match &self.program {
            Some(path) => path.clone(),
            None => PathBuf::from((self.ask)("Path to program binary: ")?.trim()),
        };
        let payload =
            fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        let wire: Vec<u8> = loader::frame(&payload)
            .map_err(|e| anyhow!("{}: {}", path.display(), e))?
            .collect();
        self.link.write_all(&wire)?;
        self.link.flush()?;
        Ok(payload.len())
    }
}

fn ask(question: &str) -> io::Result<String> {
    print!("{}", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer)
}

fn choose_port() -> Result<String> {
    let ports = serialport::available_ports().context("listing serial ports")?;
    if ports.is_empty() {
        bail!("no serial ports found");
    }
    println!("Found serial devices:");
    for (i, port) in ports.iter().enumerate() {
        println!("[{}] - {}", i, port.port_name);
    }
    let index: usize = ask("Port: ")?.trim().parse().context("port index")?;
    ports
        .get(index)
        .map(|p| p.port_name.clone())
        .ok_or_else(|| anyhow!("no port {}", index))
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let port_name = match opt.port {
        Some(port) => port,
        None => choose_port()?,
    };
    let port = serialport::new(&port_name, opt.baud)
        .stop_bits(StopBits::Two)
        .timeout(Duration::from_secs(1))
        .open()
        .with_context(|| format!("opening {}", port_name))?;
    println!("Connected to {} at {} baud.", port_name, opt.baud);

    let mut reader = BufReader::new(port.try_clone()?);
    let mut session = Session::new(port, opt.program, ask);
    let mut line = Vec::new();
    loop {
        match reader.read_until(b'\n', &mut line) {
            Ok(_) if line.ends_with(b"\n") => {
                let text = String::from_utf8_lossy(&line).into_owned();
                line.clear();
                if let Err(e) = session.handle_line(&text) {
                    eprintln!("error: {:#}", e);
                }
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
            Err(e) => return Err(e.into()),
        }
    }
}
