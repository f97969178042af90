#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};

use monitor::{ByteChannel, Memory, RegisterFile, TrapFrame};

/// Replays scripted input and records everything sent. Running out of input
/// panics, which is how tests observe a loop that would block forever.
#[derive(Default)]
pub struct ScriptedChannel {
    input: VecDeque<u8>,
    pub output: Vec<u8>,
}

impl ScriptedChannel {
    pub fn new(input: impl IntoIterator<Item = u8>) -> Self {
        Self {
            input: input.into_iter().collect(),
            output: Vec::new(),
        }
    }

    pub fn output_text(&self) -> String {
        String::from_utf8(self.output.clone()).expect("monitor output is ASCII")
    }

    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.output_text().matches(needle).count()
    }
}

impl ByteChannel for ScriptedChannel {
    fn send(&mut self, byte: u8) {
        self.output.push(byte);
    }

    fn receive(&mut self) -> u8 {
        self.input.pop_front().expect("input exhausted")
    }
}

/// Sparse memory recording every store.
#[derive(Default)]
pub struct VecMemory {
    pub bytes: BTreeMap<u32, u8>,
    pub writes: usize,
    pub syncs: usize,
}

impl VecMemory {
    pub fn read(&self, addr: u32, len: usize) -> Vec<Option<u8>> {
        (0..len as u32)
            .map(|i| self.bytes.get(&(addr + i)).copied())
            .collect()
    }
}

impl Memory for VecMemory {
    fn write_byte(&mut self, addr: u32, byte: u8) {
        self.bytes.insert(addr, byte);
        self.writes += 1;
    }

    fn sync(&mut self) {
        self.syncs += 1;
    }
}

/// Registers set to recognisable values: x<i> = 0x1000_0000 + i * 0x0101.
pub fn patterned_registers() -> RegisterFile {
    let mut regs = RegisterFile::default();
    for i in 1..=31 {
        regs.set(i, 0x1000_0000 + (i as u32) * 0x0101);
    }
    regs
}

pub const MCAUSE_ECALL_M: u32 = 11;

pub fn ecall_frame(number: u32, arg: u32, pc: u32) -> TrapFrame {
    let mut regs = patterned_registers();
    regs.set(monitor::context::reg_abi::REG_A7, number);
    regs.set(monitor::context::reg_abi::REG_A0, arg);
    TrapFrame::new(regs, pc, MCAUSE_ECALL_M)
}

/// Parse `x<i>: 0x<hex>` lines back into a register file.
pub fn parse_dump(text: &str) -> Vec<(usize, String, u32)> {
    text.lines()
        .filter(|l| l.starts_with('x'))
        .map(|line| {
            let (name, value) = line.split_once(": 0x").expect("dump line shape");
            let index: usize = name[1..].parse().expect("register index");
            let parsed = u32::from_str_radix(value, 16).expect("hex value");
            (index, value.to_string(), parsed)
        })
        .collect()
}
