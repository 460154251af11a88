//! In-memory register file used by the unit tests.
extern crate std;

use core::cell::Cell;
use std::vec::Vec;

use wmt::gpio::{Bank, REGISTER_BLOCK_SIZE};

use super::ll::RegisterFile;

pub struct MockRegisters {
    mem: [u8; REGISTER_BLOCK_SIZE],
    writes: Vec<(usize, u8)>,
    reads: Cell<usize>,
    /// Mirror output value writes into the input value bank.
    loopback: bool,
}

impl MockRegisters {
    pub fn new() -> Self {
        Self {
            mem: [0; REGISTER_BLOCK_SIZE],
            writes: Vec::new(),
            reads: Cell::new(0),
            loopback: false,
        }
    }

    pub fn new_loopback() -> Self {
        Self {
            loopback: true,
            ..Self::new()
        }
    }

    /// Sets a register without recording an access.
    pub fn preset(&mut self, offset: usize, value: u8) {
        self.mem[offset] = value;
    }

    /// Reads a register without recording an access.
    pub fn peek(&self, offset: usize) -> u8 {
        self.mem[offset]
    }

    /// All writes in the order they happened.
    pub fn writes(&self) -> &[(usize, u8)] {
        &self.writes
    }

    pub fn access_count(&self) -> usize {
        self.reads.get() + self.writes.len()
    }

    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.reads.set(0);
    }

    /// Index of the first write to the given register, if any.
    pub fn first_write_to(&self, offset: usize) -> Option<usize> {
        self.writes.iter().position(|(off, _)| *off == offset)
    }
}

impl RegisterFile for MockRegisters {
    fn read_byte(&self, offset: usize) -> u8 {
        self.reads.set(self.reads.get() + 1);
        self.mem[offset]
    }

    fn write_byte(&mut self, offset: usize, value: u8) {
        self.writes.push((offset, value));
        self.mem[offset] = value;
        let out_start = Bank::OutValue.offset();
        if self.loopback && (out_start..out_start + wmt::gpio::BANK_SIZE).contains(&offset) {
            self.mem[offset - out_start + Bank::InValue.offset()] = value;
        }
    }
}
