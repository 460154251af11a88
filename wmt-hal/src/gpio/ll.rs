//! Low-level GPIO access module.
//!
//! All pin operations end up in a single-bit read-modify-write on one byte of a bank. The
//! sequence is not atomic. If an interrupt handler touches the same banks, the caller has to
//! serialize the accesses.
use arbitrary_int::u3;
use wmt::gpio::{Bank, MmioRegisters};

use super::pins::PinDescriptor;

/// Byte-addressable register file backing the GPIO banks.
///
/// Offsets are relative to the register block base.
pub trait RegisterFile {
    fn read_byte(&self, offset: usize) -> u8;

    fn write_byte(&mut self, offset: usize, value: u8);

    #[inline]
    fn read_bit(&self, offset: usize, shift: u3) -> bool {
        (self.read_byte(offset) >> shift.value()) & 0b1 == 1
    }

    /// Sets or clears exactly one bit. The other bits of the byte are written back unchanged.
    #[inline]
    fn modify_bit(&mut self, offset: usize, shift: u3, set: bool) {
        let mut val = self.read_byte(offset);
        if set {
            val |= 1 << shift.value();
        } else {
            val &= !(1 << shift.value());
        }
        self.write_byte(offset, val);
    }
}

// Bank offsets of the pin descriptors are range-checked when the descriptor is built, and the
// driver never writes the input value bank.
impl RegisterFile for MmioRegisters<'_> {
    #[inline]
    fn read_byte(&self, offset: usize) -> u8 {
        MmioRegisters::read_byte(self, offset).unwrap()
    }

    #[inline]
    fn write_byte(&mut self, offset: usize, value: u8) {
        MmioRegisters::write_byte(self, offset, value).unwrap()
    }
}

/// Offset of the byte holding the pin's bit inside the given bank.
#[inline(always)]
pub const fn pin_reg_offset(bank: Bank, pin: &PinDescriptor) -> usize {
    bank.offset() + pin.bank_offset() as usize
}

#[inline]
pub fn read_pin_bit<R: RegisterFile + ?Sized>(regs: &R, bank: Bank, pin: &PinDescriptor) -> bool {
    regs.read_bit(pin_reg_offset(bank, pin), pin.bit_shift())
}

#[inline]
pub fn modify_pin_bit<R: RegisterFile + ?Sized>(
    regs: &mut R,
    bank: Bank,
    pin: &PinDescriptor,
    set: bool,
) {
    regs.modify_bit(pin_reg_offset(bank, pin), pin.bit_shift(), set)
}
