//! GPIO support module for the WMT SoC family.
//!
//! The [Gpio] driver owns a handle to the register block and a [pins::PinTable] which maps
//! logical GPIO numbers to their bank offset and bit. Every operation checks the pin number
//! against the table before any register is touched.
//!
//! The driver expects to be the only user of the register block. Nothing is locked, so code
//! which also accesses the banks from an interrupt handler needs to add its own serialization.
pub mod config;
pub mod ll;
#[cfg(test)]
mod mock;
pub mod pins;

use ll::{RegisterFile, modify_pin_bit, read_pin_bit};
use pins::{PinDescriptor, PinTable};
use wmt::gpio::{Bank, MmioRegisters};

pub use embedded_hal::digital::PinState;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid GPIO number {0}")]
    InvalidPin(usize),
    #[error("invalid pull mode {0}")]
    InvalidPullMode(u8),
}

impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

/// Pull resistor configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, num_enum::TryFromPrimitive)]
#[repr(u8)]
pub enum Pull {
    None = 0,
    Up = 1,
    Down = 2,
}

pub struct Gpio<R: RegisterFile = MmioRegisters<'static>> {
    regs: R,
    pins: PinTable,
}

impl Gpio {
    /// Create a driver for the fixed GPIO register block and the WM8880 pin table.
    ///
    /// # Safety
    ///
    /// Circumvents ownership of the register block. The caller must ensure that no other
    /// driver accesses the GPIO banks concurrently.
    pub unsafe fn steal() -> Self {
        Self::new(
            unsafe { wmt::gpio::Registers::new_mmio_fixed() },
            PinTable::wm8880(),
        )
    }
}

impl<R: RegisterFile> Gpio<R> {
    pub const fn new(regs: R, pins: PinTable) -> Self {
        Self { regs, pins }
    }

    #[inline]
    pub const fn pins(&self) -> &PinTable {
        &self.pins
    }

    #[inline]
    pub const fn regs(&self) -> &R {
        &self.regs
    }

    #[inline]
    pub fn release_regs(self) -> R {
        self.regs
    }

    #[inline]
    pub const fn is_valid_pin(&self, pin: usize) -> bool {
        self.pins.is_valid_pin(pin)
    }

    #[inline]
    fn descriptor(&self, pin: usize) -> Result<&'static PinDescriptor, Error> {
        self.pins.get(pin).ok_or(Error::InvalidPin(pin))
    }

    /// Interrupt line of the pin for the external interrupt controller.
    pub fn irq_number(&self, pin: usize) -> Result<Option<u16>, Error> {
        Ok(self.descriptor(pin)?.irq_number())
    }

    /// Claim the pin for the GPIO function.
    pub fn request(&mut self, pin: usize) -> Result<(), Error> {
        let desc = self.descriptor(pin)?;
        modify_pin_bit(&mut self.regs, Bank::Enable, desc, true);
        Ok(())
    }

    /// Hand the pin back to its alternate function. Releasing a released pin does nothing.
    pub fn release(&mut self, pin: usize) -> Result<(), Error> {
        let desc = self.descriptor(pin)?;
        modify_pin_bit(&mut self.regs, Bank::Enable, desc, false);
        Ok(())
    }

    /// Sampled pad level, regardless of the direction.
    pub fn read_input(&self, pin: usize) -> Result<bool, Error> {
        let desc = self.descriptor(pin)?;
        Ok(read_pin_bit(&self.regs, Bank::InValue, desc))
    }

    /// Latched output level.
    pub fn read_output(&self, pin: usize) -> Result<bool, Error> {
        let desc = self.descriptor(pin)?;
        Ok(read_pin_bit(&self.regs, Bank::OutValue, desc))
    }

    /// The level is latched even if the pin is currently an input.
    pub fn write_output(&mut self, pin: usize, level: PinState) -> Result<(), Error> {
        let desc = self.descriptor(pin)?;
        modify_pin_bit(&mut self.regs, Bank::OutValue, desc, level == PinState::High);
        Ok(())
    }

    pub fn is_output(&self, pin: usize) -> Result<bool, Error> {
        let desc = self.descriptor(pin)?;
        Ok(read_pin_bit(&self.regs, Bank::Direction, desc))
    }

    /// Claims the pin and configures it as an input.
    pub fn set_direction_input(&mut self, pin: usize) -> Result<(), Error> {
        let desc = self.descriptor(pin)?;
        log::trace!("GPIO {} ({}) -> input", pin, desc.label());
        self.request(pin)?;
        modify_pin_bit(&mut self.regs, Bank::Direction, desc, false);
        Ok(())
    }

    /// Claims the pin and configures it as an output.
    ///
    /// The output level is latched before the direction bit is set, so the pad never drives a
    /// stale level.
    pub fn set_direction_output(&mut self, pin: usize, init_level: PinState) -> Result<(), Error> {
        let desc = self.descriptor(pin)?;
        log::trace!("GPIO {} ({}) -> output {:?}", pin, desc.label(), init_level);
        self.request(pin)?;
        self.write_output(pin, init_level)?;
        modify_pin_bit(&mut self.regs, Bank::Direction, desc, true);
        Ok(())
    }

    pub fn set_pull(&mut self, pin: usize, pull: Pull) -> Result<(), Error> {
        let desc = self.descriptor(pin)?;
        match pull {
            // Pull direction is irrelevant while disabled and stays untouched.
            Pull::None => modify_pin_bit(&mut self.regs, Bank::PullEnable, desc, false),
            Pull::Up => {
                modify_pin_bit(&mut self.regs, Bank::PullEnable, desc, true);
                modify_pin_bit(&mut self.regs, Bank::PullControl, desc, true);
            }
            Pull::Down => {
                modify_pin_bit(&mut self.regs, Bank::PullEnable, desc, true);
                modify_pin_bit(&mut self.regs, Bank::PullControl, desc, false);
            }
        }
        Ok(())
    }

    /// Same as [Self::set_pull] for a raw pull selector as used by C board code.
    pub fn set_pull_raw(&mut self, pin: usize, raw: u8) -> Result<(), Error> {
        self.descriptor(pin)?;
        let pull = Pull::try_from(raw).map_err(|e| Error::InvalidPullMode(e.number))?;
        self.set_pull(pin, pull)
    }

    /// Mask or unmask the interrupt of the pin.
    pub fn set_irq_masked(&mut self, pin: usize, masked: bool) -> Result<(), Error> {
        let desc = self.descriptor(pin)?;
        modify_pin_bit(&mut self.regs, Bank::InterruptMask, desc, masked);
        Ok(())
    }

    pub fn is_irq_pending(&self, pin: usize) -> Result<bool, Error> {
        let desc = self.descriptor(pin)?;
        Ok(read_pin_bit(&self.regs, Bank::InterruptStatus, desc))
    }

    /// Status bits are write-one-to-clear, so only the bit of this pin is written.
    pub fn clear_irq_pending(&mut self, pin: usize) -> Result<(), Error> {
        let desc = self.descriptor(pin)?;
        self.regs.write_byte(
            ll::pin_reg_offset(Bank::InterruptStatus, desc),
            1 << desc.bit_shift().value(),
        );
        Ok(())
    }

    /// Borrow a single pin as an [embedded_hal] digital pin.
    pub fn flex(&mut self, pin: usize) -> Result<Flex<'_, R>, Error> {
        self.descriptor(pin)?;
        Ok(Flex { gpio: self, pin })
    }
}

/// Single pin borrowed from a [Gpio] driver.
///
/// The pin direction is not changed on construction. The [embedded_hal] traits only access the
/// input and output value banks.
pub struct Flex<'a, R: RegisterFile> {
    gpio: &'a mut Gpio<R>,
    pin: usize,
}

impl<R: RegisterFile> Flex<'_, R> {
    #[inline]
    pub fn pin(&self) -> usize {
        self.pin
    }

    #[inline]
    pub fn configure_as_input(&mut self) -> Result<(), Error> {
        self.gpio.set_direction_input(self.pin)
    }

    #[inline]
    pub fn configure_as_output(&mut self, init_level: PinState) -> Result<(), Error> {
        self.gpio.set_direction_output(self.pin, init_level)
    }

    #[inline]
    pub fn set_pull(&mut self, pull: Pull) -> Result<(), Error> {
        self.gpio.set_pull(self.pin, pull)
    }
}

impl<R: RegisterFile> embedded_hal::digital::ErrorType for Flex<'_, R> {
    type Error = Error;
}

impl<R: RegisterFile> embedded_hal::digital::InputPin for Flex<'_, R> {
    /// Reads the input state of the pin, regardless of configured mode.
    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.gpio.read_input(self.pin)
    }

    /// Reads the input state of the pin, regardless of configured mode.
    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.gpio.read_input(self.pin)?)
    }
}

impl<R: RegisterFile> embedded_hal::digital::OutputPin for Flex<'_, R> {
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.gpio.write_output(self.pin, PinState::Low)
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.gpio.write_output(self.pin, PinState::High)
    }
}

impl<R: RegisterFile> embedded_hal::digital::StatefulOutputPin for Flex<'_, R> {
    #[inline]
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        self.gpio.read_output(self.pin)
    }

    #[inline]
    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.gpio.read_output(self.pin)?)
    }
}
