//! Pin descriptor tables.
//!
//! A logical GPIO number is an index into a static table of [PinDescriptor]s. The table is
//! board specific and fixed at build time.
use arbitrary_int::u3;
use wmt::gpio::BANK_SIZE;

/// Static description of one GPIO pad.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PinDescriptor {
    label: &'static str,
    bank_offset: u8,
    bit_shift: u3,
    irq_number: Option<u16>,
}

impl PinDescriptor {
    /// Panics if `bank_offset` lies outside of a bank or `bit_shift` is larger than 7. In a
    /// `const` table, this is a compile time error.
    pub const fn new(
        label: &'static str,
        bank_offset: u8,
        bit_shift: u8,
        irq_number: Option<u16>,
    ) -> Self {
        assert!((bank_offset as usize) < BANK_SIZE, "bank offset out of range");
        Self {
            label,
            bank_offset,
            bit_shift: u3::new(bit_shift),
            irq_number,
        }
    }

    #[inline]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Byte offset of this pin inside every bank.
    #[inline]
    pub const fn bank_offset(&self) -> u8 {
        self.bank_offset
    }

    #[inline]
    pub const fn bit_shift(&self) -> u3 {
        self.bit_shift
    }

    /// Interrupt line for the external interrupt controller.
    #[inline]
    pub const fn irq_number(&self) -> Option<u16> {
        self.irq_number
    }
}

/// Handle to a static pin table.
#[derive(Debug, Copy, Clone)]
pub struct PinTable(&'static [PinDescriptor]);

impl PinTable {
    pub const fn new(pins: &'static [PinDescriptor]) -> Self {
        Self(pins)
    }

    /// Table of the WM8880 reference board.
    pub const fn wm8880() -> Self {
        Self(&WM8880_PINS)
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub const fn is_valid_pin(&self, pin: usize) -> bool {
        pin < self.0.len()
    }

    #[inline]
    pub fn get(&self, pin: usize) -> Option<&'static PinDescriptor> {
        self.0.get(pin)
    }

    /// Logical pin number of the pin with the given label.
    pub fn find(&self, label: &str) -> Option<usize> {
        self.0.iter().position(|desc| desc.label == label)
    }

    pub fn iter(&self) -> core::slice::Iter<'static, PinDescriptor> {
        self.0.iter()
    }
}

impl Default for PinTable {
    fn default() -> Self {
        Self::wm8880()
    }
}

const fn pin(label: &'static str, bank_offset: u8, bit_shift: u8, irq: u16) -> PinDescriptor {
    PinDescriptor::new(label, bank_offset, bit_shift, Some(irq))
}

const fn pin_no_irq(label: &'static str, bank_offset: u8, bit_shift: u8) -> PinDescriptor {
    PinDescriptor::new(label, bank_offset, bit_shift, None)
}

/// Pin table of the WM8880 reference board, indexed by logical GPIO number.
pub const WM8880_PINS: [PinDescriptor; 48] = [
    // Dedicated GPIOs, wired to the GPIO interrupt lines.
    pin("gpio0", 0x00, 0, 0),
    pin("gpio1", 0x00, 1, 1),
    pin("gpio2", 0x00, 2, 2),
    pin("gpio3", 0x00, 3, 3),
    pin("gpio4", 0x00, 4, 4),
    pin("gpio5", 0x00, 5, 5),
    pin("gpio6", 0x00, 6, 6),
    pin("gpio7", 0x00, 7, 7),
    pin("wakeup0", 0x01, 0, 8),
    pin("wakeup1", 0x01, 1, 9),
    pin("wakeup3", 0x01, 3, 10),
    pin("suspgpio0", 0x01, 5, 11),
    pin("suspgpio1", 0x01, 6, 12),
    pin("cirin", 0x01, 7, 13),
    // Keypad
    pin("kpadrow0", 0x02, 0, 14),
    pin("kpadrow1", 0x02, 1, 15),
    pin("kpadcol0", 0x02, 4, 16),
    pin("kpadcol1", 0x02, 5, 17),
    // SD card 0
    pin_no_irq("sd0clk", 0x03, 0),
    pin_no_irq("sd0cmd", 0x03, 1),
    pin("sd0wp", 0x03, 2, 18),
    pin_no_irq("sd0data0", 0x03, 3),
    pin_no_irq("sd0data1", 0x03, 4),
    pin_no_irq("sd0data2", 0x03, 5),
    pin_no_irq("sd0data3", 0x03, 6),
    pin("sd0cd", 0x03, 7, 19),
    // I2C
    pin_no_irq("i2c0scl", 0x05, 0),
    pin_no_irq("i2c0sda", 0x05, 1),
    pin_no_irq("i2c1scl", 0x05, 2),
    pin_no_irq("i2c1sda", 0x05, 3),
    pin_no_irq("i2c2scl", 0x05, 4),
    pin_no_irq("i2c2sda", 0x05, 5),
    // UART
    pin_no_irq("uart0txd", 0x06, 0),
    pin_no_irq("uart0rxd", 0x06, 1),
    pin_no_irq("uart0rts", 0x06, 2),
    pin_no_irq("uart0cts", 0x06, 3),
    pin_no_irq("uart1txd", 0x06, 4),
    pin_no_irq("uart1rxd", 0x06, 5),
    // SPI
    pin_no_irq("spi0clk", 0x07, 0),
    pin_no_irq("spi0miso", 0x07, 1),
    pin_no_irq("spi0mosi", 0x07, 2),
    pin_no_irq("spi0ss0", 0x07, 3),
    // PWM and misc
    pin_no_irq("pwmout0", 0x0A, 0),
    pin_no_irq("pwmout1", 0x0A, 1),
    pin("c24mhzclki", 0x0B, 2, 20),
    pin_no_irq("clkout", 0x0B, 3),
    pin("hdmicec", 0x1E, 0, 21),
    pin("hdmihpd", 0x1E, 1, 22),
];

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn board_table_has_unique_bits() {
        let mut seen = BTreeSet::new();
        for desc in PinTable::wm8880().iter() {
            assert!(
                seen.insert((desc.bank_offset(), desc.bit_shift().value())),
                "{} shares its bit with another pin",
                desc.label()
            );
        }
    }

    #[test]
    fn board_table_has_unique_labels() {
        let table = PinTable::wm8880();
        for (idx, desc) in table.iter().enumerate() {
            assert_eq!(table.find(desc.label()), Some(idx));
        }
        assert_eq!(table.find("does-not-exist"), None);
    }

    #[test]
    fn validity() {
        let table = PinTable::wm8880();
        assert!(table.is_valid_pin(0));
        assert!(table.is_valid_pin(table.len() - 1));
        assert!(!table.is_valid_pin(table.len()));
        assert!(!table.is_valid_pin(usize::MAX));
        assert!(table.get(table.len()).is_none());
    }

    #[test]
    fn descriptor_fields() {
        let desc = PinTable::wm8880().get(16).unwrap();
        assert_eq!(desc.label(), "kpadcol0");
        assert_eq!(desc.bank_offset(), 0x02);
        assert_eq!(desc.bit_shift(), u3::new(4));
        assert_eq!(desc.irq_number(), Some(16));
    }

    #[test]
    #[should_panic]
    fn invalid_shift_panics() {
        let _ = PinDescriptor::new("bad", 0, 8, None);
    }

    #[test]
    #[should_panic]
    fn invalid_bank_offset_panics() {
        let _ = PinDescriptor::new("bad", 0x40, 0, None);
    }
}
