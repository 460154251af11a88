//! # GPIO register module.
//!
//! Every functional bank holds one bit per pin. The byte a pin lives in is selected by the
//! per-pin bank offset from the board pin table, the bit by its shift.

/// Physical base address of the GPIO register block.
pub const GPIO_BASE_ADDR: usize = 0xD811_0000;

/// Size of one 64-pin-wide bank grouping in bytes.
pub const BANK_SIZE: usize = 0x40;

/// Size of the interrupt mask and status banks in bytes.
pub const INT_BANK_SIZE: usize = 0x60;

/// Size of the whole register block in bytes.
pub const REGISTER_BLOCK_SIZE: usize = 0x500;

/// Functional register banks and their byte offset from the block base.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(usize)]
pub enum Bank {
    /// Sampled pad level.
    InValue = 0x00,
    /// Pin is claimed for the GPIO function instead of an alternate peripheral.
    Enable = 0x40,
    /// 1 for output, 0 for input.
    Direction = 0x80,
    /// Latched output level.
    OutValue = 0xC0,
    InterruptMask = 0x300,
    /// Write-one-to-clear.
    InterruptStatus = 0x360,
    PullEnable = 0x480,
    /// 1 for pull-up, 0 for pull-down. Only relevant if the pull is enabled.
    PullControl = 0x4C0,
}

impl Bank {
    pub const ALL: [Bank; 8] = [
        Bank::InValue,
        Bank::Enable,
        Bank::Direction,
        Bank::OutValue,
        Bank::InterruptMask,
        Bank::InterruptStatus,
        Bank::PullEnable,
        Bank::PullControl,
    ];

    #[inline]
    pub const fn offset(self) -> usize {
        self as usize
    }

    /// Size of the bank in bytes.
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            Bank::InterruptMask | Bank::InterruptStatus => INT_BANK_SIZE,
            _ => BANK_SIZE,
        }
    }

    /// Bank containing the block offset and the index inside that bank.
    pub fn locate(offset: usize) -> Option<(Bank, usize)> {
        Self::ALL
            .into_iter()
            .find(|bank| (bank.offset()..bank.offset() + bank.size()).contains(&offset))
            .map(|bank| (bank, offset - bank.offset()))
    }
}

/// Access to a block offset which does not lie inside a writable (or readable) bank.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid GPIO register offset {0:#x}")]
pub struct InvalidOffset(pub usize);

/// GPIO register access.
#[derive(derive_mmio::Mmio)]
#[repr(C)]
pub struct Registers {
    /// Input data
    #[mmio(PureRead)]
    in_value: [u8; BANK_SIZE],
    /// GPIO function enable
    #[mmio(PureRead, Write, Modify)]
    enable: [u8; BANK_SIZE],
    /// Direction mode
    #[mmio(PureRead, Write, Modify)]
    direction: [u8; BANK_SIZE],
    /// Output data
    #[mmio(PureRead, Write, Modify)]
    out_value: [u8; BANK_SIZE],

    _reserved_0: [u8; 0x200],

    /// Interrupt mask
    #[mmio(PureRead, Write, Modify)]
    int_mask: [u8; INT_BANK_SIZE],
    /// Interrupt status
    #[mmio(PureRead, Write)]
    int_status: [u8; INT_BANK_SIZE],

    _reserved_1: [u8; 0xC0],

    /// Pull resistor enable
    #[mmio(PureRead, Write, Modify)]
    pull_enable: [u8; BANK_SIZE],
    /// Pull resistor direction
    #[mmio(PureRead, Write, Modify)]
    pull_control: [u8; BANK_SIZE],
}

static_assertions::const_assert_eq!(core::mem::size_of::<Registers>(), REGISTER_BLOCK_SIZE);
static_assertions::const_assert_eq!(
    core::mem::offset_of!(Registers, in_value),
    Bank::InValue.offset()
);
static_assertions::const_assert_eq!(
    core::mem::offset_of!(Registers, enable),
    Bank::Enable.offset()
);
static_assertions::const_assert_eq!(
    core::mem::offset_of!(Registers, direction),
    Bank::Direction.offset()
);
static_assertions::const_assert_eq!(
    core::mem::offset_of!(Registers, out_value),
    Bank::OutValue.offset()
);
static_assertions::const_assert_eq!(
    core::mem::offset_of!(Registers, int_mask),
    Bank::InterruptMask.offset()
);
static_assertions::const_assert_eq!(
    core::mem::offset_of!(Registers, int_status),
    Bank::InterruptStatus.offset()
);
static_assertions::const_assert_eq!(
    core::mem::offset_of!(Registers, pull_enable),
    Bank::PullEnable.offset()
);
static_assertions::const_assert_eq!(
    core::mem::offset_of!(Registers, pull_control),
    Bank::PullControl.offset()
);

impl Registers {
    /// Create a new GPIO MMIO instance at the fixed base address.
    ///
    /// # Safety
    ///
    /// This API can be used to potentially create a driver to the same peripheral structure
    /// from multiple threads. The user must ensure that concurrent accesses are safe and do not
    /// interfere with each other.
    pub const unsafe fn new_mmio_fixed() -> MmioRegisters<'static> {
        MmioRegisters {
            ptr: GPIO_BASE_ADDR as *mut Registers,
            phantom: core::marker::PhantomData,
        }
    }
}

impl MmioRegisters<'_> {
    /// Read one byte at `offset` from the block base.
    pub fn read_byte(&self, offset: usize) -> Result<u8, InvalidOffset> {
        let (bank, idx) = Bank::locate(offset).ok_or(InvalidOffset(offset))?;
        match bank {
            Bank::InValue => self.read_in_value(idx),
            Bank::Enable => self.read_enable(idx),
            Bank::Direction => self.read_direction(idx),
            Bank::OutValue => self.read_out_value(idx),
            Bank::InterruptMask => self.read_int_mask(idx),
            Bank::InterruptStatus => self.read_int_status(idx),
            Bank::PullEnable => self.read_pull_enable(idx),
            Bank::PullControl => self.read_pull_control(idx),
        }
        .map_err(|_| InvalidOffset(offset))
    }

    /// Write one byte at `offset` from the block base. The input value bank is read-only.
    pub fn write_byte(&mut self, offset: usize, value: u8) -> Result<(), InvalidOffset> {
        let (bank, idx) = Bank::locate(offset).ok_or(InvalidOffset(offset))?;
        match bank {
            Bank::InValue => return Err(InvalidOffset(offset)),
            Bank::Enable => self.write_enable(idx, value),
            Bank::Direction => self.write_direction(idx, value),
            Bank::OutValue => self.write_out_value(idx, value),
            Bank::InterruptMask => self.write_int_mask(idx, value),
            Bank::InterruptStatus => self.write_int_status(idx, value),
            Bank::PullEnable => self.write_pull_enable(idx, value),
            Bank::PullControl => self.write_pull_control(idx, value),
        }
        .map_err(|_| InvalidOffset(offset))
    }
}
