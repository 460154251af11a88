//! # Boot loader HAL for the WonderMedia WMT SoC family
//!
//! Small hardware abstraction layer on top of the [peripheral access crate](wmt), written for
//! early boot code: no allocation, no locking and no interrupt handling. The GPIO driver
//! implements the [embedded-hal](https://github.com/rust-embedded/embedded-hal) digital traits
//! through its [gpio::Flex] pin handle.
#![no_std]

pub mod gpio;
pub mod prelude;
