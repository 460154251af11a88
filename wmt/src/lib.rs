//! # PAC for the WonderMedia WMT SoC family
//!
//! This crate only covers the blocks needed by boot loader code. Right now this is the GPIO
//! controller, which is accessed byte-wise through a set of 64-byte register banks.
#![no_std]

pub mod gpio;
