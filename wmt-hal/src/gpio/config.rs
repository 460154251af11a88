//! Pin configuration strings.
//!
//! Boards describe optional GPIO functions (a power enable line, a detect input, ...) with an
//! environment variable holding `"<pin>:<active>"`, for example `wmt.gpio.param=7:0`. Both
//! fields use C `strtoul` base-0 syntax, so `0x10` and `020` are accepted as well.
use embedded_hal::digital::PinState;

use super::pins::PinTable;

/// Decoded `"<pin>:<active>"` configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParsedGpioConfig {
    pub pin: usize,
    /// Raw second field.
    pub active: u64,
    /// `0` is active low, every other value active high.
    pub active_level: PinState,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError<'a> {
    #[error("configuration {name} not found")]
    NotFound { name: &'a str },
    #[error("wrong value count in '{name}={text}'")]
    Malformed { name: &'a str, text: &'a str },
    #[error("wrong GPIO number {pin} in '{name}={text}'")]
    InvalidPin {
        name: &'a str,
        pin: u64,
        text: &'a str,
    },
}

/// Source of named configuration strings, usually the boot loader environment.
pub trait ConfigStore {
    fn get_config_string(&self, name: &str) -> Option<&str>;
}

impl ConfigStore for [(&str, &str)] {
    fn get_config_string(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }
}

impl<const N: usize> ConfigStore for [(&str, &str); N] {
    fn get_config_string(&self, name: &str) -> Option<&str> {
        self.as_slice().get_config_string(name)
    }
}

/// Scans an unsigned integer like U-Boot `simple_strtoul` with base 0.
///
/// Returns the value and the unparsed remainder. Like the C scanner, a text without any digit
/// scans as 0 and consumes nothing. Only a lowercase `0x` selects hex. Values which do not fit
/// a [u64] saturate.
fn scan_ulong(text: &str) -> (u64, &str) {
    let bytes = text.as_bytes();
    let (radix, start) = match bytes {
        [b'0', b'x', next, ..] if next.is_ascii_hexdigit() => (16, 2),
        // The leading zero counts as a digit of its own.
        [b'0', ..] => (8, 0),
        _ => (10, 0),
    };
    let mut value: u64 = 0;
    let mut end = start;
    for &byte in &bytes[start..] {
        let Some(digit) = (byte as char).to_digit(radix) else {
            break;
        };
        value = value
            .saturating_mul(radix as u64)
            .saturating_add(digit as u64);
        end += 1;
    }
    (value, &text[end..])
}

fn parse_fields(text: &str) -> Option<(u64, u64)> {
    let (pin, rest) = scan_ulong(text);
    // The end of the text before the second field leaves only one value.
    if rest.is_empty() {
        return None;
    }
    let rest = rest.strip_prefix(':')?;
    if rest.is_empty() {
        return None;
    }
    // Anything after the second value is ignored.
    let (active, _) = scan_ulong(rest);
    Some((pin, active))
}

impl PinTable {
    /// Parses `"<pin>:<active>"` and checks the pin number against this table.
    pub fn parse_config<'a>(&self, text: &'a str) -> Result<ParsedGpioConfig, ConfigError<'a>> {
        self.parse_named_config("", text)
    }

    fn parse_named_config<'a>(
        &self,
        name: &'a str,
        text: &'a str,
    ) -> Result<ParsedGpioConfig, ConfigError<'a>> {
        let (pin, active) = parse_fields(text).ok_or(ConfigError::Malformed { name, text })?;
        let pin_idx = usize::try_from(pin).ok().filter(|p| self.is_valid_pin(*p));
        let Some(pin_idx) = pin_idx else {
            return Err(ConfigError::InvalidPin { name, pin, text });
        };
        Ok(ParsedGpioConfig {
            pin: pin_idx,
            active,
            active_level: PinState::from(active != 0),
        })
    }
}

/// Parses `"<pin>:<active>"` for the WM8880 board table.
#[inline]
pub fn parse_pin_config(text: &str) -> Result<ParsedGpioConfig, ConfigError<'_>> {
    PinTable::wm8880().parse_config(text)
}

/// Looks up `name` in the configuration store and parses its value.
pub fn parse_gpio_env<'a, S: ConfigStore + ?Sized>(
    store: &'a S,
    name: &'a str,
    pins: &PinTable,
) -> Result<ParsedGpioConfig, ConfigError<'a>> {
    let text = store
        .get_config_string(name)
        .ok_or(ConfigError::NotFound { name })?;
    match pins.parse_named_config(name, text) {
        Ok(config) => {
            log::debug!("{}: GPIO {} active {}", name, config.pin, config.active);
            Ok(config)
        }
        Err(e) => {
            log::warn!("parse_gpio_env: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::format;

    #[test]
    fn decimal() {
        let cfg = parse_pin_config("7:0").unwrap();
        assert_eq!(cfg.pin, 7);
        assert_eq!(cfg.active, 0);
        assert_eq!(cfg.active_level, PinState::Low);
    }

    #[test]
    fn hex_pin() {
        let cfg = parse_pin_config("0x10:1").unwrap();
        assert_eq!(cfg.pin, 16);
        assert_eq!(cfg.active, 1);
        assert_eq!(cfg.active_level, PinState::High);
    }

    #[test]
    fn octal_pin() {
        let cfg = parse_pin_config("020:3").unwrap();
        assert_eq!(cfg.pin, 16);
        assert_eq!(cfg.active, 3);
        assert_eq!(cfg.active_level, PinState::High);
        assert_eq!(parse_pin_config("0:0").unwrap().pin, 0);
    }

    #[test]
    fn hex_prefix_without_digits() {
        // "0x" without a hex digit is a plain zero, stopping at 'x'.
        assert!(matches!(
            parse_pin_config("0x:1"),
            Err(ConfigError::Malformed { .. })
        ));
    }

    #[test]
    fn uppercase_hex_prefix_not_accepted() {
        assert!(matches!(
            parse_pin_config("0X10:1"),
            Err(ConfigError::Malformed { .. })
        ));
    }

    #[test]
    fn single_value() {
        assert_eq!(
            parse_pin_config("7"),
            Err(ConfigError::Malformed {
                name: "",
                text: "7"
            })
        );
    }

    #[test]
    fn missing_second_value() {
        assert!(matches!(
            parse_pin_config("7:"),
            Err(ConfigError::Malformed { .. })
        ));
    }

    #[test]
    fn second_value_without_digits_is_zero() {
        let cfg = parse_pin_config("7:x").unwrap();
        assert_eq!(cfg.pin, 7);
        assert_eq!(cfg.active, 0);
        assert_eq!(cfg.active_level, PinState::Low);
        let cfg = parse_pin_config("7::1").unwrap();
        assert_eq!(cfg.pin, 7);
        assert_eq!(cfg.active, 0);
    }

    #[test]
    fn first_value_without_digits_is_zero() {
        let cfg = parse_pin_config(":1").unwrap();
        assert_eq!(cfg.pin, 0);
        assert_eq!(cfg.active, 1);
        assert_eq!(cfg.active_level, PinState::High);
    }

    #[test]
    fn empty_text() {
        assert_eq!(
            parse_pin_config(""),
            Err(ConfigError::Malformed { name: "", text: "" })
        );
    }

    #[test]
    fn wrong_separator() {
        assert!(matches!(
            parse_pin_config("7,0"),
            Err(ConfigError::Malformed { .. })
        ));
    }

    #[test]
    fn trailing_characters_ignored() {
        let cfg = parse_pin_config("3:1:9 junk").unwrap();
        assert_eq!(cfg.pin, 3);
        assert_eq!(cfg.active, 1);
    }

    #[test]
    fn pin_out_of_range() {
        assert_eq!(
            parse_pin_config("999999:0"),
            Err(ConfigError::InvalidPin {
                name: "",
                pin: 999999,
                text: "999999:0"
            })
        );
        let text = format!("{}:0", PinTable::wm8880().len());
        assert!(matches!(
            parse_pin_config(&text),
            Err(ConfigError::InvalidPin { .. })
        ));
    }

    #[test]
    fn saturating_overflow() {
        assert!(matches!(
            parse_pin_config("99999999999999999999999:0"),
            Err(ConfigError::InvalidPin { pin: u64::MAX, .. })
        ));
    }

    #[test]
    fn custom_table() {
        static PINS: [crate::gpio::pins::PinDescriptor; 2] = [
            crate::gpio::pins::PinDescriptor::new("a", 0, 0, None),
            crate::gpio::pins::PinDescriptor::new("b", 0, 1, None),
        ];
        let table = PinTable::new(&PINS);
        assert_eq!(table.parse_config("1:0").unwrap().pin, 1);
        assert!(matches!(
            table.parse_config("2:0"),
            Err(ConfigError::InvalidPin { pin: 2, .. })
        ));
    }

    #[test]
    fn env_lookup() {
        let env = [
            ("wmt.gpio.param", "7:0"),
            ("wmt.bad", "7"),
            ("wmt.range", "999:0"),
        ];
        let pins = PinTable::wm8880();
        let cfg = parse_gpio_env(&env, "wmt.gpio.param", &pins).unwrap();
        assert_eq!(cfg.pin, 7);
        assert_eq!(
            parse_gpio_env(&env, "wmt.missing", &pins),
            Err(ConfigError::NotFound {
                name: "wmt.missing"
            })
        );
        assert_eq!(
            parse_gpio_env(&env, "wmt.bad", &pins),
            Err(ConfigError::Malformed {
                name: "wmt.bad",
                text: "7"
            })
        );
        assert!(matches!(
            parse_gpio_env(&env, "wmt.range", &pins),
            Err(ConfigError::InvalidPin {
                name: "wmt.range",
                pin: 999,
                ..
            })
        ));
    }
}
