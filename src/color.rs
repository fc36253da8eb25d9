use std::str::FromStr;

use image::Rgba;
use palette::Srgb;

use crate::error::{CardError, Result};

/// Parses an opaque `#RRGGBB` color.
///
/// Shorthand (`#FFF`), alpha (`#RRGGBBAA`) and a missing `#` are rejected.
pub fn parse_hex_color(hex: &str) -> Result<Rgba<u8>> {
    let invalid = || CardError::Config(format!("failed to parse {hex:?} as a #RRGGBB hex color"));

    let digits = hex
        .strip_prefix('#')
        .filter(|digits| digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(invalid)?;

    let rgb = Srgb::<u8>::from_str(digits).map_err(|_| invalid())?;
    Ok(Rgba([rgb.red, rgb.green, rgb.blue, u8::MAX]))
}
