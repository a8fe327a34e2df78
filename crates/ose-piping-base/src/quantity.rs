//! Parsing of catalog quantities such as `"26.7 mm"`, `"1.5 in"` or `"90 deg"`.
//!
//! A bare number takes the internal unit (millimeters or degrees).

use crate::{AngleUnit, Error, LengthUnit, Result};

pub fn parse_length(text: &str) -> Result<f64> {
    let (value, unit) = split_quantity(text)?;
    if unit.is_empty() {
        return Ok(value);
    }
    let unit = LengthUnit::from_symbol(unit).ok_or_else(|| invalid(text, "unknown length unit"))?;
    Ok(value * unit.millimeters())
}

pub fn parse_angle(text: &str) -> Result<f64> {
    let (value, unit) = split_quantity(text)?;
    if unit.is_empty() {
        return Ok(value);
    }
    let unit = AngleUnit::from_symbol(unit).ok_or_else(|| invalid(text, "unknown angle unit"))?;
    Ok(value * unit.degrees())
}

fn split_quantity(text: &str) -> Result<(f64, &str)> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(invalid(text, "empty value"));
    }

    let split = number_end(trimmed);
    let (number, unit) = trimmed.split_at(split);
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| invalid(text, "expected a number"))?;
    if !value.is_finite() {
        return Err(invalid(text, "value must be finite"));
    }
    Ok((value, unit.trim()))
}

fn number_end(text: &str) -> usize {
    let bytes = text.as_bytes();
    for (index, ch) in text.char_indices() {
        let exponent = matches!(ch, 'e' | 'E')
            && index > 0
            && bytes
                .get(index + 1)
                .is_some_and(|next| next.is_ascii_digit() || *next == b'-' || *next == b'+');
        if ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+') || exponent {
            continue;
        }
        return index;
    }
    text.len()
}

fn invalid(text: &str, reason: &str) -> Error {
    Error::InvalidQuantity {
        text: text.to_string(),
        reason: reason.to_string(),
    }
}
