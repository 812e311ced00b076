//! Helpers for setters that turn an option value into typed state.

use crate::error::ConversionError;
use std::str::FromStr;

/// Returns the value, or [`ConversionError::MissingValue`] when the option was
/// given as a bare flag.
pub fn require(value: Option<&str>) -> Result<&str, ConversionError> {
    value.ok_or(ConversionError::MissingValue)
}

fn parse<T: FromStr>(value: Option<&str>, expected: &'static str) -> Result<T, ConversionError> {
    let text = require(value)?;
    text.parse().map_err(|_| ConversionError::Invalid {
        value: text.to_string(),
        expected,
    })
}

pub fn convert_int(value: Option<&str>) -> Result<i64, ConversionError> {
    parse(value, "an integer")
}

pub fn convert_double(value: Option<&str>) -> Result<f64, ConversionError> {
    parse(value, "a number")
}

/// A bare flag reads as `true`; otherwise accepts the usual spellings of
/// true and false, ignoring case.
pub fn convert_bool(value: Option<&str>) -> Result<bool, ConversionError> {
    let Some(text) = value else {
        return Ok(true);
    };
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConversionError::Invalid {
            value: text.to_string(),
            expected: "a boolean",
        }),
    }
}
