//! Conversion of numeral text into integer and float values.

use crate::parser::tokens::chars::{is_digit, is_hex_digit};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

/// Converts the text of a number token. Returns `None` if the numeral is malformed.
///
/// Decimal integers that do not fit into `i64` become floats. Hexadecimal integers wrap
/// around modulo 2^64.
pub fn parse_number(text: &str) -> Option<Number> {
    if text.starts_with("0x") || text.starts_with("0X") {
        parse_hex(&text[2..])
    } else if text.bytes().all(is_digit) && !text.is_empty() {
        match text.parse::<i64>() {
            Ok(value) => Some(Number::Integer(value)),
            Err(_) => text.parse::<f64>().ok().map(Number::Float),
        }
    } else if text.bytes().all(|c| is_digit(c) || matches!(c, b'.' | b'e' | b'E' | b'+' | b'-')) {
        text.parse::<f64>().ok().map(Number::Float)
    } else {
        None
    }
}

fn parse_hex(text: &str) -> Option<Number> {
    let bytes = text.as_bytes();
    let mut index = 0;

    let mut integer: u64 = 0;
    let mut mantissa = 0.0f64;
    let mut digits = 0;
    while index < bytes.len() && is_hex_digit(bytes[index]) {
        let digit = hex_value(bytes[index]);
        integer = integer.wrapping_mul(16).wrapping_add(digit);
        mantissa = mantissa * 16.0 + digit as f64;
        digits += 1;
        index += 1;
    }

    let mut is_float = false;
    let mut exponent: i64 = 0;
    if index < bytes.len() && bytes[index] == b'.' {
        is_float = true;
        index += 1;
        while index < bytes.len() && is_hex_digit(bytes[index]) {
            mantissa = mantissa * 16.0 + hex_value(bytes[index]) as f64;
            exponent -= 4;
            digits += 1;
            index += 1;
        }
    }

    if digits == 0 {
        return None;
    }

    if index < bytes.len() && matches!(bytes[index], b'p' | b'P') {
        is_float = true;
        index += 1;
        let negative = match bytes.get(index) {
            Some(b'-') => {
                index += 1;
                true
            }
            Some(b'+') => {
                index += 1;
                false
            }
            _ => false,
        };

        let start = index;
        let mut binary_exponent: i64 = 0;
        while index < bytes.len() && is_digit(bytes[index]) {
            let digit = (bytes[index] - b'0') as i64;
            binary_exponent = binary_exponent.saturating_mul(10).saturating_add(digit);
            index += 1;
        }
        if index == start {
            return None;
        }

        exponent = if negative {
            exponent.saturating_sub(binary_exponent)
        } else {
            exponent.saturating_add(binary_exponent)
        };
    }

    if index != bytes.len() {
        return None;
    }

    if is_float {
        Some(Number::Float(scale_by_power_of_two(mantissa, exponent)))
    } else {
        Some(Number::Integer(integer as i64))
    }
}

fn hex_value(c: u8) -> u64 {
    match c {
        b'0'..=b'9' => (c - b'0') as u64,
        b'a'..=b'f' => (c - b'a' + 10) as u64,
        _ => (c - b'A' + 10) as u64,
    }
}

fn scale_by_power_of_two(value: f64, exponent: i64) -> f64 {
    // powi takes an i32; anything beyond this range already overflows or underflows f64.
    let exponent = exponent.max(-2200).min(2200) as i32;
    if exponent < -1000 {
        value * 2f64.powi(-1000) * 2f64.powi(exponent + 1000)
    } else if exponent > 1000 {
        value * 2f64.powi(1000) * 2f64.powi(exponent - 1000)
    } else {
        value * 2f64.powi(exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_integers() {
        assert_eq!(parse_number("3"), Some(Number::Integer(3)));
        assert_eq!(parse_number("345"), Some(Number::Integer(345)));
        assert_eq!(
            parse_number("9223372036854775807"),
            Some(Number::Integer(i64::MAX))
        );
    }

    #[test]
    fn overflowing_decimal_becomes_float() {
        assert_eq!(
            parse_number("9223372036854775808"),
            Some(Number::Float(9223372036854775808.0))
        );
    }

    #[test]
    fn decimal_floats() {
        assert_eq!(parse_number("3.0"), Some(Number::Float(3.0)));
        assert_eq!(parse_number("314.16e-2"), Some(Number::Float(3.1416)));
        assert_eq!(parse_number("0.31416E1"), Some(Number::Float(3.1416)));
        assert_eq!(parse_number("34e1"), Some(Number::Float(340.0)));
        assert_eq!(parse_number(".5"), Some(Number::Float(0.5)));
        assert_eq!(parse_number("3."), Some(Number::Float(3.0)));
    }

    #[test]
    fn hex_integers_wrap() {
        assert_eq!(parse_number("0xff"), Some(Number::Integer(255)));
        assert_eq!(parse_number("0XBEBADA"), Some(Number::Integer(0xBEBADA)));
        assert_eq!(parse_number("0xffffffffffffffff"), Some(Number::Integer(-1)));
        assert_eq!(parse_number("0x10000000000000000"), Some(Number::Integer(0)));
    }

    #[test]
    fn hex_floats() {
        assert_eq!(parse_number("0x0.1E"), Some(Number::Float(0.1171875)));
        assert_eq!(parse_number("0xA23p-4"), Some(Number::Float(162.1875)));
        assert_eq!(parse_number("0X1P+4"), Some(Number::Float(16.0)));
        assert_eq!(parse_number("0x.8"), Some(Number::Float(0.5)));
    }

    #[test]
    fn malformed_numbers() {
        assert_eq!(parse_number("3x"), None);
        assert_eq!(parse_number("1..2"), None);
        assert_eq!(parse_number("3e"), None);
        assert_eq!(parse_number("0x"), None);
        assert_eq!(parse_number("0x1p"), None);
        assert_eq!(parse_number("0xg"), None);
    }
}
