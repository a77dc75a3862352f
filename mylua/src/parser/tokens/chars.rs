//! Byte classes used by the lexer. Lua names and numbers are ASCII-only.

pub fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\x0B' | b'\x0C')
}

pub fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

pub fn is_hex_digit(c: u8) -> bool {
    c.is_ascii_hexdigit()
}

pub fn is_name_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

pub fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}
