use std::cmp;
use std::fmt::{self, Display, Formatter};
use std::ops::Add;

/// A point in the source code: zero-based line and zero-based byte column within that line.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, Debug, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Position {
        Position { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open range `[start, end)` in the source code.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, Default)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

impl Location {
    pub fn new(start: Position, end: Position) -> Location {
        Location { start, end }
    }

    /// Returns a zero-width location at `position`.
    pub fn at(position: Position) -> Location {
        Location {
            start: position,
            end: position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Checks whether `other` lies completely inside this location.
    pub fn contains(&self, other: &Location) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// `a + b` is the smallest location covering both `a` and `b`.
impl Add for Location {
    type Output = Location;

    fn add(self, rhs: Location) -> Location {
        Location {
            start: cmp::min(self.start, rhs.start),
            end: cmp::max(self.end, rhs.end),
        }
    }
}

impl Add<Option<Location>> for Location {
    type Output = Location;

    fn add(self, rhs: Option<Location>) -> Location {
        match rhs {
            Some(rhs) => self + rhs,
            None => self,
        }
    }
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Lua source code split into logical lines.
///
/// Line endings are normalized: lines are split at `\n`, and `\r` is dropped wherever it
/// appears. A leading byte order mark is removed, and a first line starting with `#` (a shebang)
/// is blanked so that all other line numbers stay the same.
#[derive(Clone, Debug)]
pub struct LuaSource {
    name: String,
    lines: Vec<String>,
    line_starts: Vec<usize>,
}

impl LuaSource {
    pub fn new(chunk: &[u8], name: impl Into<String>) -> LuaSource {
        let chunk = if chunk.starts_with(UTF8_BOM) {
            &chunk[UTF8_BOM.len()..]
        } else {
            chunk
        };

        let mut lines = Vec::new();
        if !chunk.is_empty() {
            let mut current = Vec::new();
            for &byte in chunk {
                match byte {
                    b'\r' => {}
                    b'\n' => lines.push(decode_line(std::mem::take(&mut current))),
                    _ => current.push(byte),
                }
            }
            lines.push(decode_line(current));
        }

        if let Some(first) = lines.first_mut() {
            if first.starts_with('#') {
                first.clear();
            }
        }

        let mut line_starts = Vec::with_capacity(lines.len());
        let mut offset = 0;
        for line in &lines {
            line_starts.push(offset);
            offset += line.len() + 1;
        }

        LuaSource {
            name: name.into(),
            lines,
            line_starts,
        }
    }

    /// Display name of the source, usually a file path.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the text of line `index`, or an empty string if there is no such line.
    pub fn line(&self, index: usize) -> &str {
        self.lines.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Location of the very end of the source, used for errors about unexpected EOF.
    pub fn end_location(&self) -> Location {
        match self.lines.len() {
            0 => Location::default(),
            count => {
                let line = count - 1;
                Location::at(Position::new(line, self.lines[line].len()))
            }
        }
    }

    /// Normalized source text: all lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Converts a position into a byte offset within `text()`.
    pub fn offset_of(&self, position: Position) -> usize {
        match self.line_starts.get(position.line) {
            Some(start) => start + cmp::min(position.column, self.lines[position.line].len()),
            None => self
                .line_starts
                .last()
                .zip(self.lines.last())
                .map(|(start, line)| start + line.len())
                .unwrap_or(0),
        }
    }
}

fn decode_line(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|error| String::from_utf8_lossy(error.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(source: &LuaSource) -> Vec<&str> {
        (0..source.line_count()).map(|i| source.line(i)).collect()
    }

    #[test]
    fn splits_lines_and_drops_carriage_returns() {
        let source = LuaSource::new(b"local a\r\nlocal b\rc\n", "test.lua");
        assert_eq!(lines(&source), vec!["local a", "local bc", ""]);
    }

    #[test]
    fn strips_bom_and_blanks_shebang() {
        let source = LuaSource::new(b"\xEF\xBB\xBF#!/usr/bin/lua\nprint(1)", "test.lua");
        assert_eq!(lines(&source), vec!["", "print(1)"]);
    }

    #[test]
    fn empty_input_has_no_lines() {
        let source = LuaSource::new(b"", "empty.lua");
        assert_eq!(source.line_count(), 0);
        assert_eq!(source.line(0), "");
        assert_eq!(source.end_location(), Location::default());
    }

    #[test]
    fn out_of_range_line_is_empty() {
        let source = LuaSource::new(b"x = 1", "test.lua");
        assert_eq!(source.line(7), "");
    }

    #[test]
    fn maps_positions_to_offsets() {
        let source = LuaSource::new(b"ab\r\ncd\nef", "test.lua");
        assert_eq!(source.text(), "ab\ncd\nef");
        assert_eq!(source.offset_of(Position::new(1, 1)), 4);
        assert_eq!(source.offset_of(Position::new(2, 9)), 8);
        assert_eq!(source.offset_of(Position::new(5, 0)), 8);
    }

    #[test]
    fn location_addition_covers_both() {
        let a = Location::new(Position::new(0, 4), Position::new(0, 6));
        let b = Location::new(Position::new(1, 0), Position::new(1, 2));
        assert_eq!(a + b, Location::new(Position::new(0, 4), Position::new(1, 2)));
        assert_eq!(a + None, a);
        assert!((a + b).contains(&a));
    }
}
