//! Comments harvested by the lexer.
//!
//! Comments are grouped into blocks of contiguous lines. Blocks are indexed by the physical line
//! on which they end, so that tooling can find the documentation of a statement starting at
//! line `L` by looking up line `L - 1`.

use crate::source::Position;
use std::collections::HashMap;

/// A single `--` comment.
#[derive(Clone, Debug, PartialEq)]
pub struct CommentLine {
    /// For short comments, the text after `--`. For long comments, the bracket content.
    pub text: String,

    /// Position of the leading `--`.
    pub start: Position,

    /// `true` for `-- ...` comments running to the end of line, `false` for `--[[ ... ]]`.
    pub is_short: bool,

    /// `true` if no token precedes the comment on its line.
    pub is_head: bool,
}

impl CommentLine {
    /// Checks whether the comment is a `---@...` annotation.
    pub fn is_annotation(&self) -> bool {
        self.is_short && self.text.starts_with("-@")
    }

    /// Text of a `---@...` annotation starting after the `@`.
    pub fn annotation_text(&self) -> Option<&str> {
        if self.is_annotation() {
            Some(&self.text[2..])
        } else {
            None
        }
    }
}

/// One or more comment lines treated as a single documentation unit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommentBlock {
    pub lines: Vec<CommentLine>,
}

impl CommentBlock {
    /// Line on which the first comment of the block starts.
    pub fn first_line(&self) -> usize {
        self.lines.first().map(|line| line.start.line).unwrap_or(0)
    }

    /// Checks whether the block documents the code that follows it rather than the code on
    /// its own line.
    pub fn is_head(&self) -> bool {
        self.lines.first().map(|line| line.is_head).unwrap_or(false)
    }

    /// All comment texts joined with newlines.
    pub fn text(&self) -> String {
        let texts: Vec<&str> = self.lines.iter().map(|line| line.text.as_str()).collect();
        texts.join("\n")
    }

    /// Lines that carry `---@` annotations, ready to be handed to an annotation parser.
    pub fn annotations(&self) -> impl Iterator<Item = &CommentLine> {
        self.lines.iter().filter(|line| line.is_annotation())
    }
}

/// Comment blocks of a file, keyed by the last physical line of each block.
#[derive(Clone, Debug, Default)]
pub struct CommentMap {
    blocks: HashMap<usize, CommentBlock>,
}

impl CommentMap {
    pub fn new() -> CommentMap {
        CommentMap::default()
    }

    /// Returns the block that ends on `last_line`.
    pub fn get(&self, last_line: usize) -> Option<&CommentBlock> {
        self.blocks.get(&last_line)
    }

    /// Returns the head-of-line block that ends right above `line`.
    pub fn block_before(&self, line: usize) -> Option<&CommentBlock> {
        let previous = line.checked_sub(1)?;
        self.blocks.get(&previous).filter(|block| block.is_head())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All blocks ordered by their last line.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &CommentBlock)> {
        let mut blocks: Vec<_> = self.blocks.iter().map(|(line, block)| (*line, block)).collect();
        blocks.sort_by_key(|(line, _)| *line);
        blocks.into_iter()
    }
}

/// Accumulates comment lines into blocks while the lexer skips trivia.
#[derive(Debug, Default)]
pub(crate) struct CommentCollector {
    map: CommentMap,
    pending: Option<CommentBlock>,
    pending_last_line: usize,
}

impl CommentCollector {
    /// Adds a comment that ends on physical line `last_line`.
    pub fn add(&mut self, comment: CommentLine, last_line: usize) {
        if self.pending.is_some() && comment.start.line != self.pending_last_line + 1 {
            self.close_block();
        }

        let is_head = comment.is_head;
        self.pending
            .get_or_insert_with(CommentBlock::default)
            .lines
            .push(comment);
        self.pending_last_line = last_line;

        // A trailing comment only describes the statement on its own line.
        if !is_head {
            self.close_block();
        }
    }

    pub fn close_block(&mut self) {
        if let Some(block) = self.pending.take() {
            self.map.blocks.insert(self.pending_last_line, block);
        }
    }

    pub fn into_map(mut self) -> CommentMap {
        self.close_block();
        self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short(text: &str, line: usize, is_head: bool) -> CommentLine {
        CommentLine {
            text: text.to_string(),
            start: Position::new(line, 0),
            is_short: true,
            is_head,
        }
    }

    #[test]
    fn merges_consecutive_lines() {
        let mut collector = CommentCollector::default();
        collector.add(short("a", 0, true), 0);
        collector.add(short("b", 1, true), 1);
        let map = collector.into_map();

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(1).map(CommentBlock::text), Some("a\nb".to_string()));
        assert_eq!(map.block_before(2).map(|b| b.first_line()), Some(0));
    }

    #[test]
    fn gap_starts_new_block() {
        let mut collector = CommentCollector::default();
        collector.add(short("a", 0, true), 0);
        collector.add(short("b", 2, true), 2);
        let map = collector.into_map();

        let lines: Vec<usize> = map.iter().map(|(line, _)| line).collect();
        assert_eq!(lines, vec![0, 2]);
    }

    #[test]
    fn trailing_comment_is_its_own_block() {
        let mut collector = CommentCollector::default();
        collector.add(short("trailing", 0, false), 0);
        collector.add(short("head", 1, true), 1);
        let map = collector.into_map();

        assert_eq!(map.len(), 2);
        assert!(map.block_before(1).is_none());
        assert_eq!(map.get(1).map(CommentBlock::text), Some("head".to_string()));
    }

    #[test]
    fn recognizes_annotations() {
        let line = short("-@param x number", 0, true);
        assert_eq!(line.annotation_text(), Some("param x number"));
        assert_eq!(short(" plain", 0, true).annotation_text(), None);
    }
}
