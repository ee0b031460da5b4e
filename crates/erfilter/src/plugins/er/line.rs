//! Line classification for ER diagram text
//!
//! Lines are recognized by substring, not parsed. Classification looks at
//! the trimmed line only; whether an unrecognized line is an attribute
//! depends on the block state tracked by [`BlockScanner`].

use crate::core::ER_HEADER;

/// Substrings that mark a relationship line
pub const RELATIONSHIP_MARKERS: [&str; 4] = ["||", "--|", "--o", "o--"];

/// What a single line means to the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// The `erDiagram` header
    Header,
    /// `<first> <marker> <second> : <label>`
    ///
    /// Endpoints are the 1st and 3rd whitespace tokens; either may be
    /// missing on malformed lines.
    Relationship {
        first: Option<&'a str>,
        second: Option<&'a str>,
    },
    /// `<entity> {`
    BlockStart { entity: &'a str },
    /// `}`
    BlockEnd,
    /// Attribute inside a block, anything else outside one
    Other,
}

impl<'a> LineKind<'a> {
    /// Classify one line of diagram text
    pub fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();

        if trimmed == ER_HEADER {
            return LineKind::Header;
        }

        if is_relationship(trimmed) {
            let mut tokens = trimmed.split_whitespace();
            let first = tokens.next();
            let second = tokens.nth(1);
            return LineKind::Relationship { first, second };
        }

        if trimmed.contains('{') {
            // A line holding `{` is never blank, so it has a first token
            let entity = trimmed.split_whitespace().next().unwrap_or(trimmed);
            return LineKind::BlockStart { entity };
        }

        if trimmed.contains('}') {
            return LineKind::BlockEnd;
        }

        LineKind::Other
    }
}

fn is_relationship(trimmed: &str) -> bool {
    RELATIONSHIP_MARKERS.iter().any(|m| trimmed.contains(m))
}

/// Per-pass block tracking: the open entity and whether it is being dropped
///
/// Blocks never nest; a second block start simply replaces the open one.
#[derive(Debug, Default)]
pub struct BlockScanner<'a> {
    current: Option<&'a str>,
    skip: bool,
}

impl<'a> BlockScanner<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a block for `entity`; returns whether the start line is kept
    pub fn open(&mut self, entity: &'a str, skip: bool) -> bool {
        self.current = Some(entity);
        self.skip = skip;
        !skip
    }

    /// Close the open block; returns whether the end line is kept
    ///
    /// State resets whether or not the line is kept.
    pub fn close(&mut self) -> bool {
        let keep = !self.skip;
        self.current = None;
        self.skip = false;
        keep
    }

    /// Whether an unrecognized line is kept
    ///
    /// Inside a kept block it is an attribute line; outside any block it
    /// carries no meaning and is dropped.
    pub fn keeps_other(&self) -> bool {
        self.current.is_some() && !self.skip
    }

    pub fn current(&self) -> Option<&'a str> {
        self.current
    }

    pub fn is_skipping(&self) -> bool {
        self.skip
    }
}
