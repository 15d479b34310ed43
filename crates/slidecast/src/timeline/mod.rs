pub mod parse;

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// A slide reference from the description file: a deck page (0-based
/// internally, 1-based in the file) or an explicit "nothing on screen".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideRef {
    Page(usize),
    Blank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    pub timestamp_ms: u64,
    pub slide: SlideRef,
}

/// The sorted schedule of slide changes, immutable after load.
///
/// Entries are kept in non-decreasing timestamp order; equal timestamps keep
/// their input order (stable sort).
#[derive(Debug, Clone)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            Error::resource(format!(
                "Cannot read description file {}: {e}",
                path.display()
            ))
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = parse::parse_description(text)?;
        entries.sort_by_key(|e| e.timestamp_ms);
        Ok(Self { entries })
    }

    /// The slide that should be on screen at `time_ms`: the reference of the
    /// last entry strictly before that time, `None` before the first
    /// boundary or when the governing entry is an explicit blank. Monotone
    /// in `time_ms`.
    pub fn resolve(&self, time_ms: u64) -> Option<usize> {
        let idx = self.entries.partition_point(|e| e.timestamp_ms < time_ms);
        match self.entries[..idx].last()?.slide {
            SlideRef::Page(page) => Some(page),
            SlideRef::Blank => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
