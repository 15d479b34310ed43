//! Description file grammar.
//!
//! One event per line: `<time> '@' <page>`, surrounding whitespace ignored,
//! blank lines skipped. `<time>` is `H+:MM:SS`, `MM:SS` or `SS` with an
//! optional fractional-seconds group of 1-3 digits; `<page>` is a 1-based
//! page number or the literal `null`. Parsing is strict: any line that does
//! not match fails the whole file.

use std::sync::LazyLock;

use regex::Regex;

use super::{SlideRef, TimelineEntry};
use crate::error::{Error, Result};

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:(\d+):)?(\d{2}):)?(\d{2})(?:\.(\d{1,3}))?$").expect("time literal pattern")
});

pub fn parse_description(text: &str) -> Result<Vec<TimelineEntry>> {
    let mut entries = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let entry = parse_line(line).map_err(|reason| Error::Format {
            line: index + 1,
            reason,
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

fn parse_line(line: &str) -> std::result::Result<TimelineEntry, String> {
    let (time, page) = line
        .split_once('@')
        .ok_or_else(|| "expected a '@' separator".to_string())?;
    if page.contains('@') {
        return Err("expected exactly one '@' separator".into());
    }
    Ok(TimelineEntry {
        timestamp_ms: parse_time_ms(time.trim())?,
        slide: parse_page(page.trim())?,
    })
}

fn parse_time_ms(time: &str) -> std::result::Result<u64, String> {
    let caps = TIME_RE
        .captures(time)
        .ok_or_else(|| format!("unrecognized time literal '{time}'"))?;

    let component = |group: usize| -> std::result::Result<u64, String> {
        match caps.get(group) {
            Some(m) => m
                .as_str()
                .parse::<u32>()
                .map(u64::from)
                .map_err(|_| format!("time component out of range in '{time}'")),
            None => Ok(0),
        }
    };

    let hours = component(1)?;
    let minutes = component(2)?;
    let seconds = component(3)?;
    // A short fraction omits trailing zeros: ".5" is 500 ms, not 5 ms.
    let millis = match caps.get(4) {
        Some(m) => format!("{:0<3}", m.as_str())
            .parse::<u64>()
            .map_err(|_| format!("time component out of range in '{time}'"))?,
        None => 0,
    };

    Ok(((hours * 60 + minutes) * 60 + seconds) * 1000 + millis)
}

fn parse_page(page: &str) -> std::result::Result<SlideRef, String> {
    if page == "null" {
        return Ok(SlideRef::Blank);
    }
    let number: u64 = page
        .parse()
        .map_err(|_| format!("invalid page reference '{page}'"))?;
    if number == 0 {
        return Err("page numbers are 1-based".into());
    }
    Ok(SlideRef::Page((number - 1) as usize))
}
