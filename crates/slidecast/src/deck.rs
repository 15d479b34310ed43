//! Slide deck surface.
//!
//! The navigation core only needs a page count and a way to rasterize one
//! page; [`SlideDeck`] is that seam. The shipped backend reads a directory
//! of pre-rendered page images ordered by file name. Pages are decoded on
//! slide change only, never per frame.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::{Error, Result};

pub const PAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "webp"];

pub trait SlideDeck {
    fn len(&self) -> usize;

    fn render_page(&self, index: usize) -> Result<RgbaImage>;
}

#[derive(Debug)]
pub struct ImageDeck {
    pages: Vec<PathBuf>,
}

impl ImageDeck {
    pub fn open(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            Error::resource(format!("Cannot read slide directory {}: {e}", dir.display()))
        })?;

        let mut pages: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && has_page_extension(path))
            .collect();
        pages.sort_by_key(|path| path.file_name().map(|n| n.to_os_string()));

        if pages.is_empty() {
            return Err(Error::resource(format!(
                "No slide images ({}) found in {}",
                PAGE_EXTENSIONS.join(", "),
                dir.display()
            )));
        }
        Ok(Self { pages })
    }
}

impl SlideDeck for ImageDeck {
    fn len(&self) -> usize {
        self.pages.len()
    }

    fn render_page(&self, index: usize) -> Result<RgbaImage> {
        let path = self.pages.get(index).ok_or(Error::Range {
            index: index as i64,
            deck_len: self.pages.len(),
        })?;
        let decoded = image::open(path).map_err(|e| {
            Error::resource(format!("Cannot decode slide {}: {e}", path.display()))
        })?;
        Ok(decoded.into_rgba8())
    }
}

fn has_page_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            PAGE_EXTENSIONS.contains(&ext.as_str())
        })
}
