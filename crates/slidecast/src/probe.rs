//! Companion-file discovery.
//!
//! When audio or slide paths are not given on the command line, they are
//! probed next to the description file: `talk.desc` looks for `talk.flac`,
//! `talk.m4a`, ... and for a `talk/` (or `talk-slides/`) page directory.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Extensions probed for the audio companion, in probe order.
pub const AUDIO_EXTENSIONS: &[&str] = &["flac", "m4a", "mp3", "ogg", "wav"];

#[derive(Debug, Clone)]
pub struct CompanionPaths {
    pub description: PathBuf,
    pub audio: PathBuf,
    pub slides: PathBuf,
}

/// Resolve the three session inputs. Explicit paths are validated as given;
/// missing ones are probed from the description file's stem. Every failure
/// is a fatal resource error naming what was looked for.
pub fn resolve_companions(
    description: &Path,
    audio: Option<PathBuf>,
    slides: Option<PathBuf>,
) -> Result<CompanionPaths> {
    if !description.is_file() {
        return Err(Error::resource(format!(
            "Description file not found: {}",
            description.display()
        )));
    }

    let audio = match audio {
        Some(path) if path.is_file() => path,
        Some(path) => {
            return Err(Error::resource(format!(
                "Audio file not found: {}",
                path.display()
            )));
        }
        None => probe_audio(description)?,
    };

    let slides = match slides {
        Some(path) if path.is_dir() => path,
        Some(path) => {
            return Err(Error::resource(format!(
                "Slide directory not found: {}",
                path.display()
            )));
        }
        None => probe_slides(description)?,
    };

    Ok(CompanionPaths {
        description: description.to_path_buf(),
        audio,
        slides,
    })
}

fn probe_audio(description: &Path) -> Result<PathBuf> {
    for extension in AUDIO_EXTENSIONS {
        let candidate = description.with_extension(extension);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    Err(Error::resource(format!(
        "No audio file path provided and no {} companion found for {}",
        AUDIO_EXTENSIONS.join("/"),
        description.display()
    )))
}

fn probe_slides(description: &Path) -> Result<PathBuf> {
    let stem = description.with_extension("");
    if stem.is_dir() {
        return Ok(stem);
    }
    let mut suffixed = stem.into_os_string();
    suffixed.push("-slides");
    let suffixed = PathBuf::from(suffixed);
    if suffixed.is_dir() {
        return Ok(suffixed);
    }
    Err(Error::resource(format!(
        "No slide directory provided and no companion directory found for {}",
        description.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture() -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let desc = tmp.path().join("talk.desc");
        fs::write(&desc, "00:05@1\n").unwrap();
        (tmp, desc)
    }

    #[test]
    fn test_missing_description_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = resolve_companions(&tmp.path().join("talk.desc"), None, None).unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }

    #[test]
    fn test_probe_picks_first_extension_in_table() {
        let (tmp, desc) = fixture();
        fs::write(tmp.path().join("talk.mp3"), b"x").unwrap();
        fs::write(tmp.path().join("talk.flac"), b"x").unwrap();
        fs::create_dir(tmp.path().join("talk")).unwrap();

        let paths = resolve_companions(&desc, None, None).unwrap();
        assert_eq!(paths.audio, tmp.path().join("talk.flac"));
    }

    #[test]
    fn test_probe_finds_slide_directory_variants() {
        let (tmp, desc) = fixture();
        fs::write(tmp.path().join("talk.ogg"), b"x").unwrap();
        fs::create_dir(tmp.path().join("talk-slides")).unwrap();

        let paths = resolve_companions(&desc, None, None).unwrap();
        assert_eq!(paths.slides, tmp.path().join("talk-slides"));
    }

    #[test]
    fn test_no_audio_companion_fails() {
        let (tmp, desc) = fixture();
        fs::create_dir(tmp.path().join("talk")).unwrap();
        let err = resolve_companions(&desc, None, None).unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }

    #[test]
    fn test_explicit_paths_bypass_probing() {
        let (tmp, desc) = fixture();
        let audio = tmp.path().join("other.wav");
        fs::write(&audio, b"x").unwrap();
        let slides = tmp.path().join("pages");
        fs::create_dir(&slides).unwrap();

        let paths = resolve_companions(&desc, Some(audio.clone()), Some(slides.clone())).unwrap();
        assert_eq!(paths.audio, audio);
        assert_eq!(paths.slides, slides);
    }

    #[test]
    fn test_explicit_missing_audio_fails() {
        let (tmp, desc) = fixture();
        fs::create_dir(tmp.path().join("talk")).unwrap();
        let err =
            resolve_companions(&desc, Some(tmp.path().join("absent.mp3")), None).unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }
}
