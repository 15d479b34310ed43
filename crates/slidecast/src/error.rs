use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for a playback session.
///
/// `Format`, `Resource` and `Config` are fatal and abort startup before a
/// window or any playback exists. `Range` is recoverable: it is reported on
/// the console and the session continues with its state unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A malformed description line. The whole parse is abandoned.
    #[error("Invalid description line {line}: {reason}")]
    Format { line: usize, reason: String },

    /// A missing or unreadable audio file, slide deck or description file.
    #[error("{0}")]
    Resource(String),

    /// A slide index outside the deck, from manual paging or a stale
    /// timeline reference.
    #[error("Slide {index} out of range (deck has {deck_len} pages)")]
    Range { index: i64, deck_len: usize },

    /// An invalid setting, from the command line or the config file.
    #[error("{0}")]
    Config(String),
}

impl Error {
    pub fn resource(message: impl Into<String>) -> Self {
        Self::Resource(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
