use std::io;

/// A enum that contains the different types of errors that the library returns as part of Result's.
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// The generation config can't produce a password, e.g. a zero length.
    InvalidConfig(String),
    /// The operating system offers no cryptographically strong random source.
    NoSecureRandomSource,
    /// A textual code point range that couldn't be parsed.
    InvalidRange(String),
    Io(io::Error),
    ConfigError(config::ConfigError),
    SerError(toml::ser::Error),
    Generic(&'static str),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err)
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::SerError(err)
    }
}

impl From<rand::Error> for Error {
    fn from(_err: rand::Error) -> Self {
        Self::NoSecureRandomSource
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(err) => write!(f, "invalid config: {err}"),
            Self::NoSecureRandomSource => write!(f, "no secure random source available"),
            Self::InvalidRange(err) => write!(f, "invalid code point range: {err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::ConfigError(err) => write!(f, "{err}"),
            Self::SerError(err) => write!(f, "{err}"),
            Self::Generic(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

/// Convenience type for Results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "tests/error.rs"]
mod error_tests;
