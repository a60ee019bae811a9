/// This is the library part of strongpw, it generates randomized passwords from script, digit,
/// punctuation and Unicode code point pools.
pub mod password_generator;
/// The literal character sets, their sampling weights and the code point range tables.
pub mod charsets;
/// Derived representations of a password, for handing it to PowerShell as a `SecureString`.
pub mod secure_string;
/// Persistent defaults read from `settings.toml` and the environment.
pub mod settings;

pub mod error;

pub use error::{Error, Result};
pub use password_generator::{generate, generate_with_rng, GenerationConfig, PasswordResult};
