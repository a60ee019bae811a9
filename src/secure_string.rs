//! Text representations of a password for handing it to PowerShell.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::password_generator::{Combinations, PasswordResult};

/// The UTF-16LE bytes of the password, which is how .NET strings are laid out.
pub fn utf16le_bytes(password: &str) -> Vec<u8> {
    password
        .encode_utf16()
        .flat_map(|unit| unit.to_le_bytes())
        .collect()
}

pub fn utf16le_base64(password: &str) -> String {
    STANDARD.encode(utf16le_bytes(password))
}

/// Escapes the characters PowerShell interprets inside a double quoted string.
fn escape_double_quoted(password: &str) -> String {
    let mut escaped = String::with_capacity(password.len());
    for ch in password.chars() {
        if matches!(ch, '`' | '"' | '$') {
            escaped.push('`');
        }
        escaped.push(ch);
    }
    escaped
}

pub fn powershell_secure_string_command(password: &str) -> String {
    format!(
        "ConvertTo-SecureString -String \"{}\" -AsPlainText -Force",
        escape_double_quoted(password)
    )
}

/// A snippet rebuilding the password as a read-only `SecureString` without the plain text ever
/// appearing in the script.
pub fn powershell_secure_string_from_base64(password: &str) -> String {
    format!(
        "$b = [System.Convert]::FromBase64String('{}'); \
         $s = [System.Text.Encoding]::Unicode.GetString($b); \
         $ss = New-Object System.Security.SecureString; \
         foreach ($c in $s.ToCharArray()) {{ $ss.AppendChar($c) }}; \
         $ss.MakeReadOnly(); $ss",
        utf16le_base64(password)
    )
}

/// Everything the command line prints about one password.
#[derive(Serialize, Zeroize, ZeroizeOnDrop)]
pub struct PasswordReport {
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "Combinations")]
    #[zeroize(skip)]
    pub combinations: Combinations,
    #[serde(rename = "PowerShellCreateSecureString")]
    pub secure_string_command: String,
    #[serde(rename = "PowerShellCreateSecureStringFromBase64")]
    pub secure_string_from_base64: String,
    #[serde(rename = "PasswordUtf16Base64")]
    pub utf16_base64: String,
}

impl PasswordReport {
    pub fn new(result: &PasswordResult) -> Self {
        let password = result.password();
        Self {
            password: password.to_owned(),
            combinations: result.combinations(),
            secure_string_command: powershell_secure_string_command(password),
            secure_string_from_base64: powershell_secure_string_from_base64(password),
            utf16_base64: utf16le_base64(password),
        }
    }
}

#[cfg(test)]
#[path = "tests/secure_string.rs"]
mod secure_string_tests;
