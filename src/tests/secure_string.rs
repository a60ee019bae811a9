use super::*;
use crate::{charsets::Category, password_generator::GenerationConfig};

#[test]
fn utf16le_bytes_of_ascii() {
    assert_eq!(vec![b'A', 0, b'b', 0], utf16le_bytes("Ab"));
}

#[test]
fn utf16le_bytes_of_astral_code_point() {
    // U+1F600 is the surrogate pair D83D DE00
    assert_eq!(vec![0x3D, 0xD8, 0x00, 0xDE], utf16le_bytes("😀"));
}

#[test]
fn utf16le_base64_matches_dotnet() {
    // [Convert]::ToBase64String([Text.Encoding]::Unicode.GetBytes("password"))
    assert_eq!("cABhAHMAcwB3AG8AcgBkAA==", utf16le_base64("password"));
    assert_eq!("", utf16le_base64(""));
}

#[test]
fn secure_string_command_plain() {
    assert_eq!(
        "ConvertTo-SecureString -String \"abc123\" -AsPlainText -Force",
        powershell_secure_string_command("abc123")
    );
}

#[test]
fn secure_string_command_escapes_specials() {
    assert_eq!(
        "ConvertTo-SecureString -String \"a`\"b`$c``d'e\" -AsPlainText -Force",
        powershell_secure_string_command("a\"b$c`d'e")
    );
}

#[test]
fn secure_string_from_base64_embeds_encoding() {
    let snippet = powershell_secure_string_from_base64("password");

    assert!(snippet.starts_with(
        "$b = [System.Convert]::FromBase64String('cABhAHMAcwB3AG8AcgBkAA=='); "
    ));
    assert!(snippet.contains("[System.Text.Encoding]::Unicode.GetString($b)"));
    assert!(snippet.contains("foreach ($c in $s.ToCharArray()) { $ss.AppendChar($c) };"));
    assert!(snippet.ends_with("$ss.MakeReadOnly(); $ss"));
    assert!(!snippet.contains("password"));
}

#[test]
fn report_serializes_every_field() {
    let config = GenerationConfig::new(16).with_category(Category::Latin);
    let result = crate::password_generator::generate(&config).unwrap();
    let report = PasswordReport::new(&result);

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();

    assert_eq!(json["Password"], result.password());
    assert!(json["Combinations"].is_number());
    assert_eq!(
        json["PasswordUtf16Base64"],
        utf16le_base64(result.password()).as_str()
    );
    assert!(json["PowerShellCreateSecureString"]
        .as_str()
        .unwrap()
        .starts_with("ConvertTo-SecureString"));
    assert!(json["PowerShellCreateSecureStringFromBase64"]
        .as_str()
        .unwrap()
        .starts_with("$b = "));
}

#[test]
fn report_of_all_unicode_password_is_infinite() {
    let config = GenerationConfig::new(8).include_all_unicode(true);
    let result = crate::password_generator::generate(&config).unwrap();
    let report = PasswordReport::new(&result);

    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["Combinations"], "Infinity");
}
