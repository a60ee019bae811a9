use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const UPPERCASE_LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE_LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";
pub const LATIN_LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
pub const NUMBERS: &str = "0123456789";
pub const SIGNS: &str = "/|(){}[]?-_+~!;:,^.$@%&*";

const CYRILLIC_LETTERS: &str = "БбВвГгДдЕеЖжЗзИиЙйКкЛлМмНнОоПпРрСсТтУуФфХхЦцЧчШшЩщЬьЮюЯя";
const GREEK_LETTERS: &str = "ΑαΒβΓγΔδΕεΖζΗηΘθΙιΚκΛλΜμΝνΞξΟοΠπΡρΣσςΤτΥυΦφΧχΨψΩω";
const ARMENIAN_LETTERS: &str = "աբգդեզէըթժիլխծկհձղճմյնշոչպջռսվտրցւփքօֆև";
const HANGUL_LETTERS: &str = "ㄱㄴㄷㄹㅁㅂㅅㅇㅈㅊㅋㅌㅍㅎㅏㅑㅓㅕㅗㅛㅜㅠㅡㅣ";
const NORDIC_LETTERS: &str = "ÁáÐðÉéÍíÓóÚúÝýÞþÆæÖöZzÄäØøÅå";
const ARABIC_LETTERS: &str = "ءيوهنملكقفغعظطضصشسزرذدخحجثتبا";
const GEORGIAN_LETTERS: &str = "აბგდევზთიკლმნოპჟრსტუფქღყშჩცძწჭხჯჰ";
const ETHIOPIAN_LETTERS: &str = "ሀለሐመሠረሰቀበተኀነአከወዐዘየደገጠጸፀፈጰፐ";
const THAANA_LETTERS: &str = "ހށނރބޅކއވމފދތލގސޑޒޓޔޕޖޗޘޙޚޛޜޝޞޟޠޡޢޣޤޥ";
const HANZI_LETTERS: &str = "ぁあぃいぅうぇえぉおかがきぎくぐけげこごさざしじすずせぜそぞただちぢっつづてでとどなにぬねのはばぱひびぴふぶぷへべぺほぼぽまみむめもゃやゅゆょよらりるれろゎわゐゑをんゔゕゖ";

/// Characters used when nothing else is enabled, and as the replacement when rejection sampling
/// gives up. It has no signs, so a `?` in the output is never a sampling artifact.
pub const FALLBACK_POOL: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// The Buhid block, which is never emitted.
pub const BUHID: CodePointRange = CodePointRange::new(0x1740, 0x175F);

/// A named character set that can be folded into the base pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Latin,
    Numbers,
    Signs,
    Cyrillic,
    Greek,
    Armenian,
    Hangul,
    Nordic,
    Arabic,
    Georgian,
    Ethiopian,
    Thaana,
    /// Japanese syllables (hiragana).
    Hanzi,
}

/// A character class the finished password must contain a minimum number of.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    Uppercase,
    Lowercase,
    Digit,
    Sign,
    Script(Category),
}

impl CharClass {
    pub fn members(self) -> &'static str {
        match self {
            Self::Uppercase => UPPERCASE_LETTERS,
            Self::Lowercase => LOWERCASE_LETTERS,
            Self::Digit => NUMBERS,
            Self::Sign => SIGNS,
            Self::Script(category) => category.letters(),
        }
    }

    pub fn contains(self, ch: char) -> bool {
        self.members().contains(ch)
    }
}

impl Category {
    pub const ALL: [Category; 13] = [
        Category::Latin,
        Category::Numbers,
        Category::Signs,
        Category::Cyrillic,
        Category::Greek,
        Category::Armenian,
        Category::Hangul,
        Category::Nordic,
        Category::Arabic,
        Category::Georgian,
        Category::Ethiopian,
        Category::Thaana,
        Category::Hanzi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Latin => "latin",
            Self::Numbers => "numbers",
            Self::Signs => "signs",
            Self::Cyrillic => "cyrillic",
            Self::Greek => "greek",
            Self::Armenian => "armenian",
            Self::Hangul => "hangul",
            Self::Nordic => "nordic",
            Self::Arabic => "arabic",
            Self::Georgian => "georgian",
            Self::Ethiopian => "ethiopian",
            Self::Thaana => "thaana",
            Self::Hanzi => "hanzi",
        }
    }

    pub fn letters(self) -> &'static str {
        match self {
            Self::Latin => LATIN_LETTERS,
            Self::Numbers => NUMBERS,
            Self::Signs => SIGNS,
            Self::Cyrillic => CYRILLIC_LETTERS,
            Self::Greek => GREEK_LETTERS,
            Self::Armenian => ARMENIAN_LETTERS,
            Self::Hangul => HANGUL_LETTERS,
            Self::Nordic => NORDIC_LETTERS,
            Self::Arabic => ARABIC_LETTERS,
            Self::Georgian => GEORGIAN_LETTERS,
            Self::Ethiopian => ETHIOPIAN_LETTERS,
            Self::Thaana => THAANA_LETTERS,
            Self::Hanzi => HANZI_LETTERS,
        }
    }

    /// How many times the letters are repeated in the base pool, raising their sampling
    /// probability.
    pub fn weight(self) -> usize {
        match self {
            Self::Numbers => 3,
            Self::Signs => 2,
            _ => 1,
        }
    }

    /// The classes this category guarantees in the output, with their minimum counts.
    pub fn requirements(self) -> Vec<(CharClass, usize)> {
        match self {
            Self::Latin => vec![(CharClass::Uppercase, 2), (CharClass::Lowercase, 2)],
            Self::Numbers => vec![(CharClass::Digit, 3)],
            Self::Signs => vec![(CharClass::Sign, 2)],
            script => vec![(CharClass::Script(script), 1)],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.replace('-', "").to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == normalized)
            .ok_or(Error::Generic("unknown character category"))
    }
}

/// An inclusive range of Unicode code points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodePointRange {
    pub start: u32,
    pub end: u32,
}

impl CodePointRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, cp: u32) -> bool {
        self.start <= cp && cp <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

fn parse_bound(s: &str) -> Result<u32> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    parsed.map_err(|err| Error::InvalidRange(format!("'{s}': {err}")))
}

impl FromStr for CodePointRange {
    type Err = Error;

    /// Parses `START:END`, each bound either decimal or `0x` prefixed hexadecimal.
    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidRange(format!("'{s}' is not of the form START:END")))?;

        let range = Self::new(parse_bound(start)?, parse_bound(end)?);
        if range.is_inverted() {
            return Err(Error::InvalidRange(format!("'{s}' starts after it ends")));
        }
        Ok(range)
    }
}

impl fmt::Display for CodePointRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:X}:0x{:X}", self.start, self.end)
    }
}

/// Broad Unicode blocks sampled in all-Unicode mode. Each span is trimmed to the assigned,
/// mostly spacing, part of its block.
pub const ALL_UNICODE_RANGES: &[CodePointRange] = &[
    CodePointRange::new(0x00C0, 0x00FF), // Latin-1 Supplement letters
    CodePointRange::new(0x0100, 0x017F), // Latin Extended-A
    CodePointRange::new(0x0180, 0x024F), // Latin Extended-B
    CodePointRange::new(0x0250, 0x02AF), // IPA Extensions
    CodePointRange::new(0x0391, 0x03A1), // Greek capitals
    CodePointRange::new(0x03A3, 0x03C9), // Greek
    CodePointRange::new(0x0400, 0x0482), // Cyrillic
    CodePointRange::new(0x048A, 0x04FF), // Cyrillic
    CodePointRange::new(0x0531, 0x0556), // Armenian capitals
    CodePointRange::new(0x0561, 0x0587), // Armenian
    CodePointRange::new(0x05D0, 0x05EA), // Hebrew
    CodePointRange::new(0x0620, 0x064A), // Arabic
    CodePointRange::new(0x0780, 0x07A5), // Thaana
    CodePointRange::new(0x0904, 0x0939), // Devanagari
    CodePointRange::new(0x0985, 0x098C), // Bengali
    CodePointRange::new(0x0B85, 0x0B8A), // Tamil
    CodePointRange::new(0x0E01, 0x0E30), // Thai
    CodePointRange::new(0x0F40, 0x0F47), // Tibetan
    CodePointRange::new(0x1000, 0x102A), // Myanmar
    CodePointRange::new(0x10D0, 0x10FA), // Georgian
    CodePointRange::new(0x1100, 0x1112), // Hangul Jamo
    CodePointRange::new(0x1200, 0x1248), // Ethiopic
    CodePointRange::new(0x13A0, 0x13F4), // Cherokee
    CodePointRange::new(0x1401, 0x166C), // Canadian Aboriginal Syllabics
    CodePointRange::new(0x1681, 0x169A), // Ogham
    CodePointRange::new(0x16A0, 0x16EA), // Runic
    CodePointRange::new(0x1700, 0x170C), // Tagalog
    CodePointRange::new(0x1740, 0x1753), // Buhid, always rejected
    CodePointRange::new(0x1780, 0x17B3), // Khmer
    CodePointRange::new(0x1820, 0x1877), // Mongolian
    CodePointRange::new(0x1E00, 0x1EFF), // Latin Extended Additional
    CodePointRange::new(0x1F00, 0x1F15), // Greek Extended
    CodePointRange::new(0x20A0, 0x20C0), // Currency Symbols
    CodePointRange::new(0x2100, 0x214F), // Letterlike Symbols
    CodePointRange::new(0x2150, 0x2189), // Number Forms
    CodePointRange::new(0x2190, 0x21FF), // Arrows
    CodePointRange::new(0x2200, 0x22FF), // Mathematical Operators
    CodePointRange::new(0x2300, 0x23FF), // Miscellaneous Technical
    CodePointRange::new(0x2500, 0x257F), // Box Drawing
    CodePointRange::new(0x2580, 0x259F), // Block Elements
    CodePointRange::new(0x25A0, 0x25FF), // Geometric Shapes
    CodePointRange::new(0x2600, 0x26FF), // Miscellaneous Symbols
    CodePointRange::new(0x2700, 0x27BF), // Dingbats
    CodePointRange::new(0x2801, 0x28FF), // Braille Patterns
    CodePointRange::new(0x3041, 0x3096), // Hiragana
    CodePointRange::new(0x30A1, 0x30FA), // Katakana
    CodePointRange::new(0x3105, 0x312F), // Bopomofo
    CodePointRange::new(0x4E00, 0x9FFF), // CJK Unified Ideographs
    CodePointRange::new(0xA000, 0xA48C), // Yi Syllables
    CodePointRange::new(0xAC00, 0xD7A3), // Hangul Syllables
    CodePointRange::new(0x1F300, 0x1F5FF), // Miscellaneous Symbols and Pictographs
    CodePointRange::new(0x1F600, 0x1F64F), // Emoticons
    CodePointRange::new(0x1F680, 0x1F6C5), // Transport and Map Symbols
];

pub const EMOJI_RANGES: &[CodePointRange] = &[
    CodePointRange::new(0x1F300, 0x1F5FF),
    CodePointRange::new(0x1F600, 0x1F64F),
    CodePointRange::new(0x1F680, 0x1F6C5),
    CodePointRange::new(0x1F90C, 0x1F9FF),
];

pub const SYMBOL_RANGES: &[CodePointRange] = &[
    CodePointRange::new(0x2190, 0x21FF),
    CodePointRange::new(0x2200, 0x22FF),
    CodePointRange::new(0x2300, 0x23FF),
    CodePointRange::new(0x25A0, 0x25FF),
    CodePointRange::new(0x2600, 0x26FF),
];

pub const DINGBAT_RANGES: &[CodePointRange] = &[CodePointRange::new(0x2700, 0x27BF)];

fn is_format(cp: u32) -> bool {
    matches!(cp, 0x00AD | 0x200B..=0x200F | 0x2028..=0x202E | 0x2060..=0x206F | 0xFEFF)
}

fn is_noncharacter(cp: u32) -> bool {
    (0xFDD0..=0xFDEF).contains(&cp) || cp & 0xFFFE == 0xFFFE
}

fn is_variation_selector(cp: u32) -> bool {
    (0xFE00..=0xFE0F).contains(&cp) || (0xE0100..=0xE01EF).contains(&cp)
}

/// Code points that are never emitted regardless of configuration: surrogates and values
/// outside Unicode, control, whitespace and format characters, noncharacters, variation
/// selectors and the Buhid block.
pub fn is_disallowed(cp: u32) -> bool {
    let Some(ch) = char::from_u32(cp) else {
        return true;
    };

    ch.is_control()
        || ch.is_whitespace()
        || is_format(cp)
        || is_noncharacter(cp)
        || is_variation_selector(cp)
        || BUHID.contains(cp)
}

#[cfg(test)]
#[path = "tests/charsets.rs"]
mod charsets_tests;
