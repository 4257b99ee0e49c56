//! Writing-system detection

/// Script codes reported by `spellfix1_scriptcode()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Latin,
    Cyrillic,
    Greek,
    Hebrew,
    Arabic,
}

impl Script {
    /// Numeric code for this script.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Latin => 215,
            Self::Cyrillic => 220,
            Self::Greek => 200,
            Self::Hebrew => 125,
            Self::Arabic => 160,
        }
    }

    fn of(c: char) -> Option<Self> {
        match u32::from(c) {
            0x41..=0x5A | 0x61..=0x7A | 0xC0..=0x24F | 0x1E00..=0x1EFF => Some(Self::Latin),
            0x370..=0x3FF | 0x1F00..=0x1FFF => Some(Self::Greek),
            0x400..=0x52F => Some(Self::Cyrillic),
            0x590..=0x5FF => Some(Self::Hebrew),
            0x600..=0x6FF | 0x750..=0x77F => Some(Self::Arabic),
            _ => None,
        }
    }
}

/// Code returned when letters from more than one script are present.
pub const MIXED_SCRIPT: i32 = 998;
/// Code returned when no letter from a known script is present.
pub const UNKNOWN_SCRIPT: i32 = 999;

/// Identify the script `input` is written in.
#[must_use]
pub fn script_code(input: &str) -> i32 {
    let mut found: Option<Script> = None;
    for c in input.chars().filter(|c| c.is_alphabetic()) {
        let Some(script) = Script::of(c) else { continue };
        match found {
            None => found = Some(script),
            Some(s) if s != script => return MIXED_SCRIPT,
            Some(_) => {},
        }
    }
    found.map_or(UNKNOWN_SCRIPT, Script::code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_scripts() {
        assert_eq!(script_code("hello"), 215);
        assert_eq!(script_code("Ærøskøbing"), 215);
        assert_eq!(script_code("привет"), 220);
        assert_eq!(script_code("καλημέρα"), 200);
        assert_eq!(script_code("שלום"), 125);
        assert_eq!(script_code("سلام"), 160);
    }

    #[test]
    fn test_digits_and_punctuation_ignored() {
        assert_eq!(script_code("abc 123!"), 215);
        assert_eq!(script_code("42"), UNKNOWN_SCRIPT);
        assert_eq!(script_code(""), UNKNOWN_SCRIPT);
    }

    #[test]
    fn test_mixed_scripts() {
        assert_eq!(script_code("hello мир"), MIXED_SCRIPT);
    }
}
