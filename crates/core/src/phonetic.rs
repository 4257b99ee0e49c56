//! Phonetic hashing
//!
//! Words are reduced to a short string of character classes so that
//! candidates for a misspelled word can be located with a prefix range
//! scan instead of computing an edit distance against every word.

/// Longest phonetic hash kept for a search pattern.
pub const MAX_HASH_LEN: usize = 30;

/// Sound class of a single ASCII character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Silent,
    Vowel,
    B,
    C,
    D,
    H,
    L,
    R,
    M,
    Y,
    Digit,
    Space,
    Other,
}

impl CharClass {
    /// Class of a character at the start of a word.
    #[must_use]
    pub const fn initial(c: u8) -> Self {
        match c.to_ascii_lowercase() {
            b'y' | b'w' => Self::Y,
            b'h' => Self::H,
            _ => Self::common(c),
        }
    }

    /// Class of a character after the first emitted one.
    #[must_use]
    pub const fn middle(c: u8) -> Self {
        match c.to_ascii_lowercase() {
            b'y' => Self::Vowel,
            b'h' | b'w' => Self::Silent,
            _ => Self::common(c),
        }
    }

    const fn common(c: u8) -> Self {
        match c.to_ascii_lowercase() {
            b'a' | b'e' | b'i' | b'o' | b'u' => Self::Vowel,
            b'b' | b'f' | b'p' | b'v' => Self::B,
            b'c' | b'g' | b'j' | b'k' | b'q' | b's' | b'x' | b'z' => Self::C,
            b'd' | b't' => Self::D,
            b'l' => Self::L,
            b'r' => Self::R,
            b'm' | b'n' => Self::M,
            b'0'..=b'9' => Self::Digit,
            b' ' | b'\t' | b'\n' | b'\r' => Self::Space,
            b'\'' => Self::Silent,
            _ => Self::Other,
        }
    }

    /// Letter written into the hash for this class.
    #[must_use]
    pub const fn letter(self) -> u8 {
        match self {
            Self::Silent => b'.',
            Self::Vowel => b'A',
            Self::B => b'B',
            Self::C => b'C',
            Self::D => b'D',
            Self::H => b'H',
            Self::L => b'L',
            Self::R => b'R',
            Self::M => b'M',
            Self::Y => b'Y',
            Self::Digit => b'9',
            Self::Space => b' ',
            Self::Other => b'?',
        }
    }

    /// Whether this is one of the consonant classes B through Y.
    #[must_use]
    pub const fn is_consonant(self) -> bool {
        matches!(
            self,
            Self::B | Self::C | Self::D | Self::H | Self::L | Self::R | Self::M | Self::Y
        )
    }

    const fn is_liquid(self) -> bool {
        matches!(self, Self::L | Self::R)
    }
}

/// Compute the phonetic hash of `input`.
///
/// Input is expected to be ASCII (see [`crate::transliterate`]); any other
/// byte is treated as punctuation.
#[must_use]
pub fn phonetic_hash(input: &str) -> String {
    let mut bytes = input.as_bytes();
    if bytes.len() > 2
        && matches!(bytes[0].to_ascii_lowercase(), b'g' | b'k')
        && bytes[1].to_ascii_lowercase() == b'n'
    {
        bytes = &bytes[1..];
    }

    let lower = |i: usize| bytes.get(i).map(u8::to_ascii_lowercase);

    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut prev: Option<CharClass> = None;
    let mut prev_emitted: Option<CharClass> = None;
    let mut initial = true;

    for (i, &raw) in bytes.iter().enumerate() {
        let c = raw.to_ascii_lowercase();
        match (c, lower(i + 1), lower(i + 2)) {
            (b'w', Some(b'r'), _) | (b'd', Some(b'j' | b'g'), _) | (b't', Some(b'c'), Some(b'h')) => {
                continue;
            },
            _ => {},
        }

        let class = if !raw.is_ascii() {
            CharClass::Other
        } else if initial {
            CharClass::initial(raw)
        } else {
            CharClass::middle(raw)
        };

        if class == CharClass::Space {
            continue;
        }
        if class == CharClass::Other && prev != Some(CharClass::Digit) {
            continue;
        }
        initial = false;

        // No vowels beside L or R
        if class == CharClass::Vowel && prev_emitted.is_some_and(CharClass::is_liquid) {
            continue;
        }
        if class.is_liquid() && prev_emitted == Some(CharClass::Vowel) && out.last() == Some(&b'A')
        {
            out.pop();
        }

        prev = Some(class);
        if class == CharClass::Silent {
            continue;
        }
        prev_emitted = Some(class);

        let letter = class.letter();
        if out.last() != Some(&letter) {
            out.push(letter);
        }
    }

    out.into_iter().map(char::from).collect()
}
