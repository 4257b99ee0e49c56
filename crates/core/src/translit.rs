//! Transliteration of Unicode text to ASCII
//!
//! Latin letters lose their diacritics through canonical decomposition,
//! while letters that have no decomposition (ligatures, Greek, Cyrillic)
//! come from a lookup table. Anything left over becomes `?`.

use unicode_normalization::UnicodeNormalization as _;
use unicode_normalization::char::is_combining_mark;

fn lookup(c: char) -> Option<&'static str> {
    let s = match c {
        // Latin letters without a decomposition
        'æ' => "ae",
        'œ' => "oe",
        'ß' => "ss",
        'ø' => "o",
        'đ' | 'ð' => "d",
        'þ' => "th",
        'ł' => "l",
        'ħ' => "h",
        'ı' => "i",
        'ŧ' => "t",
        'ŋ' => "ng",
        'ĸ' => "q",
        'ƒ' => "f",
        // Punctuation
        '\u{2018}' | '\u{2019}' | '\u{201B}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' => "\"",
        '\u{2010}'..='\u{2015}' => "-",
        '\u{00AB}' => "<<",
        '\u{00BB}' => ">>",
        // Greek
        'α' => "a",
        'β' => "b",
        'γ' => "g",
        'δ' => "d",
        'ε' => "e",
        'ζ' => "z",
        'η' => "i",
        'θ' => "th",
        'ι' => "i",
        'κ' => "k",
        'λ' => "l",
        'μ' => "m",
        'ν' => "n",
        'ξ' => "x",
        'ο' => "o",
        'π' => "p",
        'ρ' => "r",
        'σ' | 'ς' => "s",
        'τ' => "t",
        'υ' => "y",
        'φ' => "f",
        'χ' => "ch",
        'ψ' => "ps",
        'ω' => "o",
        // Cyrillic
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' | 'ґ' => "g",
        'д' => "d",
        'е' | 'ё' | 'э' => "e",
        'є' => "ye",
        'ж' => "zh",
        'з' => "z",
        'и' | 'і' => "i",
        'ї' => "yi",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' | 'ў' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(s)
}

/// Append the transliteration of a single character to `out`.
fn push_char(out: &mut String, c: char) {
    if c.is_ascii() {
        out.push(c);
        return;
    }
    if let Some(s) = lookup(c) {
        out.push_str(s);
        return;
    }
    if c.is_uppercase() {
        if let Some(s) = c.to_lowercase().next().and_then(lookup) {
            let mut chars = s.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
                out.push_str(chars.as_str());
            }
            return;
        }
    }
    if is_combining_mark(c) {
        return;
    }

    let mut pushed = false;
    for d in std::iter::once(c).nfkd() {
        if d.is_ascii() {
            out.push(d);
            pushed = true;
        } else if is_combining_mark(d) {
            continue;
        } else if let Some(s) = lookup(d) {
            out.push_str(s);
            pushed = true;
        }
    }
    if !pushed {
        out.push('?');
    }
}

/// Transliterate `input` into ASCII.
///
/// Case is preserved where the source script has case; characters with no
/// known transliteration become `?`.
#[must_use]
pub fn transliterate(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        push_char(&mut out, c);
    }
    out
}

/// Lower-case and transliterate a word the way it is stored for matching.
#[must_use]
pub fn normalize_word(input: &str) -> String {
    transliterate(&input.to_lowercase())
}

/// Number of leading characters of `word` whose transliteration covers the
/// first `translit_len` characters of `transliterate(word)`.
///
/// Used to report how much of a stored word a prefix search matched.
#[must_use]
pub fn transliterated_prefix_len(word: &str, translit_len: usize) -> usize {
    let mut covered = 0;
    let mut buf = String::new();
    for (n, c) in word.chars().enumerate() {
        if covered >= translit_len {
            return n;
        }
        buf.clear();
        push_char(&mut buf, c);
        covered += buf.chars().count();
    }
    word.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passes_through() {
        assert_eq!(transliterate("Hello, world!"), "Hello, world!");
        assert_eq!(transliterate(""), "");
    }

    #[test]
    fn test_latin_diacritics_removed() {
        assert_eq!(transliterate("café"), "cafe");
        assert_eq!(transliterate("Ångström"), "Angstrom");
        assert_eq!(transliterate("naïve façade"), "naive facade");
        assert_eq!(transliterate("Łódź"), "Lodz");
    }

    #[test]
    fn test_ligatures_and_special_letters() {
        assert_eq!(transliterate("straße"), "strasse");
        assert_eq!(transliterate("Æsir"), "Aesir");
        assert_eq!(transliterate("þorn"), "thorn");
        assert_eq!(transliterate("\u{FB01}le"), "file");
    }

    #[test]
    fn test_greek_and_cyrillic() {
        assert_eq!(transliterate("λόγος"), "logos");
        assert_eq!(transliterate("Москва"), "Moskva");
        assert_eq!(transliterate("щука"), "shchuka");
    }

    #[test]
    fn test_unknown_characters_become_question_marks() {
        assert_eq!(transliterate("日本"), "??");
        assert_eq!(transliterate("a☃b"), "a?b");
    }

    #[test]
    fn test_normalize_word_lowercases_first() {
        assert_eq!(normalize_word("Ærø"), "aero");
        assert_eq!(normalize_word("QUICK"), "quick");
        assert_eq!(normalize_word("ПРИВЕТ"), "privet");
    }

    #[test]
    fn test_prefix_len_maps_back_to_source_chars() {
        assert_eq!(transliterated_prefix_len("hello", 3), 3);
        assert_eq!(transliterated_prefix_len("straße", 6), 5);
        assert_eq!(transliterated_prefix_len("щука", 4), 1);
        assert_eq!(transliterated_prefix_len("abc", 10), 3);
        assert_eq!(transliterated_prefix_len("abc", 0), 0);
    }
}
