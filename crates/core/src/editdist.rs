//! Character-class aware edit distance for ASCII strings
//!
//! Costs depend on the sound class of the characters involved: swapping
//! two similar consonants is cheaper than swapping unrelated ones, and
//! dropping a doubled letter costs almost nothing.

use crate::error::{Result, SpellfixError};
use crate::phonetic::CharClass;

/// Insertions after the end of the pattern are divided by this.
const FINAL_INS_COST_DIV: i32 = 4;

fn character_class(prev: Option<u8>, c: u8) -> CharClass {
    match prev {
        None => CharClass::initial(c),
        Some(_) => CharClass::middle(c),
    }
}

/// Cost of inserting or deleting `c`, which sits between `prev` and `next`.
fn insert_or_delete_cost(prev: Option<u8>, c: u8, next: Option<u8>) -> i32 {
    let class_c = character_class(prev, c);
    if class_c == CharClass::Silent {
        return 1;
    }
    if prev == Some(c) {
        return 10;
    }
    if class_c == CharClass::Vowel && (prev == Some(b'r') || next == Some(b'r')) {
        return 20;
    }
    let class_prev = prev.map(|p| character_class(Some(p), p));
    if class_prev == Some(class_c) {
        if class_c == CharClass::Vowel {
            return 15;
        }
        return 50;
    }
    100
}

/// Cost of turning `from` into `to` when the preceding character is `prev`.
fn substitute_cost(prev: Option<u8>, from: u8, to: u8) -> i32 {
    if from.eq_ignore_ascii_case(&to) {
        return 0;
    }
    let class_from = character_class(prev, from);
    let class_to = character_class(prev, to);
    if class_from == class_to {
        return 40;
    }
    if class_from.is_consonant() && class_to.is_consonant() {
        return 75;
    }
    100
}

/// Edit distance from `pattern` to `target`.
///
/// A trailing `*` on the pattern lets it match any prefix of the target.
///
/// # Errors
/// Returns [`SpellfixError::NonAscii`] if either string is not ASCII.
pub fn edit_distance(pattern: &str, target: &str) -> Result<i32> {
    edit_distance_with_len(pattern, target).map(|(d, _)| d)
}

/// Like [`edit_distance`], also returning how many characters of `target`
/// were matched.
///
/// # Errors
/// Returns [`SpellfixError::NonAscii`] if either string is not ASCII.
pub fn edit_distance_with_len(pattern: &str, target: &str) -> Result<(i32, usize)> {
    if !pattern.is_ascii() || !target.is_ascii() {
        return Err(SpellfixError::NonAscii);
    }
    let (a, prefix) = match pattern.as_bytes() {
        [rest @ .., b'*'] => (rest, true),
        all => (all, false),
    };
    let b = target.as_bytes();
    let (n, m) = (a.len(), b.len());

    let at = |s: &[u8], i: usize| -> Option<u8> { s.get(i).copied() };
    let before = |s: &[u8], i: usize| -> Option<u8> { i.checked_sub(1).and_then(|p| at(s, p)) };

    let mut d = vec![vec![0_i32; m + 1]; n + 1];
    for i in 1..=n {
        d[i][0] = d[i - 1][0] + insert_or_delete_cost(before(a, i - 1), a[i - 1], at(a, i));
    }
    for j in 1..=m {
        let mut cost = insert_or_delete_cost(before(b, j - 1), b[j - 1], at(b, j));
        if n == 0 {
            cost /= FINAL_INS_COST_DIV;
        }
        d[0][j] = d[0][j - 1] + cost;
    }

    for i in 1..=n {
        for j in 1..=m {
            let del = d[i - 1][j] + insert_or_delete_cost(before(a, i - 1), a[i - 1], at(a, i));
            let mut ins_cost = insert_or_delete_cost(before(b, j - 1), b[j - 1], at(b, j));
            if i == n {
                ins_cost /= FINAL_INS_COST_DIV;
            }
            let ins = d[i][j - 1] + ins_cost;
            let sub = d[i - 1][j - 1] + substitute_cost(before(a, i - 1), a[i - 1], b[j - 1]);
            d[i][j] = del.min(ins).min(sub);
        }
    }

    if prefix {
        let mut best = (d[n][0], 0);
        for (j, &cost) in d[n].iter().enumerate().skip(1) {
            if cost < best.0 {
                best = (cost, j);
            }
        }
        return Ok(best);
    }
    Ok((d[n][m], m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_and_case_only() {
        assert_eq!(edit_distance("abc", "abc").unwrap(), 0);
        assert_eq!(edit_distance("abc", "ABC").unwrap(), 0);
        assert_eq!(edit_distance("", "").unwrap(), 0);
    }

    #[test]
    fn test_similar_consonant_substitution() {
        assert_eq!(edit_distance("cat", "bat").unwrap(), 75);
    }

    #[test]
    fn test_doubled_letter_is_cheap() {
        assert_eq!(edit_distance("hello", "helo").unwrap(), 10);
    }

    #[test]
    fn test_trailing_insertions_discounted() {
        assert_eq!(edit_distance("hel", "help").unwrap(), 25);
    }

    #[test]
    fn test_prefix_pattern() {
        assert_eq!(edit_distance_with_len("abc*", "abcdef").unwrap(), (0, 3));
        assert_eq!(edit_distance("*", "anything").unwrap(), 0);
    }

    #[test]
    fn test_non_ascii_rejected() {
        assert!(matches!(edit_distance("café", "cafe"), Err(SpellfixError::NonAscii)));
        assert!(matches!(edit_distance("cafe", "日本"), Err(SpellfixError::NonAscii)));
    }

    #[test]
    fn test_distance_grows_with_difference() {
        let close = edit_distance("recieve", "receive").unwrap();
        let far = edit_distance("recieve", "xylophone").unwrap();
        assert!(close < far);
    }
}
