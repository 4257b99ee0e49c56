/// Combine an edit distance with a word's rank into a single score.
///
/// Lower is better. Each doubling of the rank takes one point off, so
/// frequent words win ties between equally distant candidates.
#[must_use]
pub fn candidate_score(distance: i32, rank: i64) -> i32 {
    let bits = if rank > 0 { 64 - rank.leading_zeros() } else { 0 };
    distance.saturating_add(32).saturating_sub(bits as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_lowers_score() {
        assert_eq!(candidate_score(0, 0), 32);
        assert_eq!(candidate_score(0, 1), 31);
        assert_eq!(candidate_score(0, 2), 30);
        assert_eq!(candidate_score(0, 3), 30);
        assert_eq!(candidate_score(100, 1024), 121);
        assert!(candidate_score(150, 1_000_000) < candidate_score(150, 1));
    }

    #[test]
    fn test_negative_rank_treated_as_zero() {
        assert_eq!(candidate_score(10, -5), 42);
    }
}
