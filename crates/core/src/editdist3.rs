//! Configurable edit distance ("editdist3")
//!
//! Costs come from a table of `(iLang, cFrom, cTo, iCost)` rows. Special
//! rows using `?` set the per-language default insert, delete and
//! substitute costs; every other row is a rule rewriting `cFrom` into `cTo`.
//! A `cFrom` starting with `^` only applies at the start of the source
//! string, one ending in `$` only at its end.

/// Insertion cost used when a language does not define one.
pub const DEFAULT_INS_COST: i32 = 100;
/// Deletion cost used when a language does not define one.
pub const DEFAULT_DEL_COST: i32 = 100;
/// Substitution cost used when a language does not define one.
pub const DEFAULT_SUB_COST: i32 = 150;

/// Longest `cFrom` / `cTo` accepted, in bytes.
const MAX_RULE_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
struct EditRule {
    from: Vec<char>,
    to: Vec<char>,
    cost: i32,
    at_start: bool,
    at_end: bool,
}

/// Costs for a single language id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCosts {
    pub lang_id: i64,
    pub ins_cost: i32,
    pub del_cost: i32,
    pub sub_cost: i32,
    rules: Vec<EditRule>,
}

impl LanguageCosts {
    fn new(lang_id: i64) -> Self {
        Self {
            lang_id,
            ins_cost: DEFAULT_INS_COST,
            del_cost: DEFAULT_DEL_COST,
            sub_cost: DEFAULT_SUB_COST,
            rules: Vec::new(),
        }
    }

    /// Number of rewrite rules, not counting default costs.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

static DEFAULT_LANGUAGE: LanguageCosts = LanguageCosts {
    lang_id: 0,
    ins_cost: DEFAULT_INS_COST,
    del_cost: DEFAULT_DEL_COST,
    sub_cost: DEFAULT_SUB_COST,
    rules: Vec::new(),
};

/// A loaded edit cost table, one entry per language id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditCostTable {
    languages: Vec<LanguageCosts>,
}

impl EditCostTable {
    /// An empty table: every language uses the default costs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one row of a cost table.
    ///
    /// Returns `false` if the row was ignored (negative cost, oversized or
    /// empty strings).
    pub fn add_row(&mut self, lang_id: i64, from: &str, to: &str, cost: i64) -> bool {
        if cost < 0 || from.len() > MAX_RULE_LEN || to.len() > MAX_RULE_LEN {
            tracing::warn!(lang_id, from, to, cost, "ignoring invalid edit cost row");
            return false;
        }
        let cost = i32::try_from(cost).unwrap_or(i32::MAX);
        let lang = self.language_mut(lang_id);

        match (from, to) {
            ("", "?") => lang.ins_cost = cost,
            ("?", "") => lang.del_cost = cost,
            ("?", "?") => lang.sub_cost = cost,
            _ => {
                let (at_start, from) = match from.strip_prefix('^') {
                    Some(rest) => (true, rest),
                    None => (false, from),
                };
                let (at_end, from) = match from.strip_suffix('$') {
                    Some(rest) => (true, rest),
                    None => (false, from),
                };
                if from.is_empty() && to.is_empty() {
                    return false;
                }
                lang.rules.push(EditRule {
                    from: from.chars().collect(),
                    to: to.chars().collect(),
                    cost,
                    at_start,
                    at_end,
                });
            },
        }
        true
    }

    fn language_mut(&mut self, lang_id: i64) -> &mut LanguageCosts {
        let idx = match self.languages.iter().position(|l| l.lang_id == lang_id) {
            Some(idx) => idx,
            None => {
                self.languages.push(LanguageCosts::new(lang_id));
                self.languages.len() - 1
            },
        };
        &mut self.languages[idx]
    }

    /// Costs for `lang_id`, falling back to the built-in defaults.
    #[must_use]
    pub fn language(&self, lang_id: i64) -> &LanguageCosts {
        self.languages.iter().find(|l| l.lang_id == lang_id).unwrap_or(&DEFAULT_LANGUAGE)
    }

    /// Whether no rows have been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Edit distance from `a` to `b` under the costs for `lang_id`.
    #[must_use]
    pub fn distance(&self, a: &str, b: &str, lang_id: i64) -> i32 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let d = self.matrix(&a, &b, lang_id);
        d[a.len()][b.len()]
    }

    /// Smallest edit distance from `a` to any prefix of `b`, with the
    /// length in characters of that prefix.
    #[must_use]
    pub fn prefix_distance(&self, a: &str, b: &str, lang_id: i64) -> (i32, usize) {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let d = self.matrix(&a, &b, lang_id);
        let last = &d[a.len()];
        let mut best = (last[0], 0);
        for (j, &cost) in last.iter().enumerate().skip(1) {
            if cost < best.0 {
                best = (cost, j);
            }
        }
        best
    }

    fn matrix(&self, a: &[char], b: &[char], lang_id: i64) -> Vec<Vec<i32>> {
        let lang = self.language(lang_id);
        let (n, m) = (a.len(), b.len());
        let mut d = vec![vec![i32::MAX; m + 1]; n + 1];
        d[0][0] = 0;

        let relax = |d: &mut Vec<Vec<i32>>, i: usize, j: usize, cost: i32| {
            if cost < d[i][j] {
                d[i][j] = cost;
            }
        };

        for i in 0..=n {
            for j in 0..=m {
                let cur = d[i][j];
                if cur == i32::MAX {
                    continue;
                }
                if i < n && j < m {
                    let step = if a[i] == b[j] { 0 } else { lang.sub_cost };
                    relax(&mut d, i + 1, j + 1, cur.saturating_add(step));
                }
                if i < n {
                    relax(&mut d, i + 1, j, cur.saturating_add(lang.del_cost));
                }
                if j < m {
                    relax(&mut d, i, j + 1, cur.saturating_add(lang.ins_cost));
                }
                for rule in &lang.rules {
                    if rule.at_start && i != 0 {
                        continue;
                    }
                    if !a[i..].starts_with(&rule.from) || !b[j..].starts_with(&rule.to) {
                        continue;
                    }
                    let next_i = i + rule.from.len();
                    if rule.at_end && next_i != n {
                        continue;
                    }
                    relax(&mut d, next_i, j + rule.to.len(), cur.saturating_add(rule.cost));
                }
            }
        }
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_costs() {
        let table = EditCostTable::new();
        assert_eq!(table.distance("abc", "abc", 0), 0);
        assert_eq!(table.distance("abc", "abd", 0), 150);
        assert_eq!(table.distance("abc", "abcd", 0), 100);
        assert_eq!(table.distance("abcd", "abc", 0), 100);
        assert_eq!(table.distance("", "abc", 0), 300);
        assert_eq!(table.distance("ovrr", "over", 0), 150);
    }

    #[test]
    fn test_default_row_overrides() {
        let mut table = EditCostTable::new();
        assert!(table.add_row(0, "", "?", 7));
        assert!(table.add_row(0, "?", "", 9));
        assert!(table.add_row(0, "?", "?", 11));
        assert_eq!(table.distance("ab", "abc", 0), 7);
        assert_eq!(table.distance("abc", "ab", 0), 9);
        assert_eq!(table.distance("abc", "abd", 0), 11);
    }

    #[test]
    fn test_rules_apply_per_language() {
        let mut table = EditCostTable::new();
        table.add_row(1, "c", "k", 10);
        assert_eq!(table.distance("cat", "kat", 1), 10);
        assert_eq!(table.distance("cat", "kat", 0), 150);
        assert_eq!(table.distance("cat", "kat", 2), 150);
        assert_eq!(table.language(1).rule_count(), 1);
    }

    #[test]
    fn test_multi_char_and_anchored_rules() {
        let mut table = EditCostTable::new();
        table.add_row(0, "^ph", "f", 5);
        assert_eq!(table.distance("phone", "fone", 0), 5);
        assert_eq!(table.distance("alpha", "alfa", 0), 250);

        table.add_row(0, "e$", "", 3);
        assert_eq!(table.distance("tone", "ton", 0), 3);
        assert_eq!(table.distance("tend", "tnd", 0), 100);
    }

    #[test]
    fn test_invalid_rows_ignored() {
        let mut table = EditCostTable::new();
        assert!(!table.add_row(0, "a", "b", -1));
        assert!(!table.add_row(0, &"x".repeat(101), "b", 1));
        assert!(!table.add_row(0, "", "", 1));
        assert_eq!(table.language(0).rule_count(), 0);
    }

    #[test]
    fn test_prefix_distance() {
        let table = EditCostTable::new();
        assert_eq!(table.prefix_distance("hel", "hello", 0), (0, 3));
        assert_eq!(table.prefix_distance("hxl", "hello", 0), (150, 3));
        assert_eq!(table.prefix_distance("", "hello", 0), (0, 0));
    }

    #[test]
    fn test_unicode_counts_characters() {
        let table = EditCostTable::new();
        assert_eq!(table.distance("naïve", "naive", 0), 150);
    }
}
