/*!
# Exact Matchers

Naive scanning, Boyer–Moore (three interchangeable bad-character rules, each
paired with the good-suffix rule, plain or with the Galil lower-bound
optimization), and Knuth–Morris–Pratt. Every matcher returns the list of
starting indices in `text` at which `pattern` occurs, overlapping matches
included, over 8-bit bytes (alphabet size 256).
*/

use std::collections::HashMap;

/// Slides `pattern` across `text` left to right, comparing byte by byte.
/// `O(T*P)`; the baseline every other matcher is tested against.
pub fn naive_search(text: &[u8], pattern: &[u8]) -> Vec<usize> {
    let (n, m) = (text.len(), pattern.len());
    if m == 0 || m > n {
        return Vec::new();
    }
    let mut matches = Vec::new();
    for i in 0..=(n - m) {
        if text[i..i + m] == *pattern {
            matches.push(i);
        }
    }
    matches
}

/// A bad-character oracle: given the pattern index `j` at which a mismatch
/// occurred and the text byte `c` that caused it, how far can the pattern be
/// slid right while still aligning `c` with its rightmost occurrence to the
/// left of `j` in the pattern (or past the pattern entirely if `c` never
/// occurs there)?
pub trait BadCharRule {
    fn shift(&self, j: usize, c: u8) -> usize;
}

/// Full `256`-entry-per-position table: for every pattern position `j` and
/// every possible byte `c`, the distance to `c`'s last occurrence strictly
/// left of `j`. `O(P)` preprocessing per byte family, `O(256*(P+1))` space,
/// exact `O(1)` shifts.
pub struct TableBadChar {
    /// `table[j][c]`: last index `< j` at which `pattern[index] == c`, or `None`.
    table: Vec<[Option<usize>; 256]>,
}

impl TableBadChar {
    pub fn new(pattern: &[u8]) -> Self {
        let m = pattern.len();
        let mut table = Vec::with_capacity(m + 1);
        let mut last_seen = [None; 256];
        for j in 0..=m {
            table.push(last_seen);
            if j < m {
                last_seen[pattern[j] as usize] = Some(j);
            }
        }
        TableBadChar { table }
    }
}

impl BadCharRule for TableBadChar {
    fn shift(&self, j: usize, c: u8) -> usize {
        match self.table[j][c as usize] {
            Some(last) => j - last,
            None => j + 1,
        }
    }
}

/// Same shift rule as [`TableBadChar`], but storing the per-position table
/// only for bytes that actually occur in the pattern (an indirection map
/// instead of a dense `256`-wide row), trading exact-alphabet space for a
/// hash lookup.
pub struct MapBadChar {
    table: HashMap<u8, Vec<Option<usize>>>,
}

impl MapBadChar {
    pub fn new(pattern: &[u8]) -> Self {
        let m = pattern.len();
        let mut table: HashMap<u8, Vec<Option<usize>>> = HashMap::new();
        for &byte in pattern {
            table.entry(byte).or_insert_with(|| vec![None; m + 1]);
        }
        let mut last_seen: HashMap<u8, usize> = HashMap::new();
        for j in 0..=m {
            for (&byte, column) in table.iter_mut() {
                column[j] = last_seen.get(&byte).copied();
            }
            if j < m {
                last_seen.insert(pattern[j], j);
            }
        }
        MapBadChar { table }
    }
}

impl BadCharRule for MapBadChar {
    fn shift(&self, j: usize, c: u8) -> usize {
        match self.table.get(&c).and_then(|column| column[j]) {
            Some(last) => j - last,
            None => j + 1,
        }
    }
}

/// Horspool-style last-occurrence-only table: `O(1)` space per distinct byte,
/// `O(P)` preprocessing, but a coarser shift that ignores mismatch position:
/// if `c`'s last occurrence in the pattern is at or right of `j`, the shift
/// is a flat `1` instead of the exact distance.
pub struct ListBadChar {
    last_occurrence: HashMap<u8, usize>,
}

impl ListBadChar {
    pub fn new(pattern: &[u8]) -> Self {
        let mut last_occurrence = HashMap::new();
        for (i, &byte) in pattern.iter().enumerate() {
            last_occurrence.insert(byte, i);
        }
        ListBadChar { last_occurrence }
    }
}

impl BadCharRule for ListBadChar {
    fn shift(&self, j: usize, c: u8) -> usize {
        match self.last_occurrence.get(&c) {
            Some(&last) if last < j => j - last,
            Some(_) => 1,
            None => j + 1,
        }
    }
}

/// Which bad-character variant a [`BoyerMoore`] matcher was built with.
pub enum BadCharVariant {
    Table(TableBadChar),
    Map(MapBadChar),
    List(ListBadChar),
}

impl BadCharRule for BadCharVariant {
    fn shift(&self, j: usize, c: u8) -> usize {
        match self {
            BadCharVariant::Table(t) => t.shift(j, c),
            BadCharVariant::Map(m) => m.shift(j, c),
            BadCharVariant::List(l) => l.shift(j, c),
        }
    }
}

/// Classic two-phase good-suffix preprocessing, producing `shift[0..=P]`:
/// `shift[j+1]` is used on a mismatch at pattern index `j`; `shift[0]` is
/// used after a full match, to slide past the whole matched occurrence by
/// at least its period.
pub struct GoodSuffixRule {
    shift: Vec<usize>,
}

impl GoodSuffixRule {
    pub fn new(pattern: &[u8]) -> Self {
        let m = pattern.len();
        let mut shift = vec![0usize; m + 1];
        let mut border_pos = vec![0usize; m + 1];

        // Case 1: suffixes of `pattern` that also occur elsewhere as a
        // prefix-aligned border.
        let mut i = m;
        let mut j = m + 1;
        border_pos[i] = j;
        while i > 0 {
            while j <= m && pattern[i - 1] != pattern[j - 1] {
                if shift[j] == 0 {
                    shift[j] = j - i;
                }
                j = border_pos[j];
            }
            i -= 1;
            j -= 1;
            border_pos[i] = j;
        }

        // Case 2: no border matched; fall back to the widest matching
        // prefix/suffix pair.
        j = border_pos[0];
        for i in 0..=m {
            if shift[i] == 0 {
                shift[i] = j;
            }
            if i == j {
                j = border_pos[j];
            }
        }

        GoodSuffixRule { shift }
    }

    pub fn shift(&self, j: usize) -> usize {
        self.shift[j]
    }
}

/// A preprocessed Boyer–Moore matcher: a chosen [`BadCharVariant`] plus the
/// good-suffix rule, searched right-to-left with `shift = max(bad, good)` on
/// mismatch.
pub struct BoyerMoore {
    pattern: Vec<u8>,
    bad_char: BadCharVariant,
    good_suffix: GoodSuffixRule,
}

impl BoyerMoore {
    pub fn new(pattern: &[u8], bad_char: BadCharVariant) -> Self {
        BoyerMoore {
            pattern: pattern.to_vec(),
            bad_char,
            good_suffix: GoodSuffixRule::new(pattern),
        }
    }

    pub fn with_table(pattern: &[u8]) -> Self {
        Self::new(pattern, BadCharVariant::Table(TableBadChar::new(pattern)))
    }

    pub fn with_map(pattern: &[u8]) -> Self {
        Self::new(pattern, BadCharVariant::Map(MapBadChar::new(pattern)))
    }

    pub fn with_list(pattern: &[u8]) -> Self {
        Self::new(pattern, BadCharVariant::List(ListBadChar::new(pattern)))
    }

    /// Plain Boyer–Moore search: `O(T*P)` worst case.
    pub fn search(&self, text: &[u8]) -> Vec<usize> {
        let (n, m) = (text.len(), self.pattern.len());
        if m == 0 || m > n {
            return Vec::new();
        }
        let mut matches = Vec::new();
        let mut i = 0usize;
        while i <= n - m {
            let mut j = m - 1;
            let mismatch = loop {
                if self.pattern[j] != text[i + j] {
                    break Some(j);
                }
                if j == 0 {
                    break None;
                }
                j -= 1;
            };
            match mismatch {
                None => {
                    matches.push(i);
                    i += self.good_suffix.shift(0).max(1);
                }
                Some(j) => {
                    let shift =
                        self.bad_char.shift(j, text[i + j]).max(self.good_suffix.shift(j + 1));
                    i += shift.max(1);
                }
            }
        }
        matches
    }

    /// Boyer–Moore with the Galil rule: after a match, the next alignment's
    /// overlap with the previous one (of length `P - 1 - shift`) is already
    /// known to agree with the pattern, so comparisons only need to go down
    /// to that bound instead of all the way to `0`. Guarantees `O(T)`
    /// worst-case time, unlike plain Boyer–Moore's `O(T*P)`.
    pub fn search_galil(&self, text: &[u8]) -> Vec<usize> {
        let (n, m) = (text.len(), self.pattern.len());
        if m == 0 || m > n {
            return Vec::new();
        }
        let mut matches = Vec::new();
        let mut i = 0usize;
        let mut galil = 0usize;
        while i <= n - m {
            let mut j = m - 1;
            let mut mismatch_at = None;
            while j + 1 > galil {
                if self.pattern[j] != text[i + j] {
                    mismatch_at = Some(j);
                    break;
                }
                if j == galil {
                    break;
                }
                j -= 1;
            }
            match mismatch_at {
                None => {
                    matches.push(i);
                    let shift0 = self.good_suffix.shift(0);
                    galil = (m - 1).saturating_sub(shift0);
                    i += shift0.max(1);
                }
                Some(j) => {
                    let shift =
                        self.bad_char.shift(j, text[i + j]).max(self.good_suffix.shift(j + 1));
                    i += shift.max(1);
                    galil = 0;
                }
            }
        }
        matches
    }
}

/// Builds the Knuth–Morris–Pratt failure table via the optimized variant:
/// when `pattern[i] == pattern[border]`, copy `lookup[border]` instead of
/// recording `border` directly, since a mismatch against `pattern[border]`
/// would immediately re-mismatch against `pattern[i]` too. `lookup[0] = -1`.
pub fn build_kmp_table(pattern: &[u8]) -> Vec<isize> {
    let m = pattern.len();
    let mut lookup = vec![0isize; m + 1];
    lookup[0] = -1;
    let mut i = 0isize;
    let mut j = -1isize;
    while (i as usize) < m {
        while j >= 0 && pattern[i as usize] != pattern[j as usize] {
            j = lookup[j as usize];
        }
        i += 1;
        j += 1;
        if (i as usize) < m && pattern[i as usize] == pattern[j as usize] {
            lookup[i as usize] = lookup[j as usize];
        } else {
            lookup[i as usize] = j;
        }
    }
    lookup
}

/// Knuth–Morris–Pratt search: `O(T+P)`, never re-examines a text byte.
pub fn kmp_search(text: &[u8], pattern: &[u8]) -> Vec<usize> {
    if pattern.is_empty() || pattern.len() > text.len() {
        return Vec::new();
    }
    let lookup = build_kmp_table(pattern);
    let m = pattern.len();
    let mut matches = Vec::new();
    let mut i = 0usize;
    let mut j = 0isize;
    while i < text.len() {
        while j >= 0 && text[i] != pattern[j as usize] {
            j = lookup[j as usize];
        }
        i += 1;
        j += 1;
        if j as usize == m {
            matches.push(i - m);
            j = lookup[m];
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kmp_finds_the_documented_occurrence() {
        let text = b"abxabcabcaby";
        let pattern = b"abcaby";
        assert_eq!(kmp_search(text, pattern), vec![6]);
    }

    #[test]
    fn all_exact_matchers_agree_with_naive() {
        let text = b"abbabababbabbabababbabaababbababbabab";
        let pattern = b"abbabab";
        let naive = naive_search(text, pattern);

        assert_eq!(BoyerMoore::with_table(pattern).search(text), naive);
        assert_eq!(BoyerMoore::with_map(pattern).search(text), naive);
        assert_eq!(BoyerMoore::with_list(pattern).search(text), naive);
        assert_eq!(BoyerMoore::with_table(pattern).search_galil(text), naive);
        assert_eq!(kmp_search(text, pattern), naive);
    }

    #[test]
    fn matches_are_genuine_occurrences_and_overlaps_included() {
        let text = b"aaaaaa";
        let pattern = b"aaa";
        let naive = naive_search(text, pattern);
        assert_eq!(naive, vec![0, 1, 2, 3]);
        for &i in &naive {
            assert_eq!(&text[i..i + pattern.len()], pattern);
        }
        assert_eq!(BoyerMoore::with_table(pattern).search(text), naive);
        assert_eq!(BoyerMoore::with_table(pattern).search_galil(text), naive);
        assert_eq!(kmp_search(text, pattern), naive);
    }

    #[test]
    fn pattern_longer_than_text_yields_no_matches() {
        assert!(naive_search(b"ab", b"abc").is_empty());
        assert!(BoyerMoore::with_table(b"abc").search(b"ab").is_empty());
        assert!(kmp_search(b"ab", b"abc").is_empty());
    }

    #[test]
    fn galil_rule_stays_linear_on_periodic_pattern_without_losing_matches() {
        let text = vec![b'a'; 500];
        let pattern = vec![b'a'; 20];
        let naive = naive_search(&text, &pattern);
        let galil = BoyerMoore::with_table(&pattern).search_galil(&text);
        assert_eq!(galil, naive);
    }
}
