/*!
# Sellers Fuzzy Matchers

The same three edit-distance recurrences as [`crate::search::edit_distance`],
but initialized Sellers' way so the result is the minimum distance from
`pattern` to *any* substring of `text`, rather than to the whole of `text`:
the row for zero pattern bytes consumed is zeroed (`M[0][j] = 0`, a free
start anywhere in `text`), and the answer is read off the minimum of the
final row (`min(M[P][0..=T])`, a free end anywhere in `text`). The column for
zero text bytes consumed (`M[i][0] = i`) stays classical, since `pattern`
itself must always be matched in full.
*/

/// Fuzzy Levenshtein distance via the full matrix: minimum edit distance
/// from `pattern` to any substring of `text`.
pub fn fuzzy_levenshtein_matrix(pattern: &[u8], text: &[u8]) -> usize {
    let (p, t) = (pattern.len(), text.len());
    let mut matrix = vec![vec![0usize; t + 1]; p + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    // matrix[0][..] is already 0, matching the free-start initialization.
    for i in 1..=p {
        for j in 1..=t {
            let s = if pattern[i - 1] == text[j - 1] { 0 } else { 1 };
            matrix[i][j] = (matrix[i - 1][j - 1] + s)
                .min(matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1);
        }
    }
    matrix[p].iter().copied().min().unwrap_or(0)
}

/// Fuzzy Levenshtein distance via a two-row rolling window.
pub fn fuzzy_levenshtein_rolling(pattern: &[u8], text: &[u8]) -> usize {
    let (p, t) = (pattern.len(), text.len());
    let mut prev = vec![0usize; t + 1];
    let mut curr = vec![0usize; t + 1];
    let mut best = if p == 0 { 0 } else { usize::MAX };
    for i in 1..=p {
        curr[0] = i;
        for j in 1..=t {
            let s = if pattern[i - 1] == text[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j - 1] + s).min(prev[j] + 1).min(curr[j - 1] + 1);
        }
        if i == p {
            best = curr.iter().copied().min().unwrap_or(best);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    best
}

/// Fuzzy restricted Damerau–Levenshtein distance via the full matrix.
pub fn fuzzy_restricted_dl_matrix(pattern: &[u8], text: &[u8]) -> usize {
    let (p, t) = (pattern.len(), text.len());
    let mut matrix = vec![vec![0usize; t + 1]; p + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for i in 1..=p {
        for j in 1..=t {
            let s = if pattern[i - 1] == text[j - 1] { 0 } else { 1 };
            let mut best = (matrix[i - 1][j - 1] + s)
                .min(matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1);
            if i >= 2 && j >= 2 && pattern[i - 1] == text[j - 2] && pattern[i - 2] == text[j - 1] {
                best = best.min(matrix[i - 2][j - 2] + 1);
            }
            matrix[i][j] = best;
        }
    }
    matrix[p].iter().copied().min().unwrap_or(0)
}

/// Fuzzy restricted Damerau–Levenshtein distance via a three-row rolling window.
pub fn fuzzy_restricted_dl_rolling(pattern: &[u8], text: &[u8]) -> usize {
    let (p, t) = (pattern.len(), text.len());
    let mut prev2 = vec![0usize; t + 1];
    let mut prev = vec![0usize; t + 1];
    let mut curr = vec![0usize; t + 1];
    let mut best = if p == 0 { 0 } else { usize::MAX };
    for i in 1..=p {
        curr[0] = i;
        for j in 1..=t {
            let s = if pattern[i - 1] == text[j - 1] { 0 } else { 1 };
            let mut b = (prev[j - 1] + s).min(prev[j] + 1).min(curr[j - 1] + 1);
            if i >= 2 && j >= 2 && pattern[i - 1] == text[j - 2] && pattern[i - 2] == text[j - 1] {
                b = b.min(prev2[j - 2] + 1);
            }
            curr[j] = b;
        }
        if i == p {
            best = curr.iter().copied().min().unwrap_or(best);
        }
        std::mem::swap(&mut prev2, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }
    best
}

/// Fuzzy full Damerau–Levenshtein distance: mirrors
/// [`crate::search::edit_distance::full_damerau`] except the row for zero
/// pattern bytes consumed (`d[1][..]`) is zeroed instead of holding the
/// classical `j-1` trivial distances, granting the same free start in
/// `text` that the other two fuzzy variants get from zeroing `M[0][j]`.
pub fn fuzzy_full_damerau(pattern: &[u8], text: &[u8]) -> u64 {
    let (p, t) = (pattern.len(), text.len());
    let max_dist = (p + t) as u64;

    let mut d = vec![vec![0u64; t + 2]; p + 2];
    d[0][0] = max_dist;
    for i in 0..=p {
        d[i + 1][0] = max_dist;
        d[i + 1][1] = i as u64;
    }
    d[0][0] = max_dist;
    for j in 0..=t {
        d[0][j + 1] = max_dist;
        d[1][j + 1] = 0;
    }

    let mut occurrence = std::collections::HashMap::new();
    for i in 1..=p {
        let mut previous_match_col = 0usize;
        for j in 1..=t {
            let k = *occurrence.get(&text[j - 1]).unwrap_or(&0usize);
            let l = previous_match_col;
            let cost = if pattern[i - 1] == text[j - 1] {
                previous_match_col = j;
                0
            } else {
                1
            };
            let transposition =
                d[k][l].saturating_add((i - k) as u64).saturating_add((j - l) as u64).saturating_sub(1);
            d[i + 1][j + 1] = (d[i][j].saturating_add(cost))
                .min(d[i + 1][j].saturating_add(1))
                .min(d[i][j + 1].saturating_add(1))
                .min(transposition);
        }
        occurrence.insert(pattern[i - 1], i);
    }
    d[p + 1][1..=t + 1].iter().copied().min().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::edit_distance::{levenshtein_matrix, restricted_dl_matrix};

    #[test]
    fn fuzzy_is_never_worse_than_whole_text_distance() {
        let text = b"the quick brown fox";
        let pattern = b"quikc";
        let fuzzy = fuzzy_levenshtein_matrix(pattern, text);
        let whole = levenshtein_matrix(pattern, text);
        assert!(fuzzy <= whole);
    }

    #[test]
    fn fuzzy_finds_exact_substring_at_zero_distance() {
        let text = b"xxquickxx";
        let pattern = b"quick";
        assert_eq!(fuzzy_levenshtein_matrix(pattern, text), 0);
        assert_eq!(fuzzy_restricted_dl_matrix(pattern, text), 0);
        assert_eq!(fuzzy_full_damerau(pattern, text), 0);
    }

    #[test]
    fn matrix_equals_rolling_for_fuzzy_levenshtein() {
        let pairs = [("quick", "the quick brown fox"), ("", "abc"), ("abc", "")];
        for (p, t) in pairs {
            assert_eq!(
                fuzzy_levenshtein_matrix(p.as_bytes(), t.as_bytes()),
                fuzzy_levenshtein_rolling(p.as_bytes(), t.as_bytes())
            );
        }
    }

    #[test]
    fn matrix_equals_rolling_for_fuzzy_restricted_dl() {
        let pairs = [("quick", "the qucik brown fox"), ("ab", "ba")];
        for (p, t) in pairs {
            assert_eq!(
                fuzzy_restricted_dl_matrix(p.as_bytes(), t.as_bytes()),
                fuzzy_restricted_dl_rolling(p.as_bytes(), t.as_bytes())
            );
        }
    }

    #[test]
    fn fuzzy_road_name_lookup_can_tie_at_minimum_distance() {
        let pattern = b"rua do sul";
        let d_sol = fuzzy_levenshtein_matrix(pattern, b"rua do sol");
        let d_sel = fuzzy_levenshtein_matrix(pattern, b"rua do sel");
        let d_unrelated = fuzzy_levenshtein_matrix(pattern, b"avenida central");
        assert_eq!(d_sol, 1);
        assert_eq!(d_sel, 1);
        assert!(d_unrelated > d_sol);
    }

    #[test]
    fn restricted_dl_fuzzy_respects_transposition() {
        let pattern = b"abc";
        let text = b"xxacbxx";
        assert_eq!(fuzzy_restricted_dl_matrix(pattern, text), 1);
        let plain = restricted_dl_matrix(pattern, b"acb");
        assert_eq!(plain, 1);
    }
}
