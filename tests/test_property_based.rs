/*!
# Property-Based Tests for Roadscribe

Proptest-driven checks of the invariants the specification calls out
directly: edit-distance identities, matrix/rolling equivalence, and
agreement between every exact string matcher.
*/

use proptest::prelude::*;
use roadscribe::search::edit_distance::{
    full_damerau, hamming, levenshtein_matrix, levenshtein_rolling, restricted_dl_matrix,
    restricted_dl_rolling,
};
use roadscribe::search::exact::{kmp_search, naive_search, BoyerMoore};
use roadscribe::search::fuzzy::{
    fuzzy_levenshtein_matrix, fuzzy_levenshtein_rolling, fuzzy_restricted_dl_matrix,
    fuzzy_restricted_dl_rolling,
};

fn byte_string() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(b'a'..=b'd', 0..12)
}

proptest! {
    #[test]
    fn prop_levenshtein_identity_and_symmetry(a in byte_string(), b in byte_string()) {
        prop_assert_eq!(levenshtein_matrix(&a, &a), 0);
        prop_assert_eq!(levenshtein_matrix(&a, &b), levenshtein_matrix(&b, &a));
        prop_assert_eq!(levenshtein_matrix(&a, &[]), a.len());
    }

    #[test]
    fn prop_levenshtein_matrix_equals_rolling(a in byte_string(), b in byte_string()) {
        prop_assert_eq!(levenshtein_matrix(&a, &b), levenshtein_rolling(&a, &b));
    }

    #[test]
    fn prop_restricted_dl_matrix_equals_rolling(a in byte_string(), b in byte_string()) {
        prop_assert_eq!(restricted_dl_matrix(&a, &b), restricted_dl_rolling(&a, &b));
    }

    #[test]
    fn prop_fuzzy_levenshtein_matrix_equals_rolling(p in byte_string(), t in byte_string()) {
        prop_assert_eq!(fuzzy_levenshtein_matrix(&p, &t), fuzzy_levenshtein_rolling(&p, &t));
    }

    #[test]
    fn prop_fuzzy_restricted_dl_matrix_equals_rolling(p in byte_string(), t in byte_string()) {
        prop_assert_eq!(fuzzy_restricted_dl_matrix(&p, &t), fuzzy_restricted_dl_rolling(&p, &t));
    }

    #[test]
    fn prop_fuzzy_never_exceeds_whole_string_distance(p in byte_string(), t in byte_string()) {
        prop_assume!(!t.is_empty());
        let fuzzy = fuzzy_levenshtein_matrix(&p, &t);
        let whole = levenshtein_matrix(&p, &t);
        prop_assert!(fuzzy <= whole);
    }

    #[test]
    fn prop_full_damerau_triangle_inequality(a in byte_string(), b in byte_string(), c in byte_string()) {
        let ab = full_damerau(&a, &b);
        let bc = full_damerau(&b, &c);
        let ac = full_damerau(&a, &c);
        prop_assert!(ac <= ab + bc);
    }

    #[test]
    fn prop_hamming_counts_equal_length_mismatches(a in byte_string()) {
        let mut b = a.clone();
        if !b.is_empty() {
            b[0] = if b[0] == b'a' { b'b' } else { b'a' };
            prop_assert_eq!(hamming(&a, &b).unwrap(), 1);
        }
    }

    #[test]
    fn prop_all_exact_matchers_agree(text in byte_string(), pattern in prop::collection::vec(b'a'..=b'd', 1..5)) {
        let naive = naive_search(&text, &pattern);
        prop_assert_eq!(BoyerMoore::with_table(&pattern).search(&text), naive.clone());
        prop_assert_eq!(BoyerMoore::with_map(&pattern).search(&text), naive.clone());
        prop_assert_eq!(BoyerMoore::with_list(&pattern).search(&text), naive.clone());
        prop_assert_eq!(BoyerMoore::with_table(&pattern).search_galil(&text), naive.clone());
        prop_assert_eq!(kmp_search(&text, &pattern), naive.clone());
        for &i in &naive {
            prop_assert_eq!(&text[i..i + pattern.len()], pattern.as_slice());
        }
    }
}
