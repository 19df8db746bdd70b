//! Text helpers around the tree: input normalization, substring enumeration
//! and the quadratic dynamic-programming longest common substring, which is
//! the simpler choice when only two short sequences are involved.
//!
//! All of these work on code points, like the tree itself.

use std::collections::BTreeSet;

/// Lower-cases `input` and drops everything that is not an ASCII letter or digit.
///
/// ```
/// use generalized_suffix_index::text::normalize;
/// assert_eq!(normalize("St. Jacob's Cathedral"), "stjacobscathedral");
/// ```
pub fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Every distinct non-empty substring of `input`.
///
/// Quadratic in the input length; meant for building test expectations.
pub fn substrings(input: &str) -> BTreeSet<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut result = BTreeSet::new();
    for start in 0..chars.len() {
        for end in start + 1..=chars.len() {
            result.insert(chars[start..end].iter().collect());
        }
    }
    result
}

/// All longest common substrings of `a` and `b`, computed with two rolling
/// rows of the classic O(m·n) table. Empty if either side is empty or the
/// two share no code point.
pub fn longest_common_substrings_dp(a: &str, b: &str) -> BTreeSet<String> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut result = BTreeSet::new();
    if a.is_empty() || b.is_empty() {
        return result;
    }

    let mut prev = vec![0usize; b.len()];
    let mut curr = vec![0usize; b.len()];
    let mut best = 0;

    for (i, &ca) in a.iter().enumerate() {
        for (j, &cb) in b.iter().enumerate() {
            if ca != cb {
                curr[j] = 0;
                continue;
            }
            curr[j] = if j == 0 { 1 } else { prev[j - 1] + 1 };
            if curr[j] > best {
                best = curr[j];
                result.clear();
            }
            if curr[j] == best {
                result.insert(a[i + 1 - best..=i].iter().collect());
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    result
}

/// One longest common substring of `a` and `b` (the smallest in string
/// order when there are ties), or `None` if they share nothing.
pub fn longest_common_substring_dp(a: &str, b: &str) -> Option<String> {
    longest_common_substrings_dp(a, b).into_iter().next()
}
