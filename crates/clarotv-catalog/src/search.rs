//! Accent- and case-insensitive matching.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Folds `s` for matching: NFD, combining marks dropped, lowercased.
///
/// `"São Paulo"` and `"sao paulo"` fold to the same string.
#[must_use]
pub fn fold_for_search(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
