//! Ingredient name normalization
//!
//! Builds the grouping key used to decide whether two cart items refer to
//! the same ingredient.

use std::sync::LazyLock;

use regex::Regex;

/// Descriptive words dropped from labels before grouping
pub const MODIFIER_WORDS: &[&str] = &[
    "fresh", "dried", "ground", "chopped", "diced", "minced", "sliced", "whole", "large", "small",
    "medium",
];

// ASCII word boundaries: a modifier glued to a non-ASCII letter, as in
// "puréefresh", is still stripped the way stored lists expect.
static MODIFIERS: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"(?-u:\b)(?:{})(?-u:\b)", MODIFIER_WORDS.join("|"));
    Regex::new(&pattern).expect("modifier pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Normalize an ingredient label into its grouping key
///
/// Lower-cases, removes whole-word modifiers such as "fresh" or "diced",
/// collapses whitespace and trims. Color or variety words are kept, so
/// "red onion" and "onion" stay distinct.
pub fn normalize(label: &str) -> String {
    let lower = label.to_lowercase();
    let stripped = MODIFIERS.replace_all(&lower, "");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}
