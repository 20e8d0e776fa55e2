//! Collapses labels that share a long common prefix into one assortment
//! line, e.g. `"Платье летнее (ассортимент: длинное, короткое)"`.

use super::variant_type::strip_colors;

/// Minimum prefix length (in characters) worth merging on.
const MIN_PREFIX_CHARS: usize = 12;

/// Maximum number of suffixes listed inside the parentheses.
const MAX_LISTED_SUFFIXES: usize = 6;

/// Merges `labels` on their common prefix.
///
/// Returns a single assortment label when every label shares a prefix of at
/// least twelve characters (cut back to a word boundary); otherwise returns
/// the distinct labels unchanged. A single label is returned as-is, so the
/// operation is idempotent.
#[must_use]
pub fn merge_labels(labels: &[String]) -> Vec<String> {
    let mut distinct: Vec<&str> = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim();
        if !label.is_empty() && !distinct.contains(&label) {
            distinct.push(label);
        }
    }

    if distinct.len() <= 1 {
        return distinct.into_iter().map(str::to_owned).collect();
    }

    let prefix = common_word_prefix(&distinct);
    if prefix.chars().count() < MIN_PREFIX_CHARS {
        return distinct.into_iter().map(str::to_owned).collect();
    }

    let mut suffixes: Vec<String> = Vec::new();
    for label in &distinct {
        let suffix = strip_colors(trim_separators(&label[prefix.len()..]));
        if !suffix.is_empty() && !suffixes.contains(&suffix) {
            suffixes.push(suffix);
        }
    }

    let merged = if suffixes.is_empty() {
        prefix.to_owned()
    } else {
        let truncated = suffixes.len() > MAX_LISTED_SUFFIXES;
        suffixes.truncate(MAX_LISTED_SUFFIXES);
        let tail = if truncated { " и другие" } else { "" };
        format!("{prefix} (ассортимент: {}{tail})", suffixes.join(", "))
    };
    vec![merged]
}

/// Longest common prefix of `labels`, cut back so it never ends mid-word,
/// with trailing punctuation and whitespace trimmed.
fn common_word_prefix<'a>(labels: &[&'a str]) -> &'a str {
    let first = labels[0];
    let mut end = first.len();
    for other in &labels[1..] {
        let shared = first
            .char_indices()
            .zip(other.chars())
            .find(|((_, a), b)| a != b)
            .map_or_else(|| first.len().min(other.len()), |((idx, _), _)| idx);
        end = end.min(shared);
    }

    let prefix = &first[..end];
    let cuts_word = labels.iter().any(|label| {
        label[end..].chars().next().is_some_and(char::is_alphanumeric)
    }) && prefix.chars().next_back().is_some_and(char::is_alphanumeric);

    let prefix = if cuts_word {
        prefix
            .rfind(|c: char| !c.is_alphanumeric())
            .map_or("", |idx| &prefix[..idx])
    } else {
        prefix
    };
    prefix.trim_end_matches(|c: char| !c.is_alphanumeric())
}

fn trim_separators(text: &str) -> &str {
    text.trim_matches(|c: char| !c.is_alphanumeric())
}
