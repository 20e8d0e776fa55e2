//! Recovers a canonical product type ("shorts", "dress", ...) from a noisy,
//! possibly bilingual variant label.
//!
//! Size tokens, print/pattern phrases, color words and generic stopwords are
//! stripped. A label that reduces to nothing (a bare color such as `"深粉色"`)
//! is [`VariantType::Invalid`] and must not reach a price line.

use std::sync::LazyLock;

use regex::Regex;

use super::lexicon::{
    CYRILLIC_COLOR_STEMS, KNOWN_TYPES, LATIN_COLORS, STOPWORDS, SUSPICIOUS_KEYWORDS,
};

static ONE_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:one\s*size|free\s*size|единый\s+размер|один\s+размер|безразмерн\w*)\b|均码|均碼|单一尺码|均号")
        .expect("valid one-size regex")
});
static PATTERN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:в\s+горошек|в\s+полоску|в\s+клетку|polka\s+dots?|animal\s+print|printed|prints?|принт\w*|floral|цветоч\w*|leopard|леопард\w*|striped?|stripes|полоск\w*|клетк\w*|plaid|checked|tie[\s-]?dye)\b|碎花|印花|条纹|格子|波点|豹纹|扎染|图案",
    )
    .expect("valid pattern regex")
});
static CJK_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:深|浅|淡|亮|藏|雾霾|奶|荧光|纯)?(?:白|黑|红|蓝|绿|黄|粉|灰|紫|杏|棕|咖啡|卡其|米|橙|青|酒红|军绿|银|金|驼|肤|彩|花)色")
        .expect("valid CJK color regex")
});
static SIZE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+(?:[.,]\d+)?[\p{L}\p{Han}]{0,3}|x{0,3}s|m|l|x{1,4}l|xxs|free)$")
        .expect("valid size token regex")
});
static CYRILLIC_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    let stems = CYRILLIC_COLOR_STEMS.join("|");
    Regex::new(&format!(
        r"^(?:{stems})(?:ый|ая|ое|ые|ой|ого|ий|яя|ее|ие|ую|ых|его|ем|ом)?$"
    ))
    .expect("valid cyrillic color regex")
});

/// Aliases sorted longest first so that `"t-shirt"` wins over `"shirt"`
/// and `"连衣裙"` over `"裙"`.
static ALIASES: LazyLock<Vec<(&'static str, &'static str)>> = LazyLock::new(|| {
    let mut aliases: Vec<(&'static str, &'static str)> = KNOWN_TYPES
        .iter()
        .flat_map(|(canonical, aliases)| aliases.iter().map(move |alias| (*alias, *canonical)))
        .collect();
    aliases.sort_by_key(|(alias, _)| std::cmp::Reverse(alias.chars().count()));
    aliases
});

/// Result of classifying a variant label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantType {
    /// One of the closed set of canonical product types.
    Known(&'static str),
    /// No known type, but meaningful words remain after cleanup.
    Other(String),
    /// Nothing but sizes, colors, patterns or filler. Excluded downstream.
    Invalid,
}

impl VariantType {
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    /// Display label, or `None` for [`VariantType::Invalid`].
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Known(canonical) => Some(canonical),
            Self::Other(text) => Some(text),
            Self::Invalid => None,
        }
    }
}

/// Classifies `label` into a [`VariantType`].
#[must_use]
pub fn classify(label: &str) -> VariantType {
    let text = strip_noise_phrases(&label.to_lowercase());

    if let Some(canonical) = find_known_type(&text) {
        return VariantType::Known(canonical);
    }

    let residual: Vec<String> = tokenize(&text)
        .into_iter()
        .filter(|token| !is_size_token(token) && !is_color_token(token))
        .filter(|token| !STOPWORDS.contains(&token.as_str()))
        .filter(|token| {
            let min_chars = if token.chars().any(is_cjk) { 2 } else { 3 };
            token.chars().count() >= min_chars
        })
        .collect();

    if residual.is_empty() {
        VariantType::Invalid
    } else {
        VariantType::Other(residual.join(" "))
    }
}

/// Lowercases `label` and drops only size information.
///
/// Two labels with the same result differ only by size, e.g. `"XS майка"` and
/// `"S майка"`.
#[must_use]
pub fn strip_sizes(label: &str) -> String {
    let lower = label.to_lowercase();
    let without_phrases = ONE_SIZE_RE.replace_all(&lower, " ");
    tokenize(&without_phrases)
        .into_iter()
        .filter(|token| !is_size_token(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercases `label` and drops color words only, keeping everything else.
#[must_use]
pub fn strip_colors(label: &str) -> String {
    let lower = label.to_lowercase();
    let without_cjk = CJK_COLOR_RE.replace_all(&lower, " ");
    tokenize(&without_cjk)
        .into_iter()
        .filter(|token| !is_color_token(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `true` for labels that look like boilerplate (shipping fees, links)
/// rather than products: two or more suspicious keywords, or fewer than
/// three meaningful characters. A CJK character counts as two, so `"帽子"`
/// passes.
#[must_use]
pub fn looks_suspicious(label: &str) -> bool {
    let lower = label.to_lowercase();
    let hits = SUSPICIOUS_KEYWORDS
        .iter()
        .filter(|keyword| lower.contains(*keyword))
        .count();
    let meaningful: usize = lower
        .chars()
        .filter(|c| c.is_alphanumeric())
        .map(|c| if is_cjk(c) { 2 } else { 1 })
        .sum();
    hits >= 2 || meaningful < 3
}

fn strip_noise_phrases(lower: &str) -> String {
    let text = ONE_SIZE_RE.replace_all(lower, " ");
    let text = PATTERN_RE.replace_all(&text, " ");
    CJK_COLOR_RE.replace_all(&text, " ").into_owned()
}

fn find_known_type(text: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(alias, _)| contains_alias(text, alias))
        .map(|(_, canonical)| *canonical)
}

fn contains_alias(text: &str, alias: &str) -> bool {
    if alias.chars().any(is_cjk) {
        return text.contains(alias);
    }
    let is_stem = alias.chars().next().is_some_and(is_cyrillic);

    text.match_indices(alias).any(|(start, matched)| {
        let boundary_before = !text[..start]
            .chars()
            .next_back()
            .is_some_and(char::is_alphanumeric);
        if !boundary_before {
            return false;
        }
        if is_stem {
            return true;
        }
        let rest = &text[start + matched.len()..];
        let rest = rest
            .strip_prefix("es")
            .or_else(|| rest.strip_prefix('s'))
            .unwrap_or(rest);
        !rest.chars().next().is_some_and(char::is_alphanumeric)
    })
}

/// Splits on punctuation and whitespace, and between CJK and non-CJK runs.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_cjk = false;

    for c in text.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }
        let cjk = is_cjk(c);
        if !current.is_empty() && cjk != current_cjk {
            tokens.push(std::mem::take(&mut current));
        }
        current_cjk = cjk;
        current.push(c);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn is_size_token(token: &str) -> bool {
    SIZE_TOKEN_RE.is_match(token)
}

fn is_color_token(token: &str) -> bool {
    LATIN_COLORS.contains(&token) || CYRILLIC_COLOR_RE.is_match(token)
}

fn is_cjk(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}')
}

fn is_cyrillic(c: char) -> bool {
    matches!(c, '\u{0400}'..='\u{04FF}')
}

#[cfg(test)]
#[path = "variant_type_test.rs"]
mod tests;
