use regex::Regex;
use std::sync::LazyLock;

static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// "Critical Care & ECMO" -> "critical-care-and-ecmo"
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase().replace('&', " and ");
    NON_ALNUM_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
