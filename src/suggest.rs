//! Collection suggestions and presets for query autocompletion.

use crate::normalize::normalize_collections;

/// Curated collections offered as suggestion chips.
pub const SUGGESTED_COLLECTIONS: [&str; 10] = [
    "pics",
    "videos",
    "funny",
    "memes",
    "nextfuckinglevel",
    "interestingasfuck",
    "EarthPorn",
    "wallpapers",
    "aww",
    "oddlysatisfying",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    ForYou,
    Trending,
}

pub fn preset_collections(preset: Preset) -> &'static [&'static str] {
    match preset {
        Preset::ForYou => &["pics", "interestingasfuck", "nextfuckinglevel"],
        Preset::Trending => &["videos", "funny", "memes"],
    }
}

/// Suggestion candidates for the token the user is currently typing: a
/// case-insensitive prefix match on the last comma token, excluding names
/// already selected, capped at `limit`.
pub fn filter_suggestions(query: &str, limit: usize) -> Vec<&'static str> {
    let current = query
        .split(',')
        .next_back()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    let selected = normalize_collections(query);
    SUGGESTED_COLLECTIONS
        .iter()
        .filter(|name| name.to_ascii_lowercase().starts_with(&current))
        .filter(|name| !selected.iter().any(|sel| sel == *name))
        .take(limit)
        .copied()
        .collect()
}

/// Replace the last token of the query with `name`, leaving a trailing
/// comma so the user can keep typing the next collection.
pub fn apply_suggestion(query: &str, name: &str) -> String {
    let mut parts: Vec<String> = query.split(',').map(str::to_string).collect();
    if let Some(last) = parts.last_mut() {
        *last = format!(" {name}");
    }
    let next = parts.join(",").trim_start().to_string();
    if next.ends_with(',') {
        next
    } else {
        format!("{next},")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_the_last_token_prefix_case_insensitively() {
        assert_eq!(filter_suggestions("pics,FU", 6), vec!["funny"]);
        assert_eq!(filter_suggestions("pics,earth", 6), vec!["EarthPorn"]);
    }

    #[test]
    fn excludes_already_selected_collections() {
        let got = filter_suggestions("funny,", 6);
        assert!(!got.contains(&"funny"));
        assert_eq!(got.len(), 6);
    }

    #[test]
    fn caps_the_candidate_count() {
        assert_eq!(filter_suggestions("", 3).len(), 3);
    }

    #[test]
    fn applies_a_suggestion_over_the_last_token() {
        assert_eq!(apply_suggestion("pics,fu", "funny"), "pics, funny,");
        assert_eq!(apply_suggestion("fu", "funny"), "funny,");
    }

    #[test]
    fn presets_name_three_collections_each() {
        assert_eq!(preset_collections(Preset::ForYou).len(), 3);
        assert_eq!(preset_collections(Preset::Trending).len(), 3);
    }
}
