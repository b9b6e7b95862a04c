//! Identifier newtypes and slug helpers for designer-entered names.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Top-level content partition, e.g. "coffee-shop" or "logistics".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndustryId(pub String);

/// Unique identifier for a game event, slug-like, e.g. "event-rival-opens-shop".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

impl std::fmt::Display for IndustryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turn a human-entered name into a slug: lowercase, trim, drop everything
/// outside `[a-z0-9\s-]`, collapse whitespace runs to single hyphens and
/// hyphen runs to one hyphen. Total and idempotent; may return "".
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for ch in lowered.trim().chars() {
        let mapped = if ch.is_whitespace() { '-' } else { ch };
        match mapped {
            'a'..='z' | '0'..='9' => out.push(mapped),
            '-' => {
                if !out.ends_with('-') {
                    out.push('-');
                }
            }
            _ => {}
        }
    }
    out
}

/// Return `base` if it is not already taken, otherwise the first of
/// `base-2`, `base-3`, ... that is free. `existing` is never mutated.
pub fn make_unique_id(base: &str, existing: &[String]) -> String {
    if !existing.iter().any(|id| id == base) {
        return base.to_string();
    }
    let mut n: u32 = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if !existing.iter().any(|id| id == &candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Generate an id unique against `existing`. Prefers `{prefix}-{slug}` when
/// `base_name` slugifies to something usable, otherwise falls back to a
/// timestamp-based id (deduplicated the same way).
pub fn generate_unique_id(prefix: &str, existing: &[String], base_name: Option<&str>) -> String {
    if let Some(name) = base_name {
        let slug = slugify(name);
        if !slug.is_empty() {
            return make_unique_id(&format!("{prefix}-{slug}"), existing);
        }
    }
    let stamp = Utc::now().timestamp_millis();
    make_unique_id(&format!("{prefix}-{stamp}"), existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn slugify_basics() {
        assert_eq!(slugify("Rival Opens Shop"), "rival-opens-shop");
        assert_eq!(slugify("  Health & Safety!  "), "health-safety");
        assert_eq!(slugify("a --- b"), "a-b");
        assert_eq!(slugify("Überraschung"), "berraschung");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn make_unique_id_suffixes() {
        let existing = vec!["event-a".to_string(), "event-a-2".to_string()];
        assert_eq!(make_unique_id("event-a", &existing), "event-a-3");
        assert_eq!(make_unique_id("event-b", &existing), "event-b");
    }

    #[test]
    fn generate_prefers_slugged_name() {
        let existing = vec!["event-grand-opening".to_string()];
        let id = generate_unique_id("event", &existing, Some("Grand Opening"));
        assert_eq!(id, "event-grand-opening-2");
    }

    #[test]
    fn generate_falls_back_to_timestamp() {
        let id = generate_unique_id("event", &[], Some("!!!"));
        assert!(id.starts_with("event-"));
        assert!(id["event-".len()..].chars().all(|c| c.is_ascii_digit()));
    }

    proptest! {
        #[test]
        fn slugify_is_idempotent(s in ".*") {
            let once = slugify(&s);
            prop_assert_eq!(slugify(&once), once);
        }

        #[test]
        fn slugify_output_is_clean(s in ".*") {
            let slug = slugify(&s);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn unique_id_never_collides(base in "[a-z]{1,8}", ids in proptest::collection::vec("[a-z]{1,8}(-[0-9]{1,2})?", 0..12)) {
            let id = make_unique_id(&base, &ids);
            prop_assert!(!ids.contains(&id));
            if !ids.contains(&base) {
                prop_assert_eq!(id, base);
            }
        }
    }
}
