//! Sequential peeling of the command prefix grammars.
//!
//! Order is fixed and encodes product behavior: `/name` first, then a
//! run of `#tag` segments, then exactly one `>` or `<n>` context
//! marker. Every step is re-evaluated against the current remainder
//! and fails loudly when its prefix character appears without the rest
//! of the expected pattern.

use thiserror::Error;

use crate::tags::{LabelMap, TagSet};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeelError {
    #[error("invalid / command")]
    Directive,

    #[error("invalid # command")]
    Tags,

    #[error("invalid > command")]
    Context,

    #[error("invalid <> command")]
    Window,
}

/// Everything the peeler extracts from a raw message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peeled {
    /// Name from the `/name` directive, "" when no directive was given.
    pub name_seed: String,
    pub tags: TagSet,
    pub labels: LabelMap,
    /// The message with all command prefixes stripped.
    pub remainder: String,
}

/// Run the full peel over a raw message.
pub fn peel(message: &str) -> Result<Peeled, PeelError> {
    let (name_seed, mut rest) = peel_directive(message)?;

    let mut tags = TagSet::new();
    let mut labels = LabelMap::new();
    while rest.starts_with('#') {
        let (segment, tail) = peel_tag_segment(rest)?;
        for token in segment.split('#') {
            match token.split_once(':') {
                Some((key, value)) => {
                    tags.add(key);
                    labels.set(key, Some(value.to_string()));
                }
                None => {
                    tags.add(token);
                    labels.set(token, None);
                }
            }
        }
        rest = tail;
    }

    if let Some(tail) = rest.strip_prefix('>') {
        rest = tail.trim_start();
        tags.add("context");
    } else if rest.starts_with('<') {
        let (window, tail) = peel_window(rest)?;
        tags.add("context");
        labels.set("context", Some(window));
        rest = tail;
    }

    Ok(Peeled {
        name_seed,
        tags,
        labels,
        remainder: rest.to_string(),
    })
}

/// `/name tail` -> `(name, tail)`. Messages without a leading `/`
/// yield an empty name seed and pass through untouched.
pub fn peel_directive(message: &str) -> Result<(String, &str), PeelError> {
    let Some(after) = message.strip_prefix('/') else {
        return Ok((String::new(), message));
    };
    let end = after
        .find(|c: char| c.is_whitespace() || c == '#' || c == '<' || c == '>')
        .unwrap_or(after.len());
    if end == 0 {
        return Err(PeelError::Directive);
    }
    let (name, tail) = after.split_at(end);
    Ok((name.to_string(), tail.trim_start()))
}

/// One `#`-led segment -> `(segment, tail)`. The segment runs until
/// whitespace or an angle bracket; `#` inside it separates tokens and
/// is kept for the caller to split on.
fn peel_tag_segment(message: &str) -> Result<(&str, &str), PeelError> {
    let Some(after) = message.strip_prefix('#') else {
        return Err(PeelError::Tags);
    };
    let end = after
        .find(|c: char| c.is_whitespace() || c == '<' || c == '>')
        .unwrap_or(after.len());
    if end == 0 {
        return Err(PeelError::Tags);
    }
    let (segment, tail) = after.split_at(end);
    Ok((segment, tail.trim_start()))
}

/// `<digits> tail` -> `(digits, tail)`.
fn peel_window(message: &str) -> Result<(String, &str), PeelError> {
    let Some(after) = message.strip_prefix('<') else {
        return Err(PeelError::Window);
    };
    let after = after.trim_start();
    let end = after
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(after.len());
    if end == 0 {
        return Err(PeelError::Window);
    }
    let (digits, tail) = after.split_at(end);
    let tail = tail.trim_start();
    let Some(tail) = tail.strip_prefix('>') else {
        return Err(PeelError::Window);
    };
    Ok((digits.to_string(), tail.trim_start()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags_of(p: &Peeled) -> Vec<&str> {
        p.tags.iter().collect()
    }

    #[test]
    fn plain_message_passes_through() {
        let p = peel("hello there").unwrap();
        assert_eq!(p.name_seed, "");
        assert!(p.tags.is_empty());
        assert_eq!(p.remainder, "hello there");
    }

    #[test]
    fn directive_splits_on_first_delimiter() {
        let p = peel("/sonnet what is rust?").unwrap();
        assert_eq!(p.name_seed, "sonnet");
        assert_eq!(p.remainder, "what is rust?");
    }

    #[test]
    fn directive_keeps_multiline_tail() {
        let p = peel("/m  line one\nline two").unwrap();
        assert_eq!(p.name_seed, "m");
        assert_eq!(p.remainder, "line one\nline two");
    }

    #[test]
    fn bare_slash_is_invalid() {
        assert_eq!(peel("/"), Err(PeelError::Directive));
        assert_eq!(peel("/ hello"), Err(PeelError::Directive));
    }

    #[test]
    fn tag_run_collects_set_and_labels() {
        let p = peel("#a#b:v#c rest").unwrap();
        assert_eq!(tags_of(&p), vec!["a", "b", "c"]);
        assert_eq!(p.labels.get("b"), Some("v"));
        assert_eq!(p.labels.get("a"), None);
        assert_eq!(p.remainder, "rest");
    }

    #[test]
    fn repeated_tag_segments_accumulate() {
        let p = peel("#a #b:2 #c tail").unwrap();
        assert_eq!(tags_of(&p), vec!["a", "b", "c"]);
        assert_eq!(p.labels.get("b"), Some("2"));
        assert_eq!(p.remainder, "tail");
    }

    #[test]
    fn lone_hash_is_invalid() {
        assert_eq!(peel("# hi"), Err(PeelError::Tags));
    }

    #[test]
    fn context_arrow_sets_tag() {
        let p = peel("> continue").unwrap();
        assert!(p.tags.contains("context"));
        assert_eq!(p.labels.get("context"), None);
        assert_eq!(p.remainder, "continue");
    }

    #[test]
    fn bare_arrow_keeps_empty_remainder() {
        let p = peel(">").unwrap();
        assert!(p.tags.contains("context"));
        assert_eq!(p.remainder, "");
    }

    #[test]
    fn window_marker_sets_tag_and_label() {
        let p = peel("<3> continue").unwrap();
        assert!(p.tags.contains("context"));
        assert_eq!(p.labels.get("context"), Some("3"));
        assert_eq!(p.remainder, "continue");
    }

    #[test]
    fn window_allows_inner_whitespace() {
        let p = peel("< 12 > hi").unwrap();
        assert_eq!(p.labels.get("context"), Some("12"));
        assert_eq!(p.remainder, "hi");
    }

    #[test]
    fn window_without_digits_is_invalid() {
        assert_eq!(peel("<abc>"), Err(PeelError::Window));
        assert_eq!(peel("<>"), Err(PeelError::Window));
        assert_eq!(peel("<3"), Err(PeelError::Window));
    }

    #[test]
    fn full_prefix_stack_peels_in_order() {
        let p = peel("/m#a#b:2<3> hi").unwrap();
        assert_eq!(p.name_seed, "m");
        assert_eq!(tags_of(&p), vec!["a", "b", "context"]);
        assert_eq!(p.labels.get("b"), Some("2"));
        assert_eq!(p.labels.get("context"), Some("3"));
        assert_eq!(p.remainder, "hi");
    }

    #[test]
    fn tag_stops_at_angle_bracket() {
        let p = peel("#fast<5> go").unwrap();
        assert_eq!(tags_of(&p), vec!["fast", "context"]);
        assert_eq!(p.labels.get("context"), Some("5"));
        assert_eq!(p.remainder, "go");
    }
}
