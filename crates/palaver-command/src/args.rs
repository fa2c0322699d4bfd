//! Argument splitting for command handlers.
//!
//! Two families exist in the grammar: commands whose word must be
//! followed by whitespace before any argument (`set`, `get`, `enable`),
//! and commands whose arguments may be glued to the word (`echo`,
//! `ip`, `xkcd`). Handlers fail with their own `invalid <cmd> command`
//! error when these return None.

/// Strip a command word that requires a whitespace boundary.
/// `"set a b"` -> `Some("a b")`, `"set"` -> `Some("")`, `"setx"` -> `None`.
pub fn strip_word<'a>(message: &'a str, word: &str) -> Option<&'a str> {
    let rest = message.strip_prefix(word)?;
    if rest.is_empty() {
        return Some("");
    }
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim_start())
}

/// Strip a command word whose arguments may be glued to it.
/// `"echo hi"` -> `"hi"`, `"echohi"` -> `"hi"`.
pub fn strip_loose<'a>(message: &'a str, word: &str) -> Option<&'a str> {
    message.strip_prefix(word).map(str::trim_start)
}

/// Split off the first whitespace-delimited token.
pub fn first_token(rest: &str) -> Option<(&str, &str)> {
    let rest = rest.trim_start();
    if rest.is_empty() {
        return None;
    }
    let end = rest
        .find(char::is_whitespace)
        .unwrap_or(rest.len());
    let (token, tail) = rest.split_at(end);
    Some((token, tail.trim_start()))
}

/// Like [`first_token`], but an absent token reads as "".
pub fn token_or_empty(rest: &str) -> (&str, &str) {
    first_token(rest).unwrap_or(("", ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_word_requires_boundary() {
        assert_eq!(strip_word("set a b", "set"), Some("a b"));
        assert_eq!(strip_word("set", "set"), Some(""));
        assert_eq!(strip_word("settle down", "set"), None);
    }

    #[test]
    fn strip_loose_allows_glued_args() {
        assert_eq!(strip_loose("echo hi", "echo"), Some("hi"));
        assert_eq!(strip_loose("echohi", "echo"), Some("hi"));
        assert_eq!(strip_loose("nope", "echo"), None);
    }

    #[test]
    fn first_token_splits_and_trims() {
        assert_eq!(first_token("a  b c"), Some(("a", "b c")));
        assert_eq!(first_token("one"), Some(("one", "")));
        assert_eq!(first_token("   "), None);
    }

    #[test]
    fn token_or_empty_defaults() {
        assert_eq!(token_or_empty(""), ("", ""));
        assert_eq!(token_or_empty("x y"), ("x", "y"));
    }
}
