//! Fixed key namespacing conventions.
//!
//! `key:<name>` generic storage, `key:/<name>` alias hops,
//! `key:#<tag>` tag prompts, `key:$<name>` internal records,
//! `feature:<caller>` per-caller flag hash,
//! `context:<caller>:<group>` conversation list,
//! `usage:<caller>:<group>:last` last-call usage.

pub fn value(name: &str) -> String {
    format!("key:{name}")
}

pub fn alias(name: &str) -> String {
    format!("key:/{name}")
}

pub fn tag_prompt(tag: &str) -> String {
    format!("key:#{tag}")
}

pub fn internal(name: &str) -> String {
    format!("key:${name}")
}

pub fn features(caller: &str) -> String {
    format!("feature:{caller}")
}

pub fn context(caller: &str, group: &str) -> String {
    format!("context:{caller}:{group}")
}

pub fn last_usage(caller: &str, group: &str) -> String {
    format!("usage:{caller}:{group}:last")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_are_distinct() {
        assert_eq!(value("/m"), alias("m"));
        assert_ne!(value("m"), alias("m"));
        assert_eq!(tag_prompt("raw"), "key:#raw");
        assert_eq!(internal("lol"), "key:$lol");
        assert_eq!(context("u", "g"), "context:u:g");
        assert_eq!(last_usage("u", "g"), "usage:u:g:last");
    }
}
