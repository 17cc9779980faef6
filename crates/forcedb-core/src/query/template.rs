use crate::error::Error;
use regex::Regex;
use std::sync::LazyLock;

static WILDCARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[A-Za-z_][A-Za-z0-9_]*\.)*\*").expect("wildcard pattern is valid")
});

///
/// Wildcard
/// One `path.*` occurrence in a template head.
///

#[derive(Debug)]
pub(crate) struct Wildcard<'t> {
    pub(crate) text: &'t str,
    pub(crate) segments: Vec<&'t str>,
}

impl<'t> Wildcard<'t> {
    fn parse(text: &'t str) -> Self {
        let path = text.trim_end_matches('*');
        let segments = path.split('.').filter(|s| !s.is_empty()).collect();

        Self { text, segments }
    }
}

/// Split at the first string-literal quote; the tail is never rewritten.
#[must_use]
pub fn split_at_literal(template: &str) -> (&str, &str) {
    match template.find('\'') {
        Some(index) => template.split_at(index),
        None => (template, ""),
    }
}

/// Replace every wildcard in the template head with `expand`'s output.
pub(crate) fn substitute(
    template: &str,
    mut expand: impl FnMut(&Wildcard<'_>) -> Result<String, Error>,
) -> Result<String, Error> {
    let (head, tail) = split_at_literal(template);
    let mut out = String::with_capacity(template.len() * 2);
    let mut last = 0;

    for found in WILDCARD.find_iter(head) {
        out.push_str(&head[last..found.start()]);
        out.push_str(&expand(&Wildcard::parse(found.as_str()))?);
        last = found.end();
    }
    out.push_str(&head[last..]);
    out.push_str(tail);

    Ok(out)
}
