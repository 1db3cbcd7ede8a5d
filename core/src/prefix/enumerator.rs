//! # PREFIX ENUMERATION
//!
//! Yields the entry stored exactly at a prefix first, then every structural
//! descendant in insertion order. Single pass; build a new one per query.

use crate::prefix::matcher::{is_prefix_match, keys_equal};

pub struct PrefixEntries<'a, V, I>
where
    I: Iterator<Item = (&'a str, &'a V)>,
    V: 'a,
{
    prefix: String,
    exact: Option<(&'a str, &'a V)>,
    scan: I,
}

impl<'a, V, I> PrefixEntries<'a, V, I>
where
    I: Iterator<Item = (&'a str, &'a V)>,
    V: 'a,
{
    /// **CONSTRUCTOR**
    ///
    /// **PARAMETERS**:
    /// - `prefix` - Key whose subtree is enumerated
    /// - `exact` - Entry stored under `prefix` itself, if any
    /// - `scan` - All entries in insertion order
    pub fn new(prefix: impl Into<String>, exact: Option<(&'a str, &'a V)>, scan: I) -> Self {
        Self {
            prefix: prefix.into(),
            exact,
            scan,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl<'a, V, I> Iterator for PrefixEntries<'a, V, I>
where
    I: Iterator<Item = (&'a str, &'a V)>,
    V: 'a,
{
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(first) = self.exact.take() {
            return Some(first);
        }

        let prefix = &self.prefix;
        self.scan
            .find(|(key, _)| !keys_equal(key, prefix) && is_prefix_match(prefix, key))
    }
}
