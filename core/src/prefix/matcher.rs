//! # PREFIX MATCHER
//!
//! **PURPOSE**: Decides whether one model key names a location at or below
//! another, given dotted members (`Parent.Child`) and indexers (`Items[2]`).
//! **GUARANTEE**: Total over all string pairs. Never panics, never allocates.

/// Case-insensitive equality used for every key comparison in this crate.
pub fn keys_equal(left: &str, right: &str) -> bool {
    strip_prefix_ignore_case(left, right) == Some("")
}

/// Folded form of a key, used as the lookup index of the entry map.
pub(crate) fn fold_key(key: &str) -> String {
    key.chars().flat_map(char::to_lowercase).collect()
}

fn chars_equal_ignore_case(left: char, right: char) -> bool {
    left == right || left.to_lowercase().eq(right.to_lowercase())
}

/// Returns what follows `prefix` in `text` when `text` starts with it,
/// ignoring case one character at a time.
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut text_chars = text.char_indices();
    for expected in prefix.chars() {
        match text_chars.next() {
            Some((_, actual)) if chars_equal_ignore_case(actual, expected) => {}
            _ => return None,
        }
    }
    match text_chars.next() {
        Some((offset, _)) => Some(&text[offset..]),
        None => Some(""),
    }
}

/// **STRUCTURAL PREFIX MATCH**
///
/// `true` when `candidate` is a strict descendant of `prefix`:
/// - `("", "Anything")` matches, the empty key is the model root
/// - `("Foo", "Foo.Bar")` and `("Foo", "Foo[0]")` match
/// - `("Foo", "Foobar")` does not, the next character must be `.` or `[`
/// - `("Name", "[0].Name")` matches, a leading indexer segment is skipped
pub fn is_prefix_match(prefix: &str, candidate: &str) -> bool {
    if candidate.len() <= prefix.len() {
        return false;
    }

    let remainder = match strip_prefix_ignore_case(candidate, prefix) {
        Some(remainder) => remainder,
        None => {
            if !candidate.starts_with('[') {
                return false;
            }
            let sub_key = match candidate.find('.') {
                Some(dot) => &candidate[dot + 1..],
                None => return false,
            };
            let remainder = match strip_prefix_ignore_case(sub_key, prefix) {
                Some(remainder) => remainder,
                None => return false,
            };
            if remainder.is_empty() {
                return true;
            }
            remainder
        }
    };

    if prefix.is_empty() {
        return true;
    }

    matches!(remainder.as_bytes().first(), Some(b'.') | Some(b'['))
}
