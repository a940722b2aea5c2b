//! Case-insensitive literal filtering of the candidate list.
//!
//! Queries are plain text. Characters such as `(`, `*` or `\` match
//! themselves; nothing is interpreted as a pattern.

use super::props::Item;
use std::ops::Range;

/// Find `query` inside `text`, ignoring case.
///
/// Returns the byte range of the match in `text` so the caller can emphasise
/// exactly the characters the user typed. An empty query matches at `0..0`.
pub fn find(text: &str, query: &str) -> Option<Range<usize>> {
    if query.is_empty() {
        return Some(0..0);
    }
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();

    // Folded characters, each tagged with the byte span of the source char.
    let mut folded: Vec<(char, usize, usize)> = Vec::with_capacity(text.len());
    for (start, c) in text.char_indices() {
        let end = start + c.len_utf8();
        folded.extend(c.to_lowercase().map(|lc| (lc, start, end)));
    }
    if needle.len() > folded.len() {
        return None;
    }

    (0..=folded.len() - needle.len())
        .find(|&i| {
            folded[i..i + needle.len()]
                .iter()
                .zip(&needle)
                .all(|((c, _, _), n)| c == n)
        })
        .map(|i| folded[i].1..folded[i + needle.len() - 1].2)
}

/// Whether an item's displayed text contains `query`.
pub fn is_match(item: &Item, query: &str) -> bool {
    find(item.display_text(), query).is_some()
}

/// Lazily filter `items` by `query`, yielding `(index, item)` in list order.
pub fn matches<'a>(items: &'a [Item], query: &'a str) -> Matches<'a> {
    Matches {
        items: items.iter().enumerate(),
        query,
    }
}

/// Iterator returned by [`matches`].
pub struct Matches<'a> {
    items: std::iter::Enumerate<std::slice::Iter<'a, Item>>,
    query: &'a str,
}

impl<'a> Iterator for Matches<'a> {
    type Item = (usize, &'a Item);

    fn next(&mut self) -> Option<Self::Item> {
        let query = self.query;
        self.items.find(|(_, item)| is_match(item, query))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.items.size_hint().1)
    }
}

/// The items currently shown in the menu, as indices into the candidate list.
///
/// Rebuilt from scratch whenever the query or the candidate list changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchingSet {
    indices: Vec<usize>,
}

impl MatchingSet {
    /// Compute the matching set for `query`.
    pub fn build(items: &[Item], query: &str) -> Self {
        Self {
            indices: matches(items, query).map(|(i, _)| i).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Candidate-list index of the item at menu position `pos`.
    pub fn get(&self, pos: usize) -> Option<usize> {
        self.indices.get(pos).copied()
    }

    /// Menu position of the candidate at `index`, if it is shown.
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.indices.iter().position(|&i| i == index)
    }

    /// Iterate candidate-list indices in menu order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}
