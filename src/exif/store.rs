//! The decoded tag collection.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use super::tag::Tag;

/// Decoded tags keyed by tag id.
///
/// Filled during a decode session, after which callers only read it. When
/// two entries share an id, the one decoded last wins.
///
/// Insertion is crate-internal: stores come out of a decode session (or
/// [`FromIterator`]) and are read-only from then on, so a returned store
/// always reflects exactly what was decoded.
///
/// Not synchronized: a store shared between threads needs external locking,
/// or to be wrapped in an `Arc` once decoding has finished.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagStore {
    tags: HashMap<i64, Tag>,
}

impl TagStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert a tag, replacing any tag with the same id.
    pub(crate) fn insert(&mut self, tag: Tag) -> Option<Tag> {
        self.tags.insert(tag.tag_id(), tag)
    }

    /// Look a tag up by id.
    pub fn get(&self, tag_id: impl Into<i64>) -> Option<&Tag> {
        self.tags.get(&tag_id.into())
    }

    pub fn contains(&self, tag_id: impl Into<i64>) -> bool {
        self.tags.contains_key(&tag_id.into())
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate over the tags in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values()
    }

    /// The tags ordered by id.
    pub fn sorted(&self) -> Vec<&Tag> {
        let mut tags: Vec<&Tag> = self.tags.values().collect();
        tags.sort_by_key(|tag| tag.tag_id());
        tags
    }
}

impl FromIterator<Tag> for TagStore {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut store = TagStore::new();
        for tag in iter {
            store.insert(tag);
        }
        store
    }
}

impl<'a> IntoIterator for &'a TagStore {
    type Item = &'a Tag;
    type IntoIter = std::collections::hash_map::Values<'a, i64, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.values()
    }
}

/// Serialized as a list ordered by tag id, so output is stable.
impl Serialize for TagStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tags = self.sorted();
        let mut seq = serializer.serialize_seq(Some(tags.len()))?;
        for tag in tags {
            seq.serialize_element(tag)?;
        }
        seq.end()
    }
}
