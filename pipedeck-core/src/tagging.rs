//! Tag creation and bulk tagging of selected items

use crate::error::{DeckError, Result};
use crate::event::Event;
use crate::item::{Identify, Stream, Tag};
use crate::reorder::ReorderController;
use crate::sequence::Sequence;
use std::collections::BTreeMap;
use tracing::debug;

/// Items that can carry a single tag
pub trait Taggable: Identify {
    fn tag(&self) -> Option<&Tag>;
    fn set_tag(&mut self, tag: Option<Tag>);
}

impl Taggable for Stream {
    fn tag(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }

    fn set_tag(&mut self, tag: Option<Tag>) {
        self.tag = tag;
    }
}

impl Tag {
    /// Create a tag, validating the colour as `#rgb` or `#rrggbb`
    pub fn new(uid: impl Into<String>, name: impl Into<String>, color: &str) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DeckError::InvalidTag("tag name is empty".to_owned()));
        }
        if !is_hex_color(color) {
            return Err(DeckError::InvalidTag(format!(
                "invalid colour {color:?}, expected #rgb or #rrggbb"
            )));
        }
        Ok(Self {
            uid: uid.into(),
            name,
            color: color.to_owned(),
        })
    }
}

fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Identifier for a new tag: one past the largest numeric uid in use
pub fn next_tag_id(tags: &[Tag]) -> String {
    let highest = tags
        .iter()
        .filter_map(|tag| tag.uid.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    (highest + 1).to_string()
}

/// Item uid to tag uid for every tagged item
pub fn tag_join<T: Taggable>(items: &Sequence<T>) -> BTreeMap<String, String> {
    items
        .iter()
        .filter_map(|item| Some((item.uid().to_owned(), item.tag()?.uid.clone())))
        .collect()
}

/// Give every item already carrying `tag.uid` the name and colour of `tag`.
///
/// Returns the number of items updated.
pub fn refresh_tag<T: Taggable>(items: &mut Sequence<T>, tag: &Tag) -> usize {
    let mut updated = 0;
    items.for_each_mut(|item| {
        let stale = item
            .tag()
            .is_some_and(|current| current.uid == tag.uid && current != tag);
        if stale {
            item.set_tag(Some(tag.clone()));
            updated += 1;
        }
    });
    updated
}

impl<T: Taggable> ReorderController<T> {
    /// Set `tag` on `uid`, or clear it with `None`.
    ///
    /// When `uid` is part of the selection the whole selection is tagged.
    /// Returns the uids whose tag actually changed, in list order.
    pub fn apply_tag(&mut self, uid: &str, tag: Option<&Tag>) -> Vec<String> {
        let targets = if self.selection().contains(uid) {
            self.selection().clone()
        } else {
            [uid.to_owned()].into()
        };

        let mut changed = Vec::new();
        self.items_mut().for_each_mut(|item| {
            if targets.contains(item.uid()) && item.tag() != tag {
                item.set_tag(tag.cloned());
                changed.push(item.uid().to_owned());
            }
        });

        debug!(
            "Tagged {} items with {:?}",
            changed.len(),
            tag.map(|t| t.name.as_str())
        );
        self.emit(Event::TagApplied {
            tag: tag.map(|t| t.uid.clone()),
            count: changed.len(),
        });
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_colour_validation() {
        assert!(Tag::new("1", "Music", "#fff").is_ok());
        assert!(Tag::new("1", "Music", "#A0b1C2").is_ok());
        assert!(matches!(
            Tag::new("1", "Music", "fff"),
            Err(DeckError::InvalidTag(_))
        ));
        assert!(Tag::new("1", "Music", "#ffff").is_err());
        assert!(Tag::new("1", "Music", "#ggg").is_err());
        assert!(Tag::new("1", "  ", "#fff").is_err());
    }

    #[test]
    fn test_next_tag_id() {
        assert_eq!(next_tag_id(&[]), "1");
        let tags = vec![
            Tag::new("3", "a", "#000").unwrap(),
            Tag::new("x", "b", "#000").unwrap(),
            Tag::new("10", "c", "#000").unwrap(),
        ];
        assert_eq!(next_tag_id(&tags), "11");
    }

    #[test]
    fn test_refresh_tag_recolours_carriers_only() {
        let music = Tag::new("1", "Music", "#f00").unwrap();
        let talks = Tag::new("2", "Talks", "#00f").unwrap();
        let mut streams = crate::test_utils::numbered_streams(3);
        streams.at_mut(0).unwrap().set_tag(Some(music.clone()));
        streams.at_mut(1).unwrap().set_tag(Some(talks.clone()));

        let recoloured = Tag::new("1", "Music", "#0f0").unwrap();
        assert_eq!(refresh_tag(&mut streams, &recoloured), 1);
        assert_eq!(streams.at(0).unwrap().tag(), Some(&recoloured));
        assert_eq!(streams.at(1).unwrap().tag(), Some(&talks));
        assert!(streams.at(2).unwrap().tag().is_none());
        assert_eq!(refresh_tag(&mut streams, &recoloured), 0);
    }
}
