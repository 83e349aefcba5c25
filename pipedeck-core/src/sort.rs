//! Stable merge sort over [`Sequence`]
//!
//! Built from the sequence's own operations only: the input is halved with
//! `split_off`, and halves are merged by popping heads into a fresh output.

use crate::item::Stream;
use crate::sequence::Sequence;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort `sequence` with `less_than` (`less_than(a, b)` means `a` goes first).
///
/// Stable: when neither element is less than the other, the one that came
/// first in the input stays first. The input is consumed.
pub fn merge_sort<T, F>(sequence: Sequence<T>, mut less_than: F) -> Sequence<T>
where
    F: FnMut(&T, &T) -> bool,
{
    sort_recursive(sequence, &mut less_than)
}

fn sort_recursive<T, F>(mut sequence: Sequence<T>, less_than: &mut F) -> Sequence<T>
where
    F: FnMut(&T, &T) -> bool,
{
    if sequence.len() <= 1 {
        return sequence;
    }

    let middle = sequence.len() / 2;
    let right = match sequence.split_off(middle) {
        Ok(right) => right,
        // `middle <= len` always holds
        Err(_) => return sequence,
    };

    let left = sort_recursive(sequence, less_than);
    let right = sort_recursive(right, less_than);
    merge(left, right, less_than)
}

fn merge<T, F>(mut left: Sequence<T>, mut right: Sequence<T>, less_than: &mut F) -> Sequence<T>
where
    F: FnMut(&T, &T) -> bool,
{
    let mut merged = Sequence::with_capacity(left.len() + right.len());

    loop {
        // Ties go to the left half
        let take_right = match (left.head(), right.head()) {
            (Ok(l), Ok(r)) => less_than(r, l),
            _ => break,
        };
        let next = if take_right {
            right.pop_head()
        } else {
            left.pop_head()
        };
        if let Ok(value) = next {
            merged.push(value);
        }
    }

    merged.extend(left);
    merged.extend(right);
    merged
}

impl<T> Sequence<T> {
    /// Stable in-place sort, see [`merge_sort`]
    pub fn sort_by<F>(&mut self, less_than: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        let sequence = std::mem::take(self);
        *self = merge_sort(sequence, less_than);
    }
}

/// Sort keys offered for stream listings
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamOrder {
    /// Keep the order the store returned
    #[default]
    Stored,
    Title,
    Uploader,
    Duration,
    UploadDate,
    ViewCount,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl StreamOrder {
    pub fn compare(self, a: &Stream, b: &Stream) -> Ordering {
        match self {
            StreamOrder::Stored => Ordering::Equal,
            StreamOrder::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            StreamOrder::Uploader => a.uploader.to_lowercase().cmp(&b.uploader.to_lowercase()),
            StreamOrder::Duration => a.duration.cmp(&b.duration),
            StreamOrder::UploadDate => a.upload_date.cmp(&b.upload_date),
            StreamOrder::ViewCount => a.view_count.cmp(&b.view_count),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().replace('-', "_").as_str() {
            "stored" => Some(StreamOrder::Stored),
            "title" => Some(StreamOrder::Title),
            "uploader" => Some(StreamOrder::Uploader),
            "duration" => Some(StreamOrder::Duration),
            "upload_date" | "date" => Some(StreamOrder::UploadDate),
            "view_count" | "views" => Some(StreamOrder::ViewCount),
            _ => None,
        }
    }
}

/// Stable sort of a stream listing by `order`
///
/// Descending order flips the comparison, not the result, so equal streams
/// keep their stored order either way.
pub fn sort_streams(streams: &mut Sequence<Stream>, order: StreamOrder, direction: SortDirection) {
    if order == StreamOrder::Stored {
        return;
    }
    streams.sort_by(|a, b| {
        let ordering = order.compare(a, b);
        match direction {
            SortDirection::Ascending => ordering == Ordering::Less,
            SortDirection::Descending => ordering == Ordering::Greater,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_small_inputs() {
        let empty: Sequence<u32> = Sequence::new();
        assert!(merge_sort(empty, |a, b| a < b).is_empty());

        let single = Sequence::from(vec![7]);
        assert_eq!(merge_sort(single, |a, b| a < b).to_vec(), vec![7]);
    }

    #[test]
    fn test_sort_numbers() {
        let sequence = Sequence::from(vec![5, 1, 4, 2, 3, 0]);
        assert_eq!(
            merge_sort(sequence, |a, b| a < b).to_vec(),
            vec![0, 1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn test_sort_is_stable() {
        let sequence = Sequence::from(vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')]);
        let sorted = merge_sort(sequence, |a, b| a.0 < b.0);
        assert_eq!(sorted.to_vec(), vec![(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn test_sort_by_in_place() {
        let mut sequence = Sequence::from(vec!["pear", "fig", "apple"]);
        sequence.sort_by(|a, b| a.len() < b.len());
        assert_eq!(sequence.to_vec(), vec!["fig", "pear", "apple"]);
    }

    #[test]
    fn test_parse_order() {
        assert_eq!(StreamOrder::parse("upload-date"), Some(StreamOrder::UploadDate));
        assert_eq!(StreamOrder::parse("Views"), Some(StreamOrder::ViewCount));
        assert_eq!(StreamOrder::parse("rating"), None);
    }
}
