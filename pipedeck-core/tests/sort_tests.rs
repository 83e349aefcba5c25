//! Merge sort ordering and stability

use pipedeck_core::Sequence;
use pipedeck_core::sort::{SortDirection, StreamOrder, merge_sort, sort_streams};
use pipedeck_core::test_utils::{create_test_stream_with_stats, uids};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn sort_is_ordered_and_stable(values in prop::collection::vec(0u8..8, 0..96)) {
        // Pair each value with its input position; compare on the value only
        let tagged: Vec<(u8, usize)> = values.iter().copied().zip(0..).collect();
        let sorted = merge_sort(Sequence::from(tagged.clone()), |a, b| a.0 < b.0).to_vec();

        let mut expected = tagged;
        expected.sort_by_key(|pair| pair.0);
        prop_assert_eq!(sorted, expected);
    }

    #[test]
    fn descending_keeps_ties_in_order(values in prop::collection::vec(0u8..5, 0..64)) {
        let tagged: Vec<(u8, usize)> = values.iter().copied().zip(0..).collect();
        let sorted = merge_sort(Sequence::from(tagged.clone()), |a, b| a.0 > b.0).to_vec();

        let mut expected = tagged;
        expected.sort_by(|a, b| b.0.cmp(&a.0));
        prop_assert_eq!(sorted, expected);
    }

    #[test]
    fn sort_preserves_length(values in prop::collection::vec(any::<i64>(), 0..128)) {
        let sorted = merge_sort(Sequence::from(values.clone()), |a, b| a < b);
        prop_assert_eq!(sorted.len(), values.len());
        let sorted = sorted.to_vec();
        prop_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
    }
}

fn library() -> Sequence<pipedeck_core::item::Stream> {
    Sequence::from(vec![
        create_test_stream_with_stats("1", "beta", "Zed", 300, 1_700, 10),
        create_test_stream_with_stats("2", "Alpha", "amy", 120, 1_900, 500),
        create_test_stream_with_stats("3", "gamma", "Bob", 300, 1_500, 10),
        create_test_stream_with_stats("4", "alpha", "Amy", 60, 1_800, 90),
    ])
}

#[test]
fn test_sort_streams_by_title_ignores_case() {
    let mut streams = library();
    sort_streams(&mut streams, StreamOrder::Title, SortDirection::Ascending);
    // "Alpha" and "alpha" tie and keep their stored order
    assert_eq!(uids(&streams), vec!["2", "4", "1", "3"]);
}

#[test]
fn test_sort_streams_descending_duration_is_stable() {
    let mut streams = library();
    sort_streams(&mut streams, StreamOrder::Duration, SortDirection::Descending);
    assert_eq!(uids(&streams), vec!["1", "3", "2", "4"]);
}

#[test]
fn test_sort_streams_by_upload_date_and_views() {
    let mut streams = library();
    sort_streams(&mut streams, StreamOrder::UploadDate, SortDirection::Ascending);
    assert_eq!(uids(&streams), vec!["3", "1", "4", "2"]);

    sort_streams(&mut streams, StreamOrder::ViewCount, SortDirection::Descending);
    assert_eq!(uids(&streams), vec!["2", "4", "3", "1"]);
}

#[test]
fn test_sort_streams_by_uploader() {
    let mut streams = library();
    sort_streams(&mut streams, StreamOrder::Uploader, SortDirection::Ascending);
    assert_eq!(uids(&streams), vec!["2", "4", "3", "1"]);
}

#[test]
fn test_stored_order_is_untouched() {
    let mut streams = library();
    sort_streams(&mut streams, StreamOrder::Stored, SortDirection::Descending);
    assert_eq!(uids(&streams), vec!["1", "2", "3", "4"]);
}
