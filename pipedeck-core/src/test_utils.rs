//! Shared test utilities for the pipedeck workspace
//!
//! Fixtures used by the unit tests and by the integration suites under
//! `tests/`. Only available when the "test-utils" feature is enabled.

use crate::item::Stream;
use crate::sequence::Sequence;

/// Create a test stream with minimal required fields
///
/// # Examples
///
/// ```
/// # use pipedeck_core::test_utils::create_test_stream;
/// let stream = create_test_stream("7", "Talk");
/// assert_eq!(stream.uid, "7");
/// assert_eq!(stream.url, "https://example.com/watch?v=7");
/// ```
pub fn create_test_stream(uid: &str, title: &str) -> Stream {
    Stream {
        uid: uid.to_owned(),
        service_id: 0,
        url: format!("https://example.com/watch?v={uid}"),
        title: title.to_owned(),
        stream_type: "VIDEO_STREAM".to_owned(),
        duration: 0,
        uploader: String::new(),
        uploader_url: String::new(),
        thumbnail_url: String::new(),
        view_count: 0,
        textual_upload_date: String::new(),
        upload_date: 0,
        is_upload_date_approximation: false,
        progress_time: None,
        tag: None,
    }
}

/// Create a test stream with the fields the sort orders look at
pub fn create_test_stream_with_stats(
    uid: &str,
    title: &str,
    uploader: &str,
    duration: i64,
    upload_date: i64,
    view_count: i64,
) -> Stream {
    Stream {
        uploader: uploader.to_owned(),
        duration,
        upload_date,
        view_count,
        ..create_test_stream(uid, title)
    }
}

/// Streams with uids `"1"..="count"`, in order
///
/// # Examples
///
/// ```
/// # use pipedeck_core::test_utils::{numbered_streams, uids};
/// let streams = numbered_streams(3);
/// assert_eq!(uids(&streams), vec!["1", "2", "3"]);
/// ```
pub fn numbered_streams(count: usize) -> Sequence<Stream> {
    (1..=count)
        .map(|n| create_test_stream(&n.to_string(), &format!("Stream {n}")))
        .collect()
}

/// Uids of `streams` in sequence order
pub fn uids(streams: &Sequence<Stream>) -> Vec<String> {
    streams.iter().map(|stream| stream.uid.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_stream() {
        let stream = create_test_stream("42", "test");
        assert_eq!(stream.uid, "42");
        assert_eq!(stream.title, "test");
        assert!(stream.tag.is_none());
    }

    #[test]
    fn test_numbered_streams() {
        let streams = numbered_streams(4);
        assert_eq!(streams.len(), 4);
        assert_eq!(streams.at(3).unwrap().title, "Stream 4");
    }
}
