use serde::{Deserialize, Serialize};

/// Anything the reorder controller can track by a stable, unique id
pub trait Identify {
    fn uid(&self) -> &str;
}

impl Identify for String {
    fn uid(&self) -> &str {
        self
    }
}

/// A video or audio stream saved in the library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    pub uid: String,
    #[serde(default)]
    pub service_id: i64,
    #[serde(default)]
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub stream_type: String,
    /// Length in seconds
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub uploader: String,
    #[serde(default)]
    pub uploader_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default)]
    pub textual_upload_date: String,
    /// Milliseconds since the epoch
    #[serde(default)]
    pub upload_date: i64,
    #[serde(default)]
    pub is_upload_date_approximation: bool,
    pub progress_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Tag>,
}

impl Stream {
    pub fn display_uploader(&self) -> &str {
        if self.uploader.is_empty() {
            "Unknown Uploader"
        } else {
            &self.uploader
        }
    }

    /// Duration as `h:mm:ss` or `m:ss`
    pub fn display_duration(&self) -> String {
        let total = self.duration.max(0);
        let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
        if hours > 0 {
            format!("{hours}:{minutes:02}:{seconds:02}")
        } else {
            format!("{minutes}:{seconds:02}")
        }
    }
}

impl Identify for Stream {
    fn uid(&self) -> &str {
        &self.uid
    }
}

/// User-defined label with a display colour (`#rgb` or `#rrggbb`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub uid: String,
    pub name: String,
    pub color: String,
}

impl Identify for Tag {
    fn uid(&self) -> &str {
        &self.uid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_deserializes_with_defaults() {
        let stream: Stream = serde_json::from_str(
            r#"{"uid": "12", "title": "Talk", "progress_time": null}"#,
        )
        .unwrap();
        assert_eq!(stream.uid(), "12");
        assert_eq!(stream.duration, 0);
        assert!(stream.tag.is_none());
        assert_eq!(stream.display_uploader(), "Unknown Uploader");
    }

    #[test]
    fn test_display_duration() {
        let mut stream: Stream =
            serde_json::from_str(r#"{"uid": "1", "title": "t", "progress_time": null}"#).unwrap();
        stream.duration = 75;
        assert_eq!(stream.display_duration(), "1:15");
        stream.duration = 3725;
        assert_eq!(stream.display_duration(), "1:02:05");
    }
}
