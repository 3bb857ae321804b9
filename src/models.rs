//! Data models for Hacker News stories.
//!
//! - [`Story`]: an item record as returned by `GET /item/{id}.json`
//! - [`RenderedStory`]: a borrowed view of a story with the derived
//!   `datetime` field the template displays
//!
//! Only `id`, `title` and `time` are interpreted by the pipeline. Every other
//! field the API sends (`by`, `url`, `score`, `descendants`, ...) is kept in
//! [`Story::extra`] and handed to the template untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A story record fetched from the Hacker News API.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Story {
    /// The item's unique id.
    pub id: u64,
    /// The story headline. Absent for deleted or dead items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Creation time in seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    /// Passthrough fields used only by the template.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Story {
    /// The title, or an empty string when the item has none.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn mentions(&self, keyword: &str) -> bool {
        self.title_or_empty().contains(keyword)
    }
}

/// What the template sees for each story: every API field plus `datetime`.
#[derive(Debug, Serialize)]
pub struct RenderedStory<'a> {
    #[serde(flatten)]
    pub story: &'a Story,
    /// Local time of publication, `YYYY-MM-DD HH:MM:SS`.
    pub datetime: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_deserialization_keeps_passthrough_fields() {
        let json = r#"{
            "by": "steveklabnik",
            "descendants": 42,
            "id": 9551937,
            "score": 1024,
            "time": 1431702000,
            "title": "Rust 1.0 released",
            "type": "story",
            "url": "https://blog.rust-lang.org/2015/05/15/Rust-1.0.html"
        }"#;

        let story: Story = serde_json::from_str(json).unwrap();
        assert_eq!(story.id, 9551937);
        assert_eq!(story.title.as_deref(), Some("Rust 1.0 released"));
        assert_eq!(story.time, Some(1431702000));
        assert_eq!(story.extra["by"], "steveklabnik");
        assert_eq!(story.extra["score"], 1024);
        assert!(!story.extra.contains_key("id"));
    }

    #[test]
    fn test_story_without_title() {
        let story: Story = serde_json::from_str(r#"{"id": 3, "time": 0, "deleted": true}"#).unwrap();
        assert_eq!(story.title, None);
        assert_eq!(story.title_or_empty(), "");
        assert!(!story.mentions("Rust"));
    }

    #[test]
    fn test_mentions_is_case_sensitive() {
        let story: Story =
            serde_json::from_str(r#"{"id": 1, "title": "Why I like rust and Rustaceans"}"#).unwrap();
        assert!(story.mentions("Rust"));
        assert!(!story.mentions("RUST"));

        let lower: Story = serde_json::from_str(r#"{"id": 2, "title": "trust issues"}"#).unwrap();
        assert!(!lower.mentions("Rust"));
    }

    #[test]
    fn test_rendered_story_flattens_fields() {
        let story: Story =
            serde_json::from_str(r#"{"id": 7, "title": "T", "time": 10, "url": "https://x.test"}"#)
                .unwrap();
        let view = RenderedStory {
            story: &story,
            datetime: "1970-01-01 00:00:10".to_string(),
        };

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["url"], "https://x.test");
        assert_eq!(value["datetime"], "1970-01-01 00:00:10");
    }
}
