//! Domain records exchanged with the feed, plus UI state shared across pages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    /// Id of the owning user.
    pub user: i64,
    /// Profile image reference.
    pub profile: String,
    #[serde(default)]
    pub content_image: Vec<String>,
    /// Labels; not checked against any [`Category`].
    #[serde(default)]
    pub category: Vec<String>,
    pub title: String,
    pub content: String,
    pub date: String,
    #[serde(default)]
    pub rating: Vec<f64>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

/// A named grouping of posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub date: String,
    pub rating: f64,
}

/// State shared by every page.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub theme: Theme,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Cyan,
    Green,
    Magenta,
    Yellow,
}

impl Theme {
    pub fn next(&self) -> Self {
        match self {
            Theme::Cyan => Theme::Green,
            Theme::Green => Theme::Magenta,
            Theme::Magenta => Theme::Yellow,
            Theme::Yellow => Theme::Cyan,
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        match self {
            Theme::Cyan => ratatui::style::Color::Cyan,
            Theme::Green => ratatui::style::Color::Green,
            Theme::Magenta => ratatui::style::Color::Magenta,
            Theme::Yellow => ratatui::style::Color::Yellow,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Cyan => "Cyan",
            Theme::Green => "Green",
            Theme::Magenta => "Magenta",
            Theme::Yellow => "Yellow",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_json() -> serde_json::Value {
        json!({
            "id": 7,
            "user": 1,
            "profile": "avatars/1.png",
            "contentImage": ["img/a.jpg", "img/b.jpg"],
            "category": ["world", "tech"],
            "title": "Chips abroad",
            "content": "Body",
            "date": "2024-03-02",
            "rating": [4, 5],
            "comments": [
                { "id": 1, "userId": 2, "content": "x", "date": "2024-01-01", "rating": 5 }
            ]
        })
    }

    #[test]
    fn post_reads_camel_case_fields() {
        let post: Post = serde_json::from_value(post_json()).unwrap();
        assert_eq!(post.content_image, ["img/a.jpg", "img/b.jpg"]);
        assert_eq!(post.category, ["world", "tech"]);
        assert_eq!(post.rating, [4.0, 5.0]);
        assert_eq!(post.comments[0].user_id, 2);
    }

    #[test]
    fn comment_fields_survive_unchanged() {
        let raw = json!({ "id": 1, "userId": 2, "content": "x", "date": "2024-01-01", "rating": 5 });
        let comment: Comment = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(
            comment,
            Comment { id: 1, user_id: 2, content: "x".into(), date: "2024-01-01".into(), rating: 5.0 }
        );
        let back = serde_json::to_value(&comment).unwrap();
        assert_eq!(back["userId"], 2);
        assert_eq!(back["content"], "x");
        assert_eq!(back["date"], "2024-01-01");
        assert_eq!(back["rating"].as_f64(), Some(5.0));
    }

    #[test]
    fn empty_images_and_ratings_are_valid() {
        let mut raw = post_json();
        raw["contentImage"] = json!([]);
        raw["rating"] = json!([]);
        let post: Post = serde_json::from_value(raw).unwrap();
        assert!(post.content_image.is_empty());
        assert!(post.rating.is_empty());

        let mut raw = post_json();
        raw.as_object_mut().unwrap().remove("comments");
        let post: Post = serde_json::from_value(raw).unwrap();
        assert!(post.comments.is_empty());
    }

    #[test]
    fn theme_cycles() {
        let mut theme = Theme::default();
        for _ in 0..4 {
            theme = theme.next();
        }
        assert_eq!(theme, Theme::Cyan);
        assert_eq!(Theme::Magenta.name(), "Magenta");
    }
}
