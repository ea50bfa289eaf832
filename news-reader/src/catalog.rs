//! The feed document and the queries pages run against it.

use crate::error::{ParseFeedSnafu, Result};
use crate::model::{Category, Post, User};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub posts: Vec<Post>,
    /// Groupings as stored by the feed. They may disagree with post labels.
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// A disagreement between a stored [`Category`] and post labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryGap {
    /// The category lists a post that does not carry its label.
    UnlabeledMember { category: String, post: i64 },
    /// A post carries the label but the stored category leaves it out.
    MissingMember { category: String, post: i64 },
}

impl std::fmt::Display for CategoryGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnlabeledMember { category, post } => {
                write!(f, "category '{category}' lists post {post}, which lacks the label")
            }
            Self::MissingMember { category, post } => {
                write!(f, "post {post} is labelled '{category}' but the category omits it")
            }
        }
    }
}

impl Catalog {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context(ParseFeedSnafu)
    }

    pub fn post(&self, id: i64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn author(&self, post: &Post) -> Option<&User> {
        self.user(post.user)
    }

    pub fn posts_by(&self, user_id: i64) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(move |p| p.user == user_id)
    }

    pub fn posts_in<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Post> {
        self.posts.iter().filter(move |p| p.category.iter().any(|c| c == label))
    }

    /// Categories built from post labels, in order of first appearance.
    pub fn derive_categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = Vec::new();
        for post in &self.posts {
            for label in &post.category {
                let index = match categories.iter().position(|c| &c.name == label) {
                    Some(index) => index,
                    None => {
                        categories.push(Category { name: label.clone(), posts: Vec::new() });
                        categories.len() - 1
                    }
                };
                let members = &mut categories[index].posts;
                if !members.iter().any(|p| p.id == post.id) {
                    members.push(post.clone());
                }
            }
        }
        categories
    }

    pub fn category_gaps(&self) -> Vec<CategoryGap> {
        let mut gaps = Vec::new();
        for category in &self.categories {
            for member in &category.posts {
                let labelled = self
                    .post(member.id)
                    .unwrap_or(member)
                    .category
                    .iter()
                    .any(|c| c == &category.name);
                if !labelled {
                    gaps.push(CategoryGap::UnlabeledMember {
                        category: category.name.clone(),
                        post: member.id,
                    });
                }
            }
            for post in self.posts_in(&category.name) {
                if !category.posts.iter().any(|p| p.id == post.id) {
                    gaps.push(CategoryGap::MissingMember {
                        category: category.name.clone(),
                        post: post.id,
                    });
                }
            }
        }
        gaps
    }
}

/// Mean of a rating sequence.
pub fn average_rating(ratings: &[f64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
}
