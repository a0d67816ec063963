use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    entities::{
        option_fields::OptionField,
        resource::{Entity, Resource},
        validators::{validate_optional_url_field, validate_slug, validate_tags, validate_title, validate_url},
    },
    repositories::document_store::SortOrder,
    utils::{markdown::reading_time_minutes, timestamp},
};

// ───── Constants ──────────────────────────────────────────────────────
const MIN_TITLE_LENGTH: u64 = 3;
const MAX_TITLE_LENGTH: u64 = 120;
const MAX_SLUG_LENGTH: u64 = 80;
const MAX_EXCERPT_LENGTH: u64 = 300;
pub const MAX_LIST_LIMIT: u64 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl BlogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Draft => "draft",
            BlogStatus::Published => "published",
            BlogStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

// ───── Stored document ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub status: BlogStatus,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub reading_time: u32,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub liked_by: Vec<String>,
    #[serde(default = "initial_version")]
    pub version: i64,
    #[serde(default, with = "timestamp::option")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

fn initial_version() -> i64 {
    1
}

// ───── Requests ──────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct NewBlogPost {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH, message = "Title must be between 3 and 120 characters"),
        custom(function = "validate_title")
    )]
    pub title: String,

    /// Generated from the title when omitted.
    #[validate(length(max = MAX_SLUG_LENGTH), custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[validate(length(min = 1, max = MAX_EXCERPT_LENGTH, message = "Excerpt is required"))]
    pub excerpt: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,

    #[validate(custom(function = "validate_url"))]
    pub cover_image: Option<String>,

    pub status: BlogStatus,

    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH, message = "Title must be between 3 and 120 characters"),
        custom(function = "validate_title")
    )]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_SLUG_LENGTH), custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = MAX_EXCERPT_LENGTH, message = "Excerpt cannot be empty"))]
    pub excerpt: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Option<Vec<String>>,

    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    #[validate(custom(function = "validate_optional_url_field"))]
    pub cover_image: OptionField<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BlogStatus>,

    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    pub difficulty: OptionField<Difficulty>,
}

/// Query string of the blog list.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct BlogQuery {
    pub status: Option<BlogStatus>,
    #[validate(length(min = 1))]
    pub tag: Option<String>,
    pub difficulty: Option<Difficulty>,
    #[validate(range(min = 1, max = MAX_LIST_LIMIT))]
    pub limit: Option<u64>,
}

// ───── Responses ─────────────────────────────────────────────────────

/// A post as served on the slug route, with its markdown rendered.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostView {
    #[serde(flatten)]
    pub post: Entity<BlogPost>,
    pub content_html: String,
}

impl Resource for BlogPost {
    const COLLECTION: &'static str = "blogs";
    const NAME: &'static str = "Blog";

    type Create = NewBlogPost;
    type Update = BlogPostUpdate;

    fn sort() -> &'static [(&'static str, SortOrder)] {
        &[("createdAt", SortOrder::Desc)]
    }

    fn from_create(input: NewBlogPost, now: DateTime<Utc>) -> Self {
        let slug = input.slug.unwrap_or_else(|| slug::slugify(&input.title));
        let published_at = (input.status == BlogStatus::Published).then_some(now);

        BlogPost {
            reading_time: reading_time_minutes(&input.content),
            title: input.title,
            slug,
            excerpt: input.excerpt,
            content: input.content,
            tags: input.tags,
            cover_image: input.cover_image,
            status: input.status,
            difficulty: input.difficulty,
            likes: 0,
            liked_by: Vec::new(),
            version: initial_version(),
            published_at,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::Schema;
    use serde_json::json;

    fn new_post(extra: serde_json::Value) -> NewBlogPost {
        let mut body = json!({ "title": "Hello Rust World", "excerpt": "Short", "content": "Body text" });
        if let (Some(base), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        NewBlogPost::parse(body.into()).unwrap()
    }

    #[test]
    fn new_posts_start_as_unliked_drafts() {
        let post = BlogPost::from_create(new_post(json!({})), Utc::now());
        assert_eq!(post.slug, "hello-rust-world");
        assert_eq!(post.status, BlogStatus::Draft);
        assert_eq!((post.likes, post.version, post.reading_time), (0, 1, 1));
        assert!(post.liked_by.is_empty());
        assert!(post.published_at.is_none());
    }

    #[test]
    fn explicit_slug_and_published_status_are_kept() {
        let now = Utc::now();
        let post = BlogPost::from_create(new_post(json!({ "slug": "custom", "status": "published" })), now);
        assert_eq!(post.slug, "custom");
        assert_eq!(post.published_at, Some(now));
    }

    #[test]
    fn every_missing_field_is_reported() {
        let errors = NewBlogPost::parse(json!({}).into()).unwrap_err();
        let keys: Vec<_> = errors.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["content", "excerpt", "title"]);
        assert!(errors.values().all(|messages| !messages.is_empty()));
    }

    #[test]
    fn bad_slug_and_unknown_status_are_rejected() {
        let errors = NewBlogPost::parse(
            json!({ "title": "Hello", "excerpt": "e", "content": "c", "slug": "Bad Slug" }).into(),
        )
        .unwrap_err();
        assert!(errors.contains_key("slug"));

        let errors = NewBlogPost::parse(
            json!({ "title": "Hello", "excerpt": "e", "content": "c", "status": "deleted" }).into(),
        )
        .unwrap_err();
        assert!(errors.contains_key("body"));
    }

    #[test]
    fn stored_shape_is_camel_case() {
        let post = BlogPost::from_create(new_post(json!({ "tags": ["rust"] })), Utc::now());
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["likedBy"], json!([]));
        assert_eq!(value["readingTime"], 1);
        assert_eq!(value["publishedAt"], serde_json::Value::Null);
    }
}
