use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    entities::{resource::Resource, validators::validate_string_list},
    repositories::document_store::SortOrder,
    utils::timestamp,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub content: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct NewAbout {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    #[validate(custom(function = "validate_string_list"))]
    pub highlights: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_string_list"))]
    pub highlights: Option<Vec<String>>,
}

impl Resource for About {
    const COLLECTION: &'static str = "abouts";
    const NAME: &'static str = "About";

    type Create = NewAbout;
    type Update = AboutUpdate;

    fn sort() -> &'static [(&'static str, SortOrder)] {
        &[("updatedAt", SortOrder::Desc)]
    }

    fn from_create(input: NewAbout, now: DateTime<Utc>) -> Self {
        About {
            content: input.content,
            highlights: input.highlights,
            created_at: now,
            updated_at: now,
        }
    }
}
