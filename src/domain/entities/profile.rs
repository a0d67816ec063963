use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    entities::{
        option_fields::OptionField,
        resource::Resource,
        validators::{validate_optional_url_field, validate_url},
    },
    repositories::document_store::SortOrder,
    utils::timestamp,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_url"))]
    pub github: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_url"))]
    pub linkedin: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_url"))]
    pub twitter: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_url"))]
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub email: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProfile {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 150, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Bio is required"))]
    pub bio: String,

    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,

    pub location: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub avatar_url: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub resume_url: Option<String>,

    #[validate(nested)]
    pub social_links: Option<SocialLinks>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 150, message = "Title cannot be empty"))]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Bio cannot be empty"))]
    pub bio: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Must be a valid email address"))]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    pub location: OptionField<String>,

    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    #[validate(custom(function = "validate_optional_url_field"))]
    pub avatar_url: OptionField<String>,

    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    #[validate(custom(function = "validate_optional_url_field"))]
    pub resume_url: OptionField<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub social_links: Option<SocialLinks>,
}

impl Resource for Profile {
    const COLLECTION: &'static str = "profiles";
    const NAME: &'static str = "Profile";

    type Create = NewProfile;
    type Update = ProfileUpdate;

    fn sort() -> &'static [(&'static str, SortOrder)] {
        &[("createdAt", SortOrder::Desc)]
    }

    fn from_create(input: NewProfile, now: DateTime<Utc>) -> Self {
        Profile {
            name: input.name,
            title: input.title,
            bio: input.bio,
            email: input.email,
            location: input.location,
            avatar_url: input.avatar_url,
            resume_url: input.resume_url,
            social_links: input.social_links.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}
