use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    entities::{
        option_fields::OptionField,
        resource::Resource,
        validators::{validate_optional_url_field, validate_string_list, validate_url},
    },
    repositories::document_store::SortOrder,
    utils::timestamp,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProject {
    #[validate(length(min = 1, max = 120, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(
        length(min = 1, message = "At least one technology is required"),
        custom(function = "validate_string_list")
    )]
    pub technologies: Vec<String>,

    #[validate(custom(function = "validate_url"))]
    pub github_url: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub live_url: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub image_url: Option<String>,

    pub featured: bool,

    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 120, message = "Title cannot be empty"))]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 1, message = "At least one technology is required"),
        custom(function = "validate_string_list")
    )]
    pub technologies: Option<Vec<String>>,

    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    #[validate(custom(function = "validate_optional_url_field"))]
    pub github_url: OptionField<String>,

    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    #[validate(custom(function = "validate_optional_url_field"))]
    pub live_url: OptionField<String>,

    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    #[validate(custom(function = "validate_optional_url_field"))]
    pub image_url: OptionField<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,

    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    pub content: OptionField<String>,
}

/// Query string of the project list.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    pub featured: Option<bool>,
}

impl Resource for Project {
    const COLLECTION: &'static str = "projects";
    const NAME: &'static str = "Project";

    type Create = NewProject;
    type Update = ProjectUpdate;

    fn sort() -> &'static [(&'static str, SortOrder)] {
        &[("createdAt", SortOrder::Desc)]
    }

    fn from_create(input: NewProject, now: DateTime<Utc>) -> Self {
        Project {
            title: input.title,
            description: input.description,
            technologies: input.technologies,
            github_url: input.github_url,
            live_url: input.live_url,
            image_url: input.image_url,
            featured: input.featured,
            content: input.content,
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

    #[test]
    fn needs_at_least_one_technology() {
        let errors = NewProject::parse(json!({ "title": "CMS", "description": "d", "technologies": [] }).into()).unwrap_err();
        assert_eq!(errors["technologies"], vec!["At least one technology is required".to_string()]);
    }

    #[test]
    fn clearing_a_link_sends_null() {
        let patch = ProjectUpdate::parse(json!({ "liveUrl": null, "featured": true }).into()).unwrap();
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "liveUrl": null, "featured": true }));
    }
}
