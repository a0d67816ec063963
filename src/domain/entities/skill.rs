use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{entities::validators::validate_string_list, utils::timestamp};

pub const SKILLS_COLLECTION: &str = "skills";
/// The single skills document is addressed by this `key` value.
pub const SKILLS_KEY: &str = "skills";
const MAX_SKILLS: u64 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSet {
    pub key: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Replacement list for `PUT /api/skills`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SkillsInput {
    #[validate(length(max = MAX_SKILLS, message = "Too many skills"), custom(function = "validate_string_list"))]
    pub skills: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::Schema;
    use serde_json::json;

    #[test]
    fn blank_skills_are_rejected() {
        let errors = SkillsInput::parse(json!({ "skills": ["Rust", " "] }).into()).unwrap_err();
        assert!(errors.contains_key("skills"));
        assert!(SkillsInput::parse(json!({ "skills": [] }).into()).is_ok());
    }
}
