use chrono::{DateTime, NaiveDate, Utc};
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
pub struct WorkExperience {
    pub company: String,
    pub position: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub company_url: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct NewWorkExperience {
    #[validate(length(min = 1, max = 120, message = "Company is required"))]
    pub company: String,

    #[validate(length(min = 1, max = 120, message = "Position is required"))]
    pub position: String,

    #[validate(required(message = "Start date is required"))]
    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    pub current: bool,

    #[validate(length(max = 120))]
    pub location: Option<String>,

    pub description: Option<String>,

    #[validate(custom(function = "validate_string_list"))]
    pub achievements: Vec<String>,

    #[validate(custom(function = "validate_string_list"))]
    pub technologies: Vec<String>,

    #[validate(custom(function = "validate_url"))]
    pub company_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperienceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 120, message = "Company cannot be empty"))]
    pub company: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 120, message = "Position cannot be empty"))]
    pub position: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    pub end_date: OptionField<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<bool>,

    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    #[validate(length(max = 120))]
    pub location: OptionField<String>,

    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    pub description: OptionField<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_string_list"))]
    pub achievements: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_string_list"))]
    pub technologies: Option<Vec<String>>,

    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    #[validate(custom(function = "validate_optional_url_field"))]
    pub company_url: OptionField<String>,
}

impl Resource for WorkExperience {
    const COLLECTION: &'static str = "experiences";
    const NAME: &'static str = "Experience";

    type Create = NewWorkExperience;
    type Update = WorkExperienceUpdate;

    fn sort() -> &'static [(&'static str, SortOrder)] {
        &[("startDate", SortOrder::Desc)]
    }

    fn from_create(input: NewWorkExperience, now: DateTime<Utc>) -> Self {
        WorkExperience {
            company: input.company,
            position: input.position,
            start_date: input.start_date.unwrap_or_default(),
            end_date: input.end_date,
            current: input.current,
            location: input.location,
            description: input.description,
            achievements: input.achievements,
            technologies: input.technologies,
            company_url: input.company_url,
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
    fn start_date_is_required() {
        let errors = NewWorkExperience::parse(json!({ "company": "Acme", "position": "Dev" }).into()).unwrap_err();
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["startDate"]);
    }

    #[test]
    fn dates_round_trip_as_plain_dates() {
        let input = NewWorkExperience::parse(
            json!({ "company": "Acme", "position": "Dev", "startDate": "2021-03-01", "endDate": null }).into(),
        )
        .unwrap();
        let record = WorkExperience::from_create(input, Utc::now());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["startDate"], "2021-03-01");
        assert_eq!(value["endDate"], serde_json::Value::Null);
    }
}
