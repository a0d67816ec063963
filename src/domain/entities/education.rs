use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    entities::{option_fields::OptionField, resource::Resource},
    repositories::document_store::SortOrder,
    utils::timestamp,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct NewEducation {
    #[validate(length(min = 1, max = 150, message = "Institution is required"))]
    pub institution: String,

    #[validate(length(min = 1, max = 120, message = "Degree is required"))]
    pub degree: String,

    #[validate(length(min = 1, max = 120, message = "Field of study is required"))]
    pub field_of_study: String,

    #[validate(required(message = "Start date is required"))]
    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,
    pub current: bool,

    #[validate(length(max = 50))]
    pub grade: Option<String>,

    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 150, message = "Institution cannot be empty"))]
    pub institution: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 120, message = "Degree cannot be empty"))]
    pub degree: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 120, message = "Field of study cannot be empty"))]
    pub field_of_study: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    pub end_date: OptionField<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<bool>,

    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    #[validate(length(max = 50))]
    pub grade: OptionField<String>,

    #[serde(skip_serializing_if = "OptionField::is_unchanged")]
    pub description: OptionField<String>,
}

impl Resource for Education {
    const COLLECTION: &'static str = "educations";
    const NAME: &'static str = "Education";

    type Create = NewEducation;
    type Update = EducationUpdate;

    fn sort() -> &'static [(&'static str, SortOrder)] {
        &[("startDate", SortOrder::Desc)]
    }

    fn from_create(input: NewEducation, now: DateTime<Utc>) -> Self {
        Education {
            institution: input.institution,
            degree: input.degree,
            field_of_study: input.field_of_study,
            start_date: input.start_date.unwrap_or_default(),
            end_date: input.end_date,
            current: input.current,
            grade: input.grade,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }
}
