use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::{
    errors::{AppError, StoreError},
    repositories::document_store::{Document, SortOrder, StoredDocument},
};

/// A document type managed by the generic resource service.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;
    /// Human name used in error messages ("Project not found").
    const NAME: &'static str;

    type Create: DeserializeOwned + Validate + Send + 'static;
    type Update: DeserializeOwned + Validate + Serialize + Send + 'static;

    /// List order for `get_all`.
    fn sort() -> &'static [(&'static str, SortOrder)];

    fn from_create(input: Self::Create, now: DateTime<Utc>) -> Self;
}

/// A stored document as it leaves the service layer: string `_id` plus its fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity<T> {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub record: T,
}

impl<T: DeserializeOwned> TryFrom<StoredDocument> for Entity<T> {
    type Error = AppError;

    fn try_from(doc: StoredDocument) -> Result<Self, Self::Error> {
        let record = serde_json::from_value(Value::Object(doc.fields))
            .map_err(|e| StoreError::Conversion(e.to_string()))?;
        Ok(Entity { id: doc.id.to_hex(), record })
    }
}

/// Serializes a record into store fields.
pub fn to_document<T: Serialize>(record: &T) -> Result<Document, AppError> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields),
        other => Err(AppError::InternalError(format!("expected an object, got {}", other))),
    }
}

/// Answer of a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deleted {
    #[serde(rename = "_id")]
    pub id: String,
    pub deleted: bool,
}

impl Deleted {
    pub fn new(id: impl Into<String>) -> Self {
        Deleted { id: id.into(), deleted: true }
    }
}
