use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use serde_json::{Map, Value};

use crate::errors::StoreError;

/// Field map of a stored document, without its `_id`.
pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: ObjectId,
    pub fields: Document,
}

/// Query predicates understood by every store. Field names are top-level keys.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Id(ObjectId),
    Eq(String, Value),
    /// Array field holds `value` among its elements.
    Contains(String, Value),
    And(Vec<Filter>),
}

impl Filter {
    pub fn all() -> Self {
        Filter::And(Vec::new())
    }

    pub fn id(id: ObjectId) -> Self {
        Filter::Id(id)
    }

    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Filter::Eq(field.to_string(), value.into())
    }

    pub fn contains(field: &str, value: impl Into<Value>) -> Self {
        Filter::Contains(field.to_string(), value.into())
    }

    pub fn and(self, other: Filter) -> Self {
        match self {
            Filter::And(mut parts) => {
                parts.push(other);
                Filter::And(parts)
            }
            first => Filter::And(vec![first, other]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub sort: Vec<(String, SortOrder)>,
    pub limit: Option<u64>,
}

impl FindOptions {
    pub fn sorted_by(sort: &[(&str, SortOrder)]) -> Self {
        FindOptions {
            sort: sort.iter().map(|(f, o)| (f.to_string(), *o)).collect(),
            limit: None,
        }
    }

    pub fn limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }
}

/// A single-document atomic modification: `$set`, `$inc` and `$addToSet`.
#[derive(Debug, Clone, Default)]
pub struct Update {
    pub set: Document,
    pub inc: Vec<(String, i64)>,
    pub add_to_set: Vec<(String, Value)>,
    /// Create the document from the filter's equality fields when nothing matches.
    pub upsert: bool,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.set.insert(field.to_string(), value.into());
        self
    }

    pub fn set_all(mut self, fields: Document) -> Self {
        self.set.extend(fields);
        self
    }

    pub fn inc(mut self, field: &str, by: i64) -> Self {
        self.inc.push((field.to_string(), by));
        self
    }

    pub fn add_to_set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.add_to_set.push((field.to_string(), value.into()));
        self
    }

    pub fn upsert(mut self) -> Self {
        self.upsert = true;
        self
    }
}

/// The document store every service talks to.
///
/// Each call is one round-trip; `find_one_and_update` is atomic for the
/// single document it touches.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn find(&self, collection: &str, filter: &Filter, options: &FindOptions) -> Result<Vec<StoredDocument>, StoreError>;

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<StoredDocument>, StoreError>;

    async fn insert_one(&self, collection: &str, fields: Document) -> Result<ObjectId, StoreError>;

    /// Applies `update` to the first match and returns the document as it is afterwards.
    async fn find_one_and_update(&self, collection: &str, filter: &Filter, update: &Update) -> Result<Option<StoredDocument>, StoreError>;

    /// Returns the number of deleted documents (0 or 1).
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;

    /// Distinct values of `field`, array fields contributing each element.
    async fn distinct(&self, collection: &str, field: &str, filter: &Filter) -> Result<Vec<Value>, StoreError>;

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;

    /// Releases connections. The store must not be used afterwards.
    async fn shutdown(&self) {}
}

pub type SharedStore = Arc<dyn DocumentStore>;

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn ping(&self) -> Result<(), StoreError> {
        (**self).ping().await
    }

    async fn find(&self, collection: &str, filter: &Filter, options: &FindOptions) -> Result<Vec<StoredDocument>, StoreError> {
        (**self).find(collection, filter, options).await
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<StoredDocument>, StoreError> {
        (**self).find_one(collection, filter).await
    }

    async fn insert_one(&self, collection: &str, fields: Document) -> Result<ObjectId, StoreError> {
        (**self).insert_one(collection, fields).await
    }

    async fn find_one_and_update(&self, collection: &str, filter: &Filter, update: &Update) -> Result<Option<StoredDocument>, StoreError> {
        (**self).find_one_and_update(collection, filter, update).await
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        (**self).delete_one(collection, filter).await
    }

    async fn distinct(&self, collection: &str, field: &str, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        (**self).distinct(collection, field, filter).await
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        (**self).count(collection, filter).await
    }

    async fn shutdown(&self) {
        (**self).shutdown().await
    }
}
