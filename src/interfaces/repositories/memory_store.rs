use std::{cmp::Ordering, collections::HashMap};

use async_trait::async_trait;
use bson::oid::ObjectId;
use parking_lot::RwLock;
use serde_json::{Number, Value};

use crate::{
    errors::StoreError,
    repositories::document_store::{
        Document, DocumentStore, Filter, FindOptions, SortOrder, StoredDocument, Update, ID_FIELD,
    },
};

/// Process-local document store with the same query semantics as the MongoDB one.
///
/// A single lock guards all collections, which makes every call atomic.
/// Used by tests and by `memory://` database URLs.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find(&self, collection: &str, filter: &Filter, options: &FindOptions) -> Result<Vec<StoredDocument>, StoreError> {
        let collections = self.collections.read();
        let mut found: Vec<StoredDocument> = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matches(d, filter)).cloned().collect())
            .unwrap_or_default();

        if !options.sort.is_empty() {
            found.sort_by(|a, b| {
                for (field, order) in &options.sort {
                    let ordering = compare_values(field_of(a, field), field_of(b, field));
                    let ordering = match order {
                        SortOrder::Asc => ordering,
                        SortOrder::Desc => ordering.reverse(),
                    };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                Ordering::Equal
            });
        }

        if let Some(limit) = options.limit {
            found.truncate(limit as usize);
        }
        Ok(found)
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<StoredDocument>, StoreError> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| matches(d, filter)).cloned()))
    }

    async fn insert_one(&self, collection: &str, mut fields: Document) -> Result<ObjectId, StoreError> {
        fields.remove(ID_FIELD);
        let id = ObjectId::new();
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument { id, fields });
        Ok(id)
    }

    async fn find_one_and_update(&self, collection: &str, filter: &Filter, update: &Update) -> Result<Option<StoredDocument>, StoreError> {
        let mut collections = self.collections.write();
        let docs = collections.entry(collection.to_string()).or_default();

        if let Some(doc) = docs.iter_mut().find(|d| matches(d, filter)) {
            let mut staged = doc.fields.clone();
            apply_update(&mut staged, update)?;
            doc.fields = staged;
            return Ok(Some(doc.clone()));
        }

        if !update.upsert {
            return Ok(None);
        }

        let mut fields = Document::new();
        seed_from_filter(filter, &mut fields);
        apply_update(&mut fields, update)?;
        let doc = StoredDocument { id: ObjectId::new(), fields };
        docs.push(doc.clone());
        Ok(Some(doc))
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let mut collections = self.collections.write();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        match docs.iter().position(|d| matches(d, filter)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn distinct(&self, collection: &str, field: &str, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read();
        let mut values: Vec<Value> = Vec::new();
        for doc in collections.get(collection).into_iter().flatten().filter(|d| matches(d, filter)) {
            let candidates = match doc.fields.get(field) {
                Some(Value::Array(items)) => items.clone(),
                Some(Value::Null) | None => Vec::new(),
                Some(other) => vec![other.clone()],
            };
            for value in candidates {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
        }
        Ok(values)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matches(d, filter)).count() as u64)
            .unwrap_or(0))
    }
}

fn field_of<'a>(doc: &'a StoredDocument, field: &str) -> Option<&'a Value> {
    doc.fields.get(field)
}

fn matches(doc: &StoredDocument, filter: &Filter) -> bool {
    match filter {
        Filter::Id(id) => doc.id == *id,
        Filter::Eq(field, expected) => match doc.fields.get(field) {
            Some(Value::Array(items)) if !expected.is_array() => items.contains(expected),
            Some(actual) => actual == expected,
            None => expected.is_null(),
        },
        Filter::Contains(field, expected) => match doc.fields.get(field) {
            Some(Value::Array(items)) => items.contains(expected),
            Some(actual) => actual == expected,
            None => false,
        },
        Filter::And(parts) => parts.iter().all(|part| matches(doc, part)),
    }
}

fn seed_from_filter(filter: &Filter, fields: &mut Document) {
    match filter {
        Filter::Eq(field, value) => {
            fields.insert(field.clone(), value.clone());
        }
        Filter::And(parts) => parts.iter().for_each(|part| seed_from_filter(part, fields)),
        Filter::Id(_) | Filter::Contains(_, _) => {}
    }
}

/// Mutates `fields` in place; callers pass a copy and keep it only on success.
fn apply_update(fields: &mut Document, update: &Update) -> Result<(), StoreError> {
    for (field, value) in &update.set {
        if field != ID_FIELD {
            fields.insert(field.clone(), value.clone());
        }
    }

    for (field, by) in &update.inc {
        let next = match fields.get(field) {
            None | Some(Value::Null) => Value::from(*by),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(current) => Value::from(current + by),
                None => n
                    .as_f64()
                    .and_then(|current| Number::from_f64(current + *by as f64))
                    .map(Value::Number)
                    .ok_or_else(|| StoreError::Query(format!("Cannot increment field '{}'", field)))?,
            },
            Some(_) => return Err(StoreError::Query(format!("Cannot increment non-numeric field '{}'", field))),
        };
        fields.insert(field.clone(), next);
    }

    for (field, value) in &update.add_to_set {
        match fields.get_mut(field) {
            Some(Value::Array(items)) => {
                if !items.contains(value) {
                    items.push(value.clone());
                }
            }
            None | Some(Value::Null) => {
                fields.insert(field.clone(), Value::Array(vec![value.clone()]));
            }
            Some(_) => return Err(StoreError::Query(format!("Cannot add to non-array field '{}'", field))),
        }
    }
    Ok(())
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

/// Cross-type ordering roughly following MongoDB's BSON comparison order.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn insert_strips_client_ids_and_find_one_by_id_works() {
        let store = MemoryStore::new();
        let id = store
            .insert_one("blogs", doc(json!({ "_id": "forged", "title": "T" })))
            .await
            .unwrap();

        let found = store.find_one("blogs", &Filter::id(id)).await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert!(!found.fields.contains_key("_id"));
    }

    #[tokio::test]
    async fn find_sorts_filters_and_limits() {
        let store = MemoryStore::new();
        for (title, date, tags) in [("a", "2024-01-01", json!(["rust"])), ("b", "2024-03-01", json!(["go"])), ("c", "2024-02-01", json!(["rust", "go"]))] {
            store
                .insert_one("blogs", doc(json!({ "title": title, "createdAt": date, "tags": tags })))
                .await
                .unwrap();
        }

        let rust = store
            .find("blogs", &Filter::eq("tags", "rust"), &FindOptions::sorted_by(&[("createdAt", SortOrder::Desc)]))
            .await
            .unwrap();
        let titles: Vec<_> = rust.iter().map(|d| d.fields["title"].as_str().unwrap()).collect();
        assert_eq!(titles, vec!["c", "a"]);

        let newest = store
            .find("blogs", &Filter::all(), &FindOptions::sorted_by(&[("createdAt", SortOrder::Desc)]).limit(Some(1)))
            .await
            .unwrap();
        assert_eq!(newest[0].fields["title"], "b");
    }

    #[tokio::test]
    async fn update_increments_and_adds_to_set_once() {
        let store = MemoryStore::new();
        let id = store.insert_one("blogs", doc(json!({ "likes": 0, "likedBy": [] }))).await.unwrap();
        let like = Update::new().inc("likes", 1).add_to_set("likedBy", "ip-1");

        store.find_one_and_update("blogs", &Filter::id(id), &like).await.unwrap();
        let after = store.find_one_and_update("blogs", &Filter::id(id), &like).await.unwrap().unwrap();

        assert_eq!(after.fields["likes"], 2);
        assert_eq!(after.fields["likedBy"], json!(["ip-1"]));
    }

    #[tokio::test]
    async fn update_without_match_returns_none_unless_upserting() {
        let store = MemoryStore::new();
        let filter = Filter::eq("key", "skills");

        let missing = store
            .find_one_and_update("skills", &filter, &Update::new().set("skills", json!(["Go"])))
            .await
            .unwrap();
        assert!(missing.is_none());

        let created = store
            .find_one_and_update("skills", &filter, &Update::new().set("skills", json!(["Go"])).upsert())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.fields["key"], "skills");
        assert_eq!(store.count("skills", &Filter::all()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn failed_update_leaves_the_document_untouched() {
        let store = MemoryStore::new();
        let id = store.insert_one("blogs", doc(json!({ "title": "old", "likes": "oops" }))).await.unwrap();

        let result = store
            .find_one_and_update("blogs", &Filter::id(id), &Update::new().set("title", "new").inc("likes", 1))
            .await;
        assert!(result.is_err());

        let stored = store.find_one("blogs", &Filter::id(id)).await.unwrap().unwrap();
        assert_eq!(stored.fields["title"], "old");
        assert_eq!(stored.fields["likes"], "oops");

        let upsert = Update::new().set("title", "seeded").inc("likes", 1).upsert();
        assert!(store.find_one_and_update("blogs", &Filter::eq("likes", "x"), &upsert).await.is_err());
        assert_eq!(store.count("blogs", &Filter::all()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn set_never_overwrites_the_id() {
        let store = MemoryStore::new();
        let id = store.insert_one("projects", doc(json!({ "title": "old" }))).await.unwrap();

        let updated = store
            .find_one_and_update("projects", &Filter::id(id), &Update::new().set("_id", "other").set("title", "new"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, id);
        assert!(!updated.fields.contains_key("_id"));
        assert_eq!(updated.fields["title"], "new");
    }

    #[tokio::test]
    async fn delete_and_distinct() {
        let store = MemoryStore::new();
        let id = store.insert_one("blogs", doc(json!({ "tags": ["rust", "web"] }))).await.unwrap();
        store.insert_one("blogs", doc(json!({ "tags": ["web"] }))).await.unwrap();

        let tags = store.distinct("blogs", "tags", &Filter::all()).await.unwrap();
        assert_eq!(tags, vec![json!("rust"), json!("web")]);

        assert_eq!(store.delete_one("blogs", &Filter::id(id)).await.unwrap(), 1);
        assert_eq!(store.delete_one("blogs", &Filter::id(id)).await.unwrap(), 0);
    }
}
