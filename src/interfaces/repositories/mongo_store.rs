use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson, Document as BsonDocument};
use futures::TryStreamExt;
use mongodb::{
    options::{FindOneAndUpdateOptions, FindOptions as MongoFindOptions, ReturnDocument},
    Client, Collection, Database,
};
use serde_json::Value;

use crate::{
    errors::StoreError,
    repositories::document_store::{
        Document, DocumentStore, Filter, FindOptions, SortOrder, StoredDocument, Update, ID_FIELD,
    },
};

/// MongoDB-backed [`DocumentStore`].
///
/// Built once at startup by `db::mongo::connect` and shut down on exit.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    pub fn new(client: Client, database_name: &str) -> Self {
        let database = client.database(database_name);
        MongoStore { client, database }
    }

    fn collection(&self, name: &str) -> Collection<BsonDocument> {
        self.database.collection::<BsonDocument>(name)
    }
}

fn to_bson(value: &Value) -> Result<Bson, StoreError> {
    bson::to_bson(value).map_err(|e| StoreError::Conversion(e.to_string()))
}

fn filter_document(filter: &Filter) -> Result<BsonDocument, StoreError> {
    Ok(match filter {
        Filter::Id(id) => doc! { "_id": *id },
        // Equality on an array field already matches any element.
        Filter::Eq(field, value) | Filter::Contains(field, value) => {
            let mut d = BsonDocument::new();
            d.insert(field.as_str(), to_bson(value)?);
            d
        }
        Filter::And(parts) if parts.is_empty() => BsonDocument::new(),
        Filter::And(parts) if parts.len() == 1 => filter_document(&parts[0])?,
        Filter::And(parts) => {
            let clauses = parts
                .iter()
                .map(|p| filter_document(p).map(Bson::Document))
                .collect::<Result<Vec<_>, _>>()?;
            doc! { "$and": clauses }
        }
    })
}

fn update_document(update: &Update) -> Result<BsonDocument, StoreError> {
    let mut out = BsonDocument::new();

    let mut set = BsonDocument::new();
    for (field, value) in update.set.iter().filter(|(f, _)| f.as_str() != ID_FIELD) {
        set.insert(field.as_str(), to_bson(value)?);
    }
    if !set.is_empty() {
        out.insert("$set", set);
    }

    if !update.inc.is_empty() {
        let inc: BsonDocument = update
            .inc
            .iter()
            .map(|(field, by)| (field.clone(), Bson::Int64(*by)))
            .collect();
        out.insert("$inc", inc);
    }

    if !update.add_to_set.is_empty() {
        let mut add = BsonDocument::new();
        for (field, value) in &update.add_to_set {
            add.insert(field.as_str(), to_bson(value)?);
        }
        out.insert("$addToSet", add);
    }

    Ok(out)
}

fn sort_document(sort: &[(String, SortOrder)]) -> BsonDocument {
    sort.iter()
        .map(|(field, order)| {
            let direction = match order {
                SortOrder::Asc => 1,
                SortOrder::Desc => -1,
            };
            (field.clone(), Bson::Int32(direction))
        })
        .collect()
}

fn to_stored(mut raw: BsonDocument) -> Result<StoredDocument, StoreError> {
    let id = raw
        .get_object_id(ID_FIELD)
        .map_err(|e| StoreError::Conversion(format!("missing object id: {}", e)))?;
    raw.remove(ID_FIELD);

    match Bson::Document(raw).into_relaxed_extjson() {
        Value::Object(fields) => Ok(StoredDocument { id, fields }),
        other => Err(StoreError::Conversion(format!("expected an object, got {}", other))),
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    async fn find(&self, collection: &str, filter: &Filter, options: &FindOptions) -> Result<Vec<StoredDocument>, StoreError> {
        let mut find_options = MongoFindOptions::default();
        if !options.sort.is_empty() {
            find_options.sort = Some(sort_document(&options.sort));
        }
        find_options.limit = options.limit.map(|l| l as i64);

        let mut cursor = self
            .collection(collection)
            .find(filter_document(filter)?)
            .with_options(find_options)
            .await?;

        let mut documents = Vec::new();
        while let Some(raw) = cursor.try_next().await? {
            documents.push(to_stored(raw)?);
        }
        Ok(documents)
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<StoredDocument>, StoreError> {
        self.collection(collection)
            .find_one(filter_document(filter)?)
            .await?
            .map(to_stored)
            .transpose()
    }

    async fn insert_one(&self, collection: &str, mut fields: Document) -> Result<ObjectId, StoreError> {
        fields.remove(ID_FIELD);
        let raw = bson::to_document(&fields).map_err(|e| StoreError::Conversion(e.to_string()))?;

        let result = self.collection(collection).insert_one(raw).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Conversion("inserted id is not an object id".into()))
    }

    async fn find_one_and_update(&self, collection: &str, filter: &Filter, update: &Update) -> Result<Option<StoredDocument>, StoreError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .upsert(update.upsert)
            .build();

        self.collection(collection)
            .find_one_and_update(filter_document(filter)?, update_document(update)?)
            .with_options(options)
            .await?
            .map(to_stored)
            .transpose()
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let result = self
            .collection(collection)
            .delete_one(filter_document(filter)?)
            .await?;
        Ok(result.deleted_count)
    }

    async fn distinct(&self, collection: &str, field: &str, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        let values = self
            .collection(collection)
            .distinct(field, filter_document(filter)?)
            .await?;
        Ok(values.into_iter().map(Bson::into_relaxed_extjson).collect())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        Ok(self
            .collection(collection)
            .count_documents(filter_document(filter)?)
            .await?)
    }

    async fn shutdown(&self) {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB client shut down");
    }
}
