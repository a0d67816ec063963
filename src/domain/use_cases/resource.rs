use std::marker::PhantomData;

use serde_json::Value;

use crate::{
    entities::resource::{to_document, Deleted, Entity, Resource},
    errors::AppError,
    repositories::document_store::{DocumentStore, Filter, FindOptions, StoredDocument, Update, ID_FIELD},
    utils::{timestamp, valid_id::valid_id},
};

/// CRUD over one collection. Each operation is a single store call.
pub struct ResourceService<S, R>
where
    S: DocumentStore,
    R: Resource,
{
    pub store: S,
    resource: PhantomData<fn() -> R>,
}

impl<S: DocumentStore + Clone, R: Resource> Clone for ResourceService<S, R> {
    fn clone(&self) -> Self {
        ResourceService::new(self.store.clone())
    }
}

impl<S, R> ResourceService<S, R>
where
    S: DocumentStore,
    R: Resource,
{
    pub fn new(store: S) -> Self {
        ResourceService { store, resource: PhantomData }
    }

    fn not_found() -> AppError {
        AppError::NotFound(format!("{} not found", R::NAME))
    }

    /// Matching documents in the resource's list order. Empty when nothing matches.
    pub async fn get_all(&self, filter: Filter, limit: Option<u64>) -> Result<Vec<Entity<R>>, AppError> {
        let options = FindOptions::sorted_by(R::sort()).limit(limit);
        self.store
            .find(R::COLLECTION, &filter, &options)
            .await?
            .into_iter()
            .map(Entity::try_from)
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Entity<R>, AppError> {
        let oid = valid_id(id)?;
        self.find_one(Filter::id(oid)).await?.ok_or_else(Self::not_found)
    }

    pub async fn find_one(&self, filter: Filter) -> Result<Option<Entity<R>>, AppError> {
        self.store
            .find_one(R::COLLECTION, &filter)
            .await?
            .map(Entity::try_from)
            .transpose()
    }

    pub async fn exists(&self, filter: Filter) -> Result<bool, AppError> {
        Ok(self.store.count(R::COLLECTION, &filter).await? > 0)
    }

    pub async fn create(&self, input: R::Create) -> Result<Entity<R>, AppError> {
        self.insert(R::from_create(input, timestamp::now())).await
    }

    /// Persists an already built record and returns it with its new id.
    pub async fn insert(&self, record: R) -> Result<Entity<R>, AppError> {
        let id = self.store.insert_one(R::COLLECTION, to_document(&record)?).await?;
        tracing::debug!(collection = R::COLLECTION, id = %id, "Document created");
        Ok(Entity { id: id.to_hex(), record })
    }

    /// Merges the sent fields into the document and refreshes `updatedAt`.
    pub async fn update(&self, id: &str, patch: &R::Update) -> Result<Entity<R>, AppError> {
        let mut fields = to_document(patch)?;
        fields.remove(ID_FIELD);
        self.update_with(id, Update::new().set_all(fields)).await
    }

    /// Applies a prepared update to the document `id`, stamping `updatedAt`.
    pub async fn update_with(&self, id: &str, update: Update) -> Result<Entity<R>, AppError> {
        let oid = valid_id(id)?;
        let update = update.set("updatedAt", Value::String(timestamp::format(&timestamp::now())));

        let updated: Option<StoredDocument> = self
            .store
            .find_one_and_update(R::COLLECTION, &Filter::id(oid), &update)
            .await?;
        updated.map(Entity::try_from).transpose()?.ok_or_else(Self::not_found)
    }

    /// Hard delete.
    pub async fn delete(&self, id: &str) -> Result<Deleted, AppError> {
        let oid = valid_id(id)?;
        match self.store.delete_one(R::COLLECTION, &Filter::id(oid)).await? {
            0 => Err(Self::not_found()),
            _ => {
                tracing::debug!(collection = R::COLLECTION, id, "Document deleted");
                Ok(Deleted::new(oid.to_hex()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::validation::Schema,
        entities::project::{NewProject, Project, ProjectUpdate},
        repositories::memory_store::MemoryStore,
    };
    use serde_json::json;
    use std::sync::Arc;

    fn service() -> ResourceService<Arc<MemoryStore>, Project> {
        ResourceService::new(Arc::new(MemoryStore::new()))
    }

    fn project(title: &str) -> NewProject {
        NewProject::parse(json!({ "title": title, "description": "d", "technologies": ["Rust"] }).into()).unwrap()
    }

    #[tokio::test]
    async fn malformed_ids_are_bad_requests_and_unknown_ids_not_found() {
        let svc = service();
        let patch = ProjectUpdate::default();

        assert_eq!(svc.get_by_id("xyz").await.unwrap_err().code(), "BAD_REQUEST");
        assert_eq!(svc.update("xyz", &patch).await.unwrap_err().code(), "BAD_REQUEST");
        assert_eq!(svc.delete("xyz").await.unwrap_err().code(), "BAD_REQUEST");

        let unknown = bson::oid::ObjectId::new().to_hex();
        assert_eq!(svc.get_by_id(&unknown).await.unwrap_err().code(), "NOT_FOUND");
        assert_eq!(svc.update(&unknown, &patch).await.unwrap_err().code(), "NOT_FOUND");
        assert_eq!(svc.delete(&unknown).await.unwrap_err().code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn partial_update_keeps_identity_and_untouched_fields() {
        let svc = service();
        let created = svc.create(project("Old")).await.unwrap();

        let patch = ProjectUpdate::parse(json!({ "_id": "aaaaaaaaaaaaaaaaaaaaaaaa", "title": "New" }).into()).unwrap();
        let updated = svc.update(&created.id, &patch).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.record.title, "New");
        assert_eq!(updated.record.technologies, vec!["Rust".to_string()]);
        assert!(updated.record.updated_at >= created.record.updated_at);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let svc = service();
        svc.create(project("First")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        svc.create(project("Second")).await.unwrap();

        let titles: Vec<_> = svc
            .get_all(Filter::all(), None)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.record.title)
            .collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn delete_reports_the_removed_id() {
        let svc = service();
        let created = svc.create(project("Gone")).await.unwrap();

        let deleted = svc.delete(&created.id).await.unwrap();
        assert_eq!(deleted, Deleted::new(created.id.clone()));
        assert_eq!(svc.get_by_id(&created.id).await.unwrap_err().code(), "NOT_FOUND");
    }
}
