use crate::{
    entities::skill::{SkillSet, SKILLS_COLLECTION, SKILLS_KEY},
    errors::AppError,
    repositories::document_store::{DocumentStore, Filter, Update},
    utils::timestamp,
};

/// The skills list lives in one document, replaced wholesale.
pub struct SkillHandler<S>
where
    S: DocumentStore,
{
    pub store: S,
}

impl<S> SkillHandler<S>
where
    S: DocumentStore,
{
    pub fn new(store: S) -> Self {
        SkillHandler { store }
    }

    fn key_filter() -> Filter {
        Filter::eq("key", SKILLS_KEY)
    }

    /// The current list, or `[]` before the first save.
    pub async fn get_skills_list(&self) -> Result<Vec<String>, AppError> {
        let doc = self.store.find_one(SKILLS_COLLECTION, &Self::key_filter()).await?;
        match doc {
            Some(doc) => {
                let set: SkillSet = serde_json::from_value(serde_json::Value::Object(doc.fields))?;
                Ok(set.skills)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Replaces the whole list in one upsert and returns what was stored.
    pub async fn update_many(&self, skills: Vec<String>) -> Result<Vec<String>, AppError> {
        let update = Update::new()
            .set("skills", skills)
            .set("updatedAt", timestamp::format(&timestamp::now()))
            .upsert();

        let stored = self
            .store
            .find_one_and_update(SKILLS_COLLECTION, &Self::key_filter(), &update)
            .await?
            .ok_or_else(|| AppError::InternalError("skills upsert returned no document".into()))?;

        let set: SkillSet = serde_json::from_value(serde_json::Value::Object(stored.fields))?;
        tracing::info!(count = set.skills.len(), "Skills replaced");
        Ok(set.skills)
    }
}
