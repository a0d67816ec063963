use crate::{
    entities::resource::Resource,
    repositories::document_store::SharedStore,
    use_cases::{blog::BlogPostHandler, resource::ResourceService, skill::SkillHandler},
};

/// Resource services over the one shared store handle.
///
/// Services hold no state besides the store, so each accessor hands out a fresh one.
#[derive(Clone)]
pub struct Services {
    pub store: SharedStore,
}

impl Services {
    pub fn new(store: SharedStore) -> Self {
        Services { store }
    }

    pub fn resource<R: Resource>(&self) -> ResourceService<SharedStore, R> {
        ResourceService::new(self.store.clone())
    }

    pub fn blogs(&self) -> BlogPostHandler<SharedStore> {
        BlogPostHandler::new(self.store.clone())
    }

    pub fn skills(&self) -> SkillHandler<SharedStore> {
        SkillHandler::new(self.store.clone())
    }
}
