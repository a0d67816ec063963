use crate::{
    domain::validation::{NoInput, Payload},
    entities::{
        blog_post::{BlogPost, BlogPostUpdate, NewBlogPost},
        identity::CallContext,
        resource::{Deleted, Entity, Resource},
        skill::SkillsInput,
    },
    envelope::Envelope,
    services::Services,
    use_cases::gate::Gate,
};

/// The gated operation set: every mutation goes through `gate` before touching a service.
///
/// HTTP routes hold one built on the token resolver; in-process callers hold one
/// built on the session resolver. Both answer with the same envelopes.
#[derive(Clone)]
pub struct Actions {
    gate: Gate,
    services: Services,
}

impl Actions {
    pub fn new(gate: Gate, services: Services) -> Self {
        Actions { gate, services }
    }

    pub async fn create<R: Resource>(&self, ctx: &CallContext, payload: Payload) -> Envelope<Entity<R>> {
        let service = self.services.resource::<R>();
        self.gate
            .run_protected(ctx, payload, move |input: R::Create, _| async move { service.create(input).await })
            .await
    }

    pub async fn update<R: Resource>(&self, ctx: &CallContext, id: &str, payload: Payload) -> Envelope<Entity<R>> {
        let service = self.services.resource::<R>();
        self.gate
            .run_protected(ctx, payload, move |patch: R::Update, _| async move { service.update(id, &patch).await })
            .await
    }

    pub async fn delete<R: Resource>(&self, ctx: &CallContext, id: &str) -> Envelope<Deleted> {
        let service = self.services.resource::<R>();
        self.gate
            .run_protected(ctx, Payload::empty(), move |_: NoInput, _| async move { service.delete(id).await })
            .await
    }

    pub async fn create_blog(&self, ctx: &CallContext, payload: Payload) -> Envelope<Entity<BlogPost>> {
        let blogs = self.services.blogs();
        self.gate
            .run_protected(ctx, payload, move |input: NewBlogPost, who| async move {
                tracing::debug!(by = %who.user_id, "Creating blog post");
                blogs.create_blog_post(input).await
            })
            .await
    }

    pub async fn update_blog(&self, ctx: &CallContext, id: &str, payload: Payload) -> Envelope<Entity<BlogPost>> {
        let blogs = self.services.blogs();
        self.gate
            .run_protected(ctx, payload, move |patch: BlogPostUpdate, _| async move {
                blogs.update_blog_post(id, &patch).await
            })
            .await
    }

    pub async fn publish_blog(&self, ctx: &CallContext, id: &str) -> Envelope<Entity<BlogPost>> {
        let blogs = self.services.blogs();
        self.gate
            .run_protected(ctx, Payload::empty(), move |_: NoInput, _| async move { blogs.publish_blog_post(id).await })
            .await
    }

    pub async fn delete_blog(&self, ctx: &CallContext, id: &str) -> Envelope<Deleted> {
        let blogs = self.services.blogs();
        self.gate
            .run_protected(ctx, Payload::empty(), move |_: NoInput, _| async move { blogs.delete_blog_post(id).await })
            .await
    }

    /// Replaces the skills list.
    pub async fn update_skills(&self, ctx: &CallContext, payload: Payload) -> Envelope<Vec<String>> {
        let skills = self.services.skills();
        self.gate
            .run_protected(ctx, payload, move |input: SkillsInput, _| async move {
                skills.update_many(input.skills).await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, time::Duration};

    use serde_json::json;

    use crate::{
        auth::identity::SessionIdentityResolver,
        entities::{identity::Identity, project::Project},
        repositories::{
            document_store::{DocumentStore, Filter},
            memory_store::MemoryStore,
            session_store::{MemorySessionStore, SessionStore},
        },
    };

    struct Fixture {
        actions: Actions,
        store: Arc<MemoryStore>,
        session_id: String,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let sessions = Arc::new(MemorySessionStore::new());
        let admin = Identity { user_id: "admin".into(), email: "admin@example.com".into() };
        let session_id = sessions.create(&admin, Duration::from_secs(60)).await.unwrap();

        let gate = Gate::new(Arc::new(SessionIdentityResolver::new(sessions)));
        let actions = Actions::new(gate, Services::new(store.clone()));
        Fixture { actions, store, session_id }
    }

    #[tokio::test]
    async fn anonymous_actions_touch_nothing() {
        let f = fixture().await;

        let envelope = f.actions.create_blog(&CallContext::anonymous(), json!({}).into()).await;
        assert_eq!(envelope.error().map(|e| e.code()), Some("UNAUTHORIZED"));

        let envelope = f.actions.delete::<Project>(&CallContext::anonymous(), "not-an-id").await;
        assert_eq!(envelope.error().map(|e| e.code()), Some("UNAUTHORIZED"));
        assert_eq!(f.store.count("blogs", &Filter::all()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn session_callers_run_the_full_lifecycle() {
        let f = fixture().await;
        let ctx = CallContext::with_session(f.session_id.clone());

        let created = f
            .actions
            .create::<Project>(&ctx, json!({ "title": "CMS", "description": "d", "technologies": ["Rust"] }).into())
            .await
            .into_result()
            .unwrap();

        let updated = f
            .actions
            .update::<Project>(&ctx, &created.id, json!({ "featured": true }).into())
            .await
            .into_result()
            .unwrap();
        assert!(updated.record.featured);

        let deleted = f.actions.delete::<Project>(&ctx, &created.id).await.into_result().unwrap();
        assert!(deleted.deleted);

        let again = f.actions.delete::<Project>(&ctx, &created.id).await;
        assert_eq!(again.error().map(|e| e.code()), Some("NOT_FOUND"));
    }

    #[tokio::test]
    async fn blog_and_skills_actions_share_the_envelope() {
        let f = fixture().await;
        let ctx = CallContext::with_session(f.session_id.clone());

        let invalid = f.actions.create_blog(&ctx, json!({ "title": "Hi there" }).into()).await;
        assert_eq!(invalid.error().map(|e| e.code()), Some("VALIDATION_ERROR"));

        let post = f
            .actions
            .create_blog(&ctx, json!({ "title": "Hi there", "excerpt": "e", "content": "c" }).into())
            .await
            .into_result()
            .unwrap();
        let published = f.actions.publish_blog(&ctx, &post.id).await.into_result().unwrap();
        assert_eq!(published.record.version, 2);

        let skills = f.actions.update_skills(&ctx, json!({ "skills": ["Rust", "Go"] }).into()).await;
        assert_eq!(skills.into_result().unwrap(), vec!["Rust".to_string(), "Go".to_string()]);
    }
}
