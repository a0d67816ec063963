use serde_json::Value;

use crate::{
    entities::{
        blog_post::{BlogPost, BlogPostUpdate, BlogPostView, BlogQuery, BlogStatus, NewBlogPost},
        resource::{to_document, Deleted, Entity, Resource},
        validators::validate_slug,
    },
    errors::{field_errors_from_single, AppError},
    repositories::document_store::{DocumentStore, Filter, Update, ID_FIELD},
    use_cases::resource::ResourceService,
    utils::{markdown::{reading_time_minutes, safe_markdown_to_html}, timestamp, valid_id::valid_id},
};

pub struct BlogPostHandler<S>
where
    S: DocumentStore,
{
    pub posts: ResourceService<S, BlogPost>,
}

impl<S> BlogPostHandler<S>
where
    S: DocumentStore,
{
    pub fn new(store: S) -> Self {
        BlogPostHandler { posts: ResourceService::new(store) }
    }

    fn store(&self) -> &S {
        &self.posts.store
    }

    /// Creates a post after checking its slug is free. Nothing is inserted on conflict.
    pub async fn create_blog_post(&self, input: NewBlogPost) -> Result<Entity<BlogPost>, AppError> {
        let post = BlogPost::from_create(input, timestamp::now());
        validate_slug(&post.slug).map_err(|e| field_errors_from_single("slug", e))?;

        if self.posts.exists(Filter::eq("slug", post.slug.as_str())).await? {
            return Err(AppError::BadRequest("A blog with this slug already exists".to_string()));
        }

        let created = self.posts.insert(post).await?;
        tracing::info!(id = %created.id, slug = %created.record.slug, "Blog post created");
        Ok(created)
    }

    /// Lists posts newest first, narrowed by status, tag and difficulty.
    pub async fn get_all_blog_posts(&self, query: &BlogQuery) -> Result<Vec<Entity<BlogPost>>, AppError> {
        let mut filter = Filter::all();
        if let Some(status) = query.status {
            filter = filter.and(Filter::eq("status", status.as_str()));
        }
        if let Some(tag) = &query.tag {
            filter = filter.and(Filter::contains("tags", tag.as_str()));
        }
        if let Some(difficulty) = query.difficulty {
            filter = filter.and(Filter::eq("difficulty", difficulty.as_str()));
        }
        self.posts.get_all(filter, query.limit).await
    }

    pub async fn get_blog_post_by_id(&self, id: &str) -> Result<Entity<BlogPost>, AppError> {
        self.posts.get_by_id(id).await
    }

    /// The post with `slug`, its markdown rendered to sanitized HTML.
    pub async fn get_blog_post_by_slug(&self, slug: &str) -> Result<BlogPostView, AppError> {
        let post = self
            .posts
            .find_one(Filter::eq("slug", slug))
            .await?
            .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))?;

        let content_html = safe_markdown_to_html(&post.record.content);
        Ok(BlogPostView { post, content_html })
    }

    /// Distinct tags across all posts, sorted.
    pub async fn get_tags(&self) -> Result<Vec<String>, AppError> {
        let mut tags: Vec<String> = self
            .store()
            .distinct(BlogPost::COLLECTION, "tags", &Filter::all())
            .await?
            .into_iter()
            .filter_map(|tag| match tag {
                Value::String(tag) => Some(tag),
                _ => None,
            })
            .collect();
        tags.sort();
        tags.dedup();
        Ok(tags)
    }

    /// Merges the patch, bumps `version` and keeps `readingTime` in step with the content.
    pub async fn update_blog_post(&self, id: &str, patch: &BlogPostUpdate) -> Result<Entity<BlogPost>, AppError> {
        let existing = self.posts.get_by_id(id).await?;

        if let Some(slug) = patch.slug.as_deref().filter(|s| *s != existing.record.slug) {
            if self.posts.exists(Filter::eq("slug", slug)).await? {
                return Err(AppError::BadRequest("A blog with this slug already exists".to_string()));
            }
        }

        let mut fields = to_document(patch)?;
        fields.remove(ID_FIELD);
        if let Some(content) = &patch.content {
            fields.insert("readingTime".into(), reading_time_minutes(content).into());
        }
        if patch.status == Some(BlogStatus::Published) && existing.record.published_at.is_none() {
            fields.insert("publishedAt".into(), timestamp::format(&timestamp::now()).into());
        }

        self.posts.update_with(id, Update::new().set_all(fields).inc("version", 1)).await
    }

    /// Marks the post published, stamping `publishedAt` the first time only.
    pub async fn publish_blog_post(&self, id: &str) -> Result<Entity<BlogPost>, AppError> {
        let existing = self.posts.get_by_id(id).await?;

        let mut update = Update::new()
            .set("status", BlogStatus::Published.as_str())
            .inc("version", 1);
        if existing.record.published_at.is_none() {
            update = update.set("publishedAt", timestamp::format(&timestamp::now()));
        }

        let published = self.posts.update_with(id, update).await?;
        tracing::info!(id = %published.id, "Blog post published");
        Ok(published)
    }

    pub async fn delete_blog_post(&self, id: &str) -> Result<Deleted, AppError> {
        self.posts.delete(id).await
    }

    /// Records one like from `caller`. A caller can like a post once.
    ///
    /// The already-liked check and the increment are separate store calls, so two
    /// concurrent first likes from one caller may both pass the check; the set-insert
    /// still keeps `likedBy` unique.
    pub async fn increment_likes(&self, id: &str, caller: &str) -> Result<Entity<BlogPost>, AppError> {
        let oid = valid_id(id)?;

        let already_liked = Filter::id(oid).and(Filter::contains("likedBy", caller));
        if self.store().count(BlogPost::COLLECTION, &already_liked).await? > 0 {
            return Err(AppError::BadRequest("You have already liked this blog".to_string()));
        }

        let like = Update::new().inc("likes", 1).add_to_set("likedBy", caller);
        let liked = self
            .store()
            .find_one_and_update(BlogPost::COLLECTION, &Filter::id(oid), &like)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))?;

        Entity::try_from(liked)
    }
}
