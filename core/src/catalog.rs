//! Single-entity admin operations over the catalog, banner and settings
//! collections.
//!
//! Tool writes that touch category membership go through
//! [`crate::relationships`]; everything here is a plain read or a single
//! document write.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::CatalogError;
use crate::model::{
    Banner, BannerInput, Category, CategoryInput, PRIVACY_POLICY_ID, Post, PostInput,
    PrivacyPolicy, Tool, Workflow, WorkflowInput,
};
use crate::relationships::category_label;
use crate::store::{
    Collection, DocumentStore, Entity, Fields, StoreError, get_entity, list_entities, to_fields,
};

/// Placeholder shown for post references that resolve to nothing.
pub const MISSING_LABEL: &str = "-";

fn matches_search(term: &str, haystacks: &[&str]) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty() || haystacks.iter().any(|h| h.to_lowercase().contains(&term))
}

fn entity_fields<T: Entity>(entity: &T) -> Result<Fields, StoreError> {
    let mut data = to_fields(entity)?;
    data.remove(T::ID_FIELD);
    Ok(data)
}

async fn require<T: Entity>(store: &dyn DocumentStore, id: &str) -> Result<T, CatalogError> {
    get_entity::<T>(store, id)
        .await?
        .ok_or_else(|| CatalogError::not_found(T::COLLECTION, id))
}

async fn delete_existing<T: Entity>(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<T, CatalogError> {
    let entity = require::<T>(store, id).await?;
    store.delete(T::COLLECTION, id).await?;
    tracing::info!(collection = %T::COLLECTION, id = %id, "document deleted");
    Ok(entity)
}

async fn set_enabled<T: Entity>(
    store: &dyn DocumentStore,
    id: &str,
    enabled: bool,
) -> Result<(), CatalogError> {
    let mut fields = Fields::new();
    fields.insert("enabled".to_string(), enabled.into());
    store.update(T::COLLECTION, id, fields).await?;
    Ok(())
}

// ── Tools ───────────────────────────────────────────────────

/// A tool with its category reference resolved for display.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToolView {
    #[serde(flatten)]
    pub tool: Tool,
    /// Category name, or the raw stored reference when it no longer resolves.
    pub category_name: String,
}

/// Tools ordered by name, filtered case-insensitively on name, category and
/// short description.
pub async fn list_tools(
    store: &dyn DocumentStore,
    search: Option<&str>,
) -> Result<Vec<ToolView>, StoreError> {
    let categories = list_entities::<Category>(store).await?;
    let mut tools = list_entities::<Tool>(store).await?;
    tools.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(tools
        .into_iter()
        .map(|tool| {
            let category_name = category_label(&categories, &tool.category).to_string();
            ToolView {
                tool,
                category_name,
            }
        })
        .filter(|view| match search {
            Some(term) => matches_search(
                term,
                &[
                    view.tool.name.as_str(),
                    view.category_name.as_str(),
                    view.tool.short_description.as_str(),
                ],
            ),
            None => true,
        })
        .collect())
}

pub async fn get_tool(store: &dyn DocumentStore, id: &str) -> Result<Tool, CatalogError> {
    require::<Tool>(store, id).await
}

/// Flip a tool's `enabled` flag. Membership is unaffected.
pub async fn toggle_tool(store: &dyn DocumentStore, id: &str) -> Result<Tool, CatalogError> {
    let mut tool = require::<Tool>(store, id).await?;
    tool.enabled = !tool.enabled;
    set_enabled::<Tool>(store, id, tool.enabled).await?;
    Ok(tool)
}

// ── Categories ──────────────────────────────────────────────

pub async fn list_categories(
    store: &dyn DocumentStore,
    search: Option<&str>,
) -> Result<Vec<Category>, StoreError> {
    let mut categories = list_entities::<Category>(store).await?;
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    if let Some(term) = search {
        categories.retain(|c| matches_search(term, &[c.name.as_str(), c.description.as_str()]));
    }
    Ok(categories)
}

pub async fn get_category(store: &dyn DocumentStore, id: &str) -> Result<Category, CatalogError> {
    require::<Category>(store, id).await
}

/// Category ids are derived from the name: lowercased, with every
/// non-alphanumeric character replaced by `_`.
pub fn category_slug(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                '_'
            }
        })
        .collect()
}

pub async fn create_category(
    store: &dyn DocumentStore,
    input: CategoryInput,
) -> Result<Category, CatalogError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(CatalogError::invalid("name", "name must not be empty"));
    }
    let id = category_slug(name);
    if store.get(Collection::Categories, &id).await?.is_some() {
        return Err(CatalogError::Conflict {
            collection: Collection::Categories,
            id,
        });
    }

    let category = Category {
        id: id.clone(),
        name: name.to_string(),
        icon_name: input.icon_name,
        tool_count: input.tool_count,
        description: input.description,
        enabled: input.enabled,
        tools: Vec::new(),
    };
    store
        .set(Collection::Categories, &id, entity_fields(&category)?)
        .await?;
    tracing::info!(category = %id, "category created");
    Ok(category)
}

/// Update the editable fields of a category. The membership list and the id
/// are left alone.
pub async fn update_category(
    store: &dyn DocumentStore,
    id: &str,
    input: CategoryInput,
) -> Result<Category, CatalogError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(CatalogError::invalid("name", "name must not be empty"));
    }
    let mut category = require::<Category>(store, id).await?;
    category.name = name.to_string();
    category.icon_name = input.icon_name;
    category.tool_count = input.tool_count;
    category.description = input.description;
    category.enabled = input.enabled;

    let mut fields = entity_fields(&category)?;
    fields.remove("tools");
    store.update(Collection::Categories, id, fields).await?;
    Ok(category)
}

/// Delete a category. Tools that reference it keep the dangling reference.
pub async fn delete_category(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Category, CatalogError> {
    delete_existing::<Category>(store, id).await
}

pub async fn toggle_category(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Category, CatalogError> {
    let mut category = require::<Category>(store, id).await?;
    category.enabled = !category.enabled;
    set_enabled::<Category>(store, id, category.enabled).await?;
    Ok(category)
}

// ── Workflows ───────────────────────────────────────────────

pub async fn list_workflows(store: &dyn DocumentStore) -> Result<Vec<Workflow>, StoreError> {
    let mut workflows = list_entities::<Workflow>(store).await?;
    workflows.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(workflows)
}

pub async fn get_workflow(store: &dyn DocumentStore, id: &str) -> Result<Workflow, CatalogError> {
    require::<Workflow>(store, id).await
}

fn check_workflow_input(input: &WorkflowInput) -> Result<(), CatalogError> {
    if input.name.trim().is_empty() {
        return Err(CatalogError::invalid("name", "name must not be empty"));
    }
    if let Some(i) = input.journey.iter().position(|s| s.title.trim().is_empty()) {
        return Err(CatalogError::invalid(
            "journey",
            format!("step {} needs a title", i + 1),
        ));
    }
    Ok(())
}

pub async fn create_workflow(
    store: &dyn DocumentStore,
    input: WorkflowInput,
) -> Result<Workflow, CatalogError> {
    check_workflow_input(&input)?;
    let mut workflow = input.into_workflow(String::new());
    workflow.id = store
        .create(Collection::Workflows, entity_fields(&workflow)?)
        .await?;
    tracing::info!(workflow = %workflow.id, steps = workflow.steps, "workflow created");
    Ok(workflow)
}

pub async fn update_workflow(
    store: &dyn DocumentStore,
    id: &str,
    input: WorkflowInput,
) -> Result<Workflow, CatalogError> {
    check_workflow_input(&input)?;
    require::<Workflow>(store, id).await?;
    let workflow = input.into_workflow(id.to_string());
    store
        .update(Collection::Workflows, id, entity_fields(&workflow)?)
        .await?;
    Ok(workflow)
}

pub async fn delete_workflow(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Workflow, CatalogError> {
    delete_existing::<Workflow>(store, id).await
}

// ── Posts ───────────────────────────────────────────────────

/// A post with its tool and category references resolved for display.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub tool_name: String,
    pub category_name: String,
}

/// Posts, newest first.
pub async fn list_posts(store: &dyn DocumentStore) -> Result<Vec<Post>, StoreError> {
    let mut posts = list_entities::<Post>(store).await?;
    posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(posts)
}

pub async fn list_post_views(store: &dyn DocumentStore) -> Result<Vec<PostView>, StoreError> {
    let tools = list_entities::<Tool>(store).await?;
    let categories = list_entities::<Category>(store).await?;
    let posts = list_posts(store).await?;

    Ok(posts
        .into_iter()
        .map(|post| {
            let tool_name = tools
                .iter()
                .find(|t| t.id == post.tool.tool_id)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| MISSING_LABEL.to_string());
            let category_name = categories
                .iter()
                .find(|c| c.id == post.tool.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| MISSING_LABEL.to_string());
            PostView {
                post,
                tool_name,
                category_name,
            }
        })
        .collect())
}

pub async fn get_post(store: &dyn DocumentStore, id: &str) -> Result<Post, CatalogError> {
    require::<Post>(store, id).await
}

fn check_post_input(input: &PostInput) -> Result<(), CatalogError> {
    if input.title.trim().is_empty() {
        return Err(CatalogError::invalid("title", "title must not be empty"));
    }
    Ok(())
}

/// Create a post stamped with `now` in epoch milliseconds.
pub async fn create_post(
    store: &dyn DocumentStore,
    input: PostInput,
    now: DateTime<Utc>,
) -> Result<Post, CatalogError> {
    check_post_input(&input)?;
    let mut post = input.into_post(String::new(), now.timestamp_millis());
    post.post_id = store
        .create(Collection::Posts, entity_fields(&post)?)
        .await?;
    tracing::info!(post = %post.post_id, "post created");
    Ok(post)
}

/// Edit a post. The creation timestamp is kept.
pub async fn update_post(
    store: &dyn DocumentStore,
    id: &str,
    input: PostInput,
) -> Result<Post, CatalogError> {
    check_post_input(&input)?;
    let existing = require::<Post>(store, id).await?;
    let post = input.into_post(id.to_string(), existing.timestamp);
    store
        .update(Collection::Posts, id, entity_fields(&post)?)
        .await?;
    Ok(post)
}

pub async fn delete_post(store: &dyn DocumentStore, id: &str) -> Result<Post, CatalogError> {
    delete_existing::<Post>(store, id).await
}

// ── Banners ─────────────────────────────────────────────────

/// Banners by `order`, filtered on title and description.
pub async fn list_banners(
    store: &dyn DocumentStore,
    search: Option<&str>,
) -> Result<Vec<Banner>, StoreError> {
    let mut banners = list_entities::<Banner>(store).await?;
    banners.sort_by_key(|b| b.order);
    if let Some(term) = search {
        banners.retain(|b| matches_search(term, &[b.title.as_str(), b.description.as_str()]));
    }
    Ok(banners)
}

pub async fn get_banner(store: &dyn DocumentStore, id: &str) -> Result<Banner, CatalogError> {
    require::<Banner>(store, id).await
}

fn check_banner_input(input: &BannerInput) -> Result<(), CatalogError> {
    if input.title.trim().is_empty() {
        return Err(CatalogError::invalid("title", "title must not be empty"));
    }
    Ok(())
}

pub async fn create_banner(
    store: &dyn DocumentStore,
    input: BannerInput,
    now: DateTime<Utc>,
) -> Result<Banner, CatalogError> {
    check_banner_input(&input)?;
    let mut banner = input.into_banner(String::new(), Some(now), now);
    banner.id = store
        .create(Collection::Banners, entity_fields(&banner)?)
        .await?;
    tracing::info!(banner = %banner.id, "banner created");
    Ok(banner)
}

/// Edit a banner. `createdAt` is kept and `updatedAt` moves to `now`.
pub async fn update_banner(
    store: &dyn DocumentStore,
    id: &str,
    input: BannerInput,
    now: DateTime<Utc>,
) -> Result<Banner, CatalogError> {
    check_banner_input(&input)?;
    let existing = require::<Banner>(store, id).await?;
    let banner = input.into_banner(id.to_string(), existing.created_at, now);
    store
        .update(Collection::Banners, id, entity_fields(&banner)?)
        .await?;
    Ok(banner)
}

pub async fn toggle_banner(
    store: &dyn DocumentStore,
    id: &str,
    now: DateTime<Utc>,
) -> Result<Banner, CatalogError> {
    let mut banner = require::<Banner>(store, id).await?;
    banner.enabled = !banner.enabled;
    banner.updated_at = Some(now);
    let mut fields = Fields::new();
    fields.insert("enabled".to_string(), banner.enabled.into());
    fields.insert("updatedAt".to_string(), now.to_rfc3339().into());
    store.update(Collection::Banners, id, fields).await?;
    Ok(banner)
}

pub async fn delete_banner(store: &dyn DocumentStore, id: &str) -> Result<Banner, CatalogError> {
    delete_existing::<Banner>(store, id).await
}

// ── Settings ────────────────────────────────────────────────

/// The stored privacy policy, or an empty one if none was ever saved.
pub async fn get_privacy_policy(store: &dyn DocumentStore) -> Result<PrivacyPolicy, StoreError> {
    match store.get(Collection::Settings, PRIVACY_POLICY_ID).await? {
        Some(doc) => Ok(serde_json::from_value(doc.data.into())?),
        None => Ok(PrivacyPolicy::default()),
    }
}

/// Replace the privacy policy text.
pub async fn save_privacy_policy(
    store: &dyn DocumentStore,
    content: String,
    now: DateTime<Utc>,
) -> Result<PrivacyPolicy, StoreError> {
    let policy = PrivacyPolicy {
        content,
        updated_at: Some(now),
    };
    store
        .set(Collection::Settings, PRIVACY_POLICY_ID, to_fields(&policy)?)
        .await?;
    tracing::info!(bytes = policy.content.len(), "privacy policy saved");
    Ok(policy)
}

// ── Dashboard ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardStats {
    pub tools: usize,
    pub categories: usize,
    pub workflows: usize,
    pub posts: usize,
}

pub async fn dashboard_stats(store: &dyn DocumentStore) -> Result<DashboardStats, StoreError> {
    Ok(DashboardStats {
        tools: store.list_ids(Collection::Tools).await?.len(),
        categories: store.list_ids(Collection::Categories).await?.len(),
        workflows: store.list_ids(Collection::Workflows).await?.len(),
        posts: store.list_ids(Collection::Posts).await?.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ToolInput;
    use crate::relationships::create_tool;
    use crate::store::MemoryStore;
    use chrono::TimeZone;
    use serde_json::json;

    fn category_input(name: &str) -> CategoryInput {
        serde_json::from_value(json!({"name": name, "toolCount": 3})).unwrap()
    }

    fn tool_input(name: &str, category: &str) -> ToolInput {
        serde_json::from_value(json!({
            "name": name,
            "category": category,
            "shortDescription": format!("{name} does things")
        }))
        .unwrap()
    }

    #[test]
    fn slug_replaces_every_non_alphanumeric_character() {
        assert_eq!(category_slug("AI & Machine Learning"), "ai___machine_learning");
        assert_eq!(category_slug("  Chatbots "), "chatbots");
        assert_eq!(category_slug("Video-Gen 2"), "video_gen_2");
    }

    #[tokio::test]
    async fn duplicate_category_name_conflicts() {
        let store = MemoryStore::new();
        create_category(&store, category_input("Chatbots")).await.unwrap();
        let err = create_category(&store, category_input("chatbots"))
            .await
            .expect_err("same slug");
        assert!(matches!(err, CatalogError::Conflict { .. }));
    }

    #[tokio::test]
    async fn category_edit_keeps_membership() {
        let store = MemoryStore::new();
        create_category(&store, category_input("Chatbots")).await.unwrap();
        let tool = create_tool(&store, tool_input("ChatGPT", "chatbots"))
            .await
            .unwrap();

        let mut input = category_input("Chat Assistants");
        input.description = "Talk to a model".to_string();
        update_category(&store, "chatbots", input).await.unwrap();

        let stored = get_category(&store, "chatbots").await.unwrap();
        assert_eq!(stored.name, "Chat Assistants");
        assert_eq!(stored.tools, vec![tool.id]);
    }

    #[tokio::test]
    async fn deleting_a_category_leaves_tool_reference_dangling() {
        let store = MemoryStore::new();
        create_category(&store, category_input("Chatbots")).await.unwrap();
        let tool = create_tool(&store, tool_input("ChatGPT", "chatbots"))
            .await
            .unwrap();

        delete_category(&store, "chatbots").await.unwrap();

        let stored = get_tool(&store, &tool.id).await.unwrap();
        assert_eq!(stored.category, "chatbots");
        let views = list_tools(&store, None).await.unwrap();
        assert_eq!(views[0].category_name, "chatbots");
    }

    #[tokio::test]
    async fn tool_listing_is_sorted_and_searchable() {
        let store = MemoryStore::new();
        create_category(&store, category_input("Chatbots")).await.unwrap();
        create_category(&store, category_input("Video")).await.unwrap();
        create_tool(&store, tool_input("Sora", "video")).await.unwrap();
        create_tool(&store, tool_input("ChatGPT", "chatbots")).await.unwrap();
        create_tool(&store, tool_input("Claude", "chatbots")).await.unwrap();

        let names: Vec<_> = list_tools(&store, None)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.tool.name)
            .collect();
        assert_eq!(names, vec!["ChatGPT", "Claude", "Sora"]);

        let by_category = list_tools(&store, Some("VIDEO")).await.unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].tool.name, "Sora");
    }

    #[tokio::test]
    async fn toggle_flips_enabled_only() {
        let store = MemoryStore::new();
        create_category(&store, category_input("Chatbots")).await.unwrap();
        let tool = create_tool(&store, tool_input("ChatGPT", "chatbots"))
            .await
            .unwrap();

        let toggled = toggle_tool(&store, &tool.id).await.unwrap();
        assert!(!toggled.enabled);
        let stored = get_tool(&store, &tool.id).await.unwrap();
        assert!(!stored.enabled);
        assert_eq!(stored.name, "ChatGPT");
        assert_eq!(get_category(&store, "chatbots").await.unwrap().tools, vec![tool.id]);
    }

    #[tokio::test]
    async fn workflow_steps_follow_journey() {
        let store = MemoryStore::new();
        let input: WorkflowInput = serde_json::from_value(json!({
            "name": "Launch",
            "journey": [{"title": "Plan"}, {"title": "Build"}]
        }))
        .unwrap();
        let created = create_workflow(&store, input).await.unwrap();
        assert_eq!(created.steps, 2);

        let input: WorkflowInput = serde_json::from_value(json!({
            "name": "Launch",
            "journey": [{"title": "Plan"}]
        }))
        .unwrap();
        update_workflow(&store, &created.id, input).await.unwrap();
        assert_eq!(get_workflow(&store, &created.id).await.unwrap().steps, 1);
    }

    #[tokio::test]
    async fn workflow_step_without_title_is_rejected() {
        let store = MemoryStore::new();
        let input: WorkflowInput = serde_json::from_value(json!({
            "name": "Launch",
            "journey": [{"title": "Plan"}, {"description": "no title"}]
        }))
        .unwrap();
        let err = create_workflow(&store, input).await.expect_err("untitled step");
        assert!(matches!(err, CatalogError::Invalid { ref field, .. } if field == "journey"));
    }

    #[tokio::test]
    async fn posts_are_newest_first_and_keep_timestamp_on_edit() {
        let store = MemoryStore::new();
        let earlier = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let later = Utc.timestamp_millis_opt(1_700_000_500_000).unwrap();
        let post_input = |title: &str| -> PostInput {
            serde_json::from_value(json!({"title": title, "tags": "ai, video"})).unwrap()
        };

        let first = create_post(&store, post_input("First"), earlier).await.unwrap();
        create_post(&store, post_input("Second"), later).await.unwrap();

        let titles: Vec<_> = list_posts(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Second", "First"]);

        let edited = update_post(&store, &first.post_id, post_input("First, edited"))
            .await
            .unwrap();
        assert_eq!(edited.timestamp, 1_700_000_000_000);
        assert_eq!(edited.tags, vec!["ai", "video"]);
    }

    #[tokio::test]
    async fn post_views_fall_back_to_placeholder() {
        let store = MemoryStore::new();
        create_category(&store, category_input("Chatbots")).await.unwrap();
        let tool = create_tool(&store, tool_input("ChatGPT", "chatbots"))
            .await
            .unwrap();
        let input: PostInput = serde_json::from_value(json!({
            "title": "Hello",
            "tool": {"toolId": tool.id, "categoryId": "gone"}
        }))
        .unwrap();
        create_post(&store, input, Utc::now()).await.unwrap();

        let views = list_post_views(&store).await.unwrap();
        assert_eq!(views[0].tool_name, "ChatGPT");
        assert_eq!(views[0].category_name, MISSING_LABEL);
    }

    #[tokio::test]
    async fn stats_count_each_collection() {
        let store = MemoryStore::new();
        create_category(&store, category_input("Chatbots")).await.unwrap();
        create_tool(&store, tool_input("ChatGPT", "chatbots")).await.unwrap();
        create_tool(&store, tool_input("Claude", "chatbots")).await.unwrap();

        let stats = dashboard_stats(&store).await.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                tools: 2,
                categories: 1,
                workflows: 0,
                posts: 0
            }
        );
    }

    fn banner_input(title: &str, order: i64) -> BannerInput {
        serde_json::from_value(json!({
            "title": title,
            "description": format!("{title} banner"),
            "order": order
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn banners_list_by_order_and_search_title_and_description() {
        let store = MemoryStore::new();
        let now = Utc::now();
        create_banner(&store, banner_input("Summer", 2), now).await.unwrap();
        create_banner(&store, banner_input("Launch week", 0), now).await.unwrap();
        create_banner(&store, banner_input("Webinar", 1), now).await.unwrap();

        let titles: Vec<_> = list_banners(&store, None)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["Launch week", "Webinar", "Summer"]);

        let found = list_banners(&store, Some("WEEK BANNER")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Launch week");
    }

    #[tokio::test]
    async fn banner_edits_keep_created_at_and_stamp_updated_at() {
        let store = MemoryStore::new();
        let created = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let edited = Utc.timestamp_millis_opt(1_700_000_900_000).unwrap();
        let banner = create_banner(&store, banner_input("Summer", 0), created)
            .await
            .unwrap();
        assert_eq!(banner.created_at, Some(created));
        assert!(banner.enabled);

        update_banner(&store, &banner.id, banner_input("Summer sale", 4), edited)
            .await
            .unwrap();
        let toggled = toggle_banner(&store, &banner.id, edited).await.unwrap();
        assert!(!toggled.enabled);

        let stored = get_banner(&store, &banner.id).await.unwrap();
        assert_eq!(stored.title, "Summer sale");
        assert_eq!(stored.order, 4);
        assert!(!stored.enabled);
        assert_eq!(stored.created_at, Some(created));
        assert_eq!(stored.updated_at, Some(edited));

        delete_banner(&store, &banner.id).await.unwrap();
        assert!(matches!(
            get_banner(&store, &banner.id).await,
            Err(CatalogError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn untitled_banner_is_rejected() {
        let store = MemoryStore::new();
        let err = create_banner(&store, banner_input("  ", 0), Utc::now())
            .await
            .expect_err("title is required");
        assert!(matches!(err, CatalogError::Invalid { ref field, .. } if field == "title"));
    }

    #[tokio::test]
    async fn privacy_policy_defaults_to_empty_and_is_replaced_on_save() {
        let store = MemoryStore::new();
        assert_eq!(get_privacy_policy(&store).await.unwrap(), PrivacyPolicy::default());

        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        save_privacy_policy(&store, "We keep nothing.".to_string(), now)
            .await
            .unwrap();
        save_privacy_policy(&store, "We keep very little.".to_string(), now)
            .await
            .unwrap();

        let policy = get_privacy_policy(&store).await.unwrap();
        assert_eq!(policy.content, "We keep very little.");
        assert_eq!(policy.updated_at, Some(now));
        assert_eq!(store.list(Collection::Settings).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_documents_are_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            get_workflow(&store, "nope").await,
            Err(CatalogError::NotFound { .. })
        ));
        assert!(matches!(
            delete_post(&store, "nope").await,
            Err(CatalogError::NotFound { .. })
        ));
    }
}
