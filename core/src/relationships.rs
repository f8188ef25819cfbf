//! Keeps `Category.tools` in step with each tool's `category` reference for
//! the single-entity create, edit and delete flows.
//!
//! Membership changes are plain sequential writes, one per category touched.
//! They are not batched with each other or with the tool write, so a failure
//! part-way leaves the catalog inconsistent: a recategorised tool can end up
//! listed by neither category. That failure is reported as
//! [`CatalogError::PartialRelationship`] and nothing is rolled back.
//!
//! Category references are resolved by id first, then by name, because older
//! tool records stored the category name. New writes always store the id.

use std::collections::HashSet;

use serde_json::json;

use crate::error::{CatalogError, MembershipStep};
use crate::model::{Category, Tool, ToolInput};
use crate::store::{
    Collection, DocumentStore, Fields, StoreError, get_entity, list_entities, to_fields,
};

const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Find a category by id, falling back to an exact name match.
pub fn find_category<'a>(categories: &'a [Category], reference: &str) -> Option<&'a Category> {
    if reference.is_empty() {
        return None;
    }
    categories
        .iter()
        .find(|c| c.id == reference)
        .or_else(|| categories.iter().find(|c| c.name == reference))
}

/// Display name for a stored category reference. Unknown references (including
/// ones left dangling by a category delete) display as the raw stored value.
pub fn category_label<'a>(categories: &'a [Category], reference: &'a str) -> &'a str {
    find_category(categories, reference)
        .map(|c| c.name.as_str())
        .unwrap_or(reference)
}

/// Closest category id or name to an unknown reference, if any is close enough.
pub fn suggest_category(categories: &[Category], reference: &str) -> Option<String> {
    let needle = reference.to_lowercase();
    categories
        .iter()
        .flat_map(|c| [c.name.as_str(), c.id.as_str()])
        .map(|candidate| {
            (
                strsim::jaro_winkler(&needle, &candidate.to_lowercase()),
                candidate,
            )
        })
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, candidate)| candidate.to_string())
}

/// Resolve a stored reference against the store: id lookup, then name scan.
pub async fn resolve_category(
    store: &dyn DocumentStore,
    reference: &str,
) -> Result<Option<Category>, StoreError> {
    if reference.is_empty() {
        return Ok(None);
    }
    if let Some(category) = get_entity::<Category>(store, reference).await? {
        return Ok(Some(category));
    }
    let categories = list_entities::<Category>(store).await?;
    Ok(find_category(&categories, reference).cloned())
}

/// Like [`resolve_category`], but an unknown reference is a validation error.
async fn require_category(
    store: &dyn DocumentStore,
    reference: &str,
) -> Result<Category, CatalogError> {
    if let Some(category) = get_entity::<Category>(store, reference).await? {
        return Ok(category);
    }
    let categories = list_entities::<Category>(store).await?;
    if let Some(category) = find_category(&categories, reference) {
        return Ok(category.clone());
    }
    Err(CatalogError::Invalid {
        field: "category".to_string(),
        message: format!("category '{reference}' does not exist"),
        hint: suggest_category(&categories, reference).map(|s| format!("Did you mean '{s}'?")),
    })
}

/// Write a membership list, keeping the first occurrence of each id.
async fn write_members<'a>(
    store: &dyn DocumentStore,
    category_id: &str,
    members: impl IntoIterator<Item = &'a str>,
) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    let members: Vec<&str> = members.into_iter().filter(|id| seen.insert(*id)).collect();
    let mut fields = Fields::new();
    fields.insert("tools".to_string(), json!(members));
    store.update(Collection::Categories, category_id, fields).await
}

/// Add `tool_id` to the category's membership set. Returns whether a write happened.
pub async fn add_member(
    store: &dyn DocumentStore,
    category: &Category,
    tool_id: &str,
) -> Result<bool, StoreError> {
    if category.has_member(tool_id) {
        return Ok(false);
    }
    let members = category
        .tools
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(tool_id));
    write_members(store, &category.id, members).await?;
    tracing::debug!(category = %category.id, tool = %tool_id, "tool added to category");
    Ok(true)
}

/// Remove every occurrence of `tool_id` from the category's membership set.
pub async fn remove_member(
    store: &dyn DocumentStore,
    category: &Category,
    tool_id: &str,
) -> Result<bool, StoreError> {
    if !category.has_member(tool_id) {
        return Ok(false);
    }
    let members = category
        .tools
        .iter()
        .map(String::as_str)
        .filter(|id| *id != tool_id);
    write_members(store, &category.id, members).await?;
    tracing::debug!(category = %category.id, tool = %tool_id, "tool removed from category");
    Ok(true)
}

fn check_tool_input(input: &ToolInput) -> Result<(), CatalogError> {
    if input.name.trim().is_empty() {
        return Err(CatalogError::invalid("name", "name must not be empty"));
    }
    if input.category.trim().is_empty() {
        return Err(CatalogError::invalid("category", "category must not be empty"));
    }
    Ok(())
}

fn tool_fields(tool: &Tool) -> Result<Fields, StoreError> {
    let mut data = to_fields(tool)?;
    data.remove("id");
    Ok(data)
}

/// Create a tool with a store-assigned id, then list it in its category.
pub async fn create_tool(
    store: &dyn DocumentStore,
    input: ToolInput,
) -> Result<Tool, CatalogError> {
    check_tool_input(&input)?;
    let category = require_category(store, input.category.trim()).await?;

    let mut tool = input.into_tool(String::new());
    tool.category = category.id.clone();
    tool.id = store.create(Collection::Tools, tool_fields(&tool)?).await?;

    add_member(store, &category, &tool.id)
        .await
        .map_err(|source| CatalogError::PartialRelationship {
            tool_id: tool.id.clone(),
            step: MembershipStep::AddTo {
                category_id: category.id.clone(),
            },
            source,
        })?;

    tracing::info!(tool = %tool.id, category = %category.id, "tool created");
    Ok(tool)
}

/// Save an edited tool. When its category changes, the tool is removed from
/// the old category and then added to the new one, as two separate writes.
pub async fn update_tool(
    store: &dyn DocumentStore,
    id: &str,
    input: ToolInput,
) -> Result<Tool, CatalogError> {
    check_tool_input(&input)?;
    let existing = get_entity::<Tool>(store, id)
        .await?
        .ok_or_else(|| CatalogError::not_found(Collection::Tools, id))?;

    let old_category = resolve_category(store, &existing.category).await?;
    let old_key = old_category
        .as_ref()
        .map(|c| c.id.clone())
        .unwrap_or_else(|| existing.category.clone());

    let mut tool = input.into_tool(id.to_string());
    let moved_to = if tool.category == existing.category || tool.category == old_key {
        None
    } else {
        let target = require_category(store, &tool.category).await?;
        (target.id != old_key).then_some(target)
    };

    match (&moved_to, &old_category) {
        (Some(target), _) => tool.category = target.id.clone(),
        (None, Some(current)) => tool.category = current.id.clone(),
        (None, None) => tool.category = existing.category.clone(),
    }

    store
        .update(Collection::Tools, id, tool_fields(&tool)?)
        .await?;

    let Some(target) = moved_to else {
        tracing::info!(tool = %id, "tool updated");
        return Ok(tool);
    };

    if let Some(previous) = &old_category {
        remove_member(store, previous, id)
            .await
            .map_err(|source| CatalogError::PartialRelationship {
                tool_id: id.to_string(),
                step: MembershipStep::RemoveFrom {
                    category_id: previous.id.clone(),
                },
                source,
            })?;
    }

    // Re-read: the target may be the category we just wrote when ids and
    // names overlap in legacy data.
    let target = get_entity::<Category>(store, &target.id)
        .await?
        .unwrap_or(target);
    add_member(store, &target, id)
        .await
        .map_err(|source| CatalogError::PartialRelationship {
            tool_id: id.to_string(),
            step: MembershipStep::AddTo {
                category_id: target.id.clone(),
            },
            source,
        })?;

    tracing::info!(tool = %id, from = %old_key, to = %target.id, "tool moved between categories");
    Ok(tool)
}

/// Delete a tool and drop it from the category it resolves to.
pub async fn delete_tool(store: &dyn DocumentStore, id: &str) -> Result<Tool, CatalogError> {
    let tool = get_entity::<Tool>(store, id)
        .await?
        .ok_or_else(|| CatalogError::not_found(Collection::Tools, id))?;
    let category = resolve_category(store, &tool.category).await?;

    store.delete(Collection::Tools, id).await?;

    match category {
        Some(category) => {
            remove_member(store, &category, id)
                .await
                .map_err(|source| CatalogError::PartialRelationship {
                    tool_id: id.to_string(),
                    step: MembershipStep::RemoveFrom {
                        category_id: category.id.clone(),
                    },
                    source,
                })?;
        }
        None => tracing::warn!(
            tool = %id,
            category = %tool.category,
            "deleted tool referenced an unknown category"
        ),
    }

    tracing::info!(tool = %id, "tool deleted");
    Ok(tool)
}
