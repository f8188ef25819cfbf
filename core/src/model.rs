use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::store::{Collection, Entity};

fn default_enabled() -> bool {
    true
}

/// Accept a JSON number or numeric string; anything else counts as 0.
/// Counters are user-declared, so a bad value must never block a read.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(count_from_value(&value))
}

fn count_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

/// Accept a JSON integer or numeric string; anything else counts as 0.
pub fn lenient_order<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    })
}

/// Accept an array of strings or a comma-separated string.
pub fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(s) => split_tags(&s),
        _ => Vec::new(),
    })
}

/// Split a comma-separated tag list, trimming entries and dropping blanks.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// A boolean flag; anything that is not a JSON boolean reads as `false`.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_bool().unwrap_or(false))
}

/// `enabled` is opt-out: anything that is not a JSON boolean reads as `true`.
fn lenient_enabled<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_bool().unwrap_or(true))
}

/// Journey steps. A non-array reads as no steps and non-object items are dropped.
fn lenient_journey<'de, D>(deserializer: D) -> Result<Vec<JourneyStep>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// `null` reads as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Pricing tier. Stored as its display string; unrecognised values are kept
/// verbatim and a missing or non-string value reads as the default tier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(into = "String")]
pub enum Pricing {
    Free,
    #[default]
    Freemium,
    Paid,
    Other(String),
}

impl From<String> for Pricing {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Free" => Pricing::Free,
            "Freemium" => Pricing::Freemium,
            "Paid" => Pricing::Paid,
            _ => Pricing::Other(value),
        }
    }
}

impl<'de> Deserialize<'de> for Pricing {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Pricing::from(s),
            _ => Pricing::default(),
        })
    }
}

impl From<Pricing> for String {
    fn from(value: Pricing) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Pricing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pricing::Free => f.write_str("Free"),
            Pricing::Freemium => f.write_str("Freemium"),
            Pricing::Paid => f.write_str("Paid"),
            Pricing::Other(raw) => f.write_str(raw),
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Category id. Legacy records may hold the category name instead.
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub short_description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub long_description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub logo_url: String,
    #[serde(default)]
    #[schema(value_type = String, example = "Freemium")]
    pub pricing: Pricing,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_trending: bool,
    #[serde(default = "default_enabled", deserialize_with = "lenient_enabled")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "lenient_count")]
    pub likes_count: u64,
}

impl Entity for Tool {
    const COLLECTION: Collection = Collection::Tools;

    fn id(&self) -> &str {
        &self.id
    }
}

/// A grouping of tools. `tool_count` is declared by the operator and is not
/// derived from `tools`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub icon_name: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub tool_count: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default = "default_enabled", deserialize_with = "lenient_enabled")]
    pub enabled: bool,
    /// Membership list. Treated as a set.
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tools: Vec<String>,
}

impl Entity for Category {
    const COLLECTION: Collection = Collection::Categories;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Category {
    pub fn has_member(&self, tool_id: &str) -> bool {
        self.tools.iter().any(|id| id == tool_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JourneyStep {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tool_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub prompt: String,
}

/// A guided sequence of tool usages. `steps` mirrors `journey.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub icon_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub steps: u64,
    #[serde(default, deserialize_with = "lenient_journey")]
    pub journey: Vec<JourneyStep>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default = "default_enabled", deserialize_with = "lenient_enabled")]
    pub enabled: bool,
}

impl Entity for Workflow {
    const COLLECTION: Collection = Collection::Workflows;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostToolRef {
    #[serde(default, deserialize_with = "lenient_string")]
    pub tool_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default)]
    pub post_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    /// Rich-text body, stored as authored.
    #[serde(default, deserialize_with = "lenient_string")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tool: PostToolRef,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: String,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub likes: u64,
    /// Creation time in epoch milliseconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: i64,
}

impl Entity for Post {
    const COLLECTION: Collection = Collection::Posts;
    const ID_FIELD: &'static str = "postId";

    fn id(&self) -> &str {
        &self.post_id
    }
}

/// Where a banner is placed on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BannerPosition {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// A promotional banner. Listed by `order`, lowest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub link: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub link_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: BannerPosition,
    #[serde(default = "default_enabled", deserialize_with = "lenient_enabled")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "lenient_order")]
    pub order: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Banner {
    const COLLECTION: Collection = Collection::Banners;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Document id of the privacy policy in the settings collection.
pub const PRIVACY_POLICY_ID: &str = "privacyPolicy";

/// Site privacy policy text, stored as a single settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyPolicy {
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request body for the single-entity tool create/edit flow.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToolInput {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    #[schema(value_type = String, example = "Freemium")]
    pub pricing: Pricing,
    /// Array of tags or a comma-separated string.
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_trending: bool,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "lenient_count")]
    pub likes_count: u64,
}

impl ToolInput {
    pub fn into_tool(self, id: String) -> Tool {
        Tool {
            id,
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            short_description: self.short_description,
            long_description: self.long_description,
            url: self.url,
            logo_url: self.logo_url,
            pricing: self.pricing,
            tags: self.tags,
            is_trending: self.is_trending,
            enabled: self.enabled,
            likes_count: self.likes_count,
        }
    }
}

/// Request body for category create/edit. Membership is never part of it.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub icon_name: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub tool_count: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_name: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub journey: Vec<JourneyStep>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl WorkflowInput {
    pub fn into_workflow(self, id: String) -> Workflow {
        Workflow {
            id,
            name: self.name.trim().to_string(),
            description: self.description,
            icon_name: self.icon_name,
            duration: self.duration,
            steps: self.journey.len() as u64,
            journey: self.journey,
            tags: self.tags,
            enabled: self.enabled,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tool: PostToolRef,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub likes: u64,
}

impl PostInput {
    pub fn into_post(self, post_id: String, timestamp: i64) -> Post {
        Post {
            post_id,
            title: self.title.trim().to_string(),
            body: self.body,
            tool: self.tool,
            image_url: self.image_url,
            tags: self.tags,
            likes: self.likes,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BannerInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub link_text: String,
    #[serde(default)]
    pub position: BannerPosition,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Integer or numeric string; anything else counts as 0.
    #[serde(default, deserialize_with = "lenient_order")]
    pub order: i64,
}

impl BannerInput {
    pub fn into_banner(
        self,
        id: String,
        created_at: Option<DateTime<Utc>>,
        updated_at: DateTime<Utc>,
    ) -> Banner {
        Banner {
            id,
            title: self.title.trim().to_string(),
            description: self.description,
            image_url: self.image_url,
            link: self.link,
            link_text: self.link_text,
            position: self.position,
            enabled: self.enabled,
            order: self.order,
            created_at,
            updated_at: Some(updated_at),
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PrivacyPolicyInput {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn banner_order_accepts_numeric_strings() {
        let input: BannerInput = serde_json::from_value(json!({
            "title": "Spring sale",
            "order": "3",
            "position": "bottom"
        }))
        .unwrap();
        assert_eq!(input.order, 3);
        assert_eq!(input.position, BannerPosition::Bottom);

        let input: BannerInput =
            serde_json::from_value(json!({"title": "Spring sale", "order": "first"})).unwrap();
        assert_eq!(input.order, 0);
        assert_eq!(input.position, BannerPosition::Top);
    }

    #[test]
    fn tool_decodes_imported_record() {
        let tool: Tool = serde_json::from_value(json!({
            "id": "chatgpt",
            "name": "ChatGPT",
            "category": "chatbots",
            "pricing": "Freemium",
            "tags": ["LLM", "Chat"],
            "isTrending": true,
            "likesCount": 15000
        }))
        .unwrap();

        assert_eq!(tool.pricing, Pricing::Freemium);
        assert_eq!(tool.likes_count, 15000);
        assert!(tool.enabled, "enabled defaults to true");
        assert_eq!(tool.tags, vec!["LLM", "Chat"]);
    }

    #[test]
    fn unknown_pricing_is_kept_verbatim() {
        let tool: Tool =
            serde_json::from_value(json!({"name": "X", "pricing": "Open Source"})).unwrap();
        assert_eq!(tool.pricing, Pricing::Other("Open Source".to_string()));
        assert_eq!(serde_json::to_value(&tool).unwrap()["pricing"], json!("Open Source"));
    }

    #[test]
    fn stored_nulls_and_wrong_types_fall_back_to_defaults() {
        let tool: Tool = serde_json::from_value(json!({
            "name": "ChatGPT",
            "pricing": null,
            "isTrending": null,
            "enabled": "yes"
        }))
        .unwrap();
        assert_eq!(tool.pricing, Pricing::Freemium);
        assert!(!tool.is_trending);
        assert!(tool.enabled);

        let category: Category =
            serde_json::from_value(json!({"name": "Chatbots", "enabled": null})).unwrap();
        assert!(category.enabled);

        let workflow: Workflow = serde_json::from_value(json!({
            "name": "Launch",
            "journey": [{"title": "Plan"}, "stray", null]
        }))
        .unwrap();
        assert_eq!(workflow.journey.len(), 1);
        let workflow: Workflow =
            serde_json::from_value(json!({"name": "Launch", "journey": null})).unwrap();
        assert!(workflow.journey.is_empty());
    }

    #[test]
    fn counters_tolerate_strings_and_floats() {
        let category: Category = serde_json::from_value(json!({
            "name": "Video",
            "toolCount": "12"
        }))
        .unwrap();
        assert_eq!(category.tool_count, 12);

        let tool: Tool =
            serde_json::from_value(json!({"name": "X", "likesCount": 4.7})).unwrap();
        assert_eq!(tool.likes_count, 4);

        let tool: Tool =
            serde_json::from_value(json!({"name": "X", "likesCount": "lots"})).unwrap();
        assert_eq!(tool.likes_count, 0);
    }

    #[test]
    fn comma_separated_tags_are_split_and_trimmed() {
        let input: ToolInput = serde_json::from_value(json!({
            "name": "ChatGPT",
            "category": "chatbots",
            "tags": " LLM, Chat ,, Code "
        }))
        .unwrap();
        assert_eq!(input.tags, vec!["LLM", "Chat", "Code"]);
    }

    #[test]
    fn workflow_input_recomputes_steps() {
        let input: WorkflowInput = serde_json::from_value(json!({
            "name": "Startup Launch Pack",
            "journey": [{"title": "Plan"}, {"title": "Build", "toolId": "chatgpt"}]
        }))
        .unwrap();
        let workflow = input.into_workflow("startup_pack".to_string());
        assert_eq!(workflow.steps, 2);
        assert_eq!(workflow.journey[1].tool_id, "chatgpt");
    }
}
