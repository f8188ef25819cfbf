//! Bulk import: validate, classify against what is already stored, then commit
//! everything in one atomic batch.
//!
//! Categories and workflows are insert-only: an id that already exists is
//! skipped and the stored record is left alone. Tools are upsert-replace: every
//! incoming tool is written in full, counted as new or updated depending on
//! whether its id was already present. Membership lists arrive as given; the
//! relationship maintainer is not involved here.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::feedback::Feedback;
use crate::store::{Collection, DocumentStore, Fields, StoreError, WriteOp};
use crate::validation;

/// Records of a validated payload, grouped by collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPayload {
    pub categories: Vec<Fields>,
    pub workflows: Vec<Fields>,
    pub tools: Vec<Fields>,
}

impl ImportPayload {
    /// Extract records from an already-validated payload. Items that are not
    /// objects are dropped.
    pub fn from_value(value: &Value) -> Self {
        let records = |key: &str| -> Vec<Fields> {
            value
                .get(key)
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| item.as_object().cloned())
                        .collect()
                })
                .unwrap_or_default()
        };
        Self {
            categories: records("categories"),
            workflows: records("workflows"),
            tools: records("tools"),
        }
    }

    pub fn records(&self, collection: Collection) -> &[Fields] {
        match collection {
            Collection::Categories => &self.categories,
            Collection::Workflows => &self.workflows,
            Collection::Tools => &self.tools,
            Collection::Posts | Collection::Banners | Collection::Settings => &[],
        }
    }
}

/// Ids already in storage for each importable collection, captured at load time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExistenceIndex {
    pub categories: HashSet<String>,
    pub workflows: HashSet<String>,
    pub tools: HashSet<String>,
}

impl ExistenceIndex {
    /// Snapshot the ids of every collection the payload touches. Nothing
    /// guards against writers landing between this read and the commit.
    pub async fn load(
        store: &dyn DocumentStore,
        payload: &ImportPayload,
    ) -> Result<Self, StoreError> {
        let mut index = Self::default();
        if !payload.categories.is_empty() {
            index.categories = store.list_ids(Collection::Categories).await?;
        }
        if !payload.workflows.is_empty() {
            index.workflows = store.list_ids(Collection::Workflows).await?;
        }
        if !payload.tools.is_empty() {
            index.tools = store.list_ids(Collection::Tools).await?;
        }
        Ok(index)
    }

    pub fn contains(&self, collection: Collection, id: &str) -> bool {
        match collection {
            Collection::Categories => self.categories.contains(id),
            Collection::Workflows => self.workflows.contains(id),
            Collection::Tools => self.tools.contains(id),
            Collection::Posts | Collection::Banners | Collection::Settings => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CollectionSummary {
    pub collection: Collection,
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl CollectionSummary {
    fn new(collection: Collection) -> Self {
        Self {
            collection,
            inserted: 0,
            updated: 0,
            skipped: 0,
        }
    }

    pub fn writes(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Keyed writes to commit plus what the operator should be told about them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPlan {
    pub writes: Vec<WriteOp>,
    pub summaries: Vec<CollectionSummary>,
    pub details: Vec<String>,
}

impl ImportPlan {
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Number of records the commit lands (new plus updated).
    pub fn write_count(&self) -> usize {
        self.summaries.iter().map(CollectionSummary::writes).sum()
    }

    pub fn summary(&self, collection: Collection) -> Option<&CollectionSummary> {
        self.summaries.iter().find(|s| s.collection == collection)
    }
}

fn record_id(record: &Fields) -> Option<&str> {
    record.get("id").and_then(Value::as_str).filter(|id| !id.is_empty())
}

fn record_name(record: &Fields) -> &str {
    record.get("name").and_then(Value::as_str).unwrap_or_default()
}

/// Null fields count as absent, so they are not written. `enabled` is
/// forced to a boolean, defaulting to true.
fn stage(record: &Fields, now: &str) -> Fields {
    let mut data: Fields = record
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    if !data.get("enabled").is_some_and(Value::is_boolean) {
        data.insert("enabled".to_string(), Value::Bool(true));
    }
    data.insert("updatedAt".to_string(), Value::String(now.to_string()));
    data
}

/// Partition incoming records into writes and skips.
pub fn plan_import(
    payload: &ImportPayload,
    index: &ExistenceIndex,
    now: DateTime<Utc>,
) -> ImportPlan {
    let now = now.to_rfc3339();
    let mut plan = ImportPlan::default();

    for (collection, kind, plural) in [
        (Collection::Categories, "Category", "Categories"),
        (Collection::Workflows, "Workflow", "Workflows"),
    ] {
        let records = payload.records(collection);
        if records.is_empty() {
            continue;
        }
        let mut summary = CollectionSummary::new(collection);
        let mut staged: HashSet<&str> = HashSet::new();
        for record in records {
            let Some(id) = record_id(record) else {
                continue;
            };
            if index.contains(collection, id) || staged.contains(id) {
                summary.skipped += 1;
                plan.details.push(format!(
                    "{kind} \"{}\" (id: {id}) already exists, skipping",
                    record_name(record)
                ));
                continue;
            }
            let mut data = stage(record, &now);
            if collection == Collection::Workflows {
                if let Some(journey) = data.get("journey").and_then(Value::as_array) {
                    let steps = journey.len();
                    data.insert("steps".to_string(), json!(steps));
                }
            }
            staged.insert(id);
            summary.inserted += 1;
            plan.writes.push(WriteOp::Set {
                collection,
                id: id.to_string(),
                data,
            });
        }
        plan.details
            .push(format!("{plural}: {} new entries prepared", summary.inserted));
        plan.summaries.push(summary);
    }

    if !payload.tools.is_empty() {
        let mut summary = CollectionSummary::new(Collection::Tools);
        let mut staged: HashSet<&str> = HashSet::new();
        for record in &payload.tools {
            let Some(id) = record_id(record) else {
                continue;
            };
            // A repeated id replaces the copy staged earlier in the same batch.
            if index.contains(Collection::Tools, id) || staged.contains(id) {
                summary.updated += 1;
            } else {
                summary.inserted += 1;
            }
            staged.insert(id);
            plan.writes.push(WriteOp::Set {
                collection: Collection::Tools,
                id: id.to_string(),
                data: stage(record, &now),
            });
        }
        match (summary.inserted, summary.updated) {
            (0, 0) => {}
            (new, 0) => plan.details.push(format!("Tools: {new} new entries")),
            (0, updated) => plan
                .details
                .push(format!("Tools: {updated} entries updated")),
            (new, updated) => plan
                .details
                .push(format!("Tools: {new} new entries, {updated} updated")),
        }
        plan.summaries.push(summary);
    }

    plan
}

/// Commit every planned write as one atomic batch.
pub async fn commit_plan(store: &dyn DocumentStore, plan: &ImportPlan) -> Result<usize, StoreError> {
    let count = plan.writes.len();
    store.commit(plan.writes.clone()).await?;
    tracing::info!(
        writes = count,
        records = plan.write_count(),
        "import batch committed"
    );
    Ok(count)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    /// Payload failed to parse or validate; nothing was read or written.
    Invalid(Vec<String>),
    /// Every record was already present; no commit was attempted.
    NothingToDo(ImportPlan),
    Committed(ImportPlan),
}

impl ImportOutcome {
    pub fn feedback(&self) -> Feedback {
        match self {
            ImportOutcome::Invalid(errors) => Feedback::error("Validation failed", errors.clone()),
            ImportOutcome::NothingToDo(plan) => Feedback::warning(
                "No new entries to upload. All items already exist in the database.",
                plan.details.clone(),
            ),
            ImportOutcome::Committed(plan) => Feedback::success(
                format!("Successfully uploaded {} new entries!", plan.write_count()),
                plan.details.clone(),
            ),
        }
    }
}

/// Feedback for an import that failed while reading ids or committing.
pub fn import_failure(err: &StoreError) -> Feedback {
    Feedback::error(format!("Error uploading data: {err}"), Vec::new())
}

/// Validate, plan and commit a payload in one go.
pub async fn run_import(
    store: &dyn DocumentStore,
    text: &str,
    now: DateTime<Utc>,
) -> Result<ImportOutcome, StoreError> {
    let value = match validation::parse_and_validate(text) {
        Ok(value) => value,
        Err(errors) => {
            tracing::debug!(violations = errors.len(), "import payload rejected");
            return Ok(ImportOutcome::Invalid(errors));
        }
    };

    let payload = ImportPayload::from_value(&value);
    let index = ExistenceIndex::load(store, &payload).await?;
    let plan = plan_import(&payload, &index, now);

    if plan.is_empty() {
        tracing::info!("import contained nothing new");
        return Ok(ImportOutcome::NothingToDo(plan));
    }

    commit_plan(store, &plan).await?;
    Ok(ImportOutcome::Committed(plan))
}

/// Validate payload text without touching storage.
pub fn validate_text(text: &str) -> Feedback {
    match validation::parse_and_validate(text) {
        Ok(value) => {
            let details = [
                ("categories", "Categories"),
                ("workflows", "Workflows"),
                ("tools", "Tools"),
            ]
            .into_iter()
            .filter_map(|(key, label)| {
                value
                    .get(key)
                    .and_then(Value::as_array)
                    .map(|items| format!("{label}: {} entries", items.len()))
            })
            .collect();
            Feedback::success("JSON is valid", details)
        }
        Err(errors) => Feedback::error("Validation failed", errors),
    }
}

/// A small payload showing every importable collection.
pub fn example_payload() -> Value {
    json!({
        "categories": [
            {
                "id": "ai___machine_learning",
                "name": "AI & MACHINE LEARNING",
                "iconName": "folder",
                "toolCount": 10,
                "description": "AI & MACHINE LEARNING",
                "tools": ["chatgpt", "midjourney"]
            }
        ],
        "workflows": [
            {
                "id": "startup_pack",
                "name": "Startup Launch Pack",
                "description": "Launch your startup in 6 strategic steps.",
                "iconName": "rocket",
                "duration": "3 hours",
                "steps": 6,
                "journey": [
                    {
                        "title": "Business Planning",
                        "description": "Generate business plan and market analysis",
                        "toolId": "chatgpt"
                    }
                ],
                "tags": ["Startup", "Business", "Planning", "Launch", "AI Tools"]
            }
        ],
        "tools": [
            {
                "id": "chatgpt",
                "name": "ChatGPT",
                "category": "ai___machine_learning",
                "shortDescription": "Advanced conversational AI",
                "longDescription": "ChatGPT offers conversational access to OpenAI's GPT family.",
                "url": "https://chat.openai.com",
                "logoUrl": "https://logo.clearbit.com/chat.openai.com",
                "pricing": "Freemium",
                "tags": ["LLM", "Chat", "Code"],
                "isTrending": true,
                "likesCount": 15000
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::FeedbackKind;
    use crate::model::Pricing;
    use crate::store::MemoryStore;
    use crate::{catalog, relationships};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn payload_text() -> String {
        json!({
            "categories": [
                {"id": "chatbots", "name": "Chatbots", "tools": ["chatgpt"]},
                {"id": "video", "name": "Video"}
            ],
            "workflows": [
                {"id": "launch", "name": "Launch", "steps": 9, "journey": [{"title": "a"}, {"title": "b"}]}
            ],
            "tools": [
                {"id": "chatgpt", "name": "ChatGPT", "category": "chatbots"},
                {"id": "runway", "name": "Runway", "category": "video", "enabled": false}
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn first_import_inserts_everything() {
        let store = MemoryStore::new();
        let outcome = run_import(&store, &payload_text(), now()).await.unwrap();

        let ImportOutcome::Committed(plan) = &outcome else {
            panic!("expected a commit, got {outcome:?}");
        };
        assert_eq!(plan.write_count(), 5);
        assert_eq!(plan.summary(Collection::Categories).unwrap().inserted, 2);
        assert_eq!(plan.summary(Collection::Tools).unwrap().updated, 0);

        let feedback = outcome.feedback();
        assert_eq!(feedback.kind, FeedbackKind::Success);
        assert_eq!(feedback.message, "Successfully uploaded 5 new entries!");
        assert_eq!(
            feedback.details,
            vec![
                "Categories: 2 new entries prepared",
                "Workflows: 1 new entries prepared",
                "Tools: 2 new entries",
            ]
        );
    }

    #[tokio::test]
    async fn rerun_skips_categories_and_workflows_but_updates_tools() {
        let store = MemoryStore::new();
        run_import(&store, &payload_text(), now()).await.unwrap();
        let outcome = run_import(&store, &payload_text(), now()).await.unwrap();

        let ImportOutcome::Committed(plan) = &outcome else {
            panic!("tools are always rewritten, so the rerun still commits");
        };
        let categories = plan.summary(Collection::Categories).unwrap();
        let workflows = plan.summary(Collection::Workflows).unwrap();
        let tools = plan.summary(Collection::Tools).unwrap();
        assert_eq!((categories.inserted, categories.skipped), (0, 2));
        assert_eq!((workflows.inserted, workflows.skipped), (0, 1));
        assert_eq!((tools.inserted, tools.updated), (0, 2));
        assert!(
            plan.details
                .contains(&"Category \"Chatbots\" (id: chatbots) already exists, skipping".to_string())
        );
        assert!(plan.details.contains(&"Tools: 2 entries updated".to_string()));
    }

    #[tokio::test]
    async fn existing_category_is_never_overwritten() {
        let store = MemoryStore::new();
        let mut original = Fields::new();
        original.insert("name".to_string(), json!("Hand curated"));
        store
            .set(Collection::Categories, "chatbots", original)
            .await
            .unwrap();

        run_import(&store, &payload_text(), now()).await.unwrap();

        let doc = store
            .get(Collection::Categories, "chatbots")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.data["name"], json!("Hand curated"));
        assert!(doc.data.get("tools").is_none());
    }

    #[tokio::test]
    async fn nothing_new_is_a_warning_not_an_error() {
        let store = MemoryStore::new();
        let text = json!({"categories": [{"id": "chatbots", "name": "Chatbots"}]}).to_string();
        run_import(&store, &text, now()).await.unwrap();

        let outcome = run_import(&store, &text, now()).await.unwrap();
        assert!(matches!(outcome, ImportOutcome::NothingToDo(_)));
        let feedback = outcome.feedback();
        assert_eq!(feedback.kind, FeedbackKind::Warning);
        assert_eq!(
            feedback.details,
            vec![
                "Category \"Chatbots\" (id: chatbots) already exists, skipping",
                "Categories: 0 new entries prepared",
            ]
        );
    }

    #[test]
    fn disjoint_ids_classify_everything_as_new() {
        let payload = ImportPayload::from_value(&serde_json::from_str(&payload_text()).unwrap());
        let index = ExistenceIndex {
            categories: ["other".to_string()].into(),
            workflows: ["other".to_string()].into(),
            tools: ["other".to_string()].into(),
        };
        let plan = plan_import(&payload, &index, now());

        assert!(!plan.is_empty());
        for summary in &plan.summaries {
            assert_eq!(summary.skipped, 0);
            assert_eq!(summary.updated, 0);
        }
        assert_eq!(plan.write_count(), 5);
    }

    fn planned<'a>(plan: &'a ImportPlan, collection: Collection, id: &str) -> &'a Fields {
        plan.writes
            .iter()
            .find_map(|op| match op {
                WriteOp::Set {
                    collection: c,
                    id: i,
                    data,
                } if *c == collection && i == id => Some(data),
                _ => None,
            })
            .expect("write should be planned")
    }

    #[test]
    fn staged_records_get_defaults_and_recomputed_steps() {
        let payload = ImportPayload::from_value(&serde_json::from_str(&payload_text()).unwrap());
        let plan = plan_import(&payload, &ExistenceIndex::default(), now());

        assert_eq!(planned(&plan, Collection::Categories, "video")["enabled"], json!(true));
        assert_eq!(planned(&plan, Collection::Workflows, "launch")["steps"], json!(2));
        assert_eq!(planned(&plan, Collection::Tools, "runway")["enabled"], json!(false));
        assert_eq!(
            planned(&plan, Collection::Tools, "chatgpt")["updatedAt"],
            json!("2026-03-01T12:00:00+00:00")
        );
    }

    #[test]
    fn duplicate_ids_within_one_payload() {
        let payload = ImportPayload::from_value(&json!({
            "categories": [
                {"id": "chatbots", "name": "First"},
                {"id": "chatbots", "name": "Second"}
            ],
            "tools": [
                {"id": "chatgpt", "name": "v1", "category": "chatbots"},
                {"id": "chatgpt", "name": "v2", "category": "chatbots"}
            ]
        }));
        let plan = plan_import(&payload, &ExistenceIndex::default(), now());

        let categories = plan.summary(Collection::Categories).unwrap();
        assert_eq!((categories.inserted, categories.skipped), (1, 1));
        let tools = plan.summary(Collection::Tools).unwrap();
        assert_eq!((tools.inserted, tools.updated), (1, 1));
    }

    #[tokio::test]
    async fn invalid_payload_writes_nothing() {
        let store = MemoryStore::new();
        let text = json!({"tools": [{"id": "chatgpt"}]}).to_string();
        let outcome = run_import(&store, &text, now()).await.unwrap();

        assert_eq!(
            outcome,
            ImportOutcome::Invalid(vec![
                "Tool 1: Missing or invalid 'name' field".to_string(),
                "Tool 1: Missing or invalid 'category' field".to_string(),
            ])
        );
        assert!(store.list(Collection::Tools).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_commit_leaves_store_untouched() {
        let store = MemoryStore::new();
        store.fail_after(0);

        let err = run_import(&store, &payload_text(), now())
            .await
            .expect_err("injected commit failure must surface");
        let feedback = import_failure(&err);
        assert!(feedback.is_error());
        assert!(feedback.message.starts_with("Error uploading data: "));

        for collection in [Collection::Categories, Collection::Workflows, Collection::Tools] {
            assert!(store.list(collection).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn loosely_typed_records_stay_readable_after_import() {
        let store = MemoryStore::new();
        let text = json!({
            "categories": [{"id": "chatbots", "name": "Chatbots", "enabled": "yes"}],
            "workflows": [{"id": "launch", "name": "Launch", "journey": null}],
            "tools": [{
                "id": "chatgpt",
                "name": "ChatGPT",
                "category": "chatbots",
                "pricing": null,
                "isTrending": null
            }]
        })
        .to_string();
        let outcome = run_import(&store, &text, now()).await.unwrap();
        assert_eq!(outcome.feedback().kind, FeedbackKind::Success);

        let stored = store.get(Collection::Tools, "chatgpt").await.unwrap().unwrap();
        assert!(stored.data.get("pricing").is_none(), "null fields are not written");

        let tool = catalog::get_tool(&store, "chatgpt").await.unwrap();
        assert_eq!(tool.pricing, Pricing::Freemium);
        assert!(!tool.is_trending);
        assert_eq!(catalog::list_tools(&store, None).await.unwrap().len(), 1);

        let category = catalog::get_category(&store, "chatbots").await.unwrap();
        assert!(category.enabled);
        let workflow = catalog::get_workflow(&store, "launch").await.unwrap();
        assert!(workflow.journey.is_empty());

        relationships::delete_tool(&store, "chatgpt").await.unwrap();
        assert!(store.get(Collection::Tools, "chatgpt").await.unwrap().is_none());
    }

    #[test]
    fn example_payload_is_valid() {
        let feedback = validate_text(&example_payload().to_string());
        assert_eq!(feedback.kind, FeedbackKind::Success);
        assert_eq!(
            feedback.details,
            vec!["Categories: 1 entries", "Workflows: 1 entries", "Tools: 1 entries"]
        );
    }
}
