//! Document store capability.
//!
//! The catalog lives in keyed collections of JSON documents with no referential
//! integrity. Everything above this module talks to storage only through
//! [`DocumentStore`], so the same flows run against Postgres in the API and
//! against [`MemoryStore`] in tests and local runs.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use utoipa::ToSchema;
use uuid::Uuid;

/// JSON object body of a stored document.
pub type Fields = serde_json::Map<String, Value>;

/// Named collection of documents of one entity kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Tools,
    Categories,
    Workflows,
    Posts,
    Banners,
    /// Singleton site documents such as the privacy policy.
    Settings,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Tools,
        Collection::Categories,
        Collection::Workflows,
        Collection::Posts,
        Collection::Banners,
        Collection::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Tools => "tools",
            Collection::Categories => "categories",
            Collection::Workflows => "workflows",
            Collection::Posts => "posts",
            Collection::Banners => "banners",
            Collection::Settings => "settings",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tools" => Ok(Collection::Tools),
            "categories" => Ok(Collection::Categories),
            "workflows" => Ok(Collection::Workflows),
            "posts" => Ok(Collection::Posts),
            "banners" => Ok(Collection::Banners),
            "settings" => Ok(Collection::Settings),
            other => Err(format!(
                "unknown collection '{other}' (expected tools, categories, workflows, posts, banners or settings)"
            )),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection}/{id} does not exist")]
    NotFound { collection: Collection, id: String },
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A stored document: its key plus its JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Fields,
}

/// Typed view over a collection's documents.
pub trait Entity: Serialize + DeserializeOwned {
    const COLLECTION: Collection;
    /// Field the document key is exposed under when decoded.
    const ID_FIELD: &'static str = "id";

    fn id(&self) -> &str;
}

impl Document {
    /// Decode into an entity. The document key always wins over any id stored in the body.
    pub fn decode<T: Entity>(&self) -> Result<T, StoreError> {
        let mut data = self.data.clone();
        data.insert(T::ID_FIELD.to_string(), Value::String(self.id.clone()));
        Ok(serde_json::from_value(Value::Object(data))?)
    }
}

/// Serialize an entity into a document body.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Backend(format!(
            "expected a JSON object document, got {other}"
        ))),
    }
}

/// A single keyed write, used both standalone and inside an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create or fully replace the document.
    Set {
        collection: Collection,
        id: String,
        data: Fields,
    },
    /// Merge top-level fields into an existing document.
    Update {
        collection: Collection,
        id: String,
        fields: Fields,
    },
    /// Remove the document. Deleting an absent document is a no-op.
    Delete { collection: Collection, id: String },
}

impl WriteOp {
    pub fn collection(&self) -> Collection {
        match self {
            WriteOp::Set { collection, .. }
            | WriteOp::Update { collection, .. }
            | WriteOp::Delete { collection, .. } => *collection,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            WriteOp::Set { id, .. } | WriteOp::Update { id, .. } | WriteOp::Delete { id, .. } => {
                id.as_str()
            }
        }
    }
}

/// Durable keyed document storage with atomic multi-document batch writes.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError>;

    /// All documents in the collection, ordered by id.
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError>;

    async fn list_ids(&self, collection: Collection) -> Result<HashSet<String>, StoreError> {
        Ok(self
            .list(collection)
            .await?
            .into_iter()
            .map(|doc| doc.id)
            .collect())
    }

    /// Insert with a store-generated id and return that id.
    async fn create(&self, collection: Collection, data: Fields) -> Result<String, StoreError>;

    async fn set(&self, collection: Collection, id: &str, data: Fields) -> Result<(), StoreError>;

    async fn update(&self, collection: Collection, id: &str, fields: Fields)
    -> Result<(), StoreError>;

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;

    /// Apply every write or none of them.
    async fn commit(&self, writes: Vec<WriteOp>) -> Result<(), StoreError>;
}

/// Fetch and decode a single entity.
pub async fn get_entity<T: Entity>(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(T::COLLECTION, id).await? {
        Some(doc) => Ok(Some(doc.decode()?)),
        None => Ok(None),
    }
}

/// Fetch and decode a whole collection. Documents that no longer match the
/// entity shape are skipped with a warning rather than failing the listing.
pub async fn list_entities<T: Entity>(store: &dyn DocumentStore) -> Result<Vec<T>, StoreError> {
    let docs = store.list(T::COLLECTION).await?;
    let mut out = Vec::with_capacity(docs.len());
    for doc in docs {
        match doc.decode::<T>() {
            Ok(entity) => out.push(entity),
            Err(err) => tracing::warn!(
                collection = %T::COLLECTION,
                id = %doc.id,
                error = %err,
                "skipping undecodable document"
            ),
        }
    }
    Ok(out)
}

type Tables = BTreeMap<Collection, BTreeMap<String, Fields>>;

const DISARMED: usize = usize::MAX;

/// In-process store. Batches are applied to a copy and swapped in only when
/// every write succeeds.
pub struct MemoryStore {
    tables: RwLock<Tables>,
    fail_after: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            tables: RwLock::new(Tables::new()),
            fail_after: AtomicUsize::new(DISARMED),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let the next `writes` write calls succeed, then fail exactly one.
    /// A batch commit counts as a single write.
    pub fn fail_after(&self, writes: usize) {
        self.fail_after.store(writes, Ordering::SeqCst);
    }

    fn check_write(&self) -> Result<(), StoreError> {
        let remaining = self.fail_after.load(Ordering::SeqCst);
        if remaining == DISARMED {
            return Ok(());
        }
        if remaining == 0 {
            self.fail_after.store(DISARMED, Ordering::SeqCst);
            return Err(StoreError::Backend("injected write failure".to_string()));
        }
        self.fail_after.store(remaining - 1, Ordering::SeqCst);
        Ok(())
    }
}

fn apply_write(tables: &mut Tables, op: WriteOp) -> Result<(), StoreError> {
    match op {
        WriteOp::Set {
            collection,
            id,
            data,
        } => {
            tables.entry(collection).or_default().insert(id, data);
        }
        WriteOp::Update {
            collection,
            id,
            fields,
        } => {
            let doc = tables
                .get_mut(&collection)
                .and_then(|table| table.get_mut(&id))
                .ok_or_else(|| StoreError::NotFound {
                    collection,
                    id: id.clone(),
                })?;
            doc.extend(fields);
        }
        WriteOp::Delete { collection, id } => {
            if let Some(table) = tables.get_mut(&collection) {
                table.remove(&id);
            }
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(&collection)
            .and_then(|table| table.get(id))
            .map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(&collection)
            .map(|table| {
                table
                    .iter()
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create(&self, collection: Collection, data: Fields) -> Result<String, StoreError> {
        self.check_write()?;
        let id = Uuid::now_v7().to_string();
        let mut tables = self.tables.write().await;
        tables.entry(collection).or_default().insert(id.clone(), data);
        Ok(id)
    }

    async fn set(&self, collection: Collection, id: &str, data: Fields) -> Result<(), StoreError> {
        self.check_write()?;
        let mut tables = self.tables.write().await;
        apply_write(
            &mut tables,
            WriteOp::Set {
                collection,
                id: id.to_string(),
                data,
            },
        )
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        self.check_write()?;
        let mut tables = self.tables.write().await;
        apply_write(
            &mut tables,
            WriteOp::Update {
                collection,
                id: id.to_string(),
                fields,
            },
        )
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        self.check_write()?;
        let mut tables = self.tables.write().await;
        apply_write(
            &mut tables,
            WriteOp::Delete {
                collection,
                id: id.to_string(),
            },
        )
    }

    async fn commit(&self, writes: Vec<WriteOp>) -> Result<(), StoreError> {
        self.check_write()?;
        let mut tables = self.tables.write().await;
        let mut staged = tables.clone();
        for op in writes {
            apply_write(&mut staged, op)?;
        }
        *tables = staged;
        Ok(())
    }
}
