//! Process-local [`DocumentStore`].
//!
//! Evaluates [`FindQuery`] with the same semantics as the MongoDB pipeline:
//! literal case-insensitive search, left join, sort after join with `_id`
//! tie-break, then paging and scrubbing.

use async_trait::async_trait;
use mongodb::bson::{Bson, Document, oid::ObjectId};
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::error::{StoreError, StoreResult};
use crate::query::{FindQuery, Filter, JoinSpec};
use crate::store::{DocumentStore, non_null_fields, with_active_flag};

type Collections = HashMap<String, Vec<Document>>;

/// Unique fields per collection
type UniqueFields = HashMap<String, Vec<String>>;

/// In-memory store for tests and local runs. Clones share the same data.
///
/// Lock order is `unique` then `collections`.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    unique: Arc<RwLock<UniqueFields>>,
    collections: Arc<RwLock<Collections>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Compiled form of a [`Filter`]
struct Matcher<'a> {
    filter: &'a Filter,
    search: Option<Regex>,
}

impl<'a> Matcher<'a> {
    fn new(collection: &str, filter: &'a Filter) -> StoreResult<Self> {
        let search = filter
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| {
                RegexBuilder::new(&regex::escape(s))
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| StoreError::query(collection, e))
            })
            .transpose()?;

        Ok(Self { filter, search })
    }

    fn matches(&self, document: &Document) -> bool {
        if !self.filter.include_deleted && document.get("deleted") != Some(&Bson::Boolean(false)) {
            return false;
        }

        if let Some(search) = &self.search {
            match document.get(&self.filter.search_field) {
                Some(Bson::String(value)) if search.is_match(value) => {}
                _ => return false,
            }
        }

        self.filter
            .equals
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}

/// Value at a dotted path such as `category.name`
fn lookup<'d>(document: &'d Document, path: &str) -> Option<&'d Bson> {
    let mut parts = path.split('.');
    let mut current = document.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Bson::Document(inner) => inner.get(part)?,
            _ => return None,
        };
    }
    Some(current)
}

/// MongoDB's cross-type sort order, restricted to the types records hold
fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) => 1,
        Some(Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_)) => 2,
        Some(Bson::String(_)) => 3,
        Some(Bson::Document(_)) => 4,
        Some(Bson::Array(_)) => 5,
        Some(Bson::ObjectId(_)) => 7,
        Some(Bson::Boolean(_)) => 8,
        Some(Bson::DateTime(_)) => 9,
        Some(_) => 10,
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

fn compare_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let by_rank = type_rank(a).cmp(&type_rank(b));
    if by_rank != Ordering::Equal {
        return by_rank;
    }

    match (a, b) {
        (Some(Bson::String(x)), Some(Bson::String(y))) => x.as_bytes().cmp(y.as_bytes()),
        (Some(Bson::ObjectId(x)), Some(Bson::ObjectId(y))) => x.bytes().cmp(&y.bytes()),
        (Some(Bson::Boolean(x)), Some(Bson::Boolean(y))) => x.cmp(y),
        (Some(Bson::DateTime(x)), Some(Bson::DateTime(y))) => x.cmp(y),
        (Some(x), Some(y)) => match (as_f64(x), as_f64(y)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        _ => Ordering::Equal,
    }
}

/// Attach the first matching foreign record; rows without a match are kept
fn left_join(rows: &mut [Document], join: &JoinSpec, foreign: &[Document]) {
    for row in rows.iter_mut() {
        let related = row.get(&join.local_field).and_then(|local| {
            foreign
                .iter()
                .find(|candidate| candidate.get(&join.foreign_field) == Some(local))
        });
        if let Some(related) = related {
            row.insert(join.as_field.clone(), related.clone());
        }
    }
}

fn scrub(row: &mut Document, join: Option<&JoinSpec>) {
    row.remove("deleted");
    if let Some(join) = join {
        if let Some(Bson::Document(related)) = row.get_mut(&join.as_field) {
            related.remove("deleted");
        }
    }
}

fn has_id(row: &Document, id: ObjectId) -> bool {
    row.get_object_id("_id").is_ok_and(|found| found == id)
}

/// First unique field whose value `candidate` shares with another row.
/// Missing and null values never collide.
fn repeated_field<'f>(
    rows: &[Document],
    fields: &'f [String],
    candidate: &Document,
    own_id: Option<ObjectId>,
) -> Option<&'f str> {
    fields
        .iter()
        .find(|field| {
            let Some(value) = candidate.get(field.as_str()).filter(|v| !matches!(v, Bson::Null))
            else {
                return false;
            };
            rows.iter()
                .filter(|row| own_id.is_none_or(|id| !has_id(row, id)))
                .any(|row| row.get(field.as_str()) == Some(value))
        })
        .map(String::as_str)
}

fn duplicate(collection: &str, field: &str) -> StoreError {
    StoreError::Duplicate {
        collection: collection.to_string(),
        reason: format!("'{field}' is already taken"),
    }
}

fn merge(row: &mut Document, fields: Document) {
    for (key, value) in fields {
        row.insert(key, value);
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    #[instrument(skip(self, fields))]
    async fn insert(&self, collection: &str, fields: Document) -> StoreResult<ObjectId> {
        let id = ObjectId::new();
        let mut document = Document::new();
        document.insert("_id", id);
        merge(&mut document, with_active_flag(fields));

        let unique = self.unique.read().await;
        let mut collections = self.collections.write().await;
        let rows = collections.entry(collection.to_string()).or_default();
        if let Some(field) = unique
            .get(collection)
            .and_then(|fields| repeated_field(rows, fields, &document, None))
        {
            return Err(duplicate(collection, field));
        }
        rows.push(document);

        info!(%id, collection, "Inserted document");
        Ok(id)
    }

    #[instrument(skip(self, fields), fields(id = %id))]
    async fn update_by_id(
        &self,
        collection: &str,
        id: ObjectId,
        fields: Document,
    ) -> StoreResult<()> {
        let changes = non_null_fields(fields);
        let unique = self.unique.read().await;
        let mut collections = self.collections.write().await;
        let Some(rows) = collections.get_mut(collection) else {
            debug!("No document matched");
            return Ok(());
        };
        let Some(position) = rows.iter().position(|row| has_id(row, id)) else {
            debug!("No document matched");
            return Ok(());
        };

        let mut updated = rows[position].clone();
        merge(&mut updated, changes);
        if let Some(field) = unique
            .get(collection)
            .and_then(|fields| repeated_field(rows, fields, &updated, Some(id)))
        {
            return Err(duplicate(collection, field));
        }
        rows[position] = updated;
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn soft_delete_by_id(&self, collection: &str, id: ObjectId) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        if let Some(row) = collections
            .get_mut(collection)
            .and_then(|rows| rows.iter_mut().find(|row| has_id(row, id)))
        {
            row.insert("deleted", true);
            info!(%id, collection, "Soft-deleted document");
        }
        Ok(())
    }

    async fn get_by_id(&self, collection: &str, id: ObjectId) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|rows| {
            rows.iter()
                .find(|row| has_id(row, id))
                .cloned()
        }))
    }

    async fn find_one_by_field(
        &self,
        collection: &str,
        field: &str,
        value: Bson,
    ) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|rows| {
            rows.iter()
                .find(|row| row.get(field) == Some(&value))
                .cloned()
        }))
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let matcher = Matcher::new(collection, filter)?;
        let collections = self.collections.read().await;
        let count = collections
            .get(collection)
            .map(|rows| rows.iter().filter(|row| matcher.matches(row)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    #[instrument(skip(self, query))]
    async fn fetch(&self, collection: &str, query: &FindQuery) -> StoreResult<Vec<Document>> {
        let matcher = Matcher::new(collection, &query.filter)?;
        let collections = self.collections.read().await;

        let mut rows: Vec<Document> = collections
            .get(collection)
            .map(|rows| rows.iter().filter(|row| matcher.matches(row)).cloned().collect())
            .unwrap_or_default();

        if let Some(join) = &query.join {
            let foreign = collections.get(&join.from).map(Vec::as_slice).unwrap_or(&[]);
            left_join(&mut rows, join, foreign);
        }
        drop(collections);

        if let Some(sort) = query.sort {
            let field = sort.key.field();
            rows.sort_by(|a, b| {
                let order = compare_values(lookup(a, field), lookup(b, field))
                    .then_with(|| compare_values(a.get("_id"), b.get("_id")));
                if sort.ascending { order } else { order.reverse() }
            });
        }

        let mut rows: Vec<Document> = match query.window {
            Some(window) => rows
                .into_iter()
                .skip(usize::try_from(window.skip()).unwrap_or(usize::MAX))
                .take(usize::try_from(window.per_page).unwrap_or(usize::MAX))
                .collect(),
            None => rows,
        };

        if query.scrub_deleted {
            for row in &mut rows {
                scrub(row, query.join.as_ref());
            }
        }

        debug!(returned = rows.len(), "Evaluated listing");
        Ok(rows)
    }

    async fn ensure_unique(&self, collection: &str, field: &str) -> StoreResult<()> {
        let mut unique = self.unique.write().await;
        let collections = self.collections.read().await;

        if let Some(rows) = collections.get(collection) {
            let field_list = [field.to_string()];
            for (position, row) in rows.iter().enumerate() {
                if repeated_field(&rows[position + 1..], &field_list, row, None).is_some() {
                    return Err(StoreError::persistence(
                        "create index",
                        collection,
                        format!("existing records repeat '{field}'"),
                    ));
                }
            }
        }

        let fields = unique.entry(collection.to_string()).or_default();
        if !fields.iter().any(|known| known == field) {
            fields.push(field.to_string());
            info!(collection, field, "Unique field registered");
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) {
        debug!("In-memory store closed");
    }
}
