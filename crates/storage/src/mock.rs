//! In-process document engine for tests and local development
//!
//! Approximates the Elasticsearch semantics the gateway relies on: a
//! token-overlap text match over the request's fields, an exact
//! case-insensitive city term filter, and the request's popularity boosts.

use crate::{DocumentEngine, SearchHit};
use async_trait::async_trait;
use bizsearch_core::query_compiler::MultiMatch;
use bizsearch_core::{Error, RetrievalRequest};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use tracing::debug;

/// Immutable set of documents searched entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryEngine {
    documents: Vec<(String, Map<String, Value>)>,
}

impl InMemoryEngine {
    /// Engine with no documents
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine from JSON business objects
    ///
    /// Every document must be an object with a non-empty string `business_id`,
    /// which becomes its engine id.
    pub fn from_documents<I>(documents: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Value>,
    {
        let documents = documents
            .into_iter()
            .map(|doc| match doc {
                Value::Object(map) => match map.get("business_id").and_then(Value::as_str) {
                    Some(id) if !id.is_empty() => Ok((id.to_string(), map)),
                    _ => Err(Error::invalid_input(
                        "document has no business_id".to_string(),
                    )),
                },
                other => Err(Error::invalid_input(format!(
                    "document must be a JSON object, got {other}"
                ))),
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self { documents })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn field_tokens(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => tokenize(s),
        Value::Array(items) => items.iter().flat_map(field_tokens).collect(),
        Value::Object(map) => map.values().flat_map(field_tokens).collect(),
        Value::Number(n) => vec![n.to_string()],
        Value::Bool(_) | Value::Null => Vec::new(),
    }
}

/// Best single-field token overlap, 0 when nothing matches
fn text_score(m: &MultiMatch, doc: &Map<String, Value>) -> f64 {
    let query = tokenize(&m.query);
    m.fields
        .iter()
        .filter_map(|field| doc.get(*field))
        .map(|value| {
            let tokens = field_tokens(value);
            query.iter().filter(|q| tokens.contains(q)).count()
        })
        .max()
        .unwrap_or(0) as f64
}

fn passes_term(doc: &Map<String, Value>, field: &str, term: &str) -> bool {
    doc.get(field)
        .and_then(Value::as_str)
        .is_some_and(|value| value.to_lowercase() == term)
}

fn project(doc: &Map<String, Value>, fields: &[&str]) -> Map<String, Value> {
    if fields.is_empty() {
        return doc.clone();
    }
    fields
        .iter()
        .filter_map(|f| doc.get(*f).map(|v| (f.to_string(), v.clone())))
        .collect()
}

/// Sort scored documents in descending order, NaN scores last
fn sort_scores_descending(hits: &mut [SearchHit]) {
    hits.sort_by(|a, b| {
        let a = a.score.unwrap_or(f64::NAN);
        let b = b.score.unwrap_or(f64::NAN);
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        }
    });
}

#[async_trait]
impl DocumentEngine for InMemoryEngine {
    async fn search(&self, request: &RetrievalRequest) -> Result<Vec<SearchHit>, Error> {
        let scoring = request.scoring();
        let text_match = scoring.query.text_match();
        let filter = request.city_filter();

        let mut hits: Vec<SearchHit> = self
            .documents
            .iter()
            .filter(|(_, doc)| match filter {
                Some(f) => passes_term(doc, f.field, &f.value),
                None => true,
            })
            .filter_map(|(id, doc)| {
                let base = text_score(text_match, doc);
                if base <= 0.0 {
                    return None;
                }
                let boost =
                    scoring.combined_boost(|field| doc.get(field).and_then(Value::as_f64));
                Some(SearchHit {
                    id: id.clone(),
                    score: Some(base * boost),
                    source: project(doc, request.projection()),
                })
            })
            .collect();

        sort_scores_descending(&mut hits);
        hits.truncate(request.size());

        debug!("InMemoryEngine: {} hits for '{}'", hits.len(), text_match.query);
        Ok(hits)
    }

    async fn get_document(
        &self,
        id: &str,
        fields: &[&str],
    ) -> Result<Option<Map<String, Value>>, Error> {
        Ok(self
            .documents
            .iter()
            .find(|(doc_id, _)| doc_id == id)
            .map(|(_, doc)| project(doc, fields)))
    }

    async fn health_check(&self) -> Result<(), Error> {
        Ok(())
    }
}
