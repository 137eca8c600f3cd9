//! Test double that evaluates typed stages over in-memory BSON documents.
//!
//! Follows the store's semantics closely enough for the catalog: array
//! membership on matches, null-first ordering, boundary-keyed buckets with
//! the default bucket last, and no output for `$count` over nothing.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use common::search_params::SortDirection;
use mongodb::bson::{Bson, Document};

use crate::{
    constants::FIELD_SCORE,
    errors::StoreError,
    stages::{
        add_fields_stage::AddFieldsStage,
        bucket_stage::BucketStage,
        count_stage::CountStage,
        facet_stage::FacetStage,
        lookup_stage::LookupStage,
        match_stage::{MatchStage, Predicate},
        sort_stage::SortKey,
        traits::{Pipeline, Stage},
    },
};

use super::{DocumentStore, FindQuery};

const TEXT_FIELDS: [&str; 4] = ["title", "plot", "cast", "genres"];

#[derive(Default)]
pub(crate) struct InMemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    // applied once, right after the first aggregation answers
    pending_write: Mutex<Option<(String, Document)>>,
    delay: Option<Duration>,
    failure: Option<String>,
    pipelines: Mutex<Vec<Pipeline>>,
    finds: Mutex<Vec<FindQuery>>,
}

impl InMemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_collection(mut self, name: &str, documents: Vec<Document>) -> Self {
        self.collections
            .get_mut()
            .unwrap()
            .insert(name.to_string(), documents);
        self
    }

    /// Simulates a concurrent writer landing between two round trips.
    pub(crate) fn inserting_after_first_aggregate(
        mut self,
        collection: &str,
        document: Document,
    ) -> Self {
        *self.pending_write.get_mut().unwrap() = Some((collection.to_string(), document));
        self
    }

    pub(crate) fn collection_len(&self, collection: &str) -> usize {
        self.documents(collection).len()
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn failing_with(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub(crate) fn executed_pipelines(&self) -> Vec<Pipeline> {
        self.pipelines.lock().unwrap().clone()
    }

    pub(crate) fn executed_finds(&self) -> Vec<FindQuery> {
        self.finds.lock().unwrap().clone()
    }

    pub(crate) fn round_trips(&self) -> usize {
        self.pipelines.lock().unwrap().len() + self.finds.lock().unwrap().len()
    }

    async fn respond(&self) -> Result<(), StoreError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = &self.failure {
            return Err(StoreError::Rejected(message.clone()));
        }

        Ok(())
    }

    fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn run_stages(&self, mut documents: Vec<Document>, stages: &[Stage]) -> Vec<Document> {
        for stage in stages {
            documents = match stage {
                Stage::Match(stage) => apply_match(documents, stage),
                Stage::Sort(stage) => apply_sort(documents, stage.key()),
                Stage::Skip(stage) => documents
                    .into_iter()
                    .skip(stage.count() as usize)
                    .collect(),
                Stage::Limit(stage) => documents
                    .into_iter()
                    .take(stage.count() as usize)
                    .collect(),
                Stage::Bucket(stage) => apply_bucket(&documents, stage),
                Stage::Facet(stage) => vec![self.apply_facet(&documents, stage)],
                Stage::Count(stage) => apply_count(&documents, stage),
                Stage::Lookup(stage) => self.apply_lookup(documents, stage),
                Stage::AddFields(stage) => apply_add_fields(documents, stage),
            };
        }

        documents
    }

    fn apply_facet(&self, documents: &[Document], stage: &FacetStage) -> Document {
        let mut output = Document::new();

        for facet in stage.facets() {
            let results = self.run_stages(documents.to_vec(), facet.pipeline().stages());

            output.insert(
                facet.name(),
                results
                    .into_iter()
                    .map(Bson::Document)
                    .collect::<Vec<Bson>>(),
            );
        }

        output
    }

    fn apply_lookup(&self, documents: Vec<Document>, stage: &LookupStage) -> Vec<Document> {
        let foreign = self.documents(stage.from());

        documents
            .into_iter()
            .map(|mut document| {
                let local = lookup_path(&document, stage.local_field()).cloned();

                let mut joined = foreign
                    .iter()
                    .filter(|candidate| {
                        local.is_some()
                            && lookup_path(candidate, stage.foreign_field()) == local.as_ref()
                    })
                    .cloned()
                    .collect::<Vec<Document>>();

                if let Some(sort) = stage.sort() {
                    joined = apply_sort(joined, sort);
                }

                document.insert(
                    stage.as_field(),
                    joined
                        .into_iter()
                        .map(Bson::Document)
                        .collect::<Vec<Bson>>(),
                );

                document
            })
            .collect()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find(
        &self,
        collection: &str,
        query: &FindQuery,
    ) -> Result<Vec<Document>, StoreError> {
        self.finds.lock().unwrap().push(query.clone());
        self.respond().await?;

        let mut documents = apply_match(self.documents(collection), query.filter());

        if let Some(sort) = query.sort() {
            documents = apply_sort(documents, sort);
        }

        let limit = query.limit().map(|limit| limit as usize).unwrap_or(usize::MAX);

        Ok(documents
            .into_iter()
            .skip(query.skip() as usize)
            .take(limit)
            .map(|document| project(document, query.projection()))
            .collect())
    }

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &Pipeline,
    ) -> Result<Vec<Document>, StoreError> {
        self.pipelines.lock().unwrap().push(pipeline.clone());
        self.respond().await?;

        let documents = self.run_stages(self.documents(collection), pipeline.stages());

        if let Some((name, document)) = self.pending_write.lock().unwrap().take() {
            self.collections
                .lock()
                .unwrap()
                .entry(name)
                .or_default()
                .push(document);
        }

        Ok(documents)
    }
}

fn lookup_path<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;

    for segment in segments {
        current = current.as_document()?.get(segment)?;
    }

    Some(current)
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(number) => Some(*number as f64),
        Bson::Int64(number) => Some(*number as f64),
        Bson::Double(number) => Some(*number),
        _ => None,
    }
}

fn value_matches(field_value: Option<&Bson>, candidate: &Bson) -> bool {
    match field_value {
        Some(Bson::Array(items)) => items.iter().any(|item| item == candidate),
        Some(value) => value == candidate,
        None => false,
    }
}

fn text_score(document: &Document, terms: &[String]) -> f64 {
    let words = TEXT_FIELDS
        .iter()
        .filter_map(|field| document.get(*field))
        .flat_map(|value| match value {
            Bson::String(text) => vec![text.clone()],
            Bson::Array(items) => items
                .iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect(),
            _ => vec![],
        })
        .flat_map(|text| {
            text.split_whitespace()
                .map(str::to_lowercase)
                .collect::<Vec<String>>()
        })
        .collect::<Vec<String>>();

    terms
        .iter()
        .map(|term| {
            let term = term.to_lowercase();
            words.iter().filter(|word| **word == term).count()
        })
        .sum::<usize>() as f64
}

fn apply_match(documents: Vec<Document>, stage: &MatchStage) -> Vec<Document> {
    documents
        .into_iter()
        .filter_map(|mut document| {
            let keep = match stage.predicate() {
                Predicate::Any => true,
                Predicate::In(values) if values.is_empty() => true,
                Predicate::Equals(value) => {
                    value_matches(lookup_path(&document, stage.field()), value)
                }
                Predicate::In(values) => values
                    .iter()
                    .any(|value| value_matches(lookup_path(&document, stage.field()), value)),
                Predicate::Text(terms) => {
                    let score = text_score(&document, terms);
                    document.insert(FIELD_SCORE, score);
                    score > 0.0
                }
            };

            keep.then_some(document)
        })
        .collect()
}

fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) => 0,
        Some(Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_)) => 1,
        Some(Bson::String(_)) => 2,
        Some(Bson::DateTime(_)) => 3,
        Some(_) => 4,
    }
}

fn compare_values(left: Option<&Bson>, right: Option<&Bson>) -> Ordering {
    let rank = type_rank(left).cmp(&type_rank(right));

    if rank != Ordering::Equal {
        return rank;
    }

    match (left, right) {
        (Some(Bson::String(left)), Some(Bson::String(right))) => left.cmp(right),
        (Some(Bson::DateTime(left)), Some(Bson::DateTime(right))) => left.cmp(right),
        (Some(left), Some(right)) => match (as_number(left), as_number(right)) {
            (Some(left), Some(right)) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        _ => Ordering::Equal,
    }
}

fn apply_sort(mut documents: Vec<Document>, key: &SortKey) -> Vec<Document> {
    let (field, direction) = match key {
        SortKey::Field { field, direction } => (field.as_str(), *direction),
        SortKey::TextScore => (FIELD_SCORE, SortDirection::Desc),
    };

    // stable, ties keep insertion order
    documents.sort_by(|left, right| {
        let ordering = compare_values(lookup_path(left, field), lookup_path(right, field));

        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    documents
}

fn bucket_document(key: Bson, output_field: &str, count: i32) -> Document {
    let mut document = Document::new();
    document.insert("_id", key);
    document.insert(output_field, count);
    document
}

fn apply_bucket(documents: &[Document], stage: &BucketStage) -> Vec<Document> {
    let mut counts: BTreeMap<i64, i32> = BTreeMap::new();
    let mut other = 0;

    for document in documents {
        let value = lookup_path(document, stage.group_by()).and_then(as_number);

        match stage.bucket_for(value) {
            Some(lower) => *counts.entry(lower).or_insert(0) += 1,
            None => other += 1,
        }
    }

    let mut buckets = counts
        .into_iter()
        .map(|(lower, count)| bucket_document(Bson::Int64(lower), stage.output_field(), count))
        .collect::<Vec<Document>>();

    if other > 0 {
        buckets.push(bucket_document(
            Bson::String(stage.default_key().to_string()),
            stage.output_field(),
            other,
        ));
    }

    buckets
}

fn apply_count(documents: &[Document], stage: &CountStage) -> Vec<Document> {
    if documents.is_empty() {
        return vec![];
    }

    let mut document = Document::new();
    document.insert(stage.output_field(), documents.len() as i32);

    vec![document]
}

fn apply_add_fields(documents: Vec<Document>, stage: &AddFieldsStage) -> Vec<Document> {
    documents
        .into_iter()
        .map(|mut document| {
            if let Some(value) = lookup_path(&document, stage.source()).cloned() {
                document.insert(stage.target(), value);
            }

            document
        })
        .collect()
}

fn project(document: Document, fields: &[String]) -> Document {
    if fields.is_empty() {
        return document;
    }

    document
        .into_iter()
        .filter(|(key, _)| key == "_id" || key == FIELD_SCORE || fields.contains(key))
        .collect()
}
