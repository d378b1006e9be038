use anyhow::{Context, Result};
use extract::{Extractor, IdentifiedEntity, assign_ids};
use ingest::SourceContent;
use resolve::{
    DuplicateGroup, ExposedField, MergeOutcome, MergeSession, auto_merge, find_duplicate_groups,
};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, MergeMode};
use crate::metrics::{Metrics, MetricsSnapshot, TimedOperation};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub filename: String,
    pub doc_id: String,
    pub entities: usize,
}

/// A duplicate group as a caller would review it before merging
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupReport {
    pub key: String,
    pub primary_id: String,
    pub member_ids: Vec<String>,
    pub exposed_fields: Vec<ExposedField>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub documents: Vec<DocumentSummary>,
    pub duplicates: Vec<GroupReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub merges: Vec<MergeOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<IdentifiedEntity>>,
    pub metrics: MetricsSnapshot,
}

/// Read, extract, and resolve everything under `path`
pub async fn run(config: &AppConfig, path: &Path) -> Result<RunReport> {
    let metrics = Metrics::new();

    let timer = TimedOperation::start();
    let documents = ingest::ingest_path(path)
        .await
        .with_context(|| format!("Failed to read session notes from {}", path.display()))?;
    metrics.record_ingest(timer.elapsed(), documents.len());
    info!(path = %path.display(), documents = documents.len(), "Documents loaded");

    let extractor = Extractor::new(config.dictionary().await?, config.extraction.clone());
    let (summaries, entities) = extract_all(&extractor, &documents, &metrics);

    let timer = TimedOperation::start();
    let report = find_duplicate_groups(&entities);
    let duplicates = report
        .groups
        .iter()
        .map(review_group)
        .collect::<Result<Vec<_>>>()?;

    let (merges, entities) = match config.merge {
        MergeMode::Report => (Vec::new(), entities),
        MergeMode::Auto => merge_all(&report.groups, entities, &metrics)?,
    };
    metrics.record_resolve(timer.elapsed(), report.groups.len());

    if !report.groups.is_empty() {
        warn!(
            groups = report.groups.len(),
            members = report.member_ids.len(),
            mode = ?config.merge,
            "Duplicate entities found"
        );
    }

    Ok(RunReport {
        documents: summaries,
        duplicates,
        merges,
        entities: config.output.include_entities.then_some(entities),
        metrics: metrics.snapshot(),
    })
}

/// Extract every document, then number the combined list once so ids are unique
/// across the batch.
pub fn extract_all(
    extractor: &Extractor,
    documents: &[SourceContent],
    metrics: &Metrics,
) -> (Vec<DocumentSummary>, Vec<IdentifiedEntity>) {
    let mut summaries = Vec::with_capacity(documents.len());
    let mut combined = Vec::new();

    for document in documents {
        let timer = TimedOperation::start();
        let entities = extractor.extract(document);
        metrics.record_extract(timer.elapsed(), entities.len());

        summaries.push(DocumentSummary {
            filename: document.filename.clone(),
            doc_id: document.doc_id.clone(),
            entities: entities.len(),
        });
        combined.extend(entities);
    }

    (summaries, assign_ids(combined))
}

fn review_group(group: &DuplicateGroup) -> Result<GroupReport> {
    let session = MergeSession::begin(&group.members)?;
    Ok(GroupReport {
        key: group.key.clone(),
        primary_id: session.primary().id.clone(),
        member_ids: group.ids().map(str::to_string).collect(),
        exposed_fields: session.exposed_fields(),
    })
}

fn merge_all(
    groups: &[DuplicateGroup],
    mut entities: Vec<IdentifiedEntity>,
    metrics: &Metrics,
) -> Result<(Vec<MergeOutcome>, Vec<IdentifiedEntity>)> {
    let mut outcomes = Vec::with_capacity(groups.len());

    for group in groups {
        let outcome = auto_merge(&group.members)
            .with_context(|| format!("Failed to merge group {}", group.key))?;
        debug!(key = %group.key, primary = %outcome.merged.id, "Group merged");

        metrics.record_merge(outcome.removable_ids.len());
        entities = outcome.apply_to(entities);
        outcomes.push(outcome);
    }

    Ok((outcomes, entities))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingest::StructureParser;

    #[test]
    fn test_ids_unique_across_documents() {
        let parser = StructureParser::default();
        let documents = vec![
            parser.parse("session_1.md", "Durnan the barkeep served ale."),
            parser.parse("session_2.md", "Durnan refused to talk."),
        ];
        let (summaries, entities) =
            extract_all(&Extractor::default(), &documents, &Metrics::new());

        assert_eq!(summaries.len(), 2);
        let total: usize = summaries.iter().map(|s| s.entities).sum();
        assert_eq!(total, entities.len());

        let mut ids: Vec<_> = entities.iter().map(|e| e.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), entities.len());
    }
}
