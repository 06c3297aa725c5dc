//! Batch driver shared by both stages
//!
//! Loads the whole dataset, transforms every record in input order, and
//! writes the whole result. The first failing record aborts the run before
//! anything is written.

use crate::dataset::{Dataset, DatasetError};
use crate::nlp::NlpError;
use crate::record::{RecordError, StoryRecord};
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors from transforming a single record
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Nlp(#[from] NlpError),
}

/// Errors that abort a batch run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: StageError,
    },
}

/// Result type for batch runs
pub type PipelineResult<T> = Result<T, PipelineError>;

/// A per-record transformation.
///
/// Implementations must not depend on any other record: each call sees one
/// record and returns it with its derived fields added.
pub trait RecordStage {
    /// Progress description shown while the stage runs
    fn label(&self) -> &str;

    fn process(&self, record: StoryRecord) -> Result<StoryRecord, StageError>;
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchReport {
    pub records: usize,
    pub elapsed: Duration,
}

/// Apply a stage to every record, preserving order.
pub fn process_dataset(stage: &dyn RecordStage, dataset: Dataset) -> PipelineResult<Dataset> {
    let total = dataset.len();
    let step = progress_step(total);
    tracing::info!(stage = stage.label(), records = total, "starting");

    let mut processed = Vec::with_capacity(total);
    for (index, record) in dataset.into_records().into_iter().enumerate() {
        let _span = tracing::debug_span!("record", index).entered();
        let record = stage
            .process(record)
            .map_err(|source| PipelineError::Record { index, source })?;
        processed.push(record);

        let done = index + 1;
        tracing::debug!("processed");
        if done % step == 0 || done == total {
            tracing::info!(
                stage = stage.label(),
                "{}/{} ({}%)",
                done,
                total,
                done * 100 / total
            );
        }
    }

    Ok(Dataset::new(processed))
}

/// Load `input`, apply the stage, and write `output`.
pub fn run_stage(
    stage: &dyn RecordStage,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> PipelineResult<BatchReport> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let started = Instant::now();

    let dataset = Dataset::load(input)?;
    tracing::debug!(path = %input.display(), records = dataset.len(), "loaded dataset");

    let processed = process_dataset(stage, dataset)?;
    processed.save(output)?;

    let report = BatchReport {
        records: processed.len(),
        elapsed: started.elapsed(),
    };
    tracing::info!(
        stage = stage.label(),
        records = report.records,
        elapsed_ms = report.elapsed.as_millis() as u64,
        path = %output.display(),
        "finished"
    );
    Ok(report)
}

/// Report roughly every tenth of the dataset.
fn progress_step(total: usize) -> usize {
    (total / 10).max(1)
}
