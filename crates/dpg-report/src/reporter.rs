use dpg_actors::Authorizer;
use dpg_settlement::{Engine, Variant};
use dpg_types::{DpgError, EpochIndex, Result};
use serde::{Deserialize, Serialize};

use crate::hashing::{compute_json_hash, HashRef};
use crate::summary::EpochSummary;

/// Epoch report with input/output hashes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochReport {
    pub epoch: EpochIndex,
    pub variant: String,
    pub input_hash: HashRef,
    pub output_hash: HashRef,
    pub report_data: ReportData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub inputs: serde_json::Value,
    pub outputs: serde_json::Value,
}

pub trait Reporter {
    fn publish(
        &self,
        epoch: EpochIndex,
        variant: &str,
        inputs: &serde_json::Value,
        outputs: &serde_json::Value,
    ) -> Result<EpochReport>;
}

/// Reporter that keeps nothing and just hashes what it is given
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryReporter;

impl MemoryReporter {
    pub fn new() -> Self {
        MemoryReporter
    }
}

impl Reporter for MemoryReporter {
    fn publish(
        &self,
        epoch: EpochIndex,
        variant: &str,
        inputs: &serde_json::Value,
        outputs: &serde_json::Value,
    ) -> Result<EpochReport> {
        Ok(EpochReport {
            epoch,
            variant: variant.to_string(),
            input_hash: compute_json_hash(inputs)?,
            output_hash: compute_json_hash(outputs)?,
            report_data: ReportData {
                inputs: inputs.clone(),
                outputs: outputs.clone(),
            },
        })
    }
}

/// Publish the report of `epoch`: its event records as inputs, their
/// [`EpochSummary`] as outputs. Epochs not reached yet have no report.
pub fn report_epoch<S, A, R>(reporter: &R, engine: &Engine<S, A>, epoch: EpochIndex) -> Result<EpochReport>
where
    S: Variant,
    A: Authorizer,
    R: Reporter,
{
    if epoch == 0 || epoch > engine.current_epoch_index() {
        return Err(DpgError::TooEarly(epoch));
    }

    let records = engine.events_in_epoch(epoch);
    let summary = EpochSummary::from_records(epoch, &records)?;

    let inputs =
        serde_json::to_value(&records).map_err(|e| DpgError::Serialization(e.to_string()))?;
    let outputs =
        serde_json::to_value(&summary).map_err(|e| DpgError::Serialization(e.to_string()))?;

    reporter.publish(epoch, S::NAME, &inputs, &outputs)
}
