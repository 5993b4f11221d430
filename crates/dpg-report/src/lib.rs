mod hashing;
mod reporter;
mod summary;

pub use hashing::{compute_hash, compute_json_hash, HashRef};
pub use reporter::{report_epoch, EpochReport, MemoryReporter, ReportData, Reporter};
pub use summary::EpochSummary;

#[cfg(test)]
mod tests;
