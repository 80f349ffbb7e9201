#![forbid(unsafe_code)]

pub mod catalog;
pub mod cluster;
pub mod error;
pub mod host;
pub mod memory;
pub mod pot;
pub mod similarity;
pub mod transaction;
pub mod usage;

pub use error::{HostError, MergeError};
pub use pot::{ColorPot, PotId, PotKind};
pub use similarity::{DEFAULT_TOLERANCE, Tolerance};

use tracing::info;

use crate::cluster::MergePlan;
use crate::host::{MergeHost, TolerancePrompt};

/// Undo-scope label hosts show next to the merge in their edit history.
pub const DEFAULT_UNDO_LABEL: &str = "Merge Similar Colors";

/// Configuration for one merge run.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Largest acceptable average per-channel difference (1..=255).
    pub tolerance: u8,
    /// Label for the undo scope the run is wrapped in.
    pub undo_label: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            undo_label: DEFAULT_UNDO_LABEL.to_owned(),
        }
    }
}

impl MergeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tolerance(mut self, value: u8) -> Self {
        self.tolerance = value;
        self
    }

    pub fn undo_label(mut self, label: impl Into<String>) -> Self {
        self.undo_label = label.into();
        self
    }
}

/// What one completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    removed: Vec<PotId>,
    rewrites: usize,
}

impl MergeReport {
    /// Ids of the pots that were merged away, in removal order.
    pub fn removed_ids(&self) -> &[PotId] {
        &self.removed
    }

    /// Number of pots merged away.
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    /// Number of reference rewrites performed across the scene.
    pub fn rewrite_count(&self) -> usize {
        self.rewrites
    }

    /// The summary line sent to the host's status log, phrased exactly as
    /// hosts have always shown it.
    pub fn summary(&self) -> String {
        format!("Merged {} colors", self.removed.len())
    }

    fn from_plan(plan: MergePlan) -> Self {
        Self {
            rewrites: plan.rewrites.len(),
            removed: plan.removals,
        }
    }
}

/// Result of an interactive run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The user dismissed the tolerance prompt; nothing was touched.
    Cancelled,
    /// The merge ran to completion.
    Completed(MergeReport),
}

/// Merge perceptually similar palette colors with a known tolerance.
///
/// Loads the eligible pots, clusters them, then applies every reference
/// rewrite and removal inside one undo scope. On success the host's status
/// log receives one summary line.
///
/// Any host failure aborts the run and propagates; partially applied work
/// stays inside the undo scope, which is closed regardless.
pub fn merge_similar_colors<H: MergeHost>(
    host: &mut H,
    config: &MergeConfig,
) -> Result<MergeReport, MergeError> {
    let tolerance = Tolerance::from_user(config.tolerance)?;

    // 1. Snapshot the eligible pots in palette order
    let working_set = catalog::load_working_set(host)?;

    // 2. Cluster and resolve references; no mutation yet
    let plan = cluster::plan_merge(host, &working_set, tolerance)?;

    // 3. Rewrite, then remove, inside one undo scope
    transaction::apply_plan(host, &plan, &config.undo_label)?;

    let report = MergeReport::from_plan(plan);
    host.status(&report.summary());
    info!(
        removed = report.removed_count(),
        rewrites = report.rewrite_count(),
        "palette merge complete"
    );
    Ok(report)
}

/// Merge interactively: ask `prompt` for the tolerance, then run.
///
/// Cancelling the prompt ends the run before anything is read or written;
/// no undo scope is opened and no summary is logged.
pub fn merge_with_prompt<H, P>(host: &mut H, prompt: &mut P) -> Result<MergeOutcome, MergeError>
where
    H: MergeHost,
    P: TolerancePrompt,
{
    let Some(value) = prompt.request_tolerance() else {
        info!("merge cancelled at the tolerance prompt");
        return Ok(MergeOutcome::Cancelled);
    };

    let config = MergeConfig::new().tolerance(value);
    merge_similar_colors(host, &config).map(MergeOutcome::Completed)
}
