use tracing::debug;

use crate::error::MergeError;
use crate::host::PaletteHost;
use crate::pot::ColorPot;

/// Ordered snapshot of the pots eligible for merging.
///
/// Order is the palette's display order, and it decides survivorship: of
/// two similar pots, the earlier one absorbs the later one.
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    pots: Vec<ColorPot>,
}

impl WorkingSet {
    /// Build a set directly from pots already known to be eligible.
    pub fn from_pots(pots: Vec<ColorPot>) -> Self {
        Self { pots }
    }

    pub fn pots(&self) -> &[ColorPot] {
        &self.pots
    }

    pub fn len(&self) -> usize {
        self.pots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pots.is_empty()
    }
}

/// Snapshot the palette's eligible pots, in palette order.
///
/// Gradient pots and pots with any transparency are skipped, not rejected:
/// their presence in the palette is normal, they just never take part in a
/// merge. An empty result is valid and yields an empty plan downstream.
pub fn load_working_set<H: PaletteHost>(host: &H) -> Result<WorkingSet, MergeError> {
    let all = host.colors()?;
    let total = all.len();
    let pots: Vec<ColorPot> = all.into_iter().filter(ColorPot::is_opaque_solid).collect();
    debug!(eligible = pots.len(), total, "loaded palette working set");
    Ok(WorkingSet { pots })
}
