use std::collections::HashSet;

use tracing::debug;

use crate::catalog::WorkingSet;
use crate::error::MergeError;
use crate::host::{RecolorHost, SceneHost};
use crate::pot::PotId;
use crate::similarity::{Tolerance, is_similar};
use crate::usage::{ReferenceLocation, find_usages};

/// One pending reference rewrite: `location` stops using `from` and uses
/// `to` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub location: ReferenceLocation,
    pub from: PotId,
    pub to: PotId,
}

/// Everything a run decided, before any mutation.
///
/// Rewrites come first when applied; removals only ever name pots whose
/// references have all been planned away.
#[derive(Debug, Clone, Default)]
pub struct MergePlan {
    pub rewrites: Vec<Rewrite>,
    pub removals: Vec<PotId>,
}

impl MergePlan {
    pub fn is_empty(&self) -> bool {
        self.rewrites.is_empty() && self.removals.is_empty()
    }
}

/// Cluster the working set and plan the merge.
///
/// One pass in palette order. The earliest pot not yet absorbed becomes
/// the survivor of its cluster; every later unabsorbed pot within
/// tolerance of it is marked as a casualty, its usages are resolved, and a
/// rewrite to the survivor is planned for each one. A casualty is never
/// reconsidered, so similarity does not chain: a pot near a casualty but
/// not near the survivor keeps its own entry.
///
/// Nothing is mutated here. The decisions are applied by
/// [`apply_plan`](crate::transaction::apply_plan).
pub fn plan_merge<H>(
    host: &H,
    working_set: &WorkingSet,
    tolerance: Tolerance,
) -> Result<MergePlan, MergeError>
where
    H: SceneHost + RecolorHost,
{
    let pots = working_set.pots();
    let mut absorbed: HashSet<PotId> = HashSet::with_capacity(pots.len());
    let mut plan = MergePlan::default();

    for (index, survivor) in pots.iter().enumerate() {
        if absorbed.contains(&survivor.id) {
            continue;
        }
        for candidate in &pots[index + 1..] {
            if absorbed.contains(&candidate.id) {
                continue;
            }
            if !is_similar(survivor, candidate, tolerance) {
                continue;
            }

            absorbed.insert(candidate.id.clone());
            debug!(casualty = %candidate.id, survivor = %survivor.id, "pots match");
            for location in find_usages(host, &candidate.id)? {
                plan.rewrites.push(Rewrite {
                    location,
                    from: candidate.id.clone(),
                    to: survivor.id.clone(),
                });
            }
            plan.removals.push(candidate.id.clone());
        }
    }

    debug!(
        removals = plan.removals.len(),
        rewrites = plan.rewrites.len(),
        "merge planned"
    );
    Ok(plan)
}
