use std::slice;

use tracing::{trace, warn};

use crate::cluster::MergePlan;
use crate::error::MergeError;
use crate::host::{ColorSwap, PaletteHost, RecolorHost, UndoHost};

/// Apply a planned merge inside one undo-grouping scope.
///
/// Every rewrite lands before any removal, so no drawing ever references a
/// pot the palette no longer has, even if the run dies partway. The scope
/// is closed on success and on failure alike; when both the application
/// and the close fail, the application error wins and the close failure is
/// only logged. An empty plan still opens and closes the scope, so the
/// host's undo history reflects the run either way.
pub fn apply_plan<H>(host: &mut H, plan: &MergePlan, undo_label: &str) -> Result<(), MergeError>
where
    H: PaletteHost + RecolorHost + UndoHost,
{
    host.begin_undo_group(undo_label)?;
    let applied = apply_inner(host, plan);
    let closed = host.end_undo_group();

    match (applied, closed) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(close_err)) => Err(close_err.into()),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            warn!(error = %close_err, "undo scope failed to close after a failed merge");
            Err(err)
        }
    }
}

fn apply_inner<H>(host: &mut H, plan: &MergePlan) -> Result<(), MergeError>
where
    H: PaletteHost + RecolorHost,
{
    for rewrite in &plan.rewrites {
        let swap = ColorSwap {
            from: rewrite.from.clone(),
            to: rewrite.to.clone(),
        };
        trace!(
            node = %rewrite.location.node,
            frame = rewrite.location.frame,
            from = %swap.from,
            to = %swap.to,
            "rewriting reference"
        );
        host.recolor(
            &rewrite.location.node,
            rewrite.location.frame,
            slice::from_ref(&swap),
        )?;
    }

    for id in &plan.removals {
        trace!(color = %id, "removing merged pot");
        host.remove_color(id)?;
    }

    Ok(())
}
