//! Host collaborator traits.
//!
//! The engine never talks to a live document directly; everything it needs
//! is behind the five narrow traits here, so a production integration and
//! the in-memory document in [`crate::memory`] are interchangeable. All
//! fallible calls return [`HostResult`]; any failure aborts the run.

use std::fmt;

use crate::error::HostError;
use crate::pot::{ColorPot, PotId};

pub type HostResult<T> = Result<T, HostError>;

/// Handle to one drawing-producing node in the host's scene graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeRef(String);

impl NodeRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to the column that decides which content a node exposes per frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef(String);

impl ColumnRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of the drawing content a column exposes at one frame.
///
/// Consecutive frames holding the same id show the same drawing (a held
/// cel); the empty id means nothing is exposed there.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn blank() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One id replacement to perform inside a drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSwap {
    pub from: PotId,
    pub to: PotId,
}

/// Read and write access to the palette under merge.
pub trait PaletteHost {
    /// Every pot of the palette, in display order. Order matters: it
    /// decides which pot of a similar pair survives.
    fn colors(&self) -> HostResult<Vec<ColorPot>>;

    /// Look up one pot. `Ok(None)` means the id is unknown to the
    /// palette, which is not a host failure.
    fn color_by_id(&self, id: &PotId) -> HostResult<Option<ColorPot>>;

    /// Remove a pot from the palette.
    fn remove_color(&mut self, id: &PotId) -> HostResult<()>;
}

/// Read access to the scene graph and its exposure columns.
pub trait SceneHost {
    /// Every node that produces drawings, in scene order.
    fn drawing_nodes(&self) -> HostResult<Vec<NodeRef>>;

    /// Whether the node exposes per-frame timed content. A node that does
    /// not is static: it shows one linked drawing regardless of frame.
    fn uses_timing(&self, node: &NodeRef) -> HostResult<bool>;

    /// The column carrying the node's exposure for the given timing mode.
    fn content_column(&self, node: &NodeRef, timed: bool) -> HostResult<ColumnRef>;

    /// Content the column exposes at `frame`. Frames are 1-based.
    fn content_at(&self, column: &ColumnRef, frame: u32) -> HostResult<ContentId>;

    /// Number of frames in the scene's timeline.
    fn frame_count(&self) -> HostResult<u32>;
}

/// Inspection and rewriting of drawing pixel content.
pub trait RecolorHost {
    /// Ids of every pot the drawing at (`node`, `frame`) actually uses.
    fn colors_in(&self, node: &NodeRef, frame: u32) -> HostResult<Vec<PotId>>;

    /// Apply the swaps to the drawing exposed at (`node`, `frame`). The
    /// rewrite reaches the underlying content, so every frame exposing the
    /// same cel changes with it.
    fn recolor(&mut self, node: &NodeRef, frame: u32, swaps: &[ColorSwap]) -> HostResult<()>;
}

/// The host's undo-grouping boundary.
///
/// Calls must balance: every successful `begin_undo_group` is paired with
/// exactly one `end_undo_group`, whatever happens in between.
pub trait UndoHost {
    fn begin_undo_group(&mut self, label: &str) -> HostResult<()>;

    fn end_undo_group(&mut self) -> HostResult<()>;
}

/// Receiver for the run's user-facing summary line.
pub trait StatusSink {
    fn status(&mut self, message: &str);
}

/// Source of the user-chosen tolerance for an interactive run.
pub trait TolerancePrompt {
    /// Ask the user for a tolerance. `None` means they cancelled; the run
    /// ends with no side effects at all.
    fn request_tolerance(&mut self) -> Option<u8>;
}

/// Everything a merge run needs from its host, as one bound.
pub trait MergeHost: PaletteHost + SceneHost + RecolorHost + UndoHost + StatusSink {}

impl<T> MergeHost for T where T: PaletteHost + SceneHost + RecolorHost + UndoHost + StatusSink {}
