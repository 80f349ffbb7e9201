//! In-memory host document.
//!
//! [`MemoryDocument`] implements every collaborator trait against plain
//! data structures shaped like a production document: an ordered palette,
//! drawing nodes with a timed or static exposure column, and frames that
//! expose shared drawing content. It backs the test suite and gives
//! embedders without a live host something to run the engine against.
//!
//! Mutating calls are recorded as [`HostEvent`]s in order, so callers can
//! assert on the exact shape of a run, undo bracketing included.

use std::collections::HashMap;

use rgb::RGBA;

use crate::error::HostError;
use crate::host::{
    ColorSwap, ColumnRef, ContentId, HostResult, NodeRef, PaletteHost, RecolorHost, SceneHost,
    StatusSink, UndoHost,
};
use crate::pot::{ColorPot, PotId, PotKind};

/// Chronological record of one mutating host call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    UndoBegin(String),
    UndoEnd,
    Recolor {
        node: NodeRef,
        frame: u32,
        swaps: Vec<ColorSwap>,
    },
    Remove(PotId),
}

#[derive(Debug, Clone)]
struct MemoryNode {
    handle: NodeRef,
    timed: bool,
    element_column: ColumnRef,
    timing_column: ColumnRef,
}

/// An in-memory palette and scene implementing every host trait.
///
/// Drawing content is shared the way it is in a real document: an exposure
/// column maps frames to content ids, and recoloring a frame mutates the
/// underlying content, so every frame exposing the same cel sees the
/// change at once.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pots: Vec<ColorPot>,
    nodes: Vec<MemoryNode>,
    columns: HashMap<ColumnRef, Vec<ContentId>>,
    drawings: HashMap<ContentId, Vec<PotId>>,
    frame_count: u32,
    events: Vec<HostEvent>,
    status_lines: Vec<String>,
    fail_recolor: bool,
    fail_remove: bool,
}

impl MemoryDocument {
    pub fn new(frame_count: u32) -> Self {
        Self {
            frame_count,
            ..Self::default()
        }
    }

    /// Append a fully opaque solid pot to the palette.
    pub fn add_solid(&mut self, id: &str, r: u8, g: u8, b: u8) -> PotId {
        let pot = ColorPot::solid(id, r, g, b);
        let id = pot.id.clone();
        self.pots.push(pot);
        id
    }

    /// Append a pot with explicit color data and kind.
    pub fn add_pot(&mut self, id: &str, rgba: RGBA<u8>, kind: PotKind) -> PotId {
        let pot = ColorPot::new(PotId::new(id), rgba, kind);
        let id = pot.id.clone();
        self.pots.push(pot);
        id
    }

    /// Add a drawing node. `exposure` lists the content id per frame,
    /// frame 1 first; frames past the end of the slice are blank. A timed
    /// node reads its element column, a static one its timing column.
    pub fn add_node(&mut self, name: &str, timed: bool, exposure: &[&str]) -> NodeRef {
        let handle = NodeRef::new(name);
        let element_column = ColumnRef::new(format!("{name}.element"));
        let timing_column = ColumnRef::new(format!("{name}.timing"));
        let active = if timed {
            element_column.clone()
        } else {
            timing_column.clone()
        };
        self.columns
            .insert(active, exposure.iter().map(|c| ContentId::new(*c)).collect());
        self.nodes.push(MemoryNode {
            handle: handle.clone(),
            timed,
            element_column,
            timing_column,
        });
        handle
    }

    /// Declare which color ids the drawing `content` uses.
    pub fn set_drawing_colors(&mut self, content: &str, ids: &[&str]) {
        self.drawings.insert(
            ContentId::new(content),
            ids.iter().map(|i| PotId::new(*i)).collect(),
        );
    }

    /// Current color ids of one drawing, empty if it never got any.
    pub fn drawing_colors(&self, content: &str) -> &[PotId] {
        self.drawings
            .get(&ContentId::new(content))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Ids currently in the palette, in order.
    pub fn pot_ids(&self) -> Vec<PotId> {
        self.pots.iter().map(|p| p.id.clone()).collect()
    }

    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    pub fn status_lines(&self) -> &[String] {
        &self.status_lines
    }

    /// Make every `recolor` call fail, for exercising abort paths.
    pub fn fail_recolor(&mut self, fail: bool) {
        self.fail_recolor = fail;
    }

    /// Make every `remove_color` call fail, for exercising abort paths.
    pub fn fail_remove(&mut self, fail: bool) {
        self.fail_remove = fail;
    }

    fn node(&self, node: &NodeRef) -> HostResult<&MemoryNode> {
        self.nodes
            .iter()
            .find(|n| &n.handle == node)
            .ok_or_else(|| HostError::new("scene", format!("unknown node {node}")))
    }

    fn active_column(&self, node: &MemoryNode) -> ColumnRef {
        if node.timed {
            node.element_column.clone()
        } else {
            node.timing_column.clone()
        }
    }
}

impl PaletteHost for MemoryDocument {
    fn colors(&self) -> HostResult<Vec<ColorPot>> {
        Ok(self.pots.clone())
    }

    fn color_by_id(&self, id: &PotId) -> HostResult<Option<ColorPot>> {
        Ok(self.pots.iter().find(|p| &p.id == id).cloned())
    }

    fn remove_color(&mut self, id: &PotId) -> HostResult<()> {
        if self.fail_remove {
            return Err(HostError::new("palette", format!("cannot remove {id}")));
        }
        let before = self.pots.len();
        self.pots.retain(|p| &p.id != id);
        if self.pots.len() == before {
            return Err(HostError::new("palette", format!("unknown color {id}")));
        }
        self.events.push(HostEvent::Remove(id.clone()));
        Ok(())
    }
}

impl SceneHost for MemoryDocument {
    fn drawing_nodes(&self) -> HostResult<Vec<NodeRef>> {
        Ok(self.nodes.iter().map(|n| n.handle.clone()).collect())
    }

    fn uses_timing(&self, node: &NodeRef) -> HostResult<bool> {
        Ok(self.node(node)?.timed)
    }

    fn content_column(&self, node: &NodeRef, timed: bool) -> HostResult<ColumnRef> {
        let node = self.node(node)?;
        Ok(if timed {
            node.element_column.clone()
        } else {
            node.timing_column.clone()
        })
    }

    fn content_at(&self, column: &ColumnRef, frame: u32) -> HostResult<ContentId> {
        let cells = self.columns.get(column).map(Vec::as_slice).unwrap_or(&[]);
        Ok(frame
            .checked_sub(1)
            .and_then(|i| cells.get(i as usize))
            .cloned()
            .unwrap_or_else(ContentId::blank))
    }

    fn frame_count(&self) -> HostResult<u32> {
        Ok(self.frame_count)
    }
}

impl RecolorHost for MemoryDocument {
    fn colors_in(&self, node: &NodeRef, frame: u32) -> HostResult<Vec<PotId>> {
        let column = self.active_column(self.node(node)?);
        let content = self.content_at(&column, frame)?;
        Ok(self.drawings.get(&content).cloned().unwrap_or_default())
    }

    fn recolor(&mut self, node: &NodeRef, frame: u32, swaps: &[ColorSwap]) -> HostResult<()> {
        if self.fail_recolor {
            return Err(HostError::new("drawing", "recolor service unavailable"));
        }
        let column = self.active_column(self.node(node)?);
        let content = self.content_at(&column, frame)?;
        self.events.push(HostEvent::Recolor {
            node: node.clone(),
            frame,
            swaps: swaps.to_vec(),
        });
        if let Some(colors) = self.drawings.get_mut(&content) {
            for swap in swaps {
                for id in colors.iter_mut() {
                    if *id == swap.from {
                        *id = swap.to.clone();
                    }
                }
            }
        }
        Ok(())
    }
}

impl UndoHost for MemoryDocument {
    fn begin_undo_group(&mut self, label: &str) -> HostResult<()> {
        self.events.push(HostEvent::UndoBegin(label.to_owned()));
        Ok(())
    }

    fn end_undo_group(&mut self) -> HostResult<()> {
        self.events.push(HostEvent::UndoEnd);
        Ok(())
    }
}

impl StatusSink for MemoryDocument {
    fn status(&mut self, message: &str) {
        self.status_lines.push(message.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_past_the_exposure_are_blank() {
        let mut doc = MemoryDocument::new(4);
        doc.add_node("Top/draw", true, &["a", "b"]);
        let column = ColumnRef::new("Top/draw.element");

        assert_eq!(doc.content_at(&column, 2).unwrap(), ContentId::new("b"));
        assert!(doc.content_at(&column, 3).unwrap().is_blank());
        assert!(doc.content_at(&column, 0).unwrap().is_blank());
    }

    #[test]
    fn recoloring_one_frame_changes_every_frame_sharing_the_cel() {
        let mut doc = MemoryDocument::new(3);
        doc.add_solid("old", 1, 1, 1);
        doc.add_solid("new", 2, 2, 2);
        let node = doc.add_node("Top/draw", true, &["a", "a", "a"]);
        doc.set_drawing_colors("a", &["old"]);

        let swap = ColorSwap {
            from: PotId::new("old"),
            to: PotId::new("new"),
        };
        doc.recolor(&node, 1, std::slice::from_ref(&swap)).unwrap();

        for frame in 1..=3 {
            assert_eq!(doc.colors_in(&node, frame).unwrap(), [PotId::new("new")]);
        }
    }

    #[test]
    fn removing_an_unknown_color_is_a_palette_failure() {
        let mut doc = MemoryDocument::new(0);
        doc.add_solid("a", 1, 1, 1);

        let err = doc.remove_color(&PotId::new("missing")).unwrap_err();
        assert_eq!(err.service(), "palette");
        assert!(doc.events().is_empty());
    }

    #[test]
    fn removal_keeps_palette_order() {
        let mut doc = MemoryDocument::new(0);
        doc.add_solid("a", 1, 1, 1);
        doc.add_solid("b", 2, 2, 2);
        doc.add_solid("c", 3, 3, 3);

        doc.remove_color(&PotId::new("b")).unwrap();
        assert_eq!(doc.pot_ids(), [PotId::new("a"), PotId::new("c")]);
    }

    #[test]
    fn unknown_node_is_a_scene_failure() {
        let doc = MemoryDocument::new(1);
        let err = doc.uses_timing(&NodeRef::new("Top/ghost")).unwrap_err();
        assert_eq!(err.service(), "scene");
    }
}
