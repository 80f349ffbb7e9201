use std::collections::HashSet;

use tracing::trace;

use crate::error::MergeError;
use crate::host::{ColumnRef, ContentId, NodeRef, RecolorHost, SceneHost};
use crate::pot::PotId;

/// One de-duplicated place where a color id is used as pixel content.
///
/// Frames exposing the same underlying content are collapsed to the first
/// such frame, so a rewrite issued here reaches every frame showing that
/// cel exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceLocation {
    pub node: NodeRef,
    pub frame: u32,
}

/// Find every location where `id` is used as pixel content.
///
/// Walks every drawing node, resolves the exposure column for the node's
/// timing mode, keeps the first frame of each distinct content id across
/// the whole timeline, and records the frames whose drawing uses `id`. An
/// unused color legitimately resolves to an empty set; it is removed
/// without any rewrite.
///
/// De-duplication is by content identity, which assumes two frames with
/// the same content id expose pixel-identical drawings. That holds for
/// timed exposure and for static nodes, whose column reports one content
/// for the whole timeline.
pub fn find_usages<H>(host: &H, id: &PotId) -> Result<Vec<ReferenceLocation>, MergeError>
where
    H: SceneHost + RecolorHost,
{
    let frame_count = host.frame_count()?;
    let mut locations = Vec::new();

    for node in host.drawing_nodes()? {
        let timed = host.uses_timing(&node)?;
        let column = host.content_column(&node, timed)?;
        for frame in distinct_content_frames(host, &column, frame_count)? {
            if host.colors_in(&node, frame)?.contains(id) {
                trace!(node = %node, frame, color = %id, "reference found");
                locations.push(ReferenceLocation {
                    node: node.clone(),
                    frame,
                });
            }
        }
    }

    Ok(locations)
}

/// First frame of each distinct content id the column exposes.
fn distinct_content_frames<H: SceneHost>(
    host: &H,
    column: &ColumnRef,
    frame_count: u32,
) -> Result<Vec<u32>, MergeError> {
    let mut seen: HashSet<ContentId> = HashSet::new();
    let mut frames = Vec::new();
    for frame in 1..=frame_count {
        if seen.insert(host.content_at(column, frame)?) {
            frames.push(frame);
        }
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocument;

    #[test]
    fn held_cels_collapse_to_their_first_frame() {
        let mut doc = MemoryDocument::new(4);
        doc.add_solid("ink", 0, 0, 0);
        let node = doc.add_node("Top/draw", true, &["a", "a", "b", "b"]);
        doc.set_drawing_colors("a", &["ink"]);
        doc.set_drawing_colors("b", &["ink"]);

        let found = find_usages(&doc, &PotId::new("ink")).unwrap();
        assert_eq!(
            found,
            [
                ReferenceLocation {
                    node: node.clone(),
                    frame: 1
                },
                ReferenceLocation { node, frame: 3 },
            ]
        );
    }

    #[test]
    fn a_cel_reappearing_later_is_not_revisited() {
        let mut doc = MemoryDocument::new(3);
        doc.add_solid("ink", 0, 0, 0);
        let node = doc.add_node("Top/draw", true, &["a", "b", "a"]);
        doc.set_drawing_colors("a", &["ink"]);

        let found = find_usages(&doc, &PotId::new("ink")).unwrap();
        assert_eq!(found, [ReferenceLocation { node, frame: 1 }]);
    }

    #[test]
    fn static_nodes_report_one_location() {
        let mut doc = MemoryDocument::new(5);
        doc.add_solid("ink", 0, 0, 0);
        let node = doc.add_node("Top/matte", false, &["m"; 5]);
        doc.set_drawing_colors("m", &["ink"]);

        let found = find_usages(&doc, &PotId::new("ink")).unwrap();
        assert_eq!(found, [ReferenceLocation { node, frame: 1 }]);
    }

    #[test]
    fn unused_color_resolves_to_an_empty_set() {
        let mut doc = MemoryDocument::new(2);
        doc.add_solid("ink", 0, 0, 0);
        doc.add_node("Top/draw", true, &["a", "a"]);
        doc.set_drawing_colors("a", &["ink"]);

        assert!(find_usages(&doc, &PotId::new("unused")).unwrap().is_empty());
    }

    #[test]
    fn empty_timeline_yields_no_locations() {
        let mut doc = MemoryDocument::new(0);
        doc.add_solid("ink", 0, 0, 0);
        doc.add_node("Top/draw", true, &[]);

        assert!(find_usages(&doc, &PotId::new("ink")).unwrap().is_empty());
    }
}
