//! Boundary ownership: one owner per boundary-coincident piece.

use gridclip_core::CellId;
use tracing::trace;

/// A clipped geometry that can have other clips removed from it.
pub trait ClipPart: Sized {
    /// This clip with every piece shared with any of `others` removed.
    fn subtract(&self, others: &[&Self]) -> Self;

    /// True when nothing of measure remains.
    fn is_empty(&self) -> bool;
}

/// The clipped part of a shape inside one cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CellClip<G> {
    /// Owning cell.
    pub cellid: CellId,
    /// Clipped geometry.
    pub geometry: G,
}

impl<G> CellClip<G> {
    /// Pair a clip with its cell.
    pub fn new(cellid: CellId, geometry: G) -> Self {
        Self { cellid, geometry }
    }
}

/// Reduce per-cell clips so that shared pieces belong to the lowest cellid.
///
/// Clips are sorted by cellid and visited from the highest to the lowest.
/// Each has the current clips of every other cell subtracted from it; a
/// higher cell therefore loses any piece still held by a lower one, while
/// the lowest cell, visited last, keeps what the others already gave up.
/// Clips left empty are dropped. The result is in ascending cellid order.
pub fn resolve_ownership<G: ClipPart>(mut clips: Vec<CellClip<G>>) -> Vec<CellClip<G>> {
    clips.sort_by_key(|c| c.cellid);
    for i in (0..clips.len()).rev() {
        let reduced = {
            let others: Vec<&G> = clips
                .iter()
                .enumerate()
                .filter(|(j, c)| *j != i && !c.geometry.is_empty())
                .map(|(_, c)| &c.geometry)
                .collect();
            if others.is_empty() {
                continue;
            }
            clips[i].geometry.subtract(&others)
        };
        clips[i].geometry = reduced;
    }
    clips.retain(|c| {
        let keep = !c.geometry.is_empty();
        if !keep {
            trace!(cellid = %c.cellid, "clip owned by a lower cell");
        }
        keep
    });
    clips
}
