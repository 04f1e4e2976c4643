//! Exit monitor: reversal-fractal exits.
//!
//! A top fractal confirmed at the latest candle closes every open long; a
//! bottom fractal closes every open short. The monitor only reads a snapshot
//! of the open positions and returns close actions for the caller to apply.

use crate::domain::{ExitReason, FractalKind, Position, PositionId};
use crate::feed::FeedView;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExitMonitor;

impl ExitMonitor {
    /// Fractals required before any exit is considered.
    pub const MIN_FRACTALS: usize = 3;

    pub fn check(
        &self,
        view: &FeedView<'_>,
        positions: &[Position],
    ) -> Vec<(PositionId, ExitReason)> {
        let fractals = view.fractals();
        if fractals.len() < Self::MIN_FRACTALS {
            return Vec::new();
        }
        let (Some(latest), Some(step)) = (fractals.last(), view.latest_index()) else {
            return Vec::new();
        };
        // A fractal confirmed on an earlier candle was already acted on.
        if latest.formed_at != step {
            return Vec::new();
        }

        positions
            .iter()
            .filter(|p| match latest.kind {
                FractalKind::Top => p.is_long(),
                FractalKind::Bottom => p.is_short(),
            })
            .map(|p| (p.id, ExitReason::ReversalFractal))
            .collect()
    }
}
