//! In-memory replay of recorded frames.

use super::{FeedError, FeedView, StructuralFeed, StructureState, TapeFrame};

/// Replays a fixed list of frames, one per `advance()`.
#[derive(Debug, Clone)]
pub struct ReplayFeed {
    name: String,
    frames: std::vec::IntoIter<TapeFrame>,
    state: StructureState,
    is_open: bool,
}

impl ReplayFeed {
    pub fn new(name: impl Into<String>, frames: Vec<TapeFrame>) -> Self {
        Self {
            name: name.into(),
            frames: frames.into_iter(),
            state: StructureState::new(),
            is_open: false,
        }
    }

    /// Frames not yet consumed.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl StructuralFeed for ReplayFeed {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> Result<(), FeedError> {
        self.is_open = true;
        Ok(())
    }

    fn advance(&mut self) -> Result<bool, FeedError> {
        if !self.is_open {
            return Err(FeedError::NotOpen {
                feed: self.name.clone(),
            });
        }
        match self.frames.next() {
            Some(frame) => {
                self.state.apply(frame)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn view(&self) -> FeedView<'_> {
        self.state.view()
    }

    fn close(&mut self) {
        self.is_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Candle, IndicatorSample};
    use chrono::NaiveDate;

    fn frames(n: u32) -> Vec<TapeFrame> {
        (0..n)
            .map(|i| {
                let time = NaiveDate::from_ymd_opt(2024, 1, 2 + i)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap();
                let close = 100.0 + f64::from(i);
                TapeFrame::new(
                    Candle::new(time, close, close + 1.0, close - 1.0, close),
                    IndicatorSample::new(0.0, 0.0, 0.0),
                )
            })
            .collect()
    }

    #[test]
    fn advance_requires_open() {
        let mut feed = ReplayFeed::new("test", frames(2));
        assert!(matches!(feed.advance(), Err(FeedError::NotOpen { .. })));
    }

    #[test]
    fn replays_then_exhausts() {
        let mut feed = ReplayFeed::new("test", frames(2));
        feed.open().unwrap();
        assert!(feed.advance().unwrap());
        assert_eq!(feed.view().latest_close(), Some(100.0));
        assert!(feed.advance().unwrap());
        assert_eq!(feed.view().latest_close(), Some(101.0));
        assert!(!feed.advance().unwrap());
        assert_eq!(feed.remaining(), 0);
        // View still reflects the last step after exhaustion.
        assert_eq!(feed.view().candles().len(), 2);
    }

    #[test]
    fn close_stops_further_advances() {
        let mut feed = ReplayFeed::new("test", frames(3));
        feed.open().unwrap();
        feed.advance().unwrap();
        feed.close();
        assert!(feed.advance().is_err());
    }
}
