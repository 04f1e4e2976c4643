//! Domain types for ChanLab

pub mod bar_time;
pub mod candle;
pub mod position;
pub mod risk_event;
pub mod signal;
pub mod structure;
pub mod timeframe;
pub mod trade;

pub use bar_time::{parse_bar_time, BarTimeError};
pub use candle::Candle;
pub use position::{Position, PositionId, PositionSide};
pub use risk_event::{RiskEvent, RiskEventKind};
pub use signal::{PatternClass, Signal, SignalSide};
pub use structure::{Direction, Fractal, FractalKind, IndicatorSample, Pivot, Stroke};
pub use timeframe::{Timeframe, TimeframeError};
pub use trade::{ExitReason, TradeKind, TradeRecord};
