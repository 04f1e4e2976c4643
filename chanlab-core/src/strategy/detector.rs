//! Signal detector: fixed table of first/second/third-type rules.
//!
//! Rules are a closed enum evaluated in a fixed order, buys before sells and
//! lower pattern classes first. A rule that lacks the history it needs yields
//! nothing; detection never fails.

use crate::domain::{PatternClass, Signal, SignalSide};
use crate::feed::FeedView;

use super::trend::TrendState;

/// Strokes needed before a first-type reversal can be judged.
const FIRST_MIN_STROKES: usize = 3;
/// Strokes needed before a second-type pivot breakout can be judged.
const SECOND_MIN_STROKES: usize = 5;
/// Pivots a second-type breakout is measured against.
const SECOND_PIVOT_LOOKBACK: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalRule {
    FirstBuy,
    SecondBuy,
    ThirdBuy,
    FirstSell,
    SecondSell,
    ThirdSell,
}

impl SignalRule {
    /// Evaluation order.
    pub const ALL: [SignalRule; 6] = [
        Self::FirstBuy,
        Self::SecondBuy,
        Self::ThirdBuy,
        Self::FirstSell,
        Self::SecondSell,
        Self::ThirdSell,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::FirstBuy => "first_buy",
            Self::SecondBuy => "second_buy",
            Self::ThirdBuy => "third_buy",
            Self::FirstSell => "first_sell",
            Self::SecondSell => "second_sell",
            Self::ThirdSell => "third_sell",
        }
    }

    pub fn side(&self) -> SignalSide {
        match self {
            Self::FirstBuy | Self::SecondBuy | Self::ThirdBuy => SignalSide::Buy,
            Self::FirstSell | Self::SecondSell | Self::ThirdSell => SignalSide::Sell,
        }
    }

    pub fn pattern(&self) -> PatternClass {
        match self {
            Self::FirstBuy | Self::FirstSell => PatternClass::First,
            Self::SecondBuy | Self::SecondSell => PatternClass::Second,
            Self::ThirdBuy | Self::ThirdSell => PatternClass::Third,
        }
    }

    /// Apply this rule to the current view. Only third-type rules consult the trend.
    pub fn evaluate(&self, view: &FeedView<'_>, trend: TrendState) -> Option<Signal> {
        let level = match self {
            Self::FirstBuy => first_type(view, SignalSide::Buy),
            Self::FirstSell => first_type(view, SignalSide::Sell),
            Self::SecondBuy => second_type(view, SignalSide::Buy),
            Self::SecondSell => second_type(view, SignalSide::Sell),
            Self::ThirdBuy => third_type(view, SignalSide::Buy, trend),
            Self::ThirdSell => third_type(view, SignalSide::Sell, trend),
        }?;
        Some(Signal::new(self.side(), self.pattern(), level))
    }
}

/// Divergence reversal: the newest stroke turns without making a new extreme.
fn first_type(view: &FeedView<'_>, side: SignalSide) -> Option<f64> {
    let strokes = view.strokes();
    if strokes.len() < FIRST_MIN_STROKES {
        return None;
    }
    let [.., prior, last] = strokes else {
        return None;
    };
    match side {
        SignalSide::Buy => (prior.is_down() && last.is_up() && last.low > prior.low)
            .then_some(prior.low),
        SignalSide::Sell => (prior.is_up() && last.is_down() && last.high < prior.high)
            .then_some(prior.high),
    }
}

/// Pivot breakout: the newest stroke clears one of the recent pivots.
fn second_type(view: &FeedView<'_>, side: SignalSide) -> Option<f64> {
    let strokes = view.strokes();
    if strokes.len() < SECOND_MIN_STROKES {
        return None;
    }
    let last = strokes.last()?;
    let pivots = view.recent_pivots(SECOND_PIVOT_LOOKBACK);
    match side {
        SignalSide::Buy if last.is_up() => pivots
            .iter()
            .find(|p| last.high > p.high)
            .map(|p| p.low),
        SignalSide::Sell if last.is_down() => pivots
            .iter()
            .find(|p| last.low < p.low)
            .map(|p| p.high),
        _ => None,
    }
}

/// Trend continuation: price leaves the last pivot with accelerating momentum.
fn third_type(view: &FeedView<'_>, side: SignalSide, trend: TrendState) -> Option<f64> {
    let pivot = view.pivots().last()?;
    let close = view.latest_close()?;
    let [.., two_back, _, latest] = view.indicators() else {
        return None;
    };
    match side {
        SignalSide::Buy => (trend == TrendState::Up
            && close > pivot.high
            && latest.histogram > two_back.histogram
            && latest.dif > latest.dea)
            .then_some(pivot.high),
        SignalSide::Sell => (trend == TrendState::Down
            && close < pivot.low
            && latest.histogram < two_back.histogram
            && latest.dif < latest.dea)
            .then_some(pivot.low),
    }
}

/// Runs the rule table against a view.
#[derive(Debug, Clone)]
pub struct SignalDetector {
    rules: Vec<SignalRule>,
}

impl Default for SignalDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalDetector {
    /// Detector with every rule enabled.
    pub fn new() -> Self {
        Self::with_rules(SignalRule::ALL.to_vec())
    }

    /// Detector restricted to a subset of rules, still evaluated in table order.
    pub fn with_rules(mut rules: Vec<SignalRule>) -> Self {
        rules.sort_by_key(|r| SignalRule::ALL.iter().position(|a| a == r));
        rules.dedup();
        Self { rules }
    }

    pub fn rules(&self) -> &[SignalRule] {
        &self.rules
    }

    pub fn detect(&self, view: &FeedView<'_>, trend: TrendState) -> Vec<Signal> {
        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(view, trend))
            .collect()
    }
}
