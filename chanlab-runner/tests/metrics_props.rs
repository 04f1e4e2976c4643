//! Property tests for summary metrics.

use chanlab_core::domain::{
    ExitReason, PatternClass, PositionId, PositionSide, TradeKind, TradeRecord,
};
use chanlab_runner::metrics::{profit_factor, trades_by_pattern, win_rate};
use chrono::NaiveDate;
use proptest::prelude::*;

fn arb_pattern() -> impl Strategy<Value = PatternClass> {
    prop_oneof![
        Just(PatternClass::First),
        Just(PatternClass::Second),
        Just(PatternClass::Third)
    ]
}

fn make_trade(profit: f64, pattern: PatternClass) -> TradeRecord {
    let time = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    TradeRecord {
        position_id: PositionId(1),
        kind: TradeKind::Sell,
        side: PositionSide::Long,
        pattern,
        entry_time: time,
        entry_price: 100.0,
        time,
        price: 100.0,
        reason: ExitReason::StopLoss,
        size: 1.0,
        profit,
        equity_after: 0.0,
    }
}

proptest! {
    #[test]
    fn ratios_stay_in_range(
        trades in prop::collection::vec((-500.0..500.0_f64, arb_pattern()), 0..40),
    ) {
        let trades: Vec<TradeRecord> =
            trades.into_iter().map(|(p, c)| make_trade(p, c)).collect();

        let wr = win_rate(&trades);
        prop_assert!((0.0..=1.0).contains(&wr));

        let pf = profit_factor(&trades);
        prop_assert!((0.0..=100.0).contains(&pf));

        let counted: usize = trades_by_pattern(&trades).values().sum();
        prop_assert_eq!(counted, trades.len());
    }
}
