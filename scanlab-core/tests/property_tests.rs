//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. Normalized series are strictly increasing with first-wins dedup
//! 2. Alignment keeps the index, shifts by one and leaves bar 0 empty
//! 3. Recency verdicts follow the window arithmetic exactly

use std::collections::HashMap;

use proptest::prelude::*;
use scanlab_core::data::Normalizer;
use scanlab_core::domain::{Bar, SignalSet};
use scanlab_core::signals::{align_flags, RecencyWindow};

// ── Strategies (proptest) ────────────────────────────────────────────

/// Rows as (minute offset from a base instant, open price). Offsets collide often.
fn arb_rows() -> impl Strategy<Value = Vec<(u16, u32)>> {
    prop::collection::vec((0u16..60, 1u32..10_000), 0..80)
}

fn to_csv(rows: &[(u16, u32)]) -> String {
    let base = chrono::DateTime::parse_from_rfc3339("2024-05-02T01:00:00+00:00").unwrap();
    let mut out = String::from("Datetime,Open,High,Low,Close,Volume\n");
    for &(minute, open) in rows {
        let ts = base + chrono::Duration::minutes(minute as i64 * 5);
        out.push_str(&format!("{},{open},{open},{open},{open},1\n", ts.to_rfc3339()));
    }
    out
}

fn index_of(n: usize) -> Vec<chrono::DateTime<chrono::FixedOffset>> {
    let base = chrono::DateTime::parse_from_rfc3339("2024-05-02T09:00:00+08:00").unwrap();
    (0..n)
        .map(|i| base + chrono::Duration::minutes(5 * i as i64))
        .collect()
}

// ── 1. Normalization ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn normalized_timestamps_strictly_increase(rows in arb_rows()) {
        prop_assume!(!rows.is_empty());
        let series = Normalizer::default().normalize_csv("P", "prop", &to_csv(&rows)).unwrap();
        for pair in series.bars.windows(2) {
            prop_assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence(rows in arb_rows()) {
        prop_assume!(!rows.is_empty());
        let series = Normalizer::default().normalize_csv("P", "prop", &to_csv(&rows)).unwrap();

        let mut first: HashMap<u16, u32> = HashMap::new();
        for &(minute, open) in &rows {
            first.entry(minute).or_insert(open);
        }
        prop_assert_eq!(series.len(), first.len());

        let base = chrono::DateTime::parse_from_rfc3339("2024-05-02T01:00:00+00:00").unwrap();
        for bar in &series.bars {
            let minute = ((bar.timestamp - base).num_minutes() / 5) as u16;
            prop_assert_eq!(bar.open, first[&minute] as f64);
        }
    }

    #[test]
    fn every_bar_is_in_the_target_offset(rows in arb_rows()) {
        prop_assume!(!rows.is_empty());
        let normalizer = Normalizer::default();
        let series = normalizer.normalize_csv("P", "prop", &to_csv(&rows)).unwrap();
        prop_assert!(series.bars.iter().all(|b: &Bar| *b.timestamp.offset() == normalizer.offset()));
    }
}

// ── 2. Alignment ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn alignment_preserves_length_and_shifts(flags in prop::collection::vec(any::<bool>(), 0..200)) {
        let index = index_of(flags.len() + 1);
        let aligned = align_flags(&flags, &index).unwrap();

        prop_assert_eq!(aligned.len(), index.len());
        prop_assert_eq!(&aligned.index, &index);
        prop_assert!(!aligned.flags[0]);
        prop_assert_eq!(&aligned.flags[1..], &flags[..]);
    }

    #[test]
    fn alignment_is_deterministic(flags in prop::collection::vec(any::<bool>(), 0..50)) {
        let index = index_of(flags.len() + 1);
        prop_assert_eq!(align_flags(&flags, &index).unwrap(), align_flags(&flags, &index).unwrap());
    }

    #[test]
    fn wrong_length_always_fails(n in 0usize..50, extra in 1usize..5) {
        let index = index_of(n);
        let flags = vec![false; n.saturating_sub(1) + extra];
        prop_assert!(align_flags(&flags, &index).is_err());
    }
}

// ── 3. Recency ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn recency_matches_window_arithmetic(
        n in 1usize..500,
        window in 1usize..100,
        buys in prop::collection::vec(0usize..500, 0..5),
    ) {
        let buys: Vec<usize> = buys.into_iter().filter(|&b| b < n).collect();
        let signals = SignalSet { buy_indices: buys.clone(), ..Default::default() };
        let verdict = RecencyWindow::new(window).classify(&signals, n);

        let expected = buys.last().is_some_and(|&last| n - last < window);
        prop_assert_eq!(verdict.should_buy, expected);
        prop_assert!(!verdict.should_sell);
    }
}
