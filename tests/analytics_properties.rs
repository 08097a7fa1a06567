//! Property tests for the return, correlation and beta calculators
//!
//! These tests check the invariants every result must satisfy over generated
//! price paths, plus the worked examples users rely on.

use proptest::prelude::*;

use pricelens_core::{
    compute_beta, compute_returns, correlation_matrix, split_ticker_list, BetaEstimate,
    PricePoint, PriceSeries, PriceTable, Symbol, TradingDate, UndefinedReason,
};

fn symbol_of(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

fn series_from(symbol: &str, closes: &[f64]) -> PriceSeries {
    let start = TradingDate::parse("2023-01-02").expect("date").into_inner();
    let points = closes
        .iter()
        .enumerate()
        .map(|(offset, &close)| PricePoint {
            date: TradingDate::new(start + time::Duration::days(offset as i64)),
            close,
        })
        .collect();
    PriceSeries::new(symbol_of(symbol), points)
}

/// Closes of a walk starting at 100 with the given step factors.
fn walk(factors: &[f64]) -> Vec<f64> {
    let mut price = 100.0;
    let mut closes = Vec::with_capacity(factors.len() + 1);
    closes.push(price);
    for factor in factors {
        price *= factor;
        closes.push(price);
    }
    closes
}

/// Daily step factors; zero-length walks give a single close.
fn steps(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.8f64..1.25, len)
}

fn close_to(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0)
}

// =============================================================================
// Returns
// =============================================================================

#[test]
fn worked_example_matches_hand_calculation() {
    // Given: Closes of 100, 110 and 99
    let returns = compute_returns(&series_from("AAPL", &[100.0, 110.0, 99.0]));

    // Then: Daily returns are +10% and -10%, cumulative ends at -1%
    let daily: Vec<Option<f64>> = returns.points.iter().map(|p| p.daily_return).collect();
    let cumulative: Vec<Option<f64>> = returns
        .points
        .iter()
        .map(|p| p.cumulative_return)
        .collect();

    assert_eq!(daily[0], None);
    assert!((daily[1].expect("defined") - 0.10).abs() < 1e-12);
    assert!((daily[2].expect("defined") + 0.10).abs() < 1e-12);
    assert_eq!(cumulative[0], None);
    assert!((cumulative[1].expect("defined") - 0.10).abs() < 1e-12);
    assert!((cumulative[2].expect("defined") + 0.01).abs() < 1e-12);
}

#[test]
fn empty_series_has_no_returns() {
    let returns = compute_returns(&series_from("NONE", &[]));

    assert!(returns.points.is_empty());
    assert_eq!(returns.daily_returns().count(), 0);
    assert_eq!(returns.total_return(), None);
}

proptest! {
    #[test]
    fn every_series_has_n_minus_one_returns_and_telescoping_cumulative(factors in steps(0..60)) {
        let closes = walk(&factors);
        let returns = compute_returns(&series_from("WALK", &closes));

        prop_assert_eq!(returns.daily_returns().count(), closes.len() - 1);

        if closes.len() < 2 {
            prop_assert_eq!(returns.total_return(), None);
        } else {
            let expected = closes[closes.len() - 1] / closes[0] - 1.0;
            let actual = returns.total_return().expect("defined");
            prop_assert!(close_to(actual, expected), "{} vs {}", actual, expected);
        }

        // 1 + cumulative equals the running product at every row.
        let mut product = 1.0;
        for point in returns.points.iter().skip(1) {
            product *= 1.0 + point.daily_return.expect("defined");
            let cumulative = point.cumulative_return.expect("defined");
            prop_assert!(close_to(1.0 + cumulative, product));
        }
    }

    #[test]
    fn repeated_prices_give_zero_returns(close in 0.01f64..10_000.0, len in 2usize..30) {
        let returns = compute_returns(&series_from("FLAT", &vec![close; len]));

        prop_assert!(returns.daily_returns().all(|(_, value)| value == 0.0));
        prop_assert_eq!(returns.total_return(), Some(0.0));
    }
}

// =============================================================================
// Correlation
// =============================================================================

proptest! {
    #[test]
    fn correlation_matrix_is_symmetric_bounded_with_unit_diagonal(
        walks in (1usize..40).prop_flat_map(|len| prop::collection::vec(steps(len..len + 1), 4))
    ) {
        let mut table = PriceTable::new();
        for (name, factors) in ["AAA", "BBB", "CCC", "DDD"].iter().zip(&walks) {
            table.insert(series_from(name, &walk(factors)));
        }

        let matrix = correlation_matrix(&table);

        for i in 0..matrix.len() {
            prop_assert_eq!(matrix.values[i][i], 1.0);
            for j in 0..matrix.len() {
                let value = matrix.values[i][j];
                prop_assert!((-1.0..=1.0).contains(&value), "r[{}][{}] = {}", i, j, value);
                prop_assert_eq!(value, matrix.values[j][i]);
            }
        }
    }
}

#[test]
fn constant_series_has_undefined_self_correlation() {
    let mut table = PriceTable::new();
    table.insert(series_from("FLAT", &[5.0, 5.0, 5.0, 5.0]));
    table.insert(series_from("ONE", &[1.0]));

    let matrix = correlation_matrix(&table);

    assert!(matrix.get(&symbol_of("FLAT"), &symbol_of("FLAT")).expect("entry").is_nan());
    assert!(matrix.get(&symbol_of("ONE"), &symbol_of("ONE")).expect("entry").is_nan());
    assert!(matrix.get(&symbol_of("FLAT"), &symbol_of("ONE")).expect("entry").is_nan());
}

// =============================================================================
// Beta
// =============================================================================

proptest! {
    #[test]
    fn benchmark_regressed_on_itself_has_unit_beta(factors in steps(2..40)) {
        prop_assume!(factors.windows(2).any(|pair| pair[0] != pair[1]));
        let market = compute_returns(&series_from("^GSPC", &walk(&factors)));

        let beta = compute_beta(&market, &market).value().expect("defined");
        prop_assert!((beta - 1.0).abs() < 1e-12, "{}", beta);
    }

    #[test]
    fn beta_ignores_price_scale(
        (market_steps, ticker_steps) in (2usize..50)
            .prop_flat_map(|len| (steps(len..len + 1), steps(len..len + 1))),
        scale in 0.001f64..1_000.0,
    ) {
        prop_assume!(market_steps.windows(2).any(|pair| (pair[0] - pair[1]).abs() > 0.01));
        let market = compute_returns(&series_from("^GSPC", &walk(&market_steps)));
        let closes = walk(&ticker_steps);
        let scaled: Vec<f64> = closes.iter().map(|close| close * scale).collect();

        let original = compute_beta(&compute_returns(&series_from("AAA", &closes)), &market);
        let rescaled = compute_beta(&compute_returns(&series_from("AAA", &scaled)), &market);

        let (a, b) = (
            original.value().expect("defined"),
            rescaled.value().expect("defined"),
        );
        prop_assert!(close_to(b, a), "{} vs {}", a, b);
    }
}

#[test]
fn fewer_than_two_overlapping_returns_is_undefined() {
    let market = compute_returns(&series_from("^GSPC", &walk(&[1.01, 0.98, 1.03, 0.99, 1.02])));

    for len in 0..=2 {
        let closes = &[50.0, 51.0, 49.5][..len];
        let ticker = compute_returns(&series_from("NEW", closes));
        assert_eq!(
            compute_beta(&ticker, &market),
            BetaEstimate::Undefined {
                reason: UndefinedReason::InsufficientOverlap {
                    observations: len.saturating_sub(1)
                }
            },
            "len {len}"
        );
    }
}

// =============================================================================
// Input
// =============================================================================

#[test]
fn ticker_list_split_drops_trailing_empty_token() {
    assert_eq!(split_ticker_list("AAPL, msft , "), vec!["AAPL", "msft"]);
}
