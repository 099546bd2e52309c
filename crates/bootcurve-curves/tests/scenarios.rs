//! End-to-end bootstrap scenarios and curve properties.

use approx::assert_relative_eq;
use bootcurve_core::Tenor;
use bootcurve_curves::prelude::*;
use bootcurve_curves::pricing::InstrumentPricer;

fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

fn context() -> ValuationContext {
    ValuationContext::new(d(2026, 1, 8), DayCountConvention::Act365, Frequency::Quarterly)
}

fn resolve(quotes: &[(&str, InstrumentKind, f64)]) -> Vec<Instrument> {
    let quotes: Vec<MarketQuote> = quotes
        .iter()
        .map(|&(tenor, kind, rate)| MarketQuote::new(tenor, kind, rate))
        .collect();
    Instrument::resolve_all(&quotes, &context()).unwrap()
}

fn bootstrap(instruments: &[Instrument]) -> (DiscountCurve, Vec<Date>) {
    let nodes = CurveNodeIndex::from_maturities(instruments).unwrap();
    let mut engine = BootstrapEngine::new(
        context(),
        instruments.to_vec(),
        &nodes,
        BootstrapConfig::default(),
    )
    .unwrap();
    let curve = engine.run().into_result().unwrap();
    (curve, engine.knots().to_vec())
}

fn market() -> Vec<Instrument> {
    resolve(&[
        ("1D", InstrumentKind::Deposit, 0.0250),
        ("1M", InstrumentKind::Deposit, 0.0260),
        ("3M", InstrumentKind::Deposit, 0.0270),
        ("6M", InstrumentKind::Swap, 0.0275),
        ("9M", InstrumentKind::Swap, 0.0278),
        ("1Y", InstrumentKind::Swap, 0.0280),
        ("18M", InstrumentKind::Swap, 0.0283),
        ("2Y", InstrumentKind::Swap, 0.0285),
        ("3Y", InstrumentKind::Swap, 0.0290),
        ("5Y", InstrumentKind::Swap, 0.0300),
        ("10Y", InstrumentKind::Swap, 0.0310),
        ("30Y", InstrumentKind::Swap, 0.0320),
    ])
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn scenario_a_overnight_deposit() {
    let instruments = resolve(&[("1D", InstrumentKind::Deposit, 0.025)]);
    let (curve, _) = bootstrap(&instruments);

    let df = curve.discount_factor(d(2026, 1, 9));
    assert_relative_eq!((1.0 + 0.025 / 365.0) * df, 1.0, epsilon = 1e-10);
    assert_relative_eq!(df, 0.999932, epsilon = 1e-6);
}

#[test]
fn scenario_b_two_deposits() {
    let instruments = resolve(&[
        ("1D", InstrumentKind::Deposit, 0.025),
        ("3M", InstrumentKind::Deposit, 0.027),
    ]);
    let (curve, _) = bootstrap(&instruments);

    let maturity = d(2026, 4, 8);
    let yf = 90.0 / 365.0;
    assert_relative_eq!(
        curve.discount_factor(maturity),
        1.0 / (1.0 + 0.027 * yf),
        epsilon = 1e-10
    );
    // Close to the quarter-year approximation
    assert_relative_eq!(
        curve.discount_factor(maturity),
        1.0 / (1.0 + 0.027 * 0.25),
        epsilon = 1e-4
    );
}

#[test]
fn scenario_c_swap_par_condition() {
    let instruments = resolve(&[
        ("3M", InstrumentKind::Deposit, 0.027),
        ("1Y", InstrumentKind::Swap, 0.028),
    ]);
    let (curve, knots) = bootstrap(&instruments);

    let swap = &instruments[1];
    let pricer = InstrumentPricer::new(swap, &knots, &context()).unwrap();
    assert_eq!(pricer.coupons().len(), 4);

    let fixed = pricer.fixed_leg_pv(&curve);
    let floating = 1.0 - curve.discount_factor(swap.maturity);
    assert!((fixed - floating).abs() < 1e-9);
}

#[test]
fn feb_29_plus_one_year_clamps() {
    let tenor: Tenor = "1Y".parse().unwrap();
    assert_eq!(tenor.maturity_date(d(2028, 2, 29)).unwrap(), d(2029, 2, 28));

    let leap_context = context().with_as_of(d(2028, 2, 29));
    let quote = MarketQuote::new("1Y", InstrumentKind::Swap, 0.03);
    let inst = Instrument::from_quote(0, &quote, &leap_context).unwrap();
    assert_eq!(inst.maturity, d(2029, 2, 28));
}

// =============================================================================
// Curve properties
// =============================================================================

#[test]
fn discount_factor_is_one_up_to_as_of() {
    let (curve, _) = bootstrap(&market());

    assert_eq!(curve.discount_factor(d(2026, 1, 8)), 1.0);
    assert_eq!(curve.discount_factor(d(2026, 1, 7)), 1.0);
    assert_eq!(curve.discount_factor(d(1999, 12, 31)), 1.0);
}

#[test]
fn par_condition_holds_for_every_instrument() {
    let instruments = market();
    let (curve, knots) = bootstrap(&instruments);
    let forwards = curve.forwards();

    for (i, inst) in instruments.iter().enumerate() {
        let pricer = InstrumentPricer::new(inst, &knots[..=i], &context()).unwrap();
        let error = pricer.pricing_error(forwards[i], &forwards[..i]);
        assert!(error.abs() < 1e-10, "{} error {error:e}", inst.label());
    }

    let report = reprice(&curve, &instruments, &context(), 1e-9).unwrap();
    assert!(report.is_valid(), "{report}");
}

#[test]
fn reruns_are_identical() {
    let instruments = market();
    let nodes = CurveNodeIndex::from_maturities(&instruments).unwrap();
    let mut engine =
        BootstrapEngine::new(context(), instruments, &nodes, BootstrapConfig::default()).unwrap();

    let first = engine.run().solved_forwards().to_vec();
    let second = engine.run().solved_forwards().to_vec();
    assert_eq!(first, second);
}

#[test]
fn flat_extrapolation_beyond_last_knot() {
    let (curve, _) = bootstrap(&market());
    let horizon = curve.horizon();
    let beyond = horizon.add_days(730);

    let last_forward = *curve.forwards().last().unwrap();
    let excess = curve.time(beyond) - curve.time(horizon);
    let manual = curve.discount_factor(horizon).ln() - last_forward * excess;

    assert_relative_eq!(curve.discount_factor(beyond).ln(), manual, epsilon = 1e-12);
}

#[test]
fn explicit_knots_past_maturities() {
    let instruments = resolve(&[
        ("1D", InstrumentKind::Deposit, 0.025),
        ("3M", InstrumentKind::Deposit, 0.027),
        ("1Y", InstrumentKind::Swap, 0.028),
    ]);
    let nodes = CurveNodeIndex::new(vec![d(2026, 1, 15), d(2026, 6, 30), d(2027, 3, 31)]).unwrap();
    let mut engine = BootstrapEngine::new(
        context(),
        instruments.clone(),
        &nodes,
        BootstrapConfig::default(),
    )
    .unwrap();

    assert_eq!(engine.knots(), nodes.dates());
    let curve = engine.run().into_result().unwrap();
    let report = reprice(&curve, &instruments, &context(), 1e-9).unwrap();
    assert!(report.is_valid(), "{report}");
}

#[test]
fn maturity_beyond_horizon_reuses_last_knot() {
    let instruments = resolve(&[
        ("3M", InstrumentKind::Deposit, 0.027),
        ("2Y", InstrumentKind::Swap, 0.029),
    ]);
    let nodes = CurveNodeIndex::new(vec![d(2026, 4, 8), d(2027, 1, 8)]).unwrap();
    let mut engine =
        BootstrapEngine::new(context(), instruments.clone(), &nodes, BootstrapConfig::default())
            .unwrap();

    let curve = engine.run().into_result().unwrap();
    assert_eq!(curve.horizon(), d(2027, 1, 8));
    // The 2Y swap still reprices through the flat-extrapolated last segment
    let report = reprice(&curve, &instruments, &context(), 1e-9).unwrap();
    assert!(report.is_valid(), "{report}");
}

#[test]
fn curve_round_trips_through_json() {
    let instruments = market();
    let nodes = CurveNodeIndex::from_maturities(&instruments).unwrap();
    let outcome = BootstrapEngine::new(context(), instruments, &nodes, BootstrapConfig::default())
        .unwrap()
        .run();

    let json = serde_json::to_string(&outcome).unwrap();
    assert!(json.contains(r#""status":"solved""#));

    let parsed: BootstrapOutcome = serde_json::from_str(&json).unwrap();
    let date = d(2028, 7, 1);
    assert_relative_eq!(
        parsed.curve().unwrap().discount_factor(date),
        outcome.curve().unwrap().discount_factor(date)
    );
}

#[test]
fn bounded_newton_matches_unbounded() {
    let instruments = market();
    let nodes = CurveNodeIndex::from_maturities(&instruments).unwrap();
    let bounded = BootstrapConfig::default().with_rate_bounds(RateBounds::conventional());

    let a = BootstrapEngine::new(context(), instruments.clone(), &nodes, BootstrapConfig::default())
        .unwrap()
        .run();
    let b = BootstrapEngine::new(context(), instruments, &nodes, bounded)
        .unwrap()
        .run();

    for (x, y) in a.solved_forwards().iter().zip(b.solved_forwards()) {
        assert_relative_eq!(x, y, epsilon = 1e-10);
    }
}

#[test]
fn every_solver_method_bootstraps_the_market() {
    let instruments = market();
    let nodes = CurveNodeIndex::from_maturities(&instruments).unwrap();

    for &method in SolverMethod::all() {
        let config = BootstrapConfig::default()
            .with_solver(method)
            .with_rate_bounds(RateBounds::new(-0.5, 0.5));
        let curve = BootstrapEngine::new(context(), instruments.clone(), &nodes, config)
            .unwrap()
            .run()
            .into_result()
            .unwrap_or_else(|e| panic!("{method}: {e}"));
        let report = reprice(&curve, &instruments, &context(), config.tolerance).unwrap();
        assert!(report.is_valid(), "{method}: {report}");
        assert_eq!(curve.len(), instruments.len());
    }
}

// =============================================================================
// Property tests
// =============================================================================

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn date_strategy() -> impl Strategy<Value = Date> {
        (2026i32..2040i32, 1u32..13u32, 1u32..29u32)
            .prop_filter_map("valid date", |(year, month, day)| {
                Date::from_ymd(year, month, day).ok()
            })
    }

    fn curve_strategy() -> impl Strategy<Value = DiscountCurve> {
        proptest::collection::vec((1i64..400i64, 0.0f64..0.15f64), 1..10).prop_map(|segments| {
            let as_of = d(2026, 1, 8);
            let mut date = as_of;
            let mut knots = Vec::with_capacity(segments.len());
            let mut forwards = Vec::with_capacity(segments.len());
            for (gap, rate) in segments {
                date = date.add_days(gap);
                knots.push(date);
                forwards.push(rate);
            }
            DiscountCurve::new(as_of, DayCountConvention::Act365, knots, forwards).unwrap()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn test_discount_factor_monotonic(
            curve in curve_strategy(),
            a in date_strategy(),
            b in date_strategy(),
        ) {
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(curve.discount_factor(early) >= curve.discount_factor(late));
            prop_assert!(curve.discount_factor(late) > 0.0);
            prop_assert!(curve.discount_factor(early) <= 1.0);
        }

        #[test]
        fn test_zero_rate_round_trip(
            curve in curve_strategy(),
            date in date_strategy(),
        ) {
            let t = curve.time(date);
            prop_assume!(t > 0.0);
            let df = curve.discount_factor(date);
            let implied = (-curve.zero_rate(date) * t).exp();
            prop_assert!((implied - df).abs() < 1e-12);
        }

        #[test]
        fn test_bootstrap_reprices_flat_quotes(rate in 0.001f64..0.10f64) {
            let instruments = resolve(&[
                ("1M", InstrumentKind::Deposit, rate),
                ("6M", InstrumentKind::Deposit, rate),
                ("1Y", InstrumentKind::Swap, rate),
                ("2Y", InstrumentKind::Swap, rate),
            ]);
            let (curve, _) = bootstrap(&instruments);
            let report = reprice(&curve, &instruments, &context(), 1e-9).unwrap();
            prop_assert!(report.is_valid());
        }
    }
}
