//! Sequential bootstrap engine.

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bootcurve_core::Date;
use bootcurve_math::solvers::{RootFinder, SolverMethod};
use bootcurve_math::MathError;
use tracing::{debug, info, warn};

use super::config::BootstrapConfig;
use super::outcome::{BootstrapFailure, BootstrapOutcome, BootstrapState, SolvedStep, TracePoint};
use super::solved::SolvedForwards;
use crate::discount::DiscountCurve;
use crate::error::{CurveError, CurveResult};
use crate::instruments::{Instrument, ValuationContext};
use crate::nodes::CurveNodeIndex;
use crate::pricing::InstrumentPricer;

/// Shared flag used to stop a run between steps.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates an untriggered token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Solves one forward per instrument, in order.
///
/// Instrument `i` owns the segment ending at the knot at or after its
/// maturity. Its forward is the root of its pricing error with segments
/// `0..i` held at their solved values.
///
/// # Example
///
/// ```rust
/// use bootcurve_curves::prelude::*;
///
/// let context = ValuationContext::new(
///     Date::from_ymd(2026, 1, 8).unwrap(),
///     DayCountConvention::Act365,
///     Frequency::Quarterly,
/// );
/// let quotes = [MarketQuote::new("3M", InstrumentKind::Deposit, 0.027)];
/// let instruments = Instrument::resolve_all(&quotes, &context).unwrap();
/// let nodes = CurveNodeIndex::from_maturities(&instruments).unwrap();
///
/// let mut engine =
///     BootstrapEngine::new(context, instruments, &nodes, BootstrapConfig::default()).unwrap();
/// let outcome = engine.run();
///
/// assert!(outcome.is_solved());
/// assert_eq!(engine.state(), BootstrapState::Done);
/// ```
#[derive(Debug)]
pub struct BootstrapEngine<R: RootFinder = SolverMethod> {
    context: ValuationContext,
    instruments: Vec<Instrument>,
    knots: Vec<Date>,
    config: BootstrapConfig,
    solver: R,
    cancellation: Option<CancellationToken>,
    state: BootstrapState,
    solved: SolvedForwards,
    trace: Vec<TracePoint>,
}

impl BootstrapEngine<SolverMethod> {
    /// Creates an engine using the solver named in `config`.
    pub fn new(
        context: ValuationContext,
        instruments: Vec<Instrument>,
        nodes: &CurveNodeIndex,
        config: BootstrapConfig,
    ) -> CurveResult<Self> {
        Self::with_solver(context, instruments, nodes, config, config.solver)
    }
}

impl<R: RootFinder> BootstrapEngine<R> {
    /// Creates an engine with an explicit root finder.
    ///
    /// Maps every instrument to its knot and rejects the setup when two
    /// instruments share a knot, knots go backwards, or the first knot is
    /// not after the valuation date.
    pub fn with_solver(
        context: ValuationContext,
        instruments: Vec<Instrument>,
        nodes: &CurveNodeIndex,
        config: BootstrapConfig,
        solver: R,
    ) -> CurveResult<Self> {
        config.validate()?;
        if instruments.is_empty() {
            return Err(CurveError::NoInstruments);
        }

        let knots = assign_knots(&instruments, nodes, context.as_of)?;
        let capacity = instruments.len();

        Ok(Self {
            context,
            instruments,
            knots,
            config,
            solver,
            cancellation: None,
            state: BootstrapState::Idle,
            solved: SolvedForwards::with_capacity(capacity),
            trace: Vec::new(),
        })
    }

    /// Attaches a cancellation token checked before each step.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Runs the bootstrap from scratch.
    ///
    /// Reruns start again from [`BootstrapState::Idle`] and give identical
    /// results for identical inputs.
    pub fn run(&mut self) -> BootstrapOutcome {
        self.state = BootstrapState::Idle;
        self.solved.clear();
        self.trace.clear();

        let solver_config = self.config.solver_config();
        let bounds = self.config.rate_bounds.map(|b| b.as_tuple());
        let record = self.config.record_trace;
        let mut steps = Vec::with_capacity(self.instruments.len());

        info!(
            as_of = %self.context.as_of,
            instruments = self.instruments.len(),
            solver = self.solver.name(),
            "Starting bootstrap"
        );

        for (i, instrument) in self.instruments.iter().enumerate() {
            if self
                .cancellation
                .as_ref()
                .is_some_and(CancellationToken::is_cancelled)
            {
                self.state = BootstrapState::Cancelled;
                warn!(completed = i, "Bootstrap cancelled");
                return BootstrapOutcome::Cancelled {
                    completed: i,
                    solved: self.solved.as_slice().to_vec(),
                };
            }

            self.state = BootstrapState::Solving(i);

            let pricer = match InstrumentPricer::new(instrument, &self.knots[..=i], &self.context) {
                Ok(pricer) => pricer,
                Err(e) => {
                    self.state = BootstrapState::Failed(i);
                    return BootstrapOutcome::Failed(BootstrapFailure {
                        at_instrument_index: i,
                        tenor: instrument.tenor.to_string(),
                        last_error: f64::NAN,
                        last_trial: f64::NAN,
                        iterations: 0,
                        reason: e.to_string(),
                        solved: self.solved.as_slice().to_vec(),
                    });
                }
            };

            let last = Cell::new((f64::NAN, f64::NAN));
            let evaluations = Cell::new(0_usize);
            let recorded = RefCell::new(Vec::new());
            let solved = self.solved.as_slice();

            let objective = |trial: f64| {
                let error = pricer.pricing_error(trial, solved);
                let evaluation = evaluations.get();
                evaluations.set(evaluation + 1);
                last.set((trial, error));
                if record {
                    recorded.borrow_mut().push(TracePoint {
                        step: i,
                        evaluation,
                        trial,
                        error,
                    });
                }
                error
            };

            let guess = self.config.initial_guess(instrument.rate);
            let result = self
                .solver
                .find_root(objective, guess, bounds, &solver_config)
                .and_then(|r| {
                    if !r.root.is_finite() {
                        Err(MathError::NonFinite {
                            x: r.root,
                            value: r.residual,
                        })
                    } else if r.residual.is_nan() || r.residual.abs() >= solver_config.tolerance {
                        // A root is accepted on its residual alone
                        Err(MathError::convergence_failed(r.iterations, r.residual, r.root))
                    } else {
                        Ok(r)
                    }
                });
            self.trace.extend(recorded.into_inner());

            match result {
                Ok(root) => {
                    debug!(
                        step = i,
                        instrument = %instrument.label(),
                        knot = %self.knots[i],
                        forward = root.root,
                        iterations = root.iterations,
                        residual = root.residual,
                        "Solved segment"
                    );
                    self.solved.push(root.root);
                    steps.push(SolvedStep {
                        index: i,
                        tenor: instrument.tenor,
                        kind: instrument.kind,
                        rate: instrument.rate,
                        maturity: instrument.maturity,
                        knot: self.knots[i],
                        forward: root.root,
                        iterations: root.iterations,
                        residual: root.residual,
                    });
                }
                Err(e) => {
                    let (last_trial, last_error) =
                        e.last_evaluation().unwrap_or_else(|| last.get());
                    self.state = BootstrapState::Failed(i);
                    warn!(
                        step = i,
                        instrument = %instrument.label(),
                        last_trial,
                        last_error,
                        error = %e,
                        "Bootstrap failed"
                    );
                    return BootstrapOutcome::Failed(BootstrapFailure {
                        at_instrument_index: i,
                        tenor: instrument.tenor.to_string(),
                        last_error,
                        last_trial,
                        iterations: e.iterations(),
                        reason: e.to_string(),
                        solved: self.solved.as_slice().to_vec(),
                    });
                }
            }
        }

        self.state = BootstrapState::Done;
        let curve = DiscountCurve::from_parts(
            self.context.as_of,
            self.context.day_count,
            self.knots.clone(),
            self.solved.as_slice().to_vec(),
        );
        info!(
            segments = curve.len(),
            horizon = %curve.horizon(),
            "Bootstrap complete"
        );

        BootstrapOutcome::Solved { curve, steps }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> BootstrapState {
        self.state
    }

    /// Forwards solved by the latest run.
    #[must_use]
    pub fn solved(&self) -> &[f64] {
        self.solved.as_slice()
    }

    /// Pricing-error evaluations of the latest run, when tracing is on.
    #[must_use]
    pub fn trace(&self) -> &[TracePoint] {
        &self.trace
    }

    /// The knot assigned to each instrument.
    #[must_use]
    pub fn knots(&self) -> &[Date] {
        &self.knots
    }

    /// Instruments in solve order.
    #[must_use]
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Valuation context.
    #[must_use]
    pub fn context(&self) -> &ValuationContext {
        &self.context
    }

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }
}

/// Maps each instrument to its knot; knots must strictly increase from
/// the valuation date.
fn assign_knots(
    instruments: &[Instrument],
    nodes: &CurveNodeIndex,
    as_of: Date,
) -> CurveResult<Vec<Date>> {
    let mut previous = as_of;
    instruments
        .iter()
        .enumerate()
        .map(|(index, instrument)| {
            let knot = nodes.node_at_or_after(instrument.maturity);
            if knot <= previous {
                return Err(CurveError::DegenerateSegment {
                    index,
                    knot,
                    previous,
                });
            }
            previous = knot;
            Ok(knot)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::RateBounds;
    use crate::instruments::{InstrumentKind, MarketQuote};
    use crate::traits::CurveQuery;
    use approx::assert_relative_eq;
    use bootcurve_core::{DayCountConvention, Frequency};
    use bootcurve_math::solvers::{BrentSolver, SolverConfig, SolverResult};
    use bootcurve_math::MathResult;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn context() -> ValuationContext {
        ValuationContext::new(d(2026, 1, 8), DayCountConvention::Act365, Frequency::Quarterly)
    }

    fn instruments(quotes: &[(&str, InstrumentKind, f64)]) -> Vec<Instrument> {
        let quotes: Vec<MarketQuote> = quotes
            .iter()
            .map(|&(t, k, r)| MarketQuote::new(t, k, r))
            .collect();
        Instrument::resolve_all(&quotes, &context()).unwrap()
    }

    fn sample() -> Vec<Instrument> {
        instruments(&[
            ("1D", InstrumentKind::Deposit, 0.025),
            ("3M", InstrumentKind::Deposit, 0.027),
            ("6M", InstrumentKind::Swap, 0.0275),
            ("1Y", InstrumentKind::Swap, 0.028),
            ("2Y", InstrumentKind::Swap, 0.029),
        ])
    }

    #[test]
    fn test_single_deposit_closed_form() {
        let insts = instruments(&[("1D", InstrumentKind::Deposit, 0.025)]);
        let nodes = CurveNodeIndex::from_maturities(&insts).unwrap();
        let mut engine =
            BootstrapEngine::new(context(), insts, &nodes, BootstrapConfig::default()).unwrap();

        let curve = engine.run().into_result().unwrap();
        let yf = 1.0 / 365.0;
        assert_relative_eq!(
            curve.forwards()[0],
            (1.0_f64 + 0.025 * yf).ln() / yf,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_every_instrument_reprices() {
        let insts = sample();
        let nodes = CurveNodeIndex::from_maturities(&insts).unwrap();
        let mut engine =
            BootstrapEngine::new(context(), insts.clone(), &nodes, BootstrapConfig::default())
                .unwrap();

        let outcome = engine.run();
        let curve = outcome.curve().unwrap();
        assert_eq!(curve.len(), insts.len());

        for (i, inst) in insts.iter().enumerate() {
            let pricer = InstrumentPricer::new(inst, &engine.knots()[..=i], &context()).unwrap();
            assert!(pricer.error_against(curve).abs() < 1e-9, "instrument {i}");
        }
    }

    #[test]
    fn test_states_and_rerun() {
        let insts = sample();
        let nodes = CurveNodeIndex::from_maturities(&insts).unwrap();
        let mut engine =
            BootstrapEngine::new(context(), insts, &nodes, BootstrapConfig::default()).unwrap();
        assert_eq!(engine.state(), BootstrapState::Idle);

        let first = engine.run();
        assert_eq!(engine.state(), BootstrapState::Done);
        let second = engine.run();
        assert_eq!(first, second);
    }

    #[test]
    fn test_colliding_knots_rejected() {
        let insts = sample();
        let nodes = CurveNodeIndex::new(vec![d(2026, 4, 8), d(2028, 1, 8)]).unwrap();

        let err = BootstrapEngine::new(context(), insts, &nodes, BootstrapConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            CurveError::DegenerateSegment {
                index: 1,
                knot: d(2026, 4, 8),
                previous: d(2026, 4, 8),
            }
        );
    }

    #[test]
    fn test_no_instruments() {
        let nodes = CurveNodeIndex::new(vec![d(2027, 1, 8)]).unwrap();
        let err = BootstrapEngine::new(context(), vec![], &nodes, BootstrapConfig::default())
            .unwrap_err();
        assert_eq!(err, CurveError::NoInstruments);
    }

    #[test]
    fn test_failure_reports_index() {
        // The 6M quote needs a forward far outside the admissible band
        let insts = instruments(&[
            ("1D", InstrumentKind::Deposit, 0.025),
            ("3M", InstrumentKind::Deposit, 0.027),
            ("6M", InstrumentKind::Swap, 0.30),
            ("1Y", InstrumentKind::Swap, 0.028),
        ]);
        let nodes = CurveNodeIndex::from_maturities(&insts).unwrap();
        let config = BootstrapConfig::default().with_rate_bounds(RateBounds::new(0.0, 0.05));
        let mut engine = BootstrapEngine::new(context(), insts, &nodes, config).unwrap();

        match engine.run() {
            BootstrapOutcome::Failed(failure) => {
                assert_eq!(failure.at_instrument_index, 2);
                assert_eq!(failure.tenor, "6M");
                assert_eq!(failure.solved.len(), 2);
                assert_relative_eq!(failure.last_trial, 0.05);
                assert!(failure.last_error > 0.0);
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(engine.state(), BootstrapState::Failed(2));
        assert_eq!(engine.solved().len(), 2);
    }

    #[test]
    fn test_cancellation_before_first_step() {
        let insts = sample();
        let nodes = CurveNodeIndex::from_maturities(&insts).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let mut engine =
            BootstrapEngine::new(context(), insts, &nodes, BootstrapConfig::default())
                .unwrap()
                .with_cancellation(token);

        assert_eq!(
            engine.run(),
            BootstrapOutcome::Cancelled {
                completed: 0,
                solved: vec![]
            }
        );
        assert_eq!(engine.state(), BootstrapState::Cancelled);
    }

    #[test]
    fn test_alternate_solver_agrees() {
        let insts = sample();
        let nodes = CurveNodeIndex::from_maturities(&insts).unwrap();
        let config = BootstrapConfig::default().with_rate_bounds(RateBounds::new(-0.5, 0.5));

        let newton = BootstrapEngine::new(context(), insts.clone(), &nodes, config)
            .unwrap()
            .run()
            .into_result()
            .unwrap();
        let brent = BootstrapEngine::with_solver(context(), insts, &nodes, config, BrentSolver)
            .unwrap()
            .run()
            .into_result()
            .unwrap();

        for (a, b) in newton.forwards().iter().zip(brent.forwards()) {
            assert_relative_eq!(a, b, epsilon = 1e-7);
        }
        let date = d(2027, 6, 30);
        assert_relative_eq!(
            newton.discount_factor(date),
            brent.discount_factor(date),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_trace_records_evaluations() {
        let insts = sample();
        let nodes = CurveNodeIndex::from_maturities(&insts).unwrap();
        let config = BootstrapConfig::default().with_trace(true);
        let mut engine = BootstrapEngine::new(context(), insts, &nodes, config).unwrap();
        engine.run();

        let trace = engine.trace();
        assert!(!trace.is_empty());
        assert_eq!(trace[0].step, 0);
        assert_eq!(trace[0].evaluation, 0);
        assert_eq!(trace.last().unwrap().step, 4);
    }

    /// Reports the initial guess as a root without checking it.
    struct AcceptsGuess;

    impl RootFinder for AcceptsGuess {
        fn find_root<F>(
            &self,
            f: F,
            initial_guess: f64,
            _bounds: Option<(f64, f64)>,
            _config: &SolverConfig,
        ) -> MathResult<SolverResult>
        where
            F: Fn(f64) -> f64,
        {
            Ok(SolverResult {
                root: initial_guess,
                iterations: 1,
                residual: f(initial_guess),
            })
        }

        fn name(&self) -> &'static str {
            "accepts-guess"
        }
    }

    #[test]
    fn test_unconverged_root_fails_the_step() {
        // The quote rate as a continuously compounded forward misprices the deposit
        let insts = instruments(&[("1Y", InstrumentKind::Deposit, 0.05)]);
        let nodes = CurveNodeIndex::from_maturities(&insts).unwrap();
        let mut engine = BootstrapEngine::with_solver(
            context(),
            insts,
            &nodes,
            BootstrapConfig::default(),
            AcceptsGuess,
        )
        .unwrap();

        let outcome = engine.run();

        let BootstrapOutcome::Failed(failure) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(failure.at_instrument_index, 0);
        assert!(failure.last_error.abs() > 1e-4);
        assert!(failure.solved.is_empty());
        assert_eq!(engine.state(), BootstrapState::Failed(0));
    }
}
