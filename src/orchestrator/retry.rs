//! Retry orchestrator: drives collect / validate / solve / verify attempts
//!
//! Each attempt builds its batch, matrix and solution from scratch, so the
//! only state carried between attempts is the attempt counter and the
//! diagnostic history. Once a terminal state is reached the oracle is never
//! invoked again.

use crate::error::{Result, SimonError};
use crate::gf2::{BitVector, NullspaceSolver, Solution};
use crate::measurement::{MeasurementBatch, MeasurementValidator};
use crate::oracle::{BitFlipNoise, NoiseModel, OracleExecutor};
use crate::orchestrator::config::SolverConfig;
use crate::orchestrator::state::{Phase, State};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an attempt ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Attempt still in progress
    Pending,
    Accepted,
    Rejected(SimonError),
}

/// Per-attempt diagnostics for a caller to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// 1-based
    pub attempt_index: u32,
    pub collected_at: DateTime<Utc>,
    pub batch_fingerprint: String,
    pub total_shots: u64,
    /// Distinct non-zero vectors the attempt worked with
    pub cleaned_vectors: Vec<BitVector>,
    pub rank: Option<usize>,
    pub verdict: Verdict,
    pub recovered: Option<BitVector>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    Success(BitVector),
    Exhausted(SimonError),
}

/// Full history of one orchestrated run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub config: SolverConfig,
    pub attempts: Vec<AttemptRecord>,
    pub outcome: Outcome,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    /// The recovered vector, or `AttemptsExhausted` as an error
    pub fn into_result(self) -> Result<BitVector> {
        match self.outcome {
            Outcome::Success(s) => Ok(s),
            Outcome::Exhausted(e) => Err(e),
        }
    }
}

pub struct RetryOrchestrator<O: OracleExecutor> {
    config: SolverConfig,
    oracle: O,
    noise: Option<Box<dyn NoiseModel>>,
    hidden: u64,
    expected: Option<BitVector>,
    state: State,
    attempts_used: u32,
    current: Option<AttemptRecord>,
    records: Vec<AttemptRecord>,
    run_id: Uuid,
    started_at: DateTime<Utc>,
}

impl<O: OracleExecutor> RetryOrchestrator<O> {
    /// `hidden` is passed through to the oracle untouched. A configured
    /// noise section gets a `BitFlipNoise` model seeded from it.
    pub fn new(config: SolverConfig, oracle: O, hidden: u64) -> Result<Self> {
        config.validate()?;
        let noise: Option<Box<dyn NoiseModel>> = config.noise.as_ref().map(|n| {
            let model = match n.seed {
                Some(seed) => BitFlipNoise::seeded(seed),
                None => BitFlipNoise::from_entropy(),
            };
            Box::new(model) as Box<dyn NoiseModel>
        });
        Ok(Self {
            config,
            oracle,
            noise,
            hidden,
            expected: None,
            state: State::Collecting,
            attempts_used: 0,
            current: None,
            records: Vec::new(),
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
        })
    }

    /// Replace the noise model built from the config
    pub fn with_noise_model(mut self, model: Box<dyn NoiseModel>) -> Self {
        self.noise = Some(model);
        self
    }

    /// Check every recovered value against known ground truth
    pub fn with_expected(mut self, expected: BitVector) -> Result<Self> {
        if expected.width() != self.config.width {
            return Err(SimonError::DimensionMismatch {
                left: self.config.width,
                right: expected.width(),
            });
        }
        self.expected = Some(expected);
        Ok(self)
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn attempts_used(&self) -> u32 {
        self.attempts_used
    }

    pub fn records(&self) -> &[AttemptRecord] {
        &self.records
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Perform exactly one transition and return the new phase.
    ///
    /// A non-recoverable error (oracle failure, width mismatch) moves the
    /// machine to `Exhausted` carrying that error and is returned as `Err`.
    /// Stepping a terminal state is a no-op.
    pub fn step(&mut self) -> Result<Phase> {
        let state = std::mem::replace(&mut self.state, State::Collecting);
        if state.is_terminal() {
            self.state = state;
            return Ok(self.state.phase());
        }
        match self.transition(state) {
            Ok(next) => {
                self.state = next;
                Ok(self.state.phase())
            }
            Err(e) => {
                warn!("Attempt {} aborted: {}", self.attempts_used, e);
                self.close_attempt(Verdict::Rejected(e.clone()), None);
                self.state = State::Exhausted(e.clone());
                Err(e)
            }
        }
    }

    fn transition(&mut self, state: State) -> Result<State> {
        let width = self.config.width;
        let next = match state {
            State::Collecting => {
                self.attempts_used += 1;
                debug!(
                    "Attempt {}/{}: collecting {} shot(s)",
                    self.attempts_used, self.config.max_attempts, self.config.shots
                );
                let mut batch = self.oracle.execute(width, self.hidden, self.config.shots)?;
                if batch.width() != width {
                    return Err(SimonError::DimensionMismatch {
                        left: width,
                        right: batch.width(),
                    });
                }
                if let (Some(model), Some(noise)) = (self.noise.as_mut(), self.config.noise.as_ref()) {
                    batch = model.corrupt(&batch, noise.probability)?;
                    debug!("Applied bit-flip noise (p={})", noise.probability);
                }
                if let Some(limit) = self.config.measurement_limit {
                    batch = batch.truncated(limit);
                }
                self.open_attempt(&batch);
                State::Validating(batch)
            }
            State::Validating(batch) => match MeasurementValidator::validate(&batch) {
                Ok(set) => {
                    if let Some(record) = self.current.as_mut() {
                        record.cleaned_vectors = set.vectors.clone();
                        record.rank = Some(set.rank());
                    }
                    State::Solving(set)
                }
                Err(e) if e.is_recoverable() => {
                    if let Some(record) = self.current.as_mut() {
                        record.cleaned_vectors = MeasurementValidator::clean(&batch);
                        record.rank = match &e {
                            SimonError::InsufficientIndependentVectors { rank, .. } => Some(*rank),
                            _ => Some(0),
                        };
                    }
                    self.fail(e, None)
                }
                Err(e) => return Err(e),
            },
            State::Solving(set) => {
                let solution = NullspaceSolver::solve(&set.reduction)?;
                debug!("Solver result: {:?}", solution);
                match solution {
                    Solution::Insufficient { rank, needed } => {
                        self.fail(SimonError::InsufficientIndependentVectors { rank, needed }, None)
                    }
                    other => match other.candidate(width)? {
                        Some(s) => State::Verifying(s),
                        None => self.fail(SimonError::NoInformativeMeasurements, None),
                    },
                }
            }
            State::Verifying(s) => match self.expected {
                Some(expected) if expected != s => self.fail(
                    SimonError::VerificationMismatch {
                        recovered: s,
                        expected,
                    },
                    Some(s),
                ),
                _ => {
                    info!("Attempt {} recovered s={}", self.attempts_used, s);
                    self.close_attempt(Verdict::Accepted, Some(s));
                    State::Success(s)
                }
            },
            State::Retrying(reason) => {
                debug!(
                    "Retrying after: {} ({} attempt(s) left)",
                    reason,
                    self.config.max_attempts - self.attempts_used
                );
                State::Collecting
            }
            terminal @ (State::Success(_) | State::Exhausted(_)) => terminal,
        };
        Ok(next)
    }

    /// Close the current attempt as rejected and pick Retrying or Exhausted
    fn fail(&mut self, reason: SimonError, recovered: Option<BitVector>) -> State {
        self.close_attempt(Verdict::Rejected(reason.clone()), recovered);
        if self.attempts_used >= self.config.max_attempts {
            warn!(
                "Attempt {}/{} failed: {}; no attempts left",
                self.attempts_used, self.config.max_attempts, reason
            );
            State::Exhausted(SimonError::AttemptsExhausted {
                attempts: self.attempts_used,
                last: Box::new(reason),
            })
        } else {
            warn!(
                "Attempt {}/{} failed: {}; retrying",
                self.attempts_used, self.config.max_attempts, reason
            );
            State::Retrying(reason)
        }
    }

    fn open_attempt(&mut self, batch: &MeasurementBatch) {
        self.current = Some(AttemptRecord {
            attempt_index: self.attempts_used,
            collected_at: Utc::now(),
            batch_fingerprint: batch.fingerprint(),
            total_shots: batch.total_shots(),
            cleaned_vectors: Vec::new(),
            rank: None,
            verdict: Verdict::Pending,
            recovered: None,
        });
    }

    fn close_attempt(&mut self, verdict: Verdict, recovered: Option<BitVector>) {
        if let Some(mut record) = self.current.take() {
            record.verdict = verdict;
            record.recovered = recovered;
            self.records.push(record);
        }
    }

    /// Step until a terminal state and report the whole history
    pub fn run(&mut self) -> Result<RunReport> {
        info!(
            "Run {}: n={}, shots={}, max_attempts={}, noise={}",
            self.run_id,
            self.config.width,
            self.config.shots,
            self.config.max_attempts,
            self.config.noise.as_ref().map(|n| n.probability).unwrap_or(0.0),
        );
        while !self.step()?.is_terminal() {}

        let outcome = match &self.state {
            State::Success(s) => Outcome::Success(*s),
            State::Exhausted(e) => Outcome::Exhausted(e.clone()),
            other => unreachable!("loop exits only on terminal state, got {:?}", other.phase()),
        };
        Ok(RunReport {
            run_id: self.run_id,
            started_at: self.started_at,
            config: self.config.clone(),
            attempts: self.records.clone(),
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{OrthogonalSampler, ScriptedOracle};
    use crate::orchestrator::config::NoiseConfig;

    fn batch(strings: &[&str]) -> MeasurementBatch {
        MeasurementBatch::from_bitstrings(strings[0].len(), strings).unwrap()
    }

    fn s1101() -> BitVector {
        BitVector::from_bits("1101").unwrap()
    }

    #[test]
    fn test_ideal_success_first_attempt() {
        let oracle = ScriptedOracle::repeating(batch(&["0010", "0111", "1001", "0000"]));
        let mut orch = RetryOrchestrator::new(SolverConfig::default(), oracle, 0b1101)
            .unwrap()
            .with_expected(s1101())
            .unwrap();
        let report = orch.run().unwrap();
        assert_eq!(report.outcome, Outcome::Success(s1101()));
        assert_eq!(report.attempts.len(), 1);
        assert_eq!(report.attempts[0].rank, Some(3));
        assert_eq!(report.attempts[0].verdict, Verdict::Accepted);
        assert_eq!(report.attempts[0].recovered, Some(s1101()));
        assert_eq!(orch.oracle().invocations(), 1);
    }

    #[test]
    fn test_phase_sequence() {
        let oracle = ScriptedOracle::repeating(batch(&["0010", "0111", "1001"]));
        let mut orch = RetryOrchestrator::new(SolverConfig::default(), oracle, 0b1101).unwrap();
        assert_eq!(orch.phase(), Phase::Collecting);
        assert_eq!(orch.step().unwrap(), Phase::Validating);
        assert_eq!(orch.step().unwrap(), Phase::Solving);
        assert_eq!(orch.step().unwrap(), Phase::Verifying);
        assert_eq!(orch.step().unwrap(), Phase::Success);
        // terminal: no further oracle calls
        assert_eq!(orch.step().unwrap(), Phase::Success);
        assert_eq!(orch.oracle().invocations(), 1);
    }

    #[test]
    fn test_exhaustion_on_zero_oracle() {
        let oracle = ScriptedOracle::repeating(batch(&["0000"]));
        let mut orch = RetryOrchestrator::new(SolverConfig::default(), oracle, 0b1101).unwrap();
        let report = orch.run().unwrap();
        assert_eq!(orch.oracle().invocations(), 3);
        assert_eq!(report.attempts.len(), 3);
        assert_eq!(
            report.clone().into_result().unwrap_err(),
            SimonError::AttemptsExhausted {
                attempts: 3,
                last: Box::new(SimonError::NoInformativeMeasurements),
            }
        );
        assert!(report
            .attempts
            .iter()
            .all(|a| a.verdict == Verdict::Rejected(SimonError::NoInformativeMeasurements)));
    }

    #[test]
    fn test_dependency_failure_then_recovery() {
        let oracle = ScriptedOracle::new(vec![
            batch(&["0110", "0110"]),
            batch(&["0010", "0111", "1001"]),
        ]);
        let mut orch = RetryOrchestrator::new(SolverConfig::default(), oracle, 0b1101).unwrap();
        let report = orch.run().unwrap();
        assert!(report.is_success());
        assert_eq!(report.attempts.len(), 2);
        assert_eq!(report.attempts[0].rank, Some(1));
        assert_eq!(
            report.attempts[0].verdict,
            Verdict::Rejected(SimonError::InsufficientIndependentVectors { rank: 1, needed: 3 })
        );
        assert_eq!(report.attempts[1].attempt_index, 2);
    }

    #[test]
    fn test_corrupted_batch_fails_verification() {
        let oracle = ScriptedOracle::new(vec![
            batch(&["0011", "0111", "1001"]),
            batch(&["0010", "0111", "1001"]),
        ]);
        let mut orch = RetryOrchestrator::new(SolverConfig::default(), oracle, 0b1101)
            .unwrap()
            .with_expected(s1101())
            .unwrap();
        let report = orch.run().unwrap();
        let wrong = BitVector::from_bits("1011").unwrap();
        assert_eq!(report.attempts[0].recovered, Some(wrong));
        assert_eq!(
            report.attempts[0].verdict,
            Verdict::Rejected(SimonError::VerificationMismatch {
                recovered: wrong,
                expected: s1101(),
            })
        );
        assert_eq!(report.outcome, Outcome::Success(s1101()));
    }

    #[test]
    fn test_without_ground_truth_wrong_answer_is_accepted() {
        let oracle = ScriptedOracle::repeating(batch(&["0011", "0111", "1001"]));
        let mut orch = RetryOrchestrator::new(SolverConfig::default(), oracle, 0b1101).unwrap();
        let s = orch.run().unwrap().into_result().unwrap();
        assert_eq!(s.to_string(), "1011");
    }

    #[test]
    fn test_trivial_hidden_vector() {
        let config = SolverConfig::default();
        let mut orch = RetryOrchestrator::new(config, OrthogonalSampler::seeded(5), 0)
            .unwrap()
            .with_expected(BitVector::zero(4).unwrap())
            .unwrap();
        let report = orch.run().unwrap();
        assert_eq!(report.outcome, Outcome::Success(BitVector::zero(4).unwrap()));
        assert_eq!(report.attempts[0].rank, Some(4));
    }

    #[test]
    fn test_trivial_result_fails_nonzero_verification() {
        let full_rank = batch(&["1000", "0100", "0010", "0001"]);
        let mut orch = RetryOrchestrator::new(
            SolverConfig { max_attempts: 1, ..SolverConfig::default() },
            ScriptedOracle::repeating(full_rank),
            0b1101,
        )
        .unwrap()
        .with_expected(s1101())
        .unwrap();
        let err = orch.run().unwrap().into_result().unwrap_err();
        assert!(matches!(
            err,
            SimonError::AttemptsExhausted { attempts: 1, ref last }
                if matches!(**last, SimonError::VerificationMismatch { .. })
        ));
    }

    #[test]
    fn test_oracle_failure_is_fatal() {
        let mut orch =
            RetryOrchestrator::new(SolverConfig::default(), ScriptedOracle::new(Vec::new()), 0).unwrap();
        assert!(matches!(orch.run(), Err(SimonError::Oracle(_))));
        assert_eq!(orch.phase(), Phase::Exhausted);
        assert_eq!(orch.attempts_used(), 1);
        // terminal after abort: stepping again does not call the oracle
        assert_eq!(orch.step().unwrap(), Phase::Exhausted);
    }

    #[test]
    fn test_measurement_limit_forces_dependency_failure() {
        let config = SolverConfig {
            measurement_limit: Some(1),
            max_attempts: 2,
            ..SolverConfig::default()
        };
        let oracle = ScriptedOracle::repeating(batch(&["0010", "0111", "1001"]));
        let report = RetryOrchestrator::new(config, oracle, 0b1101).unwrap().run().unwrap();
        assert!(!report.is_success());
        assert!(report.attempts.iter().all(|a| a.rank == Some(1)));
    }

    #[test]
    fn test_seeded_noise_run_is_reproducible() {
        let config = SolverConfig {
            noise: Some(NoiseConfig { probability: 0.4, seed: Some(17) }),
            ..SolverConfig::default()
        };
        let run = |config: SolverConfig| {
            RetryOrchestrator::new(config, OrthogonalSampler::seeded(3), 0b1101)
                .unwrap()
                .with_expected(s1101())
                .unwrap()
                .run()
                .unwrap()
        };
        let a = run(config.clone());
        let b = run(config);
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.attempts.len(), b.attempts.len());
        for (x, y) in a.attempts.iter().zip(b.attempts.iter()) {
            assert_eq!(x.batch_fingerprint, y.batch_fingerprint);
            assert_eq!(x.verdict, y.verdict);
        }
    }

    /// Corrupts 0010 into 0011 on the first call only
    struct FlipFirstBatch {
        calls: usize,
    }

    impl NoiseModel for FlipFirstBatch {
        fn corrupt(&mut self, batch: &MeasurementBatch, _p: f64) -> Result<MeasurementBatch> {
            self.calls += 1;
            let mut out = MeasurementBatch::new(batch.width())?;
            for m in batch.entries() {
                let v = if self.calls == 1 && m.vector.to_string() == "0010" {
                    m.vector.flip(3)?
                } else {
                    m.vector
                };
                out.record(v, m.count)?;
            }
            Ok(out)
        }
    }

    #[test]
    fn test_custom_noise_model_triggers_retry() {
        let config = SolverConfig {
            noise: Some(NoiseConfig { probability: 1.0, seed: Some(0) }),
            ..SolverConfig::default()
        };
        let oracle = ScriptedOracle::repeating(batch(&["0010", "0111", "1001"]));
        let mut orch = RetryOrchestrator::new(config, oracle, 0b1101)
            .unwrap()
            .with_noise_model(Box::new(FlipFirstBatch { calls: 0 }))
            .with_expected(s1101())
            .unwrap();
        let report = orch.run().unwrap();
        assert_eq!(orch.records().len(), 2);
        assert!(matches!(
            orch.records()[0].verdict,
            Verdict::Rejected(SimonError::VerificationMismatch { .. })
        ));
        assert_eq!(report.outcome, Outcome::Success(s1101()));
        assert_eq!(orch.attempts_used(), 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SolverConfig { max_attempts: 0, ..SolverConfig::default() };
        assert!(RetryOrchestrator::new(config, OrthogonalSampler::seeded(0), 0).is_err());
    }

    #[test]
    fn test_report_serializes() {
        let oracle = ScriptedOracle::repeating(batch(&["0010", "0111", "1001"]));
        let report = RetryOrchestrator::new(SolverConfig::default(), oracle, 0b1101)
            .unwrap()
            .run()
            .unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"1101\""));
        let back: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
