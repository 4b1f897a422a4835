//! Pipeline run context and state machine.
//!
//! A run moves through `Loaded → Building → Testing → Aggregated`. Each step
//! checks the current phase and refuses to run out of order.

use crate::aggregate::aggregate;
use crate::digest::digest;
use crate::error::{Error, Result};
use crate::result::{BuildResult, PipelineSummary, Status, TestResult};
use crate::telemetry::{Stage, StageEvent, TelemetryRecorder};
use crate::timing::TimingSimulator;
use pipesim_config::{Module, TestCase};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Phase of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Validated, nothing has run.
    Loaded,
    /// Modules are being built.
    Building,
    /// Tests are being run.
    Testing,
    /// Summary produced. Terminal.
    Aggregated,
}

/// Options for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Force every duration to zero and every status to OK.
    pub dry_run: bool,
    /// Upper bound on real sleeping per stage.
    pub max_stage: Option<Duration>,
}

impl RunOptions {
    /// Options for a dry run.
    #[must_use]
    pub const fn dry() -> Self {
        Self {
            dry_run: true,
            max_stage: None,
        }
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    /// Aggregated report.
    pub summary: PipelineSummary,
    /// Full ordered event log.
    pub events: Vec<StageEvent>,
}

/// Run context for one pipeline invocation.
///
/// Owns its telemetry recorder and results; create a new one per run.
#[derive(Debug)]
pub struct Pipeline<'a> {
    modules: &'a [Module],
    tests: &'a [TestCase],
    dry_run: bool,
    timer: TimingSimulator,
    phase: Phase,
    recorder: TelemetryRecorder,
    builds: Vec<BuildResult>,
    build_index: HashMap<&'a str, usize>,
    results: Vec<TestResult>,
    summary: Option<PipelineSummary>,
}

impl<'a> Pipeline<'a> {
    /// Validates the definition and creates a run context in `Loaded`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if names are duplicated, a test references
    /// an unknown module, or a duration is invalid.
    pub fn new(modules: &'a [Module], tests: &'a [TestCase], options: RunOptions) -> Result<Self> {
        pipesim_config::validate(modules, tests)?;

        let timer = options
            .max_stage
            .map_or_else(TimingSimulator::new, TimingSimulator::capped);

        Ok(Self {
            modules,
            tests,
            dry_run: options.dry_run,
            timer,
            phase: Phase::Loaded,
            recorder: TelemetryRecorder::new(),
            builds: Vec::with_capacity(modules.len()),
            build_index: HashMap::with_capacity(modules.len()),
            results: Vec::with_capacity(tests.len()),
            summary: None,
        })
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Snapshot of the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<StageEvent> {
        self.recorder.events()
    }

    /// The summary, once the run has been aggregated.
    #[must_use]
    pub const fn summary(&self) -> Option<&PipelineSummary> {
        self.summary.as_ref()
    }

    /// Builds every module in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PhaseOrder`] unless the pipeline is `Loaded`.
    pub fn build(&mut self) -> Result<()> {
        self.advance(Phase::Loaded, Phase::Building)?;
        info!(modules = self.modules.len(), dry_run = self.dry_run, "building modules");

        for module in self.modules {
            let elapsed = self.timer.simulate(self.effective_seconds(module.simulated_seconds));
            let computed = digest(&module.payload);

            let event = self.recorder.append(
                Stage::Build,
                module.name.as_str(),
                &elapsed,
                Status::Ok,
                Some(computed.clone()),
            );
            debug!(
                seq = event.sequence,
                module = %module.name,
                duration_s = event.duration_seconds,
                "built module"
            );

            self.build_index.insert(module.name.as_str(), self.builds.len());
            self.builds.push(BuildResult {
                module: module.name.clone(),
                digest: computed,
                status: Status::Ok,
                duration_seconds: elapsed.duration_seconds(),
            });
        }

        Ok(())
    }

    /// Runs every test in declaration order against its module's digest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PhaseOrder`] unless the pipeline is `Building`, and
    /// [`Error::Internal`] if a module has no build result.
    pub fn test(&mut self) -> Result<()> {
        if self.phase == Phase::Building && self.builds.len() != self.modules.len() {
            return Err(Error::Internal(format!(
                "{} of {} modules built before testing",
                self.builds.len(),
                self.modules.len()
            )));
        }
        self.advance(Phase::Building, Phase::Testing)?;
        info!(tests = self.tests.len(), "running tests");

        for test in self.tests {
            let build = self
                .build_index
                .get(test.module_ref.as_str())
                .and_then(|&i| self.builds.get(i))
                .ok_or_else(|| {
                    Error::Internal(format!(
                        "test '{}' references module '{}' which has no build result",
                        test.name, test.module_ref
                    ))
                })?;

            let elapsed = self.timer.simulate(self.effective_seconds(test.simulated_seconds));
            let matches = test
                .expected_digest
                .as_ref()
                .map_or(true, |expected| *expected == build.digest);
            let passed = self.dry_run || matches;

            let detail = if passed {
                None
            } else {
                Some(format!(
                    "expected digest {}, got {}",
                    test.expected_digest.as_deref().unwrap_or_default(),
                    build.digest
                ))
            };

            let result = TestResult {
                name: test.name.clone(),
                module: build.module.clone(),
                actual_digest: build.digest.clone(),
                expected_digest: test.expected_digest.clone(),
                passed,
                duration_seconds: elapsed.duration_seconds(),
            };

            let event = self.recorder.append(
                Stage::Test,
                test.name.as_str(),
                &elapsed,
                Status::from_passed(passed),
                detail,
            );
            if passed {
                debug!(seq = event.sequence, test = %test.name, "test passed");
            } else {
                warn!(
                    seq = event.sequence,
                    test = %test.name,
                    module = %test.module_ref,
                    "test failed: digest mismatch"
                );
            }

            self.results.push(result);
        }

        Ok(())
    }

    /// Produces the run summary. After this the pipeline is read-only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PhaseOrder`] unless the pipeline is `Testing`, and
    /// [`Error::Internal`] if a test has no recorded result.
    pub fn aggregate(&mut self) -> Result<&PipelineSummary> {
        if self.phase == Phase::Testing && self.results.len() != self.tests.len() {
            return Err(Error::Internal(format!(
                "{} of {} tests recorded before aggregation",
                self.results.len(),
                self.tests.len()
            )));
        }
        self.advance(Phase::Testing, Phase::Aggregated)?;

        let summary = aggregate(&self.builds, &self.results, self.dry_run);
        info!(
            status = %summary.overall_status,
            failures = summary.failures,
            total_s = summary.total_duration_seconds,
            "pipeline finished"
        );
        Ok(&*self.summary.insert(summary))
    }

    /// Runs every phase and returns the summary with the full event log.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`build`](Self::build),
    /// [`test`](Self::test), or [`aggregate`](Self::aggregate).
    pub fn run(mut self) -> Result<RunOutput> {
        self.build()?;
        self.test()?;
        let summary = self.aggregate()?.clone();
        Ok(RunOutput {
            summary,
            events: self.recorder.into_events(),
        })
    }

    fn advance(&mut self, expected: Phase, next: Phase) -> Result<()> {
        if self.phase != expected {
            return Err(Error::PhaseOrder {
                expected,
                actual: self.phase,
            });
        }
        self.phase = next;
        Ok(())
    }

    fn effective_seconds(&self, seconds: f64) -> f64 {
        if self.dry_run {
            0.0
        } else {
            seconds
        }
    }
}

/// Runs a pipeline with no sleep cap.
///
/// # Errors
///
/// Returns [`Error::Config`] before any stage runs if the definition is
/// invalid, or [`Error::Internal`] if an invariant breaks mid-run.
pub fn run(modules: &[Module], tests: &[TestCase], dry_run: bool) -> Result<RunOutput> {
    run_with(
        modules,
        tests,
        RunOptions {
            dry_run,
            max_stage: None,
        },
    )
}

/// Runs a pipeline with explicit options.
///
/// # Errors
///
/// See [`run`].
pub fn run_with(modules: &[Module], tests: &[TestCase], options: RunOptions) -> Result<RunOutput> {
    Pipeline::new(modules, tests, options)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modules() -> Vec<Module> {
        vec![
            Module::new("core", "src@abc123", 0.0),
            Module::new("utils", "src@def456", 0.0),
        ]
    }

    #[test]
    fn phases_advance_in_order() {
        let modules = modules();
        let tests = vec![TestCase::new("unit-core", "core", 0.0)];
        let mut pipeline = Pipeline::new(&modules, &tests, RunOptions::default()).unwrap();
        assert_eq!(pipeline.phase(), Phase::Loaded);
        pipeline.build().unwrap();
        assert_eq!(pipeline.phase(), Phase::Building);
        pipeline.test().unwrap();
        assert_eq!(pipeline.phase(), Phase::Testing);
        assert!(pipeline.summary().is_none());
        pipeline.aggregate().unwrap();
        assert_eq!(pipeline.phase(), Phase::Aggregated);
        assert!(pipeline.summary().is_some());
    }

    #[test]
    fn testing_before_building_is_rejected() {
        let modules = modules();
        let mut pipeline = Pipeline::new(&modules, &[], RunOptions::default()).unwrap();
        let err = pipeline.test().unwrap_err();
        assert!(matches!(
            err,
            Error::PhaseOrder {
                expected: Phase::Building,
                actual: Phase::Loaded
            }
        ));
        assert!(pipeline.events().is_empty());
    }

    #[test]
    fn aggregated_pipeline_is_read_only() {
        let modules = modules();
        let mut pipeline = Pipeline::new(&modules, &[], RunOptions::default()).unwrap();
        pipeline.build().unwrap();
        pipeline.test().unwrap();
        pipeline.aggregate().unwrap();
        assert!(pipeline.build().is_err());
        assert!(pipeline.aggregate().is_err());
        assert_eq!(pipeline.events().len(), 2);
    }

    #[test]
    fn build_event_detail_carries_digest() {
        let modules = modules();
        let output = run(&modules, &[], false).unwrap();
        assert_eq!(output.events[0].detail.as_deref(), Some(digest("src@abc123").as_str()));
        assert_eq!(output.summary.modules[1].digest, digest("src@def456"));
    }

    #[test]
    fn mismatch_detail_names_both_digests() {
        let modules = modules();
        let tests = vec![TestCase::new("unit-utils", "utils", 0.0).expecting("WRONG_DIGEST")];
        let output = run(&modules, &tests, false).unwrap();
        let detail = output.events[2].detail.clone().unwrap();
        assert!(detail.contains("WRONG_DIGEST"));
        assert!(detail.contains(&digest("src@def456")));
    }

    #[test]
    fn test_without_expectation_passes() {
        let modules = modules();
        let tests = vec![TestCase::new("smoke", "core", 0.0)];
        let output = run(&modules, &tests, false).unwrap();
        assert!(output.summary.tests[0].passed);
        assert!(output.summary.is_ok());
    }

    #[test]
    fn dry_run_forces_ok_and_zero_durations() {
        let modules = vec![Module::new("core", "src@abc123", 5.0)];
        let tests = vec![TestCase::new("unit-core", "core", 5.0).expecting("WRONG_DIGEST")];
        let output = run(&modules, &tests, true).unwrap();
        assert!(output.summary.dry_run);
        assert!(output.summary.is_ok());
        assert!(output.summary.tests[0].passed);
        assert!(output.events.iter().all(|e| e.status == Status::Ok));
        assert!(output.events.iter().all(|e| e.started_at == e.ended_at));
        assert!(output.summary.total_duration_seconds.abs() < f64::EPSILON);
    }

    #[test]
    fn sleep_cap_is_applied() {
        let modules = vec![Module::new("slow", "x", 60.0)];
        let options = RunOptions {
            dry_run: false,
            max_stage: Some(Duration::from_millis(1)),
        };
        let output = run_with(&modules, &[], options).unwrap();
        assert!(output.summary.total_duration_seconds < 5.0);
    }
}
