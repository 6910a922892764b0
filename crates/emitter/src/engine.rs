//! Emission loop

use std::sync::Arc;
use std::time::{Duration, Instant};

use contracts::{EncodedRecord, FieldErrorPolicy, RunBlueprint};
use dispatcher::{Fanout, FanoutBuilder};
use generators::GeneratorRegistry;
use observability::EmissionMetricsAggregator;
use rand::rngs::StdRng;
use template::{Materializer, Template};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::{EmitterError, RunReport, RunState, StopPolicy};

const PROGRESS_EVERY: u64 = 10_000;

/// Emission settings taken from the run blueprint
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Requested record count, 0 = policy default
    pub limit: u64,
    /// Record count used when `limit` is 0
    pub record_ceiling: u64,
    pub on_field_error: FieldErrorPolicy,
    /// Per-sink budget for flush/close at the end of the run
    pub shutdown_timeout: Duration,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self::from(&RunBlueprint::new(""))
    }
}

impl From<&RunBlueprint> for EmitterConfig {
    fn from(blueprint: &RunBlueprint) -> Self {
        Self {
            limit: blueprint.limit,
            record_ceiling: blueprint.generation.record_ceiling,
            on_field_error: blueprint.generation.on_field_error,
            shutdown_timeout: blueprint.shutdown_timeout(),
        }
    }
}

/// Builder for creating an Emitter
pub struct EmitterBuilder {
    template: Template,
    fanout: Fanout,
    registry: Arc<GeneratorRegistry>,
    config: EmitterConfig,
    cancel: CancellationToken,
    rng: Option<StdRng>,
}

impl EmitterBuilder {
    pub fn new(template: Template, fanout: Fanout) -> Self {
        Self {
            template,
            fanout,
            registry: Arc::new(GeneratorRegistry::with_builtins()),
            config: EmitterConfig::default(),
            cancel: CancellationToken::new(),
            rng: None,
        }
    }

    pub fn registry(mut self, registry: Arc<GeneratorRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(mut self, config: EmitterConfig) -> Self {
        self.config = config;
        self
    }

    /// Token that stops the run from outside
    pub fn cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Fixed RNG instead of OS seeding
    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Check the template and resolve the stop policy
    ///
    /// On error the fan-out is shut down before returning.
    #[instrument(name = "emitter_builder_build", skip(self))]
    pub async fn build(self) -> Result<Emitter, EmitterError> {
        let Self {
            template,
            mut fanout,
            registry,
            config,
            cancel,
            rng,
        } = self;

        if fanout.is_empty() {
            return Err(EmitterError::NoSinks);
        }

        let issues = template.check(&registry);
        for issue in &issues {
            warn!(
                field = %issue.path,
                directive = %issue.raw,
                error = %issue.error,
                policy = ?config.on_field_error,
                "Template field cannot be generated"
            );
        }
        if config.on_field_error == FieldErrorPolicy::Abort {
            if let Some(issue) = issues.first() {
                let message = format!("field '{}' ({}): {}", issue.path, issue.raw, issue.error);
                fanout.shutdown(config.shutdown_timeout).await;
                return Err(EmitterError::setup(message));
            }
        }

        let policy = StopPolicy::resolve(
            config.limit,
            config.record_ceiling,
            fanout.has_unbounded_sink(),
        );
        if let StopPolicy::Unbounded { bounded_cap } = policy {
            fanout.cap_bounded_sinks(bounded_cap);
        }

        let materializer = match rng {
            Some(rng) => Materializer::with_rng(registry, config.on_field_error, rng),
            None => Materializer::new(registry, config.on_field_error),
        };

        debug!(
            ?policy,
            sinks = fanout.len(),
            directives = template.directive_count(),
            "Emitter ready"
        );

        Ok(Emitter {
            config,
            template,
            materializer,
            fanout: Some(fanout),
            policy,
            state: RunState::Idle,
            cancel,
        })
    }
}

/// Drives materialize -> serialize -> fan-out until the stop policy or cancellation ends the run
pub struct Emitter {
    config: EmitterConfig,
    template: Template,
    materializer: Materializer,
    fanout: Option<Fanout>,
    policy: StopPolicy,
    state: RunState,
    cancel: CancellationToken,
}

impl Emitter {
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn policy(&self) -> StopPolicy {
        self.policy
    }

    /// Run to a terminal state; sinks are flushed and closed on every path
    #[instrument(name = "emitter_run", skip(self), fields(policy = ?self.policy))]
    pub async fn run(&mut self) -> Result<RunReport, EmitterError> {
        if self.state != RunState::Idle {
            return Err(EmitterError::NotIdle { state: self.state });
        }
        let Some(mut fanout) = self.fanout.take() else {
            return Err(EmitterError::NoSinks);
        };

        self.transition(RunState::Running);
        info!(
            target_records = ?self.policy.target(),
            sinks = fanout.len(),
            "Emission started"
        );

        let started = Instant::now();
        let mut aggregator = EmissionMetricsAggregator::new();
        let result = self.emit(&mut fanout, &mut aggregator).await;

        info!("Shutting down sinks...");
        let sinks = fanout.shutdown(self.config.shutdown_timeout).await;
        let elapsed = started.elapsed();

        match result {
            Ok(outcome) => {
                self.transition(outcome);
                let report = RunReport {
                    outcome,
                    records: aggregator.total_records,
                    elapsed,
                    fallbacks: self.materializer.fallbacks(),
                    sinks,
                    summary: aggregator.summary(),
                };
                info!(
                    outcome = %outcome,
                    records = report.records,
                    elapsed_secs = elapsed.as_secs_f64(),
                    records_per_sec = format!("{:.2}", report.records_per_second()),
                    "Emission finished"
                );
                Ok(report)
            }
            Err(e) => {
                self.transition(RunState::Aborted);
                error!(
                    error = %e,
                    records = aggregator.total_records,
                    "Emission aborted"
                );
                Err(e)
            }
        }
    }

    async fn emit(
        &mut self,
        fanout: &mut Fanout,
        aggregator: &mut EmissionMetricsAggregator,
    ) -> Result<RunState, EmitterError> {
        let target = self.policy.target();
        let mut seq: u64 = 0;

        loop {
            if target.is_some_and(|n| seq >= n) {
                info!(records = seq, "Reached record limit");
                return Ok(RunState::Completed);
            }
            if self.cancel.is_cancelled() {
                return Ok(self.stopped(seq));
            }

            let tick = Instant::now();
            let value = self.materializer.materialize(&self.template)?;
            let record = EncodedRecord::new(seq, serde_json::to_vec(&value)?);
            let materialize_us = tick.elapsed().as_secs_f64() * 1e6;

            let dispatched = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Ok(self.stopped(seq)),
                dispatched = fanout.dispatch(&record) => dispatched,
            };
            if dispatched.is_rejected() {
                return Err(EmitterError::SinksClosed { records: seq });
            }

            aggregator.update(record.len(), materialize_us);
            observability::record_record_emitted(record.len());
            observability::record_materialize_latency_us(materialize_us);
            seq += 1;

            if seq.is_multiple_of(PROGRESS_EVERY) {
                for (sink, metrics) in fanout.metrics() {
                    debug!(
                        records = seq,
                        sink = %sink,
                        queued = metrics.queue_len,
                        written = metrics.write_count,
                        dropped = metrics.dropped_count,
                        "Emission progress"
                    );
                }
            }
        }
    }

    fn stopped(&self, records: u64) -> RunState {
        info!(records, "Cancellation received, stopping emission");
        RunState::Stopped
    }

    fn transition(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {} -> {}",
            self.state,
            next
        );
        debug!(from = %self.state, to = %next, "Run state changed");
        self.state = next;
    }
}

/// Load the template, open the sinks and run to completion
///
/// The template is read before any sink is opened, so a bad template never
/// truncates an existing output file.
#[instrument(name = "emitter_run_blueprint", skip_all, fields(template = %blueprint.template.display()))]
pub async fn run_blueprint(
    blueprint: &RunBlueprint,
    registry: Arc<GeneratorRegistry>,
    cancel: CancellationToken,
) -> Result<RunReport, EmitterError> {
    let template = Template::load(&blueprint.template)?;
    info!(
        fields = template.fields().len(),
        directives = template.directive_count(),
        "Template loaded"
    );

    if blueprint.sinks.is_empty() {
        return Err(EmitterError::NoSinks);
    }
    let fanout = FanoutBuilder::new(blueprint.sinks.clone())
        .retry(blueprint.retry.clone())
        .enqueue_timeout(blueprint.enqueue_timeout())
        .shutdown_timeout(blueprint.shutdown_timeout())
        .build()
        .await?;
    info!(sinks = fanout.len(), "Sinks opened");

    let mut emitter = EmitterBuilder::new(template, fanout)
        .registry(registry)
        .config(EmitterConfig::from(blueprint))
        .cancel_token(cancel)
        .build()
        .await?;

    emitter.run().await
}
