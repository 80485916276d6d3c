// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job orchestrator.
//!
//! A stepwise state machine: `INIT → PREPARE_RUNDIR → LOCATE_DB →
//! START_SESSION → RESTORE_DB → RUN_SKILL → VALIDATE_OUTPUTS → SUMMARIZE →
//! DONE`, with any failure falling to `FAIL`. A multi-candidate locator
//! result pauses the job and yields `AwaitingSelection`; `resume_job`
//! re-enters `LOCATE_DB` with the chosen candidate. Every terminal outcome
//! converges to exactly one classification, a finalized manifest, one
//! terminal timeline event, and (on failure) a debug bundle.

use sp_adapters::{Launcher, StartSpec};
use sp_core::{Clock, ErrorClass, IdGen, JobConfig, JobId, JobState, RunPaths};
use sp_protocol::{
    atomic_write_json, format_ts, load_json, Candidate, Manifest, RunStatus, SelectionReason,
    SkillIdentity, Timeline, TimelineEvent,
};
use sp_skill::{validate_outputs, SkillPackage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::EngineError;
use crate::kernel::Kernel;
use crate::locator::{locate, Located};
use crate::rundir;
use crate::scripts::{self, ScriptVars};
use crate::watcher::HealthWatcher;
use crate::{bundle, summary};

/// What the caller asked for.
#[derive(Debug, Clone)]
pub struct JobRequest {
    /// Working directory the job is rooted at; never the process cwd.
    pub cwd: PathBuf,
    /// Database query: explicit path or scan name.
    pub query: String,
    /// Named skill under `.skillpilot/skills/`.
    pub skill: String,
}

/// Discriminated result of driving a job as far as it will go.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    /// The job reached `DONE` or `FAIL`.
    Completed {
        job_id: JobId,
        run_dir: PathBuf,
        status: RunStatus,
        error_type: ErrorClass,
    },
    /// The locator found several databases; the caller must pick one and
    /// call `resume_job`.
    AwaitingSelection {
        job_id: JobId,
        run_dir: PathBuf,
        candidates: Vec<Candidate>,
    },
}

enum Flow {
    Finished,
    Paused(Vec<Candidate>),
}

/// Per-job mutable state threaded through the states.
struct JobCtx<L: Launcher, C: Clock> {
    job_id: JobId,
    cwd: PathBuf,
    paths: RunPaths,
    config: JobConfig,
    manifest: Manifest,
    timeline: Timeline,
    clock: C,
    /// State most recently entered; transitions are checked on entry.
    state: JobState,
    session: Option<SessionCtx<L>>,
    contract_path: Option<PathBuf>,
    debug_hints: Vec<String>,
}

struct SessionCtx<L: Launcher> {
    handle: Arc<L::Handle>,
    watcher: HealthWatcher,
}

impl<L: Launcher, C: Clock> JobCtx<L, C> {
    fn ts(&self) -> String {
        format_ts(self.clock.epoch_ms())
    }

    fn enter(&mut self, state: JobState) -> Result<(), EngineError> {
        if !self.state.can_transition(state) {
            return Err(EngineError::Internal(format!(
                "illegal transition {} -> {}",
                self.state, state
            )));
        }
        self.state = state;
        self.timeline.append(&TimelineEvent::state_enter(
            self.ts(),
            self.job_id.clone(),
            state,
        ))?;
        Ok(())
    }

    fn exit(&mut self, state: JobState) -> Result<(), EngineError> {
        self.timeline.append(&TimelineEvent::state_exit(
            self.ts(),
            self.job_id.clone(),
            state,
        ))?;
        Ok(())
    }

    fn action(
        &mut self,
        state: JobState,
        name: &str,
        data: Option<serde_json::Value>,
    ) -> Result<(), EngineError> {
        self.timeline.append(&TimelineEvent::action(
            self.ts(),
            self.job_id.clone(),
            state,
            name,
            data,
        ))?;
        Ok(())
    }

    fn write_manifest(&self) -> Result<(), EngineError> {
        atomic_write_json(&self.paths.manifest(), &self.manifest)?;
        Ok(())
    }
}

/// Drives jobs against a launcher.
pub struct Orchestrator<L: Launcher, C: Clock, G: IdGen> {
    launcher: Arc<L>,
    clock: C,
    id_gen: G,
}

impl<L: Launcher, C: Clock, G: IdGen> Orchestrator<L, C, G> {
    pub fn new(launcher: L, clock: C, id_gen: G) -> Self {
        Self {
            launcher: Arc::new(launcher),
            clock,
            id_gen,
        }
    }

    /// Run one job to its first yield point: terminal completion or a
    /// pending candidate selection.
    ///
    /// Returns `Err` only when the job could not leave the ground (no run
    /// directory, unusable configuration); every later failure converges to
    /// `Completed { status: FAIL, .. }` with full evidence.
    pub async fn run_job(&self, request: JobRequest) -> Result<JobOutcome, EngineError> {
        let config = JobConfig::load(&request.cwd)?;
        let job_id = self.id_gen.next();
        info!(job_id = %job_id, query = %request.query, skill = %request.skill, "job starting");

        let run = rundir::create(&request.cwd, &job_id, &request.query, &config, &self.clock)?;
        let mut ctx = JobCtx {
            job_id,
            cwd: request.cwd.clone(),
            paths: run.paths,
            config,
            manifest: run.manifest,
            timeline: run.timeline,
            clock: self.clock.clone(),
            state: JobState::Init,
            session: None,
            contract_path: None,
            debug_hints: Vec::new(),
        };

        let result = self.advance(&mut ctx, &request.skill).await;
        self.conclude(ctx, result).await
    }

    /// Resume a job paused on candidate selection.
    ///
    /// Idempotent: resuming an already-terminal job returns the recorded
    /// outcome without re-running anything.
    pub async fn resume_job(
        &self,
        cwd: &Path,
        job_id: &JobId,
        chosen_index: usize,
    ) -> Result<JobOutcome, EngineError> {
        let config = JobConfig::load(cwd)?;
        let paths = RunPaths::new(cwd, job_id);
        let manifest: Manifest = load_json(&paths.manifest())?;

        if manifest.status != RunStatus::Running {
            return Ok(JobOutcome::Completed {
                job_id: job_id.clone(),
                run_dir: paths.run_dir().to_owned(),
                status: manifest.status,
                error_type: manifest.error_type,
            });
        }
        if manifest.design.candidates.len() < 2 {
            return Err(EngineError::Internal(format!(
                "job {job_id} is not awaiting selection"
            )));
        }
        let chosen = manifest
            .design
            .candidates
            .get(chosen_index)
            .cloned()
            .ok_or_else(|| {
                EngineError::Internal(format!(
                    "selection index {chosen_index} out of range for {} candidates",
                    manifest.design.candidates.len()
                ))
            })?;

        info!(job_id = %job_id, chosen = %chosen.enc_path.display(), "job resuming");
        let timeline = Timeline::open(&paths.timeline())?;
        let mut ctx = JobCtx {
            job_id: job_id.clone(),
            cwd: cwd.to_owned(),
            paths,
            config,
            manifest,
            timeline,
            clock: self.clock.clone(),
            // Paused jobs sit in LOCATE_DB awaiting the selection.
            state: JobState::LocateDb,
            session: None,
            contract_path: None,
            debug_hints: Vec::new(),
        };

        let result = self.resume_from_selection(&mut ctx, chosen).await;
        self.conclude(ctx, result.map(|()| Flow::Finished)).await
    }

    /// States PREPARE_RUNDIR and LOCATE_DB, then the session phase.
    async fn advance(
        &self,
        ctx: &mut JobCtx<L, C>,
        skill_name: &str,
    ) -> Result<Flow, EngineError> {
        ctx.exit(JobState::Init)?;

        // PREPARE_RUNDIR: load the skill and validate its contract before
        // anything expensive happens.
        ctx.enter(JobState::PrepareRundir)?;
        let package = SkillPackage::load_named(&ctx.cwd, skill_name)?;
        ctx.manifest.skill = Some(SkillIdentity {
            name: package.name().to_string(),
            version: package.version().to_string(),
            source_path: package.root.clone(),
            source_hash: package.contract_hash.clone(),
        });
        ctx.contract_path = Some(package.contract_path());
        ctx.debug_hints = package.contract.debug_hints.clone();
        ctx.write_manifest()?;
        ctx.exit(JobState::PrepareRundir)?;

        // LOCATE_DB
        ctx.enter(JobState::LocateDb)?;
        let located = locate(
            &ctx.cwd,
            &ctx.manifest.design.query,
            ctx.config.scan_max_depth,
        )?;
        let candidate = match located {
            Located::Selected {
                mode,
                reason,
                candidate,
            } => {
                ctx.manifest.design.mode = Some(mode);
                ctx.manifest.design.candidates = vec![candidate.clone()];
                ctx.manifest.design.selected = Some(candidate.clone());
                ctx.manifest.design.selection_reason = Some(reason);
                ctx.write_manifest()?;
                ctx.action(
                    JobState::LocateDb,
                    "locate_db",
                    Some(serde_json::json!({
                        "selected": candidate.enc_path,
                        "selection_reason": reason,
                    })),
                )?;
                ctx.exit(JobState::LocateDb)?;
                candidate
            }
            Located::NeedsSelection { mode, candidates } => {
                // Pause: persist the candidates, emit the event, yield. The
                // job stays in LOCATE_DB until resume_job.
                ctx.manifest.design.mode = Some(mode);
                ctx.manifest.design.candidates = candidates.clone();
                ctx.write_manifest()?;
                ctx.action(
                    JobState::LocateDb,
                    "locate_db",
                    Some(serde_json::json!({
                        "needs_selection": true,
                        "candidate_count": candidates.len(),
                    })),
                )?;
                info!(job_id = %ctx.job_id, count = candidates.len(), "awaiting candidate selection");
                return Ok(Flow::Paused(candidates));
            }
        };

        self.run_session(ctx, &package, &candidate).await?;
        Ok(Flow::Finished)
    }

    /// Re-entry of LOCATE_DB after the caller picked a candidate.
    async fn resume_from_selection(
        &self,
        ctx: &mut JobCtx<L, C>,
        chosen: Candidate,
    ) -> Result<(), EngineError> {
        ctx.manifest.design.selected = Some(chosen.clone());
        ctx.manifest.design.selection_reason = Some(SelectionReason::UserSelected);
        ctx.write_manifest()?;
        ctx.action(
            JobState::LocateDb,
            "locate_db",
            Some(serde_json::json!({
                "selected": chosen.enc_path,
                "selection_reason": SelectionReason::UserSelected,
            })),
        )?;
        ctx.exit(JobState::LocateDb)?;

        let identity = ctx
            .manifest
            .skill
            .clone()
            .ok_or_else(|| EngineError::Internal("manifest carries no skill identity".into()))?;
        let package = SkillPackage::load_dir(&identity.source_path)?;
        ctx.contract_path = Some(package.contract_path());
        ctx.debug_hints = package.contract.debug_hints.clone();

        self.run_session(ctx, &package, &chosen).await
    }

    /// States START_SESSION through SUMMARIZE.
    async fn run_session(
        &self,
        ctx: &mut JobCtx<L, C>,
        package: &SkillPackage,
        candidate: &Candidate,
    ) -> Result<(), EngineError> {
        // START_SESSION
        ctx.enter(JobState::StartSession)?;
        let vars = ScriptVars::new(&ctx.paths, &ctx.job_id, candidate);
        scripts::render_bootstrap(&ctx.paths, &vars)?;

        let spec = StartSpec {
            job_id: ctx.job_id.clone(),
            paths: ctx.paths.clone(),
            env: Vec::new(),
            command_template: ctx.config.command_template.clone(),
            batch_template: ctx.config.batch_template.clone(),
            heartbeat_timeout: ctx.config.heartbeat_timeout,
            stop_grace: ctx.config.stop_grace,
        };
        let handle = Arc::new(self.launcher.start(spec).await?);
        if let Err(e) = self
            .launcher
            .wait_ready(&handle, ctx.config.ready_timeout)
            .await
        {
            // The process may be up even though it never became ready.
            let _ = self.launcher.stop(&handle, "session never became ready").await;
            return Err(e.into());
        }
        ctx.action(
            JobState::StartSession,
            "start_session",
            Some(serde_json::json!({ "launcher": self.launcher.name() })),
        )?;

        // The watcher shadows every later state; a dead session interrupts
        // any in-flight ack wait through the channel.
        let watcher = HealthWatcher::spawn(
            Arc::clone(&self.launcher),
            Arc::clone(&handle),
            ctx.config.health_poll_interval,
        );
        ctx.session = Some(SessionCtx { handle, watcher });
        ctx.exit(JobState::StartSession)?;

        let mut kernel = Kernel::new(
            ctx.job_id.clone(),
            ctx.paths.clone(),
            ctx.clock.clone(),
            &ctx.config,
        );

        // RESTORE_DB
        ctx.enter(JobState::RestoreDb)?;
        scripts::render_restore_wrapper(&ctx.paths, &vars)?;
        let failure_rx = self.session_failure_rx(ctx)?;
        kernel
            .run_script(
                &mut ctx.timeline,
                JobState::RestoreDb,
                "restore",
                "scripts/restore_wrapper.tcl",
                ctx.config.ack_timeout,
                failure_rx,
            )
            .await?;
        ctx.exit(JobState::RestoreDb)?;

        // RUN_SKILL
        ctx.enter(JobState::RunSkill)?;
        let entry = scripts::render_skill_scripts(&ctx.paths, package, &vars)?;
        let failure_rx = self.session_failure_rx(ctx)?;
        kernel
            .run_script(
                &mut ctx.timeline,
                JobState::RunSkill,
                "skill",
                &entry,
                ctx.config.ack_timeout,
                failure_rx,
            )
            .await?;
        ctx.exit(JobState::RunSkill)?;

        // VALIDATE_OUTPUTS
        ctx.enter(JobState::ValidateOutputs)?;
        let report = validate_outputs(ctx.paths.run_dir(), &package.contract);
        ctx.action(
            JobState::ValidateOutputs,
            "validate_outputs",
            Some(serde_json::json!({
                "required": report.checks.len(),
                "failed": report.checks.iter().filter(|c| c.failure.is_some()).count(),
            })),
        )?;
        if let Some(class) = report.first_failure() {
            let detail = report
                .checks
                .iter()
                .filter(|c| c.failure.is_some())
                .map(|c| c.pattern.clone())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(EngineError::Outputs { class, detail });
        }
        ctx.exit(JobState::ValidateOutputs)?;

        // SUMMARIZE
        ctx.enter(JobState::Summarize)?;
        summary::write_summaries(
            &ctx.paths,
            &ctx.job_id,
            RunStatus::Pass,
            ErrorClass::Ok,
            &ctx.clock,
        )?;
        ctx.action(JobState::Summarize, "summarize", None)?;
        ctx.exit(JobState::Summarize)?;
        Ok(())
    }

    fn session_failure_rx(
        &self,
        ctx: &JobCtx<L, C>,
    ) -> Result<tokio::sync::watch::Receiver<Option<sp_adapters::Health>>, EngineError> {
        ctx.session
            .as_ref()
            .map(|s| s.watcher.subscribe())
            .ok_or_else(|| EngineError::Internal("no session for ack wait".into()))
    }

    /// Converge to the terminal outcome: manifest, terminal event, session
    /// shutdown, and on failure the debug bundle plus summaries.
    async fn conclude(
        &self,
        mut ctx: JobCtx<L, C>,
        result: Result<Flow, EngineError>,
    ) -> Result<JobOutcome, EngineError> {
        match result {
            Ok(Flow::Paused(candidates)) => Ok(JobOutcome::AwaitingSelection {
                job_id: ctx.job_id.clone(),
                run_dir: ctx.paths.run_dir().to_owned(),
                candidates,
            }),
            Ok(Flow::Finished) => {
                self.shutdown_session(&mut ctx, "job complete").await;
                ctx.manifest.finalize(RunStatus::Pass, ErrorClass::Ok);
                ctx.write_manifest()?;
                let ts = ctx.ts();
                ctx.timeline
                    .append(&TimelineEvent::done(ts, ctx.job_id.clone()))?;
                info!(job_id = %ctx.job_id, "job passed");
                Ok(JobOutcome::Completed {
                    job_id: ctx.job_id.clone(),
                    run_dir: ctx.paths.run_dir().to_owned(),
                    status: RunStatus::Pass,
                    error_type: ErrorClass::Ok,
                })
            }
            Err(e) => {
                // A crash that coincides with a stop marker we never wrote is
                // an external cancellation, not a tool defect. Our own stop
                // only happens below, after classification.
                let externally_stopped = matches!(
                    e,
                    EngineError::SessionFailed {
                        health: sp_adapters::Health::Crashed
                    }
                ) && ctx.paths.stop_marker().exists();
                let class = if externally_stopped {
                    ErrorClass::InternalError
                } else {
                    e.classify()
                };
                error!(job_id = %ctx.job_id, error = %e, error_type = %class, "job failed");

                ctx.manifest.finalize(RunStatus::Fail, class);
                if let Err(we) = ctx.write_manifest() {
                    warn!(error = %we, "terminal manifest write failed");
                }
                let ts = ctx.ts();
                if let Err(we) = ctx.timeline.append(&TimelineEvent::fail(
                    ts,
                    ctx.job_id.clone(),
                    e.to_string(),
                    Some(serde_json::json!({ "error_type": class })),
                )) {
                    warn!(error = %we, "terminal timeline write failed");
                }

                self.shutdown_session(&mut ctx, "job failed").await;

                if let Err(be) = bundle::pack(
                    &ctx.paths,
                    &ctx.job_id,
                    class,
                    &e.to_string(),
                    ctx.contract_path.as_deref(),
                    &ctx.debug_hints,
                    ctx.config.bundle_tail_lines,
                    &ctx.clock,
                ) {
                    warn!(error = %be, "debug bundle packing failed");
                }
                if let Err(se) = summary::write_summaries(
                    &ctx.paths,
                    &ctx.job_id,
                    RunStatus::Fail,
                    class,
                    &ctx.clock,
                ) {
                    warn!(error = %se, "failure summary write failed");
                }

                Ok(JobOutcome::Completed {
                    job_id: ctx.job_id.clone(),
                    run_dir: ctx.paths.run_dir().to_owned(),
                    status: RunStatus::Fail,
                    error_type: class,
                })
            }
        }
    }

    async fn shutdown_session(&self, ctx: &mut JobCtx<L, C>, reason: &str) {
        if let Some(session) = ctx.session.take() {
            session.watcher.stop();
            if let Err(e) = self.launcher.stop(&session.handle, reason).await {
                warn!(job_id = %ctx.job_id, error = %e, "session stop failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
