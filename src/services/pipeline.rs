//! The orchestration pipeline.
//!
//! A single task owns all mutable state and processes commands, engine
//! completions and the debounce timer one at a time, so no state is ever
//! mutated concurrently. Engine calls run as separate tasks and report back
//! through the event queue tagged with their token. Observers read
//! consistent snapshots through a watch channel.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::Instant;
use utoipa::ToSchema;

use super::advisory::{Advisory, AdvisoryBus, Notice};
use super::analysis::{AnalysisCompositor, AnalysisDecision, AnalysisInputs, AnalysisTicket};
use super::engine::{PaletteCatalog, SharedEngine};
use super::request_builder::build_request;
use super::scheduler::{Completion, GenerationScheduler, RequestState, Ticket};
use crate::error::EngineError;
use crate::models::{
    AnalysisResult, AppConfig, Color, CvdSimulationState, CvdType, GenerationParameters,
};

/// Everything the UI can observe, captured at one instant
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PipelineState {
    pub params: GenerationParameters,
    /// Generated colors in engine placement order
    #[schema(value_type = Vec<String>)]
    pub palette: Vec<Color>,
    pub analysis: Option<AnalysisResult>,
    /// A generation request is outstanding
    pub loading: bool,
    /// The engine has finished loading
    pub ready: bool,
    pub cvd_simulation: CvdSimulationState,
    /// Built-in palette names by category
    #[schema(value_type = Object)]
    pub builtin_palettes: PaletteCatalog,
    pub request_state: RequestState,
    #[schema(value_type = Option<String>)]
    pub generated_at: Option<DateTime<Utc>>,
}

impl PipelineState {
    fn new(params: GenerationParameters) -> Self {
        Self {
            params,
            palette: Vec::new(),
            analysis: None,
            loading: false,
            ready: false,
            cvd_simulation: CvdSimulationState::default(),
            builtin_palettes: PaletteCatalog::new(),
            request_state: RequestState::Idle,
            generated_at: None,
        }
    }
}

/// Pipeline tuning, usually derived from [`AppConfig`]
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub debounce: Duration,
    pub analysis_max_memory: f64,
    pub initial_params: GenerationParameters,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            debounce: config.debounce(),
            analysis_max_memory: config.analysis_max_memory,
            initial_params: config.defaults.clone(),
        }
    }
}

enum Command {
    UpdateParameters(GenerationParameters),
    RequestGeneration,
    SetCvdSimulation(CvdSimulationState),
    SetCvdEnabled(bool),
    ToggleCvdSimulation,
    SetCvdType(CvdType),
    SetCvdSeverity(f64),
}

enum Event {
    EngineLoaded(Result<(), EngineError>),
    CatalogLoaded(Result<PaletteCatalog, EngineError>),
    Generated {
        token: u64,
        outcome: Result<Vec<Color>, EngineError>,
    },
    Analyzed {
        token: u64,
        outcome: Result<AnalysisResult, EngineError>,
    },
}

/// Entry point: spawns the pipeline task
pub struct Pipeline;

impl Pipeline {
    /// Start the pipeline on the current tokio runtime.
    ///
    /// The engine is probed immediately; until it reports ready, generation
    /// and analysis are no-ops.
    pub fn spawn(engine: SharedEngine, config: PipelineConfig) -> PipelineHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) =
            watch::channel(PipelineState::new(config.initial_params.clone()));
        let advisories = AdvisoryBus::new();

        let actor = PipelineActor {
            engine: engine.clone(),
            scheduler: GenerationScheduler::new(config.debounce),
            compositor: AnalysisCompositor::new(config.analysis_max_memory),
            state: PipelineState::new(config.initial_params),
            palette_revision: 0,
            state_tx,
            advisories: advisories.clone(),
            events: event_tx,
        };
        tokio::spawn(actor.run(command_rx, event_rx));

        PipelineHandle {
            commands: command_tx,
            state: state_rx,
            advisories,
            engine,
        }
    }
}

/// Cloneable handle the UI layer uses to read state and propose changes
#[derive(Clone)]
pub struct PipelineHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<PipelineState>,
    advisories: AdvisoryBus,
    engine: SharedEngine,
}

impl PipelineHandle {
    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::warn!("Pipeline task is gone, command dropped");
        }
    }

    /// Propose new parameters; generation follows after the debounce window
    pub fn update_parameters(&self, params: GenerationParameters) {
        self.send(Command::UpdateParameters(params));
    }

    /// Generate now with the current parameters, bypassing the debounce
    pub fn request_generation(&self) {
        self.send(Command::RequestGeneration);
    }

    pub fn set_cvd_simulation(&self, simulation: CvdSimulationState) {
        self.send(Command::SetCvdSimulation(simulation));
    }

    pub fn set_cvd_enabled(&self, enabled: bool) {
        self.send(Command::SetCvdEnabled(enabled));
    }

    pub fn toggle_cvd_simulation(&self) {
        self.send(Command::ToggleCvdSimulation);
    }

    pub fn set_cvd_type(&self, cvd_type: CvdType) {
        self.send(Command::SetCvdType(cvd_type));
    }

    pub fn set_cvd_severity(&self, severity: f64) {
        self.send(Command::SetCvdSeverity(severity));
    }

    /// Current state snapshot
    pub fn snapshot(&self) -> PipelineState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.clone()
    }

    pub fn advisories(&self) -> broadcast::Receiver<Notice> {
        self.advisories.subscribe()
    }

    /// Preview one color under the active CVD simulation.
    ///
    /// The flag reports whether the engine simulation was applied. The color
    /// comes back unchanged with `false` when simulation is off, when the
    /// engine is not ready, or when the engine call fails.
    pub async fn simulate_color(&self, color: Color) -> (Color, bool) {
        let (simulation, ready) = {
            let state = self.state.borrow();
            (state.cvd_simulation, state.ready)
        };
        if !simulation.enabled || !ready {
            return (color, false);
        }

        match self
            .engine
            .simulate_vision(color, simulation.cvd_type, simulation.severity)
            .await
        {
            Ok(simulated) => (simulated, true),
            Err(e) => {
                tracing::error!(error = %e, color = %color, "CVD simulation failed");
                (color, false)
            }
        }
    }

    /// Colors of a built-in palette from the engine catalogue
    pub async fn builtin_palette_colors(
        &self,
        category: &str,
        name: &str,
    ) -> Result<Vec<Color>, EngineError> {
        if !self.state.borrow().ready {
            return Err(EngineError::NotReady);
        }
        let hex = self.engine.builtin_palette_colors(category, name).await?;
        hex.iter()
            .map(|h| {
                h.parse::<Color>()
                    .map_err(|e| EngineError::InvalidResponse(format!("{category}:{name}: {e}")))
            })
            .collect()
    }
}

struct PipelineActor {
    engine: SharedEngine,
    scheduler: GenerationScheduler,
    compositor: AnalysisCompositor,
    state: PipelineState,
    palette_revision: u64,
    state_tx: watch::Sender<PipelineState>,
    advisories: AdvisoryBus,
    events: mpsc::UnboundedSender<Event>,
}

impl PipelineActor {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut events: mpsc::UnboundedReceiver<Event>,
    ) {
        self.spawn_load();

        loop {
            let deadline = self.scheduler.deadline();
            let timer = async move {
                match deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(event) = events.recv() => self.handle_event(event),
                _ = timer => self.fire_due(),
            }

            self.publish();
        }

        tracing::debug!("Pipeline task stopped");
    }

    fn publish(&mut self) {
        self.state.loading = self.scheduler.awaiting_result();
        self.state.request_state = self.scheduler.state();
        let state = &self.state;
        self.state_tx.send_if_modified(|current| {
            if current != state {
                *current = state.clone();
                true
            } else {
                false
            }
        });
    }

    fn spawn_load(&self) {
        let engine = self.engine.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            tracing::info!("Loading palette engine...");
            let loaded = engine.load().await;
            let ok = loaded.is_ok();
            let _ = events.send(Event::EngineLoaded(loaded));
            if ok {
                let catalog = engine.list_builtin_palettes().await;
                let _ = events.send(Event::CatalogLoaded(catalog));
            }
        });
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::UpdateParameters(params) => {
                self.state.params = params;
                if self.state.ready {
                    self.scheduler
                        .propose(self.state.params.clone(), Instant::now());
                    self.refresh_analysis();
                } else {
                    tracing::debug!("Engine not ready, parameters stored without generating");
                }
            }
            Command::RequestGeneration => {
                if self.state.ready {
                    let ticket = self.scheduler.issue_now(self.state.params.clone());
                    self.spawn_generation(ticket);
                } else {
                    tracing::debug!("Engine not ready, generation request ignored");
                }
            }
            Command::SetCvdSimulation(simulation) => {
                self.state.cvd_simulation = CvdSimulationState {
                    severity: sanitize_severity(simulation.severity),
                    ..simulation
                };
                self.refresh_analysis();
            }
            Command::SetCvdEnabled(enabled) => {
                self.state.cvd_simulation.enabled = enabled;
                self.refresh_analysis();
            }
            Command::ToggleCvdSimulation => {
                self.state.cvd_simulation.enabled = !self.state.cvd_simulation.enabled;
                self.refresh_analysis();
            }
            Command::SetCvdType(cvd_type) => {
                self.state.cvd_simulation.cvd_type = cvd_type;
                self.refresh_analysis();
            }
            Command::SetCvdSeverity(severity) => {
                self.state.cvd_simulation.severity = sanitize_severity(severity);
                self.refresh_analysis();
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::EngineLoaded(Ok(())) => {
                tracing::info!("Palette engine loaded");
                self.state.ready = true;
                self.compositor.reset();
                let ticket = self.scheduler.issue_now(self.state.params.clone());
                self.spawn_generation(ticket);
            }
            Event::EngineLoaded(Err(e)) => {
                tracing::error!(error = %e, "Failed to load palette engine");
                self.state.ready = false;
                self.advisories.publish(Advisory::EngineUnavailable {
                    reason: e.to_string(),
                });
            }
            Event::CatalogLoaded(Ok(catalog)) => {
                tracing::info!(categories = catalog.len(), "Built-in palettes loaded");
                self.state.builtin_palettes = catalog;
            }
            Event::CatalogLoaded(Err(e)) => {
                tracing::warn!(error = %e, "Failed to list built-in palettes");
                self.advisories.publish(Advisory::CatalogUnavailable {
                    reason: e.to_string(),
                });
            }
            Event::Generated { token, outcome } => self.apply_generation(token, outcome),
            Event::Analyzed { token, outcome } => {
                let failure = outcome.as_ref().err().map(|e| e.to_string());
                if let Some(analysis) = self.compositor.complete(token, outcome) {
                    self.state.analysis = analysis;
                    if let Some(reason) = failure {
                        self.advisories.publish(Advisory::AnalysisFailed { reason });
                    }
                }
            }
        }
    }

    fn fire_due(&mut self) {
        if let Some(ticket) = self.scheduler.poll_due(Instant::now()) {
            self.spawn_generation(ticket);
        }
    }

    fn spawn_generation(&mut self, ticket: Ticket) {
        let built = build_request(&ticket.params);
        for advisory in built.advisories {
            self.advisories.publish(advisory);
        }

        tracing::debug!(
            token = ticket.token,
            extend = built.request.is_extend(),
            "Calling palette engine"
        );

        let engine = self.engine.clone();
        let events = self.events.clone();
        let request = built.request;
        let token = ticket.token;
        tokio::spawn(async move {
            let outcome = request.execute(engine.as_ref()).await;
            let _ = events.send(Event::Generated { token, outcome });
        });
    }

    fn apply_generation(&mut self, token: u64, outcome: Result<Vec<Color>, EngineError>) {
        if self.scheduler.complete(token, outcome.is_ok()) == Completion::Stale {
            return;
        }

        match outcome {
            Ok(colors) => {
                tracing::info!(token, colors = colors.len(), "Generated palette");
                self.state.palette = colors;
                self.state.generated_at = Some(Utc::now());
                self.palette_revision += 1;
                self.refresh_analysis();
            }
            Err(e) => {
                // Keep the previous palette: stale but valid
                tracing::error!(token, error = %e, "Error generating palette");
                self.advisories.publish(Advisory::GenerationFailed {
                    reason: e.to_string(),
                });
            }
        }
    }

    fn refresh_analysis(&mut self) {
        if !self.state.ready {
            return;
        }

        let inputs = AnalysisInputs::capture(
            self.palette_revision,
            &self.state.palette,
            &self.state.params,
            &self.state.cvd_simulation,
        );
        match self.compositor.recompute(inputs) {
            AnalysisDecision::Unchanged => {}
            AnalysisDecision::Clear => self.state.analysis = None,
            AnalysisDecision::Request(ticket) => self.spawn_analysis(ticket),
        }
    }

    fn spawn_analysis(&self, ticket: AnalysisTicket) {
        let engine = self.engine.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = engine.analyze(&ticket.request).await;
            let _ = events.send(Event::Analyzed {
                token: ticket.token,
                outcome,
            });
        });
    }
}

/// Severities outside 0..=1 are clamped; NaN and infinities mean no adjustment
fn sanitize_severity(severity: f64) -> f64 {
    if severity.is_finite() {
        severity.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
