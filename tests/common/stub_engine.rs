//! In-process engine double that records every call.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

use palette_pilot::error::EngineError;
use palette_pilot::models::{AnalysisResult, Color, CvdType, VisionAnalysis};
use palette_pilot::services::{AnalysisRequest, Constraints, Engine, PaletteCatalog};

/// One recorded engine invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load,
    Generate {
        count: usize,
        constraints: Constraints,
    },
    Extend {
        existing: Vec<Color>,
        total: usize,
        constraints: Constraints,
    },
    Analyze(AnalysisRequest),
    Simulate {
        color: Color,
        cvd_type: CvdType,
        severity: f64,
    },
    ListPalettes,
    PaletteColors {
        category: String,
        name: String,
    },
}

/// Deterministic engine:
/// - `generate(n)` returns `n` colors `(n, i, 0)`, so the count that produced
///   a palette can be read back from it
/// - `extend` appends black until `total` is reached
/// - `simulate_vision` inverts the color
pub struct StubEngine {
    calls: Mutex<Vec<Call>>,
    load_error: Mutex<Option<EngineError>>,
    fail_generate: AtomicBool,
    fail_analyze: AtomicBool,
    fail_simulate: AtomicBool,
    simulate_identity: AtomicBool,
    gates: Mutex<HashMap<usize, oneshot::Receiver<()>>>,
}

impl StubEngine {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            load_error: Mutex::new(None),
            fail_generate: AtomicBool::new(false),
            fail_analyze: AtomicBool::new(false),
            fail_simulate: AtomicBool::new(false),
            simulate_identity: AtomicBool::new(false),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// An engine whose `load` never succeeds
    pub fn unavailable() -> Self {
        let engine = Self::new();
        *engine.load_error.lock().unwrap() =
            Some(EngineError::Transport("connection refused".into()));
        engine
    }

    pub fn fail_generate(&self, fail: bool) {
        self.fail_generate.store(fail, Ordering::SeqCst);
    }

    pub fn fail_analyze(&self, fail: bool) {
        self.fail_analyze.store(fail, Ordering::SeqCst);
    }

    pub fn fail_simulate(&self, fail: bool) {
        self.fail_simulate.store(fail, Ordering::SeqCst);
    }

    /// Make `simulate_vision` return its input, as for a color the deficiency
    /// does not affect
    pub fn simulate_identity(&self, identity: bool) {
        self.simulate_identity.store(identity, Ordering::SeqCst);
    }

    /// Hold the next generation for `count` colors until the sender fires
    pub fn gate_generate(&self, count: usize) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(count, rx);
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Counts of every generate call, in call order
    pub fn generate_counts(&self) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Generate { count, .. } => Some(count),
                _ => None,
            })
            .collect()
    }

    pub fn analyze_requests(&self) -> Vec<AnalysisRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Analyze(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn palette_for(count: usize) -> Vec<Color> {
        (0..count)
            .map(|i| Color::from_u8(count as u8, i as u8, 0))
            .collect()
    }

    pub fn catalog() -> PaletteCatalog {
        let mut catalog = BTreeMap::new();
        catalog.insert(
            "ColorBrewer".to_string(),
            vec!["Set1".to_string(), "Dark2".to_string()],
        );
        catalog.insert("Tableau".to_string(), vec!["Tableau10".to_string()]);
        catalog
    }
}

impl Default for StubEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for StubEngine {
    async fn load(&self) -> Result<(), EngineError> {
        self.record(Call::Load);
        match self.load_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn generate(
        &self,
        count: usize,
        constraints: &Constraints,
    ) -> Result<Vec<Color>, EngineError> {
        self.record(Call::Generate {
            count,
            constraints: constraints.clone(),
        });

        let gate = self.gates.lock().unwrap().remove(&count);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if self.fail_generate.load(Ordering::SeqCst) {
            return Err(EngineError::Status {
                status: 500,
                body: "optimizer diverged".into(),
            });
        }
        Ok(Self::palette_for(count))
    }

    async fn extend(
        &self,
        existing: &[Color],
        total: usize,
        constraints: &Constraints,
    ) -> Result<Vec<Color>, EngineError> {
        self.record(Call::Extend {
            existing: existing.to_vec(),
            total,
            constraints: constraints.clone(),
        });
        let mut colors = existing.to_vec();
        colors.resize(total.max(existing.len()), Color::from_u8(0, 0, 0));
        Ok(colors)
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, EngineError> {
        self.record(Call::Analyze(request.clone()));
        if self.fail_analyze.load(Ordering::SeqCst) {
            return Err(EngineError::Transport("analysis worker crashed".into()));
        }

        let n = request.colors.len();
        let mut by_vision = BTreeMap::new();
        by_vision.insert(
            "normal".to_string(),
            VisionAnalysis {
                difference_matrix: vec![vec![10.0; n]; n],
                min_distances: vec![10.0; n],
                bg_min_distance: request.background.map(|_| 20.0),
            },
        );
        Ok(AnalysisResult { by_vision })
    }

    async fn simulate_vision(
        &self,
        color: Color,
        cvd_type: CvdType,
        severity: f64,
    ) -> Result<Color, EngineError> {
        self.record(Call::Simulate {
            color,
            cvd_type,
            severity,
        });
        if self.fail_simulate.load(Ordering::SeqCst) {
            return Err(EngineError::Transport("simulation failed".into()));
        }
        if self.simulate_identity.load(Ordering::SeqCst) {
            return Ok(color);
        }
        Ok(Color::new(1.0 - color.r(), 1.0 - color.g(), 1.0 - color.b()))
    }

    async fn list_builtin_palettes(&self) -> Result<PaletteCatalog, EngineError> {
        self.record(Call::ListPalettes);
        Ok(Self::catalog())
    }

    async fn builtin_palette_colors(
        &self,
        category: &str,
        name: &str,
    ) -> Result<Vec<String>, EngineError> {
        self.record(Call::PaletteColors {
            category: category.to_string(),
            name: name.to_string(),
        });
        match (category, name) {
            ("ColorBrewer", "Set1") => Ok(vec![
                "#E41A1C".to_string(),
                "#377EB8".to_string(),
                "#4DAF4A".to_string(),
            ]),
            _ => Err(EngineError::UnknownPalette(format!("{category}:{name}"))),
        }
    }
}
