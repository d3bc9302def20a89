pub mod advisory;
pub mod analysis;
pub mod color_parser;
pub mod engine;
pub mod http_engine;
pub mod pipeline;
pub mod region_normalizer;
pub mod request_builder;
pub mod scheduler;

pub use advisory::{Advisory, AdvisoryBus, Notice};
pub use analysis::{effective_cvd, AnalysisCompositor};
pub use color_parser::{parse_colors, parse_hex_list};
pub use engine::{
    AnalysisRequest, Constraints, Engine, EngineRequest, InputSource, Operation, PaletteCatalog,
    SharedEngine,
};
pub use http_engine::HttpEngine;
pub use pipeline::{Pipeline, PipelineConfig, PipelineHandle, PipelineState};
pub use region_normalizer::{normalize_region, normalize_regions};
pub use request_builder::{build_request, BuiltRequest};
pub use scheduler::{GenerationScheduler, RequestState};
