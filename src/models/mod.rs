pub mod analysis;
pub mod color;
pub mod config;
pub mod cvd;
pub mod params;
pub mod region;

pub use analysis::{AnalysisResult, VisionAnalysis};
pub use color::Color;
pub use config::{AppConfig, EngineConfig};
pub use cvd::{CvdSimulationState, CvdType, CvdVector};
pub use params::{GenerationParameters, WhitePoint};
pub use region::{ColorSpaceRegion, ColorspaceType, RegionAxis};
