//! Engine client speaking JSON over HTTP.
//!
//! Colors travel as `{r, g, b}` floats in 0.0..=1.0; regions use the
//! engine's `h_min`/`s_or_c_min`/`l_min` field names.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::engine::{AnalysisRequest, Constraints, Engine, InputSource, PaletteCatalog};
use crate::error::EngineError;
use crate::models::{AnalysisResult, Color, ColorSpaceRegion, CvdType, CvdVector};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct WireColor {
    r: f64,
    g: f64,
    b: f64,
}

impl From<Color> for WireColor {
    fn from(color: Color) -> Self {
        Self {
            r: color.r(),
            g: color.g(),
            b: color.b(),
        }
    }
}

impl From<WireColor> for Color {
    fn from(wire: WireColor) -> Self {
        Color::new(wire.r, wire.g, wire.b)
    }
}

fn wire_colors(colors: &[Color]) -> Vec<WireColor> {
    colors.iter().copied().map(WireColor::from).collect()
}

#[derive(Debug, Serialize)]
struct WireRegion {
    h_min: f64,
    h_max: f64,
    s_or_c_min: f64,
    s_or_c_max: f64,
    l_min: f64,
    l_max: f64,
}

impl From<&ColorSpaceRegion> for WireRegion {
    fn from(region: &ColorSpaceRegion) -> Self {
        Self {
            h_min: region.hue_min,
            h_max: region.hue_max,
            s_or_c_min: region.s_or_c_min,
            s_or_c_max: region.s_or_c_max,
            l_min: region.light_min,
            l_max: region.light_max,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireInput {
    Colors {
        colors: Vec<WireColor>,
    },
    Regions {
        space: &'static str,
        regions: Vec<WireRegion>,
    },
}

#[derive(Debug, Serialize)]
struct WireConstraints {
    input: WireInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    background: Option<WireColor>,
    white_point: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cvd: Option<CvdVector>,
}

impl From<&Constraints> for WireConstraints {
    fn from(constraints: &Constraints) -> Self {
        let input = match &constraints.input {
            InputSource::Colors { colors } => WireInput::Colors {
                colors: wire_colors(colors),
            },
            InputSource::Regions {
                regions,
                colorspace,
            } => WireInput::Regions {
                space: colorspace.as_str(),
                regions: regions.iter().map(WireRegion::from).collect(),
            },
        };
        Self {
            input,
            background: constraints.background.map(WireColor::from),
            white_point: constraints.white_point.as_str(),
            cvd: constraints.cvd,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateBody {
    count: usize,
    constraints: WireConstraints,
}

#[derive(Debug, Serialize)]
struct ExtendBody {
    existing: Vec<WireColor>,
    count: usize,
    constraints: WireConstraints,
}

#[derive(Debug, Serialize)]
struct AnalyzeBody {
    colors: Vec<WireColor>,
    cvd: CvdVector,
    background: Option<WireColor>,
    max_memory: f64,
}

#[derive(Debug, Serialize)]
struct SimulateBody {
    color: WireColor,
    cvd_type: CvdType,
    severity: f64,
}

/// Engine reached over HTTP
pub struct HttpEngine {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEngine {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, EngineError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn get_json<R: DeserializeOwned>(&self, url: &str) -> Result<R, EngineError> {
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, EngineError> {
        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(EngineError::NotReady);
        }
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Rejected(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<R>().await?)
    }

    fn palette_url(&self, category: &str, name: &str) -> Result<Url, EngineError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| EngineError::Transport(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| {
                EngineError::Transport(format!("Cannot build URL from {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(["palettes", category, name]);
        Ok(url)
    }
}

#[async_trait]
impl Engine for HttpEngine {
    async fn load(&self) -> Result<(), EngineError> {
        let response = self.client.get(self.url("/health")).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status == StatusCode::SERVICE_UNAVAILABLE {
            Err(EngineError::NotReady)
        } else {
            Err(EngineError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }

    async fn generate(
        &self,
        count: usize,
        constraints: &Constraints,
    ) -> Result<Vec<Color>, EngineError> {
        let body = GenerateBody {
            count,
            constraints: constraints.into(),
        };
        let colors: Vec<WireColor> = self.post_json("/generate", &body).await?;
        Ok(colors.into_iter().map(Color::from).collect())
    }

    async fn extend(
        &self,
        existing: &[Color],
        total: usize,
        constraints: &Constraints,
    ) -> Result<Vec<Color>, EngineError> {
        if existing.is_empty() {
            return Err(EngineError::Rejected("extend requires existing colors".into()));
        }
        let body = ExtendBody {
            existing: wire_colors(existing),
            count: total,
            constraints: constraints.into(),
        };
        let colors: Vec<WireColor> = self.post_json("/extend", &body).await?;
        Ok(colors.into_iter().map(Color::from).collect())
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, EngineError> {
        let body = AnalyzeBody {
            colors: wire_colors(&request.colors),
            cvd: request.cvd,
            background: request.background.map(WireColor::from),
            max_memory: request.max_memory,
        };
        self.post_json("/analyze", &body).await
    }

    async fn simulate_vision(
        &self,
        color: Color,
        cvd_type: CvdType,
        severity: f64,
    ) -> Result<Color, EngineError> {
        let body = SimulateBody {
            color: color.into(),
            cvd_type,
            severity,
        };
        let simulated: WireColor = self.post_json("/simulate", &body).await?;
        Ok(simulated.into())
    }

    async fn list_builtin_palettes(&self) -> Result<PaletteCatalog, EngineError> {
        self.get_json(&self.url("/palettes")).await
    }

    async fn builtin_palette_colors(
        &self,
        category: &str,
        name: &str,
    ) -> Result<Vec<String>, EngineError> {
        let url = self.palette_url(category, name)?;
        match self.get_json(url.as_str()).await {
            Err(EngineError::Status { status: 404, .. }) => {
                Err(EngineError::UnknownPalette(format!("{category}:{name}")))
            }
            other => other,
        }
    }
}
