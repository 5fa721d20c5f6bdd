// Library exports for dashgraph

pub mod data;
pub mod domain;
pub mod error;
pub mod filter;
pub mod palette;
pub mod parser;
pub mod scale;
pub mod template;

// Chart derivation
pub mod catalog;
pub mod ir;
pub mod join;
pub mod runtime;
pub mod transform;

pub mod csv_writer;

pub use catalog::View;
pub use data::AnalyticsPayload;
pub use error::EngineError;
pub use filter::FilterSelection;
pub use ir::ViewOutput;
pub use runtime::{render, render_view, Dashboard};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum OutputFormat {
    #[serde(rename = "json")]
    #[default]
    Json,
    #[serde(rename = "csv")]
    Csv,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputOptions {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub pretty: bool,
    /// Values every filter may take; when given, the selection is checked
    /// against them before rendering.
    #[serde(default)]
    pub choices: Option<filter::FilterDomainPayload>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            pretty: false,
            choices: None,
        }
    }
}

impl OutputOptions {
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(text)?)
    }
}
