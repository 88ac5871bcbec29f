use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

use super::{LineRenderConfig, RenderStats};

pub const LINE_RENDER_CONFIG_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineRenderConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: LineRenderConfig,
}

impl LineRenderConfig {
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize render config json: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(self) -> ChartResult<String> {
        let payload = LineRenderConfigJsonContractV1 {
            schema_version: LINE_RENDER_CONFIG_JSON_SCHEMA_V1,
            config: self,
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize render config contract v1: {e}"))
        })
    }

    /// Accepts either a bare config or a v1 contract payload, then validates it.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(config) = serde_json::from_str::<LineRenderConfig>(input) {
            return config.validate();
        }
        let payload: LineRenderConfigJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse render config json payload: {e}"))
        })?;
        if payload.schema_version != LINE_RENDER_CONFIG_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported render config schema version: {}",
                payload.schema_version
            )));
        }
        payload.config.validate()
    }
}

impl RenderStats {
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize render stats json: {e}"))
        })
    }
}
