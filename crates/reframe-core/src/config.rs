//! Pipeline configuration.
//!
//! Every field has a default, so a host can deserialize a partial object:
//!
//! ```ignore
//! let config: PipelineConfig = serde_json::from_str(r#"{ "outputQuality": 80 }"#)?;
//! config.validate()?;
//! ```

use crate::pipeline::{EditError, QUALITY_MAX, QUALITY_MIN};
use serde::{Deserialize, Serialize};

/// Default encoder quality for resize and crop output.
pub const DEFAULT_OUTPUT_QUALITY: u8 = 90;
/// Default upper bound for target dimensions.
pub const DEFAULT_MAX_DIMENSION: u32 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Quality sent with resize and crop calls (1 to 100).
    pub output_quality: u8,
    /// Largest width or height a resize may target.
    pub max_dimension: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_quality: DEFAULT_OUTPUT_QUALITY,
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), EditError> {
        if !(QUALITY_MIN..=QUALITY_MAX).contains(&self.output_quality) {
            return Err(EditError::OutOfRange {
                name: "output quality",
                value: i64::from(self.output_quality),
                min: i64::from(QUALITY_MIN),
                max: i64::from(QUALITY_MAX),
            });
        }

        if self.max_dimension == 0 {
            return Err(EditError::InvalidConfig(
                "max dimension must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
