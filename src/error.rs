// Errors surfaced to callers of the engine. The numeric core itself never fails;
// these cover malformed inputs and configuration only.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("forecast {series} series has {len} entries, expected {expected}")]
    InvalidForecastShape {
        series: &'static str,
        len: usize,
        expected: usize,
    },

    #[error("invalid engine configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("failed to parse engine configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to read engine configuration: {0}")]
    ConfigRead(#[from] std::io::Error),
}

impl SimError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        SimError::InvalidConfig {
            reason: reason.into(),
        }
    }
}
