//! Domain error types.

/// Top-level error type for gridtrader.
#[derive(Debug, thiserror::Error)]
pub enum GridtraderError {
    #[error("bar series error: {reason}")]
    BarSeries { reason: String },

    #[error("strategy slot error: {reason}")]
    StrategySlot { reason: String },

    #[error("equity log error: {reason}")]
    EquityLog { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("insufficient data: have {bars} bars, need {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error("optimizer produced no candidates")]
    NoCandidates,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&GridtraderError> for std::process::ExitCode {
    fn from(err: &GridtraderError) -> Self {
        let code: u8 = match err {
            GridtraderError::Io(_) => 1,
            GridtraderError::ConfigParse { .. }
            | GridtraderError::ConfigMissing { .. }
            | GridtraderError::ConfigInvalid { .. } => 2,
            GridtraderError::BarSeries { .. } => 3,
            GridtraderError::StrategySlot { .. } | GridtraderError::EquityLog { .. } => 4,
            GridtraderError::InsufficientData { .. } | GridtraderError::NoCandidates => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = GridtraderError::ConfigMissing {
            section: "data".into(),
            key: "bars_path".into(),
        };
        assert_eq!(err.to_string(), "missing config key [data] bars_path");

        let err = GridtraderError::InsufficientData {
            bars: 1,
            minimum: 2,
        };
        assert_eq!(err.to_string(), "insufficient data: have 1 bars, need 2");
    }
}
