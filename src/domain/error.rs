//! Domain error types.

/// Top-level error type for agent-arena.
///
/// The simulation core itself never fails: degenerate inputs produce defined
/// degenerate results. Errors surface only from the outer layers (config,
/// data loading, report writing) before or after the simulations run.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
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

    #[error("no price data found at {path}")]
    NoData { path: String },

    #[error("insufficient data for {token}: have {candles} candles, need {minimum}")]
    InsufficientData {
        token: String,
        candles: usize,
        minimum: usize,
    },

    #[error("malformed price data in {source_name}: {reason}")]
    DataFormat { source_name: String, reason: String },

    #[error("unknown strategy catalog: {0}")]
    UnknownCatalog(String),

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ArenaError> for std::process::ExitCode {
    fn from(err: &ArenaError) -> Self {
        let code: u8 = match err {
            ArenaError::Io(_) => 1,
            ArenaError::ConfigParse { .. }
            | ArenaError::ConfigMissing { .. }
            | ArenaError::ConfigInvalid { .. } => 2,
            ArenaError::NoData { .. }
            | ArenaError::InsufficientData { .. }
            | ArenaError::DataFormat { .. } => 3,
            ArenaError::UnknownCatalog(_) => 4,
            ArenaError::Report { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    #[test]
    fn display_includes_context() {
        let err = ArenaError::InsufficientData {
            token: "SOL".into(),
            candles: 12,
            minimum: 30,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data for SOL: have 12 candles, need 30"
        );
    }

    #[test]
    fn config_errors_share_exit_code() {
        let missing = ArenaError::ConfigMissing {
            section: "arena".into(),
            key: "agents".into(),
        };
        let invalid = ArenaError::ConfigInvalid {
            section: "arena".into(),
            key: "agents".into(),
            reason: "must be positive".into(),
        };
        assert_eq!(ExitCode::from(&missing), ExitCode::from(2));
        assert_eq!(ExitCode::from(&invalid), ExitCode::from(2));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ArenaError = io.into();
        assert!(matches!(err, ArenaError::Io(_)));
        assert_eq!(ExitCode::from(&err), ExitCode::from(1));
    }
}
