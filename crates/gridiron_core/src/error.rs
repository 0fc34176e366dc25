use thiserror::Error;

/// Malformed caller input. Rejected at the step boundary, never applied to state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Invalid player count: expected {expected}, found {found}")]
    WrongPlayerCount { expected: usize, found: usize },

    #[error("Unsupported action dims: {0} (expected 2 or 4)")]
    UnsupportedActionDims(usize),

    #[error("Invalid flat action length: expected {expected}, found {found}")]
    FlatLength { expected: usize, found: usize },

    #[error("Non-finite action value for player {player} (component {component})")]
    NonFinite { player: usize, component: usize },

    #[error("Unknown player index: {0}")]
    UnknownPlayer(usize),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// NaN or out-of-range state detected after a step. Fatal for the match.
    #[error("Invariant violation at tick {tick}: {detail}")]
    InvariantViolation { tick: u64, detail: String },

    #[error("Match faulted at tick {tick}; reset required")]
    Faulted { tick: u64 },

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl SimError {
    /// Whether the match instance can keep stepping after this error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimError::Input(_) => true,
            SimError::InvariantViolation { .. } => false,
            SimError::Faulted { .. } => false,
            SimError::Config(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_recoverable() {
        let err: SimError = InputError::WrongPlayerCount { expected: 14, found: 3 }.into();
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "Input error: Invalid player count: expected 14, found 3"
        );
    }

    #[test]
    fn test_invariant_violation_is_fatal() {
        let err = SimError::InvariantViolation { tick: 12, detail: "ball.x=NaN".into() };
        assert!(!err.is_recoverable());
        assert!(!SimError::Faulted { tick: 12 }.is_recoverable());
    }
}
