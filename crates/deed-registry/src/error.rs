use deed_gate::GateError;
use deed_types::RejectCode;

/// Errors produced by registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The operation was refused; nothing changed.
    #[error("rejected with code {code}: {0}", code = .0.code())]
    Rejected(#[from] RejectCode),

    #[error("gate error: {0}")]
    Gate(#[from] GateError),

    #[error("registry lock poisoned")]
    LockPoisoned,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("snapshot checksum mismatch")]
    ChecksumMismatch,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RegistryError {
    /// The reject code, if this error is a refusal rather than a fault.
    pub fn reject_code(&self) -> Option<RejectCode> {
        match self {
            Self::Rejected(code) => Some(*code),
            _ => None,
        }
    }
}

/// Convenience type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
