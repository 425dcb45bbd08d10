use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    InvalidConfig(String),
    ThreadSpawn(String),
    ThreadPanicked(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            SimError::ThreadSpawn(name) => write!(f, "failed to spawn thread '{}'", name),
            SimError::ThreadPanicked(name) => write!(f, "thread '{}' panicked", name),
        }
    }
}

impl std::error::Error for SimError {}

pub type SimResult<T> = Result<T, SimError>;
