use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-step scale used for both impact and effort labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Low,
    Med,
    High,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Med => write!(f, "Med"),
            Self::High => write!(f, "High"),
        }
    }
}
