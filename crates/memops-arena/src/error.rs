//! Arena construction errors.

use std::error::Error;
use std::fmt;

use crate::config::ConfigError;

/// Errors that can occur while building an allocator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The backing buffer is longer than a descriptor endpoint can address.
    BufferTooLarge {
        /// Length of the rejected buffer in bytes.
        len: usize,
        /// Largest supported length in bytes.
        max: usize,
    },
    /// The allocator configuration failed validation.
    InvalidConfig(ConfigError),
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooLarge { len, max } => {
                write!(f, "backing buffer of {len} bytes exceeds maximum of {max} bytes")
            }
            Self::InvalidConfig(e) => write!(f, "invalid allocator config: {e}"),
        }
    }
}

impl Error for ArenaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for ArenaError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfig(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_exposes_source() {
        let e = ArenaError::from(ConfigError::ZeroDefragThreshold);
        assert!(e.source().is_some());
        assert!(e.to_string().starts_with("invalid allocator config:"));
    }

    #[test]
    fn buffer_too_large_has_no_source() {
        let e = ArenaError::BufferTooLarge {
            len: usize::MAX,
            max: u32::MAX as usize,
        };
        assert!(e.source().is_none());
    }
}
