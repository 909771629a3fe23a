//! Errors raised by the windowed list engine.

/// Errors that can occur while configuring or driving a
/// [`WindowedList`](crate::engine::WindowedList).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// Viewport or engine options violate the caller contract
    /// (non-positive item height, negative viewport, non-finite values).
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Human-readable description of the violated constraint.
        reason: String,
    },
    /// A "select first N" request named a count outside `1..=available`.
    #[error("cannot select {input:?} of {available} items")]
    InvalidSelectionCount {
        /// The count as the user supplied it.
        input: String,
        /// Number of items the selection would be drawn from.
        available: usize,
    },
}

impl EngineError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        EngineError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        let err = EngineError::config("item height must be positive");
        assert_eq!(
            err.to_string(),
            "invalid configuration: item height must be positive"
        );

        let err = EngineError::InvalidSelectionCount {
            input: "5".into(),
            available: 3,
        };
        assert_eq!(err.to_string(), "cannot select \"5\" of 3 items");
    }
}
