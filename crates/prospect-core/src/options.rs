use std::time::Duration;

use crate::error::EngineError;
use crate::mask::PhoneMask;

/// Whether the engine renders only the viewport window or every row.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Windowing {
    /// Only the rows intersecting the viewport (plus overscan) are produced.
    #[default]
    Virtualized,
    /// Every filtered row is produced, starting at offset zero.
    Full,
}

/// Configuration for a [`WindowedList`](crate::engine::WindowedList).
///
/// All fields have sensible defaults (see [`Default`] impl). Use struct
/// update syntax to override only what you need:
///
/// ```rust,ignore
/// use std::time::Duration;
/// use prospect_core::EngineOptions;
///
/// let opts = EngineOptions {
///     item_height: 2.0,
///     debounce: Duration::from_millis(150),
///     ..EngineOptions::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Height of a single row, in the same unit as the viewport (default: 1).
    pub item_height: f64,
    /// Quiet period before a typed search term takes effect (default: 300ms).
    pub debounce: Duration,
    /// Virtualized or full rendering (default: virtualized).
    pub windowing: Windowing,
    /// Extra rows produced past the viewport edge (default: 1).
    pub overscan: usize,
    /// Phone masking policy used by [`mask`](crate::engine::WindowedList::mask).
    pub phone_mask: PhoneMask,
    /// Drop selected ids that vanish when the items are replaced (default: true).
    pub prune_selection_on_replace: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            item_height: 1.0,
            debounce: Duration::from_millis(300),
            windowing: Windowing::default(),
            overscan: 1,
            phone_mask: PhoneMask::default(),
            prune_selection_on_replace: true,
        }
    }
}

impl EngineOptions {
    /// Check the options for contract violations.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.item_height.is_finite() || self.item_height <= 0.0 {
            return Err(EngineError::config(format!(
                "item height must be positive, got {}",
                self.item_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let opts = EngineOptions::default();
        assert!(opts.validate().is_ok());
        assert_eq!(opts.overscan, 1);
        assert_eq!(opts.windowing, Windowing::Virtualized);
        assert!(opts.prune_selection_on_replace);
    }

    #[test]
    fn zero_item_height_rejected() {
        let opts = EngineOptions {
            item_height: 0.0,
            ..EngineOptions::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(EngineError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn nan_item_height_rejected() {
        let opts = EngineOptions {
            item_height: f64::NAN,
            ..EngineOptions::default()
        };
        assert!(opts.validate().is_err());
    }
}
