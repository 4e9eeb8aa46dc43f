//! Pluggable row size estimation.

use crate::row::RowDescriptor;

/// Strategy used to size rows that have not been measured yet.
///
/// Implementations must be pure: the same row must always produce the same
/// estimate, otherwise cached offsets drift from what the estimator reports.
pub trait SizeEstimator: Send + Sync {
    /// Estimated size of `row` in device units.
    fn estimate(&self, row: &RowDescriptor) -> u32;
}

impl<F> SizeEstimator for F
where
    F: Fn(&RowDescriptor) -> u32 + Send + Sync,
{
    fn estimate(&self, row: &RowDescriptor) -> u32 {
        self(row)
    }
}

/// Every row gets the same size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSize(pub u32);

impl SizeEstimator for FixedSize {
    fn estimate(&self, _row: &RowDescriptor) -> u32 {
        self.0
    }
}

/// Collapsed rows get `base`, expanded rows get `base * factor`.
///
/// This is only the pre-measurement guess; once the renderer measures an
/// expanded row the measurement wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandedMultiplier {
    pub base: u32,
    pub factor: u32,
}

impl ExpandedMultiplier {
    /// Default multiplier applied to expanded rows.
    pub const DEFAULT_FACTOR: u32 = 4;

    pub fn new(base: u32) -> Self {
        Self {
            base,
            factor: Self::DEFAULT_FACTOR,
        }
    }

    pub fn with_factor(mut self, factor: u32) -> Self {
        self.factor = factor;
        self
    }
}

impl SizeEstimator for ExpandedMultiplier {
    fn estimate(&self, row: &RowDescriptor) -> u32 {
        if row.is_expanded() {
            self.base.saturating_mul(self.factor)
        } else {
            self.base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_ignores_expansion() {
        let est = FixedSize(40);
        assert_eq!(est.estimate(&RowDescriptor::new("a", 0)), 40);
        assert_eq!(est.estimate(&RowDescriptor::new("b", 1).expanded()), 40);
    }

    #[test]
    fn test_expanded_multiplier() {
        let est = ExpandedMultiplier::new(40);
        assert_eq!(est.estimate(&RowDescriptor::new("a", 0).expandable()), 40);
        assert_eq!(est.estimate(&RowDescriptor::new("a", 0).expanded()), 160);
        assert_eq!(
            est.with_factor(2)
                .estimate(&RowDescriptor::new("a", 0).expanded()),
            80
        );
    }

    #[test]
    fn test_closure_estimator() {
        let est = |row: &RowDescriptor| 10 + row.index as u32;
        assert_eq!(est.estimate(&RowDescriptor::new("a", 5)), 15);
    }
}
