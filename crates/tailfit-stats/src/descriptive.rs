use serde::{Deserialize, Serialize};

/// Descriptive summary of a set of observed values.
///
/// Used for the range heuristics of the analyzers' pre-checks and for reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveSummary {
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean of the dataset.
    pub mean: f64,
    /// The median value of the dataset.
    pub median: f64,
    /// The population standard deviation of the dataset.
    pub std_dev: f64,
    /// Number of values.
    pub count: usize,
}

impl DescriptiveSummary {
    /// Computes the summary from unsorted values.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveSummary)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use tailfit_stats::descriptive::DescriptiveSummary;
    /// let summary = DescriptiveSummary::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(summary.min, 1.0);
    /// assert_eq!(summary.max, 5.0);
    /// assert_eq!(summary.mean, 3.0);
    /// assert_eq!(summary.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes the summary from values sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        debug_assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let median = if count % 2 == 0 {
            f64::midpoint(sorted_values[count / 2 - 1], sorted_values[count / 2])
        } else {
            sorted_values[count / 2]
        };
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / n;

        Some(Self {
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
            count,
        })
    }

    /// Ratio `max / min`, or `None` when the minimum is not positive.
    #[must_use]
    pub fn range_ratio(&self) -> Option<f64> {
        (self.min > 0.0).then(|| self.max / self.min)
    }

    /// Orders of magnitude spanned by the data, `log10(max / min)`.
    ///
    /// ```
    /// # use tailfit_stats::descriptive::DescriptiveSummary;
    /// let summary = DescriptiveSummary::new([1.0, 10.0, 1000.0]).unwrap();
    /// assert!((summary.orders_of_magnitude().unwrap() - 3.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn orders_of_magnitude(&self) -> Option<f64> {
        self.range_ratio().map(f64::log10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_none() {
        assert!(DescriptiveSummary::new(std::iter::empty()).is_none());
    }

    #[test]
    fn test_even_count_median() {
        let summary = DescriptiveSummary::new([4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.count, 4);
    }

    #[test]
    fn test_range_requires_positive_minimum() {
        let summary = DescriptiveSummary::new([-1.0, 2.0]).unwrap();
        assert_eq!(summary.range_ratio(), None);
        assert_eq!(summary.orders_of_magnitude(), None);
    }
}
