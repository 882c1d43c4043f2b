/// Descriptive statistics summarizing a dataset of `f32` values.
///
/// Collects the measures the training reports rely on: extrema, central
/// tendency, and spread. `normalized_std_dev` (`std_dev / range`) is used
/// as a scale-free convergence indicator for per-gene weight
/// distributions.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// Number of values in the dataset.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f32,
    /// The maximum value in the dataset.
    pub max: f32,
    /// The arithmetic mean of the dataset.
    pub mean: f32,
    /// The median value of the dataset.
    pub median: f32,
    /// The (population) standard deviation of the dataset.
    pub std_dev: f32,
    /// `std_dev / (max - min)`, or `0.0` when the range is degenerate.
    pub normalized_std_dev: f32,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// The values are collected and sorted internally. Returns `None` for
    /// an empty dataset.
    ///
    /// # Examples
    ///
    /// ```
    /// # use swarmevo_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from values already sorted in
    /// ascending order, skipping the sort.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f32]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let count = sorted_values.len();
        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let n = count as f32;
        let mean = sorted_values.iter().copied().sum::<f32>() / n;
        let median = sorted_values[count / 2];
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f32>()
            / n;
        let std_dev = variance.sqrt();
        // Relative epsilon keeps near-constant datasets from reporting a
        // meaningless spread at small scales.
        let range = max - min;
        let normalized_std_dev = if range.abs() < mean.abs() * f32::EPSILON {
            0.0
        } else {
            std_dev / range
        };

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            std_dev,
            normalized_std_dev,
        })
    }
}
