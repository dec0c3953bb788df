pub trait FloatExt {
    /// True when the two values differ by less than [`crate::EPSILON`].
    fn approximately_eq(self, other: Self) -> bool;

    /// Returns the value when finite, zero otherwise.
    fn finite_or_zero(self) -> Self;
}

impl FloatExt for f32 {
    fn approximately_eq(self, other: Self) -> bool {
        (self - other).abs() < crate::EPSILON as f32
    }

    fn finite_or_zero(self) -> Self {
        if self.is_finite() {
            self
        } else {
            0.0
        }
    }
}

impl FloatExt for f64 {
    fn approximately_eq(self, other: Self) -> bool {
        (self - other).abs() < crate::EPSILON
    }

    fn finite_or_zero(self) -> Self {
        if self.is_finite() {
            self
        } else {
            0.0
        }
    }
}

/// Reductions that skip non-finite samples, the way `nansum`/`nanmean` do.
pub trait FiniteIterExt: Iterator<Item = f64> + Sized {
    /// Sum and count of the finite samples.
    fn finite_sum_count(self) -> (f64, usize) {
        self.filter(|v| v.is_finite())
            .fold((0.0, 0), |(sum, n), v| (sum + v, n + 1))
    }

    /// Sum of the finite samples. An empty or all non-finite input sums to 0.
    fn finite_sum(self) -> f64 {
        self.finite_sum_count().0
    }

    /// Mean of the finite samples, NaN when none are finite.
    fn finite_mean(self) -> f64 {
        match self.finite_sum_count() {
            (_, 0) => f64::NAN,
            (sum, n) => sum / n as f64,
        }
    }
}

impl<I: Iterator<Item = f64>> FiniteIterExt for I {}
