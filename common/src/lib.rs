pub mod float_ext;
pub mod log_setup;

/// Absolute tolerance for `FloatExt::approximately_eq`.
pub const EPSILON: f64 = 1e-6;
