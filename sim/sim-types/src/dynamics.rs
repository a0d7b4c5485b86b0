//! Physical constants.

/// Standard gravitational acceleration (m/s²), as defined by the CGPM.
pub const STANDARD_GRAVITY: f64 = 9.806_65;
