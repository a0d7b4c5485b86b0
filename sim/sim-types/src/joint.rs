//! Joint types for articulated mechanisms.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type of joint connecting a link to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointType {
    /// No relative motion.
    #[default]
    Fixed,
    /// Rotation around a single axis.
    Revolute,
    /// Translation along a single axis.
    Prismatic,
}
