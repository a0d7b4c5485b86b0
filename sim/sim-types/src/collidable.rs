//! Link identifiers and collidable point descriptors.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a rigid link in a model description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkId(pub usize);

impl LinkId {
    /// Create a new link ID.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for LinkId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Link({})", self.0)
    }
}

/// A material point rigidly attached to a link, used as the unit of contact
/// with the terrain.
///
/// # Example
///
/// ```
/// use sim_types::{CollidablePoint, LinkId};
/// use nalgebra::Vector3;
///
/// let heel = CollidablePoint::new(LinkId::new(3), Vector3::new(-0.05, 0.0, -0.02));
/// assert!(heel.enabled);
/// assert!(!heel.disabled().enabled);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollidablePoint {
    /// Link the point is fixed to.
    pub link: LinkId,
    /// Position of the point in the link frame (m).
    pub offset: Vector3<f64>,
    /// Disabled points keep their slot but never interact with the terrain.
    pub enabled: bool,
}

impl CollidablePoint {
    /// Create an enabled collidable point.
    #[must_use]
    pub const fn new(link: LinkId, offset: Vector3<f64>) -> Self {
        Self {
            link,
            offset,
            enabled: true,
        }
    }

    /// Same point, disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}
