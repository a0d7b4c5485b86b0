//! Which links touch the terrain.

use nalgebra::Point3;
use sim_model::MechanismModel;
use sim_terrain::TerrainModel;
use sim_types::{CollidablePoint, Result, SimError};
use tracing::trace;

use crate::{collidable_point_positions, ModelData};

/// Per point: enabled and at or below the terrain (`z ≤ h(x, y)`).
#[must_use]
pub fn points_in_contact<T: TerrainModel + ?Sized>(
    points: &[CollidablePoint],
    positions: &[Point3<f64>],
    terrain: &T,
) -> Vec<bool> {
    let heights = terrain.heights(positions);
    points
        .iter()
        .zip(positions)
        .zip(heights)
        .map(|((point, p), h)| point.enabled && p.z <= h)
        .collect()
}

/// Reduce point flags to link flags: a link is in contact if any of its
/// points is.
fn links_in_contact(points: &[CollidablePoint], touching: &[bool], links: usize) -> Vec<bool> {
    let mut out = vec![false; links];
    for (point, &t) in points.iter().zip(touching) {
        if t {
            if let Some(slot) = out.get_mut(point.link.index()) {
                *slot = true;
            }
        }
    }
    out
}

/// Contact flag of each link.
///
/// The result always has one entry per link, in link-index order. The
/// optional `link_names` are checked against the model and do not change
/// the shape of the result.
///
/// Fails with [`SimError::UnknownLink`] before any computation if a
/// requested name is not a link of the model.
///
/// # Example
///
/// ```
/// use sim_contact::{in_contact, ModelData, SoftContactsParams};
/// use sim_model::{LinkDescription, Model, ModelDescription};
/// use sim_types::Vector3;
///
/// let mut desc = ModelDescription::new("ball").with_floating_base(true);
/// let ball = desc.add_link(LinkDescription::root("ball", 1.0));
/// desc.add_collidable_point(ball, Vector3::new(0.0, 0.0, -0.1));
/// let model = Model::on_flat_ground(desc).unwrap();
///
/// let data = ModelData::zero(&model, SoftContactsParams::default());
/// assert_eq!(in_contact(&model, &data, None).unwrap(), vec![true]);
/// assert!(in_contact(&model, &data, Some(&["wheel"][..])).is_err());
/// ```
pub fn in_contact<M: MechanismModel + ?Sized>(
    model: &M,
    data: &ModelData,
    link_names: Option<&[&str]>,
) -> Result<Vec<bool>> {
    if let Some(name) = link_names
        .unwrap_or_default()
        .iter()
        .find(|name| model.link_index(name).is_none())
    {
        return Err(SimError::unknown_link(*name));
    }

    let positions = collidable_point_positions(model, data)?;
    let points = model.collidable_points();
    let touching = points_in_contact(points, &positions, model.terrain());
    let links = links_in_contact(points, &touching, model.number_of_links());

    trace!(
        points = touching.iter().filter(|t| **t).count(),
        links = links.iter().filter(|t| **t).count(),
        "contact detection"
    );

    Ok(links)
}
