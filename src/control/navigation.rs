//! Grid navigation and distance-based formation control
//!
//! Movement is 8-connected with a speed of one cell per axis per round.
//! Formation keeping is bang-bang control with a fixed step of one cell:
//! from distance `d` a drone reaches `desired` in `|d - desired|` rounds
//! when its reference stays put.

use crate::knowledge::Closest;
use crate::rng::SimRng;
use crate::types::*;
use crate::world::SpatialWorld;

/// Targets this close to a grid edge are pushed inwards
pub const EDGE_MARGIN: i32 = 5;

/// Cells an edge target is pushed by
pub const EDGE_DEFLECTION: i32 = 2;

/// Targets within this distance of the home base are pushed away from it
pub const BASE_CLEARANCE: u32 = 1;

/// Outcome of one formation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormationMove {
    /// Nobody to keep distance to
    Wander,
    /// Already at the desired distance
    Hold,
    /// Head for this cell
    Nudge(GridPos),
}

/// One formation step from `pos` relative to `reference`.
///
/// Too close moves one cell away on every differing axis, too far moves one
/// cell closer; either changes the Chebyshev distance by exactly one.
pub fn formation_move(pos: GridPos, reference: Option<Closest>, desired: u32) -> FormationMove {
    let Some(reference) = reference else {
        return FormationMove::Wander;
    };
    let d = pos.chebyshev_distance(&reference.pos);
    if d == desired {
        FormationMove::Hold
    } else if d < desired {
        FormationMove::Nudge(pos.step_away_from(&reference.pos))
    } else {
        FormationMove::Nudge(pos.step_towards(&reference.pos))
    }
}

/// Adjust a target so drones stay off the grid edges and do not collapse
/// back onto their base; the result is always in bounds.
pub fn change_target(world: &dyn SpatialWorld, target: GridPos, base: GridPos) -> GridPos {
    let width = world.width() as i32;
    let height = world.height() as i32;
    let mut adjusted = target;

    if adjusted.x <= EDGE_MARGIN {
        adjusted.x += EDGE_DEFLECTION;
    }
    if adjusted.x >= width - EDGE_MARGIN {
        adjusted.x -= EDGE_DEFLECTION;
    }
    if adjusted.y <= EDGE_MARGIN {
        adjusted.y += EDGE_DEFLECTION;
    }
    if adjusted.y >= height - EDGE_MARGIN {
        adjusted.y -= EDGE_DEFLECTION;
    }

    if adjusted != base && adjusted.chebyshev_distance(&base) <= BASE_CLEARANCE {
        adjusted = adjusted.step_away_from(&base);
    }

    world.clamp(adjusted)
}

/// Uniformly random cell of the Moore neighborhood; `pos` itself when the
/// neighborhood is empty
pub fn random_direction(
    world: &dyn SpatialWorld,
    rng: &mut SimRng,
    pos: GridPos,
    include_center: bool,
) -> GridPos {
    let cells = world.neighborhood(pos, include_center);
    rng.choice(&cells).copied().unwrap_or(pos)
}

/// Next cell on the way from `pos` to `target`
pub fn next_cell(world: &dyn SpatialWorld, pos: GridPos, target: GridPos) -> GridPos {
    world.clamp(pos.step_towards(&target))
}
