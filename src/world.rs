//! Spatial world the swarm moves in
//!
//! A bounded, non-toroidal grid where several drones may share a cell. The
//! behavioral engine only talks to it through [`SpatialWorld`]; the fire
//! spread model is external and only marks cells as burning.

use crate::types::*;
use heapless::Vec as HVec;
use std::collections::{BTreeSet, HashMap};

/// Moore neighborhood of radius 1 (including the center)
pub type Neighborhood = HVec<GridPos, 9>;

/// Spatial index consumed by the behavioral engine
pub trait SpatialWorld {
    /// Grid width in cells
    fn width(&self) -> u32;

    /// Grid height in cells
    fn height(&self) -> u32;

    /// Whether `pos` lies outside the grid
    fn out_of_bounds(&self, pos: GridPos) -> bool {
        pos.x < 0 || pos.y < 0 || pos.x >= self.width() as i32 || pos.y >= self.height() as i32
    }

    /// Nearest in-bounds cell to `pos`
    fn clamp(&self, pos: GridPos) -> GridPos {
        GridPos {
            x: pos.x.clamp(0, self.width() as i32 - 1),
            y: pos.y.clamp(0, self.height() as i32 - 1),
        }
    }

    /// Put a new agent on the grid
    fn place_agent(&mut self, agent: DroneId, pos: GridPos) -> Result<()>;

    /// Move an agent; positions outside the grid are clamped
    fn move_agent(&mut self, agent: DroneId, pos: GridPos);

    /// Current cell of an agent
    fn position_of(&self, agent: DroneId) -> Option<GridPos>;

    /// Agents within Chebyshev `radius` of `pos`.
    ///
    /// Cells are scanned column by column (x outer, y inner), agents within a
    /// cell in arrival order, so results are deterministic.
    fn get_neighbors(&self, pos: GridPos, radius: u32, include_center: bool) -> Vec<DroneId>;

    /// In-bounds cells of the Moore neighborhood of `pos`
    fn neighborhood(&self, pos: GridPos, include_center: bool) -> Neighborhood {
        let mut cells = Neighborhood::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 && !include_center {
                    continue;
                }
                let cell = GridPos::new(pos.x + dx, pos.y + dy);
                if !self.out_of_bounds(cell) {
                    // at most 9 cells
                    let _ = cells.push(cell);
                }
            }
        }
        cells
    }

    /// Burning cells within Chebyshev `radius` of `pos`
    fn burning_cells_within(&self, _pos: GridPos, _radius: u32) -> Vec<GridPos> {
        Vec::new()
    }
}

/// Bounded multi-agent grid with burning cells
#[derive(Debug, Clone, Default)]
pub struct GridWorld {
    width: u32,
    height: u32,
    cells: HashMap<GridPos, Vec<DroneId>>,
    positions: HashMap<DroneId, GridPos>,
    burning: BTreeSet<GridPos>,
}

impl GridWorld {
    /// Create an empty grid
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Agents in a single cell
    pub fn agents_at(&self, pos: GridPos) -> &[DroneId] {
        self.cells.get(&pos).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of agents on the grid
    pub fn agent_count(&self) -> usize {
        self.positions.len()
    }

    /// Mark a cell as burning
    pub fn ignite(&mut self, pos: GridPos) -> Result<()> {
        if self.out_of_bounds(pos) {
            return Err(SwarmError::OutOfBounds(pos));
        }
        self.burning.insert(pos);
        Ok(())
    }

    /// Mark a cell as burnt out
    pub fn extinguish(&mut self, pos: GridPos) -> bool {
        self.burning.remove(&pos)
    }

    /// Whether a cell is burning
    pub fn is_burning(&self, pos: GridPos) -> bool {
        self.burning.contains(&pos)
    }

    /// All burning cells
    pub fn burning_cells(&self) -> impl Iterator<Item = &GridPos> {
        self.burning.iter()
    }

    fn remove_from_cell(&mut self, agent: DroneId, pos: GridPos) {
        if let Some(list) = self.cells.get_mut(&pos) {
            list.retain(|a| *a != agent);
            if list.is_empty() {
                self.cells.remove(&pos);
            }
        }
    }
}

impl SpatialWorld for GridWorld {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn place_agent(&mut self, agent: DroneId, pos: GridPos) -> Result<()> {
        if self.out_of_bounds(pos) {
            return Err(SwarmError::OutOfBounds(pos));
        }
        if let Some(old) = self.positions.insert(agent, pos) {
            self.remove_from_cell(agent, old);
        }
        self.cells.entry(pos).or_default().push(agent);
        Ok(())
    }

    fn move_agent(&mut self, agent: DroneId, pos: GridPos) {
        let pos = self.clamp(pos);
        match self.positions.get(&agent).copied() {
            Some(old) if old == pos => {}
            Some(old) => {
                self.remove_from_cell(agent, old);
                self.positions.insert(agent, pos);
                self.cells.entry(pos).or_default().push(agent);
            }
            None => {
                self.positions.insert(agent, pos);
                self.cells.entry(pos).or_default().push(agent);
            }
        }
    }

    fn position_of(&self, agent: DroneId) -> Option<GridPos> {
        self.positions.get(&agent).copied()
    }

    fn get_neighbors(&self, pos: GridPos, radius: u32, include_center: bool) -> Vec<DroneId> {
        let r = i64::from(radius);
        let span = |center: i32, len: u32| {
            let low = (i64::from(center) - r).max(0);
            let high = (i64::from(center) + r).min(i64::from(len) - 1);
            // both ends fit the grid, which fits i32
            (low as i32)..=(high as i32)
        };
        let mut found = Vec::new();
        for x in span(pos.x, self.width) {
            for y in span(pos.y, self.height) {
                let cell = GridPos::new(x, y);
                if cell == pos && !include_center {
                    continue;
                }
                if let Some(agents) = self.cells.get(&cell) {
                    found.extend_from_slice(agents);
                }
            }
        }
        found
    }

    fn burning_cells_within(&self, pos: GridPos, radius: u32) -> Vec<GridPos> {
        self.burning
            .iter()
            .filter(|cell| pos.chebyshev_distance(cell) <= radius)
            .copied()
            .collect()
    }
}
