//! Weave grids: passages that tunnel under perpendicular corridors.
//!
//! A passage can pass beneath an over cell that carries a straight corridor running perpendicular to
//! it. Carving such a passage splices a new under cell into the lattice at the over cell's coordinate.
//! The under cell is linked to the cells either side of the corridor and they refer to it, instead of
//! the over cell, as their lattice neighbour in that direction. The over cell keeps its own lattice
//! and links.
//!
//! The lattice is therefore asymmetric after a splice. With a north to south tunnel under `m`,
//! `m`'s south neighbour is still the far cell `s` while `s`'s north neighbour is the under cell.
//! Operators that walk the over cell's lattice, such as braiding a culled maze, can later link `m`
//! straight to `s` so the two passages run side by side in the same column.

use log::trace;

use crate::cells::{CellIndex, CellIndexSmallVec, CellLayer, CompassPrimary, LatticeCell};
use crate::grid::{Grid, Topology};

impl Grid {
    /// A corridor running east to west through the cell and nowhere else.
    ///
    /// Under cells carry a horizontal passage when they have lattice neighbours to the east or west.
    pub fn has_horizontal_passage(&self, cell: CellIndex) -> bool {
        match self.lattice_cell(cell) {
            Some(c) if c.is_under() => {
                c.neighbour(CompassPrimary::East).is_some() || c.neighbour(CompassPrimary::West).is_some()
            }
            Some(_) => {
                self.is_neighbour_linked(cell, CompassPrimary::East) &&
                self.is_neighbour_linked(cell, CompassPrimary::West) &&
                !self.is_neighbour_linked(cell, CompassPrimary::North) &&
                !self.is_neighbour_linked(cell, CompassPrimary::South)
            }
            None => false,
        }
    }

    /// A corridor running north to south through the cell and nowhere else.
    pub fn has_vertical_passage(&self, cell: CellIndex) -> bool {
        match self.lattice_cell(cell) {
            Some(c) if c.is_under() => {
                c.neighbour(CompassPrimary::North).is_some() || c.neighbour(CompassPrimary::South).is_some()
            }
            Some(_) => {
                self.is_neighbour_linked(cell, CompassPrimary::North) &&
                self.is_neighbour_linked(cell, CompassPrimary::South) &&
                !self.is_neighbour_linked(cell, CompassPrimary::East) &&
                !self.is_neighbour_linked(cell, CompassPrimary::West)
            }
            None => false,
        }
    }

    /// Cells of a weave grid that sit past a tunnellable corridor.
    ///
    /// Only over cells tunnel, in either direction, and only to over cells.
    pub(crate) fn tunnel_candidates(&self, cell: CellIndex) -> CellIndexSmallVec {
        let mut candidates = CellIndexSmallVec::new();
        if self.topology() != Topology::Weave || self.lattice_cell(cell).map_or(true, LatticeCell::is_under) {
            return candidates;
        }

        for direction in CompassPrimary::ALL.iter().cloned() {
            let far = self.neighbour_at_direction(cell, direction)
                .filter(|middle| self.can_tunnel_under(*middle, direction))
                .and_then(|middle| self.neighbour_at_direction(middle, direction))
                .filter(|far| !self.is_under(*far));
            if let Some(far) = far {
                candidates.push(far);
            }
        }
        candidates
    }

    /// Would a passage heading in `direction` pass beneath this cell?
    fn can_tunnel_under(&self, middle: CellIndex, direction: CompassPrimary) -> bool {
        if self.is_under(middle) {
            return false;
        }
        if direction.is_vertical() {
            self.has_horizontal_passage(middle)
        } else {
            self.has_vertical_passage(middle)
        }
    }

    /// The over cell a link from `a` to `target` would have to tunnel under, and the direction of
    /// travel from `a`. `None` when the link is an ordinary adjacent one.
    pub(crate) fn crossing(&self, a: CellIndex, target: CellIndex) -> Option<(CellIndex, CompassPrimary)> {
        if self.topology() != Topology::Weave || self.is_under(target) {
            return None;
        }

        CompassPrimary::ALL.iter().cloned().find_map(|direction| {
            let middle = self.neighbour_at_direction(a, direction)?;
            let back = direction.opposite();
            let spans_middle = self.neighbour_at_direction(middle, direction).is_some() &&
                               self.neighbour_at_direction(middle, back).is_some() &&
                               self.neighbour_at_direction(target, back) == Some(middle);
            if spans_middle && self.can_tunnel_under(middle, direction) {
                Some((middle, direction))
            } else {
                None
            }
        })
    }

    /// Splice an under cell beneath `over`, joining `a` to `target` which lies in `direction` from it.
    pub(crate) fn tunnel_under(&mut self,
                               over: CellIndex,
                               a: CellIndex,
                               target: CellIndex,
                               direction: CompassPrimary) {
        let back = direction.opposite();
        let coordinate = self.coordinate(over).unwrap_or_default();
        let mut under = LatticeCell::new(coordinate, CellLayer::Under { over });
        under.set_neighbour(direction, Some(target));
        under.set_neighbour(back, Some(a));
        let under = self.push_cell(under);

        if let Some(cell) = self.lattice_cell_mut(target) {
            cell.set_neighbour(back, Some(under));
        }
        if let Some(cell) = self.lattice_cell_mut(a) {
            cell.set_neighbour(direction, Some(under));
        }
        self.link_cells(under, a);
        self.link_cells(under, target);

        trace!("tunnel {} under {} joining {} and {}", under, over, a, target);
    }

    /// Cells spliced under corridors so far.
    pub fn under_cells(&self) -> impl Iterator<Item = CellIndex> {
        (self.size()..self.cells_count()).map(CellIndex)
    }
}
