use log::trace;
use petgraph::graph::{self, NodeIndex, UnGraph};
use rand::Rng;
use std::error::Error;
use std::fmt;
use std::slice;

use crate::cells::{CellIndex, CellIndexOptionSmallVec, CellIndexSmallVec, CellLayer, CompassPrimary,
                   GridCoordinate, LatticeCell};
use crate::grid_iterators::{CellIter, RowIter};
use crate::metadata::GridMetadata;
use crate::pathing::Distances;
use crate::units::{ColumnsCount, RowsCount};
use crate::utils::{self, MazeRng};


#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    SelfLink,
}

impl fmt::Display for CellLinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CellLinkError::InvalidGridCoordinate => write!(f, "cell is not part of the grid"),
            CellLinkError::SelfLink => write!(f, "a cell cannot be linked to itself"),
        }
    }
}

impl Error for CellLinkError {}

/// Does linking two cells ever tunnel one passage under another?
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Topology {
    Plain,
    Weave,
}

/// A rectangular maze.
///
/// The grid owns every cell. Physical adjacency (the lattice) is kept per cell in an arena, the
/// passages carved by the generators are edges of an undirected graph whose node indices are the
/// cell indices. Every link is therefore automatically visible from both ends.
#[derive(Clone)]
pub struct Grid {
    graph: UnGraph<(), ()>,
    cells: Vec<LatticeCell>,
    rows: RowsCount,
    columns: ColumnsCount,
    topology: Topology,
    distances: Option<Distances>,
    metadata: GridMetadata,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: graph: {:?}, rows: {:?}, columns: {:?}, topology: {:?}",
               self.graph, self.rows, self.columns, self.topology)
    }
}

impl Grid {
    /// A grid where every link joins two lattice neighbours.
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Grid {
        Grid::with_topology(rows, columns, Topology::Plain)
    }

    /// A grid whose links may pass under perpendicular corridors, see the `weave` module.
    pub fn weave(rows: RowsCount, columns: ColumnsCount) -> Grid {
        Grid::with_topology(rows, columns, Topology::Weave)
    }

    fn with_topology(rows: RowsCount, columns: ColumnsCount, topology: Topology) -> Grid {
        let nodes = rows.0 * columns.0;
        let edges_count_hint = 2 * nodes;

        let mut grid = Grid {
            graph: UnGraph::with_capacity(nodes, edges_count_hint),
            cells: Vec::with_capacity(nodes),
            rows,
            columns,
            topology,
            distances: None,
            metadata: GridMetadata::new(),
        };
        for row in 0..rows.0 {
            for column in 0..columns.0 {
                let _ = grid.push_cell(LatticeCell::new(GridCoordinate::new(row, column), CellLayer::Over));
            }
        }
        grid.configure();

        grid
    }

    fn configure(&mut self) {
        for index in 0..self.size() {
            let GridCoordinate { row, column } = self.cells[index].coordinate();
            let north = if row > 0 { self.cell(row - 1, column) } else { None };
            let south = self.cell(row + 1, column);
            let west = if column > 0 { self.cell(row, column - 1) } else { None };
            let east = self.cell(row, column + 1);

            let cell = &mut self.cells[index];
            cell.set_neighbour(CompassPrimary::North, north);
            cell.set_neighbour(CompassPrimary::South, south);
            cell.set_neighbour(CompassPrimary::West, west);
            cell.set_neighbour(CompassPrimary::East, east);
        }
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    /// Number of over cells, `rows * columns`.
    #[inline]
    pub fn size(&self) -> usize {
        self.rows.0 * self.columns.0
    }

    /// Number of cells including any under cells.
    #[inline]
    pub fn cells_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[inline]
    pub fn links_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Bounds checked lookup of the over cell at a row and column.
    pub fn cell(&self, row: usize, column: usize) -> Option<CellIndex> {
        if row < self.rows.0 && column < self.columns.0 {
            Some(CellIndex(row * self.columns.0 + column))
        } else {
            None
        }
    }

    #[inline]
    pub fn is_valid_cell(&self, cell: CellIndex) -> bool {
        cell.0 < self.cells.len()
    }

    pub fn coordinate(&self, cell: CellIndex) -> Option<GridCoordinate> {
        self.lattice_cell(cell).map(LatticeCell::coordinate)
    }

    pub fn is_under(&self, cell: CellIndex) -> bool {
        self.lattice_cell(cell).map_or(false, LatticeCell::is_under)
    }

    /// The over cell an under cell tunnels beneath.
    pub fn over_cell_of(&self, cell: CellIndex) -> Option<CellIndex> {
        self.lattice_cell(cell).and_then(|c| match c.layer() {
            CellLayer::Under { over } => Some(over),
            CellLayer::Over => None,
        })
    }

    /// A uniformly random over cell.
    ///
    /// Panics on a grid without cells.
    pub fn random_cell(&self, rng: &mut MazeRng) -> CellIndex {
        assert!(self.size() > 0, "Cannot pick a random cell from an empty grid.");
        CellIndex(rng.gen_range(0..self.size()))
    }

    /// Link two cells.
    ///
    /// On a weave grid the link may instead be realised by a new under cell when the two cells sit
    /// either side of a perpendicular corridor.
    pub fn link(&mut self, a: CellIndex, b: CellIndex) -> Result<(), CellLinkError> {
        if a == b {
            return Err(CellLinkError::SelfLink);
        }
        if !self.is_valid_cell(a) || !self.is_valid_cell(b) {
            return Err(CellLinkError::InvalidGridCoordinate);
        }

        if let Some((over, direction)) = self.crossing(a, b) {
            self.tunnel_under(over, a, b, direction);
        } else {
            self.link_cells(a, b);
        }
        Ok(())
    }

    /// Unlink two cells, if the cells are valid and a link exists between them.
    /// Returns true if an unlink occurred.
    pub fn unlink(&mut self, a: CellIndex, b: CellIndex) -> bool {
        if !self.is_valid_cell(a) || !self.is_valid_cell(b) {
            return false;
        }

        if let Some(edge_index) = self.graph.find_edge(node(a), node(b)) {
            // This will invalidate the last edge index in the graph, which is fine as we
            // are not storing them for any reason.
            self.graph.remove_edge(edge_index);
            true
        } else {
            false
        }
    }

    /// Cells that are linked to a particular cell by a passage.
    pub fn links(&self, cell: CellIndex) -> Option<CellIndexSmallVec> {
        if self.is_valid_cell(cell) {
            Some(self.graph.neighbors(node(cell)).map(|n| CellIndex(n.index())).collect())
        } else {
            None
        }
    }

    /// Number of passages leaving a cell.
    pub fn degree(&self, cell: CellIndex) -> usize {
        if self.is_valid_cell(cell) {
            self.graph.neighbors(node(cell)).count()
        } else {
            0
        }
    }

    #[inline]
    pub fn has_links(&self, cell: CellIndex) -> bool {
        self.degree(cell) > 0
    }

    #[inline]
    pub fn is_dead_end(&self, cell: CellIndex) -> bool {
        self.degree(cell) == 1
    }

    /// Are two cells in the grid linked?
    pub fn is_linked(&self, a: CellIndex, b: CellIndex) -> bool {
        self.is_valid_cell(a) && self.is_valid_cell(b) &&
        self.graph.find_edge(node(a), node(b)).is_some()
    }

    /// Is there a passage to the lattice neighbour in this direction?
    pub fn is_neighbour_linked(&self, cell: CellIndex, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(cell, direction)
            .map_or(false, |neighbour| self.is_linked(cell, neighbour))
    }

    pub fn neighbour_at_direction(&self, cell: CellIndex, direction: CompassPrimary) -> Option<CellIndex> {
        self.lattice_cell(cell).and_then(|c| c.neighbour(direction))
    }

    pub fn neighbours_at_directions(&self,
                                    cell: CellIndex,
                                    dirs: &[CompassPrimary])
                                    -> CellIndexOptionSmallVec {
        dirs.iter()
            .map(|direction| self.neighbour_at_direction(cell, *direction))
            .collect()
    }

    /// Cells to the North, South, West or East of a cell, but not necessarily linked by a passage.
    pub fn lattice_neighbours(&self, cell: CellIndex) -> CellIndexSmallVec {
        self.lattice_cell(cell).map_or_else(CellIndexSmallVec::new, LatticeCell::neighbours)
    }

    /// Every cell a generator may carve a passage to from this cell: the lattice neighbours plus,
    /// on a weave grid, the cells that can be reached by tunnelling under a corridor.
    pub fn neighbours(&self, cell: CellIndex) -> CellIndexSmallVec {
        let mut neighbours = self.lattice_neighbours(cell);
        neighbours.extend(self.tunnel_candidates(cell));
        neighbours
    }

    /// All cells, over and under, with exactly one link.
    pub fn dead_ends(&self) -> Vec<CellIndex> {
        self.iter().filter(|cell| self.is_dead_end(*cell)).collect()
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.cells.len())
    }

    #[inline]
    pub fn iter_row(&self) -> RowIter {
        RowIter::new(self.rows, self.columns)
    }

    pub fn iter_links(&self) -> LinksIter {
        LinksIter {
            graph_edge_iter: self.graph.raw_edges().iter(),
        }
    }

    /// Cut a cell out of the maze: all its links, its lattice neighbours' references back to it
    /// and its own lattice references.
    pub fn remove(&mut self, cell: CellIndex) {
        if !self.is_valid_cell(cell) {
            return;
        }

        if let Some(linked) = self.links(cell) {
            for other in linked {
                let _ = self.unlink(cell, other);
            }
        }

        for direction in CompassPrimary::ALL.iter().cloned() {
            if let Some(neighbour) = self.cells[cell.0].neighbour(direction) {
                let back = direction.opposite();
                // After a tunnel the neighbour may face an under cell instead.
                if self.cells[neighbour.0].neighbour(back) == Some(cell) {
                    self.cells[neighbour.0].set_neighbour(back, None);
                }
            }
        }
        self.cells[cell.0].clear_neighbours();
    }

    /// Turn dead ends into loops.
    ///
    /// Dead ends are visited in random order and each one still a dead end is, with probability `p`,
    /// linked to one of its unlinked neighbours. Neighbours that are dead ends too are preferred so
    /// one link can remove two dead ends.
    pub fn braid(&mut self, p: f32, rng: &mut MazeRng) -> Result<(), CellLinkError> {
        let mut dead_ends = self.dead_ends();
        let mut braided = 0;

        while !dead_ends.is_empty() {
            let cell = dead_ends.swap_remove(rng.gen_range(0..dead_ends.len()));
            if !self.is_dead_end(cell) || utils::ratio(rng) >= p {
                continue;
            }

            let unlinked = self.neighbours(cell)
                .into_iter()
                .filter(|neighbour| !self.is_linked(cell, *neighbour))
                .collect::<CellIndexSmallVec>();
            let best = unlinked.iter()
                .cloned()
                .filter(|neighbour| self.is_dead_end(*neighbour))
                .collect::<CellIndexSmallVec>();
            let candidates = if best.is_empty() { unlinked } else { best };
            if candidates.is_empty() {
                continue;
            }

            let neighbour = utils::sample(rng, &candidates);
            self.link(cell, neighbour)?;
            braided += 1;
        }

        trace!("braid p={:.2} added {} links", p, braided);
        Ok(())
    }

    /// Remove dead ends.
    ///
    /// The dead ends found at the start of the pass are visited in random order and each one still
    /// a dead end is removed with probability `p`. Removing cells can make new dead ends, these are
    /// not added while a snapshot is being worked through. Once it is exhausted the grid is
    /// rescanned and the dead ends not yet decided on in this pass become the next snapshot, so no
    /// cell is decided more than once per pass.
    pub fn cull(&mut self, p: f32, rng: &mut MazeRng) {
        let mut considered = utils::fnv_hashset(self.cells.len());
        let mut pending = self.dead_ends();
        let mut culled = 0;

        while !pending.is_empty() {
            while !pending.is_empty() {
                let cell = pending.swap_remove(rng.gen_range(0..pending.len()));
                let _ = considered.insert(cell);
                if self.is_dead_end(cell) && utils::ratio(rng) < p {
                    self.remove(cell);
                    culled += 1;
                }
            }

            pending = self.dead_ends()
                .into_iter()
                .filter(|cell| !considered.contains(cell))
                .collect();
        }

        trace!("cull p={:.2} removed {} cells", p, culled);
    }

    /// Independently remove each over cell with probability `p`.
    pub fn delete(&mut self, p: f32, rng: &mut MazeRng) {
        let mut deleted = 0;
        for index in 0..self.size() {
            if utils::ratio(rng) < p {
                self.remove(CellIndex(index));
                deleted += 1;
            }
        }

        trace!("delete p={:.2} removed {} of {} cells", p, deleted, self.size());
    }

    #[inline]
    pub fn distances(&self) -> Option<&Distances> {
        self.distances.as_ref()
    }

    pub fn set_distances(&mut self, distances: Distances) {
        self.distances = Some(distances);
    }

    /// Largest distance of the attached distance field, 0 without one.
    pub fn maximum_distance(&self) -> u32 {
        self.distances.as_ref().map_or(0, Distances::max)
    }

    /// A cell at the largest distance of the attached distance field.
    pub fn farthest(&self) -> Option<CellIndex> {
        self.distances.as_ref().map(Distances::farthest)
    }

    #[inline]
    pub fn metadata(&self) -> &GridMetadata {
        &self.metadata
    }

    #[inline]
    pub(crate) fn metadata_mut(&mut self) -> &mut GridMetadata {
        &mut self.metadata
    }

    #[inline]
    pub(crate) fn lattice_cell(&self, cell: CellIndex) -> Option<&LatticeCell> {
        self.cells.get(cell.0)
    }

    #[inline]
    pub(crate) fn lattice_cell_mut(&mut self, cell: CellIndex) -> Option<&mut LatticeCell> {
        self.cells.get_mut(cell.0)
    }

    /// Appends a cell to the arena and the link graph, keeping the two indices in step.
    pub(crate) fn push_cell(&mut self, cell: LatticeCell) -> CellIndex {
        let index = self.graph.add_node(());
        self.cells.push(cell);
        debug_assert_eq!(index.index() + 1, self.cells.len());
        CellIndex(index.index())
    }

    /// Link without any weave crossing checks. Both cells must be valid.
    pub(crate) fn link_cells(&mut self, a: CellIndex, b: CellIndex) {
        let _ = self.graph.update_edge(node(a), node(b), ());
    }
}

#[inline]
fn node(cell: CellIndex) -> NodeIndex {
    NodeIndex::new(cell.0)
}

pub struct LinksIter<'a> {
    graph_edge_iter: slice::Iter<'a, graph::Edge<()>>,
}

impl<'a> Iterator for LinksIter<'a> {
    type Item = (CellIndex, CellIndex);

    fn next(&mut self) -> Option<Self::Item> {
        self.graph_edge_iter.next().map(|edge| {
            (CellIndex(edge.source().index()), CellIndex(edge.target().index()))
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.graph_edge_iter.size_hint()
    }
}
impl<'a> ExactSizeIterator for LinksIter<'a> {} // default impl using size_hint()

impl<'a> fmt::Debug for LinksIter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LinksIter :: edges iter : {:?}", self.graph_edge_iter)
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools; // a trait
    use smallvec::SmallVec;

    use super::*;
    use crate::generators::Generator;
    use crate::utils::maze_rng;

    fn small_grid(rows: usize, columns: usize) -> Grid {
        Grid::new(RowsCount(rows), ColumnsCount(columns))
    }

    fn gc(grid: &Grid, row: usize, column: usize) -> CellIndex {
        grid.cell(row, column).expect("cell out of bounds")
    }

    // Compare a smallvec to e.g. a vec! or &[T].
    macro_rules! assert_smallvec_eq {
        ($x:expr, $y:expr) => (assert_eq!(&*$x, &*$y))
    }

    #[test]
    fn neighbour_cells() {
        let g = small_grid(10, 10);

        let check_expected_neighbours = |cell, expected_neighbours: &[CellIndex]| {
            let indices: Vec<CellIndex> = g.neighbours(cell).iter().cloned().sorted().collect();
            let expected: Vec<CellIndex> = expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(indices, expected);
        };
        let c = |row, column| gc(&g, row, column);

        // corners
        check_expected_neighbours(c(0, 0), &[c(1, 0), c(0, 1)]);
        check_expected_neighbours(c(0, 9), &[c(0, 8), c(1, 9)]);
        check_expected_neighbours(c(9, 0), &[c(8, 0), c(9, 1)]);
        check_expected_neighbours(c(9, 9), &[c(9, 8), c(8, 9)]);

        // side element examples
        check_expected_neighbours(c(0, 1), &[c(0, 0), c(1, 1), c(0, 2)]);
        check_expected_neighbours(c(8, 9), &[c(7, 9), c(9, 9), c(8, 8)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(c(1, 1), &[c(0, 1), c(1, 0), c(2, 1), c(1, 2)]);
    }

    #[test]
    fn neighbours_at_dirs() {
        let g = small_grid(2, 2);
        let c = |row, column| gc(&g, row, column);

        let check_neighbours = |cell, dirs: &[CompassPrimary], expected: &[Option<CellIndex>]| {
            assert_eq!(&*g.neighbours_at_directions(cell, dirs), expected);
        };
        check_neighbours(c(0, 0), &[], &[]);
        check_neighbours(c(0, 0), &[CompassPrimary::North], &[None]);
        check_neighbours(c(0, 0),
                         &[CompassPrimary::West, CompassPrimary::North],
                         &[None, None]);
        check_neighbours(c(0, 0),
                         &[CompassPrimary::East, CompassPrimary::South],
                         &[Some(c(0, 1)), Some(c(1, 0))]);
        check_neighbours(c(1, 1),
                         &[CompassPrimary::West, CompassPrimary::North],
                         &[Some(c(1, 0)), Some(c(0, 1))]);
        check_neighbours(c(1, 1),
                         &[CompassPrimary::South, CompassPrimary::East],
                         &[None, None]);
    }

    #[test]
    fn cell_lookup_is_bounds_checked() {
        let g = small_grid(3, 4);
        assert_eq!(g.cell(0, 0), Some(CellIndex(0)));
        assert_eq!(g.cell(1, 2), Some(CellIndex(6)));
        assert_eq!(g.cell(2, 3), Some(CellIndex(11)));
        assert_eq!(g.cell(3, 0), None);
        assert_eq!(g.cell(0, 4), None);
        assert_eq!(g.cell(usize::MAX, usize::MAX), None);
        assert_eq!(g.coordinate(CellIndex(6)), Some(GridCoordinate::new(1, 2)));
        assert_eq!(g.coordinate(CellIndex(12)), None);
    }

    #[test]
    fn grid_size() {
        let g = small_grid(10, 7);
        assert_eq!(g.size(), 70);
        assert_eq!(g.cells_count(), 70);
        assert_eq!(g.rows(), RowsCount(10));
        assert_eq!(g.columns(), ColumnsCount(7));
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn random_cell() {
        let g = small_grid(4, 5);
        let mut rng = maze_rng(Some(11));
        for _ in 0..1000 {
            let cell = g.random_cell(&mut rng);
            assert!(cell.0 < 20);
        }
    }

    #[test]
    fn cell_iter_is_row_major_and_restartable() {
        let g = small_grid(2, 2);
        let iter = g.iter();
        let first: Vec<CellIndex> = iter.collect();
        let second: Vec<CellIndex> = iter.collect();
        assert_eq!(first, &[CellIndex(0), CellIndex(1), CellIndex(2), CellIndex(3)]);
        assert_eq!(first, second);
        assert_eq!(g.iter().len(), 4);
    }

    #[test]
    fn row_iter() {
        let g = small_grid(2, 3);
        assert_eq!(g.iter_row().collect::<Vec<Vec<CellIndex>>>(),
                   &[&[CellIndex(0), CellIndex(1), CellIndex(2)],
                     &[CellIndex(3), CellIndex(4), CellIndex(5)]]);
    }

    #[test]
    fn linking_cells() {
        let mut g = small_grid(4, 4);
        let a = gc(&g, 1, 0);
        let b = gc(&g, 2, 0);
        let c = gc(&g, 3, 0);

        let sorted_links = |grid: &Grid, cell| -> Vec<CellIndex> {
            grid.links(cell).expect("cell is invalid").iter().cloned().sorted().collect()
        };

        // Testing `is_neighbour_linked` for all directions
        let directional_links_check = |grid: &Grid, cell: CellIndex, expected_dirs_linked: &[CompassPrimary]| {
            let expected_complement: SmallVec<[CompassPrimary; 4]> = CompassPrimary::ALL.iter()
                .cloned()
                .filter(|dir| !expected_dirs_linked.contains(dir))
                .collect();
            for exp_dir in expected_dirs_linked {
                assert!(grid.is_neighbour_linked(cell, *exp_dir));
            }
            for not_exp_dir in expected_complement.iter() {
                assert!(!grid.is_neighbour_linked(cell, *not_exp_dir));
            }
        };

        assert!(!g.is_linked(a, b));
        assert_eq!(sorted_links(&g, a), vec![]);
        directional_links_check(&g, a, &[]);

        g.link(a, b).expect("link failed");
        assert!(g.is_linked(a, b) && g.is_linked(b, a));
        assert_eq!(sorted_links(&g, a), vec![b]);
        assert_eq!(sorted_links(&g, b), vec![a]);
        directional_links_check(&g, a, &[CompassPrimary::South]);
        directional_links_check(&g, b, &[CompassPrimary::North]);

        g.link(b, c).expect("link failed");
        assert!(g.is_linked(b, c) && g.is_linked(c, b));
        assert!(!g.is_linked(a, c));
        assert_eq!(sorted_links(&g, b), vec![a, c]);
        directional_links_check(&g, b, &[CompassPrimary::North, CompassPrimary::South]);
        assert_eq!(g.degree(b), 2);
        assert_eq!(g.links_count(), 2);

        assert!(g.unlink(a, b));
        assert!(!g.unlink(a, b));
        assert!(!g.is_linked(a, b) && !g.is_linked(b, a));
        assert_eq!(sorted_links(&g, a), vec![]);
        assert_eq!(sorted_links(&g, b), vec![c]);
        directional_links_check(&g, b, &[CompassPrimary::South]);
        directional_links_check(&g, c, &[CompassPrimary::North]);
    }

    #[test]
    fn no_self_linked_cycles() {
        let mut g = small_grid(4, 4);
        let a = gc(&g, 0, 0);
        assert_eq!(g.link(a, a), Err(CellLinkError::SelfLink));
    }

    #[test]
    fn no_links_to_invalid_cells() {
        let mut g = small_grid(4, 4);
        let good = gc(&g, 0, 0);
        assert_eq!(g.link(good, CellIndex(100)), Err(CellLinkError::InvalidGridCoordinate));
        assert_eq!(g.links(CellIndex(100)), None);
        assert!(!g.is_linked(good, CellIndex(100)));
    }

    #[test]
    fn no_parallel_duplicated_linked_cells() {
        let mut g = small_grid(4, 4);
        let a = gc(&g, 0, 0);
        let b = gc(&g, 0, 1);
        g.link(a, b).expect("link failed");
        g.link(b, a).expect("link failed");
        assert_smallvec_eq!(g.links(a).unwrap(), &[b]);
        assert_smallvec_eq!(g.links(b).unwrap(), &[a]);
        assert_eq!(g.links_count(), 1);
    }

    #[test]
    fn dead_ends_have_one_link() {
        let mut g = small_grid(1, 4);
        assert!(g.dead_ends().is_empty());
        let cells: Vec<CellIndex> = g.iter().collect();
        g.link(cells[0], cells[1]).unwrap();
        g.link(cells[1], cells[2]).unwrap();
        assert_eq!(g.dead_ends(), vec![cells[0], cells[2]]);
    }

    #[test]
    fn remove_severs_links_and_lattice() {
        let mut g = small_grid(3, 3);
        let centre = gc(&g, 1, 1);
        for neighbour in g.lattice_neighbours(centre) {
            g.link(centre, neighbour).unwrap();
        }
        let north = gc(&g, 0, 1);
        assert_eq!(g.degree(centre), 4);

        g.remove(centre);
        assert!(!g.has_links(centre));
        assert!(g.lattice_neighbours(centre).is_empty());
        assert_eq!(g.links_count(), 0);
        assert_eq!(g.neighbour_at_direction(north, CompassPrimary::South), None);
        assert!(!g.lattice_neighbours(north).contains(&centre));
        assert_eq!(g.lattice_neighbours(north).len(), 2);

        // idempotent
        g.remove(centre);
        assert!(g.lattice_neighbours(centre).is_empty());
        assert_eq!(g.lattice_neighbours(north).len(), 2);
    }

    #[test]
    fn delete_all_and_nothing() {
        let mut rng = maze_rng(Some(5));
        let mut g = small_grid(4, 4);
        g.delete(0.0, &mut rng);
        assert!(g.iter().all(|cell| !g.lattice_neighbours(cell).is_empty()));

        g.delete(1.0, &mut rng);
        assert!(g.iter().all(|cell| g.lattice_neighbours(cell).is_empty()));
    }

    #[test]
    fn braid_removes_dead_ends() {
        let mut rng = maze_rng(Some(21));
        let mut g = small_grid(8, 8);
        Generator::recursive_backtracker().accept(&mut g, &mut rng).unwrap();
        let before = g.dead_ends().len();
        assert!(before > 0);

        g.braid(1.0, &mut rng).unwrap();
        assert!(g.dead_ends().len() < before);
        // every cell on a full rectangle has a neighbour to braid into
        assert!(g.dead_ends().is_empty());
    }

    #[test]
    fn braid_without_candidates_is_noop() {
        let mut rng = maze_rng(Some(2));
        let mut g = small_grid(1, 2);
        let (a, b) = (gc(&g, 0, 0), gc(&g, 0, 1));
        g.link(a, b).unwrap();
        g.braid(1.0, &mut rng).unwrap();
        assert_eq!(g.links_count(), 1);
        assert_eq!(g.dead_ends().len(), 2);
    }

    #[test]
    fn braid_zero_keeps_maze() {
        let mut rng = maze_rng(Some(8));
        let mut g = small_grid(6, 6);
        Generator::kruskals().accept(&mut g, &mut rng).unwrap();
        let links = g.links_count();
        g.braid(0.0, &mut rng).unwrap();
        assert_eq!(g.links_count(), links);
    }

    #[test]
    fn cull_full_leaves_no_dead_ends() {
        let mut rng = maze_rng(Some(13));
        let mut g = small_grid(10, 10);
        Generator::aldous_broder().accept(&mut g, &mut rng).unwrap();
        g.cull(1.0, &mut rng);
        assert!(g.dead_ends().is_empty());
        // a spanning tree collapses to a single isolated cell
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn cull_repeated_until_quiescent() {
        let mut rng = maze_rng(Some(17));
        let mut g = small_grid(10, 10);
        Generator::recursive_backtracker().accept(&mut g, &mut rng).unwrap();
        g.braid(0.5, &mut rng).unwrap();
        for _ in 0..50 {
            if g.dead_ends().is_empty() {
                break;
            }
            g.cull(0.5, &mut rng);
        }
        assert!(g.dead_ends().is_empty());
    }

    #[test]
    fn cull_zero_keeps_maze() {
        let mut rng = maze_rng(Some(19));
        let mut g = small_grid(5, 5);
        Generator::sidewinder().accept(&mut g, &mut rng).unwrap();
        let dead_ends = g.dead_ends();
        g.cull(0.0, &mut rng);
        assert_eq!(g.dead_ends(), dead_ends);
        assert_eq!(g.links_count(), 24);
    }

    #[test]
    fn iter_links_visits_each_edge_once() {
        let mut rng = maze_rng(Some(23));
        let mut g = small_grid(5, 6);
        Generator::binary_tree().accept(&mut g, &mut rng).unwrap();
        let links: Vec<(CellIndex, CellIndex)> = g.iter_links().collect();
        assert_eq!(links.len(), g.links_count());
        for (a, b) in links {
            assert!(g.is_linked(a, b));
        }
    }
}
