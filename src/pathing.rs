use smallvec::SmallVec;

use crate::cells::{CellIndex, CellIndexSmallVec};
use crate::grid::Grid;
use crate::utils::{self, FnvHashMap};

/// Breadth-first distance field over the links of a grid.
///
/// The field is computed once, from a snapshot of the links. Later changes to the grid are not
/// reflected in it.
#[derive(Debug, Clone)]
pub struct Distances {
    root: CellIndex,
    goal: Option<CellIndex>,
    distances: FnvHashMap<CellIndex, u32>,
    max_distance: u32,
}

impl Distances {
    /// Distances from `root` to every cell reachable from it. `None` if `root` is not a cell of the
    /// grid; an isolated root gives a field holding only the root.
    pub fn new(grid: &Grid, root: CellIndex) -> Option<Distances> {
        if !grid.is_valid_cell(root) {
            return None;
        }

        let mut max = 0;
        let mut distances = utils::fnv_hashmap(grid.cells_count());
        distances.insert(root, 0);

        // Every step is one link so the first distance recorded for a cell is already the
        // shortest. The distances map doubles as the visited set.
        let mut frontier = vec![root];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell in &frontier {
                let distance_to_cell = distances[cell];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for link in grid.links(*cell).unwrap_or_default() {
                    if !distances.contains_key(&link) {
                        distances.insert(link, distance_to_cell + 1);
                        new_frontier.push(link);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            root,
            goal: None,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn root(&self) -> CellIndex {
        self.root
    }

    /// Set only on a field made by `to`.
    #[inline(always)]
    pub fn goal(&self) -> Option<CellIndex> {
        self.goal
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    #[inline(always)]
    pub fn distance_from_root_to(&self, cell: CellIndex) -> Option<u32> {
        self.distances.get(&cell).cloned()
    }

    #[inline]
    pub fn is_set(&self, cell: CellIndex) -> bool {
        self.distances.contains_key(&cell)
    }

    /// The cells in the field, in no particular order.
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.distances.keys().cloned()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// All cells at the maximum distance, lowest index first.
    pub fn furthest_points_on_grid(&self) -> CellIndexSmallVec {
        let furthest_distance = self.max();
        let mut furthest = self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(cell, _)| *cell)
            .collect::<CellIndexSmallVec>();
        furthest.sort();
        furthest
    }

    /// One cell at the maximum distance.
    pub fn farthest(&self) -> CellIndex {
        self.furthest_points_on_grid().first().cloned().unwrap_or(self.root)
    }

    /// The shortest path from the root to `goal`, as a distance field holding only the cells on it.
    ///
    /// Walks back from the goal, each time stepping to the first linked cell that is strictly
    /// closer to the root. `None` if the goal is unreachable or the grid's links no longer match
    /// the field.
    pub fn to(&self, grid: &Grid, goal: CellIndex) -> Option<Distances> {
        let goal_distance = self.distance_from_root_to(goal)?;

        let mut breadcrumbs = utils::fnv_hashmap(goal_distance as usize + 1);
        breadcrumbs.insert(goal, goal_distance);

        let mut current = goal;
        let mut current_distance = goal_distance;
        while current != self.root {
            let (closer, closer_distance) = grid.links(current)?
                .iter()
                .filter_map(|link| self.distance_from_root_to(*link).map(|d| (*link, d)))
                .find(|&(_, d)| d < current_distance)?;

            breadcrumbs.insert(closer, closer_distance);
            current = closer;
            current_distance = closer_distance;
        }

        Some(Distances {
            root: self.root,
            goal: Some(goal),
            distances: breadcrumbs,
            max_distance: goal_distance,
        })
    }

    /// The cells of a field made by `to`, ordered from root to goal.
    pub fn path(&self) -> Option<Vec<CellIndex>> {
        self.goal?;
        let mut steps = self.distances
            .iter()
            .map(|(cell, distance)| (*distance, *cell))
            .collect::<SmallVec<[(u32, CellIndex); 32]>>();
        steps.sort();
        Some(steps.into_iter().map(|(_, cell)| cell).collect())
    }
}
