use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;
use std::fmt;
use std::mem;

use crate::cells::{CellIndex, CellIndexSmallVec, CompassPrimary};
use crate::grid::{CellLinkError, Grid};
use crate::utils::{self, FnvHashMap, MazeRng};

/// The maze generation algorithms.
///
/// Every variant, run once over an untouched rectangular grid, carves a perfect maze: a spanning
/// tree of the grid's cells. Running a generator again over a carved grid adds loops.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Generator {
    BinaryTree,
    Sidewinder,
    AldousBroder,
    /// Starts from the given cell, or a random one with neighbours.
    RecursiveBacktracker { start: Option<CellIndex> },
    Kruskals,
}

/// Relative odds of each generator when one is picked at random.
const GENERATOR_WEIGHTS: [(Generator, u32); 5] = [(Generator::BinaryTree, 1),
                                                  (Generator::Sidewinder, 1),
                                                  (Generator::AldousBroder, 2),
                                                  (Generator::RecursiveBacktracker { start: None }, 2),
                                                  (Generator::Kruskals, 4)];

impl Generator {
    pub fn binary_tree() -> Generator {
        Generator::BinaryTree
    }

    pub fn sidewinder() -> Generator {
        Generator::Sidewinder
    }

    pub fn aldous_broder() -> Generator {
        Generator::AldousBroder
    }

    pub fn recursive_backtracker() -> Generator {
        Generator::RecursiveBacktracker { start: None }
    }

    pub fn recursive_backtracker_from(start: CellIndex) -> Generator {
        Generator::RecursiveBacktracker { start: Some(start) }
    }

    pub fn kruskals() -> Generator {
        Generator::Kruskals
    }

    pub fn all() -> [Generator; 5] {
        [Generator::binary_tree(),
         Generator::sidewinder(),
         Generator::aldous_broder(),
         Generator::recursive_backtracker(),
         Generator::kruskals()]
    }

    /// Pick a generator with the weighted odds favouring the less biased algorithms.
    pub fn random(rng: &mut MazeRng) -> Generator {
        let total: u32 = GENERATOR_WEIGHTS.iter().map(|&(_, weight)| weight).sum();
        let mut pick = rng.gen_range(0..total);
        for &(generator, weight) in GENERATOR_WEIGHTS.iter() {
            if pick < weight {
                return generator;
            }
            pick -= weight;
        }
        unreachable!("pick is always below the total weight")
    }

    /// Display name, e.g. "Recursive Backtracker".
    pub fn name(&self) -> &'static str {
        match *self {
            Generator::BinaryTree => "Binary Tree",
            Generator::Sidewinder => "Sidewinder",
            Generator::AldousBroder => "Aldous Broder",
            Generator::RecursiveBacktracker { .. } => "Recursive Backtracker",
            Generator::Kruskals => "Kruskals",
        }
    }

    /// Look up a generator by name, ignoring case and any punctuation or spacing, so "Binary Tree",
    /// "binary-tree" and "binarytree" all name the same generator.
    pub fn from_name(name: &str) -> Option<Generator> {
        let wanted = squash_name(name);
        Generator::all().iter().cloned().find(|generator| squash_name(generator.name()) == wanted)
    }

    /// Carve passages into the grid.
    pub fn accept(&self, grid: &mut Grid, rng: &mut MazeRng) -> Result<(), CellLinkError> {
        self.accept_with_state(grid, rng, None).map(|_| ())
    }

    /// Carve passages into the grid, threading Kruskal's working state between runs.
    ///
    /// For `Kruskals`, `None` builds a fresh state from the grid. Passing back the state returned
    /// by an earlier run over the same grid makes the run consider only the cell pairs that were
    /// never linked, over a fresh partition, so every link it makes closes a loop in the maze.
    /// The other generators have no state and always return `None`.
    pub fn accept_with_state(&self,
                             grid: &mut Grid,
                             rng: &mut MazeRng,
                             state: Option<KruskalsState>)
                             -> Result<Option<KruskalsState>, CellLinkError> {
        let links_before = grid.links_count();
        let state = match *self {
            Generator::BinaryTree => binary_tree(grid, rng).map(|_| None)?,
            Generator::Sidewinder => sidewinder(grid, rng).map(|_| None)?,
            Generator::AldousBroder => aldous_broder(grid, rng).map(|_| None)?,
            Generator::RecursiveBacktracker { start } => {
                recursive_backtracker(grid, rng, start).map(|_| None)?
            }
            Generator::Kruskals => Some(kruskals(grid, rng, state)?),
        };
        trace!("{} carved {} links", self.name(), grid.links_count() - links_before);
        Ok(state)
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn squash_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Apply the binary tree maze generation algorithm to a grid
/// It works simply by visiting each cell in the grid and choosing to carve a passage
/// in one of two perpendicular directions, here north or east.
/// The two directions are constant for the entire maze generation process,
/// otherwise we'd have a good way for generating many areas with no way in or out. We would not be
/// generating a perfect maze.
/// The result has a long unbroken corridor along the north and east walls.
fn binary_tree(grid: &mut Grid, rng: &mut MazeRng) -> Result<(), CellLinkError> {
    let neighbours_to_check = [CompassPrimary::North, CompassPrimary::East];

    for cell in grid.iter() {
        if grid.is_under(cell) {
            continue;
        }

        // Get the neighbours perpendicular to this cell
        let neighbours = grid.neighbours_at_directions(cell, &neighbours_to_check)
            .into_iter()
            .flatten()
            .collect::<CellIndexSmallVec>();

        // Unless there are no neighbours, randomly choose a neighbour to connect.
        if !neighbours.is_empty() {
            let link = utils::sample(rng, &neighbours);
            grid.link(cell, link)?;
        }
    }
    Ok(())
}

/// Apply the sidewinder maze generation algorithm to the grid
/// Sidewinder visits the rows from the west side and moves eastwards.
/// Like the simple binary tree algorithm it picks from one of two directions. The difference is
/// that east just carves in that direction but when we pick to move north we carve a passage north
/// in a random cell selected from the most recent run of horizontal cells.
/// This algorithm will display a vertical bias, with most passages leading north, and one long
/// passage along the northern wall where a run can never be closed out.
fn sidewinder(grid: &mut Grid, rng: &mut MazeRng) -> Result<(), CellLinkError> {
    for cells_line in grid.iter_row() {
        let mut run = SmallVec::<[CellIndex; 16]>::new();

        for cell in cells_line {
            run.push(cell);

            let east = grid.neighbour_at_direction(cell, CompassPrimary::East);
            let at_close_out_direction_boundary =
                grid.neighbour_at_direction(cell, CompassPrimary::North).is_none();

            let next_in_run = match east {
                Some(east) if at_close_out_direction_boundary || !utils::coin_flip(rng) => Some(east),
                _ => None,
            };

            if let Some(east) = next_in_run {
                grid.link(cell, east)?;
            } else {
                let run_member = utils::sample(rng, &run);
                if let Some(north) = grid.neighbour_at_direction(run_member, CompassPrimary::North) {
                    grid.link(run_member, north)?;
                }
                run.clear();
            }
        }
    }
    Ok(())
}

/// A random over cell with at least one lattice neighbour.
fn random_start(grid: &Grid, rng: &mut MazeRng) -> Option<CellIndex> {
    if grid.size() == 0 {
        return None;
    }
    let cell = grid.random_cell(rng);
    if !grid.lattice_neighbours(cell).is_empty() {
        return Some(cell);
    }

    // Cells have been removed, fall back to searching for a usable start.
    let candidates = (0..grid.size())
        .map(CellIndex)
        .filter(|c| !grid.lattice_neighbours(*c).is_empty())
        .collect::<Vec<CellIndex>>();
    if candidates.is_empty() {
        None
    } else {
        Some(utils::sample(rng, &candidates))
    }
}

/// The cells reachable from `start` by lattice steps or tunnels, `start` included.
fn lattice_component(grid: &Grid, start: CellIndex) -> Vec<CellIndex> {
    let mut seen = utils::fnv_hashset(grid.cells_count());
    let _ = seen.insert(start);
    let mut component = vec![start];
    let mut frontier = vec![start];
    while let Some(cell) = frontier.pop() {
        for neighbour in grid.neighbours(cell) {
            if seen.insert(neighbour) {
                component.push(neighbour);
                frontier.push(neighbour);
            }
        }
    }
    component
}

/// Unbiased random walk: wander from neighbour to neighbour and carve into every cell the first
/// time it is entered. Slow to finish as the last few unvisited cells take a while to stumble on.
fn aldous_broder(grid: &mut Grid, rng: &mut MazeRng) -> Result<(), CellLinkError> {
    let start = match random_start(grid, rng) {
        Some(start) => start,
        None => return Ok(()),
    };

    let mut unvisited = lattice_component(grid, start)
        .into_iter()
        .filter(|cell| *cell != start && !grid.has_links(*cell))
        .count();

    let mut current = start;
    while unvisited > 0 {
        let neighbours = grid.neighbours(current);
        let neighbour = utils::sample(rng, &neighbours);

        if !grid.has_links(neighbour) {
            grid.link(current, neighbour)?;
            unvisited -= 1;
        }
        current = neighbour;
    }
    Ok(())
}

/// Depth first search: keep carving into unvisited neighbours, backtracking along the stack of
/// visited cells at each dead end. Makes long twisty passages with few dead ends.
fn recursive_backtracker(grid: &mut Grid,
                         rng: &mut MazeRng,
                         start: Option<CellIndex>)
                         -> Result<(), CellLinkError> {
    let start = match start {
        Some(cell) if grid.is_valid_cell(cell) => cell,
        Some(_) => return Err(CellLinkError::InvalidGridCoordinate),
        None => {
            match random_start(grid, rng) {
                Some(cell) => cell,
                None => return Ok(()),
            }
        }
    };

    let mut stack = vec![start];
    while let Some(&current) = stack.last() {
        let unvisited = grid.neighbours(current)
            .into_iter()
            .filter(|neighbour| !grid.has_links(*neighbour))
            .collect::<CellIndexSmallVec>();

        if unvisited.is_empty() {
            let _ = stack.pop();
        } else {
            let next = utils::sample(rng, &unvisited);
            grid.link(current, next)?;
            stack.push(next);
        }
    }
    Ok(())
}

/// Working state of Kruskal's algorithm: the lattice pairs not yet linked and a disjoint-set
/// partition of the grid's cells.
#[derive(Debug, Clone)]
pub struct KruskalsState {
    neighbours: Vec<(CellIndex, CellIndex)>,
    set_for_cell: Vec<usize>,
    cells_in_set: FnvHashMap<usize, Vec<CellIndex>>,
}

impl KruskalsState {
    /// Every cell in a set of its own and every (cell, south) and (cell, east) lattice pair.
    pub fn new(grid: &Grid) -> KruskalsState {
        let mut neighbours = Vec::with_capacity(2 * grid.cells_count());
        for cell in grid.iter() {
            for direction in &[CompassPrimary::South, CompassPrimary::East] {
                if let Some(neighbour) = grid.neighbour_at_direction(cell, *direction) {
                    neighbours.push((cell, neighbour));
                }
            }
        }

        let mut state = KruskalsState {
            neighbours,
            set_for_cell: vec![],
            cells_in_set: utils::fnv_hashmap(0),
        };
        state.partition(grid);
        state
    }

    /// Start over with every cell in a set of its own.
    fn partition(&mut self, grid: &Grid) {
        let cells_count = grid.cells_count();
        self.set_for_cell = (0..cells_count).collect();
        self.cells_in_set = utils::fnv_hashmap(cells_count);
        for cell in grid.iter() {
            let _ = self.cells_in_set.insert(cell.0, vec![cell]);
        }
    }

    /// The lattice pairs that have not been linked.
    pub fn pending(&self) -> &[(CellIndex, CellIndex)] {
        &self.neighbours
    }

    /// Number of disjoint sets.
    pub fn sets_count(&self) -> usize {
        self.cells_in_set.len()
    }

    pub fn can_merge(&self, left: CellIndex, right: CellIndex) -> bool {
        match (self.set_for_cell.get(left.0), self.set_for_cell.get(right.0)) {
            (Some(left_set), Some(right_set)) => left_set != right_set,
            _ => false,
        }
    }

    /// Link the two cells and join their sets. Every cell of the smaller set moves to the larger.
    fn merge(&mut self, grid: &mut Grid, left: CellIndex, right: CellIndex) -> Result<(), CellLinkError> {
        grid.link(left, right)?;

        let (mut winner, mut loser) = (self.set_for_cell[left.0], self.set_for_cell[right.0]);
        let set_len = |set: usize| self.cells_in_set.get(&set).map_or(0, Vec::len);
        if set_len(winner) < set_len(loser) {
            mem::swap(&mut winner, &mut loser);
        }

        let losers = self.cells_in_set.remove(&loser).unwrap_or_default();
        for cell in &losers {
            self.set_for_cell[cell.0] = winner;
        }
        self.cells_in_set.entry(winner).or_insert_with(Vec::new).extend(losers);
        Ok(())
    }
}

/// Shuffle the pending lattice pairs and link each pair whose cells are in different sets.
fn kruskals(grid: &mut Grid,
            rng: &mut MazeRng,
            state: Option<KruskalsState>)
            -> Result<KruskalsState, CellLinkError> {
    let mut state = match state {
        Some(mut retained) => {
            retained.partition(grid);
            retained
        }
        None => KruskalsState::new(grid),
    };

    let mut pairs = mem::take(&mut state.neighbours);
    pairs.shuffle(rng);

    let mut pending = Vec::new();
    for (left, right) in pairs {
        if state.can_merge(left, right) {
            state.merge(grid, left, right)?;
        } else {
            pending.push((left, right));
        }
    }
    state.neighbours = pending;
    Ok(state)
}
