use smallvec::SmallVec;
use std::fmt;

/// Dense index of a cell in the grid's arena.
///
/// Over cells occupy `0..rows * columns` in row-major order, under cells of a weave grid follow
/// in the order they were tunnelled. The index doubles as the cell's node index in the link graph.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct CellIndex(pub usize);

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub type CellIndexSmallVec = SmallVec<[CellIndex; 8]>;
pub type CellIndexOptionSmallVec = SmallVec<[Option<CellIndex>; 4]>;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Default, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub row: usize,
    pub column: usize,
}

impl GridCoordinate {
    pub fn new(row: usize, column: usize) -> GridCoordinate {
        GridCoordinate { row, column }
    }
}

impl From<(usize, usize)> for GridCoordinate {
    fn from(row_column_pair: (usize, usize)) -> GridCoordinate {
        GridCoordinate::new(row_column_pair.0, row_column_pair.1)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    /// Order matches the lattice slots of a cell.
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::South,
                                          CompassPrimary::East,
                                          CompassPrimary::West];

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    pub fn is_vertical(self) -> bool {
        match self {
            CompassPrimary::North | CompassPrimary::South => true,
            CompassPrimary::East | CompassPrimary::West => false,
        }
    }

    #[inline]
    fn slot(self) -> usize {
        match self {
            CompassPrimary::North => 0,
            CompassPrimary::South => 1,
            CompassPrimary::East => 2,
            CompassPrimary::West => 3,
        }
    }
}

/// Which layer of a weave a cell lives on.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLayer {
    Over,
    /// Tunnels beneath the over cell at the same coordinate.
    Under { over: CellIndex },
}

/// The physical (lattice) side of a cell: where it is and who is next to it.
///
/// Lattice relations are independent of links. They are set when the grid is built and only
/// change when a cell is removed or when an under cell is spliced into a weave.
#[derive(Clone, Debug)]
pub struct LatticeCell {
    coordinate: GridCoordinate,
    layer: CellLayer,
    neighbours: [Option<CellIndex>; 4],
}

impl LatticeCell {
    pub fn new(coordinate: GridCoordinate, layer: CellLayer) -> LatticeCell {
        LatticeCell {
            coordinate,
            layer,
            neighbours: [None; 4],
        }
    }

    #[inline]
    pub fn coordinate(&self) -> GridCoordinate {
        self.coordinate
    }

    #[inline]
    pub fn layer(&self) -> CellLayer {
        self.layer
    }

    #[inline]
    pub fn is_under(&self) -> bool {
        matches!(self.layer, CellLayer::Under { .. })
    }

    #[inline]
    pub fn neighbour(&self, direction: CompassPrimary) -> Option<CellIndex> {
        self.neighbours[direction.slot()]
    }

    #[inline]
    pub fn set_neighbour(&mut self, direction: CompassPrimary, neighbour: Option<CellIndex>) {
        self.neighbours[direction.slot()] = neighbour;
    }

    /// Lattice neighbours in north, south, west, east order.
    pub fn neighbours(&self) -> CellIndexSmallVec {
        [CompassPrimary::North, CompassPrimary::South, CompassPrimary::West, CompassPrimary::East]
            .iter()
            .filter_map(|dir| self.neighbour(*dir))
            .collect()
    }

    pub fn has_neighbours(&self) -> bool {
        self.neighbours.iter().any(Option::is_some)
    }

    pub fn clear_neighbours(&mut self) {
        self.neighbours = [None; 4];
    }
}
