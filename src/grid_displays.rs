use itertools::Itertools;
use std::fmt;

use crate::cells::{CellIndex, CompassPrimary};
use crate::grid::Grid;
use crate::units::{ColumnsCount, RowsCount};
use crate::utils::{self, FnvHashSet};

/// One line summary of a maze: generator, size, the operators applied and the dead ends left.
///
/// e.g. `Kruskals / (20x10) / loop*2 / braid~0.4 / [12]`
pub fn title(grid: &Grid) -> String {
    let metadata = grid.metadata();
    let mut parts = vec![metadata.generator().unwrap_or("Empty").to_string(),
                         format!("({}x{})", grid.columns().0, grid.rows().0)];

    if let Some(ratio) = metadata.deleted() {
        parts.push(format!("del-{:.2}", ratio));
    }
    if let Some(count) = metadata.looped() {
        parts.push(format!("loop*{}", count));
    }
    if let Some(culled) = metadata.culled() {
        parts.push(format!("cull-{:.1}*{}", culled.ratio, culled.passes));
    }
    if let Some(ratio) = metadata.braided() {
        parts.push(format!("braid~{:.1}", ratio));
    }
    let dead_ends = grid.dead_ends().len();
    if dead_ends > 0 {
        parts.push(format!("[{}]", dead_ends));
    }

    parts.iter().join(" / ")
}

/// The body of a cell: its distance from the attached distance field, if any, otherwise a mark
/// for the over cells with a passage tunnelling beneath them.
fn render_cell_body(grid: &Grid, tunnelled: &FnvHashSet<CellIndex>, cell: CellIndex) -> String {
    if let Some(d) = grid.distances().and_then(|distances| distances.distance_from_root_to(cell)) {
        // centre align, padding 3, lowercase hexadecimal
        format!("{:^3x}", d)
    } else if tunnelled.contains(&cell) {
        String::from(" + ")
    } else {
        String::from("   ")
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const WALL_L: &str = "╴";
        const WALL_R: &str = "╶";
        const WALL_U: &str = "╵";
        const WALL_D: &str = "╷";
        const WALL_LR_3: &str = "───";
        const WALL_LR: &str = "─";
        const WALL_UD: &str = "│";
        const WALL_LD: &str = "┐";
        const WALL_RU: &str = "└";
        const WALL_LU: &str = "┘";
        const WALL_RD: &str = "┌";
        const WALL_LRU: &str = "┴";
        const WALL_LRD: &str = "┬";
        const WALL_LRUD: &str = "┼";
        const WALL_RUD: &str = "├";
        const WALL_LUD: &str = "┤";

        let ColumnsCount(columns_count) = self.columns();
        let RowsCount(rows_count) = self.rows();
        if rows_count == 0 || columns_count == 0 {
            return Ok(());
        }

        let mut tunnelled = utils::fnv_hashset(self.cells_count() - self.size());
        tunnelled.extend(self.under_cells().filter_map(|under| self.over_cell_of(under)));

        // Walls of over cells that a tunnel passes through, keyed by the over cell and the side.
        let mut tunnel_mouths: FnvHashSet<(CellIndex, CompassPrimary)> = utils::fnv_hashset(tunnelled.len() * 2);
        for under in self.under_cells() {
            if let Some(over) = self.over_cell_of(under) {
                let linked_sides = CompassPrimary::ALL.iter().cloned().filter(|&direction| {
                    self.neighbour_at_direction(under, direction)
                        .map_or(false, |neighbour| self.is_linked(under, neighbour))
                });
                tunnel_mouths.extend(linked_sides.map(|direction| (over, direction)));
            }
        }
        let wall_open = |cell: CellIndex, direction: CompassPrimary| {
            self.is_neighbour_linked(cell, direction) || tunnel_mouths.contains(&(cell, direction))
        };

        // Start by special case rendering the text for the north most boundary
        let first_grid_row: Vec<CellIndex> = self.iter_row().next().unwrap_or_default();
        let mut output = String::from(WALL_RD);
        for (index, cell) in first_grid_row.iter().enumerate() {
            output.push_str(WALL_LR_3);
            let is_east_open = wall_open(*cell, CompassPrimary::East);
            if is_east_open {
                output.push_str(WALL_LR);
            } else {
                let is_last_cell = index == (columns_count - 1);
                if is_last_cell {
                    output.push_str(WALL_LD);
                } else {
                    output.push_str(WALL_LRD);
                }
            }
        }
        output.push('\n');

        for (index_row, row) in self.iter_row().enumerate() {

            let is_last_row = index_row == (rows_count - 1);

            // Starts of by special case rendering the west most boundary of the row
            // The top section of the cell is done by the previous row.
            let mut row_middle_section_render = String::from(WALL_UD);
            let mut row_bottom_section_render = String::new();

            for (index_column, cell) in row.into_iter().enumerate() {

                let render_cell_side = |direction, passage_clear_text, blocking_wall_text| {
                    if wall_open(cell, direction) {
                        passage_clear_text
                    } else {
                        blocking_wall_text
                    }
                };
                let is_first_column = index_column == 0;
                let is_last_column = index_column == (columns_count - 1);
                let east_open = wall_open(cell, CompassPrimary::East);
                let south_open = wall_open(cell, CompassPrimary::South);

                // Each cell will simply use the southern wall of the cell above
                // it as its own northern wall, so we only need to worry about the cell’s body (room space),
                // its eastern boundary ('|'), and its southern boundary ('---+') minus the south west corner.
                let east_boundary = render_cell_side(CompassPrimary::East, " ", WALL_UD);

                row_middle_section_render.push_str(&render_cell_body(self, &tunnelled, cell));
                row_middle_section_render.push_str(east_boundary);

                if is_first_column {
                    row_bottom_section_render = if is_last_row {
                        String::from(WALL_RU)
                    } else if south_open {
                        String::from(WALL_UD)
                    } else {
                        String::from(WALL_RUD)
                    };
                }
                let south_boundary = render_cell_side(CompassPrimary::South, "   ", WALL_LR_3);
                row_bottom_section_render.push_str(south_boundary);

                let corner = match (is_last_row, is_last_column) {
                    (true, true) => WALL_LU,
                    (true, false) => if east_open { WALL_LR } else { WALL_LRU },
                    (false, true) => if south_open { WALL_UD } else { WALL_LUD },
                    (false, false) => {
                        // Position on the rendered grid, not the lattice which may lead to an under cell.
                        let access_se_from_east =
                            self.cell(index_row, index_column + 1)
                                .map_or(false, |c| wall_open(c, CompassPrimary::South));
                        let access_se_from_south =
                            self.cell(index_row + 1, index_column)
                                .map_or(false, |c| wall_open(c, CompassPrimary::East));
                        let show_right_section = !access_se_from_east;
                        let show_down_section = !access_se_from_south;
                        let show_up_section = !east_open;
                        let show_left_section = !south_open;

                        match (show_left_section,
                               show_right_section,
                               show_up_section,
                               show_down_section) {
                            (true, true, true, true) => WALL_LRUD,
                            (true, true, true, false) => WALL_LRU,
                            (true, true, false, true) => WALL_LRD,
                            (true, false, true, true) => WALL_LUD,
                            (false, true, true, true) => WALL_RUD,
                            (true, true, false, false) => WALL_LR,
                            (false, false, true, true) => WALL_UD,
                            (false, true, true, false) => WALL_RU,
                            (true, false, false, true) => WALL_LD,
                            (true, false, true, false) => WALL_LU,
                            (false, true, false, true) => WALL_RD,
                            (true, false, false, false) => WALL_L,
                            (false, true, false, false) => WALL_R,
                            (false, false, true, false) => WALL_U,
                            (false, false, false, true) => WALL_D,
                            _ => " ",
                        }
                    }
                };

                row_bottom_section_render.push_str(corner);
            }

            output.push_str(&row_middle_section_render);
            output.push('\n');
            output.push_str(&row_bottom_section_render);
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}
