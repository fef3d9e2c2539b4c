//! Randomly composes a generator with the post-processing operators of `Grid`.
//!
//! Every build makes a weave grid and then, each step with its own odds:
//!
//! 1. deletes a few cells before carving, only for generators that cope with holes in the grid,
//! 2. runs the generator,
//! 3. re-runs it one to three times to add loops, only for generators whose reruns add loops,
//! 4. culls dead ends over several passes, unless cells were deleted,
//! 5. braids dead ends,
//! 6. computes distances from a cell near the centre.
//!
//! Whatever was applied is recorded in the grid's metadata.

use log::debug;

use crate::cells::CellIndex;
use crate::generators::Generator;
use crate::grid::{CellLinkError, Grid};
use crate::pathing::Distances;
use crate::units::{ColumnsCount, RowsCount};
use crate::utils::{self, MazeRng};

#[derive(Debug, Copy, Clone)]
pub struct Builder {
    rows: RowsCount,
    columns: ColumnsCount,
    generator: Generator,
}

impl Builder {
    pub fn new(rows: RowsCount, columns: ColumnsCount, generator: Generator) -> Builder {
        Builder {
            rows,
            columns,
            generator,
        }
    }

    #[inline]
    pub fn generator(&self) -> Generator {
        self.generator
    }

    /// Build with a generator seeded from the operating system.
    pub fn build(&self) -> Result<Grid, CellLinkError> {
        let mut rng = utils::maze_rng(None);
        self.build_with_rng(&mut rng)
    }

    /// Build a maze, the same seeded generator always giving the same maze.
    pub fn build_with_rng(&self, rng: &mut MazeRng) -> Result<Grid, CellLinkError> {
        let mut grid = Grid::weave(self.rows, self.columns);

        let deleted = self.can_delete() && utils::choose(rng, 10);
        if deleted {
            let ratio = utils::ratio(rng) / 4.0;
            debug!("deleting cells with ratio {:.2}", ratio);
            grid.delete(ratio, rng);
            grid.metadata_mut().set_deleted(ratio);
        }

        let mut state = self.generator.accept_with_state(&mut grid, rng, None)?;
        grid.metadata_mut().set_generator(self.generator.name());
        debug!("generated {}x{} maze with {}", self.columns.0, self.rows.0, self.generator);

        if self.can_loop() && utils::choose(rng, 2) {
            let count = utils::random_between(rng, 1, 3);
            debug!("looping {} times", count);
            for _ in 0..count {
                state = self.generator.accept_with_state(&mut grid, rng, state)?;
            }
            grid.metadata_mut().set_looped(count);
        }

        if !deleted && utils::choose(rng, 4) {
            let ratio = utils::ratio(rng);
            let passes = utils::random_between(rng, 2, 6);
            debug!("culling with ratio {:.2} over {} passes", ratio, passes);
            for _ in 0..passes {
                grid.cull(ratio, rng);
            }
            grid.metadata_mut().set_culled(ratio, passes);
        }

        if utils::coin_flip(rng) {
            let ratio = utils::ratio(rng);
            debug!("braiding with ratio {:.2}", ratio);
            grid.braid(ratio, rng)?;
            grid.metadata_mut().set_braided(ratio);
        }

        if !utils::choose(rng, 10) {
            match self.distances_root(&grid, rng).and_then(|root| Distances::new(&grid, root)) {
                Some(distances) => {
                    debug!("distances from {} reach {} cells, max {}",
                           distances.root(),
                           distances.len(),
                           distances.max());
                    grid.set_distances(distances);
                }
                None => debug!("no linked cell found to measure distances from"),
            }
        }

        Ok(grid)
    }

    /// Generators that still visit every remaining cell after some are deleted.
    fn can_delete(&self) -> bool {
        match self.generator {
            Generator::RecursiveBacktracker { .. } | Generator::Kruskals => true,
            _ => false,
        }
    }

    /// Generators whose reruns over a carved maze add loops.
    fn can_loop(&self) -> bool {
        match self.generator {
            Generator::BinaryTree | Generator::Sidewinder | Generator::Kruskals => true,
            _ => false,
        }
    }

    /// The centre cell, or failing that a random cell, that has links. Gives up after a fifth of
    /// the grid's size in random picks.
    fn distances_root(&self, grid: &Grid, rng: &mut MazeRng) -> Option<CellIndex> {
        let mut root = grid.cell(self.rows.0 / 2, self.columns.0 / 2)?;
        for _ in 0..grid.size() / 5 {
            if grid.has_links(root) {
                break;
            }
            root = grid.random_cell(rng);
        }

        if grid.has_links(root) {
            Some(root)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::maze_rng;

    fn build(generator: Generator, seed: u64) -> Grid {
        let mut rng = maze_rng(Some(seed));
        Builder::new(RowsCount(12), ColumnsCount(16), generator)
            .build_with_rng(&mut rng)
            .expect("build failed")
    }

    #[test]
    fn records_generator() {
        for generator in Generator::all().iter() {
            let g = build(*generator, 3);
            assert_eq!(g.metadata().generator(), Some(generator.name()));
            assert_eq!(g.rows(), RowsCount(12));
            assert_eq!(g.columns(), ColumnsCount(16));
        }
    }

    #[test]
    fn operators_follow_generator_eligibility() {
        for seed in 0..60 {
            for generator in Generator::all().iter() {
                let g = build(*generator, seed);
                let metadata = g.metadata();

                if metadata.deleted().is_some() {
                    assert!(generator == &Generator::recursive_backtracker() || generator == &Generator::kruskals());
                    assert!(metadata.deleted().unwrap() < 0.25);
                    assert!(metadata.culled().is_none());
                }
                if let Some(count) = metadata.looped() {
                    assert!(count >= 1 && count <= 3);
                    assert!(generator != &Generator::aldous_broder());
                    assert!(generator != &Generator::recursive_backtracker());
                }
                if let Some(culled) = metadata.culled() {
                    assert!(culled.passes >= 2 && culled.passes <= 6);
                    assert!(culled.ratio >= 0.0 && culled.ratio < 1.0);
                }
                if let Some(braided) = metadata.braided() {
                    assert!(braided >= 0.0 && braided < 1.0);
                }
            }
        }
    }

    #[test]
    fn built_weaves_keep_under_cells_in_line() {
        let mut tunnels = 0;
        for seed in 0..80 {
            for generator in Generator::all().iter() {
                let g = build(*generator, seed);
                tunnels += g.under_cells().count();
                assert!(crate::weave::tests::under_cells_stay_in_line(&g),
                        "{} seed {}", generator, seed);
            }
        }
        assert!(tunnels > 0);
    }

    #[test]
    fn every_operator_gets_applied_sometimes() {
        let grids: Vec<Grid> = (0..200).map(|seed| build(Generator::kruskals(), seed)).collect();
        assert!(grids.iter().any(|g| g.metadata().deleted().is_some()));
        assert!(grids.iter().any(|g| g.metadata().looped().is_some()));
        assert!(grids.iter().any(|g| g.metadata().culled().is_some()));
        assert!(grids.iter().any(|g| g.metadata().braided().is_some()));
        assert!(grids.iter().any(|g| g.distances().is_some()));
        assert!(grids.iter().any(|g| g.distances().is_none()));
    }

    #[test]
    fn distances_root_has_links() {
        for seed in 0..50 {
            let g = build(Generator::recursive_backtracker(), seed);
            if let Some(distances) = g.distances() {
                assert!(g.has_links(distances.root()));
                assert_eq!(g.maximum_distance(), distances.max());
                assert!(distances.len() > 1);
            } else {
                assert_eq!(g.maximum_distance(), 0);
            }
        }
    }

    #[test]
    fn same_seed_same_maze() {
        for generator in Generator::all().iter() {
            let a = build(*generator, 1234);
            let b = build(*generator, 1234);
            assert_eq!(a.metadata(), b.metadata());
            assert_eq!(a.cells_count(), b.cells_count());
            assert_eq!(a.iter_links().collect::<Vec<_>>(), b.iter_links().collect::<Vec<_>>());
        }
    }

    #[test]
    fn plain_generation_is_a_perfect_maze() {
        // seeds where no operator fires leave the spanning tree untouched
        for seed in 0..100 {
            let g = build(Generator::aldous_broder(), seed);
            let metadata = g.metadata();
            if metadata.culled().is_none() && metadata.braided().is_none() {
                let distances = Distances::new(&g, CellIndex(0)).expect("invalid root");
                assert_eq!(distances.len(), g.cells_count());
                assert_eq!(g.links_count(), g.cells_count() - 1);
            }
        }
    }
}
