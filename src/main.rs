use docopt::Docopt;
use error_chain::bail;
use log::info;
use serde_derive::Deserialize;
use std::{
    fs::File,
    io::prelude::*,
};
use weaving_mazes::{
    builder::Builder,
    generators::Generator,
    grid::Grid,
    grid_displays,
    units::{ColumnsCount, RowsCount},
    utils,
};

const USAGE: &str = "Weaving Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver [--rows=<r>] [--columns=<c>] [--generator=<name>] [--seed=<n>] [--show-path] [--title-only] [--text-out=<path>] [--verbose]

Options:
    -h --help              Show this screen.
    --rows=<r>             Number of rows in the grid [default: 12].
    --columns=<c>          Number of columns in the grid [default: 20].
    --generator=<name>     One of binary-tree, sidewinder, aldous-broder, recursive-backtracker or kruskals. Picked at random when not given.
    --seed=<n>             Seed for the random number generator, the same seed builds the same maze.
    --show-path            Show only the distances along the path from the distance root to the furthest cell.
    --title-only           Print the maze title line without the maze.
    --text-out=<path>      Output file path for the textual rendering of the maze instead of stdout.
    --verbose              Log each step of the build.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_rows: usize,
    flag_columns: usize,
    flag_generator: Option<String>,
    flag_seed: Option<u64>,
    flag_show_path: bool,
    flag_title_only: bool,
    flag_text_out: String,
    flag_verbose: bool,
}

// We'll put our errors in an `errors` module, and other modules in
// this crate will `use errors::*;` to get access to everything
// `error_chain!` creates.
mod errors {
    // Create the Error, ErrorKind, ResultExt, and Result types
    // Result is a typedef of std `Result` with the error type our own `Error`
    // Defines the From conversions that let try! and ? work for our `Error`.
    // ResultExt adds the `chain_err` trait method.
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            LoggerInit(::log::SetLoggerError);
            CellLink(::weaving_mazes::grid::CellLinkError);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    use simplelog::LevelFilter::{Debug, Info, Off};
    simplelog::TermLogger::init(
        if args.flag_verbose { Debug } else { Info },
        simplelog::ConfigBuilder::new()
            .set_target_level(Off)
            .set_location_level(Off)
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    if args.flag_rows == 0 || args.flag_columns == 0 {
        bail!("A maze needs at least one row and one column, got {}x{}", args.flag_columns, args.flag_rows);
    }

    let mut rng = utils::maze_rng(args.flag_seed);
    let generator = match args.flag_generator {
        Some(ref name) => match Generator::from_name(name) {
            Some(generator) => generator,
            None => bail!("Unknown maze generator '{}'", name),
        },
        None => Generator::random(&mut rng),
    };

    let mut maze_grid = Builder::new(RowsCount(args.flag_rows), ColumnsCount(args.flag_columns), generator)
        .build_with_rng(&mut rng)
        .chain_err(|| format!("Failed to build a maze with {}", generator))?;

    if args.flag_show_path {
        show_path_to_farthest(&mut maze_grid);
    }

    let title = grid_displays::title(&maze_grid);
    info!("{}", title);
    if args.flag_title_only {
        println!("{}", title);
        return Ok(());
    }

    if args.flag_text_out.is_empty() {
        println!("{}", title);
        println!("{}", maze_grid);
    } else {
        write_text_to_file(&format!("{}\n{}", title, maze_grid), &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    Ok(())
}

/// Swap the grid's distance field for the path from its root to its furthest cell.
fn show_path_to_farthest(maze_grid: &mut Grid) {
    let path = maze_grid.distances()
        .and_then(|distances| distances.to(maze_grid, distances.farthest()));
    match path {
        Some(path) => maze_grid.set_distances(path),
        None => info!("No distances were computed for this maze, there is no path to show"),
    }
}

fn write_text_to_file(data: &str, file_name: &str) -> Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
