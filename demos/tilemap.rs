#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::path::PathBuf;

use clap::Parser;
use tilecode::{TilePipeline, TileSize};

#[derive(Parser)]
struct Options {
    /// The map image to classify.
    image: PathBuf,

    /// The side length of the square tiles in pixels.
    #[arg(long, default_value_t = 32)]
    tile_size: u32,

    /// Print palette color names instead of indices.
    #[arg(long, default_value_t = false)]
    names: bool,

    /// Classify tiles in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = Options::parse();

    let image = image::open(&options.image)?.into_rgb8();

    let mut pipeline = TilePipeline::try_from(&image)?;
    pipeline.tile_size(TileSize::try_from(options.tile_size)?);

    let grid = if options.parallel {
        pipeline.tile_grid_par()
    } else {
        pipeline.tile_grid()
    };

    for row in grid.rows() {
        let line = if options.names {
            row.iter()
                .map(|&i| pipeline.palette_ref().name_of(i).unwrap_or("").to_owned())
                .collect::<Vec<_>>()
        } else {
            row.iter().map(ToString::to_string).collect::<Vec<_>>()
        };
        println!("{}", line.join(","));
    }

    Ok(())
}
