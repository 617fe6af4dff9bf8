//! Demo driver: saves and loads a large vector through `tmp.idx`.
//!
//! Subcommands:
//! - `save`         stream-writes 500 million `u64` ones
//! - `load`         loads (mapping by default) and discards
//! - `load_and_run` loads and sums every element

use std::env;
use std::process;

use mapbin::{MapVec, MapbinError, Storage};

const PATH: &str = "tmp.idx";
const ELEMENTS: usize = 500_000_000;

fn main() -> mapbin::Result<()> {
    let Some(command) = env::args().nth(1) else {
        process::exit(1);
    };

    match command.as_str() {
        "save" => {
            let mut buffer = MapVec::<u64>::filled(ELEMENTS, 1);
            mapbin::save_file_stream(PATH, &mut buffer)?;
        }
        "load" => {
            let (buffer, _storage): (MapVec<u64>, Storage) = mapbin::load_file(PATH)?;
            drop(buffer);
        }
        "load_and_run" => {
            let (buffer, _storage): (MapVec<u64>, Storage) = mapbin::load_file(PATH)?;
            let mut total = 0u64;
            for value in &buffer {
                total = total.wrapping_add(*value);
            }
            println!("{total}");
        }
        other => {
            return Err(MapbinError::Misuse(format!("unknown command: {other}")));
        }
    }
    Ok(())
}
