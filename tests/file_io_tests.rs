#![allow(missing_docs)]

use std::path::Path;

use mapbin::{Describe, MapVec, Storage};

#[derive(Describe, Default, Clone, PartialEq, Debug)]
struct Snapshot {
    title: String,
    values: MapVec<u64>,
    samples: MapVec<i16>,
    flag: bool,
    checks: [u32; 3],
}

fn snapshot() -> Snapshot {
    Snapshot {
        title: "integration snapshot".to_string(),
        values: (0..4096u64).collect(),
        samples: vec![-3i16, 0, 7, 32_000].into(),
        flag: true,
        checks: [1, 2, 3],
    }
}

#[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
const SAVE_STRATEGIES: &[&str] = &["copy", "stream", "map"];
#[cfg(not(all(feature = "mmap", not(target_arch = "wasm32"))))]
const SAVE_STRATEGIES: &[&str] = &["copy", "stream"];

const LOAD_STRATEGIES: &[&str] = SAVE_STRATEGIES;

fn save_with(strategy: &str, path: &Path, value: &mut Snapshot) -> mapbin::Result<()> {
    match strategy {
        "copy" => mapbin::save_file_copy(path, value),
        "stream" => mapbin::save_file_stream(path, value),
        #[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
        "map" => mapbin::save_file_map(path, value),
        other => unreachable!("unknown save strategy {other}"),
    }
}

fn load_with(strategy: &str, path: &Path) -> mapbin::Result<(Snapshot, Storage)> {
    match strategy {
        "copy" => mapbin::load_file_copy(path),
        "stream" => mapbin::load_file_stream(path),
        #[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
        "map" => mapbin::load_file_map(path),
        other => unreachable!("unknown load strategy {other}"),
    }
}

/// Every save strategy pairs with every load strategy.
#[test]
fn strategy_matrix_roundtrips() -> mapbin::Result<()> {
    let dir = tempfile::tempdir()?;
    let original = snapshot();

    for save in SAVE_STRATEGIES {
        for load in LOAD_STRATEGIES {
            let path = dir.path().join(format!("{save}-{load}.bin"));
            save_with(save, &path, &mut original.clone())?;
            let (loaded, _storage) = load_with(load, &path)?;
            assert_eq!(loaded, original, "save={save} load={load}");
        }
    }
    Ok(())
}

/// All save strategies produce byte-identical files.
#[test]
fn save_strategies_agree_byte_for_byte() -> mapbin::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut images = Vec::new();

    for save in SAVE_STRATEGIES {
        let path = dir.path().join(format!("{save}.bin"));
        save_with(save, &path, &mut snapshot())?;
        images.push((save, std::fs::read(&path)?));
    }

    let size = mapbin::measure_size(&mut snapshot())?;
    for (save, image) in &images {
        assert_eq!(image.len() as u64, size, "strategy {save}");
        assert_eq!(image, &images[0].1, "strategy {save}");
    }
    Ok(())
}

/// Default strategies round-trip.
#[test]
fn default_save_load_roundtrips() -> mapbin::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("default.bin");
    let original = snapshot();

    mapbin::save_file(&path, &mut original.clone())?;
    let (loaded, _storage): (Snapshot, _) = mapbin::load_file(&path)?;
    assert_eq!(loaded, original);
    Ok(())
}

/// A mapped load borrows its vectors from the mapping; the storage handle
/// pins the mapping for the value's whole life.
#[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
#[test]
fn mapped_load_is_zero_copy() -> mapbin::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("mapped.bin");
    let original = snapshot();

    mapbin::save_file_map(&path, &mut original.clone())?;
    let (loaded, storage): (Snapshot, _) = mapbin::load_file_map(&path)?;

    assert!(storage.holds_bytes());
    assert!(loaded.values.is_borrowed());
    assert!(loaded.samples.is_borrowed());
    assert_eq!(loaded, original);

    // Strings are materialized by copy even on the map path.
    assert_eq!(loaded.title, original.title);
    drop(storage);
    Ok(())
}

/// Stream loads hand back self-keeping values: blob payloads live in
/// per-blob scratch buffers owned by the views themselves.
#[test]
fn stream_load_values_are_self_keeping() -> mapbin::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("streamed.bin");
    let original = snapshot();

    mapbin::save_file_stream(&path, &mut original.clone())?;
    let (loaded, storage) = load_with("stream", &path)?;
    assert!(!storage.holds_bytes());
    drop(storage);
    std::fs::remove_file(&path)?;
    // still fully usable after the handle and the file are gone
    assert_eq!(loaded, original);
    Ok(())
}

/// A value that serializes to zero bytes produces an empty file and loads
/// back through every strategy, the mapping one included (empty files are
/// never mapped).
#[test]
fn zero_byte_value_roundtrips() -> mapbin::Result<()> {
    #[derive(Describe, Default, Clone, PartialEq, Debug)]
    struct Nothing {}

    let dir = tempfile::tempdir()?;
    for save in SAVE_STRATEGIES {
        for load in LOAD_STRATEGIES {
            let path = dir.path().join(format!("empty-{save}-{load}.bin"));
            match *save {
                "copy" => mapbin::save_file_copy(&path, &mut Nothing {})?,
                "stream" => mapbin::save_file_stream(&path, &mut Nothing {})?,
                #[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
                "map" => mapbin::save_file_map(&path, &mut Nothing {})?,
                other => unreachable!("unknown save strategy {other}"),
            };
            assert_eq!(std::fs::metadata(&path)?.len(), 0);
            let _: (Nothing, Storage) = match *load {
                "copy" => mapbin::load_file_copy(&path)?,
                "stream" => mapbin::load_file_stream(&path)?,
                #[cfg(all(feature = "mmap", not(target_arch = "wasm32")))]
                "map" => mapbin::load_file_map(&path)?,
                other => unreachable!("unknown load strategy {other}"),
            };
        }
    }
    Ok(())
}

#[test]
fn missing_file_is_io_error() {
    let err = mapbin::load_file_copy::<Snapshot, _>("/nonexistent/mapbin-missing.bin").unwrap_err();
    assert!(matches!(err, mapbin::MapbinError::Io(_)));
}
