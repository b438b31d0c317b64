// [libs/domain/reducer/src/archive.rs]
//! Compresses a consumed warm file into cold/ and deletes the original.
//! The Reducer is the sole writer into cold (the Rotating Log never
//! touches this tier).

use crate::errors::ReduceError;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn archive_warm_file(warm_path: &Path, cold_dir: &Path) -> Result<PathBuf, ReduceError> {
    let bytes = fs::read(warm_path)?;
    let filename = format!("{}.gz", warm_path.file_name().expect("warm file has a name").to_string_lossy());
    let cold_path = cold_dir.join(filename);

    let cold_file = File::create(&cold_path)?;
    let mut encoder = GzEncoder::new(cold_file, Compression::default());
    encoder.write_all(&bytes)?;
    encoder.finish()?;

    fs::remove_file(warm_path)?;
    Ok(cold_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn archive_compresses_and_removes_the_warm_file() {
        let dir = tempdir().unwrap();
        let warm_dir = dir.path().join("warm");
        let cold_dir = dir.path().join("cold");
        fs::create_dir_all(&warm_dir).unwrap();
        fs::create_dir_all(&cold_dir).unwrap();

        let warm_path = warm_dir.join("raw_matches_test.jsonl");
        fs::write(&warm_path, b"{\"a\":1}\n").unwrap();

        let cold_path = archive_warm_file(&warm_path, &cold_dir).unwrap();
        assert!(!warm_path.exists());
        assert!(cold_path.exists());

        let mut decoder = flate2::read::GzDecoder::new(File::open(&cold_path).unwrap());
        let mut decompressed = String::new();
        decoder.read_to_string(&mut decompressed).unwrap();
        assert_eq!(decompressed, "{\"a\":1}\n");
    }
}
