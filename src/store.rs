// src/store.rs
// Snapshot cache for the most recently fetched results page. One page,
// one file; every live scrape refreshes it, `--cached` replays it.

use std::{fs, io, path::PathBuf};

use crate::config::consts::{SNAPSHOT_FILE, STORE_DIR};

fn snapshot_path() -> PathBuf {
    PathBuf::from(STORE_DIR).join(SNAPSHOT_FILE)
}

pub fn save_snapshot(html: &str) -> io::Result<PathBuf> {
    let path = snapshot_path();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&path, html)?;
    Ok(path)
}

pub fn load_snapshot() -> Option<String> {
    fs::read_to_string(snapshot_path()).ok()
}
