// src/file.rs

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::config::options::ExportOptions;
use crate::csv::to_export_string;
use crate::data::STANDINGS_CLASS_COL;

/// Write a single export file based on ExportOptions (path, headers
/// policy, delimiter). Returns the final path written to.
pub fn write_export_single(
    export: &ExportOptions,
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = export.out_path();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let contents = to_export_string(headers, rows, export.include_headers, export.delim());
    fs::write(&path, contents)?;
    Ok(path)
}

/// Write one file per class into the directory implied by
/// `export.out_path()` (a directory when `export_type == PerClass`).
/// Rows are grouped on the standings class column.
pub fn write_export_per_class(
    export: &ExportOptions,
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let outdir = export.out_path();
    ensure_directory(&outdir)?;

    let mut by_class: Vec<(String, Vec<Vec<String>>)> = Vec::new();
    for r in rows {
        let Some(class) = r.get(STANDINGS_CLASS_COL) else { continue };
        match by_class.iter_mut().find(|(c, _)| c == class) {
            Some((_, group)) => group.push(r.clone()),
            None => by_class.push((class.clone(), vec![r.clone()])),
        }
    }

    // Dedup stems and write each file
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut written = Vec::with_capacity(by_class.len());
    let ext = export.format.ext();

    for (class, class_rows) in by_class {
        let stem = sanitize_class_filename(&class);
        let path = resolve_export_filename(&outdir, &stem, &mut seen, ext);

        let contents = to_export_string(headers, &class_rows, export.include_headers, export.delim());
        fs::write(&path, contents)?;
        written.push(path);
    }

    Ok(written)
}

pub fn ensure_directory(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if dir.exists() && !dir.is_dir() {
        return Err(format!("Path exists but is not a directory: {}", dir.display()).into());
    }
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Class codes are short and mostly alphanumeric already; anything else
/// collapses to underscores so the stem stays filesystem-safe.
pub fn sanitize_class_filename(class: &str) -> String {
    let mut out = String::with_capacity(class.len());
    let mut last_us = false;
    for ch in class.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            last_us = false;
        } else if !last_us {
            out.push('_');
            last_us = true;
        }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { s!("class") } else { out }
}

/// Duplicate handling **only within this run**
pub fn resolve_export_filename(
    dir: &Path,
    stem: &str,                        // already sanitized, no extension
    seen_names: &mut HashMap<String, usize>,
    ext: &str,                         // "csv" | "tsv"
) -> PathBuf {
    let count = seen_names.entry(stem.to_string()).or_insert(0);

    // First occurrence: "<stem>.ext"
    // Subsequent:       "<stem> (N).ext" with N starting at 2
    let filename = if *count == 0 {
        format!("{stem}.{ext}")
    } else {
        format!("{stem} ({}).{ext}", *count + 1)
    };

    *count += 1;
    dir.join(filename)
}
