// src/cli.rs
use std::{env, path::PathBuf};

use crate::config::options::{
    Action, AppOptions, ClassSelector, ExportFormat, ExportType, Source,
};
use crate::{csv, data, file, scrape};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut options = AppOptions::default();
    parse_cli(&mut options)?;

    let model = scrape::collect_results(&options)?;

    match options.action {
        Action::ListClasses => {
            for row in data::class_summary_rows(&model) {
                println!("{}", row.join(","));
            }
        }
        Action::Export => {
            let headers = Some(data::standings_headers());
            let rows = data::standings_rows(&model, &options.scrape.class);

            if options.export.to_stdout {
                print!(
                    "{}",
                    csv::to_export_string(
                        &headers,
                        &rows,
                        options.export.include_headers,
                        options.export.delim(),
                    )
                );
                return Ok(());
            }

            match options.export.export_type {
                ExportType::SingleFile => {
                    let path = file::write_export_single(&options.export, &headers, &rows)?;
                    println!("Wrote {}", path.display());
                }
                ExportType::PerClass => {
                    for path in file::write_export_per_class(&options.export, &headers, &rows)? {
                        println!("Wrote {}", path.display());
                    }
                }
            }
        }
    }
    Ok(())
}

fn parse_cli(options: &mut AppOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str()
        {
            "--file" | "-f" => {
                let v = args.next().ok_or("Missing path for --file")?;
                options.scrape.source = Source::File(PathBuf::from(v));}
            "--cached" => options.scrape.source = Source::Cached,
            "--page" => options.scrape.page = args.next().ok_or("Missing value for --page")?,
            "--class" | "-c" => {
                let v = args.next().ok_or("Missing class code")?;
                options.scrape.class = ClassSelector::One(v.to_ascii_lowercase());}
            "--list-classes" => options.action = Action::ListClasses,
            "-o" | "--out" => {
                let v = args.next().ok_or("Missing output path")?;
                options.export.set_path(&v);}
            "--format" => {
                let v = args.next().ok_or("Missing value for --format")?;
                options.export.format = match v.to_ascii_lowercase().as_str() {
                    "csv" => ExportFormat::Csv,
                    "tsv" => ExportFormat::Tsv,
                    other => return Err(format!("Unknown format: {}", other).into()),
                };}
            "--include-headers" => options.export.include_headers = true,
            "--per-class" => options.export.export_type = ExportType::PerClass,
            "--stdout" => options.export.to_stdout = true,
            "-h" | "--help" => {
                eprintln!(include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown arg: {}", a).into()),
        }
    }

    Ok(())
}
