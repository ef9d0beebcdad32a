use std::path::{Path, PathBuf};
use std::process;

use hullsmith_catalog::{builtin_catalog, load_catalog};
use hullsmith_inspect::report;
use hullsmith_persist::format::SegmentConfig;
use hullsmith_persist::load::{load_region, load_region_par};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut region_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut catalog_paths: Vec<PathBuf> = Vec::new();
    let mut output_path: Option<PathBuf> = None;
    let mut parallel = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config_path = Some(PathBuf::from(required(&args, i, "--config")));
            }
            "--catalog" => {
                i += 1;
                catalog_paths.push(PathBuf::from(required(&args, i, "--catalog")));
            }
            "--output" => {
                i += 1;
                output_path = Some(PathBuf::from(required(&args, i, "--output")));
            }
            "--parallel" => parallel = true,
            "--help" | "-h" => {
                eprintln!("Usage: hullsmith-inspect [OPTIONS] <region-file>");
                eprintln!("  --config <path>    Segment layout as RON (default: side 32, version byte)");
                eprintln!("  --catalog <path>   Block catalog RON; repeatable (default: built-in)");
                eprintln!("  --output <path>    Write the summary as JSON");
                eprintln!("  --parallel         Decode segments on all cores");
                process::exit(0);
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
            other => region_path = Some(PathBuf::from(other)),
        }
        i += 1;
    }

    let Some(region_path) = region_path else {
        eprintln!("Missing region file. See --help.");
        process::exit(1);
    };

    let config = match config_path {
        Some(path) => {
            let text = read_text(&path);
            match ron::Options::default().from_str::<SegmentConfig>(&text) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Invalid segment config {}: {}", path.display(), e);
                    process::exit(1);
                }
            }
        }
        None => SegmentConfig::default(),
    };
    if let Err(e) = config.validate() {
        eprintln!("Invalid segment config: {}", e);
        process::exit(1);
    }

    let catalog = if catalog_paths.is_empty() {
        builtin_catalog()
    } else {
        let sources: Vec<String> = catalog_paths.iter().map(|p| read_text(p)).collect();
        let refs: Vec<&str> = sources.iter().map(String::as_str).collect();
        load_catalog(&refs)
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Failed to load block catalog: {}", e);
            process::exit(1);
        }
    };
    log::info!("Block catalog: {} definitions", catalog.len());

    let bytes = match std::fs::read(&region_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Cannot read {}: {}", region_path.display(), e);
            process::exit(1);
        }
    };
    log::info!(
        "Decoding {} ({} bytes, side length {})",
        region_path.display(),
        bytes.len(),
        config.side_length
    );

    let loaded = if parallel {
        load_region_par(&bytes, &config)
    } else {
        load_region(&bytes, &config)
    };
    let data = match loaded {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Cannot decode {}: {}", region_path.display(), e);
            process::exit(1);
        }
    };
    let summary = report::summarize(&data, &catalog);

    println!("\n## {}\n", region_path.display());
    println!("{}", report::format_markdown(&summary));

    if let Some(ref path) = output_path {
        if let Err(e) = report::save_summary(path, &summary) {
            eprintln!("Failed to write {}: {}", path.display(), e);
            process::exit(1);
        }
        log::info!("Saved summary to {}", path.display());
    }

    if !summary.failures.is_empty() {
        log::warn!("{} record(s) failed to decode", summary.failures.len());
        process::exit(2);
    }
}

fn required<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("{} needs a value", flag);
            process::exit(1);
        }
    }
}

fn read_text(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Cannot read {}: {}", path.display(), e);
            process::exit(1);
        }
    }
}
