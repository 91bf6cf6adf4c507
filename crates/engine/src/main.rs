//! tsd CLI - headless entry point for the timestomp correlation pipeline
//!
//! Usage:
//!   tsd --outdir <dir>            correlate the four extracted CSVs in <dir>
//!                                 and write <dir>/merged_output.csv
//!   tsd --outdir <dir> --rescore  re-run only the scoring pass against an
//!                                 existing <dir>/merged_output.csv
//!
//! The upstream extractors (MFTECmd, AppCompatCacheParser, AmcacheParser,
//! Velociraptor $I30 collection) are expected to have fully written their
//! CSVs into <dir> before this runs.

use std::path::PathBuf;
use tsd_engine::logging::init_logging;
use tsd_engine::pipeline::{rescore, run, SourcePaths};

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    let mut outdir: Option<PathBuf> = None;
    let mut do_rescore = false;

    // Simple arg parsing (no external deps)
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--outdir" | "-o" => {
                i += 1;
                if i < args.len() {
                    outdir = Some(PathBuf::from(&args[i]));
                }
            }
            "--rescore" => {
                do_rescore = true;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let outdir = match outdir {
        Some(dir) => dir,
        None => {
            eprintln!("Error: --outdir <dir> is required");
            print_usage();
            std::process::exit(1);
        }
    };
    if !outdir.is_dir() {
        eprintln!("Error: output directory not found: {}", outdir.display());
        std::process::exit(1);
    }

    let paths = SourcePaths::conventional(&outdir);
    let result = if do_rescore {
        rescore(&paths.output)
    } else {
        run(&paths)
    };

    match result {
        Ok(summary) => {
            println!("✓ Correlation complete");
            println!("  output:        {}", summary.output_path);
            println!("  distinct keys: {}", summary.distinct_keys);
            for (source, rows) in &summary.source_rows {
                println!("  {:<13} {} rows", format!("{}:", source), rows);
            }
            for (source, rows) in &summary.unkeyable_rows {
                println!("  {:<13} {} unkeyable rows excluded", format!("{}:", source), rows);
            }
            for (indicator, rows) in &summary.indicator_true_counts {
                if *rows > 0 {
                    println!("  ⚠ {} true for {} file(s)", indicator, rows);
                }
            }
        }
        Err(e) => {
            eprintln!("✗ Run aborted: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: tsd --outdir <dir> [--rescore]");
    eprintln!();
    eprintln!("Expects in <dir>:");
    eprintln!("  extracted_mft_info.csv");
    eprintln!("  extracted_appcompat_info.csv");
    eprintln!("  amcache_combined_extracted.csv");
    eprintln!("  consolidated_i30_data.csv");
    eprintln!();
    eprintln!("Writes <dir>/merged_output.csv");
}
