//! jackc CLI: compile a `.jack` file, or every `.jack` file in a directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

fn print_usage() {
    eprintln!("jackc - Jack to VM compiler");
    eprintln!();
    eprintln!("Usage: jackc <file.jack | directory>");
    eprintln!();
    eprintln!("Each input file compiles to a .vm file next to it. For a");
    eprintln!("directory, every .jack entry directly inside it is compiled;");
    eprintln!("subdirectories are not descended into.");
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        return;
    }
    if args.len() != 1 {
        print_usage();
        process::exit(64);
    }

    let path = Path::new(&args[0]);
    let files = match collect_inputs(path) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: {}: {}", path.display(), e);
            process::exit(64);
        }
    };

    if files.is_empty() {
        println!("No .jack files found in {}", path.display());
        return;
    }

    let mut failed = 0;
    for file in &files {
        eprintln!("compiling {}", file.display());
        if let Err(e) = jackc::compile_file(file) {
            eprintln!("{}: {}", file.display(), e);
            failed += 1;
        }
    }

    if failed > 0 {
        process::exit(70);
    }
}

/// Resolve the argument to the list of files to compile. A directory yields
/// its immediate `.jack` entries in name order.
fn collect_inputs(path: &Path) -> Result<Vec<PathBuf>, String> {
    if path.is_dir() {
        let entries = fs::read_dir(path).map_err(|e| e.to_string())?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| e.to_string())?;
            let candidate = entry.path();
            if candidate.is_file() && has_jack_extension(&candidate) {
                files.push(candidate);
            }
        }
        files.sort();
        Ok(files)
    } else if path.is_file() {
        if has_jack_extension(path) {
            Ok(vec![path.to_path_buf()])
        } else {
            Err("expected a .jack file".to_string())
        }
    } else {
        Err("no such file or directory".to_string())
    }
}

fn has_jack_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("jack")
}
