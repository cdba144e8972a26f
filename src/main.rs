use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use clap_derive::Parser;
use log::{error, info};

use disasm8086::{add_spacing, disassemble};

#[derive(Parser, Debug)]
#[command(name = "disasm8086", about = "Intel 8086 disassembler")]
struct CLI {
    /// Path to the assembled binary (e.g. listing_0037)
    input: PathBuf,
    /// Directory the listing is written to as <input stem>.asm
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,
    /// Do not separate runs of the same mnemonic with blank lines
    #[arg(long)]
    no_spacing: bool,
    /// Do not echo the listing to stdout
    #[arg(long)]
    quiet: bool,
}

/// `out/listing_0037.asm` for `some/dir/listing_0037` or `listing_0037.bin`.
fn output_path(out_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("listing"));
    out_dir.join(format!("{}.asm", stem))
}

fn main() -> ExitCode {
    env_logger::init();
    let args = CLI::parse();

    println!("-> {:?}", args.input);
    let bytes = match fs::read(&args.input) {
        Ok(bytes) => bytes,
        Err(err) => {
            error!("Failed to read {}: {}", args.input.display(), err);
            return ExitCode::FAILURE;
        }
    };
    info!("Decoding {} byte(s) from {}", bytes.len(), args.input.display());

    let disassembly = disassemble(&bytes);
    let listing = if args.no_spacing {
        disassembly.text()
    } else {
        add_spacing(&disassembly.text())
    };

    if let Err(err) = fs::create_dir_all(&args.out_dir) {
        error!("Failed to create {}: {}", args.out_dir.display(), err);
        return ExitCode::FAILURE;
    }
    let path = output_path(&args.out_dir, &args.input);
    if let Err(err) = fs::write(&path, &listing) {
        error!("Failed to write {}: {}", path.display(), err);
        return ExitCode::FAILURE;
    }

    if !args.quiet {
        println!("------------------");
        print!("{}", listing);
        println!("------------------");
    }
    println!("Output written to -> {}", path.display());

    match disassembly.error {
        Some(err) => {
            eprintln!("Decoding stopped early: {}", err);
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}
