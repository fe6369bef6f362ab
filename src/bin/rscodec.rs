//! Command-line front end for the `rscodec` library: encode/decode byte
//! streams through [`rscodec::StringCodec`], or probe a candidate Galois
//! field polynomial for primitivity.

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rscodec::{gf::GaloisField, RsError, StringCodec};
use tracing::{debug, error, info};

#[derive(Parser)]
#[command(name = "rscodec", about = "Reed-Solomon error-and-erasure correction")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a file's bytes into an n-symbol-per-row Reed-Solomon stream.
    Encode {
        #[arg(long)]
        n: usize,
        #[arg(long)]
        k: usize,
        #[arg(long, default_value = "char")]
        variant: String,
        #[arg(long)]
        symsize: Option<u32>,
        /// Input path, or `-` for stdin.
        input: String,
        /// Output path, or `-` for stdout.
        output: String,
    },
    /// Decode an n-symbol-per-row Reed-Solomon stream back to its payload.
    Decode {
        #[arg(long)]
        n: usize,
        #[arg(long)]
        k: usize,
        #[arg(long, default_value = "char")]
        variant: String,
        #[arg(long)]
        symsize: Option<u32>,
        /// Comma-separated erasure positions within each row, e.g. `3,17`.
        #[arg(long, value_delimiter = ',')]
        erasures: Vec<usize>,
        input: String,
        output: String,
    },
    /// Check whether a polynomial generates the full multiplicative group
    /// of GF(2^symsize).
    Probe {
        #[arg(long)]
        symsize: u32,
        #[arg(long)]
        gfpoly: Option<u32>,
    },
}

fn read_input(path: &str) -> io::Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(path)
    }
}

fn write_output(path: &str, data: &[u8]) -> io::Result<()> {
    if path == "-" {
        io::stdout().write_all(data)
    } else {
        fs::write(path, data)
    }
}

fn run() -> Result<(), RsError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Encode {
            n,
            k,
            variant,
            symsize,
            input,
            output,
        } => {
            let codec = StringCodec::new(n, k, symsize, None, None, None, &variant)?;
            let data = read_input(&input).map_err(|e| RsError::config(e.to_string()))?;
            if data.len() % k != 0 {
                return Err(RsError::config(format!(
                    "input length {} is not a multiple of k={k}",
                    data.len()
                )));
            }
            let mut out = Vec::with_capacity(data.len() / k * n);
            for row in data.chunks(k) {
                out.extend(codec.encode(row)?);
            }
            info!(rows = data.len() / k, n, k, "encoded");
            write_output(&output, &out).map_err(|e| RsError::config(e.to_string()))
        }
        Command::Decode {
            n,
            k,
            variant,
            symsize,
            erasures,
            input,
            output,
        } => {
            let codec = StringCodec::new(n, k, symsize, None, None, None, &variant)?;
            let data = read_input(&input).map_err(|e| RsError::config(e.to_string()))?;
            if data.len() % n != 0 {
                return Err(RsError::config(format!(
                    "input length {} is not a multiple of n={n}",
                    data.len()
                )));
            }
            let mut out = Vec::with_capacity(data.len() / n * k);
            let mut all_corrections = Vec::new();
            for (row_idx, row) in data.chunks(n).enumerate() {
                let (decoded, corrections) = codec.decode(row, &erasures)?;
                if !corrections.is_empty() {
                    debug!(row = row_idx, ?corrections, "row corrected");
                }
                all_corrections.extend(corrections.into_iter().map(|pos| row_idx * n + pos));
                out.extend(decoded);
            }
            info!(
                rows = data.len() / n,
                total_corrections = all_corrections.len(),
                corrections = ?all_corrections,
                "decoded"
            );
            write_output(&output, &out).map_err(|e| RsError::config(e.to_string()))
        }
        Command::Probe { symsize, gfpoly } => {
            let gfpoly = gfpoly.unwrap_or(match symsize {
                8 => 0x187,
                _ => return Err(RsError::config("no default gfpoly for this symsize; pass --gfpoly")),
            });
            match GaloisField::new(symsize, gfpoly) {
                Ok(field) => {
                    info!(symsize, gfpoly = format!("{gfpoly:#x}"), nn = field.nn, "primitive");
                    println!("{gfpoly:#x} is primitive for GF(2^{symsize}); nn={}", field.nn);
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber_init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(%e, "rscodec failed");
            eprintln!("rscodec: {e}");
            ExitCode::FAILURE
        }
    }
}

fn tracing_subscriber_init() {
    // Respects RUST_LOG; defaults to warnings only so plain pipe usage stays
    // quiet. Ignored if a global subscriber is already set (e.g. in tests).
    let _ = tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .finish(),
    );
}
