use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use nw_aligner::fasta::{count_records, read_single_record};
use nw_aligner::{
    Aligner, AlignmentMode, EndGaps, ScoringConfig, SequenceCount, ValidationLevel, DNA_GAP_EXT,
    DNA_GAP_OPEN, DNA_MATCH, DNA_MISMATCH,
};

#[derive(Parser)]
#[command(name = "nw-align")]
#[command(version)]
#[command(about = "Global alignment of nucleotide sequences with affine gaps", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Align two single-record FASTA files
    Align(AlignArgs),

    /// Count the records in a FASTA file
    Count {
        fasta: PathBuf,
    },
}

#[derive(Args, Debug)]
struct AlignArgs {
    seq1: PathBuf,
    seq2: PathBuf,
    #[arg(long, default_value_t = DNA_MATCH, allow_hyphen_values = true)]
    match_score: f64,
    #[arg(long, default_value_t = DNA_MISMATCH, allow_hyphen_values = true)]
    mismatch_score: f64,
    #[arg(long, default_value_t = DNA_GAP_OPEN, allow_hyphen_values = true)]
    gap_open: f64,
    #[arg(long, default_value_t = DNA_GAP_EXT, allow_hyphen_values = true)]
    gap_extend: f64,
    /// Charge leading and trailing gaps like interior ones
    #[arg(long)]
    penalize_end_gaps: bool,
    /// Use the exact three-state fill instead of the greedy one
    #[arg(long)]
    optimal: bool,
    /// How much of each input is checked for non-ACGT symbols
    #[arg(long, value_enum, default_value_t = Validation::Min)]
    validation: Validation,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Validation {
    /// First 50 positions
    Min,
    /// Whole sequence
    Max,
}

impl From<Validation> for ValidationLevel {
    fn from(value: Validation) -> Self {
        match value {
            Validation::Min => ValidationLevel::Min,
            Validation::Max => ValidationLevel::Max,
        }
    }
}

impl AlignArgs {
    fn scoring(&self) -> ScoringConfig {
        ScoringConfig::default()
            .with_match_score(self.match_score)
            .with_mismatch_score(self.mismatch_score)
            .with_gap_open_penalty(self.gap_open)
            .with_gap_extend_penalty(self.gap_extend)
            .with_end_gaps(if self.penalize_end_gaps {
                EndGaps::Penalized
            } else {
                EndGaps::Free
            })
            .with_mode(if self.optimal {
                AlignmentMode::Optimal
            } else {
                AlignmentMode::Greedy
            })
    }
}

fn run_align(args: AlignArgs) -> Result<()> {
    let level = args.validation.into();
    let first = read_single_record(&args.seq1, level)
        .with_context(|| format!("failed to read {}", args.seq1.display()))?;
    let second = read_single_record(&args.seq2, level)
        .with_context(|| format!("failed to read {}", args.seq2.display()))?;
    info!("aligning {:?} against {:?}", first.header, second.header);

    let result = Aligner::new(args.scoring())
        .align(&first.sequence, &second.sequence)
        .context("alignment failed")?;
    println!("{}", result);
    Ok(())
}

fn run_count(path: PathBuf) -> Result<()> {
    let file = File::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
    let count = count_records(file)
        .with_context(|| format!("failed to read {}", path.display()))?;
    println!("{}", SequenceCount(count));
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Align(args) => run_align(args),
        Commands::Count { fasta } => run_count(fasta),
    }
}
