use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "ean-batch")]
#[command(about = "Generate unique EAN-13 barcodes and export them as PNG labels")]
pub struct CliArgs {
    /// Prefix of 0-8 digits (e.g. a GS1 company prefix)
    #[arg(short, long, default_value = "")]
    pub prefix: String,

    /// Number of barcodes to generate (1-50)
    #[arg(short, long, default_value = "1")]
    pub count: String,

    /// Product name for each barcode, in order (repeatable)
    #[arg(short, long = "name")]
    pub names: Vec<String>,

    /// Barcodes to export, 1-based (default: all)
    #[arg(short, long, value_delimiter = ',')]
    pub select: Vec<usize>,

    /// Path to TOML configuration file
    #[arg(long)]
    pub config: Option<String>,

    /// Output directory, overrides [export].output_path
    #[arg(short, long)]
    pub output_path: Option<String>,

    /// How to print the generated codes
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Only generate and list the codes, write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Log time and memory per phase
    #[arg(long)]
    pub monitor: bool,
}
