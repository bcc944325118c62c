#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the rollcheck toolchain.
//!
//! `rollcheck check` matches a pasted identifier list against the table
//! reconstructed from an allotment/merit-list PDF; `rollcheck extract`
//! dumps the full reconstructed table. Running with no subcommand starts
//! an interactive menu.
//!
//! Uses `indicatif-log-bridge` (via [`rollcheck_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod interactive;
mod pipeline;

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rollcheck_export::ExportFormat;
use rollcheck_table_models::{
    DEFAULT_FIXED_HEADER_LINES, DEFAULT_KEYWORD_MIN_MATCHES, ExtraTokenPolicy, ExtractOptions,
    HeaderPolicy, IdentifierMode, RowStrategy,
};

#[derive(Parser)]
#[command(name = "rollcheck", about = "Check identifier lists against allotment/merit-list PDFs")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Header-detection policy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HeaderPolicyArg {
    /// First line with enough table-role keywords, split on 2+ spaces
    Keyword,
    /// First N lines verbatim, one field name per line
    FixedCount,
}

/// Row-reconstruction strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RowStrategyArg {
    /// Split each line on runs of 2+ whitespace characters
    DelimiterSplit,
    /// Consume N lines per record, one field per line
    FixedGrouping,
    /// Match rows by regex, carrying the rank onto continuation rows
    RegexAnchored,
}

/// Output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => Self::Csv,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Extraction flags shared by `check` and `extract`.
#[derive(Args)]
struct ExtractFlags {
    /// PDF file path or http(s) URL
    pdf: String,

    /// How to locate the header
    #[arg(long, value_enum, default_value_t = HeaderPolicyArg::Keyword)]
    header_policy: HeaderPolicyArg,

    /// Minimum keyword hits for a line to qualify as the header
    #[arg(long, default_value_t = DEFAULT_KEYWORD_MIN_MATCHES)]
    keyword_min_matches: usize,

    /// Number of leading lines forming the header under fixed-count policy
    #[arg(long, default_value_t = DEFAULT_FIXED_HEADER_LINES)]
    fixed_header_lines: usize,

    /// How to reconstruct data rows
    #[arg(long, value_enum, default_value_t = RowStrategyArg::DelimiterSplit)]
    row_strategy: RowStrategyArg,

    /// Regex matching a complete row (regex-anchored strategy)
    #[arg(long)]
    primary_pattern: Option<String>,

    /// Regex matching a row missing the leading rank (regex-anchored strategy)
    #[arg(long)]
    secondary_pattern: Option<String>,

    /// Merge surplus tokens into the last column instead of dropping them
    #[arg(long)]
    merge_extra_tokens: bool,

    /// Uppercase all cell values and field names for case-insensitive matching
    #[arg(long)]
    uppercase: bool,

    /// Comma-separated field names to coerce to numbers (e.g. "MARKS,RANK")
    #[arg(long)]
    numeric_fields: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
    format: FormatArg,

    /// Output file (defaults to matched.csv / extracted.csv per command)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ExtractFlags {
    /// Builds the extraction configuration, validating flag combinations.
    fn options(&self) -> Result<ExtractOptions, String> {
        let header_policy = match self.header_policy {
            HeaderPolicyArg::Keyword => HeaderPolicy::Keyword {
                min_matches: self.keyword_min_matches,
            },
            HeaderPolicyArg::FixedCount => HeaderPolicy::FixedCount {
                lines: self.fixed_header_lines,
            },
        };

        let row_strategy = match self.row_strategy {
            RowStrategyArg::DelimiterSplit => RowStrategy::DelimiterSplit {
                extra_tokens: if self.merge_extra_tokens {
                    ExtraTokenPolicy::MergeIntoLast
                } else {
                    ExtraTokenPolicy::Truncate
                },
            },
            RowStrategyArg::FixedGrouping => RowStrategy::FixedGrouping,
            RowStrategyArg::RegexAnchored => {
                let (Some(primary), Some(secondary)) =
                    (self.primary_pattern.clone(), self.secondary_pattern.clone())
                else {
                    return Err(
                        "--row-strategy regex-anchored requires --primary-pattern and --secondary-pattern"
                            .to_owned(),
                    );
                };
                RowStrategy::RegexAnchored { primary, secondary }
            }
        };

        let numeric_fields: BTreeSet<String> = self
            .numeric_fields
            .as_deref()
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Ok(ExtractOptions {
            header_policy,
            row_strategy,
            uppercase_cells: self.uppercase,
            uppercase_fields: self.uppercase,
            numeric_fields,
        })
    }

    fn output_or(&self, default_stem: &str) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let ext = match self.format {
                FormatArg::Csv => "csv",
                FormatArg::Json => "json",
            };
            PathBuf::from(format!("{default_stem}.{ext}"))
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Match an identifier list against the table reconstructed from a PDF
    Check {
        #[command(flatten)]
        flags: ExtractFlags,

        /// Identifier list file, one per line ("-" reads stdin)
        #[arg(long)]
        ids: String,

        /// How identifier fields are selected and compared
        #[arg(long, default_value_t = IdentifierMode::FirstMatch)]
        identifier_mode: IdentifierMode,
    },
    /// Reconstruct and dump the full table without matching
    Extract {
        #[command(flatten)]
        flags: ExtractFlags,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = rollcheck_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(&multi).await;
    };

    match command {
        Commands::Check {
            flags,
            ids,
            identifier_mode,
        } => {
            let options = flags.options()?;
            let output = flags.output_or("matched");
            pipeline::run_check(
                &multi,
                &flags.pdf,
                &ids,
                identifier_mode,
                &options,
                &output,
                flags.format.into(),
            )
            .await?;
        }
        Commands::Extract { flags } => {
            let options = flags.options()?;
            let output = flags.output_or("extracted");
            pipeline::run_extract(&multi, &flags.pdf, &options, &output, flags.format.into())
                .await?;
        }
    }

    Ok(())
}
