#![allow(clippy::module_name_repetitions)]

//! Interactive TUI for the rollcheck toolchain.
//!
//! Provides a menu-driven interface using `dialoguer` for running check
//! and extract commands without memorizing CLI flags.

use std::collections::BTreeSet;
use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};
use rollcheck_cli_utils::MultiProgress;
use rollcheck_export::ExportFormat;
use rollcheck_table_models::{
    DEFAULT_FIXED_HEADER_LINES, DEFAULT_KEYWORD_MIN_MATCHES, ExtraTokenPolicy, ExtractOptions,
    HeaderPolicy, IdentifierMode, RowStrategy,
};

use crate::pipeline;

/// Top-level actions available in the interactive menu.
enum CheckerAction {
    CheckList,
    ExtractTable,
}

impl CheckerAction {
    const ALL: &[Self] = &[Self::CheckList, Self::ExtractTable];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::CheckList => "Check an identifier list against a PDF",
            Self::ExtractTable => "Extract the full table from a PDF",
        }
    }
}

/// Runs the interactive menu loop, prompting the user to select and
/// configure an operation.
///
/// # Errors
///
/// Returns an error if a prompt is aborted or the selected operation
/// fails.
pub async fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = CheckerAction::ALL.iter().map(CheckerAction::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    let pdf: String = Input::new()
        .with_prompt("PDF path or URL")
        .interact_text()?;

    let options = prompt_options()?;
    let (format, extension) = prompt_format()?;

    match CheckerAction::ALL[idx] {
        CheckerAction::CheckList => {
            let ids: String = Input::new()
                .with_prompt("Identifier list file (one per line, '-' for stdin)")
                .interact_text()?;
            let mode = prompt_identifier_mode()?;
            let output: String = Input::new()
                .with_prompt("Output file")
                .default(format!("matched.{extension}"))
                .interact_text()?;
            pipeline::run_check(
                multi,
                &pdf,
                &ids,
                mode,
                &options,
                &PathBuf::from(output),
                format,
            )
            .await?;
        }
        CheckerAction::ExtractTable => {
            let output: String = Input::new()
                .with_prompt("Output file")
                .default(format!("extracted.{extension}"))
                .interact_text()?;
            pipeline::run_extract(multi, &pdf, &options, &PathBuf::from(output), format).await?;
        }
    }

    Ok(())
}

/// Prompts for the header policy, row strategy, and normalization options.
fn prompt_options() -> Result<ExtractOptions, Box<dyn std::error::Error>> {
    let header_idx = Select::new()
        .with_prompt("How are the column headers laid out?")
        .items(&[
            "A single keyword-bearing line, columns separated by 2+ spaces",
            "One field name per line at the top of the document",
        ])
        .default(0)
        .interact()?;

    let header_policy = if header_idx == 0 {
        let min_matches: usize = Input::new()
            .with_prompt("Minimum keyword hits for the header line")
            .default(DEFAULT_KEYWORD_MIN_MATCHES)
            .interact_text()?;
        HeaderPolicy::Keyword { min_matches }
    } else {
        let lines: usize = Input::new()
            .with_prompt("How many leading lines are field names?")
            .default(DEFAULT_FIXED_HEADER_LINES)
            .interact_text()?;
        HeaderPolicy::FixedCount { lines }
    };

    let strategy_idx = Select::new()
        .with_prompt("How are the data rows laid out?")
        .items(&[
            "Space-aligned columns (split on 2+ spaces)",
            "One field per line (grouped N at a time)",
            "Regex-anchored rows with a carried rank",
        ])
        .default(0)
        .interact()?;

    let row_strategy = match strategy_idx {
        0 => {
            let merge = Confirm::new()
                .with_prompt("Merge extra trailing tokens into the last column?")
                .default(false)
                .interact()?;
            RowStrategy::DelimiterSplit {
                extra_tokens: if merge {
                    ExtraTokenPolicy::MergeIntoLast
                } else {
                    ExtraTokenPolicy::Truncate
                },
            }
        }
        1 => RowStrategy::FixedGrouping,
        _ => {
            let primary: String = Input::new()
                .with_prompt("Regex for a complete row (one capture group per column)")
                .interact_text()?;
            let secondary: String = Input::new()
                .with_prompt("Regex for a row missing the leading rank")
                .interact_text()?;
            RowStrategy::RegexAnchored { primary, secondary }
        }
    };

    let uppercase = Confirm::new()
        .with_prompt("Uppercase all values for case-insensitive matching?")
        .default(false)
        .interact()?;

    let numeric: String = Input::new()
        .with_prompt("Numeric field names, comma-separated (empty for none)")
        .allow_empty(true)
        .interact_text()?;
    let numeric_fields: BTreeSet<String> = numeric
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_owned)
        .collect();

    Ok(ExtractOptions {
        header_policy,
        row_strategy,
        uppercase_cells: uppercase,
        uppercase_fields: uppercase,
        numeric_fields,
    })
}

/// Prompts for the identifier-matching mode.
fn prompt_identifier_mode() -> Result<IdentifierMode, Box<dyn std::error::Error>> {
    let idx = Select::new()
        .with_prompt("How should identifiers be matched?")
        .items(&[
            "First identifier-named column, exact equality",
            "Every identifier-named column, unioned",
            "Substring scan across all columns",
        ])
        .default(0)
        .interact()?;

    Ok(match idx {
        0 => IdentifierMode::FirstMatch,
        1 => IdentifierMode::Union,
        _ => IdentifierMode::SubstringAnywhere,
    })
}

/// Prompts for the output format.
fn prompt_format() -> Result<(ExportFormat, &'static str), Box<dyn std::error::Error>> {
    let idx = Select::new()
        .with_prompt("Output format")
        .items(&["CSV", "JSON"])
        .default(0)
        .interact()?;

    Ok(if idx == 0 {
        (ExportFormat::Csv, "csv")
    } else {
        (ExportFormat::Json, "json")
    })
}
