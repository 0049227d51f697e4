//! Filepath: src/report/console.rs
//! Per-file similarity tables for the terminal.

use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::core::rank::SimilarityResult;

#[derive(Tabled)]
struct SimilarityLine
{
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Similarity (%)")]
    similarity: String,
}

/// Green below 10%, yellow below 20%, red from there on.
fn paint(
    percent: f64,
    color: bool,
) -> String
{
    let text = format!("{percent:.2}");
    if !color
    {
        return text;
    }

    if percent < 10.0
    {
        text.green()
            .to_string()
    }
    else if percent < 20.0
    {
        text.yellow()
            .to_string()
    }
    else
    {
        text.red()
            .to_string()
    }
}

/// Render every source document's table, in corpus order.
pub fn render(
    result: &SimilarityResult,
    color: bool,
) -> String
{
    let mut out = String::new();

    for (source, row) in result.iter()
    {
        let header = format!("Code duplication probability for {source}");
        if color
        {
            out.push_str(
                &header
                    .bold()
                    .to_string(),
            );
        }
        else
        {
            out.push_str(&header);
        }
        out.push('\n');

        let lines = row
            .iter()
            .map(|(file, &percent)| SimilarityLine {
                file: file.clone(),
                similarity: paint(percent, color),
            });
        let mut table = Table::new(lines);
        table.with(Style::psql());

        out.push_str(&table.to_string());
        out.push_str("\n\n");
    }

    out
}
