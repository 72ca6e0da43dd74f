use thiserror::Error;

use crate::merge::merge_consecutive;
use crate::parser::{parse_tracklist, ParseError, TrackRow, EXPECTED_COLUMNS};
use crate::restrictions::{analyze, RestrictionList, RestrictionReport};

/// Cell values longer than this get hard-wrapped before tabulation.
const WRAP_TRIGGER: usize = 60;
/// Wrapped cells break into chunks of this many characters, narrower than
/// the trigger that starts the wrap.
const WRAP_WIDTH: usize = 50;

const NO_TRACKS: &str = "No tracks to display.";
const NO_RESTRICTIONS: &str = "No restrictions found.";
const MACRO_PREAMBLE: &str = "Our audio fingerprinter has detected that this show contains:";
const MACRO_CLEAN: &str =
    "Our audio fingerprinter has detected that this show contains: No restrictions.";

#[derive(Error, Debug)]
pub enum ReportError {
    /// Nothing was pasted. The presentation layer owns the prompt wording.
    #[error("tracklist input is empty")]
    EmptyInput,
    #[error(transparent)]
    Parse(#[from] ParseError),
}

fn merged_rows(raw: &str) -> Result<Vec<TrackRow>, ReportError> {
    if raw.trim().is_empty() {
        return Err(ReportError::EmptyInput);
    }
    Ok(merge_consecutive(parse_tracklist(raw)?))
}

/// Parse raw pasted text and render the merged tracklist table.
pub fn render_tracklist(raw: &str) -> Result<String, ReportError> {
    Ok(format_tracklist(&merged_rows(raw)?))
}

/// Parse raw pasted text and render the restriction-reason report.
pub fn render_restriction_reasons(raw: &str) -> Result<String, ReportError> {
    let rows = merged_rows(raw)?;
    Ok(format_restriction_reasons(&analyze(&rows)))
}

/// Parse raw pasted text and render the macro-info narrative.
pub fn render_macro_info(raw: &str) -> Result<String, ReportError> {
    let rows = merged_rows(raw)?;
    Ok(format_macro_info(&analyze(&rows)))
}

fn cells(row: &TrackRow) -> [&str; 6] {
    [
        &row.start,
        &row.end,
        &row.artists,
        &row.track_title,
        &row.id,
        &row.albums,
    ]
}

/// Hard-wrap an over-long cell into fixed-width chunks joined by newlines.
fn wrap_cell(value: &str) -> Vec<String> {
    if value.chars().count() <= WRAP_TRIGGER {
        return vec![value.to_string()];
    }
    value
        .chars()
        .collect::<Vec<char>>()
        .chunks(WRAP_WIDTH)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Render merged rows as a plain-text grid: header row, per-column dash
/// rule, left-aligned cells with a two-space gap. Wrapped cells expand a
/// row onto continuation lines.
pub fn format_tracklist(rows: &[TrackRow]) -> String {
    if rows.is_empty() {
        return NO_TRACKS.to_string();
    }

    // Wrap every cell up front; a table row is a list of cell-line lists.
    let table: Vec<Vec<Vec<String>>> = rows
        .iter()
        .map(|row| cells(row).iter().map(|v| wrap_cell(v)).collect())
        .collect();

    let mut widths: Vec<usize> = EXPECTED_COLUMNS
        .iter()
        .map(|h| h.chars().count())
        .collect();
    for row in &table {
        for (col, lines) in row.iter().enumerate() {
            for line in lines {
                widths[col] = widths[col].max(line.chars().count());
            }
        }
    }

    let mut out = String::new();
    push_line(
        &mut out,
        &widths,
        EXPECTED_COLUMNS.iter().map(|h| h.to_string()).collect(),
    );
    push_line(
        &mut out,
        &widths,
        widths.iter().map(|w| "-".repeat(*w)).collect(),
    );

    for row in &table {
        let height = row.iter().map(Vec::len).max().unwrap_or(1);
        for line_no in 0..height {
            let line: Vec<String> = row
                .iter()
                .map(|lines| lines.get(line_no).cloned().unwrap_or_default())
                .collect();
            push_line(&mut out, &widths, line);
        }
    }

    out
}

/// Append one physical table line: cells padded to column width, two-space
/// gap, trailing whitespace dropped.
fn push_line(out: &mut String, widths: &[usize], cells: Vec<String>) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Render the plain restriction-reason report: one labeled section per
/// non-empty rule, each key with its count and indented track titles.
pub fn format_restriction_reasons(report: &RestrictionReport) -> String {
    if !report.has_restrictions() {
        return NO_RESTRICTIONS.to_string();
    }

    let mut out = String::new();
    reason_section(&mut out, "Max Tracks By Artist", &report.exceeding_artists);
    reason_section(
        &mut out,
        "Max Consecutive Tracks By Artist",
        &report.consecutive_artists,
    );
    reason_section(&mut out, "Max Tracks From Album", &report.exceeding_albums);
    reason_section(
        &mut out,
        "Max Consecutive Tracks From Album",
        &report.consecutive_albums,
    );
    out
}

fn reason_section(out: &mut String, label: &str, entries: &RestrictionList) {
    if entries.is_empty() {
        return;
    }
    out.push_str(label);
    out.push_str(":\n");
    for (name, record) in entries {
        out.push_str(&format!("{name}: {} tracks\n", record.count));
        for track in &record.tracks {
            out.push_str(&format!("\t- {track}\n"));
        }
    }
    out.push('\n');
}

/// Render the macro-info narrative: the fingerprinter preamble, then each
/// violated rule as a prose paragraph listing the offending tracks.
pub fn format_macro_info(report: &RestrictionReport) -> String {
    if !report.has_restrictions() {
        return MACRO_CLEAN.to_string();
    }

    let mut out = String::new();
    out.push_str(MACRO_PREAMBLE);
    out.push_str("\n\n");

    macro_section(
        &mut out,
        &report.exceeding_artists,
        |count, name| format!("{count} tracks by {name}"),
        "This exceeds the limit set for the number of total tracks by one recording artist.",
    );
    macro_section(
        &mut out,
        &report.consecutive_artists,
        |count, name| format!("{count} consecutive tracks by {name}"),
        "This exceeds the limit set for the number of consecutive tracks by one recording artist.",
    );
    macro_section(
        &mut out,
        &report.exceeding_albums,
        |count, name| format!("{count} tracks from the album \"{name}\""),
        "This exceeds the limit set for the number of total tracks from the same album.",
    );
    macro_section(
        &mut out,
        &report.consecutive_albums,
        |count, name| format!("{count} consecutive tracks from the album \"{name}\""),
        "This exceeds the limit set for the number of consecutive tracks from the same album.",
    );
    out
}

fn macro_section(
    out: &mut String,
    entries: &RestrictionList,
    headline: impl Fn(usize, &str) -> String,
    closing: &str,
) {
    if entries.is_empty() {
        return;
    }
    for (name, record) in entries {
        out.push_str(&format!("\t\t- {}:\n", headline(record.count, name)));
        for track in &record.tracks {
            out.push_str(&format!("\t\t\t\t- {track}\n"));
        }
    }
    out.push_str(&format!("\t\t{closing}\n\n"));
}
