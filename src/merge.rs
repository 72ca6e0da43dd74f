use crate::parser::TrackRow;

/// Collapse consecutive rows that are intervals of the same spin.
///
/// The fingerprinter reports one row per detection window, so a single play
/// arrives as a run of adjacent rows with identical artist/title/id/album.
/// Each run collapses to one row keeping the first row's start and the last
/// row's end. Grouping is adjacency-only: the input is already in show
/// order, and a track played again later in the show stays a separate row.
pub fn merge_consecutive(rows: Vec<TrackRow>) -> Vec<TrackRow> {
    let mut merged: Vec<TrackRow> = Vec::new();

    for row in rows {
        if let Some(open) = merged.last_mut() {
            if open.merge_key() == row.merge_key() {
                open.end = row.end;
                continue;
            }
        }
        merged.push(row);
    }

    merged
}
