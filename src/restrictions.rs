use crate::parser::TrackRow;

/// An artist reaching this many tracks across the show is flagged.
pub const ARTIST_TOTAL_LIMIT: usize = 5;
/// An album reaching this many tracks across the show is flagged.
pub const ALBUM_TOTAL_LIMIT: usize = 4;
/// An artist run is flagged when strictly longer than this.
pub const ARTIST_RUN_LIMIT: usize = 3;
/// An album run is flagged when strictly longer than this.
pub const ALBUM_RUN_LIMIT: usize = 2;

/// Which row field an aggregation keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionKey {
    Artist,
    Album,
}

impl RestrictionKey {
    fn field(self, row: &TrackRow) -> &str {
        match self {
            Self::Artist => &row.artists,
            Self::Album => &row.albums,
        }
    }
}

/// A flagged artist or album: how many tracks, and which ones, in show order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionRecord {
    pub count: usize,
    pub tracks: Vec<String>,
}

/// Restriction results keyed by artist or album name.
///
/// A plain vec of pairs keeps first-seen iteration order, which the report
/// text depends on. Shows hold at most a few dozen distinct names, so the
/// linear key lookups cost nothing.
pub type RestrictionList = Vec<(String, RestrictionRecord)>;

/// Replace the record for `key` in place, or append it. A replaced key keeps
/// its original position in the list.
fn upsert(list: &mut RestrictionList, key: String, record: RestrictionRecord) {
    match list.iter().position(|(k, _)| *k == key) {
        Some(i) => list[i].1 = record,
        None => list.push((key, record)),
    }
}

/// Group track titles by artist or album, preserving first-seen order of the
/// keys and show chronology within each key's list.
pub fn track_totals(rows: &[TrackRow], key: RestrictionKey) -> Vec<(String, Vec<String>)> {
    let mut totals: Vec<(String, Vec<String>)> = Vec::new();

    for row in rows {
        let name = key.field(row);
        match totals.iter().position(|(k, _)| k == name) {
            Some(i) => totals[i].1.push(row.track_title.clone()),
            None => totals.push((name.to_string(), vec![row.track_title.clone()])),
        }
    }

    totals
}

/// Keep only the keys whose total track count reaches `limit`.
pub fn exceeding(totals: &[(String, Vec<String>)], limit: usize) -> RestrictionList {
    totals
        .iter()
        .filter(|(_, tracks)| tracks.len() >= limit)
        .map(|(name, tracks)| {
            (
                name.clone(),
                RestrictionRecord {
                    count: tracks.len(),
                    tracks: tracks.clone(),
                },
            )
        })
        .collect()
}

/// Find consecutive runs of one artist or album longer than `limit`.
///
/// A run is only evaluated when a row with a different key closes it, so the
/// run still open at the last row is never recorded. When one key produces
/// several qualifying runs, the later record replaces the earlier one at the
/// key's original position: only the last qualifying run per key is kept.
pub fn consecutive_runs(rows: &[TrackRow], key: RestrictionKey, limit: usize) -> RestrictionList {
    let mut runs: RestrictionList = Vec::new();
    let mut current_key: Option<String> = None;
    let mut current_tracks: Vec<String> = Vec::new();

    for row in rows {
        let name = key.field(row);
        if current_key.as_deref() == Some(name) {
            current_tracks.push(row.track_title.clone());
        } else {
            if let Some(closed) = current_key.take() {
                if current_tracks.len() > limit {
                    let record = RestrictionRecord {
                        count: current_tracks.len(),
                        tracks: std::mem::take(&mut current_tracks),
                    };
                    upsert(&mut runs, closed, record);
                }
            }
            current_key = Some(name.to_string());
            current_tracks = vec![row.track_title.clone()];
        }
    }

    runs
}

/// The four restriction result sets for one show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionReport {
    pub exceeding_artists: RestrictionList,
    pub consecutive_artists: RestrictionList,
    pub exceeding_albums: RestrictionList,
    pub consecutive_albums: RestrictionList,
}

impl RestrictionReport {
    pub fn has_restrictions(&self) -> bool {
        !self.exceeding_artists.is_empty()
            || !self.consecutive_artists.is_empty()
            || !self.exceeding_albums.is_empty()
            || !self.consecutive_albums.is_empty()
    }
}

/// Evaluate a merged tracklist against all four restriction rules.
pub fn analyze(rows: &[TrackRow]) -> RestrictionReport {
    let artist_totals = track_totals(rows, RestrictionKey::Artist);
    let album_totals = track_totals(rows, RestrictionKey::Album);

    RestrictionReport {
        exceeding_artists: exceeding(&artist_totals, ARTIST_TOTAL_LIMIT),
        consecutive_artists: consecutive_runs(rows, RestrictionKey::Artist, ARTIST_RUN_LIMIT),
        exceeding_albums: exceeding(&album_totals, ALBUM_TOTAL_LIMIT),
        consecutive_albums: consecutive_runs(rows, RestrictionKey::Album, ALBUM_RUN_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(artist: &str, title: &str, album: &str) -> TrackRow {
        TrackRow {
            start: "00:00:00".to_string(),
            end: "00:00:30".to_string(),
            artists: artist.to_string(),
            track_title: title.to_string(),
            id: "1".to_string(),
            albums: album.to_string(),
        }
    }

    /// `n` rows by one artist, distinct titles, distinct albums.
    fn run_of(artist: &str, n: usize) -> Vec<TrackRow> {
        (0..n)
            .map(|i| row(artist, &format!("{artist} song {i}"), &format!("{artist} album {i}")))
            .collect()
    }

    #[test]
    fn test_totals_preserve_first_seen_order() {
        let rows = vec![
            row("B", "t1", "Y"),
            row("A", "t2", "X"),
            row("B", "t3", "Y"),
        ];

        let totals = track_totals(&rows, RestrictionKey::Artist);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].0, "B");
        assert_eq!(totals[0].1, vec!["t1", "t3"]);
        assert_eq!(totals[1].0, "A");
    }

    #[test]
    fn test_artist_total_flagged_at_five() {
        let mut rows = run_of("A", 5);
        rows.extend(run_of("B", 2));

        let report = analyze(&rows);
        assert_eq!(report.exceeding_artists.len(), 1);
        let (name, record) = &report.exceeding_artists[0];
        assert_eq!(name, "A");
        assert_eq!(record.count, 5);
        assert_eq!(record.tracks.len(), 5);
    }

    #[test]
    fn test_artist_total_of_four_not_flagged() {
        let rows = run_of("A", 4);
        let report = analyze(&rows);
        assert!(report.exceeding_artists.is_empty());
    }

    #[test]
    fn test_album_total_flagged_at_four() {
        let rows: Vec<TrackRow> = (0..4).map(|i| {
            // Alternate artists so only the album rule can trip
            row(if i % 2 == 0 { "A" } else { "B" }, &format!("t{i}"), "X")
        })
        .collect();

        let report = analyze(&rows);
        assert!(report.exceeding_artists.is_empty());
        assert_eq!(report.exceeding_albums.len(), 1);
        assert_eq!(report.exceeding_albums[0].0, "X");
        assert_eq!(report.exceeding_albums[0].1.count, 4);
    }

    #[test]
    fn test_album_total_of_three_not_flagged() {
        let rows: Vec<TrackRow> = (0..3).map(|i| row("A", &format!("t{i}"), "X")).collect();
        let report = analyze(&rows);
        assert!(report.exceeding_albums.is_empty());
    }

    #[test]
    fn test_artist_run_of_four_flagged() {
        let mut rows = run_of("A", 4);
        rows.push(row("B", "closer", "Y"));

        let runs = consecutive_runs(&rows, RestrictionKey::Artist, ARTIST_RUN_LIMIT);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].0, "A");
        assert_eq!(runs[0].1.count, 4);
        assert_eq!(runs[0].1.tracks[0], "A song 0");
    }

    #[test]
    fn test_artist_run_of_three_not_flagged() {
        let mut rows = run_of("A", 3);
        rows.push(row("B", "closer", "Y"));

        let runs = consecutive_runs(&rows, RestrictionKey::Artist, ARTIST_RUN_LIMIT);
        assert!(runs.is_empty());
    }

    #[test]
    fn test_album_run_of_three_flagged() {
        let mut rows: Vec<TrackRow> = (0..3)
            .map(|i| row(&format!("artist {i}"), &format!("t{i}"), "X"))
            .collect();
        rows.push(row("Z", "closer", "Y"));

        let runs = consecutive_runs(&rows, RestrictionKey::Album, ALBUM_RUN_LIMIT);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].0, "X");
        assert_eq!(runs[0].1.count, 3);
    }

    #[test]
    fn test_trailing_open_run_is_dropped() {
        // A qualifying run that ends on the last row is never evaluated
        let rows = run_of("A", 6);
        let runs = consecutive_runs(&rows, RestrictionKey::Artist, ARTIST_RUN_LIMIT);
        assert!(runs.is_empty());
    }

    #[test]
    fn test_last_qualifying_run_wins_and_keeps_position() {
        let mut rows = run_of("A", 4);
        rows.extend(run_of("B", 4));
        rows.extend(run_of("A", 5));
        rows.push(row("C", "closer", "Y"));

        let runs = consecutive_runs(&rows, RestrictionKey::Artist, ARTIST_RUN_LIMIT);
        assert_eq!(runs.len(), 2);
        // A was seen first and stays first even though its record was replaced
        assert_eq!(runs[0].0, "A");
        assert_eq!(runs[0].1.count, 5);
        assert_eq!(runs[0].1.tracks[0], "A song 0");
        assert_eq!(runs[1].0, "B");
        assert_eq!(runs[1].1.count, 4);
    }

    #[test]
    fn test_interleaved_rows_never_form_a_run() {
        let rows = vec![
            row("A", "t1", "X"),
            row("B", "t2", "Y"),
            row("A", "t3", "X"),
            row("B", "t4", "Y"),
            row("A", "t5", "X"),
            row("C", "closer", "Z"),
        ];

        let runs = consecutive_runs(&rows, RestrictionKey::Artist, ARTIST_RUN_LIMIT);
        assert!(runs.is_empty());
    }

    #[test]
    fn test_clean_show_has_no_restrictions() {
        let rows = vec![
            row("A", "t1", "X"),
            row("B", "t2", "Y"),
            row("C", "t3", "Z"),
        ];

        let report = analyze(&rows);
        assert!(!report.has_restrictions());
    }

    #[test]
    fn test_any_nonempty_set_counts_as_restricted() {
        let mut rows = run_of("A", 5);
        rows.push(row("B", "closer", "Y"));

        let report = analyze(&rows);
        assert!(report.has_restrictions());
    }

    #[test]
    fn test_empty_rows_produce_empty_report() {
        let report = analyze(&[]);
        assert!(!report.has_restrictions());
        assert!(report.exceeding_artists.is_empty());
        assert!(report.consecutive_albums.is_empty());
    }
}
