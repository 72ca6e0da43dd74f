use thiserror::Error;

// Column headers the fingerprinter export is expected to carry
pub const COL_START: &str = "Start";
pub const COL_END: &str = "End";
pub const COL_ARTISTS: &str = "Artists";
pub const COL_TRACK_TITLE: &str = "Track Title";
pub const COL_ID: &str = "Id";
pub const COL_ALBUMS: &str = "Albums";

/// The six meaningful columns, in display order.
pub const EXPECTED_COLUMNS: &[&str] = &[
    COL_START, COL_END, COL_ARTISTS, COL_TRACK_TITLE, COL_ID, COL_ALBUMS,
];

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("header row is missing the \"{0}\" column")]
    MissingColumn(&'static str),
    #[error("line {line}: expected {expected} tab-separated fields, found {found}")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: {column} value \"{value}\" is not a whole number of seconds")]
    BadTime {
        line: usize,
        column: &'static str,
        value: String,
    },
    #[error("no data rows after the header")]
    NoDataRows,
}

/// One play interval reported by the fingerprinter.
///
/// `start`/`end` hold display times (`HH:MM:SS` from show start); the raw
/// export carries them as integer seconds. All other fields are free text
/// taken verbatim (trimmed) from the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRow {
    pub start: String,
    pub end: String,
    pub artists: String,
    pub track_title: String,
    pub id: String,
    pub albums: String,
}

impl TrackRow {
    /// Fields that identify a single physical play event. Adjacent rows with
    /// an equal key are intervals of the same spin.
    pub fn merge_key(&self) -> (&str, &str, &str, &str) {
        (&self.artists, &self.track_title, &self.id, &self.albums)
    }
}

/// Resolved positions of the required columns within the header row.
struct Columns {
    start: usize,
    end: usize,
    artists: usize,
    track_title: usize,
    id: usize,
    albums: usize,
}

impl Columns {
    fn locate(header: &[&str]) -> Result<Self, ParseError> {
        let find = |name: &'static str| {
            header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(ParseError::MissingColumn(name))
        };
        Ok(Self {
            start: find(COL_START)?,
            end: find(COL_END)?,
            artists: find(COL_ARTISTS)?,
            track_title: find(COL_TRACK_TITLE)?,
            id: find(COL_ID)?,
            albums: find(COL_ALBUMS)?,
        })
    }
}

/// Parse a pasted tracklist into ordered rows.
///
/// The first line is the tab-separated header; the required columns are
/// resolved by name so extra columns and reordering are tolerated. Data rows
/// narrower than the header, non-numeric times, and a header with no data
/// rows all abort the parse — there is no partial recovery for hand-pasted
/// input.
pub fn parse_tracklist(raw: &str) -> Result<Vec<TrackRow>, ParseError> {
    let mut lines = raw.trim().lines();
    let header: Vec<&str> = lines.next().unwrap_or_default().split('\t').collect();
    let cols = Columns::locate(&header)?;

    let mut rows = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line_no = idx + 2; // 1-based, header is line 1
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < header.len() {
            return Err(ParseError::RowWidth {
                line: line_no,
                expected: header.len(),
                found: fields.len(),
            });
        }

        rows.push(TrackRow {
            start: parse_time(fields[cols.start], COL_START, line_no)?,
            end: parse_time(fields[cols.end], COL_END, line_no)?,
            artists: fields[cols.artists].trim().to_string(),
            track_title: fields[cols.track_title].trim().to_string(),
            id: fields[cols.id].trim().to_string(),
            albums: fields[cols.albums].trim().to_string(),
        });
    }

    if rows.is_empty() {
        return Err(ParseError::NoDataRows);
    }

    log::debug!("parsed {} tracklist rows", rows.len());
    Ok(rows)
}

fn parse_time(field: &str, column: &'static str, line: usize) -> Result<String, ParseError> {
    let value = field.trim();
    let secs: u64 = value.parse().map_err(|_| ParseError::BadTime {
        line,
        column,
        value: value.to_string(),
    })?;
    Ok(seconds_to_time(secs))
}

/// Render elapsed seconds as zero-padded `HH:MM:SS`.
/// Hours are unbounded — a marathon show past 99 hours just renders wider.
pub fn seconds_to_time(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
