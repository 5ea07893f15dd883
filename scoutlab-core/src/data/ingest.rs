//! CSV source reader with header canonicalization.

use serde::de::DeserializeOwned;
use std::fs::File;
use std::io;
use std::path::Path;

use super::headers::canonical_headers;
use super::DataError;

/// Read a raw CSV file into typed records.
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DataError> {
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    let rows = read_csv_from_reader(file)?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "read source");
    Ok(rows)
}

/// Read raw CSV from any reader. Headers are canonicalized before
/// deserialization; rows with a ragged width are tolerated.
pub fn read_csv_from_reader<T: DeserializeOwned, R: io::Read>(
    reader: R,
) -> Result<Vec<T>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let raw_headers = rdr.headers()?.clone();
    let headers = canonical_headers(&raw_headers);
    for (raw, canon) in raw_headers.iter().zip(headers.iter()) {
        if raw != canon {
            tracing::debug!(from = raw, to = canon, "renamed header");
        }
    }
    rdr.set_headers(headers.clone());

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: T = record.deserialize(Some(&headers))?;
        out.push(row);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::raw::{RawContract, RawPlayerSeason};

    #[test]
    fn reads_with_messy_headers() {
        let csv = "Player, Age ,Tm,Pos,G,FGA,FTA,PTS,TRB,AST,STL,BLK,Season\n\
                   Jane Doe,24,BOS,PG,60,12.1,3.0,18.2,4.0,6.1,1.2,0.3,2023-24\n";
        let rows: Vec<RawPlayerSeason> = read_csv_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.player.as_deref(), Some("Jane Doe"));
        assert_eq!(r.team.as_deref(), Some("BOS"));
        assert_eq!(r.age.as_deref(), Some("24"));
        assert_eq!(r.season.as_deref(), Some("2023-24"));
    }

    #[test]
    fn missing_columns_and_empty_cells_are_none() {
        let csv = "player,salary_y1\nJohn,\n";
        let rows: Vec<RawContract> = read_csv_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].player.as_deref(), Some("John"));
        assert_eq!(rows[0].salary_y1, None);
        assert_eq!(rows[0].guaranteed, None);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_csv::<RawContract>(Path::new("/nonexistent/contracts.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
