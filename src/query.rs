use thiserror::Error;

use crate::record::FacultyRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("no faculty records to choose from")]
    EmptyInput,
}

/// Records whose discipline contains `needle`, ignoring case. Input order is kept.
pub fn filter_by_discipline(records: &[FacultyRecord], needle: &str) -> Vec<FacultyRecord> {
    let needle = needle.to_lowercase();
    records
        .iter()
        .filter(|r| r.discipline.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

pub fn find_economists(records: &[FacultyRecord]) -> Vec<FacultyRecord> {
    filter_by_discipline(records, "econ")
}

/// The record with the wordiest biography; the earliest one wins a tie.
pub fn most_verbose(records: &[FacultyRecord]) -> Result<&FacultyRecord, QueryError> {
    let mut best: Option<(&FacultyRecord, usize)> = None;
    for r in records {
        let words = r.word_count();
        if best.map_or(true, |(_, n)| words > n) {
            best = Some((r, words));
        }
    }
    best.map(|(r, _)| r).ok_or(QueryError::EmptyInput)
}
