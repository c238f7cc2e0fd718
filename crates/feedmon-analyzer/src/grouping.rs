use chrono::NaiveDate;
use feedmon_common::types::FileRecord;
use std::collections::BTreeMap;

/// File records keyed by their inferred delivery date, oldest first.
pub type FilesByDate<'a> = BTreeMap<NaiveDate, Vec<&'a FileRecord>>;

/// Groups records by `inferred_date`. Records without a date are dropped.
pub fn group_by_date(records: &[FileRecord]) -> FilesByDate<'_> {
    let mut grouped: FilesByDate<'_> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.inferred_date {
            grouped.entry(date).or_default().push(record);
        }
    }
    grouped
}

/// Files delivered on `date`, or an empty slice.
pub fn files_on<'g, 'a>(grouped: &'g FilesByDate<'a>, date: NaiveDate) -> &'g [&'a FileRecord] {
    grouped.get(&date).map(Vec::as_slice).unwrap_or(&[])
}
