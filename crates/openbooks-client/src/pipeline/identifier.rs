use std::collections::HashMap;

use crate::record::CanonicalRecord;

// No separator, to match rows already published.
pub(crate) fn row_identifier(record: &CanonicalRecord, columns: &[&str]) -> String {
    identifier_parts(record, columns).concat()
}

pub(crate) fn identifier_parts(record: &CanonicalRecord, columns: &[&str]) -> Vec<String> {
    columns
        .iter()
        .map(|column| record.get(column).identifier_text())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IdentifierCollision {
    pub(crate) row_identifier: String,
    pub(crate) first_row: usize,
    pub(crate) second_row: usize,
}

/// Distinct identifier tuples that concatenate to the same string.
pub(crate) fn find_collisions(
    records: &[CanonicalRecord],
    columns: &[&str],
) -> Vec<IdentifierCollision> {
    let mut seen: HashMap<String, Vec<(Vec<String>, usize)>> = HashMap::new();
    let mut collisions = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let row = index + 1;
        let parts = identifier_parts(record, columns);
        let key = parts.concat();
        let entries = seen.entry(key.clone()).or_default();

        if let Some((_, first_row)) = entries.iter().find(|(other, _)| other != &parts) {
            collisions.push(IdentifierCollision {
                row_identifier: key,
                first_row: *first_row,
                second_row: row,
            });
        }

        if !entries.iter().any(|(other, _)| other == &parts) {
            entries.push((parts, row));
        }
    }

    collisions
}
