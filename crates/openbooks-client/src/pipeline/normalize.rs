use crate::pipeline::parse::RawRecord;
use crate::record::{CanonicalRecord, FieldValue};
use crate::report::ReportType;

pub(crate) fn normalize_records(report: ReportType, rows: &[RawRecord]) -> Vec<CanonicalRecord> {
    rows.iter().map(|row| normalize_record(report, row)).collect()
}

pub(crate) fn normalize_record(report: ReportType, row: &RawRecord) -> CanonicalRecord {
    let mut record = CanonicalRecord::new();
    for (source, canonical) in report.field_mapping() {
        match row.get(*source) {
            Some(value) => record.insert(*canonical, value.as_str()),
            None => record.insert_missing(*canonical),
        }
    }

    for numeric in report.numeric_fields() {
        if let Some(value) = record.get_mut(numeric)
            && value.as_text() == Some("")
        {
            *value = FieldValue::Missing;
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::{normalize_record, normalize_records};
    use crate::pipeline::parse::RawRecord;
    use crate::record::{CanonicalRecord, FieldValue};
    use crate::report::ReportType;

    fn field_names(record: &CanonicalRecord) -> Vec<String> {
        serde_json::to_value(record)
            .ok()
            .and_then(|value| value.as_object().map(|fields| fields.keys().cloned().collect()))
            .unwrap_or_default()
    }

    fn raw(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn renames_mapped_columns_and_drops_unknown_ones() {
        let record = normalize_record(
            ReportType::Expenses,
            &raw(&[
                ("Fund@Code", "8000"),
                ("Object Code@Code", "5120"),
                ("Report Footer", "ignored"),
            ]),
        );
        assert_eq!(record.get("fund"), &FieldValue::from("8000"));
        assert_eq!(record.get("object_code"), &FieldValue::from("5120"));
        let names = field_names(&record);
        assert!(!names.contains(&"Report Footer".to_string()));
        assert_eq!(names.len(), ReportType::Expenses.field_mapping().len());
    }

    #[test]
    fn missing_mapped_column_becomes_missing_not_an_error() {
        let record = normalize_record(ReportType::Revenue, &raw(&[("Fund@Code", "8000")]));
        assert!(field_names(&record).contains(&"revenue_source_code".to_string()));
        assert!(record.get("revenue_source_code").is_missing());
    }

    #[test]
    fn empty_numeric_values_become_missing() {
        let record = normalize_record(
            ReportType::Expenses,
            &raw(&[("% Obligated", ""), ("Expenses MTD with Period Cutoff", "1,204.50")]),
        );
        assert!(record.get("percent_obligated").is_missing());
        assert_eq!(record.get("expenses_mtd"), &FieldValue::from("1,204.50"));
    }

    #[test]
    fn empty_non_numeric_values_stay_empty_text() {
        let record = normalize_record(ReportType::Expenses, &raw(&[("Unit@Long Name", "")]));
        assert_eq!(record.get("unit_name"), &FieldValue::from(""));
    }

    #[test]
    fn preserves_input_order() {
        let rows = vec![
            raw(&[("Fund@Code", "1")]),
            raw(&[("Fund@Code", "2")]),
            raw(&[("Fund@Code", "3")]),
        ];
        let funds = normalize_records(ReportType::Revenue, &rows)
            .iter()
            .map(|record| record.get("fund").identifier_text())
            .collect::<Vec<String>>();
        assert_eq!(funds, vec!["1", "2", "3"]);
    }
}
