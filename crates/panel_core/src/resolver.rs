use shared::domain::ParameterRecord;

/// Extracts the display value of the named parameter from one fetch's
/// records. Case-sensitive exact match, first match wins under duplicate
/// names, stable input order. A missing target resolves to the empty
/// string; the backend treats an empty query as a no-op.
pub fn resolve(records: &[ParameterRecord], target_name: &str) -> String {
    records
        .iter()
        .find(|record| record.parameter_name == target_name)
        .map(|record| record.parameter_value.clone())
        .unwrap_or_default()
}
