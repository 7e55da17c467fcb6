use super::columns::{column_for, Column};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::Read;

/// One roster row reduced to the columns the simulator understands.
#[derive(Debug, Default)]
pub(crate) struct RosterRecord {
    /// 1-based data row number, for warnings.
    pub(crate) row: usize,
    fields: HashMap<Column, String>,
}

impl RosterRecord {
    pub(crate) fn get(&self, column: Column) -> Option<&str> {
        self.fields
            .get(&column)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub(crate) fn has(&self, column: Column) -> bool {
        self.fields.contains_key(&column)
    }

    fn insert(&mut self, header: &str, value: String) {
        if let Some(column) = column_for(header) {
            self.fields.entry(column).or_insert(value);
        }
    }
}

pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<Vec<RosterRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for (index, row) in csv_reader.records().enumerate() {
        let row = row?;
        let mut record = RosterRecord {
            row: index + 1,
            ..RosterRecord::default()
        };
        for (header, value) in headers.iter().zip(row.iter()) {
            record.insert(header, value.to_string());
        }
        records.push(record);
    }

    Ok(records)
}

pub(crate) fn parse_json<R: Read>(reader: R) -> Result<Vec<RosterRecord>, serde_json::Error> {
    let rows: Vec<Map<String, Value>> = serde_json::from_reader(reader)?;

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let mut record = RosterRecord {
                row: index + 1,
                ..RosterRecord::default()
            };
            for (key, value) in row {
                record.insert(&key, value_to_string(value));
            }
            record
        })
        .collect())
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn csv_rows_keep_known_columns() {
        let records = parse_csv(Cursor::new(
            "\u{feff}INSCRIÇÃO,NOME,LP,CLAS. AMPLA\n 101 , Ana ,12,1\n",
        ))
        .expect("csv parses");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].row, 1);
        assert_eq!(records[0].get(Column::Registration), Some("101"));
        assert_eq!(records[0].get(Column::Name), Some("Ana"));
        assert_eq!(records[0].get(Column::GeneralRank), Some("1"));
        assert!(!records[0].has(Column::QuotaRank));
    }

    #[test]
    fn json_values_are_stringified() {
        let records = parse_json(Cursor::new(
            r#"[{"INSCRIÇÃO": 101, "NOME": " Ana ", "CLAS. COTAS": null, "CLAS. AMPLA": "3,0"}]"#,
        ))
        .expect("json parses");

        assert_eq!(records[0].get(Column::Registration), Some("101"));
        assert_eq!(records[0].get(Column::Name), Some("Ana"));
        assert_eq!(records[0].get(Column::QuotaRank), None);
        assert!(records[0].has(Column::QuotaRank));
        assert_eq!(records[0].get(Column::GeneralRank), Some("3,0"));
    }
}
