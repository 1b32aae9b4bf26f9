//! Rows and record assembly.
//!
//! - [`Row`] - A data record keyed by the header row
//! - `RecordAssembler` - Turns tokenized records into headers and rows

use indexmap::IndexMap;
use indexmap::map::Iter;
use serde::Serialize;

use crate::config::{DuplicateHeaders, ParserConfig};
use crate::error::CsvError;
use crate::value::Value;

/// A data row: header name to classified value, in header order.
///
/// When the header row repeats a name, the later column's value is stored
/// under the first occurrence's position.
///
/// # Example
///
/// ```
/// use csvrows::{parse_str, ParserConfig, Value};
///
/// let result = parse_str("a,b\n1,x\n", ParserConfig::default())?;
/// let row = &result.rows[0];
///
/// assert_eq!(row.get("a"), Some(&Value::Number(1.0)));
/// assert_eq!(row.get("b").and_then(Value::as_str), Some("x"));
/// assert_eq!(row.keys().collect::<Vec<_>>(), ["a", "b"]);
/// # Ok::<(), csvrows::CsvError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Row {
    fields: IndexMap<String, Value>,
}

impl Row {
    /// Returns the value stored under `header`.
    pub fn get(&self, header: &str) -> Option<&Value> {
        self.fields.get(header)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no keys.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Header names in column order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Values in column order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.values()
    }

    /// `(header, value)` pairs in column order.
    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.fields.iter()
    }

    /// Consumes the row, returning the underlying ordered map.
    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.fields
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Outcome of assembling one record.
#[derive(Debug)]
pub(crate) enum Assembled<'a> {
    /// The record was the header row.
    Headers(&'a [String]),
    /// The record was a data row.
    Row(Row),
}

/// Header handling, shape checks and value classification.
#[derive(Debug)]
pub(crate) struct RecordAssembler {
    classify_numbers: bool,
    duplicate_headers: DuplicateHeaders,
    headers: Option<Vec<String>>,
    rows_emitted: u64,
}

impl RecordAssembler {
    pub(crate) fn new(config: &ParserConfig) -> Self {
        Self {
            classify_numbers: config.classify_numbers(),
            duplicate_headers: config.duplicate_headers(),
            headers: None,
            rows_emitted: 0,
        }
    }

    pub(crate) fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    pub(crate) fn rows_emitted(&self) -> u64 {
        self.rows_emitted
    }

    pub(crate) fn into_headers(self) -> Option<Vec<String>> {
        self.headers
    }

    /// Takes one completed record.
    ///
    /// The first record becomes the header row verbatim. Every later record
    /// must have exactly as many fields as the header row.
    pub(crate) fn assemble(&mut self, record: Vec<String>) -> Result<Assembled<'_>, CsvError> {
        let Some(headers) = self.headers.as_ref() else {
            if self.duplicate_headers == DuplicateHeaders::Reject {
                check_duplicates(&record)?;
            }
            let headers = self.headers.insert(record);
            return Ok(Assembled::Headers(headers.as_slice()));
        };

        if record.len() != headers.len() {
            return Err(CsvError::MalformedRow {
                row: self.rows_emitted + 1,
                expected: headers.len(),
                actual: record.len(),
            });
        }

        let classify = self.classify_numbers;
        let fields = headers
            .iter()
            .cloned()
            .zip(record)
            .map(|(header, field)| (header, Value::classify(field, classify)))
            .collect();

        self.rows_emitted += 1;
        Ok(Assembled::Row(Row { fields }))
    }
}

fn check_duplicates(headers: &[String]) -> Result<(), CsvError> {
    for (i, name) in headers.iter().enumerate() {
        if headers[..i].contains(name) {
            return Err(CsvError::DuplicateHeader {
                name: name.clone(),
                column: i + 1,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    fn expect_row(assembled: Assembled<'_>) -> Row {
        match assembled {
            Assembled::Row(row) => row,
            Assembled::Headers(h) => panic!("expected a row, got headers {:?}", h),
        }
    }

    #[test]
    fn test_first_record_is_headers() {
        let mut assembler = RecordAssembler::new(&ParserConfig::default());
        assert!(assembler.headers().is_none());

        match assembler.assemble(record(&["a", "1"])).unwrap() {
            Assembled::Headers(h) => assert_eq!(h, ["a", "1"]),
            Assembled::Row(_) => panic!("first record must be the header row"),
        }
        assert_eq!(assembler.rows_emitted(), 0);
    }

    #[test]
    fn test_row_is_classified_and_ordered() {
        let mut assembler = RecordAssembler::new(&ParserConfig::default());
        assembler.assemble(record(&["z", "a"])).unwrap();

        let row = expect_row(assembler.assemble(record(&["1", "x"])).unwrap());
        assert_eq!(row.keys().collect::<Vec<_>>(), ["z", "a"]);
        assert_eq!(row.get("z"), Some(&Value::Number(1.0)));
        assert_eq!(row.get("a"), Some(&Value::from("x")));
        assert_eq!(assembler.rows_emitted(), 1);
    }

    #[test]
    fn test_classification_disabled() {
        let config = ParserConfig::default().with_classify_numbers(false);
        let mut assembler = RecordAssembler::new(&config);
        assembler.assemble(record(&["n"])).unwrap();

        let row = expect_row(assembler.assemble(record(&["12"])).unwrap());
        assert_eq!(row.get("n"), Some(&Value::from("12")));
    }

    #[test]
    fn test_field_count_mismatch() {
        let mut assembler = RecordAssembler::new(&ParserConfig::default());
        assembler.assemble(record(&["a", "b"])).unwrap();
        assembler.assemble(record(&["1", "2"])).unwrap();

        let err = assembler.assemble(record(&["1", "2", "3"])).unwrap_err();
        assert!(matches!(
            err,
            CsvError::MalformedRow {
                row: 2,
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_duplicate_headers_overwrite() {
        let mut assembler = RecordAssembler::new(&ParserConfig::default());
        assembler.assemble(record(&["k", "v", "k"])).unwrap();

        let row = expect_row(assembler.assemble(record(&["first", "x", "last"])).unwrap());
        assert_eq!(row.len(), 2);
        assert_eq!(row.keys().collect::<Vec<_>>(), ["k", "v"]);
        assert_eq!(row.get("k"), Some(&Value::from("last")));
    }

    #[test]
    fn test_duplicate_headers_reject() {
        let config = ParserConfig::default().with_duplicate_headers(DuplicateHeaders::Reject);
        let mut assembler = RecordAssembler::new(&config);

        let err = assembler.assemble(record(&["k", "v", "k"])).unwrap_err();
        match err {
            CsvError::DuplicateHeader { name, column } => {
                assert_eq!(name, "k");
                assert_eq!(column, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_row_from_iter_and_serialize() {
        let row: Row = [("b", Value::Number(2.0)), ("a", Value::from("x"))]
            .into_iter()
            .collect();
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"b":2,"a":"x"}"#);
    }
}
