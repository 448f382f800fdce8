//! CSV extract reader with encoding auto-detection.
//!
//! Turns the rows of a quarterly extract into [`Record`]s. Columns are located
//! by header name; everything else in the file is ignored.

use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::{normalize_zone, Record};

/// Default header of the zone column.
pub const ZONE_COLUMN: &str = "zip3";
/// Default header of the category column.
pub const CATEGORY_COLUMN: &str = "substance";
/// Default header of the value column.
pub const VALUE_COLUMN: &str = "gramsper100K";

/// Tokens read as a missing value (compared case-insensitively).
const MISSING_TOKENS: &[&str] = &["", "na", "n/a", "nan", "null", "none", "#n/a"];

/// Header names of the three columns the pivot needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub zone: String,
    pub category: String,
    pub value: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            zone: ZONE_COLUMN.to_string(),
            category: CATEGORY_COLUMN.to_string(),
            value: VALUE_COLUMN.to_string(),
        }
    }
}

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed records
    pub records: Vec<Record>,
    /// Detected encoding
    pub encoding: String,
    /// Column headers
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Unknown encodings fall back to lossy UTF-8. A leading BOM is removed.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        // windows-1252 agrees with ISO-8859-1 on every printable byte
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        _ => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        },
    };
    match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

/// Parse a numeric field. Missing tokens and non-finite numbers become `None`.
pub fn parse_value(raw: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let trimmed = raw.trim();
    if MISSING_TOKENS
        .iter()
        .any(|t| trimmed.eq_ignore_ascii_case(t))
    {
        return Ok(None);
    }
    let value: f64 = trimmed.parse()?;
    Ok(value.is_finite().then_some(value))
}

/// Parse CSV text into records using the given column mapping.
pub fn parse_str(content: &str, columns: &ColumnMapping) -> CsvResult<(Vec<String>, Vec<Record>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::EmptyFile);
    }

    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| CsvError::MissingColumn(name.to_string()))
    };
    let zone_idx = position(columns.zone.as_str())?;
    let category_idx = position(columns.category.as_str())?;
    let value_idx = position(columns.value.as_str())?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let field = |idx: usize| row.get(idx).unwrap_or("");

        let zone = normalize_zone(field(zone_idx)).ok_or_else(|| CsvError::MissingField {
            line,
            column: columns.zone.clone(),
        })?;

        let category = field(category_idx);
        if category.trim().is_empty() {
            return Err(CsvError::MissingField {
                line,
                column: columns.category.clone(),
            });
        }

        let raw_value = field(value_idx);
        let value = parse_value(raw_value).map_err(|_| CsvError::InvalidNumber {
            line,
            column: columns.value.clone(),
            value: raw_value.trim().to_string(),
        })?;

        records.push(Record::new(zone, category, value));
    }

    Ok((headers, records))
}

/// Parse CSV bytes with auto-detection of encoding.
pub fn parse_bytes(bytes: &[u8], columns: &ColumnMapping) -> CsvResult<ParseResult> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let (headers, records) = parse_str(&content, columns)?;

    Ok(ParseResult {
        records,
        encoding,
        headers,
    })
}

/// Read and parse a CSV extract from disk.
pub fn parse_csv_file<P: AsRef<Path>>(path: P, columns: &ColumnMapping) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes, columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> CsvResult<Vec<Record>> {
        parse_str(csv, &ColumnMapping::default()).map(|(_, records)| records)
    }

    #[test]
    fn test_simple_extract() {
        let csv = "substance,zip3,gramsper100K\nX,100,1.5\nY,200,2\n";
        let records = parse(csv).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], Record::new("100", "X", Some(1.5)));
        assert_eq!(records[1], Record::new("200", "Y", Some(2.0)));
    }

    #[test]
    fn test_extra_columns_and_order_ignored() {
        let csv = "year,gramsper100K,quarter,zip3,substance\n2019,3.25,1,021,OXYCODONE\n";
        let records = parse(csv).unwrap();

        assert_eq!(records[0], Record::new("21", "OXYCODONE", Some(3.25)));
    }

    #[test]
    fn test_missing_values() {
        let csv = "substance,zip3,gramsper100K\nX,100,\nY,100,NaN\nZ,100,NA\n";
        let records = parse(csv).unwrap();

        assert!(records.iter().all(|r| r.value.is_none()));
    }

    #[test]
    fn test_short_row_treated_as_missing_value() {
        let csv = "substance,zip3,gramsper100K\nX,100\n";
        let records = parse(csv).unwrap();

        assert_eq!(records[0].value, None);
    }

    #[test]
    fn test_quoted_fields() {
        let csv = "substance,zip3,gramsper100K\n\"CODEINE, BASE\",\"300\",\"4.5\"\n";
        let records = parse(csv).unwrap();

        assert_eq!(records[0].category, "CODEINE, BASE");
        assert_eq!(records[0].zone, "300");
    }

    #[test]
    fn test_missing_column() {
        let csv = "substance,zip3\nX,100\n";
        let err = parse(csv).unwrap_err();

        assert!(matches!(err, CsvError::MissingColumn(ref c) if c == "gramsper100K"));
    }

    #[test]
    fn test_missing_zone_fails_fast() {
        let csv = "substance,zip3,gramsper100K\nX,100,1\nY,,2\n";
        let err = parse(csv).unwrap_err();

        match err {
            CsvError::MissingField { line, column } => {
                assert_eq!(line, 3);
                assert_eq!(column, "zip3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_category_fails_fast() {
        let csv = "substance,zip3,gramsper100K\n,100,1\n";
        let err = parse(csv).unwrap_err();

        assert!(matches!(err, CsvError::MissingField { ref column, .. } if column == "substance"));
    }

    #[test]
    fn test_invalid_number() {
        let csv = "substance,zip3,gramsper100K\nX,100,lots\n";
        let err = parse(csv).unwrap_err();

        assert!(err.to_string().contains("value 'lots'"));
    }

    #[test]
    fn test_custom_columns() {
        let columns = ColumnMapping {
            zone: "zone".into(),
            category: "drug".into(),
            value: "amount".into(),
        };
        let (headers, records) = parse_str("zone,drug,amount\n5,A,1\n", &columns).unwrap();

        assert_eq!(headers, vec!["zone", "drug", "amount"]);
        assert_eq!(records[0], Record::new("5", "A", Some(1.0)));
    }

    #[test]
    fn test_empty_input() {
        let result = parse_bytes(b"", &ColumnMapping::default());
        assert!(matches!(result, Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_bom_stripped() {
        let bytes = "\u{feff}substance,zip3,gramsper100K\nX,100,1\n".as_bytes();
        let result = parse_bytes(bytes, &ColumnMapping::default()).unwrap();

        assert_eq!(result.headers[0], "substance");
        assert_eq!(result.records.len(), 1);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_latin1_upper_half() {
        // bytes that ISO-8859-15 would map to "€œŠ"
        let decoded = decode_content(&[0xA4, 0xBD, 0xA6], "iso-8859-1");
        assert_eq!(decoded, "¤½¦");
    }

    #[test]
    fn test_category_labels_kept_verbatim() {
        let csv = "substance,zip3,gramsper100K\nX,100,1\n X ,100,3\n";
        let (_, records) = parse_str(csv, &ColumnMapping::default()).unwrap();

        assert_eq!(records[0].category, "X");
        assert_eq!(records[1].category, " X ");
    }

    #[test]
    fn test_blank_category_rejected() {
        let csv = "substance,zip3,gramsper100K\n   ,100,3\n";
        let err = parse_str(csv, &ColumnMapping::default()).unwrap_err();
        assert!(matches!(err, CsvError::MissingField { line: 2, ref column } if column == "substance"));
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(" 2.5 "), Ok(Some(2.5)));
        assert_eq!(parse_value("null"), Ok(None));
        assert_eq!(parse_value("inf"), Ok(None));
        assert!(parse_value("x1").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = parse_csv_file("/definitely/not/here.csv", &ColumnMapping::default()).unwrap_err();
        assert!(err.is_not_found());
    }
}
