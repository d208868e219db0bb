// src/table/read.rs

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use std::{fs, path::Path};
use tracing::{debug, info};

use super::{insert_record, ParsedTable, ReadStats, Record};

const BOM: char = '\u{feff}';

/// Read the delimited source file at `path` into a `ParsedTable`.
///
/// The first line is a header and is discarded. Rows with fewer than four
/// fields are skipped and counted in the returned `ReadStats`.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<(ParsedTable, ReadStats)> {
    let path = path.as_ref();
    // read_to_string rejects invalid UTF-8 with ErrorKind::InvalidData
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading source table {}", path.display()))?;

    let (table, stats) = read_table_from_str(&text)
        .with_context(|| format!("parsing source table {}", path.display()))?;

    info!(
        path = %path.display(),
        groups = table.len(),
        rows = stats.rows_read,
        used = stats.rows_used(),
        skipped = stats.rows_skipped,
        "read source table"
    );
    Ok((table, stats))
}

/// Parse already-decoded CSV text. A leading byte-order mark is ignored.
///
/// Text with no header line at all is an error.
pub fn read_table_from_str(text: &str) -> Result<(ParsedTable, ReadStats)> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    if text.is_empty() {
        bail!("source table has no header line");
    }

    let mut table = ParsedTable::new();
    let mut stats = ReadStats::default();

    // The csv reader drops blank lines, so the header is cut off by hand:
    // a blank first line is still the header.
    let body = skip_first_line(text);
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    for result in rdr.records() {
        let record = result.context("parsing CSV record")?;
        stats.rows_read += 1;

        match Record::from_fields(record.iter()) {
            Some(rec) => insert_record(&mut table, rec),
            None => {
                stats.rows_skipped += 1;
                debug!(
                    line = record.position().map(|p| p.line() + 1),
                    fields = record.len(),
                    "skipping short row"
                );
            }
        }
    }

    Ok((table, stats))
}

/// Everything after the first `\n`, `\r\n` or `\r` terminator.
fn skip_first_line(text: &str) -> &str {
    match text.find(|c: char| c == '\r' || c == '\n') {
        Some(idx) if text[idx..].starts_with("\r\n") => &text[idx + 2..],
        Some(idx) => &text[idx + 1..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{ErrorKind, Write};
    use tempfile::tempdir;

    #[test]
    fn header_is_discarded_and_field_two_ignored() -> Result<()> {
        let (table, stats) = read_table_from_str(
            "list_name,item_key,note,value\nclinicA,greeting,unused,Hello\n",
        )?;
        assert_eq!(stats, ReadStats { rows_read: 1, rows_skipped: 0 });
        assert_eq!(table.len(), 1);
        assert_eq!(table["clinicA"]["greeting"], "Hello");
        assert!(!table.contains_key("list_name"));
        Ok(())
    }

    #[test]
    fn short_rows_are_skipped() -> Result<()> {
        let csv = "h0,h1,h2,h3\n\
                   clinicA,greeting,unused\n\
                   clinicB\n\
                   clinicA,farewell,unused,Bye\n";
        let (table, stats) = read_table_from_str(csv)?;
        assert_eq!(stats.rows_read, 3);
        assert_eq!(stats.rows_skipped, 2);
        assert_eq!(stats.rows_used(), 1);
        assert_eq!(table.len(), 1);
        assert_eq!(table["clinicA"].len(), 1);
        assert_eq!(table["clinicA"]["farewell"], "Bye");
        assert!(!table.contains_key("clinicB"));
        Ok(())
    }

    #[test]
    fn quoted_fields_keep_commas_and_quotes() -> Result<()> {
        let csv = "h0,h1,h2,h3\n\
                   clinicA,price,\"a, b\",\"from 3,000 yen, \"\"tax\"\" included\"\n";
        let (table, _) = read_table_from_str(csv)?;
        assert_eq!(table["clinicA"]["price"], "from 3,000 yen, \"tax\" included");
        Ok(())
    }

    #[test]
    fn quoted_field_may_span_lines() -> Result<()> {
        let csv = "h0,h1,h2,h3\nclinicA,body,,\"line one\nline two\"\n";
        let (table, _) = read_table_from_str(csv)?;
        assert_eq!(table["clinicA"]["body"], "line one\nline two");
        Ok(())
    }

    #[test]
    fn bom_and_crlf_are_handled() -> Result<()> {
        let csv = "\u{feff}list_name,item_key,note,value\r\nclinicA,greeting,,こんにちは\r\n";
        let (table, _) = read_table_from_str(csv)?;
        assert_eq!(table["clinicA"]["greeting"], "こんにちは");
        Ok(())
    }

    #[test]
    fn values_are_not_trimmed() -> Result<()> {
        let (table, _) = read_table_from_str("h0,h1,h2,h3\ng,k,, padded \n")?;
        assert_eq!(table["g"]["k"], " padded ");
        Ok(())
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = read_table_from_str("").unwrap_err();
        assert!(err.to_string().contains("no header"));
        assert!(read_table_from_str("\u{feff}").is_err());
    }

    #[test]
    fn header_only_gives_empty_table() -> Result<()> {
        let (table, stats) = read_table_from_str("list_name,item_key,note,value\n")?;
        assert!(table.is_empty());
        assert_eq!(stats, ReadStats::default());

        let (table, _) = read_table_from_str("list_name,item_key,note,value")?;
        assert!(table.is_empty());
        Ok(())
    }

    #[test]
    fn blank_first_line_is_the_header() -> Result<()> {
        let (table, stats) = read_table_from_str("\nh0,h1,h2,h3\nclinicA,greeting,,Hello\n")?;
        assert_eq!(stats.rows_read, 2);
        let groups: Vec<_> = table.keys().cloned().collect();
        assert_eq!(groups, vec!["h0", "clinicA"]);
        assert_eq!(table["h0"]["h1"], "h3");
        assert_eq!(table["clinicA"]["greeting"], "Hello");

        let (table, _) = read_table_from_str("\r\nh0,h1,h2,h3\r\n")?;
        assert_eq!(table["h0"]["h1"], "h3");
        Ok(())
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = tempdir().unwrap();
        let err = read_table(tmp.path().join("absent.csv")).unwrap_err();
        let io = err.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("bad.csv");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(b"h0,h1,h2,h3\ng,k,,\xff\xfe\n").unwrap();
        drop(f);

        let err = read_table(&path).unwrap_err();
        let io = err.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn reads_from_disk() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("clinic-texts.csv");
        fs::write(
            &path,
            "list_name,item_key,note,value\nclinicA,greeting,,Hello\nclinicB,greeting,,Hi\n",
        )?;
        let (table, stats) = read_table(&path)?;
        assert_eq!(stats.rows_read, 2);
        let groups: Vec<_> = table.keys().cloned().collect();
        assert_eq!(groups, vec!["clinicA", "clinicB"]);
        Ok(())
    }
}
