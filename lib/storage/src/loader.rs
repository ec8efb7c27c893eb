// JSON-lines reading and writing for datasets
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use viewx_core::{Error, Result};

/// Read one JSON object per non-blank line
pub fn read_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let reader = BufReader::new(File::open(path)?);
    let mut rows = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line)
            .map_err(|e| Error::Serialization(format!("line {}: {}", line_no + 1, e)))?;
        if !value.is_object() {
            return Err(Error::Serialization(format!(
                "line {}: expected a JSON object",
                line_no + 1
            )));
        }
        rows.push(value);
    }
    Ok(rows)
}

pub fn write_jsonl<P: AsRef<Path>>(path: P, rows: &[Value]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
