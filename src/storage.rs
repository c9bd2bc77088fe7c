use log::debug;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Destination for accepted readings.
///
/// The validation and response logic only ever sees this trait, so the flat
/// file can be swapped for another sink without touching the ingest path.
pub trait ReadingLog: Send + Sync {
    /// Append one reading as a single encoded row.
    fn append_row(&self, fields: &[String]) -> std::io::Result<()>;
}

/// Flat-file log: one comma-separated row per reading, no header row.
///
/// Each append is its own open-write-close against the file in append mode,
/// created on first write. Interleaving of concurrent appends is whatever
/// the platform's append-mode semantics provide.
pub struct CsvFileLog {
    path: PathBuf,
}

impl CsvFileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReadingLog for CsvFileLog {
    fn append_row(&self, fields: &[String]) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        file.write_all(encode_row(fields).as_bytes())?;
        debug!("Appended row to {:?}", self.path);

        Ok(())
    }
}

/// In-memory log for tests, no persistence.
#[derive(Default)]
pub struct InMemoryLog {
    rows: Mutex<Vec<String>>,
}

impl InMemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<String> {
        self.rows.lock().unwrap().clone()
    }
}

impl ReadingLog for InMemoryLog {
    fn append_row(&self, fields: &[String]) -> std::io::Result<()> {
        self.rows.lock().unwrap().push(encode_row(fields));
        Ok(())
    }
}

/// Encode one row, newline-terminated. A field containing the delimiter,
/// the quote character, or a line break is wrapped in double quotes with
/// embedded quotes doubled.
pub fn encode_row(fields: &[String]) -> String {
    let mut row = String::new();

    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            row.push(',');
        }

        if needs_quoting(field) {
            row.push('"');
            row.push_str(&field.replace('"', "\"\""));
            row.push('"');
        } else {
            row.push_str(field);
        }
    }

    row.push('\n');
    row
}

/// Decode one row (without its trailing newline) back into fields, honoring
/// the quoting rules of `encode_row`.
pub fn decode_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
    }

    fields.push(current);
    fields
}

fn needs_quoting(field: &str) -> bool {
    field.contains(&[',', '"', '\n', '\r'][..])
}
