use chrono::Utc;
use log::{debug, info};
use serde_json::Value;

use crate::error::IngestError;
use crate::storage::ReadingLog;
use crate::types::Reading;

pub const INSERTED: &str = "Data Inserted Successfully!";
pub const WAITING: &str = "Waiting for data to insert...";
pub const INSERT_FAILED: &str = "Failed to insert data.";

/// Outcome of one ingestion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The reading was appended to the log.
    Inserted,
    /// The payload did not carry a complete reading; nothing was written.
    Waiting,
}

impl Outcome {
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Inserted => INSERTED,
            Outcome::Waiting => WAITING,
        }
    }
}

/// Runs the whole ingestion operation for one request body: parse the JSON,
/// check the required keys, stamp the receipt time, append one row.
///
/// A body that does not parse, or parses to something other than an object
/// with the required keys, lands on `Waiting` with no write. Only the
/// append itself can error.
pub fn process(body: &[u8], store: &dyn ReadingLog) -> Result<Outcome, IngestError> {
    let payload: Value = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        // Malformed body is indistinguishable from a missing-keys payload
        Err(_) => {
            debug!("Discarding unparsable payload ({} bytes)", body.len());
            return Ok(Outcome::Waiting);
        }
    };

    let mut reading = match Reading::from_payload(payload) {
        Some(reading) => reading,
        None => {
            debug!("Discarding incomplete reading");
            return Ok(Outcome::Waiting);
        }
    };

    reading.stamp(Utc::now().to_rfc2822());
    store.append_row(&reading.row())?;

    info!("Inserted reading with {} fields", reading.field_count());

    Ok(Outcome::Inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{decode_row, InMemoryLog};
    use chrono::DateTime;

    fn ingest(body: &str, log: &InMemoryLog) -> Outcome {
        process(body.as_bytes(), log).unwrap()
    }

    #[test]
    fn complete_reading_is_inserted() {
        let log = InMemoryLog::new();
        let outcome = ingest(
            r#"{"distance":12,"buttonZeroState":0,"buttonOneState":1,
                "buttonTwoState":0,"buttonThreeState":0}"#,
            &log,
        );

        assert_eq!(outcome, Outcome::Inserted);
        assert_eq!(outcome.message(), "Data Inserted Successfully!");

        let rows = log.rows();
        assert_eq!(rows.len(), 1);

        let fields = decode_row(rows[0].trim_end_matches('\n'));
        assert_eq!(fields.len(), 6);
        assert_eq!(&fields[..5], ["12", "0", "1", "0", "0"]);
        assert!(DateTime::parse_from_rfc2822(&fields[5]).is_ok());
    }

    #[test]
    fn missing_key_means_waiting_and_no_write() {
        let log = InMemoryLog::new();
        let outcome = ingest(r#"{"distance":12}"#, &log);

        assert_eq!(outcome, Outcome::Waiting);
        assert_eq!(outcome.message(), "Waiting for data to insert...");
        assert!(log.rows().is_empty());
    }

    #[test]
    fn empty_object_means_waiting() {
        let log = InMemoryLog::new();
        assert_eq!(ingest("{}", &log), Outcome::Waiting);
        assert!(log.rows().is_empty());
    }

    #[test]
    fn non_object_body_means_waiting() {
        let log = InMemoryLog::new();
        assert_eq!(ingest("[1,2,3]", &log), Outcome::Waiting);
        assert_eq!(ingest("42", &log), Outcome::Waiting);
        assert_eq!(ingest("not json at all", &log), Outcome::Waiting);
        assert!(log.rows().is_empty());
    }

    #[test]
    fn comma_valued_field_round_trips() {
        let log = InMemoryLog::new();
        let outcome = ingest(
            r#"{"distance":12,"buttonZeroState":"a,b","buttonOneState":1,
                "buttonTwoState":0,"buttonThreeState":0}"#,
            &log,
        );

        assert_eq!(outcome, Outcome::Inserted);

        let rows = log.rows();
        let fields = decode_row(rows[0].trim_end_matches('\n'));
        assert_eq!(fields[1], "a,b");
    }

    #[test]
    fn duplicate_submissions_produce_independent_rows() {
        let log = InMemoryLog::new();
        let body = r#"{"distance":5,"buttonZeroState":0,"buttonOneState":0,
                       "buttonTwoState":0,"buttonThreeState":1}"#;

        assert_eq!(ingest(body, &log), Outcome::Inserted);
        assert_eq!(ingest(body, &log), Outcome::Inserted);
        assert_eq!(log.rows().len(), 2);
    }

    #[test]
    fn append_failure_surfaces_as_error() {
        let log = crate::storage::CsvFileLog::new("/nonexistent-dir/data.csv");
        let result = process(
            br#"{"distance":12,"buttonZeroState":0,"buttonOneState":1,
                 "buttonTwoState":0,"buttonThreeState":0}"#,
            &log,
        );

        assert!(matches!(result, Err(IngestError::Append(_))));
    }
}
