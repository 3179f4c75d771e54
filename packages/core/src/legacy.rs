//! Reader for the comma-delimited jobs file kept by the first releases.
//!
//! One job per line:
//! `id,order_date,deadline_date,status,customer_name,base64(description)`.
//! The stored id is not kept; imported jobs get fresh ids from the store.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;

use crate::{CustomerId, DATE_FORMAT, JobStatus, NewJob};

const CELLS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("legacy jobs line {line}: {reason}")]
pub struct LegacyError {
    pub line: usize,
    pub reason: String,
}

/// A job row as it was written in the text format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyJob {
    pub order_date: NaiveDate,
    pub deadline_date: NaiveDate,
    pub status: JobStatus,
    /// Customers were referenced by name, not id.
    pub customer_name: String,
    pub description: String,
}

impl LegacyJob {
    /// Turn the row into a create request once its customer is resolved.
    pub fn into_new_job(self, customer_id: Option<CustomerId>) -> NewJob {
        NewJob {
            order_date: Some(self.order_date),
            deadline_date: Some(self.deadline_date),
            status: Some(self.status),
            customer_id,
            description: Some(self.description),
        }
    }
}

/// Parse a whole legacy jobs file. Blank lines are skipped.
pub fn parse_legacy_jobs(text: &str) -> Result<Vec<LegacyJob>, LegacyError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_line(line).map_err(|reason| LegacyError { line: idx + 1, reason }))
        .collect()
}

fn parse_line(line: &str) -> Result<LegacyJob, String> {
    let cells: Vec<&str> = line.split(',').collect();
    if cells.len() != CELLS {
        return Err(format!("expected {CELLS} cells, found {}", cells.len()));
    }

    let description = STANDARD
        .decode(cells[5].trim())
        .map_err(|e| format!("description is not base64: {e}"))?;
    let description =
        String::from_utf8(description).map_err(|_| "description is not UTF-8".to_string())?;

    Ok(LegacyJob {
        order_date: parse_date(cells[1])?,
        deadline_date: parse_date(cells[2])?,
        status: JobStatus::from_label(cells[3]),
        customer_name: cells[4].trim().to_string(),
        description,
    })
}

fn parse_date(cell: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(cell.trim(), DATE_FORMAT)
        .map_err(|e| format!("bad date {cell:?}: {e}"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    #[test]
    fn parses_rows_and_decodes_descriptions() {
        let text = "#1,2023-01-10,2023-01-20,New ⭐️,Adelina,MTAgY2hhaXJz\n\
                    \n\
                    #2,2023-01-11,2023-02-01,Invoiced 🧾,,\n";
        let rows = parse_legacy_jobs(text).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].status, JobStatus::New);
        assert_eq!(rows[0].customer_name, "Adelina");
        assert_eq!(rows[0].description, "10 chairs");
        assert_eq!(
            rows[0].deadline_date,
            NaiveDate::from_ymd_opt(2023, 1, 20).unwrap()
        );

        assert_eq!(rows[1].status, JobStatus::Invoiced);
        assert!(rows[1].customer_name.is_empty());
        assert!(rows[1].description.is_empty());
    }

    #[test]
    fn errors_name_the_offending_line() {
        let text = "#1,2023-01-10,2023-01-20,New,Adelina,\n#2,2023-13-01,2023-01-20,New,Adelina,\n";
        let err = parse_legacy_jobs(text).unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.reason.contains("bad date"));

        let err = parse_legacy_jobs("#1,2023-01-10\n").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn rejects_descriptions_that_are_not_utf8() {
        // "//4=" decodes to 0xFF 0xFE.
        let text = "#1,2023-01-10,2023-01-20,New,Adelina,MTAgY2hhaXJz\n#2,2023-01-10,2023-01-20,New,Adelina,//4=\n";
        let err = parse_legacy_jobs(text).unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.reason, "description is not UTF-8");
    }

    #[test]
    fn converts_into_a_create_request() {
        let row = parse_legacy_jobs("#9,2023-05-01,2023-05-02,Completed & Shipped,Bob,\n")
            .unwrap()
            .remove(0);
        let customer = CustomerId::new();
        let draft = row.into_new_job(Some(customer));
        assert_eq!(draft.customer_id, Some(customer));
        assert_eq!(draft.status, Some(JobStatus::CompletedShipped));
    }
}
