//! CSV readers for the roster sheets.
//!
//! Columns are located by header name (see [`columns`](super::columns)), so
//! column order is irrelevant. Only the employee-ID column is required; any
//! other missing column reads as empty.

use std::io::Read;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    DataQualityWarning, EmployeeRecord, OptionalDate, OrgPath, TransferEvent, TransferLabel,
    WarningCode,
};

use super::columns::{self, Column};

/// A fee sheet as read from CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeSheet {
    /// Rows that were read successfully, in sheet order.
    pub records: Vec<EmployeeRecord>,
    /// Rows that could not be read, one warning each.
    pub rejected: Vec<DataQualityWarning>,
}

/// Reads the active-employee roster.
///
/// # Errors
///
/// Fails with [`EngineError::MissingColumn`] if there is no employee-ID column
/// and [`EngineError::InvalidDateCell`] on the first malformed date.
pub fn read_active_roster(input: impl Read) -> EngineResult<Vec<EmployeeRecord>> {
    read_records(input, "active roster", RecordLayout::ROSTER)
}

/// Reads the resigned-employee roster.
///
/// The leave date may appear as "last working day" and organization level 4
/// as "department".
///
/// # Errors
///
/// As [`read_active_roster`].
pub fn read_resigned_roster(input: impl Read) -> EngineResult<Vec<EmployeeRecord>> {
    read_records(input, "resigned roster", RecordLayout::RESIGNED)
}

/// Reads the organization transfer log.
///
/// # Errors
///
/// Fails with [`EngineError::MissingColumn`] if there is no employee-ID column
/// and [`EngineError::InvalidDateCell`] on the first malformed or missing
/// transfer date.
pub fn read_transfer_log(input: impl Read) -> EngineResult<Vec<TransferEvent>> {
    let source = "transfer log";
    let mut reader = csv_reader(input);
    let headers = reader.headers()?.clone();

    let employee_id = required(&headers, columns::EMPLOYEE_ID, source)?;
    let name = columns::NAME.locate(&headers);
    let hire_date = columns::HIRE_DATE.locate(&headers);
    let transfer_date = columns::TRANSFER_DATE.locate(&headers);
    let before = OrgColumns::locate(
        &headers,
        [
            columns::BEFORE_LEVEL_1,
            columns::BEFORE_LEVEL_2,
            columns::BEFORE_LEVEL_3,
            columns::BEFORE_LEVEL_4,
        ],
    );
    let after = OrgColumns::locate(
        &headers,
        [
            columns::AFTER_LEVEL_1,
            columns::AFTER_LEVEL_2,
            columns::AFTER_LEVEL_3,
            columns::AFTER_LEVEL_4,
        ],
    );

    let mut events = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = Row::new(&record);

        let date = row
            .date(transfer_date, columns::TRANSFER_DATE)?
            .get()
            .ok_or_else(|| EngineError::InvalidDateCell {
                column: columns::TRANSFER_DATE.name.to_string(),
                line: row.line,
                value: row.text(transfer_date),
            })?;

        events.push(TransferEvent {
            employee_id: row.text(Some(employee_id)),
            name: row.text(name),
            hire_date: row.date(hire_date, columns::HIRE_DATE)?,
            transfer_date: date,
            before: before.read(&row),
            after: after.read(&row),
        });
    }

    debug!(source, rows = events.len(), "Read transfer log");
    Ok(events)
}

/// Reads a fee sheet.
///
/// Unlike the roster readers, a malformed date only rejects its own row; the
/// remaining rows are still returned.
///
/// # Errors
///
/// Fails with [`EngineError::MissingColumn`] if there is no employee-ID column,
/// or if the CSV itself is unreadable.
pub fn read_fee_sheet(input: impl Read) -> EngineResult<FeeSheet> {
    let source = "fee sheet";
    let mut reader = csv_reader(input);
    let headers = reader.headers()?.clone();
    let layout = RecordLayout::ROSTER.locate(&headers, source)?;

    let mut sheet = FeeSheet::default();
    for record in reader.records() {
        let record = record?;
        let row = Row::new(&record);
        match layout.read(&row) {
            Ok(employee) => sheet.records.push(employee),
            Err(err) => {
                let employee_id = row.text(Some(layout.employee_id));
                warn!(line = row.line, employee_id = %employee_id, error = %err, "Rejected fee-sheet row");
                sheet.rejected.push(
                    DataQualityWarning::new(WarningCode::RejectedRow, employee_id, err.to_string())
                        .at_line(row.line),
                );
            }
        }
    }

    debug!(
        source,
        rows = sheet.records.len(),
        rejected = sheet.rejected.len(),
        "Read fee sheet"
    );
    Ok(sheet)
}

fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input)
}

fn required(headers: &StringRecord, column: Column, source: &str) -> EngineResult<usize> {
    column.locate(headers).ok_or_else(|| EngineError::MissingColumn {
        column: column.name.to_string(),
        source_name: source.to_string(),
    })
}

fn read_records(
    input: impl Read,
    source: &str,
    layout: RecordLayout,
) -> EngineResult<Vec<EmployeeRecord>> {
    let mut reader = csv_reader(input);
    let headers = reader.headers()?.clone();
    let located = layout.locate(&headers, source)?;

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(located.read(&Row::new(&record))?);
    }

    debug!(source, rows = records.len(), "Read roster");
    Ok(records)
}

/// A data row together with its source line.
struct Row<'a> {
    record: &'a StringRecord,
    line: u64,
}

impl<'a> Row<'a> {
    fn new(record: &'a StringRecord) -> Self {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        Self { record, line }
    }

    fn text(&self, index: Option<usize>) -> String {
        index
            .and_then(|i| self.record.get(i))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }

    fn date(&self, index: Option<usize>, column: Column) -> EngineResult<OptionalDate> {
        let value = self.text(index);
        OptionalDate::parse(&value).map_err(|_| EngineError::InvalidDateCell {
            column: column.name.to_string(),
            line: self.line,
            value,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct OrgColumns([Option<usize>; 4]);

impl OrgColumns {
    fn locate(headers: &StringRecord, levels: [Column; 4]) -> Self {
        Self(levels.map(|column| column.locate(headers)))
    }

    fn read(&self, row: &Row<'_>) -> OrgPath {
        let [l1, l2, l3, l4] = self.0.map(|index| row.text(index));
        OrgPath::new(l1, l2, l3, l4)
    }
}

/// Which header names an [`EmployeeRecord`] sheet uses.
#[derive(Debug, Clone, Copy)]
struct RecordLayout {
    leave_date: Column,
    org_level_4: Column,
}

impl RecordLayout {
    const ROSTER: Self = Self {
        leave_date: columns::LEAVE_DATE,
        org_level_4: columns::ORG_LEVEL_4,
    };

    const RESIGNED: Self = Self {
        leave_date: columns::RESIGNED_LEAVE_DATE,
        org_level_4: columns::RESIGNED_ORG_LEVEL_4,
    };

    fn locate(self, headers: &StringRecord, source: &str) -> EngineResult<LocatedRecord> {
        Ok(LocatedRecord {
            employee_id: required(headers, columns::EMPLOYEE_ID, source)?,
            name: columns::NAME.locate(headers),
            org: OrgColumns::locate(
                headers,
                [
                    columns::ORG_LEVEL_1,
                    columns::ORG_LEVEL_2,
                    columns::ORG_LEVEL_3,
                    self.org_level_4,
                ],
            ),
            hire_date: columns::HIRE_DATE.locate(headers),
            leave_date: self.leave_date.locate(headers),
            transfer_out_date: columns::TRANSFER_OUT_DATE.locate(headers),
            transfer_in_date: columns::TRANSFER_IN_DATE.locate(headers),
            cross_org_transfer: columns::CROSS_ORG_TRANSFER.locate(headers),
        })
    }
}

/// Column indices resolved against a concrete header row.
#[derive(Debug, Clone, Copy)]
struct LocatedRecord {
    employee_id: usize,
    name: Option<usize>,
    org: OrgColumns,
    hire_date: Option<usize>,
    leave_date: Option<usize>,
    transfer_out_date: Option<usize>,
    transfer_in_date: Option<usize>,
    cross_org_transfer: Option<usize>,
}

impl LocatedRecord {
    fn read(&self, row: &Row<'_>) -> EngineResult<EmployeeRecord> {
        Ok(EmployeeRecord {
            employee_id: row.text(Some(self.employee_id)),
            name: row.text(self.name),
            org_path: self.org.read(row),
            hire_date: row.date(self.hire_date, columns::HIRE_DATE)?,
            leave_date: row.date(self.leave_date, columns::LEAVE_DATE)?,
            transfer_out_date: row.date(self.transfer_out_date, columns::TRANSFER_OUT_DATE)?,
            transfer_in_date: row.date(self.transfer_in_date, columns::TRANSFER_IN_DATE)?,
            cross_org_transfer: TransferLabel::from_export(&row.text(self.cross_org_transfer)),
        })
    }
}
