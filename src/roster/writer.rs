//! CSV writers for reconciled periods and computed fee sheets.

use std::io::Write;

use crate::error::EngineResult;
use crate::models::{EmployeeRecord, FeeLine, ReconciledPeriod};

use super::columns::{self, RECORD_COLUMNS};

/// Writes reconciled periods with canonical headers. Absent dates are written
/// as empty cells.
///
/// # Errors
///
/// Returns [`EngineError::Csv`](crate::error::EngineError::Csv) if the
/// underlying writer fails.
pub fn write_periods<'a>(
    periods: impl IntoIterator<Item = &'a ReconciledPeriod>,
    output: impl Write,
) -> EngineResult<()> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(RECORD_COLUMNS.iter().map(|c| c.name))?;

    for period in periods {
        let record = EmployeeRecord::from(period.clone());
        writer.write_record(record_cells(&record))?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes computed fee lines: the record columns followed by months, amount
/// and status.
///
/// # Errors
///
/// Returns [`EngineError::Csv`](crate::error::EngineError::Csv) if the
/// underlying writer fails.
pub fn write_fee_lines(lines: &[FeeLine], output: impl Write) -> EngineResult<()> {
    let mut writer = csv::Writer::from_writer(output);
    let headers = RECORD_COLUMNS
        .iter()
        .chain([columns::MONTHS, columns::AMOUNT, columns::STATUS].iter())
        .map(|c| c.name);
    writer.write_record(headers)?;

    for line in lines {
        let mut cells = record_cells(&line.record);
        cells.push(line.months.normalize().to_string());
        cells.push(format!("{:.2}", line.amount));
        cells.push(line.status.as_str().to_string());
        writer.write_record(&cells)?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn record_cells(record: &EmployeeRecord) -> Vec<String> {
    let [l1, l2, l3, l4] = record.org_path.levels();
    vec![
        record.name.clone(),
        record.employee_id.clone(),
        l1.to_string(),
        l2.to_string(),
        l3.to_string(),
        l4.to_string(),
        record.hire_date.to_string(),
        record.leave_date.to_string(),
        record.transfer_out_date.to_string(),
        record.transfer_in_date.to_string(),
        record.cross_org_transfer.as_str().to_string(),
    ]
}
