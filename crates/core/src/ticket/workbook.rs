//! Spreadsheet codec for the backing file.
//!
//! Reading goes through `calamine`, writing through `rust_xlsxwriter`. Only the
//! first worksheet is used. On read, columns are located by their header
//! label so a reordered or widened sheet still loads; on write, the six
//! columns are always emitted in [`Column::ALL`] order.

use std::io::Write;
use std::path::Path;

use calamine::{open_workbook, Data, Range, Reader, Xlsx, XlsxError as ReadError};
use rust_xlsxwriter::{Format, Workbook, XlsxError as WriteError};
use tempfile::NamedTempFile;
use thiserror::Error;

use super::{Column, Ticket, TicketNumber};

/// Name of the worksheet written on save.
pub const SHEET_NAME: &str = "Sheet1";

/// Errors reading or writing the backing file.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// The file is not a readable xlsx workbook.
    #[error("Failed to read workbook: {0}")]
    Read(#[from] ReadError),

    /// The workbook contains no worksheet.
    #[error("Workbook has no worksheet")]
    NoWorksheet,

    /// The first row does not carry a required header label.
    #[error("Missing column '{0}' in header row")]
    MissingColumn(Column),

    /// The workbook could not be encoded.
    #[error("Failed to write workbook: {0}")]
    Write(#[from] WriteError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read every ticket row from the workbook at `path`.
pub fn read_tickets(path: &Path) -> Result<Vec<Ticket>, WorkbookError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(WorkbookError::NoWorksheet)??;
    decode_range(&range)
}

/// Decode a worksheet range whose first row is the header row.
fn decode_range(range: &Range<Data>) -> Result<Vec<Ticket>, WorkbookError> {
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or(WorkbookError::MissingColumn(Column::Number))?;
    let positions = locate_columns(header)?;

    let tickets = rows
        .filter(|row| {
            positions
                .iter()
                .any(|&idx| !matches!(row.get(idx), None | Some(Data::Empty)))
        })
        .map(|row| {
            let text = |column: Column| {
                row.get(positions[column as usize])
                    .map(cell_text)
                    .unwrap_or_default()
            };
            Ticket {
                number: row
                    .get(positions[Column::Number as usize])
                    .map(cell_number)
                    .unwrap_or(TicketNumber::Blank),
                name: text(Column::Name),
                program: text(Column::Program),
                description: text(Column::Description),
                status: text(Column::Status),
                priority: text(Column::Priority),
            }
        })
        .collect();

    Ok(tickets)
}

/// Index of each column in the header row, in [`Column::ALL`] order.
fn locate_columns(header: &[Data]) -> Result<[usize; 6], WorkbookError> {
    let mut positions = [0usize; 6];
    for column in Column::ALL {
        positions[column as usize] = header
            .iter()
            .position(|cell| cell_text(cell).trim() == column.header())
            .ok_or(WorkbookError::MissingColumn(column))?;
    }
    Ok(positions)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        other => other.to_string(),
    }
}

fn cell_number(cell: &Data) -> TicketNumber {
    match cell {
        Data::Int(i) if *i > 0 => TicketNumber::Assigned(*i as u64),
        Data::Float(f) if f.fract() == 0.0 && *f >= 1.0 && *f < u64::MAX as f64 => {
            TicketNumber::Assigned(*f as u64)
        }
        Data::Empty => TicketNumber::Blank,
        Data::String(s) => TicketNumber::parse(s),
        other => TicketNumber::Malformed(cell_text(other)),
    }
}

/// Integral floats are rendered without a trailing `.0`.
fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Encode `tickets` as a complete xlsx workbook.
pub fn encode(tickets: &[Ticket]) -> Result<Vec<u8>, WorkbookError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, column) in Column::ALL.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, column.header(), &header_format)?;
    }

    for (idx, ticket) in tickets.iter().enumerate() {
        let row = (idx + 1) as u32;
        match &ticket.number {
            TicketNumber::Assigned(n) => {
                worksheet.write_number(row, 0, *n as f64)?;
            }
            TicketNumber::Blank => {}
            TicketNumber::Malformed(raw) => {
                worksheet.write_string(row, 0, raw.as_str())?;
            }
        }
        for (col, column) in Column::ALL.iter().enumerate().skip(1) {
            worksheet.write_string(row, col as u16, ticket.value(*column).as_ref())?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Replace the file at `path` with a workbook holding `tickets`.
///
/// The workbook is written to a temporary file next to `path` and renamed
/// over it, so the target is either the old file or the complete new one.
pub fn write_tickets(path: &Path, tickets: &[Ticket]) -> Result<(), WorkbookError> {
    let buffer = encode(tickets)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(&buffer)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    Ok(())
}
