/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::data::table::{Cell, Table};
use crate::errors::MapperError;
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::Path;
use tracing::info;

/// Sheet holding the full mapped table in written workbooks.
pub const MAPPED_SHEET: &str = "Mapped_Data";

/// Optional second sheet holding only the rows left without a loan type.
pub const UNMATCHED_SHEET: &str = "Unmatched";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
	/// Any spreadsheet calamine can open. Only xlsx is ever written.
	Spreadsheet,
	Csv,
}

impl Format {
	/// Formats that can be read: every spreadsheet calamine supports, and
	/// CSV.
	pub fn for_input(path: &Path) -> Result<Self, MapperError> {
		match extension(path).as_str() {
			"xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Format::Spreadsheet),
			"csv" => Ok(Format::Csv),
			_ => Err(MapperError::UnsupportedFormat(path.to_path_buf())),
		}
	}

	/// Formats that can be written: xlsx and CSV.
	pub fn for_output(path: &Path) -> Result<Self, MapperError> {
		match extension(path).as_str() {
			"xlsx" => Ok(Format::Spreadsheet),
			"csv" => Ok(Format::Csv),
			_ => Err(MapperError::UnsupportedFormat(path.to_path_buf())),
		}
	}
}

fn extension(path: &Path) -> String {
	path.extension()
		.and_then(|e| e.to_str())
		.map(|e| e.to_lowercase())
		.unwrap_or_default()
}

/// A named table to be written as one sheet.
pub struct SheetView<'a> {
	pub name: &'a str,
	pub table: &'a Table,
}

/// Reads a table from a spreadsheet or CSV file. The first row holds the
/// headers. For spreadsheets, `sheet` selects a sheet by name and defaults
/// to the first one; CSV files ignore it.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table, MapperError> {
	let table = match Format::for_input(path)? {
		Format::Spreadsheet => read_spreadsheet(path, sheet)?,
		Format::Csv => read_csv(path)?,
	};

	info!(
		"read {} rows and {} columns from {}",
		table.len(),
		table.headers().len(),
		path.display()
	);
	Ok(table)
}

fn read_spreadsheet(path: &Path, sheet: Option<&str>) -> Result<Table, MapperError> {
	let mut workbook =
		open_workbook_auto(path).map_err(|e| MapperError::input(path, e))?;

	let range = match sheet {
		Some(name) => {
			if !workbook.sheet_names().iter().any(|s| s == name) {
				return Err(MapperError::SheetNotFound {
					path: path.to_path_buf(),
					sheet: name.to_string(),
				});
			}
			workbook
				.worksheet_range(name)
				.map_err(|e| MapperError::input(path, e))?
		},
		None => workbook
			.worksheet_range_at(0)
			.ok_or_else(|| MapperError::input(path, "workbook has no sheets"))?
			.map_err(|e| MapperError::input(path, e))?,
	};

	let mut rows = range.rows();
	let headers = match rows.next() {
		Some(r) => header_names(r.iter().map(cell_to_string)),
		None => return Ok(Table::default()),
	};

	let mut table = Table::new(headers);
	for row in rows {
		table.push_row(row.iter().map(cell_to_string).collect());
	}

	Ok(table)
}

fn read_csv(path: &Path) -> Result<Table, MapperError> {
	let mut reader = csv::ReaderBuilder::new()
		.has_headers(true)
		.flexible(true)
		.from_path(path)
		.map_err(|e| MapperError::input(path, e))?;

	let headers = reader
		.headers()
		.map_err(|e| MapperError::input(path, e))?
		.iter()
		.map(|h| non_empty(h.to_string()))
		.collect::<Vec<_>>();

	let mut table = Table::new(header_names(headers.into_iter()));
	for record in reader.records() {
		let record = record.map_err(|e| MapperError::input(path, e))?;
		table.push_row(record.iter().map(|v| non_empty(v.to_string())).collect());
	}

	Ok(table)
}

/// Blank header cells get positional names so every column stays
/// addressable.
fn header_names(cells: impl Iterator<Item = Cell>) -> Vec<String> {
	cells
		.enumerate()
		.map(|(i, c)| c.unwrap_or_else(|| format!("Unnamed: {}", i)))
		.collect()
}

fn non_empty(s: String) -> Cell {
	if s.is_empty() {
		None
	} else {
		Some(s)
	}
}

/// Every cell reaches the mapper as text. Whole numbers lose their ".0" so
/// an account type typed as 10 still reads "10".
fn cell_to_string(cell: &Data) -> Cell {
	match cell {
		Data::Empty => None,
		Data::String(s) => non_empty(s.clone()),
		Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => {
			Some(format!("{}", *f as i64))
		},
		Data::Float(f) => Some(f.to_string()),
		Data::Int(i) => Some(i.to_string()),
		Data::Bool(b) => Some(b.to_string()),
		other => non_empty(other.to_string()),
	}
}

/// Serializes the views completely in memory and then writes them to
/// `path` in one go, so a failure leaves no partial file behind. CSV output
/// only carries the first view.
pub fn write_table(path: &Path, views: &[SheetView]) -> Result<(), MapperError> {
	let bytes = match Format::for_output(path)? {
		Format::Spreadsheet => xlsx_bytes(views),
		Format::Csv => csv_bytes(views),
	}
	.map_err(|e| MapperError::output(path, e))?;

	fs::write(path, bytes).map_err(|e| MapperError::output(path, e))?;
	info!("wrote {}", path.display());
	Ok(())
}

fn xlsx_bytes(views: &[SheetView]) -> Result<Vec<u8>, String> {
	let mut workbook = Workbook::new();

	for view in views {
		let sheet = workbook.add_worksheet();
		sheet.set_name(view.name).map_err(|e| e.to_string())?;

		for (c, header) in view.table.headers().iter().enumerate() {
			let col = u16::try_from(c).map_err(|_| "too many columns")?;
			sheet.write_string(0, col, header).map_err(|e| e.to_string())?;
		}

		for (r, row) in view.table.rows().iter().enumerate() {
			let row_num = u32::try_from(r + 1).map_err(|_| "too many rows")?;
			for (c, cell) in row.iter().enumerate() {
				if let Some(value) = cell {
					let col = u16::try_from(c).map_err(|_| "too many columns")?;
					sheet
						.write_string(row_num, col, value)
						.map_err(|e| e.to_string())?;
				}
			}
		}
	}

	workbook.save_to_buffer().map_err(|e| e.to_string())
}

fn csv_bytes(views: &[SheetView]) -> Result<Vec<u8>, String> {
	let view = views.first().ok_or("nothing to write")?;
	let mut writer = csv::Writer::from_writer(vec![]);

	writer
		.write_record(view.table.headers())
		.map_err(|e| e.to_string())?;
	for row in view.table.rows() {
		writer
			.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))
			.map_err(|e| e.to_string())?;
	}

	writer.into_inner().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::table::{AC_TYPE, LOAN_TYPE};
	use tempfile::tempdir;

	fn sample() -> Table {
		let mut t = Table::new(vec![AC_TYPE.into(), LOAN_TYPE.into()]);
		t.push_row(vec![Some("10".into()), Some("Term Loan".into())]);
		t.push_row(vec![Some("11".into()), None]);
		t
	}

	#[test]
	fn test_input_formats() {
		assert_eq!(
			Format::for_input(Path::new("a/Duelist.XLSX")).unwrap(),
			Format::Spreadsheet
		);
		assert_eq!(
			Format::for_input(Path::new("ytd.ods")).unwrap(),
			Format::Spreadsheet
		);
		assert_eq!(Format::for_input(Path::new("a.csv")).unwrap(), Format::Csv);
		assert!(Format::for_input(Path::new("a.txt")).is_err());
		assert!(Format::for_input(Path::new("noext")).is_err());
	}

	#[test]
	fn test_output_formats() {
		assert_eq!(
			Format::for_output(Path::new("out.XLSX")).unwrap(),
			Format::Spreadsheet
		);
		assert_eq!(Format::for_output(Path::new("out.csv")).unwrap(), Format::Csv);
		for name in ["out.ods", "out.xls", "out.xlsb", "out.xlsm", "out.txt"] {
			assert!(matches!(
				Format::for_output(Path::new(name)),
				Err(MapperError::UnsupportedFormat(_))
			));
		}
	}

	#[test]
	fn test_only_xlsx_spreadsheets_are_written() {
		let dir = tempdir().unwrap();
		let table = sample();

		for name in ["out.ods", "out.xls", "out.xlsb"] {
			let path = dir.path().join(name);
			let result = write_table(
				&path,
				&[SheetView {
					name: MAPPED_SHEET,
					table: &table,
				}],
			);
			assert!(matches!(result, Err(MapperError::UnsupportedFormat(_))));
			assert!(!path.exists());
		}
	}

	#[test]
	fn test_cell_to_string() {
		assert_eq!(cell_to_string(&Data::Empty), None);
		assert_eq!(cell_to_string(&Data::Float(10.0)), Some("10".into()));
		assert_eq!(cell_to_string(&Data::Float(2.5)), Some("2.5".into()));
		assert_eq!(cell_to_string(&Data::Int(7)), Some("7".into()));
		assert_eq!(cell_to_string(&Data::String("".into())), None);
		assert_eq!(
			cell_to_string(&Data::String(" 4Z".into())),
			Some(" 4Z".into())
		);
	}

	#[test]
	fn test_csv_read_blank_cells_and_headers() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("in.csv");
		fs::write(&path, "Ac Type,,Loan Type\n10,x,\n11\n").unwrap();

		let t = read_table(&path, Some("ignored")).unwrap();
		assert_eq!(t.headers(), &["Ac Type", "Unnamed: 1", "Loan Type"]);
		assert_eq!(t.len(), 2);
		assert_eq!(t.get(0, "Loan Type"), None);
		assert_eq!(t.get(1, "Ac Type"), Some("11"));
	}

	#[test]
	fn test_csv_output_is_first_view() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("out.csv");
		let table = sample();
		let unmatched = table.filtered(|r| r[1].is_none());

		write_table(
			&path,
			&[
				SheetView {
					name: MAPPED_SHEET,
					table: &table,
				},
				SheetView {
					name: UNMATCHED_SHEET,
					table: &unmatched,
				},
			],
		)
		.unwrap();

		let written = fs::read_to_string(&path).unwrap();
		assert_eq!(written, "AcType,Loan Type\n10,Term Loan\n11,\n");
	}

	#[test]
	fn test_xlsx_sheets_by_name() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("out.xlsx");
		let table = sample();
		let unmatched = table.filtered(|r| r[1].is_none());

		write_table(
			&path,
			&[
				SheetView {
					name: MAPPED_SHEET,
					table: &table,
				},
				SheetView {
					name: UNMATCHED_SHEET,
					table: &unmatched,
				},
			],
		)
		.unwrap();

		assert_eq!(read_table(&path, None).unwrap(), table);
		assert_eq!(read_table(&path, Some(UNMATCHED_SHEET)).unwrap(), unmatched);
		assert!(matches!(
			read_table(&path, Some("YTD")),
			Err(MapperError::SheetNotFound { .. })
		));
	}

	#[test]
	fn test_unreadable_input() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("broken.xlsx");
		fs::write(&path, "not a workbook").unwrap();
		assert!(matches!(
			read_table(&path, None),
			Err(MapperError::InputRead { .. })
		));
	}

	#[test]
	fn test_failed_write_leaves_nothing() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("missing_dir").join("out.csv");
		let table = sample();
		let result = write_table(
			&path,
			&[SheetView {
				name: MAPPED_SHEET,
				table: &table,
			}],
		);
		assert!(matches!(result, Err(MapperError::OutputWrite { .. })));
		assert!(!path.exists());
	}
}
