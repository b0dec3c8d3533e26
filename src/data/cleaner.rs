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
use crate::data::table::{Cell, Table, KEY_COLUMNS};

/// Spreadsheet exports and dataframe round trips leave these behind in place
/// of an empty cell.
const MISSING_ARTIFACTS: [&str; 3] = ["", "nan", "None"];

/// Trims the key columns and turns blank or placeholder values into the
/// missing marker. Other columns are left untouched. Running it twice
/// changes nothing.
pub fn clean_key_columns(table: &mut Table) {
	for column in KEY_COLUMNS {
		table.map_column(column, clean_cell);
	}
}

pub fn clean_cell(cell: Cell) -> Cell {
	let value = cell?;
	let trimmed = value.trim();
	if MISSING_ARTIFACTS.contains(&trimmed) {
		None
	} else if trimmed.len() == value.len() {
		Some(value)
	} else {
		Some(trimmed.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::table::{AC_TYPE, BRANCH_NAME, LOAN_TYPE};

	#[test]
	fn test_clean_cell() {
		assert_eq!(clean_cell(None), None);
		assert_eq!(clean_cell(Some("".into())), None);
		assert_eq!(clean_cell(Some("  nan ".into())), None);
		assert_eq!(clean_cell(Some("None".into())), None);
		assert_eq!(clean_cell(Some(" 10 ".into())), Some("10".into()));
		// only exact placeholders count
		assert_eq!(clean_cell(Some("NaN".into())), Some("NaN".into()));
		assert_eq!(clean_cell(Some("none".into())), Some("none".into()));
	}

	#[test]
	fn test_clean_key_columns_only() {
		let mut t = Table::new(vec![
			AC_TYPE.into(),
			LOAN_TYPE.into(),
			BRANCH_NAME.into(),
			"Remarks".into(),
		]);
		t.push_row(vec![
			Some(" 10".into()),
			Some("nan".into()),
			Some("Kathmandu  ".into()),
			Some("  ".into()),
		]);

		clean_key_columns(&mut t);
		assert_eq!(t.get(0, AC_TYPE), Some("10"));
		assert_eq!(t.get(0, LOAN_TYPE), None);
		assert_eq!(t.get(0, BRANCH_NAME), Some("Kathmandu"));
		assert_eq!(t.get(0, "Remarks"), Some("  "));

		let once = t.clone();
		clean_key_columns(&mut t);
		assert_eq!(t, once);
	}
}
