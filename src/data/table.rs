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

/// Canonical account-type column; the join key between the disbursement
/// table and both references.
pub const AC_TYPE: &str = "AcType";

/// Canonical loan type column, the attribute being filled in.
pub const LOAN_TYPE: &str = "Loan Type";

/// Canonical branch column, only consulted to break ties.
pub const BRANCH_NAME: &str = "BranchName";

/// The columns whose values are trimmed and compared by the resolver.
pub const KEY_COLUMNS: [&str; 3] = [AC_TYPE, LOAN_TYPE, BRANCH_NAME];

/// `None` is the missing marker.
pub type Cell = Option<String>;

pub type Row = Vec<Cell>;

/// A rectangular sheet of string cells with named columns. Every row has
/// exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
	headers: Vec<String>,
	rows: Vec<Row>,
}

impl Table {
	pub fn new(headers: Vec<String>) -> Self {
		Self {
			headers,
			rows: Vec::new(),
		}
	}

	/// Adds a row, padding it with missing cells or cutting it down so it
	/// matches the header width.
	pub fn push_row(&mut self, mut row: Row) {
		row.resize(self.headers.len(), None);
		self.rows.push(row);
	}

	pub fn headers(&self) -> &[String] {
		&self.headers
	}

	pub fn rows(&self) -> &[Row] {
		&self.rows
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn column_index(&self, name: &str) -> Option<usize> {
		self.headers.iter().position(|h| h == name)
	}

	/// Value of the named column in the given row, or None if either the
	/// column is absent or the cell is missing.
	pub fn get(&self, row: usize, name: &str) -> Option<&str> {
		let col = self.column_index(name)?;
		self.rows.get(row)?.get(col)?.as_deref()
	}

	/// Sets a cell, appending the column first if the table lacks it.
	pub fn set(&mut self, row: usize, name: &str, value: Cell) {
		let col = self.ensure_column(name);
		if let Some(r) = self.rows.get_mut(row) {
			r[col] = value;
		}
	}

	/// Returns the index of the named column, appending an all-missing
	/// column at the end when there is none.
	pub fn ensure_column(&mut self, name: &str) -> usize {
		if let Some(i) = self.column_index(name) {
			return i;
		}

		self.headers.push(name.to_string());
		for row in &mut self.rows {
			row.push(None);
		}
		self.headers.len() - 1
	}

	pub fn retain_rows<F>(&mut self, mut keep: F)
	where
		F: FnMut(&Row) -> bool,
	{
		self.rows.retain(|r| keep(r));
	}

	/// A new table with the same headers holding clones of the rows that
	/// satisfy the predicate, in their original order.
	pub fn filtered<F>(&self, mut keep: F) -> Table
	where
		F: FnMut(&Row) -> bool,
	{
		Table {
			headers: self.headers.clone(),
			rows: self.rows.iter().filter(|&r| keep(r)).cloned().collect(),
		}
	}

	/// Replaces the header row while keeping only the listed column indices,
	/// in the order given. Used by the normalizer.
	pub(crate) fn reshape(&mut self, headers: Vec<String>, keep: &[usize]) {
		self.rows = self
			.rows
			.drain(..)
			.map(|r| keep.iter().map(|&i| r[i].clone()).collect())
			.collect();
		self.headers = headers;
	}

	/// Applies the function to every cell of the named column. Does nothing
	/// when the column is absent.
	pub(crate) fn map_column<F>(&mut self, name: &str, f: F)
	where
		F: Fn(Cell) -> Cell,
	{
		if let Some(col) = self.column_index(name) {
			for row in &mut self.rows {
				row[col] = f(row[col].take());
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Table {
		let mut t = Table::new(vec!["AcType".into(), "Amount".into()]);
		t.push_row(vec![Some("10".into()), Some("500".into())]);
		t.push_row(vec![Some("4Z".into())]);
		t
	}

	#[test]
	fn test_push_row_pads_and_truncates() {
		let mut t = sample();
		t.push_row(vec![Some("a".into()), None, Some("extra".into())]);
		assert_eq!(t.rows()[1], vec![Some("4Z".to_string()), None]);
		assert_eq!(t.rows()[2].len(), 2);
	}

	#[test]
	fn test_get_and_set() {
		let mut t = sample();
		assert_eq!(t.get(0, "AcType"), Some("10"));
		assert_eq!(t.get(1, "Amount"), None);
		assert_eq!(t.get(0, "Missing"), None);
		assert_eq!(t.get(9, "AcType"), None);

		t.set(0, LOAN_TYPE, Some("Term Loan".into()));
		assert_eq!(t.headers().len(), 3);
		assert_eq!(t.get(0, LOAN_TYPE), Some("Term Loan"));
		assert_eq!(t.get(1, LOAN_TYPE), None);
	}

	#[test]
	fn test_ensure_column_is_stable() {
		let mut t = sample();
		assert_eq!(t.ensure_column("Amount"), 1);
		assert_eq!(t.ensure_column("New"), 2);
		assert_eq!(t.ensure_column("New"), 2);
		assert!(t.rows().iter().all(|r| r.len() == 3));
	}

	#[test]
	fn test_filtered_preserves_order() {
		let mut t = sample();
		t.push_row(vec![Some("11".into()), None]);
		let f = t.filtered(|r| r[1].is_none());
		assert_eq!(f.len(), 2);
		assert_eq!(f.rows()[0][0].as_deref(), Some("4Z"));
		assert_eq!(f.rows()[1][0].as_deref(), Some("11"));
	}
}
