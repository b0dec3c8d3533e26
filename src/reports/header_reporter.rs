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
use crate::data::columns::{plan_headers, TableKind};
use crate::data::table::Table;
use crate::reports::table::TextTable;

/// Shows how each input's headers will be read, which helps when a sheet
/// uses a spelling the mapper does not recognize.
pub struct HeaderReporter<'a> {
	tables: Vec<(TableKind, &'a Table)>,
}

impl<'a> HeaderReporter<'a> {
	pub fn new(tables: Vec<(TableKind, &'a Table)>) -> Self {
		Self { tables }
	}

	pub fn print(&self) {
		for (kind, table) in &self.tables {
			println!("{}", kind);
			self.table_for(*kind, table).print();
			println!();
		}
	}

	/// One line per original header: the canonical name it is read as, if
	/// renamed, and whether the column is dropped as a duplicate.
	fn table_for(&self, kind: TableKind, table: &Table) -> TextTable {
		let mut out = TextTable::new(vec!["Header", "Read as", "Note"]);
		let plan = plan_headers(kind, table.headers());
		for (header, planned) in table.headers().iter().zip(&plan) {
			let read_as = planned.renamed.then_some(planned.name.as_str());
			let note = (!planned.kept).then_some("dropped, duplicate");
			out.add_row(vec![Some(header.as_str()), read_as, note]);
		}
		out
	}
}
