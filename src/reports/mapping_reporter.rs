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
use crate::data::table::{Table, LOAN_TYPE};
use crate::mapping::mapper::{MappingResult, PassStats};
use crate::reports::table::TextTable;
use anyhow::Error;
use serde::Serialize;

/// Counts shown to the user after a run, also available as JSON.
#[derive(Debug, Serialize)]
pub struct Summary {
	pub rows_read: usize,
	pub rows_excluded: usize,
	pub rows_written: usize,
	pub already_set: usize,
	pub mapped_from_main: usize,
	pub mapped_from_ytd: usize,
	pub ambiguous: usize,
	pub unmatched: usize,
}

/// Splits a mapped disbursement table into its full and unmatched views.
/// Both keep the original row order.
pub struct MappingReporter {
	mapped: Table,
	unmatched: Table,
	stats: PassStats,
}

impl MappingReporter {
	pub fn new(result: MappingResult) -> Self {
		let unmatched = match result.table.column_index(LOAN_TYPE) {
			Some(col) => result.table.filtered(|r| r[col].is_none()),
			None => result.table.clone(),
		};

		Self {
			mapped: result.table,
			unmatched,
			stats: result.stats,
		}
	}

	/// Every surviving row, with loan types filled in where possible.
	pub fn mapped(&self) -> &Table {
		&self.mapped
	}

	/// The rows whose loan type is still missing.
	pub fn unmatched(&self) -> &Table {
		&self.unmatched
	}

	pub fn unmatched_count(&self) -> usize {
		self.unmatched.len()
	}

	pub fn summary(&self) -> Summary {
		Summary {
			rows_read: self.stats.input_rows,
			rows_excluded: self.stats.excluded_rows,
			rows_written: self.mapped.len(),
			already_set: self.stats.prefilled,
			mapped_from_main: self.stats.resolved_from_main,
			mapped_from_ytd: self.stats.resolved_from_ytd,
			ambiguous: self.stats.ambiguous,
			unmatched: self.unmatched_count(),
		}
	}

	pub fn print_summary(&self, json: bool) -> Result<(), Error> {
		let summary = self.summary();
		if json {
			println!("{}", serde_json::to_string_pretty(&summary)?);
			return Ok(());
		}

		let mut table = TextTable::new(vec!["", "Rows"]);
		table.right_align(vec![1]);
		for (label, count) in [
			("Read", summary.rows_read),
			("Excluded", summary.rows_excluded),
			("Already set", summary.already_set),
			("Mapped from main", summary.mapped_from_main),
			("Mapped from YTD", summary.mapped_from_ytd),
			("Ambiguous", summary.ambiguous),
		] {
			table.add_row(vec![Some(label), Some(count.to_string().as_str())]);
		}
		table.print();

		// always reported, even when zero
		println!("Unmatched rows: {}", summary.unmatched);
		Ok(())
	}

	/// Prints the unmatched rows, or the first `limit` of them.
	pub fn print_unmatched(&self, limit: Option<usize>) {
		if self.unmatched.is_empty() {
			return;
		}

		let headers = self.unmatched.headers();
		let mut table =
			TextTable::new(headers.iter().map(|h| h.as_str()).collect());
		let limit = limit.unwrap_or(usize::MAX);
		for row in self.unmatched.rows().iter().take(limit) {
			table.add_row(row.iter().map(|c| c.as_deref()).collect());
		}

		println!();
		table.print();
		if self.unmatched.len() > limit {
			println!("... {} more", self.unmatched.len() - limit);
		}
	}
}
