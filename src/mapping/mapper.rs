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
use crate::data::cleaner::clean_key_columns;
use crate::data::columns::{normalize_headers, TableKind};
use crate::data::table::{Table, AC_TYPE, BRANCH_NAME, LOAN_TYPE};
use crate::mapping::resolver::{Resolution, ReferenceTable};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

pub const DEFAULT_EXCLUDED_AC_TYPES: [&str; 1] = ["4Z"];

/// Business rules applied before any lookups happen.
#[derive(Debug, Clone)]
pub struct MappingRules {
	/// Disbursement rows with one of these account types are dropped
	/// entirely and never reported.
	pub excluded_ac_types: Vec<String>,
}

impl Default for MappingRules {
	fn default() -> Self {
		Self {
			excluded_ac_types: DEFAULT_EXCLUDED_AC_TYPES
				.iter()
				.map(|s| s.to_string())
				.collect(),
		}
	}
}

/// Row counts gathered while mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
	pub input_rows: usize,
	pub excluded_rows: usize,
	pub prefilled: usize,
	pub resolved_from_main: usize,
	pub resolved_from_ytd: usize,
	/// Unmatched rows whose account type was found but mapped to several
	/// loan types that the branch could not narrow down.
	pub ambiguous: usize,
}

pub struct MappingResult {
	pub table: Table,
	pub stats: PassStats,
}

/// Fills in missing loan types on a disbursement table, first from the main
/// ledger and then from the YTD ledger.
pub struct Mapper {
	rules: MappingRules,
}

impl Mapper {
	pub fn new(rules: MappingRules) -> Self {
		Self { rules }
	}

	/// Runs the whole pipeline on freshly read tables: header normalization,
	/// value cleaning, exclusion filtering, then the two lookup passes.
	pub fn run(
		&self,
		mut disbursement: Table,
		main: Table,
		ytd: Table,
	) -> MappingResult {
		let main = prepare_reference(TableKind::Main, main);
		let ytd = prepare_reference(TableKind::Ytd, ytd);

		normalize_headers(TableKind::Disbursement, &mut disbursement);
		clean_key_columns(&mut disbursement);
		disbursement.ensure_column(LOAN_TYPE);

		let mut stats = PassStats {
			input_rows: disbursement.len(),
			..Default::default()
		};

		stats.excluded_rows = self.exclude_rows(&mut disbursement);
		stats.prefilled = (0..disbursement.len())
			.filter(|&i| disbursement.get(i, LOAN_TYPE).is_some())
			.count();

		let mut ambiguous = BTreeSet::new();
		stats.resolved_from_main =
			fill_pass(&mut disbursement, &main, &mut ambiguous);
		stats.resolved_from_ytd =
			fill_pass(&mut disbursement, &ytd, &mut ambiguous);
		stats.ambiguous = ambiguous.len();

		info!(
			"mapped {} rows: {} from main, {} from ytd, {} already set",
			disbursement.len(),
			stats.resolved_from_main,
			stats.resolved_from_ytd,
			stats.prefilled
		);

		MappingResult {
			table: disbursement,
			stats,
		}
	}

	/// Drops rows whose account type is excluded. Returns how many went.
	fn exclude_rows(&self, table: &mut Table) -> usize {
		let col = match table.column_index(AC_TYPE) {
			Some(c) => c,
			None => return 0,
		};

		let before = table.len();
		let excluded = &self.rules.excluded_ac_types;
		table.retain_rows(|r| match &r[col] {
			Some(ac) => !excluded.contains(ac),
			None => true,
		});

		let removed = before - table.len();
		if removed > 0 {
			info!("excluded {} rows by account type", removed);
		}
		removed
	}
}

/// Normalizes and cleans a reference ledger so it can be searched.
pub fn prepare_reference(kind: TableKind, mut table: Table) -> ReferenceTable {
	normalize_headers(kind, &mut table);
	clean_key_columns(&mut table);

	let reference = ReferenceTable::new(kind, table);
	if !reference.has_required_columns() {
		warn!(
			"{} reference has no {} or {} column; nothing will match against it",
			kind, AC_TYPE, LOAN_TYPE
		);
	}
	reference
}

/// One lookup pass. Only rows whose loan type is still missing are looked
/// up, so values present before the pass are never overwritten. Returns the
/// number of rows resolved; `ambiguous` tracks the rows that currently have
/// several candidate loan types.
fn fill_pass(
	table: &mut Table,
	reference: &ReferenceTable,
	ambiguous: &mut BTreeSet<usize>,
) -> usize {
	let mut resolved = 0;

	for i in 0..table.len() {
		if table.get(i, LOAN_TYPE).is_some() {
			continue;
		}

		let resolution =
			reference.lookup(table.get(i, AC_TYPE), table.get(i, BRANCH_NAME));
		if let Resolution::Ambiguous(candidates) = &resolution {
			debug!(
				"row {}: {} reference has several loan types for {:?}: {:?}",
				i,
				reference.kind(),
				table.get(i, AC_TYPE),
				candidates
			);
			ambiguous.insert(i);
		}

		if let Some(loan_type) = resolution.into_loan_type() {
			table.set(i, LOAN_TYPE, Some(loan_type));
			ambiguous.remove(&i);
			resolved += 1;
		}
	}

	resolved
}

#[cfg(test)]
mod tests {
	use super::*;

	fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
		let mut t = Table::new(headers.iter().map(|h| h.to_string()).collect());
		for r in rows {
			t.push_row(r.iter().map(|c| Some(c.to_string())).collect());
		}
		t
	}

	fn run(disbursement: Table, main: Table, ytd: Table) -> MappingResult {
		Mapper::new(MappingRules::default()).run(disbursement, main, ytd)
	}

	fn empty_reference() -> Table {
		table(&["Ac Type", "Loan Type"], &[])
	}

	#[test]
	fn test_single_reference_row() {
		let d = table(&["Ac Type", "Loan Type"], &[&["10", ""]]);
		let m = table(&["AT", "Loan Type"], &[&["10", "Term Loan"]]);

		let result = run(d, m, empty_reference());
		assert_eq!(result.table.get(0, LOAN_TYPE), Some("Term Loan"));
		assert_eq!(result.stats.resolved_from_main, 1);
	}

	#[test]
	fn test_branch_tie_break() {
		let d = table(
			&["AcType", "Branch Name", "Loan Type"],
			&[&["10", "Kathmandu", "nan"], &["10", "Biratnagar", "nan"]],
		);
		let m = table(
			&["AcType", "Loan Type", "Branch"],
			&[&["10", "Term Loan", "Kathmandu"], &["10", "Overdraft", "Pokhara"]],
		);

		let result = run(d, m, empty_reference());
		assert_eq!(result.table.get(0, LOAN_TYPE), Some("Term Loan"));
		assert_eq!(result.table.get(1, LOAN_TYPE), None);
		assert_eq!(result.stats.ambiguous, 1);
	}

	#[test]
	fn test_excluded_rows_are_dropped() {
		let d = table(
			&["AcType", "Amount"],
			&[&["4Z", "1"], &["10", "2"], &[" 4Z ", "3"]],
		);
		let result = run(d, empty_reference(), empty_reference());
		assert_eq!(result.table.len(), 1);
		assert_eq!(result.table.get(0, "Amount"), Some("2"));
		assert_eq!(result.stats.input_rows, 3);
		assert_eq!(result.stats.excluded_rows, 2);
	}

	#[test]
	fn test_existing_loan_type_kept() {
		let d = table(&["AcType", "Old Ac Num"], &[&["10", "Staff Loan"]]);
		let m = table(&["AcType", "Loan Type"], &[&["10", "Term Loan"]]);

		let result = run(d, m, empty_reference());
		assert_eq!(result.table.get(0, LOAN_TYPE), Some("Staff Loan"));
		assert_eq!(result.stats.prefilled, 1);
		assert_eq!(result.stats.resolved_from_main, 0);
	}

	#[test]
	fn test_main_takes_precedence_over_ytd() {
		let d = table(&["AcType"], &[&["10"], &["11"]]);
		let m = table(&["AcType", "Loan Type"], &[&["10", "Term Loan"]]);
		let y = table(
			&["Ac Type", "LoanType"],
			&[&["10", "Overdraft"], &["11", "Demand Loan"]],
		);

		let result = run(d, m, y);
		assert_eq!(result.table.get(0, LOAN_TYPE), Some("Term Loan"));
		assert_eq!(result.table.get(1, LOAN_TYPE), Some("Demand Loan"));
		assert_eq!(result.stats.resolved_from_main, 1);
		assert_eq!(result.stats.resolved_from_ytd, 1);
	}

	#[test]
	fn test_reference_without_loan_type_is_not_fatal() {
		let d = table(&["AcType"], &[&["10"]]);
		let m = table(&["AcType", "Remarks"], &[&["10", "x"]]);
		let y = table(&["AcType", "Loan Type"], &[&["10", "Term Loan"]]);

		let result = run(d, m, y);
		assert_eq!(result.table.get(0, LOAN_TYPE), Some("Term Loan"));
	}

	#[test]
	fn test_custom_exclusions() {
		let d = table(&["AcType"], &[&["4Z"], &["5A"]]);
		let rules = MappingRules {
			excluded_ac_types: vec!["5A".into()],
		};
		let result =
			Mapper::new(rules).run(d, empty_reference(), empty_reference());
		assert_eq!(result.table.len(), 1);
		assert_eq!(result.table.get(0, AC_TYPE), Some("4Z"));
	}
}
