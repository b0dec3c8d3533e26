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
use crate::data::columns::TableKind;
use crate::data::table::{Row, Table, AC_TYPE, BRANCH_NAME, LOAN_TYPE};

/// The outcome of looking one account type up in a reference table. Every
/// variant other than `Resolved` means the row stays unmatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
	Resolved(String),
	/// The reference lacks an AcType or Loan Type column.
	MissingColumns,
	/// No reference row shares the account type, or the row has none.
	NoMatch,
	/// More than one loan type remains after narrowing by branch (or no
	/// branch narrowing was possible). Holds the candidates seen last.
	Ambiguous(Vec<String>),
}

impl Resolution {
	pub fn into_loan_type(self) -> Option<String> {
		match self {
			Resolution::Resolved(s) => Some(s),
			_ => None,
		}
	}
}

/// A read-only reference ledger (main sheet or YTD) with its key columns
/// located up front.
pub struct ReferenceTable {
	kind: TableKind,
	table: Table,
	ac_type: Option<usize>,
	loan_type: Option<usize>,
	branch: Option<usize>,
}

impl ReferenceTable {
	/// Expects a table that has already been normalized and cleaned.
	pub fn new(kind: TableKind, table: Table) -> Self {
		let ac_type = table.column_index(AC_TYPE);
		let loan_type = table.column_index(LOAN_TYPE);
		let branch = table.column_index(BRANCH_NAME);

		Self {
			kind,
			table,
			ac_type,
			loan_type,
			branch,
		}
	}

	pub fn kind(&self) -> TableKind {
		self.kind
	}

	pub fn has_required_columns(&self) -> bool {
		self.ac_type.is_some() && self.loan_type.is_some()
	}

	/// Finds the loan type for an account type. If the account type alone
	/// maps to one loan type that is the answer; otherwise the candidates are
	/// narrowed to rows from the same branch, and only a single remaining
	/// loan type is accepted. Never picks among several candidates.
	pub fn lookup(&self, ac_type: Option<&str>, branch: Option<&str>) -> Resolution {
		let (ac_col, loan_col) = match (self.ac_type, self.loan_type) {
			(Some(a), Some(l)) => (a, l),
			_ => return Resolution::MissingColumns,
		};

		let ac_type = match ac_type {
			Some(a) => a,
			None => return Resolution::NoMatch,
		};

		let matching: Vec<_> = self
			.table
			.rows()
			.iter()
			.filter(|r| r[ac_col].as_deref() == Some(ac_type))
			.collect();

		if matching.is_empty() {
			return Resolution::NoMatch;
		}

		let mut candidates = distinct_values(matching.iter().copied(), loan_col);
		if candidates.len() == 1 {
			return Resolution::Resolved(candidates.remove(0));
		}

		// account type is not enough on its own; try the branch
		if let (Some(branch), Some(branch_col)) = (branch, self.branch) {
			let narrowed = matching
				.iter()
				.copied()
				.filter(|r| r[branch_col].as_deref() == Some(branch));
			let mut by_branch = distinct_values(narrowed, loan_col);
			if by_branch.len() == 1 {
				return Resolution::Resolved(by_branch.remove(0));
			}
			if !by_branch.is_empty() {
				candidates = by_branch;
			}
		}

		Resolution::Ambiguous(candidates)
	}
}

/// Distinct non-missing values of one column, in first-seen order.
fn distinct_values<'a, I>(rows: I, col: usize) -> Vec<String>
where
	I: Iterator<Item = &'a Row>,
{
	let mut out: Vec<String> = Vec::new();
	for value in rows.filter_map(|r| r[col].as_ref()) {
		if !out.contains(value) {
			out.push(value.clone());
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn resolve(
		ac_type: Option<&str>,
		branch: Option<&str>,
		reference: &ReferenceTable,
	) -> Option<String> {
		reference.lookup(ac_type, branch).into_loan_type()
	}

	fn reference(headers: &[&str], rows: &[&[Option<&str>]]) -> ReferenceTable {
		let mut t = Table::new(headers.iter().map(|h| h.to_string()).collect());
		for r in rows {
			t.push_row(r.iter().map(|c| c.map(String::from)).collect());
		}
		ReferenceTable::new(TableKind::Main, t)
	}

	fn branches() -> ReferenceTable {
		reference(
			&[AC_TYPE, LOAN_TYPE, BRANCH_NAME],
			&[
				&[Some("10"), Some("Term Loan"), Some("Kathmandu")],
				&[Some("10"), Some("Overdraft"), Some("Pokhara")],
				&[Some("10"), Some("Overdraft"), Some("Pokhara")],
				&[Some("20"), Some("Hire Purchase"), Some("Pokhara")],
				&[Some("20"), None, Some("Kathmandu")],
			],
		)
	}

	#[test]
	fn test_single_loan_type_ignores_branch() {
		let r = branches();
		assert_eq!(
			resolve(Some("20"), Some("Biratnagar"), &r),
			Some("Hire Purchase".to_string())
		);
		assert_eq!(resolve(Some("20"), None, &r), Some("Hire Purchase".to_string()));
	}

	#[test]
	fn test_branch_disambiguates() {
		let r = branches();
		assert_eq!(
			resolve(Some("10"), Some("Kathmandu"), &r),
			Some("Term Loan".to_string())
		);
		assert_eq!(
			resolve(Some("10"), Some("Pokhara"), &r),
			Some("Overdraft".to_string())
		);
	}

	#[test]
	fn test_unknown_branch_stays_missing() {
		let r = branches();
		assert_eq!(
			r.lookup(Some("10"), Some("Biratnagar")),
			Resolution::Ambiguous(vec!["Term Loan".into(), "Overdraft".into()])
		);
		assert_eq!(resolve(Some("10"), None, &r), None);
	}

	#[test]
	fn test_ambiguous_within_branch() {
		let r = reference(
			&[AC_TYPE, LOAN_TYPE, BRANCH_NAME],
			&[
				&[Some("10"), Some("Term Loan"), Some("Kathmandu")],
				&[Some("10"), Some("Overdraft"), Some("Kathmandu")],
			],
		);
		assert_eq!(resolve(Some("10"), Some("Kathmandu"), &r), None);
	}

	#[test]
	fn test_no_match() {
		let r = branches();
		assert_eq!(r.lookup(Some("99"), None), Resolution::NoMatch);
		assert_eq!(r.lookup(None, Some("Kathmandu")), Resolution::NoMatch);
	}

	#[test]
	fn test_only_missing_loan_types_is_unmatched() {
		let r = reference(&[AC_TYPE, LOAN_TYPE], &[&[Some("30"), None]]);
		assert_eq!(r.lookup(Some("30"), None), Resolution::Ambiguous(vec![]));
	}

	#[test]
	fn test_missing_columns_degrade_quietly() {
		let r = reference(&[AC_TYPE, "Remarks"], &[&[Some("10"), Some("x")]]);
		assert!(!r.has_required_columns());
		assert_eq!(r.lookup(Some("10"), None), Resolution::MissingColumns);

		// no branch column means ambiguity cannot be broken
		let r = reference(
			&[AC_TYPE, LOAN_TYPE],
			&[&[Some("10"), Some("A")], &[Some("10"), Some("B")]],
		);
		assert_eq!(resolve(Some("10"), Some("Kathmandu"), &r), None);
	}
}
