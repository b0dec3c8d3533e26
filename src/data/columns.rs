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
use crate::data::table::{Table, AC_TYPE, BRANCH_NAME, LOAN_TYPE};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Which of the three inputs a table came from. Each accepts a slightly
/// different set of header spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
	Disbursement,
	Main,
	Ytd,
}

/// Accepted header spellings per canonical column, already in the form
/// produced by `normalize_key`.
type Synonyms = &'static [(&'static str, &'static [&'static str])];

const DISBURSEMENT_SYNONYMS: Synonyms = &[
	(AC_TYPE, &["actype"]),
	(LOAN_TYPE, &["oldacnum", "loantype"]),
	(BRANCH_NAME, &["branchname", "branch"]),
];

const MAIN_SYNONYMS: Synonyms = &[
	(AC_TYPE, &["actype", "at"]),
	(LOAN_TYPE, &["loantype"]),
	(BRANCH_NAME, &["branchname", "branch"]),
];

const YTD_SYNONYMS: Synonyms = &[
	(AC_TYPE, &["actype"]),
	(LOAN_TYPE, &["loantype"]),
	(BRANCH_NAME, &["branchname", "branch"]),
];

impl TableKind {
	fn synonyms(&self) -> Synonyms {
		match self {
			TableKind::Disbursement => DISBURSEMENT_SYNONYMS,
			TableKind::Main => MAIN_SYNONYMS,
			TableKind::Ytd => YTD_SYNONYMS,
		}
	}
}

impl fmt::Display for TableKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TableKind::Disbursement => write!(f, "disbursement"),
			TableKind::Main => write!(f, "main"),
			TableKind::Ytd => write!(f, "ytd"),
		}
	}
}

/// Removes every space and lowercases, so "Ac Type", "ACTYPE" and "actype"
/// all compare equal.
pub fn normalize_key(header: &str) -> String {
	header.replace(' ', "").to_lowercase()
}

/// The canonical name for a header, if it is one of the accepted spellings
/// for this kind of table. Exact membership only; no partial matches.
pub fn canonical_for(kind: TableKind, header: &str) -> Option<&'static str> {
	let key = normalize_key(header.trim());
	kind.synonyms()
		.iter()
		.find(|(_, spellings)| spellings.contains(&key.as_str()))
		.map(|(canonical, _)| *canonical)
}

/// What normalization does with one original header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPlan {
	/// The name the column is read under, canonical where a synonym matched.
	pub name: String,
	pub renamed: bool,
	/// False when a column further left already has this name; the column
	/// is dropped.
	pub kept: bool,
}

/// Decides, left to right, the name each header resolves to and whether the
/// column survives deduplication.
pub fn plan_headers(kind: TableKind, headers: &[String]) -> Vec<HeaderPlan> {
	let mut seen = HashSet::new();

	headers
		.iter()
		.map(|header| {
			let trimmed = header.trim();
			let (name, renamed) = match canonical_for(kind, trimmed) {
				Some(canonical) => (canonical.to_string(), canonical != trimmed),
				None => (trimmed.to_string(), false),
			};
			let kept = seen.insert(name.clone());
			HeaderPlan {
				name,
				renamed,
				kept,
			}
		})
		.collect()
}

/// Rewrites headers to their canonical names and drops any column whose
/// (possibly renamed) header already appeared further left. Headers that
/// match no synonym are kept as they are, minus surrounding whitespace.
pub fn normalize_headers(kind: TableKind, table: &mut Table) {
	let mut headers = Vec::new();
	let mut keep = Vec::new();

	let plan = plan_headers(kind, table.headers());
	for (i, (header, planned)) in table.headers().iter().zip(plan).enumerate() {
		if !planned.kept {
			debug!("{}: dropped duplicate column '{}'", kind, header);
			continue;
		}
		if planned.renamed {
			debug!("{}: renamed '{}' to '{}'", kind, header, planned.name);
		}

		headers.push(planned.name);
		keep.push(i);
	}

	table.reshape(headers, &keep);
}
