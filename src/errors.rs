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
use std::path::PathBuf;
use thiserror::Error;

/// Structural failures that abort a mapping run. Lookup misses and ambiguous
/// account types are not errors; they surface as unmatched rows instead.
#[derive(Debug, Error)]
pub enum MapperError {
	#[error("unable to read {path}: {reason}")]
	InputRead { path: PathBuf, reason: String },

	#[error("sheet '{sheet}' not found in {path}")]
	SheetNotFound { path: PathBuf, sheet: String },

	#[error("unsupported file format: {0}")]
	UnsupportedFormat(PathBuf),

	#[error("unable to write {path}: {reason}")]
	OutputWrite { path: PathBuf, reason: String },

	#[error("invalid config: {0}")]
	Config(String),
}

impl MapperError {
	pub fn input(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
		MapperError::InputRead {
			path: path.into(),
			reason: reason.to_string(),
		}
	}

	pub fn output(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
		MapperError::OutputWrite {
			path: path.into(),
			reason: reason.to_string(),
		}
	}
}
