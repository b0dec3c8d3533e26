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
use std::fmt::Write;

/// Plain-text table for printing rows of a sheet to the terminal. Columns
/// are padded to their widest value; the header is centered and followed by
/// a separator.
pub struct TextTable {
	column_count: usize,
	header: Vec<String>,
	rows: Vec<Vec<String>>,
	right_align: Vec<bool>, // indicates columns by index
}

impl TextTable {
	pub fn new(header: Vec<&str>) -> Self {
		let column_count = header.len();
		Self {
			column_count,
			header: header.into_iter().map(|s| s.to_string()).collect(),
			rows: Vec::new(),
			right_align: vec![false; column_count],
		}
	}

	/// Adds a data row. Missing values print as blanks.
	pub fn add_row(&mut self, row: Vec<Option<&str>>) {
		let mut row: Vec<String> =
			row.into_iter().map(|s| s.unwrap_or("").to_string()).collect();
		row.resize(self.column_count, String::new());
		self.rows.push(row);
	}

	/// Specifies columns that should be right-aligned by index.
	pub fn right_align(&mut self, cols: Vec<usize>) {
		for col in cols {
			if col < self.column_count {
				self.right_align[col] = true;
			}
		}
	}

	pub fn print(&self) {
		print!("{}", self.render());
	}

	pub fn render(&self) -> String {
		let mut out = String::new();
		if self.column_count == 0 {
			return out;
		}

		let mut max_widths: Vec<usize> =
			self.header.iter().map(|h| h.chars().count()).collect();
		for row in &self.rows {
			for (i, value) in row.iter().enumerate() {
				max_widths[i] = max_widths[i].max(value.chars().count());
			}
		}

		let centered: Vec<String> = self
			.header
			.iter()
			.zip(&max_widths)
			.map(|(h, &w)| TextTable::center_align(h, w))
			.collect();
		let _ = writeln!(out, "{}", centered.join(" | ").trim_end());

		let total_width: usize =
			max_widths.iter().sum::<usize>() + (3 * (self.column_count - 1));
		let _ = writeln!(out, "{:-<total_width$}", "", total_width = total_width);

		for row in &self.rows {
			let cells: Vec<String> = row
				.iter()
				.enumerate()
				.map(|(i, value)| {
					let width = max_widths[i];
					if self.right_align[i] {
						format!("{:>width$}", value, width = width)
					} else {
						format!("{:<width$}", value, width = width)
					}
				})
				.collect();
			let _ = writeln!(out, "{}", cells.join("   ").trim_end());
		}

		out
	}

	fn center_align(value: &str, width: usize) -> String {
		let len = value.chars().count();
		if len >= width {
			return value.to_string();
		}
		let total_padding = width - len;
		let left_padding = total_padding / 2;
		let right_padding = total_padding - left_padding;

		format!(
			"{}{}{}",
			" ".repeat(left_padding),
			value,
			" ".repeat(right_padding)
		)
	}
}
