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
use crate::config::config_file::Config;
use crate::mapping::mapper::MappingRules;
use anyhow::{bail, Error};
use std::path::PathBuf;

pub const DEFAULT_MAIN_SHEET: &str = "Mainsheet";
pub const DEFAULT_YTD_SHEET: &str = "YTD";
pub const DEFAULT_OUTPUT: &str = "updated_disbursement.xlsx";

/// Values given on the command line. Anything set here beats the config
/// file.
#[derive(Debug, Default)]
pub struct Overrides {
	pub disbursement: Option<String>,
	pub main: Option<String>,
	pub ytd: Option<String>,
	pub output: Option<String>,
	pub disbursement_sheet: Option<String>,
	pub main_sheet: Option<String>,
	pub ytd_sheet: Option<String>,
	pub unmatched_sheet: bool,
}

/// Everything a run needs, after merging flags, config and defaults.
#[derive(Debug)]
pub struct Settings {
	pub disbursement: PathBuf,
	pub main: PathBuf,
	pub ytd: PathBuf,
	pub output: PathBuf,

	/// None reads the first sheet.
	pub disbursement_sheet: Option<String>,
	pub main_sheet: String,
	pub ytd_sheet: String,

	pub unmatched_sheet: bool,
	pub rules: MappingRules,
}

impl Settings {
	pub fn resolve(cli: Overrides, config: Config) -> Result<Self, Error> {
		let inputs = config.inputs.unwrap_or_default();
		let sheets = config.sheets.unwrap_or_default();
		let output = config.output.unwrap_or_default();
		let rules = config.rules.unwrap_or_default();

		let disbursement = match cli.disbursement.or(inputs.disbursement) {
			Some(p) => PathBuf::from(p),
			None => bail!("No disbursement file specified"),
		};
		let main = match cli.main.or(inputs.main) {
			Some(p) => PathBuf::from(p),
			None => bail!("No main reference file specified"),
		};
		let ytd = match cli.ytd.or(inputs.ytd) {
			Some(p) => PathBuf::from(p),
			None => bail!("No YTD reference file specified"),
		};

		Ok(Self {
			disbursement,
			main,
			ytd,
			output: PathBuf::from(
				cli.output
					.or(output.path)
					.unwrap_or_else(|| DEFAULT_OUTPUT.to_string()),
			),
			disbursement_sheet: cli.disbursement_sheet.or(sheets.disbursement),
			main_sheet: cli
				.main_sheet
				.or(sheets.main)
				.unwrap_or_else(|| DEFAULT_MAIN_SHEET.to_string()),
			ytd_sheet: cli
				.ytd_sheet
				.or(sheets.ytd)
				.unwrap_or_else(|| DEFAULT_YTD_SHEET.to_string()),
			unmatched_sheet: cli.unmatched_sheet
				|| output.unmatched_sheet.unwrap_or(false),
			rules: match rules.excluded_ac_types {
				Some(excluded_ac_types) => MappingRules { excluded_ac_types },
				None => MappingRules::default(),
			},
		})
	}
}
