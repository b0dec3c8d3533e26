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
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	pub inputs: Option<Inputs>,
	pub sheets: Option<Sheets>,
	pub output: Option<Output>,
	pub rules: Option<Rules>,
}

/// Default file locations, so a monthly run needs no flags.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Inputs {
	pub disbursement: Option<String>,
	pub main: Option<String>,
	pub ytd: Option<String>,
}

/// Sheet names to read from each workbook. Unset means the built-in
/// default for that input.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sheets {
	pub disbursement: Option<String>,
	pub main: Option<String>,
	pub ytd: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Output {
	pub path: Option<String>,

	/// Also write the unmatched rows to their own sheet.
	pub unmatched_sheet: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rules {
	/// Account types dropped from the disbursement file before mapping.
	pub excluded_ac_types: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_full_config() {
		let config: Config = toml::from_str(
			r#"
			[inputs]
			disbursement = "Input_Files/Sheet1.xlsx"
			main = "Input_Files/Duelist.xlsx"

			[sheets]
			ytd = "YTD 2082"

			[output]
			unmatched_sheet = true

			[rules]
			excluded_ac_types = ["4Z", "5A"]
			"#,
		)
		.unwrap();

		let inputs = config.inputs.unwrap();
		assert_eq!(inputs.main.as_deref(), Some("Input_Files/Duelist.xlsx"));
		assert!(inputs.ytd.is_none());
		assert_eq!(config.sheets.unwrap().ytd.as_deref(), Some("YTD 2082"));
		assert_eq!(config.output.unwrap().unmatched_sheet, Some(true));
		assert_eq!(
			config.rules.unwrap().excluded_ac_types.unwrap(),
			vec!["4Z", "5A"]
		);
	}

	#[test]
	fn test_unknown_keys_rejected() {
		assert!(toml::from_str::<Config>("[inputs]\nmian = \"x.xlsx\"").is_err());
	}
}
