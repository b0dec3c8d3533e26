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
use crate::errors::MapperError;
use anyhow::{bail, Error};
use dirs::home_dir;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Filesystem {
	/// Input files named so far, canonicalized where possible. Used to keep
	/// the output from overwriting one of them.
	inputs: HashSet<PathBuf>,
}

impl Filesystem {
	pub fn new() -> Self {
		Self {
			inputs: HashSet::new(),
		}
	}

	/// Records an input file, failing early if it does not exist.
	pub fn declare_input(&mut self, file_path: &Path) -> Result<(), Error> {
		if !file_path.is_file() {
			bail!(MapperError::input(file_path, "no such file"));
		}
		self.inputs.insert(Filesystem::key(file_path));
		Ok(())
	}

	/// Refuses an output path that points at any declared input.
	pub fn check_output(&self, file_path: &Path) -> Result<(), Error> {
		if self.inputs.contains(&Filesystem::key(file_path)) {
			bail!(
				"Output {} would overwrite an input file",
				file_path.display()
			)
		}
		Ok(())
	}

	fn key(path: &Path) -> PathBuf {
		fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
	}

	/// Fetches the config from the given path, or the default path if none.
	/// A missing default config is the same as an empty one; a missing
	/// custom config is an error.
	pub fn get_config(
		&self,
		custom_config_path: Option<&String>,
	) -> Result<Config, Error> {
		let config_path = match &custom_config_path {
			None => match home_dir() {
				Some(home) => home.join(".config/ltmap/config.toml"),
				None => return Ok(Config::default()),
			},
			Some(p) => PathBuf::from(p),
		};

		if !config_path.exists() {
			if custom_config_path.is_some() {
				bail!(MapperError::Config(format!(
					"{} does not exist",
					config_path.display()
				)));
			}
			return Ok(Config::default());
		}

		let content = fs::read_to_string(&config_path)?;
		let config: Config = toml::from_str(&content).map_err(|e| {
			MapperError::Config(format!("{}: {}", config_path.display(), e))
		})?;

		Ok(config)
	}
}
