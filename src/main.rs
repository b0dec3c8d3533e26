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
use crate::config::settings::{Overrides, Settings};
use crate::data::columns::TableKind;
use crate::data::table::Table;
use crate::files::filesystem::Filesystem;
use crate::files::workbook::{
	read_table, write_table, Format, SheetView, MAPPED_SHEET, UNMATCHED_SHEET,
};
use crate::mapping::mapper::Mapper;
use crate::reports::header_reporter::HeaderReporter;
use crate::reports::mapping_reporter::MappingReporter;
use anyhow::Error;
use clap::{ArgAction, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod data;
mod errors;
mod files;
mod mapping;
mod reports;

#[derive(Parser)]
#[command(
	name = "ltmap",
	version,
	about = "Fills in loan types on a disbursement sheet from the main and YTD ledgers"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	// -----------
	// -- FLAGS --
	// -----------
	/// Disbursement file to fill in
	#[arg(short, long)]
	disbursement: Option<String>,

	/// Main reference ledger
	#[arg(short, long)]
	main: Option<String>,

	/// Year-to-date reference ledger
	#[arg(short, long)]
	ytd: Option<String>,

	/// Where to write the result (default: updated_disbursement.xlsx)
	#[arg(short, long)]
	output: Option<String>,

	/// Sheet to read from the disbursement file (default: first sheet)
	#[arg(long)]
	disbursement_sheet: Option<String>,

	/// Sheet to read from the main ledger (default: Mainsheet)
	#[arg(long)]
	main_sheet: Option<String>,

	/// Sheet to read from the YTD ledger (default: YTD)
	#[arg(long)]
	ytd_sheet: Option<String>,

	/// Custom config file location (default: ~/.config/ltmap/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Also write unmatched rows to their own sheet
	#[arg(long)]
	unmatched_sheet: bool,

	/// Print the summary as JSON
	#[arg(long)]
	json: bool,

	/// Show at most this many unmatched rows
	#[arg(short, long)]
	limit: Option<usize>,

	/// More log output on stderr; repeat for debug
	#[arg(short, long, action = ArgAction::Count)]
	verbose: u8,
}

impl Cli {
	fn overrides(&self) -> Overrides {
		Overrides {
			disbursement: self.disbursement.clone(),
			main: self.main.clone(),
			ytd: self.ytd.clone(),
			output: self.output.clone(),
			disbursement_sheet: self.disbursement_sheet.clone(),
			main_sheet: self.main_sheet.clone(),
			ytd_sheet: self.ytd_sheet.clone(),
			unmatched_sheet: self.unmatched_sheet,
		}
	}
}

#[derive(ValueEnum, Clone, PartialEq)]
enum Directive {
	Map,     // fill in loan types and write the output file
	Check,   // same, but only report; nothing is written
	Headers, // show how each input's headers are recognized
}

fn main() -> Result<(), Error> {
	let args = Cli::parse();
	init_logging(args.verbose);

	let mut fs = Filesystem::new();
	let config = fs.get_config(args.config.as_ref())?;
	let settings = Settings::resolve(args.overrides(), config)?;

	fs.declare_input(&settings.disbursement)?;
	fs.declare_input(&settings.main)?;
	fs.declare_input(&settings.ytd)?;
	if args.command == Directive::Map {
		fs.check_output(&settings.output)?;
		Format::for_output(&settings.output)?;
	}

	// all three inputs are read before anything else happens, so a bad
	// file aborts the run with nothing written
	let disbursement = read_table(
		&settings.disbursement,
		settings.disbursement_sheet.as_deref(),
	)?;
	let main = read_table(&settings.main, Some(&settings.main_sheet))?;
	let ytd = read_table(&settings.ytd, Some(&settings.ytd_sheet))?;

	match args.command {
		Directive::Headers => {
			HeaderReporter::new(vec![
				(TableKind::Disbursement, &disbursement),
				(TableKind::Main, &main),
				(TableKind::Ytd, &ytd),
			])
			.print();
		},
		Directive::Map => {
			let reporter = map_tables(&settings, disbursement, main, ytd);

			let mut views = vec![SheetView {
				name: MAPPED_SHEET,
				table: reporter.mapped(),
			}];
			if settings.unmatched_sheet {
				views.push(SheetView {
					name: UNMATCHED_SHEET,
					table: reporter.unmatched(),
				});
			}
			write_table(&settings.output, &views)?;

			reporter.print_summary(args.json)?;
			if !args.json {
				println!("Output saved to: {}", settings.output.display());
			}
		},
		Directive::Check => {
			let reporter = map_tables(&settings, disbursement, main, ytd);

			reporter.print_summary(args.json)?;
			if !args.json {
				reporter.print_unmatched(args.limit);
			}
		},
	}

	info!("done");
	Ok(())
}

fn map_tables(
	settings: &Settings,
	disbursement: Table,
	main: Table,
	ytd: Table,
) -> MappingReporter {
	let mapper = Mapper::new(settings.rules.clone());
	MappingReporter::new(mapper.run(disbursement, main, ytd))
}

/// Logs go to stderr so they never mix with report output. RUST_LOG, when
/// set, takes precedence over -v.
fn init_logging(verbose: u8) {
	let level = match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	let env =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
	fmt::Subscriber::builder()
		.with_env_filter(env)
		.with_writer(std::io::stderr)
		.init();
}
