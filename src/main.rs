/* Copyright © 2025 The mandi developers
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
use crate::config::config_file::{get_config, Config};
use crate::orders::book::OrderBook;
use crate::orders::reconcile;
use crate::reports::bill_reporter::{BillReporter, Partition};
use crate::reports::document::Document;
use crate::reports::hotel_summary::HotelSummaryReporter;
use crate::reports::summary_reporter::SummaryReporter;
use crate::reports::table::Table;
use crate::session::Session;
use crate::source::error::SourceError;
use crate::source::extract::core::Extractor;
use crate::source::sheets::core::SheetSource;
use crate::source::store::core::StoreSource;
use crate::source::transcribe::core::{combine_order_text, Transcriber};
use crate::util::date::Date;
use crate::util::num::{fmt_money, fmt_qty};
use anyhow::{bail, Error};
use chrono::Local;
use clap::{Parser, ValueEnum};
use std::fs;

mod config;
mod orders;
mod reports;
mod session;
mod source;
mod util;

/// Hotels rendered first when no preference list is configured.
const DEFAULT_PREFERRED_HOTELS: [&str; 4] =
	["NOVOTEL", "GRANDBAY", "RADISSONBLU", "BHEEMILI"];

#[derive(Parser)]
#[command(
	name = "mandi",
	version = "0.4.2",
	about = "Hotel kitchen vegetable order tool"
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
	/// Read orders from this CSV file instead of the remote sheet
	#[arg(short, long)]
	file: Option<String>,

	/// The working date (YYYY-MM-DD or DD/MM/YYYY, default: today)
	#[arg(short, long)]
	date: Option<String>,

	/// Start of the date range for the Hotel command
	#[arg(short, long)]
	begin: Option<String>,

	/// End of the date range for the Hotel command
	#[arg(short, long)]
	end: Option<String>,

	/// Restrict to one hotel
	#[arg(long)]
	hotel: Option<String>,

	/// Restrict to one kitchen (requires --hotel)
	#[arg(long)]
	kitchen: Option<String>,

	/// Restrict to one vendor
	#[arg(long)]
	vendor: Option<String>,

	/// Edited copy of the order table, for the Edits command
	#[arg(long)]
	edited: Option<String>,

	/// CSV file of actual prices, for the Prices command
	#[arg(long)]
	prices: Option<String>,

	/// Order photo to extract; may be given more than once
	#[arg(long)]
	images: Vec<String>,

	/// Free-form order text to extract
	#[arg(long)]
	text: Option<String>,

	/// Recorded order audio to transcribe; may be given more than once
	#[arg(long)]
	audio: Vec<String>,

	/// Write the report to this file instead of stdout
	#[arg(short, long)]
	output: Option<String>,

	/// Render the Preview report as CSV
	#[arg(long)]
	csv: bool,

	/// How to split the Bills report into pages
	#[arg(long, value_enum, default_value = "hotel")]
	split: SplitBy,

	/// Write detected edits back to the edit log
	#[arg(long)]
	apply: bool,

	/// Bypass the fetch cache
	#[arg(long)]
	refresh: bool,

	/// Custom config file location (default: ~/.config/mandi/config.toml)
	#[arg(long)]
	config: Option<String>,
}

impl Cli {
	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		if self.kitchen.is_some() && self.hotel.is_none() {
			bail!("--kitchen requires --hotel");
		}
		if self.csv && self.command != Directive::Preview {
			bail!("--csv only applies to the preview command");
		}
		Ok(())
	}
}

#[derive(ValueEnum, Clone, PartialEq)]
enum Directive {
	Veg,     // vegetable-wise summary matrix
	Vendor,  // vendor-wise summary matrix
	Bills,   // bill pages, split per --split
	Preview, // single consolidated bill page
	Hotel,   // per-hotel spend over a date range

	Prices, // show or record actual prices
	Edits,  // reconcile an edited copy of the table

	Push,    // replace the stored orders for the date
	Extract, // turn order photos or text into line items
	Names,   // registered vegetable names for a hotel
}

#[derive(ValueEnum, Clone, Copy, PartialEq)]
enum SplitBy {
	None,
	Hotel,
	Kitchen,
	Vendor,
}

impl From<SplitBy> for Partition {
	fn from(split: SplitBy) -> Self {
		match split {
			SplitBy::None => Partition::None,
			SplitBy::Hotel => Partition::Hotel,
			SplitBy::Kitchen => Partition::HotelKitchen,
			SplitBy::Vendor => Partition::Vendor,
		}
	}
}

fn main() -> Result<(), Error> {
	let args = Cli::parse();
	args.validate()?;

	let mut session = Session::new(working_date(&args)?);

	match args.command {
		Directive::Veg => {
			let book = day_book(&args, &mut session)?;
			let reporter = SummaryReporter::new(preferred_hotels(&args)?);
			emit(
				&args,
				session.date,
				reporter.veg_summary(&book, session.date),
			)?;
		},
		Directive::Vendor => {
			let book = day_book(&args, &mut session)?;
			let reporter = SummaryReporter::new(preferred_hotels(&args)?);
			emit(
				&args,
				session.date,
				reporter.vendor_summary(&book, session.date),
			)?;
		},
		Directive::Bills => {
			let book = day_book(&args, &mut session)?;
			let reporter = BillReporter::new(preferred_hotels(&args)?);
			emit(
				&args,
				session.date,
				reporter.report(&book, session.date, args.split.into()),
			)?;
		},
		Directive::Preview => {
			let book = day_book(&args, &mut session)?;
			let reporter = BillReporter::new(preferred_hotels(&args)?);
			if args.csv {
				emit_csv(&args, session.date, &reporter.csv_string(&book)?)?;
			} else {
				emit(
					&args,
					session.date,
					reporter.report(&book, session.date, Partition::None),
				)?;
			}
		},
		Directive::Hotel => hotel_summary(&args, &mut session)?,
		Directive::Prices => prices(&args, &mut session)?,
		Directive::Edits => edits(&args, &mut session)?,
		Directive::Push => push(&args, &mut session)?,
		Directive::Extract => extract(&args, &mut session)?,
		Directive::Names => names(&args)?,
	}

	for note in session.notes() {
		println!("Note: {}", note);
	}

	Ok(())
}

// --------------
// -- COMMANDS --
// --------------

fn hotel_summary(args: &Cli, session: &mut Session) -> Result<(), Error> {
	let hotel = match &args.hotel {
		Some(h) => h.clone(),
		None => bail!("No hotel specified"),
	};
	let begin = match &args.begin {
		Some(b) => Date::from_any_str(b)?,
		None => bail!("No begin date specified"),
	};
	let end = match &args.end {
		Some(e) => Date::from_any_str(e)?,
		None => begin,
	};
	if end < begin {
		bail!("End date is before begin date");
	}

	let book = load_book(args, session)?;
	emit(
		args,
		begin,
		HotelSummaryReporter::report(&book, &hotel, begin, end),
	)
}

fn prices(args: &Cli, session: &mut Session) -> Result<(), Error> {
	let config = get_config(args.config.as_ref(), true)?;
	let sheet = sheet_source(&config)?;

	let Some(path) = &args.prices else {
		// read-only path: show what has been entered for the date,
		// falling back to the store when the sheet column is empty
		let mut overrides = sheet.fetch_price_overrides(session.date)?;
		if overrides.is_empty() {
			if let Some(store_config) = &config.store {
				let store = StoreSource::from_config(store_config)?;
				overrides = store.fetch_prices(session.date)?;
			}
		}
		if overrides.is_empty() {
			println!("No prices entered for date: {}", session.date);
			return Ok(());
		}

		let mut table = Table::new(4);
		table.right_align(vec![3]);
		table.add_header(vec![
			"VEGETABLE",
			"TELUGU NAME",
			"UNITS",
			"ACTUAL PRICE",
		]);
		for record in &overrides {
			table.add_row(vec![
				record.vegetable.clone(),
				record.localized.clone(),
				record.units.clone(),
				fmt_money(record.actual_price),
			]);
		}
		table.print();
		return Ok(());
	};

	let records = source::file::load_price_records(path, session.date)?;
	if records.is_empty() {
		bail!("No usable prices in {}", path);
	}

	let updated = sheet.write_price_overrides(session.date, &records)?;
	println!("Updated {} cells in the sheet", updated);

	if let Some(store_config) = &config.store {
		let store = StoreSource::from_config(store_config)?;
		let (deleted, inserted) =
			store.save_prices(session.date, &records)?;
		println!(
			"Stored {} prices for {} ({} replaced)",
			inserted, session.date, deleted
		);
		store.append_audit(
			"save_prices",
			&format!("{} prices for {}", inserted, session.date),
		)?;
	}

	Ok(())
}

fn edits(args: &Cli, session: &mut Session) -> Result<(), Error> {
	let edited_path = match &args.edited {
		Some(p) => p.clone(),
		None => bail!("No edited file specified"),
	};

	let original = load_book(args, session)?;
	let edited = source::file::load_order_book(&edited_path)?;

	let outcome = reconcile::diff(&original, &edited);

	for note in &outcome.notes {
		session.note(note.clone());
	}
	if outcome.unmatched > 0 {
		session.note(format!(
			"{} edited rows matched no source row and were dropped",
			outcome.unmatched
		));
	}

	if outcome.edits.is_empty() {
		println!("No edits detected");
		return Ok(());
	}

	let mut table = Table::new(7);
	table.right_align(vec![4, 5, 6]);
	table.add_header(vec![
		"DATE", "HOTEL", "KITCHEN", "VEGETABLE", "OLD", "NEW", "DELTA",
	]);
	for edit in &outcome.edits {
		table.add_row(vec![
			edit.date.to_string(),
			edit.hotel.clone(),
			edit.kitchen.clone(),
			format!("{} ({})", edit.vegetable, edit.units),
			fmt_qty(edit.old_quantity),
			fmt_qty(edit.new_quantity),
			fmt_qty(edit.delta()),
		]);
	}
	table.print();

	if args.apply {
		let config = get_config(args.config.as_ref(), true)?;
		let sheet = sheet_source(&config)?;

		// the live table may have moved since the copy was edited, so
		// confirm each edit still has a source row before logging it
		let live = sheet.fetch_orders(true)?;
		let mut confirmed = Vec::new();
		for edit in &outcome.edits {
			match reconcile::find_source(edit, &live) {
				Some((_, reconcile::MatchPhase::Exact)) => {
					confirmed.push(edit.clone());
				},
				Some((row, reconcile::MatchPhase::Fallback)) => {
					session.note(format!(
						"'{}' matched the live row '{}' by partial name",
						edit.vegetable, row.vegetable
					));
					confirmed.push(edit.clone());
				},
				None => session.note(format!(
					"'{}' no longer matches the live table, not logged",
					edit.vegetable
				)),
			}
		}

		if confirmed.is_empty() {
			println!("No edits logged");
			return Ok(());
		}

		let appended = sheet.append_edit_log(&confirmed)?;
		println!("Logged {} edits", appended);

		if let Some(store_config) = &config.store {
			let store = StoreSource::from_config(store_config)?;
			store.append_audit(
				"apply_edits",
				&format!("{} edits for {}", confirmed.len(), session.date),
			)?;
		}
	}

	Ok(())
}

fn push(args: &Cli, session: &mut Session) -> Result<(), Error> {
	let config = get_config(args.config.as_ref(), true)?;
	let store_config = match &config.store {
		Some(s) => s,
		None => bail!("store is not configured"),
	};

	let book = load_book(args, session)?;
	let day = book.for_date(session.date);
	if day.is_empty() {
		println!("No data found for date: {}", session.date);
		return Ok(());
	}

	let store = StoreSource::from_config(store_config)?;
	let (deleted, inserted) =
		store.upsert_orders_for_date(session.date, &day)?;
	println!(
		"Pushed {} rows for {} ({} replaced)",
		inserted, session.date, deleted
	);
	store.append_audit(
		"push_orders",
		&format!("{} rows for {}", inserted, session.date),
	)?;

	Ok(())
}

fn extract(args: &Cli, session: &mut Session) -> Result<(), Error> {
	let hotel = match &args.hotel {
		Some(h) => h.clone(),
		None => bail!("No hotel specified"),
	};

	let config = get_config(args.config.as_ref(), true)?;
	let store_config = match &config.store {
		Some(s) => s,
		None => bail!("store is not configured"),
	};
	let extract_config = match &config.extract {
		Some(e) => e,
		None => bail!("extract is not configured"),
	};

	let store = StoreSource::from_config(store_config)?;
	let allowed = store.fetch_vegetable_names(&hotel)?;
	if allowed.is_empty() {
		bail!("No vegetable names registered for hotel: {}", hotel);
	}
	let synonyms = store.fetch_synonym_map(&hotel)?;

	let mut images = Vec::new();
	for path in &args.images {
		images.push(fs::read(path)?);
	}

	let mut transcripts = Vec::new();
	if !args.audio.is_empty() {
		let transcribe_config = match &config.transcribe {
			Some(t) => t,
			None => bail!("transcribe is not configured"),
		};
		let transcriber = Transcriber::from_config(transcribe_config)?;
		for path in &args.audio {
			let transcript = transcriber.transcribe_file(path)?;
			session.note(format!("transcribed {}: {}", path, transcript));
			transcripts.push(transcript);
		}
	}
	let free_text = combine_order_text(args.text.as_deref(), &transcripts);

	let extractor = Extractor::from_config(extract_config)?;
	let (items, notes) = extractor.extract_order_items(
		&images,
		free_text.as_deref(),
		&allowed,
		&synonyms,
	)?;
	for note in notes {
		session.note(note);
	}

	if items.is_empty() {
		println!("No order items extracted");
		return Ok(());
	}

	let mut table = Table::new(4);
	table.right_align(vec![2]);
	table.add_header(vec!["ITEM", "COMMON NAME", "QUANTITY", "UNITS"]);
	for item in &items {
		table.add_row(vec![
			item.name.clone(),
			item.common_name.clone(),
			fmt_qty(item.quantity),
			item.units.clone(),
		]);
	}
	table.print();

	Ok(())
}

fn names(args: &Cli) -> Result<(), Error> {
	let hotel = match &args.hotel {
		Some(h) => h.clone(),
		None => bail!("No hotel specified"),
	};

	let config = get_config(args.config.as_ref(), true)?;
	let store_config = match &config.store {
		Some(s) => s,
		None => bail!("store is not configured"),
	};

	let store = StoreSource::from_config(store_config)?;
	let names = store.fetch_vegetable_names(&hotel)?;
	if names.is_empty() {
		println!("No vegetable names registered for hotel: {}", hotel);
		return Ok(());
	}

	for name in names {
		println!("{}", name);
	}
	Ok(())
}

// -------------
// -- HELPERS --
// -------------

/// Loads the full order table, either from a local CSV or the remote
/// sheet, and overlays any actual prices known for the working date.
fn load_book(args: &Cli, session: &mut Session) -> Result<OrderBook, Error> {
	if args.refresh {
		session.clear();
	}
	if let Some(book) = &session.book {
		return Ok(book.clone());
	}

	if let Some(path) = &args.file {
		let mut book = source::file::load_order_book(path)?;
		if let Some(prices_path) = &args.prices {
			let prices = source::file::load_price_records(
				prices_path,
				session.date,
			)?;
			book.apply_price_overrides(&prices);
			session.prices = prices;
		}
		session.book = Some(book.clone());
		return Ok(book);
	}

	let config = get_config(args.config.as_ref(), true)?;
	let sheet = sheet_source(&config)?;

	let mut book = sheet
		.fetch_orders(args.refresh)
		.map_err(|e| retry_hint("orders", e))?;
	let overrides = sheet
		.fetch_price_overrides(session.date)
		.map_err(|e| retry_hint("prices", e))?;
	book.apply_price_overrides(&overrides);
	session.prices = overrides;
	session.book = Some(book.clone());
	Ok(book)
}

/// The working day's rows, with the command-line filters applied.
fn day_book(args: &Cli, session: &mut Session) -> Result<OrderBook, Error> {
	let book = load_book(args, session)?;

	let mut day = book.for_date(session.date);
	if let Some(hotel) = &args.hotel {
		day = match &args.kitchen {
			Some(kitchen) => day.for_kitchen(hotel, kitchen),
			None => day.for_hotel(hotel),
		};
	}
	if let Some(vendor) = &args.vendor {
		day = day.for_vendor(vendor);
	}

	if !session.prices.is_empty() {
		session.note(format!(
			"{} actual prices applied for {}",
			session.prices.len(),
			session.date
		));
	}

	if day.is_empty() {
		println!("No data found for date: {}", session.date);
	}

	Ok(day)
}

fn emit(args: &Cli, date: Date, doc: Document) -> Result<(), Error> {
	if doc.is_empty() {
		return Ok(());
	}
	match output_path(args, date, "txt") {
		Some(path) => doc.write_to(&path),
		None => {
			doc.print();
			Ok(())
		},
	}
}

/// CSV counterpart of emit, sharing the same output-path rules.
fn emit_csv(args: &Cli, date: Date, csv: &str) -> Result<(), Error> {
	match output_path(args, date, "csv") {
		Some(path) => {
			fs::write(&path, csv)?;
			println!("Wrote {}", path);
			Ok(())
		},
		None => {
			print!("{}", csv);
			Ok(())
		},
	}
}

/// Resolves -o to a concrete file path. Pointing -o at a directory
/// picks a dated file name inside it; no -o means stdout.
fn output_path(args: &Cli, date: Date, extension: &str) -> Option<String> {
	let path = args.output.as_ref()?;
	let target = std::path::Path::new(path);
	if target.is_dir() {
		let file =
			format!("orders_{}.{}", date.to_compact_string(), extension);
		return Some(target.join(file).to_string_lossy().into_owned());
	}
	Some(path.clone())
}

/// Wraps retryable source failures with a hint that trying again may
/// help; permanent errors pass through unchanged.
fn retry_hint(what: &str, e: SourceError) -> Error {
	if e.is_retryable() {
		anyhow::anyhow!("temporary failure fetching {}, try again: {}", what, e)
	} else {
		e.into()
	}
}

fn sheet_source(config: &Config) -> Result<SheetSource, Error> {
	let sheets = match &config.sheets {
		Some(s) => s,
		None => bail!("sheets is not configured"),
	};
	SheetSource::from_config(sheets)
}

fn preferred_hotels(args: &Cli) -> Result<Vec<String>, Error> {
	// offline runs never touch the config, so reports stay reproducible
	if args.file.is_some() {
		return Ok(DEFAULT_PREFERRED_HOTELS
			.iter()
			.map(|s| s.to_string())
			.collect());
	}

	let config = get_config(args.config.as_ref(), false)?;
	Ok(config
		.report
		.and_then(|r| r.preferred_hotels)
		.unwrap_or_else(|| {
			DEFAULT_PREFERRED_HOTELS
				.iter()
				.map(|s| s.to_string())
				.collect()
		}))
}

fn working_date(args: &Cli) -> Result<Date, Error> {
	match &args.date {
		Some(d) => Date::from_any_str(d),
		None => Date::from_str(&Local::now().date_naive().to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_retry_hint_only_for_retryable_errors() {
		let transient = SourceError::Api {
			status: 503,
			message: "unavailable".to_string(),
		};
		assert!(retry_hint("prices", transient)
			.to_string()
			.contains("try again"));

		let permanent = SourceError::Input("missing column".to_string());
		assert!(!retry_hint("prices", permanent)
			.to_string()
			.contains("try again"));
	}

	#[test]
	fn test_output_path_directory_gets_dated_name() {
		let dir = std::env::temp_dir();
		let date = Date::from_str("2025-03-01").unwrap();

		let args = Cli::parse_from([
			"mandi",
			"preview",
			"--csv",
			"-o",
			dir.to_str().unwrap(),
		]);
		let path = output_path(&args, date, "csv").unwrap();
		assert!(path.ends_with("orders_20250301.csv"));

		let args = Cli::parse_from(["mandi", "preview", "-o", "bill.txt"]);
		assert_eq!(output_path(&args, date, "txt").unwrap(), "bill.txt");

		let args = Cli::parse_from(["mandi", "preview"]);
		assert!(output_path(&args, date, "txt").is_none());
	}
}
