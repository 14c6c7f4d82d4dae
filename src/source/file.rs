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
use crate::orders::book::{OrderBook, COL_UNITS, COL_VEGETABLE};
use crate::orders::price::PriceRecord;
use crate::source::sheets::core::COL_ACTUAL_PRICE;
use crate::util::date::Date;
use crate::util::num::parse_price;
use anyhow::{bail, Error};
use csv::ReaderBuilder;

/// Loads an order table from a CSV export, the offline counterpart of
/// the sheet fetch. Same header names, same coercion rules.
pub fn load_order_book(path: &str) -> Result<OrderBook, Error> {
	let (header, records) = read_csv(path)?;
	Ok(OrderBook::from_records(&header, &records)?)
}

/// Loads actual prices for one date from a CSV file with at least the
/// vegetable, units and actual-price columns.
pub fn load_price_records(
	path: &str,
	date: Date,
) -> Result<Vec<PriceRecord>, Error> {
	let (header, records) = read_csv(path)?;

	let veg_col = position(&header, COL_VEGETABLE);
	let units_col = position(&header, COL_UNITS);
	let price_col = position(&header, COL_ACTUAL_PRICE);

	let (veg_col, units_col, price_col) = match (veg_col, units_col, price_col)
	{
		(Some(v), Some(u), Some(p)) => (v, u, p),
		_ => bail!(
			"price file must have {}, {} and {} columns",
			COL_VEGETABLE,
			COL_UNITS,
			COL_ACTUAL_PRICE
		),
	};

	let mut prices = Vec::new();
	for record in records {
		let actual_price = match record
			.get(price_col)
			.and_then(|c| parse_price(c))
		{
			Some(p) if p > 0.0 => p,
			_ => continue,
		};

		prices.push(PriceRecord {
			date,
			vegetable: cell(&record, veg_col),
			localized: String::new(),
			units: cell(&record, units_col),
			actual_price,
		});
	}

	Ok(prices)
}

fn read_csv(path: &str) -> Result<(Vec<String>, Vec<Vec<String>>), Error> {
	let mut reader = ReaderBuilder::new()
		.flexible(true)
		.from_path(path)
		.map_err(|e| anyhow::anyhow!("cannot read {}: {}", path, e))?;

	let header: Vec<String> = reader
		.headers()?
		.iter()
		.map(|h| h.to_string())
		.collect();

	let mut records = Vec::new();
	for result in reader.records() {
		let record = result?;
		records.push(record.iter().map(|c| c.to_string()).collect());
	}

	Ok((header, records))
}

fn position(header: &[String], name: &str) -> Option<usize> {
	header
		.iter()
		.position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn cell(record: &[String], col: usize) -> String {
	record.get(col).map(|c| c.trim().to_string()).unwrap_or_default()
}
