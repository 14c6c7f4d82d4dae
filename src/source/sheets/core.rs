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
use crate::config::config_file::Sheets;
use crate::orders::book::{
	OrderBook, COL_DATE, COL_LOCALIZED, COL_UNITS, COL_VEGETABLE,
};
use crate::orders::price::PriceRecord;
use crate::orders::reconcile::EditRecord;
use crate::source::error::SourceError;
use crate::source::http::Client;
use crate::source::sheets::models::{
	AppendBody, AppendResponse, BatchUpdateBody, BatchUpdateResponse,
	ValueRange, ValueRangeQuery, ValueUpdate,
};
use crate::util::date::Date;
use crate::util::num::{fmt_qty, parse_price};
use anyhow::{bail, Error};
use std::cell::RefCell;
use std::time::{Duration, Instant};

const DEFAULT_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Column holding prices entered after the fact, appended to the sheet
/// on first use.
pub const COL_ACTUAL_PRICE: &str = "ACTUAL PRICE";

/// Fetches are cached this long; mutations invalidate early.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Adapter for the spreadsheet holding the live order table.
pub struct SheetSource {
	http: Client,
	spreadsheet_id: String,
	sheet_name: String,
	edit_log_sheet: Option<String>,
	cache: RefCell<Option<(Instant, Vec<Vec<String>>)>>,
}

impl SheetSource {
	pub fn from_config(config: &Sheets) -> Result<Self, Error> {
		let spreadsheet_id = match &config.spreadsheet_id {
			Some(id) => id.clone(),
			None => bail!("sheets.spreadsheet_id is not configured"),
		};
		let sheet_name = match &config.sheet_name {
			Some(name) => name.clone(),
			None => bail!("sheets.sheet_name is not configured"),
		};

		let api_url = config.api_url.as_deref().unwrap_or(DEFAULT_API_URL);

		Ok(SheetSource {
			http: Client::new(api_url, config.api_key.clone()),
			spreadsheet_id,
			sheet_name,
			edit_log_sheet: config.edit_log_sheet.clone(),
			cache: RefCell::new(None),
		})
	}

	/// Fetches the whole order table. Raw values are cached briefly so a
	/// run touching several reports does not hammer the API; pass refresh
	/// to bypass the cache.
	pub fn fetch_orders(&self, refresh: bool) -> Result<OrderBook, SourceError> {
		let values = self.fetch_values(refresh)?;
		if values.is_empty() {
			return Ok(OrderBook::default());
		}

		OrderBook::from_records(&values[0], &values[1..])
	}

	pub fn invalidate(&self) {
		*self.cache.borrow_mut() = None;
	}

	/// Prices entered for one date, read from the actual-price column.
	/// A sheet without that column simply has no overrides yet.
	pub fn fetch_price_overrides(
		&self,
		date: Date,
	) -> Result<Vec<PriceRecord>, SourceError> {
		let values = self.fetch_values(false)?;
		if values.is_empty() {
			return Ok(Vec::new());
		}

		let header = &values[0];
		let date_col = match position(header, COL_DATE) {
			Some(c) => c,
			None => return Ok(Vec::new()),
		};
		let veg_col = match position(header, COL_VEGETABLE) {
			Some(c) => c,
			None => return Ok(Vec::new()),
		};
		let units_col = match position(header, COL_UNITS) {
			Some(c) => c,
			None => return Ok(Vec::new()),
		};
		let price_col = match position(header, COL_ACTUAL_PRICE) {
			Some(c) => c,
			None => return Ok(Vec::new()),
		};
		let localized_col = position(header, COL_LOCALIZED);

		let mut records = Vec::new();
		for row in &values[1..] {
			let row_date = match Date::from_any_str(cell(row, date_col).as_str())
			{
				Ok(d) => d,
				Err(_) => continue,
			};
			if row_date != date {
				continue;
			}

			let price = match parse_price(&cell(row, price_col)) {
				Some(p) if p > 0.0 => p,
				_ => continue,
			};

			records.push(PriceRecord {
				date,
				vegetable: cell(row, veg_col),
				localized: localized_col
					.map(|c| cell(row, c))
					.unwrap_or_default(),
				units: cell(row, units_col),
				actual_price: price,
			});
		}

		Ok(records)
	}

	/// Writes actual prices back into the sheet. Rows are matched on the
	/// (date, vegetable, units) key; the actual-price column is created
	/// when the sheet does not have one yet. Errors when nothing matched,
	/// since a silent no-op would look like success.
	pub fn write_price_overrides(
		&self,
		date: Date,
		prices: &[PriceRecord],
	) -> Result<u32, SourceError> {
		let values = self.fetch_values(true)?;
		if values.is_empty() {
			return Err(SourceError::Input(
				"cannot update prices in an empty sheet".to_string(),
			));
		}

		let data = plan_price_updates(&values, date, prices, &self.sheet_name)?;

		let body = BatchUpdateBody {
			value_input_option: "USER_ENTERED".to_string(),
			data,
		};

		let endpoint =
			format!("{}/values:batchUpdate", self.spreadsheet_id);
		let response: BatchUpdateResponse = self.http.post(&endpoint, &body)?;

		self.invalidate();
		Ok(response.total_updated_cells.unwrap_or(0))
	}

	/// Appends accepted edits to the audit tab, one row per edit.
	pub fn append_edit_log(
		&self,
		edits: &[EditRecord],
	) -> Result<u32, SourceError> {
		let sheet = match &self.edit_log_sheet {
			Some(s) => s,
			None => {
				return Err(SourceError::Input(
					"sheets.edit_log_sheet is not configured".to_string(),
				))
			},
		};

		let body = AppendBody {
			values: edits
				.iter()
				.map(|e| {
					vec![
						e.date.to_sheet_string(),
						e.hotel.clone(),
						e.kitchen.clone(),
						e.vegetable.clone(),
						e.units.clone(),
						fmt_qty(e.old_quantity),
						fmt_qty(e.new_quantity),
						fmt_qty(e.delta()),
					]
				})
				.collect(),
		};

		let endpoint = format!(
			"{}/values/{}:append?valueInputOption=USER_ENTERED",
			self.spreadsheet_id, sheet
		);
		let response: AppendResponse = self.http.post(&endpoint, &body)?;

		Ok(response
			.updates
			.and_then(|u| u.updated_rows)
			.unwrap_or(0))
	}

	fn fetch_values(
		&self,
		refresh: bool,
	) -> Result<Vec<Vec<String>>, SourceError> {
		if !refresh {
			if let Some((fetched_at, values)) = self.cache.borrow().as_ref() {
				if fetched_at.elapsed() < CACHE_TTL {
					return Ok(values.clone());
				}
			}
		}

		let endpoint =
			format!("{}/values/{}", self.spreadsheet_id, self.sheet_name);
		let range: ValueRange = self.http.get(
			&endpoint,
			Some(ValueRangeQuery {
				value_render_option: "FORMATTED_VALUE".to_string(),
			}),
		)?;

		*self.cache.borrow_mut() =
			Some((Instant::now(), range.values.clone()));
		Ok(range.values)
	}
}

fn position(header: &[String], name: &str) -> Option<usize> {
	header
		.iter()
		.position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn cell(row: &[String], col: usize) -> String {
	row.get(col).map(|c| c.trim().to_string()).unwrap_or_default()
}

/// Plans the batch of single-cell updates for one price write. Row 1 is
/// the header; data rows follow. Returns the header-extension update
/// first when the actual-price column has to be created.
fn plan_price_updates(
	values: &[Vec<String>],
	date: Date,
	prices: &[PriceRecord],
	sheet_name: &str,
) -> Result<Vec<ValueUpdate>, SourceError> {
	let header = &values[0];
	for name in [COL_DATE, COL_VEGETABLE, COL_UNITS] {
		if position(header, name).is_none() {
			return Err(SourceError::Input(format!(
				"missing required column: {}",
				name
			)));
		}
	}
	let date_col = position(header, COL_DATE).unwrap_or_default();
	let veg_col = position(header, COL_VEGETABLE).unwrap_or_default();
	let units_col = position(header, COL_UNITS).unwrap_or_default();

	let mut data = Vec::new();

	let price_col = match position(header, COL_ACTUAL_PRICE) {
		Some(c) => c,
		None => {
			let c = header.len();
			data.push(ValueUpdate {
				range: format!("{}!{}1", sheet_name, column_letter(c)),
				values: vec![vec![COL_ACTUAL_PRICE.to_string()]],
			});
			c
		},
	};

	let mut matched = 0;
	for (i, row) in values.iter().enumerate().skip(1) {
		let row_date = match Date::from_any_str(&cell(row, date_col)) {
			Ok(d) => d,
			Err(_) => continue,
		};
		if row_date != date {
			continue;
		}

		for price in prices {
			if price.actual_price <= 0.0 {
				continue;
			}
			if cell(row, veg_col) == price.vegetable.trim()
				&& cell(row, units_col) == price.units.trim()
			{
				data.push(ValueUpdate {
					range: format!(
						"{}!{}{}",
						sheet_name,
						column_letter(price_col),
						i + 1
					),
					values: vec![vec![fmt_qty(price.actual_price)]],
				});
				matched += 1;
				break;
			}
		}
	}

	if matched == 0 {
		return Err(SourceError::Input(
			"no matching rows found to update prices".to_string(),
		));
	}

	Ok(data)
}

/// Zero-based column index to its A1 letter ("AA" past 25).
pub fn column_letter(mut idx: usize) -> String {
	let mut letters = Vec::new();
	loop {
		letters.push(b'A' + (idx % 26) as u8);
		if idx < 26 {
			break;
		}
		idx = idx / 26 - 1;
	}
	letters.reverse();
	String::from_utf8_lossy(&letters).to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
		rows.iter()
			.map(|r| r.iter().map(|c| c.to_string()).collect())
			.collect()
	}

	fn price(veg: &str, units: &str, actual: f64) -> PriceRecord {
		PriceRecord {
			date: Date::from_str("2025-03-01").unwrap(),
			vegetable: veg.to_string(),
			localized: String::new(),
			units: units.to_string(),
			actual_price: actual,
		}
	}

	#[test]
	fn test_column_letter() {
		assert_eq!(column_letter(0), "A");
		assert_eq!(column_letter(7), "H");
		assert_eq!(column_letter(25), "Z");
		assert_eq!(column_letter(26), "AA");
		assert_eq!(column_letter(27), "AB");
		assert_eq!(column_letter(51), "AZ");
		assert_eq!(column_letter(52), "BA");
	}

	#[test]
	fn test_plan_updates_existing_column() {
		let values = grid(&[
			&["DATE", "PIVOT_VEGETABLE_NAME", "UNITS", "ACTUAL PRICE"],
			&["01/03/2025", "TOMATOES", "KG", ""],
			&["02/03/2025", "TOMATOES", "KG", ""],
		]);
		let date = Date::from_str("2025-03-01").unwrap();

		let data = plan_price_updates(
			&values,
			date,
			&[price("TOMATOES", "KG", 12.0)],
			"Orders",
		)
		.unwrap();

		assert_eq!(data.len(), 1);
		assert_eq!(data[0].range, "Orders!D2");
		assert_eq!(data[0].values, vec![vec!["12".to_string()]]);
	}

	#[test]
	fn test_plan_updates_creates_column() {
		let values = grid(&[
			&["DATE", "PIVOT_VEGETABLE_NAME", "UNITS"],
			&["01/03/2025", "TOMATOES", "KG"],
		]);
		let date = Date::from_str("2025-03-01").unwrap();

		let data = plan_price_updates(
			&values,
			date,
			&[price("TOMATOES", "KG", 12.5)],
			"Orders",
		)
		.unwrap();

		assert_eq!(data.len(), 2);
		assert_eq!(data[0].range, "Orders!D1");
		assert_eq!(data[0].values, vec![vec!["ACTUAL PRICE".to_string()]]);
		assert_eq!(data[1].range, "Orders!D2");
	}

	#[test]
	fn test_plan_updates_errors_on_no_match() {
		let values = grid(&[
			&["DATE", "PIVOT_VEGETABLE_NAME", "UNITS", "ACTUAL PRICE"],
			&["01/03/2025", "TOMATOES", "KG", ""],
		]);
		let date = Date::from_str("2025-03-01").unwrap();

		let err = plan_price_updates(
			&values,
			date,
			&[price("DRAGONFRUIT", "KG", 12.0)],
			"Orders",
		)
		.unwrap_err();
		assert!(err.to_string().contains("no matching rows"));
	}

	#[test]
	fn test_plan_updates_skips_non_positive_prices() {
		let values = grid(&[
			&["DATE", "PIVOT_VEGETABLE_NAME", "UNITS", "ACTUAL PRICE"],
			&["01/03/2025", "TOMATOES", "KG", ""],
		]);
		let date = Date::from_str("2025-03-01").unwrap();

		let result = plan_price_updates(
			&values,
			date,
			&[price("TOMATOES", "KG", 0.0)],
			"Orders",
		);
		assert!(result.is_err());
	}
}
