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

use crate::orders::price::PriceRecord;
use crate::orders::row::OrderRow;
use crate::source::error::SourceError;
use crate::util::date::Date;
use crate::util::num::{parse_price, parse_quantity};

// Column names as they appear in the source sheet header row.
pub const COL_DATE: &str = "DATE";
pub const COL_HOTEL: &str = "MAIN HOTEL NAME";
pub const COL_KITCHEN: &str = "KITCHEN NAME";
pub const COL_VEGETABLE: &str = "PIVOT_VEGETABLE_NAME";
pub const COL_LOCALIZED: &str = "TELUGU NAME";
pub const COL_UNITS: &str = "UNITS";
pub const COL_QUANTITY: &str = "QUANTITY";
pub const COL_PRICE: &str = "PRICE";
pub const COL_VENDOR: &str = "VENDOR";

/// The normalized order table for one fetch. Every report and the
/// reconciler work from a book; fetching again replaces it wholesale.
#[derive(Clone, Debug, Default)]
pub struct OrderBook {
	rows: Vec<OrderRow>,
}

/// Finds a column by name, case-insensitively and ignoring padding.
fn find_column(header: &[String], name: &str) -> Option<usize> {
	header
		.iter()
		.position(|h| h.trim().eq_ignore_ascii_case(name))
}

impl OrderBook {
	pub fn new(rows: Vec<OrderRow>) -> Self {
		OrderBook { rows }
	}

	/// Builds a book from a header row plus raw string records, the shape
	/// both the sheet values API and CSV exports produce. Records shorter
	/// than the header are padded with blanks; longer ones are truncated.
	/// Rows whose date does not parse are skipped rather than fatal.
	pub fn from_records(
		header: &[String],
		records: &[Vec<String>],
	) -> Result<Self, SourceError> {
		let required = [
			COL_DATE,
			COL_HOTEL,
			COL_VEGETABLE,
			COL_UNITS,
			COL_QUANTITY,
		];
		for name in required {
			if find_column(header, name).is_none() {
				return Err(SourceError::Input(format!(
					"missing required column: {}",
					name
				)));
			}
		}

		let date_col = find_column(header, COL_DATE).unwrap_or_default();
		let hotel_col = find_column(header, COL_HOTEL).unwrap_or_default();
		let veg_col = find_column(header, COL_VEGETABLE).unwrap_or_default();
		let units_col = find_column(header, COL_UNITS).unwrap_or_default();
		let qty_col = find_column(header, COL_QUANTITY).unwrap_or_default();
		let kitchen_col = find_column(header, COL_KITCHEN);
		let localized_col = find_column(header, COL_LOCALIZED);
		let price_col = find_column(header, COL_PRICE);
		let vendor_col = find_column(header, COL_VENDOR);

		let cell = |record: &Vec<String>, col: usize| -> String {
			record.get(col).map(|c| c.trim().to_string()).unwrap_or_default()
		};

		let mut rows = Vec::new();
		for record in records {
			let date = match Date::from_any_str(&cell(record, date_col)) {
				Ok(d) => d,
				Err(_) => continue,
			};

			let hotel = cell(record, hotel_col);
			// rows without a kitchen column fall back to the hotel name
			let kitchen = kitchen_col
				.map(|c| cell(record, c))
				.filter(|k| !k.is_empty())
				.unwrap_or_else(|| hotel.clone());

			rows.push(OrderRow {
				date,
				hotel,
				kitchen,
				vegetable: cell(record, veg_col),
				localized: localized_col
					.map(|c| cell(record, c))
					.unwrap_or_default(),
				units: cell(record, units_col),
				quantity: parse_quantity(&cell(record, qty_col)),
				price: price_col.and_then(|c| parse_price(&cell(record, c))),
				vendor: vendor_col
					.map(|c| cell(record, c))
					.filter(|v| !v.is_empty()),
			});
		}

		Ok(OrderBook { rows })
	}

	pub fn rows(&self) -> &[OrderRow] {
		&self.rows
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	// -------------
	// -- FILTERS --
	// -------------

	/// Rows for one date with non-positive quantities dropped. An empty
	/// result is not an error; callers surface an informational message.
	pub fn for_date(&self, date: Date) -> OrderBook {
		self.select(|r| r.date == date && r.quantity > 0.0)
	}

	/// Inclusive date-range variant of the same filter.
	pub fn for_range(&self, begin: Date, end: Date) -> OrderBook {
		self.select(|r| r.date >= begin && r.date <= end && r.quantity > 0.0)
	}

	pub fn for_hotel(&self, hotel: &str) -> OrderBook {
		self.select(|r| r.hotel == hotel)
	}

	pub fn for_kitchen(&self, hotel: &str, kitchen: &str) -> OrderBook {
		self.select(|r| r.hotel == hotel && r.kitchen == kitchen)
	}

	pub fn for_vendor(&self, vendor: &str) -> OrderBook {
		self.select(|r| r.vendor.as_deref() == Some(vendor))
	}

	fn select<F: Fn(&OrderRow) -> bool>(&self, pred: F) -> OrderBook {
		OrderBook {
			rows: self.rows.iter().filter(|r| pred(r)).cloned().collect(),
		}
	}

	// ---------------
	// -- ACCESSORS --
	// ---------------

	pub fn hotels(&self) -> Vec<String> {
		let mut names: Vec<String> =
			self.rows.iter().map(|r| r.hotel.clone()).collect();
		names.sort();
		names.dedup();
		names
	}

	pub fn kitchens(&self, hotel: &str) -> Vec<String> {
		let mut names: Vec<String> = self
			.rows
			.iter()
			.filter(|r| r.hotel == hotel)
			.map(|r| r.kitchen.clone())
			.collect();
		names.sort();
		names.dedup();
		names
	}

	/// Distinct vendors, blank ones skipped.
	pub fn vendors(&self) -> Vec<String> {
		let mut names: Vec<String> = self
			.rows
			.iter()
			.filter_map(|r| r.vendor.clone())
			.collect();
		names.sort();
		names.dedup();
		names
	}

	/// Overlays actual prices onto matching rows. A record matches every
	/// row sharing its (date, vegetable, units) key, trimmed comparison.
	pub fn apply_price_overrides(&mut self, prices: &[PriceRecord]) {
		for price in prices {
			if price.actual_price <= 0.0 {
				continue;
			}
			for row in self.rows.iter_mut() {
				if row.date == price.date
					&& row.vegetable.trim() == price.vegetable.trim()
					&& row.units.trim() == price.units.trim()
				{
					row.price = Some(price.actual_price);
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn header() -> Vec<String> {
		[
			COL_DATE,
			COL_HOTEL,
			COL_KITCHEN,
			COL_VEGETABLE,
			COL_LOCALIZED,
			COL_UNITS,
			COL_QUANTITY,
			COL_PRICE,
			COL_VENDOR,
		]
		.iter()
		.map(|s| s.to_string())
		.collect()
	}

	fn record(cells: &[&str]) -> Vec<String> {
		cells.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn test_from_records_basic() {
		let records = vec![record(&[
			"01/03/2025",
			"NOVOTEL",
			"MAIN KITCHEN",
			"TOMATOES",
			"టమాటాలు",
			"KG",
			"5",
			"10",
			"FRESHCO",
		])];
		let book = OrderBook::from_records(&header(), &records).unwrap();

		assert_eq!(book.len(), 1);
		let row = &book.rows()[0];
		assert_eq!(row.date.to_string(), "2025-03-01");
		assert_eq!(row.hotel, "NOVOTEL");
		assert_eq!(row.quantity, 5.0);
		assert_eq!(row.price, Some(10.0));
		assert_eq!(row.vendor.as_deref(), Some("FRESHCO"));
	}

	#[test]
	fn test_from_records_pads_short_rows() {
		let records = vec![record(&[
			"2025-03-01",
			"NOVOTEL",
			"MAIN KITCHEN",
			"TOMATOES",
		])];
		let book = OrderBook::from_records(&header(), &records).unwrap();

		assert_eq!(book.len(), 1);
		let row = &book.rows()[0];
		assert_eq!(row.units, "");
		assert_eq!(row.quantity, 0.0);
		assert_eq!(row.price, None);
		assert_eq!(row.vendor, None);
	}

	#[test]
	fn test_from_records_skips_bad_dates() {
		let records = vec![
			record(&["soon", "NOVOTEL", "K", "TOMATOES", "", "KG", "5"]),
			record(&["2025-03-01", "NOVOTEL", "K", "ONIONS", "", "KG", "2"]),
		];
		let book = OrderBook::from_records(&header(), &records).unwrap();
		assert_eq!(book.len(), 1);
		assert_eq!(book.rows()[0].vegetable, "ONIONS");
	}

	#[test]
	fn test_from_records_rejects_missing_columns() {
		let header = vec!["DATE".to_string(), "QUANTITY".to_string()];
		let err = OrderBook::from_records(&header, &[]).unwrap_err();
		assert!(err.to_string().contains("missing required column"));
	}

	#[test]
	fn test_for_date_drops_non_positive_quantities() {
		let records = vec![
			record(&["2025-03-01", "NOVOTEL", "K", "TOMATOES", "", "KG", "5"]),
			record(&["2025-03-01", "NOVOTEL", "K", "ONIONS", "", "KG", "0"]),
			record(&["2025-03-01", "NOVOTEL", "K", "OKRA", "", "KG", "oops"]),
			record(&["2025-03-02", "NOVOTEL", "K", "BEANS", "", "KG", "3"]),
		];
		let book = OrderBook::from_records(&header(), &records).unwrap();

		let day = book.for_date(Date::from_str("2025-03-01").unwrap());
		assert_eq!(day.len(), 1);
		assert_eq!(day.rows()[0].vegetable, "TOMATOES");
	}

	#[test]
	fn test_kitchen_defaults_to_hotel() {
		let header: Vec<String> = [
			COL_DATE,
			COL_HOTEL,
			COL_VEGETABLE,
			COL_UNITS,
			COL_QUANTITY,
		]
		.iter()
		.map(|s| s.to_string())
		.collect();
		let records =
			vec![record(&["2025-03-01", "GRANDBAY", "OKRA", "KG", "2"])];
		let book = OrderBook::from_records(&header, &records).unwrap();
		assert_eq!(book.rows()[0].kitchen, "GRANDBAY");
	}

	#[test]
	fn test_apply_price_overrides() {
		let records = vec![
			record(&["2025-03-01", "NOVOTEL", "K", "TOMATOES", "", "KG", "5"]),
			record(&["2025-03-02", "NOVOTEL", "K", "TOMATOES", "", "KG", "5"]),
		];
		let mut book = OrderBook::from_records(&header(), &records).unwrap();

		let date = Date::from_str("2025-03-01").unwrap();
		book.apply_price_overrides(&[PriceRecord {
			date,
			vegetable: "TOMATOES".to_string(),
			localized: String::new(),
			units: "KG".to_string(),
			actual_price: 12.0,
		}]);

		assert_eq!(book.rows()[0].price, Some(12.0));
		assert_eq!(book.rows()[1].price, None); // different date untouched
	}
}
