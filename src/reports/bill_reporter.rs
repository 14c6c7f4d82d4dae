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
use crate::orders::aggregate::{aggregate, grand_total, AggregatedLine};
use crate::orders::book::OrderBook;
use crate::reports::document::{order_partitions, Document, Page};
use crate::reports::table::Table;
use crate::util::date::Date;
use crate::util::num::{fmt_money, fmt_qty};
use anyhow::Error;

/// How a bill run is split into pages. One reporter serves all four
/// shapes; only the partitioning differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Partition {
	None,
	Hotel,
	HotelKitchen,
	Vendor,
}

pub struct BillReporter {
	preferred_hotels: Vec<String>,
}

impl BillReporter {
	pub fn new(preferred_hotels: Vec<String>) -> Self {
		BillReporter { preferred_hotels }
	}

	/// Builds the bill document for one date. The book is expected to be
	/// pre-filtered to that date; empty partitions produce no page.
	pub fn report(
		&self,
		book: &OrderBook,
		date: Date,
		partition: Partition,
	) -> Document {
		let mut doc = Document::new();

		match partition {
			Partition::None => {
				self.push_page(
					&mut doc,
					"Vegetable Bill".to_string(),
					date,
					book,
				);
			},
			Partition::Hotel => {
				let hotels =
					order_partitions(&book.hotels(), &self.preferred_hotels);
				for hotel in hotels {
					self.push_page(
						&mut doc,
						format!("Hotel: {}", hotel),
						date,
						&book.for_hotel(&hotel),
					);
				}
			},
			Partition::HotelKitchen => {
				let hotels =
					order_partitions(&book.hotels(), &self.preferred_hotels);
				for hotel in hotels {
					for kitchen in book.kitchens(&hotel) {
						self.push_page(
							&mut doc,
							format!("Hotel: {} | Kitchen: {}", hotel, kitchen),
							date,
							&book.for_kitchen(&hotel, &kitchen),
						);
					}
				}
			},
			Partition::Vendor => {
				for vendor in book.vendors() {
					self.push_page(
						&mut doc,
						format!("Vendor: {}", vendor),
						date,
						&book.for_vendor(&vendor),
					);
				}
			},
		}

		doc
	}

	/// One bill page rendered as CSV, for handing to spreadsheet users.
	pub fn csv_string(&self, book: &OrderBook) -> Result<String, Error> {
		let lines = aggregate(book.rows());

		let mut writer = csv::Writer::from_writer(Vec::new());
		writer.write_record([
			"VEGETABLE",
			"TELUGU NAME",
			"QUANTITY",
			"UNITS",
			"PRICE",
			"TOTAL",
		])?;
		for line in &lines {
			writer.write_record([
				line.display_name.as_str(),
				line.localized_name.as_str(),
				fmt_qty(line.quantity).as_str(),
				line.units.as_str(),
				line.price.map(fmt_money).unwrap_or_default().as_str(),
				line.total.map(fmt_money).unwrap_or_default().as_str(),
			])?;
		}

		let data = writer
			.into_inner()
			.map_err(|e| anyhow::anyhow!("csv export failed: {}", e))?;
		Ok(String::from_utf8(data)?)
	}

	fn push_page(
		&self,
		doc: &mut Document,
		title: String,
		date: Date,
		book: &OrderBook,
	) {
		let lines = aggregate(book.rows());
		if lines.is_empty() {
			return;
		}

		let total = grand_total(&lines);
		let footer = format!(
			"Total Items: {} | Grand Total: {}",
			lines.len(),
			fmt_money(total)
		);

		doc.push(Page {
			title,
			subtitle: Some(format!("Date: {}", date)),
			lines: bill_table(&lines).render(),
			footer: Some(footer),
		});
	}
}

fn bill_table(lines: &[AggregatedLine]) -> Table {
	let mut table = Table::new(5);
	table.right_align(vec![2, 3, 4]);
	table.add_header(vec![
		"VEGETABLE",
		"TELUGU NAME",
		"QUANTITY",
		"PRICE",
		"TOTAL",
	]);

	for line in lines {
		table.add_row(vec![
			line.display_name.clone(),
			line.localized_name.clone(),
			format!("{} {}", fmt_qty(line.quantity), line.units),
			line.price.map(fmt_money).unwrap_or_default(),
			line.total.map(fmt_money).unwrap_or_default(),
		]);
	}

	table
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::orders::row::OrderRow;

	fn row(hotel: &str, kitchen: &str, veg: &str, quantity: f64) -> OrderRow {
		OrderRow::sample("2025-03-01", hotel, kitchen, veg, "KG", quantity)
	}

	fn date() -> Date {
		Date::from_str("2025-03-01").unwrap()
	}

	#[test]
	fn test_single_page_bill() {
		let mut priced = row("NOVOTEL", "MAIN", "TOMATOES", 5.0);
		priced.price = Some(10.0);
		let book = OrderBook::new(vec![priced]);

		let reporter = BillReporter::new(vec![]);
		let doc = reporter.report(&book, date(), Partition::None);
		let rendered = doc.render();

		assert!(rendered.starts_with("Vegetable Bill\nDate: 2025-03-01\n"));
		assert!(rendered.contains("TOMATOES"));
		assert!(rendered.contains("5 KG"));
		assert!(rendered.contains("50.00"));
		assert!(rendered
			.contains("Total Items: 1 | Grand Total: 50.00"));
	}

	#[test]
	fn test_hotel_pages_follow_preference_order() {
		let book = OrderBook::new(vec![
			row("ALPHA", "K", "OKRA", 1.0),
			row("NOVOTEL", "K", "OKRA", 1.0),
		]);

		let reporter = BillReporter::new(vec!["NOVOTEL".to_string()]);
		let doc = reporter.report(&book, date(), Partition::Hotel);
		let rendered = doc.render();

		let novotel = rendered.find("Hotel: NOVOTEL").unwrap();
		let alpha = rendered.find("Hotel: ALPHA").unwrap();
		assert!(novotel < alpha);
	}

	#[test]
	fn test_kitchen_partition_splits_hotel() {
		let book = OrderBook::new(vec![
			row("NOVOTEL", "MAIN", "OKRA", 1.0),
			row("NOVOTEL", "BANQUET", "OKRA", 2.0),
		]);

		let reporter = BillReporter::new(vec![]);
		let doc =
			reporter.report(&book, date(), Partition::HotelKitchen);
		let rendered = doc.render();

		assert!(rendered.contains("Hotel: NOVOTEL | Kitchen: BANQUET"));
		assert!(rendered.contains("Hotel: NOVOTEL | Kitchen: MAIN"));
	}

	#[test]
	fn test_vendor_partition_skips_unassigned_rows() {
		let mut assigned = row("NOVOTEL", "K", "OKRA", 1.0);
		assigned.vendor = Some("FRESHCO".to_string());
		let book =
			OrderBook::new(vec![assigned, row("NOVOTEL", "K", "BEANS", 1.0)]);

		let reporter = BillReporter::new(vec![]);
		let doc = reporter.report(&book, date(), Partition::Vendor);
		let rendered = doc.render();

		assert!(rendered.contains("Vendor: FRESHCO"));
		assert!(rendered.contains("OKRA"));
		assert!(!rendered.contains("BEANS"));
	}

	#[test]
	fn test_empty_book_renders_no_pages() {
		let reporter = BillReporter::new(vec![]);
		let doc = reporter.report(
			&OrderBook::default(),
			date(),
			Partition::Hotel,
		);
		assert!(doc.is_empty());
	}

	#[test]
	fn test_csv_export() {
		let mut priced = row("NOVOTEL", "MAIN", "TOMATOES", 5.0);
		priced.price = Some(10.0);
		let book = OrderBook::new(vec![priced]);

		let reporter = BillReporter::new(vec![]);
		let csv = reporter.csv_string(&book).unwrap();

		let mut lines = csv.lines();
		assert_eq!(
			lines.next().unwrap(),
			"VEGETABLE,TELUGU NAME,QUANTITY,UNITS,PRICE,TOTAL"
		);
		assert_eq!(lines.next().unwrap(), "TOMATOES,,5,KG,10.00,50.00");
	}
}
