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
use crate::orders::aggregate::aggregate;
use crate::orders::book::OrderBook;
use crate::reports::document::{order_partitions, Document, Page};
use crate::reports::table::Table;
use crate::util::date::Date;
use crate::util::num::fmt_qty;
use std::collections::HashMap;

/// Renders the cross-hotel matrix: one row per (vegetable, units), one
/// quantity column per hotel, and a grand-quantity column at the end.
/// Hotels with no order for a row show an explicit zero so the purchaser
/// sees the hole.
pub struct SummaryReporter {
	preferred_hotels: Vec<String>,
}

impl SummaryReporter {
	pub fn new(preferred_hotels: Vec<String>) -> Self {
		SummaryReporter { preferred_hotels }
	}

	/// The vegetable-wise summary for one date, a single page.
	pub fn veg_summary(&self, book: &OrderBook, date: Date) -> Document {
		let mut doc = Document::new();
		if let Some(page) = self.matrix_page(
			book,
			"Vegetable Summary".to_string(),
			date,
		) {
			doc.push(page);
		}
		doc
	}

	/// The vendor-wise summary, one matrix page per vendor.
	pub fn vendor_summary(&self, book: &OrderBook, date: Date) -> Document {
		let mut doc = Document::new();
		for vendor in book.vendors() {
			if let Some(page) = self.matrix_page(
				&book.for_vendor(&vendor),
				format!("Vendor Summary: {}", vendor),
				date,
			) {
				doc.push(page);
			}
		}
		doc
	}

	fn matrix_page(
		&self,
		book: &OrderBook,
		title: String,
		date: Date,
	) -> Option<Page> {
		let lines = aggregate(book.rows());
		if lines.is_empty() {
			return None;
		}

		let hotels =
			order_partitions(&book.hotels(), &self.preferred_hotels);

		// (vegetable, units, hotel) -> summed quantity
		let mut cells: HashMap<(String, String, String), f64> =
			HashMap::new();
		for row in book.rows() {
			*cells
				.entry((
					row.vegetable.clone(),
					row.units.clone(),
					row.hotel.clone(),
				))
				.or_insert(0.0) += row.quantity;
		}

		let mut table = Table::new(3 + hotels.len());
		let mut header = vec!["VEGETABLE", "TELUGU NAME"];
		header.extend(hotels.iter().map(|h| h.as_str()));
		header.push("TOTAL");
		table.add_header(header);
		table.right_align((2..3 + hotels.len()).collect());

		for line in &lines {
			let mut cols = vec![
				line.display_name.clone(),
				line.localized_name.clone(),
			];
			for hotel in &hotels {
				let quantity = cells
					.get(&(
						line.vegetable.clone(),
						line.units.clone(),
						hotel.clone(),
					))
					.copied()
					.unwrap_or(0.0);
				cols.push(format!("{} {}", fmt_qty(quantity), line.units));
			}
			cols.push(format!("{} {}", fmt_qty(line.quantity), line.units));
			table.add_row(cols);
		}

		Some(Page {
			title,
			subtitle: Some(format!("Date: {}", date)),
			lines: table.render(),
			footer: Some(format!("Total Items: {}", lines.len())),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::orders::row::OrderRow;

	fn row(hotel: &str, veg: &str, quantity: f64) -> OrderRow {
		OrderRow::sample("2025-03-01", hotel, "MAIN", veg, "KG", quantity)
	}

	fn date() -> Date {
		Date::from_str("2025-03-01").unwrap()
	}

	#[test]
	fn test_matrix_has_hotel_columns_and_zero_cells() {
		let book = OrderBook::new(vec![
			row("NOVOTEL", "TOMATOES", 5.0),
			row("GRANDBAY", "TOMATOES", 3.0),
			row("NOVOTEL", "OKRA", 2.0),
		]);

		let reporter = SummaryReporter::new(vec![]);
		let rendered = reporter.veg_summary(&book, date()).render();

		assert!(rendered.contains("Vegetable Summary"));
		assert!(rendered.contains("GRANDBAY"));
		assert!(rendered.contains("NOVOTEL"));
		// OKRA was only ordered by NOVOTEL; GRANDBAY shows an explicit 0
		let okra_line = rendered
			.lines()
			.find(|l| l.starts_with("OKRA"))
			.unwrap();
		assert!(okra_line.contains("0 KG"));
		assert!(okra_line.contains("2 KG"));
	}

	#[test]
	fn test_total_column_sums_across_hotels() {
		let book = OrderBook::new(vec![
			row("NOVOTEL", "TOMATOES", 5.0),
			row("GRANDBAY", "TOMATOES", 3.0),
		]);

		let reporter = SummaryReporter::new(vec![]);
		let rendered = reporter.veg_summary(&book, date()).render();

		let line = rendered
			.lines()
			.find(|l| l.starts_with("TOMATOES"))
			.unwrap();
		assert!(line.trim_end().ends_with("8 KG"));
	}

	#[test]
	fn test_vendor_summary_one_page_per_vendor() {
		let mut a = row("NOVOTEL", "TOMATOES", 5.0);
		a.vendor = Some("FRESHCO".to_string());
		let mut b = row("NOVOTEL", "OKRA", 2.0);
		b.vendor = Some("GREENLEAF".to_string());
		let book = OrderBook::new(vec![a, b]);

		let reporter = SummaryReporter::new(vec![]);
		let rendered = reporter.vendor_summary(&book, date()).render();

		assert!(rendered.contains("Vendor Summary: FRESHCO"));
		assert!(rendered.contains("Vendor Summary: GREENLEAF"));
		assert!(rendered.contains('\x0c'));
	}

	#[test]
	fn test_empty_book_is_empty_document() {
		let reporter = SummaryReporter::new(vec![]);
		assert!(reporter
			.veg_summary(&OrderBook::default(), date())
			.is_empty());
	}
}
