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
use crate::orders::book::OrderBook;
use crate::reports::document::{Document, Page};
use crate::reports::table::Table;
use crate::util::date::Date;
use crate::util::num::fmt_money;

/// Per-hotel spend over an inclusive date range, one line per day. Days
/// with no priced orders still get a line, so gaps in the ledger are
/// visible rather than silently elided.
pub struct HotelSummaryReporter;

impl HotelSummaryReporter {
	pub fn report(
		book: &OrderBook,
		hotel: &str,
		begin: Date,
		end: Date,
	) -> Document {
		let scoped = book.for_hotel(hotel).for_range(begin, end);

		let mut table = Table::new(2);
		table.right_align(vec![1]);
		table.add_header(vec!["DATE", "TOTAL AMOUNT"]);

		let mut grand_total = 0.0;
		let mut date = begin;
		loop {
			let day_total: f64 = scoped
				.for_date(date)
				.rows()
				.iter()
				.filter_map(|r| r.price.map(|p| p * r.quantity))
				.sum::<f64>()
				// + 0.0 normalizes the -0.0 an empty sum produces on
				// newer toolchains
				+ 0.0;
			grand_total += day_total;

			table.add_row(vec![date.to_string(), fmt_money(day_total)]);

			if date >= end {
				break;
			}
			date = date.succ();
		}

		table.add_separator();
		table.add_row(vec![
			"Grand Total".to_string(),
			fmt_money(grand_total),
		]);

		let mut doc = Document::new();
		doc.push(Page {
			title: format!("Hotel Summary - {}", hotel),
			subtitle: Some(format!("From {} to {}", begin, end)),
			lines: table.render(),
			footer: None,
		});
		doc
	}
}
