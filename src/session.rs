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
use crate::orders::price::PriceRecord;
use crate::util::date::Date;

/// State threaded through one command invocation: the working date, the
/// fetched table, any price overrides loaded for that date, and messages
/// accumulated along the way. Passed explicitly; nothing here is global.
pub struct Session {
	pub date: Date,
	pub book: Option<OrderBook>,
	pub prices: Vec<PriceRecord>,
	notes: Vec<String>,
}

impl Session {
	pub fn new(date: Date) -> Self {
		Session {
			date,
			book: None,
			prices: Vec::new(),
			notes: Vec::new(),
		}
	}

	pub fn note(&mut self, message: String) {
		self.notes.push(message);
	}

	pub fn notes(&self) -> &[String] {
		&self.notes
	}

	/// Drops the table and overrides, keeping the date. Used when a
	/// command forces a refetch.
	pub fn clear(&mut self) {
		self.book = None;
		self.prices.clear();
	}
}
