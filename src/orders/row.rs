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

use crate::util::date::Date;

/// One order line as fetched from the source table. Immutable for the
/// duration of a run; superseded by the next fetch. Price is absent when
/// the source cell is blank or unparseable, never zero-filled.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderRow {
	pub date: Date,
	pub hotel: String,
	pub kitchen: String,
	pub vegetable: String,
	pub localized: String,
	pub units: String,
	pub quantity: f64,
	pub price: Option<f64>,
	pub vendor: Option<String>,
}

impl OrderRow {
	#[cfg(test)]
	pub fn sample(
		date: &str,
		hotel: &str,
		kitchen: &str,
		vegetable: &str,
		units: &str,
		quantity: f64,
	) -> Self {
		OrderRow {
			date: Date::from_str(date).unwrap(),
			hotel: hotel.to_string(),
			kitchen: kitchen.to_string(),
			vegetable: vegetable.to_string(),
			localized: String::new(),
			units: units.to_string(),
			quantity,
			price: None,
			vendor: None,
		}
	}
}
