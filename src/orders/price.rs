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

/// An actual price entered for one (date, vegetable, units) key.
/// Persistence is delete-then-insert per date; a later record for the
/// same key simply replaces the earlier one.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceRecord {
	pub date: Date,
	pub vegetable: String,
	pub localized: String,
	pub units: String,
	pub actual_price: f64,
}
