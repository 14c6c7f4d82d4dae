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

use crate::orders::row::OrderRow;
use std::collections::{BTreeMap, BTreeSet};

/// One line of an aggregated bill or summary. Derived on every call,
/// never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedLine {
	/// Raw vegetable name, the grouping key together with units.
	pub vegetable: String,
	/// Vegetable name, qualified with " (UNITS)" when the same vegetable
	/// appears under more than one unit in the input.
	pub display_name: String,
	pub localized_name: String,
	pub quantity: f64,
	pub units: String,
	/// First price found among contributing rows, in input order.
	pub price: Option<f64>,
	/// price × quantity, only when the price is positive.
	pub total: Option<f64>,
}

#[derive(Default)]
struct Group {
	localized: String,
	quantity: f64,
	price: Option<f64>,
}

/// Groups rows by (vegetable, units), sums quantities and computes line
/// totals. Pure function of its input slice; quantities under different
/// units are never summed together, only disambiguated in the display
/// name. Output is sorted ascending by display name. Groups whose summed
/// quantity is not positive are dropped.
pub fn aggregate(rows: &[OrderRow]) -> Vec<AggregatedLine> {
	let mut groups: BTreeMap<(String, String), Group> = BTreeMap::new();
	let mut units_by_veg: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

	for row in rows {
		units_by_veg
			.entry(row.vegetable.clone())
			.or_default()
			.insert(row.units.clone());

		let group = groups
			.entry((row.vegetable.clone(), row.units.clone()))
			.or_default();

		group.quantity += row.quantity;
		if group.localized.is_empty() && !row.localized.is_empty() {
			group.localized = row.localized.clone();
		}
		// first price wins; no attempt to reconcile disagreeing prices
		if group.price.is_none() {
			group.price = row.price;
		}
	}

	let mut lines: Vec<AggregatedLine> = groups
		.into_iter()
		.filter(|(_, g)| g.quantity > 0.0)
		.map(|((vegetable, units), group)| {
			let ambiguous = units_by_veg
				.get(&vegetable)
				.map(|u| u.len() > 1)
				.unwrap_or(false);

			let display_name = if ambiguous {
				format!("{} ({})", vegetable, units)
			} else {
				vegetable.clone()
			};

			let total = group
				.price
				.filter(|p| *p > 0.0)
				.map(|p| p * group.quantity);

			AggregatedLine {
				vegetable,
				display_name,
				localized_name: group.localized,
				quantity: group.quantity,
				units,
				price: group.price,
				total,
			}
		})
		.collect();

	lines.sort_by(|a, b| a.display_name.cmp(&b.display_name));
	lines
}

/// Grand total for a rendered partition: the sum of the line totals that
/// exist. Blank totals are skipped, not treated as zero.
pub fn grand_total(lines: &[AggregatedLine]) -> f64 {
	// + 0.0 normalizes the -0.0 an empty sum produces on newer toolchains
	lines.iter().filter_map(|l| l.total).sum::<f64>() + 0.0
}
