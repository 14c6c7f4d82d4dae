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
use crate::orders::row::OrderRow;
use crate::util::date::Date;
use crate::util::num::approx_eq;
use crate::util::text::{contains_fold, normalize_component};

/// Identity of a row for reconciliation. Every component is normalized
/// so that padding, case and numeric-formatting drift between the live
/// table and an edited copy do not break matching.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RowKey {
	pub hotel: String,
	pub kitchen: String,
	pub date: String,
	pub vegetable: String,
	pub units: String,
}

impl RowKey {
	pub fn of_row(row: &OrderRow) -> Self {
		RowKey {
			hotel: normalize_component(&row.hotel),
			kitchen: normalize_component(&row.kitchen),
			date: row.date.to_string(),
			vegetable: normalize_component(&row.vegetable),
			units: normalize_component(&row.units),
		}
	}

	pub fn of_edit(edit: &EditRecord) -> Self {
		RowKey {
			hotel: normalize_component(&edit.hotel),
			kitchen: normalize_component(&edit.kitchen),
			date: edit.date.to_string(),
			vegetable: normalize_component(&edit.vegetable),
			units: normalize_component(&edit.units),
		}
	}

	/// True when everything but the vegetable matches exactly and the
	/// other key's vegetable contains ours as a substring. This is the
	/// second matching phase, for names that were shortened or expanded
	/// during editing.
	fn matches_loosely(&self, other: &RowKey) -> bool {
		self.hotel == other.hotel
			&& self.kitchen == other.kitchen
			&& self.date == other.date
			&& self.units == other.units
			&& !self.vegetable.is_empty()
			&& contains_fold(&other.vegetable, &self.vegetable)
	}
}

/// One quantity change detected between the original and edited tables.
#[derive(Clone, Debug, PartialEq)]
pub struct EditRecord {
	pub date: Date,
	pub hotel: String,
	pub kitchen: String,
	pub vegetable: String,
	pub units: String,
	pub old_quantity: f64,
	pub new_quantity: f64,
}

impl EditRecord {
	pub fn delta(&self) -> f64 {
		self.new_quantity - self.old_quantity
	}
}

/// Which matching phase produced a pairing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchPhase {
	Exact,
	Fallback,
}

/// Result of one reconciliation pass.
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
	pub edits: Vec<EditRecord>,
	/// Edited rows no original row could be found for. They carry no
	/// usable old quantity, so they are counted and dropped.
	pub unmatched: usize,
	pub notes: Vec<String>,
}

/// Compares an edited copy of the table against the original and
/// extracts quantity changes. Exact key matches are consumed first;
/// leftovers get one substring-fallback pass on the vegetable name.
/// Each original row can absorb at most one edited row.
pub fn diff(original: &OrderBook, edited: &OrderBook) -> ReconcileOutcome {
	let mut outcome = ReconcileOutcome::default();

	let originals: Vec<(RowKey, &OrderRow)> = original
		.rows()
		.iter()
		.map(|r| (RowKey::of_row(r), r))
		.collect();
	let mut taken = vec![false; originals.len()];

	let mut leftovers: Vec<(RowKey, &OrderRow)> = Vec::new();

	// -- PHASE ONE: exact keys --
	for row in edited.rows() {
		let key = RowKey::of_row(row);
		let found = originals
			.iter()
			.enumerate()
			.find(|(i, (k, _))| !taken[*i] && *k == key);

		match found {
			Some((i, (_, source))) => {
				taken[i] = true;
				record_change(&mut outcome.edits, source, row);
			}
			None => leftovers.push((key, row)),
		}
	}

	// -- PHASE TWO: substring fallback on the vegetable --
	for (key, row) in leftovers {
		let candidates: Vec<usize> = originals
			.iter()
			.enumerate()
			.filter(|(i, (k, _))| !taken[*i] && key.matches_loosely(k))
			.map(|(i, _)| i)
			.collect();

		if candidates.len() > 1 {
			outcome.notes.push(format!(
				"ambiguous edit for '{}': {} possible source rows, using the first",
				row.vegetable,
				candidates.len()
			));
		}

		match candidates.first() {
			Some(&i) => {
				taken[i] = true;
				record_change(&mut outcome.edits, originals[i].1, row);
			}
			None => outcome.unmatched += 1,
		}
	}

	outcome
}

fn record_change(edits: &mut Vec<EditRecord>, source: &OrderRow, edited: &OrderRow) {
	if approx_eq(source.quantity, edited.quantity) {
		return;
	}
	edits.push(EditRecord {
		date: source.date,
		hotel: source.hotel.clone(),
		kitchen: source.kitchen.clone(),
		vegetable: source.vegetable.clone(),
		units: source.units.clone(),
		old_quantity: source.quantity,
		new_quantity: edited.quantity,
	});
}

/// Locates the source row an edit applies to, for writing the change
/// back. Same two phases as diff, reported so callers can log how the
/// row was found.
pub fn find_source<'a>(
	edit: &EditRecord,
	source: &'a OrderBook,
) -> Option<(&'a OrderRow, MatchPhase)> {
	let key = RowKey::of_edit(edit);

	if let Some(row) = source.rows().iter().find(|r| RowKey::of_row(r) == key) {
		return Some((row, MatchPhase::Exact));
	}

	source
		.rows()
		.iter()
		.find(|r| key.matches_loosely(&RowKey::of_row(r)))
		.map(|r| (r, MatchPhase::Fallback))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn book(rows: Vec<OrderRow>) -> OrderBook {
		OrderBook::new(rows)
	}

	fn row(veg: &str, quantity: f64) -> OrderRow {
		OrderRow::sample("2025-03-01", "NOVOTEL", "MAIN", veg, "KG", quantity)
	}

	#[test]
	fn test_unchanged_quantities_produce_no_edits() {
		let original = book(vec![row("TOMATOES", 5.0), row("OKRA", 2.0)]);
		let edited = book(vec![row("TOMATOES", 5.0), row("OKRA", 2.0)]);

		let outcome = diff(&original, &edited);
		assert!(outcome.edits.is_empty());
		assert_eq!(outcome.unmatched, 0);
	}

	#[test]
	fn test_changed_quantity_yields_edit_with_delta() {
		let original = book(vec![row("TOMATOES", 5.0)]);
		let edited = book(vec![row("TOMATOES", 7.0)]);

		let outcome = diff(&original, &edited);
		assert_eq!(outcome.edits.len(), 1);
		let edit = &outcome.edits[0];
		assert_eq!(edit.old_quantity, 5.0);
		assert_eq!(edit.new_quantity, 7.0);
		assert!((edit.delta() - 2.0).abs() < 1e-9);
	}

	#[test]
	fn test_keys_ignore_case_and_padding() {
		let original = book(vec![row("Tomatoes ", 5.0)]);
		let mut changed = row("tomatoes", 6.0);
		changed.units = " kg".to_string();
		let edited = book(vec![changed]);

		let outcome = diff(&original, &edited);
		assert_eq!(outcome.edits.len(), 1);
		// the edit record carries the source row's original spelling
		assert_eq!(outcome.edits[0].vegetable, "Tomatoes ");
	}

	#[test]
	fn test_substring_fallback_matches_shortened_name() {
		let original = book(vec![row("GREEN TOMATOES", 5.0)]);
		let edited = book(vec![row("TOMATOES", 3.0)]);

		let outcome = diff(&original, &edited);
		assert_eq!(outcome.edits.len(), 1);
		assert_eq!(outcome.edits[0].vegetable, "GREEN TOMATOES");
		assert_eq!(outcome.edits[0].new_quantity, 3.0);
		assert_eq!(outcome.unmatched, 0);
	}

	#[test]
	fn test_ambiguous_fallback_is_noted() {
		let original =
			book(vec![row("GREEN TOMATOES", 5.0), row("RED TOMATOES", 5.0)]);
		let edited = book(vec![row("TOMATOES", 3.0)]);

		let outcome = diff(&original, &edited);
		assert_eq!(outcome.edits.len(), 1);
		assert_eq!(outcome.notes.len(), 1);
		assert!(outcome.notes[0].contains("ambiguous"));
	}

	#[test]
	fn test_unmatched_rows_are_counted_and_dropped() {
		let original = book(vec![row("TOMATOES", 5.0)]);
		let edited = book(vec![row("TOMATOES", 5.0), row("DRAGONFRUIT", 9.0)]);

		let outcome = diff(&original, &edited);
		assert!(outcome.edits.is_empty());
		assert_eq!(outcome.unmatched, 1);
	}

	#[test]
	fn test_each_source_row_absorbs_one_edit() {
		// duplicate keys pair positionally, never double-count
		let original = book(vec![row("TOMATOES", 5.0), row("TOMATOES", 5.0)]);
		let edited = book(vec![row("TOMATOES", 7.0), row("TOMATOES", 5.0)]);

		let outcome = diff(&original, &edited);
		assert_eq!(outcome.edits.len(), 1);
		assert_eq!(outcome.unmatched, 0);
	}

	#[test]
	fn test_tiny_float_drift_is_not_an_edit() {
		let original = book(vec![row("TOMATOES", 5.0)]);
		let edited = book(vec![row("TOMATOES", 5.0 + 1e-12)]);

		let outcome = diff(&original, &edited);
		assert!(outcome.edits.is_empty());
	}

	#[test]
	fn test_find_source_reports_phase() {
		let source = book(vec![row("GREEN TOMATOES", 5.0)]);

		let exact = EditRecord {
			date: crate::util::date::Date::from_str("2025-03-01").unwrap(),
			hotel: "NOVOTEL".to_string(),
			kitchen: "MAIN".to_string(),
			vegetable: "GREEN TOMATOES".to_string(),
			units: "KG".to_string(),
			old_quantity: 5.0,
			new_quantity: 6.0,
		};
		let (_, phase) = find_source(&exact, &source).unwrap();
		assert_eq!(phase, MatchPhase::Exact);

		let shortened = EditRecord {
			vegetable: "TOMATOES".to_string(),
			..exact.clone()
		};
		let (row, phase) = find_source(&shortened, &source).unwrap();
		assert_eq!(phase, MatchPhase::Fallback);
		assert_eq!(row.vegetable, "GREEN TOMATOES");
	}
}
