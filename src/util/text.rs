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

use crate::util::num::fmt_qty;

/// Normalizes one component of a row key: blank stays empty, numeric
/// text collapses to a canonical form ("5.0" and "5" compare equal),
/// everything else is trimmed and lowercased.
pub fn normalize_component(raw: &str) -> String {
	let trimmed = raw.trim();
	if trimmed.is_empty() {
		return String::new();
	}

	if let Ok(n) = trimmed.parse::<f64>() {
		if n.is_finite() {
			return fmt_qty(n);
		}
	}

	trimmed.to_lowercase()
}

/// Case-insensitive substring containment, used by the fallback phases
/// of edit matching and vegetable-name resolution.
pub fn contains_fold(haystack: &str, needle: &str) -> bool {
	haystack
		.to_uppercase()
		.contains(needle.to_uppercase().as_str())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_normalize_trims_and_lowercases() {
		assert_eq!(normalize_component("Tomatoes "), "tomatoes");
		assert_eq!(normalize_component("  KG"), "kg");
	}

	#[test]
	fn test_normalize_blank_is_empty() {
		assert_eq!(normalize_component(""), "");
		assert_eq!(normalize_component("   "), "");
	}

	#[test]
	fn test_normalize_collapses_numeric_forms() {
		assert_eq!(normalize_component("5.0"), normalize_component("5"));
		assert_eq!(normalize_component("2.50"), "2.5");
	}

	#[test]
	fn test_contains_fold() {
		assert!(contains_fold("GREEN TOMATOES", "tomatoes"));
		assert!(contains_fold("tomato", "TOMATO"));
		assert!(!contains_fold("ONIONS", "tomato"));
	}
}
