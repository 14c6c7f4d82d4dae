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

/// Tolerance for change detection between an original and an edited
/// quantity. Strict float inequality flags rows that were never touched.
pub const QTY_EPSILON: f64 = 1e-9;

/// Coerces a raw quantity cell to a number. Malformed input becomes 0
/// rather than an error; rows with non-positive quantities get dropped
/// by the date filter downstream.
pub fn parse_quantity(raw: &str) -> f64 {
	match raw.trim().parse::<f64>() {
		Ok(q) if q.is_finite() => q,
		_ => 0.0,
	}
}

/// Coerces a raw price cell. Blank or malformed prices are absent, not
/// zero, so that line totals stay blank instead of showing 0.00.
pub fn parse_price(raw: &str) -> Option<f64> {
	let trimmed = raw.trim();
	if trimmed.is_empty() {
		return None;
	}

	match trimmed.parse::<f64>() {
		Ok(p) if p.is_finite() => Some(p),
		_ => None,
	}
}

pub fn approx_eq(a: f64, b: f64) -> bool {
	(a - b).abs() <= QTY_EPSILON
}

/// Formats a quantity without trailing zeroes: 5.0 -> "5", 2.50 -> "2.5".
/// Quantities are shown to at most three decimal places.
pub fn fmt_qty(q: f64) -> String {
	let mut s = format!("{:.3}", q);
	while s.ends_with('0') {
		s.pop();
	}
	if s.ends_with('.') {
		s.pop();
	}
	// normalizes "-0" from tiny negative values
	if s == "-0" {
		s = "0".to_string();
	}
	s
}

/// Money is always shown with two decimal places.
pub fn fmt_money(v: f64) -> String {
	format!("{:.2}", v)
}
