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

use anyhow::{bail, Error};
use std::cmp::Ordering;
use std::fmt;

/// Calendar date. The source sheet stores dates as DD/MM/YYYY while
/// everything user-facing uses YYYY-MM-DD, so both are parsed and
/// rendered here.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct Date {
	year: u32,
	month: u8,
	day: u8,
}

impl Date {
	/// Constructor to parse a string in the "YYYY-mm-dd" format
	pub fn from_str(date_str: &str) -> Result<Date, Error> {
		let parts: Vec<&str> = date_str.trim().split('-').collect();
		if parts.len() != 3 {
			bail!("Date format must be YYYY-MM-DD");
		}

		Date::from_parts(parts[0], parts[1], parts[2])
	}

	/// Parses the sheet's "dd/mm/YYYY" format.
	pub fn from_sheet_str(date_str: &str) -> Result<Date, Error> {
		let parts: Vec<&str> = date_str.trim().split('/').collect();
		if parts.len() != 3 {
			bail!("Sheet date format must be DD/MM/YYYY");
		}

		Date::from_parts(parts[2], parts[1], parts[0])
	}

	/// Accepts either format; source rows come from both the sheet and
	/// our own CSV exports.
	pub fn from_any_str(date_str: &str) -> Result<Date, Error> {
		Date::from_str(date_str).or_else(|_| Date::from_sheet_str(date_str))
	}

	fn from_parts(year: &str, month: &str, day: &str) -> Result<Date, Error> {
		let year = year.parse::<u32>()?;
		let month = month.parse::<u8>()?;
		let day = day.parse::<u8>()?;

		if !Date::is_valid_date(year, month, day) {
			bail!("Invalid date");
		}

		Ok(Date { year, month, day })
	}

	/// Renders in the sheet's "dd/mm/YYYY" format.
	pub fn to_sheet_string(&self) -> String {
		format!("{:02}/{:02}/{:04}", self.day, self.month, self.year)
	}

	/// Renders as "YYYYmmdd", used in output file names.
	pub fn to_compact_string(&self) -> String {
		format!("{:04}{:02}{:02}", self.year, self.month, self.day)
	}

	/// The next calendar day. Used to walk inclusive date ranges.
	pub fn succ(&self) -> Date {
		let mut year = self.year;
		let mut month = self.month;
		let mut day = self.day + 1;

		if day > Date::days_in_month(year, month) {
			day = 1;
			month += 1;
		}
		if month > 12 {
			month = 1;
			year += 1;
		}

		Date { year, month, day }
	}

	fn is_leap_year(year: u32) -> bool {
		(year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
	}

	fn days_in_month(year: u32, month: u8) -> u8 {
		match month {
			1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
			4 | 6 | 9 | 11 => 30,
			2 => {
				if Date::is_leap_year(year) {
					29
				} else {
					28
				}
			},
			_ => 0, // Invalid month
		}
	}

	fn is_valid_date(year: u32, month: u8, day: u8) -> bool {
		if !(1..=12).contains(&month) {
			return false;
		}
		if day < 1 || day > Date::days_in_month(year, month) {
			return false;
		}
		true
	}
}

impl PartialOrd for Date {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Date {
	fn cmp(&self, other: &Self) -> Ordering {
		(self.year, self.month, self.day).cmp(&(
			other.year,
			other.month,
			other.day,
		))
	}
}

impl fmt::Display for Date {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_iso_round_trip() {
		let date = Date::from_str("2025-03-01").unwrap();
		assert_eq!(date.to_string(), "2025-03-01");
	}

	#[test]
	fn test_sheet_format_round_trip() {
		let date = Date::from_sheet_str("01/03/2025").unwrap();
		assert_eq!(date.to_string(), "2025-03-01");
		assert_eq!(date.to_sheet_string(), "01/03/2025");
	}

	#[test]
	fn test_from_any_str_accepts_both() {
		let a = Date::from_any_str("2025-03-01").unwrap();
		let b = Date::from_any_str("01/03/2025").unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn test_rejects_malformed() {
		assert!(Date::from_str("2025-13-01").is_err());
		assert!(Date::from_str("2025-02-30").is_err());
		assert!(Date::from_sheet_str("2025-03-01").is_err());
		assert!(Date::from_any_str("not a date").is_err());
	}

	#[test]
	fn test_succ_rolls_over_month_and_year() {
		let date = Date::from_str("2025-03-31").unwrap();
		assert_eq!(date.succ().to_string(), "2025-04-01");

		let date = Date::from_str("2025-12-31").unwrap();
		assert_eq!(date.succ().to_string(), "2026-01-01");

		let date = Date::from_str("2024-02-28").unwrap();
		assert_eq!(date.succ().to_string(), "2024-02-29");
	}

	#[test]
	fn test_ordering() {
		let a = Date::from_str("2025-03-01").unwrap();
		let b = Date::from_str("2025-03-02").unwrap();
		assert!(a < b);
	}

	#[test]
	fn test_compact_string() {
		let date = Date::from_str("2025-03-01").unwrap();
		assert_eq!(date.to_compact_string(), "20250301");
	}
}
