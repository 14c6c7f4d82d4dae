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

/// Standard table renderer for the bill and summary reports. Renders to
/// lines rather than printing directly so pages can go to stdout, a file
/// or a CSV export unchanged.
///
/// Column widths count characters, not bytes; localized vegetable names
/// are multibyte.
pub struct Table {
	column_count: usize,
	rows: Vec<Row>,
	right_align: Vec<bool>, // indicates columns by index
}

pub enum Row {
	Header(Vec<String>),
	Data(Vec<String>),
	Separator,
}

impl Table {
	pub fn new(column_count: usize) -> Self {
		Self {
			column_count,
			rows: Vec::new(),
			right_align: vec![false; column_count],
		}
	}

	/// Adds a header row.
	pub fn add_header(&mut self, row: Vec<&str>) {
		self.rows.push(Row::Header(
			row.into_iter().map(|s| s.to_string()).collect(),
		));
	}

	/// Adds a data row.
	pub fn add_row(&mut self, row: Vec<String>) {
		self.rows.push(Row::Data(row));
	}

	/// Adds a full separator row.
	pub fn add_separator(&mut self) {
		self.rows.push(Row::Separator);
	}

	/// Specifies columns that should be right-aligned by index.
	pub fn right_align(&mut self, cols: Vec<usize>) {
		for col in cols {
			self.right_align[col] = true;
		}
	}

	pub fn render(&self) -> Vec<String> {
		let mut max_widths = vec![0; self.column_count];

		// Calculate maximum column widths for proper spacing
		for row in &self.rows {
			if let Row::Data(data_row) | Row::Header(data_row) = row {
				for (i, value) in data_row.iter().enumerate() {
					max_widths[i] = max_widths[i].max(value.chars().count());
				}
			}
		}

		let mut lines = Vec::new();
		for row in &self.rows {
			let line = match row {
				Row::Header(header_row) => {
					self.render_centered_row(&max_widths, header_row, " | ")
				},
				Row::Data(data_row) => {
					self.render_data_row(&max_widths, data_row, "   ")
				},
				Row::Separator => self.render_separator(&max_widths),
			};
			lines.push(line.trim_end().to_string());
		}

		lines
	}

	pub fn print(&self) {
		println!();
		for line in self.render() {
			println!("{}", line);
		}
	}

	fn render_data_row(
		&self,
		max_widths: &[usize],
		data_row: &[String],
		separator: &str,
	) -> String {
		let mut out = String::new();
		for (i, value) in data_row.iter().enumerate() {
			if self.right_align[i] {
				out.push_str(&format!(
					"{:>width$}",
					value,
					width = max_widths[i]
				));
			} else {
				out.push_str(&format!(
					"{:<width$}",
					value,
					width = max_widths[i]
				));
			}
			if i < data_row.len() - 1 {
				out.push_str(separator);
			}
		}
		out
	}

	fn render_centered_row(
		&self,
		max_widths: &[usize],
		data_row: &[String],
		separator: &str,
	) -> String {
		let mut out = String::new();
		for (i, value) in data_row.iter().enumerate() {
			out.push_str(&Table::center_align(value, max_widths[i]));
			if i < data_row.len() - 1 {
				out.push_str(separator);
			}
		}
		out
	}

	fn render_separator(&self, max_widths: &[usize]) -> String {
		let total_width: usize =
			max_widths.iter().sum::<usize>() + (3 * (self.column_count - 1));
		"-".repeat(total_width)
	}

	fn center_align(value: &str, width: usize) -> String {
		let len = value.chars().count();
		if len >= width {
			return value.to_string();
		}
		let total_padding = width - len;
		let left_padding = total_padding / 2;
		let right_padding = total_padding - left_padding;

		format!(
			"{}{}{}",
			" ".repeat(left_padding),
			value,
			" ".repeat(right_padding)
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_render_alignment() {
		let mut table = Table::new(2);
		table.right_align(vec![1]);
		table.add_header(vec!["VEGETABLE", "TOTAL"]);
		table.add_row(vec!["TOMATOES".to_string(), "50.00".to_string()]);
		table.add_row(vec!["OKRA".to_string(), "8.00".to_string()]);

		let lines = table.render();
		assert_eq!(lines[0], "VEGETABLE | TOTAL");
		assert_eq!(lines[1], "TOMATOES    50.00");
		assert_eq!(lines[2], "OKRA         8.00");
	}

	#[test]
	fn test_render_separator_spans_table() {
		let mut table = Table::new(2);
		table.add_header(vec!["AB", "CD"]);
		table.add_separator();

		let lines = table.render();
		assert_eq!(lines[1], "-------"); // 2 + 3 + 2
	}

	#[test]
	fn test_render_trims_trailing_space() {
		let mut table = Table::new(2);
		table.add_header(vec!["LONG HEADER", "X"]);
		table.add_row(vec!["short".to_string(), "y".to_string()]);

		for line in table.render() {
			assert_eq!(line, line.trim_end());
		}
	}

	#[test]
	fn test_width_counts_chars_not_bytes() {
		let mut table = Table::new(1);
		table.add_header(vec!["NAME"]);
		table.add_row(vec!["టమాటాలు".to_string()]);

		let lines = table.render();
		// header centered over 7 chars
		assert_eq!(lines[0], " NAME");
	}
}
