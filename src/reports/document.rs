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
use anyhow::Error;
use std::fs;

/// One printable page: a titled section with a rendered table and an
/// optional footer line.
pub struct Page {
	pub title: String,
	pub subtitle: Option<String>,
	pub lines: Vec<String>,
	pub footer: Option<String>,
}

impl Page {
	pub fn render(&self) -> String {
		let mut out = String::new();
		out.push_str(&self.title);
		out.push('\n');
		if let Some(subtitle) = &self.subtitle {
			out.push_str(subtitle);
			out.push('\n');
		}
		out.push('\n');
		for line in &self.lines {
			out.push_str(line);
			out.push('\n');
		}
		if let Some(footer) = &self.footer {
			out.push('\n');
			out.push_str(footer);
			out.push('\n');
		}
		out
	}
}

/// An ordered set of pages making up one report run. Pages are separated
/// by form feeds so printed output breaks where the partitions do.
#[derive(Default)]
pub struct Document {
	pages: Vec<Page>,
}

impl Document {
	pub fn new() -> Self {
		Document::default()
	}

	pub fn push(&mut self, page: Page) {
		self.pages.push(page);
	}

	pub fn is_empty(&self) -> bool {
		self.pages.is_empty()
	}

	pub fn render(&self) -> String {
		self.pages
			.iter()
			.map(|p| p.render())
			.collect::<Vec<String>>()
			.join("\n\x0c\n")
	}

	pub fn print(&self) {
		print!("{}", self.render());
	}

	pub fn write_to(&self, path: &str) -> Result<(), Error> {
		fs::write(path, self.render())?;
		println!("Wrote {}", path);
		Ok(())
	}
}

/// Orders partition names for rendering: names on the preferred list
/// come first, in list order, and the rest follow alphabetically.
pub fn order_partitions(
	available: &[String],
	preferred: &[String],
) -> Vec<String> {
	let mut ordered = Vec::new();

	for name in preferred {
		if available.contains(name) {
			ordered.push(name.clone());
		}
	}

	let mut rest: Vec<String> = available
		.iter()
		.filter(|n| !preferred.contains(n))
		.cloned()
		.collect();
	rest.sort();
	ordered.extend(rest);

	ordered
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_page_render_shape() {
		let page = Page {
			title: "Hotel: NOVOTEL".to_string(),
			subtitle: Some("Date: 2025-03-01".to_string()),
			lines: vec!["a".to_string(), "b".to_string()],
			footer: Some("Total Items: 2".to_string()),
		};

		assert_eq!(
			page.render(),
			"Hotel: NOVOTEL\nDate: 2025-03-01\n\na\nb\n\nTotal Items: 2\n"
		);
	}

	#[test]
	fn test_document_joins_pages_with_form_feed() {
		let mut doc = Document::new();
		for title in ["one", "two"] {
			doc.push(Page {
				title: title.to_string(),
				subtitle: None,
				lines: vec![],
				footer: None,
			});
		}

		assert_eq!(doc.render(), "one\n\n\n\x0c\ntwo\n\n");
	}

	#[test]
	fn test_order_partitions_preferred_first() {
		let available = vec![
			"ZETA".to_string(),
			"NOVOTEL".to_string(),
			"ALPHA".to_string(),
		];
		let preferred =
			vec!["NOVOTEL".to_string(), "GRANDBAY".to_string()];

		assert_eq!(
			order_partitions(&available, &preferred),
			vec!["NOVOTEL", "ALPHA", "ZETA"]
		);
	}

	#[test]
	fn test_order_partitions_no_preferences() {
		let available = vec!["B".to_string(), "A".to_string()];
		assert_eq!(order_partitions(&available, &[]), vec!["A", "B"]);
	}
}
