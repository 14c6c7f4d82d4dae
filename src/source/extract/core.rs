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
use crate::config::config_file::Extract;
use crate::source::error::SourceError;
use crate::source::http::Client;
use crate::source::extract::models::{
	ChatRequest, ChatResponse, ContentPart, ImageUrl, Message,
};
use crate::util::text::contains_fold;
use anyhow::{bail, Error};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;
use std::collections::HashMap;

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// One line item extracted from a handwritten list or free text, after
/// name resolution against the hotel's registered vocabulary.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedItem {
	/// The hotel-specific name as resolved.
	pub name: String,
	/// The common name used in the order table.
	pub common_name: String,
	pub units: String,
	pub quantity: f64,
}

/// Adapter for the vision model that turns order photos into line items.
/// The model's reply is treated as untrusted text; everything it claims
/// is validated before use.
pub struct Extractor {
	http: Client,
	model: String,
}

impl Extractor {
	pub fn from_config(config: &Extract) -> Result<Self, Error> {
		let api_url = match &config.api_url {
			Some(url) => url.clone(),
			None => bail!("extract.api_url is not configured"),
		};

		Ok(Extractor {
			http: Client::new(&api_url, config.api_key.clone()),
			model: config
				.model
				.clone()
				.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
		})
	}

	/// Sends the images and optional free text, then parses the reply.
	/// Items the model invents outside the allowed vocabulary are dropped,
	/// each with a note saying so.
	pub fn extract_order_items(
		&self,
		images: &[Vec<u8>],
		free_text: Option<&str>,
		allowed: &[String],
		synonyms: &HashMap<String, String>,
	) -> Result<(Vec<ExtractedItem>, Vec<String>), SourceError> {
		if images.is_empty() && free_text.is_none() {
			return Err(SourceError::Input(
				"nothing to extract: no images and no text".to_string(),
			));
		}

		let mut content = vec![ContentPart::Text {
			text: extraction_prompt(allowed),
		}];
		if let Some(text) = free_text {
			content.push(ContentPart::Text {
				text: format!("Order text:\n{}", text),
			});
		}
		for image in images {
			content.push(ContentPart::ImageUrl {
				image_url: ImageUrl {
					url: format!(
						"data:image/jpeg;base64,{}",
						STANDARD.encode(image)
					),
				},
			});
		}

		let request = ChatRequest {
			model: self.model.clone(),
			messages: vec![Message {
				role: "user".to_string(),
				content,
			}],
			temperature: 0.1,
		};

		let response: ChatResponse =
			self.http.post("chat/completions", &request)?;

		let reply = response
			.choices
			.first()
			.map(|c| c.message.content.clone())
			.ok_or_else(|| {
				SourceError::Parse("model returned no choices".to_string())
			})?;

		parse_items(&reply, allowed, synonyms)
	}
}

fn extraction_prompt(allowed: &[String]) -> String {
	format!(
		"Extract the vegetable order as a JSON array of objects with keys \
		 item_name, quantity and units. Use only these item names: {}. \
		 Reply with the JSON array and nothing else.",
		allowed.join(", ")
	)
}

/// Parses and validates one model reply. Code fences are stripped, the
/// first bracketed slice is taken, and every item is checked field by
/// field. Invalid items are skipped with a note, never silently.
pub fn parse_items(
	reply: &str,
	allowed: &[String],
	synonyms: &HashMap<String, String>,
) -> Result<(Vec<ExtractedItem>, Vec<String>), SourceError> {
	let fence = Regex::new(r"```[a-zA-Z]*").map_err(|e| {
		SourceError::Parse(format!("bad fence pattern: {}", e))
	})?;
	let cleaned = fence.replace_all(reply, "");

	let start = cleaned.find('[');
	let end = cleaned.rfind(']');
	let body = match (start, end) {
		(Some(s), Some(e)) if s < e => &cleaned[s..=e],
		_ => {
			return Err(SourceError::Parse(
				"reply contains no JSON array".to_string(),
			))
		},
	};

	let parsed: serde_json::Value =
		serde_json::from_str(body).map_err(|e| {
			SourceError::Parse(format!("reply is not valid JSON: {}", e))
		})?;
	let items = parsed.as_array().ok_or_else(|| {
		SourceError::Parse("reply is not a JSON array".to_string())
	})?;

	let mut extracted = Vec::new();
	let mut notes = Vec::new();

	for item in items {
		let raw_name = item["item_name"].as_str().unwrap_or("").trim();
		if raw_name.is_empty() {
			notes.push("skipped item with no name".to_string());
			continue;
		}

		let quantity = match item["quantity"] {
			serde_json::Value::Number(ref n) => n.as_f64().unwrap_or(0.0),
			serde_json::Value::String(ref s) => {
				s.trim().parse::<f64>().unwrap_or(0.0)
			},
			_ => 0.0,
		};
		if quantity <= 0.0 {
			notes.push(format!(
				"skipped '{}': quantity is missing or not positive",
				raw_name
			));
			continue;
		}

		let units = item["units"].as_str().unwrap_or("").trim().to_string();
		if units.is_empty() {
			notes.push(format!("skipped '{}': units missing", raw_name));
			continue;
		}

		let name = match resolve_name(raw_name, allowed) {
			Some(n) => n,
			None => {
				notes.push(format!(
					"skipped '{}': not in the allowed vegetable list",
					raw_name
				));
				continue;
			},
		};

		let common_name = resolve_common_name(&name, synonyms);

		extracted.push(ExtractedItem {
			name,
			common_name,
			units,
			quantity,
		});
	}

	Ok((extracted, notes))
}

/// Exact case-insensitive match first, substring either way second.
fn resolve_name(raw: &str, allowed: &[String]) -> Option<String> {
	if let Some(exact) = allowed
		.iter()
		.find(|a| a.trim().eq_ignore_ascii_case(raw))
	{
		return Some(exact.trim().to_string());
	}

	allowed
		.iter()
		.find(|a| contains_fold(a, raw) || contains_fold(raw, a))
		.map(|a| a.trim().to_string())
}

/// Looks up the common name for a hotel-specific one. The map is keyed
/// on uppercased specific names; a substring pass covers spelling drift.
/// Names with no mapping pass through unchanged.
fn resolve_common_name(
	name: &str,
	synonyms: &HashMap<String, String>,
) -> String {
	let upper = name.trim().to_uppercase();
	if let Some(common) = synonyms.get(&upper) {
		return common.clone();
	}

	for (specific, common) in synonyms {
		if contains_fold(specific, &upper) || contains_fold(&upper, specific) {
			return common.clone();
		}
	}

	name.trim().to_string()
}
