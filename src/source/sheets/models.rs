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
use serde::{Deserialize, Serialize};

// -------------
// -- SENDING --
// -------------

#[derive(Debug, Serialize)]
pub struct ValueRangeQuery {
	#[serde(rename = "valueRenderOption")]
	pub value_render_option: String,
}

#[derive(Debug, Serialize)]
pub struct AppendBody {
	pub values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateBody {
	pub value_input_option: String,
	pub data: Vec<ValueUpdate>,
}

#[derive(Debug, Serialize)]
pub struct ValueUpdate {
	pub range: String,
	pub values: Vec<Vec<String>>,
}

// ---------------
// -- RECEIVING --
// ---------------

#[derive(Debug, Default, Deserialize)]
pub struct ValueRange {
	/// The grid as rows of cells. The API omits the field entirely for an
	/// empty range, and hands back numbers and booleans as JSON scalars,
	/// so every cell is folded to a string on the way in.
	#[serde(default, deserialize_with = "deserialize_cells_as_strings")]
	pub values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendResponse {
	pub updates: Option<UpdateSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary {
	pub updated_rows: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateResponse {
	pub total_updated_cells: Option<u32>,
}

// Custom deserialization function
fn deserialize_cells_as_strings<'de, D>(
	deserializer: D,
) -> Result<Vec<Vec<String>>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let raw: Vec<Vec<serde_json::Value>> =
		Vec::deserialize(deserializer)?;

	Ok(raw
		.into_iter()
		.map(|row| {
			row.into_iter()
				.map(|cell| match cell {
					serde_json::Value::String(s) => s,
					serde_json::Value::Number(n) => n.to_string(),
					serde_json::Value::Bool(b) => b.to_string(),
					_ => String::new(),
				})
				.collect()
		})
		.collect())
}
