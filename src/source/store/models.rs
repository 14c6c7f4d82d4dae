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
use serde_json::Value;

// -------------
// -- SENDING --
// -------------

#[derive(Debug, Serialize)]
pub struct FindBody {
	pub database: String,
	pub collection: String,
	pub filter: Value,
}

#[derive(Debug, Serialize)]
pub struct InsertManyBody {
	pub database: String,
	pub collection: String,
	pub documents: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct DeleteManyBody {
	pub database: String,
	pub collection: String,
	pub filter: Value,
}

// ---------------
// -- RECEIVING --
// ---------------

#[derive(Debug, Deserialize)]
pub struct FindResponse {
	#[serde(default)]
	pub documents: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertManyResponse {
	#[serde(default)]
	pub inserted_ids: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteManyResponse {
	#[serde(default)]
	pub deleted_count: u64,
}
