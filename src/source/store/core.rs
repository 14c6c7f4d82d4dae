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
use crate::config::config_file::Store;
use crate::orders::book::OrderBook;
use crate::orders::price::PriceRecord;
use crate::source::error::SourceError;
use crate::source::http::Client;
use crate::source::store::models::{
	DeleteManyBody, DeleteManyResponse, FindBody, FindResponse,
	InsertManyBody, InsertManyResponse,
};
use crate::util::date::Date;
use anyhow::{bail, Error};
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;

const DEFAULT_DATABASE: &str = "hotel_orders";

const ORDERS_COLLECTION: &str = "vegetable_orders";
const PRICES_COLLECTION: &str = "vegetable_prices";
const NAMES_COLLECTION: &str = "master_veg_name";
const AUDITS_COLLECTION: &str = "audits";

/// Adapter for the document store behind a data-API gateway. Writes are
/// idempotent per date: delete everything for the date, then insert the
/// current rows.
pub struct StoreSource {
	http: Client,
	database: String,
}

impl StoreSource {
	pub fn from_config(config: &Store) -> Result<Self, Error> {
		let api_url = match &config.api_url {
			Some(url) => url.clone(),
			None => bail!("store.api_url is not configured"),
		};

		Ok(StoreSource {
			http: Client::new(&api_url, config.api_key.clone()),
			database: config
				.database
				.clone()
				.unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
		})
	}

	/// Replaces the stored orders for one date with the rows currently in
	/// the book. Returns (deleted, inserted).
	pub fn upsert_orders_for_date(
		&self,
		date: Date,
		book: &OrderBook,
	) -> Result<(u64, usize), SourceError> {
		let documents: Vec<Value> = book
			.rows()
			.iter()
			.map(|r| {
				json!({
					"formatted_date": r.date.to_string(),
					"hotel": r.hotel,
					"kitchen": r.kitchen,
					"vegetable": r.vegetable,
					"localized": r.localized,
					"units": r.units,
					"quantity": r.quantity,
					"price": r.price,
					"vendor": r.vendor,
				})
			})
			.collect();

		let deleted = self.delete_many(
			ORDERS_COLLECTION,
			json!({"formatted_date": date.to_string()}),
		)?;
		let inserted = if documents.is_empty() {
			0
		} else {
			self.insert_many(ORDERS_COLLECTION, documents)?
		};

		Ok((deleted, inserted))
	}

	/// Replaces the stored prices for one date.
	pub fn save_prices(
		&self,
		date: Date,
		prices: &[PriceRecord],
	) -> Result<(u64, usize), SourceError> {
		let documents: Vec<Value> = prices
			.iter()
			.filter(|p| p.actual_price > 0.0)
			.map(|p| {
				json!({
					"formatted_date": p.date.to_string(),
					"vegetable": p.vegetable,
					"localized": p.localized,
					"units": p.units,
					"actual_price": p.actual_price,
				})
			})
			.collect();

		let deleted = self.delete_many(
			PRICES_COLLECTION,
			json!({"formatted_date": date.to_string()}),
		)?;
		let inserted = if documents.is_empty() {
			0
		} else {
			self.insert_many(PRICES_COLLECTION, documents)?
		};

		Ok((deleted, inserted))
	}

	pub fn fetch_prices(
		&self,
		date: Date,
	) -> Result<Vec<PriceRecord>, SourceError> {
		let documents = self.find(
			PRICES_COLLECTION,
			json!({"formatted_date": date.to_string()}),
		)?;

		let mut records = Vec::new();
		for doc in documents {
			let price = match doc["actual_price"].as_f64() {
				Some(p) if p > 0.0 => p,
				_ => continue,
			};
			records.push(PriceRecord {
				date,
				vegetable: str_field(&doc, "vegetable"),
				localized: str_field(&doc, "localized"),
				units: str_field(&doc, "units"),
				actual_price: price,
			});
		}

		Ok(records)
	}

	/// Vegetable names registered for one hotel, the allowed vocabulary
	/// for extraction. Hotel names are stored uppercase.
	pub fn fetch_vegetable_names(
		&self,
		hotel: &str,
	) -> Result<Vec<String>, SourceError> {
		let documents = self.find(
			NAMES_COLLECTION,
			json!({"HOTEL_NAME": hotel.trim().to_uppercase()}),
		)?;

		let mut names: Vec<String> = documents
			.iter()
			.map(|d| str_field(d, "HOTEL_SPECIFIC_NAME"))
			.filter(|n| !n.is_empty())
			.collect();
		names.sort();
		names.dedup();
		Ok(names)
	}

	/// Map from uppercased hotel-specific name to the common name used in
	/// the order table.
	pub fn fetch_synonym_map(
		&self,
		hotel: &str,
	) -> Result<HashMap<String, String>, SourceError> {
		let documents = self.find(
			NAMES_COLLECTION,
			json!({"HOTEL_NAME": hotel.trim().to_uppercase()}),
		)?;

		let mut map = HashMap::new();
		for doc in documents {
			let specific = str_field(&doc, "HOTEL_SPECIFIC_NAME");
			let common = str_field(&doc, "COMMON_NAME");
			if specific.is_empty() || common.is_empty() {
				continue;
			}
			map.insert(specific.to_uppercase(), common);
		}
		Ok(map)
	}

	/// One audit document per accepted mutation.
	pub fn append_audit(
		&self,
		action: &str,
		detail: &str,
	) -> Result<(), SourceError> {
		self.insert_many(
			AUDITS_COLLECTION,
			vec![json!({
				"timestamp": Utc::now().to_rfc3339(),
				"action": action,
				"detail": detail,
			})],
		)?;
		Ok(())
	}

	fn find(
		&self,
		collection: &str,
		filter: Value,
	) -> Result<Vec<Value>, SourceError> {
		let body = FindBody {
			database: self.database.clone(),
			collection: collection.to_string(),
			filter,
		};
		let response: FindResponse = self.http.post("action/find", &body)?;
		Ok(response.documents)
	}

	fn insert_many(
		&self,
		collection: &str,
		documents: Vec<Value>,
	) -> Result<usize, SourceError> {
		let body = InsertManyBody {
			database: self.database.clone(),
			collection: collection.to_string(),
			documents,
		};
		let response: InsertManyResponse =
			self.http.post("action/insertMany", &body)?;
		Ok(response.inserted_ids.len())
	}

	fn delete_many(
		&self,
		collection: &str,
		filter: Value,
	) -> Result<u64, SourceError> {
		let body = DeleteManyBody {
			database: self.database.clone(),
			collection: collection.to_string(),
			filter,
		};
		let response: DeleteManyResponse =
			self.http.post("action/deleteMany", &body)?;
		Ok(response.deleted_count)
	}
}

fn str_field(doc: &Value, field: &str) -> String {
	doc[field].as_str().unwrap_or_default().trim().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_str_field_tolerates_missing_and_non_string() {
		let doc = json!({"a": "x ", "b": 5});
		assert_eq!(str_field(&doc, "a"), "x");
		assert_eq!(str_field(&doc, "b"), "");
		assert_eq!(str_field(&doc, "missing"), "");
	}
}
