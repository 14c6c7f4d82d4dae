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
use crate::source::error::SourceError;
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Shared blocking HTTP client for all remote adapters. Bearer auth when
/// a key is configured.
pub struct Client {
	client: reqwest::blocking::Client,
	base_url: String,
	api_key: Option<String>,
}

impl Client {
	pub fn new(base_url: &str, api_key: Option<String>) -> Self {
		Client {
			client: reqwest::blocking::Client::new(),
			base_url: base_url.trim_end_matches('/').to_string(),
			api_key,
		}
	}

	/// Sends a GET and handles the response. Errors on non-2xx response
	/// codes, carrying the status and body back to the caller.
	pub fn get<Q, R>(
		&self,
		endpoint: &str,
		query_params: Option<Q>,
	) -> Result<R, SourceError>
	where
		Q: Serialize,
		R: for<'de> Deserialize<'de>,
	{
		let url = format!("{}/{}", self.base_url, endpoint);

		let mut request = self.client.request(Method::GET, &url);
		request = self.authorize(request);

		if let Some(query_params) = query_params {
			request = request.query(&query_params);
		}

		println!("Sending GET to {}", url);
		Self::handle(request.send()?)
	}

	/// POST variant with a JSON body.
	pub fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, SourceError>
	where
		B: Serialize,
		R: for<'de> Deserialize<'de>,
	{
		let url = format!("{}/{}", self.base_url, endpoint);

		let mut request = self.client.request(Method::POST, &url).json(body);
		request = self.authorize(request);

		println!("Sending POST to {}", url);
		Self::handle(request.send()?)
	}

	/// POST variant with a multipart form body, for file uploads.
	pub fn post_form<R>(
		&self,
		endpoint: &str,
		form: reqwest::blocking::multipart::Form,
	) -> Result<R, SourceError>
	where
		R: for<'de> Deserialize<'de>,
	{
		let url = format!("{}/{}", self.base_url, endpoint);

		let mut request =
			self.client.request(Method::POST, &url).multipart(form);
		request = self.authorize(request);

		println!("Sending POST to {}", url);
		Self::handle(request.send()?)
	}

	fn authorize(
		&self,
		request: reqwest::blocking::RequestBuilder,
	) -> reqwest::blocking::RequestBuilder {
		match &self.api_key {
			Some(key) => {
				request.header("Authorization", format!("Bearer {}", key))
			},
			None => request,
		}
	}

	fn handle<R>(response: reqwest::blocking::Response) -> Result<R, SourceError>
	where
		R: for<'de> Deserialize<'de>,
	{
		let status = response.status();
		if !status.is_success() {
			return Err(SourceError::Api {
				status: status.as_u16(),
				message: response.text().unwrap_or_default(),
			});
		}

		let response_data: R = response.json()?;
		Ok(response_data)
	}
}
