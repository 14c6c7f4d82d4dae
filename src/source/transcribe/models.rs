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
use serde::Deserialize;

// The request side is a multipart form, built in core; only the reply
// is a JSON model.

// ---------------
// -- RECEIVING --
// ---------------

#[derive(Debug, Deserialize)]
pub struct TranscriptionResponse {
	#[serde(default)]
	pub text: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_transcription_response_parses() {
		let response: TranscriptionResponse =
			serde_json::from_str(r#"{"text": "five kg tomatoes"}"#).unwrap();
		assert_eq!(response.text, "five kg tomatoes");
	}

	#[test]
	fn test_transcription_response_missing_text_is_empty() {
		let response: TranscriptionResponse =
			serde_json::from_str(r#"{}"#).unwrap();
		assert!(response.text.is_empty());
	}
}
