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
use crate::config::config_file::Transcribe;
use crate::source::error::SourceError;
use crate::source::http::Client;
use crate::source::transcribe::models::TranscriptionResponse;
use anyhow::{bail, Error};
use reqwest::blocking::multipart::Form;

const DEFAULT_MODEL: &str = "whisper-large-v3-turbo";

/// Adapter for the speech-to-text API that turns recorded order audio
/// into plain text. The transcript is handed to the extraction prompt
/// the same way typed free text is.
pub struct Transcriber {
	http: Client,
	model: String,
}

impl Transcriber {
	pub fn from_config(config: &Transcribe) -> Result<Self, Error> {
		let api_url = match &config.api_url {
			Some(url) => url.clone(),
			None => bail!("transcribe.api_url is not configured"),
		};

		Ok(Transcriber {
			http: Client::new(&api_url, config.api_key.clone()),
			model: config
				.model
				.clone()
				.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
		})
	}

	/// Transcribes one audio file. Temperature 0 keeps the transcript
	/// deterministic; an empty transcript is unusable and reported as
	/// such rather than extracted into zero items.
	pub fn transcribe_file(&self, path: &str) -> Result<String, SourceError> {
		let form = Form::new()
			.text("model", self.model.clone())
			.text("response_format", "json")
			.text("language", "en")
			.text("temperature", "0")
			.file("file", path)
			.map_err(|e| {
				SourceError::Input(format!("cannot read {}: {}", path, e))
			})?;

		let response: TranscriptionResponse =
			self.http.post_form("audio/transcriptions", form)?;

		let text = response.text.trim().to_string();
		if text.is_empty() {
			return Err(SourceError::Parse(
				"transcription came back empty".to_string(),
			));
		}
		Ok(text)
	}
}

/// Joins typed free text and spoken transcripts into the single order
/// text handed to the extractor. Blank pieces are dropped; None means
/// there is no text input at all.
pub fn combine_order_text(
	typed: Option<&str>,
	transcripts: &[String],
) -> Option<String> {
	let mut parts: Vec<&str> = Vec::new();
	if let Some(text) = typed {
		if !text.trim().is_empty() {
			parts.push(text.trim());
		}
	}
	for transcript in transcripts {
		if !transcript.trim().is_empty() {
			parts.push(transcript.trim());
		}
	}

	if parts.is_empty() {
		None
	} else {
		Some(parts.join("\n"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_combine_typed_and_spoken() {
		let transcripts = vec!["five kg tomatoes".to_string()];
		assert_eq!(
			combine_order_text(Some("2 kg okra"), &transcripts),
			Some("2 kg okra\nfive kg tomatoes".to_string())
		);
	}

	#[test]
	fn test_combine_spoken_only() {
		let transcripts = vec![
			"five kg tomatoes".to_string(),
			"one bunch coriander".to_string(),
		];
		assert_eq!(
			combine_order_text(None, &transcripts),
			Some("five kg tomatoes\none bunch coriander".to_string())
		);
	}

	#[test]
	fn test_combine_drops_blank_pieces() {
		let transcripts = vec!["  ".to_string()];
		assert_eq!(combine_order_text(Some("   "), &transcripts), None);
		assert_eq!(combine_order_text(None, &[]), None);
	}
}
