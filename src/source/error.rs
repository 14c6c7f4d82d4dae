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
use thiserror::Error;

/// Failures raised by the source adapters. Transport problems, remote
/// rejections, bad local input and unusable remote payloads are distinct
/// so callers can decide whether a retry could help.
#[derive(Debug, Error)]
pub enum SourceError {
	#[error("transport error: {0}")]
	Http(#[from] reqwest::Error),

	#[error("request rejected with status {status}: {message}")]
	Api { status: u16, message: String },

	#[error("invalid input: {0}")]
	Input(String),

	#[error("unusable response: {0}")]
	Parse(String),
}

impl SourceError {
	/// Transport failures and server-side (5xx) rejections are worth
	/// retrying; everything else will fail the same way again.
	pub fn is_retryable(&self) -> bool {
		match self {
			SourceError::Http(_) => true,
			SourceError::Api { status, .. } => *status >= 500,
			SourceError::Input(_) | SourceError::Parse(_) => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_retryability() {
		let server = SourceError::Api {
			status: 503,
			message: "unavailable".to_string(),
		};
		assert!(server.is_retryable());

		let client = SourceError::Api {
			status: 400,
			message: "bad request".to_string(),
		};
		assert!(!client.is_retryable());

		assert!(!SourceError::Input("x".to_string()).is_retryable());
		assert!(!SourceError::Parse("x".to_string()).is_retryable());
	}
}
