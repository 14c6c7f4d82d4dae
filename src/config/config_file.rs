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
use anyhow::{anyhow, bail, Error};
use dirs::home_dir;
use serde::Deserialize;
use std::fs;
use std::fs::File;
use std::path::PathBuf;
use std::process::Command;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	pub sheets: Option<Sheets>,
	pub store: Option<Store>,
	pub extract: Option<Extract>,
	pub transcribe: Option<Transcribe>,
	pub report: Option<Report>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Sheets {
	pub api_url: Option<String>,
	pub api_key: Option<String>,
	pub api_key_cmd: Option<String>,
	pub spreadsheet_id: Option<String>,
	pub sheet_name: Option<String>,

	/// Sheet tab that accepted edits are appended to for audit.
	pub edit_log_sheet: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Store {
	pub api_url: Option<String>,
	pub api_key: Option<String>,
	pub api_key_cmd: Option<String>,
	pub database: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Extract {
	pub api_url: Option<String>,
	pub api_key: Option<String>,
	pub api_key_cmd: Option<String>,
	pub model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Transcribe {
	pub api_url: Option<String>,
	pub api_key: Option<String>,
	pub api_key_cmd: Option<String>,
	pub model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Report {
	/// Hotels listed here are rendered first, in this order. Hotels not
	/// listed follow alphabetically.
	pub preferred_hotels: Option<Vec<String>>,
}

/// Fetches the config from the given path, or default path if none.
/// The boolean argument indicates whether it is necessary to inspect
/// the config for authentication, i.e. for talking to remote services.
pub fn get_config(
	custom_config_path: Option<&String>,
	expand_auth: bool,
) -> Result<Config, Error> {
	let config_path = match &custom_config_path {
		None => {
			let home_dir = home_dir()
				.ok_or_else(|| anyhow!("Unable to determine home directory"))?;
			home_dir.join(".config/mandi/config.toml")
		},
		Some(p) => PathBuf::from(p),
	};

	// create empty config file if it doesn't exist
	if !config_path.exists() && custom_config_path.is_none() {
		if let Some(parent) = config_path.parent() {
			fs::create_dir_all(parent)?;
		}
		File::create(config_path.clone())?;
	}

	let content = fs::read_to_string(config_path)?;
	let mut config: Config = toml::from_str(&content)
		.map_err(|e| anyhow!("failed to parse config: {}", e))?;

	if !expand_auth {
		return Ok(config);
	}

	if let Some(sheets) = &mut config.sheets {
		expand_api_key(
			"sheets",
			&mut sheets.api_key,
			sheets.api_key_cmd.as_deref(),
		)?;
	}
	if let Some(store) = &mut config.store {
		expand_api_key("store", &mut store.api_key, store.api_key_cmd.as_deref())?;
	}
	if let Some(extract) = &mut config.extract {
		expand_api_key(
			"extract",
			&mut extract.api_key,
			extract.api_key_cmd.as_deref(),
		)?;
	}
	if let Some(transcribe) = &mut config.transcribe {
		expand_api_key(
			"transcribe",
			&mut transcribe.api_key,
			transcribe.api_key_cmd.as_deref(),
		)?;
	}

	Ok(config)
}

/// Executes api_key_cmd if applicable, and puts the result in api_key.
fn expand_api_key(
	section: &str,
	api_key: &mut Option<String>,
	api_key_cmd: Option<&str>,
) -> Result<(), Error> {
	if api_key_cmd.is_some() && api_key.is_some() {
		bail!(
			"Only one of {}.api_key and {}.api_key_cmd may be specified",
			section,
			section
		)
	}

	if let Some(cmd) = api_key_cmd {
		let output = Command::new("sh")
			.arg("-c")
			.arg(cmd)
			.output()
			.map_err(|e| anyhow!("failed to execute api_key_cmd: {}", e))?;

		if output.status.success() {
			*api_key = Some(
				String::from_utf8(output.stdout)
					.map_err(|e| {
						anyhow!("failed to parse command output: {}", e)
					})?
					.trim()
					.to_string(),
			);
		} else {
			bail!(
				"{} api_key_cmd failed with status {}: {}",
				section,
				output.status,
				String::from_utf8_lossy(&output.stderr)
			);
		}
	}

	Ok(())
}
