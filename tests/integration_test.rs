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
use std::fs;
use std::process::Command;

/// Dynamically collects test cases from a given directory.
fn collect_test_cases(subfolder: &str) -> Vec<(String, String)> {
	let dir_path = format!("tests/test_data/{}", subfolder);

	let mut test_cases = vec![];

	if let Ok(entries) = fs::read_dir(&dir_path) {
		let mut inputs = vec![];
		let mut outputs = vec![];

		for entry in entries.flatten() {
			let file_name =
				entry.file_name().into_string().unwrap_or_default();
			if file_name.ends_with("_in.csv") {
				inputs.push(file_name);
			} else if file_name.ends_with("_out.txt") {
				outputs.push(file_name);
			}
		}

		inputs.sort();
		outputs.sort();

		// Pair inputs with corresponding outputs
		for input_file in inputs {
			let output_file = input_file.replace("_in.csv", "_out.txt");
			if outputs.contains(&output_file) {
				test_cases.push((input_file, output_file));
			}
		}
	}

	test_cases
}

#[test]
fn test_integration_veg_summary() {
	let test_cases = collect_test_cases("veg");
	execute("veg", test_cases, true, "veg", vec!["-d", "2025-03-01"]);
}

#[test]
fn test_integration_bills_by_hotel() {
	let test_cases = collect_test_cases("bills");
	execute(
		"bills",
		test_cases,
		true,
		"bills",
		vec!["-d", "2025-03-01", "--split", "hotel"],
	);
}

#[test]
fn test_integration_preview() {
	let test_cases = collect_test_cases("preview");
	execute(
		"preview",
		test_cases,
		true,
		"preview",
		vec!["-d", "2025-03-01"],
	);
}

#[test]
fn test_integration_preview_csv() {
	let test_cases = collect_test_cases("previewcsv");
	execute(
		"previewcsv",
		test_cases,
		true,
		"preview",
		vec!["-d", "2025-03-01", "--csv"],
	);
}

#[test]
fn test_integration_hotel_summary() {
	let test_cases = collect_test_cases("hotel");
	execute(
		"hotel",
		test_cases,
		true,
		"hotel",
		vec![
			"--hotel",
			"NOVOTEL",
			"-b",
			"2025-03-01",
			"-e",
			"2025-03-02",
		],
	);
}

#[test]
fn test_integration_edits() {
	let test_cases = collect_test_cases("edits");
	execute(
		"edits",
		test_cases,
		true,
		"edits",
		vec!["--edited", "tests/test_data/edits/edited.csv"],
	);
}

#[test]
fn test_integration_empty_day() {
	let test_cases = collect_test_cases("emptyday");
	execute(
		"emptyday",
		test_cases,
		true,
		"veg",
		vec!["-d", "2025-07-15"],
	);
}

#[test]
fn test_integration_preview_csv_to_file() {
	let out = std::env::temp_dir().join("mandi_preview_test.csv");
	let _ = fs::remove_file(&out);

	let output = Command::new("cargo")
		.args([
			"run",
			"--",
			"preview",
			"-f",
			"tests/test_data/previewcsv/basic_in.csv",
			"-d",
			"2025-03-01",
			"--csv",
			"-o",
			out.to_str().unwrap(),
		])
		.output()
		.expect("Failed to execute process");

	assert!(
		output.status.success(),
		"preview --csv -o failed: {}",
		String::from_utf8_lossy(&output.stderr)
	);

	let written = fs::read_to_string(&out).expect("no csv file written");
	assert!(written
		.starts_with("VEGETABLE,TELUGU NAME,QUANTITY,UNITS,PRICE,TOTAL"));
	assert!(String::from_utf8_lossy(&output.stdout).contains("Wrote"));

	let _ = fs::remove_file(&out);
}

#[test]
fn test_integration_should_fail() {
	let test_cases = collect_test_cases("failures");
	execute(
		"failures",
		test_cases,
		false,
		"veg",
		vec!["-d", "2025-03-01"],
	);
}

fn execute(
	subfolder: &str,
	test_cases: Vec<(String, String)>,
	should_succeed: bool,
	cmd: &str,
	args: Vec<&str>,
) {
	for (input_file, expected_output_file) in test_cases {
		println!("running for {}...", input_file);

		let loc = format!("{}/{}/{}", "tests/test_data", subfolder, input_file);

		let all_args =
			[vec!["run", "--", cmd, "-f", loc.as_str()], args.clone()].concat();

		let output = Command::new("cargo")
			.args(all_args)
			.output()
			.expect("Failed to execute process");

		if !should_succeed {
			assert!(
				!output.status.success(),
				"{} unexpectedly succeeded!",
				input_file
			);
			continue;
		}

		assert!(
			output.status.success(),
			"{} failed processing: {}",
			input_file,
			String::from_utf8_lossy(&output.stderr)
		);

		let stdout = String::from_utf8_lossy(&output.stdout);

		let expected_output = fs::read_to_string(format!(
			"{}/{}/{}",
			"tests/test_data", subfolder, expected_output_file
		))
		.expect("Failed to read expected output file");

		assert_eq!(
			stdout.trim(),
			expected_output.trim(),
			"Output did not match for {}; expected:\n{}\ngot:\n{}",
			input_file,
			expected_output.trim(),
			stdout.trim()
		);
	}
}
