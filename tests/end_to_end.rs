//! Runs the sensorstats binary against files on disk.

use std::path::Path;
use std::process::{Command, Output};

const HEADER: &str =
    "id|device|contagem|data|temperatura|umidade|luminosidade|ruido|eco2|etvoc|latitude|longitude";

fn run(input: &Path, output: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sensorstats"))
        .arg(input)
        .arg("--output")
        .arg(output)
        .args(extra)
        .env("RUST_LOG", "sensorstats=warn")
        .output()
        .unwrap()
}

fn write_input(path: &Path, lines: &[&str]) {
    let mut content = format!("{}\n", HEADER);
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    std::fs::write(path, content).unwrap();
}

#[test]
fn writes_canonical_csv() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let output = dir.path().join("results.csv");
    write_input(
        &input,
        &[
            "1|D2|0|2024-04-01 08:00:00|5|5|5|5|5|5|0|0",
            "2|D1|0|2024-03-10 08:00:00|10|50|100|40|400|1|0|0",
            "3|D1|0|2024-03-20 08:00:00|20|70|300|45|600|3|0|0",
        ],
    );
    let result = run(&input, &output, &["--workers", "2"]);
    assert!(result.status.success());
    let content = std::fs::read_to_string(&output).unwrap();
    let expected = "device;month;sensor;max;mean;min\n\
                    D1;2024-03;eco2;600.00;500.00;400.00\n\
                    D1;2024-03;etvoc;3.00;2.00;1.00\n\
                    D1;2024-03;humidity;70.00;60.00;50.00\n\
                    D1;2024-03;luminosity;300.00;200.00;100.00\n\
                    D1;2024-03;noise;45.00;42.50;40.00\n\
                    D1;2024-03;temperature;20.00;15.00;10.00\n\
                    D2;2024-04;eco2;5.00;5.00;5.00\n\
                    D2;2024-04;etvoc;5.00;5.00;5.00\n\
                    D2;2024-04;humidity;5.00;5.00;5.00\n\
                    D2;2024-04;luminosity;5.00;5.00;5.00\n\
                    D2;2024-04;noise;5.00;5.00;5.00\n\
                    D2;2024-04;temperature;5.00;5.00;5.00\n";
    assert_eq!(expected, content);
}

#[test]
fn output_independent_of_workers_and_backend() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let lines: Vec<String> = (0..500)
        .map(|i| {
            format!(
                "{}|device-{}|0|2024-{:02}-15|{}|{}|{}|{}|{}|{}|0|0",
                i,
                i % 7,
                1 + i % 4,
                i % 31,
                i % 17,
                i % 13,
                i % 11,
                i % 5,
                i % 3
            )
        })
        .collect();
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    write_input(&input, &lines);

    let reference = dir.path().join("reference.csv");
    assert!(run(&input, &reference, &["--workers", "1"]).status.success());
    let reference = std::fs::read_to_string(&reference).unwrap();
    assert_eq!(1 + 7 * 4 * 6, reference.lines().count());

    for (workers, backend, merge) in [
        ("3", "threads", "sequential"),
        ("8", "threads", "tree"),
        ("4", "rayon", "sequential"),
        ("16", "rayon", "tree"),
    ] {
        let output = dir.path().join(format!("results-{}-{}-{}.csv", workers, backend, merge));
        let result = run(
            &input,
            &output,
            &["--workers", workers, "--backend", backend, "--merge", merge],
        );
        assert!(result.status.success());
        assert_eq!(reference, std::fs::read_to_string(&output).unwrap());
    }
}

#[test]
fn since_filters_earlier_months() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let output = dir.path().join("results.csv");
    write_input(
        &input,
        &[
            "1|D1|0|2024-02-28|1|1|1|1|1|1|0|0",
            "2|D1|0|2024-03-01|2|2|2|2|2|2|0|0",
        ],
    );
    assert!(run(&input, &output, &["--since", "2024-03"]).status.success());
    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(7, content.lines().count());
    assert!(!content.contains("2024-02"));
}

#[test]
fn json_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let output = dir.path().join("results.json");
    write_input(&input, &["1|D1|0|2024-03-01|1|2|3|4|5|6|0|0"]);
    assert!(run(&input, &output, &["--format", "json"]).status.success());
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(6, rows.len());
    assert_eq!("eco2", rows[0]["sensor"]);
    assert_eq!(5.0, rows[0]["mean"]);
    assert_eq!(1, rows[0]["count"]);
}

#[test]
fn no_valid_records_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let output = dir.path().join("results.csv");
    write_input(&input, &["1|D1|0|2024-03-01|oops|2|3|4|5|6|0|0", "", "too|few"]);
    let result = run(&input, &output, &[]);
    assert!(!result.status.success());
    assert_eq!(Some(1), result.status.code());
    assert!(!output.exists());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("no valid records"));
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("missing.txt");
    let output = dir.path().join("results.csv");
    let result = run(&input, &output, &[]);
    assert_eq!(Some(1), result.status.code());
}

#[test]
fn print_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let output = dir.path().join("results.csv");
    write_input(
        &input,
        &[
            "1|D1|0|2024-03-01|1|2|3|4|5|6|0|0",
            "2|D1|0|2024-03-01|x|2|3|4|5|6|0|0",
        ],
    );
    let result = run(&input, &output, &["--print-metrics"]);
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("records_read 1"));
    assert!(stdout.contains("records_skipped{reason=\"malformed\"} 1"));
    assert!(stdout.contains("groups_emitted 6"));
}
