use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "sandlot-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_sandlot-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("deterministic-replay"));
}

#[test]
fn cli_runs_all_scenarios_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_sandlot-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--scenarios",
            "all",
            "--manager",
            "random",
            "--report",
            "json",
            "--iterations",
            "2",
            "--seeds",
            "1,k3",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Sandlot Automated Tester"));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let rows = report.as_array().expect("array of results");
    assert_eq!(rows.len(), 5 * 2);
    assert!(rows.iter().all(|row| row["passed"] == true));
}

#[test]
fn cli_replays_a_link_with_play_by_play() {
    let exe = env!("CARGO_BIN_EXE_sandlot-tester");
    let output = Command::new(exe)
        .args([
            "--scenarios",
            "deterministic-replay",
            "--iterations",
            "1",
            "--seeds",
            "?seed=k3x9q1&decisions=",
            "--play-by-play",
            "--report",
            "csv",
        ])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Replay:"));
    assert!(stdout.contains("Final:"));
    assert!(stdout.contains("deterministic-replay,k3x9q1,true"));
}

#[test]
fn cli_rejects_unknown_seed_tokens() {
    let exe = env!("CARGO_BIN_EXE_sandlot-tester");
    let output = Command::new(exe)
        .args(["--seeds", "not a seed", "--iterations", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unrecognized seed token"));
}
