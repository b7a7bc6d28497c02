mod common;
mod logic;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use regex::Regex;
use sandlot_game::GameConfig;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use common::scenario::{get_scenario, list_scenarios};
use common::split_csv;
use logic::{LogicTester, ManagerStyle, ScenarioResult, SeedInfo, resolve_seed_inputs};

#[derive(Debug, Parser)]
#[command(name = "sandlot-tester", version = "0.1.0")]
#[command(about = "Headless driver and QA harness for the Sandlot baseball engine")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// Only run scenarios whose name matches this regular expression
    #[arg(long)]
    filter: Option<String>,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated decimal, base-36, or replay URLs)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of games per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// How the managed team answers pauses
    #[arg(long, value_enum, default_value_t = ManagerStyle::Skip)]
    manager: ManagerStyle,

    /// Game configuration JSON (regulation innings, lineup, bench)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Print every game's narration, line score and replay link
    #[arg(long)]
    play_by_play: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = select_scenarios(&args.scenarios, args.filter.as_deref())?;
    let seed_infos = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let game_config = load_game_config(args.config.as_deref())?;

    let results = run_logic_scenarios(&args, &scenarios, &seed_infos, game_config);

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "⚾ Sandlot Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for (key, _) in list_scenarios() {
            if !scenarios.iter().any(|s| s == key) {
                scenarios.push(key.to_string());
            }
        }
    }
    scenarios
}

fn select_scenarios(scenarios_arg: &str, filter: Option<&str>) -> Result<Vec<String>> {
    let mut scenarios = expand_scenarios(scenarios_arg);
    if let Some(pattern) = filter {
        let re = Regex::new(pattern).with_context(|| format!("invalid --filter {pattern}"))?;
        scenarios.retain(|name| re.is_match(name));
    }
    Ok(scenarios)
}

fn load_game_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    GameConfig::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn run_logic_scenarios(
    args: &Args,
    scenarios: &[String],
    seed_infos: &[SeedInfo],
    game_config: GameConfig,
) -> Vec<ScenarioResult> {
    let mut results: Vec<ScenarioResult> = Vec::new();

    println!("{}", "🧠 Running Logic Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(args.manager, game_config)
        .verbose(args.verbose)
        .play_by_play(args.play_by_play);

    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name) {
            log::info!("running {} over {} seed(s)", scenario.name, seed_infos.len());
            results.extend(logic_tester.run_scenario(&scenario, seed_infos, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }

    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Sandlot Logic Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        "csv" => logic::reports::generate_csv_report(&mut output_target, results)?,
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No logic scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(
                &mut output_target,
                "🏁 Total time: {:?}",
                start_time.elapsed()
            )?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn base_args() -> Args {
        Args {
            scenarios: "smoke".to_string(),
            filter: None,
            list_scenarios: false,
            seeds: "1337".to_string(),
            iterations: 1,
            manager: ManagerStyle::Skip,
            config: None,
            report: "json".to_string(),
            play_by_play: false,
            verbose: false,
            output: None,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sandlot-main-{label}-{}", std::process::id()))
    }

    fn sample_result(passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: "smoke".to_string(),
            seed: "1337".to_string(),
            passed,
            iterations_run: 1,
            successful_iterations: usize::from(passed),
            failures: if passed {
                Vec::new()
            } else {
                vec!["failure".to_string()]
            },
            average_duration: Duration::from_millis(5),
            performance_data: vec![Duration::from_millis(5)],
        }
    }

    #[test]
    fn expands_all_scenarios_keyword() {
        let expanded = expand_scenarios("smoke,all");
        assert_eq!(expanded.len(), list_scenarios().len());
        assert_eq!(expanded[0], "smoke");
        assert!(expanded.contains(&"manager-decisions".to_string()));
    }

    #[test]
    fn expand_scenarios_without_all_preserves_order() {
        let expanded = expand_scenarios("state-invariants,smoke");
        assert_eq!(expanded, vec!["state-invariants", "smoke"]);
    }

    #[test]
    fn filter_narrows_the_selection() {
        let selected = select_scenarios("all", Some("^replay|deterministic")).unwrap();
        assert_eq!(selected, vec!["deterministic-replay", "replay-url-roundtrip"]);
        assert!(select_scenarios("all", Some("(")).is_err());
    }

    #[test]
    fn missing_config_path_uses_defaults() {
        assert_eq!(load_game_config(None).unwrap(), GameConfig::default());
        assert!(load_game_config(Some(Path::new("/definitely/not/here.json"))).is_err());
    }

    #[test]
    fn config_file_is_parsed() {
        let path = temp_path("config.json");
        std::fs::write(&path, r#"{"regulation_innings": 7, "late_inning": 6}"#).unwrap();
        let config = load_game_config(Some(&path)).unwrap();
        assert_eq!(config.regulation_innings, 7);
        assert_eq!(config.lineup_size, GameConfig::default().lineup_size);
    }

    #[test]
    fn run_logic_scenarios_skips_unknown_names() {
        let args = base_args();
        let seeds = vec![SeedInfo::from_numeric(42)];
        let results = run_logic_scenarios(
            &args,
            &["smoke".to_string(), "vehicle-system".to_string()],
            &seeds,
            GameConfig::default(),
        );
        assert_eq!(results.len(), 1);
        assert!(results[0].passed, "{:?}", results[0].failures);
    }

    #[test]
    fn maybe_list_scenarios_writes_output() {
        let temp = temp_path("scenarios.txt");
        let args = Args {
            list_scenarios: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_list_scenarios(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available scenarios"));
        assert!(content.contains("replay-url-roundtrip"));
    }

    #[test]
    fn maybe_list_scenarios_returns_false_when_disabled() {
        assert!(!maybe_list_scenarios(&base_args()).unwrap());
    }

    #[test]
    fn write_reports_emits_empty_json_array() {
        let temp = temp_path("empty.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert_eq!(content.trim(), "[]");
    }

    #[test]
    fn write_reports_markdown_empty_results() {
        let temp = temp_path("empty.md");
        let args = Args {
            report: "markdown".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("No scenarios executed"));
    }

    #[test]
    fn write_reports_emits_csv_rows() {
        let temp = temp_path("report.csv");
        let args = Args {
            report: "csv".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[sample_result(true), sample_result(false)], Instant::now())
            .unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(content.contains("smoke,1337,false"));
    }

    #[test]
    fn write_reports_console_includes_total_time() {
        let temp = temp_path("report.txt");
        let args = Args {
            report: "console".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[sample_result(true)], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Logic Test Results Summary"));
        assert!(content.contains("Total time"));
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        target.write_all(b"ok").unwrap();
        target.flush().unwrap();
    }
}
