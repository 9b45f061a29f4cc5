//! Integration tests for pdview-cli.
//!
//! Each test writes a patch and a config file to a temporary directory and
//! runs the built `pdview` binary against them.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

const MAIN: &str = "\
#N canvas 0 50 450 300 12;
#X obj 30 20 hsl 112 15 0 100 0 cutoff_out cutoff_in empty -2 -8 0 10 #fcfcfc #000000 #000000 0 1;
#X obj 100 50 tgl 40 0 toggle_send toggle_receive empty 0 -10 0 12 #fcfcfc #000000 #000000 0 1;
#X obj 10 200 tgl 15;
#X restore 200 200 pd voice;
#X restore 0 0 pd missing;
";

const VOICE: &str = "#X obj 10 10 bng 20 250 gate cutoff_in empty;\n";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("main.pd"), MAIN).unwrap();
        fs::write(dir.path().join("voice.pd"), VOICE).unwrap();
        fs::write(dir.path().join("config.toml"), "log_filter = \"off\"\n").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> Output {
        pdview_bin()
            .arg("--config")
            .arg(self.path("config.toml"))
            .args(args)
            .current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to run pdview")
    }
}

/// Helper to get the path to the `pdview` binary built by cargo.
fn pdview_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pdview"))
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "pdview failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

// ---------------------------------------------------------------------------
// inspect
// ---------------------------------------------------------------------------

#[test]
fn cli_inspect_lists_flattened_widgets() {
    let fx = Fixture::new();
    let output = fx.run(&["inspect", "main.pd"]);
    assert_success(&output);

    let out = stdout(&output);
    assert!(out.contains("3 widgets"), "got: {out}");
    assert!(out.contains("hslider"));
    assert!(out.contains("toggle_send"));
    // Subpatch trigger translated by (200, 200).
    assert!(out.contains("210,210"), "got: {out}");
}

#[test]
fn cli_inspect_json_is_valid() {
    let fx = Fixture::new();
    let output = fx.run(&["inspect", "main.pd", "--json"]);
    assert_success(&output);

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let widgets = json["widgets"].as_array().expect("widgets array");
    assert_eq!(widgets.len(), 3);
    assert_eq!(widgets[1]["kind"], "toggle");
    assert_eq!(widgets[1]["channels"]["send"], "toggle_send");
    assert_eq!(json["diagnostics"].as_array().map(Vec::len), Some(1));
}

#[test]
fn cli_inspect_missing_file_fails() {
    let fx = Fixture::new();
    let output = fx.run(&["inspect", "nope.pd"]);
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn cli_check_reports_skips_and_subpatches() {
    let fx = Fixture::new();
    let output = fx.run(&["check", "main.pd"]);
    assert_success(&output);

    let out = stdout(&output);
    assert!(out.contains("main.pd:4: tgl line needs at least 10 tokens"), "got: {out}");
    assert!(out.contains("subpatch 'voice': 1 widgets"), "got: {out}");
    assert!(out.contains("subpatch 'missing': missing"), "got: {out}");
    assert!(out.contains("1 skipped lines, 1 unresolved subpatches"), "got: {out}");
}

#[test]
fn cli_check_unopenable_file_exits_nonzero() {
    let fx = Fixture::new();
    let output = fx.run(&["check", "absent.pd"]);
    assert!(!output.status.success());
}

#[test]
fn cli_max_depth_zero_is_rejected() {
    let fx = Fixture::new();
    let output = fx.run(&["--max-depth", "0", "check", "main.pd"]);
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// channels / simulate
// ---------------------------------------------------------------------------

#[test]
fn cli_channels_groups_by_name() {
    let fx = Fixture::new();
    let output = fx.run(&["channels", "main.pd"]);
    assert_success(&output);

    let out = stdout(&output);
    assert!(out.contains("cutoff_in"), "got: {out}");
    assert!(out.contains("received by: #0 hslider, #2 trigger"), "got: {out}");
}

#[test]
fn cli_simulate_prints_emitted_values() {
    let fx = Fixture::new();
    let output = fx.run(&[
        "simulate",
        "main.pd",
        "--click",
        "110,60",
        "--click",
        "215,215",
        "--click",
        "400,10",
    ]);
    assert_success(&output);

    let out = stdout(&output);
    assert!(out.contains("click 110,60 -> #1 toggle"), "got: {out}");
    assert!(out.contains("toggle_send = 1"), "got: {out}");
    assert!(out.contains("gate = 1"), "got: {out}");
    assert!(out.contains("click 400,10 -> nothing"), "got: {out}");
}

#[test]
fn cli_simulate_drag_moves_slider() {
    let fx = Fixture::new();
    // Track runs x=36..136; press at the start, drag to the middle.
    let output = fx.run(&[
        "simulate", "main.pd", "--click", "40,25", "--drag", "86,25",
    ]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("cutoff_out = 50"), "got: {out}");
}

#[test]
fn cli_simulate_send_emits_message_on_send_channel() {
    let fx = Fixture::new();
    let output = fx.run(&["simulate", "main.pd", "--send", "1=bang", "--send", "2=set 5"]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("send #1 toggle \"bang\""), "got: {out}");
    assert!(out.contains("  toggle_send = \"bang\""), "got: {out}");
    assert!(out.contains("  gate = \"set 5\""), "got: {out}");
}

#[test]
fn cli_simulate_send_to_unknown_widget_fails() {
    let fx = Fixture::new();
    let output = fx.run(&["simulate", "main.pd", "--send", "9=bang"]);
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn cli_config_path_prints_location() {
    let fx = Fixture::new();
    let output = fx.run(&["config", "--path"]);
    assert_success(&output);
    assert!(stdout(&output).trim_end().ends_with("config.toml"));
}

#[test]
fn cli_config_shows_overrides() {
    let fx = Fixture::new();
    let output = fx.run(&["--max-depth", "4", "config"]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("max_subpatch_depth = 4"), "got: {out}");
    assert!(out.contains("log_filter = \"off\""), "got: {out}");
}

#[test]
fn cli_config_init_writes_explicit_path() {
    let fx = Fixture::new();
    let target = fx.path("fresh").join("new.toml");
    let output = pdview_bin()
        .arg("--config")
        .arg(&target)
        .args(["config", "--init"])
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert_success(&output);
    let text = fs::read_to_string(&target).expect("config written");
    assert!(text.contains("max_subpatch_depth = 16"), "got: {text}");
}

#[test]
fn cli_config_reports_missing_explicit_file() {
    let fx = Fixture::new();
    let target = fx.path("absent.toml");
    let output = pdview_bin()
        .arg("--config")
        .arg(&target)
        .arg("config")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert_success(&output);
    assert!(stdout(&output).contains("(not found, using defaults)"));
}

#[test]
fn cli_missing_explicit_config_fails_other_commands() {
    let fx = Fixture::new();
    let output = pdview_bin()
        .arg("--config")
        .arg(fx.path("absent.toml"))
        .args(["check", "main.pd"])
        .current_dir(fx.dir.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[cfg(target_os = "linux")]
#[test]
fn cli_config_init_writes_default_file() {
    let home = TempDir::new().unwrap();
    let run = || {
        pdview_bin()
            .args(["config", "--init"])
            .env("XDG_CONFIG_HOME", home.path())
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    };

    let output = run();
    assert_success(&output);
    let written = home.path().join("pdview").join("config.toml");
    let text = fs::read_to_string(&written).expect("config written");
    assert!(text.contains("max_subpatch_depth = 16"), "got: {text}");

    let again = run();
    assert_success(&again);
    assert!(stdout(&again).contains("already exists"));
}
