use std::path::{Path, PathBuf};

use serde_json::Value;

pub enum Outcome {
    Pass,
    Blessed,
    Fail(String),
}

pub struct SnapshotResult {
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Expected snapshot for a fixture: `expected/<stem>.json` next to it.
fn expected_path(fixture: &Path) -> PathBuf {
    let stem = fixture.file_stem().and_then(|s| s.to_str()).unwrap_or("?");
    fixture
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("expected")
        .join(format!("{}.json", stem))
}

/// Key-sorted pretty JSON, so both sides of a mismatch diff cleanly.
fn canonical(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "<unserializable>".to_string())
}

fn run_single(fixture: &Path, bless: bool) -> SnapshotResult {
    let fail = |reason: String| SnapshotResult {
        path: fixture.to_path_buf(),
        outcome: Outcome::Fail(reason),
    };

    let source = match std::fs::read_to_string(fixture) {
        Ok(s) => s,
        Err(e) => return fail(format!("cannot read fixture: {}", e)),
    };

    let lines: Vec<String> = source.lines().map(str::to_string).collect();
    let document = markxs::Parser::new(lines).parse();
    let actual = match serde_json::to_value(&document) {
        Ok(v) => v,
        Err(e) => return fail(format!("cannot serialize document: {}", e)),
    };

    let expected_file = expected_path(fixture);
    if bless {
        if let Some(dir) = expected_file.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                return fail(format!("cannot create {}: {}", dir.display(), e));
            }
        }
        let mut text = canonical(&actual);
        text.push('\n');
        return match std::fs::write(&expected_file, text) {
            Ok(()) => SnapshotResult {
                path: fixture.to_path_buf(),
                outcome: Outcome::Blessed,
            },
            Err(e) => fail(format!("cannot write {}: {}", expected_file.display(), e)),
        };
    }

    let expected_text = match std::fs::read_to_string(&expected_file) {
        Ok(s) => s,
        Err(_) => {
            return fail(format!(
                "expected snapshot missing: {}",
                expected_file.display()
            ));
        }
    };
    let expected: Value = match serde_json::from_str(&expected_text) {
        Ok(v) => v,
        Err(e) => {
            return fail(format!(
                "malformed snapshot {}: {}",
                expected_file.display(),
                e
            ));
        }
    };

    if actual != expected {
        return fail(format!(
            "snapshot mismatch\n--- actual ---\n{}\n--- expected ---\n{}",
            canonical(&actual),
            canonical(&expected)
        ));
    }

    SnapshotResult {
        path: fixture.to_path_buf(),
        outcome: Outcome::Pass,
    }
}

/// Discover `.xs` fixtures under `root`, sorted, skipping `expected/` dirs.
fn discover(root: &Path) -> Vec<PathBuf> {
    let mut fixtures = Vec::new();
    collect_fixtures(root, &mut fixtures);
    fixtures.sort();
    fixtures
}

fn collect_fixtures(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if path.file_name().and_then(|n| n.to_str()) != Some("expected") {
                collect_fixtures(&path, out);
            }
        } else if path.extension().and_then(|e| e.to_str()) == Some("xs") {
            out.push(path);
        }
    }
}

fn pass_label(no_color: bool) -> &'static str {
    if no_color { "PASS" } else { "\x1b[32mPASS\x1b[0m" }
}

fn fail_label(no_color: bool) -> &'static str {
    if no_color { "FAIL" } else { "\x1b[31mFAIL\x1b[0m" }
}

/// Run every fixture under `path` (or a single file). Returns the process
/// exit code: 0 when all snapshots match, 1 on any failure.
pub fn run_snapshots(path: &Path, no_color: bool, bless: bool) -> i32 {
    let fixtures = if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        discover(path)
    };

    if fixtures.is_empty() {
        eprintln!("no .xs fixtures found in {}", path.display());
        return 1;
    }

    let mut passed = 0usize;
    let mut blessed = 0usize;
    let mut failures: Vec<SnapshotResult> = Vec::new();

    for fixture in &fixtures {
        let result = run_single(fixture, bless);
        let label = fixture.display();
        match &result.outcome {
            Outcome::Pass => {
                passed += 1;
                eprintln!("  {}  {}", pass_label(no_color), label);
            }
            Outcome::Blessed => {
                blessed += 1;
                eprintln!("  BLESS {}", label);
            }
            Outcome::Fail(_) => {
                eprintln!("  {}  {}", fail_label(no_color), label);
                failures.push(result);
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &failures {
            eprintln!();
            eprintln!("  --- {} ---", f.path.display());
            if let Outcome::Fail(reason) = &f.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    let failed = failures.len();
    if failed == 0 {
        let ok = if no_color { "ok" } else { "\x1b[32mok\x1b[0m" };
        if blessed > 0 {
            eprintln!(
                "snapshot result: {}. {} passed, {} blessed",
                ok, passed, blessed
            );
        } else {
            eprintln!("snapshot result: {}. {} passed, 0 failed", ok, passed);
        }
        0
    } else {
        let label = if no_color {
            "FAILED"
        } else {
            "\x1b[31mFAILED\x1b[0m"
        };
        eprintln!(
            "snapshot result: {}. {} passed, {} failed (of {})",
            label,
            passed,
            failed,
            passed + failed + blessed
        );
        1
    }
}
