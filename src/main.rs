use client::{Client, load_state};
use mimalloc::MiMalloc;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Built-in demo page, used when no state file is given.
const SAMPLE_STATE: &str = r#"{
    "board": "g",
    "boards": ["a", "g", "v", "all"],
    "motd": "Welcome to /g/ - Technology",
    "threads": [
        {"id": 1024, "subject": "Desktop thread", "time": 1470000000, "post_count": 312, "image_count": 98},
        {"id": 2048, "subject": "Rust general", "time": 1470003600, "post_count": 57, "image_count": 4}
    ]
}"#;

fn main() -> ExitCode {
    env_logger::Builder::from_default_env().init();

    let json = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                eprintln!("cannot read state file {path}: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => SAMPLE_STATE.to_string(),
    };

    // The state loader must succeed before any view mounts.
    let state = match load_state(&json) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);

    let mut client = match Client::boot(state, now) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("startup failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(report) = client.flush_if_requested() {
        log::debug!(
            target: "agora",
            "first flush: {} applied, {} skipped",
            report.applied,
            report.skipped
        );
    }

    println!("{}", client.snapshot());
    ExitCode::SUCCESS
}
