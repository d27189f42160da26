#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "DASHGRID_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn should_emit_json() -> bool {
    std::env::var("DASHGRID_OUTPUT").is_ok_and(|mode| mode.eq_ignore_ascii_case("json"))
}

fn main() {
    init_tracing();
    if let Err(error) = dashgrid_cli::run_from_env() {
        if should_emit_json() {
            eprintln!(
                "{}",
                serde_json::json!({
                    "status": "error",
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                })
            );
        } else {
            eprintln!("{error}");
        }
        std::process::exit(error.exit_code());
    }
}
