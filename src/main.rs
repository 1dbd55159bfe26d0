use std::process::ExitCode;

use anyhow::{Context, Result};

use xmlcheck::cli::{Cli, VerbosityLevel};
use xmlcheck::config::ConfigManager;
use xmlcheck::output::reporter_for;
use xmlcheck::pipeline::validate;
use xmlcheck::source::DocumentSource;

/// Exit status when the document has issues
const EXIT_ISSUES: u8 = 1;
/// Exit status when the document could not be checked at all
const EXIT_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = ConfigManager::load_config(&cli)
        .await
        .context("Failed to load configuration")?;

    init_logging(ConfigManager::verbosity(&config));
    log::debug!("effective configuration: {:?}", config);

    let source = DocumentSource::parse(&cli.source)?;
    let document = source
        .load(&ConfigManager::http_config(&config))
        .await
        .with_context(|| format!("Error reading {}", source))?;

    let options = ConfigManager::validation_options(&config);
    let result = validate(document.as_bytes(), &options);

    let reporter = reporter_for(&config);
    print!("{}", reporter.render_report(&document, &result, &options));

    if result.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_ISSUES))
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the verbosity-derived level
fn init_logging(verbosity: VerbosityLevel) {
    env_logger::Builder::new()
        .filter_level(verbosity.log_filter())
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}
