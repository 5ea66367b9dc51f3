//! dinebot binary entry point.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dinebot::cli::Cli;
use dinebot::config::BotConfig;
use dinebot::generation::TurnDriver;
use dinebot::provider::{http::build_client, OpenAiCompatibleProvider};
use dinebot::session::Session;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the transcript.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> dinebot::error::Result<BotConfig> {
    let mut config = BotConfig::from_env()?;
    config.apply_cli(cli);
    config.validate()?;
    Ok(config)
}

async fn run(config: BotConfig) -> dinebot::error::Result<()> {
    tracing::debug!(?config, "starting session");

    let provider = OpenAiCompatibleProvider::new(
        config.provider_name.clone(),
        config.model.clone(),
        config.api_key.clone(),
        Some(config.base_url.clone()),
        build_client(config.request_timeout)?,
    );
    let registry = dinebot::tools::default_registry()?;
    let driver = TurnDriver::from_config(Arc::new(provider), registry, &config);

    let mut session = Session::new(
        driver,
        Some(config.system_prompt.clone()),
        config.user_name.clone(),
    );
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    session.run(stdin, &mut stdout).await?;
    Ok(())
}
