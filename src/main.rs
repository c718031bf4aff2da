use anyhow::{Context, Result};
use clap::Parser;
use rag_app::cli::{Cli, Command, GenerateCommand};
use rag_app::config::Config;
use rag_app::orchestrator::App;
use rag_app::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // file, then environment
    let mut config = Config::load(cli.config.as_deref())
        .await
        .context("failed to load configuration")?;

    logging::init(cli.verbose || config.verbose_logging);

    match cli.command {
        Command::Generate(GenerateCommand::SyntheticQuestions(args)) => {
            args.apply_to(&mut config);

            let app = App::initialize(config)?;
            app.run(args.request()).await?;
        }
    }

    Ok(())
}
