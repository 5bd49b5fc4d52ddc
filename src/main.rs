use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::error;

use conventional_release::config::Config;
use conventional_release::event::TriggerEvent;
use conventional_release::forge::GitHubForge;
use conventional_release::workflow;

#[derive(clap::Parser)]
#[command(
    name = "conventional-release",
    version,
    about = "Tag and release from conventional commits inside GitHub Actions"
)]
struct Args {}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    let _args = Args::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let event = match TriggerEvent::from_env() {
        Ok(event) => event,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let forge = GitHubForge::new(&config.api_url, &config.repository, &config.token)?;

    if let Err(e) = workflow::run(&config, &event, &forge) {
        error!("{}", e);
        std::process::exit(1);
    }

    Ok(())
}
