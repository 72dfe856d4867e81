use clap::Parser;
use readstreak_domain::shared::DomainError;
use readstreak_infrastructure::{logging, EngineConfig};
use readstreak_lib::presentation::cli::{self, Cli};
use readstreak_lib::presentation::state::AppState;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<DomainError>() {
            Some(domain) => eprintln!("error: {}", domain.format_with_code()),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = EngineConfig::load(&cli.config_path());
    logging::init_logger(&config.logging)?;

    let user = cli.user_key();
    let state = AppState::new(&config).await?;

    let output = cli::execute(&state, &user, cli.command).await?;
    println!("{}", output);

    state.db.pool().close().await;
    Ok(())
}
