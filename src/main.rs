use anyhow::Result;
use clap::{CommandFactory, Parser};
use readaloud::app::{list_voices, load_config, run_read_command};
use readaloud::cli::{Cli, Commands, ConfigAction};
use readaloud::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            let config = load_config(cli.config.as_deref())?;
            run_read_command(config, cli).await?;
        }
        Some(Commands::Voices) => {
            list_voices();
        }
        Some(Commands::Config { action }) => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "readaloud",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Handle configuration commands.
fn handle_config_command(action: ConfigAction, custom_path: Option<&std::path::Path>) -> Result<()> {
    let config_path = custom_path
        .map(std::path::PathBuf::from)
        .unwrap_or_else(Config::default_path);

    match action {
        ConfigAction::Show => {
            let config = load_config(custom_path)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Init => {
            if config_path.exists() {
                eprintln!("Config already exists at {}", config_path.display());
                std::process::exit(1);
            }
            Config::default().save(&config_path)?;
            println!("Wrote default config to {}", config_path.display());
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }
    Ok(())
}
