mod commands;
mod export;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{EditArgs, IdArgs, ListArgs, NewArgs, SearchArgs};
use fastmask_client::{
    load_dotenv, Config, MaskedEmailClient, MaskedEmailState, TOKEN_ENV, USERNAME_ENV,
};
use output::{print_error, ExitCode};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fastmask")]
#[command(about = "Manage Fastmail masked email from the command line", long_about = None)]
struct Cli {
    /// Fastmail username
    #[arg(long, env = USERNAME_ENV, global = true, hide_env_values = true)]
    username: Option<String>,
    /// Fastmail API token with the Masked Email scope
    #[arg(long, env = TOKEN_ENV, global = true, hide_env_values = true)]
    token: Option<String>,
    /// Log requests to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List masked emails associated with account
    List(ListArgs),
    /// Search for masked emails
    Search(SearchArgs),
    /// Create a new masked email
    New(NewArgs),
    /// Edit information associated with a masked email
    Edit(EditArgs),
    /// Set state of masked email to active
    Activate(IdArgs),
    /// Set state of masked email to blocked
    Block(IdArgs),
    /// Delete masked email (recoverable from Fastmail settings)
    Delete(IdArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let dotenv = load_dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(path) = dotenv {
        debug!(path = %path.display(), "loaded environment file");
    }

    if let Err(err) = run(cli).await {
        let code = ExitCode::for_error(&err);
        debug!(exit = %code, "command failed");
        print_error(&format!("{:#}", err));
        std::process::exit(code.code());
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let credentials = config.credentials(cli.username, cli.token)?;
    let client = MaskedEmailClient::with_session_url(&credentials, config.session_url());
    debug!(username = %client.username(), "client ready");

    match cli.command {
        Commands::List(args) => commands::handle_list(&client, args).await,
        Commands::Search(args) => commands::handle_search(&client, args).await,
        Commands::New(args) => commands::handle_new(&client, args).await,
        Commands::Edit(args) => commands::handle_edit(&client, args).await,
        Commands::Activate(args) => {
            commands::handle_state(&client, args, MaskedEmailState::Enabled).await
        }
        Commands::Block(args) => {
            commands::handle_state(&client, args, MaskedEmailState::Disabled).await
        }
        Commands::Delete(args) => {
            commands::handle_state(&client, args, MaskedEmailState::Deleted).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_credentials_after_subcommand() {
        let cli = Cli::try_parse_from(["fastmask", "block", "42", "--username", "me@fastmail.com", "--token", "t"])
            .unwrap();
        assert_eq!(cli.username.as_deref(), Some("me@fastmail.com"));
        assert!(matches!(cli.command, Commands::Block(IdArgs { ref id }) if id == "42"));
    }

    #[test]
    fn test_credentials_read_from_environment_names() {
        let cmd = Cli::command();
        let env_of = |name: &str| {
            cmd.get_arguments()
                .find(|a| a.get_id() == name)
                .and_then(|a| a.get_env())
                .map(|e| e.to_string_lossy().into_owned())
        };

        assert_eq!(env_of("username").as_deref(), Some("FM_USERNAME"));
        assert_eq!(env_of("token").as_deref(), Some("FM_ME_TOKEN"));
    }
}
