use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(name = "smartmark", version)]
pub struct Cli {
    /// Upper bound for each remote call, in milliseconds
    #[clap(long, env = "SMARTMARK_REQUEST_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the provider consent URL, or say where a signed-in user lands
    Signin,

    #[clap(flatten)]
    Dashboard(DashboardCommand),
}

/// Commands that run against the signed-in dashboard.
#[derive(Debug, Subcommand)]
pub enum DashboardCommand {
    /// Show your bookmarks, newest first
    List,

    /// Save a bookmark
    Add {
        #[clap(long)]
        title: String,

        #[clap(long)]
        url: String,
    },

    /// Remove a bookmark by id
    Delete { id: String },

    /// End the current session
    Signout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_takes_title_and_url_flags() {
        let cli = Cli::parse_from([
            "smartmark",
            "add",
            "--title",
            "Docs",
            "--url",
            "https://docs.example.com",
        ]);

        match cli.command {
            Command::Dashboard(DashboardCommand::Add { title, url }) => {
                assert_eq!(title, "Docs");
                assert_eq!(url, "https://docs.example.com");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn timeout_flag_is_optional() {
        let cli = Cli::parse_from(["smartmark", "--timeout-ms", "250", "list"]);
        assert_eq!(cli.timeout_ms, Some(250));
        assert!(matches!(
            cli.command,
            Command::Dashboard(DashboardCommand::List)
        ));
    }

    #[test]
    fn signin_stays_a_top_level_command() {
        let cli = Cli::parse_from(["smartmark", "signin"]);
        assert!(matches!(cli.command, Command::Signin));
    }
}
