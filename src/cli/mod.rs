pub mod commands;
pub mod context;
pub mod output;
pub mod session;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "vault")]
#[command(about = "Student Vault CLI - manage students, courses and attendance")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Server URL (defaults to the stored session's server)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in with email and password")]
    Login(commands::auth::CredentialArgs),

    #[command(about = "Create an account and sign in")]
    Register(commands::auth::CredentialArgs),

    #[command(about = "Sign out and forget the stored session")]
    Logout,

    #[command(about = "Show the current session")]
    Whoami,

    #[command(about = "Show student, course and attendance totals")]
    Dashboard,

    #[command(about = "Student management")]
    Students {
        #[command(subcommand)]
        cmd: commands::students::StudentCommands,
    },

    #[command(about = "Course catalogue")]
    Courses {
        #[command(subcommand)]
        cmd: commands::courses::CourseCommands,
    },

    #[command(about = "Attendance records")]
    Attendance {
        #[command(subcommand)]
        cmd: commands::attendance::AttendanceCommands,
    },

    #[command(about = "Run the development API server")]
    Serve(commands::serve::ServeArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let server = cli.server.as_deref();

    match cli.command {
        Commands::Login(args) => commands::auth::login(server, args, output_format).await,
        Commands::Register(args) => commands::auth::register(server, args, output_format).await,
        Commands::Logout => commands::auth::logout(server, output_format).await,
        Commands::Whoami => commands::auth::whoami(server, output_format).await,
        Commands::Dashboard => commands::dashboard::handle(server, output_format).await,
        Commands::Students { cmd } => commands::students::handle(server, cmd, output_format).await,
        Commands::Courses { cmd } => commands::courses::handle(server, cmd, output_format).await,
        Commands::Attendance { cmd } => commands::attendance::handle(server, cmd, output_format).await,
        Commands::Serve(args) => commands::serve::handle(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_commands_and_globals() {
        let cli = Cli::try_parse_from(["vault", "--json", "students", "delete", "s1", "--yes"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Commands::Students {
                cmd: commands::students::StudentCommands::Delete { yes: true, .. }
            }
        ));
    }

    #[test]
    fn attendance_status_is_parsed_case_insensitively() {
        let cli = Cli::try_parse_from([
            "vault", "attendance", "record", "--student", "s1", "--course", "c1", "--status", "present",
        ])
        .unwrap();
        let Commands::Attendance {
            cmd: commands::attendance::AttendanceCommands::Record { status, .. },
        } = cli.command
        else {
            panic!("expected attendance record");
        };
        assert_eq!(status, Some(crate::model::AttendanceStatus::Present));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
