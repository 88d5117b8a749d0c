use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tomata", version, about = "Pomodoro timer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Work statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Account authentication
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Auth { action } => commands::auth::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_timer_commands() {
        assert!(Cli::try_parse_from(["tomata", "timer", "run"]).is_ok());
        assert!(Cli::try_parse_from(["tomata", "timer", "run", "--sessions", "2"]).is_ok());
        assert!(Cli::try_parse_from(["tomata", "timer", "status"]).is_ok());
        assert!(Cli::try_parse_from(["tomata", "timer", "switch", "shortBreak"]).is_ok());
        assert!(Cli::try_parse_from(["tomata", "timer", "set", "--work-duration", "1800"]).is_ok());
        assert!(Cli::try_parse_from(["tomata", "timer"]).is_err());
    }

    #[test]
    fn parses_task_commands() {
        assert!(Cli::try_parse_from(["tomata", "task", "add", "Write docs"]).is_ok());
        assert!(Cli::try_parse_from([
            "tomata",
            "task",
            "add",
            "Write docs",
            "--estimated-pomodoros",
            "3",
        ])
        .is_ok());
        assert!(Cli::try_parse_from(["tomata", "task", "list", "--today"]).is_ok());
        assert!(Cli::try_parse_from(["tomata", "task", "select"]).is_ok());
        assert!(Cli::try_parse_from(["tomata", "task", "show"]).is_err());
    }

    #[test]
    fn parses_config_stats_and_auth_commands() {
        assert!(Cli::try_parse_from(["tomata", "config", "get", "timer.work_duration"]).is_ok());
        assert!(Cli::try_parse_from(["tomata", "config", "set", "api.base_url", "x"]).is_ok());
        assert!(Cli::try_parse_from(["tomata", "stats", "daily", "--days", "30"]).is_ok());
        assert!(Cli::try_parse_from([
            "tomata",
            "auth",
            "login",
            "--email",
            "a@b.c",
            "--password",
            "pw",
        ])
        .is_ok());
        assert!(Cli::try_parse_from(["tomata", "auth", "login"]).is_err());
    }
}
