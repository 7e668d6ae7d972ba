use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::guard::View;
use console::App;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

/// Field-sales admin console
#[derive(Parser, Debug)]
#[command(name = "console")]
#[command(version, about, long_about = None)]
struct Args {
    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the restored session
    Status,
    /// Sign in and store the session
    Login { username: String, password: String },
    /// Clear the stored session
    Logout,
    /// Render a route as the dashboard would
    Open { route: String },
    /// Print session metrics in Prometheus text format
    Metrics,
}

fn init_logging(json: bool) {
    dotenv().ok();
    if json {
        common::utils::logging::init_logging_json();
    } else {
        common::utils::logging::init_logging_default();
    }
    info!(service = "console", event = "logger_init", "tracing subscriber initialized");
}

async fn run(command: Command) -> anyhow::Result<()> {
    let cfg = configs::AppConfig::load_and_validate()?;
    let app = App::from_config(&cfg).await?;
    let session = app.mount().await;

    match command {
        Command::Status => match (&session.token, session.role) {
            (Some(_), Some(role)) => {
                println!("signed in as {} ({role})", session.display_name().unwrap_or_default());
                if let Some(team_id) = session.team_id {
                    println!("team {team_id}");
                }
            }
            (Some(_), None) => println!("signed in (role unknown)"),
            _ => println!("signed out"),
        },
        Command::Login { username, password } => {
            let outcome = app.login(&username, &password).await?;
            println!("signed in as {username} ({})", outcome.role);
            if let Some(team_id) = outcome.team_id {
                println!("team {team_id}");
            }
        }
        Command::Logout => {
            let landing = app.logout().await;
            println!("signed out; now at {landing}");
        }
        Command::Open { route } => {
            let screen = app.render(&route).await;
            match screen.decision.view {
                View::Login { error } => {
                    println!("login required");
                    if let Some(error) = error {
                        println!("last error: {error}");
                    }
                }
                View::Page(route) => {
                    println!("{route}");
                    for entry in screen.navigation {
                        println!("  {:<28} {}", entry.label, entry.route);
                    }
                }
            }
        }
        Command::Metrics => print!("{}", service::observability::encode_metrics()),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.json_logs);

    let run_id = Uuid::new_v4();
    info!(service = "console", event = "start", %run_id, version = env!("CARGO_PKG_VERSION"), "console starting");

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "console", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(args.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "console", event = "run_failed", %run_id, error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
