use clap::{Parser, Subcommand};
use diesel::pg::PgConnection;
use diesel::Connection;

use atlas_migrations::config::MigrateConfig;
use atlas_migrations::{MigrationError, MigrationState, Migrator};

#[derive(Debug, Parser)]
#[command(name = "atlas-migrate", version, about = "Apply and roll back Atlas schema migrations")]
struct Cli {
    /// Overrides ATLAS_MIGRATE__DATABASE_URL.
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply all pending migrations.
    Up,
    /// Roll back the most recent migrations.
    Down {
        #[arg(long, default_value_t = 1)]
        steps: usize,
    },
    /// Roll back the most recent migration and apply it again.
    Redo,
    /// Show every migration and whether it has been applied.
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Fail if an applied migration's SQL has changed since it ran.
    Verify,
}

fn main() {
    atlas_shared::middleware::init_tracing("atlas-migrate");

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "migration command failed");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let database_url = match cli.database_url {
        Some(url) => url,
        None => MigrateConfig::load()?.database_url,
    };

    let mut conn = PgConnection::establish(&database_url).map_err(MigrationError::from)?;
    tracing::debug!("connected to database");

    let migrator = Migrator::bundled()?;

    match cli.command {
        Command::Up => {
            let applied = migrator.run_pending(&mut conn)?;
            println!("applied {} migration(s)", applied.len());
        }
        Command::Down { steps } => {
            let reverted = migrator.revert(&mut conn, steps)?;
            for version in &reverted {
                println!("reverted {version}");
            }
        }
        Command::Redo => {
            let version = migrator.redo(&mut conn)?;
            println!("redid {version}");
        }
        Command::Status { json } => {
            let status = migrator.status(&mut conn)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                for s in &status {
                    let applied_at = s
                        .applied_at
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "-".into());
                    let adopted = if s.adopted { " (adopted)" } else { "" };
                    println!(
                        "{:>4}  {:<36} {:<8} {}{}",
                        s.version,
                        s.name,
                        state_label(s.state),
                        applied_at,
                        adopted
                    );
                }
            }
        }
        Command::Verify => {
            let drifted = migrator.verify(&mut conn)?;
            if !drifted.is_empty() {
                return Err(MigrationError::ChecksumMismatch { versions: drifted }.into());
            }
            println!("all applied migrations match");
        }
    }

    Ok(())
}

fn state_label(state: MigrationState) -> &'static str {
    match state {
        MigrationState::Pending => "pending",
        MigrationState::Applied => "applied",
        MigrationState::Drifted => "drifted",
        MigrationState::Unknown => "unknown",
    }
}
