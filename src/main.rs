use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use raptor_log::config::Config;
use raptor_log::fault::Fault;
use raptor_log::host::{ModInfo, StartupAnnouncer};
use raptor_log::logging::{self, Diagnostic};
use raptor_log::notify::NotificationCenter;

#[derive(Parser, Debug)]
#[command(name = "raptor-log", version, about = "Write mod diagnostics to daily log files")]
struct Cli {
    /// Config file (overrides RAPTOR_LOG_CONFIG and the default lookup)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append a plain message line
    Message { group: String, text: String },

    /// Append a short non-error diagnostic
    Note {
        group: String,
        page: String,
        method: String,
        message: String,
    },

    /// Append a diagnostic line
    Diagnostic {
        group: String,
        page: String,
        method: String,
        #[arg(long)]
        error: bool,
        #[arg(long, default_value = "")]
        exception: String,
        #[arg(long, default_value = "")]
        friendly: String,
        #[arg(long, default_value = "")]
        error_line: String,
        #[arg(long, default_value = "")]
        technical: String,
    },

    /// Append a categorized error line (0 = Success, 1 = Error, other = Unknown)
    Error {
        #[arg(allow_negative_numbers = true)]
        category: i32,
        group: String,
        page: String,
        method: String,
        friendly: String,
        technical: String,
    },

    /// Log an error and show the notice a mod would show
    Record {
        group: String,
        page: String,
        method: String,
        friendly: String,
        description: String,
    },

    /// Announce a mod as loaded
    Announce {
        name: String,
        #[arg(value_name = "VERSION")]
        mod_version: String,
        developer: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_tracing(logging::DEFAULT_FILTER)?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let center = NotificationCenter::default();
    let reporter = config.reporter(&center)?;
    let logger = reporter.logger();

    match cli.command {
        Command::Message { group, text } => {
            logger
                .log_message(&group, &text)
                .with_context(|| format!("Failed to log message for {}", group))?;
        }
        Command::Note {
            group,
            page,
            method,
            message,
        } => logger.log_note(&group, &page, &method, &message),
        Command::Diagnostic {
            group,
            page,
            method,
            error,
            exception,
            friendly,
            error_line,
            technical,
        } => {
            let diagnostic = if error {
                Diagnostic::error(group, page, method)
            } else {
                Diagnostic::message(group, page, method)
            };
            logger.log_diagnostic(
                &diagnostic
                    .exception(exception)
                    .friendly(friendly)
                    .error_line(error_line)
                    .technical(technical),
            );
        }
        Command::Error {
            category,
            group,
            page,
            method,
            friendly,
            technical,
        } => logger.log_error(category, &group, &page, &method, &friendly, &technical),
        Command::Record {
            group,
            page,
            method,
            friendly,
            description,
        } => reporter.record_error(&Fault::new(description), &group, &page, &method, &friendly),
        Command::Announce {
            name,
            mod_version,
            developer,
        } => {
            let mut announcer = StartupAnnouncer::new(ModInfo::new(name, mod_version, developer));
            announcer.on_tick(true, &reporter);
        }
    }

    for notice in center.visible().iter().rev() {
        println!(
            "[{}] [{}] {}: {}",
            notice.icon.as_str(),
            notice.sender,
            notice.subject,
            notice.body
        );
    }

    tracing::debug!("Logs under {}", logger.log_root().display());
    Ok(())
}
