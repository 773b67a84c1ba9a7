//! automail command line client.
//!
//! Drives the [`Composer`] against a running backend: import recipients,
//! send (batch or queued, with live progress), generate content, and look
//! up a send task.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use automail::{
    Attachment, ComposeForm, Composer, Config, CsvUpload, Event, NoticeLevel, Result,
    SenderConfig, SendOutcome, SendingMode, TaskId,
};

#[derive(Parser)]
#[command(name = "automail")]
#[command(version, about = "Bulk email composer client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file
    #[arg(long, global = true, env = "AUTOMAIL_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Backend base URL (overrides the configuration file)
    #[arg(long, global = true, env = "AUTOMAIL_BACKEND", value_name = "URL")]
    backend: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send an email to a list of recipients
    Send {
        /// Recipient addresses, or free text containing them (repeatable)
        #[arg(long = "to", value_name = "ADDRESSES")]
        to: Vec<String>,

        /// CSV file to import recipients from (repeatable)
        #[arg(long, value_name = "PATH")]
        csv: Vec<PathBuf>,

        /// Subject line
        #[arg(long)]
        subject: String,

        /// HTML body
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,

        /// File holding the HTML body
        #[arg(long, value_name = "PATH")]
        body_file: Option<PathBuf>,

        /// File to attach
        #[arg(long, value_name = "PATH")]
        attach: Option<PathBuf>,

        /// Sending mode: `batch` (one request) or `queue` (tracked task)
        #[arg(long, default_value = "queue")]
        mode: SendingMode,

        /// Sender address (falls back to SENDER_EMAIL)
        #[arg(long)]
        sender_email: Option<String>,

        /// Sender app password (falls back to SENDER_PASSWORD)
        #[arg(long)]
        sender_password: Option<String>,
    },

    /// Generate a subject and body from a prompt
    Generate {
        /// What the email should say
        #[arg(long)]
        prompt: String,

        /// Document used to personalize the result (e.g. a resume)
        #[arg(long, value_name = "PATH")]
        context: Option<PathBuf>,
    },

    /// Show the state of a queued send
    Status {
        /// Task identifier returned by a queued send
        task_id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "automail=debug"
    } else {
        "automail=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(code = e.error_code(), error = ?e, "command failed");
            eprintln!("error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

/// Load the configuration file, then apply command line and environment overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    if let Some(base_url) = &cli.backend {
        config.backend.base_url = base_url.clone();
    }
    config.sender = SenderConfig::from_env().merge(config.sender);
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Send {
            to,
            csv,
            subject,
            body,
            body_file,
            attach,
            mode,
            sender_email,
            sender_password,
        } => {
            let mut composer = Composer::with_http(config)?;
            let printer = tokio::spawn(print_events(composer.subscribe()));

            if !to.is_empty() {
                composer.on_add_manual(&to.join(", "))?;
            }
            for path in csv {
                composer
                    .on_csv_selected(CsvUpload::from_path(path).await?)
                    .await?;
            }
            if let Some(path) = attach {
                composer.set_attachment(Attachment::from_path(path).await?);
            }

            let body_html = match (body, body_file) {
                (Some(body), _) => body,
                (None, Some(path)) => tokio::fs::read_to_string(path).await?,
                (None, None) => String::new(),
            };
            let form = ComposeForm {
                sender_email: sender_email.unwrap_or_default(),
                sender_password: sender_password.unwrap_or_default(),
                subject,
                body_html,
                mode,
                ..Default::default()
            };

            let outcome = tokio::select! {
                result = composer.on_submit(form) => Some(result),
                _ = tokio::signal::ctrl_c() => None,
            };

            if outcome.is_none()
                && let Some(task_id) = composer.on_stop_tracking()
            {
                println!(
                    "Stopped watching task {task_id}; the backend keeps sending. \
                     Check it later with `automail status {task_id}`."
                );
            }

            // Closing the channel lets the printer drain and exit
            drop(composer);
            printer.await.ok();

            match outcome {
                Some(Ok(SendOutcome::Completed { task_id, snapshot })) => {
                    println!("Task {task_id}: {}/{} sent", snapshot.sent, snapshot.total);
                    Ok(())
                }
                Some(Ok(SendOutcome::Delivered { .. })) | None => Ok(()),
                Some(Err(e)) => Err(e),
            }
        }

        Commands::Generate { prompt, context } => {
            let mut composer = Composer::with_http(config)?;
            let context = match context {
                Some(path) => Some(Attachment::from_path(path).await?),
                None => None,
            };

            let generated = composer.on_generate(&prompt, context).await?;
            println!("Subject: {}\n\n{}", generated.subject, generated.body);
            Ok(())
        }

        Commands::Status { task_id } => {
            let composer = Composer::with_http(config)?;
            let snapshot = composer.task_status(&TaskId::new(task_id)).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
    }
}

/// Render composer events on the terminal until the composer is dropped
async fn print_events(mut rx: broadcast::Receiver<Event>) {
    loop {
        match rx.recv().await {
            Ok(Event::Notice { level, message }) => match level {
                NoticeLevel::Info | NoticeLevel::Success => println!("{message}"),
                // Errors are reported once, by the exit path
                NoticeLevel::Error => {}
            },
            Ok(Event::Loading {
                active: true,
                text: Some(text),
            }) => eprintln!("{text}"),
            Ok(Event::Progress(view)) => {
                eprintln!(
                    "[{:>3.0}%] {} {}",
                    view.percent,
                    view.counter(),
                    view.message
                );
            }
            Ok(Event::RecipientsChanged { count, .. }) => {
                tracing::debug!(recipients = %Event::recipient_label(count), "recipient list updated");
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "event printer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
