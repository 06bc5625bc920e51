//! Invoicer CLI: sign in, upload invoice documents for extraction and browse
//! the extracted invoices.
//!
//! Set INVOICER_API_URL (or API_URL). Credentials default to admin/admin and
//! can be changed with INVOICER_USERNAME / INVOICER_PASSWORD.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use invoicer_api_client::{ApiClient, InvoiceCache};
use invoicer_cli::files::candidate_from_path;
use invoicer_cli::output::{
    render_invoice_detail, render_invoice_page, render_notification, render_queue,
};
use invoicer_cli::{open_session_store, print_json, require_session};
use invoicer_core::models::{InvoiceSummary, Notification};
use invoicer_core::{paginate, sort_invoices, ClientConfig, SortKey, DEFAULT_PAGE_SIZE};
use invoicer_infra::{init_telemetry, LogFormat};
use invoicer_session::SessionStore;
use invoicer_worker::{BatchSummary, UploadQueue, UploadQueueConfig};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Parser)]
#[command(name = "invoicer", about = "Invoice extraction client")]
struct Cli {
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Log progress at info level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with the configured credentials
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show whether you are signed in and which API is used
    Status,
    /// Upload invoice documents (PDF, JPEG, PNG, GIF, WebP; up to 50 MB each)
    Upload {
        /// Files to upload, processed one at a time in the given order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Media type to declare for every file instead of guessing from the extension
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Show invoices with their line items
    Get {
        /// Invoice IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Search invoices by vendor name (case-insensitive, partial match)
    Search {
        vendor: String,
        /// Sort order: date, amount, or vendor
        #[arg(long, default_value = "date")]
        sort: SortKey,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// List all invoices
    List {
        /// Sort order: date, amount, or vendor
        #[arg(long, default_value = "date")]
        sort: SortKey,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Check that the API is reachable
    Health,
}

fn notify(notification: &Notification) {
    eprintln!("{}", render_notification(notification));
}

/// Collect whatever the queue has announced so far.
fn drain_notifications(rx: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
    let mut drained = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(notification) => drained.push(notification),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Dropped queue notifications");
            }
            Err(_) => break,
        }
    }
    drained
}

fn api_client(config: &ClientConfig) -> anyhow::Result<ApiClient> {
    ApiClient::from_config(config).context("Failed to create API client. Check INVOICER_API_URL")
}

async fn login(
    session: &SessionStore,
    username: &str,
    password: &str,
    json_output: bool,
) -> anyhow::Result<()> {
    if !session.login(username, password).await {
        bail!("Invalid username or password");
    }
    if json_output {
        print_json(&json!({ "authenticated": true }))?;
    } else {
        println!("Signed in as {}", username);
    }
    Ok(())
}

async fn upload(
    config: &ClientConfig,
    files: &[PathBuf],
    content_type: Option<&str>,
    json_output: bool,
) -> anyhow::Result<()> {
    let mut candidates = Vec::with_capacity(files.len());
    for path in files {
        candidates.push(candidate_from_path(path, content_type).await?);
    }

    let client = api_client(config)?;
    let queue = UploadQueue::new(
        Arc::new(client),
        UploadQueueConfig {
            queue_size: config.upload_queue_size,
            ..UploadQueueConfig::default()
        },
    );
    let mut notifications = queue.subscribe();

    let outcome = queue.add_files(candidates);
    let summary = if queue.has_pending() {
        queue.submit_all_pending().await
    } else {
        BatchSummary::default()
    };

    let raised = drain_notifications(&mut notifications);
    let entries = queue.snapshot();
    queue.shutdown().await;

    if json_output {
        let rejected: Vec<_> = outcome
            .rejections
            .iter()
            .map(|(file_name, reason)| json!({ "file": file_name, "reason": reason.to_string() }))
            .collect();
        print_json(&json!({
            "accepted": outcome.accepted,
            "rejected": rejected,
            "uploads": entries,
            "summary": summary,
            "notifications": raised,
        }))?;
    } else {
        raised.iter().for_each(notify);
        for (file_name, reason) in &outcome.rejections {
            eprintln!("  {}: {}", file_name, reason);
        }
        if !entries.is_empty() {
            print!("{}", render_queue(&entries, &summary));
        }
    }

    if outcome.accepted == 0 {
        bail!("No files were queued for upload");
    }
    if summary.failed > 0 {
        bail!("{} of {} upload(s) failed", summary.failed, outcome.accepted);
    }
    Ok(())
}

async fn get_invoices(config: &ClientConfig, ids: &[String], json_output: bool) -> anyhow::Result<()> {
    let client = api_client(config)?;
    let cache = InvoiceCache::new(config.cache_capacity);

    let mut found = Vec::new();
    let mut failures = 0;
    for id in ids {
        match client.get_invoice_cached(&cache, id).await {
            Ok(invoice) => found.push(invoice),
            Err(e) => {
                failures += 1;
                let message = if e.is_not_found() {
                    format!("Invoice ID not found: {}", id)
                } else {
                    e.user_message()
                };
                notify(&Notification::error(message));
            }
        }
    }

    if json_output {
        print_json(&found)?;
    } else {
        for invoice in &found {
            print!("{}", render_invoice_detail(invoice));
        }
    }

    if failures > 0 {
        bail!("{} of {} invoice(s) could not be loaded", failures, ids.len());
    }
    Ok(())
}

fn show_listing(
    title: &str,
    mut invoices: Vec<InvoiceSummary>,
    sort: SortKey,
    page: usize,
    json_output: bool,
) -> anyhow::Result<()> {
    sort_invoices(&mut invoices, sort);
    let page = paginate(&invoices, page, DEFAULT_PAGE_SIZE);

    if json_output {
        print_json(&page)
    } else {
        print!("{}", render_invoice_page(title, &page));
        Ok(())
    }
}

async fn search(
    config: &ClientConfig,
    vendor: &str,
    sort: SortKey,
    page: usize,
    json_output: bool,
) -> anyhow::Result<()> {
    let client = api_client(config)?;
    let list = match client.get_invoices_by_vendor(vendor).await {
        Ok(list) => list,
        Err(e) => {
            notify(&Notification::error(e.user_message()));
            bail!("Vendor search failed");
        }
    };

    if list.invoices.is_empty() && !json_output {
        notify(&Notification::info("No invoices found for this vendor"));
    }

    show_listing(
        &format!("Invoices for \"{}\"", vendor),
        list.invoices,
        sort,
        page,
        json_output,
    )
}

async fn list(config: &ClientConfig, sort: SortKey, page: usize, json_output: bool) -> anyhow::Result<()> {
    let client = api_client(config)?;
    let list = match client.list_invoices().await {
        Ok(list) => list,
        Err(e) => {
            notify(&Notification::error(e.user_message()));
            bail!("Listing invoices failed");
        }
    };

    show_listing("All Invoices", list.invoices, sort, page, json_output)
}

async fn health(config: &ClientConfig, json_output: bool) -> anyhow::Result<()> {
    let client = api_client(config)?;
    let status = client
        .health()
        .await
        .with_context(|| format!("API at {} is unreachable", client.base_url()))?;

    if json_output {
        print_json(&status)?;
    } else {
        println!("API at {}: {}", client.base_url(), status.status);
    }

    if !status.is_ok() {
        bail!("API reported status '{}'", status.status);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "invoicer=info"
    } else {
        "invoicer=warn"
    };
    init_telemetry(default_filter, LogFormat::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    let config = ClientConfig::from_env().context("Invalid client configuration")?;
    let session = open_session_store(&config);
    let json_output = cli.json;

    match cli.command {
        Commands::Login { username, password } => {
            login(&session, &username, &password, json_output).await?;
        }
        Commands::Logout => {
            session.logout().await;
            if json_output {
                print_json(&json!({ "authenticated": false }))?;
            } else {
                println!("Signed out");
            }
        }
        Commands::Status => {
            let authenticated = session.is_authenticated().await;
            if json_output {
                print_json(&json!({
                    "authenticated": authenticated,
                    "api_url": config.api_url,
                }))?;
            } else {
                println!(
                    "{} (API: {})",
                    if authenticated { "Signed in" } else { "Not signed in" },
                    config.api_url
                );
            }
        }
        Commands::Upload {
            files,
            content_type,
        } => {
            require_session(&session).await?;
            upload(&config, &files, content_type.as_deref(), json_output).await?;
        }
        Commands::Get { ids } => {
            require_session(&session).await?;
            get_invoices(&config, &ids, json_output).await?;
        }
        Commands::Search { vendor, sort, page } => {
            require_session(&session).await?;
            search(&config, &vendor, sort, page, json_output).await?;
        }
        Commands::List { sort, page } => {
            require_session(&session).await?;
            list(&config, sort, page, json_output).await?;
        }
        Commands::Health => {
            health(&config, json_output).await?;
        }
    }

    Ok(())
}
