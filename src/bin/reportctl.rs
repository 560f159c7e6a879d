//! Command-line companion for ads-dashboard.
//!
//! Runs the same OAuth and reporting pipeline as the HTTP service, which is
//! handy for onboarding an account or checking a customer's numbers without
//! the dashboard.
//!
//! # Usage
//!
//! ```bash
//! # Print the GAQL the service would run
//! cargo run --bin reportctl -- queries --preset LAST_7_DAYS
//!
//! # Start onboarding
//! cargo run --bin reportctl -- auth-url
//!
//! # Trade the code from the redirect for a refresh token
//! cargo run --bin reportctl -- exchange --code "4/0Ab..."
//!
//! # Fetch the dashboard (prompts for the refresh token)
//! cargo run --bin reportctl -- fetch --customer-id 123-456-7890
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (see `ads_dashboard::config`). `queries` needs none.

use ads_dashboard::api::dto::metrics::MetricsResponse;
use ads_dashboard::config::{self, Config};
use ads_dashboard::domain::date_range::DateRange;
use ads_dashboard::domain::report::{ReportKind, ReportQuerySet};
use ads_dashboard::server::build_state;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use dialoguer::Password;

/// CLI tool for the ads dashboard backend.
#[derive(Parser)]
#[command(name = "reportctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the report queries for a date range
    Queries {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Print the Google consent URL
    AuthUrl {
        /// Opaque anti-forgery state (random if omitted)
        #[arg(short, long)]
        state: Option<String>,
    },

    /// Exchange an authorization code for a refresh token
    Exchange {
        /// Code from the OAuth redirect
        #[arg(short, long)]
        code: String,

        /// Redirect URI used for the consent, if not the configured one
        #[arg(short, long)]
        redirect_uri: Option<String>,
    },

    /// Run all reports for a customer
    Fetch {
        /// Customer id, dashes allowed
        #[arg(long)]
        customer_id: String,

        /// Manager account to report through
        #[arg(long)]
        login_customer_id: Option<String>,

        /// Refresh token (prompted for if omitted)
        #[arg(long)]
        refresh_token: Option<String>,

        #[command(flatten)]
        range: RangeArgs,

        /// Print the full payload as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Date range flags shared by `queries` and `fetch`.
#[derive(Args)]
struct RangeArgs {
    /// Named period, e.g. LAST_7_DAYS
    #[arg(long, conflicts_with_all = ["start_date", "end_date"])]
    preset: Option<String>,

    /// Custom range start (YYYY-MM-DD)
    #[arg(long, requires = "end_date")]
    start_date: Option<String>,

    /// Custom range end (YYYY-MM-DD)
    #[arg(long, requires = "start_date")]
    end_date: Option<String>,
}

impl RangeArgs {
    fn to_date_range(&self) -> DateRange {
        match (&self.preset, &self.start_date, &self.end_date) {
            (Some(preset), _, _) => DateRange::preset(preset.as_str()),
            (None, Some(start), Some(end)) => DateRange::between(start.as_str(), end.as_str()),
            _ => DateRange::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Queries { range } => print_queries(&range.to_date_range()),
        Commands::AuthUrl { state } => auth_url(&load_config()?, state),
        Commands::Exchange { code, redirect_uri } => {
            exchange(&load_config()?, &code, redirect_uri).await
        }
        Commands::Fetch {
            customer_id,
            login_customer_id,
            refresh_token,
            range,
            json,
        } => {
            fetch(
                &load_config()?,
                &customer_id,
                login_customer_id.as_deref(),
                refresh_token,
                &range.to_date_range(),
                json,
            )
            .await
        }
    }
}

fn load_config() -> Result<Config> {
    config::load_from_env().context("Failed to load configuration")
}

/// Prints the resolved date clause and every GAQL query.
fn print_queries(range: &DateRange) -> Result<()> {
    let clause = range.resolve();
    let queries = ReportQuerySet::new(&clause);

    println!("{}", "🧾 Report queries".bright_blue().bold());
    println!();
    println!("  Period: {}", clause.as_str().cyan());
    println!();

    for query in queries.iter() {
        println!("{}", format!("── {} ", query.kind).bright_white().bold());
        println!("{}", query.gaql.bright_black());
        println!();
    }

    Ok(())
}

fn auth_url(config: &Config, state: Option<String>) -> Result<()> {
    let app = build_state(config)?;
    let consent = app.auth_service.consent_url(state);

    println!("{}", "🔐 Google consent".bright_blue().bold());
    println!();
    println!("  Open this URL and approve access:");
    println!();
    println!("  {}", consent.url.bright_yellow());
    println!();
    println!("  State: {}", consent.state.cyan());
    println!();

    Ok(())
}

async fn exchange(config: &Config, code: &str, redirect_uri: Option<String>) -> Result<()> {
    let app = build_state(config)?;

    let tokens = app
        .auth_service
        .exchange(code, redirect_uri)
        .await
        .map_err(|e| anyhow::anyhow!("Exchange failed: {}", e))?;

    println!("{}", "✅ Authorization complete".green().bold());
    println!();
    println!("  Refresh token: {}", tokens.refresh_token.bright_yellow().bold());
    if let Some(scope) = &tokens.scope {
        println!("  Scope:         {}", scope.bright_black());
    }
    println!();
    println!(
        "{}",
        "⚠️  Store the refresh token safely. It grants read access to the account."
            .red()
            .bold()
    );
    println!();

    Ok(())
}

async fn fetch(
    config: &Config,
    customer_id: &str,
    login_customer_id: Option<&str>,
    refresh_token: Option<String>,
    range: &DateRange,
    as_json: bool,
) -> Result<()> {
    let app = build_state(config)?;

    let refresh_token = match refresh_token {
        Some(token) => token,
        None => Password::new().with_prompt("Refresh token").interact()?,
    };

    let session = app
        .report_service
        .session(customer_id, login_customer_id.map(Some), &refresh_token);
    if session.customer_id().is_empty() {
        anyhow::bail!("customer id '{customer_id}' contains no digits");
    }

    let report = app
        .report_service
        .fetch_metrics(session, range)
        .await
        .map_err(|e| anyhow::anyhow!("Fetch failed: {}", e))?;

    if as_json {
        let payload = MetricsResponse::from(report);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("{}", "📊 Google Ads metrics".bright_blue().bold());
    println!();
    println!("  Customer: {}", report.customer_id.cyan());
    if let Some(login) = &report.login_customer_id {
        println!("  Via:      {}", login.cyan());
    }
    println!("  Period:   {}", report.date_clause.as_str().bright_black());
    println!();

    let totals = report.totals;
    println!("{}", "Totals:".bright_white().bold());
    println!("  Cost:        {:.2}", totals.cost);
    println!("  Impressions: {}", totals.impressions);
    println!("  Clicks:      {}", totals.clicks);
    println!("  Conversions: {}", totals.conversions);
    println!("  Avg. CPC:    {:.2}", totals.average_cpc);
    println!();

    println!("{}", "Rows:".bright_white().bold());
    for kind in ReportKind::ALL {
        println!(
            "  {:<22} {}",
            kind.name(),
            report.rows(kind).len().to_string().bright_white().bold()
        );
    }
    println!();

    Ok(())
}
