//! Fetch one resource from the content API and print it as JSON.
//!
//! Usage:
//!   portfolio-data projects
//!   portfolio-data experiences --lang es
//!   portfolio-data certifications
//!   portfolio-data blogs
//!   portfolio-data search <query>
//!
//! Required environment variables:
//! - PORTFOLIO_API_URL
//!
//! Optional:
//! - PORTFOLIO_API_TIMEOUT_SECS (defaults to 10)
//! - PORTFOLIO_DEFAULT_LANGUAGE (defaults to en)
//! - PORTFOLIO_LANGUAGE_FILE (persists the `--lang` selection)

use anyhow::{bail, Context, Result};
use portfolio_data::query::guard;
use portfolio_data::{Config, Language, Portfolio, QueryState};
use serde::Serialize;
use tracing::info;

const RESOURCES: &str = "projects, experiences, certifications, blogs, search <query>";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_data=info".parse()?),
        )
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let lang = take_flag(&mut args, "--lang")?;

    let config = Config::from_env()?;
    let portfolio = Portfolio::from_config(&config)?;

    if let Some(code) = lang {
        let language = Language::from_code(&code).context("Invalid --lang value")?;
        portfolio
            .set_language(language)
            .context("Invalid --lang value")?;
    }

    let resource = args.first().map(String::as_str).unwrap_or("projects");
    info!("Fetching {} in '{}'", resource, portfolio.language());

    let output = match resource {
        "projects" => render(portfolio.projects(None).settled().await)?,
        "experiences" => render(portfolio.experiences(None).settled().await)?,
        "certifications" => render(portfolio.certifications(None).settled().await)?,
        "blogs" => render(portfolio.blogs(None).settled().await)?,
        "search" => {
            let query = args.get(1).context("Usage: portfolio-data search <query>")?;
            if !guard::search_query(query) {
                bail!("Search query must be at least 2 characters");
            }
            render(portfolio.search(query, None).settled().await)?
        }
        other => bail!("Unknown resource '{}'. Expected one of: {}", other, RESOURCES),
    };

    println!("{}", output);

    let metrics = portfolio.queries().metrics();
    info!(
        "Done: {} fetches, {} failures",
        metrics.fetches, metrics.failures
    );
    Ok(())
}

/// Remove `--flag value` from `args`, returning the value.
fn take_flag(args: &mut Vec<String>, flag: &str) -> Result<Option<String>> {
    let Some(pos) = args.iter().position(|arg| arg == flag) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        bail!("{} requires a value", flag);
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(value))
}

fn render<T: Serialize>(state: QueryState<T>) -> Result<String> {
    match state {
        QueryState::Success(data) => Ok(serde_json::to_string_pretty(&*data)?),
        QueryState::Error { error, .. } => Err(anyhow::Error::new(error).context("Request failed")),
        _ => bail!("Request did not complete"),
    }
}
