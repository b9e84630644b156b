use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::Client;

const SEARCH_PREFIX: &str = "/api/v1/businesses/search";

#[derive(Parser)]
#[command(name = "registry-search-cli")]
#[command(about = "Business registry search CLI", long_about = None)]
struct Cli {
    #[arg(short, long, env = "REGISTRY_SEARCH_ENDPOINT", default_value = "http://localhost:8080")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search businesses
    Search {
        #[arg(value_name = "VALUE")]
        value: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        identifier: Option<String>,

        #[arg(long)]
        bn: Option<String>,

        /// Legal type codes, comma separated
        #[arg(short = 't', long)]
        legal_types: Option<String>,

        /// Status codes, comma separated
        #[arg(short = 's', long)]
        states: Option<String>,

        #[arg(long)]
        start: Option<usize>,

        #[arg(short, long)]
        rows: Option<usize>,
    },

    /// Search parties of firms
    Parties {
        #[arg(value_name = "VALUE")]
        value: String,

        /// Party roles, comma separated
        #[arg(short = 'R', long, default_value = "partner,proprietor")]
        roles: String,

        #[arg(long)]
        party_name: Option<String>,

        #[arg(long)]
        parent_name: Option<String>,

        /// Parent legal type codes, comma separated
        #[arg(short = 't', long)]
        legal_types: Option<String>,

        /// Parent status codes, comma separated
        #[arg(short = 's', long)]
        states: Option<String>,

        #[arg(long)]
        start: Option<usize>,

        #[arg(short, long)]
        rows: Option<usize>,
    },

    /// Typeahead suggestions
    Suggest {
        #[arg(value_name = "TERM")]
        term: String,

        #[arg(long)]
        highlight: bool,

        #[arg(short, long)]
        rows: Option<usize>,
    },

    /// Check server health
    Health,
}

/// Join `key:value` pairs with `::`, skipping unset values
fn join_pairs(pairs: &[(&str, Option<&str>)]) -> String {
    pairs
        .iter()
        .filter_map(|(key, value)| value.map(|v| format!("{}:{}", key, v)))
        .collect::<Vec<_>>()
        .join("::")
}

fn paging(start: Option<usize>, rows: Option<usize>) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(start) = start {
        params.push(("start", start.to_string()));
    }
    if let Some(rows) = rows {
        params.push(("rows", rows.to_string()));
    }
    params
}

async fn get_json(client: &Client, url: String, params: &[(&str, String)]) -> Result<()> {
    let response = client
        .get(&url)
        .query(params)
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?;

    let status = response.status();
    let body: serde_json::Value = response.json().await.context("Response was not JSON")?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        bail!("Server returned HTTP {}", status.as_u16());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = Client::new();
    let base = format!("{}{}", cli.endpoint.trim_end_matches('/'), SEARCH_PREFIX);

    match cli.command {
        Commands::Search {
            value,
            name,
            identifier,
            bn,
            legal_types,
            states,
            start,
            rows,
        } => {
            let mut params = vec![(
                "query",
                join_pairs(&[
                    ("value", Some(value.as_str())),
                    ("name", name.as_deref()),
                    ("identifier", identifier.as_deref()),
                    ("bn", bn.as_deref()),
                ]),
            )];
            let categories = join_pairs(&[
                ("legalType", legal_types.as_deref()),
                ("status", states.as_deref()),
            ]);
            if !categories.is_empty() {
                params.push(("categories", categories));
            }
            params.extend(paging(start, rows));

            get_json(&client, format!("{}/facets", base), &params).await?;
        }

        Commands::Parties {
            value,
            roles,
            party_name,
            parent_name,
            legal_types,
            states,
            start,
            rows,
        } => {
            let mut params = vec![
                (
                    "query",
                    join_pairs(&[
                        ("value", Some(value.as_str())),
                        ("partyName", party_name.as_deref()),
                        ("parentName", parent_name.as_deref()),
                    ]),
                ),
                (
                    "categories",
                    join_pairs(&[
                        ("partyRoles", Some(roles.as_str())),
                        ("parentLegalType", legal_types.as_deref()),
                        ("parentStatus", states.as_deref()),
                    ]),
                ),
            ];
            params.extend(paging(start, rows));

            get_json(&client, format!("{}/parties", base), &params).await?;
        }

        Commands::Suggest {
            term,
            highlight,
            rows,
        } => {
            let mut params = vec![("query", term)];
            if highlight {
                params.push(("highlight", "true".to_string()));
            }
            params.extend(paging(None, rows));

            get_json(&client, format!("{}/suggest", base), &params).await?;
        }

        Commands::Health => {
            let url = format!("{}/health", cli.endpoint.trim_end_matches('/'));
            get_json(&client, url, &[]).await?;
        }
    }

    Ok(())
}
