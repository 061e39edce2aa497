// fastmask-cli/src/commands/search.rs
use crate::output::emit_records;
use anyhow::Result;
use clap::Args;
use fastmask_client::query::SearchQuery;
use fastmask_client::{Field, MaskedEmailClient};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Text to look for (case-insensitive)
    #[arg(default_value = "")]
    pub query: String,
    /// Find addresses without a description
    #[arg(long)]
    pub blank: bool,
    /// Field to search; repeat for several [default: email, description]
    #[arg(short = 'f', long = "field")]
    pub fields: Vec<Field>,
    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,
    /// Write results to a file (.json for JSON, otherwise CSV)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    pub fn query(&self) -> SearchQuery {
        SearchQuery {
            text: self.query.clone(),
            fields: self.fields.clone(),
            blank: self.blank,
            limit: self.limit,
        }
    }
}

pub async fn handle_search(client: &MaskedEmailClient, args: SearchArgs) -> Result<()> {
    let query = args.query();
    // Reject an empty query before touching the network
    query.validate()?;

    let records = query.apply(client.fetch(None).await?)?;

    emit_records(
        &records,
        &format!("Search results for \"{}\"", args.query),
        args.out.as_deref(),
        args.json,
    )
}
