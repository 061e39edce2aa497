// fastmask-cli/src/commands/list.rs
use crate::output::emit_records;
use anyhow::Result;
use clap::{Args, ValueEnum};
use fastmask_client::query::{ListQuery, SortDirection, SortField, SortSpec, StateFilter};
use fastmask_client::MaskedEmailClient;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,
    /// Show only active addresses
    #[arg(long, group = "state")]
    pub active: bool,
    /// Show only blocked addresses
    #[arg(long, group = "state")]
    pub blocked: bool,
    /// Show only active + unused addresses
    #[arg(long, group = "state")]
    pub unused: bool,
    /// Show only used addresses
    #[arg(long, group = "state")]
    pub used: bool,
    /// Show only deleted addresses
    #[arg(long, group = "state")]
    pub deleted: bool,
    /// Show only pending addresses
    #[arg(long, group = "state")]
    pub pending: bool,
    /// Field to sort by
    #[arg(long, value_enum, ignore_case = true)]
    pub sort: Option<SortArg>,
    /// Sort descending
    #[arg(long, overrides_with = "asc")]
    pub desc: bool,
    /// Sort ascending (default)
    #[arg(long, overrides_with = "desc")]
    pub asc: bool,
    /// Only show items from the past N days
    #[arg(long, value_name = "DAYS")]
    pub recent: Option<u32>,
    /// Write results to a file (.json for JSON, otherwise CSV)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortArg {
    Email,
    #[value(name = "createdAt")]
    CreatedAt,
    Description,
    #[value(name = "lastMessageAt")]
    LastMessageAt,
    #[value(name = "forDomain")]
    ForDomain,
    Url,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Email => Self::Email,
            SortArg::CreatedAt => Self::CreatedAt,
            SortArg::Description => Self::Description,
            SortArg::LastMessageAt => Self::LastMessageAt,
            SortArg::ForDomain => Self::ForDomain,
            SortArg::Url => Self::Url,
        }
    }
}

impl ListArgs {
    fn state(&self) -> Option<StateFilter> {
        [
            (self.active, StateFilter::Active),
            (self.blocked, StateFilter::Blocked),
            (self.unused, StateFilter::Unused),
            (self.used, StateFilter::Used),
            (self.deleted, StateFilter::Deleted),
            (self.pending, StateFilter::Pending),
        ]
        .into_iter()
        .find_map(|(set, filter)| set.then_some(filter))
    }

    pub fn query(&self) -> ListQuery {
        ListQuery {
            state: self.state(),
            recent_days: self.recent,
            sort: self.sort.map(|field| SortSpec {
                field: field.into(),
                direction: if self.desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                },
            }),
            limit: self.limit,
        }
    }
}

pub async fn handle_list(client: &MaskedEmailClient, args: ListArgs) -> Result<()> {
    let query = args.query();
    let records = query.apply(client.fetch(None).await?);
    let account_id = client.account_id().await?;

    emit_records(
        &records,
        &format!("Masked Emails {}", account_id),
        args.out.as_deref(),
        args.json,
    )
}
