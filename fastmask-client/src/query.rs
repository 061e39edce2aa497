// fastmask-client/src/query.rs
//! In-memory filtering, searching, sorting and limiting of masked email lists.
//!
//! Every stage takes ownership of the list and returns the surviving records
//! in order. A listing runs filter, then sort, then limit; a search runs the
//! text match, then limit.

use crate::error::{Error, Result};
use crate::masked_email::{Field, MaskedEmail, MaskedEmailState};
use chrono::{NaiveDateTime, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Fields searched when none are given
pub const DEFAULT_SEARCH_FIELDS: [Field; 2] = [Field::Email, Field::Description];

/// Boolean test over a masked email, composable with `and`/`or`/`negate`
pub struct Predicate(Box<dyn Fn(&MaskedEmail) -> bool + Send + Sync>);

impl Predicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&MaskedEmail) -> bool + Send + Sync + 'static,
    {
        Self(Box::new(f))
    }

    /// Matches every record
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    pub fn matches(&self, record: &MaskedEmail) -> bool {
        (self.0)(record)
    }

    pub fn and(self, other: Predicate) -> Self {
        Self::new(move |r| self.matches(r) && other.matches(r))
    }

    pub fn or(self, other: Predicate) -> Self {
        Self::new(move |r| self.matches(r) || other.matches(r))
    }

    pub fn negate(self) -> Self {
        Self::new(move |r| !self.matches(r))
    }

    pub fn state(state: MaskedEmailState) -> Self {
        Self::new(move |r| r.state == state)
    }

    /// Has received at least one message
    pub fn used() -> Self {
        Self::new(|r| r.last_message_at.is_some())
    }

    pub fn email_eq(email: impl Into<String>) -> Self {
        let email = email.into();
        Self::new(move |r| r.email == email)
    }

    pub fn description_eq_ignore_case(description: &str) -> Self {
        let description = description.to_lowercase();
        Self::new(move |r| r.description.to_lowercase() == description)
    }

    pub fn blank_description() -> Self {
        Self::new(|r| r.description.is_empty())
    }

    /// `now - createdAt < days`. Records whose `createdAt` does not parse
    /// never match.
    pub fn created_within(days: u32, now: NaiveDateTime) -> Self {
        let window = chrono::Duration::days(i64::from(days));
        Self::new(move |r| r.created_at().is_some_and(|created| now - created < window))
    }

    /// Case-insensitive substring match over `fields`, skipping null values
    pub fn text(query: &str, fields: Vec<Field>) -> Self {
        let query = query.to_lowercase();
        Self::new(move |r| {
            fields
                .iter()
                .filter_map(|f| r.field(*f))
                .any(|value| value.to_lowercase().contains(&query))
        })
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Named state presets offered by `list`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
    /// enabled
    Active,
    /// disabled
    Blocked,
    Pending,
    Deleted,
    /// enabled and never received a message
    Unused,
    /// received at least one message, any state
    Used,
}

impl StateFilter {
    pub fn predicate(self) -> Predicate {
        match self {
            Self::Active => Predicate::state(MaskedEmailState::Enabled),
            Self::Blocked => Predicate::state(MaskedEmailState::Disabled),
            Self::Pending => Predicate::state(MaskedEmailState::Pending),
            Self::Deleted => Predicate::state(MaskedEmailState::Deleted),
            Self::Unused => Predicate::used()
                .negate()
                .and(Predicate::state(MaskedEmailState::Enabled)),
            Self::Used => Predicate::used(),
        }
    }
}

impl FromStr for StateFilter {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "blocked" => Ok(Self::Blocked),
            "pending" => Ok(Self::Pending),
            "deleted" => Ok(Self::Deleted),
            "unused" => Ok(Self::Unused),
            "used" => Ok(Self::Used),
            _ => Err(Error::Validation(format!("Unknown state filter \"{}\"", s))),
        }
    }
}

/// Fields a listing can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Email,
    CreatedAt,
    Description,
    LastMessageAt,
    ForDomain,
    Url,
}

impl SortField {
    pub fn field(self) -> Field {
        match self {
            Self::Email => Field::Email,
            Self::CreatedAt => Field::CreatedAt,
            Self::Description => Field::Description,
            Self::LastMessageAt => Field::LastMessageAt,
            Self::ForDomain => Field::ForDomain,
            Self::Url => Field::Url,
        }
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.parse::<Field>()? {
            Field::Email => Ok(Self::Email),
            Field::CreatedAt => Ok(Self::CreatedAt),
            Field::Description => Ok(Self::Description),
            Field::LastMessageAt => Ok(Self::LastMessageAt),
            Field::ForDomain => Ok(Self::ForDomain),
            Field::Url => Ok(Self::Url),
            other => Err(Error::Validation(format!("Cannot sort by \"{}\"", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Keep records matching `predicate`, in input order
pub fn filter(records: Vec<MaskedEmail>, predicate: &Predicate) -> Vec<MaskedEmail> {
    records
        .into_iter()
        .filter(|r| predicate.matches(r))
        .collect()
}

/// Case-insensitive substring search; an empty field list searches
/// `DEFAULT_SEARCH_FIELDS`
pub fn search(records: Vec<MaskedEmail>, query: &str, fields: &[Field]) -> Vec<MaskedEmail> {
    let fields = if fields.is_empty() {
        DEFAULT_SEARCH_FIELDS.to_vec()
    } else {
        fields.to_vec()
    };
    filter(records, &Predicate::text(query, fields))
}

/// Stable sort; records without a value for `field` go last in either
/// direction
pub fn sort_by(
    mut records: Vec<MaskedEmail>,
    field: SortField,
    direction: SortDirection,
) -> Vec<MaskedEmail> {
    let field = field.field();
    records.sort_by(|a, b| compare_nulls_last(a.field(field), b.field(field), direction));
    records
}

fn compare_nulls_last(a: Option<&str>, b: Option<&str>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Ascending => a.cmp(b),
            SortDirection::Descending => b.cmp(a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Records created less than `days` days ago
pub fn within_recency(records: Vec<MaskedEmail>, days: u32) -> Vec<MaskedEmail> {
    within_recency_at(records, days, Utc::now().naive_utc())
}

pub fn within_recency_at(
    records: Vec<MaskedEmail>,
    days: u32,
    now: NaiveDateTime,
) -> Vec<MaskedEmail> {
    filter(records, &Predicate::created_within(days, now))
}

/// First `limit` records; `None` keeps everything
pub fn apply_limit(mut records: Vec<MaskedEmail>, limit: Option<usize>) -> Vec<MaskedEmail> {
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    records
}

/// Records created within `days`, newest first
pub fn recent(records: Vec<MaskedEmail>, days: u32) -> Vec<MaskedEmail> {
    recent_at(records, days, Utc::now().naive_utc())
}

pub fn recent_at(records: Vec<MaskedEmail>, days: u32, now: NaiveDateTime) -> Vec<MaskedEmail> {
    sort_by(
        within_recency_at(records, days, now),
        SortField::CreatedAt,
        SortDirection::Descending,
    )
}

/// Declarative `list` request
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub state: Option<StateFilter>,
    pub recent_days: Option<u32>,
    pub sort: Option<SortSpec>,
    pub limit: Option<usize>,
}

impl ListQuery {
    /// State preset AND recency window
    pub fn predicate(&self, now: NaiveDateTime) -> Predicate {
        let state = self
            .state
            .map(StateFilter::predicate)
            .unwrap_or_else(Predicate::always);
        match self.recent_days {
            Some(days) => state.and(Predicate::created_within(days, now)),
            None => state,
        }
    }

    pub fn apply(&self, records: Vec<MaskedEmail>) -> Vec<MaskedEmail> {
        self.apply_at(records, Utc::now().naive_utc())
    }

    pub fn apply_at(&self, records: Vec<MaskedEmail>, now: NaiveDateTime) -> Vec<MaskedEmail> {
        let mut records = filter(records, &self.predicate(now));
        if let Some(sort) = self.sort {
            records = sort_by(records, sort.field, sort.direction);
        }
        apply_limit(records, self.limit)
    }
}

/// Declarative `search` request
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub text: String,
    pub fields: Vec<Field>,
    /// Match records with an empty description instead of `text`
    pub blank: bool,
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn validate(&self) -> Result<()> {
        if !self.blank && self.text.is_empty() {
            return Err(Error::Validation(
                "No query provided. Did you mean to use 'fastmask search --blank'?".to_string(),
            ));
        }
        Ok(())
    }

    pub fn apply(&self, records: Vec<MaskedEmail>) -> Result<Vec<MaskedEmail>> {
        self.validate()?;
        let records = if self.blank {
            filter(records, &Predicate::blank_description())
        } else {
            search(records, &self.text, &self.fields)
        };
        Ok(apply_limit(records, self.limit))
    }
}
