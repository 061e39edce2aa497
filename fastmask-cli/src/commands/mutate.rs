// fastmask-cli/src/commands/mutate.rs
use crate::output::print_success;
use anyhow::Result;
use clap::Args;
use fastmask_client::{
    resolve_record, Error, MaskedEmailClient, MaskedEmailState, MaskedEmailUpdate, NewMaskedEmail,
};

#[derive(Args, Debug, Clone)]
pub struct NewArgs {
    /// What the address is for
    #[arg(default_value = "")]
    pub description: String,
    /// Website the address is used on
    #[arg(long)]
    pub url: Option<String>,
    /// Domain the address is used on
    #[arg(long, default_value = "")]
    pub domain: String,
    /// Create in pending state instead of enabled
    #[arg(long)]
    pub pending: bool,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Masked email ID, number, email address or description
    pub id: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub domain: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct IdArgs {
    /// Masked email ID, number, email address or description
    pub id: String,
}

pub async fn handle_new(client: &MaskedEmailClient, args: NewArgs) -> Result<()> {
    let new = NewMaskedEmail {
        state: if args.pending {
            MaskedEmailState::Pending
        } else {
            MaskedEmailState::Enabled
        },
        description: args.description,
        url: args.url,
        for_domain: args.domain,
    };

    let created = client.create(&new).await?;

    let desc_str = if new.description.is_empty() {
        String::new()
    } else {
        format!("for \"{}\" ", new.description)
    };
    print_success(&format!(
        "Successfully added email {} {}(id: {})",
        created.email, desc_str, created.id
    ));
    Ok(())
}

impl EditArgs {
    pub fn changes(&self) -> MaskedEmailUpdate {
        MaskedEmailUpdate {
            state: None,
            description: self.description.clone(),
            url: self.url.clone(),
            for_domain: self.domain.clone(),
        }
    }
}

pub async fn handle_edit(client: &MaskedEmailClient, args: EditArgs) -> Result<()> {
    let changes = args.changes();
    if changes.is_empty() {
        return Err(Error::Validation("Specify fields to update".to_string()).into());
    }

    let record = resolve_record(client, &args.id).await?;
    client.update(&record.id, &changes).await?;

    print_success(&format!("Successfully edited email {}", record.email));
    Ok(())
}

/// Shared by `activate`, `block` and `delete`
pub async fn handle_state(
    client: &MaskedEmailClient,
    args: IdArgs,
    state: MaskedEmailState,
) -> Result<()> {
    let record = resolve_record(client, &args.id).await?;
    client
        .update(&record.id, &MaskedEmailUpdate::state(state))
        .await?;

    let verb = match state {
        MaskedEmailState::Enabled => "activated",
        MaskedEmailState::Disabled => "blocked",
        MaskedEmailState::Deleted => "deleted",
        MaskedEmailState::Pending => "set to pending",
    };
    print_success(&format!("Successfully {} email {}", verb, record.email));
    Ok(())
}
