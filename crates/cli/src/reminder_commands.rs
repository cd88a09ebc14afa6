use {anyhow::Result, clap::Subcommand, homelab_client::HomelabClient};

use crate::request_failed;

#[derive(Subcommand)]
pub enum ReminderAction {
    /// List your reminders.
    List,
    /// List your reminder categories.
    Categories,
    /// Delete a reminder by id.
    Delete { id: i64 },
}

pub async fn handle_reminders(client: &HomelabClient, action: ReminderAction) -> Result<()> {
    let api = client.api();
    match action {
        ReminderAction::List => {
            let reminders = api.list_reminders().await.map_err(request_failed)?;
            if reminders.is_empty() {
                println!("No reminders.");
            }
            for r in &reminders {
                println!("  [{:<8}] {} ({})", r.priority, r.name, r.id);
                if !r.description.is_empty() {
                    println!("             {}", r.description);
                }
            }
        },
        ReminderAction::Categories => {
            let categories = api
                .list_reminder_categories()
                .await
                .map_err(request_failed)?;
            if categories.is_empty() {
                println!("No categories.");
            }
            for c in &categories {
                println!("  {:<24} {:<16} {}", c.name, c.slug, c.id);
            }
        },
        ReminderAction::Delete { id } => {
            api.delete_reminder(id).await.map_err(request_failed)?;
            println!("Deleted reminder {id}.");
        },
    }
    Ok(())
}
