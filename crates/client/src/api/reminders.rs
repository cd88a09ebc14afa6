use {
    super::ApiClient,
    crate::Error,
    homelab_protocol::{CreateReminder, CreateReminderCategory, Reminder, ReminderCategory},
};

impl ApiClient {
    pub async fn list_reminders(&self) -> Result<Vec<Reminder>, Error> {
        self.get(&["reminders"]).await
    }

    pub async fn list_reminder_categories(&self) -> Result<Vec<ReminderCategory>, Error> {
        self.get(&["reminders", "category"]).await
    }

    pub async fn create_reminder(&self, reminder: &CreateReminder) -> Result<Reminder, Error> {
        self.post(&["reminders"], reminder).await
    }

    pub async fn create_reminder_category(
        &self,
        category: &CreateReminderCategory,
    ) -> Result<ReminderCategory, Error> {
        self.post(&["reminders", "category"], category).await
    }

    pub async fn delete_reminder(&self, id: i64) -> Result<(), Error> {
        self.delete(&["reminders", &id.to_string()]).await
    }
}
