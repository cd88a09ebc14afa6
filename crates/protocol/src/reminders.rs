use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "VeryHigh",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderCategory {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    /// Category ids.
    #[serde(default)]
    pub categories: Vec<i64>,
    /// Unix seconds.
    pub date_time: i64,
    pub description: String,
    pub name: String,
    pub priority: Priority,
    pub user_id: i64,
}

/// Body of `POST /reminders/category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReminderCategory {
    pub name: String,
    pub slug: String,
}

/// Body of `POST /reminders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReminder {
    pub name: String,
    pub description: String,
    pub categories: Vec<i64>,
    pub priority: Priority,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_reminder_sends_priority_name() {
        let body = CreateReminder {
            name: "Rotate backups".into(),
            description: "Swap the offsite disk".into(),
            categories: vec![4],
            priority: Priority::VeryHigh,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["priority"], "VeryHigh");
        assert_eq!(value["categories"], serde_json::json!([4]));
    }

    #[test]
    fn decodes_stored_reminders_and_categories() {
        let reminders: Vec<Reminder> = serde_json::from_value(serde_json::json!([{
            "id": 1,
            "name": "Bins",
            "description": "take the bins out",
            "categories": [2],
            "priority": "High",
            "user_id": 3,
            "date_time": 1700000000
        }]))
        .unwrap();
        assert_eq!(reminders[0].id, 1);
        assert_eq!(reminders[0].categories, [2]);
        assert_eq!(reminders[0].priority, Priority::High);
        assert_eq!(reminders[0].user_id, 3);

        let category: ReminderCategory = serde_json::from_value(serde_json::json!({
            "id": 2, "slug": "home", "name": "Home", "user_id": 3
        }))
        .unwrap();
        assert_eq!(category.id, 2);
        assert_eq!(category.user_id, 3);
    }

    #[test]
    fn priority_display_pads() {
        assert_eq!(format!("[{:<8}]", Priority::Low), "[Low     ]");
    }
}
