use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "General";

/// Completion flag. Travels as "Yes"/"No" on the wire, stored as a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completion {
    #[serde(rename = "Yes")]
    Done,
    #[serde(rename = "No")]
    Pending,
}

impl Completion {
    pub fn as_str(self) -> &'static str {
        match self {
            Completion::Done => "Yes",
            Completion::Pending => "No",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Yes" => Some(Completion::Done),
            "No" => Some(Completion::Pending),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Completion::Done => Completion::Pending,
            Completion::Pending => Completion::Done,
        }
    }

    pub fn is_done(self) -> bool {
        self == Completion::Done
    }
}

impl From<bool> for Completion {
    fn from(done: bool) -> Self {
        if done {
            Completion::Done
        } else {
            Completion::Pending
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "High" => Some(Priority::High),
            "Medium" => Some(Priority::Medium),
            "Low" => Some(Priority::Low),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct UnknownPriority(pub String);

impl std::fmt::Display for UnknownPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown priority '{}'", self.0)
    }
}

impl std::error::Error for UnknownPriority {}

impl TryFrom<String> for Priority {
    type Error = UnknownPriority;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Priority::parse(&value).ok_or(UnknownPriority(value))
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Todo {
    pub id: i64,
    pub text: String,
    #[sqlx(try_from = "bool")]
    pub completed: Completion,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub category: String,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Incomplete and due strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.completed == Completion::Pending && self.due_date.is_some_and(|due| due < today)
    }
}

/// A todo about to be inserted. Omitted priority and category fall back to
/// `Priority::Medium` and `DEFAULT_CATEGORY`.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub text: String,
    pub completed: Completion,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewTodo {
    pub fn new(text: impl Into<String>, completed: Completion) -> Self {
        Self {
            text: text.into(),
            completed,
            priority: None,
            category: None,
            due_date: None,
            notes: None,
        }
    }

    pub fn priority_or_default(&self) -> Priority {
        self.priority.unwrap_or_default()
    }

    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }
}
