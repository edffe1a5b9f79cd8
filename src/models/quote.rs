use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MotivationalQuote {
    pub id: Uuid,
    pub quote: String,
    pub author: Option<String>,
    /// Last time the quote was shown on a dashboard; `None` if never.
    pub date_displayed: Option<DateTime<Utc>>,
}
