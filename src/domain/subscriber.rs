use super::EmailAddress;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct EmailSubscriber {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: EmailAddress,
    pub name: Option<String>,
    pub source: Option<String>,
    pub book_id: Option<Uuid>,
    pub is_active: bool,
    pub subscribed_at: OffsetDateTime,
    pub unsubscribed_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

/// A reader opting in, usually at the download gate of a specific book.
#[derive(Debug)]
pub struct NewSubscriber {
    pub email: EmailAddress,
    pub name: Option<String>,
    pub source: Option<String>,
    pub book_id: Option<Uuid>,
}
