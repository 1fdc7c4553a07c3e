use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, FromRow, Postgres, Type,
};
use time::OffsetDateTime;
use uuid::Uuid;

/// Campaign statuses only ever move forward:
/// draft -> scheduled -> sending -> {sent, failed}.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CampaignStatus {
    Draft,
    Scheduled,
    Sending,
    Sent,
    Failed,
}

impl CampaignStatus {
    pub fn can_advance_to(&self, next: CampaignStatus) -> bool {
        matches!(
            (self, next),
            (CampaignStatus::Draft, CampaignStatus::Scheduled)
                | (CampaignStatus::Scheduled, CampaignStatus::Sending)
                | (
                    CampaignStatus::Sending,
                    CampaignStatus::Sent | CampaignStatus::Failed
                )
        )
    }
}

impl AsRef<str> for CampaignStatus {
    fn as_ref(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Scheduled => "scheduled",
            CampaignStatus::Sending => "sending",
            CampaignStatus::Sent => "sent",
            CampaignStatus::Failed => "failed",
        }
    }
}

impl TryFrom<String> for CampaignStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_ref() {
            "draft" => Ok(CampaignStatus::Draft),
            "scheduled" => Ok(CampaignStatus::Scheduled),
            "sending" => Ok(CampaignStatus::Sending),
            "sent" => Ok(CampaignStatus::Sent),
            "failed" => Ok(CampaignStatus::Failed),
            other => Err(format!(
                "`{other}` is not a valid variant of CampaignStatus"
            )),
        }
    }
}

impl Type<Postgres> for CampaignStatus {
    fn type_info() -> PgTypeInfo {
        String::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for CampaignStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let status = String::decode(value)?;
        Self::try_from(status).map_err(|e| e.into())
    }
}

#[derive(Debug, FromRow)]
pub struct EmailCampaign {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub subject: String,
    pub content_html: String,
    pub content_text: Option<String>,
    pub status: CampaignStatus,
    pub recipient_count: i32,
    pub opened_count: i32,
    pub clicked_count: i32,
    pub bounced_count: i32,
    pub unsubscribed_count: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct NewCampaign {
    pub name: String,
    pub subject: String,
    pub content_html: String,
    pub content_text: String,
}

impl NewCampaign {
    /// A blank plain-text body falls back to the HTML body with tags
    /// stripped, so every campaign has a text alternative.
    pub fn parse(
        name: String,
        subject: String,
        content_html: String,
        content_text: String,
    ) -> Result<NewCampaign, String> {
        if name.trim().is_empty() {
            return Err("Campaign name must not be empty".into());
        }
        if subject.trim().is_empty() {
            return Err("Campaign subject must not be empty".into());
        }
        if content_html.trim().is_empty() {
            return Err("Campaign content must not be empty".into());
        }

        let content_text = if content_text.trim().is_empty() {
            strip_html_tags(&content_html)
        } else {
            content_text
        };

        Ok(NewCampaign {
            name,
            subject,
            content_html,
            content_text,
        })
    }
}

pub fn strip_html_tags(html: &str) -> String {
    static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new("<[^>]*>").unwrap());
    TAGS.replace_all(html, "").into_owned()
}
