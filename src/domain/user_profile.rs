use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, FromRow, Postgres, Type,
};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriptionPlan {
    Free,
    Pro,
    Premium,
}

impl AsRef<str> for SubscriptionPlan {
    fn as_ref(&self) -> &'static str {
        match self {
            SubscriptionPlan::Free => "free",
            SubscriptionPlan::Pro => "pro",
            SubscriptionPlan::Premium => "premium",
        }
    }
}

impl TryFrom<String> for SubscriptionPlan {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_ref() {
            "free" => Ok(SubscriptionPlan::Free),
            "pro" => Ok(SubscriptionPlan::Pro),
            "premium" => Ok(SubscriptionPlan::Premium),
            other => Err(format!(
                "`{other}` is not a valid variant of SubscriptionPlan"
            )),
        }
    }
}

impl Type<Postgres> for SubscriptionPlan {
    fn type_info() -> PgTypeInfo {
        String::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for SubscriptionPlan {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let plan = String::decode(value)?;
        Self::try_from(plan).map_err(|e| e.into())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Active,
    Canceled,
    PastDue,
}

impl AsRef<str> for SubscriptionStatus {
    fn as_ref(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::PastDue => "past_due",
        }
    }
}

impl TryFrom<String> for SubscriptionStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_ref() {
            "active" => Ok(SubscriptionStatus::Active),
            "canceled" => Ok(SubscriptionStatus::Canceled),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            other => Err(format!(
                "`{other}` is not a valid variant of SubscriptionStatus"
            )),
        }
    }
}

impl Type<Postgres> for SubscriptionStatus {
    fn type_info() -> PgTypeInfo {
        String::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for SubscriptionStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let status = String::decode(value)?;
        Self::try_from(status).map_err(|e| e.into())
    }
}

/// One per authenticated user, created lazily on the first dashboard load.
#[derive(Debug, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub subscription_plan: SubscriptionPlan,
    pub subscription_status: SubscriptionStatus,
    pub books_uploaded: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
