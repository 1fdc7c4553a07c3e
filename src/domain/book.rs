use super::BookTitle;
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, FromRow, Postgres, Type,
};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookType {
    Arc,
    Beta,
    Sale,
}

impl BookType {
    /// Only books put up for sale carry a price.
    pub fn is_priced(&self) -> bool {
        matches!(self, BookType::Sale)
    }

    /// ARC and beta copies may expire; sale copies never do.
    pub fn can_expire(&self) -> bool {
        matches!(self, BookType::Arc | BookType::Beta)
    }
}

impl AsRef<str> for BookType {
    fn as_ref(&self) -> &'static str {
        match self {
            BookType::Arc => "arc",
            BookType::Beta => "beta",
            BookType::Sale => "sale",
        }
    }
}

impl TryFrom<String> for BookType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_ref() {
            "arc" => Ok(BookType::Arc),
            "beta" => Ok(BookType::Beta),
            "sale" => Ok(BookType::Sale),
            other => Err(format!("`{other}` is not a valid variant of BookType")),
        }
    }
}

impl Type<Postgres> for BookType {
    fn type_info() -> PgTypeInfo {
        String::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BookType {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let book_type = String::decode(value)?;
        Self::try_from(book_type).map_err(|e| e.into())
    }
}

#[derive(Debug, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: BookTitle,
    pub description: Option<String>,
    pub book_type: BookType,
    pub price: Option<f64>,
    pub file_url: String,
    pub file_type: Option<String>,
    pub cover_image_url: Option<String>,
    pub expiration_date: Option<Date>,
    pub collect_emails: bool,
    pub download_count: i32,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Book {
    pub fn is_expired(&self, today: Date) -> bool {
        self.expiration_date
            .map(|expiration| expiration < today)
            .unwrap_or(false)
    }
}

/// Raw form input, before validation.
#[derive(Debug)]
pub struct BookDraft {
    pub title: String,
    pub description: Option<String>,
    pub book_type: String,
    pub price: Option<f64>,
    pub expiration_date: Option<Date>,
    pub collect_emails: bool,
}

/// A validated book, ready to insert once its file has been uploaded.
#[derive(Debug)]
pub struct NewBook {
    pub title: BookTitle,
    pub description: Option<String>,
    pub book_type: BookType,
    pub price: Option<f64>,
    pub expiration_date: Option<Date>,
    pub collect_emails: bool,
}

impl NewBook {
    /// Enforces the type-conditional fields: a price is required for sale
    /// copies and dropped for everything else, an expiration date is kept
    /// only for ARC and beta copies.
    pub fn parse(draft: BookDraft) -> Result<NewBook, String> {
        let title = BookTitle::parse(draft.title)?;
        let book_type = BookType::try_from(draft.book_type)?;

        let price = match (book_type.is_priced(), draft.price) {
            (true, Some(price)) if price >= 0.0 => Some(price),
            (true, Some(price)) => return Err(format!("`{price}` is not a valid price")),
            (true, None) => return Err("A book for sale requires a price".into()),
            (false, _) => None,
        };

        let expiration_date = if book_type.can_expire() {
            draft.expiration_date
        } else {
            None
        };

        Ok(NewBook {
            title,
            description: draft.description.filter(|d| !d.trim().is_empty()),
            book_type,
            price,
            expiration_date,
            collect_emails: draft.collect_emails,
        })
    }
}
