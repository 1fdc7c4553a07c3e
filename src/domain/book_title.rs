use once_cell::sync::Lazy;
use serde::Deserialize;
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type,
};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Deserialize)]
pub struct BookTitle(String);

static FORBIDDEN_CHARS: [char; 10] = ['<', '>', '\'', '"', '\\', '(', ')', '{', '}', '/'];
static FORBIDDEN_CHARS_STRING: Lazy<String> = Lazy::new(|| String::from_iter(FORBIDDEN_CHARS));

impl BookTitle {
    pub fn parse(s: String) -> Result<BookTitle, String> {
        match s {
            _ if s.trim().is_empty() => Err(format!(
                "Book title is empty or contains whitespace only: `{s}`"
            )),
            _ if s.graphemes(true).count() > 256 => {
                Err(format!("`{s}` is longer than 256 graphemes"))
            }
            _ if s.chars().any(|c| FORBIDDEN_CHARS.contains(&c)) => Err(format!(
                "`{s}` contains at least one of forbidden characters: {}",
                *FORBIDDEN_CHARS_STRING
            )),
            _ => Ok(Self(s)),
        }
    }
}

impl AsRef<str> for BookTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Type<Postgres> for BookTitle {
    fn type_info() -> PgTypeInfo {
        String::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BookTitle {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let title = String::decode(value)?;
        Self::parse(title).map_err(|e| e.into())
    }
}
