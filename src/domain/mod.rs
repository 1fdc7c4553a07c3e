mod book;
mod book_title;
mod campaign;
mod email_address;
mod subscriber;
mod user_profile;

pub use book::{Book, BookDraft, BookType, NewBook};
pub use book_title::BookTitle;
pub use campaign::{strip_html_tags, CampaignStatus, EmailCampaign, NewCampaign};
pub use email_address::EmailAddress;
pub use subscriber::{EmailSubscriber, NewSubscriber};
pub use user_profile::{SubscriptionPlan, SubscriptionStatus, UserProfile};
