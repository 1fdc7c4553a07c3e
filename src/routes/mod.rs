pub mod books;
pub mod campaigns;
pub mod dashboard;
pub mod download;
pub mod health_check;
pub mod home;
pub mod login;
pub mod logout;
pub mod signup;
pub mod subscribers;
pub mod unsubscribe;
