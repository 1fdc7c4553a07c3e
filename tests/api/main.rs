mod dashboard;
mod downloads;
mod helpers;
mod login;
mod subscribers;
