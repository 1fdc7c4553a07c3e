pub mod app_state;
pub mod authentication;
pub mod configuration;
pub mod domain;
pub mod navigation;
pub mod repository;
pub mod request_id;
pub mod routes;
pub mod session;
pub mod startup;
pub mod storage_client;
pub mod telemetry;
pub mod utils;
