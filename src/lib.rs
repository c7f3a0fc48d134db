//! Chirpy: a small message board backend.
//!
//! Users register, log in with a password, and post short public
//! "chirps". Writes go through bearer-token authentication, an author
//! check and a content filter before they reach the store.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod state;
pub mod store;

pub mod crypto {
    pub mod jwt;
    pub mod password;
    pub mod refresh_token;
}

pub mod models {
    pub mod chirp;
    pub mod refresh_token;
    pub mod user;
}

pub mod repositories {
    pub mod chirp;
    pub mod refresh_token;
    pub mod user;
}

pub mod services {
    pub mod auth;
    pub mod chirps;
}

pub mod handlers {
    pub mod admin;
    pub mod auth;
    pub mod chirps;
}

pub mod middleware_layer {
    pub mod auth;
    pub mod metrics;
}

pub mod validation {
    pub mod chirp;
}
