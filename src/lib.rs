pub mod core {
    pub mod config;
    pub mod error;
    pub mod routes;
    pub mod startup;
    pub mod state;
    pub mod tracing_init;
}

pub mod models {
    pub mod account;
    pub mod api;
    pub mod session;
}

pub mod stores {
    pub mod file_store;
    pub mod record_store;
    pub mod session_store;
}

pub mod engine {
    pub mod calls;
    pub mod chat;
    pub mod directory;
    pub mod gifts;
    pub mod lifecycle;
}

pub mod handlers {
    pub mod admin;
    pub mod auth;
    pub mod calls;
    pub mod chat;
    pub mod fallback;
    pub mod gifts;
    pub mod health;
    pub mod metrics;
    pub mod models;
}

pub mod metrics {
    pub mod collector;
}

pub mod validation {
    pub mod params;
}

pub mod utils {
    pub mod auth;
    pub mod time;
}
