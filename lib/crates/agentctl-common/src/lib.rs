pub mod config;
pub mod types;

pub use config::{
    API_KEY_PLACEHOLDER, API_KEY_VAR, CONTAINER_PORT, DEFAULT_BIND_HOST, DEFAULT_CONTAINER,
    DEFAULT_ENV_FILE, DEFAULT_IMAGE, DEFAULT_TAG, HEALTH_URL,
};
pub use types::*;
