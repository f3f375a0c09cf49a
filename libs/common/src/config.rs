//! Backend API configuration
//!
//! The backend is reachable on two base URLs: an internal one used for every
//! server-side request, and a public one that templates embed when they need
//! an absolute link to a backend-hosted asset (uploaded photos, artifact
//! images).

use std::env;

/// Backend API configuration struct
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL used for server-side requests to the backend
    pub internal_base_url: String,
    /// Base URL embedded into rendered pages for backend-hosted assets
    pub public_base_url: String,
}

impl ApiConfig {
    /// Create a new ApiConfig from environment variables
    pub fn from_env() -> Self {
        let internal_base_url = env::var("BACKEND_INTERNAL_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());

        let public_base_url =
            env::var("BACKEND_PUBLIC_URL").unwrap_or_else(|_| internal_base_url.clone());

        Self {
            internal_base_url,
            public_base_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_api_config_defaults() {
        unsafe {
            env::remove_var("BACKEND_INTERNAL_URL");
            env::remove_var("BACKEND_PUBLIC_URL");
        }

        let config = ApiConfig::from_env();
        assert_eq!(config.internal_base_url, "http://localhost:8000");
        assert_eq!(config.public_base_url, "http://localhost:8000");
    }

    #[test]
    #[serial]
    fn test_public_url_falls_back_to_internal() {
        unsafe {
            env::set_var("BACKEND_INTERNAL_URL", "http://backend:8000");
            env::remove_var("BACKEND_PUBLIC_URL");
        }

        let config = ApiConfig::from_env();
        assert_eq!(config.public_base_url, "http://backend:8000");

        unsafe {
            env::remove_var("BACKEND_INTERNAL_URL");
        }
    }
}
