//! Compile-time API configuration.
//!
//! Base URLs for the remote collaborators are injected at build time. The
//! resolution contract is fail-fast: if any required variable is unset, the
//! app must not start routing requests, and the error enumerates every
//! missing variable so a misconfigured build can be fixed in one pass.

use crate::shared::errors::{AppError, Result};

/// Fully resolved auth-service endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthEndpoints {
    pub login: String,
    pub signup: String,
    pub get_tests: String,
    pub add_test: String,
}

/// Fully resolved remote endpoints, one field per collaborator operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiEndpoints {
    pub auth: AuthEndpoints,
    pub analyze: String,
    pub warmup: String,
    pub model_status: String,
    pub chatbot: String,
}

/// Object-storage (Cloudinary) settings. The secret is embedded at build
/// time and used only to sign upload parameter sets; it is never sent in a
/// request body.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

const API_BASE_URL: Option<&str> = option_env!("API_BASE_URL");
const AUTH_API_URL: Option<&str> = option_env!("AUTH_API_URL");
const ANALYZE_API_URL: Option<&str> = option_env!("ANALYZE_API_URL");
const CHATBOT_API_URL: Option<&str> = option_env!("CHATBOT_API_URL");

const CLOUDINARY_CLOUD_NAME: Option<&str> = option_env!("CLOUDINARY_CLOUD_NAME");
const CLOUDINARY_API_KEY: Option<&str> = option_env!("CLOUDINARY_API_KEY");
const CLOUDINARY_API_SECRET: Option<&str> = option_env!("CLOUDINARY_API_SECRET");

/// Resolves the endpoint map from the build environment.
pub fn resolve_endpoints() -> Result<ApiEndpoints> {
    resolve_endpoints_from(API_BASE_URL, AUTH_API_URL, ANALYZE_API_URL, CHATBOT_API_URL)
}

/// Resolves the Cloudinary settings from the build environment.
pub fn resolve_cloudinary() -> Result<CloudinaryConfig> {
    resolve_cloudinary_from(
        CLOUDINARY_CLOUD_NAME,
        CLOUDINARY_API_KEY,
        CLOUDINARY_API_SECRET,
    )
}

/// Resolves both sections at once, merging the missing-variable lists so a
/// build that lacks endpoint and Cloudinary settings reports everything in
/// one error.
pub fn resolve_all() -> Result<(ApiEndpoints, CloudinaryConfig)> {
    merge_resolved(resolve_endpoints(), resolve_cloudinary())
}

fn merge_resolved(
    endpoints: Result<ApiEndpoints>,
    cloudinary: Result<CloudinaryConfig>,
) -> Result<(ApiEndpoints, CloudinaryConfig)> {
    match (endpoints, cloudinary) {
        (Ok(endpoints), Ok(cloudinary)) => Ok((endpoints, cloudinary)),
        (endpoints, cloudinary) => {
            let mut missing = Vec::new();
            if let Err(AppError::Config(names)) = endpoints {
                missing.extend(names);
            }
            if let Err(AppError::Config(names)) = cloudinary {
                missing.extend(names);
            }
            Err(AppError::Config(missing))
        }
    }
}

fn resolve_endpoints_from(
    base: Option<&str>,
    auth: Option<&str>,
    analyze: Option<&str>,
    chatbot: Option<&str>,
) -> Result<ApiEndpoints> {
    let mut missing = Vec::new();
    if base.is_none() {
        missing.push("API_BASE_URL");
    }
    if auth.is_none() {
        missing.push("AUTH_API_URL");
    }
    if analyze.is_none() {
        missing.push("ANALYZE_API_URL");
    }
    if chatbot.is_none() {
        missing.push("CHATBOT_API_URL");
    }
    if !missing.is_empty() {
        return Err(AppError::Config(missing));
    }

    let base = base.unwrap_or_default().trim_end_matches('/').to_string();
    let auth = auth.unwrap_or_default().trim_end_matches('/').to_string();
    let analyze = analyze.unwrap_or_default().trim_end_matches('/').to_string();
    let chatbot = chatbot.unwrap_or_default().trim_end_matches('/').to_string();

    Ok(ApiEndpoints {
        auth: AuthEndpoints {
            login: format!("{auth}/login"),
            signup: format!("{auth}/signup"),
            get_tests: format!("{auth}/get-tests"),
            add_test: format!("{auth}/add-test"),
        },
        analyze,
        warmup: format!("{base}/api/warmup"),
        model_status: format!("{base}/api/model-status"),
        chatbot,
    })
}

fn resolve_cloudinary_from(
    cloud_name: Option<&str>,
    api_key: Option<&str>,
    api_secret: Option<&str>,
) -> Result<CloudinaryConfig> {
    let mut missing = Vec::new();
    if cloud_name.is_none() {
        missing.push("CLOUDINARY_CLOUD_NAME");
    }
    if api_key.is_none() {
        missing.push("CLOUDINARY_API_KEY");
    }
    if api_secret.is_none() {
        missing.push("CLOUDINARY_API_SECRET");
    }
    if !missing.is_empty() {
        return Err(AppError::Config(missing));
    }

    Ok(CloudinaryConfig {
        cloud_name: cloud_name.unwrap_or_default().to_string(),
        api_key: api_key.unwrap_or_default().to_string(),
        api_secret: api_secret.unwrap_or_default().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_full_endpoint_map() {
        let endpoints = resolve_endpoints_from(
            Some("http://localhost:5000"),
            Some("http://localhost:5000/api/auth/"),
            Some("http://localhost:5000/api/analyze"),
            Some("https://bot.example.com/ask"),
        )
        .unwrap();

        assert_eq!(endpoints.auth.login, "http://localhost:5000/api/auth/login");
        assert_eq!(
            endpoints.auth.get_tests,
            "http://localhost:5000/api/auth/get-tests"
        );
        assert_eq!(endpoints.warmup, "http://localhost:5000/api/warmup");
        assert_eq!(endpoints.model_status, "http://localhost:5000/api/model-status");
        assert_eq!(endpoints.analyze, "http://localhost:5000/api/analyze");
        assert_eq!(endpoints.chatbot, "https://bot.example.com/ask");
    }

    #[test]
    fn trims_trailing_slashes_uniformly() {
        let endpoints = resolve_endpoints_from(
            Some("http://localhost:5000/"),
            Some("http://localhost:5000/api/auth/"),
            Some("http://localhost:5000/api/analyze/"),
            Some("https://bot.example.com/ask/"),
        )
        .unwrap();

        assert_eq!(endpoints.analyze, "http://localhost:5000/api/analyze");
        assert_eq!(endpoints.chatbot, "https://bot.example.com/ask");
        assert_eq!(endpoints.warmup, "http://localhost:5000/api/warmup");
    }

    #[test]
    fn enumerates_every_missing_variable() {
        let err = resolve_endpoints_from(None, Some("x"), None, None).unwrap_err();
        assert_eq!(
            err,
            AppError::Config(vec!["API_BASE_URL", "ANALYZE_API_URL", "CHATBOT_API_URL"])
        );
    }

    #[test]
    fn missing_variables_merge_across_sections() {
        let err = merge_resolved(
            resolve_endpoints_from(None, Some("x"), Some("y"), Some("z")),
            resolve_cloudinary_from(Some("demo"), None, None),
        )
        .unwrap_err();

        assert_eq!(
            err,
            AppError::Config(vec![
                "API_BASE_URL",
                "CLOUDINARY_API_KEY",
                "CLOUDINARY_API_SECRET",
            ])
        );
    }

    #[test]
    fn cloudinary_config_fails_closed() {
        let err = resolve_cloudinary_from(Some("demo"), None, None).unwrap_err();
        assert_eq!(
            err,
            AppError::Config(vec!["CLOUDINARY_API_KEY", "CLOUDINARY_API_SECRET"])
        );

        let cfg = resolve_cloudinary_from(Some("demo"), Some("key"), Some("secret")).unwrap();
        assert_eq!(cfg.cloud_name, "demo");
    }
}
