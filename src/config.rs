use clap::{Parser, ValueEnum};
use std::time::Duration;
use thiserror::Error;

// Bucket holding the site's video assets
pub const BUCKET: &str = "website-video";

// Lifetime of every issued URL (10 minutes)
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(600);

// Browser may reuse the response for half the URL lifetime
pub const CACHE_CONTROL: &str = "private, max-age=300, stale-while-revalidate=60";

// Longest accepted rate-limit window (1 day)
pub const MAX_RATE_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

// Rate-limit table size that triggers an inline sweep of expired entries
pub const SWEEP_THRESHOLD: usize = 500;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// S3-compatible bucket (Cloudflare R2)
    R2,
    /// Supabase storage bucket
    Supabase,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoExtension {
    Mp4,
    Mov,
}

impl VideoExtension {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoExtension::Mp4 => "mp4",
            VideoExtension::Mov => "mov",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rate limit must be at least 1 request per window")]
    ZeroRateLimit,
    #[error("rate window must be at least 1 second")]
    ZeroRateWindow,
    #[error("rate window of {0}s exceeds the maximum of {1}s")]
    RateWindowTooLong(u64, u64),
    #[error("route must be a static path starting with '/': {0}")]
    InvalidRoute(String),
}

// CLI argument structure; every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "signed-url-gateway")]
#[command(about = "Issues short-lived signed URLs for private video assets")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    // Path the endpoint is mounted on
    #[arg(long, env = "SIGNED_URL_ROUTE", default_value = "/api/video-signed-url")]
    pub route: String,

    // Site origin used for CORS and the origin/referer check
    #[arg(long, env = "SITE_ORIGIN")]
    pub site_origin: Option<String>,

    #[arg(long, env = "STORAGE_PROVIDER", value_enum, default_value_t = Provider::R2)]
    pub provider: Provider,

    // Only file extension accepted in the path parameter
    #[arg(long, env = "VIDEO_EXTENSION", value_enum, default_value_t = VideoExtension::Mp4)]
    pub extension: VideoExtension,

    #[arg(long, env = "R2_ENDPOINT", hide_env_values = true)]
    pub r2_endpoint: Option<String>,

    #[arg(long, env = "R2_ACCESS_KEY_ID", hide_env_values = true)]
    pub r2_access_key_id: Option<String>,

    #[arg(long, env = "R2_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub r2_secret_access_key: Option<String>,

    #[arg(long, env = "SUPABASE_URL", hide_env_values = true)]
    pub supabase_url: Option<String>,

    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
    pub supabase_service_role_key: Option<String>,

    // Rate limit max requests per window, per client IP
    #[arg(long, env = "RATE_LIMIT", default_value_t = 30)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, env = "RATE_WINDOW_SECS", default_value_t = 60)]
    pub rate_window: u64,

    // Interval of the background sweep over the rate-limit table
    #[arg(long, env = "SWEEP_INTERVAL_SECS", default_value_t = 60)]
    pub sweep_interval: u64,
}

impl Args {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // axum panics on captures, wildcards and overlaps with the fixed routes
        let reserved = ["/health", "/metrics"];
        if !self.route.starts_with('/')
            || self.route.contains([':', '*', '{', '}'])
            || reserved.contains(&self.route.as_str())
        {
            return Err(ConfigError::InvalidRoute(self.route.clone()));
        }
        if self.rate_limit == 0 {
            return Err(ConfigError::ZeroRateLimit);
        }
        if self.rate_window == 0 {
            return Err(ConfigError::ZeroRateWindow);
        }
        if self.rate_window > MAX_RATE_WINDOW.as_secs() {
            return Err(ConfigError::RateWindowTooLong(
                self.rate_window,
                MAX_RATE_WINDOW.as_secs(),
            ));
        }
        Ok(())
    }

    /// Configured site origin; blank values count as unset.
    pub fn site_origin(&self) -> Option<String> {
        non_empty(&self.site_origin)
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["signed-url-gateway"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_match_deployment() {
        let args = parse(&["--site-origin", "https://example.com"]);
        assert_eq!(args.rate_limit, 30);
        assert_eq!(args.rate_window, 60);
        assert_eq!(args.extension, VideoExtension::Mp4);
        assert_eq!(args.provider, Provider::R2);
        assert_eq!(args.route, "/api/video-signed-url");
        assert!(args.validate().is_ok());
    }

    #[test]
    fn provider_and_extension_are_selectable() {
        let args = parse(&["--provider", "supabase", "--extension", "mov"]);
        assert_eq!(args.provider, Provider::Supabase);
        assert_eq!(args.extension.as_str(), "mov");
    }

    #[test]
    fn blank_origin_is_unset() {
        let args = parse(&["--site-origin", "  "]);
        assert_eq!(args.site_origin(), None);
    }

    #[test]
    fn rate_window_is_capped_at_one_day() {
        assert_eq!(
            parse(&["--rate-window", "18446744073709551615"]).validate(),
            Err(ConfigError::RateWindowTooLong(u64::MAX, 86400))
        );
        assert_eq!(
            parse(&["--rate-window", "86401"]).validate(),
            Err(ConfigError::RateWindowTooLong(86401, 86400))
        );
        assert!(parse(&["--rate-window", "86400"]).validate().is_ok());
    }

    #[test]
    fn route_must_be_absolute() {
        assert_eq!(
            parse(&["--route", "api/x"]).validate(),
            Err(ConfigError::InvalidRoute("api/x".into()))
        );
    }

    #[test]
    fn route_rejects_patterns_and_reserved_paths() {
        for route in [
            "/api/:x",
            "/api/*rest",
            "/api/{file}",
            "/api/}",
            "/health",
            "/metrics",
        ] {
            assert_eq!(
                parse(&["--route", route]).validate(),
                Err(ConfigError::InvalidRoute(route.into())),
                "{} accepted",
                route
            );
        }
        assert!(parse(&["--route", "/v2/video-url"]).validate().is_ok());
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert_eq!(
            parse(&["--rate-limit", "0"]).validate(),
            Err(ConfigError::ZeroRateLimit)
        );
        assert_eq!(
            parse(&["--rate-window", "0"]).validate(),
            Err(ConfigError::ZeroRateWindow)
        );
    }
}
