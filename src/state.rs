use std::sync::Arc;
use std::time::Duration;

use crate::config::{Args, SWEEP_THRESHOLD, VideoExtension};
use crate::rate_limit::RateLimiter;
use crate::signer::{self, UrlSigner};

// app's shared state
pub struct AppState {
    pub site_origin: Option<String>,  // CORS + origin/referer check; None = allow any
    pub extension: VideoExtension,    // only extension accepted in `path`
    pub signer: Option<Arc<dyn UrlSigner>>, // None when provider config is incomplete
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn from_args(args: &Args) -> Self {
        Self {
            site_origin: args.site_origin(),
            extension: args.extension,
            signer: signer::from_args(args),
            rate_limiter: Arc::new(RateLimiter::new(
                args.rate_limit,
                Duration::from_secs(args.rate_window),
                SWEEP_THRESHOLD,
            )),
        }
    }

    /// Value for `Access-Control-Allow-Origin`.
    pub fn allow_origin(&self) -> &str {
        self.site_origin.as_deref().unwrap_or("*")
    }
}
