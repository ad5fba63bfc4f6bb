//! Per-IP rate limiting for the public search endpoints

use axum::Router;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};

use crate::{config::RateLimitConfig, AppState};

/// Wrap `router` in a per-IP governor when enabled.
///
/// Returns whether the limit was applied. The governor config lives for the
/// whole process, so it is leaked once at router construction.
pub fn with_rate_limit(
    router: Router<AppState>,
    config: &RateLimitConfig,
) -> (Router<AppState>, bool) {
    if !config.enabled {
        return (router, false);
    }

    let Some(governor) = GovernorConfigBuilder::default()
        .per_second(config.per_second)
        .burst_size(config.burst_size)
        .key_extractor(SmartIpKeyExtractor)
        .finish()
    else {
        tracing::warn!(
            "Invalid rate limit settings (per_second={}, burst_size={}), search is not limited",
            config.per_second,
            config.burst_size
        );
        return (router, false);
    };

    let layer = GovernorLayer {
        config: Box::leak(Box::new(governor)),
    };
    (router.layer(layer), true)
}
