use crate::infrastructure::config::env_or;
use axum::{body::Body, extract::ConnectInfo};
use governor::{clock::QuantaInstant, middleware::NoOpMiddleware};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder, key_extractor::KeyExtractor};

pub type FacultyRateLimitLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, Body>;

/// Keys requests by peer address, falling back to loopback when the
/// connection info is absent (in-process requests such as tests).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientIpKeyExtractor;

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<B>(
        &self,
        req: &axum::http::Request<B>,
    ) -> Result<Self::Key, tower_governor::errors::GovernorError> {
        Ok(req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)))
    }
}

/// Rate limit for the faculty routes, which include the cascading delete.
/// Configured by `FACULTY_RATE_LIMIT_PER_MINUTE` (default 30).
pub fn faculty_rate_limit_layer() -> anyhow::Result<FacultyRateLimitLayer> {
    custom_rate_limit_layer(env_or("FACULTY_RATE_LIMIT_PER_MINUTE", 30))
}

pub fn custom_rate_limit_layer(requests_per_minute: u64) -> anyhow::Result<FacultyRateLimitLayer> {
    let requests_per_minute = requests_per_minute.max(1);
    let quota_duration_ms = (60_000 / requests_per_minute).max(1);

    let config = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(quota_duration_ms)
            .burst_size(requests_per_minute as u32)
            .key_extractor(ClientIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Failed to finish governor config"))?,
    );

    Ok(GovernorLayer::new(config))
}
