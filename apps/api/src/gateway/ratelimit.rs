//! Fixed-quota rate limiting — the only shared mutable state in the service.
//!
//! Three keyed `governor` limiters, each updated atomically per key:
//! - `/api/register` by client IP (stops token-minting loops),
//! - `/api/generate` (and uploads) by `(token nonce, ip)` composite — a leaked
//!   token cannot be amplified across many IPs, and one IP cannot burn a
//!   token's whole quota for someone else,
//! - `/api/generate` by bare IP across ALL tokens — without this, one IP could
//!   register up to 20 tokens per hour and multiply its generate quota by 20.

use std::num::NonZeroU32;

use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter,
};

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

pub const REGISTER_PER_HOUR: u32 = 20;
pub const GENERATE_PER_HOUR: u32 = 60;
/// Per-IP ceiling across all tokens: generous multiple of the per-token quota
/// so NAT'd offices still work.
pub const GENERATE_PER_IP_PER_HOUR: u32 = 240;

/// A request was over quota. Converted to `AppError::RateLimited` (429).
#[derive(Debug, Clone, Copy)]
pub struct RateLimitExceeded {
    pub retry_after_secs: u64,
    pub limit: u32,
}

pub struct RateLimits {
    register: KeyedLimiter,
    generate: KeyedLimiter,
    generate_per_ip: KeyedLimiter,
    register_limit: u32,
    generate_limit: u32,
    generate_per_ip_limit: u32,
    clock: DefaultClock,
}

impl RateLimits {
    pub fn new() -> Self {
        Self::with_quotas(
            REGISTER_PER_HOUR,
            GENERATE_PER_HOUR,
            GENERATE_PER_IP_PER_HOUR,
        )
    }

    /// Quotas are injectable so tests can exercise the limits cheaply.
    pub fn with_quotas(register_per_hour: u32, generate_per_hour: u32, per_ip_per_hour: u32) -> Self {
        Self {
            register: RateLimiter::keyed(hourly_quota(register_per_hour)),
            generate: RateLimiter::keyed(hourly_quota(generate_per_hour)),
            generate_per_ip: RateLimiter::keyed(hourly_quota(per_ip_per_hour)),
            register_limit: register_per_hour,
            generate_limit: generate_per_hour,
            generate_per_ip_limit: per_ip_per_hour,
            clock: DefaultClock::default(),
        }
    }

    pub fn check_register(&self, ip: &str) -> Result<(), RateLimitExceeded> {
        self.check(&self.register, ip.to_string(), self.register_limit)
    }

    /// Composite `(token, ip)` check plus the IP-wide backstop. The composite
    /// is checked first so its 429 carries the per-token limit.
    pub fn check_generate(&self, token_id: &str, ip: &str) -> Result<(), RateLimitExceeded> {
        self.check(
            &self.generate,
            format!("{token_id}|{ip}"),
            self.generate_limit,
        )?;
        self.check(
            &self.generate_per_ip,
            ip.to_string(),
            self.generate_per_ip_limit,
        )
    }

    fn check(
        &self,
        limiter: &KeyedLimiter,
        key: String,
        limit: u32,
    ) -> Result<(), RateLimitExceeded> {
        limiter.check_key(&key).map_err(|not_until| {
            let wait = not_until.wait_time_from(self.clock.now());
            RateLimitExceeded {
                retry_after_secs: wait.as_secs().max(1),
                limit,
            }
        })
    }
}

impl Default for RateLimits {
    fn default() -> Self {
        Self::new()
    }
}

fn hourly_quota(per_hour: u32) -> Quota {
    Quota::per_hour(NonZeroU32::new(per_hour).expect("rate-limit quota must be non-zero"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_allows_20_then_blocks_the_21st() {
        let limits = RateLimits::new();
        for i in 0..REGISTER_PER_HOUR {
            assert!(
                limits.check_register("198.51.100.1").is_ok(),
                "call {} should pass",
                i + 1
            );
        }
        let err = limits.check_register("198.51.100.1").unwrap_err();
        assert_eq!(err.limit, REGISTER_PER_HOUR);
        assert!(err.retry_after_secs >= 1);
    }

    #[test]
    fn test_register_limits_are_per_ip() {
        let limits = RateLimits::with_quotas(1, 60, 240);
        assert!(limits.check_register("198.51.100.1").is_ok());
        assert!(limits.check_register("198.51.100.1").is_err());
        assert!(limits.check_register("198.51.100.2").is_ok());
    }

    #[test]
    fn test_generate_allows_60_then_blocks_the_61st() {
        let limits = RateLimits::new();
        for i in 0..GENERATE_PER_HOUR {
            assert!(
                limits.check_generate("nonce-a", "198.51.100.1").is_ok(),
                "call {} should pass",
                i + 1
            );
        }
        let err = limits.check_generate("nonce-a", "198.51.100.1").unwrap_err();
        assert_eq!(err.limit, GENERATE_PER_HOUR);
    }

    #[test]
    fn test_generate_key_is_token_ip_composite() {
        let limits = RateLimits::with_quotas(20, 1, 240);
        assert!(limits.check_generate("nonce-a", "ip-1").is_ok());
        // Same token from a different IP gets its own window...
        assert!(limits.check_generate("nonce-a", "ip-2").is_ok());
        // ...and a different token on the first IP does too.
        assert!(limits.check_generate("nonce-b", "ip-1").is_ok());
        assert!(limits.check_generate("nonce-a", "ip-1").is_err());
    }

    #[test]
    fn test_ip_wide_backstop_caps_many_tokens() {
        let limits = RateLimits::with_quotas(20, 60, 3);
        for i in 0..3 {
            assert!(limits.check_generate(&format!("nonce-{i}"), "ip-1").is_ok());
        }
        // Fourth token, same IP: composite quota is fresh but the backstop trips.
        let err = limits.check_generate("nonce-3", "ip-1").unwrap_err();
        assert_eq!(err.limit, 3);
        // Another IP is unaffected.
        assert!(limits.check_generate("nonce-9", "ip-2").is_ok());
    }
}
