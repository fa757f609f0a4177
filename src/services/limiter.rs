// src/services/limiter.rs
// DOCUMENTATION: Login attempt rate limiting
// PURPOSE: Throttle password guessing per account

use crate::errors::PinsError;
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;

/// Keyed rate limiter for login attempts
/// DOCUMENTATION: Keys are lowercased emails, so throttling survives
/// case-shuffled retries against one account
pub struct LoginLimiter {
    limiter: RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>,
}

impl LoginLimiter {
    /// Create a limiter allowing `attempts_per_minute` per email
    pub fn new(attempts_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(attempts_per_minute).unwrap_or(NonZeroU32::MIN);

        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
        }
    }

    /// Check whether another attempt is allowed for this email
    pub fn check(&self, email: &str) -> Result<(), PinsError> {
        let key = email.trim().to_lowercase();

        if self.limiter.check_key(&key).is_err() {
            log::warn!("Login rate limit exceeded for {}", key);
            return Err(PinsError::RateLimitExceeded);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_kicks_in_after_quota() {
        let limiter = LoginLimiter::new(2);

        assert!(limiter.check("traveler@example.com").is_ok());
        assert!(limiter.check("traveler@example.com").is_ok());
        assert!(matches!(
            limiter.check("traveler@example.com"),
            Err(PinsError::RateLimitExceeded)
        ));
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let limiter = LoginLimiter::new(1);

        assert!(limiter.check("Traveler@Example.com").is_ok());
        assert!(limiter.check("traveler@example.com").is_err());
    }

    #[test]
    fn test_independent_accounts_do_not_interfere() {
        let limiter = LoginLimiter::new(1);

        assert!(limiter.check("a@example.com").is_ok());
        assert!(limiter.check("b@example.com").is_ok());
    }
}
