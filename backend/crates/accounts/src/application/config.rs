//! Application Configuration
//!
//! Configuration for the account application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::crypto::random_bytes;
use platform::password::DEFAULT_BCRYPT_COST;

use crate::error::{AuthError, AuthResult};

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// What happens when an outbound email cannot be delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailDeliveryPolicy {
    /// Fail the request with a server error
    Strict,
    /// Log a warning and carry on
    #[default]
    BestEffort,
}

impl EmailDeliveryPolicy {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "best_effort" | "best-effort" => Some(Self::BestEffort),
            _ => None,
        }
    }

    /// Apply the policy to a send result
    pub fn settle<E: std::fmt::Display>(&self, result: Result<(), E>, purpose: &str) -> AuthResult<()> {
        match (result, self) {
            (Ok(()), _) => Ok(()),
            (Err(e), Self::Strict) => Err(AuthError::EmailDelivery(format!("{}: {}", purpose, e))),
            (Err(e), Self::BestEffort) => {
                tracing::warn!(error = %e, purpose, "Email not delivered, continuing");
                Ok(())
            }
        }
    }
}

/// Account application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for session tokens
    pub jwt_secret: Vec<u8>,
    /// Session token lifetime (7 days)
    pub token_ttl: Duration,
    /// Session cookie name
    pub cookie_name: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Email verification code lifetime (10 minutes)
    pub otp_ttl: Duration,
    /// Password reset token lifetime (60 minutes)
    pub reset_token_ttl: Duration,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Frontend base URL, used to build reset links
    pub client_url: String,
    pub email_delivery: EmailDeliveryPolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: random_bytes(32),
            token_ttl: Duration::from_secs(7 * 24 * 3600),
            cookie_name: "token".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
            otp_ttl: Duration::from_secs(10 * 60),
            reset_token_ttl: Duration::from_secs(60 * 60),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            client_url: "http://localhost:3000".to_string(),
            email_delivery: EmailDeliveryPolicy::Strict,
        }
    }
}

impl AuthConfig {
    /// Development config: random secret, insecure cookie, best-effort email
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            email_delivery: EmailDeliveryPolicy::BestEffort,
            ..Default::default()
        }
    }

    /// Production config with a fixed secret
    pub fn production(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            ..Default::default()
        }
    }

    /// Cookie carrying the session token
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.token_ttl.as_secs() as i64),
        }
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        to_chrono(self.token_ttl)
    }

    pub fn otp_ttl(&self) -> chrono::Duration {
        to_chrono(self.otp_ttl)
    }

    pub fn reset_token_ttl(&self) -> chrono::Duration {
        to_chrono(self.reset_token_ttl)
    }

    /// `${client_url}/reset-password/${token}`
    pub fn reset_link(&self, token: &str) -> String {
        format!(
            "{}/reset-password/{}",
            self.client_url.trim_end_matches('/'),
            token
        )
    }
}

fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.cookie_name, "token");
        assert_eq!(config.token_ttl(), chrono::Duration::days(7));
        assert_eq!(config.otp_ttl(), chrono::Duration::minutes(10));
        assert_eq!(config.reset_token_ttl(), chrono::Duration::minutes(60));
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.jwt_secret.len(), 32);
    }

    #[test]
    fn test_session_cookie() {
        let cookie = AuthConfig::default().session_cookie().build_set_cookie("abc");
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=604800"));

        let dev = AuthConfig::development().session_cookie().build_set_cookie("abc");
        assert!(!dev.contains("Secure"));
    }

    #[test]
    fn test_reset_link() {
        let config = AuthConfig {
            client_url: "https://portal.example.com/".into(),
            ..AuthConfig::development()
        };
        assert_eq!(
            config.reset_link("deadbeef"),
            "https://portal.example.com/reset-password/deadbeef"
        );
    }

    #[test]
    fn test_delivery_policy() {
        assert_eq!(
            EmailDeliveryPolicy::from_code("STRICT"),
            Some(EmailDeliveryPolicy::Strict)
        );
        assert_eq!(
            EmailDeliveryPolicy::from_code("best_effort"),
            Some(EmailDeliveryPolicy::BestEffort)
        );
        assert_eq!(EmailDeliveryPolicy::from_code("maybe"), None);

        let failed: Result<(), &str> = Err("smtp down");
        assert!(EmailDeliveryPolicy::BestEffort.settle(failed, "otp").is_ok());
        assert!(matches!(
            EmailDeliveryPolicy::Strict.settle(failed, "otp"),
            Err(AuthError::EmailDelivery(_))
        ));
    }
}
