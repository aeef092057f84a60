//! Time-windowed preview tokens.
//!
//! A token is the 10-character slice of a keyed digest over
//! `"{tick}{action}"`, where the tick is the index of the current half
//! lifetime window. Nothing is stored: verification recomputes the digest
//! for the current and the previous tick, so a token stays valid for one to
//! two half-windows after creation and can be shared freely in that time.
//!
//! # Security Properties
//!
//! - HMAC-SHA256 keyed with the process-wide secret
//! - The secret is wrapped in `SecretString` and redacted from `Debug`
//! - Token comparison uses the `subtle` crate for constant-time equality

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Default token lifetime in hours.
pub const DEFAULT_EXPIRATION_HOURS: u64 = 48;

/// Length of an encoded token.
pub const TOKEN_LEN: usize = 10;

/// The token is taken from this many trailing hex characters of the digest.
const DIGEST_TAIL: usize = 12;

/// Prefix of the subject action string a content id is bound to.
pub const ACTION_PREFIX: &str = "preview_";

/// Subject action string for a content id (`preview_42`).
pub fn subject_action(content_id: u64) -> String {
    format!("{ACTION_PREFIX}{content_id}")
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Clock pinned to a unix timestamp (seconds).
    pub fn from_timestamp(secs: i64) -> Self {
        Self(DateTime::from_timestamp(secs, 0).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The "expiration hours" option.
///
/// Missing or zero configuration falls back to [`DEFAULT_EXPIRATION_HOURS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationHours(u64);

impl ExpirationHours {
    pub fn new(hours: Option<u64>) -> Self {
        match hours {
            None | Some(0) => Self::default(),
            Some(h) => Self(h.max(1)),
        }
    }

    /// Parse a raw option value; anything that is not a positive integer
    /// yields the default.
    pub fn parse(raw: Option<&str>) -> Self {
        Self::new(raw.and_then(|s| s.trim().parse::<u64>().ok()))
    }

    pub fn hours(&self) -> u64 {
        self.0
    }

    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(self.0.saturating_mul(3600))
    }
}

impl Default for ExpirationHours {
    fn default() -> Self {
        Self(DEFAULT_EXPIRATION_HOURS)
    }
}

/// Override for the token lifetime, applied after the configured hours.
pub type LifetimeHook = Arc<dyn Fn(Duration) -> Duration + Send + Sync>;

/// Which tick a token verified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickMatch {
    /// Generated within the current half-window.
    Current,
    /// Generated within the previous half-window.
    Previous,
}

impl TickMatch {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Current => 1,
            Self::Previous => 2,
        }
    }
}

/// Generates and verifies preview tokens.
pub struct TokenCodec {
    secret: SecretString,
    expiration: ExpirationHours,
    hook: Option<LifetimeHook>,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Creates a codec on the wall clock.
    pub fn new(secret: SecretString, expiration: ExpirationHours) -> Self {
        Self {
            secret,
            expiration,
            hook: None,
            clock: Arc::new(SystemClock),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Installs the lifetime override hook. Only one hook is kept; a later
    /// call replaces an earlier one.
    #[must_use]
    pub fn with_lifetime_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(Duration) -> Duration + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Effective token lifetime after the hook.
    pub fn lifetime(&self) -> Duration {
        let base = self.expiration.lifetime();
        match &self.hook {
            Some(hook) => hook(base),
            None => base,
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Current tick.
    pub fn tick(&self) -> u64 {
        self.tick_at(self.clock.now())
    }

    /// `ceil(now / (lifetime / 2))`, computed as `ceil(2 * now / lifetime)`
    /// so odd lifetimes need no floating point.
    pub fn tick_at(&self, now: DateTime<Utc>) -> u64 {
        let now = u64::try_from(now.timestamp()).unwrap_or(0);
        let life = self.lifetime().as_secs().max(1);
        now.saturating_mul(2).div_ceil(life)
    }

    /// Token for `action` at the current tick.
    pub fn create(&self, action: &str) -> String {
        self.create_at(action, self.clock.now())
    }

    pub fn create_at(&self, action: &str, now: DateTime<Utc>) -> String {
        self.digest(self.tick_at(now), action)
    }

    /// Checks `token` against the current and the previous tick.
    pub fn verify(&self, token: &str, action: &str) -> Option<TickMatch> {
        self.verify_at(token, action, self.clock.now())
    }

    pub fn verify_at(&self, token: &str, action: &str, now: DateTime<Utc>) -> Option<TickMatch> {
        if token.len() != TOKEN_LEN {
            return None;
        }

        let tick = self.tick_at(now);
        if self.matches(token, tick, action) {
            return Some(TickMatch::Current);
        }
        if tick > 0 && self.matches(token, tick - 1, action) {
            return Some(TickMatch::Previous);
        }
        None
    }

    fn matches(&self, token: &str, tick: u64, action: &str) -> bool {
        let expected = self.digest(tick, action);
        token.as_bytes().ct_eq(expected.as_bytes()).into()
    }

    /// Characters `[len - 12, len - 2)` of the hex HMAC of `"{tick}{action}"`.
    fn digest(&self, tick: u64, action: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(tick.to_string().as_bytes());
        mac.update(action.as_bytes());

        let hex = hex::encode(mac.finalize().into_bytes());
        let start = hex.len() - DIGEST_TAIL;
        hex[start..start + TOKEN_LEN].to_string()
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"[REDACTED]")
            .field("expiration", &self.expiration)
            .field("hooked", &self.hook.is_some())
            .finish()
    }
}
