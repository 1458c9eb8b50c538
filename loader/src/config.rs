/*++

Licensed under the Apache-2.0 license.

File Name:

    config.rs

Abstract:

    File contains the secure loader configuration.

--*/

#[cfg(not(feature = "secure-exclude"))]
use crate::kek::RedKeyResolver;
use crate::kek::{ObfuscatedKeyResolver, SecureExcludedResolver};
use plm_drivers::PufConfig;

#[cfg(not(feature = "secure-exclude"))]
static RED_KEY_RESOLVER: RedKeyResolver = RedKeyResolver;
static SECURE_EXCLUDED_RESOLVER: SecureExcludedResolver = SecureExcludedResolver;

/// What to do when a PUF session times out waiting on the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PufRetryPolicy {
    /// The first timeout fails the provisioning step.
    Fatal,

    /// Start a new session from scratch, up to `max_attempts` sessions in
    /// total.
    FreshSession { max_attempts: u32 },
}

impl PufRetryPolicy {
    /// Number of sessions that may be started. Never less than one.
    pub const fn max_attempts(&self) -> u32 {
        match *self {
            Self::Fatal => 1,
            Self::FreshSession { max_attempts } if max_attempts == 0 => 1,
            Self::FreshSession { max_attempts } => max_attempts,
        }
    }
}

impl Default for PufRetryPolicy {
    fn default() -> Self {
        Self::Fatal
    }
}

/// Obfuscated key support for the build.
///
/// Builds with `secure-exclude` have no red key variant, so nothing can
/// select red key resolution at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResolution {
    #[cfg(not(feature = "secure-exclude"))]
    RedKey,
    SecureExcluded,
}

impl KeyResolution {
    #[cfg(feature = "secure-exclude")]
    pub const DEFAULT: Self = Self::SecureExcluded;

    #[cfg(not(feature = "secure-exclude"))]
    pub const DEFAULT: Self = Self::RedKey;

    /// Resolver implementing this choice.
    pub(crate) fn resolver(&self) -> &'static dyn ObfuscatedKeyResolver {
        match self {
            #[cfg(not(feature = "secure-exclude"))]
            Self::RedKey => &RED_KEY_RESOLVER,
            Self::SecureExcluded => &SECURE_EXCLUDED_RESOLVER,
        }
    }
}

impl Default for KeyResolution {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Secure loader configuration, fixed for a boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    pub puf: PufConfig,
    pub puf_retry: PufRetryPolicy,
    pub key_resolution: KeyResolution,
}

impl LoaderConfig {
    pub const fn new() -> Self {
        Self {
            puf: PufConfig::new(),
            puf_retry: PufRetryPolicy::Fatal,
            key_resolution: KeyResolution::DEFAULT,
        }
    }

    pub(crate) fn resolver(&self) -> &'static dyn ObfuscatedKeyResolver {
        self.key_resolution.resolver()
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new()
    }
}
