/*++

Licensed under the Apache-2.0 license.

File Name:

    kek.rs

Abstract:

    File contains the key encryption key (KEK) availability tracking and the
    resolution of obfuscated key sources to red key slots.

--*/

use plm_drivers::{cprintln, AesKeySrc};
use plm_error::{PlmError, PlmResult};

/// Encryption key source declared by a boot header or partition header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncKeySource {
    Unencrypted,
    EfuseKey,
    EfuseBlockKey,
    EfuseObfuscatedKey,
    BbramKey,
    BbramBlockKey,
    BbramObfuscatedKey,
    BootHeaderBlockKey,
    BootHeaderObfuscatedKey,
    Unknown(u32),
}

impl EncKeySource {
    const UNENCRYPTED: u32 = 0x0000_0000;
    const EFUSE_KEY: u32 = 0xA5C3_C5A3;
    const EFUSE_BLK_KEY: u32 = 0xA5C3_C5A5;
    const EFUSE_OBFUS_KEY: u32 = 0xA5C3_C5A7;
    const BBRAM_KEY: u32 = 0x3A5C_3C5A;
    const BBRAM_BLK_KEY: u32 = 0x3A5C_3C59;
    const BBRAM_OBFUS_KEY: u32 = 0x3A5C_3C57;
    const BH_BLK_KEY: u32 = 0xA35C_3CA5;
    const BH_OBFUS_KEY: u32 = 0xA35C_7CA5;
}

impl From<u32> for EncKeySource {
    fn from(value: u32) -> Self {
        match value {
            Self::UNENCRYPTED => Self::Unencrypted,
            Self::EFUSE_KEY => Self::EfuseKey,
            Self::EFUSE_BLK_KEY => Self::EfuseBlockKey,
            Self::EFUSE_OBFUS_KEY => Self::EfuseObfuscatedKey,
            Self::BBRAM_KEY => Self::BbramKey,
            Self::BBRAM_BLK_KEY => Self::BbramBlockKey,
            Self::BBRAM_OBFUS_KEY => Self::BbramObfuscatedKey,
            Self::BH_BLK_KEY => Self::BootHeaderBlockKey,
            Self::BH_OBFUS_KEY => Self::BootHeaderObfuscatedKey,
            other => Self::Unknown(other),
        }
    }
}

impl From<EncKeySource> for u32 {
    fn from(src: EncKeySource) -> Self {
        match src {
            EncKeySource::Unencrypted => EncKeySource::UNENCRYPTED,
            EncKeySource::EfuseKey => EncKeySource::EFUSE_KEY,
            EncKeySource::EfuseBlockKey => EncKeySource::EFUSE_BLK_KEY,
            EncKeySource::EfuseObfuscatedKey => EncKeySource::EFUSE_OBFUS_KEY,
            EncKeySource::BbramKey => EncKeySource::BBRAM_KEY,
            EncKeySource::BbramBlockKey => EncKeySource::BBRAM_BLK_KEY,
            EncKeySource::BbramObfuscatedKey => EncKeySource::BBRAM_OBFUS_KEY,
            EncKeySource::BootHeaderBlockKey => EncKeySource::BH_BLK_KEY,
            EncKeySource::BootHeaderObfuscatedKey => EncKeySource::BH_OBFUS_KEY,
            EncKeySource::Unknown(value) => value,
        }
    }
}

bitflags::bitflags! {
    /// Red keys left in the AES key slots after the boot header KEK
    /// decryption.
    #[derive(Default)]
    pub struct KekStatus : u32 {
        const EFUSE_RED_KEY = 0x1;
        const BBRAM_RED_KEY = 0x2;
        const BHDR_RED_KEY = 0x4;
    }
}

/// Map the boot header key source to the red key it leaves behind.
///
/// Block and obfuscated variants of one storage imply the same red key.
/// Any other source implies none.
pub fn classify_kek_source(enc_status: EncKeySource) -> KekStatus {
    let status = match enc_status {
        EncKeySource::BootHeaderBlockKey | EncKeySource::BootHeaderObfuscatedKey => {
            KekStatus::BHDR_RED_KEY
        }
        EncKeySource::BbramBlockKey | EncKeySource::BbramObfuscatedKey => {
            KekStatus::BBRAM_RED_KEY
        }
        EncKeySource::EfuseBlockKey | EncKeySource::EfuseObfuscatedKey => {
            KekStatus::EFUSE_RED_KEY
        }
        EncKeySource::Unencrypted
        | EncKeySource::EfuseKey
        | EncKeySource::BbramKey
        | EncKeySource::Unknown(_) => KekStatus::empty(),
    };
    cprintln!("[kek] Red key status {}", status.bits());
    status
}

/// Select the red key slot for an obfuscated key source.
///
/// The requested source's own red key must be available; another slot is
/// never substituted.
///
/// # Arguments
///
/// * `requested` - Obfuscated key source named by the image
/// * `status` - Red keys available for the image
///
/// # Returns
///     `LOADER_AES_KEK_DECRYPT` if the red key is not available, or
///     `LOADER_AES_KEK_UNKNOWN_SOURCE` if `requested` is not an obfuscated
///     key source
///
pub fn resolve_obfuscated_key(requested: EncKeySource, status: KekStatus) -> PlmResult<AesKeySrc> {
    let (needed, key_src) = match requested {
        EncKeySource::EfuseObfuscatedKey => (KekStatus::EFUSE_RED_KEY, AesKeySrc::EfuseRedKey),
        EncKeySource::BbramObfuscatedKey => (KekStatus::BBRAM_RED_KEY, AesKeySrc::BbramRedKey),
        EncKeySource::BootHeaderObfuscatedKey => {
            (KekStatus::BHDR_RED_KEY, AesKeySrc::BootHeaderRedKey)
        }
        _ => return Err(PlmError::LOADER_AES_KEK_UNKNOWN_SOURCE),
    };

    if status.contains(needed) {
        Ok(key_src)
    } else {
        Err(PlmError::LOADER_AES_KEK_DECRYPT)
    }
}

/// Obfuscated key support selected for a build.
pub(crate) trait ObfuscatedKeyResolver {
    /// Red keys implied by the boot header key source.
    fn classify(&self, enc_status: EncKeySource) -> KekStatus;

    /// Red key slot for an obfuscated key source.
    fn resolve(&self, requested: EncKeySource, status: KekStatus) -> PlmResult<AesKeySrc>;
}

/// Full obfuscated key support.
#[cfg(not(feature = "secure-exclude"))]
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct RedKeyResolver;

#[cfg(not(feature = "secure-exclude"))]
impl ObfuscatedKeyResolver for RedKeyResolver {
    fn classify(&self, enc_status: EncKeySource) -> KekStatus {
        classify_kek_source(enc_status)
    }

    fn resolve(&self, requested: EncKeySource, status: KekStatus) -> PlmResult<AesKeySrc> {
        resolve_obfuscated_key(requested, status)
    }
}

/// Secure boot excluded from the build. No red key is ever tracked and every
/// resolution fails.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SecureExcludedResolver;

impl ObfuscatedKeyResolver for SecureExcludedResolver {
    fn classify(&self, _enc_status: EncKeySource) -> KekStatus {
        KekStatus::empty()
    }

    fn resolve(&self, _requested: EncKeySource, _status: KekStatus) -> PlmResult<AesKeySrc> {
        Err(PlmError::LOADER_SECURE_EXCLUDED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plm_error::ErrorKind;

    const SOURCES: [EncKeySource; 10] = [
        EncKeySource::Unencrypted,
        EncKeySource::EfuseKey,
        EncKeySource::EfuseBlockKey,
        EncKeySource::EfuseObfuscatedKey,
        EncKeySource::BbramKey,
        EncKeySource::BbramBlockKey,
        EncKeySource::BbramObfuscatedKey,
        EncKeySource::BootHeaderBlockKey,
        EncKeySource::BootHeaderObfuscatedKey,
        EncKeySource::Unknown(0xDEAD_BEEF),
    ];

    fn all_statuses() -> impl Iterator<Item = KekStatus> {
        (0u32..8).map(KekStatus::from_bits_truncate)
    }

    #[test]
    fn test_raw_values() {
        assert_eq!(EncKeySource::from(0xA5C3_C5A7), EncKeySource::EfuseObfuscatedKey);
        assert_eq!(EncKeySource::from(0x3A5C_3C57), EncKeySource::BbramObfuscatedKey);
        assert_eq!(EncKeySource::from(0xA35C_7CA5), EncKeySource::BootHeaderObfuscatedKey);
        assert_eq!(EncKeySource::from(0x1234), EncKeySource::Unknown(0x1234));
        for src in SOURCES {
            assert_eq!(EncKeySource::from(u32::from(src)), src);
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify_kek_source(EncKeySource::EfuseBlockKey),
            KekStatus::EFUSE_RED_KEY
        );
        assert_eq!(
            classify_kek_source(EncKeySource::EfuseObfuscatedKey),
            KekStatus::EFUSE_RED_KEY
        );
        assert_eq!(
            classify_kek_source(EncKeySource::BbramBlockKey),
            KekStatus::BBRAM_RED_KEY
        );
        assert_eq!(
            classify_kek_source(EncKeySource::BbramObfuscatedKey),
            KekStatus::BBRAM_RED_KEY
        );
        assert_eq!(
            classify_kek_source(EncKeySource::BootHeaderBlockKey),
            KekStatus::BHDR_RED_KEY
        );
        assert_eq!(
            classify_kek_source(EncKeySource::BootHeaderObfuscatedKey),
            KekStatus::BHDR_RED_KEY
        );
    }

    #[test]
    fn test_classify_at_most_one_bit() {
        for src in SOURCES {
            assert!(classify_kek_source(src).bits().count_ones() <= 1, "{src:?}");
        }
        for raw in [0u32, 1, 0xA5C3_C5A6, u32::MAX] {
            assert_eq!(classify_kek_source(raw.into()), KekStatus::empty());
        }
    }

    #[test]
    fn test_resolve_requires_own_bit() {
        let cases = [
            (
                EncKeySource::EfuseObfuscatedKey,
                KekStatus::EFUSE_RED_KEY,
                AesKeySrc::EfuseRedKey,
            ),
            (
                EncKeySource::BbramObfuscatedKey,
                KekStatus::BBRAM_RED_KEY,
                AesKeySrc::BbramRedKey,
            ),
            (
                EncKeySource::BootHeaderObfuscatedKey,
                KekStatus::BHDR_RED_KEY,
                AesKeySrc::BootHeaderRedKey,
            ),
        ];
        for (requested, bit, key_src) in cases {
            for status in all_statuses() {
                let result = resolve_obfuscated_key(requested, status);
                if status.contains(bit) {
                    assert_eq!(result, Ok(key_src));
                } else {
                    assert_eq!(result, Err(PlmError::LOADER_AES_KEK_DECRYPT));
                    assert_eq!(result.unwrap_err().kind(), ErrorKind::KeyNotAvailable);
                }
                // Pure: same inputs, same answer.
                assert_eq!(resolve_obfuscated_key(requested, status), result);
            }
        }
    }

    #[test]
    fn test_resolve_non_obfuscated_source() {
        for requested in [
            EncKeySource::Unencrypted,
            EncKeySource::EfuseBlockKey,
            EncKeySource::BbramKey,
            EncKeySource::Unknown(7),
        ] {
            assert_eq!(
                resolve_obfuscated_key(requested, KekStatus::all()),
                Err(PlmError::LOADER_AES_KEK_UNKNOWN_SOURCE)
            );
        }
    }

    #[test]
    fn test_efuse_request_with_bbram_key() {
        assert_eq!(
            resolve_obfuscated_key(EncKeySource::EfuseObfuscatedKey, KekStatus::BBRAM_RED_KEY),
            Err(PlmError::LOADER_AES_KEK_DECRYPT)
        );
    }

    #[test]
    fn test_secure_excluded_resolver() {
        let resolver = SecureExcludedResolver;
        assert_eq!(
            resolver.classify(EncKeySource::EfuseObfuscatedKey),
            KekStatus::empty()
        );
        assert_eq!(
            resolver.resolve(EncKeySource::EfuseObfuscatedKey, KekStatus::all()),
            Err(PlmError::LOADER_SECURE_EXCLUDED)
        );
    }
}
