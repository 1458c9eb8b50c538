/*++

Licensed under the Apache-2.0 license.

File Name:

    kat_status.rs

Abstract:

    File contains the known answer test status bit set and the policy that
    decides which self-tests must be re-run for an image.

--*/

use plm_drivers::{FuseBank, Mmio};
use plm_error::{PlmError, PlmResult};

bitflags::bitflags! {
    /// Self-tests that passed during the current boot.
    #[derive(Default)]
    pub struct KatStatus : u32 {
        const SHA3 = 1 << 0;
        const RSA = 1 << 1;
        const ECDSA_P384 = 1 << 2;
        const AES_DECRYPT = 1 << 3;
        const AES_DPA_CM = 1 << 4;
        const ECDSA_P256 = 1 << 5;
        const HMAC = 1 << 6;
        const DRBG = 1 << 7;

        /// Tests covering authentication and decryption of partial images
        const PARTIAL = Self::SHA3.bits
            | Self::RSA.bits
            | Self::ECDSA_P384.bits
            | Self::AES_DECRYPT.bits
            | Self::AES_DPA_CM.bits;
    }
}

impl KatStatus {
    /// Individual tests in execution order.
    pub const TESTS: [KatStatus; 8] = [
        Self::SHA3,
        Self::RSA,
        Self::ECDSA_P384,
        Self::AES_DECRYPT,
        Self::AES_DPA_CM,
        Self::ECDSA_P256,
        Self::HMAC,
        Self::DRBG,
    ];

    /// Fails with `KAT_NOT_RUN` unless every test in `tests` has passed.
    pub fn require(&self, tests: KatStatus) -> PlmResult<()> {
        if self.contains(tests) {
            Ok(())
        } else {
            Err(PlmError::KAT_NOT_RUN)
        }
    }
}

/// Kind of image being loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Full,
    Partial,
}

/// Source of the FIPS mode configuration.
pub trait FipsModeSource {
    fn fips_mode_enabled(&self) -> bool;
}

impl<M: Mmio> FipsModeSource for FuseBank<M> {
    fn fips_mode_enabled(&self) -> bool {
        FuseBank::fips_mode_enabled(self)
    }
}

/// Returns the FIPS mode setting, read fresh from `source`.
pub fn is_fips_mode_enabled(source: &impl FipsModeSource) -> bool {
    source.fips_mode_enabled()
}

/// Compute the status an image starts from.
///
/// In FIPS mode every image re-runs its self-tests: bits in `mask` are
/// cleared, or the whole status when `mask` is empty. Outside FIPS mode only
/// partial images drop results, and only for the partial-image tests.
///
/// # Arguments
///
/// * `fips_mode` - FIPS mode setting for this boot
/// * `image_type` - Type of the image being loaded
/// * `current` - Status carried over from the previous image
/// * `mask` - Tests the image asks to re-run
pub fn update_kat_status(
    fips_mode: bool,
    image_type: ImageType,
    current: KatStatus,
    mask: KatStatus,
) -> KatStatus {
    if fips_mode {
        if mask.is_empty() {
            KatStatus::empty()
        } else {
            current - mask
        }
    } else {
        match image_type {
            ImageType::Full => current,
            ImageType::Partial => update_partial_kat_status(current, mask),
        }
    }
}

fn update_partial_kat_status(current: KatStatus, mask: KatStatus) -> KatStatus {
    if mask.is_empty() {
        current - KatStatus::PARTIAL
    } else {
        current - (mask & KatStatus::PARTIAL)
    }
}
