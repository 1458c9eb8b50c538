/*++

Licensed under the Apache-2.0 license.

File Name:

    secure_params.rs

Abstract:

    File contains the per-image security parameters consulted while an image
    is authenticated and decrypted.

--*/

use crate::config::{KeyResolution, LoaderConfig};
use crate::kek::{EncKeySource, KekStatus};
use plm_drivers::{cprintln, AesKeySrc};
use plm_error::PlmResult;
use plm_kat::{execute_pending_kats, FipsModeSource, ImageType, KatStatus, SelfTest};

/// Security state owned by the image being loaded.
///
/// Red key availability starts empty for every image. The KAT status is
/// carried over from the previous image and adjusted by
/// [`SecureImageParams::update_kat_status`]. Obfuscated key resolution is
/// fixed by the loader configuration when the image is opened.
#[derive(Debug)]
pub struct SecureImageParams {
    image_type: ImageType,
    key_resolution: KeyResolution,
    kek_status: KekStatus,
    kat_status: KatStatus,
}

impl SecureImageParams {
    /// # Arguments
    ///
    /// * `config` - Loader configuration
    /// * `image_type` - Full or partial image
    /// * `kat_status` - Status left by the previous image
    pub fn new(config: &LoaderConfig, image_type: ImageType, kat_status: KatStatus) -> Self {
        Self {
            image_type,
            key_resolution: config.key_resolution,
            kek_status: KekStatus::empty(),
            kat_status,
        }
    }

    pub fn image_type(&self) -> ImageType {
        self.image_type
    }

    pub fn key_resolution(&self) -> KeyResolution {
        self.key_resolution
    }

    pub fn kek_status(&self) -> KekStatus {
        self.kek_status
    }

    pub fn kat_status(&self) -> KatStatus {
        self.kat_status
    }

    /// Record the red key left behind by the boot header key source.
    pub fn update_kek_source(&mut self, enc_status: EncKeySource) {
        self.kek_status = self.key_resolution.resolver().classify(enc_status);
    }

    /// Key slot for a partition encrypted with an obfuscated key.
    pub fn obfuscated_key(&self, requested: EncKeySource) -> PlmResult<AesKeySrc> {
        let resolver = self.key_resolution.resolver();
        resolver.resolve(requested, self.kek_status).map_err(|err| {
            cprintln!("[loader] Obfuscated key unavailable: {}", u32::from(err));
            err
        })
    }

    /// Drop self-test results this image must not rely on.
    ///
    /// # Arguments
    ///
    /// * `fips` - FIPS mode source, read on every call
    /// * `mask` - Tests the image asks to re-run
    pub fn update_kat_status(&mut self, fips: &impl FipsModeSource, mask: KatStatus) {
        self.kat_status = plm_kat::update_kat_status(
            fips.fips_mode_enabled(),
            self.image_type,
            self.kat_status,
            mask,
        );
        cprintln!("[loader] KAT status {}", self.kat_status.bits());
    }

    /// Run the self-tests in `required` that have not passed yet.
    pub fn run_pending_kats(
        &mut self,
        required: KatStatus,
        kats: &mut impl SelfTest,
    ) -> PlmResult<()> {
        execute_pending_kats(&mut self.kat_status, required, kats)
    }

    /// Gate checked before a primitive is used for this image.
    pub fn require_kats(&self, tests: KatStatus) -> PlmResult<()> {
        self.kat_status.require(tests)
    }

    /// KAT status handed to the next image.
    pub fn into_kat_status(self) -> KatStatus {
        self.kat_status
    }
}
