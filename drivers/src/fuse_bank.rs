/*++

Licensed under the Apache-2.0 license.

File Name:

    fuse_bank.rs

Abstract:

    File contains API for reading the eFUSE cache.

--*/

use crate::reg::efuse_cache_regs::{
    FipsCfg, EFUSE_CACHE_FIPS, EFUSE_CACHE_PUF_AUX, EFUSE_CACHE_PUF_AUX_MASK,
    EFUSE_CACHE_PUF_CHASH,
};
use crate::Mmio;

/// Read-only view of the eFUSE cache.
///
/// Values are read from the cache on every call; the cache is loaded by
/// hardware at power-on and does not change during a boot session.
pub struct FuseBank<M: Mmio> {
    mmio: M,
}

impl<M: Mmio> FuseBank<M> {
    pub fn new(mmio: M) -> Self {
        Self { mmio }
    }

    /// Get the FIPS mode setting.
    ///
    /// # Returns
    ///     true if the FIPS mode field (bits [24:23]) is non-zero
    ///
    pub fn fips_mode_enabled(&self) -> bool {
        FipsCfg(self.mmio.read32(EFUSE_CACHE_FIPS)).fips_mode() != 0
    }

    /// Get the programmed PUF CHASH. Zero means no helper data has been
    /// programmed.
    pub fn puf_chash(&self) -> u32 {
        self.mmio.read32(EFUSE_CACHE_PUF_CHASH)
    }

    /// Get the programmed PUF AUX.
    pub fn puf_aux(&self) -> u32 {
        self.mmio.read32(EFUSE_CACHE_PUF_AUX) & EFUSE_CACHE_PUF_AUX_MASK
    }
}
