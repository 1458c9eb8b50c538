/*++

Licensed under the Apache-2.0 license.

File Name:

    efuse_cache_regs.rs

Abstract:

    File contains register definitions for the eFUSE cache.

--*/

use bitfield::bitfield;

pub use crate::memory_layout::{
    EFUSE_CACHE_FIPS_ORG as EFUSE_CACHE_FIPS, EFUSE_CACHE_PUF_AUX_ORG as EFUSE_CACHE_PUF_AUX,
    EFUSE_CACHE_PUF_CHASH_ORG as EFUSE_CACHE_PUF_CHASH,
};

/// Only the low 24 bits of the cached AUX row are meaningful.
pub const EFUSE_CACHE_PUF_AUX_MASK: u32 = 0x00FF_FFFF;

bitfield! {
    /// FIPS configuration row
    #[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
    pub struct FipsCfg(u32);

    /// FIPS mode field
    pub u8, fips_mode, set_fips_mode: 24, 23;
}
