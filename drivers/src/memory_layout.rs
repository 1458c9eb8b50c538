/*++
Licensed under the Apache-2.0 license.

File Name:

    memory_layout.rs

Abstract:

    The file contains the layout of the platform management controller
    address space used by the secure boot drivers.

--*/

//
// Peripheral Base Addresses
//
pub const PMC_GLOBAL_ORG: u32 = 0xF111_0000;
pub const PUF_ORG: u32 = PMC_GLOBAL_ORG + 0x0004_0000;
pub const BBRAM_ORG: u32 = 0xF11F_0000;
pub const EFUSE_CACHE_ORG: u32 = 0xF125_0000;
pub const DEBUG_UART_ORG: u32 = 0xF192_0000;

//
// Helper Data Locations
//
pub const EFUSE_CACHE_PUF_AUX_ORG: u32 = EFUSE_CACHE_ORG + 0xA4;
pub const EFUSE_CACHE_PUF_CHASH_ORG: u32 = EFUSE_CACHE_ORG + 0xA8;
pub const EFUSE_CACHE_FIPS_ORG: u32 = EFUSE_CACHE_ORG + 0x234;
pub const EFUSE_CACHE_PUF_SYN_ORG: u32 = EFUSE_CACHE_ORG + 0xA04;
pub const BBRAM_PUF_SYN_ORG: u32 = BBRAM_ORG + 0x10;

//
// Sizes In Bytes
//
pub const PUF_REG_SIZE: u32 = 0x50;
pub const EFUSE_CACHE_SIZE: u32 = 0x1000;
pub const EFUSE_CACHE_PUF_SYN_SIZE: u32 = 127 * 4;
pub const BBRAM_SIZE: u32 = 0x400;
pub const BBRAM_PUF_SYN_SIZE: u32 = 127 * 4;

#[test]
#[allow(clippy::assertions_on_constants)]
fn mem_layout_test_efuse_cache() {
    assert!(EFUSE_CACHE_PUF_SYN_ORG + EFUSE_CACHE_PUF_SYN_SIZE <= EFUSE_CACHE_ORG + EFUSE_CACHE_SIZE);
    assert!(EFUSE_CACHE_FIPS_ORG < EFUSE_CACHE_PUF_SYN_ORG);
    assert!(EFUSE_CACHE_PUF_CHASH_ORG < EFUSE_CACHE_FIPS_ORG);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn mem_layout_test_bbram() {
    assert!(BBRAM_PUF_SYN_ORG + BBRAM_PUF_SYN_SIZE <= BBRAM_ORG + BBRAM_SIZE);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn mem_layout_test_puf() {
    assert!(PUF_ORG + PUF_REG_SIZE <= BBRAM_ORG);
}
