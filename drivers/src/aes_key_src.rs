/*++

Licensed under the Apache-2.0 license.

File Name:

    aes_key_src.rs

Abstract:

    File contains the key handles passed to the AES engine.

--*/

/// Key slot the AES engine is told to use.
///
/// A handle never carries key bytes; it names a hardware key slot. The
/// `*RedKey` variants name slots holding a key that was unwrapped with a
/// KEK earlier in the boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AesKeySrc {
    BbramKey = 0,
    BbramRedKey = 1,
    BootHeaderKey = 2,
    BootHeaderRedKey = 3,
    EfuseKey = 4,
    EfuseRedKey = 5,
    EfuseUserKey0 = 6,
    EfuseUserKey1 = 7,
    EfuseUserRedKey0 = 8,
    EfuseUserRedKey1 = 9,
    KupKey = 10,
    FamilyKey = 11,
    PufKey = 12,
}

impl From<AesKeySrc> for u32 {
    fn from(src: AesKeySrc) -> Self {
        src as u32
    }
}
