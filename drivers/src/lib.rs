/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the platform management controller secure boot
    drivers.

--*/

#![cfg_attr(not(feature = "std"), no_std)]

mod reg;

mod aes_key_src;
mod fuse_bank;
pub mod memory_layout;
mod mmio;
pub mod printer;
mod puf;
pub mod wait;

#[cfg(any(test, feature = "model"))]
pub mod model;

pub use aes_key_src::AesKeySrc;
pub use fuse_bank::FuseBank;
pub use mmio::{Mmio, RealMmio};
pub use plm_error::{ErrorKind, PlmError, PlmResult};
pub use printer::HexWords;
pub use puf::{
    generate_fuse_format, Puf, PufConfig, PufData, PufDataLocation, PufHelperData, PufId,
    PufOperation, PufRegMode, PUF_12K_SYN_LEN_WORDS, PUF_4K_SYN_LEN_WORDS,
    PUF_EFUSE_TRIM_SYN_DATA_WORDS, PUF_ID_WORDS, PUF_MAX_SYN_LEN_WORDS, PUF_SHUTTER_VALUE,
    PUF_STATUS_WAIT_TIMEOUT,
};

cfg_if::cfg_if! {
    if #[cfg(feature = "uart")] {
        mod uart;

        pub use uart::Uart;
    }
}
