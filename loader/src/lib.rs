/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the secure image loader key management.

--*/

#![cfg_attr(not(feature = "std"), no_std)]

mod config;
mod kek;
mod puf_session;
mod secure_params;

pub use config::{KeyResolution, LoaderConfig, PufRetryPolicy};
pub use kek::{classify_kek_source, resolve_obfuscated_key, EncKeySource, KekStatus};
pub use puf_session::{register_device, run_puf_session};
pub use secure_params::SecureImageParams;
