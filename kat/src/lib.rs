/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the known answer test status manager.

--*/

#![cfg_attr(not(feature = "std"), no_std)]

mod kat_status;
mod kats_env;

pub use kat_status::{is_fips_mode_enabled, update_kat_status, FipsModeSource, ImageType, KatStatus};
pub use kats_env::{execute_pending_kats, SelfTest};
pub use plm_error::{PlmError, PlmResult};
