/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains the error type and error codes shared by the platform
    management controller secure boot crates.

--*/
#![cfg_attr(not(feature = "std"), no_std)]
use core::convert::From;
use core::num::{NonZeroU32, TryFromIntError};

/// Platform management controller error.
///
/// The upper 16 bits identify the reporting component, the lower 16 bits the
/// failure within that component.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PlmError(pub NonZeroU32);

/// Class of failure, independent of the component that reported it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    /// Invalid mode, operation or source combination. A caller bug; never
    /// retried.
    Configuration,

    /// A hardware status bit was not observed within its poll bound. The
    /// session is dead; a brand-new session may be attempted.
    HardwareTimeout,

    /// Syndrome word count did not match the registration mode.
    DataLength,

    /// The requested red key is not available. The image load must abort.
    KeyNotAvailable,

    /// Regeneration was attempted before helper data was provisioned.
    HelperDataNotProgrammed,

    /// A known-answer self-test failed or was never run.
    KatFailure,

    /// Anything else.
    Internal,
}

/// Macro to define error constants ensuring uniqueness
///
/// This macro takes a list of (name, value, kind, doc) tuples and generates
/// constant definitions for each error code along with the code to kind
/// mapping.
#[macro_export]
macro_rules! define_error_constants {
    ($(($name:ident, $value:literal, $kind:ident, $doc:expr)),* $(,)?) => {
        $(
            #[doc = $doc]
            pub const $name: PlmError = PlmError::new_const($value);
        )*

        /// Returns the failure class of this error.
        pub fn kind(&self) -> ErrorKind {
            match self.0.get() {
                $(
                    $value => ErrorKind::$kind,
                )*
                _ => ErrorKind::Internal,
            }
        }

        #[cfg(test)]
        /// Returns a vector of all defined error constants for testing uniqueness
        pub fn all_constants() -> Vec<(&'static str, u32)> {
            vec![
                $(
                    (stringify!($name), $value),
                )*
            ]
        }
    };
}

impl PlmError {
    /// Create an error; intended to only be used from const contexts, as we don't want
    /// runtime panics if val is zero. The preferred way to get a PlmError from a u32 is to
    /// use `PlmError::try_from()` from the `TryFrom` trait impl.
    const fn new_const(val: u32) -> Self {
        match NonZeroU32::new(val) {
            Some(val) => Self(val),
            None => panic!("PlmError cannot be 0"),
        }
    }

    /// Returns true if a fresh session may be attempted after this error.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::HardwareTimeout
    }

    define_error_constants![
        (
            DRIVER_PUF_INVALID_PARAM,
            0x0001_0002,
            Configuration,
            "PUF Error: Invalid parameter"
        ),
        (
            DRIVER_PUF_INVALID_SYNDROME_MODE,
            0x0001_0003,
            Configuration,
            "PUF Error: Invalid syndrome mode"
        ),
        (
            DRIVER_PUF_SYNDROME_WORD_WAIT_TIMEOUT,
            0x0001_0004,
            HardwareTimeout,
            "PUF Error: Timed out waiting for syndrome word"
        ),
        (
            DRIVER_PUF_SYNDROME_DATA_OVERFLOW,
            0x0001_0005,
            DataLength,
            "PUF Error: Syndrome data overflow"
        ),
        (
            DRIVER_PUF_SYNDROME_DATA_UNDERFLOW,
            0x0001_0006,
            DataLength,
            "PUF Error: Syndrome data underflow"
        ),
        (
            DRIVER_PUF_DONE_WAIT_TIMEOUT,
            0x0001_0007,
            HardwareTimeout,
            "PUF Error: Timed out waiting for PUF done"
        ),
        (
            DRIVER_PUF_REGISTRATION_INVALID,
            0x0001_0008,
            Configuration,
            "PUF Error: Registration requested with an invalid write target"
        ),
        (
            DRIVER_PUF_CHASH_NOT_PROGRAMMED,
            0x0001_0010,
            HelperDataNotProgrammed,
            "PUF Error: CHASH not programmed"
        ),
        (
            DRIVER_PUF_STATUS_DONE_TIMEOUT,
            0x0001_0011,
            HardwareTimeout,
            "PUF Error: Timed out waiting for regeneration done"
        ),
        (
            DRIVER_PUF_INVALID_REGENERATION_TYPE,
            0x0001_0012,
            Configuration,
            "PUF Error: Invalid regeneration type"
        ),
        (
            DRIVER_PUF_INVALID_OPERATION,
            0x0001_0013,
            Configuration,
            "PUF Error: Invalid PUF operation"
        ),
        (
            DRIVER_PUF_REGENERATION_INVALID,
            0x0001_0014,
            Configuration,
            "PUF Error: Regeneration requested with an invalid read source"
        ),
        (
            DRIVER_PUF_REGEN_HELPER_DATA_INVALID,
            0x0001_0015,
            Configuration,
            "PUF Error: Helper data source cannot hold data for this mode"
        ),
        (
            DRIVER_PUF_ID_ZERO_TIMEOUT,
            0x0001_0016,
            HardwareTimeout,
            "PUF Error: Timed out waiting for PUF ID to clear"
        ),
        (
            DRIVER_PUF_AUX_NOT_PROGRAMMED,
            0x0001_0017,
            HelperDataNotProgrammed,
            "PUF Error: AUX not programmed"
        ),
        (
            DRIVER_PUF_KEY_NOT_READY,
            0x0001_0018,
            HardwareTimeout,
            "PUF Error: Regeneration finished without delivering the key"
        ),
        (
            LOADER_AES_KEK_DECRYPT,
            0x0002_0001,
            KeyNotAvailable,
            "Loader Error: Red key for requested obfuscated key source not available"
        ),
        (
            LOADER_AES_KEK_UNKNOWN_SOURCE,
            0x0002_0002,
            KeyNotAvailable,
            "Loader Error: Unknown obfuscated key source"
        ),
        (
            LOADER_SECURE_EXCLUDED,
            0x0002_0003,
            Configuration,
            "Loader Error: Secure key resolution excluded from this build"
        ),
        (
            LOADER_PUF_RETRIES_EXHAUSTED,
            0x0002_0004,
            HardwareTimeout,
            "Loader Error: PUF session retries exhausted"
        ),
        (KAT_NOT_RUN, 0x0003_0001, KatFailure, "KAT Error: KAT not run"),
        (KAT_FAILED, 0x0003_0002, KatFailure, "KAT Error: KAT failed"),
    ];
}

impl From<core::num::NonZeroU32> for crate::PlmError {
    fn from(val: core::num::NonZeroU32) -> Self {
        crate::PlmError(val)
    }
}

impl From<PlmError> for core::num::NonZeroU32 {
    fn from(val: PlmError) -> Self {
        val.0
    }
}

impl From<PlmError> for u32 {
    fn from(val: PlmError) -> Self {
        core::num::NonZeroU32::from(val).get()
    }
}

impl TryFrom<u32> for PlmError {
    type Error = TryFromIntError;
    fn try_from(val: u32) -> Result<Self, TryFromIntError> {
        match NonZeroU32::try_from(val) {
            Ok(val) => Ok(PlmError(val)),
            Err(err) => Err(err),
        }
    }
}

pub type PlmResult<T> = Result<T, PlmError>;
