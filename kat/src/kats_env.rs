/*++

Licensed under the Apache-2.0 license.

File Name:

    kats_env.rs

Abstract:

    File contains the interface to the crypto layer self-tests and the
    routine that runs the tests an image still needs.

--*/

use crate::KatStatus;
use plm_drivers::cprintln;
use plm_error::{PlmError, PlmResult};

/// Known answer tests implemented by the crypto layer.
pub trait SelfTest {
    /// Execute the known answer test for a single primitive.
    ///
    /// # Arguments
    ///
    /// * `test` - Exactly one bit of [`KatStatus`]
    fn execute(&mut self, test: KatStatus) -> PlmResult<()>;
}

/// Run every test in `required` whose bit is clear in `status`.
///
/// A bit is set only after its test passed. Execution stops at the first
/// failure with `KAT_FAILED`; bits for tests that passed before it remain
/// set.
///
/// # Arguments
///
/// * `status` - Status of the current image
/// * `required` - Tests the image will use
/// * `kats` - Crypto layer self-tests
pub fn execute_pending_kats(
    status: &mut KatStatus,
    required: KatStatus,
    kats: &mut impl SelfTest,
) -> PlmResult<()> {
    for test in KatStatus::TESTS {
        if !required.contains(test) || status.contains(test) {
            continue;
        }
        if let Err(err) = kats.execute(test) {
            cprintln!("[kat] KAT {} failed: {}", test.bits(), u32::from(err));
            return Err(PlmError::KAT_FAILED);
        }
        status.insert(test);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct ScriptedKats {
        executed: KatStatus,
        runs: usize,
        failing: KatStatus,
    }

    impl SelfTest for ScriptedKats {
        fn execute(&mut self, test: KatStatus) -> PlmResult<()> {
            assert_eq!(test.bits().count_ones(), 1);
            self.runs += 1;
            self.executed.insert(test);
            if self.failing.contains(test) {
                Err(PlmError::KAT_FAILED)
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_runs_only_pending() {
        let mut status = KatStatus::SHA3 | KatStatus::HMAC;
        let mut kats = ScriptedKats::default();

        let required = KatStatus::SHA3 | KatStatus::RSA | KatStatus::AES_DECRYPT;
        assert_eq!(execute_pending_kats(&mut status, required, &mut kats), Ok(()));
        assert_eq!(kats.executed, KatStatus::RSA | KatStatus::AES_DECRYPT);
        assert_eq!(status, required | KatStatus::HMAC);

        // Second pass has nothing left to do.
        assert_eq!(execute_pending_kats(&mut status, required, &mut kats), Ok(()));
        assert_eq!(kats.runs, 2);
        assert_eq!(status.require(required), Ok(()));
    }

    #[test]
    fn test_failure_leaves_bit_clear() {
        let mut status = KatStatus::empty();
        let mut kats = ScriptedKats {
            failing: KatStatus::ECDSA_P384,
            ..Default::default()
        };

        assert_eq!(
            execute_pending_kats(&mut status, KatStatus::PARTIAL, &mut kats),
            Err(PlmError::KAT_FAILED)
        );
        assert_eq!(status, KatStatus::SHA3 | KatStatus::RSA);
        assert_eq!(
            status.require(KatStatus::ECDSA_P384),
            Err(PlmError::KAT_NOT_RUN)
        );
        assert!(!kats.executed.contains(KatStatus::AES_DECRYPT));
    }
}
