/*++

Licensed under the Apache-2.0 license.

File Name:

    puf_session.rs

Abstract:

    File contains the PUF provisioning steps of the secure loader and the
    retry policy applied to them.

--*/

use crate::config::{LoaderConfig, PufRetryPolicy};
use plm_drivers::{
    cprintln, Mmio, Puf, PufData, PufDataLocation, PufHelperData, PufOperation, PufRegMode,
};
use plm_error::{PlmError, PlmResult};

/// Run one PUF operation under `policy`.
///
/// Every attempt is a new session cloned from `template`, so nothing from a
/// failed attempt leaks into the next. Only hardware timeouts are retried.
///
/// # Arguments
///
/// * `puf` - PUF driver
/// * `template` - Session inputs
/// * `policy` - Retry policy
///
/// # Returns
///     the completed session
///
pub fn run_puf_session<M: Mmio>(
    puf: &mut Puf<M>,
    template: &PufData,
    policy: PufRetryPolicy,
) -> PlmResult<PufData> {
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;
    loop {
        let mut data = template.clone();
        let err = match puf.execute(&mut data) {
            Ok(()) => return Ok(data),
            Err(err) => err,
        };

        cprintln!(
            "[loader] PUF attempt {} of {} failed: {}",
            attempt,
            max_attempts,
            u32::from(err)
        );
        if !err.is_retryable() || policy == PufRetryPolicy::Fatal {
            return Err(err);
        }
        if attempt >= max_attempts {
            return Err(PlmError::LOADER_PUF_RETRIES_EXHAUSTED);
        }
        attempt += 1;
    }
}

/// Register the device and release its ID registers.
///
/// # Arguments
///
/// * `puf` - PUF driver
/// * `config` - Loader configuration
/// * `reg_mode` - Registration mode
/// * `target` - Where the caller will store the helper data
///
/// # Returns
///     the helper data to persist
///
pub fn register_device<M: Mmio>(
    puf: &mut Puf<M>,
    config: &LoaderConfig,
    reg_mode: PufRegMode,
    target: PufDataLocation,
) -> PlmResult<PufHelperData> {
    let template = config
        .puf
        .session(reg_mode, PufOperation::Registration)
        .with_write_target(target);
    let data = run_puf_session(puf, &template, config.puf_retry)?;
    puf.clear_id()?;
    Ok(data.helper_data())
}

#[cfg(test)]
mod tests {
    use super::*;
    use plm_drivers::model::PufModel;
    use plm_drivers::{PufConfig, PUF_4K_SYN_LEN_WORDS, PUF_EFUSE_TRIM_SYN_DATA_WORDS};

    fn test_config(puf_retry: PufRetryPolicy) -> LoaderConfig {
        LoaderConfig {
            puf: PufConfig {
                syndrome_word_poll_bound: 16,
                done_poll_bound: 16,
                ..PufConfig::new()
            },
            puf_retry,
            ..LoaderConfig::new()
        }
    }

    fn id_only(config: &LoaderConfig) -> PufData {
        config
            .puf
            .session(PufRegMode::Mode4K, PufOperation::RegenerateIdOnly)
    }

    #[test]
    fn test_fatal_policy_single_attempt() {
        let model = PufModel::default();
        model.withhold_done_for_commands(1);
        let config = test_config(PufRetryPolicy::Fatal);
        let mut puf = Puf::new(&model, &config.puf);

        assert_eq!(
            run_puf_session(&mut puf, &id_only(&config), config.puf_retry),
            Err(PlmError::DRIVER_PUF_STATUS_DONE_TIMEOUT)
        );
        assert_eq!(model.cmd_writes(), 1);
    }

    #[test]
    fn test_fresh_session_recovers() {
        let model = PufModel::default();
        model.withhold_done_for_commands(2);
        let config = test_config(PufRetryPolicy::FreshSession { max_attempts: 3 });
        let mut puf = Puf::new(&model, &config.puf);

        let data = run_puf_session(&mut puf, &id_only(&config), config.puf_retry).unwrap();
        assert_eq!(data.puf_id(), Some(&PufModel::ID));
        assert_eq!(model.cmd_writes(), 3);
    }

    #[test]
    fn test_fresh_session_exhausted() {
        let model = PufModel::default();
        model.withhold_done();
        let config = test_config(PufRetryPolicy::FreshSession { max_attempts: 2 });
        let mut puf = Puf::new(&model, &config.puf);

        assert_eq!(
            run_puf_session(&mut puf, &id_only(&config), config.puf_retry),
            Err(PlmError::LOADER_PUF_RETRIES_EXHAUSTED)
        );
        assert_eq!(model.cmd_writes(), 2);
    }

    #[test]
    fn test_non_timeout_not_retried() {
        let model = PufModel::new(PUF_4K_SYN_LEN_WORDS - 1);
        let config = test_config(PufRetryPolicy::FreshSession { max_attempts: 5 });
        let mut puf = Puf::new(&model, &config.puf);
        let template = config
            .puf
            .session(PufRegMode::Mode4K, PufOperation::Registration)
            .with_write_target(PufDataLocation::FuseArray);

        assert_eq!(
            run_puf_session(&mut puf, &template, config.puf_retry),
            Err(PlmError::DRIVER_PUF_SYNDROME_DATA_UNDERFLOW)
        );
        assert_eq!(model.cmd_writes(), 1);
    }

    #[test]
    fn test_register_device() {
        let model = PufModel::new(PUF_4K_SYN_LEN_WORDS);
        let config = test_config(PufRetryPolicy::Fatal);
        let mut puf = Puf::new(&model, &config.puf);

        let helper = register_device(
            &mut puf,
            &config,
            PufRegMode::Mode4K,
            PufDataLocation::FuseArray,
        )
        .unwrap();
        assert_eq!(helper.chash, PufModel::CHASH);
        assert_eq!(helper.aux, PufModel::AUX);
        assert_eq!(helper.efuse_syn_data.len(), PUF_EFUSE_TRIM_SYN_DATA_WORDS);
        assert!(model.id_cleared());
    }
}
