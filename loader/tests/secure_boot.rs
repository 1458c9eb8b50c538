// Licensed under the Apache-2.0 license

use plm_drivers::model::PufModel;
use plm_drivers::{
    AesKeySrc, ErrorKind, FuseBank, PlmError, Puf, PufConfig, PufDataLocation, PufOperation,
    PufRegMode, PUF_12K_SYN_LEN_WORDS, PUF_EFUSE_TRIM_SYN_DATA_WORDS,
};
use plm_kat::{is_fips_mode_enabled, ImageType, KatStatus};
use plm_loader::{
    run_puf_session, EncKeySource, KekStatus, KeyResolution, LoaderConfig, SecureImageParams,
};

#[test]
fn test_registration_12k_end_to_end() {
    let model = PufModel::new(PUF_12K_SYN_LEN_WORDS);
    let config = LoaderConfig::new();
    let mut puf = Puf::new(&model, &config.puf);
    let template = config
        .puf
        .session(PufRegMode::Mode12K, PufOperation::Registration)
        .with_write_target(PufDataLocation::VolatileMemory);

    let data = run_puf_session(&mut puf, &template, config.puf_retry).unwrap();
    assert_eq!(data.syndrome_data().len(), 350);
    assert_eq!(data.efuse_syn_data().len(), PUF_EFUSE_TRIM_SYN_DATA_WORDS);
    assert_eq!(data.puf_id(), Some(&PufModel::ID));
}

#[test]
fn test_registration_then_regeneration_same_id() {
    let model = PufModel::new(PUF_12K_SYN_LEN_WORDS);
    let config = PufConfig::new();
    let mut puf = Puf::new(&model, &config);

    let mut reg = config
        .session(PufRegMode::Mode12K, PufOperation::Registration)
        .with_write_target(PufDataLocation::VolatileMemory);
    puf.execute(&mut reg).unwrap();

    let mut regen = config
        .session(PufRegMode::Mode12K, PufOperation::RegenerateOnDemand)
        .with_read_source(PufDataLocation::VolatileMemory);
    regen
        .set_helper_data(reg.syndrome_data(), reg.chash, reg.aux)
        .unwrap();
    puf.execute(&mut regen).unwrap();

    assert_eq!(regen.puf_id(), reg.puf_id());
}

#[test]
#[cfg(not(feature = "secure-exclude"))]
fn test_efuse_obfuscated_key_with_bbram_red_key() {
    let config = LoaderConfig {
        key_resolution: KeyResolution::RedKey,
        ..LoaderConfig::new()
    };
    let mut params = SecureImageParams::new(&config, ImageType::Full, KatStatus::empty());
    params.update_kek_source(EncKeySource::BbramObfuscatedKey);
    assert_eq!(params.kek_status(), KekStatus::BBRAM_RED_KEY);

    let result = params.obfuscated_key(EncKeySource::EfuseObfuscatedKey);
    assert_eq!(result, Err(PlmError::LOADER_AES_KEK_DECRYPT));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::KeyNotAvailable);

    assert_eq!(
        params.obfuscated_key(EncKeySource::BbramObfuscatedKey),
        Ok(AesKeySrc::BbramRedKey)
    );
}

#[test]
fn test_excluded_build_has_no_red_keys() {
    let config = LoaderConfig {
        key_resolution: KeyResolution::SecureExcluded,
        ..LoaderConfig::new()
    };
    let mut params = SecureImageParams::new(&config, ImageType::Full, KatStatus::empty());
    params.update_kek_source(EncKeySource::BbramObfuscatedKey);
    assert_eq!(params.kek_status(), KekStatus::empty());

    let result = params.obfuscated_key(EncKeySource::BbramObfuscatedKey);
    assert_eq!(result, Err(PlmError::LOADER_SECURE_EXCLUDED));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Configuration);
}

#[test]
fn test_fips_rerun_clears_requested_bit() {
    let model = PufModel::default();
    model.set_fips_word(1 << 23);
    let fuses = FuseBank::new(&model);
    assert!(is_fips_mode_enabled(&fuses));

    let mut params = SecureImageParams::new(&LoaderConfig::new(), ImageType::Full, KatStatus::all());
    params.update_kat_status(&fuses, KatStatus::from_bits_truncate(0b001));

    assert_eq!(params.kat_status(), KatStatus::all() - KatStatus::SHA3);
    assert_eq!(
        params.require_kats(KatStatus::SHA3),
        Err(PlmError::KAT_NOT_RUN)
    );
    assert_eq!(params.require_kats(KatStatus::RSA), Ok(()));
}

#[test]
fn test_non_fips_full_image_keeps_status() {
    let model = PufModel::default();
    let fuses = FuseBank::new(&model);

    let status = KatStatus::SHA3 | KatStatus::DRBG;
    let mut params = SecureImageParams::new(&LoaderConfig::new(), ImageType::Full, status);
    params.update_kat_status(&fuses, KatStatus::empty());
    assert_eq!(params.kat_status(), status);
}

#[test]
fn test_regeneration_without_helper_data() {
    let model = PufModel::default();
    let config = LoaderConfig::new();
    let mut puf = Puf::new(&model, &config.puf);
    let template = config
        .puf
        .session(PufRegMode::Mode4K, PufOperation::RegenerateOnDemand)
        .with_read_source(PufDataLocation::FuseArray);

    let result = run_puf_session(&mut puf, &template, config.puf_retry);
    assert_eq!(result, Err(PlmError::DRIVER_PUF_CHASH_NOT_PROGRAMMED));
    assert_eq!(model.cmd_writes(), 0);
}
