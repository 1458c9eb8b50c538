/*++

Licensed under the Apache-2.0 license.

File Name:

    puf.rs

Abstract:

    File contains API for the Physically Unclonable Function (PUF) block.

    Registration drives the hardware to produce helper (syndrome) data, CHASH
    and AUX for a fresh device secret. Regeneration replays that helper data
    to reconstruct the same secret, or reproduces just the device ID.

--*/

use crate::reg::puf_regs::*;
use crate::{cprintln, wait, FuseBank, HexWords, Mmio};
use crate::memory_layout::{BBRAM_PUF_SYN_ORG, EFUSE_CACHE_PUF_SYN_ORG};
use plm_error::{PlmError, PlmResult};
use zerocopy::{AsBytes, FromBytes, FromZeroes};

pub const PUF_4K_SYN_LEN_WORDS: usize = 140;
pub const PUF_12K_SYN_LEN_WORDS: usize = 350;
pub const PUF_MAX_SYN_LEN_WORDS: usize = PUF_12K_SYN_LEN_WORDS;
pub const PUF_EFUSE_TRIM_SYN_DATA_WORDS: usize = 127;
pub const PUF_ID_WORDS: usize = 8;

pub const PUF_SHUTTER_VALUE: u32 = 0x0100_0040;
pub const PUF_STATUS_WAIT_TIMEOUT: u32 = 1_000_000;

pub const PUF_EFUSE_TRIM_MASK: u32 = 0xFFFF_F000;
pub const PUF_LAST_WORD_OFFSET: usize = 126;
pub const PUF_LAST_WORD_MASK: u32 = 0xFFFF_FFF0;

/// Device-unique identifier produced by registration and regeneration.
pub type PufId = [u32; PUF_ID_WORDS];

/// Registration mode. Selects the syndrome length and the error correction
/// strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PufRegMode {
    /// 140 syndrome words
    Mode4K = 0,

    /// 350 syndrome words
    Mode12K = 1,
}

impl PufRegMode {
    /// Number of syndrome words the hardware produces in this mode.
    pub const fn syndrome_len_words(self) -> usize {
        match self {
            Self::Mode4K => PUF_4K_SYN_LEN_WORDS,
            Self::Mode12K => PUF_12K_SYN_LEN_WORDS,
        }
    }

    const fn cfg1(self) -> u32 {
        match self {
            Self::Mode4K => PUF_CFG1_INIT_VAL_4K,
            Self::Mode12K => PUF_CFG1_INIT_VAL_12K,
        }
    }
}

impl TryFrom<u32> for PufRegMode {
    type Error = PlmError;

    fn try_from(value: u32) -> PlmResult<Self> {
        match value {
            0 => Ok(Self::Mode4K),
            1 => Ok(Self::Mode12K),
            _ => Err(PlmError::DRIVER_PUF_INVALID_SYNDROME_MODE),
        }
    }
}

/// PUF operation requested for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PufOperation {
    Registration = 1,
    RegenerateOnDemand = 2,
    RegenerateIdOnly = 3,
}

impl TryFrom<u32> for PufOperation {
    type Error = PlmError;

    fn try_from(value: u32) -> PlmResult<Self> {
        match value {
            1 => Ok(Self::Registration),
            2 => Ok(Self::RegenerateOnDemand),
            3 => Ok(Self::RegenerateIdOnly),
            _ => Err(PlmError::DRIVER_PUF_INVALID_OPERATION),
        }
    }
}

/// Where helper data is read from on regeneration, or where the caller will
/// store it after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PufDataLocation {
    FuseArray = 1,
    VolatileMemory = 2,
    BatteryBackedStore = 3,
}

impl TryFrom<u32> for PufDataLocation {
    type Error = PlmError;

    fn try_from(value: u32) -> PlmResult<Self> {
        match value {
            1 => Ok(Self::FuseArray),
            2 => Ok(Self::VolatileMemory),
            3 => Ok(Self::BatteryBackedStore),
            _ => Err(PlmError::DRIVER_PUF_INVALID_PARAM),
        }
    }
}

impl PufDataLocation {
    /// Returns true if helper data registered in `mode` fits this location.
    ///
    /// eFUSE and BBRAM only have room for the trimmed 4K image.
    pub const fn holds(self, mode: PufRegMode) -> bool {
        match self {
            Self::FuseArray | Self::BatteryBackedStore => matches!(mode, PufRegMode::Mode4K),
            Self::VolatileMemory => true,
        }
    }
}

/// Driver tuning that is fixed for a boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PufConfig {
    /// Default shutter value for new sessions
    pub shutter_value: u32,

    /// Default global variation filter setting for new sessions
    pub global_var_filter: bool,

    /// Status reads allowed per syndrome word
    pub syndrome_word_poll_bound: u32,

    /// Status reads allowed for the terminal done (or ID zero) signal
    pub done_poll_bound: u32,
}

impl PufConfig {
    pub const fn new() -> Self {
        Self {
            shutter_value: PUF_SHUTTER_VALUE,
            global_var_filter: true,
            syndrome_word_poll_bound: PUF_STATUS_WAIT_TIMEOUT,
            done_poll_bound: PUF_STATUS_WAIT_TIMEOUT,
        }
    }

    /// Creates a session descriptor carrying this configuration's defaults.
    pub fn session(&self, reg_mode: PufRegMode, operation: PufOperation) -> PufData {
        let mut data = PufData::new(reg_mode, operation);
        data.shutter_value = self.shutter_value;
        data.global_var_filter = self.global_var_filter;
        data
    }
}

impl Default for PufConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// PUF session descriptor.
///
/// One instance describes exactly one registration or regeneration. Inputs
/// are public; outputs are only populated by [`Puf`] once the hardware
/// reported completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PufData {
    pub reg_mode: PufRegMode,
    pub operation: PufOperation,
    pub read_source: Option<PufDataLocation>,
    pub write_target: Option<PufDataLocation>,
    pub shutter_value: u32,
    pub global_var_filter: bool,

    /// Registration output; regeneration input for CHASH from RAM/BBRAM
    pub chash: u32,

    /// Registration output; regeneration input for AUX from RAM/BBRAM
    pub aux: u32,

    syndrome_data: [u32; PUF_MAX_SYN_LEN_WORDS],
    syndrome_len: usize,
    puf_id: PufId,
    puf_id_valid: bool,
    efuse_syn_data: [u32; PUF_EFUSE_TRIM_SYN_DATA_WORDS],
}

impl PufData {
    pub fn new(reg_mode: PufRegMode, operation: PufOperation) -> Self {
        Self {
            reg_mode,
            operation,
            read_source: None,
            write_target: None,
            shutter_value: PUF_SHUTTER_VALUE,
            global_var_filter: true,
            chash: 0,
            aux: 0,
            syndrome_data: [0; PUF_MAX_SYN_LEN_WORDS],
            syndrome_len: 0,
            puf_id: [0; PUF_ID_WORDS],
            puf_id_valid: false,
            efuse_syn_data: [0; PUF_EFUSE_TRIM_SYN_DATA_WORDS],
        }
    }

    pub fn with_read_source(mut self, source: PufDataLocation) -> Self {
        self.read_source = Some(source);
        self
    }

    pub fn with_write_target(mut self, target: PufDataLocation) -> Self {
        self.write_target = Some(target);
        self
    }

    pub fn with_shutter_value(mut self, shutter_value: u32) -> Self {
        self.shutter_value = shutter_value;
        self
    }

    /// Loads previously registered helper data for regeneration.
    ///
    /// # Arguments
    ///
    /// * `syndrome` - Syndrome words; must match the registration mode length
    /// * `chash` - CHASH reported by registration
    /// * `aux` - AUX reported by registration
    pub fn set_helper_data(&mut self, syndrome: &[u32], chash: u32, aux: u32) -> PlmResult<()> {
        check_syndrome_len(self.reg_mode, syndrome.len())?;
        self.syndrome_data[..syndrome.len()].copy_from_slice(syndrome);
        self.syndrome_len = syndrome.len();
        self.chash = chash;
        self.aux = aux;
        Ok(())
    }

    /// Syndrome words of this session.
    pub fn syndrome_data(&self) -> &[u32] {
        &self.syndrome_data[..self.syndrome_len]
    }

    /// Device ID, present only after the hardware signalled completion.
    pub fn puf_id(&self) -> Option<&PufId> {
        self.puf_id_valid.then_some(&self.puf_id)
    }

    /// Trimmed syndrome data suitable for fuse programming.
    pub fn efuse_syn_data(&self) -> &[u32; PUF_EFUSE_TRIM_SYN_DATA_WORDS] {
        &self.efuse_syn_data
    }

    /// Record of the registration outputs a collaborator persists.
    pub fn helper_data(&self) -> PufHelperData {
        PufHelperData {
            chash: self.chash,
            aux: self.aux,
            efuse_syn_data: self.efuse_syn_data,
        }
    }

    fn clear_registration_outputs(&mut self) {
        self.syndrome_data.fill(0);
        self.syndrome_len = 0;
        self.chash = 0;
        self.aux = 0;
        self.efuse_syn_data.fill(0);
        self.clear_id();
    }

    fn clear_id(&mut self) {
        self.puf_id.fill(0);
        self.puf_id_valid = false;
    }
}

/// Helper data as committed to non-volatile storage.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, FromZeroes)]
pub struct PufHelperData {
    pub chash: u32,
    pub aux: u32,
    pub efuse_syn_data: [u32; PUF_EFUSE_TRIM_SYN_DATA_WORDS],
}

fn check_syndrome_len(mode: PufRegMode, len: usize) -> PlmResult<()> {
    let expected = mode.syndrome_len_words();
    if len > expected {
        Err(PlmError::DRIVER_PUF_SYNDROME_DATA_OVERFLOW)
    } else if len < expected {
        Err(PlmError::DRIVER_PUF_SYNDROME_DATA_UNDERFLOW)
    } else {
        Ok(())
    }
}

/// Helper data handed to the hardware for on-demand regeneration.
struct HelperDataRef {
    chash: u32,
    aux: u32,
    syn_addr: u32,
}

/// PUF block driver.
pub struct Puf<M: Mmio> {
    mmio: M,
    syndrome_word_poll_bound: u32,
    done_poll_bound: u32,
}

impl<M: Mmio> Puf<M> {
    pub fn new(mmio: M, config: &PufConfig) -> Self {
        Self {
            mmio,
            syndrome_word_poll_bound: config.syndrome_word_poll_bound,
            done_poll_bound: config.done_poll_bound,
        }
    }

    /// Run the operation named by `data.operation`.
    pub fn execute(&mut self, data: &mut PufData) -> PlmResult<()> {
        match data.operation {
            PufOperation::Registration => self.registration(data),
            PufOperation::RegenerateOnDemand | PufOperation::RegenerateIdOnly => {
                self.regeneration(data)
            }
        }
    }

    /// Register a fresh device secret.
    ///
    /// On success `data` holds the syndrome words, CHASH, AUX, device ID and
    /// the trimmed fuse image.
    ///
    /// # Arguments
    ///
    /// * `data` - Session descriptor with `operation` set to registration
    pub fn registration(&mut self, data: &mut PufData) -> PlmResult<()> {
        if data.operation != PufOperation::Registration {
            return Err(PlmError::DRIVER_PUF_INVALID_OPERATION);
        }
        let target = data
            .write_target
            .ok_or(PlmError::DRIVER_PUF_REGISTRATION_INVALID)?;
        if !target.holds(data.reg_mode) {
            return Err(PlmError::DRIVER_PUF_INVALID_SYNDROME_MODE);
        }

        data.clear_registration_outputs();
        let syn_len = data.reg_mode.syndrome_len_words();

        cprintln!("[puf] Registration ++");
        self.configure(data);
        self.mmio.write32(PUF_CMD, PUF_CMD_REGISTRATION);

        let mut idx = 0;
        while idx < syn_len {
            let status = wait::poll(self.syndrome_word_poll_bound, || {
                let status = self.status();
                (status.syndrome_word_rdy() || status.puf_done()).then_some(status)
            })
            .ok_or(PlmError::DRIVER_PUF_SYNDROME_WORD_WAIT_TIMEOUT)?;

            if !status.syndrome_word_rdy() {
                cprintln!("[puf] Done after {} of {} syndrome words", idx, syn_len);
                return Err(PlmError::DRIVER_PUF_SYNDROME_DATA_UNDERFLOW);
            }
            data.syndrome_data[idx] = self.mmio.read32(PUF_WORD);
            idx += 1;
        }

        let status = wait::poll(self.done_poll_bound, || {
            let status = self.status();
            (status.syndrome_word_rdy() || status.puf_done()).then_some(status)
        })
        .ok_or(PlmError::DRIVER_PUF_DONE_WAIT_TIMEOUT)?;
        if status.syndrome_word_rdy() {
            cprintln!("[puf] Syndrome word beyond {}", syn_len);
            return Err(PlmError::DRIVER_PUF_SYNDROME_DATA_OVERFLOW);
        }

        data.syndrome_len = syn_len;
        data.chash = self.mmio.read32(PUF_CHASH);
        data.aux = self.mmio.read32(PUF_AUX);
        data.puf_id = self.read_id();
        data.puf_id_valid = true;
        data.efuse_syn_data = generate_fuse_format(data.syndrome_data());

        cprintln!("[puf] PUF ID {}", HexWords(&data.puf_id));
        cprintln!("[puf] Registration --");
        Ok(())
    }

    /// Regenerate the device secret (on demand) or just the device ID.
    ///
    /// # Arguments
    ///
    /// * `data` - Session descriptor with a regeneration `operation`
    pub fn regeneration(&mut self, data: &mut PufData) -> PlmResult<()> {
        let cmd = match data.operation {
            PufOperation::RegenerateOnDemand => PUF_CMD_REGEN_ON_DEMAND,
            PufOperation::RegenerateIdOnly => PUF_CMD_REGEN_ID_ONLY,
            PufOperation::Registration => {
                return Err(PlmError::DRIVER_PUF_INVALID_REGENERATION_TYPE)
            }
        };
        data.clear_id();

        let helper = if cmd == PUF_CMD_REGEN_ON_DEMAND {
            Some(self.helper_data(data)?)
        } else {
            None
        };

        cprintln!("[puf] Regeneration ++");
        self.configure(data);
        if let Some(helper) = &helper {
            self.mmio.write32(PUF_CHASH, helper.chash);
            self.mmio.write32(PUF_AUX, helper.aux);
            self.mmio.write32(PUF_SYN_ADDR, helper.syn_addr);
        }
        self.mmio.write32(PUF_CMD, cmd);

        let status = wait::poll(self.done_poll_bound, || {
            let status = self.status();
            status.puf_done().then_some(status)
        })
        .ok_or(PlmError::DRIVER_PUF_STATUS_DONE_TIMEOUT)?;
        if helper.is_some() && !status.key_rdy() {
            cprintln!("[puf] Regeneration done without key");
            return Err(PlmError::DRIVER_PUF_KEY_NOT_READY);
        }

        data.puf_id = self.read_id();
        data.puf_id_valid = true;

        cprintln!("[puf] PUF ID {}", HexWords(&data.puf_id));
        cprintln!("[puf] Regeneration --");
        Ok(())
    }

    /// Clear the device ID held in the PUF ID registers.
    pub fn clear_id(&mut self) -> PlmResult<()> {
        self.mmio.write32(PUF_CLEAR, PUF_CLEAR_ID);
        wait::until(
            self.done_poll_bound,
            PlmError::DRIVER_PUF_ID_ZERO_TIMEOUT,
            || self.status().id_zero(),
        )
    }

    fn configure(&self, data: &PufData) {
        let mut cfg0 = PufCfg0::default();
        cfg0.set_hash_sel(true);
        cfg0.set_global_var_filter(data.global_var_filter);

        self.mmio.write32(PUF_CFG0, cfg0.0);
        self.mmio.write32(PUF_CFG1, data.reg_mode.cfg1());
        self.mmio.write32(PUF_SHUT, data.shutter_value);
    }

    fn status(&self) -> PufStatus {
        PufStatus(self.mmio.read32(PUF_STATUS))
    }

    fn read_id(&self) -> PufId {
        let mut id = [0u32; PUF_ID_WORDS];
        for (idx, word) in id.iter_mut().enumerate() {
            *word = self.mmio.read32(puf_id(idx));
        }
        id
    }

    /// Resolve CHASH, AUX and the syndrome address for on-demand
    /// regeneration.
    ///
    /// Helper data from the eFUSE cache is copied into `data` so the session
    /// reflects what the hardware was given.
    fn helper_data(&self, data: &mut PufData) -> PlmResult<HelperDataRef> {
        if data.read_source == Some(PufDataLocation::FuseArray) {
            let fuses = FuseBank::new(&self.mmio);
            data.chash = fuses.puf_chash();
            data.aux = fuses.puf_aux();
        }

        if data.chash == 0 {
            return Err(PlmError::DRIVER_PUF_CHASH_NOT_PROGRAMMED);
        }
        if data.aux == 0 {
            return Err(PlmError::DRIVER_PUF_AUX_NOT_PROGRAMMED);
        }

        let source = data
            .read_source
            .ok_or(PlmError::DRIVER_PUF_REGENERATION_INVALID)?;
        if !source.holds(data.reg_mode) {
            return Err(PlmError::DRIVER_PUF_REGEN_HELPER_DATA_INVALID);
        }
        let syn_addr = match source {
            PufDataLocation::FuseArray => EFUSE_CACHE_PUF_SYN_ORG,
            PufDataLocation::BatteryBackedStore => BBRAM_PUF_SYN_ORG,
            PufDataLocation::VolatileMemory => {
                check_syndrome_len(data.reg_mode, data.syndrome_len)?;
                // Addresses are 32 bits wide on the controller.
                data.syndrome_data.as_ptr() as usize as u32
            }
        };

        Ok(HelperDataRef {
            chash: data.chash,
            aux: data.aux,
            syn_addr,
        })
    }
}

/// Pack syndrome data into the layout programmed into eFUSE.
///
/// The first 140 words (4K layout) are consumed. Every fourth word keeps only
/// its upper 20 bits; the surviving bits are packed MSB first into 127 words
/// (4060 bits) and the unused tail of the last word is masked off.
pub fn generate_fuse_format(syndrome: &[u32]) -> [u32; PUF_EFUSE_TRIM_SYN_DATA_WORDS] {
    let mut out = [0u32; PUF_EFUSE_TRIM_SYN_DATA_WORDS];
    let mut bit_pos = 0usize;

    for (idx, &word) in syndrome.iter().take(PUF_4K_SYN_LEN_WORDS).enumerate() {
        let (value, width) = if idx % 4 == 3 {
            ((word & PUF_EFUSE_TRIM_MASK) >> 12, 20)
        } else {
            (word, 32)
        };

        let out_idx = bit_pos / 32;
        let free = 32 - bit_pos % 32;
        if width <= free {
            out[out_idx] |= value << (free - width);
        } else {
            let spill = width - free;
            out[out_idx] |= value >> spill;
            out[out_idx + 1] |= value << (32 - spill);
        }
        bit_pos += width;
    }

    out[PUF_LAST_WORD_OFFSET] &= PUF_LAST_WORD_MASK;
    out
}
