/*++

Licensed under the Apache-2.0 license.

File Name:

    puf_regs.rs

Abstract:

    File contains register definitions for the PUF block in PMC global
    space.

--*/

use crate::memory_layout::PUF_ORG;
use bitfield::bitfield;

pub const PUF_CMD: u32 = PUF_ORG;
pub const PUF_CFG0: u32 = PUF_ORG + 0x04;
pub const PUF_CFG1: u32 = PUF_ORG + 0x08;
pub const PUF_SHUT: u32 = PUF_ORG + 0x0C;
pub const PUF_STATUS: u32 = PUF_ORG + 0x10;
pub const PUF_WORD: u32 = PUF_ORG + 0x18;
pub const PUF_SYN_ADDR: u32 = PUF_ORG + 0x20;
pub const PUF_AUX: u32 = PUF_ORG + 0x24;
pub const PUF_CHASH: u32 = PUF_ORG + 0x28;
pub const PUF_CLEAR: u32 = PUF_ORG + 0x2C;
pub const PUF_ID_0: u32 = PUF_ORG + 0x30;

pub const PUF_CMD_REGISTRATION: u32 = 0x1;
pub const PUF_CMD_REGEN_ON_DEMAND: u32 = 0x2;
pub const PUF_CMD_REGEN_ID_ONLY: u32 = 0x3;

pub const PUF_CFG1_INIT_VAL_4K: u32 = 0x0C23_0090;
pub const PUF_CFG1_INIT_VAL_12K: u32 = 0x0008_0080;

pub const PUF_CLEAR_ID: u32 = 0x1;

/// Address of PUF ID word `idx`.
pub const fn puf_id(idx: usize) -> u32 {
    PUF_ID_0 + (idx as u32) * 4
}

bitfield! {
    /// PUF Status
    #[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
    pub struct PufStatus(u32);

    /// A syndrome word is waiting in PUF_WORD
    pub syndrome_word_rdy, set_syndrome_word_rdy: 0;

    /// PUF ID registers read as zero
    pub id_zero, set_id_zero: 1;

    /// Regenerated key has been delivered to the key consumer
    pub key_rdy, set_key_rdy: 3;

    /// Operation complete
    pub puf_done, set_puf_done: 30;
}

bitfield! {
    /// PUF Configuration 0
    #[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
    pub struct PufCfg0(u32);

    /// Global variation filter
    pub global_var_filter, set_global_var_filter: 0;

    /// Hash select
    pub hash_sel, set_hash_sel: 1;
}
