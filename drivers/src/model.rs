/*++

Licensed under the Apache-2.0 license.

File Name:

    model.rs

Abstract:

    File contains a behavioral model of the PUF block and the eFUSE cache
    for exercising the drivers off target.

--*/

use crate::reg::efuse_cache_regs::{EFUSE_CACHE_FIPS, EFUSE_CACHE_PUF_AUX, EFUSE_CACHE_PUF_CHASH};
use crate::reg::puf_regs::*;
use crate::Mmio;
use core::cell::Cell;

/// Simulated PUF peripheral.
///
/// Registration emits a scripted number of syndrome words followed by the
/// done signal. Regeneration completes on the first status read. Knobs allow
/// stalling either phase to exercise the bounded waits.
pub struct PufModel {
    syndrome_words: usize,
    stall_after: Cell<Option<usize>>,
    withhold_done_cmds: Cell<usize>,
    withhold_id_zero: Cell<bool>,
    withhold_key_rdy: Cell<bool>,

    cmd: Cell<u32>,
    cmd_writes: Cell<usize>,
    emitted: Cell<usize>,
    status_reads: Cell<usize>,
    id_cleared: Cell<bool>,

    cfg0: Cell<u32>,
    cfg1: Cell<u32>,
    shutter: Cell<u32>,
    hw_chash: Cell<u32>,
    hw_aux: Cell<u32>,
    syn_addr: Cell<u32>,

    fuse_chash: Cell<u32>,
    fuse_aux: Cell<u32>,
    fips_word: Cell<u32>,
}

impl PufModel {
    pub const CHASH: u32 = 0xC4A5_1E55;
    pub const AUX: u32 = 0x00A0_B1C2;
    pub const ID: [u32; 8] = [
        0x1111_0001, 0x2222_0002, 0x3333_0003, 0x4444_0004, 0x5555_0005, 0x6666_0006,
        0x7777_0007, 0x8888_0008,
    ];

    /// Creates a model whose registration emits `syndrome_words` words.
    pub fn new(syndrome_words: usize) -> Self {
        Self {
            syndrome_words,
            stall_after: Cell::new(None),
            withhold_done_cmds: Cell::new(0),
            withhold_id_zero: Cell::new(false),
            withhold_key_rdy: Cell::new(false),
            cmd: Cell::new(0),
            cmd_writes: Cell::new(0),
            emitted: Cell::new(0),
            status_reads: Cell::new(0),
            id_cleared: Cell::new(false),
            cfg0: Cell::new(0),
            cfg1: Cell::new(0),
            shutter: Cell::new(0),
            hw_chash: Cell::new(0),
            hw_aux: Cell::new(0),
            syn_addr: Cell::new(0),
            fuse_chash: Cell::new(0),
            fuse_aux: Cell::new(0),
            fips_word: Cell::new(0),
        }
    }

    /// Syndrome word emitted at position `idx`.
    pub const fn syndrome_word(idx: usize) -> u32 {
        (idx as u32).wrapping_mul(0x9E37_79B9) ^ 0x5A5A_0000
    }

    /// Stop raising word ready after `words` syndrome words.
    pub fn stall_after_words(&self, words: usize) {
        self.stall_after.set(Some(words));
    }

    /// Never raise done.
    pub fn withhold_done(&self) {
        self.withhold_done_cmds.set(usize::MAX);
    }

    /// Withhold done for the first `cmds` commands only.
    pub fn withhold_done_for_commands(&self, cmds: usize) {
        self.withhold_done_cmds.set(cmds);
    }

    /// Never report the ID registers as cleared.
    pub fn withhold_id_zero(&self) {
        self.withhold_id_zero.set(true);
    }

    /// Complete on-demand regeneration without delivering the key.
    pub fn withhold_key_rdy(&self) {
        self.withhold_key_rdy.set(true);
    }

    pub fn program_fuse_helper_data(&self, chash: u32, aux: u32) {
        self.fuse_chash.set(chash);
        self.fuse_aux.set(aux);
    }

    pub fn set_fips_word(&self, word: u32) {
        self.fips_word.set(word);
    }

    /// Last command written.
    pub fn cmd(&self) -> u32 {
        self.cmd.get()
    }

    pub fn cmd_writes(&self) -> usize {
        self.cmd_writes.get()
    }

    pub fn status_reads(&self) -> usize {
        self.status_reads.get()
    }

    pub fn id_cleared(&self) -> bool {
        self.id_cleared.get()
    }

    pub fn cfg0(&self) -> u32 {
        self.cfg0.get()
    }

    pub fn cfg1(&self) -> u32 {
        self.cfg1.get()
    }

    pub fn shutter(&self) -> u32 {
        self.shutter.get()
    }

    /// CHASH last written by the driver.
    pub fn hw_chash(&self) -> u32 {
        self.hw_chash.get()
    }

    /// AUX last written by the driver.
    pub fn hw_aux(&self) -> u32 {
        self.hw_aux.get()
    }

    pub fn syn_addr(&self) -> u32 {
        self.syn_addr.get()
    }

    fn done_withheld(&self) -> bool {
        self.cmd_writes.get() <= self.withhold_done_cmds.get()
    }

    fn status(&self) -> PufStatus {
        self.status_reads.set(self.status_reads.get() + 1);

        let mut status = PufStatus::default();
        if self.id_cleared.get() && !self.withhold_id_zero.get() {
            status.set_id_zero(true);
        }
        if self.cmd_writes.get() == 0 {
            return status;
        }

        match self.cmd.get() {
            PUF_CMD_REGISTRATION => {
                let emitted = self.emitted.get();
                let stalled = self.stall_after.get().map_or(false, |n| emitted >= n);
                if emitted < self.syndrome_words {
                    status.set_syndrome_word_rdy(!stalled);
                } else if !self.done_withheld() {
                    status.set_puf_done(true);
                }
            }
            PUF_CMD_REGEN_ON_DEMAND | PUF_CMD_REGEN_ID_ONLY => {
                if !self.done_withheld() {
                    status.set_puf_done(true);
                    status.set_key_rdy(
                        self.cmd.get() == PUF_CMD_REGEN_ON_DEMAND && !self.withhold_key_rdy.get(),
                    );
                }
            }
            _ => {}
        }
        status
    }

    fn word(&self) -> u32 {
        let emitted = self.emitted.get();
        self.emitted.set(emitted + 1);
        Self::syndrome_word(emitted)
    }
}

impl Default for PufModel {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Mmio for PufModel {
    fn read32(&self, addr: u32) -> u32 {
        match addr {
            PUF_STATUS => self.status().0,
            PUF_WORD => self.word(),
            PUF_CHASH => Self::CHASH,
            PUF_AUX => Self::AUX,
            PUF_CFG0 => self.cfg0.get(),
            PUF_CFG1 => self.cfg1.get(),
            PUF_SHUT => self.shutter.get(),
            PUF_SYN_ADDR => self.syn_addr.get(),
            a if (PUF_ID_0..puf_id(Self::ID.len())).contains(&a) => {
                if self.id_cleared.get() {
                    0
                } else {
                    Self::ID[((a - PUF_ID_0) / 4) as usize]
                }
            }
            EFUSE_CACHE_FIPS => self.fips_word.get(),
            EFUSE_CACHE_PUF_CHASH => self.fuse_chash.get(),
            EFUSE_CACHE_PUF_AUX => self.fuse_aux.get(),
            _ => 0,
        }
    }

    fn write32(&self, addr: u32, val: u32) {
        match addr {
            PUF_CMD => {
                self.cmd.set(val);
                self.cmd_writes.set(self.cmd_writes.get() + 1);
                self.emitted.set(0);
                self.id_cleared.set(false);
            }
            PUF_CFG0 => self.cfg0.set(val),
            PUF_CFG1 => self.cfg1.set(val),
            PUF_SHUT => self.shutter.set(val),
            PUF_CHASH => self.hw_chash.set(val),
            PUF_AUX => self.hw_aux.set(val),
            PUF_SYN_ADDR => self.syn_addr.set(val),
            PUF_CLEAR if val & PUF_CLEAR_ID != 0 => self.id_cleared.set(true),
            _ => {}
        }
    }
}
