/*++

Licensed under the Apache-2.0 license.

File Name:

    mod.rs

Abstract:

    File contains register definitions for the secure boot peripherals

--*/

pub(crate) mod efuse_cache_regs;
pub(crate) mod puf_regs;

cfg_if::cfg_if! {
    if #[cfg(feature = "uart")] {
        pub(crate) mod uart_regs;
    }
}
