/*++

Licensed under the Apache-2.0 license.

File Name:

    uart_regs.rs

Abstract:

    File contains register definitions for the debug UART

--*/

use crate::memory_layout::DEBUG_UART_ORG;

/// Transmit data register
pub const UART_DR: u32 = DEBUG_UART_ORG;
