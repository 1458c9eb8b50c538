/*++

Licensed under the Apache-2.0 license.

File Name:

    mmio.rs

Abstract:

    File contains the memory mapped register access abstraction used by the
    drivers.

--*/

/// Word-wide access to memory mapped registers.
///
/// Drivers are generic over this trait so the same code runs against the
/// silicon and against a simulated peripheral.
pub trait Mmio {
    /// Loads the 32-bit register at `addr`.
    fn read32(&self, addr: u32) -> u32;

    /// Stores `val` to the 32-bit register at `addr`.
    fn write32(&self, addr: u32, val: u32);
}

impl<T: Mmio + ?Sized> Mmio for &T {
    fn read32(&self, addr: u32) -> u32 {
        (**self).read32(addr)
    }

    fn write32(&self, addr: u32, val: u32) {
        (**self).write32(addr, val)
    }
}

/// Volatile access to the physical address space.
#[derive(Debug, Clone, Copy)]
pub struct RealMmio {
    _priv: (),
}

impl RealMmio {
    /// Returns a handle that performs raw volatile accesses.
    ///
    /// # Safety
    ///
    /// Every address later passed to [`Mmio::read32`] or [`Mmio::write32`]
    /// must be a valid, word aligned device register.
    pub const unsafe fn new() -> Self {
        Self { _priv: () }
    }
}

impl Mmio for RealMmio {
    #[inline(always)]
    fn read32(&self, addr: u32) -> u32 {
        unsafe { core::ptr::read_volatile(addr as usize as *const u32) }
    }

    #[inline(always)]
    fn write32(&self, addr: u32, val: u32) {
        unsafe { core::ptr::write_volatile(addr as usize as *mut u32, val) }
    }
}
