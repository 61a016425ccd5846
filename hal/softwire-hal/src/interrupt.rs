//! Global interrupt masking
//!
//! Switching a pin between input and output spans several register writes.
//! An interrupt handler touching the same port in between can corrupt the
//! bus, so every mode change happens inside a [`MaskGuard`].

/// Global interrupt enable/disable
pub trait InterruptControl {
    /// Disable interrupt delivery
    ///
    /// Returns whether interrupts were enabled before the call, so nested
    /// masking restores the outer state.
    fn mask(&mut self) -> bool;

    /// Restore the delivery state returned by [`InterruptControl::mask`]
    fn restore(&mut self, was_enabled: bool);

    /// Mask interrupts until the returned guard is dropped
    fn masked(&mut self) -> MaskGuard<'_, Self> {
        MaskGuard::new(self)
    }
}

impl<T: InterruptControl + ?Sized> InterruptControl for &mut T {
    fn mask(&mut self) -> bool {
        T::mask(self)
    }

    fn restore(&mut self, was_enabled: bool) {
        T::restore(self, was_enabled)
    }
}

/// Scoped interrupt mask
///
/// Interrupts stay masked for the lifetime of the guard and are restored on
/// every exit path, including early returns.
pub struct MaskGuard<'a, I: InterruptControl + ?Sized> {
    irq: &'a mut I,
    was_enabled: bool,
}

impl<'a, I: InterruptControl + ?Sized> MaskGuard<'a, I> {
    /// Mask interrupts and remember the previous state
    pub fn new(irq: &'a mut I) -> Self {
        let was_enabled = irq.mask();
        Self { irq, was_enabled }
    }

    /// Whether interrupts were enabled when the guard was taken
    pub fn was_enabled(&self) -> bool {
        self.was_enabled
    }
}

impl<I: InterruptControl + ?Sized> Drop for MaskGuard<'_, I> {
    fn drop(&mut self) {
        self.irq.restore(self.was_enabled);
    }
}
