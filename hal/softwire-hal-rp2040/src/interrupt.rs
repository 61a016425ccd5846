//! Interrupt masking through PRIMASK
//!
//! Masks interrupts on the calling core only. The bus must not be shared
//! between cores.

use cortex_m::register::primask;
use softwire_hal::InterruptControl;

/// Global interrupt control of the current Cortex-M0+ core
#[derive(Debug, Clone, Copy, Default)]
pub struct CortexMInterrupts;

impl InterruptControl for CortexMInterrupts {
    fn mask(&mut self) -> bool {
        let was_enabled = primask::read().is_inactive();
        cortex_m::interrupt::disable();
        was_enabled
    }

    fn restore(&mut self, was_enabled: bool) {
        if was_enabled {
            // SAFETY: only re-enables what `mask` found enabled, so no
            // enclosing critical section is broken
            unsafe { cortex_m::interrupt::enable() }
        }
    }
}
