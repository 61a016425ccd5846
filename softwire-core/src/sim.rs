//! Simulated two-wire bus for host tests
//!
//! Models both lines as wired-AND with optional external pull-ups, the
//! master's pins with AVR-like latch behaviour (enabling the pull-up sets
//! the output latch, a plain input clears it), and any number of slave
//! devices reacting to clock and data edges.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use softwire_hal::{InterruptControl, PinControl, PinMode};

/// Data pin number
pub const SDA: u8 = 4;
/// Clock pin number
pub const SCL: u8 = 5;

fn index(pin: u8) -> usize {
    match pin {
        SDA => 0,
        SCL => 1,
        _ => panic!("pin {} is not wired to the simulated bus", pin),
    }
}

#[derive(Debug, Clone, Copy)]
struct MasterPin {
    mode: PinMode,
    latch: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeviceState {
    Idle,
    Receive { address_phase: bool },
    AckOut { transmit: bool },
    Transmit { byte: u8, bit: u8 },
    MasterAck,
}

/// Register-pointer memory device
///
/// Write transfers start with `pointer_bytes` pointer bytes (MSB first),
/// followed by data stored at the pointer with auto-increment. Read
/// transfers return memory from the pointer with auto-increment.
#[derive(Debug, Clone)]
pub struct SimDevice {
    /// 7-bit address
    pub address: u8,
    /// Device memory, indexed modulo its length
    pub memory: Vec<u8>,
    /// Current register pointer
    pub pointer: u32,
    /// Width of the register pointer in bytes
    pub pointer_bytes: u8,
    /// NACK data bytes from this index of a write transfer onwards
    pub nack_from: Option<usize>,
    /// Address phases to NACK before responding
    pub busy_for: u32,
    /// Every acknowledged data byte, pointer bytes included
    pub received: Vec<u8>,
    /// Bytes clocked out to the master
    pub sent: Vec<u8>,
    state: DeviceState,
    drive_low: bool,
    shift: u8,
    bits: u8,
    data_index: usize,
    pointer_pending: u8,
    master_acked: bool,
}

impl SimDevice {
    /// Device with 256 bytes of zeroed memory and a one-byte pointer
    pub fn new(address: u8) -> Self {
        Self {
            address,
            memory: vec![0; 256],
            pointer: 0,
            pointer_bytes: 1,
            nack_from: None,
            busy_for: 0,
            received: Vec::new(),
            sent: Vec::new(),
            state: DeviceState::Idle,
            drive_low: false,
            shift: 0,
            bits: 0,
            data_index: 0,
            pointer_pending: 0,
            master_acked: false,
        }
    }

    /// Preload memory at `register`
    pub fn with_memory(mut self, register: usize, data: &[u8]) -> Self {
        for (i, &b) in data.iter().enumerate() {
            let len = self.memory.len();
            self.memory[(register + i) % len] = b;
        }
        self
    }

    pub fn with_pointer_bytes(mut self, bytes: u8) -> Self {
        self.pointer_bytes = bytes;
        self
    }

    pub fn with_nack_from(mut self, index: usize) -> Self {
        self.nack_from = Some(index);
        self
    }

    pub fn with_busy_for(mut self, attempts: u32) -> Self {
        self.busy_for = attempts;
        self
    }

    fn cell(&self, offset: u32) -> usize {
        offset as usize % self.memory.len()
    }

    fn start(&mut self) {
        self.state = DeviceState::Receive {
            address_phase: true,
        };
        self.drive_low = false;
        self.shift = 0;
        self.bits = 0;
    }

    fn stop(&mut self) {
        self.state = DeviceState::Idle;
        self.drive_low = false;
    }

    fn scl_rise(&mut self, sda: bool) {
        match self.state {
            DeviceState::Receive { .. } => {
                self.shift = (self.shift << 1) | sda as u8;
                self.bits += 1;
            }
            DeviceState::MasterAck => self.master_acked = !sda,
            _ => {}
        }
    }

    fn load_next(&mut self) {
        let byte = self.memory[self.cell(self.pointer)];
        self.pointer = self.pointer.wrapping_add(1);
        self.sent.push(byte);
        self.drive_low = byte & 0x80 == 0;
        self.state = DeviceState::Transmit { byte, bit: 0 };
    }

    fn scl_fall(&mut self) {
        match self.state {
            DeviceState::Receive { address_phase } if self.bits == 8 => {
                let byte = self.shift;
                self.shift = 0;
                self.bits = 0;
                if address_phase {
                    self.address_byte(byte);
                } else {
                    self.data_byte(byte);
                }
            }
            DeviceState::AckOut { transmit } => {
                self.drive_low = false;
                if transmit {
                    self.load_next();
                } else {
                    self.state = DeviceState::Receive {
                        address_phase: false,
                    };
                    self.shift = 0;
                    self.bits = 0;
                }
            }
            DeviceState::Transmit { byte, bit } => {
                let next = bit + 1;
                if next < 8 {
                    self.drive_low = (byte >> (7 - next)) & 1 == 0;
                    self.state = DeviceState::Transmit { byte, bit: next };
                } else {
                    self.drive_low = false;
                    self.master_acked = false;
                    self.state = DeviceState::MasterAck;
                }
            }
            DeviceState::MasterAck => {
                if self.master_acked {
                    self.load_next();
                } else {
                    self.drive_low = false;
                    self.state = DeviceState::Idle;
                }
            }
            _ => {}
        }
    }

    fn address_byte(&mut self, byte: u8) {
        if byte >> 1 != self.address {
            self.state = DeviceState::Idle;
            return;
        }
        if self.busy_for > 0 {
            self.busy_for -= 1;
            self.state = DeviceState::Idle;
            return;
        }
        let read = byte & 1 == 1;
        if !read {
            self.data_index = 0;
            self.pointer_pending = self.pointer_bytes;
            if self.pointer_pending > 0 {
                self.pointer = 0;
            }
        }
        self.drive_low = true;
        self.state = DeviceState::AckOut { transmit: read };
    }

    fn data_byte(&mut self, byte: u8) {
        let index = self.data_index;
        self.data_index += 1;
        if self.nack_from.is_some_and(|k| index >= k) {
            self.state = DeviceState::Idle;
            return;
        }
        self.received.push(byte);
        if self.pointer_pending > 0 {
            self.pointer = (self.pointer << 8) | byte as u32;
            self.pointer_pending -= 1;
        } else {
            let cell = self.cell(self.pointer);
            self.memory[cell] = byte;
            self.pointer = self.pointer.wrapping_add(1);
        }
        self.drive_low = true;
        self.state = DeviceState::AckOut { transmit: false };
    }
}

struct SimState {
    pins: [MasterPin; 2],
    external_pullups: bool,
    held_low: [bool; 2],
    devices: Vec<SimDevice>,
    levels: [bool; 2],
    interrupts_enabled: bool,
    mask_count: u32,
    unmasked_mode_changes: u32,
    contention: u32,
    starts: u32,
    stops: u32,
    elapsed_ns: u64,
    trace: Vec<(bool, bool)>,
}

impl SimState {
    fn resolve(&self, i: usize) -> bool {
        let pin = self.pins[i];
        let master_low = pin.mode == PinMode::Output && !pin.latch;
        let master_high = pin.mode == PinMode::Output && pin.latch;
        let device_low = i == 0 && self.devices.iter().any(|d| d.drive_low);
        if master_low || device_low || self.held_low[i] {
            false
        } else if master_high {
            true
        } else {
            // A floating line without pull-up reads low
            self.external_pullups || pin.mode == PinMode::InputPullup
        }
    }

    fn check_contention(&mut self) {
        for i in 0..2 {
            let pin = self.pins[i];
            let device_low = i == 0 && self.devices.iter().any(|d| d.drive_low);
            if pin.mode == PinMode::Output && pin.latch && (device_low || self.held_low[i]) {
                self.contention += 1;
            }
        }
    }

    fn settle(&mut self) {
        self.check_contention();
        let sda = self.resolve(0);
        let scl = self.resolve(1);
        let [prev_sda, prev_scl] = self.levels;

        if scl != prev_scl {
            for device in self.devices.iter_mut() {
                if scl {
                    device.scl_rise(sda);
                } else {
                    device.scl_fall();
                }
            }
        } else if sda != prev_sda && scl {
            if sda {
                self.stops += 1;
                self.devices.iter_mut().for_each(SimDevice::stop);
            } else {
                self.starts += 1;
                self.devices.iter_mut().for_each(SimDevice::start);
            }
        }

        let levels = [self.resolve(0), self.resolve(1)];
        if levels != self.levels {
            self.levels = levels;
            self.trace.push((levels[0], levels[1]));
        }
    }
}

/// Handle to a simulated bus
#[derive(Clone)]
pub struct Sim {
    state: Rc<RefCell<SimState>>,
}

impl Sim {
    /// Idle bus with external pull-ups and no devices
    pub fn new() -> Self {
        let mut state = SimState {
            pins: [MasterPin {
                mode: PinMode::Input,
                latch: false,
            }; 2],
            external_pullups: true,
            held_low: [false; 2],
            devices: Vec::new(),
            levels: [true; 2],
            interrupts_enabled: true,
            mask_count: 0,
            unmasked_mode_changes: 0,
            contention: 0,
            starts: 0,
            stops: 0,
            elapsed_ns: 0,
            trace: Vec::new(),
        };
        state.levels = [state.resolve(0), state.resolve(1)];
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn with_device(self, device: SimDevice) -> Self {
        self.state.borrow_mut().devices.push(device);
        self
    }

    pub fn without_pullups(self) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.external_pullups = false;
            state.settle();
        }
        self
    }

    pub fn pins(&self) -> SimPins {
        SimPins(self.clone())
    }

    pub fn irq(&self) -> SimIrq {
        SimIrq(self.clone())
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay(self.clone())
    }

    /// Hold a line low from outside the master
    pub fn hold_low(&self, pin: u8, held: bool) {
        let mut state = self.state.borrow_mut();
        state.held_low[index(pin)] = held;
        state.settle();
    }

    pub fn mode(&self, pin: u8) -> PinMode {
        self.state.borrow().pins[index(pin)].mode
    }

    pub fn latch(&self, pin: u8) -> bool {
        self.state.borrow().pins[index(pin)].latch
    }

    pub fn level(&self, pin: u8) -> bool {
        self.state.borrow().levels[index(pin)]
    }

    pub fn device(&self, i: usize) -> SimDevice {
        self.state.borrow().devices[i].clone()
    }

    pub fn starts(&self) -> u32 {
        self.state.borrow().starts
    }

    pub fn stops(&self) -> u32 {
        self.state.borrow().stops
    }

    pub fn contention(&self) -> u32 {
        self.state.borrow().contention
    }

    pub fn mask_count(&self) -> u32 {
        self.state.borrow().mask_count
    }

    pub fn unmasked_mode_changes(&self) -> u32 {
        self.state.borrow().unmasked_mode_changes
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.state.borrow().interrupts_enabled
    }

    pub fn elapsed_ns(&self) -> u64 {
        self.state.borrow().elapsed_ns
    }

    /// Line levels `(sda, scl)` after every change
    pub fn trace(&self) -> Vec<(bool, bool)> {
        self.state.borrow().trace.clone()
    }

    /// Forget recorded events, keeping line and device state
    pub fn reset_counters(&self) {
        let mut state = self.state.borrow_mut();
        state.starts = 0;
        state.stops = 0;
        state.mask_count = 0;
        state.elapsed_ns = 0;
        state.trace.clear();
    }
}

pub struct SimPins(Sim);

impl PinControl for SimPins {
    type Pin = u8;

    fn set_pin_mode(&mut self, pin: u8, mode: PinMode) {
        let mut state = self.0.state.borrow_mut();
        if state.interrupts_enabled {
            state.unmasked_mode_changes += 1;
        }
        let slot = &mut state.pins[index(pin)];
        slot.mode = mode;
        match mode {
            PinMode::InputPullup => slot.latch = true,
            PinMode::Input => slot.latch = false,
            PinMode::Output => {}
        }
        state.settle();
    }

    fn write_output(&mut self, pin: u8, high: bool) {
        let mut state = self.0.state.borrow_mut();
        state.pins[index(pin)].latch = high;
        state.settle();
    }

    fn read_input(&mut self, pin: u8) -> bool {
        self.0.state.borrow().levels[index(pin)]
    }
}

pub struct SimIrq(Sim);

impl InterruptControl for SimIrq {
    fn mask(&mut self) -> bool {
        let mut state = self.0.state.borrow_mut();
        state.mask_count += 1;
        let was = state.interrupts_enabled;
        state.interrupts_enabled = false;
        was
    }

    fn restore(&mut self, was_enabled: bool) {
        self.0.state.borrow_mut().interrupts_enabled = was_enabled;
    }
}

pub struct SimDelay(Sim);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.state.borrow_mut().elapsed_ns += ns as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_bus_is_high() {
        let sim = Sim::new();
        assert!(sim.level(SDA));
        assert!(sim.level(SCL));
    }

    #[test]
    fn test_floating_line_without_pullups_reads_low() {
        let sim = Sim::new().without_pullups();
        assert!(!sim.level(SDA));

        let mut pins = sim.pins();
        pins.set_pin_mode(SDA, PinMode::InputPullup);
        assert!(pins.read_input(SDA));
    }

    #[test]
    fn test_start_and_stop_detection() {
        let sim = Sim::new();
        let mut pins = sim.pins();
        pins.set_pin_mode(SDA, PinMode::Output);
        assert_eq!(sim.starts(), 1);
        pins.set_pin_mode(SDA, PinMode::Input);
        assert_eq!(sim.stops(), 1);
    }
}
