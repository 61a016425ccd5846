//! Softwire demo firmware
//!
//! Drives a software I2C bus on GPIO4 (SDA) / GPIO5 (SCL) of an RP2040:
//! scans the bus, writes a byte into a 24Cxx EEPROM, waits for the write
//! cycle, and reads it back through both the Wire-style API and the
//! embedded-hal trait.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::Timer;
use embedded_hal::i2c::I2c;
use softwire_hal_rp2040::{new_bus, Rp2040Bus};
use {defmt_rtt as _, panic_probe as _};

/// 24Cxx EEPROM with two-byte word address
const EEPROM_ADDRESS: u8 = 0x50;

/// EEPROM cell used by the demo
const DEMO_CELL: u16 = 0x0010;

/// Interval between bus scans
const SCAN_INTERVAL_S: u64 = 5;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Softwire demo starting...");

    let p = embassy_rp::init(Default::default());
    // Breakout boards usually carry their own pull-ups; assist anyway
    let mut bus: Rp2040Bus<'static> = new_bus(p.PIN_4.into(), p.PIN_5.into(), true);

    while let Err(e) = bus.initialize() {
        error!("I2C init failed: {}", e);
        Timer::after_secs(1).await;
    }
    info!("I2C bus ready");

    eeprom_demo(&mut bus);

    loop {
        let found = scan(&mut bus);
        info!("{} device(s) on the bus", found);
        Timer::after_secs(SCAN_INTERVAL_S).await;
    }
}

/// Probe every non-reserved 7-bit address
fn scan(bus: &mut Rp2040Bus<'static>) -> u8 {
    let mut found = 0;
    for address in 0x08..0x78u8 {
        if bus.probe(address) {
            debug!("device at {=u8:#x}", address);
            found += 1;
        }
    }
    found
}

fn eeprom_demo(bus: &mut Rp2040Bus<'static>) {
    let [hi, lo] = DEMO_CELL.to_be_bytes();

    bus.begin_transmission(EEPROM_ADDRESS);
    bus.write_bytes(&[hi, lo, 0xA5]);
    if let Err(e) = bus.end_transmission() {
        warn!("EEPROM write failed: {}", e);
        return;
    }

    // The EEPROM ignores its address until the write cycle completes
    bus.begin_transmission_wait(EEPROM_ADDRESS);
    if let Err(e) = bus.end_transmission() {
        warn!("EEPROM still busy: {}", e);
        return;
    }

    if bus.request_register(EEPROM_ADDRESS, 1, u32::from(DEMO_CELL), 2, true) == 1 {
        if let Some(value) = bus.read() {
            info!("Wire read back {=u8:#x}", value);
        }
    } else {
        warn!("Wire read failed: {}", bus.last_error());
    }

    let mut buf = [0u8; 1];
    match I2c::write_read(bus, EEPROM_ADDRESS, &[hi, lo], &mut buf) {
        Ok(()) => info!("embedded-hal read back {=u8:#x}", buf[0]),
        Err(e) => warn!("embedded-hal read failed: {}", e),
    }
}
