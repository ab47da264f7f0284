/*
 * Test utilities and fake devices for nctprobe
 *
 * This module provides an in-memory register map that stands in for a real
 * SMBus device, plus builders for common chip states.
 */

#[cfg(test)]
pub mod test_utils {
    use std::collections::{HashMap, HashSet};
    use std::io;

    use crate::chip::{regs, NCT7802};
    use crate::transport::RegisterTransport;

    /// In-memory register file. Unset registers read as 0.
    #[derive(Debug, Default, Clone)]
    pub struct FakeChip {
        pub registers: HashMap<u8, u8>,
        pub failing: HashSet<u8>,
        pub reads: Vec<u8>,
        pub writes: Vec<(u8, u8)>,
    }

    impl FakeChip {
        pub fn new() -> Self {
            Self::default()
        }

        /// A chip that passes every detection step
        pub fn nct7802() -> Self {
            Self::new()
                .with(regs::BANK, 0x00)
                .with(regs::VENDOR_ID, NCT7802.vendor_id)
                .with(regs::CHIP_ID, NCT7802.chip_id)
                .with(regs::VERSION_ID, 0x21)
                .with(regs::TEMP_LSB, 0x00)
                .with(regs::TEMP_PECI_LSB, 0x00)
                .with(regs::VOLTAGE_LOW, 0x00)
        }

        /// Detected chip with every channel populated
        pub fn populated_nct7802() -> Self {
            Self::nct7802()
                // temperatures
                .with(0x01, 45)
                .with(0x02, 38)
                .with(0x03, 40)
                .with(0x04, 33)
                .with(0x06, 0x64)
                .with(0x07, 52)
                .with(regs::TEMP_PECI_LSB, 0x40)
                // voltages
                .with(0x09, 0xCE)
                .with(0x0A, 0x6E)
                .with(0x0C, 0x40)
                .with(0x0D, 0x40)
                .with(0x0E, 0xD1)
        }

        pub fn with(mut self, register: u8, value: u8) -> Self {
            self.registers.insert(register, value);
            self
        }

        pub fn failing(mut self, register: u8) -> Self {
            self.failing.insert(register);
            self
        }

        pub fn read_count(&self, register: u8) -> usize {
            self.reads.iter().filter(|r| **r == register).count()
        }
    }

    impl RegisterTransport for FakeChip {
        fn read_byte(&mut self, register: u8) -> io::Result<u8> {
            self.reads.push(register);
            if self.failing.contains(&register) {
                return Err(io::Error::new(io::ErrorKind::Other, "nak"));
            }
            Ok(self.registers.get(&register).copied().unwrap_or(0))
        }

        fn write_byte(&mut self, register: u8, value: u8) -> io::Result<()> {
            if self.failing.contains(&register) {
                return Err(io::Error::new(io::ErrorKind::Other, "nak"));
            }
            self.writes.push((register, value));
            self.registers.insert(register, value);
            Ok(())
        }
    }

    /// Asserts that two floating point numbers are approximately equal
    pub fn assert_approx_eq(a: f64, b: f64, tolerance: f64) {
        assert!(
            (a - b).abs() < tolerance,
            "Values {} and {} are not approximately equal (tolerance: {})",
            a, b, tolerance
        );
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::*;
    use crate::chip::regs;
    use crate::transport::RegisterTransport;

    #[test]
    fn test_fake_chip_defaults_to_zero() {
        let mut chip = FakeChip::new();
        assert_eq!(chip.read_byte(0x42).unwrap(), 0);
        assert_eq!(chip.read_count(0x42), 1);
    }

    #[test]
    fn test_fake_chip_failing_register() {
        let mut chip = FakeChip::nct7802().failing(regs::VENDOR_ID);
        assert!(chip.read_byte(regs::VENDOR_ID).is_err());
        assert!(chip.write_byte(regs::VENDOR_ID, 0).is_err());
        assert!(chip.writes.is_empty());
    }

    #[test]
    fn test_fake_chip_records_writes() {
        let mut chip = FakeChip::new();
        chip.write_byte(regs::MODE, 0x3F).unwrap();
        assert_eq!(chip.writes, vec![(regs::MODE, 0x3F)]);
        assert_eq!(chip.read_byte(regs::MODE).unwrap(), 0x3F);
    }

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.001, 0.01);
        assert_approx_eq(3.296, 3.2959, 0.001);
    }

    #[test]
    #[should_panic]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq(1.0, 1.1, 0.01);
    }
}
