#![no_std]
//! Peripheral drivers for the ESP32-S3 1.28" LCD box
//!
//! This library provides blocking register-level access to the I2C
//! peripherals on the board: the CST816D capacitive touch controller and
//! the control port of the ES8311 audio codec.

/// CST816D capacitive touch controller driver.
pub mod cst816d;

/// ES8311 audio codec control port.
pub mod es8311;

mod register;

pub use register::RegisterDevice;

#[cfg(test)]
extern crate std;

/// Register-file I2C bus for host tests of these drivers and their users.
#[cfg(any(test, feature = "fake"))]
pub mod fake {
    use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};

    /// Reads return `regs[addr..]`, writes patch `regs`.
    #[derive(Debug, Clone)]
    pub struct FakeI2c {
        pub address: u8,
        pub regs: [u8; 256],
        pub fail: bool,
    }

    impl FakeI2c {
        pub fn new(address: u8) -> Self {
            Self {
                address,
                regs: [0; 256],
                fail: false,
            }
        }
    }

    impl ErrorType for FakeI2c {
        type Error = ErrorKind;
    }

    impl I2c for FakeI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail || address != self.address {
                return Err(ErrorKind::Other);
            }
            let mut pointer = 0usize;
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        if let Some((reg, data)) = bytes.split_first() {
                            pointer = *reg as usize;
                            for (i, b) in data.iter().enumerate() {
                                self.regs[(pointer + i) & 0xFF] = *b;
                            }
                        }
                    }
                    Operation::Read(buf) => {
                        for (i, b) in buf.iter_mut().enumerate() {
                            *b = self.regs[(pointer + i) & 0xFF];
                        }
                    }
                }
            }
            Ok(())
        }
    }
}
