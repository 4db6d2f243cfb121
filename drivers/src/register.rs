use embedded_hal::i2c::I2c;

/// Register-addressed I2C peripheral at a fixed slave address.
#[derive(Debug)]
pub struct RegisterDevice<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> RegisterDevice<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Writes `buffer[0]` as the register address followed by the payload.
    pub fn write_register(&mut self, buffer: &[u8]) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, buffer)
    }

    pub fn read_register(&mut self, register: u8) -> Result<u8, I2C::Error> {
        let mut data = [0u8; 1];
        self.i2c.write_read(self.address, &[register], &mut data)?;
        Ok(data[0])
    }

    pub fn read_register_buffer(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), I2C::Error> {
        self.i2c.write_read(self.address, &[register], buffer)
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}
