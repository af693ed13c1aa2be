//! HD44780 character LCD behind a PCF8574 I2C backpack.
//!
//! The expander maps P0..P3 to RS/RW/EN/backlight and P4..P7 to the high data
//! nibble, so every byte reaches the controller as two strobed nibbles.

use display_interface::DisplayError;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::screen::CharDisplay;

const RS_DATA: u8 = 0x01; // Register select (0 = instruction, 1 = data)
const ENABLE: u8 = 0x04; // Falling edge latches the nibble
const BACKLIGHT: u8 = 0x08;

// DDRAM start address per display row
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

// Display-control bits (0x08 base)
const DISPLAY_ON: u8 = 0x04;
const CURSOR_ON: u8 = 0x02;

pub struct Pcf8574Lcd<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    cursor: bool,
}

impl<I2C, D> Pcf8574Lcd<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Common backpack address is 0x27 (0x3F for the A-variant).
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            cursor: false,
        }
    }

    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(50); // Power-on settle before the controller accepts anything
        self.write_nibble(0x30, 0)?; // Reset by instruction, first of three
        self.delay.delay_ms(5);
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(150);
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(150);
        self.write_nibble(0x20, 0)?; // Switch to 4-bit interface
        self.delay.delay_us(150);

        self.command(0x28)?; // Function set (4-bit, 2 lines, 5x8 font)
        self.command(0x08)?; // Display off during setup
        self.command(0x01)?; // Clear display
        self.delay.delay_ms(2); // Clear needs the long instruction time
        self.command(0x06)?; // Entry mode (increment, no shift)
        self.display_control()?;
        Ok(())
    }

    fn display_control(&mut self) -> Result<(), DisplayError> {
        let cursor = if self.cursor { CURSOR_ON } else { 0 };
        self.command(0x08 | DISPLAY_ON | cursor)
    }

    fn command(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.write_byte(byte, 0)
    }

    fn write_byte(&mut self, byte: u8, flags: u8) -> Result<(), DisplayError> {
        self.write_nibble(byte & 0xF0, flags)?;
        self.write_nibble(byte << 4, flags)?;
        self.delay.delay_us(50); // Standard instruction execution time
        Ok(())
    }

    fn write_nibble(&mut self, nibble: u8, flags: u8) -> Result<(), DisplayError> {
        let frame = nibble | flags | BACKLIGHT;
        self.i2c
            .write(self.address, &[frame | ENABLE])
            .map_err(|_| DisplayError::BusWriteError)?;
        self.i2c
            .write(self.address, &[frame])
            .map_err(|_| DisplayError::BusWriteError)?;
        Ok(())
    }
}

impl<I2C, D> CharDisplay for Pcf8574Lcd<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn set_position(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        let row = (row as usize).min(ROW_OFFSETS.len() - 1);
        self.command(0x80 | (ROW_OFFSETS[row] + col))
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        for &byte in data {
            self.write_byte(byte, RS_DATA)?;
        }
        Ok(())
    }

    fn cursor_visible(&mut self, visible: bool) -> Result<(), DisplayError> {
        self.cursor = visible;
        self.display_control()
    }
}
