//! Buffered character screen.
//!
//! Writes land in a row-major byte grid; `flush` pushes the whole grid to the
//! driver and re-asserts the hardware cursor. Keeping the grid in RAM is what
//! makes the menu's snapshot/restore cheap.

use display_interface::DisplayError;

pub const COLS: usize = 16;
pub const ROWS: usize = 2;
pub const SIZE: usize = COLS * ROWS;

/// Driver-side contract for a character display.
pub trait CharDisplay {
    /// Moves the data cursor to `(col, row)`.
    fn set_position(&mut self, col: u8, row: u8) -> Result<(), DisplayError>;
    /// Writes raw character bytes at the data cursor.
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), DisplayError>;
    /// Shows or hides the hardware cursor.
    fn cursor_visible(&mut self, visible: bool) -> Result<(), DisplayError>;
}

pub struct Screen<D> {
    driver: D,
    buffer: [u8; SIZE],
    // write position for the next `write_str`
    col: usize,
    row: usize,
    // hardware cursor, tracked separately from the write position
    cursor_col: u8,
    cursor_row: u8,
    cursor_on: bool,
}

impl<D: CharDisplay> Screen<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            buffer: [b' '; SIZE],
            col: 0,
            row: 0,
            cursor_col: 0,
            cursor_row: 0,
            cursor_on: false,
        }
    }

    /// Blanks the grid and homes the write position. Takes effect on the
    /// device at the next `flush`.
    pub fn clear(&mut self) {
        self.buffer = [b' '; SIZE];
        self.col = 0;
        self.row = 0;
    }

    /// Moves the write position; out-of-range coordinates are clamped to the
    /// grid edge.
    pub fn set_pos(&mut self, col: usize, row: usize) {
        self.col = col.min(COLS);
        self.row = row.min(ROWS - 1);
    }

    /// Copies `text` into the current row, clipped at the row end.
    pub fn write_str(&mut self, text: &str) {
        self.write_bytes(text.as_bytes());
    }

    /// Copies raw character bytes into the current row, clipped at the row
    /// end.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if self.col >= COLS {
                break;
            }
            self.buffer[self.row * COLS + self.col] = byte;
            self.col += 1;
        }
    }

    /// Pushes the full grid to the driver, then re-asserts the hardware
    /// cursor so a redraw never leaves it parked at the end of a row.
    pub fn flush(&mut self) -> Result<(), DisplayError> {
        for row in 0..ROWS {
            self.driver.set_position(0, row as u8)?;
            self.driver
                .write_bytes(&self.buffer[row * COLS..(row + 1) * COLS])?;
        }
        self.driver.set_position(self.cursor_col, self.cursor_row)
    }

    pub fn cursor_on(&mut self) -> Result<(), DisplayError> {
        self.cursor_on = true;
        self.driver.cursor_visible(true)
    }

    pub fn cursor_off(&mut self) -> Result<(), DisplayError> {
        self.cursor_on = false;
        self.driver.cursor_visible(false)
    }

    /// Places the hardware cursor, independent of the write position.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        self.cursor_col = col.min(COLS as u8 - 1);
        self.cursor_row = row.min(ROWS as u8 - 1);
        self.driver.set_position(self.cursor_col, self.cursor_row)
    }

    /// Copies the visible grid into `out`.
    pub fn save(&self, out: &mut [u8; SIZE]) {
        *out = self.buffer;
    }

    /// Replaces the grid with a previously saved copy. Takes effect on the
    /// device at the next `flush`.
    pub fn restore(&mut self, saved: &[u8; SIZE]) {
        self.buffer = *saved;
    }

    pub fn contents(&self) -> &[u8; SIZE] {
        &self.buffer
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;

    /// Test double that applies writes to its own grid and records cursor
    /// traffic, standing in for a real LCD.
    pub(crate) struct RecordingDisplay {
        pub grid: [u8; SIZE],
        pub col: usize,
        pub row: usize,
        pub cursor_visible: bool,
        pub position_log: std::vec::Vec<(u8, u8)>,
    }

    impl RecordingDisplay {
        pub fn new() -> Self {
            Self {
                grid: [b' '; SIZE],
                col: 0,
                row: 0,
                cursor_visible: false,
                position_log: std::vec::Vec::new(),
            }
        }

        pub fn row_text(&self, row: usize) -> &str {
            core::str::from_utf8(&self.grid[row * COLS..(row + 1) * COLS]).unwrap()
        }
    }

    impl CharDisplay for RecordingDisplay {
        fn set_position(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
            self.col = col as usize;
            self.row = row as usize;
            self.position_log.push((col, row));
            Ok(())
        }

        fn write_bytes(&mut self, data: &[u8]) -> Result<(), DisplayError> {
            for &byte in data {
                if self.col < COLS && self.row < ROWS {
                    self.grid[self.row * COLS + self.col] = byte;
                    self.col += 1;
                }
            }
            Ok(())
        }

        fn cursor_visible(&mut self, visible: bool) -> Result<(), DisplayError> {
            self.cursor_visible = visible;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::RecordingDisplay;
    use super::*;

    #[test]
    fn writes_reach_device_only_on_flush() {
        let mut screen = Screen::new(RecordingDisplay::new());
        screen.set_pos(0, 0);
        screen.write_str("Conductivity");
        assert_eq!(screen.driver().row_text(0), "                ");

        screen.flush().unwrap();
        assert_eq!(screen.driver().row_text(0), "Conductivity    ");
    }

    #[test]
    fn writes_clip_at_row_end() {
        let mut screen = Screen::new(RecordingDisplay::new());
        screen.set_pos(12, 1);
        screen.write_str("overflowing");
        screen.flush().unwrap();

        assert_eq!(screen.driver().row_text(1), "            over");
        assert_eq!(screen.driver().row_text(0), "                ");
    }

    #[test]
    fn snapshot_round_trips_the_grid() {
        let mut screen = Screen::new(RecordingDisplay::new());
        screen.write_str("T core:  312.5");
        screen.set_pos(0, 1);
        screen.write_str("T skin:  250.0");

        let mut saved = [0u8; SIZE];
        screen.save(&mut saved);

        screen.clear();
        screen.write_str("Density");
        screen.restore(&saved);
        screen.flush().unwrap();

        assert_eq!(screen.driver().row_text(0), "T core:  312.5  ");
        assert_eq!(screen.driver().row_text(1), "T skin:  250.0  ");
    }

    #[test]
    fn flush_reasserts_hardware_cursor() {
        let mut screen = Screen::new(RecordingDisplay::new());
        screen.set_cursor(5, 1).unwrap();
        screen.write_str("x");
        screen.flush().unwrap();

        assert_eq!(screen.driver().position_log.last(), Some(&(5, 1)));
    }

    #[test]
    fn cursor_visibility_is_forwarded() {
        let mut screen = Screen::new(RecordingDisplay::new());
        screen.cursor_on().unwrap();
        assert!(screen.driver().cursor_visible);
        screen.cursor_off().unwrap();
        assert!(!screen.driver().cursor_visible);
    }
}
