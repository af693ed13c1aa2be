//! Interactive parameter editing over the character screen.
//!
//! The menu is a resumable state machine: it is either idle or mid-session on
//! one item, and `poll` never blocks, so the host keeps stepping the
//! simulation between menu ticks. Entering a session snapshots the screen;
//! leaving it restores the snapshot byte for byte and then fires the update
//! callback.

use core::convert::Infallible;
use core::fmt::Write as _;

use display_interface::DisplayError;
use embedded_hal::digital::InputPin;
use libm::{ceilf, log10f};

use crate::input::{Button, ButtonEvent, ButtonPad};
use crate::params::{ParamId, SimParams};
use crate::screen::{CharDisplay, Screen, COLS, SIZE};
use crate::HOLD_REPEAT_MS;

/// Rightmost digit-cursor column.
const MAX_DIGITS: u8 = 7;

/// One menu entry: a label and the parameter it binds to. The entry only
/// holds a handle; the parameter storage stays with the host.
#[derive(Debug, Clone, Copy)]
pub struct MenuItem {
    pub label: &'static str,
    pub param: ParamId,
}

#[derive(Debug, Clone)]
pub enum MenuError {
    Display(DisplayError),
    /// The bound value has no decimal logarithm to size the field with.
    ValueNotPositive,
    /// The formatted value does not fit the display row.
    ValueTooWide,
}

impl From<DisplayError> for MenuError {
    fn from(e: DisplayError) -> Self {
        MenuError::Display(e)
    }
}

pub struct ParameterMenu<'a> {
    items: &'a [MenuItem],
    current: Option<usize>,
    position: u8,
    value: [u8; COLS],
    saved_screen: [u8; SIZE],
    // per-button timestamp of the last accepted hold repeat
    last_hold_ms: [u32; 4],
    on_update: Option<fn()>,
}

impl<'a> ParameterMenu<'a> {
    pub fn new(items: &'a [MenuItem]) -> Self {
        Self {
            items,
            current: None,
            position: 0,
            value: [b' '; COLS],
            saved_screen: [b' '; SIZE],
            last_hold_ms: [0; 4],
            on_update: None,
        }
    }

    /// Registers the handler fired once per completed session, after the
    /// screen has been restored.
    pub fn on_update(&mut self, callback: fn()) {
        self.on_update = Some(callback);
    }

    pub fn in_session(&self) -> bool {
        self.current.is_some()
    }

    /// One non-blocking tick: polls the buttons and applies whatever fired.
    pub fn poll<P, D>(
        &mut self,
        pad: &mut ButtonPad<P>,
        screen: &mut Screen<D>,
        params: &mut SimParams,
        now_ms: u32,
    ) -> Result<(), MenuError>
    where
        P: InputPin<Error = Infallible>,
        D: CharDisplay,
    {
        for (button, event) in pad.poll(now_ms) {
            self.handle_event(button, event, screen, params)?;
        }
        Ok(())
    }

    /// Applies one debounced event, auto-repeating holds at most once per
    /// `HOLD_REPEAT_MS` per button.
    pub fn handle_event<D: CharDisplay>(
        &mut self,
        button: Button,
        event: ButtonEvent,
        screen: &mut Screen<D>,
        params: &mut SimParams,
    ) -> Result<(), MenuError> {
        let slot = button as usize;
        match event {
            ButtonEvent::Pressed => {
                self.last_hold_ms[slot] = 0;
                self.handle_press(button, screen, params)
            }
            ButtonEvent::Held(duration) => {
                if duration.wrapping_sub(self.last_hold_ms[slot]) >= HOLD_REPEAT_MS {
                    self.last_hold_ms[slot] = duration;
                    self.handle_press(button, screen, params)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Applies one logical press to the state machine.
    pub fn handle_press<D: CharDisplay>(
        &mut self,
        button: Button,
        screen: &mut Screen<D>,
        params: &mut SimParams,
    ) -> Result<(), MenuError> {
        if self.current.is_none() && button != Button::Set {
            return Ok(());
        }
        match button {
            Button::Set => self.handle_set(screen, params),
            Button::Left => {
                if self.position == 0 {
                    self.position = MAX_DIGITS;
                } else {
                    self.position -= 1;
                }
                screen.set_cursor(self.position, 1)?;
                Ok(())
            }
            Button::Right => {
                if self.position == MAX_DIGITS {
                    self.position = 0;
                } else {
                    self.position += 1;
                }
                screen.set_cursor(self.position, 1)?;
                Ok(())
            }
            Button::Increment => self.handle_increment(screen),
        }
    }

    fn handle_set<D: CharDisplay>(
        &mut self,
        screen: &mut Screen<D>,
        params: &mut SimParams,
    ) -> Result<(), MenuError> {
        self.position = 0;

        if let Some(index) = self.current {
            params.set(self.items[index].param, parse_value(&self.value));
        }

        match self.current {
            None => {
                if self.items.is_empty() {
                    return Ok(());
                }
                screen.cursor_on()?;
                screen.save(&mut self.saved_screen);
                self.current = Some(0);
            }
            Some(index) if index + 1 < self.items.len() => {
                self.current = Some(index + 1);
            }
            Some(_) => {
                self.current = None;
                screen.cursor_off()?;
                screen.restore(&self.saved_screen);
                screen.flush()?;
                if let Some(callback) = self.on_update {
                    callback();
                }
            }
        }

        if let Some(index) = self.current {
            self.render_item(index, screen, params)?;
        }
        Ok(())
    }

    fn handle_increment<D: CharDisplay>(
        &mut self,
        screen: &mut Screen<D>,
    ) -> Result<(), MenuError> {
        let pos = self.position as usize;
        let next_digit = self
            .value
            .get(pos + 1)
            .copied()
            .is_some_and(|c| c.is_ascii_digit());

        match self.value.get(pos).copied() {
            Some(b'.') if next_digit => {
                // The point trades places with the digit to its right
                self.value.swap(pos, pos + 1);
                if self.position < MAX_DIGITS {
                    self.position += 1;
                }
            }
            Some(b'.') => {
                // End of field: every digit shifts right, the point wraps to
                // the front
                self.value[..=pos].rotate_right(1);
                self.position = 0;
            }
            Some(c) if c.is_ascii_digit() => {
                self.value[pos] = if c == b'9' { b'0' } else { c + 1 };
            }
            _ => {}
        }

        self.render_value(screen)
    }

    fn render_item<D: CharDisplay>(
        &mut self,
        index: usize,
        screen: &mut Screen<D>,
        params: &SimParams,
    ) -> Result<(), MenuError> {
        let item = &self.items[index];
        screen.clear();
        screen.set_pos(0, 0);
        screen.write_str(item.label);
        self.fill_value_buffer(params.get(item.param))?;
        self.render_value(screen)
    }

    fn render_value<D: CharDisplay>(
        &mut self,
        screen: &mut Screen<D>,
    ) -> Result<(), MenuError> {
        screen.set_pos(0, 1);
        screen.write_bytes(&self.value);
        screen.flush()?;
        screen.set_cursor(self.position, 1)?;
        Ok(())
    }

    /// Formats `value` with 7 significant digits: the integer part claims its
    /// columns first and the fractional precision gets the rest.
    fn fill_value_buffer(&mut self, value: f32) -> Result<(), MenuError> {
        if !(value > 0.0) {
            return Err(MenuError::ValueNotPositive);
        }

        let mut digits = ceilf(log10f(value)) as i32;
        if digits < 0 {
            digits = 0;
        }
        let mut precision = MAX_DIGITS as i32 - digits;
        if precision < 0 {
            precision = 0;
        }

        let mut text: heapless::String<COLS> = heapless::String::new();
        write!(
            text,
            "{:>width$.prec$}",
            value,
            width = MAX_DIGITS as usize,
            prec = precision as usize
        )
        .map_err(|_| MenuError::ValueTooWide)?;

        self.value = [b' '; COLS];
        self.value[..text.len()].copy_from_slice(text.as_bytes());
        Ok(())
    }

    #[cfg(test)]
    fn value_text(&self) -> &str {
        core::str::from_utf8(&self.value).unwrap()
    }
}

/// Longest numeric prefix of the buffer, or zero. Leading spaces are skipped;
/// anything after the number (padding, stray edits) is ignored.
fn parse_value(buffer: &[u8]) -> f32 {
    let mut start = 0;
    while start < buffer.len() && buffer[start] == b' ' {
        start += 1;
    }

    let digits = &buffer[start..];
    let mut end = 0;
    if matches!(digits.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_point = false;
    while end < digits.len() {
        match digits[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_point => seen_point = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return 0.0;
    }

    core::str::from_utf8(&digits[..end])
        .ok()
        .and_then(|text| text.parse::<f32>().ok())
        .unwrap_or(0.0)
}
