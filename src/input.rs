//! Debounced push buttons.
//!
//! Buttons are active-low inputs with pull-ups. A raw level change only
//! becomes an event after it has held steady for the debounce window;
//! `Pressed` fires once per clean transition and `Held` reports the running
//! hold duration on every later poll.

use core::convert::Infallible;

use embedded_hal::digital::InputPin;

use crate::DEBOUNCE_MS;

/// Logical role of a button, decoupled from its wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Set,
    Left,
    Right,
    Increment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Clean release-to-press transition.
    Pressed,
    /// Still pressed; carries the total hold time in ms.
    Held(u32),
}

pub struct DebouncedButton<P> {
    pin: P,
    stable_pressed: bool,
    last_raw: bool,
    last_change_ms: u32,
    press_start_ms: u32,
}

impl<P: InputPin<Error = Infallible>> DebouncedButton<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            stable_pressed: false,
            last_raw: false,
            last_change_ms: 0,
            press_start_ms: 0,
        }
    }

    /// Samples the pin. Call once per control-loop tick.
    pub fn poll(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        let raw = self.pin.is_low().unwrap_or(false);

        if raw != self.last_raw {
            self.last_raw = raw;
            self.last_change_ms = now_ms;
        }

        if raw != self.stable_pressed
            && now_ms.wrapping_sub(self.last_change_ms) >= DEBOUNCE_MS
        {
            self.stable_pressed = raw;
            if raw {
                self.press_start_ms = now_ms;
                return Some(ButtonEvent::Pressed);
            }
        }

        if self.stable_pressed {
            return Some(ButtonEvent::Held(now_ms.wrapping_sub(self.press_start_ms)));
        }
        None
    }
}

/// The four menu buttons, polled together.
pub struct ButtonPad<P> {
    set: DebouncedButton<P>,
    left: DebouncedButton<P>,
    right: DebouncedButton<P>,
    increment: DebouncedButton<P>,
}

impl<P: InputPin<Error = Infallible>> ButtonPad<P> {
    pub fn new(set: P, left: P, right: P, increment: P) -> Self {
        Self {
            set: DebouncedButton::new(set),
            left: DebouncedButton::new(left),
            right: DebouncedButton::new(right),
            increment: DebouncedButton::new(increment),
        }
    }

    /// Polls every button and returns whatever fired this tick.
    pub fn poll(&mut self, now_ms: u32) -> heapless::Vec<(Button, ButtonEvent), 4> {
        let mut events = heapless::Vec::new();
        for (role, button) in [
            (Button::Set, &mut self.set),
            (Button::Left, &mut self.left),
            (Button::Right, &mut self.right),
            (Button::Increment, &mut self.increment),
        ] {
            if let Some(event) = button.poll(now_ms) {
                // Four slots for four buttons; push cannot overflow
                let _ = events.push((role, event));
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct FakePin {
        low: Rc<Cell<bool>>,
    }

    impl FakePin {
        fn released() -> Self {
            Self {
                low: Rc::new(Cell::new(false)),
            }
        }

        fn press(&self) {
            self.low.set(true);
        }

        fn release(&self) {
            self.low.set(false);
        }
    }

    impl embedded_hal::digital::ErrorType for FakePin {
        type Error = Infallible;
    }

    impl InputPin for FakePin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.low.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(self.low.get())
        }
    }

    #[test]
    fn pressed_fires_once_per_clean_transition() {
        let pin = FakePin::released();
        let mut button = DebouncedButton::new(pin.clone());

        assert_eq!(button.poll(0), None);

        pin.press();
        assert_eq!(button.poll(10), None); // within the debounce window
        assert_eq!(button.poll(10 + DEBOUNCE_MS), Some(ButtonEvent::Pressed));

        pin.release();
        assert_eq!(button.poll(100), Some(ButtonEvent::Held(70))); // raw change not yet stable
        assert_eq!(button.poll(100 + DEBOUNCE_MS), None);

        pin.press();
        assert_eq!(button.poll(200), None);
        assert_eq!(button.poll(200 + DEBOUNCE_MS), Some(ButtonEvent::Pressed));
    }

    #[test]
    fn held_reports_running_duration() {
        let pin = FakePin::released();
        let mut button = DebouncedButton::new(pin.clone());

        pin.press();
        button.poll(0);
        assert_eq!(button.poll(DEBOUNCE_MS), Some(ButtonEvent::Pressed));
        assert_eq!(
            button.poll(DEBOUNCE_MS + 250),
            Some(ButtonEvent::Held(250))
        );
        assert_eq!(
            button.poll(DEBOUNCE_MS + 600),
            Some(ButtonEvent::Held(600))
        );
    }

    #[test]
    fn contact_bounce_is_filtered() {
        let pin = FakePin::released();
        let mut button = DebouncedButton::new(pin.clone());

        // Chatter faster than the debounce window never fires
        for t in 0..4 {
            pin.press();
            assert_eq!(button.poll(t * 4), None);
            pin.release();
            assert_eq!(button.poll(t * 4 + 2), None);
        }

        pin.press();
        assert_eq!(button.poll(100), None);
        assert_eq!(button.poll(100 + DEBOUNCE_MS), Some(ButtonEvent::Pressed));
    }

    #[test]
    fn pad_reports_role_per_event() {
        let set = FakePin::released();
        let left = FakePin::released();
        let right = FakePin::released();
        let increment = FakePin::released();
        let mut pad = ButtonPad::new(set.clone(), left.clone(), right.clone(), increment.clone());

        assert!(pad.poll(0).is_empty());

        set.press();
        increment.press();
        pad.poll(50);
        let events = pad.poll(50 + DEBOUNCE_MS);
        let expected = [
            (Button::Set, ButtonEvent::Pressed),
            (Button::Increment, ButtonEvent::Pressed),
        ];
        assert_eq!(events.as_slice(), expected.as_slice());
    }
}
