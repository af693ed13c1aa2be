#![cfg_attr(not(test), no_std)]

pub mod banded;
pub mod input;
pub mod lcd;
pub mod menu;
pub mod mesh;
pub mod params;
pub mod quadrature;
pub mod screen;

pub const N_NODES: usize = 16; // Radial nodes in the rod model
pub const ELEMENT_SIZE: f32 = 0.005; // Node spacing (m)
pub const TIME_STEP: f32 = 1.0; // Simulated seconds per solver step
pub const INITIAL_TEMP: f32 = 500.0; // Rod temperature at power-on (degC)
pub const AMBIENT_TEMP: f32 = 20.0; // Still air around the rod (degC)
pub const MENU_POLL_MS: u64 = 50; // Control-loop tick
pub const DEBOUNCE_MS: u32 = 20; // Raw button level must hold this long (ms)
pub const HOLD_REPEAT_MS: u32 = 200; // Minimum spacing between hold auto-repeats (ms)
