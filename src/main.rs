#![no_std]
#![no_main]

use core::fmt::Write as _;

use defmt::*;

use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c;
use embassy_rp::watchdog::Watchdog;
use embassy_time::{Delay, Duration, Instant, Timer};

use {defmt_rtt as _, panic_probe as _};

use radial_heat_rs::input::ButtonPad;
use radial_heat_rs::lcd::Pcf8574Lcd;
use radial_heat_rs::menu::{MenuItem, ParameterMenu};
use radial_heat_rs::mesh::{Liveness, ThermalMesh};
use radial_heat_rs::params::{ParamId, SimParams};
use radial_heat_rs::screen::{CharDisplay, Screen};
use radial_heat_rs::{
    AMBIENT_TEMP, ELEMENT_SIZE, INITIAL_TEMP, MENU_POLL_MS, N_NODES, TIME_STEP,
};

const LCD_ADDRESS: u8 = 0x27;
const WATCHDOG_PERIOD_MS: u64 = 3_000;

const MENU_ITEMS: [MenuItem; 5] = [
    MenuItem {
        label: "Conductivity",
        param: ParamId::Conductivity,
    },
    MenuItem {
        label: "Specific heat",
        param: ParamId::SpecificHeat,
    },
    MenuItem {
        label: "Density",
        param: ParamId::Density,
    },
    MenuItem {
        label: "Alpha air",
        param: ParamId::Convection,
    },
    MenuItem {
        label: "Int. scheme",
        param: ParamId::IntegrationScheme,
    },
];

struct WatchdogFeeder(Watchdog);

impl Liveness for WatchdogFeeder {
    fn reset(&mut self) {
        self.0.feed();
    }
}

fn params_updated() {
    info!("parameters updated");
}

fn draw_readout<D: CharDisplay>(
    screen: &mut Screen<D>,
    mesh: &ThermalMesh<N_NODES>,
) -> Result<(), display_interface::DisplayError> {
    let mut line: heapless::String<16> = heapless::String::new();

    screen.clear();
    let _ = write!(line, "Core {:>8.1}", mesh.nodes[0].t);
    screen.set_pos(0, 0);
    screen.write_str(&line);

    line.clear();
    let _ = write!(line, "Skin {:>8.1}", mesh.nodes[N_NODES - 1].t);
    screen.set_pos(0, 1);
    screen.write_str(&line);

    screen.flush()
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Program start");
    let peripherals = embassy_rp::init(Default::default());

    let mut supervisor = WatchdogFeeder(Watchdog::new(peripherals.WATCHDOG));
    supervisor.0.start(Duration::from_millis(WATCHDOG_PERIOD_MS));

    // Menu buttons, active low against the internal pull-ups
    let mut pad = ButtonPad::new(
        Input::new(peripherals.PIN_10, Pull::Up), // Set
        Input::new(peripherals.PIN_11, Pull::Up), // Left
        Input::new(peripherals.PIN_12, Pull::Up), // Right
        Input::new(peripherals.PIN_13, Pull::Up), // Increment
    );

    // Character LCD behind a PCF8574 backpack on I2C0
    let scl = peripherals.PIN_5;
    let sda = peripherals.PIN_4;
    let bus = i2c::I2c::new_blocking(peripherals.I2C0, scl, sda, i2c::Config::default());
    let mut lcd = Pcf8574Lcd::new(bus, Delay, LCD_ADDRESS);
    if lcd.init().is_err() {
        error!("lcd init failed");
    }
    let mut screen = Screen::new(lcd);

    let mut params = SimParams::default();
    let mut menu = ParameterMenu::new(&MENU_ITEMS);
    menu.on_update(params_updated);

    let mut mesh: ThermalMesh<N_NODES> = ThermalMesh::new();
    unwrap!(mesh.generate(INITIAL_TEMP, ELEMENT_SIZE));
    let r_max = mesh.nodes[N_NODES - 1].r;

    info!("mesh ready, outer radius {} m", r_max);

    loop {
        let now = Instant::now().as_millis() as u32;

        if menu.poll(&mut pad, &mut screen, &mut params, now).is_err() {
            error!("menu rendering fault");
        }

        // The solver stays quiet while the operator edits: a session owns the
        // screen and the parameters must not change mid-assembly
        if !menu.in_session() {
            match mesh.step(TIME_STEP, r_max, AMBIENT_TEMP, &params, &mut supervisor) {
                Ok(()) => {
                    if draw_readout(&mut screen, &mesh).is_err() {
                        error!("readout rendering fault");
                    }
                }
                Err(e) => error!("step rejected: {}", e),
            }
        }

        supervisor.reset();
        Timer::after_millis(MENU_POLL_MS).await;
    }
}
