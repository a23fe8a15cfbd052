//! ESP32-C3 SuperMini box joint jig controller.
//!
//! This is the main entry point for the physical jig. It runs a 50Hz loop
//! that:
//! - Polls the four operator buttons
//! - Starts, advances or aborts the cutting run
//! - Drives the lead-screw stepper one bounded move per advance press
//! - Logs the run status over the serial console
//!
//! Settings are loaded from NVS at boot; unreadable settings are replaced
//! with the defaults.
//!
//! # Build
//!
//! ```bash
//! cargo build --release --features esp32 --bin esp32_main
//! ```

use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::log::EspLogger;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use rs_boxjig::config::{load_configuration, save_configuration};
use rs_boxjig::hal::esp32::{new_carriage, Esp32Controls, Esp32NvsStore};
use rs_boxjig::hal::LogDisplay;
use rs_boxjig::{AdvanceOutcome, CutState, Jig, PollEvent};
use std::thread;
use std::time::Duration;

/// Main loop interval in milliseconds (50Hz = 20ms)
const LOOP_INTERVAL_MS: u64 = 20;

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    EspLogger::initialize_default();

    println!();
    println!("================================");
    println!("  rs-boxjig SuperMini Controller");
    println!("================================");
    println!();

    // =========================================================================
    // Configuration (NVS)
    // =========================================================================
    let mut store = Esp32NvsStore::new(EspDefaultNvsPartition::take()?)?;
    let config = match load_configuration(&mut store) {
        Ok(config) => config,
        Err(e) => {
            println!("[WARN] Stored settings unusable ({}), restoring defaults", e);
            let config = Default::default();
            if let Err(e) = save_configuration(&mut store, &config) {
                println!("[WARN] Could not write settings: {}", e);
            }
            config
        }
    };
    println!(
        "[OK] Settings: kerf {} slop {} max advance {}",
        config.joint.kerf, config.joint.slop, config.joint.max_advance
    );

    let peripherals = Peripherals::take()?;

    // =========================================================================
    // Initialize Carriage (step/dir on GPIO2/3, limit on GPIO4)
    // =========================================================================
    let carriage = new_carriage(
        peripherals.pins.gpio2.into(),
        peripherals.pins.gpio3.into(),
        peripherals.pins.gpio4.into(),
        &config.motion,
    )?;
    println!("[OK] Carriage initialized (GPIO2/3, limit GPIO4)");

    // =========================================================================
    // Initialize Buttons (GPIO5/6/7/10)
    // =========================================================================
    let controls = Esp32Controls::new(
        peripherals.pins.gpio5.into(),
        peripherals.pins.gpio6.into(),
        peripherals.pins.gpio7.into(),
        peripherals.pins.gpio10.into(),
    )?;
    println!("[OK] Buttons initialized (GPIO5/6/7/10)");

    // =========================================================================
    // Initialize Jig
    // =========================================================================
    let mut jig = Jig::new(carriage, controls, LogDisplay::new(), &config);
    let _ = jig.init();

    println!();
    println!("Selected board: {}", jig.piece().as_str());
    println!("Controls:");
    println!("  ADVANCE:   Start run / next pass / relocate");
    println!("  BACK:      Abort run / switch board (idle only)");
    println!("  STEP UP:   Jog toward blade (idle only)");
    println!("  STEP DOWN: Jog away (idle only)");
    println!();
    println!("Starting control loop (50Hz)...");
    println!();

    // =========================================================================
    // Main Control Loop (50Hz)
    // =========================================================================
    loop {
        match jig.poll() {
            Ok(PollEvent::Advanced(AdvanceOutcome::Relocated { .. }))
                if jig.state() == CutState::Complete =>
            {
                println!("Run complete. Press ADVANCE to cut another board.");
            }
            Ok(PollEvent::PieceSelected(piece)) => {
                println!("Selected board: {}", piece.as_str());
            }
            Ok(PollEvent::Failed(e)) => println!("!! {} !!", e),
            Ok(_) => {}
            Err(e) => match e {},
        }

        thread::sleep(Duration::from_millis(LOOP_INTERVAL_MS));
    }
}
