//! Integration tests for configuration loading, saving and board fitting

use rs_boxjig::config::{
    load_configuration, save_configuration, BoardConfig, JigConfig, MotionConfig, SettingsError,
};
use rs_boxjig::hal::{MockCarriage, MockStore};
use rs_boxjig::traits::ConfigStore;
use rs_boxjig::units::StepsPerThou;
use rs_boxjig::{
    ConfigError, CutController, ExhaustionPolicy, JointParameters, Piece, Sizing, SlotPattern,
    MAX_SLOTS,
};

fn reference_joint() -> JointParameters {
    JointParameters::default()
        .with_kerf(123)
        .with_slop(2)
        .with_max_advance(120)
        .with_slot_width(500)
}

fn patterned_config() -> JigConfig {
    JigConfig::default()
        .with_joint(
            JointParameters::default()
                .with_kerf(100)
                .with_slop(3)
                .with_max_advance(90)
                .with_pattern(SlotPattern::from_widths(&[200, 300, 450, 300, 200]).unwrap())
                .with_exhaustion(ExhaustionPolicy::Stop),
        )
        .with_board(BoardConfig::default().with_wood_length(7250).with_slot_count(13))
        .with_motion(
            MotionConfig::default()
                .with_calibration(StepsPerThou::LEADSCREW_V2)
                .with_jog_step(25)
                .with_step_pulse_us(250),
        )
}

fn first_moves(joint: JointParameters, presses: usize) -> Vec<u32> {
    let mut c = CutController::new(MockCarriage::new(), joint);
    c.start(Piece::Positive).unwrap();
    for _ in 0..presses {
        c.advance().unwrap();
    }
    c.driver().moves.iter().map(|m| m.0).collect()
}

// ============================================================================
// Store Round Trips
// ============================================================================

#[test]
fn saved_settings_drive_next_run() {
    let mut store = MockStore::new();
    let config = JigConfig::default().with_joint(reference_joint());
    save_configuration(&mut store, &config).unwrap();

    let loaded = load_configuration(&mut store).unwrap();
    assert_eq!(
        first_moves(loaded.joint, 6),
        [120, 120, 120, 120, 22, 621]
    );
}

#[test]
fn store_failure_on_load_surfaces() {
    let mut store = MockStore::with_config(JigConfig::default());
    store.fail_next = true;
    assert!(matches!(
        load_configuration(&mut store),
        Err(SettingsError::Store(()))
    ));
    // Single-shot failure
    assert!(load_configuration(&mut store).is_ok());
}

// ============================================================================
// Board Fitting
// ============================================================================

#[test]
fn fitted_board_matches_explicit_width() {
    let board = BoardConfig::default().with_wood_length(5500).with_slot_count(11);
    let fitted = reference_joint()
        .with_slot_width(1)
        .fit_to_board(&board)
        .unwrap();
    assert_eq!(fitted.sizing, Sizing::Uniform { slot_width: 500 });
    assert_eq!(first_moves(fitted, 11), first_moves(reference_joint(), 11));
}

#[test]
fn fitted_width_narrower_than_kerf_rejected() {
    let board = BoardConfig::default().with_wood_length(1000).with_slot_count(11);
    let fitted = reference_joint().with_slop(0).fit_to_board(&board).unwrap();
    assert!(matches!(fitted.validate(), Err(ConfigError::Geometry(_))));
}

// ============================================================================
// Sentinel Tables
// ============================================================================

#[test]
fn sentinel_table_round_trip() {
    let pattern = SlotPattern::from_widths(&[200, 300, 450]).unwrap();
    let raw = pattern.to_sentinel();
    assert_eq!(raw.len(), MAX_SLOTS);
    assert_eq!(&raw[..4], &[200, 300, 450, 0]);
    assert_eq!(SlotPattern::from_sentinel(&raw), pattern);
}

#[test]
fn full_sentinel_table_has_no_terminator() {
    let raw = [250u32; MAX_SLOTS];
    let pattern = SlotPattern::from_sentinel(&raw);
    assert_eq!(pattern.len(), MAX_SLOTS);
    assert_eq!(pattern.to_sentinel(), raw);
}

// ============================================================================
// Blob Persistence
// ============================================================================

#[cfg(feature = "serde-json-core")]
mod blob {
    use super::*;
    use rs_boxjig::persist::{
        decode, encode, MemoryBlobStore, PersistError, BLOB_CAPACITY, FORMAT_VERSION,
    };

    fn encoded(config: &JigConfig) -> String {
        let mut buf = [0u8; BLOB_CAPACITY];
        let len = encode(config, &mut buf).unwrap();
        String::from_utf8(buf[..len].to_vec()).unwrap()
    }

    #[test]
    fn every_field_survives_memory_store() {
        let mut store = MemoryBlobStore::<BLOB_CAPACITY>::new();
        let config = patterned_config();
        save_configuration(&mut store, &config).unwrap();
        assert_eq!(load_configuration(&mut store).unwrap(), config);
    }

    #[test]
    fn erased_store_loads_defaults() {
        let mut store = MemoryBlobStore::<BLOB_CAPACITY>::new();
        save_configuration(&mut store, &patterned_config()).unwrap();
        store.erase();
        assert!(store.as_bytes().is_empty());
        assert_eq!(load_configuration(&mut store).unwrap(), JigConfig::default());
    }

    #[test]
    fn blob_is_versioned_json() {
        let json = encoded(&patterned_config());
        assert!(json.starts_with(&format!("{{\"version\":{}", FORMAT_VERSION)));
        assert!(json.contains("\"pattern\":[200,300,450,300,200]"));
        assert!(json.contains("\"exhaustion\":\"stop\""));
    }

    #[test]
    fn largest_pattern_fits_capacity() {
        let widths = [u32::MAX; MAX_SLOTS];
        let config = JigConfig::default().with_joint(
            JointParameters::default().with_pattern(SlotPattern::from_widths(&widths).unwrap()),
        );
        let mut buf = [0u8; BLOB_CAPACITY];
        let len = encode(&config, &mut buf).unwrap();
        assert_eq!(decode(&buf[..len]).unwrap(), config);
    }

    #[test]
    fn small_buffer_reports_full() {
        let mut buf = [0u8; 16];
        assert_eq!(
            encode(&JigConfig::default(), &mut buf),
            Err(PersistError::BufferFull)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(decode(b"\xff\x00not json"), Err(PersistError::Malformed));
        assert_eq!(decode(b"{\"version\":1}"), Err(PersistError::Malformed));
    }

    #[test]
    fn other_versions_rejected() {
        let json = encoded(&JigConfig::default()).replacen("\"version\":1", "\"version\":2", 1);
        assert_eq!(
            decode(json.as_bytes()),
            Err(PersistError::UnsupportedVersion(2))
        );
    }

    #[test]
    fn zero_calibration_rejected() {
        let json = encoded(&JigConfig::default()).replacen("\"cal_steps\":4", "\"cal_steps\":0", 1);
        assert!(matches!(
            decode(json.as_bytes()),
            Err(PersistError::Calibration(_))
        ));
    }

    #[test]
    fn invalid_stored_values_rejected_on_load() {
        let mut store = MemoryBlobStore::<BLOB_CAPACITY>::new();
        let bad = JigConfig::default().with_joint(reference_joint().with_kerf(0));
        // Bypass the validating wrapper to simulate a corrupted page
        store.save(&bad).unwrap();
        assert!(matches!(
            load_configuration(&mut store),
            Err(SettingsError::Invalid(ConfigError::Geometry(_)))
        ));
    }
}
