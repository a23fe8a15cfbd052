//! Desktop dry run of a joint program.
//!
//! Drives the jig with simulated button presses against a mock carriage
//! and logs every move, so a pattern can be checked before any wood is
//! cut.
//!
//! # Usage
//!
//! ```bash
//! # Uniform 0.5" slots, cut-first board, 12 presses
//! RUST_LOG=info cargo run --features sim --bin jig_sim -- positive
//!
//! # Patterned move-first board
//! RUST_LOG=debug cargo run --features sim --bin jig_sim -- negative 200 300 450 300 200
//! ```

use anyhow::{bail, Context};
use rs_boxjig::config::{JigConfig, JointParameters};
use rs_boxjig::hal::{LogDisplay, MockCarriage, MockControls};
use rs_boxjig::{CutState, ExhaustionPolicy, Jig, Piece, PollEvent, SlotPattern};

/// Presses simulated for uniform joints, which never run out on their own
const UNIFORM_PRESSES: usize = 12;

/// Upper bound on presses for patterned joints
const MAX_PRESSES: usize = 200;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let piece = match args.next().as_deref() {
        None | Some("positive") => Piece::Positive,
        Some("negative") => Piece::Negative,
        Some(other) => bail!("unknown piece {:?} (expected positive or negative)", other),
    };
    let widths = args
        .map(|a| a.parse::<u32>().with_context(|| format!("bad width {:?}", a)))
        .collect::<anyhow::Result<Vec<u32>>>()?;

    let mut joint = JointParameters::default();
    let presses = if widths.is_empty() {
        UNIFORM_PRESSES
    } else {
        let pattern = SlotPattern::from_widths(&widths)?;
        joint = joint
            .with_pattern(pattern)
            .with_exhaustion(ExhaustionPolicy::Stop);
        MAX_PRESSES
    };
    let config = JigConfig::default().with_joint(joint);
    config.validate()?;

    println!("Simulating the {} board", piece.as_str());
    println!(
        "  kerf {} slop {} max advance {}",
        config.joint.kerf, config.joint.slop, config.joint.max_advance
    );

    let mut jig = Jig::new(MockCarriage::new(), MockControls::new(), LogDisplay::new(), &config);
    jig.select_piece(piece);
    let _ = jig.init();

    // First press starts the run
    jig.controls_mut().queue_advances(presses + 1);
    for _ in 0..=presses {
        match jig.poll() {
            Ok(PollEvent::Failed(e)) => bail!("run failed: {}", e),
            Ok(_) => {}
            Err(e) => match e {},
        }
        if jig.state() == CutState::Complete {
            break;
        }
    }

    let carriage = jig.controller().driver();
    println!();
    println!("{:>4}  {:>8}  {:>8}", "#", "move", "position");
    let mut position = 0u64;
    for (i, (distance, _)) in carriage.moves.iter().enumerate() {
        position += u64::from(*distance);
        println!("{:>4}  {:>8}  {:>8}", i + 1, distance, position);
    }
    println!();
    println!(
        "{} moves, {} valleys, final state {}",
        carriage.moves.len(),
        jig.controller().status().valleys_cut,
        jig.state().as_str()
    );
    Ok(())
}
