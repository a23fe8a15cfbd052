//! Display that writes status lines to the `log` facade.
//!
//! Stands in for the character LCD on desktop runs and on boards without a
//! screen; whatever logger the binary installs decides where the lines go.

use core::convert::Infallible;

use crate::traits::JigDisplay;
use crate::JigStatus;

/// [`JigDisplay`] backed by `log::info!`.
///
/// Identical consecutive statuses are only logged once.
#[derive(Debug, Default)]
pub struct LogDisplay {
    last: Option<JigStatus>,
}

impl LogDisplay {
    /// Creates a display that has rendered nothing yet.
    pub fn new() -> Self {
        Self::default()
    }
}

impl JigDisplay for LogDisplay {
    type Error = Infallible;

    fn init(&mut self) -> Result<(), Infallible> {
        log::info!("display ready");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Infallible> {
        self.last = None;
        Ok(())
    }

    fn render(&mut self, status: &JigStatus) -> Result<(), Infallible> {
        if self.last.as_ref() == Some(status) {
            return Ok(());
        }
        match status.piece {
            None => log::info!("[{}]", status.state.as_str()),
            Some(piece) => log::info!(
                "[{}] {} valley {} | cut {} | move {}",
                status.state.as_str(),
                piece.as_str(),
                status.valleys_cut + 1,
                status.remaining_cut,
                status.remaining_move
            ),
        }
        self.last = Some(*status);
        Ok(())
    }

    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), Infallible> {
        match line2 {
            Some(line2) => log::warn!("{} / {}", line1, line2),
            None => log::warn!("{}", line1),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CutState;

    #[test]
    fn render_remembers_last_status() {
        let mut display = LogDisplay::new();
        display.init().unwrap();

        let status = JigStatus {
            state: CutState::ReadyToAdvance,
            ..JigStatus::default()
        };
        display.render(&status).unwrap();
        assert_eq!(display.last, Some(status));

        display.clear().unwrap();
        assert!(display.last.is_none());
    }
}
