// Control module - the actuator boundary
//
// The core hands a Direction to a sink and is done; what the sink does
// with it (synthesize key events, drive a game input API, just log) is
// the embedder's concern. The string entry point exists for labels
// arriving from external scorers: unknown labels are logged and dropped,
// never raised.

use crate::classify::Direction;

/// Receives classified directions
pub trait DirectionSink {
    fn press(&mut self, direction: Direction);

    /// Press by external label; unknown labels are a logged no-op
    fn press_label(&mut self, label: &str) {
        match Direction::from_label(label) {
            Some(direction) => self.press(direction),
            None => log::warn!("[Control] Ignoring unknown direction label '{}'", label),
        }
    }
}

/// Sink that logs the key presses a direction maps to
///
/// Stands in for a real input backend; `center` maps to no keys and
/// produces no action.
#[derive(Debug, Default)]
pub struct KeySink;

impl DirectionSink for KeySink {
    fn press(&mut self, direction: Direction) {
        let keys = direction.keys();
        if keys.is_empty() {
            log::debug!("[Control] '{}': no action", direction);
        } else {
            log::info!("[Control] Pressing {:?} for '{}'", keys, direction);
        }
    }
}
