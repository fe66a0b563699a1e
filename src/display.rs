// Display module - status-line rendering of the current reading
//
// Text rendition of the tuner readout: frequency to one decimal place,
// nearest-string name, and a fixed-width bracket with a marker showing the
// tuning offset. The marker travels `offset_hz * sensitivity` cells from
// center and clamps at the bracket edges.

use crate::config::DisplayConfig;
use crate::state::TuningReading;

/// Render one reading as a single status line
pub fn render_status_line(reading: &TuningReading, config: &DisplayConfig) -> String {
    let mut line = format!(
        "{:.1}Hz  {}",
        reading.frequency_hz,
        reading.string_name()
    );

    if let Some(offset) = reading.offset_hz() {
        line.push_str("  ");
        line.push_str(&offset_bar(offset, config));
    }

    line
}

/// Build the bounded offset indicator
///
/// The bracket is `2 * half_width + 1` cells wide with `|` marking the
/// in-tune center; `#` marks the scaled, clamped offset position.
pub fn offset_bar(offset_hz: f32, config: &DisplayConfig) -> String {
    let half = config.half_width;
    let cells = ((offset_hz * config.sensitivity) as i32).clamp(-half, half);
    let width = (half * 2 + 1) as usize;
    let marker = (half + cells) as usize;

    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    for i in 0..width {
        if i == marker {
            bar.push('#');
        } else if i == half as usize {
            bar.push('|');
        } else {
            bar.push('-');
        }
    }
    bar.push(']');
    bar
}
