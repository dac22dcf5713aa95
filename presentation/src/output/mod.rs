//! Output formatting for game results and decision reports

pub mod console;
pub mod formatter;
