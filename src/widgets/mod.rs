pub mod chart;

pub use chart::{render_to_buffer, write_buffer, DisplayWidget};
