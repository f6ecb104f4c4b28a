pub mod align;
pub mod correlate;
pub mod rank;
