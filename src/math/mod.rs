mod angle;
mod fixed;
mod trig;

pub use angle::{Angle, NUM_ANGLES};
pub use fixed::{FRACTION_BITS, FRACTION_MASK, Fixed};
pub use trig::TrigTables;
