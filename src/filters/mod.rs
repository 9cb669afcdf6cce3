pub mod resonator;

pub use self::resonator::{pole_radius, Resonator};
