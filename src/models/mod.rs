pub mod location;

pub use location::{LocationFix, LocationSample, UserLocations};
