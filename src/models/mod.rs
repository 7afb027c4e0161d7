pub mod derived;
pub mod reading;

pub use derived::{DerivedReading, Season};
pub use reading::{RawReading, Validity};
