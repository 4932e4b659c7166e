pub mod area;
pub mod location;
