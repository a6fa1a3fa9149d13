pub mod booking;
pub mod location;
pub mod profile;
pub mod truck;
