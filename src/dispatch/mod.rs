pub mod bookings;
pub mod matcher;
