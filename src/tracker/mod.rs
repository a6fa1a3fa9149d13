pub mod positions;
pub mod reporter;
