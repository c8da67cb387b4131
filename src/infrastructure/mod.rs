pub mod capabilities;
pub mod observability;
pub mod persistence;
