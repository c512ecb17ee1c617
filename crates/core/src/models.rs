pub mod appointment;
pub mod pass;
pub mod slot;
