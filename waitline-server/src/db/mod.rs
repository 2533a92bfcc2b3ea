//! Database access layer

pub mod queue;
pub mod reservations;
pub mod services;
pub mod time_slots;
pub mod users;

#[cfg(test)]
pub mod test_support;
