//! BDD step definitions for the sensor dashboard

pub mod dashboard_steps;
pub mod workout_steps;
