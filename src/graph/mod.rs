pub mod cycle;
pub mod steps;
