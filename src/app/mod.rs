pub mod events;
pub mod tasks;
pub mod workflow;
