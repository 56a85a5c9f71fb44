pub mod control;
pub mod emit;
pub mod events;
pub mod state;
