pub mod accent;
pub mod state;
pub mod task;
