pub mod sheets;
pub mod telegram;
