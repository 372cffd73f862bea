pub mod interview;
pub mod transcript;
