pub mod candidate;
pub mod technology;
