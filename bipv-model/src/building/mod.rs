pub mod element;
pub mod suitability;
