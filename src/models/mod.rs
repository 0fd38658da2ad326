pub mod place;
pub mod shop;
