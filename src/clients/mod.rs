pub mod line;
pub mod openai;
pub mod places;
