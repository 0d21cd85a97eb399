pub mod fold;
pub mod score;
