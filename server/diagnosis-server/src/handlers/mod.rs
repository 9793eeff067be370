pub mod health;
pub mod prediction;
pub mod reference;
