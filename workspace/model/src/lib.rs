pub mod constraints;
pub mod entities;
pub mod money;
