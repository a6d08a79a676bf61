pub mod animal;
pub mod narration;
