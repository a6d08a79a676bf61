pub mod model;

pub use model::{Animal, Category, FieldKind, Language};
