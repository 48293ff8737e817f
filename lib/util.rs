mod r#enum;

pub use r#enum::*;
