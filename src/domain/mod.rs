pub mod content;
pub mod level;
pub mod order;
pub mod rules;
