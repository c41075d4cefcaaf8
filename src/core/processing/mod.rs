pub mod bounds;
pub mod compose;
pub mod flatten;
pub mod padding;
pub mod pipeline;
pub mod resize;
pub mod segment;
