pub mod catalog;
pub mod model;
pub mod pipeline;
pub mod preprocess;
