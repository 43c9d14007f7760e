pub mod classifier;
pub mod labels;
pub mod pipeline;
pub mod preprocess;
pub mod recommendations;
pub mod store;
