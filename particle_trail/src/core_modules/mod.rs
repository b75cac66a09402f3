pub mod blob;
pub mod blob_selector;
pub mod color_range;
pub mod enclosing_circle;
pub mod moment;
pub mod pixel;
pub mod renderer;
pub mod segmenter;
pub mod trail;
