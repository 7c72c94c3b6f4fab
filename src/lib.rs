pub mod config;
pub mod error;
pub mod events;
pub mod processing {
    pub mod capture;
    pub mod layout;
}
pub mod tasks {
    pub mod viewfinder;
}

pub use error::Error;
pub use processing::layout::{
    AspectRatio, CoverFit, Dimensions, Offset, compute_height, compute_offsets, cover_fit,
};
