//! Use case implementations.

mod resolve_images_use_case;

pub use resolve_images_use_case::ResolveImagesUseCase;
