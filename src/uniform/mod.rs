//! Uniform reservoir sampling (Algorithm L).

mod core;
mod dynamic;
mod static_size;

pub use dynamic::UniformSamplerDynamic;
pub use static_size::UniformSamplerStatic;
