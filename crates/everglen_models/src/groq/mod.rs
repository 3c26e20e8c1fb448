//! Groq LPU inference.

mod driver;

pub use driver::GroqDriver;
