use std::error::Error;
use std::fmt;

/// The simulator's error taxonomy (spec §7). Deliberately a small hand-rolled
/// enum rather than a `thiserror` derive, matching the reference renderer's
/// style of writing `Display`/`Error` by hand for the handful of error types
/// it actually needs (see `ShaderCreationError` in the corpus this crate was
/// grounded on).
#[derive(Debug)]
pub enum SimError {
    /// Required texture format or GPU context unavailable. Fatal at startup.
    UnsupportedGpu(String),
    /// Texture/target allocation failed during a resize.
    ResourceAlloc(String),
    /// Shader source failed to compile.
    ShaderCompile(String),
    /// Pipeline failed to link/build.
    ProgramLink(String),
    /// A simulation sub-pass failed at runtime.
    StepError(String),
    /// An optional asset (the bloom dithering texture) failed to load.
    AssetLoad(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnsupportedGpu(msg) => write!(f, "unsupported GPU: {msg}"),
            SimError::ResourceAlloc(msg) => write!(f, "resource allocation failed: {msg}"),
            SimError::ShaderCompile(msg) => write!(f, "shader compile failed: {msg}"),
            SimError::ProgramLink(msg) => write!(f, "program link failed: {msg}"),
            SimError::StepError(msg) => write!(f, "simulation step failed: {msg}"),
            SimError::AssetLoad(msg) => write!(f, "asset load failed: {msg}"),
        }
    }
}

impl Error for SimError {}
