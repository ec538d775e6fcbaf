//! Shader pipeline layer (spec §4.1, §4.2, §4.4): the generic fullscreen
//! `Program` builder plus the concrete kernels built from it.

pub mod fluid_kernels;
pub mod program;
pub mod splat;
pub mod util_fill;

pub use fluid_kernels::FluidKernels;
pub use program::Program;
pub use splat::SplatKernel;
pub use util_fill::{CheckerboardKernel, ClearKernel, ColorKernel, CopyKernel};
