//! Bridge: bootstraps `wgpu::Instance`/`Surface`/`Device`/`Queue` from a
//! window handle and owns the swapchain present cycle for `fluidsim-core`.

mod plugin;
mod window_backend;

pub use plugin::FluidPlugin;
pub use window_backend::FluidWindowBridge;
