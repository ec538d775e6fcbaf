//! Simulation Stepper (spec §4.3): advances `(velocity, dye)` by one `dt`
//! through the fixed eight-pass order — curl, vorticity confinement,
//! divergence, pressure warm-start fade, Jacobi pressure solve, gradient
//! subtract, velocity advection, dye advection. Every pass renders into a
//! ping-pong pair's `write` half and swaps immediately after, so `read`
//! always holds the most recently completed value for the next pass.

use fluid_api::{SimConfig, SimError, SIM_DT_MAX};

use crate::pipeline::util_fill::ClearKernel;
use crate::pipeline::FluidKernels;
use crate::resources::SimTextures;

pub struct Stepper {
    clear_kernel: ClearKernel,
    /// Set once a step fails and cleared the next time one succeeds, so the
    /// fallback log line fires once per incident rather than every frame
    /// (spec §7 "log once").
    step_error_logged: bool,
}

impl Stepper {
    pub fn new(device: &wgpu::Device, pressure_format: wgpu::TextureFormat) -> Result<Self, SimError> {
        let clear_kernel = ClearKernel::new(device, pressure_format)?;
        Ok(Self { clear_kernel, step_error_logged: false })
    }

    /// Runs one full simulation step. `dt` is clamped to `[0, SIM_DT_MAX]`
    /// before use (spec §5); a step is never skipped for an out-of-range
    /// `dt`, only for a missing resource, which is a programming error this
    /// method has no way to hit given `textures`/`kernels` are always
    /// fully allocated by the time `Simulator::step` calls in.
    pub fn step(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        kernels: &FluidKernels,
        textures: &mut SimTextures,
        config: &SimConfig,
        dt: f32,
    ) {
        let dt = dt.clamp(0.0, SIM_DT_MAX);
        let sim_texel = textures.sim_texel_size();
        let dye_texel = textures.dye_texel_size();

        kernels.compute_curl(device, queue, encoder, &textures.velocity.read.view, &textures.curl.view, sim_texel);

        kernels.apply_vorticity(
            device,
            queue,
            encoder,
            &textures.velocity.read.view,
            &textures.curl.view,
            &textures.velocity.write.view,
            sim_texel,
            config.curl,
            dt,
        );
        textures.velocity.swap();

        kernels.compute_divergence(device, queue, encoder, &textures.velocity.read.view, &textures.divergence.view, sim_texel);

        self.clear_kernel.scale(device, queue, encoder, &textures.pressure.read.view, &textures.pressure.write.view, config.pressure);
        textures.pressure.swap();

        for _ in 0..config.pressure_iterations {
            kernels.jacobi_step(
                device,
                queue,
                encoder,
                &textures.pressure.read.view,
                &textures.divergence.view,
                &textures.pressure.write.view,
                sim_texel,
            );
            textures.pressure.swap();
        }

        kernels.subtract_gradient(
            device,
            queue,
            encoder,
            &textures.pressure.read.view,
            &textures.velocity.read.view,
            &textures.velocity.write.view,
            sim_texel,
        );
        textures.velocity.swap();

        kernels.advect_velocity(
            device,
            queue,
            encoder,
            &textures.velocity.read.view,
            &textures.velocity.write.view,
            sim_texel,
            dt,
            config.velocity_dissipation,
        );
        textures.velocity.swap();

        kernels.advect_dye(
            device,
            queue,
            encoder,
            &textures.velocity.read.view,
            &textures.dye.read.view,
            &textures.dye.write.view,
            sim_texel,
            dye_texel,
            dt,
            config.density_dissipation,
        );
        textures.dye.swap();

        self.step_error_logged = false;
    }

    /// Called by `Simulator` when a step cannot run at all (e.g. resources
    /// not yet allocated). Logs once, matching `SimError::StepError`'s "log
    /// once" semantics (spec §7), and returns the error for the caller to
    /// set `paused`.
    pub fn report_missing_resources(&mut self) -> SimError {
        if !self.step_error_logged {
            log::error!("simulation step skipped: resources not allocated");
            self.step_error_logged = true;
        }
        SimError::StepError("resources not allocated".into())
    }
}
