//! Simulation field storage (spec §4.1): allocates and resizes the velocity,
//! dye, pressure, divergence, and curl textures at their independently
//! configured resolutions, deriving width/height from the surface aspect
//! ratio the way the original sizes its framebuffers (shorter side equals
//! the configured resolution, longer side scaled by aspect ratio).

use fluid_api::SimError;

use crate::gpu::{FboTarget, GpuCaps, PingPongTarget};
use crate::pipeline::CopyKernel;

/// Computes (width, height) for a field given a baseline resolution and the
/// surface's aspect ratio, matching the upstream `getResolution`: the
/// baseline always applies to the shorter side, the longer side is scaled
/// up by the aspect ratio, and width/height are swapped to match surface
/// orientation.
pub fn field_resolution(base_resolution: u32, surface_width: u32, surface_height: u32) -> (u32, u32) {
    let mut aspect = surface_width as f32 / surface_height.max(1) as f32;
    if aspect < 1.0 {
        aspect = 1.0 / aspect;
    }
    let min_side = base_resolution.max(1);
    let max_side = (base_resolution as f32 * aspect).round().max(1.0) as u32;
    if surface_width > surface_height {
        (max_side, min_side)
    } else {
        (min_side, max_side)
    }
}

pub struct SimTextures {
    pub velocity: PingPongTarget,
    pub dye: PingPongTarget,
    pub pressure: PingPongTarget,
    pub divergence: FboTarget,
    pub curl: FboTarget,
    sim_width: u32,
    sim_height: u32,
    dye_width: u32,
    dye_height: u32,
}

impl SimTextures {
    pub fn new(
        device: &wgpu::Device,
        caps: &GpuCaps,
        sim_resolution: u32,
        dye_resolution: u32,
        surface_width: u32,
        surface_height: u32,
        precise_pressure_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        let (sim_width, sim_height) = field_resolution(sim_resolution, surface_width, surface_height);
        let (dye_width, dye_height) = field_resolution(dye_resolution, surface_width, surface_height);
        let pressure_format = precise_pressure_format.unwrap_or(caps.scalar_format);

        Self {
            velocity: PingPongTarget::new(device, sim_width, sim_height, caps.velocity_format, "velocity"),
            dye: PingPongTarget::new(device, dye_width, dye_height, caps.color_format, "dye"),
            pressure: PingPongTarget::new(device, sim_width, sim_height, pressure_format, "pressure"),
            divergence: FboTarget::new(device, sim_width, sim_height, caps.scalar_format, "divergence"),
            curl: FboTarget::new(device, sim_width, sim_height, caps.scalar_format, "curl"),
            sim_width,
            sim_height,
            dye_width,
            dye_height,
        }
    }

    pub fn sim_texel_size(&self) -> [f32; 2] {
        [1.0 / self.sim_width as f32, 1.0 / self.sim_height as f32]
    }

    pub fn dye_texel_size(&self) -> [f32; 2] {
        [1.0 / self.dye_width as f32, 1.0 / self.dye_height as f32]
    }

    pub fn sim_size(&self) -> (u32, u32) {
        (self.sim_width, self.sim_height)
    }

    pub fn dye_size(&self) -> (u32, u32) {
        (self.dye_width, self.dye_height)
    }

    /// Reallocates any field whose target resolution changed. Every field
    /// is resampled into its new texture via `copy_kernel` (spec §4.1
    /// `resize_target`) rather than discarded, so a live resolution change
    /// doesn't reset the simulation to zero velocity/pressure.
    pub fn ensure_size(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        caps: &GpuCaps,
        sim_resolution: u32,
        dye_resolution: u32,
        surface_width: u32,
        surface_height: u32,
        precise_pressure_format: Option<wgpu::TextureFormat>,
        copy_kernel: &CopyKernel,
    ) -> Result<(), SimError> {
        let (sim_width, sim_height) = field_resolution(sim_resolution, surface_width, surface_height);
        let (dye_width, dye_height) = field_resolution(dye_resolution, surface_width, surface_height);
        let pressure_format = precise_pressure_format.unwrap_or(caps.scalar_format);

        if sim_width != self.sim_width || sim_height != self.sim_height {
            {
                let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("velocity_resize") });
                let new_velocity = PingPongTarget::new(device, sim_width, sim_height, caps.velocity_format, "velocity");
                copy_kernel.copy_velocity(device, queue, &mut encoder, &self.velocity.read.view, &new_velocity.read.view);
                queue.submit(Some(encoder.finish()));
                self.velocity = new_velocity;
            }
            {
                let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("pressure_resize") });
                let new_pressure = PingPongTarget::new(device, sim_width, sim_height, pressure_format, "pressure");
                copy_kernel.copy_pressure(device, queue, &mut encoder, &self.pressure.read.view, &new_pressure.read.view);
                queue.submit(Some(encoder.finish()));
                self.pressure = new_pressure;
            }
            {
                let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("divergence_resize") });
                let new_divergence = FboTarget::new(device, sim_width, sim_height, caps.scalar_format, "divergence");
                copy_kernel.copy_scalar(device, queue, &mut encoder, &self.divergence.view, &new_divergence.view);
                queue.submit(Some(encoder.finish()));
                self.divergence = new_divergence;
            }
            {
                let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("curl_resize") });
                let new_curl = FboTarget::new(device, sim_width, sim_height, caps.scalar_format, "curl");
                copy_kernel.copy_scalar(device, queue, &mut encoder, &self.curl.view, &new_curl.view);
                queue.submit(Some(encoder.finish()));
                self.curl = new_curl;
            }
            self.sim_width = sim_width;
            self.sim_height = sim_height;
        }

        if dye_width != self.dye_width || dye_height != self.dye_height {
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("dye_resize") });
            let new_dye = PingPongTarget::new(device, dye_width, dye_height, caps.color_format, "dye");
            copy_kernel.copy_dye(device, queue, &mut encoder, &self.dye.read.view, &new_dye.read.view);
            queue.submit(Some(encoder.finish()));
            self.dye = new_dye;
            self.dye_width = dye_width;
            self.dye_height = dye_height;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_surface_scales_width() {
        let (w, h) = field_resolution(128, 1920, 1080);
        assert_eq!(h, 128);
        assert!(w > h);
    }

    #[test]
    fn portrait_surface_scales_height() {
        let (w, h) = field_resolution(128, 1080, 1920);
        assert_eq!(w, 128);
        assert!(h > w);
    }

    #[test]
    fn square_surface_is_unscaled() {
        let (w, h) = field_resolution(256, 800, 800);
        assert_eq!((w, h), (256, 256));
    }
}
