//! Texture-format capability probing. The original fluid sim picks between a
//! handful of GLES extension combinations (`OES_texture_float` /
//! `OES_texture_half_float` with or without linear filtering); wgpu has no
//! such extension surface, so the equivalent probe asks the adapter which
//! float texture formats actually support `RENDER_ATTACHMENT` and are
//! filterable, and falls back to a wider format when the narrow one is
//! missing (spec §4.1, §9 REDESIGN FLAGS).

use fluid_api::SimError;

/// Resolved texture formats and filter support for one adapter. Probed once
/// at startup and reused for every texture the simulator allocates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GpuCaps {
    /// Dye and bloom/sunrays color buffers. Always 4-channel.
    pub color_format: wgpu::TextureFormat,
    /// Velocity field. 2-channel when available, widened to `color_format`
    /// otherwise.
    pub velocity_format: wgpu::TextureFormat,
    /// Pressure, divergence, curl, and the sunrays mask. 1-channel when
    /// available, widened otherwise.
    pub scalar_format: wgpu::TextureFormat,
    /// Whether `color_format` and `velocity_format` both support linear
    /// sampling. When false the simulator falls back to nearest-neighbor
    /// sampling for advection, matching the JS original's
    /// `supportLinearFiltering` branch.
    pub supports_linear_filter: bool,
}

impl GpuCaps {
    pub fn probe(adapter: &wgpu::Adapter) -> Result<Self, SimError> {
        let color_format = Self::pick(adapter, &[wgpu::TextureFormat::Rgba16Float])
            .ok_or_else(|| SimError::UnsupportedGpu("no render-attachment rgba16float format".into()))?;
        let velocity_format = Self::pick(
            adapter,
            &[wgpu::TextureFormat::Rg16Float, wgpu::TextureFormat::Rgba16Float],
        )
        .ok_or_else(|| SimError::UnsupportedGpu("no render-attachment rg16float/rgba16float format".into()))?;
        let scalar_format = Self::pick(
            adapter,
            &[
                wgpu::TextureFormat::R16Float,
                wgpu::TextureFormat::Rg16Float,
                wgpu::TextureFormat::Rgba16Float,
            ],
        )
        .ok_or_else(|| SimError::UnsupportedGpu("no render-attachment half-float format".into()))?;

        let supports_linear_filter =
            Self::is_filterable(adapter, color_format) && Self::is_filterable(adapter, velocity_format);

        Ok(Self { color_format, velocity_format, scalar_format, supports_linear_filter })
    }

    fn pick(adapter: &wgpu::Adapter, candidates: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
        candidates.iter().copied().find(|f| Self::supports_render_attachment(adapter, *f))
    }

    fn supports_render_attachment(adapter: &wgpu::Adapter, format: wgpu::TextureFormat) -> bool {
        adapter
            .get_texture_format_features(format)
            .allowed_usages
            .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
    }

    fn is_filterable(adapter: &wgpu::Adapter, format: wgpu::TextureFormat) -> bool {
        adapter
            .get_texture_format_features(format)
            .flags
            .contains(wgpu::TextureFormatFeatureFlags::FILTERABLE)
    }
}
