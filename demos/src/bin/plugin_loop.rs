//! Host loop: use `FluidPlugin` to drive the simulator directly (no window),
//! feeding it one splat and rendering one frame into an offscreen target.

use fluid_api::InputEvent;
use fluidsim_bridge::FluidPlugin;

fn main() {
    env_logger::init();
    pollster::block_on(async {
        let (device, queue, adapter) = request_device().await;
        let width = 512;
        let height = 512;
        let mut plugin = FluidPlugin::new(device, queue, &adapter, wgpu::TextureFormat::Rgba8Unorm, width, height).expect("FluidPlugin::new");

        plugin.handle_event(InputEvent::PointerDown { id: 0, x: width as f32 / 2.0, y: height as f32 / 2.0 });
        plugin.handle_event(InputEvent::PointerMove { id: 0, x: width as f32 / 2.0 + 40.0, y: height as f32 / 2.0 });
        plugin.handle_event(InputEvent::PointerUp { id: 0 });

        let target = plugin.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("plugin_loop_target"),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());

        plugin.render_frame(&view, width, height, 1.0 / 60.0).expect("render_frame");
        println!("fluidsim plugin_loop: one frame OK");
    });
}

async fn request_device() -> (wgpu::Device, wgpu::Queue, wgpu::Adapter) {
    let instance = wgpu::Instance::default();
    let adapter = instance.request_adapter(&wgpu::RequestAdapterOptions::default()).await.expect("No adapter");
    let (device, queue) = adapter.request_device(&wgpu::DeviceDescriptor::default(), None).await.expect("No device");
    (device, queue, adapter)
}
