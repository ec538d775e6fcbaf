//! Minimal wgpu init (no window). Verifies fluidsim-core builds a Simulator
//! against a bare adapter and can run one headless frame.

fn main() {
    env_logger::init();
    pollster::block_on(async {
        let instance = wgpu::Instance::default();
        let adapter = instance.request_adapter(&wgpu::RequestAdapterOptions::default()).await.expect("No adapter");
        let (device, queue) = adapter.request_device(&wgpu::DeviceDescriptor::default(), None).await.expect("No device");

        let mut simulator = fluidsim_core::Simulator::new(
            device,
            queue,
            &adapter,
            wgpu::TextureFormat::Rgba8Unorm,
            256,
            256,
            fluid_api::SimConfig::default(),
        )
        .expect("Simulator::new");

        let target = simulator.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("minimal_wgpu_target"),
            size: wgpu::Extent3d { width: 256, height: 256, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());

        simulator.render_frame(&view, 256, 256, 1.0 / 60.0).expect("render_frame");
        println!("fluidsim minimal_wgpu: OK");
    });
}
