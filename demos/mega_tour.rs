use megabitmap::{
    ChildParams, Color, ConsumerKind, Engine, EngineConfig, GpuDevice, ImageFormat, IntRect,
    SoftwareGpuOpts,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = EngineConfig::from_json_str(r#"{ "screen_width": 64, "screen_height": 48 }"#)?;
    let mut engine = Engine::software(cfg, SoftwareGpuOpts::default().with_max_texture_size(64))?;

    // Wider than the texture limit, so it lives on the CPU.
    let world = engine.create(200, 48)?;
    for i in 0..10 {
        let c = Color::rgb((i * 25) as u8, 80, 255 - (i * 25) as u8);
        engine.fill_rect(world, IntRect::new(i * 20, 0, 20, 48), c)?;
    }
    engine.gradient_fill_rect(
        world,
        IntRect::new(0, 40, 200, 8),
        Color::rgb(0, 0, 0),
        Color::rgb(255, 255, 255),
        false,
    )?;
    engine.blur(world)?;

    let view = engine.spawn_child(world)?;
    for (frame, x) in [0, 50, 120, 180].into_iter().enumerate() {
        engine.set_child_params(
            view,
            ChildParams::new(ConsumerKind::Plane, 200, 48).with_offset(x, 0),
        )?;
        engine.prepare_draw(frame as f64 / 60.0)?;
        let state = engine.child_state(view)?;
        println!(
            "offset {x:>3}: window at {:?}, visible={}",
            state.parent_pos,
            engine.child_report(view)?.visible
        );
    }

    let png = engine.export(view, ImageFormat::Png)?;
    println!("child exported: {} bytes of png", png.len());
    println!("device: {:?}", engine.device().stats());

    engine.dispose(world);
    println!("live textures after dispose: {}", engine.device().live_textures());
    Ok(())
}
