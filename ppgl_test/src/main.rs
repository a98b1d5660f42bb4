//! Sample driver
//!
//! Opens one window, brings up a Vulkan device for it and pumps events until
//! the window is closed. An optional first argument names a `.toml` or `.ron`
//! config file.

use ppgl::prelude::*;

fn load_config() -> Result<PpglConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {path}");
            Ok(PpglConfig::load_from_file(&path)?)
        }
        None => Ok(PpglConfig::default()),
    }
}

fn run(config: &PpglConfig) -> PpglResult<()> {
    let mut window = WindowHandle::new()?;
    let mut graphics = GraphicsContext::with_config(&window, &config.graphics)?;

    for hint in &config.window.hints {
        window.set_hint(*hint)?;
    }
    window.open(config.window.width, config.window.height, &config.window.title)?;
    graphics.initialize()?;

    if let Some(device) = graphics.selected_device() {
        log::info!(
            "Ready: '{}' on {}, queue family {:?}",
            config.window.title,
            device.name(),
            graphics.queue_family_index()
        );
    }

    let mut frames: u64 = 0;
    while window.poll_and_check_open()? {
        frames += 1;
    }
    log::info!("Window closed after {frames} polls");

    // The device goes before the window it was created for
    drop(graphics);
    drop(window);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    log::info!("Starting ppgl_test");

    let config = load_config().map_err(|e| {
        log::error!("Configuration error: {e}");
        e
    })?;

    match run(&config) {
        Ok(()) => {
            log::info!("ppgl_test finished successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("{} failed: {}", e.operation(), e.diagnostic());
            Err(e.into())
        }
    }
}
