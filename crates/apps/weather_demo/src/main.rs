use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use foundation::math::{Geodetic, geodetic_to_ecef};
use runtime::{FrameClock, Metrics};
use scene::{CameraPose, HeadlessScene};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use weather::{
    OverlayConfig, ParticleSystem, PngImageDecoder, SimulatedParticleEngine,
    WeatherOverlayController, provision_textures,
};

const GAUGE_LIVE_PARTICLES: &str = "weather.particles.live";
const GAUGE_PEAK_PARTICLES: &str = "weather.particles.peak";

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless rain/snow overlay run")]
struct Args {
    /// Overlay config JSON (built-in rain and snow profiles when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Fixed frame step in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Weather changes as `tag@frame`, comma separated (tags: rain, snow, clear)
    #[arg(long, default_value = "rain@0,snow@300,clear@540")]
    script: String,

    /// Emission rate, applied at `--intensity-frame` and kept for later systems
    #[arg(long)]
    intensity: Option<String>,

    /// Frame at which `--intensity` is applied
    #[arg(long, default_value_t = 60)]
    intensity_frame: u64,

    /// Camera latitude in degrees
    #[arg(long, default_value_t = 46.55)]
    lat: f64,

    /// Camera longitude in degrees
    #[arg(long, default_value_t = 7.98)]
    lon: f64,

    /// Camera height above the ellipsoid in meters
    #[arg(long, default_value_t = 3_500.0)]
    height: f64,

    /// Camera turn rate in degrees per second
    #[arg(long, default_value_t = 6.0)]
    turn_rate: f64,

    /// Simulation seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Log a status line every this many frames
    #[arg(long, default_value_t = 60)]
    report_every: u64,
}

/// One scripted weather change.
#[derive(Debug, Clone, PartialEq)]
struct ScriptEvent {
    frame: u64,
    tag: String,
}

fn parse_script(raw: &str) -> Result<Vec<ScriptEvent>, String> {
    let mut events = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (tag, frame) = entry
            .split_once('@')
            .ok_or_else(|| format!("script entry `{entry}` is not tag@frame"))?;
        let frame = frame
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("script entry `{entry}` has a bad frame number"))?;
        events.push(ScriptEvent {
            frame,
            tag: tag.trim().to_string(),
        });
    }
    events.sort_by_key(|e| e.frame);
    Ok(events)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if !(args.dt.is_finite() && args.dt > 0.0) {
        return Err(format!("--dt must be positive, got {}", args.dt).into());
    }
    let script = parse_script(&args.script)?;

    let config = match &args.config {
        Some(path) => OverlayConfig::load(path)?,
        None => OverlayConfig::default(),
    };

    let textures = pollster::block_on(provision_textures(&config, &PngImageDecoder));
    let engine = SimulatedParticleEngine::new(args.seed);
    let controller = Rc::new(RefCell::new(WeatherOverlayController::new(engine, config)?));
    controller.borrow_mut().install_textures(textures);

    let location = Geodetic::from_degrees(args.lat, args.lon, args.height);
    let mut heading = 0.0;
    let mut scene = HeadlessScene::new(CameraPose::from_geodetic(location, heading, -10.0));
    WeatherOverlayController::register_pre_update_hook(&controller, &mut scene);
    info!(
        lat = args.lat,
        lon = args.lon,
        height = args.height,
        camera = ?geodetic_to_ecef(location),
        "scene ready"
    );

    let mut metrics = Metrics::new();
    let mut peak = 0usize;
    let mut pending = script.into_iter().peekable();
    let mut clock = FrameClock::new(args.dt);

    for _ in 0..args.frames {
        let frame = clock.tick();

        while let Some(event) = pending.next_if(|e| e.frame <= frame.index) {
            let result = controller.borrow_mut().set_weather_str(&mut scene, &event.tag);
            match result {
                Ok(()) => info!(frame = frame.index, weather = %event.tag, "weather changed"),
                Err(err) => warn!(frame = frame.index, "weather change failed: {err}"),
            }
        }
        if frame.index == args.intensity_frame {
            if let Some(raw) = &args.intensity {
                if let Err(err) = controller.borrow_mut().set_intensity_str(raw) {
                    warn!(frame = frame.index, "intensity not applied: {err}");
                }
            }
        }

        heading = (heading + args.turn_rate * frame.dt_s) % 360.0;
        scene.set_camera(CameraPose::from_geodetic(location, heading, -10.0));
        scene.render_frame(frame);

        let mut overlay = controller.borrow_mut();
        let state = overlay.state();
        let Some(system) = overlay.active_system_mut() else {
            metrics.set_gauge(GAUGE_LIVE_PARTICLES, 0);
            continue;
        };
        system.step(frame.dt_s);
        let live = system.live_count();
        peak = peak.max(live);
        metrics.set_gauge(GAUGE_LIVE_PARTICLES, live as i64);
        metrics.set_gauge(GAUGE_PEAK_PARTICLES, peak as i64);

        if args.report_every > 0 && frame.index % args.report_every == 0 {
            let anchor = system.placement().origin();
            info!(
                frame = frame.index,
                t = frame.time.seconds(),
                %state,
                rate = system.emission_rate(),
                live,
                cycle_s = system.cycle_s(),
                anchor = ?anchor,
                "overlay status"
            );
        }
    }

    let overlay = controller.borrow();
    let summary = json!({
        "frames": args.frames,
        "final_state": overlay.state().as_str(),
        "final_intensity": overlay.intensity(),
        "scene": scene.metrics().snapshot().counters,
        "particles": metrics.snapshot().gauges,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
