pub mod state;

use crate::state::State;
use anyhow::Context;
use clap::{Parser, ValueEnum};
use spiralsim_simulation::config::GalaxyConfig;
use spiralsim_simulation::prompt::prompt_config;
use spiralsim_simulation::scene::Scene;
use spiralsim_simulation::Schedule;
use std::io;
use std::path::PathBuf;
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

const TITLE: &str = "Spiral Galaxy";
const WINDOW_SIZE: u32 = 800;

#[derive(Parser)]
#[command(name = "spiralsim")]
#[command(about = "Animated spiral galaxy of drifting points", long_about = None)]
#[command(version)]
struct Args {
    /// How the per point updates are run
    #[arg(long, value_enum, default_value_t = ScheduleArg::Parallel)]
    schedule: ScheduleArg,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with galaxy parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ask for the galaxy parameters on stdin before starting
    #[arg(long)]
    configure: bool,

    /// Hide the FPS readout
    ///
    /// The readout is shown in the window title, not drawn inside the window.
    #[arg(long)]
    no_fps: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum ScheduleArg {
    Sequential,
    Parallel,
}

impl From<ScheduleArg> for Schedule {
    fn from(arg: ScheduleArg) -> Self {
        match arg {
            ScheduleArg::Sequential => Schedule::Sequential,
            ScheduleArg::Parallel => Schedule::Parallel,
        }
    }
}

fn galaxy_config(args: &Args) -> anyhow::Result<GalaxyConfig> {
    let mut config = match &args.config {
        Some(path) => GalaxyConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => GalaxyConfig::default(),
    };
    if args.configure {
        config = prompt_config(&mut io::stdin().lock(), &mut io::stdout(), config)?;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = galaxy_config(&args)?;
    log::info!("{:?}", config);

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(TITLE)
        .with_inner_size(PhysicalSize::new(WINDOW_SIZE, WINDOW_SIZE))
        .build(&event_loop)?;

    let mut state = State::new(&window, &config).await?;
    let mut scene = Scene::new(config, args.schedule.into()).show_fps(!args.no_fps);

    event_loop.run(move |event, _, control_flow| match event {
        Event::WindowEvent {
            window_id,
            ref event,
        } if window_id == window.id() && !state.input(event) => match event {
            WindowEvent::Resized(new_size) => state.resize(*new_size),
            WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                state.resize(**new_inner_size)
            }
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state: ElementState::Pressed,
                        virtual_keycode: Some(VirtualKeyCode::Escape),
                        ..
                    },
                ..
            } => *control_flow = ControlFlow::Exit,
            _ => {}
        },
        Event::MainEventsCleared => window.request_redraw(),
        // no new frame once closing was requested
        Event::RedrawRequested(window_id)
            if window_id == window.id() && *control_flow != ControlFlow::Exit =>
        {
            match scene.frame(&mut state) {
                Ok(_) => {}
                Err(e) => match e {
                    SurfaceError::OutOfMemory => *control_flow = ControlFlow::Exit,
                    SurfaceError::Lost => state.resize(state.size),
                    _ => log::warn!("Render Error: {:?}", e),
                },
            }

            if let Some(text) = state.take_overlay() {
                window.set_title(&format!("{} | {}", TITLE, text));
            }
        }
        _ => {}
    });
}
