mod config;
mod constants;
mod grid;
mod renderer;
mod simulation;
mod stats;
mod utils;

use crate::config::SimulationConfig;
use crate::constants::{FPS_UPDATE_INTERVAL_SECS, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::renderer::Renderer;
use crate::simulation::SimulationState;
use crate::utils::GridLayout;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, Event, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Collaborator-side validation: the engine assumes these are sane.
    let simulation_config = SimulationConfig::default();
    simulation_config.validate()?;

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Petri Cell Growth")
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .build(&event_loop)?,
    );

    let cell_count = simulation_config.rows * simulation_config.cols;
    let mut renderer = pollster::block_on(Renderer::new(window.clone(), cell_count));
    let mut simulation_state = SimulationState::new(simulation_config)?;

    let mut last_update_time = Instant::now();
    let mut time_accumulator = Duration::ZERO;
    let mut cursor_position: Option<PhysicalPosition<f64>> = None;
    let mut last_fps_update_time = Instant::now();
    let mut frames_since_last_fps_update = 0u32;
    let mut current_fps = 0.0f64;

    println!(
        "Controls: Space start/stop, R reset, Up/Down tick interval, G growth table, click toggles a cell"
    );

    event_loop.run(move |event, elwt: &EventLoopWindowTarget<()>| {
        elwt.set_control_flow(ControlFlow::Poll);
        match event {
            Event::AboutToWait => {
                if simulation_state.is_running() {
                    let now = Instant::now();
                    time_accumulator += now.duration_since(last_update_time);
                    last_update_time = now;
                    // One serialized generation per elapsed interval; the
                    // next tick never starts before the previous result is
                    // applied.
                    while time_accumulator >= simulation_state.tick_interval() {
                        time_accumulator -= simulation_state.tick_interval();
                        if let Err(err) = simulation_state.advance() {
                            log::error!("generation tick failed: {err}");
                            simulation_state.toggle_running();
                            break;
                        }
                    }
                } else {
                    last_update_time = Instant::now();
                    time_accumulator = Duration::ZERO;
                }
                window.request_redraw();
            }
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(physical_size) => renderer.resize(physical_size),
                WindowEvent::ScaleFactorChanged { .. } => renderer.resize(window.inner_size()),
                WindowEvent::CursorMoved { position, .. } => cursor_position = Some(position),
                WindowEvent::CursorLeft { .. } => cursor_position = None,
                WindowEvent::MouseInput {
                    state: button_state,
                    button,
                    ..
                } => {
                    if button_state == ElementState::Pressed && button == MouseButton::Left {
                        if let Some(position) = cursor_position {
                            let layout = GridLayout::new(
                                renderer.size,
                                simulation_state.grid().rows(),
                                simulation_state.grid().cols(),
                            );
                            if let Some((row, col)) = layout.cell_at(position.x, position.y) {
                                if let Err(err) = simulation_state.toggle_cell(row, col) {
                                    log::warn!("toggle rejected: {err}");
                                }
                            }
                        }
                    }
                }
                WindowEvent::KeyboardInput {
                    event: key_event, ..
                } => {
                    if key_event.state == ElementState::Pressed && !key_event.repeat {
                        match key_event.physical_key {
                            PhysicalKey::Code(KeyCode::Space) => simulation_state.toggle_running(),
                            PhysicalKey::Code(KeyCode::KeyR) => {
                                if let Err(err) = simulation_state.restart() {
                                    log::error!("reset failed: {err}");
                                }
                            }
                            PhysicalKey::Code(KeyCode::ArrowUp) => {
                                simulation_state.adjust_interval(true)
                            }
                            PhysicalKey::Code(KeyCode::ArrowDown) => {
                                simulation_state.adjust_interval(false)
                            }
                            PhysicalKey::Code(KeyCode::KeyG) => {
                                println!("{}", simulation_state.history().table());
                                if let (Some(avg), Some(max)) = (
                                    simulation_state.average_tick(),
                                    simulation_state.max_tick(),
                                ) {
                                    println!(
                                        "engine: avg {:.2} ms, max {:.2} ms per generation",
                                        avg.as_secs_f64() * 1000.0,
                                        max.as_secs_f64() * 1000.0
                                    );
                                }
                            }
                            PhysicalKey::Code(KeyCode::Escape) => elwt.exit(),
                            _ => {}
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    frames_since_last_fps_update += 1;
                    let now = Instant::now();
                    let elapsed_secs = now.duration_since(last_fps_update_time).as_secs_f64();
                    if elapsed_secs >= FPS_UPDATE_INTERVAL_SECS {
                        current_fps = frames_since_last_fps_update as f64 / elapsed_secs;
                        last_fps_update_time = now;
                        frames_since_last_fps_update = 0;
                    }
                    match renderer.render(simulation_state.grid()) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            eprintln!("WGPU Error: OutOfMemory");
                            elwt.exit();
                        }
                        Err(e) => eprintln!("WGPU Error: {:?}", e),
                    }

                    let (living, mutated) = simulation_state
                        .latest_stats()
                        .map(|s| (s.living, s.mutated))
                        .unwrap_or((0, 0));
                    let sim_ms = simulation_state
                        .average_tick()
                        .map(|d| d.as_secs_f64() * 1000.0)
                        .unwrap_or(0.0);
                    let stopped_text = if simulation_state.is_running() {
                        ""
                    } else {
                        " [STOPPED]"
                    };
                    window.set_title(&format!(
                        "Petri - Gen {} | Alive: {} | Mutated: {} | {} ms/gen (sim {:.2} ms) | FPS: {:.1}{}",
                        simulation_state.generation(),
                        living,
                        mutated,
                        simulation_state.tick_interval().as_millis(),
                        sim_ms,
                        current_fps,
                        stopped_text
                    ));
                }
                _ => {}
            },
            _ => {}
        }
    })?;
    Ok(())
}
