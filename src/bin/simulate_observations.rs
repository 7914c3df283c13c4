use log::info;
use serde::Serialize;
use std::env;
use std::path::Path;
use std::time::Instant;
use super_resolution::config::load_config;
use super_resolution::image::io::{load_image, save_image, write_json_file};
use super_resolution::image::Interpolation;
use super_resolution::objective::ObjectiveDataTerm;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let hr = load_image(&config.input, config.grayscale)?;
    let hr_size = hr.size();
    let model = config
        .model
        .build()
        .map_err(|e| format!("Invalid model in {config_path}: {e}"))?;
    info!(
        "Loaded {} ({hr_size}, {} channels), {} operators, scale {}",
        config.input.display(),
        hr.num_channels(),
        model.len(),
        model.downsampling_scale()
    );

    let sim_start = Instant::now();
    let mut observations = Vec::with_capacity(config.num_frames);
    let mut frames = Vec::with_capacity(config.num_frames);
    for index in 0..config.num_frames {
        let mut frame = hr.clone();
        model.apply(&mut frame, index);
        let path = config.output.frames_dir.join(format!("frame_{index:03}.png"));
        save_image(&frame, &path)?;
        frames.push(path.display().to_string());
        observations.push(frame);
    }
    let simulate_ms = sim_start.elapsed().as_secs_f64() * 1000.0;

    // Score a naive upsampled first frame against all frames with the
    // noise-free model.
    let estimation_model = model.without_noise();
    let mut initial = observations
        .first()
        .cloned()
        .ok_or("num_frames must be at least 1")?;
    initial.resize(hr_size, Interpolation::Linear);
    let estimate = initial.to_vec();

    let term = ObjectiveDataTerm::new(
        &estimation_model,
        &observations,
        0,
        hr.num_channels(),
        hr_size,
    )
    .map_err(|e| format!("Cannot build data term: {e}"))?;
    let objective_start = Instant::now();
    let mut gradient = vec![0.0; term.num_parameters()];
    let initial_cost = term.compute(&estimate, Some(&mut gradient));
    let objective_ms = objective_start.elapsed().as_secs_f64() * 1000.0;
    let gradient_norm = gradient.iter().map(|g| g * g).sum::<f64>().sqrt();
    let ground_truth_cost = term.compute(&hr.to_vec(), None);

    let summary = SimulationSummary {
        hr_width: hr_size.width,
        hr_height: hr_size.height,
        channels: hr.num_channels(),
        downsampling_scale: model.downsampling_scale(),
        frames,
        initial_cost,
        initial_gradient_norm: gradient_norm,
        ground_truth_cost,
        simulate_ms,
        objective_ms,
    };
    write_json_file(&config.output.summary_json, &summary)?;

    println!(
        "Saved {} frames to {}",
        summary.frames.len(),
        config.output.frames_dir.display()
    );
    println!(
        "Initial cost {:.4e} (|grad| {:.4e}), ground-truth cost {:.4e}",
        initial_cost, gradient_norm, ground_truth_cost
    );
    Ok(())
}

fn usage() -> String {
    "Usage: simulate_observations <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationSummary {
    hr_width: usize,
    hr_height: usize,
    channels: usize,
    downsampling_scale: usize,
    frames: Vec<String>,
    initial_cost: f64,
    initial_gradient_norm: f64,
    ground_truth_cost: f64,
    simulate_ms: f64,
    objective_ms: f64,
}
