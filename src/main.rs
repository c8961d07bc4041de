use anyhow::Result;

use countertop::config::USAGE;
use countertop::lighting::POINT_LIGHT_COUNT;
use countertop::{InitError, RuntimeConfig, Scene};

fn main() {
    env_logger::init();
    let config = match RuntimeConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };
    if config.help {
        println!("{USAGE}");
        return;
    }
    if let Err(err) = run(config) {
        eprintln!("Error: {err:?}");
        let code = if err.downcast_ref::<InitError>().is_some() {
            -1
        } else {
            1
        };
        std::process::exit(code);
    }
}

fn run(config: RuntimeConfig) -> Result<()> {
    if config.summary_only {
        print_summary(&Scene::authored(), &config);
        return Ok(());
    }
    countertop::run(config)
}

fn print_summary(scene: &Scene, config: &RuntimeConfig) {
    println!(
        "Loaded scene with {} instances ({} point lights)",
        scene.len(),
        POINT_LIGHT_COUNT
    );
    for instance in &scene.instances {
        println!(
            " - {} ({}, {})",
            instance.name,
            instance.mesh.label(),
            instance.diffuse.path_in(&config.assets).display()
        );
    }
}
