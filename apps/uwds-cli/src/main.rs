use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use uwds_assets::Mesh;
use uwds_common::{Header, Property, Transform};
use uwds_kernel::{Changes, Invalidations, WorldRegistry};
use uwds_scene::{Node, NodeKind};
use uwds_timeline::{Situation, SituationKind};
use uwds_tools::{WorldInspector, apply_batch, load_batches};

#[derive(Parser)]
#[command(name = "uwds-cli", about = "CLI tool for underworlds world state")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Apply JSON change batch files to a fresh registry, in order
    Apply {
        /// Batch files; each holds one batch object or an array of them
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Node to inspect after all batches, as WORLD/NODE
        #[arg(long)]
        inspect: Option<String>,
    },
    /// Populate two worlds sharing one asset store and show the invalidations
    Demo,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("uwds-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", uwds_common::crate_info());
            println!("assets: {}", uwds_assets::crate_info());
            println!("tools: {}", uwds_tools::crate_info());
        }
        Commands::Apply { files, inspect } => {
            let registry = WorldRegistry::new();
            for file in &files {
                let batches = load_batches(file)?;
                tracing::info!(file = %file.display(), batches = batches.len(), "applying batch file");
                for batch in batches {
                    let world = batch.world.clone();
                    let seq = batch.header.seq;
                    let invalidations = apply_batch(&registry, batch)
                        .with_context(|| format!("applying {}", file.display()))?;
                    print_invalidations(world.as_str(), seq, &invalidations)?;
                }
            }
            for summary in WorldInspector::registry(&registry) {
                println!("{summary}");
            }
            if let Some(target) = inspect {
                let (world, node) = target
                    .split_once('/')
                    .context("--inspect expects WORLD/NODE")?;
                let world = registry
                    .get(world)
                    .with_context(|| format!("no world named '{world}'"))?;
                match WorldInspector::inspect_node(&world, node) {
                    Some(info) => println!("{info}"),
                    None => println!("Node [{node}] not found in '{}'", world.name()),
                }
            }
            registry.close();
        }
        Commands::Demo => run_demo()?,
    }

    Ok(())
}

fn print_invalidations(world: &str, seq: u64, invalidations: &Invalidations) -> anyhow::Result<()> {
    let report = serde_json::json!({
        "world": world,
        "seq": seq,
        "invalidations": invalidations,
    });
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

fn run_demo() -> anyhow::Result<()> {
    let registry = WorldRegistry::new();
    let robot = registry.get_or_create("robot");
    let env = registry.get_or_create("env");

    let header = Header {
        seq: 1,
        source: "demo".into(),
        frame_id: "map".into(),
        ..Header::default()
    };
    let scene = Changes::new()
        .update_node(Node::new("map", "map"))
        .update_node(
            Node::new("table", "table")
                .with_parent("map")
                .with_pose(Transform::from_position(glam::Vec3::new(2.0, 1.0, 0.0))),
        )
        .update_node(
            Node::new("cup", "cup")
                .with_kind(NodeKind::Mesh)
                .with_parent("table")
                .with_mesh("cup_mesh")
                .with_pose(Transform::from_position(glam::Vec3::new(0.0, 0.0, 0.75)))
                .with_property(Property::new("color", "red")),
        )
        .update_situation(
            Situation::new("cup_on_table", SituationKind::Fact, 0.0).with_description("cup on table"),
        )
        .update_mesh(Mesh::unit_cube("cup_mesh"));
    print_invalidations("robot", header.seq, &robot.apply_changes(&header, scene))?;

    let header = Header { seq: 2, ..header };
    let env_changes = Changes::new()
        .update_node(Node::new("cup", "cup").with_mesh("cup_mesh"))
        .update_mesh(Mesh::unit_cube("cup_mesh"))
        .update_mesh(Mesh::unit_cube("shelf_mesh"));
    print_invalidations("env", header.seq, &env.apply_changes(&header, env_changes))?;

    let header = Header { seq: 3, stamp: 4.0, ..header };
    let pick = Changes::new()
        .delete_node("cup")
        .update_situation(
            Situation::new("cup_on_table", SituationKind::Fact, 0.0)
                .with_description("cup on table")
                .ended_at(4.0),
        )
        .update_situation(
            Situation::new("pick_cup", SituationKind::Action, 4.0).with_description("robot picks cup"),
        );
    print_invalidations("robot", header.seq, &robot.apply_changes(&header, pick))?;

    if let Some(info) = WorldInspector::inspect_node(&robot, "table") {
        println!("{info}");
    }
    for summary in WorldInspector::registry(&registry) {
        println!("{summary}");
    }

    robot.reset();
    let env_meshes: Vec<String> = env.read().meshes().ids().iter().map(ToString::to_string).collect();
    println!(
        "After reset of 'robot': shared meshes={} (cup_mesh held by {} world(s); env holds {})",
        registry.assets().len(),
        registry.assets().holders("cup_mesh").len(),
        env_meshes.join(", ")
    );

    registry.close();
    println!("After close: worlds={} meshes={}", registry.len(), registry.assets().len());
    Ok(())
}
