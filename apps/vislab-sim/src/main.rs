use clap::{Parser, Subcommand};
use glam::{IVec2, Vec2, Vec3};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vislab_common::{ClusterConfig, NodeId, NodeRole, ProjectorId, WindowId, WindowLayout};
use vislab_node::{ClusterNode, Collaborators, FixedStepClock, FrameHooks, NodeContext};
use vislab_resources::MemoryStorage;
use vislab_sync::{KeyAction, KeyboardEvent, LoopbackTransport, MousePosEvent};

#[derive(Parser)]
#[command(name = "vislab-sim", about = "Headless cluster rendering simulator")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the built-in demo cluster layout
    Info,
    /// Run a master plus N slaves over a loopback transport
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "10")]
        frames: u64,
        /// Number of slave nodes
        #[arg(short, long, default_value = "2")]
        slaves: u32,
    },
    /// Compute the pick ray through a cluster screen point
    Pick {
        /// Screen x coordinate in cluster pixels
        #[arg(short, long, default_value = "100.0")]
        x: f32,
        /// Screen y coordinate in cluster pixels
        #[arg(short, long, default_value = "50.0")]
        y: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => info_command(),
        Commands::Simulate { frames, slaves } => simulate(frames, slaves)?,
        Commands::Pick { x, y } => pick(Vec2::new(x, y))?,
    }

    Ok(())
}

/// Demo layout: one window of 200x100 virtual pixels per node.
fn demo_config(node: u32, node_count: u32) -> ClusterConfig {
    let role = if node == 0 {
        NodeRole::Master { bind_port: 20400 }
    } else {
        NodeRole::Slave { start_node: node }
    };
    ClusterConfig {
        node_id: NodeId(node),
        role,
        virtual_screen_size: Vec2::new(200.0, 100.0),
        windows: vec![WindowLayout {
            viewport_origin: IVec2::ZERO,
            viewport_size: IVec2::new(200, 100),
            viewport_scaling: Vec2::ONE,
        }],
        windows_per_node: vec![1; node_count as usize],
        synchronized_resources: vec!["checkerboard".into()],
    }
}

fn info_command() {
    println!("vislab-sim v{}", env!("CARGO_PKG_VERSION"));
    println!("demo cluster: 1 master + 2 slaves, one window each");
    for node in 0..3u32 {
        let config = demo_config(node, 3);
        let ProjectorId(projector) = config
            .global_projector_id(NodeId(node), WindowId(0))
            .expect("demo node ids are in range");
        println!(
            "  node {node}: {} window {}x{} projector {projector}",
            if config.role.is_master() { "master" } else { "slave" },
            config.windows[0].viewport_size.x,
            config.windows[0].viewport_size.y,
        );
    }
}

/// Hooks for the simulated application: an orbiting camera on the master and
/// per-node dispatch counters everywhere.
#[derive(Default)]
struct SimHooks {
    orbit: bool,
    frames: u64,
    keys: Vec<i32>,
    draws: u64,
}

impl FrameHooks for SimHooks {
    fn pre_sync(&mut self, ctx: &mut NodeContext) {
        if self.orbit {
            let t = self.frames as f32 * 0.1;
            ctx.camera_mut()
                .set_position(Vec3::new(t.cos() * 3.0, 0.0, t.sin() * 3.0));
        }
    }

    fn update_frame(&mut self, ctx: &mut NodeContext, current: f64, elapsed: f64) {
        self.frames += 1;
        info!(
            node = ctx.config().node_id.0,
            current, elapsed, "frame updated"
        );
    }

    fn draw_frame(&mut self, _ctx: &mut NodeContext, _window: WindowId) {
        self.draws += 1;
    }

    fn keyboard(&mut self, ctx: &mut NodeContext, event: KeyboardEvent) -> bool {
        info!(node = ctx.config().node_id.0, key = event.key, "key pressed");
        self.keys.push(event.key);
        true
    }
}

fn simulate(frames: u64, slaves: u32) -> anyhow::Result<()> {
    let node_count = slaves + 1;
    let transport = LoopbackTransport::new();

    let mut master_storage = MemoryStorage::new();
    master_storage.insert("checkerboard", vec![0xAA; 64]);

    let mut master = ClusterNode::new(
        demo_config(0, node_count),
        SimHooks {
            orbit: true,
            ..SimHooks::default()
        },
        Collaborators::loopback(transport.clone(), master_storage)
            .with_clock(Box::new(FixedStepClock::new(1.0 / 60.0))),
    );

    // Slaves get empty storage: the synchronized texture must arrive through
    // the frame snapshot.
    let mut slave_nodes: Vec<ClusterNode<SimHooks>> = (1..node_count)
        .map(|node| {
            ClusterNode::new(
                demo_config(node, node_count),
                SimHooks::default(),
                Collaborators::loopback(transport.clone(), MemoryStorage::new()),
            )
        })
        .collect();

    master.init();
    for slave in &mut slave_nodes {
        slave.init();
    }

    let texture = master.context_mut().load_texture("checkerboard")?;
    info!(digest = texture.digest(), "master loaded synchronized texture");

    for frame in 0..frames {
        if frame == 1 {
            master.keyboard_event(KeyboardEvent {
                key: 32,
                scancode: 57,
                action: KeyAction::Press,
                mods: 0,
            });
            master.mouse_pos_event(MousePosEvent { x: 100.0, y: 50.0 });
        }

        master.run_frame()?;
        for slave in &mut slave_nodes {
            slave.run_frame()?;
        }
    }

    master.shutdown();
    for slave in &mut slave_nodes {
        slave.shutdown();
    }

    println!(
        "master: frames={} draws={} keys={:?} time={:.3}",
        master.hooks().frames,
        master.hooks().draws,
        master.hooks().keys,
        master.context().current_time(),
    );
    for slave in &slave_nodes {
        let synchronized = slave
            .context()
            .texture_manager()
            .get("checkerboard")
            .map(|tex| tex.digest() == texture.digest())
            .unwrap_or(false);
        println!(
            "node {}: frames={} keys={:?} camera={} texture_synced={}",
            slave.node_id().0,
            slave.hooks().frames,
            slave.hooks().keys,
            slave.context().camera().position(),
            synchronized,
        );
    }

    Ok(())
}

fn pick(screen: Vec2) -> anyhow::Result<()> {
    let transport = LoopbackTransport::new();
    let mut node = ClusterNode::new(
        demo_config(0, 1),
        SimHooks::default(),
        Collaborators::loopback(transport, MemoryStorage::new())
            .with_clock(Box::new(FixedStepClock::new(1.0 / 60.0))),
    );
    // One frame populates the pick matrix from the backend's projection.
    node.run_frame()?;

    let ctx = node.context();
    let [origin, far] = ctx.camera().pick_ray(screen);
    let dir = (far - origin).normalize();
    println!("pick ray at ({}, {}):", screen.x, screen.y);
    println!("  origin    {origin}");
    println!("  direction {dir}");

    match ctx
        .camera()
        .pick_position(ctx.backend(), WindowId(0), screen)
    {
        Some(position) => println!("  position  {position}"),
        None => println!("  position  (no local coordinates for window 0)"),
    }

    Ok(())
}
