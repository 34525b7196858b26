//! Survival Sandbox
//!
//! Drives a scripted fight through the simulation and logs what happens.
//! Pass a tuning JSON path as the first argument to override the defaults.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use survival::{
    Collider, Controls, FrameInput, Scene, SceneConfig, SceneId, TuningConfig, Vec2, FRAME_RATE,
    VERSION,
    game::{
        action::ActionKind,
        enemy::Enemy,
        events::{ChargeMeter, GameEventData},
        scene::{views_overlap, ObjectKind, SceneObject},
        tick::tick,
    },
};

const SCENE_CONFIG: &str = r#"{
    "provide_collision": true,
    "collision_rules": [
        ["hurt_box", "enemy"],
        ["projectile", "enemy"],
        ["enemy", "enemy"]
    ]
}"#;

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Survival Sandbox v{}", VERSION);

    let tuning = match std::env::args().nth(1) {
        Some(path) => TuningConfig::from_path(&path)
            .with_context(|| format!("loading tuning from {path}"))?,
        None => TuningConfig::default(),
    };
    let scene_config = SceneConfig::from_json_str(SCENE_CONFIG)?;

    demo_fight(Arc::new(tuning), &scene_config)
}

/// Scripted fight: slash the nearest enemy, shoot one further away, then
/// dash clear.
fn demo_fight(tuning: Arc<TuningConfig>, scene_config: &SceneConfig) -> anyhow::Result<()> {
    info!("=== Starting Demo Fight ===");

    let mut scene = Scene::from_config(SceneId(1), scene_config, tuning)?;
    let mut collider = Collider::with_predicate(views_overlap);
    collider.on_scene_started(&scene);

    let player = scene.spawn_player(Vec2::ZERO);
    for position in [Vec2::new(0.0, 1.0), Vec2::new(0.6, 1.6), Vec2::new(0.0, 4.5)] {
        scene.spawn(SceneObject::Enemy(Enemy::new(position)));
    }
    info!("Spawned {} enemies", scene.count(ObjectKind::Enemy));

    let dt = 1.0 / FRAME_RATE as f32;
    let holding = |kind| FrameInput::new(dt, Controls::holding(kind));
    let mut script: Vec<FrameInput> = Vec::new();
    // Slash at level 1
    script.extend(vec![holding(ActionKind::Slash); 30]);
    script.extend(vec![FrameInput::idle(dt); 45]);
    // Bow at level 2
    script.extend(vec![holding(ActionKind::Shoot); 55]);
    script.extend(vec![FrameInput::idle(dt); 60]);
    // Dash right, aiming first
    script.push(FrameInput::idle(dt).with_aim(Vec2::new(10.0, 0.0)));
    script.extend(vec![FrameInput::idle(dt); 40]);
    script.extend(vec![holding(ActionKind::Dash); 20]);
    script.extend(vec![FrameInput::new(dt, Controls::walking(Vec2::RIGHT)); 30]);

    let mut meter = ChargeMeter::for_actor(player);
    let mut total_events = 0;
    let mut total_collisions = 0;

    for (frame, input) in script.iter().enumerate() {
        let result = tick(&mut scene, &mut collider, input);
        total_events += result.events.len();
        total_collisions += result.collisions.map_or(0, |r| r.collisions);

        for event in &result.events {
            meter.observe(event);
            match &event.data {
                GameEventData::IncreasedChargeLevel { kind, level } => {
                    info!(
                        "Frame {}: {:?} charge level {} ({} pips lit)",
                        frame,
                        kind,
                        level,
                        meter.lit_count()
                    );
                }
                GameEventData::ChargeEnded { kind, level } => {
                    info!("Frame {}: {:?} released at level {}", frame, kind, level);
                }
                GameEventData::Defeated { position } => {
                    info!("Frame {}: enemy defeated at {}", frame, position);
                }
                GameEventData::ChargeStarted { .. } => {}
            }
        }
    }

    info!("=== Fight Results ===");
    if let Some(actor) = scene.player(player) {
        info!(
            "Player at {} facing {}, state {}",
            actor.position(),
            actor.facing(),
            actor.state().name()
        );
    }
    info!(
        "Enemies left: {}, bodies: {}",
        scene.count(ObjectKind::Enemy),
        scene.count(ObjectKind::Body)
    );
    info!("Total events: {}, collisions: {}", total_events, total_collisions);
    Ok(())
}
