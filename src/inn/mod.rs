//! The inn: a walkable hub where the player picks who joins the party.
//!
//! The walker moves a fixed step per frame tick along each axis the input
//! asks for, stays inside the floor area, and steps back out of anything
//! labelled `Blocking` or `Npc`. Walking into a door ends the scene.

use bevy::prelude::*;

use crate::characters::{Constructor, Facing, MageClass};
use crate::collision::{hit_label, overlaps, position_of, Collider, CollisionLabel};
use crate::config::GameConfig;
use crate::constants::{INN_MIN_X, INN_MIN_Y, INN_WALK_SPEED};
use crate::scenes::{GameScene, SceneScoped};

/// The character the player steers around the inn.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct InnWalker {
    /// Step per frame tick on each axis
    pub speed: Vec2,
    pub size: Vec2,
}

impl InnWalker {
    pub fn new(size: Vec2) -> Self {
        Self {
            speed: Vec2::splat(INN_WALK_SPEED),
            size,
        }
    }
}

/// Direction the input is pushing this tick; only the sign of each axis counts.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveIntent(pub Vec2);

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InnDoor {
    pub next_scene: GameScene,
}

/// Class recruiter standing in the inn.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InnNpc {
    pub class: MageClass,
}

impl InnNpc {
    pub fn face_left(facing: &mut Facing, left: bool) {
        facing.animation = if left { "standLT" } else { "standRT" }.to_string();
    }
}

/// Inn scene context: where the player chose to go next.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct InnContext {
    pub next_scene: Option<GameScene>,
}

/// Where the walker tries to go this tick, before collision.
///
/// Returns the clamped position and the step that was attempted.
pub fn step_walker(pos: Vec2, intent: Vec2, walker: &InnWalker, screen: Vec2) -> (Vec2, Vec2) {
    let sign = |v: f32| if v == 0.0 { 0.0 } else { v.signum() };
    let delta = Vec2::new(sign(intent.x), sign(intent.y)) * walker.speed;
    let mut next = pos + delta;

    let max = screen - walker.size;
    if next.y < INN_MIN_Y {
        next.y = INN_MIN_Y;
    } else if next.y > max.y {
        next.y = max.y;
    }
    if next.x < INN_MIN_X {
        next.x = INN_MIN_X;
    } else if next.x > max.x {
        next.x = max.x;
    }
    (next, delta)
}

/// Animation after a step of `delta`, given the current facing.
pub fn walk_animation(delta: Vec2, facing: &Facing) -> String {
    let side = if delta.x > 0.0 {
        "RT"
    } else if delta.x < 0.0 {
        "LT"
    } else {
        facing.side()
    };
    if delta == Vec2::ZERO {
        format!("stand{side}")
    } else {
        format!("walk{side}")
    }
}

/// System: move the walker one tick
pub fn move_walker(
    config: Res<GameConfig>,
    mut walkers: Query<(&InnWalker, &MoveIntent, &mut Transform, &mut Facing)>,
    obstacles: Query<(Entity, &Transform, &Collider), Without<InnWalker>>,
) {
    let screen = config.screen_size();
    for (walker, intent, mut transform, mut facing) in &mut walkers {
        let from = position_of(&transform);
        let (mut to, delta) = step_walker(from, intent.0, walker, screen);

        let bounds = Rect::from_corners(to, to + walker.size);
        let candidates = obstacles
            .iter()
            .map(|(e, t, c)| (e, c.bounds(position_of(t)), c.label));
        if let Some(hit) = hit_label(
            bounds,
            &[CollisionLabel::Blocking, CollisionLabel::Npc],
            candidates,
        ) {
            trace!(?hit, "walker blocked");
            to = from;
        }

        if to != from {
            transform.translation = to.extend(transform.translation.z);
        }
        let animation = walk_animation(delta, &facing);
        if facing.animation != animation {
            facing.animation = animation;
        }
    }
}

/// System: leave the inn through whichever door the walker touches
pub fn enter_door(
    walkers: Query<(&InnWalker, &Transform)>,
    doors: Query<(&InnDoor, &Transform, &Collider), Without<InnWalker>>,
    mut context: ResMut<InnContext>,
    mut next: ResMut<NextState<GameScene>>,
) {
    for (walker, transform) in &walkers {
        let bounds = Rect::from_corners(
            position_of(transform),
            position_of(transform) + walker.size,
        );
        let door = doors
            .iter()
            .find(|(_, t, c)| overlaps(bounds, c.bounds(position_of(t))));
        if let Some((door, _, _)) = door {
            if context.next_scene.is_none() {
                info!(next = ?door.next_scene, "leaving the inn");
                context.next_scene = Some(door.next_scene);
                next.set(door.next_scene);
            }
        }
    }
}

fn setup_inn(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(InnContext::default());

    let scale = 2.0;
    let screen = config.screen_size();
    let lead = config.party.first().copied().unwrap_or(MageClass::White);
    let constructor = match Constructor::new(lead) {
        Ok(c) => c,
        Err(err) => {
            error!("inn walker animations failed to build: {err}");
            return;
        }
    };
    let size = constructor.dimensions * scale;
    commands.spawn((
        InnWalker::new(size),
        MoveIntent::default(),
        constructor.animated("standRT", scale),
        Transform::from_xyz(screen.x / 2.0, screen.y / 2.0 + 40.0, 2.0),
        SceneScoped(GameScene::Inn),
    ));

    for (i, class) in MageClass::ALL.into_iter().enumerate() {
        let Ok(npc) = Constructor::new(class) else {
            continue;
        };
        let pos = Vec2::new(INN_MIN_X + 60.0 + 80.0 * i as f32, INN_MIN_Y + 40.0);
        let (animations, mut facing, shown) = npc.animated("standRT", scale);
        InnNpc::face_left(&mut facing, i % 2 == 1);
        commands.spawn((
            InnNpc { class },
            (animations, facing, shown),
            Collider::new(CollisionLabel::Npc, npc.dimensions * scale),
            Transform::from_translation(pos.extend(2.0)),
            SceneScoped(GameScene::Inn),
        ));
    }

    commands.spawn((
        InnDoor {
            next_scene: GameScene::Run,
        },
        Collider::new(CollisionLabel::Door, Vec2::new(32.0, 48.0)),
        Transform::from_xyz(screen.x - 32.0, screen.y - 48.0, 1.0),
        SceneScoped(GameScene::Inn),
    ));
    debug!("inn ready");
}

fn teardown_inn(mut commands: Commands) {
    commands.remove_resource::<InnContext>();
}

pub struct InnPlugin;

impl Plugin for InnPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameScene::Inn), setup_inn)
            .add_systems(
                Update,
                (move_walker, enter_door)
                    .chain()
                    .run_if(in_state(GameScene::Inn)),
            )
            .add_systems(OnExit(GameScene::Inn), teardown_inn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Vec2 = Vec2::new(640.0, 480.0);

    fn walker() -> InnWalker {
        InnWalker::new(Vec2::new(32.0, 64.0))
    }

    #[test]
    fn test_step_uses_sign_only() {
        let (to, delta) = step_walker(Vec2::new(300.0, 200.0), Vec2::new(0.3, -9.0), &walker(), SCREEN);
        assert_eq!(delta, Vec2::new(5.0, -5.0));
        assert_eq!(to, Vec2::new(305.0, 195.0));
    }

    #[test]
    fn test_step_clamps_to_floor() {
        let (to, _) = step_walker(Vec2::new(222.0, 34.0), Vec2::new(-1.0, -1.0), &walker(), SCREEN);
        assert_eq!(to, Vec2::new(220.0, 32.0));

        let (to, _) = step_walker(Vec2::new(606.0, 414.0), Vec2::new(1.0, 1.0), &walker(), SCREEN);
        assert_eq!(to, Vec2::new(608.0, 416.0));
    }

    #[test]
    fn test_walk_animation_keeps_side() {
        let left = Facing::new("walkLT");
        assert_eq!(walk_animation(Vec2::ZERO, &left), "standLT");
        assert_eq!(walk_animation(Vec2::new(0.0, 5.0), &left), "walkLT");
        assert_eq!(walk_animation(Vec2::new(5.0, 0.0), &left), "walkRT");
    }

    #[test]
    fn test_npc_face_left() {
        let mut facing = Facing::new("standRT");
        InnNpc::face_left(&mut facing, true);
        assert_eq!(facing.animation, "standLT");
        InnNpc::face_left(&mut facing, false);
        assert_eq!(facing.animation, "standRT");
    }

    #[test]
    fn test_blocked_walker_stays_put() {
        let mut app = App::new();
        app.insert_resource(GameConfig::default())
            .add_systems(Update, move_walker);
        let start = Vec2::new(300.0, 200.0);
        let walker = app
            .world_mut()
            .spawn((
                walker(),
                MoveIntent(Vec2::X),
                Facing::new("standRT"),
                Transform::from_translation(start.extend(0.0)),
            ))
            .id();
        app.world_mut().spawn((
            Collider::new(CollisionLabel::Blocking, Vec2::new(10.0, 100.0)),
            Transform::from_xyz(334.0, 200.0, 0.0),
        ));

        app.update();
        let pos = position_of(app.world().get::<Transform>(walker).unwrap());
        assert_eq!(pos, start);
        assert_eq!(app.world().get::<Facing>(walker).unwrap().animation, "walkRT");
    }
}
