//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameWorld` (and, where generation needs one, an RNG handle) and returns
//! a brand-new `GameWorld`. Side effects are limited to the injected RNG.

use rand::Rng;

use crate::entities::{GameStatus, GameWorld, Goal, Hue, Level, Obstacle, Platform, Player, Rect};

// ── World constants ──────────────────────────────────────────────────────────

/// Logical playfield size in world units. The display layer scales this
/// to whatever terminal it finds; the simulation never sees cell
/// coordinates.
pub const SCREEN_WIDTH: f32 = 800.0;
pub const SCREEN_HEIGHT: f32 = 600.0;

/// Logical frames per second. Drives frame pacing and the invisibility
/// clock.
pub const FPS: u32 = 60;

/// Downward acceleration per frame.
pub const GRAVITY: f32 = 0.8;
/// Initial vertical velocity of a jump (negative = upward).
pub const JUMP_STRENGTH: f32 = -15.0;
/// Horizontal speed while a direction key is held.
pub const MOVE_SPEED: f32 = 5.0;
/// One-shot nudge applied on a fresh direction-key press.
pub const MOVE_STEP: f32 = 20.0;

pub const PLAYER_RADIUS: f32 = 20.0;
/// Invisibility lasts 3 seconds of frames.
pub const INVISIBILITY_FRAMES: u32 = 3 * FPS;

/// Maximum horizontal displacement of an obstacle from its spawn x
/// before it reverses.
pub const OBSTACLE_PATROL_RANGE: f32 = 100.0;

pub const GAME_OVER_MESSAGE: &str = "Game Over! Press Enter to retry";

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Circle-vs-rectangle overlap, with the circle tested as its bounding
/// square (x ± r, y ± r). The square approximation is intentional: it is
/// what the whole collision model is tuned around.
pub fn circle_overlaps_rect(cx: f32, cy: f32, r: f32, rect: &Rect) -> bool {
    cx + r > rect.left() && cx - r < rect.right() && cy + r > rect.top() && cy - r < rect.bottom()
}

// ── Level construction ───────────────────────────────────────────────────────

fn platform(x: f32, y: f32, w: f32, h: f32) -> Platform {
    Platform {
        rect: Rect { x, y, w, h },
        hue: Hue::Green,
    }
}

fn obstacle(x: f32, y: f32, speed: f32) -> Obstacle {
    Obstacle {
        rect: Rect { x, y, w: 30.0, h: 20.0 },
        speed,
        dir: 1.0,
        initial_x: x,
        range: OBSTACLE_PATROL_RANGE,
    }
}

fn goal(x: f32, y: f32) -> Goal {
    Goal {
        rect: Rect { x, y, w: 40.0, h: 40.0 },
    }
}

/// Build the furniture for a level. Levels 1-3 are hand-authored layouts
/// of increasing density; higher levels are generated. The generator does
/// not check platforms for overlap and does not guarantee the goal is
/// reachable from the spawn point.
pub fn build_level(number: u32, rng: &mut impl Rng) -> Level {
    // Ground spans the full width on every level.
    let mut platforms = vec![platform(0.0, SCREEN_HEIGHT - 50.0, SCREEN_WIDTH, 50.0)];
    let mut obstacles = Vec::new();

    let goal = match number {
        1 => {
            platforms.push(platform(200.0, 450.0, 100.0, 20.0));
            platforms.push(platform(350.0, 350.0, 100.0, 20.0));
            platforms.push(platform(500.0, 250.0, 100.0, 20.0));

            obstacles.push(obstacle(300.0, 430.0, 2.0));

            goal(650.0, 210.0)
        }
        2 => {
            platforms.push(platform(150.0, 500.0, 100.0, 20.0));
            platforms.push(platform(300.0, 400.0, 100.0, 20.0));
            platforms.push(platform(450.0, 300.0, 100.0, 20.0));
            platforms.push(platform(600.0, 200.0, 100.0, 20.0));

            obstacles.push(obstacle(250.0, 480.0, 3.0));
            obstacles.push(obstacle(400.0, 380.0, 3.0));
            obstacles.push(obstacle(550.0, 280.0, 3.0));

            goal(650.0, 160.0)
        }
        3 => {
            platforms.push(platform(100.0, 500.0, 100.0, 20.0));
            platforms.push(platform(250.0, 450.0, 100.0, 20.0));
            platforms.push(platform(400.0, 400.0, 100.0, 20.0));
            platforms.push(platform(550.0, 350.0, 100.0, 20.0));
            platforms.push(platform(400.0, 250.0, 100.0, 20.0));
            platforms.push(platform(250.0, 150.0, 100.0, 20.0));

            obstacles.push(obstacle(150.0, 480.0, 4.0));
            obstacles.push(obstacle(300.0, 430.0, 4.0));
            obstacles.push(obstacle(450.0, 380.0, 4.0));
            obstacles.push(obstacle(450.0, 230.0, 4.0));
            obstacles.push(obstacle(300.0, 130.0, 4.0));

            goal(300.0, 110.0)
        }
        _ => {
            let platform_count = 5 + number as usize;
            for _ in 0..platform_count {
                let x = rng.gen_range(100..=(SCREEN_WIDTH as i32 - 200)) as f32;
                let y = rng.gen_range(150..=(SCREEN_HEIGHT as i32 - 100)) as f32;
                let w = rng.gen_range(80..=150) as f32;
                platforms.push(platform(x, y, w, 20.0));
            }

            let obstacle_count = 3 + (number / 2) as usize;
            for _ in 0..obstacle_count {
                let host = &platforms[rng.gen_range(0..platforms.len())];
                let x = host.rect.x + rng.gen_range(10..=(host.rect.w as i32 - 40)) as f32;
                let y = host.rect.y - 20.0;
                let speed = rng.gen_range(2..=4) as f32;
                obstacles.push(obstacle(x, y, speed));
            }

            // Goal sits centered on the visually highest platform. First
            // one wins a tie.
            let mut highest = &platforms[0];
            for p in &platforms {
                if p.rect.y < highest.rect.y {
                    highest = p;
                }
            }
            goal(
                highest.rect.x + (highest.rect.w / 2.0).floor() - 20.0,
                highest.rect.y - 40.0,
            )
        }
    };

    Level {
        number,
        platforms,
        obstacles,
        goal: Some(goal),
        spawn: (100.0, 300.0),
    }
}

fn spawn_player(level: &Level) -> Player {
    Player {
        x: level.spawn.0,
        y: level.spawn.1,
        vel_x: 0.0,
        vel_y: 0.0,
        radius: PLAYER_RADIUS,
        on_ground: false,
        invisible: false,
        invisible_frames: 0,
    }
}

/// Build the initial game state for a given level number.
pub fn init_world(number: u32, rng: &mut impl Rng) -> GameWorld {
    let level = build_level(number, rng);
    GameWorld {
        player: spawn_player(&level),
        level,
        status: GameStatus::Playing,
        message: String::new(),
        left_held: false,
        right_held: false,
    }
}

// ── Input-driven state transitions (pure) ────────────────────────────────────

/// Jump if standing on something; no-op while airborne or outside play.
pub fn jump(world: &GameWorld) -> GameWorld {
    if world.status != GameStatus::Playing || !world.player.on_ground {
        return world.clone();
    }
    GameWorld {
        player: Player {
            vel_y: JUMP_STRENGTH,
            on_ground: false,
            ..world.player.clone()
        },
        ..world.clone()
    }
}

/// Trigger invisibility. A no-op while already invisible, so re-pressing
/// cannot extend the duration.
pub fn toggle_invisibility(world: &GameWorld) -> GameWorld {
    if world.status != GameStatus::Playing || world.player.invisible {
        return world.clone();
    }
    GameWorld {
        player: Player {
            invisible: true,
            invisible_frames: 0,
            ..world.player.clone()
        },
        ..world.clone()
    }
}

/// Zero horizontal velocity (the "stop" key).
pub fn halt(world: &GameWorld) -> GameWorld {
    if world.status != GameStatus::Playing {
        return world.clone();
    }
    GameWorld {
        player: Player {
            vel_x: 0.0,
            ..world.player.clone()
        },
        ..world.clone()
    }
}

/// Reconcile this frame's held-key snapshot with the stored flags.
///
/// A fresh press nudges the player one `MOVE_STEP` sideways before the
/// held movement takes over; continuous velocity itself is resolved in
/// `tick`. Presses only register while `Playing`, but releases always do:
/// letting go of the last held direction zeroes the velocity no matter
/// which key was released first.
pub fn apply_held_keys(world: &GameWorld, left: bool, right: bool) -> GameWorld {
    let mut w = world.clone();

    if w.status == GameStatus::Playing {
        if left && !w.left_held {
            w.player.x -= MOVE_STEP;
            w.left_held = true;
        }
        if right && !w.right_held {
            w.player.x += MOVE_STEP;
            w.right_held = true;
        }
    }

    if !left && w.left_held {
        w.left_held = false;
        if !right {
            w.player.vel_x = 0.0;
        }
    }
    if !right && w.right_held {
        w.right_held = false;
        if !left {
            w.player.vel_x = 0.0;
        }
    }

    w
}

/// Advance past a level-complete or game-over screen.
///
/// From `LevelComplete` this builds the next level; from `GameOver` it
/// rebuilds the same one (retry, not advance). Both replace the level and
/// player wholesale. Held-key flags survive so a key kept pressed across
/// the transition does not re-trigger its press nudge.
pub fn confirm(world: &GameWorld, rng: &mut impl Rng) -> GameWorld {
    let number = match world.status {
        GameStatus::LevelComplete => world.level.number + 1,
        GameStatus::GameOver => world.level.number,
        GameStatus::Playing => return world.clone(),
    };
    GameWorld {
        left_held: world.left_held,
        right_held: world.right_held,
        ..init_world(number, rng)
    }
}

// ── Per-frame integration ────────────────────────────────────────────────────

/// Integrate one frame of player motion: gravity, position, horizontal
/// screen clamp, invisibility countdown.
pub fn update_player(player: &Player) -> Player {
    let mut p = player.clone();

    p.vel_y += GRAVITY;
    p.x += p.vel_x;
    p.y += p.vel_y;

    if p.x - p.radius < 0.0 {
        p.x = p.radius;
        p.vel_x = 0.0;
    } else if p.x + p.radius > SCREEN_WIDTH {
        p.x = SCREEN_WIDTH - p.radius;
        p.vel_x = 0.0;
    }

    if p.invisible {
        p.invisible_frames += 1;
        if p.invisible_frames >= INVISIBILITY_FRAMES {
            p.invisible = false;
            p.invisible_frames = 0;
        }
    }

    p
}

/// Step one obstacle along its patrol. The direction flips once the
/// rectangle passes a patrol bound; the overshooting step itself is kept,
/// so the true excursion is `range` plus at most one `speed` step.
pub fn advance_obstacle(obstacle: &Obstacle) -> Obstacle {
    let mut o = obstacle.clone();
    o.rect.x += o.speed * o.dir;

    if o.rect.x > o.initial_x + o.range {
        o.dir = -1.0;
    } else if o.rect.x < o.initial_x - o.range {
        o.dir = 1.0;
    }

    o
}

/// Advance the simulation by one frame. A no-op unless `Playing`.
pub fn tick(world: &GameWorld) -> GameWorld {
    if world.status != GameStatus::Playing {
        return world.clone();
    }
    let mut w = world.clone();

    // ── 1. Resolve held-direction velocity (left wins if both held) ──────────
    if w.left_held {
        w.player.vel_x = -MOVE_SPEED;
    } else if w.right_held {
        w.player.vel_x = MOVE_SPEED;
    }

    // ── 2. Integrate the player ──────────────────────────────────────────────
    w.player = update_player(&w.player);

    // ── 3. Resolve platform collisions ───────────────────────────────────────
    // Exactly one axis is corrected per overlapping platform. The four
    // branches are ordered and mutually exclusive: each is guarded by a
    // velocity sign plus a condition that the player's center is still on
    // the far side of the crossed edge.
    w.player.on_ground = false;
    for plat in &w.level.platforms {
        let (px, py, r) = (w.player.x, w.player.y, w.player.radius);
        let (top, bottom) = (plat.rect.top(), plat.rect.bottom());
        let (left, right) = (plat.rect.left(), plat.rect.right());

        if !circle_overlaps_rect(px, py, r, &plat.rect) {
            continue;
        }

        if w.player.vel_y > 0.0 && py + r > top && py < top {
            // Landing
            w.player.y = top - r;
            w.player.vel_y = 0.0;
            w.player.on_ground = true;
        } else if w.player.vel_y < 0.0 && py - r < bottom && py > bottom {
            // Head bump
            w.player.y = bottom + r;
            w.player.vel_y = 0.0;
        } else if w.player.vel_x > 0.0 && px + r > left && px < left {
            // Push back from the left face
            w.player.x = left - r;
            w.player.vel_x = 0.0;
        } else if w.player.vel_x < 0.0 && px - r < right && px > right {
            // Push back from the right face
            w.player.x = right + r;
            w.player.vel_x = 0.0;
        }
    }

    // ── 4. Advance obstacles ─────────────────────────────────────────────────
    let obstacles: Vec<Obstacle> = w.level.obstacles.iter().map(advance_obstacle).collect();
    w.level.obstacles = obstacles;

    // ── 5. Obstacle contact ends the run (unless invisible) ──────────────────
    if !w.player.invisible {
        for obs in &w.level.obstacles {
            if circle_overlaps_rect(w.player.x, w.player.y, w.player.radius, &obs.rect) {
                w.status = GameStatus::GameOver;
                w.message = GAME_OVER_MESSAGE.to_string();
                break;
            }
        }
    }

    // ── 6. Goal contact completes the level ──────────────────────────────────
    if let Some(goal) = &w.level.goal {
        if circle_overlaps_rect(w.player.x, w.player.y, w.player.radius, &goal.rect) {
            w.status = GameStatus::LevelComplete;
            w.message = format!(
                "Level {} Complete! Press Enter for next level",
                w.level.number
            );
        }
    }

    // ── 7. Falling off the screen ────────────────────────────────────────────
    // Runs last on purpose: a frame that somehow satisfies both the goal
    // and the fall check ends in game over.
    if w.player.y - w.player.radius > SCREEN_HEIGHT {
        w.status = GameStatus::GameOver;
        w.message = GAME_OVER_MESSAGE.to_string();
    }

    w
}
