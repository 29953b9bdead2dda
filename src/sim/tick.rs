//! Per-frame simulation tick
//!
//! Every call runs the same fixed pipeline:
//! Spawn → Move → Fire → Collide → Cull → Escalate.
//! Removals are always collected by id first and applied afterwards, so no
//! step mutates a collection it is still scanning.

use super::bounds::{Rect, intersects};
use super::entity::{BlockKind, Entity, EnemyKind, Viewport};
use super::state::{GameEvent, GamePhase, GameState, Hazard, POWER_UP_SCORE, SpawnKind, score_for};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held: move toward the top of the screen
    pub move_up: bool,
    /// Held: move toward the ground
    pub move_down: bool,
    /// Edge: fire was pressed this frame
    pub fire: bool,
    /// Edge: toggle pause
    pub pause: bool,
    /// Idle/demo mode - AI steers and shoots
    pub autopilot: bool,
}

impl TickInput {
    /// -1 for up, +1 for down, 0 when neither or both are held
    pub fn vertical(&self) -> f32 {
        match (self.move_up, self.move_down) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if input.pause {
        state.phase = match state.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
        };
        log::debug!("Phase -> {:?}", state.phase);
    }
    if state.phase == GamePhase::Paused {
        return;
    }

    // Nothing sensible to do with a zero, negative or NaN step
    if !(dt.is_finite() && dt > 0.0) {
        return;
    }

    let input = if input.autopilot {
        autopilot(state, input)
    } else {
        input.clone()
    };

    state.time_ticks += 1;
    state.elapsed += dt;

    spawn(state, &input, dt);
    move_entities(state, &input, dt);
    fire(state, dt);
    collide(state, dt);
    cull(state);
    escalate(state);

    state.normalize_order();

    log::trace!(
        "tick {}: blocks={} enemies={} bullets={} enemy_bullets={}",
        state.time_ticks,
        state.blocks.len(),
        state.enemies.len(),
        state.bullets.len(),
        state.enemy_bullets.len()
    );
}

/// Random block/enemy arrivals plus player shots
fn spawn(state: &mut GameState, input: &TickInput, dt: f32) {
    let chance = (state.spawn_rate * dt).min(1.0);
    if state.roll() < chance {
        let what = pick_spawn(state);
        let id = match what {
            SpawnKind::Block(kind) => state.spawn_block(kind),
            SpawnKind::Enemy(kind) => state.spawn_enemy(kind),
        };
        log::debug!("Spawned {:?} #{} at t={:.2}", what, id, state.elapsed);
        state.events.push(GameEvent::Spawned { id, what });
    }

    state.fire_cooldown = (state.fire_cooldown - dt).max(0.0);
    if input.fire && state.fire_cooldown <= 0.0 {
        let bullet_id = state.create_bullet();
        state.fire_cooldown = state.tuning.player_fire_cooldown;
        state.events.push(GameEvent::PlayerFired { bullet_id });
    }
}

/// Weighted choice between the five spawn outcomes
fn pick_spawn(state: &mut GameState) -> SpawnKind {
    let weights = state.tuning.spawn_weights;
    let table = [
        (weights.normal_block, SpawnKind::Block(BlockKind::Normal)),
        (weights.power_up, SpawnKind::Block(BlockKind::PowerUp)),
        (weights.stationary_enemy, SpawnKind::Enemy(EnemyKind::Stationary)),
        (weights.shooting_enemy, SpawnKind::Enemy(EnemyKind::Shooting)),
        (weights.flying_enemy, SpawnKind::Enemy(EnemyKind::Flying)),
    ];

    let total = match weights.total() {
        Some(total) if total > 0 => total,
        _ => return SpawnKind::Block(BlockKind::Normal),
    };
    let mut roll = state.roll_below(total);
    for (weight, what) in table {
        if roll < weight {
            return what;
        }
        roll -= weight;
    }
    SpawnKind::Block(BlockKind::Normal)
}

fn advance_all<E: Entity>(items: &mut [E], dt: f32) {
    for item in items {
        item.advance(dt);
    }
}

fn move_entities(state: &mut GameState, input: &TickInput, dt: f32) {
    state.move_player(input.vertical(), dt);

    advance_all(&mut state.blocks, dt);
    advance_all(&mut state.enemies, dt);
    advance_all(&mut state.bullets, dt);
    advance_all(&mut state.enemy_bullets, dt);
}

/// Run shooting-enemy timers and emit their bullets
fn fire(state: &mut GameState, dt: f32) {
    let mut shots = Vec::new();
    for enemy in &mut state.enemies {
        if enemy.tick_fire_timer(dt) {
            shots.push((enemy.id, enemy.muzzle()));
        }
    }

    for (enemy_id, muzzle) in shots {
        let bullet_id = state.create_enemy_bullet(muzzle);
        state.events.push(GameEvent::EnemyFired {
            enemy_id,
            bullet_id,
        });
    }
}

fn collide(state: &mut GameState, dt: f32) {
    state.hit_cooldown = (state.hit_cooldown - dt).max(0.0);

    let player_box = state.player.bounds();
    let mut hits: Vec<(Hazard, u32)> = Vec::new();
    let mut dead_blocks = Vec::new();
    let mut dead_enemies = Vec::new();
    let mut dead_bullets = Vec::new();
    let mut dead_enemy_bullets = Vec::new();

    // Player vs blocks
    for block in &state.blocks {
        if !intersects(&player_box, &block.bounds()) {
            continue;
        }
        match block.kind {
            BlockKind::PowerUp => {
                dead_blocks.push(block.id);
                state.score += POWER_UP_SCORE;
                state.events.push(GameEvent::PowerUpCollected { id: block.id });
                log::debug!("Power-up #{} collected", block.id);
            }
            BlockKind::Normal => hits.push((Hazard::Block, block.id)),
        }
    }

    // Player vs enemies
    for enemy in &state.enemies {
        if intersects(&player_box, &enemy.bounds()) {
            hits.push((Hazard::Enemy(enemy.kind), enemy.id));
        }
    }

    // Player vs enemy bullets (bullets are spent either way)
    for bullet in &state.enemy_bullets {
        if intersects(&player_box, &bullet.bounds()) {
            dead_enemy_bullets.push(bullet.id);
            hits.push((Hazard::EnemyBullet, bullet.id));
        }
    }

    // Player bullets vs enemies: first match wins, one enemy per bullet
    for bullet in &state.bullets {
        let bullet_box = bullet.bounds();
        let target = state
            .enemies
            .iter()
            .filter(|e| !dead_enemies.contains(&e.id))
            .find(|e| intersects(&bullet_box, &e.bounds()));

        if let Some(enemy) = target {
            dead_bullets.push(bullet.id);
            dead_enemies.push(enemy.id);
            state.kills += 1;
            state.score += score_for(enemy.kind);
            state.events.push(GameEvent::EnemyDestroyed {
                id: enemy.id,
                kind: enemy.kind,
                bullet_id: bullet.id,
            });
            log::debug!("Enemy #{} ({:?}) destroyed by #{}", enemy.id, enemy.kind, bullet.id);
        }
    }

    if !hits.is_empty() && state.hit_cooldown <= 0.0 {
        for (hazard, id) in hits {
            state.hits += 1;
            state.events.push(GameEvent::PlayerHit { hazard, id });
            log::debug!("Player hit by {:?} #{}", hazard, id);
        }
        state.hit_cooldown = state.tuning.hit_cooldown;
    }

    if !dead_blocks.is_empty() {
        state.blocks.retain(|b| !dead_blocks.contains(&b.id));
    }
    if !dead_enemies.is_empty() {
        state.enemies.retain(|e| !dead_enemies.contains(&e.id));
    }
    if !dead_bullets.is_empty() {
        state.bullets.retain(|b| !dead_bullets.contains(&b.id));
    }
    if !dead_enemy_bullets.is_empty() {
        state.enemy_bullets.retain(|b| !dead_enemy_bullets.contains(&b.id));
    }
}

/// Drop out-of-bounds entities from one collection, returning how many went
fn cull_all<E: Entity>(items: &mut Vec<E>, viewport: &Viewport) -> usize {
    let before = items.len();
    items.retain(|item| !item.is_out_of_bounds(viewport));
    before - items.len()
}

/// Remove everything that has left the viewport on its travel side
pub fn cull(state: &mut GameState) {
    let viewport = state.viewport;
    let count = cull_all(&mut state.blocks, &viewport)
        + cull_all(&mut state.enemies, &viewport)
        + cull_all(&mut state.bullets, &viewport)
        + cull_all(&mut state.enemy_bullets, &viewport);

    if count > 0 {
        state.events.push(GameEvent::Culled { count });
    }
}

/// Step difficulty once per elapsed escalation interval
///
/// Every interval crossed since the last step is applied at once, so a long
/// tick costs the same as a short one and emits a single `Escalated` event.
fn escalate(state: &mut GameState) {
    let interval = state.tuning.escalation_interval;
    if interval <= 0.0 {
        return;
    }
    let due = (state.elapsed / interval).floor() as u32;
    if state.escalation_level >= due {
        return;
    }
    let steps = (due - state.escalation_level) as f32;
    state.escalation_level = due;

    let mut rate = state.spawn_rate + state.tuning.rate_increaser * steps;
    if let Some(cap) = state.tuning.max_spawn_rate {
        rate = rate.min(cap);
    }
    let mut speed = state.speed_multiplier + state.tuning.speed_increaser * steps;
    if let Some(cap) = state.tuning.max_speed_multiplier {
        speed = speed.min(cap);
    }
    state.spawn_rate = rate.max(state.spawn_rate);
    state.speed_multiplier = speed.max(state.speed_multiplier);

    log::info!(
        "Escalation {}: spawn_rate={:.3} speed_multiplier={:.2}",
        state.escalation_level,
        state.spawn_rate,
        state.speed_multiplier
    );
    state.events.push(GameEvent::Escalated {
        level: state.escalation_level,
        spawn_rate: state.spawn_rate,
        speed_multiplier: state.speed_multiplier,
    });
}

/// How far ahead the autopilot looks for trouble
const AUTOPILOT_LOOKAHEAD: f32 = 360.0;
/// Extra vertical clearance the autopilot keeps around the player
const AUTOPILOT_MARGIN: f32 = 18.0;

/// Simple demo AI: dodge whatever is about to run into us, shoot enemies
/// that line up, drift toward power-ups when the lane is clear
fn autopilot(state: &GameState, input: &TickInput) -> TickInput {
    let player = state.player.bounds();
    let lane = Rect::new(
        glam::Vec2::new(player.left(), player.top() - AUTOPILOT_MARGIN),
        glam::Vec2::new(
            player.size.x + AUTOPILOT_LOOKAHEAD,
            player.size.y + AUTOPILOT_MARGIN * 2.0,
        ),
    );

    let hazards = state
        .blocks
        .iter()
        .filter(|b| b.kind == BlockKind::Normal)
        .map(|b| b.bounds())
        .chain(state.enemies.iter().map(|e| e.bounds()))
        .chain(state.enemy_bullets.iter().map(|b| b.bounds()));

    let threat = hazards
        .filter(|r| r.right() >= player.left() && intersects(&lane, r))
        .min_by(|a, b| a.left().total_cmp(&b.left()));

    let mut out = TickInput {
        pause: input.pause,
        autopilot: true,
        ..Default::default()
    };

    let center_y = player.center().y;
    if let Some(threat) = threat {
        let room_above = threat.top() - AUTOPILOT_MARGIN;
        let room_below = state.max_y() - (threat.bottom() + AUTOPILOT_MARGIN);
        // Dodge to whichever side the threat leaves more of
        if threat.center().y > center_y && room_above > player.size.y {
            out.move_up = true;
        } else if room_below > 0.0 {
            out.move_down = true;
        } else {
            out.move_up = true;
        }
    } else if let Some(power_up) = state
        .blocks
        .iter()
        .filter(|b| b.kind == BlockKind::PowerUp && b.pos.x > player.right())
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
    {
        let target = power_up.bounds().center().y;
        if (target - center_y).abs() > 4.0 {
            out.move_up = target < center_y;
            out.move_down = target > center_y;
        }
    }

    out.fire = state.enemies.iter().any(|e| {
        let r = e.bounds();
        r.left() > player.right() && r.top() <= center_y && r.bottom() >= center_y
    });

    out
}
