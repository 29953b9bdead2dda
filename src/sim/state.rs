//! Game state and core simulation types
//!
//! `GameState` is the aggregate root: it owns every entity collection, the
//! player, the difficulty counters and the seeded RNG.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Block, BlockKind, Bullet, Enemy, EnemyKind, Player, Viewport};
use super::factory::{BlockFactory, EnemyFactory};
use crate::assets::Texture;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Paused,
}

/// What the player ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hazard {
    Block,
    Enemy(EnemyKind),
    EnemyBullet,
}

/// What a spawn roll produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    Block(BlockKind),
    Enemy(EnemyKind),
}

/// Things that happened during the last tick, for the host to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: u32, what: SpawnKind },
    PlayerFired { bullet_id: u32 },
    EnemyFired { enemy_id: u32, bullet_id: u32 },
    /// Damage signal; what it costs the player is up to the host
    PlayerHit { hazard: Hazard, id: u32 },
    PowerUpCollected { id: u32 },
    EnemyDestroyed { id: u32, kind: EnemyKind, bullet_id: u32 },
    Culled { count: usize },
    Escalated { level: u32, spawn_rate: f32, speed_multiplier: f32 },
}

/// Score per enemy destroyed
pub fn score_for(kind: EnemyKind) -> u64 {
    match kind {
        EnemyKind::Stationary => 100,
        EnemyKind::Shooting => 150,
        EnemyKind::Flying => 200,
    }
}

/// Score per power-up collected
pub const POWER_UP_SCORE: u64 = 50;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub phase: GamePhase,
    pub player: Player,
    /// Live entities (append-only, id order)
    pub blocks: Vec<Block>,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    /// Simulated seconds since start (paused time excluded)
    pub elapsed: f32,
    pub time_ticks: u64,
    /// Spawn attempts per second
    pub spawn_rate: f32,
    /// Scales the scroll speed of newly spawned entities
    pub speed_multiplier: f32,
    /// Escalation steps applied so far
    pub escalation_level: u32,
    /// Seconds until the player may fire again
    pub fire_cooldown: f32,
    /// Seconds of hit immunity left
    pub hit_cooldown: f32,
    pub score: u64,
    pub hits: u32,
    pub kills: u32,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    block_factory: BlockFactory,
    enemy_factory: EnemyFactory,
    next_id: u32,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game with the given seed and tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let viewport = tuning.viewport();
        let mut player = Player::default();
        let max_y = tuning.max_y();
        player.set_position(player.pos.x, max_y / 2.0, max_y);

        log::info!(
            "New game: seed={} viewport={}x{} spawn_rate={}",
            seed,
            viewport.width,
            viewport.height,
            tuning.initial_spawn_rate
        );

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            viewport,
            phase: GamePhase::Playing,
            player,
            blocks: Vec::new(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            elapsed: 0.0,
            time_ticks: 0,
            spawn_rate: tuning.initial_spawn_rate,
            speed_multiplier: 1.0,
            escalation_level: 0,
            fire_cooldown: 0.0,
            hit_cooldown: 0.0,
            score: 0,
            hits: 0,
            kills: 0,
            events: Vec::new(),
            block_factory: BlockFactory,
            enemy_factory: EnemyFactory::from_tuning(&tuning),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Uniform random value in [0, max] from the game's RNG
    pub fn random(&mut self, max: f32) -> f32 {
        if max <= 0.0 {
            return 0.0;
        }
        self.rng.random_range(0.0..=max)
    }

    /// Uniform random value in [0, 1)
    pub fn roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    pub(crate) fn roll_below(&mut self, total: u32) -> u32 {
        self.rng.random_range(0..total)
    }

    // --- Read-only views for the host ---

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn enemy_bullets(&self) -> &[Bullet] {
        &self.enemy_bullets
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn spawn_rate(&self) -> f32 {
        self.spawn_rate
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Base movement speed (scroll, player) per frame
    pub fn speed(&self) -> Vec2 {
        Vec2::new(self.tuning.move_speed.0, self.tuning.move_speed.1)
    }

    /// Largest y the player and spawns may use
    pub fn max_y(&self) -> f32 {
        self.tuning.max_y()
    }

    pub fn window_size(&self) -> Vec2 {
        Vec2::new(self.viewport.width, self.viewport.height)
    }

    pub fn set_player_texture(&mut self, texture: Texture) {
        self.player.set_texture(texture);
    }

    // --- Mutation helpers used by the tick pipeline ---

    /// Move the player vertically; `direction` is -1 (up), 0 or +1 (down)
    pub fn move_player(&mut self, direction: f32, dt: f32) {
        let direction = if direction.is_finite() {
            direction.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let delta = direction * self.tuning.player_speed() * dt;
        let max_y = self.max_y();
        self.player.move_vertical(delta, max_y);
    }

    /// Fire a player bullet from the player's right edge. Returns its id.
    pub fn create_bullet(&mut self) -> u32 {
        let id = self.next_entity_id();
        let bounds = self.player.bounds();
        let muzzle = Vec2::new(bounds.right(), bounds.center().y);
        self.bullets
            .push(Bullet::player(id, muzzle, self.tuning.bullet_velocity()));
        id
    }

    /// Fire an enemy bullet centred on `muzzle`. Returns its id.
    pub fn create_enemy_bullet(&mut self, muzzle: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.enemy_bullets
            .push(Bullet::enemy(id, muzzle, self.tuning.bullet_velocity()));
        id
    }

    fn spawn_velocity(&self) -> Vec2 {
        Vec2::new(-self.tuning.scroll_speed() * self.speed_multiplier, 0.0)
    }

    /// Spawn a block at the right edge with a random y. Returns its id.
    pub fn spawn_block(&mut self, kind: BlockKind) -> u32 {
        let mut block = self.block_factory.create(kind);
        block.id = self.next_entity_id();
        let max_y = self.max_y();
        block.pos = Vec2::new(self.viewport.width, self.random(max_y));
        block.vel = self.spawn_velocity();
        let id = block.id;
        self.blocks.push(block);
        id
    }

    /// Spawn an enemy at the right edge with a random y. Returns its id.
    pub fn spawn_enemy(&mut self, kind: EnemyKind) -> u32 {
        let mut enemy = self.enemy_factory.create(kind);
        enemy.id = self.next_entity_id();
        let max_y = self.max_y();
        let y = self.random(max_y);
        enemy.place(Vec2::new(self.viewport.width, y));
        enemy.vel = self.spawn_velocity();
        let id = enemy.id;
        self.enemies.push(enemy);
        id
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.blocks.sort_by_key(|b| b.id);
        self.enemies.sort_by_key(|e| e.id);
        self.bullets.sort_by_key(|b| b.id);
        self.enemy_bullets.sort_by_key(|b| b.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Entity;
    use crate::sim::bounds::intersects;

    #[test]
    fn test_initial_state() {
        let state = GameState::new(1);
        assert_eq!(state.speed(), Vec2::new(0.7, 0.8));
        assert!(state.spawn_rate() <= 1.4);
        assert_eq!(state.speed_multiplier(), 1.0);
        assert!(state.blocks().is_empty());
        assert!(state.enemies().is_empty());
        assert!(state.bullets().is_empty());
        assert!(state.enemy_bullets().is_empty());
        let y = state.player().pos.y;
        assert!(y >= 0.0 && y <= state.max_y());
    }

    #[test]
    fn test_random_in_range() {
        let mut state = GameState::new(7);
        let max_y = state.max_y();
        for _ in 0..1000 {
            let y = state.random(max_y);
            assert!((0.0..=max_y).contains(&y));
        }
        assert_eq!(state.random(0.0), 0.0);
    }

    #[test]
    fn test_create_bullet() {
        let mut state = GameState::new(1);
        state.create_bullet();
        let bullet = &state.bullets()[0];
        assert_eq!(bullet.color, crate::sim::Color::BLACK);
        assert_eq!(bullet.radius, 10.0);
        assert!(bullet.vel.x > 0.0);
    }

    #[test]
    fn test_spawns_at_right_edge() {
        let mut state = GameState::new(3);
        let block_id = state.spawn_block(BlockKind::Normal);
        let enemy_id = state.spawn_enemy(EnemyKind::Flying);
        assert_ne!(block_id, enemy_id);

        let block = &state.blocks()[0];
        assert_eq!(block.pos.x, state.viewport.width);
        assert!(block.pos.y >= 0.0 && block.pos.y <= state.max_y());
        assert!(block.vel.x < 0.0);

        let enemy = &state.enemies()[0];
        assert_eq!(enemy.pos.x, state.viewport.width);
        assert!(enemy.vel.x < 0.0);
    }

    #[test]
    fn test_player_on_block_collides() {
        for kind in [BlockKind::Normal, BlockKind::PowerUp] {
            let mut state = GameState::new(11);
            state.set_player_texture(Texture::new("frame-1.png", 64, 70));
            state.spawn_block(kind);
            let pos = state.blocks()[0].pos;
            let max_y = state.max_y();
            state.player.set_position(pos.x, pos.y, max_y);
            assert!(intersects(&state.blocks()[0].bounds(), &state.player().bounds()));
        }
    }

    #[test]
    fn test_player_far_from_enemy_misses() {
        for kind in [EnemyKind::Shooting, EnemyKind::Flying, EnemyKind::Stationary] {
            let mut state = GameState::new(5);
            state.spawn_enemy(kind);
            let width = state.viewport.width;
            state.enemies[0].place(Vec2::new(2.0 * width, 100.0));
            let max_y = state.max_y();
            state.player.set_position(width, 100.0, max_y);
            assert!(!intersects(&state.enemies()[0].bounds(), &state.player().bounds()));
        }
    }

    #[test]
    fn test_bullet_on_shooting_enemy() {
        let mut state = GameState::new(9);
        state.spawn_enemy(EnemyKind::Shooting);
        let enemy_pos = state.enemies()[0].pos;

        let mut bullet = Bullet::default();
        bullet.pos = enemy_pos;
        assert!(intersects(&state.enemies()[0].bounds(), &bullet.bounds()));

        let width = state.viewport.width;
        state.enemies[0].place(Vec2::new(2.0 * width, enemy_pos.y));
        bullet.pos = Vec2::new(width, enemy_pos.y);
        assert!(!intersects(&state.enemies()[0].bounds(), &bullet.bounds()));
    }

    #[test]
    fn test_move_player_clamps() {
        let mut state = GameState::new(1);
        for _ in 0..2000 {
            state.move_player(1.0, 1.0 / 60.0);
        }
        assert_eq!(state.player().pos.y, state.max_y());
        for _ in 0..2000 {
            state.move_player(-1.0, 1.0 / 60.0);
        }
        assert_eq!(state.player().pos.y, 0.0);
    }

    #[test]
    fn test_move_player_ignores_non_finite_direction() {
        let mut state = GameState::new(1);
        let start = state.player().pos.y;
        for direction in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            state.move_player(direction, 1.0 / 60.0);
            assert_eq!(state.player().pos.y, start);
        }
        state.move_player(2.0, 1.0 / 60.0);
        assert!(state.player().pos.y > start);
        assert!(state.player().pos.y <= state.max_y());
    }
}
