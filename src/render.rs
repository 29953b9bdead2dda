//! Draw-list extraction
//!
//! The simulation knows nothing about graphics APIs. Each frame the host pulls
//! a flat list of [`DrawItem`]s out of the state and feeds it to whatever
//! [`DrawSink`] it owns. [`TextCanvas`] is a tiny sink that rasterises to
//! characters, used by the headless binary and in tests.

use std::fmt;

use serde::Serialize;

use crate::sim::{BlockKind, Color, EnemyKind, Entity, GameState, Rect, Viewport};

/// What an item depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visual {
    Player,
    Block(BlockKind),
    Enemy(EnemyKind),
    PlayerBullet,
    EnemyBullet,
}

impl Visual {
    fn glyph(self) -> char {
        match self {
            Visual::Player => '@',
            Visual::Block(BlockKind::Normal) => '#',
            Visual::Block(BlockKind::PowerUp) => '+',
            Visual::Enemy(EnemyKind::Stationary) => 'E',
            Visual::Enemy(EnemyKind::Shooting) => 'S',
            Visual::Enemy(EnemyKind::Flying) => 'F',
            Visual::PlayerBullet => '-',
            Visual::EnemyBullet => '*',
        }
    }

    /// Flat fill used when there's no texture
    pub fn default_color(self) -> Color {
        match self {
            Visual::Player => Color::rgb(40, 120, 220),
            Visual::Block(BlockKind::Normal) => Color::rgb(120, 90, 60),
            Visual::Block(BlockKind::PowerUp) => Color::rgb(250, 200, 40),
            Visual::Enemy(EnemyKind::Stationary) => Color::rgb(90, 160, 90),
            Visual::Enemy(EnemyKind::Shooting) => Color::rgb(200, 80, 160),
            Visual::Enemy(EnemyKind::Flying) => Color::rgb(110, 200, 230),
            Visual::PlayerBullet => Color::BLACK,
            Visual::EnemyBullet => Color::RED,
        }
    }
}

/// One thing to draw this frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawItem {
    pub visual: Visual,
    pub rect: Rect,
    pub color: Color,
    /// Texture name, when the host supplied one
    pub texture: Option<String>,
}

/// Receives draw items from the host's frame loop
pub trait DrawSink {
    fn begin_frame(&mut self, _viewport: &Viewport) {}
    fn draw(&mut self, item: &DrawItem);
    fn end_frame(&mut self) {}
}

/// Everything visible in `state`, back to front: blocks, enemies, bullets, player
pub fn draw_list(state: &GameState) -> Vec<DrawItem> {
    let mut items = Vec::with_capacity(
        state.blocks.len() + state.enemies.len() + state.bullets.len() + state.enemy_bullets.len() + 1,
    );

    for block in state.blocks() {
        let visual = Visual::Block(block.kind);
        items.push(flat(visual, block.bounds()));
    }
    for enemy in state.enemies() {
        let visual = Visual::Enemy(enemy.kind);
        items.push(flat(visual, enemy.bounds()));
    }
    for bullet in state.bullets() {
        items.push(DrawItem {
            color: bullet.color,
            ..flat(Visual::PlayerBullet, bullet.bounds())
        });
    }
    for bullet in state.enemy_bullets() {
        items.push(DrawItem {
            color: bullet.color,
            ..flat(Visual::EnemyBullet, bullet.bounds())
        });
    }

    let player = state.player();
    items.push(DrawItem {
        visual: Visual::Player,
        rect: player.bounds(),
        color: Visual::Player.default_color(),
        texture: player.texture.as_ref().map(|t| t.name.clone()),
    });

    items
}

fn flat(visual: Visual, rect: Rect) -> DrawItem {
    DrawItem {
        visual,
        rect,
        color: visual.default_color(),
        texture: None,
    }
}

/// Push one frame of `state` through `sink`
pub fn render(state: &GameState, sink: &mut dyn DrawSink) {
    sink.begin_frame(&state.viewport);
    for item in draw_list(state) {
        sink.draw(&item);
    }
    sink.end_frame();
}

/// Character-cell rasteriser
#[derive(Debug, Clone)]
pub struct TextCanvas {
    cols: usize,
    rows: usize,
    cells: Vec<char>,
    scale: (f32, f32),
}

impl TextCanvas {
    pub fn new(cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cells: vec![' '; cols * rows],
            scale: (1.0, 1.0),
        }
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<char> {
        if col < self.cols && row < self.rows {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Cell column/row range covered by a world rect, clipped to the canvas
    fn cell_span(&self, rect: &Rect) -> Option<(usize, usize, usize, usize)> {
        let to_col = |x: f32| x * self.scale.0;
        let to_row = |y: f32| y * self.scale.1;

        let (x0, x1) = (to_col(rect.left()), to_col(rect.right()));
        let (y0, y1) = (to_row(rect.top()), to_row(rect.bottom()));
        if x1 <= 0.0 || y1 <= 0.0 || x0 >= self.cols as f32 || y0 >= self.rows as f32 {
            return None;
        }

        let left = x0.floor().max(0.0);
        let top = y0.floor().max(0.0);
        // Always cover at least one cell
        let right = x1.ceil().max(left + 1.0).min(self.cols as f32);
        let bottom = y1.ceil().max(top + 1.0).min(self.rows as f32);
        Some((left as usize, right as usize, top as usize, bottom as usize))
    }
}

impl DrawSink for TextCanvas {
    fn begin_frame(&mut self, viewport: &Viewport) {
        self.cells.fill(' ');
        self.scale = (
            self.cols as f32 / viewport.width.max(1.0),
            self.rows as f32 / viewport.height.max(1.0),
        );
    }

    fn draw(&mut self, item: &DrawItem) {
        let Some((c0, c1, r0, r1)) = self.cell_span(&item.rect) else {
            return;
        };
        let glyph = item.visual.glyph();
        for row in r0..r1 {
            for col in c0..c1 {
                self.cells[row * self.cols + col] = glyph;
            }
        }
    }
}

impl fmt::Display for TextCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border: String = std::iter::repeat_n('-', self.cols).collect();
        writeln!(f, "+{}+", border)?;
        for row in self.cells.chunks(self.cols) {
            let line: String = row.iter().collect();
            writeln!(f, "|{}|", line)?;
        }
        write!(f, "+{}+", border)
    }
}
