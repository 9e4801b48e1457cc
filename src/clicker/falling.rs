//! Decorative falling sprites. Purely visual; never touches the economy.

/// Animation frames a sprite takes to cross the play area (10 s at 10 fps).
pub const FALL_FRAMES: u32 = 100;

/// Animation frames between upgrade sprite waves (3 s).
pub const WAVE_FRAMES: u32 = 30;

/// Chance (percent) that a click drops a mushroom.
pub const CLICK_DROP_PERCENT: u32 = 30;

/// Cap on live sprites so a large collection doesn't flood the screen.
const MAX_SPRITES: usize = 120;

const MUSHROOM_GLYPH: char = '🍄';

/// Small xorshift generator. Deterministic for a given seed.
#[derive(Clone, Debug)]
pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Uniform in `lo..=hi`.
    pub fn range(&mut self, lo: u32, hi: u32) -> u32 {
        lo + self.next_u32() % (hi - lo + 1)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub glyph: char,
    /// Horizontal position as a fraction of the play-area width.
    pub x: f64,
    /// Starting offset above the top edge, as a fraction of the height.
    pub lead: f64,
    /// Frames since spawn.
    pub age: u32,
    /// Mushrooms from clicks are drawn bold.
    pub big: bool,
}

impl Sprite {
    /// Row within an area `height` rows tall, or `None` while above or below it.
    pub fn row(&self, height: u16) -> Option<u16> {
        if height == 0 {
            return None;
        }
        let progress = self.age as f64 / FALL_FRAMES as f64;
        let travel = 1.0 + self.lead;
        let y = (progress * travel - self.lead) * height as f64;
        if y < 0.0 || y >= height as f64 {
            None
        } else {
            Some(y as u16)
        }
    }

    pub fn col(&self, width: u16) -> u16 {
        if width == 0 {
            return 0;
        }
        ((self.x * width as f64) as u16).min(width - 1)
    }
}

#[derive(Clone, Debug)]
pub struct FallingSprites {
    pub sprites: Vec<Sprite>,
    rng: Rng,
    frames_to_wave: u32,
}

impl FallingSprites {
    pub fn new(seed: u32) -> Self {
        Self {
            sprites: Vec::new(),
            rng: Rng::new(seed),
            frames_to_wave: WAVE_FRAMES,
        }
    }

    fn push(&mut self, sprite: Sprite) {
        if self.sprites.len() >= MAX_SPRITES {
            self.sprites.remove(0);
        }
        self.sprites.push(sprite);
    }

    /// Maybe drop a mushroom for an accepted click.
    pub fn on_click(&mut self) {
        if self.rng.range(0, 99) < CLICK_DROP_PERCENT {
            let x = self.rng.next_unit();
            let lead = 0.2 + self.rng.next_unit() * 0.4;
            self.push(Sprite {
                glyph: MUSHROOM_GLYPH,
                x,
                lead,
                age: 0,
                big: true,
            });
        }
    }

    /// Spawn one wave: for every `(glyph, owned)` with owned > 0, between one
    /// and three sprites, never more than owned.
    pub fn spawn_wave(&mut self, owned: &[(char, u32)]) {
        for &(glyph, count) in owned {
            if count == 0 {
                continue;
            }
            let n = self.rng.range(1, 3).min(count);
            for _ in 0..n {
                let x = self.rng.next_unit();
                let lead = 0.1 + self.rng.next_unit() * 0.2;
                self.push(Sprite {
                    glyph,
                    x,
                    lead,
                    age: 0,
                    big: false,
                });
            }
        }
    }

    /// Advance by `frames` animation frames. `owned` feeds the periodic waves.
    pub fn advance(&mut self, frames: u32, owned: &[(char, u32)]) {
        if frames == 0 {
            return;
        }
        for s in &mut self.sprites {
            s.age = s.age.saturating_add(frames);
        }
        self.sprites.retain(|s| s.age < FALL_FRAMES);

        let mut remaining = frames;
        while remaining >= self.frames_to_wave {
            remaining -= self.frames_to_wave;
            self.frames_to_wave = WAVE_FRAMES;
            self.spawn_wave(owned);
        }
        self.frames_to_wave -= remaining;
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
        self.frames_to_wave = WAVE_FRAMES;
    }
}
