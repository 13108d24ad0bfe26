//! # Appearance
//!
//! Opaque visual descriptors for entities and tiles.
//!
//! The core never draws anything. It only tracks which token and glyph the
//! presentation layer should use, and advances per-appearance animation clocks
//! once per consumed player turn.

use rand::Rng;

/// Frame-cycling state owned by a single appearance.
///
/// Every animated appearance has its own clock. The clock starts at a random
/// offset so that a room full of identical monsters does not animate in lockstep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    /// Ticks spent on each frame
    pub period: u32,
    /// Ticks spent on the current frame so far
    pub clock: u32,
    /// Index of the current frame
    pub frame: usize,
}

impl Animation {
    /// Creates an animation with a randomized phase in `[0, period)`.
    pub fn new<R: Rng + ?Sized>(period: u32, rng: &mut R) -> Self {
        let period = period.max(1);
        Self::with_clock(period, rng.gen_range(0..period))
    }

    /// Creates an animation with an explicit starting clock.
    pub fn with_clock(period: u32, clock: u32) -> Self {
        Self {
            period: period.max(1),
            clock,
            frame: 0,
        }
    }
}

/// Visual descriptor resolved into glyphs and colours by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appearance {
    /// Palette key, e.g. `"trooper"` or `"wall"`
    pub token: &'static str,
    /// Glyph sequence; a single entry for static appearances
    pub glyphs: &'static [char],
    /// Frame cycling, if any
    pub animation: Option<Animation>,
}

impl Appearance {
    /// Creates a static appearance.
    ///
    /// # Examples
    ///
    /// ```
    /// use cosmic_chaos::Appearance;
    ///
    /// let mut pill = Appearance::fixed("heal_pills", &['!']);
    /// pill.tick();
    /// assert_eq!(pill.glyph(), '!');
    /// ```
    pub fn fixed(token: &'static str, glyphs: &'static [char]) -> Self {
        Self {
            token,
            glyphs,
            animation: None,
        }
    }

    /// Creates an animated appearance with a randomized starting phase.
    pub fn animated<R: Rng + ?Sized>(
        token: &'static str,
        glyphs: &'static [char],
        period: u32,
        rng: &mut R,
    ) -> Self {
        Self {
            token,
            glyphs,
            animation: Some(Animation::new(period, rng)),
        }
    }

    /// Appearance shared by every corpse.
    pub fn corpse() -> Self {
        Self::fixed("corpse", &['%'])
    }

    /// Whether this appearance cycles frames.
    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }

    /// The glyph for the current frame.
    pub fn glyph(&self) -> char {
        let frame = self.animation.as_ref().map_or(0, |anim| anim.frame);
        self.glyphs
            .get(frame)
            .or_else(|| self.glyphs.first())
            .copied()
            .unwrap_or('?')
    }

    /// Advances the animation clock by one tick.
    ///
    /// When the clock reaches the period the frame advances, wrapping back to the
    /// first glyph after the last one.
    pub fn tick(&mut self) {
        let frame_count = self.glyphs.len();
        if let Some(anim) = self.animation.as_mut() {
            anim.clock += 1;
            if anim.clock >= anim.period {
                anim.clock = 0;
                anim.frame += 1;
                if anim.frame >= frame_count {
                    anim.frame = 0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TROOPER: &[char] = &['T', 'r', 'o'];

    #[test]
    fn test_random_phase_stays_below_period() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let anim = Animation::new(5, &mut rng);
            assert!(anim.clock < 5);
            assert_eq!(anim.frame, 0);
        }
    }

    #[test]
    fn test_frame_advances_once_per_period_and_wraps() {
        let mut appearance = Appearance {
            token: "trooper",
            glyphs: TROOPER,
            animation: Some(Animation::with_clock(2, 0)),
        };

        assert_eq!(appearance.glyph(), 'T');
        appearance.tick();
        assert_eq!(appearance.glyph(), 'T');
        appearance.tick();
        assert_eq!(appearance.glyph(), 'r');
        appearance.tick();
        appearance.tick();
        assert_eq!(appearance.glyph(), 'o');
        appearance.tick();
        appearance.tick();
        assert_eq!(appearance.glyph(), 'T');
    }

    #[test]
    fn test_corpse_is_static() {
        let mut corpse = Appearance::corpse();
        assert!(!corpse.is_animated());
        corpse.tick();
        assert_eq!(corpse.glyph(), '%');
        assert_eq!(corpse.token, "corpse");
    }
}
