//! Synthetic bid source.
//!
//! Two ways bids enter the engine: the generator manufactures them on a
//! randomized clock (screensaver mode), or [`parse_bid`] decodes a JSON
//! message from a live feed. Both produce a [`Bid`]; the engine does not
//! care which path it came from.
//!
//! The generator is poll-driven rather than callback-driven: the render
//! loop calls [`ParticleGenerator::poll`] once per frame with the current
//! time and gets at most one bid back. Delays between bids are bell-curve
//! distributed, values are bell-curve distributed with a heavy skew toward
//! small amounts so jackpot-sized bids stay rare.

use crate::color::{color_for_code, ColorTuple};
use crate::error::FeedError;
use crate::interp::{self, Range};
use crate::random::{RandomSource, ThreadRandom};
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

/// Bid value distribution.
const VALUE_RANGE: Range = Range::new(1.0, 1000.0);
const VALUE_SKEW: f32 = 8.0;

/// Color index distribution: centered bell over the (shuffled) palette.
const COLOR_SKEW: f32 = 1.0;

/// One bid entering the spiral: a value and a display color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bid {
    pub value: f32,
    pub color: ColorTuple,
}

/// Wire format of a live bid message.
#[derive(Debug, Deserialize)]
struct BidMessage {
    amount: f32,
    auction_type_code: String,
}

/// Decode a JSON bid message into a [`Bid`], mapping the auction type
/// code onto the color table.
pub fn parse_bid(json: &str) -> Result<Bid, FeedError> {
    let message: BidMessage = serde_json::from_str(json)?;
    if !message.amount.is_finite() || message.amount <= 0.0 {
        return Err(FeedError::InvalidAmount(message.amount));
    }
    Ok(Bid {
        value: message.amount,
        color: color_for_code(&message.auction_type_code),
    })
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Delay before the first bid of a cycle.
    pub first_delay: Duration,
    /// Bounds for the bell-distributed delay between bids.
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Skew for the delay distribution; 1 keeps the hump centered.
    pub delay_skew: f32,
    /// Colors to sample bids from.
    pub colors: Vec<ColorTuple>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            first_delay: Duration::from_millis(2000),
            min_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(7000),
            delay_skew: 1.0,
            colors: crate::color::palette(),
        }
    }
}

/// Emits randomized bids on a bell-distributed schedule.
pub struct ParticleGenerator {
    config: GeneratorConfig,
    next_emit_at: Option<Instant>,
    is_kill: bool,
}

impl ParticleGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            next_emit_at: None,
            is_kill: false,
        }
    }

    /// Arm the generator; the first bid arrives after the configured
    /// first delay.
    pub fn start(&mut self, now: Instant) {
        self.is_kill = false;
        self.next_emit_at = Some(now + self.config.first_delay);
    }

    /// Stop emitting. [`start`](Self::start) re-arms for the next cycle.
    pub fn kill(&mut self) {
        self.is_kill = true;
        self.next_emit_at = None;
    }

    pub fn is_kill(&self) -> bool {
        self.is_kill
    }

    /// Randomize the color sampling order for the next cycle.
    pub fn shuffle_colors(&mut self, rng: &mut dyn RandomSource) {
        // Fisher-Yates.
        for i in (1..self.config.colors.len()).rev() {
            let j = (rng.next_f32() * (i + 1) as f32) as usize;
            self.config.colors.swap(j.min(i), i);
        }
    }

    /// Emit a bid if its scheduled time has passed. At most one bid per
    /// call; the next one is scheduled immediately.
    pub fn poll(&mut self, now: Instant, rng: &mut dyn RandomSource) -> Option<Bid> {
        if self.is_kill {
            return None;
        }
        let due = self.next_emit_at?;
        if now < due {
            return None;
        }

        let delay_ms = interp::bell(
            rng,
            Range::new(
                self.config.min_delay.as_millis() as f32,
                self.config.max_delay.as_millis() as f32,
            ),
            self.config.delay_skew,
        );
        self.next_emit_at = Some(now + Duration::from_millis(delay_ms as u64));

        let value = interp::bell(rng, VALUE_RANGE, VALUE_SKEW);
        let color = if self.config.colors.is_empty() {
            crate::color::DEFAULT_COLOR
        } else {
            let index = interp::bell(
                rng,
                Range::new(0.0, self.config.colors.len() as f32 - 0.0001),
                COLOR_SKEW,
            ) as usize;
            self.config.colors[index.min(self.config.colors.len() - 1)]
        };
        Some(Bid { value, color })
    }
}

/// Remote control for a spawned generator thread.
pub struct GeneratorHandle {
    kill_flag: Arc<AtomicBool>,
}

impl GeneratorHandle {
    /// Make the generator's next tick a no-op; the thread exits on its
    /// own. In-flight sleeps are not interrupted.
    pub fn kill(&self) {
        self.kill_flag.store(true, Ordering::Relaxed);
    }
}

/// Run a generator on its own thread, pushing bids into `sender`. The
/// thread also exits when the receiving side is dropped.
pub fn spawn(config: GeneratorConfig, sender: mpsc::Sender<Bid>) -> GeneratorHandle {
    let kill_flag = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&kill_flag);
    thread::spawn(move || {
        let mut rng = ThreadRandom::new();
        let mut generator = ParticleGenerator::new(config);
        generator.start(Instant::now());
        loop {
            if flag.load(Ordering::Relaxed) {
                break;
            }
            thread::sleep(Duration::from_millis(16));
            if let Some(bid) = generator.poll(Instant::now(), &mut rng) {
                if sender.send(bid).is_err() {
                    break;
                }
            }
        }
    });
    GeneratorHandle { kill_flag }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DEFAULT_COLOR;
    use crate::random::{SequenceRandom, ThreadRandom};

    #[test]
    fn test_parse_bid() {
        let bid = parse_bid(r#"{"amount": 42.5, "auction_type_code": "4"}"#).unwrap();
        assert_eq!(bid.value, 42.5);
        assert_eq!(bid.color, [185, 28, 28]);
    }

    #[test]
    fn test_parse_bid_unknown_code_falls_back() {
        let bid = parse_bid(r#"{"amount": 1, "auction_type_code": "classic"}"#).unwrap();
        assert_eq!(bid.color, DEFAULT_COLOR);
    }

    #[test]
    fn test_parse_bid_rejects_bad_input() {
        assert!(matches!(parse_bid("not json"), Err(FeedError::Json(_))));
        assert!(matches!(
            parse_bid(r#"{"amount": 0, "auction_type_code": "1"}"#),
            Err(FeedError::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_bid(r#"{"amount": -5, "auction_type_code": "1"}"#),
            Err(FeedError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_waits_for_first_delay() {
        let mut generator = ParticleGenerator::new(GeneratorConfig::default());
        let mut rng = SequenceRandom::constant(0.5);
        let start = Instant::now();
        generator.start(start);
        assert!(generator.poll(start, &mut rng).is_none());
        assert!(generator
            .poll(start + Duration::from_millis(1999), &mut rng)
            .is_none());
        assert!(generator
            .poll(start + Duration::from_millis(2000), &mut rng)
            .is_some());
    }

    #[test]
    fn test_one_bid_per_poll_then_rescheduled() {
        let mut generator = ParticleGenerator::new(GeneratorConfig::default());
        let mut rng = SequenceRandom::constant(0.5);
        let start = Instant::now();
        generator.start(start);
        let due = start + Duration::from_millis(2000);
        assert!(generator.poll(due, &mut rng).is_some());
        // next delay is at least the configured minimum.
        assert!(generator.poll(due + Duration::from_millis(999), &mut rng).is_none());
    }

    #[test]
    fn test_kill_stops_emission() {
        let mut generator = ParticleGenerator::new(GeneratorConfig::default());
        let mut rng = SequenceRandom::constant(0.5);
        let start = Instant::now();
        generator.start(start);
        generator.kill();
        assert!(generator
            .poll(start + Duration::from_secs(60), &mut rng)
            .is_none());
        generator.start(start + Duration::from_secs(60));
        assert!(generator
            .poll(start + Duration::from_secs(62), &mut rng)
            .is_some());
    }

    #[test]
    fn test_values_stay_in_range_and_skew_low() {
        let mut generator = ParticleGenerator::new(GeneratorConfig {
            first_delay: Duration::ZERO,
            min_delay: Duration::ZERO,
            max_delay: Duration::from_millis(1),
            ..GeneratorConfig::default()
        });
        let mut rng = ThreadRandom::seeded(17);
        let start = Instant::now();
        generator.start(start);
        let mut sum = 0.0;
        for i in 0..500 {
            let bid = generator
                .poll(start + Duration::from_millis(i * 10), &mut rng)
                .expect("bid due");
            assert!((1.0..=1000.0).contains(&bid.value));
            sum += bid.value;
        }
        // skew 8 keeps typical bids far below the jackpot scale.
        assert!(sum / 500.0 < 100.0);
    }

    #[test]
    fn test_spawn_delivers_then_kills() {
        let (sender, receiver) = mpsc::channel();
        let handle = spawn(
            GeneratorConfig {
                first_delay: Duration::ZERO,
                min_delay: Duration::ZERO,
                max_delay: Duration::from_millis(1),
                ..GeneratorConfig::default()
            },
            sender,
        );
        let bid = receiver
            .recv_timeout(Duration::from_secs(5))
            .expect("spawned generator should deliver a bid");
        assert!((1.0..=1000.0).contains(&bid.value));
        handle.kill();
    }

    #[test]
    fn test_shuffle_preserves_palette() {
        let mut generator = ParticleGenerator::new(GeneratorConfig::default());
        let mut rng = ThreadRandom::seeded(5);
        let mut before = crate::color::palette();
        generator.shuffle_colors(&mut rng);
        let mut after = generator.config.colors.clone();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }
}
