//! Cosmetic camera feed animation.
//!
//! Each feed is a handful of blobs bouncing around a fixed canvas. The
//! animation never reads sensor state; it only makes the dashboard look live.

use rand::Rng;

/// Number of blobs drawn per feed.
pub const BLOB_COUNT: usize = 8;
/// Logical canvas width of a feed.
pub const FEED_WIDTH: f64 = 320.0;
/// Logical canvas height of a feed.
pub const FEED_HEIGHT: f64 = 180.0;

/// A single moving shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
}

/// Animated feed for one unit.
#[derive(Debug, Clone)]
pub struct CameraFeed {
    unit_id: u32,
    width: f64,
    height: f64,
    blobs: Vec<Blob>,
}

impl CameraFeed {
    /// Create a feed with randomly placed blobs.
    pub fn new<R: Rng + ?Sized>(unit_id: u32, rng: &mut R) -> Self {
        Self::with_size(unit_id, FEED_WIDTH, FEED_HEIGHT, rng)
    }

    pub fn with_size<R: Rng + ?Sized>(unit_id: u32, width: f64, height: f64, rng: &mut R) -> Self {
        let blobs = (0..BLOB_COUNT)
            .map(|_| Blob {
                x: rng.gen_range(0.0..=width),
                y: rng.gen_range(0.0..=height),
                vx: rng.gen_range(-1.0..=1.0),
                vy: rng.gen_range(-1.0..=1.0),
                radius: rng.gen_range(8.0..=20.0),
            })
            .collect();

        Self {
            unit_id,
            width,
            height,
            blobs,
        }
    }

    pub fn unit_id(&self) -> u32 {
        self.unit_id
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    /// Advance every blob one frame, reflecting off the edges.
    pub fn step(&mut self) {
        for blob in &mut self.blobs {
            blob.x += blob.vx;
            blob.y += blob.vy;

            if blob.x < 0.0 || blob.x > self.width {
                blob.vx = -blob.vx;
                blob.x = blob.x.clamp(0.0, self.width);
            }
            if blob.y < 0.0 || blob.y > self.height {
                blob.vy = -blob.vy;
                blob.y = blob.y.clamp(0.0, self.height);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_feed_has_fixed_blob_count() {
        let mut rng = StdRng::seed_from_u64(3);
        let feed = CameraFeed::new(1, &mut rng);
        assert_eq!(feed.blobs().len(), BLOB_COUNT);
        assert_eq!(feed.unit_id(), 1);
    }

    #[test]
    fn test_blobs_stay_within_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut feed = CameraFeed::with_size(1, 40.0, 30.0, &mut rng);
        for _ in 0..5_000 {
            feed.step();
            for blob in feed.blobs() {
                assert!((0.0..=40.0).contains(&blob.x));
                assert!((0.0..=30.0).contains(&blob.y));
            }
        }
    }

    #[test]
    fn test_blob_bounces_off_edge() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut feed = CameraFeed::with_size(1, 10.0, 10.0, &mut rng);
        feed.blobs = vec![Blob {
            x: 9.5,
            y: 5.0,
            vx: 1.0,
            vy: 0.0,
            radius: 1.0,
        }];
        feed.step();
        assert_eq!(feed.blobs()[0].x, 10.0);
        assert_eq!(feed.blobs()[0].vx, -1.0);
    }
}
