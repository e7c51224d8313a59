//! Per-frame counters and where they get reported

use std::fmt;

/// Counters for one frame. Workers keep their own copy and the driver merges
/// them after the join, so nothing here is shared between threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub vertices: u32,
    pub triangles: u32,
    /// Back-facing or zero-area triangles dropped before edge setup
    pub triangles_culled: u32,
    /// Pixels in blocks that had no covered lane
    pub pixels_skipped: u64,
    /// Pixels shaded (every lane of a non-empty block)
    pub pixels_computed: u64,
    /// Shaded pixels that were not written
    pub pixels_wasted: u64,
    pub block_width: u32,
    pub block_height: u32,
}

impl RenderStats {
    pub fn new(block_width: u32, block_height: u32) -> Self {
        Self {
            block_width,
            block_height,
            ..Self::default()
        }
    }

    /// Zero every counter, keeping the block shape.
    pub fn reset(&mut self) {
        *self = Self::new(self.block_width, self.block_height);
    }

    /// Add another worker's pixel counters.
    pub fn merge_pixels(&mut self, other: &RenderStats) {
        self.pixels_skipped += other.pixels_skipped;
        self.pixels_computed += other.pixels_computed;
        self.pixels_wasted += other.pixels_wasted;
    }

    pub fn wasted_percent(&self) -> f32 {
        if self.pixels_computed == 0 {
            0.0
        } else {
            100.0 * self.pixels_wasted as f32 / self.pixels_computed as f32
        }
    }
}

impl fmt::Display for RenderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fragments ({}x{}) vertices: {} triangles: {} (culled {}) skipped: {} computed: {} wasted: {} ({:.3}%)",
            self.block_width,
            self.block_height,
            self.vertices,
            self.triangles,
            self.triangles_culled,
            self.pixels_skipped,
            self.pixels_computed,
            self.pixels_wasted,
            self.wasted_percent(),
        )
    }
}

/// Receives the merged counters once per frame.
pub trait StatsSink: Send {
    fn frame_finished(&mut self, stats: &RenderStats);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl StatsSink for NoopSink {
    fn frame_finished(&mut self, _stats: &RenderStats) {}
}

/// Logs one line per frame at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl StatsSink for TracingSink {
    fn frame_finished(&mut self, stats: &RenderStats) {
        tracing::debug!(target: "lane_raster::stats", "{stats}");
    }
}

/// Hands each frame's counters to a closure.
pub struct CallbackSink<F>(pub F);

impl<F: FnMut(&RenderStats) + Send> StatsSink for CallbackSink<F> {
    fn frame_finished(&mut self, stats: &RenderStats) {
        (self.0)(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_keeps_block_shape() {
        let mut stats = RenderStats::new(4, 2);
        stats.triangles = 9;
        stats.pixels_computed = 80;
        stats.reset();
        assert_eq!(stats, RenderStats::new(4, 2));
    }

    #[test]
    fn test_display_reports_waste() {
        let mut stats = RenderStats::new(4, 2);
        stats.pixels_computed = 200;
        stats.pixels_wasted = 50;
        let line = stats.to_string();
        assert!(line.starts_with("Fragments (4x2)"));
        assert!(line.contains("wasted: 50 (25.000%)"));
    }

    #[test]
    fn test_callback_sink_sees_every_frame() {
        let mut frames = Vec::new();
        {
            let mut sink = CallbackSink(|s: &RenderStats| frames.push(s.triangles));
            sink.frame_finished(&RenderStats { triangles: 3, ..RenderStats::default() });
            sink.frame_finished(&RenderStats { triangles: 5, ..RenderStats::default() });
        }
        assert_eq!(frames, vec![3, 5]);
    }
}
