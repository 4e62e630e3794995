//! Frame-time statistics for benchmark runs

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Summary of a measured run. Rates are frames per second; a frame is one
/// pass of the harness loop (one or more simulation steps).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameStats {
    pub frames: usize,
    pub measured_secs: f64,
    pub avg_fps: f64,
    /// Rate over the slowest 1% of frames (at least one frame)
    pub low_1pct_fps: f64,
    pub min_fps: f64,
    pub max_fps: f64,
}

fn rate(secs: f64) -> f64 {
    if secs > 0.0 { 1.0 / secs } else { 0.0 }
}

impl FrameStats {
    pub fn from_durations(durations: &[Duration]) -> Self {
        let mut secs: Vec<f64> = durations.iter().map(Duration::as_secs_f64).collect();
        let frames = secs.len();
        let measured_secs: f64 = secs.iter().sum();

        let slowest = secs.iter().copied().fold(0.0, f64::max);
        let fastest = secs.iter().copied().fold(f64::INFINITY, f64::min);

        let low_1pct_fps = if frames == 0 {
            0.0
        } else {
            secs.sort_by(|a, b| b.total_cmp(a));
            let n = (frames as f64 * 0.01).ceil().max(1.0) as usize;
            rate(secs[..n].iter().sum::<f64>() / n as f64)
        };

        Self {
            frames,
            measured_secs,
            avg_fps: if measured_secs > 0.0 { frames as f64 / measured_secs } else { 0.0 },
            low_1pct_fps,
            min_fps: rate(slowest),
            max_fps: if fastest.is_finite() { rate(fastest) } else { 0.0 },
        }
    }
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frames: {}", self.frames)?;
        writeln!(f, "Measured time: {:.3} s", self.measured_secs)?;
        writeln!(f, "Avg FPS: {:.2}", self.avg_fps)?;
        writeln!(f, "1% low FPS: {:.2}", self.low_1pct_fps)?;
        writeln!(f, "Min FPS: {:.2}", self.min_fps)?;
        write!(f, "Max FPS: {:.2}", self.max_fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|v| Duration::from_millis(*v)).collect()
    }

    #[test]
    fn test_empty_run_is_all_zero() {
        let stats = FrameStats::from_durations(&[]);
        assert_eq!(stats.frames, 0);
        assert_eq!(stats.avg_fps, 0.0);
        assert_eq!(stats.low_1pct_fps, 0.0);
        assert_eq!(stats.min_fps, 0.0);
        assert_eq!(stats.max_fps, 0.0);
    }

    #[test]
    fn test_basic_rates() {
        let stats = FrameStats::from_durations(&ms(&[10, 20, 10, 40]));
        assert_eq!(stats.frames, 4);
        assert!((stats.measured_secs - 0.08).abs() < 1e-9);
        assert!((stats.avg_fps - 50.0).abs() < 1e-6);
        assert!((stats.min_fps - 25.0).abs() < 1e-6);
        assert!((stats.max_fps - 100.0).abs() < 1e-6);
        // Fewer than 100 frames: the single slowest frame
        assert!((stats.low_1pct_fps - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_one_percent_low_averages_slowest_frames() {
        let mut values = vec![10u64; 198];
        values.extend([50, 100]);
        let stats = FrameStats::from_durations(&ms(&values));
        // 200 frames: the two slowest average 75 ms
        assert!((stats.low_1pct_fps - 1.0 / 0.075).abs() < 1e-6);
    }

    #[test]
    fn test_serializes_to_json() {
        let stats = FrameStats::from_durations(&ms(&[16, 17]));
        let json = serde_json::to_string(&stats).expect("serialize");
        assert!(json.contains("\"low_1pct_fps\""));
        assert!(stats.to_string().contains("Frames: 2"));
    }
}
