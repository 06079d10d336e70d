//! Time-sliced drawing of traversal waves
//!
//! A [`WaveCursor`] holds the waves still to be drawn. [`animate_waves`] takes
//! one wave per tick, hands its edges to a [`WaveSink`], and only then
//! schedules the next tick with an async sleep, so the executor gets control
//! back between waves. The loop is flat: no recursion, however many waves.

use crate::{Coordinate, Wave};
use std::collections::VecDeque;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Remaining waves of a traversal, drained front to back
///
/// The cursor is finite and cannot be rewound.
#[derive(Clone, Debug, Default)]
pub struct WaveCursor {
    remaining: VecDeque<Wave>,
}

impl WaveCursor {
    pub fn new(waves: Vec<Wave>) -> Self {
        Self {
            remaining: waves.into(),
        }
    }

    /// Number of waves not drawn yet
    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.remaining.is_empty()
    }
}

impl Iterator for WaveCursor {
    type Item = Wave;

    fn next(&mut self) -> Option<Wave> {
        self.remaining.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining.len(), Some(self.remaining.len()))
    }
}

impl ExactSizeIterator for WaveCursor {}

impl From<Vec<Wave>> for WaveCursor {
    fn from(waves: Vec<Wave>) -> Self {
        Self::new(waves)
    }
}

/// Receiver of drawn edges, typically a map overlay
pub trait WaveSink {
    /// Draw one edge of the current wave
    fn draw_edge(&mut self, from: Coordinate, to: Coordinate);

    /// Called once all edges of a wave were drawn
    fn wave_finished(&mut self, _index: usize) {}
}

impl WaveSink for Vec<Wave> {
    fn draw_edge(&mut self, from: Coordinate, to: Coordinate) {
        match self.last_mut() {
            Some(wave) => wave.push((from, to)),
            None => self.push(vec![(from, to)]),
        }
    }

    fn wave_finished(&mut self, _index: usize) {
        self.push(Vec::new());
    }
}

/// Summary of one [`animate_waves`] run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimationOutcome {
    pub waves_drawn: usize,
    pub edges_drawn: usize,
    pub cancelled: bool,
}

/// Draw `cursor` into `sink`, one wave every `interval`
///
/// The cancellation token is checked before every tick and while waiting for
/// the next one. Waves left in the cursor after cancellation stay there.
pub async fn animate_waves<S: WaveSink>(
    cursor: &mut WaveCursor,
    interval: Duration,
    sink: &mut S,
    cancel: &CancellationToken,
) -> AnimationOutcome {
    let mut outcome = AnimationOutcome::default();

    loop {
        if cancel.is_cancelled() {
            outcome.cancelled = true;
            break;
        }
        let Some(wave) = cursor.next() else {
            break;
        };

        for &(from, to) in &wave {
            sink.draw_edge(from, to);
        }
        sink.wave_finished(outcome.waves_drawn);
        outcome.waves_drawn += 1;
        outcome.edges_drawn += wave.len();
        tracing::trace!(
            wave = outcome.waves_drawn,
            edges = wave.len(),
            remaining = cursor.remaining(),
            "Drew wave"
        );

        if cursor.is_finished() {
            break;
        }
        tokio::select! {
            _ = cancel.cancelled() => {
                outcome.cancelled = true;
                break;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }

    tracing::debug!(
        waves = outcome.waves_drawn,
        edges = outcome.edges_drawn,
        cancelled = outcome.cancelled,
        "Wave animation stopped"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Track, TrackColor, build_graph};
    use tokio::time::Instant;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon)
    }

    fn ring_waves() -> Vec<Wave> {
        let track = Track::from_coordinates(
            [c(0.0, 0.0), c(0.0, 1.0), c(1.0, 1.0)],
            TrackColor::Orange,
            0,
            "ring",
        )
        .unwrap();
        build_graph(&[track]).connected_waves(c(0.0, 0.0))
    }

    /// Records the tokio clock at every finished wave
    #[derive(Default)]
    struct TimedSink {
        edges: Vec<(Coordinate, Coordinate)>,
        finished_at: Vec<Instant>,
    }

    impl WaveSink for TimedSink {
        fn draw_edge(&mut self, from: Coordinate, to: Coordinate) {
            self.edges.push((from, to));
        }

        fn wave_finished(&mut self, _index: usize) {
            self.finished_at.push(Instant::now());
        }
    }

    #[test]
    fn test_cursor_drains_in_order() {
        let waves = ring_waves();
        let mut cursor = WaveCursor::new(waves.clone());
        assert_eq!(cursor.len(), waves.len());

        let drained: Vec<_> = cursor.by_ref().collect();
        assert_eq!(drained, waves);
        assert!(cursor.is_finished());
        assert!(cursor.next().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_wave_per_tick() {
        let waves = ring_waves();
        let total_edges: usize = waves.iter().map(Vec::len).sum();
        let mut cursor = WaveCursor::new(waves.clone());
        let mut sink = TimedSink::default();
        let interval = Duration::from_millis(50);

        let outcome = animate_waves(&mut cursor, interval, &mut sink, &CancellationToken::new()).await;

        assert_eq!(outcome.waves_drawn, waves.len());
        assert_eq!(outcome.edges_drawn, total_edges);
        assert!(!outcome.cancelled);
        assert_eq!(sink.edges, waves.concat());

        for pair in sink.finished_at.windows(2) {
            assert!(pair[1] - pair[0] >= interval);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_records_waves_into_vec() {
        let waves = ring_waves();
        let mut cursor = WaveCursor::from(waves.clone());
        let mut drawn: Vec<Wave> = vec![Vec::new()];

        animate_waves(
            &mut cursor,
            Duration::from_micros(100),
            &mut drawn,
            &CancellationToken::new(),
        )
        .await;

        // Every wave (including the final empty one) closes with a fresh wave
        assert_eq!(drawn.len(), waves.len() + 1);
        assert_eq!(&drawn[..waves.len()], &waves[..]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_start() {
        let mut cursor = WaveCursor::new(ring_waves());
        let total = cursor.remaining();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome =
            animate_waves(&mut cursor, Duration::from_millis(10), &mut TimedSink::default(), &cancel)
                .await;

        assert!(outcome.cancelled);
        assert_eq!(outcome.waves_drawn, 0);
        assert_eq!(cursor.remaining(), total);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_between_ticks() {
        let waves = ring_waves();
        assert!(waves.len() > 2);
        let mut cursor = WaveCursor::new(waves.clone());
        let cancel = CancellationToken::new();

        let task = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let mut drawn: Vec<Wave> = vec![Vec::new()];
                let outcome =
                    animate_waves(&mut cursor, Duration::from_secs(1), &mut drawn, &cancel).await;
                (outcome, cursor.remaining(), drawn)
            })
        };

        // Two ticks: the first wave is drawn immediately, the second after one interval
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        cancel.cancel();
        let (outcome, remaining, drawn) = task.await.unwrap();

        assert!(outcome.cancelled);
        assert_eq!(outcome.waves_drawn, 2);
        assert_eq!(remaining, waves.len() - 2);
        assert_eq!(drawn.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_cursor() {
        let mut cursor = WaveCursor::default();
        let outcome = animate_waves(
            &mut cursor,
            Duration::from_millis(1),
            &mut TimedSink::default(),
            &CancellationToken::new(),
        )
        .await;
        assert_eq!(outcome, AnimationOutcome::default());
    }
}
