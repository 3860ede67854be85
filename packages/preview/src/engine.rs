//! # Live Preview Engine
//!
//! Turns a stream of document changes into a flicker-free preview: builds
//! are debounced off the interaction path, rendered into whichever of two
//! slots is currently hidden, and swapped in with a crossfade once the
//! artifact is decoded.
//!
//! ## State machine
//!
//! Per slot: `Empty → Ready → (front | released)`. Engine-level: a `front`
//! designation plus an optional `fade_to` transition target.
//!
//! - Every document change restarts the settle timer (trailing-edge
//!   debounce): only the last state of an edit burst is built.
//! - When the timer fires, the build targets `front.other()` as read *at
//!   fire time*, so a slot that became front since the previous schedule
//!   is never rebuilt redundantly.
//! - Build and probe are chained into one future; a slot is only ever
//!   overwritten atomically with complete metadata, never half-rendered.
//! - Each slot carries an issued-version counter. A completion whose
//!   captured version is no longer the latest issued for its slot is
//!   discarded, so late results cannot clobber newer ones.
//! - The crossfade timer commits `front` and releases the old front
//!   slot's artifact and metadata, bounding memory to at most two decoded
//!   artifacts (one at steady state).
//! - Build or probe failures log and change nothing; the front slot keeps
//!   showing the last good artifact and the next edit retries naturally.
//! - Dropping the [`LivePreview`] handle aborts the engine task, which
//!   cancels both timers and orphans any in-flight build.

use crate::artifact::{ArtifactBuilder, ArtifactDecoder, ArtifactError, PageInfo};
use crate::layout;
use cvflow_model::Cv;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// One of the two render buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotId {
    Alpha,
    Beta,
}

impl SlotId {
    pub fn other(self) -> SlotId {
        match self {
            SlotId::Alpha => SlotId::Beta,
            SlotId::Beta => SlotId::Alpha,
        }
    }

    fn idx(self) -> usize {
        match self {
            SlotId::Alpha => 0,
            SlotId::Beta => 1,
        }
    }
}

/// Tuning knobs for the engine.
#[derive(Debug, Clone)]
pub struct PreviewOptions {
    /// Debounce delay between the last edit and a build.
    pub settle: Duration,
    /// Crossfade duration.
    pub transition: Duration,
    /// Vertical gap between rendered pages.
    pub page_gap: f64,
    /// Optional hard cap on the rendered width.
    pub max_width: Option<f64>,
    /// Optional cap on the total stack height; constrains width once a
    /// slot's page count and aspect ratio are known.
    pub max_height: Option<f64>,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(200),
            transition: Duration::from_millis(300),
            page_gap: 16.0,
            max_width: None,
            max_height: None,
        }
    }
}

/// What one slot contributes to the rendered frame.
#[derive(Debug, Clone, Default)]
pub struct SlotView {
    pub artifact: Option<Arc<Vec<u8>>>,
    pub page_count: usize,
    pub aspect_ratio: Option<f64>,
    /// 0 or 1; the UI animates toward this over [`PreviewFrame::transition`].
    pub opacity_target: f64,
}

/// Snapshot of the engine's visible state, published after every change.
#[derive(Debug, Clone)]
pub struct PreviewFrame {
    pub slots: [SlotView; 2],
    pub front: SlotId,
    pub fade_to: Option<SlotId>,
    /// Resolved display width.
    pub width: f64,
    /// Height to reserve so the container is stable across crossfades.
    pub reserved_height: f64,
    pub transition: Duration,
}

impl PreviewFrame {
    pub fn slot(&self, id: SlotId) -> &SlotView {
        &self.slots[id.idx()]
    }

    /// The slot currently designated front.
    pub fn front_view(&self) -> &SlotView {
        self.slot(self.front)
    }
}

#[derive(Debug, Clone, Default)]
struct SlotData {
    artifact: Option<Arc<Vec<u8>>>,
    page_count: usize,
    aspect_ratio: Option<f64>,
}

type BuildOutcome = (SlotId, u64, Result<(Vec<u8>, PageInfo), ArtifactError>);

/// Handle to a running preview engine. Dropping it tears the engine down:
/// pending timers are cancelled and in-flight builds are ignored.
pub struct LivePreview {
    frames: watch::Receiver<PreviewFrame>,
    width_tx: watch::Sender<f64>,
    task: JoinHandle<()>,
}

impl LivePreview {
    /// Spawn the engine against a document subscription (see
    /// `CvStore::subscribe` in `cvflow-store`). A build for the current
    /// document is scheduled immediately, after the usual settle delay.
    pub fn spawn(
        doc_rx: watch::Receiver<Arc<Cv>>,
        builder: Arc<dyn ArtifactBuilder>,
        decoder: Arc<dyn ArtifactDecoder>,
        options: PreviewOptions,
    ) -> Self {
        let (width_tx, width_rx) = watch::channel(layout::DEFAULT_CONTAINER_WIDTH);
        let initial = make_frame(
            &<[SlotData; 2]>::default(),
            SlotId::Alpha,
            None,
            layout::DEFAULT_CONTAINER_WIDTH,
            &options,
        );
        let (frame_tx, frames) = watch::channel(initial);
        let task = tokio::spawn(run(doc_rx, width_rx, builder, decoder, options, frame_tx));
        Self {
            frames,
            width_tx,
            task,
        }
    }

    /// Subscribe to published frames.
    pub fn frames(&self) -> watch::Receiver<PreviewFrame> {
        self.frames.clone()
    }

    /// The most recently published frame.
    pub fn frame(&self) -> PreviewFrame {
        self.frames.borrow().clone()
    }

    /// Report the observed container width (resize observation).
    pub fn set_container_width(&self, width: f64) {
        let _ = self.width_tx.send(width);
    }
}

impl Drop for LivePreview {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    mut doc_rx: watch::Receiver<Arc<Cv>>,
    mut width_rx: watch::Receiver<f64>,
    builder: Arc<dyn ArtifactBuilder>,
    decoder: Arc<dyn ArtifactDecoder>,
    options: PreviewOptions,
    frame_tx: watch::Sender<PreviewFrame>,
) {
    let mut slots = <[SlotData; 2]>::default();
    // Latest build version issued per slot; completions that captured an
    // older version are stale and discarded.
    let mut issued: [u64; 2] = [0, 0];
    let mut front = SlotId::Alpha;
    let mut fade_to: Option<SlotId> = None;

    let mut builds: FuturesUnordered<BoxFuture<'static, BuildOutcome>> = FuturesUnordered::new();

    // Build once for the initial document, then on every change.
    let mut settle_deadline: Option<Instant> = Some(Instant::now() + options.settle);
    let mut fade_deadline: Option<Instant> = None;

    let mut container_width = *width_rx.borrow();
    let mut doc_open = true;
    let mut width_open = true;

    loop {
        tokio::select! {
            changed = doc_rx.changed(), if doc_open => {
                match changed {
                    Ok(()) => {
                        doc_rx.borrow_and_update();
                        // Trailing-edge debounce: restart on every change.
                        settle_deadline = Some(Instant::now() + options.settle);
                    }
                    // Store dropped; no further edits will arrive.
                    Err(_) => doc_open = false,
                }
            }

            changed = width_rx.changed(), if width_open => {
                match changed {
                    Ok(()) => {
                        container_width = *width_rx.borrow_and_update();
                        let _ = frame_tx.send(make_frame(
                            &slots, front, fade_to, container_width, &options,
                        ));
                    }
                    Err(_) => width_open = false,
                }
            }

            _ = sleep_until(settle_deadline.unwrap_or_else(Instant::now)),
                if settle_deadline.is_some() =>
            {
                settle_deadline = None;
                // Target whichever slot is hidden *now*, not when the edit
                // happened; front may have moved since.
                let target = front.other();
                issued[target.idx()] += 1;
                let version = issued[target.idx()];

                let doc = doc_rx.borrow().clone();
                let builder = builder.clone();
                let decoder = decoder.clone();
                builds.push(Box::pin(async move {
                    let outcome = async {
                        let bytes = builder.build(doc).await?;
                        let info = decoder.probe(&bytes).await?;
                        Ok((bytes, info))
                    }
                    .await;
                    (target, version, outcome)
                }));
            }

            Some((slot, version, outcome)) = builds.next(), if !builds.is_empty() => {
                if version != issued[slot.idx()] {
                    tracing::debug!(?slot, version, "discarding stale build result");
                } else {
                    match outcome {
                        Ok((bytes, info)) => {
                            slots[slot.idx()] = SlotData {
                                artifact: Some(Arc::new(bytes)),
                                page_count: info.page_count,
                                aspect_ratio: Some(info.aspect_ratio),
                            };
                            if slot != front {
                                fade_to = Some(slot);
                                fade_deadline = Some(Instant::now() + options.transition);
                            }
                            let _ = frame_tx.send(make_frame(
                                &slots, front, fade_to, container_width, &options,
                            ));
                        }
                        Err(err) => {
                            tracing::warn!(
                                ?slot,
                                error = %err,
                                "preview build failed; keeping last good artifact"
                            );
                        }
                    }
                }
            }

            _ = sleep_until(fade_deadline.unwrap_or_else(Instant::now)),
                if fade_deadline.is_some() =>
            {
                fade_deadline = None;
                if let Some(to) = fade_to.take() {
                    front = to;
                    // Release the old front so memory stays bounded.
                    slots[front.other().idx()] = SlotData::default();
                }
                let _ = frame_tx.send(make_frame(
                    &slots, front, fade_to, container_width, &options,
                ));
            }

            else => break,
        }
    }
}

fn make_frame(
    slots: &[SlotData; 2],
    front: SlotId,
    fade_to: Option<SlotId>,
    container_width: f64,
    options: &PreviewOptions,
) -> PreviewFrame {
    let caps = [
        layout::width_from_height_limit(
            slots[0].page_count,
            slots[0].aspect_ratio,
            options.page_gap,
            options.max_height,
        ),
        layout::width_from_height_limit(
            slots[1].page_count,
            slots[1].aspect_ratio,
            options.page_gap,
            options.max_height,
        ),
    ];
    let width = layout::resolve_width(container_width, options.max_width, caps);

    let reserved_height = layout::stack_height(
        width,
        slots[0].page_count,
        slots[0].aspect_ratio,
        options.page_gap,
    )
    .max(layout::stack_height(
        width,
        slots[1].page_count,
        slots[1].aspect_ratio,
        options.page_gap,
    ));

    let opacity = |id: SlotId| -> f64 {
        match fade_to {
            Some(to) if to == id => 1.0,
            Some(_) => 0.0,
            None if front == id => 1.0,
            None => 0.0,
        }
    };

    let view = |id: SlotId| -> SlotView {
        let data = &slots[id.idx()];
        SlotView {
            artifact: data.artifact.clone(),
            page_count: data.page_count,
            aspect_ratio: data.aspect_ratio,
            opacity_target: opacity(id),
        }
    };

    PreviewFrame {
        slots: [view(SlotId::Alpha), view(SlotId::Beta)],
        front,
        fade_to,
        width,
        reserved_height,
        transition: options.transition,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_targets_follow_fade_intent() {
        let slots = <[SlotData; 2]>::default();
        let opts = PreviewOptions::default();

        // Steady state: front fully visible, back hidden.
        let frame = make_frame(&slots, SlotId::Alpha, None, 800.0, &opts);
        assert_eq!(frame.slot(SlotId::Alpha).opacity_target, 1.0);
        assert_eq!(frame.slot(SlotId::Beta).opacity_target, 0.0);

        // Mid-fade: the target heads to 1, everything else to 0.
        let frame = make_frame(&slots, SlotId::Alpha, Some(SlotId::Beta), 800.0, &opts);
        assert_eq!(frame.slot(SlotId::Alpha).opacity_target, 0.0);
        assert_eq!(frame.slot(SlotId::Beta).opacity_target, 1.0);
    }

    #[test]
    fn test_reserved_height_takes_larger_slot() {
        let mut slots = <[SlotData; 2]>::default();
        slots[0] = SlotData {
            artifact: None,
            page_count: 1,
            aspect_ratio: Some(1.0),
        };
        slots[1] = SlotData {
            artifact: None,
            page_count: 3,
            aspect_ratio: Some(1.0),
        };
        let opts = PreviewOptions {
            page_gap: 10.0,
            ..PreviewOptions::default()
        };

        let frame = make_frame(&slots, SlotId::Alpha, None, 100.0, &opts);
        assert!((frame.reserved_height - (300.0 + 20.0)).abs() < 1e-9);
    }
}
