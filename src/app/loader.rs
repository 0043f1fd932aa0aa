//! Background image decoding.
//!
//! Decoding a handful of photos can take long enough to stall a frame, so
//! it runs on worker threads that report back over a channel.  The UI draws
//! placeholders until each image arrives.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use image::RgbaImage;
use tokio::sync::mpsc;

use crate::core::gallery::ImageSource;

/// Resolution built-in scenes are painted at.
const SCENE_SIZE: (u32, u32) = (480, 320);

/// Longest edge kept after decoding.  Terminal cells are coarse; anything
/// larger only costs time when fitting.
pub const MAX_DECODED_EDGE: u32 = 1024;

#[derive(Debug)]
pub enum LoadUpdate {
    Decoded { index: usize, image: Arc<RgbaImage> },
    Failed { index: usize, error: String },
    WorkerDone,
}

/// Handle on a running decode batch.
pub struct DecodeJob {
    generation: u64,
    remaining_workers: usize,
    cancel: Arc<AtomicBool>,
}

impl DecodeJob {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_loading(&self) -> bool {
        self.remaining_workers > 0
    }

    /// Account for a finished worker.  Returns `true` when it was the last.
    pub fn worker_done(&mut self) -> bool {
        self.remaining_workers = self.remaining_workers.saturating_sub(1);
        self.remaining_workers == 0
    }
}

/// Decode every source in the background.
///
/// Updates are tagged with `generation` so a superseded batch can be told
/// apart from the current one.
pub fn spawn_decode(
    tx: &mpsc::UnboundedSender<(u64, LoadUpdate)>,
    generation: u64,
    sources: &[ImageSource],
) -> DecodeJob {
    let cancel = Arc::new(AtomicBool::new(false));
    let jobs: VecDeque<(usize, ImageSource)> = sources.iter().cloned().enumerate().collect();
    let job_count = jobs.len();
    let queue = Arc::new(Mutex::new(jobs));

    let max_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .max(1);
    let worker_count = if job_count > 0 { max_threads.min(job_count) } else { 0 };

    for _ in 0..worker_count {
        let queue = Arc::clone(&queue);
        let cancel = Arc::clone(&cancel);
        let tx = tx.clone();
        std::thread::spawn(move || {
            loop {
                if cancel.load(Ordering::Relaxed) {
                    break;
                }
                let next = match queue.lock() {
                    Ok(mut q) => q.pop_front(),
                    Err(_) => None,
                };
                let Some((index, source)) = next else {
                    break;
                };

                let update = match decode_source(&source) {
                    Ok(image) => LoadUpdate::Decoded {
                        index,
                        image: Arc::new(image),
                    },
                    Err(e) => LoadUpdate::Failed {
                        index,
                        error: format!("{e:#}"),
                    },
                };
                if tx.send((generation, update)).is_err() {
                    return;
                }
            }
            let _ = tx.send((generation, LoadUpdate::WorkerDone));
        });
    }

    DecodeJob {
        generation,
        remaining_workers: worker_count,
        cancel,
    }
}

/// Produce pixels for one source.
pub fn decode_source(source: &ImageSource) -> anyhow::Result<RgbaImage> {
    let t0 = std::time::Instant::now();
    let image = match source {
        ImageSource::Builtin(scene) => scene.render(SCENE_SIZE.0, SCENE_SIZE.1),
        ImageSource::File(path) => {
            let img = image::open(path)
                .with_context(|| format!("failed to decode {}", path.display()))?;
            let img = if img.width() > MAX_DECODED_EDGE || img.height() > MAX_DECODED_EDGE {
                img.thumbnail(MAX_DECODED_EDGE, MAX_DECODED_EDGE)
            } else {
                img
            };
            img.to_rgba8()
        }
    };
    tracing::debug!(
        "decoded {} ({}x{}) in {:.2?}",
        source.label(),
        image.width(),
        image.height(),
        t0.elapsed()
    );
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::Scene;

    #[test]
    fn builtin_scene_decodes_without_io() {
        let img = decode_source(&ImageSource::Builtin(Scene::Snow)).unwrap();
        assert_eq!(img.dimensions(), SCENE_SIZE);
    }

    #[test]
    fn large_file_is_downscaled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        RgbaImage::new(2048, 512).save(&path).unwrap();

        let img = decode_source(&ImageSource::File(path)).unwrap();
        assert_eq!(img.width(), MAX_DECODED_EDGE);
        assert_eq!(img.height(), 256);
    }

    #[test]
    fn broken_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        let err = decode_source(&ImageSource::File(path)).unwrap_err();
        assert!(format!("{err:#}").contains("broken.png"));
    }

    #[tokio::test]
    async fn batch_reports_every_item_then_finishes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sources: Vec<_> = Scene::ALL.iter().copied().map(ImageSource::Builtin).collect();
        let mut job = spawn_decode(&tx, 7, &sources);
        drop(tx);

        let mut seen = Vec::new();
        while let Some((generation, update)) = rx.recv().await {
            assert_eq!(generation, 7);
            match update {
                LoadUpdate::Decoded { index, .. } => seen.push(index),
                LoadUpdate::Failed { error, .. } => panic!("unexpected failure: {error}"),
                LoadUpdate::WorkerDone => {
                    if job.worker_done() {
                        break;
                    }
                }
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert!(!job.is_loading());
    }
}
