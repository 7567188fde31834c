//! Asynchronous image loading
//!
//! Decodes image files on a worker thread and delivers results over a
//! channel, so the frame loop never blocks on disk or decode time.

use crossbeam_channel::{unbounded, Receiver, Sender};
use thiserror::Error;

/// Identifier for a decoded texture held by the scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Decoded RGBA8 pixel data
#[derive(Debug, Clone)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 pixels, row-major
    pub pixels: Vec<u8>,
}

impl TextureData {
    /// Single-color texture, used as a fallback and in tests
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }
}

/// Errors produced by the image loader
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to decode image '{source_path}': {source}")]
    Decode {
        source_path: String,
        #[source]
        source: image::ImageError,
    },
}

/// A completed load, tagged with the request it answers
#[derive(Debug)]
pub struct LoadResult {
    pub request: u64,
    pub result: Result<TextureData, LoadError>,
}

/// Dispatches image loads to worker threads and collects completions
pub struct ImageLoader {
    tx: Sender<LoadResult>,
    rx: Receiver<LoadResult>,
    next_request: u64,
}

impl ImageLoader {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            next_request: 1,
        }
    }

    /// Start loading an image source, returning the request id
    ///
    /// The result arrives through [`poll`](Self::poll) once the worker
    /// finishes; there is no ordering guarantee between requests.
    pub fn request(&mut self, source: &str) -> u64 {
        let request = self.next_request;
        self.next_request += 1;

        let tx = self.tx.clone();
        let source = source.to_string();
        std::thread::spawn(move || {
            let result = image::open(&source)
                .map(|img| {
                    let rgba = img.to_rgba8();
                    let (width, height) = rgba.dimensions();
                    TextureData {
                        width,
                        height,
                        pixels: rgba.into_raw(),
                    }
                })
                .map_err(|e| LoadError::Decode {
                    source_path: source,
                    source: e,
                });
            // The receiver may be gone during shutdown; nothing to do then
            let _ = tx.send(LoadResult { request, result });
        });

        request
    }

    /// Drain all completions that have arrived since the last poll
    pub fn poll(&mut self) -> Vec<LoadResult> {
        self.rx.try_iter().collect()
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}
