//! Background texture decoding
//!
//! Each request decodes one file on a short-lived worker thread and reports
//! back through an unbounded channel. The frame loop drains the channel with
//! [`AssetLoader::poll`] and applies the results to the scene.

use std::path::{Path, PathBuf};

use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};

use crate::gfx::{
    resources::{EnvironmentMap, MaterialId},
    scene::Scene,
};

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to start loader thread for {}: {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A finished load
#[derive(Debug)]
pub enum AssetEvent {
    MatcapLoaded {
        material: MaterialId,
        image: image::RgbaImage,
    },
    EnvironmentLoaded(image::Rgba32FImage),
    Failed(AssetError),
}

impl AssetEvent {
    /// Applies the result to the scene. Failures are only logged.
    pub fn apply(self, scene: &mut Scene) {
        match self {
            AssetEvent::MatcapLoaded { material, image } => {
                match scene.material_manager.get_material_mut(&material) {
                    Some(target) => target.set_matcap(image),
                    None => log::warn!("Matcap loaded for unknown material '{}'", material),
                }
            }
            AssetEvent::EnvironmentLoaded(image) => {
                scene.set_environment(EnvironmentMap::new(image));
            }
            AssetEvent::Failed(error) => log::warn!("{}", error),
        }
    }
}

pub struct AssetLoader {
    sender: UnboundedSender<AssetEvent>,
    receiver: UnboundedReceiver<AssetEvent>,
    pending: usize,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            pending: 0,
        }
    }

    /// Starts decoding a matcap PNG for `material`
    pub fn load_matcap(&mut self, material: impl Into<MaterialId>, path: impl AsRef<Path>) {
        let material = material.into();
        self.spawn(path.as_ref(), move |path| {
            image::open(path).map(|image| AssetEvent::MatcapLoaded {
                material,
                image: image.into_rgba8(),
            })
        });
    }

    /// Starts decoding an equirectangular HDR panorama
    pub fn load_environment(&mut self, path: impl AsRef<Path>) {
        self.spawn(path.as_ref(), |path| {
            image::open(path).map(|image| AssetEvent::EnvironmentLoaded(image.into_rgba32f()))
        });
    }

    fn spawn<F>(&mut self, path: &Path, decode: F)
    where
        F: FnOnce(&Path) -> image::ImageResult<AssetEvent> + Send + 'static,
    {
        let path = path.to_path_buf();
        let sender = self.sender.clone();
        log::debug!("Loading {}", path.display());

        let worker_path = path.clone();
        let spawned = std::thread::Builder::new()
            .name("asset-loader".to_string())
            .spawn(move || {
                let event = decode(&worker_path).unwrap_or_else(|source| {
                    AssetEvent::Failed(AssetError::Load {
                        path: worker_path.clone(),
                        source,
                    })
                });
                // The receiver is gone when the app is shutting down
                let _ = sender.unbounded_send(event);
            });

        if let Err(source) = spawned {
            // Report through the same channel so the failure surfaces on the next poll
            let _ = self
                .sender
                .unbounded_send(AssetEvent::Failed(AssetError::Spawn { path, source }));
        }
        self.pending += 1;
    }

    /// Drains every event that has arrived so far without blocking
    pub fn poll(&mut self) -> Vec<AssetEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.receiver.try_next() {
            events.push(event);
        }
        self.pending = self.pending.saturating_sub(events.len());
        events
    }

    /// Polls and applies everything that arrived to `scene`
    pub fn apply_ready(&mut self, scene: &mut Scene) -> usize {
        let events = self.poll();
        let count = events.len();
        for event in events {
            event.apply(scene);
        }
        count
    }

    /// Loads started but not yet drained
    pub fn pending(&self) -> usize {
        self.pending
    }
}
