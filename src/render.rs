//! Render pipeline: draw every pose and write the PNG files
//!
//! Poses are drawn in parallel. Output names come from a shared
//! [`OutputNamer`] behind a mutex so two poses never claim the same file.

use image::RgbaImage;
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

use crate::output::{pad_image, save_png, scale_image, trim_transparent, OutputError, OutputNamer};
use crate::pose::Pose;
use crate::request::RenderRequest;

/// Error raised while drawing or writing a pose.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
    #[error("Error 1002: Failed to render pose {pose}: {message}")]
    Failed { pose: String, message: String },
    #[error("Error 1003: Failed to write image to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: OutputError,
    },
}

impl RenderError {
    pub fn code(&self) -> u16 {
        match self {
            RenderError::Failed { .. } => 1002,
            RenderError::Write { .. } => 1003,
        }
    }
}

/// A backend that draws one creature in one pose.
pub trait PoseRenderer: Sync {
    fn render(&self, request: &RenderRequest, pose: &Pose) -> Result<RgbaImage, RenderError>;
}

/// One written image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPose {
    pub index: usize,
    pub pose: String,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Apply `--trim`, `--padding` and `--scale`, in that order.
pub fn finish_image(image: RgbaImage, request: &RenderRequest) -> RgbaImage {
    let image = if request.trim { trim_transparent(image) } else { image };
    let image = pad_image(image, request.padding);
    scale_image(image, request.scale)
}

/// Draw every pose with `renderer` and save the results.
///
/// Results come back in pose order.
pub fn render_poses<P: PoseRenderer + ?Sized>(
    renderer: &P,
    request: &RenderRequest,
    poses: &[(Pose, Option<String>)],
    namer: OutputNamer,
) -> Result<Vec<RenderedPose>, RenderError> {
    let namer = Mutex::new(namer);

    poses
        .par_iter()
        .enumerate()
        .map(|(index, (pose, file_name))| {
            let pose_string = pose.to_pose_string();
            debug!(index, pose = %pose_string, "rendering pose");
            let image = finish_image(renderer.render(request, pose)?, request);

            let path = {
                let mut namer = namer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                namer.claim(index, file_name.as_deref())
            };
            save_png(&image, &path).map_err(|source| RenderError::Write { path: path.clone(), source })?;
            debug!(index, path = %path.display(), "wrote image");

            Ok(RenderedPose {
                index,
                pose: pose_string,
                path,
                width: image.width(),
                height: image.height(),
            })
        })
        .collect()
}
