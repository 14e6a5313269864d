//! Quadrant avatar generation.
//!
//! A staff photo is sent to an image model four times, once per board
//! quadrant, each with a prompt describing a different mood. Calls run one
//! after another and each may fail on its own.

mod gemini;

pub use gemini::GeminiImageClient;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("image generation is not configured: {0}")]
    Config(String),

    #[error("source image is empty")]
    MissingSource,

    #[error("request to image API failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("image API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("image API response contained no image data")]
    NoImage,

    #[error("image API returned undecodable image data: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// One source image plus one prompt in, one image out.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        source: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<Vec<u8>, ImageGenError>;
}

/// Generated images indexed by quadrant (index 0 is quadrant 1). A `None`
/// slot means that quadrant's call failed.
#[derive(Debug, Default)]
pub struct QuadrantAvatars {
    pub images: [Option<Vec<u8>>; 4],
}

impl QuadrantAvatars {
    pub fn generated(&self) -> usize {
        self.images.iter().filter(|i| i.is_some()).count()
    }

    /// `(quadrant, bytes)` for each successful quadrant.
    pub fn into_quadrants(self) -> impl Iterator<Item = (u8, Vec<u8>)> {
        self.images
            .into_iter()
            .zip(1u8..)
            .filter_map(|(image, q)| image.map(|bytes| (q, bytes)))
    }
}

pub fn quadrant_prompt(quadrant: u8, staff_name: &str) -> String {
    let intro = format!(
        "Edit this photo of {staff_name}. Keep the same person recognizable, preserving their \
         face and overall look, and change only the expression and situation. An office or \
         work setting is fine for the background. "
    );
    let mood = match quadrant {
        1 => {
            "Make it fit quadrant 1 of the Eisenhower matrix (urgent and important): \
             the person looks angry and tense, chased by the clock and deadlines."
        }
        2 => {
            "Make it fit quadrant 2 of the Eisenhower matrix (important, not urgent): \
             the person looks positive and motivated, calmly working through a plan."
        }
        3 => {
            "Make it fit quadrant 3 of the Eisenhower matrix (urgent, not important): \
             the person looks a little troubled, swamped by phone calls, notifications and chores."
        }
        _ => {
            "Make it fit quadrant 4 of the Eisenhower matrix (neither urgent nor important): \
             the person sits relaxed at their desk sipping tea, with a calm expression."
        }
    };
    intro + mood
}

/// Requests all four quadrant variants in order. Failures are logged and
/// leave that quadrant empty; they never abort the remaining calls.
pub async fn generate_quadrant_avatars(
    generator: &dyn ImageGenerator,
    source: &[u8],
    mime_type: &str,
    staff_name: &str,
) -> QuadrantAvatars {
    let mut avatars = QuadrantAvatars::default();
    for quadrant in 1..=4u8 {
        let prompt = quadrant_prompt(quadrant, staff_name);
        match generator.generate(source, mime_type, &prompt).await {
            Ok(bytes) => avatars.images[usize::from(quadrant - 1)] = Some(bytes),
            Err(e) => warn!(
                "Avatar generation for {} (quadrant {}) failed: {}",
                staff_name, quadrant, e
            ),
        }
    }
    info!(
        "Generated {}/4 quadrant avatars for {}",
        avatars.generated(),
        staff_name
    );
    avatars
}
