// ============================================================================
// IMAGE LOADING — decode an image source into a pixel grid
// ============================================================================
//
// `load_pixels_sync` runs the whole pipeline on the calling thread (CLI).
// URL sources are fetched with a blocking HTTP client on that same thread.
// `pixels_from_source` runs it on a background thread and hands back a
// `PendingPixels` the UI polls once per frame. A started load cannot be
// cancelled; dropping the handle only discards its result.

use std::path::{Path, PathBuf};
use std::sync::{OnceLock, mpsc};
use std::time::Duration;

use image::RgbaImage;

use crate::error::PixelError;
use crate::grid::PixelGrid;
use crate::ops::{resample, to_pixel_grid};
use crate::raster::RawRaster;

/// Image formats the loader accepts (lowercase extensions).
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "bmp", "tga", "gif", "ico", "tiff", "tif",
];

/// URL schemes [`ImageSource::from_input`] treats as URLs.
const URL_SCHEMES: &[&str] = &["http://", "https://", "file://"];

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where an image comes from.
#[derive(Clone, Debug)]
pub enum ImageSource {
    Path(PathBuf),
    /// `http`, `https` or `file` URL.
    Url(String),
    /// Encoded file contents already in memory.
    Bytes(Vec<u8>),
}

impl ImageSource {
    /// Classify user input (CLI argument, URL box): anything starting with a
    /// known URL scheme is a URL, the rest is a path.
    pub fn from_input(input: &str) -> Self {
        if is_url(input) {
            ImageSource::Url(input.trim().to_string())
        } else {
            ImageSource::Path(PathBuf::from(input))
        }
    }

    /// Short label for logs and status lines.
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Path(p) => p.display().to_string(),
            ImageSource::Url(u) => u.clone(),
            ImageSource::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }
}

pub fn is_url(input: &str) -> bool {
    let lower = input.trim_start().to_ascii_lowercase();
    URL_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

impl From<PathBuf> for ImageSource {
    fn from(p: PathBuf) -> Self {
        ImageSource::Path(p)
    }
}

impl From<&Path> for ImageSource {
    fn from(p: &Path) -> Self {
        ImageSource::Path(p.to_path_buf())
    }
}

fn http_client() -> Result<&'static reqwest::blocking::Client, PixelError> {
    static CLIENT: OnceLock<reqwest::blocking::Client> = OnceLock::new();
    if let Some(client) = CLIENT.get() {
        return Ok(client);
    }
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pixelview/", env!("CARGO_PKG_VERSION")))
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| PixelError::Decode(format!("could not create HTTP client: {}", e)))?;
    Ok(CLIENT.get_or_init(|| client))
}

/// Fetch the encoded bytes behind an image URL.
///
/// Malformed URLs and unsupported schemes are `InvalidArgument`; transport
/// errors and non-2xx responses are `Decode`.
pub fn fetch_url(url: &str) -> Result<Vec<u8>, PixelError> {
    let parsed = reqwest::Url::parse(url.trim())
        .map_err(|e| PixelError::InvalidArgument(format!("bad image URL '{}': {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        "file" => {
            let path = parsed.to_file_path().map_err(|_| {
                PixelError::InvalidArgument(format!("'{}' is not a local file URL", url))
            })?;
            return std::fs::read(&path)
                .map_err(|e| PixelError::Decode(format!("{}: {}", path.display(), e)));
        }
        other => {
            return Err(PixelError::InvalidArgument(format!(
                "unsupported URL scheme '{}' in '{}'",
                other, url
            )));
        }
    }

    crate::log_info!("Fetching {}", url);
    let resp = http_client()?
        .get(parsed)
        .header(
            reqwest::header::ACCEPT,
            "image/png,image/jpeg,image/gif,image/webp,image/bmp,*/*;q=0.5",
        )
        .send()
        .map_err(|e| PixelError::Decode(format!("request error for {}: {}", url, e)))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(PixelError::Decode(format!(
            "http status {} for {}",
            status.as_u16(),
            url
        )));
    }

    let bytes = resp
        .bytes()
        .map_err(|e| PixelError::Decode(format!("body read error for {}: {}", url, e)))?;
    Ok(bytes.to_vec())
}

/// Decode a source to RGBA8.
pub fn decode_rgba(source: &ImageSource) -> Result<RgbaImage, PixelError> {
    let decoded = match source {
        ImageSource::Path(path) => image::open(path),
        ImageSource::Url(url) => image::load_from_memory(&fetch_url(url)?),
        ImageSource::Bytes(bytes) => image::load_from_memory(bytes),
    };
    decoded
        .map(|img| img.to_rgba8())
        .map_err(|e| PixelError::Decode(format!("{}: {}", source.describe(), e)))
}

/// Decode, optionally resample to `to_width` columns, and pixelize.
pub fn load_pixels_sync(source: &ImageSource, to_width: Option<u32>) -> Result<PixelGrid, PixelError> {
    let raster = RawRaster::from_rgba_image(decode_rgba(source)?);
    let raster = match to_width {
        Some(width) => resample(&raster, width)?,
        None => raster,
    };
    to_pixel_grid(&raster)
}

/// A background load in flight.
pub struct PendingPixels {
    receiver: mpsc::Receiver<Result<PixelGrid, PixelError>>,
    source: String,
    finished: bool,
}

impl PendingPixels {
    /// Label of the source being loaded.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Non-blocking check. `Some` exactly once, when the load has finished.
    pub fn try_take(&mut self) -> Option<Result<PixelGrid, PixelError>> {
        if self.finished {
            return None;
        }
        let result = match self.receiver.try_recv() {
            Ok(result) => result,
            Err(mpsc::TryRecvError::Empty) => return None,
            Err(mpsc::TryRecvError::Disconnected) => Err(loader_gone()),
        };
        self.finished = true;
        Some(result)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Block until the load finishes.
    pub fn wait(self) -> Result<PixelGrid, PixelError> {
        self.receiver.recv().unwrap_or_else(|_| Err(loader_gone()))
    }
}

fn loader_gone() -> PixelError {
    PixelError::Decode("image loader stopped before producing a result".to_string())
}

/// Start loading `source` on a background thread.
pub fn pixels_from_source(source: ImageSource, to_width: Option<u32>) -> PendingPixels {
    let (sender, receiver) = mpsc::channel();
    let label = source.describe();
    crate::log_info!("Loading {} (target width {:?})", label, to_width);

    std::thread::spawn(move || {
        let result = load_pixels_sync(&source, to_width);
        if let Err(e) = &result {
            crate::log_err!("Failed to load {}: {}", source.describe(), e);
        }
        // Receiver may already be gone; nothing to do then.
        let _ = sender.send(result);
    });

    PendingPixels {
        receiver,
        source: label,
        finished: false,
    }
}

/// True when `path` has one of [`IMAGE_EXTENSIONS`].
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}
