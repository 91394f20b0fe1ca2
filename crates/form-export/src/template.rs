//! Template provider: loads the form background.
//!
//! One primary location is tried, then the embedded vector template. Each
//! export loads afresh; nothing is cached between calls.

use std::fmt;
use std::path::PathBuf;

use base64::Engine;
use image::RgbImage;
use resvg::{tiny_skia, usvg};

/// Vector template bundled with the crate.
pub const FALLBACK_TEMPLATE_SVG: &str = include_str!("../assets/membership-form-template.svg");

/// SVG templates are rasterized at this multiple of their natural size.
const SVG_RASTER_SCALE: f32 = 2.0;

/// The bundled template as a `data:` URL.
pub fn fallback_data_url() -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(FALLBACK_TEMPLATE_SVG)
    )
}

/// Which attempt produced the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateOrigin {
    Primary,
    Fallback,
}

impl fmt::Display for TemplateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateOrigin::Primary => write!(f, "primary"),
            TemplateOrigin::Fallback => write!(f, "fallback"),
        }
    }
}

/// A decoded background, flattened onto white.
#[derive(Debug, Clone)]
pub struct TemplateImage {
    pub pixels: RgbImage,
    pub origin: TemplateOrigin,
    /// Where it came from, shortened for data URLs.
    pub location: String,
}

impl TemplateImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Why a single template location could not be used.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Request to {location} failed: {message}")]
    Fetch { location: String, message: String },

    #[error("{location} answered with HTTP {status}")]
    Status { location: String, status: u16 },

    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Cannot decode image from {location}: {message}")]
    Decode { location: String, message: String },

    #[error("Cannot render SVG from {location}: {message}")]
    Svg { location: String, message: String },
}

impl From<TemplateError> for unionportal_common::PortalError {
    fn from(err: TemplateError) -> Self {
        unionportal_common::PortalError::template(err.to_string())
    }
}

/// Loads templates from HTTP(S), `data:` URLs, `file://` URLs and paths.
#[derive(Debug, Clone)]
pub struct TemplateProvider {
    client: reqwest::Client,
    fallback: String,
}

impl Default for TemplateProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateProvider {
    /// Provider whose fallback is the bundled vector template.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            fallback: fallback_data_url(),
        }
    }

    /// Replace the fallback location.
    pub fn with_fallback(mut self, location: impl Into<String>) -> Self {
        self.fallback = location.into();
        self
    }

    /// Try `primary`, then the fallback once. `None` when both fail.
    pub async fn resolve(&self, primary: &str) -> Option<TemplateImage> {
        match self.load(primary).await {
            Ok(pixels) => {
                tracing::debug!(location = %describe_location(primary), "Loaded primary template");
                return Some(TemplateImage {
                    pixels,
                    origin: TemplateOrigin::Primary,
                    location: describe_location(primary),
                });
            }
            Err(err) => {
                tracing::warn!(
                    location = %describe_location(primary),
                    error = %err,
                    "Primary template unavailable, trying fallback"
                );
            }
        }

        match self.load(&self.fallback).await {
            Ok(pixels) => Some(TemplateImage {
                pixels,
                origin: TemplateOrigin::Fallback,
                location: describe_location(&self.fallback),
            }),
            Err(err) => {
                tracing::warn!(
                    location = %describe_location(&self.fallback),
                    error = %err,
                    "Fallback template unavailable, rendering without background"
                );
                None
            }
        }
    }

    /// Fetch and decode one location.
    pub async fn load(&self, location: &str) -> Result<RgbImage, TemplateError> {
        let (bytes, mime) = self.fetch(location).await?;
        decode_template(&bytes, mime.as_deref(), location)
    }

    async fn fetch(&self, location: &str) -> Result<(Vec<u8>, Option<String>), TemplateError> {
        if location.starts_with("data:") {
            let (mime, bytes) = parse_data_url(location)?;
            return Ok((bytes, Some(mime)));
        }

        if location.starts_with("http://") || location.starts_with("https://") {
            return self.fetch_http(location).await;
        }

        let path = PathBuf::from(location.strip_prefix("file://").unwrap_or(location));
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| TemplateError::Io { path, source: e })?;
        Ok((bytes, None))
    }

    async fn fetch_http(&self, url: &str) -> Result<(Vec<u8>, Option<String>), TemplateError> {
        let fetch_error = |e: reqwest::Error| TemplateError::Fetch {
            location: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TemplateError::Status {
                location: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await.map_err(fetch_error)?;
        Ok((bytes.to_vec(), mime))
    }
}

/// Split a `data:` URL into MIME type and payload bytes.
pub fn parse_data_url(url: &str) -> Result<(String, Vec<u8>), TemplateError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| TemplateError::InvalidDataUrl("missing data: scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| TemplateError::InvalidDataUrl("missing comma".to_string()))?;

    let mime = header
        .split(';')
        .next()
        .filter(|m| !m.is_empty())
        .unwrap_or("text/plain")
        .to_string();

    let bytes = if header.split(';').any(|part| part == "base64") {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| TemplateError::InvalidDataUrl(e.to_string()))?
    } else {
        percent_decode(payload)
    };

    Ok((mime, bytes))
}

fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

/// Decode raster or SVG bytes into an opaque RGB image.
pub fn decode_template(
    bytes: &[u8],
    mime: Option<&str>,
    location: &str,
) -> Result<RgbImage, TemplateError> {
    if is_svg(bytes, mime) {
        return rasterize_svg(bytes, location);
    }

    let decoded = image::load_from_memory(bytes).map_err(|e| TemplateError::Decode {
        location: describe_location(location),
        message: e.to_string(),
    })?;
    Ok(flatten_on_white(&decoded.to_rgba8()))
}

fn is_svg(bytes: &[u8], mime: Option<&str>) -> bool {
    if mime.is_some_and(|m| m.contains("svg")) {
        return true;
    }
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(256)]);
    let head = head.trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

fn rasterize_svg(bytes: &[u8], location: &str) -> Result<RgbImage, TemplateError> {
    let svg_error = |message: String| TemplateError::Svg {
        location: describe_location(location),
        message,
    };

    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_data(bytes, &options).map_err(|e| svg_error(e.to_string()))?;
    let size = tree.size();
    let width = (size.width() * SVG_RASTER_SCALE).ceil() as u32;
    let height = (size.height() * SVG_RASTER_SCALE).ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| svg_error(format!("invalid raster size {width}x{height}")))?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(SVG_RASTER_SCALE, SVG_RASTER_SCALE),
        &mut pixmap.as_mut(),
    );

    // Opaque after the white fill, so premultiplied and straight RGB agree.
    let rgb = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect::<Vec<_>>();
    RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| svg_error("pixel buffer size mismatch".to_string()))
}

fn flatten_on_white(rgba: &image::RgbaImage) -> RgbImage {
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in rgb.pixels_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        dst.0 = [blend(r), blend(g), blend(b)];
    }
    rgb
}

/// Log-friendly location: data URLs are cut after their header.
pub fn describe_location(location: &str) -> String {
    if location.starts_with("data:") {
        let header = location.split(',').next().unwrap_or("data:");
        format!("{header},…")
    } else {
        location.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_base64_data_url() {
        let (mime, bytes) = parse_data_url("data:text/plain;base64,aGVsbG8=").unwrap();
        assert_eq!(mime, "text/plain");
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_parse_percent_encoded_data_url() {
        let (mime, bytes) = parse_data_url("data:image/svg+xml;utf8,%3Csvg%3E").unwrap();
        assert_eq!(mime, "image/svg+xml");
        assert_eq!(bytes, b"<svg>");
    }

    #[test]
    fn test_parse_data_url_errors() {
        assert!(matches!(
            parse_data_url("data:image/png;base64"),
            Err(TemplateError::InvalidDataUrl(_))
        ));
        assert!(matches!(
            parse_data_url("data:image/png;base64,***"),
            Err(TemplateError::InvalidDataUrl(_))
        ));
    }

    #[test]
    fn test_fallback_data_url_round_trips_svg() {
        let (mime, bytes) = parse_data_url(&fallback_data_url()).unwrap();
        assert_eq!(mime, "image/svg+xml");
        assert_eq!(bytes, FALLBACK_TEMPLATE_SVG.as_bytes());
    }

    #[test]
    fn test_svg_sniffing() {
        assert!(is_svg(b"  <svg xmlns='http://www.w3.org/2000/svg'/>", None));
        assert!(is_svg(b"<?xml version=\"1.0\"?>\n<svg/>", None));
        assert!(is_svg(b"whatever", Some("image/svg+xml")));
        assert!(!is_svg(b"\x89PNG\r\n", Some("image/png")));
    }

    #[test]
    fn test_flatten_on_white() {
        let mut rgba = image::RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, image::Rgba([0, 0, 0, 0]));
        rgba.put_pixel(1, 0, image::Rgba([10, 20, 30, 255]));
        let rgb = flatten_on_white(&rgba);
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(rgb.get_pixel(1, 0).0, [10, 20, 30]);
    }

    #[test]
    fn test_describe_location_shortens_data_urls() {
        assert_eq!(
            describe_location("data:image/png;base64,AAAA"),
            "data:image/png;base64,…"
        );
        assert_eq!(describe_location("/srv/form.png"), "/srv/form.png");
    }

    #[tokio::test]
    async fn test_bundled_fallback_rasterizes_at_double_size() {
        let provider = TemplateProvider::new();
        let pixels = provider.load(&fallback_data_url()).await.unwrap();
        assert_eq!(pixels.width(), 1632);
        assert_eq!(pixels.height(), 2368);
    }

    #[tokio::test]
    async fn test_resolve_prefers_primary_file() {
        let dir = temp_dir("unionportal_test_template_primary");
        let path = dir.join("form.png");
        RgbImage::from_pixel(40, 60, image::Rgb([200, 200, 200]))
            .save(&path)
            .unwrap();

        let provider = TemplateProvider::new();
        let template = provider.resolve(path.to_str().unwrap()).await.unwrap();
        assert_eq!(template.origin, TemplateOrigin::Primary);
        assert_eq!((template.width(), template.height()), (40, 60));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_resolve_uses_fallback_once_primary_fails() {
        let dir = temp_dir("unionportal_test_template_fallback");
        let fallback = dir.join("fallback.png");
        RgbImage::from_pixel(10, 20, image::Rgb([255, 255, 255]))
            .save(&fallback)
            .unwrap();

        let provider =
            TemplateProvider::new().with_fallback(format!("file://{}", fallback.display()));
        let template = provider
            .resolve(dir.join("missing.png").to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(template.origin, TemplateOrigin::Fallback);
        assert_eq!(template.height(), 20);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_resolve_none_when_both_fail() {
        let provider = TemplateProvider::new().with_fallback("data:image/png;base64,bm90IGFuIGltYWdl");
        let template = provider
            .resolve("/definitely/not/here/template.png")
            .await;
        assert!(template.is_none());
    }

    #[tokio::test]
    async fn test_undecodable_file_is_decode_error() {
        let dir = temp_dir("unionportal_test_template_garbage");
        let path = dir.join("broken.png");
        std::fs::write(&path, b"not really a png").unwrap();

        let provider = TemplateProvider::new();
        let err = provider.load(path.to_str().unwrap()).await.unwrap_err();
        assert!(matches!(err, TemplateError::Decode { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }

    /// Answer every request with the same canned response.
    async fn serve(
        status_line: &'static str,
        content_type: &'static str,
        body: &'static [u8],
    ) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let head = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(body).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{addr}/membership-form-template.png")
    }

    /// Starts with a comment, so only the Content-Type marks it as SVG.
    const SERVED_SVG: &[u8] = br##"<!-- served template -->
<svg xmlns="http://www.w3.org/2000/svg" width="10" height="20"><rect width="10" height="20" fill="#eeeeee"/></svg>"##;

    #[tokio::test]
    async fn test_http_error_status_falls_back_to_bundled_template() {
        let url = serve("404 Not Found", "text/html", b"<h1>Not Found</h1>").await;
        let provider = TemplateProvider::new();

        let err = provider.load(&url).await.unwrap_err();
        assert!(matches!(err, TemplateError::Status { status: 404, .. }));

        let template = provider.resolve(&url).await.unwrap();
        assert_eq!(template.origin, TemplateOrigin::Fallback);
        assert_eq!((template.width(), template.height()), (1632, 2368));
    }

    #[tokio::test]
    async fn test_http_content_type_selects_svg_decoder() {
        assert!(!is_svg(SERVED_SVG, None));
        assert!(decode_template(SERVED_SVG, None, "memory").is_err());

        let url = serve("200 OK", "image/svg+xml; charset=utf-8", SERVED_SVG).await;
        let provider = TemplateProvider::new();

        let template = provider.resolve(&url).await.unwrap();
        assert_eq!(template.origin, TemplateOrigin::Primary);
        assert_eq!((template.width(), template.height()), (20, 40));
        assert_eq!(template.pixels.get_pixel(5, 5).0, [0xee, 0xee, 0xee]);
    }
}
