//! Sizing math for the preview surface.
//!
//! Pure functions: given container width, optional caller caps, and what
//! each slot currently knows about its artifact (page count, aspect
//! ratio), compute the rendered width and the height to reserve so the
//! container does not resize mid-crossfade.

/// A-series page ratio (A4 ≈ √2), used before a slot has reported a real
/// aspect ratio.
pub const FALLBACK_ASPECT_RATIO: f64 = 1.4142;

/// Assumed container width before the first resize observation.
pub const DEFAULT_CONTAINER_WIDTH: f64 = 800.0;

/// Widest the document may render while the full page stack
/// (`pages * (width * ar) + (pages - 1) * gap`) still fits `max_height`.
///
/// Unconstrained (`+∞`) while pages or aspect ratio are unknown or no
/// height limit is set; zero when the inter-page gaps alone exceed the
/// limit.
pub fn width_from_height_limit(
    pages: usize,
    aspect_ratio: Option<f64>,
    gap: f64,
    max_height: Option<f64>,
) -> f64 {
    let (Some(max_height), Some(ar)) = (max_height, aspect_ratio) else {
        return f64::INFINITY;
    };
    if pages == 0 || ar <= 0.0 {
        return f64::INFINITY;
    }
    let usable = max_height - (pages.saturating_sub(1)) as f64 * gap;
    if usable > 0.0 {
        usable / (pages as f64 * ar)
    } else {
        0.0
    }
}

/// Displayed width: the container, capped by the caller's `max_width` and
/// by both slots' height-fit ceilings. Falls back to the raw container
/// width when the candidate degenerates (non-finite or non-positive).
pub fn resolve_width(container: f64, max_width: Option<f64>, height_caps: [f64; 2]) -> f64 {
    let candidate = container
        .min(max_width.unwrap_or(f64::INFINITY))
        .min(height_caps[0])
        .min(height_caps[1]);
    if candidate.is_finite() && candidate > 0.0 {
        candidate
    } else {
        container
    }
}

/// Projected height of a slot's full page stack at `width`. A slot that
/// has not reported metadata yet is treated as a single fallback-ratio
/// page so there is always a sane minimum.
pub fn stack_height(width: f64, pages: usize, aspect_ratio: Option<f64>, gap: f64) -> f64 {
    let ar = aspect_ratio.unwrap_or(FALLBACK_ASPECT_RATIO);
    if pages == 0 {
        return width * ar;
    }
    pages as f64 * (width * ar) + (pages.saturating_sub(1)) as f64 * gap
}
