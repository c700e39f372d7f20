use egui::{Pos2, Rect, Vec2, pos2};
use image::{Rgba, RgbaImage, imageops};
use log::{debug, warn};

use crate::error::SurfaceError;
use crate::pen::{LineCap, LineJoin, PenState};
use crate::snapshot::Snapshot;

/// Miter joins longer than this many half-widths fall back to bevel
pub const MITER_LIMIT: f32 = 10.0;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Capability interface the drawing core needs from a 2-D raster backend.
///
/// Mirrors an immediate-mode canvas: pen settings are applied with `set_pen`,
/// a path is built with `move_to`/`line_to` and painted by `stroke`.
pub trait Surface {
    /// `[width, height]` in pixels
    fn size(&self) -> [u32; 2];

    /// Capture every pixel
    fn get_image(&self) -> Snapshot;

    /// Overwrite pixels from the origin, clipped to the current size
    fn put_image(&mut self, snapshot: &Snapshot);

    /// Make every pixel transparent
    fn clear(&mut self);

    /// Change dimensions while keeping the visible content
    fn resize(&mut self, width: u32, height: u32);

    fn set_pen(&mut self, pen: &PenState);

    /// Drop the current path and any unpainted segments
    fn begin_path(&mut self);

    fn move_to(&mut self, pos: Pos2);

    fn line_to(&mut self, pos: Pos2);

    /// Paint the segments added since the previous `stroke`
    fn stroke(&mut self);
}

#[derive(Debug, Clone, Copy)]
enum PathOp {
    Segment { from: Pos2, to: Pos2 },
    Join { at: Pos2, incoming: Vec2, outgoing: Vec2 },
}

#[derive(Debug, Default)]
struct Path {
    current: Option<Pos2>,
    // Direction of the last non-degenerate segment ending at `current`
    incoming: Option<Vec2>,
    pending: Vec<PathOp>,
}

/// Software raster surface backed by an RGBA buffer
pub struct RasterSurface {
    pixels: RgbaImage,
    pen: PenState,
    path: Path,
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .field("pen", &self.pen)
            .field("pending_ops", &self.path.pending.len())
            .finish()
    }
}

impl Default for RasterSurface {
    /// A single transparent pixel, for hosts that size the surface later
    fn default() -> Self {
        Self::blank(1, 1)
    }
}

impl RasterSurface {
    /// Create a transparent surface
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }
        Ok(Self::blank(width, height))
    }

    fn blank(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, TRANSPARENT),
            pen: PenState::default(),
            path: Path::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Pixel at `(x, y)`, or `None` outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    /// True when the pixel at `(x, y)` has any coverage
    pub fn is_painted(&self, x: u32, y: u32) -> bool {
        self.pixel(x, y).is_some_and(|p| p.0[3] != 0)
    }

    /// Convert the live buffer for texture upload without taking a snapshot
    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(
            [self.width() as usize, self.height() as usize],
            self.pixels.as_raw(),
        )
    }

    fn bounds(&self) -> Rect {
        Rect::from_min_max(
            Pos2::ZERO,
            pos2(self.pixels.width() as f32, self.pixels.height() as f32),
        )
    }

    /// Paint every pixel in `area` whose center satisfies `covered`
    fn fill_where(&mut self, area: Rect, covered: impl Fn(Pos2) -> bool) {
        let area = area.intersect(self.bounds());
        if !area.is_positive() {
            return;
        }
        let color = Rgba(self.pen.color.to_srgba_unmultiplied());
        let (x0, y0) = (area.min.x.floor() as u32, area.min.y.floor() as u32);
        let x1 = (area.max.x.ceil() as u32).min(self.pixels.width());
        let y1 = (area.max.y.ceil() as u32).min(self.pixels.height());
        for y in y0..y1 {
            for x in x0..x1 {
                if covered(pos2(x as f32 + 0.5, y as f32 + 0.5)) {
                    self.pixels.put_pixel(x, y, color);
                }
            }
        }
    }

    fn fill_segment(&mut self, from: Pos2, to: Pos2) {
        let half = self.pen.width / 2.0;
        let area = Rect::from_two_pos(from, to).expand(half + 1.0);
        let dir = to - from;
        let len = dir.length();

        match self.pen.cap {
            LineCap::Round => {
                self.fill_where(area, |p| distance_to_segment(p, from, to) <= half);
            }
            LineCap::Butt => {
                // A zero-length segment with butt caps has no area
                if len == 0.0 {
                    return;
                }
                let unit = dir / len;
                self.fill_where(area, |p| {
                    let (along, across) = project(p - from, unit);
                    (0.0..=len).contains(&along) && across.abs() <= half
                });
            }
            LineCap::Square => {
                let unit = if len == 0.0 { Vec2::X } else { dir / len };
                self.fill_where(area, |p| {
                    let (along, across) = project(p - from, unit);
                    (-half..=len + half).contains(&along) && across.abs() <= half
                });
            }
        }
    }

    fn fill_join(&mut self, at: Pos2, incoming: Vec2, outgoing: Vec2) {
        let half = self.pen.width / 2.0;
        let (d1, d2) = (incoming.normalized(), outgoing.normalized());
        let turn = d1.x * d2.y - d1.y * d2.x;
        // Straight continuation or full reversal leaves no gap to fill
        if turn == 0.0 {
            return;
        }

        match self.pen.join {
            LineJoin::Round => {
                let area = Rect::from_center_size(at, Vec2::splat(half * 2.0 + 2.0));
                self.fill_where(area, |p| (p - at).length() <= half);
            }
            LineJoin::Bevel | LineJoin::Miter => {
                // The outer corner sits on the side opposite the turn
                let side = if turn > 0.0 { -1.0 } else { 1.0 };
                let n1 = perp(d1) * side;
                let n2 = perp(d2) * side;
                let a1 = at + n1 * half;
                let a2 = at + n2 * half;

                let denom = 1.0 + n1.dot(n2);
                let miter = (self.pen.join == LineJoin::Miter && denom > f32::EPSILON)
                    .then(|| at + (n1 + n2) * (half / denom))
                    .filter(|tip| (*tip - at).length() <= half * MITER_LIMIT);

                match miter {
                    Some(tip) => {
                        let area = Rect::from_points(&[at, a1, tip, a2]).expand(1.0);
                        self.fill_where(area, |p| {
                            point_in_triangle(p, at, a1, tip) || point_in_triangle(p, at, tip, a2)
                        });
                    }
                    None => {
                        let area = Rect::from_points(&[at, a1, a2]).expand(1.0);
                        self.fill_where(area, |p| point_in_triangle(p, at, a1, a2));
                    }
                }
            }
        }
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> [u32; 2] {
        [self.pixels.width(), self.pixels.height()]
    }

    fn get_image(&self) -> Snapshot {
        Snapshot::new(self.pixels.clone())
    }

    fn put_image(&mut self, snapshot: &Snapshot) {
        imageops::replace(&mut self.pixels, snapshot.image(), 0, 0);
    }

    fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = TRANSPARENT;
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        if self.size() == [width, height] {
            return;
        }
        debug!(
            "Resizing surface {}x{} -> {}x{}",
            self.pixels.width(),
            self.pixels.height(),
            width,
            height
        );
        let content = self.get_image();
        self.pixels = RgbaImage::from_pixel(width, height, TRANSPARENT);
        self.put_image(&content);
    }

    fn set_pen(&mut self, pen: &PenState) {
        self.pen = *pen;
    }

    fn begin_path(&mut self) {
        self.path = Path::default();
    }

    fn move_to(&mut self, pos: Pos2) {
        self.path.current = Some(pos);
        self.path.incoming = None;
    }

    fn line_to(&mut self, pos: Pos2) {
        let Some(from) = self.path.current else {
            // Without a current point a line only establishes one
            self.move_to(pos);
            return;
        };
        let outgoing = pos - from;
        if outgoing != Vec2::ZERO {
            if let Some(incoming) = self.path.incoming {
                self.path.pending.push(PathOp::Join {
                    at: from,
                    incoming,
                    outgoing,
                });
            }
            self.path.incoming = Some(outgoing);
        }
        self.path.pending.push(PathOp::Segment { from, to: pos });
        self.path.current = Some(pos);
    }

    fn stroke(&mut self) {
        let ops = std::mem::take(&mut self.path.pending);
        for op in ops {
            match op {
                PathOp::Segment { from, to } => self.fill_segment(from, to),
                PathOp::Join {
                    at,
                    incoming,
                    outgoing,
                } => self.fill_join(at, incoming, outgoing),
            }
        }
    }
}

/// Left-hand normal in the same orientation `project` measures `across` in
fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Split `offset` into components along and across the unit vector `unit`
fn project(offset: Vec2, unit: Vec2) -> (f32, f32) {
    (offset.dot(unit), offset.dot(perp(unit)))
}

/// Distance from a point to a line segment
fn distance_to_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let line = end - start;
    let len_sq = line.length_sq();
    if len_sq == 0.0 {
        return (point - start).length();
    }
    let t = ((point - start).dot(line) / len_sq).clamp(0.0, 1.0);
    (point - (start + line * t)).length()
}

fn point_in_triangle(p: Pos2, a: Pos2, b: Pos2, c: Pos2) -> bool {
    let edge = |u: Pos2, v: Pos2| (v.x - u.x) * (p.y - u.y) - (v.y - u.y) * (p.x - u.x);
    let (e1, e2, e3) = (edge(a, b), edge(b, c), edge(c, a));
    let has_neg = e1 < 0.0 || e2 < 0.0 || e3 < 0.0;
    let has_pos = e1 > 0.0 || e2 > 0.0 || e3 > 0.0;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> RasterSurface {
        RasterSurface::new(40, 40).unwrap()
    }

    fn pen(width: f32, cap: LineCap) -> PenState {
        PenState {
            width,
            cap,
            ..PenState::default()
        }
    }

    fn dot(surface: &mut RasterSurface, at: Pos2) {
        surface.begin_path();
        surface.move_to(at);
        surface.line_to(at);
        surface.stroke();
    }

    #[test]
    fn test_new_rejects_empty_surface() {
        assert_eq!(
            RasterSurface::new(0, 10).unwrap_err(),
            SurfaceError::InvalidDimensions { width: 0, height: 10 }
        );
    }

    #[test]
    fn test_round_dot_has_pen_diameter() {
        let mut s = surface();
        s.set_pen(&pen(6.0, LineCap::Round));
        dot(&mut s, pos2(20.0, 20.0));

        assert!(s.is_painted(20, 20));
        assert!(s.is_painted(17, 20));
        assert!(s.is_painted(22, 20));
        assert!(!s.is_painted(16, 20));
        assert!(!s.is_painted(23, 20));
        // Corners of the bounding square stay empty for a disc
        assert!(!s.is_painted(17, 17));
    }

    #[test]
    fn test_square_dot_fills_corners() {
        let mut s = surface();
        s.set_pen(&pen(6.0, LineCap::Square));
        dot(&mut s, pos2(20.0, 20.0));
        assert!(s.is_painted(17, 17));
        assert!(s.is_painted(22, 22));
        assert!(!s.is_painted(16, 20));
    }

    #[test]
    fn test_butt_dot_is_invisible() {
        let mut s = surface();
        s.set_pen(&pen(6.0, LineCap::Butt));
        dot(&mut s, pos2(20.0, 20.0));
        assert_eq!(s.get_image(), surface().get_image());
    }

    #[test]
    fn test_butt_segment_stops_at_endpoints() {
        let mut s = surface();
        s.set_pen(&pen(4.0, LineCap::Butt));
        s.begin_path();
        s.move_to(pos2(10.0, 20.0));
        s.line_to(pos2(30.0, 20.0));
        s.stroke();

        assert!(s.is_painted(10, 20));
        assert!(s.is_painted(29, 20));
        assert!(!s.is_painted(9, 20));
        assert!(!s.is_painted(30, 20));
        assert!(s.is_painted(20, 18));
        assert!(!s.is_painted(20, 22));
    }

    #[test]
    fn test_stroke_paints_only_new_segments() {
        let mut s = surface();
        s.set_pen(&pen(2.0, LineCap::Round));
        s.begin_path();
        s.move_to(pos2(5.0, 5.0));
        s.line_to(pos2(15.0, 5.0));
        s.stroke();

        // Repainting the first segment with another color must not happen
        s.set_pen(&PenState {
            color: egui::Color32::RED,
            ..pen(2.0, LineCap::Round)
        });
        s.line_to(pos2(15.0, 15.0));
        s.stroke();

        assert_eq!(s.pixel(8, 5), Some(Rgba([0, 0, 0, 255])));
        assert_eq!(s.pixel(15, 12), Some(Rgba([255, 0, 0, 255])));
    }

    #[test]
    fn test_begin_path_discards_unstroked_segments() {
        let mut s = surface();
        s.move_to(pos2(5.0, 5.0));
        s.line_to(pos2(30.0, 30.0));
        s.begin_path();
        s.stroke();
        assert_eq!(s.get_image(), surface().get_image());
    }

    #[test]
    fn test_miter_join_fills_outer_corner() {
        let mut miter = surface();
        miter.set_pen(&PenState {
            join: LineJoin::Miter,
            ..pen(8.0, LineCap::Butt)
        });
        let mut bevel = surface();
        bevel.set_pen(&PenState {
            join: LineJoin::Bevel,
            ..pen(8.0, LineCap::Butt)
        });
        for s in [&mut miter, &mut bevel] {
            s.begin_path();
            s.move_to(pos2(5.0, 20.0));
            s.line_to(pos2(20.0, 20.0));
            s.line_to(pos2(20.0, 35.0));
            s.stroke();
        }

        // Outer corner of a right-angle turn is at (24, 16)
        assert!(miter.is_painted(23, 16));
        assert!(!bevel.is_painted(23, 16));
        assert!(bevel.is_painted(21, 18));
    }

    #[test]
    fn test_round_join_fills_disc_at_vertex() {
        let mut round = surface();
        round.set_pen(&pen(8.0, LineCap::Butt));
        round.begin_path();
        round.move_to(pos2(5.0, 20.0));
        round.line_to(pos2(20.0, 20.0));
        round.line_to(pos2(20.0, 35.0));
        round.stroke();

        // Inside the disc of radius 4 but outside both segments and the bevel
        assert!(round.is_painted(22, 17));
        // Past the disc, where only a miter would reach
        assert!(!round.is_painted(23, 16));
    }

    #[test]
    fn test_sharp_miter_falls_back_to_bevel() {
        let join = |join| {
            let mut s = RasterSurface::new(100, 40).unwrap();
            s.set_pen(&PenState {
                join,
                ..pen(4.0, LineCap::Butt)
            });
            s.begin_path();
            s.move_to(pos2(5.0, 20.0));
            s.line_to(pos2(30.0, 20.0));
            // Nearly doubles back: the tip would land about 25 half-widths out
            s.line_to(pos2(5.0, 22.0));
            s.stroke();
            s
        };
        let miter = join(LineJoin::Miter);
        let bevel = join(LineJoin::Bevel);

        assert!(!miter.is_painted(40, 18));
        assert_eq!(miter.get_image(), bevel.get_image());
    }

    #[test]
    fn test_resize_keeps_content_in_final_bounds() {
        let mut s = surface();
        s.set_pen(&pen(4.0, LineCap::Square));
        s.begin_path();
        s.move_to(pos2(5.0, 5.0));
        s.line_to(pos2(15.0, 15.0));
        s.stroke();
        let before = s.get_image();

        s.resize(80, 60);
        assert_eq!(s.size(), [80, 60]);
        s.resize(30, 30);
        assert_eq!(s.size(), [30, 30]);

        for y in 0..30 {
            for x in 0..30 {
                assert_eq!(s.pixel(x, y), before.pixel(x, y), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_resize_to_zero_is_ignored() {
        let mut s = surface();
        s.resize(0, 12);
        assert_eq!(s.size(), [40, 40]);
    }

    #[test]
    fn test_put_image_clips_larger_snapshot() {
        let mut big = RasterSurface::new(60, 60).unwrap();
        big.set_pen(&pen(4.0, LineCap::Round));
        dot(&mut big, pos2(10.0, 10.0));
        dot(&mut big, pos2(50.0, 50.0));

        let mut s = surface();
        s.put_image(&big.get_image());
        assert!(s.is_painted(10, 10));
        assert_eq!(s.size(), [40, 40]);
    }

    #[test]
    fn test_distance_to_segment() {
        let d = distance_to_segment(pos2(5.0, 3.0), pos2(0.0, 0.0), pos2(10.0, 0.0));
        assert!((d - 3.0).abs() < 0.001);
        let d = distance_to_segment(pos2(13.0, 4.0), pos2(0.0, 0.0), pos2(10.0, 0.0));
        assert!((d - 5.0).abs() < 0.001);
    }
}
