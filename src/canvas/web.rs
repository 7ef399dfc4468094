//! Browser backend: [`Surface`] over `web_sys::CanvasRenderingContext2d`.
//!
//! Images are drawn by source key, so the host registers decoded
//! `HtmlImageElement`s up front with [`WebCanvas::register_image`].

use std::collections::HashMap;

use js_sys::Reflect;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{Matrix, Point, Rect};

use super::surface::{
    Direction, ImagePlacement, LineCap, LineJoin, Surface, TextAlign, TextBaseline, TextMetrics,
};

/// A browser canvas context plus the images it can draw.
pub struct WebCanvas {
    ctx: CanvasRenderingContext2d,
    images: HashMap<String, HtmlImageElement>,
}

impl WebCanvas {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx, images: HashMap::new() }
    }

    /// Make `image` drawable as `source`.
    pub fn register_image(&mut self, source: impl Into<String>, image: HtmlImageElement) {
        self.images.insert(source.into(), image);
    }

    /// The wrapped context.
    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }
}

/// Map a JS exception into a surface error for `op`.
fn host(op: &'static str) -> impl FnOnce(JsValue) -> Error {
    move |err| Error::surface(op, format!("{err:?}"))
}

/// Context property without a typed binding in web-sys.
const DIRECTION: &str = "direction";

fn keyword<T>(op: &'static str, value: String, parse: fn(&str) -> Option<T>) -> Result<T> {
    parse(&value).ok_or_else(|| Error::surface(op, format!("unexpected keyword {value:?}")))
}

impl Surface for WebCanvas {
    fn save(&mut self) -> Result<()> {
        self.ctx.save();
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        self.ctx.restore();
        Ok(())
    }

    fn set_fill_style(&mut self, color: Color) -> Result<()> {
        self.ctx.set_fill_style_str(&color.to_string());
        Ok(())
    }

    fn set_stroke_style(&mut self, color: Color) -> Result<()> {
        self.ctx.set_stroke_style_str(&color.to_string());
        Ok(())
    }

    fn set_line_width(&mut self, width: f64) -> Result<()> {
        self.ctx.set_line_width(width);
        Ok(())
    }

    fn set_line_cap(&mut self, cap: LineCap) -> Result<()> {
        self.ctx.set_line_cap(cap.as_str());
        Ok(())
    }

    fn set_line_join(&mut self, join: LineJoin) -> Result<()> {
        self.ctx.set_line_join(join.as_str());
        Ok(())
    }

    fn set_miter_limit(&mut self, limit: f64) -> Result<()> {
        self.ctx.set_miter_limit(limit);
        Ok(())
    }

    fn set_global_alpha(&mut self, alpha: f64) -> Result<()> {
        self.ctx.set_global_alpha(alpha);
        Ok(())
    }

    fn set_shadow_color(&mut self, color: Color) -> Result<()> {
        self.ctx.set_shadow_color(&color.to_string());
        Ok(())
    }

    fn set_shadow_blur(&mut self, blur: f64) -> Result<()> {
        self.ctx.set_shadow_blur(blur);
        Ok(())
    }

    fn set_shadow_offset(&mut self, x: f64, y: f64) -> Result<()> {
        self.ctx.set_shadow_offset_x(x);
        self.ctx.set_shadow_offset_y(y);
        Ok(())
    }

    fn font(&self) -> Result<String> {
        Ok(self.ctx.font())
    }

    fn set_font(&mut self, font: &str) -> Result<()> {
        self.ctx.set_font(font);
        Ok(())
    }

    fn text_align(&self) -> Result<TextAlign> {
        keyword("text_align", self.ctx.text_align(), TextAlign::parse)
    }

    fn set_text_align(&mut self, align: TextAlign) -> Result<()> {
        self.ctx.set_text_align(align.as_str());
        Ok(())
    }

    fn text_baseline(&self) -> Result<TextBaseline> {
        keyword("text_baseline", self.ctx.text_baseline(), TextBaseline::parse)
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) -> Result<()> {
        self.ctx.set_text_baseline(baseline.as_str());
        Ok(())
    }

    fn direction(&self) -> Result<Direction> {
        let target: &JsValue = self.ctx.as_ref();
        let value = Reflect::get(target, &JsValue::from_str(DIRECTION))
            .map_err(host("direction"))?
            .as_string()
            .ok_or_else(|| Error::surface("direction", "direction is not a string"))?;
        keyword("direction", value, Direction::parse)
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        let target: &JsValue = self.ctx.as_ref();
        Reflect::set(target, &JsValue::from_str(DIRECTION), &JsValue::from_str(direction.as_str()))
            .map_err(host("set_direction"))?;
        Ok(())
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<()> {
        self.ctx.translate(x, y).map_err(host("translate"))
    }

    fn rotate(&mut self, angle: f64) -> Result<()> {
        self.ctx.rotate(angle).map_err(host("rotate"))
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<()> {
        self.ctx.scale(x, y).map_err(host("scale"))
    }

    fn transform(&mut self, m: Matrix) -> Result<()> {
        self.ctx.transform(m.a, m.b, m.c, m.d, m.e, m.f).map_err(host("transform"))
    }

    fn set_transform(&mut self, m: Matrix) -> Result<()> {
        self.ctx.set_transform(m.a, m.b, m.c, m.d, m.e, m.f).map_err(host("set_transform"))
    }

    fn fill_rect(&mut self, r: Rect) -> Result<()> {
        self.ctx.fill_rect(r.x, r.y, r.width, r.height);
        Ok(())
    }

    fn stroke_rect(&mut self, r: Rect) -> Result<()> {
        self.ctx.stroke_rect(r.x, r.y, r.width, r.height);
        Ok(())
    }

    fn clear_rect(&mut self, r: Rect) -> Result<()> {
        self.ctx.clear_rect(r.x, r.y, r.width, r.height);
        Ok(())
    }

    fn begin_path(&mut self) -> Result<()> {
        self.ctx.begin_path();
        Ok(())
    }

    fn close_path(&mut self) -> Result<()> {
        self.ctx.close_path();
        Ok(())
    }

    fn move_to(&mut self, to: Point) -> Result<()> {
        self.ctx.move_to(to.x, to.y);
        Ok(())
    }

    fn line_to(&mut self, to: Point) -> Result<()> {
        self.ctx.line_to(to.x, to.y);
        Ok(())
    }

    fn quadratic_curve_to(&mut self, control: Point, to: Point) -> Result<()> {
        self.ctx.quadratic_curve_to(control.x, control.y, to.x, to.y);
        Ok(())
    }

    fn bezier_curve_to(&mut self, c1: Point, c2: Point, to: Point) -> Result<()> {
        self.ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y);
        Ok(())
    }

    fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64, anticlockwise: bool) -> Result<()> {
        self.ctx
            .arc_with_anticlockwise(center.x, center.y, radius, start, end, anticlockwise)
            .map_err(host("arc"))
    }

    fn arc_to(&mut self, p1: Point, p2: Point, radius: f64) -> Result<()> {
        self.ctx.arc_to(p1.x, p1.y, p2.x, p2.y, radius).map_err(host("arc_to"))
    }

    fn rect(&mut self, r: Rect) -> Result<()> {
        self.ctx.rect(r.x, r.y, r.width, r.height);
        Ok(())
    }

    fn fill(&mut self) -> Result<()> {
        self.ctx.fill();
        Ok(())
    }

    fn stroke(&mut self) -> Result<()> {
        self.ctx.stroke();
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point, max_width: Option<f64>) -> Result<()> {
        match max_width {
            Some(width) => self.ctx.fill_text_with_max_width(text, at.x, at.y, width),
            None => self.ctx.fill_text(text, at.x, at.y),
        }
        .map_err(host("fill_text"))
    }

    fn stroke_text(&mut self, text: &str, at: Point, max_width: Option<f64>) -> Result<()> {
        match max_width {
            Some(width) => self.ctx.stroke_text_with_max_width(text, at.x, at.y, width),
            None => self.ctx.stroke_text(text, at.x, at.y),
        }
        .map_err(host("stroke_text"))
    }

    fn draw_image(&mut self, source: &str, placement: ImagePlacement) -> Result<()> {
        let image = self.images.get(source).ok_or_else(|| Error::UnknownImage(source.to_owned()))?;
        match placement {
            ImagePlacement::At(p) => self.ctx.draw_image_with_html_image_element(image, p.x, p.y),
            ImagePlacement::Scaled(r) => self
                .ctx
                .draw_image_with_html_image_element_and_dw_and_dh(image, r.x, r.y, r.width, r.height),
        }
        .map_err(host("draw_image"))
    }

    fn measure_text(&mut self, text: &str) -> Result<TextMetrics> {
        let m = self.ctx.measure_text(text).map_err(host("measure_text"))?;
        Ok(TextMetrics {
            width: m.width(),
            actual_bounding_box_left: m.actual_bounding_box_left(),
            actual_bounding_box_right: m.actual_bounding_box_right(),
            actual_bounding_box_ascent: m.actual_bounding_box_ascent(),
            actual_bounding_box_descent: m.actual_bounding_box_descent(),
            font_bounding_box_ascent: m.font_bounding_box_ascent(),
            font_bounding_box_descent: m.font_bounding_box_descent(),
        })
    }
}
