//! Integration tests for canvas-mvc.
//!
//! These tests exercise the public API from outside the crate: scenes
//! rendered on the recording surface, the runtime driving a small program,
//! and CSS text produced for elements of a DOM.

use canvas_mvc::app::{AppConfig, Program, Runtime, ViewContext};
use canvas_mvc::canvas::{
    apply, apply_all, measure_text, Font, Scene, Shape, Style, TextAlign, TextBaseline, TextMeasure,
    Transformation,
};
use canvas_mvc::color::Color;
use canvas_mvc::css::{Declaration, DeclarationValue, MediaRule, Selector, SimpleRule, StyleSheet};
use canvas_mvc::dom::{Dom, NodeData, NodeId};
use canvas_mvc::geometry::{Point, Rect};
use canvas_mvc::testing::{commands_to_string, Command, RecordingSurface};
use canvas_mvc::{Error, Result};
use pretty_assertions::assert_eq;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn count(surface: &RecordingSurface, pred: impl Fn(&Command) -> bool) -> usize {
    surface.commands().iter().filter(|c| pred(c)).count()
}

fn assert_balanced(surface: &RecordingSurface) {
    let saves = count(surface, |c| matches!(c, Command::Save));
    let restores = count(surface, |c| matches!(c, Command::Restore));
    assert_eq!(saves, restores, "unbalanced log:\n{}", commands_to_string(surface.commands()));
    assert_eq!(surface.depth(), 0);
}

// ---------------------------------------------------------------------------
// Scene rendering
// ---------------------------------------------------------------------------

#[test]
fn test_group_translate_with_two_rects() {
    let scene = Scene::group([
        Scene::leaf(Shape::FillRect(Rect::new(0.0, 0.0, 5.0, 5.0))),
        Scene::leaf(Shape::FillRect(Rect::new(10.0, 0.0, 5.0, 5.0))),
    ])
    .with_transform(Transformation::translate(10.0, 10.0));

    let mut surface = RecordingSurface::new();
    apply(&mut surface, &scene).unwrap();

    let log: Vec<String> = surface.commands().iter().map(ToString::to_string).collect();
    assert_eq!(
        log,
        vec![
            "save",
            "translate 10 10",
            "save",
            "fill_rect 0 0 5 5",
            "restore",
            "save",
            "fill_rect 10 0 5 5",
            "restore",
            "restore",
        ]
    );
    assert_eq!(count(&surface, |c| matches!(c, Command::Translate(..))), 1);
    assert_balanced(&surface);
}

#[test]
fn test_sibling_scenes_do_not_share_state() {
    let red = Color::rgb(255, 0, 0);
    let scenes = [
        Scene::leaf(Shape::FillRect(Rect::new(0.0, 0.0, 1.0, 1.0)))
            .with_style(Style::FillColor(red))
            .with_transform(Transformation::rotate(1.0)),
        Scene::leaf(Shape::FillRect(Rect::new(0.0, 0.0, 1.0, 1.0))),
    ];

    let mut surface = RecordingSurface::new();
    apply_all(&mut surface, &scenes).unwrap();
    assert_eq!(surface.state().fill_style, Color::BLACK);
    assert!(surface.state().transform.is_identity());
    assert_balanced(&surface);
}

#[test]
fn test_every_failing_operation_leaves_surface_balanced() {
    let scene = Scene::group([
        Scene::leaf(Shape::circle(Point::new(5.0, 5.0), 3.0))
            .with_style(Style::StrokeColor(Color::WHITE))
            .with_transform(Transformation::scale(2.0, 2.0)),
        Scene::leaf(Shape::text("label", Point::new(0.0, 20.0)))
            .with_styles([Style::TextAlign(TextAlign::Center), Style::LineWidth(2.0)]),
        Scene::leaf(Shape::StrokeRect(Rect::new(1.0, 1.0, 8.0, 8.0))),
    ])
    .with_style(Style::FillColor(Color::rgb(0, 0, 255)))
    .with_transform(Transformation::translate(3.0, 4.0).then(Transformation::rotate(0.5)));

    let ops = [
        "save",
        "set_fill_style",
        "set_stroke_style",
        "set_line_width",
        "set_text_align",
        "translate",
        "rotate",
        "scale",
        "begin_path",
        "arc",
        "fill",
        "fill_text",
        "stroke_rect",
    ];
    for op in ops {
        let mut surface = RecordingSurface::new();
        surface.fail_on(op);
        let err = apply(&mut surface, &scene).unwrap_err();
        assert!(matches!(err, Error::Surface { op: failed, .. } if failed == op), "{op}: {err}");
        assert_balanced(&surface);
    }
}

// ---------------------------------------------------------------------------
// Text metrics
// ---------------------------------------------------------------------------

#[test]
fn test_measure_text_leaves_text_state_unchanged() {
    let measure = TextMeasure::new(Font::new(24.0, "serif").bold())
        .with_align(TextAlign::Right)
        .with_baseline(TextBaseline::Top);

    for text in ["", "ascii", "héllo wörld", "🎉🎉"] {
        let mut surface = RecordingSurface::new();
        let before = surface.state().clone();
        let metrics = measure_text(&mut surface, &measure, text).unwrap();
        assert_eq!(metrics.width, text.chars().count() as f64 * 12.0);
        assert_eq!(surface.state(), &before, "text {text:?}");
    }
}

// ---------------------------------------------------------------------------
// Runtime: a grid of buttons with a seconds counter
// ---------------------------------------------------------------------------

const CELL: f64 = 40.0;
const GAP: f64 = 5.0;
const COLUMNS: usize = 3;
const ORIGIN: Point = Point { x: 10.0, y: 10.0 };
const HIGHLIGHT: Color = Color { r: 255, g: 200, b: 0, a: 1.0 };

#[derive(Default)]
struct ButtonGrid {
    selected: Option<usize>,
    elapsed_ms: u64,
}

enum GridMsg {
    Click(Point),
    Tick(u64),
}

impl ButtonGrid {
    fn cell_rect(index: usize) -> Rect {
        let col = (index % COLUMNS) as f64;
        let row = (index / COLUMNS) as f64;
        Rect::new(col * (CELL + GAP), row * (CELL + GAP), CELL, CELL)
    }

    fn hit(point: Point) -> Option<usize> {
        let local = point - ORIGIN;
        (0..COLUMNS * COLUMNS).find(|&i| Self::cell_rect(i).contains(local))
    }
}

impl Program for ButtonGrid {
    type Message = GridMsg;

    fn update(&mut self, message: GridMsg) -> bool {
        match message {
            GridMsg::Click(point) => {
                let hit = Self::hit(point);
                if hit.is_some() && hit != self.selected {
                    self.selected = hit;
                    true
                } else {
                    false
                }
            }
            GridMsg::Tick(ms) => {
                let before = self.elapsed_ms / 1000;
                self.elapsed_ms += ms;
                self.elapsed_ms / 1000 != before
            }
        }
    }

    fn view(&self, cx: &mut ViewContext<'_>) -> Result<Vec<Scene>> {
        let label_font = TextMeasure::new(Font::new(16.0, "sans-serif"));
        let mut cells = Vec::new();
        for i in 0..COLUMNS * COLUMNS {
            let rect = Self::cell_rect(i);
            let fill = if self.selected == Some(i) { HIGHLIGHT } else { Color::rgb(200, 200, 200) };
            let label = (i + 1).to_string();
            let width = cx.measure(&label_font, &label)?.width;
            let at = Point::new(rect.x + (rect.width - width) / 2.0, rect.center().y);
            cells.push(Scene::group([
                Scene::leaf(Shape::FillRect(rect)).with_style(Style::FillColor(fill)),
                Scene::leaf(Shape::text(label, at))
                    .with_styles([Style::FillColor(Color::BLACK), Style::Font(label_font.font.clone())]),
            ]));
        }
        let grid = Scene::group(cells).with_transform(Transformation::translate(ORIGIN.x, ORIGIN.y));
        let timer = Scene::leaf(Shape::text(
            format!("{}s", self.elapsed_ms / 1000),
            Point::new(ORIGIN.x, cx.size().height - 5.0),
        ));
        Ok(vec![grid, timer])
    }

    fn stylesheet(&self) -> StyleSheet {
        StyleSheet::new()
            .with(SimpleRule::tag("canvas", [Declaration::new("cursor", "pointer")]))
            .with(MediaRule::new("prefers-color-scheme: dark").with_rule(SimpleRule::tag(
                "body",
                [Declaration::new("background", Color::BLACK)],
            )))
    }
}

fn grid_runtime() -> Runtime<ButtonGrid, RecordingSurface> {
    Runtime::new(ButtonGrid::default(), RecordingSurface::new(), AppConfig::new().with_size(160.0, 180.0))
}

#[test]
fn test_clicks_select_cell_and_render_once_per_batch() {
    let mut rt = grid_runtime();
    rt.dispatch(GridMsg::Click(Point::new(60.0, 15.0)));
    rt.dispatch(GridMsg::Click(Point::new(500.0, 500.0)));
    rt.dispatch(GridMsg::Click(Point::new(105.0, 105.0)));

    assert_eq!(rt.process().unwrap(), 3);
    assert_eq!(rt.program().selected, Some(8));
    assert_eq!(rt.frames(), 1);

    // Clicking the gap between cells changes nothing.
    rt.dispatch(GridMsg::Click(Point::new(52.0, 15.0)));
    assert_eq!(rt.process().unwrap(), 1);
    assert_eq!(rt.frames(), 1);
}

#[test]
fn test_ticks_redraw_only_when_seconds_change() {
    let mut rt = grid_runtime();
    rt.dispatch(GridMsg::Tick(400));
    rt.dispatch(GridMsg::Tick(400));
    rt.process().unwrap();
    assert_eq!(rt.frames(), 0);

    rt.dispatch(GridMsg::Tick(400));
    rt.process().unwrap();
    assert_eq!(rt.frames(), 1);
    let last_text = rt.surface().commands().iter().rev().find_map(|c| match c {
        Command::FillText { text, .. } => Some(text.clone()),
        _ => None,
    });
    assert_eq!(last_text.as_deref(), Some("1s"));
}

#[test]
fn test_grid_frame_draws_every_cell_balanced() {
    let mut rt = grid_runtime();
    rt.dispatch(GridMsg::Click(Point::new(15.0, 15.0)));
    rt.process().unwrap();

    let surface = rt.surface();
    assert_eq!(count(surface, |c| matches!(c, Command::FillRect(_))), 9);
    assert_eq!(count(surface, |c| matches!(c, Command::FillText { .. })), 10);
    assert_eq!(count(surface, |c| matches!(c, Command::SetFillStyle(color) if *color == HIGHLIGHT)), 1);
    assert_balanced(surface);

    // One measurement per distinct label.
    assert_eq!(surface.measure_count(), 9);
    rt.render().unwrap();
    assert_eq!(rt.surface().measure_count(), 9);
    assert_eq!(rt.metrics_cache().hits(), 9);
}

#[test]
fn test_grid_stylesheet() {
    let rt = grid_runtime();
    insta::assert_snapshot!(rt.css(), @r"
    canvas{cursor:pointer;}
    @media (prefers-color-scheme: dark){body{background:#000000;}}
    ");
}

// ---------------------------------------------------------------------------
// CSS for DOM elements
// ---------------------------------------------------------------------------

fn toolbar() -> (Dom, NodeId, NodeId) {
    let mut dom = Dom::new();
    let root = dom.insert(NodeData::new("body"));
    let bar = dom.insert_child(root, NodeData::new("div").with_class("toolbar")).unwrap();
    let canvas = dom
        .insert_child(root, NodeData::new("canvas").with_id("board").with_attribute("width", "160"))
        .unwrap();
    dom.insert_child(bar, NodeData::new("button").with_class("primary")).unwrap();
    (dom, bar, canvas)
}

#[test]
fn test_element_rule_targets_exactly_one_node() {
    let (dom, _, canvas) = toolbar();
    let rule = SimpleRule::element(canvas, [Declaration::new("border", DeclarationValue::px(1.0))]);
    assert_eq!(
        dom.get(canvas).unwrap().attribute("data-ref"),
        Some(canvas.data_ref().as_str())
    );
    assert_eq!(dom.query(&rule.selectors()[0]), vec![canvas]);
    assert_eq!(
        rule.to_string(),
        format!("[data-ref=\"{}\"]{{border:1px;}}", canvas.data_ref())
    );
}

#[test]
fn test_stylesheet_for_toolbar() {
    let (dom, bar, _) = toolbar();
    let buttons = Selector::class("toolbar").child(Selector::tag("button"));
    assert_eq!(dom.query(&buttons).len(), 1);
    assert_eq!(dom.parent(dom.query(&buttons)[0]), Some(bar));

    let sheet = StyleSheet::new()
        .with(
            SimpleRule::new(buttons)
                .or(Selector::id("board"))
                .declare(Declaration::new("margin", DeclarationValue::px(4.0)))
                .declare(Declaration::new("color", DeclarationValue::Var("accent".into())).important()),
        )
        .with(MediaRule::new("max-width: 600px").with_rule(SimpleRule::class(
            "toolbar",
            [Declaration::new("display", "none")],
        )));

    insta::assert_snapshot!(sheet.to_string(), @r"
    .toolbar > button, #board{margin:4px;color:var(--accent) !important;}
    @media (max-width: 600px){.toolbar{display:none;}}
    ");
}

#[test]
fn test_empty_selector_list_is_rejected() {
    let err = SimpleRule::try_from_selectors(std::iter::empty::<Selector>()).unwrap_err();
    assert_eq!(err, Error::EmptySelectorList);
}
