mod braille;
mod scene;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use crate::aids::{AidLine, AidSet};
use crate::app::{pane_block, screen_layout, AppState, View, ViewKind};
use crate::color::{to_color, Axis, Rgb, Theme};
use braille::BrailleCanvas;
use scene::{draw_aid, draw_axes, draw_marker, Projector};

const HELP: &str = " drag point: left mouse (Cartesian) | orbit: drag empty space / arrows | \
                    zoom: wheel | [r]eset | [t]heme | [h]elp | [s]ave | [q]uit";

/// Draws one 3D view into the inside of its pane
pub trait ViewRenderer {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState);

    fn kind(&self) -> ViewKind;
}

/// Axes at full color with the radius and projection lines
pub struct CartesianPane;

/// Faded axes with the radius and both angle arcs
pub struct SphericalPane;

impl ViewRenderer for CartesianPane {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = state.theme;
        render_scene(
            frame,
            area,
            state.view(self.kind()),
            state.cartesian_aids.lines(),
            |axis| theme.axis(axis),
            state,
        );
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Cartesian
    }
}

impl ViewRenderer for SphericalPane {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = state.theme;
        render_scene(
            frame,
            area,
            state.view(self.kind()),
            state.spherical_aids.lines(),
            |axis| theme.faded_axis(axis),
            state,
        );
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Spherical
    }
}

fn render_scene(
    frame: &mut Frame,
    area: Rect,
    view: &View,
    aids: &[AidLine],
    axis_color: impl Fn(Axis) -> Rgb,
    state: &AppState,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let theme = state.theme;
    let mut canvas = BrailleCanvas::new(area.width as usize, area.height as usize);
    let projector = Projector::new(&view.camera, &canvas);

    let labels = draw_axes(&mut canvas, &projector, axis_color);
    for line in aids {
        draw_aid(&mut canvas, &projector, line, theme.aid(line.kind));
    }
    draw_marker(&mut canvas, &projector, state.point(), theme.marker());

    canvas.render(frame, area);

    let buf = frame.buffer_mut();
    for label in labels {
        if let Some(cell) = buf.cell_mut((area.x + label.col, area.y + label.row)) {
            cell.set_char(label.text);
            cell.set_fg(to_color(label.color));
        }
    }
}

/// Draws the whole screen: both panes, readouts and the help line
pub fn render_app(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let theme = state.theme;
    let base = Style::default()
        .bg(to_color(theme.background()))
        .fg(to_color(theme.foreground()));
    frame.render_widget(Block::default().style(base), area);

    let layout = screen_layout(area, state.show_help);
    let renderers: [&dyn ViewRenderer; 2] = [&CartesianPane, &SphericalPane];
    for renderer in renderers {
        let pane = layout.pane(renderer.kind());
        let block = pane_block(renderer.kind())
            .border_style(Style::default().fg(to_color(theme.muted())));
        let inner = block.inner(pane);
        frame.render_widget(block, pane);
        renderer.render(frame, inner, state);
    }

    render_status(frame, layout.status, state, theme);
}

fn render_status(frame: &mut Frame, area: Rect, state: &AppState, theme: Theme) {
    let readouts = state.readouts();
    let label = Style::default()
        .fg(to_color(theme.foreground()))
        .add_modifier(Modifier::BOLD);
    let value = Style::default().fg(to_color(theme.foreground()));

    let row = |title: &'static str, values: &[String; 3]| {
        let mut spans = vec![Span::styled(format!(" {:<11}", title), label)];
        for v in values {
            spans.push(Span::styled(format!("{:<28}", v), value));
        }
        Line::from(spans)
    };

    let mut lines = vec![
        row("Cartesian", &readouts.cartesian),
        row("Spherical", &readouts.spherical),
    ];
    if state.show_help {
        lines.push(Line::styled(HELP, Style::default().fg(to_color(theme.muted()))));
    }
    frame.render_widget(Paragraph::new(lines), area);
}
