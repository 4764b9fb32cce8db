use anyhow::{Context, Result};
use chrono::prelude::*;
use circular_queue::CircularQueue;
use crossterm::event::{Event as InputEvent, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::{debug, warn};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Terminal;
use startrack_ephemeris::Body;

use std::io;
use std::sync::mpsc::{sync_channel, Receiver, RecvTimeoutError, SyncSender};
use std::thread;
use std::time::{Duration, Instant};

use crate::event::Event;
use crate::refresh::{Frame, RefreshController, SkyBounds};
use crate::settings::Settings;
use crate::state::ViewState;
use crate::store::CsvStore;

const COL_ACCENT: Color = Color::LightCyan;
const COL_DIM: Color = Color::DarkGray;
const COL_WHITE: Color = Color::White;

/// One color per catalog slot, matched by position in `Body::CATALOG`.
const BODY_COLORS: [Color; 10] = [
    Color::Yellow,
    Color::Gray,
    Color::DarkGray,
    Color::LightMagenta,
    Color::LightRed,
    Color::LightYellow,
    Color::Cyan,
    Color::LightBlue,
    Color::Blue,
    Color::Magenta,
];

const BODY_KEYS: [char; 10] = ['1', '2', '3', '4', '5', '6', '7', '8', '9', '0'];

type Backend = CrosstermBackend<io::Stdout>;

pub struct Ui {
    events: Receiver<Event>,
    logs: CircularQueue<(DateTime<Utc>, log::Level, String)>,
    refresh: RefreshController<CsvStore>,
    sender: SyncSender<Event>,
    show_logs: bool,
    shutdown: bool,
    terminal: Terminal<Backend>,
    view: ViewState,
}

impl Ui {
    pub fn new(settings: Settings) -> Result<Self> {
        let (sender, receiver) = sync_channel(100);

        let send = sender.clone();
        thread::spawn(move || {
            while let Ok(event) = crossterm::event::read() {
                if send.send(Event::Input(event)).is_err() {
                    break;
                }
            }
        });

        let send = sender.clone();
        let tick = Duration::from_secs(settings.refresh_interval);
        thread::spawn(move || {
            while send.send(Event::Tick).is_ok() {
                thread::sleep(tick);
            }
        });

        enable_raw_mode().context("failed to put terminal into raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

        terminal.clear().context("failed to clear terminal")?;
        terminal.hide_cursor().context("failed to hide cursor")?;

        Ok(Self {
            events: receiver,
            logs: CircularQueue::with_capacity(100),
            refresh: RefreshController::new(CsvStore::new(&settings.log_path)),
            sender,
            show_logs: false,
            shutdown: false,
            terminal,
            view: ViewState::new(settings.bodies.iter().cloned()),
        })
    }

    pub fn sender(&self) -> SyncSender<Event> {
        self.sender.clone()
    }

    pub fn run(mut self) -> Result<()> {
        self.refresh.tick(&self.view);
        self.draw()?;

        while let Ok(event) = self.events.recv() {
            self.handle_event(event);

            // drain whatever else is already queued before redrawing
            let start_instant = Instant::now();
            while let Some(remaining_time) =
                Duration::from_millis(16).checked_sub(start_instant.elapsed())
            {
                let event = match self.events.recv_timeout(remaining_time) {
                    Ok(ev) => ev,
                    Err(RecvTimeoutError::Timeout) => break,
                    Err(_) => {
                        self.shutdown = true;
                        break;
                    }
                };

                self.handle_event(event);
            }

            if let Err(err) = self.draw() {
                warn!("draw failed: {:#}", err);
            }

            if self.shutdown {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Input(event) => self.handle_input(&event),
            Event::Log((level, message)) => {
                self.logs.push((Utc::now(), level, message));
            }
            Event::Shutdown => self.shutdown = true,
            Event::Tick => self.refresh.tick(&self.view),
        }
    }

    fn handle_input(&mut self, event: &InputEvent) {
        let key = match event {
            InputEvent::Key(key) if key.kind == KeyEventKind::Press => key,
            InputEvent::Resize(..) => {
                debug!("terminal size changed");
                return;
            }
            _ => return,
        };

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.shutdown = true
            }
            KeyCode::Char('q') => self.shutdown = true,
            KeyCode::Char('l') => self.show_logs = !self.show_logs,
            KeyCode::Char('p') | KeyCode::Char(' ') => self.view.toggle_pause(),
            KeyCode::Char(c) => match body_for_key(c) {
                Some(body) => self.view.toggle_body(body.name()),
                None => debug!("unbound key: {:?}", c),
            },
            _ => {}
        }
    }

    fn draw(&mut self) -> Result<()> {
        let show_logs = self.show_logs;
        let header = header_lines(&self.view);
        let logs = log_lines(&self.logs);
        let frame = self.refresh.frame();

        self.terminal
            .draw(|f| {
                let constraints = if show_logs {
                    vec![
                        Constraint::Length(2),
                        Constraint::Min(0),
                        Constraint::Length(10),
                    ]
                } else {
                    vec![Constraint::Length(2), Constraint::Min(0)]
                };
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints(constraints)
                    .split(f.area());

                f.render_widget(
                    Paragraph::new(header.clone()).alignment(Alignment::Left),
                    rows[0],
                );

                match frame {
                    Some(frame) => render_charts(f, rows[1], frame),
                    None => render_waiting(f, rows[1]),
                }

                if show_logs {
                    f.render_widget(
                        Paragraph::new(logs.clone()).block(
                            Block::default()
                                .borders(Borders::TOP)
                                .border_style(Style::default().fg(COL_DIM))
                                .title(Span::styled("Log", Style::default().fg(Color::Yellow))),
                        ),
                        rows[2],
                    );
                }
            })
            .context("failed to draw to terminal")?;

        Ok(())
    }
}

impl Drop for Ui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn body_for_key(c: char) -> Option<Body> {
    BODY_KEYS
        .iter()
        .position(|&key| key == c)
        .map(|slot| Body::CATALOG[slot])
}

fn body_color(name: &str) -> Color {
    Body::from_name(name)
        .and_then(|body| Body::CATALOG.iter().position(|&b| b == body))
        .map(|slot| BODY_COLORS[slot])
        .unwrap_or(COL_WHITE)
}

fn header_lines(view: &ViewState) -> Vec<Line<'static>> {
    let status = if view.paused() {
        Span::styled(" PAUSED ", Style::default().fg(Color::Black).bg(Color::Yellow))
    } else {
        Span::styled(" LIVE ", Style::default().fg(Color::Black).bg(COL_ACCENT))
    };

    let mut spans = vec![
        Span::styled(
            Utc::now().format(" %F %T UTC ").to_string(),
            Style::default().fg(COL_WHITE).bg(COL_DIM),
        ),
        Span::raw(" "),
        status,
        Span::raw("  "),
    ];

    for (slot, &body) in Body::CATALOG.iter().enumerate() {
        let style = if view.is_active(body.name()) {
            Style::default().fg(BODY_COLORS[slot])
        } else {
            Style::default().fg(COL_DIM)
        };
        spans.push(Span::styled(
            format!("[{}]{} ", BODY_KEYS[slot], body.name()),
            style,
        ));
    }

    vec![
        Line::from(spans),
        Line::from(Span::styled(
            " [1-0] toggle body   [space] pause/resume   [l] log   [q] quit",
            Style::default().fg(COL_DIM),
        )),
    ]
}

fn log_lines(logs: &CircularQueue<(DateTime<Utc>, log::Level, String)>) -> Vec<Line<'static>> {
    logs.iter()
        .take(9)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .map(|(time, level, message)| {
            let style = match level {
                log::Level::Warn => Style::default().fg(Color::Yellow),
                log::Level::Error => Style::default().fg(Color::Red),
                _ => Style::default(),
            };
            Line::from(vec![
                Span::raw(time.format("%H:%M:%S ").to_string()),
                Span::styled(format!("{:<5} ", level), style),
                Span::raw(message.clone()),
            ])
        })
        .collect()
}

fn render_waiting(f: &mut ratatui::Frame, area: Rect) {
    f.render_widget(
        Paragraph::new("Waiting for data... (run `startrack track` first)")
            .alignment(Alignment::Center)
            .style(Style::default().fg(COL_DIM))
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn render_charts(f: &mut ratatui::Frame, area: Rect, frame: &Frame) {
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    let x_bounds = time_axis_bounds(frame);
    render_time_chart(
        f,
        panels[0],
        frame,
        "Altitude over time",
        "Alt (deg)",
        [-90.0, 90.0],
        x_bounds,
        |series| &series.altitude,
    );
    render_time_chart(
        f,
        panels[1],
        frame,
        "Azimuth over time",
        "Az (deg)",
        [0.0, 360.0],
        x_bounds,
        |series| &series.azimuth,
    );
    render_sky_chart(f, panels[2], frame);
}

/// Shared x range of the two time panels, from the earliest to the latest
/// plotted sample.
fn time_axis_bounds(frame: &Frame) -> [f64; 2] {
    let mut times = frame
        .bodies
        .iter()
        .flat_map(|series| series.altitude.iter().map(|&(t, _)| t));

    let first = match times.next() {
        Some(t) => t,
        None => return [0.0, 1.0],
    };
    let (min, max) = times.fold((first, first), |(min, max), t| (min.min(t), max.max(t)));
    if min == max {
        [min - 1.0, max + 1.0]
    } else {
        [min, max]
    }
}

#[allow(clippy::too_many_arguments)]
fn render_time_chart<'a>(
    f: &mut ratatui::Frame,
    area: Rect,
    frame: &'a Frame,
    title: &'a str,
    y_title: &'a str,
    y_bounds: [f64; 2],
    x_bounds: [f64; 2],
    select: impl Fn(&'a crate::refresh::BodySeries) -> &'a Vec<(f64, f64)>,
) {
    let datasets: Vec<Dataset> = frame
        .bodies
        .iter()
        .map(|series| {
            Dataset::default()
                .name(series.body.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(body_color(&series.body)))
                .data(select(series))
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(
            Axis::default()
                .title("Time (UTC)")
                .style(Style::default().fg(COL_DIM))
                .bounds(x_bounds)
                .labels(time_labels(x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title(y_title)
                .style(Style::default().fg(COL_DIM))
                .bounds(y_bounds)
                .labels(vec![
                    Line::from(format!("{:.0}", y_bounds[0])),
                    Line::from(format!("{:.0}", (y_bounds[0] + y_bounds[1]) / 2.0)),
                    Line::from(format!("{:.0}", y_bounds[1])),
                ]),
        );

    f.render_widget(chart, area);
}

/// RA/Dec sky map. The RA axis runs right-to-left like a star chart, so the
/// points are plotted at negated RA and the labels show the positive values.
fn render_sky_chart(f: &mut ratatui::Frame, area: Rect, frame: &Frame) {
    let bounds = frame.sky_bounds.unwrap_or(SkyBounds {
        ra: [0.0, 24.0],
        dec: [-90.0, 90.0],
    });
    let x_bounds = [-bounds.ra[1], -bounds.ra[0]];

    let sky: Vec<(String, Color, Vec<(f64, f64)>)> = frame
        .bodies
        .iter()
        .filter(|series| !series.sky.is_empty())
        .map(|series| {
            (
                series.body.clone(),
                body_color(&series.body),
                series.sky.iter().map(|&(ra, dec)| (-ra, dec)).collect(),
            )
        })
        .collect();

    let datasets: Vec<Dataset> = sky
        .iter()
        .map(|(body, color, points)| {
            Dataset::default()
                .name(body.clone())
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(*color))
                .data(points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title("Sky map (RA/Dec)"))
        .x_axis(
            Axis::default()
                .title("RA (h)")
                .style(Style::default().fg(COL_DIM))
                .bounds(x_bounds)
                .labels(vec![
                    Line::from(format!("{:.1}", bounds.ra[1])),
                    Line::from(format!("{:.1}", bounds.ra[0])),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Dec (deg)")
                .style(Style::default().fg(COL_DIM))
                .bounds(bounds.dec)
                .labels(vec![
                    Line::from(format!("{:.1}", bounds.dec[0])),
                    Line::from(format!("{:.1}", bounds.dec[1])),
                ]),
        );

    f.render_widget(chart, area);
}

fn time_labels(bounds: [f64; 2]) -> Vec<Line<'static>> {
    bounds
        .iter()
        .map(|&ts| {
            Line::from(
                Utc.timestamp_opt(ts as i64, 0)
                    .single()
                    .map(|t| t.format("%H:%M:%S").to_string())
                    .unwrap_or_default(),
            )
        })
        .collect()
}
