//! Crossterm backend that draws scenes into the alternate screen.

use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use ascii_city_core::{CellCoord, EconomySnapshot, PendingSnapshot, VisualState};
use ascii_city_rendering::{
    glyphs::{self, Frame},
    FrameControl, FrameInput, Presentation, RenderingBackend, Scene,
};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

const QUIT_KEY: char = 'q';

/// Terminal backend polling the keyboard once per frame.
#[derive(Debug)]
pub(crate) struct TerminalBackend {
    poll_interval: Duration,
}

impl TerminalBackend {
    pub(crate) const fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }
}

impl RenderingBackend for TerminalBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameControl,
    {
        let _guard = TerminalGuard::enter().context("failed to prepare the terminal")?;
        let mut stdout = io::stdout();
        let Presentation { banner, mut scene } = presentation;

        draw(&mut stdout, &scene, &banner).context("failed to draw the first frame")?;
        let mut last_frame = Instant::now();
        loop {
            let input = FrameInput {
                key: poll_key(self.poll_interval).context("failed to read input")?,
            };
            let now = Instant::now();
            let dt = now.duration_since(last_frame);
            last_frame = now;

            if update_scene(dt, input, &mut scene) == FrameControl::Quit {
                return Ok(());
            }
            draw(&mut stdout, &scene, &banner).context("failed to draw frame")?;
        }
    }
}

/// Raw mode and alternate screen, undone on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), ResetColor, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn poll_key(timeout: Duration) -> io::Result<Option<char>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => Ok(key_token(code, modifiers)),
        _ => Ok(None),
    }
}

/// Folds special keys onto the single-character input alphabet.
fn key_token(code: KeyCode, modifiers: KeyModifiers) -> Option<char> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(QUIT_KEY),
        KeyCode::Esc => Some(QUIT_KEY),
        KeyCode::Char(token) => Some(token),
        KeyCode::Up => Some('w'),
        KeyCode::Left => Some('a'),
        KeyCode::Down => Some('s'),
        KeyCode::Right => Some('d'),
        KeyCode::Enter => Some('p'),
        _ => None,
    }
}

fn draw<W: Write>(out: &mut W, scene: &Scene, banner: &str) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;

    for building in &scene.buildings {
        let color = match building.visual {
            VisualState::Abandoned => Color::DarkGrey,
            VisualState::Frame(_) => Color::Grey,
        };
        draw_art(
            out,
            building.region.origin(),
            glyphs::frame(building.kind, building.visual),
            color,
        )?;
    }

    if let Some(pending) = &scene.pending {
        let color = if pending.is_legal() {
            Color::Green
        } else {
            Color::Red
        };
        draw_art(
            out,
            pending.region.origin(),
            glyphs::frame(pending.kind, VisualState::Frame(0)),
            color,
        )?;
    }

    draw_hud(out, scene, banner)?;
    if scene.is_won() {
        draw_victory(out, scene)?;
    }

    queue!(out, ResetColor)?;
    out.flush()
}

fn draw_art<W: Write>(out: &mut W, origin: CellCoord, frame: Frame, color: Color) -> io::Result<()> {
    queue!(out, SetForegroundColor(color))?;
    for (offset, row) in (0u32..).zip(frame.iter()) {
        let line: String = row.chars().map(glyphs::map_glyph).collect();
        queue!(
            out,
            MoveTo(cell(origin.column()), cell(origin.row().saturating_add(offset))),
            Print(line)
        )?;
    }
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, scene: &Scene, banner: &str) -> io::Result<()> {
    let top = cell(scene.map.rows);

    queue!(
        out,
        MoveTo(0, top),
        SetForegroundColor(Color::White),
        Print(economy_line(&scene.economy)),
        Print(pending_label(scene.pending.as_ref()))
    )?;

    queue!(out, MoveTo(0, top.saturating_add(1)))?;
    for entry in &scene.catalog {
        let color = if entry.affordable {
            Color::White
        } else {
            Color::DarkGrey
        };
        queue!(
            out,
            SetForegroundColor(color),
            Print(format!(
                "[{}] {} ${}  ",
                entry.token,
                entry.kind.label(),
                entry.price
            ))
        )?;
    }

    queue!(
        out,
        MoveTo(0, top.saturating_add(2)),
        SetForegroundColor(Color::DarkGrey),
        Print(format!("{banner}  wasd move, p build, q quit"))
    )
}

fn draw_victory<W: Write>(out: &mut W, scene: &Scene) -> io::Result<()> {
    let lines = ["Everyone has left the city. You win!", "Press q to quit."];
    let middle = scene.map.rows / 2;
    for (offset, line) in (0u32..).zip(lines) {
        let width = u32::try_from(line.len()).unwrap_or(u32::MAX);
        let column = scene.map.columns.saturating_sub(width) / 2;
        queue!(
            out,
            MoveTo(cell(column), cell(middle.saturating_add(offset))),
            SetForegroundColor(Color::Yellow),
            Print(line)
        )?;
    }
    Ok(())
}

fn economy_line(economy: &EconomySnapshot) -> String {
    format!(
        "Cash ${:.0} ({:+.1})  Population {}  Pollution {} (+{})  Boost +{:.0}%",
        economy.cash,
        economy.cash_delta,
        economy.population,
        economy.pollution,
        economy.pollution_delta,
        economy.production_boost * 100.0,
    )
}

fn pending_label(pending: Option<&PendingSnapshot>) -> String {
    match pending {
        Some(pending) if pending.is_legal() => format!("  Placing {}", pending.kind.label()),
        Some(pending) => format!("  Placing {} (blocked)", pending.kind.label()),
        None => String::new(),
    }
}

fn cell(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ascii_city_core::{BuildingKind, BuildingView, CellRect, GameStatus, PlacementError};
    use ascii_city_rendering::MapPresentation;

    fn scene(status: GameStatus) -> Scene {
        Scene::new(
            MapPresentation::new(40, 12).expect("valid map"),
            BuildingView::default(),
            EconomySnapshot {
                cash: 1_000.0,
                population: 50,
                ..EconomySnapshot::default()
            },
            None,
            status,
        )
    }

    #[test]
    fn special_keys_fold_onto_input_alphabet() {
        assert_eq!(key_token(KeyCode::Esc, KeyModifiers::NONE), Some('q'));
        assert_eq!(
            key_token(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some('q')
        );
        assert_eq!(key_token(KeyCode::Char('c'), KeyModifiers::NONE), Some('c'));
        assert_eq!(key_token(KeyCode::Right, KeyModifiers::NONE), Some('d'));
        assert_eq!(key_token(KeyCode::Enter, KeyModifiers::NONE), Some('p'));
        assert_eq!(key_token(KeyCode::Tab, KeyModifiers::NONE), None);
    }

    #[test]
    fn economy_line_reports_every_counter() {
        let line = economy_line(&EconomySnapshot {
            cash: 1_234.4,
            population: 120,
            pollution: 34,
            production_boost: 0.2,
            abandonment_pressure: 0,
            cash_delta: 12.0,
            pollution_delta: 3,
        });

        assert_eq!(
            line,
            "Cash $1234 (+12.0)  Population 120  Pollution 34 (+3)  Boost +20%"
        );
    }

    #[test]
    fn pending_label_flags_blocked_positions() {
        let pending = PendingSnapshot {
            kind: BuildingKind::Office,
            region: CellRect::from_origin_and_size(
                CellCoord::new(0, 0),
                BuildingKind::Office.footprint(),
            ),
            placement: Err(PlacementError::Overlapping),
        };

        assert_eq!(pending_label(Some(&pending)), "  Placing Office (blocked)");
        assert_eq!(pending_label(None), "");
    }

    #[test]
    fn drawing_writes_hud_and_victory() {
        let mut buffer = Vec::new();
        draw(&mut buffer, &scene(GameStatus::Won), "Welcome").expect("in-memory draw");
        let output = String::from_utf8_lossy(&buffer);

        assert!(output.contains("Population 50"));
        assert!(output.contains("[1] Shop $100"));
        assert!(output.contains("You win!"));
        assert!(output.contains("Welcome  wasd move"), "banner sits in the status bar");

        buffer.clear();
        draw(&mut buffer, &scene(GameStatus::Running), "Welcome").expect("in-memory draw");
        let output = String::from_utf8_lossy(&buffer);
        assert!(!output.contains("You win!"));
        assert!(output.contains("Welcome"), "banner is drawn on every frame");
    }
}
