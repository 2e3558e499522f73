/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The renderer only reads the session. It never changes game state.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::content::{self, BIAS_ZONES, STORY_BLOCKS, TIMELINE_SLOTS};
use crate::domain::level::{LevelId, Screen};
use crate::domain::rules;
use crate::sim::battle::{BattleWidget, TurnState};
use crate::sim::bias::BiasWidget;
use crate::sim::feedback::Feedback;
use crate::sim::game::GameState;
use crate::sim::quiz::QuizWidget;
use crate::sim::scheduler::Scheduler;
use crate::sim::session::{Choice, Modal, Session, View};
use crate::sim::timeline::TimelineWidget;

// ── Palette ──

const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };
const PANEL_BG: Color = Color::Rgb { r: 40, g: 40, b: 60 };
const GOLD: Color = Color::Rgb { r: 255, g: 200, b: 50 };
const GREEN: Color = Color::Rgb { r: 80, g: 255, b: 80 };
const RED: Color = Color::Rgb { r: 255, g: 80, b: 80 };
const BLUE: Color = Color::Rgb { r: 100, g: 200, b: 255 };
const DIM: Color = Color::DarkGrey;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: BASE_BG };

    /// Sentinel used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). One column per char; clipped at the edge.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell { ch, fg, bg });
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, bg: Color) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.set(xx, yy, Cell { ch: ' ', fg: Color::White, bg });
            }
        }
    }

    /// Word-wrapped paragraph. Returns the number of rows used.
    fn put_wrapped(&mut self, x: usize, y: usize, width: usize, text: &str, fg: Color, bg: Color) -> usize {
        let lines = wrap(text, width);
        for (i, line) in lines.iter().enumerate() {
            self.put_str(x, y + i, line, fg, bg);
        }
        lines.len()
    }
}

/// Greedy word wrap on char counts. Words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if len > 0 {
                lines.push(std::mem::take(&mut line));
                len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }
        let needed = if len == 0 { word.len() } else { len + 1 + word.len() };
        if needed > width {
            lines.push(std::mem::take(&mut line));
            len = 0;
        }
        if len > 0 {
            line.push(' ');
            len += 1;
        }
        line.extend(word.iter());
        len += word.len();
    }
    if len > 0 {
        lines.push(line);
    }
    lines
}

/// `[█████░░░░░]` style bar for a value out of `max`.
fn bar(value: u32, max: u32, width: usize) -> String {
    let filled = if max == 0 { 0 } else { (value.min(max) as usize * width) / max as usize };
    let mut s = String::with_capacity(width + 2);
    s.push('[');
    s.extend(std::iter::repeat('█').take(filled));
    s.extend(std::iter::repeat('░').take(width - filled));
    s.push(']');
    s
}

// ── Renderer ──

const HUD_ROW: usize = 0;
const BODY_ROW: usize = 3;
const MARGIN: usize = 2;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_screen: Option<Screen>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_screen: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render<S: Scheduler>(&mut self, session: &Session<S>, anim_tick: u32) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
        }

        // Screen change → clean repaint
        let screen = session.game().screen;
        if self.last_screen != Some(screen) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
            self.last_screen = Some(screen);
        }

        self.front.clear();

        match screen {
            Screen::Start => self.compose_start(),
            Screen::Win => self.compose_win(session.game(), anim_tick),
            Screen::Level(level) => {
                self.compose_hud(session.game(), level);
                let y = self.compose_level(session, level);
                self.compose_choices(&session.choices(), session.cursor(), y + 1);
                self.compose_help(level);
            }
        }

        if let Some(fb) = session.feedback() {
            self.compose_feedback(fb);
        }
        match session.modal() {
            Some(Modal::Fax) => self.compose_box(
                content::FAX_TITLE, content::FAX_TEXT, BLUE, "ENTER: put the fax away",
            ),
            Some(Modal::LevelComplete(level)) => self.compose_banner(level, anim_tick),
            None => {}
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        // Explicit base colors; ResetColor would fall back to the terminal default.
        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn body_width(&self) -> usize {
        self.front.width.saturating_sub(MARGIN * 2).min(96)
    }

    fn compose_start(&mut self) {
        let title = [
            r" ___                                             _  _                ",
            r"| _ )_  _ _ _ ___ __ _ _  _ __ _ _ __ _ _ __ _  | || |___ _ _ ___  ",
            r"| _ \ || | '_/ -_) _` | || / _| '_/ _` / _| || | | __ / -_) '_/ _ \ ",
            r"|___/\_,_|_| \___\__,_|\_,_\__|_| \__,_\__|\_, | |_||_\___|_| \___/ ",
            r"                                           |__/                     ",
        ];
        for (i, line) in title.iter().enumerate() {
            self.front.put_str(MARGIN, 1 + i, line, GOLD, BASE_BG);
        }
        self.front.put_str(MARGIN, 7, "━━━ The BärGPT Protocol ━━━", GREEN, BASE_BG);

        let w = self.body_width();
        let mission = "Berlin's administration wants to give its AI assistant BärGPT access to \
            current online information. Data protection says no. Your mission: win over the \
            Chief Digital Officer before the project is buried for good.";
        let mut y = 9;
        y += self.front.put_wrapped(MARGIN, y, w, mission, Color::White, BASE_BG) + 1;

        for level in LevelId::ALL {
            let line = format!("  {}. {:<22} {}", level.number(), level.title(), level.tagline());
            self.front.put_str(MARGIN, y, &line, BLUE, BASE_BG);
            y += 1;
        }
        y += 1;
        self.front.put_str(MARGIN, y, "ENTER  Start the mission", GREEN, BASE_BG);
        self.front.put_str(MARGIN, y + 1, "  Q    Quit", Color::White, BASE_BG);
    }

    fn compose_win(&mut self, g: &GameState, anim_tick: u32) {
        let star = if (anim_tick / 8) % 2 == 0 { '★' } else { '☆' };
        let banner = format!("{star}  BÄRGPT GOES ONLINE!  {star}");
        self.front.put_str(MARGIN + 2, 3, &banner, GOLD, BASE_BG);

        let w = self.body_width();
        let text = "The CDO signs the pilot. Data protection gets its filter, Sabine gets \
            sourced answers, and the administration moves a little faster.";
        let mut y = 5;
        y += self.front.put_wrapped(MARGIN, y, w, text, Color::White, BASE_BG) + 1;

        let score = format!("Final approval: {}  {}", g.approval, bar(g.approval, rules::APPROVAL_MAX, 20));
        self.front.put_str(MARGIN, y, &score, GREEN, BASE_BG);
        if g.coffee_found {
            self.front.put_str(MARGIN, y + 1, "Secret found: the office coffee ☕", DIM, BASE_BG);
        }
        if g.fax_triggered {
            self.front.put_str(MARGIN, y + 2, "Secret found: the fax machine", DIM, BASE_BG);
        }
        self.front.put_str(MARGIN, y + 4, "ENTER  Play again     Q  Quit", Color::White, BASE_BG);
    }

    fn compose_hud(&mut self, g: &GameState, level: LevelId) {
        let hud = g.hud();
        let label = if level.is_final() { "Conviction" } else { "Approval" };
        let left = format!(" Level {}/{}  {}", hud.level, hud.total, level.title());
        let right = format!(
            "{} {} {:>3}   Energy {:>3} ",
            label, bar(hud.score, rules::APPROVAL_MAX, 10), hud.score, hud.energy,
        );
        let w = self.front.width;
        self.front.fill_rect(0, HUD_ROW, w, 1, PANEL_BG);
        self.front.put_str(0, HUD_ROW, &left, GOLD, PANEL_BG);
        let rx = w.saturating_sub(right.chars().count());
        self.front.put_str(rx, HUD_ROW, &right, Color::White, PANEL_BG);
        self.front.put_str(MARGIN, HUD_ROW + 1, level.tagline(), DIM, BASE_BG);
    }

    /// Level panel. Returns the first free row below it.
    fn compose_level<S: Scheduler>(&mut self, session: &Session<S>, level: LevelId) -> usize {
        let g = session.game();
        match session.view() {
            View::Bias(w) => self.compose_bias(w),
            View::Timeline(w) => self.compose_timeline(w),
            View::Quiz(w) => self.compose_quiz(w, g, level),
            View::Battle(w) => self.compose_battle(w, g, level),
            View::Idle => BODY_ROW,
        }
    }

    fn compose_bias(&mut self, w: &BiasWidget) -> usize {
        let mut y = BODY_ROW;
        self.front.put_str(MARGIN, y, content::MAIL_FROM, Color::White, BASE_BG);
        self.front.put_str(MARGIN, y + 1, content::MAIL_SUBJECT, Color::White, BASE_BG);
        y += 3;
        let found = (0..BIAS_ZONES.len()).filter(|&z| w.is_resolved(z)).count();
        let status = format!("Biases found: {}/{}", found, BIAS_ZONES.len());
        self.front.put_str(MARGIN, y, &status, GREEN, BASE_BG);
        y += 2;

        let prompt = match w.selected() {
            Some(z) => {
                let quote = format!("\"{}\"", BIAS_ZONES[z].text);
                y += self.front.put_wrapped(MARGIN, y, self.body_width(), &quote, GOLD, BASE_BG) + 1;
                "Which bias is hiding in this passage? (ESC: back)"
            }
            None => "Select a suspicious passage of the e-mail:",
        };
        self.front.put_str(MARGIN, y, prompt, BLUE, BASE_BG);
        y + 1
    }

    fn compose_timeline(&mut self, w: &TimelineWidget) -> usize {
        let mut y = BODY_ROW;
        self.front.put_str(MARGIN, y, "The hero's journey of your pitch:", GOLD, BASE_BG);
        y += 1;
        for (i, slot) in TIMELINE_SLOTS.iter().enumerate() {
            let (text, fg) = match w.slot(i) {
                Some(b) => (STORY_BLOCKS[b].text, GREEN),
                None => ("· · ·", DIM),
            };
            self.front.put_str(MARGIN + 2, y, &format!("{:<20} {}", slot.label, text), fg, BASE_BG);
            y += 1;
        }
        y += 1;
        let prompt = match w.selected() {
            Some(b) => format!("Where does \"{}\" belong? (ESC: back)", STORY_BLOCKS[b].text),
            None => "Pick a story block:".to_string(),
        };
        y += self.front.put_wrapped(MARGIN, y, self.body_width(), &prompt, BLUE, BASE_BG);
        y
    }

    fn compose_quiz(&mut self, w: &QuizWidget, g: &GameState, level: LevelId) -> usize {
        let mut y = BODY_ROW;
        let progress = g.quiz(level);
        if let (Some(q), Some(question)) = (w.current(progress), w.question(progress)) {
            let head = format!("Question {}/{}", q + 1, w.len());
            self.front.put_str(MARGIN, y, &head, GOLD, BASE_BG);
            y += 2;
            y += self.front.put_wrapped(MARGIN, y, self.body_width(), question.prompt, Color::White, BASE_BG);
        }
        y
    }

    fn compose_battle(&mut self, w: &BattleWidget, g: &GameState, level: LevelId) -> usize {
        let spec = w.spec();
        let b = g.battle(level);
        let mut y = BODY_ROW;

        let enemy = format!("{:<24} {} {:>3}/{}", spec.opponent, bar(b.enemy_hp, spec.enemy_hp, 20), b.enemy_hp, spec.enemy_hp);
        self.front.put_str(MARGIN, y, &enemy, RED, BASE_BG);
        let you = format!("{:<24} {} {:>3}/{}", "You", bar(b.player_hp, spec.player_hp, 20), b.player_hp, spec.player_hp);
        self.front.put_str(MARGIN, y + 1, &you, GREEN, BASE_BG);
        y += 2;
        if let Some(fw) = &spec.final_win {
            let meter = format!("{:<24} {} {:>3}  (convince at {}+ with opponent ≤ {})",
                "CDO conviction", bar(b.meter, rules::METER_MAX, 20), b.meter, fw.meter_min, fw.enemy_max);
            self.front.put_str(MARGIN, y, &meter, GOLD, BASE_BG);
            y += 1;
        }
        y += 1;

        if let Some(attack) = w.current_attack() {
            let line = format!("{}: \"{}\"", attack.name, attack.text);
            y += self.front.put_wrapped(MARGIN, y, self.body_width(), &line, RED, BASE_BG);
        }
        y += 1;
        for line in w.log() {
            self.front.put_str(MARGIN, y, &format!("› {line}"), DIM, BASE_BG);
            y += 1;
        }
        y += 1;

        let status = match w.turn() {
            TurnState::AwaitingEnemy => format!("{} is preparing an objection...", spec.opponent),
            TurnState::AwaitingPlayer => "Your turn: play a counter-argument".to_string(),
            TurnState::Resolving => "...".to_string(),
            TurnState::Finished => "Won over!".to_string(),
        };
        self.front.put_str(MARGIN, y, &status, BLUE, BASE_BG);
        y + 1
    }

    fn compose_choices(&mut self, choices: &[Choice], cursor: usize, y: usize) {
        let w = self.body_width().saturating_sub(6);
        let mut row = y;
        for (i, c) in choices.iter().enumerate() {
            let selected = i == cursor;
            let mark = if c.done { '✓' } else if selected { '▸' } else { ' ' };
            let fg = if !c.enabled { DIM } else if selected { GOLD } else { Color::White };
            let bg = if selected { PANEL_BG } else { BASE_BG };
            for (j, line) in wrap(&c.label, w).iter().enumerate() {
                let text = if j == 0 {
                    format!("{mark} {}. {line}", i + 1)
                } else {
                    format!("     {line}")
                };
                self.front.put_str(MARGIN, row, &text, fg, bg);
                row += 1;
            }
        }
    }

    fn compose_help(&mut self, level: LevelId) {
        let row = self.front.height.saturating_sub(1);
        let mut help = String::from(" ↑↓ choose  ENTER confirm  1-9 pick  ESC back  R restart");
        if !level.is_final() {
            help.push_str("  F fax");
        }
        self.front.put_str(0, row, &help, DIM, BASE_BG);
    }

    fn compose_feedback(&mut self, fb: &Feedback) {
        let color = if fb.success { GREEN } else { RED };
        self.compose_box(&fb.title, &fb.text, color, "ENTER: continue");
    }

    /// Centered modal box with a title, a wrapped text and a footer line.
    fn compose_box(&mut self, title: &str, text: &str, color: Color, footer: &str) {
        let box_w = 60_usize.min(self.front.width.saturating_sub(4)).max(20);
        let lines = wrap(text, box_w - 4);
        let box_h = lines.len() + 6;
        let x = self.front.width.saturating_sub(box_w) / 2;
        let y = self.front.height.saturating_sub(box_h) / 2;

        self.front.fill_rect(x, y, box_w, box_h, PANEL_BG);
        self.front.put_str(x + 2, y + 1, title, color, PANEL_BG);
        for (i, line) in lines.iter().enumerate() {
            self.front.put_str(x + 2, y + 3 + i, line, Color::White, PANEL_BG);
        }
        self.front.put_str(x + 2, y + box_h - 2, footer, DIM, PANEL_BG);
    }

    fn compose_banner(&mut self, level: LevelId, anim_tick: u32) {
        let text = if level.is_final() {
            "★ The CDO is convinced! ★".to_string()
        } else {
            format!("★ Level {} complete! ★", level.number())
        };
        let w = text.chars().count() + 8;
        let x = self.front.width.saturating_sub(w) / 2;
        let y = (self.front.height / 2).max(1);
        let fg = if (anim_tick / 4) % 2 == 0 { GOLD } else { Color::White };
        self.front.fill_rect(x, y - 1, w, 3, PANEL_BG);
        self.front.put_str(x + 4, y, &text, fg, PANEL_BG);
    }
}
