use crate::color::Rgb;
use crate::config::{Cli, FieldConfig, Palette};
use crate::error::AppError;
use crate::field::{ColorHandle, ColorSink, ParticleField};
use crate::quiz::session::{Session, Summary};
use crate::quiz::source::QuizSource;
use crate::render::Canvas;
use crate::state::{AppState, Screen};
use crate::terminal::Frontend;
use crate::ui;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

/// Frames-per-second estimate, refreshed once a second
struct FpsCounter {
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl FpsCounter {
    fn new() -> Self {
        FpsCounter {
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
        }
    }

    fn frame(&mut self, now: Instant) {
        self.frames_since_last_update += 1;
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }
    }
}

/// A quiz session together with its one-second countdown
struct ActiveQuiz {
    session: Session<ColorHandle>,
    next_tick: Instant,
}

pub struct App {
    state: AppState,
    field: ParticleField,
    colors: ColorHandle,
    palette: Palette,
    source: Box<dyn QuizSource>,
    quiz_id: String,
    quiz: Option<ActiveQuiz>,
    last_result: Rc<Cell<Option<Summary>>>,
    canvas: Canvas,
    rng: StdRng,
    frame: Duration,
    fps: FpsCounter,
}

impl App {
    pub fn new(
        cli: &Cli,
        field_config: FieldConfig,
        source: Box<dyn QuizSource>,
        viewport: (u16, u16),
    ) -> Self {
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (field, colors) = ParticleField::new(field_config, viewport, &mut rng);
        let palette = Palette::default();
        let mut app = App {
            state: AppState::new(cli.debug),
            field,
            colors,
            palette,
            source,
            quiz_id: cli.quiz_id.clone(),
            quiz: None,
            last_result: Rc::new(Cell::new(None)),
            canvas: Canvas::new(viewport.0, viewport.1, Rgb::BLACK),
            rng,
            frame: cli.frame_duration(),
            fps: FpsCounter::new(),
        };
        app.navigate(Screen::Welcome);
        app
    }

    /// Runs frames and input until the user quits. A frame is rendered as
    /// soon as its deadline passes, even while input keeps arriving.
    pub fn run<F: Frontend>(&mut self, frontend: &mut F) -> Result<(), AppError> {
        let mut next_frame = Instant::now();
        while !self.state.quit {
            let now = Instant::now();
            if now >= next_frame {
                self.update(now);
                self.draw();
                frontend.present(&self.canvas)?;
                next_frame = now + self.frame;
                continue;
            }
            if frontend.poll(next_frame - now)? {
                let event = frontend.read()?;
                self.handle_event(event);
            }
        }
        Ok(())
    }

    /// Advances the countdown and the particle field to `now`
    pub fn update(&mut self, now: Instant) {
        if let Some(active) = &mut self.quiz {
            while active.session.is_running() && now >= active.next_tick {
                if let Ok(remaining) = active.session.tick() {
                    debug!("{}s left", remaining);
                }
                active.next_tick += COUNTDOWN_STEP;
            }
        }
        self.field.step(now);
        self.fps.frame(now);
    }

    pub fn draw(&mut self) {
        self.canvas.clear();
        self.field.render(&mut self.canvas);
        let width = ui::text_width(&self.canvas);
        let lines = match self.state.screen {
            Screen::Welcome => ui::welcome_lines(self.last_result.get().as_ref()),
            Screen::Guidelines => ui::guidelines_lines(),
            Screen::Quiz => match &self.quiz {
                Some(active) => ui::quiz_lines(&active.session, width),
                None => Vec::new(),
            },
        };
        ui::draw_panel(&mut self.canvas, &lines);
        if self.state.debug {
            ui::draw_debug(&mut self.canvas, &self.field, self.fps.fps);
        }
        if self.state.paused {
            ui::draw_paused(&mut self.canvas);
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Resize(cols, rows) => {
                self.field.resize(cols, rows);
                self.canvas.resize(cols, rows);
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.state.quit = true;
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.state.quit = true;
                return;
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.state.debug = !self.state.debug;
                return;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.state.paused = !self.state.paused;
                self.field.set_paused(self.state.paused);
                return;
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                let config = FieldConfig {
                    show_connections: !self.field.config().show_connections,
                    ..self.field.config().clone()
                };
                self.field.rebuild(config, &mut self.rng);
                return;
            }
            _ => {}
        }

        match self.state.screen {
            Screen::Welcome => {
                if key.code == KeyCode::Enter {
                    self.navigate(Screen::Guidelines);
                }
            }
            Screen::Guidelines => match key.code {
                KeyCode::Enter => self.navigate(Screen::Quiz),
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                    self.navigate(Screen::Welcome)
                }
                _ => {}
            },
            Screen::Quiz => self.handle_quiz_key(key.code),
        }
    }

    fn handle_quiz_key(&mut self, code: KeyCode) {
        let finished = self
            .quiz
            .as_ref()
            .is_some_and(|active| !active.session.is_running());
        match code {
            KeyCode::Esc => return self.navigate(Screen::Welcome),
            KeyCode::Char('h') | KeyCode::Char('H') if finished => {
                return self.navigate(Screen::Welcome)
            }
            _ => {}
        }

        let Some(active) = &mut self.quiz else {
            return;
        };
        let result = match code {
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                active
                    .session
                    .answer(index)
                    .map(|outcome| debug!("Answer {}: {:?}", index + 1, outcome))
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter => active
                .session
                .next()
                .map(|outcome| debug!("Next: {:?}", outcome)),
            _ => return,
        };
        if let Err(e) = result {
            debug!("Ignored key {:?}: {}", code, e);
        }
    }

    /// Switches screens. Leaving the quiz drops its session and countdown;
    /// entering it starts a fresh session.
    pub fn navigate(&mut self, screen: Screen) {
        info!("Navigating to {}", screen.path());
        self.state.screen = screen;
        self.quiz = None;
        match screen {
            Screen::Welcome | Screen::Guidelines => {
                self.colors
                    .change_color(self.palette.neutral, None, self.palette.duration);
            }
            Screen::Quiz => self.start_quiz(),
        }
    }

    fn start_quiz(&mut self) {
        let last_result = Rc::clone(&self.last_result);
        let mut session = Session::new(self.colors.clone(), self.palette, move |summary| {
            last_result.set(Some(*summary));
        });
        let fetched = self.source.fetch(&self.quiz_id);
        if let Err(e) = session.load(fetched, &mut self.rng) {
            debug!("Quiz load rejected: {}", e);
        }
        self.quiz = Some(ActiveQuiz {
            session,
            next_tick: Instant::now() + COUNTDOWN_STEP,
        });
    }

    /// Stops the quiz and releases the particle field
    pub fn shutdown(self) {
        drop(self.quiz);
        self.field.teardown();
    }
}

#[cfg(test)]
impl App {
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn session(&self) -> Option<&Session<ColorHandle>> {
        self.quiz.as_ref().map(|active| &active.session)
    }

    pub fn last_result(&self) -> Option<Summary> {
        self.last_result.get()
    }
}
