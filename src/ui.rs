use crate::color::Rgb;
use crate::field::{ColorSink, ParticleField};
use crate::quiz::session::{CompletionReason, Phase, Session, Summary};
use crate::render::Canvas;

const PANEL_BG: Rgb = Rgb::new(0.06, 0.08, 0.12);
const TITLE: Rgb = Rgb::new(0.29, 0.56, 0.89);
const TEXT: Rgb = Rgb::new(0.86, 0.88, 0.92);
const DIM: Rgb = Rgb::new(0.58, 0.62, 0.68);
const GOOD: Rgb = Rgb::new(0.29, 0.87, 0.5);
const BAD: Rgb = Rgb::new(0.94, 0.27, 0.27);
const GOLD: Rgb = Rgb::new(0.92, 0.7, 0.03);

const MAX_PANEL_WIDTH: u16 = 76;

/// One line of panel text
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub color: Rgb,
}

impl Line {
    fn new(text: impl Into<String>, color: Rgb) -> Self {
        Line {
            text: text.into(),
            color,
        }
    }

    fn blank() -> Self {
        Line::new("", TEXT)
    }
}

/// Greedy word wrap to at most `width` characters per line
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let line_len = line.chars().count();
            let word_len = word.chars().count();
            if line_len > 0 && line_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

fn wrapped(text: &str, width: usize, color: Rgb, indent: &str) -> Vec<Line> {
    let width = width.saturating_sub(indent.chars().count());
    wrap(text, width)
        .into_iter()
        .map(|l| Line::new(format!("{}{}", indent, l), color))
        .collect()
}

/// Width available for text inside a panel on this canvas
pub fn text_width(canvas: &Canvas) -> usize {
    panel_width(canvas).saturating_sub(4) as usize
}

fn panel_width(canvas: &Canvas) -> u16 {
    canvas.cols().saturating_sub(4).min(MAX_PANEL_WIDTH)
}

/// Draws `lines` in a centered panel
pub fn draw_panel(canvas: &mut Canvas, lines: &[Line]) {
    let width = panel_width(canvas);
    let height = (lines.len() as u16 + 2).min(canvas.rows());
    let col = (canvas.cols() - width) / 2;
    let row = (canvas.rows() - height) / 2;
    canvas.fill(col, row, width, height, PANEL_BG);
    let inner = width.saturating_sub(4) as usize;
    for (i, line) in lines.iter().take(height.saturating_sub(2) as usize).enumerate() {
        let text: String = line.text.chars().take(inner).collect();
        canvas.text(col + 2, row + 1 + i as u16, &text, line.color, Some(PANEL_BG));
    }
}

/// Landing text; `last` is the result of the most recent completed quiz
pub fn welcome_lines(last: Option<&Summary>) -> Vec<Line> {
    let features = [
        ("Interactive Learning", "Engage with dynamic questions and real-time feedback"),
        ("Track Progress", "Monitor your performance as you go"),
        ("Earn Rewards", "Collect points and badges as you progress"),
        ("Challenge Yourself", "Push your limits with timed questions"),
    ];
    let mut lines = vec![
        Line::new("TestLine Quiz Challenge", TITLE),
        Line::new("Demonstrate Your Knowledge", DIM),
        Line::blank(),
    ];
    for (title, description) in features {
        lines.push(Line::new(format!("• {}", title), TITLE));
        lines.push(Line::new(format!("  {}", description), TEXT));
    }
    if let Some(summary) = last {
        lines.push(Line::blank());
        lines.push(Line::new(
            format!(
                "Last attempt: {} points ({}%)",
                summary.score, summary.percentage
            ),
            DIM,
        ));
    }
    lines.push(Line::blank());
    lines.push(Line::new("[Enter] Start Your Journey    [Q] Quit", GOLD));
    lines
}

pub fn guidelines_lines() -> Vec<Line> {
    let sections: [(&str, [&str; 3]); 4] = [
        (
            "Time Management",
            [
                "The countdown starts as soon as the quiz loads",
                "The quiz ends automatically when time runs out",
                "Results are shown immediately after each answer",
            ],
        ),
        (
            "Scoring System",
            [
                "Correct answers earn the points shown in the header",
                "Wrong answers cost the penalty shown in the header",
                "Final score is displayed at the end",
            ],
        ),
        (
            "Lives System",
            [
                "Every wrong answer costs one life",
                "The quiz ends if all lives are lost",
                "Lives cannot be recovered",
            ],
        ),
        (
            "Important Rules",
            [
                "Read each question carefully",
                "Each question can be answered only once",
                "You can't return to previous questions",
            ],
        ),
    ];
    let mut lines = vec![
        Line::new("Quiz Guidelines", TITLE),
        Line::new("Please review these guidelines before starting", DIM),
        Line::blank(),
    ];
    for (title, details) in sections {
        lines.push(Line::new(title, TITLE));
        for detail in details {
            lines.push(Line::new(format!("  - {}", detail), TEXT));
        }
    }
    lines.push(Line::blank());
    lines.push(Line::new(
        "Answer with the number keys 1-9; only the first nine options can be chosen",
        DIM,
    ));
    lines.push(Line::new("[Esc] <- Back    [Enter] Start Quiz", GOLD));
    lines
}

/// `m:ss`
pub fn clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub fn quiz_lines<S: ColorSink>(session: &Session<S>, width: usize) -> Vec<Line> {
    match session.phase() {
        Phase::Loading => vec![Line::new("Loading quiz...", TITLE)],
        Phase::Error(message) => vec![
            Line::new(message.clone(), BAD),
            Line::blank(),
            Line::new("[Esc] Back", GOLD),
        ],
        Phase::Completed(summary) => summary_lines(summary),
        Phase::InProgress => progress_lines(session, width),
    }
}

fn summary_lines(summary: &Summary) -> Vec<Line> {
    let mut lines = vec![
        Line::new("Quiz Completed!", TITLE),
        Line::blank(),
        Line::new(format!("{} points", summary.score), TITLE),
        Line::new(format!("You scored {}%", summary.percentage), TEXT),
        Line::new(format!("Lives remaining: {}", summary.lives_left), TEXT),
    ];
    match summary.reason {
        CompletionReason::OutOfTime => lines.push(Line::new("Time is up", DIM)),
        CompletionReason::OutOfLives => lines.push(Line::new("No lives left", DIM)),
        CompletionReason::Finished => {}
    }
    if summary.top_tier {
        lines.push(Line::new("★ Perfect Score! Master Badge Earned!", GOLD));
    }
    lines.push(Line::blank());
    lines.push(Line::new("[H] Back to Home", GOLD));
    lines
}

fn progress_lines<S: ColorSink>(session: &Session<S>, width: usize) -> Vec<Line> {
    let (Some(quiz), Some(question)) = (session.quiz(), session.current_question()) else {
        return Vec::new();
    };
    let mut lines = vec![Line::new(quiz.title.clone(), TITLE)];
    if !quiz.topic.is_empty() {
        lines.push(Line::new(quiz.topic.clone(), DIM));
    }
    lines.push(Line::new(
        format!(
            "⏱ {}   +{} correct   -{} incorrect   ♥ {} lives left",
            clock(session.time_left()),
            quiz.correct_answer_marks,
            quiz.negative_marks,
            session.lives()
        ),
        TEXT,
    ));
    lines.push(Line::blank());

    let mut status = format!(
        "Question {}/{}   {} pts",
        session.index() + 1,
        session.questions().len(),
        session.score()
    );
    if session.streak() > 2 {
        status.push_str(&format!("   {}x streak!", session.streak()));
    }
    lines.push(Line::new(status, DIM));
    lines.push(Line::blank());
    lines.extend(wrapped(&question.description, width, TEXT, ""));
    lines.push(Line::blank());

    let selection = session.selection();
    for (i, option) in question.options.iter().enumerate() {
        let (marker, color) = match selection {
            Some(s) if s.correct == Some(i) => ("✔", GOOD),
            Some(s) if s.chosen == i => ("✘", BAD),
            _ => (" ", TEXT),
        };
        let text = format!("{} {}. {}", marker, i + 1, option.description);
        lines.extend(wrapped(&text, width, color, ""));
    }

    if let Some(selection) = selection {
        lines.push(Line::blank());
        if selection.is_correct() {
            lines.push(Line::new("Correct!", GOOD));
        } else {
            lines.push(Line::new("Incorrect", BAD));
        }
    }

    if session.solution_visible() {
        if let Some(solution) = &question.detailed_solution {
            lines.push(Line::blank());
            lines.push(Line::new("Solution", TITLE));
            lines.extend(wrapped(solution, width, DIM, "  "));
        }
    }

    lines.push(Line::blank());
    if session.can_advance() {
        lines.push(Line::new("[N] Next Question    [Esc] Leave", GOLD));
    } else {
        lines.push(Line::new("[1-9] Answer    [Esc] Leave", GOLD));
    }
    lines
}

/// Program name, rotation, counts and FPS in the top-left corner
pub fn draw_debug(canvas: &mut Canvas, field: &ParticleField, fps: f64) {
    let [angle_x, angle_y] = field.angle();
    let colors = field.colors();
    let info = [
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        format!("Angle: ({:.2}, {:.2})", angle_x, angle_y),
        format!(
            "Particles: {}  Edges: {}",
            field.particles().len(),
            field.edge_count()
        ),
        format!(
            "Colors: {} / {}{}",
            colors.particle,
            colors.edge,
            if field.is_fading() { " (fading)" } else { "" }
        ),
        format!("FPS: {:.2}", fps),
    ];
    for (row, text) in info.iter().enumerate() {
        canvas.text(1, row as u16, text, Rgb::WHITE, None);
    }
}

/// Centered "Paused" marker on the bottom row
pub fn draw_paused(canvas: &mut Canvas) {
    let text = "Paused";
    let col = canvas.cols().saturating_sub(text.len() as u16) / 2;
    let row = canvas.rows().saturating_sub(1);
    canvas.text(col, row, text, Rgb::WHITE, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Palette;
    use crate::quiz::fixtures;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    struct Silent;

    impl ColorSink for Silent {
        fn change_color(&self, _: Rgb, _: Option<Rgb>, _: Duration) {}
    }

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    fn running(questions: usize, lives: u32) -> Session<Silent> {
        let mut session = Session::new(Silent, Palette::default(), |_| {});
        session
            .load(
                Ok(fixtures::quiz(questions, 4, 1, lives, 15)),
                &mut StdRng::seed_from_u64(0),
            )
            .unwrap();
        session
    }

    #[test]
    fn wrap_respects_width_and_paragraphs() {
        assert_eq!(wrap("the quick brown fox", 9), vec!["the quick", "brown fox"]);
        assert_eq!(wrap("a\nb", 10), vec!["a", "b"]);
        assert_eq!(wrap("supercalifragilistic", 5), vec!["supercalifragilistic"]);
    }

    #[test]
    fn clock_pads_seconds() {
        assert_eq!(clock(900), "15:00");
        assert_eq!(clock(65), "1:05");
        assert_eq!(clock(0), "0:00");
    }

    #[test]
    fn quiz_header_shows_timer_marks_and_lives() {
        let session = running(10, 9);
        let lines = quiz_lines(&session, 60);
        let all = texts(&lines);
        assert!(all.contains(&"⏱ 15:00   +4 correct   -1 incorrect   ♥ 9 lives left"));
        assert!(all.contains(&"Question 1/10   0 pts"));
        assert!(all.contains(&"[1-9] Answer    [Esc] Leave"));
        assert!(!all.iter().any(|l| l.starts_with("Solution")));
    }

    #[test]
    fn wrong_answer_marks_both_options_and_shows_solution() {
        let mut session = running(10, 9);
        session.answer(2).unwrap();
        let lines = quiz_lines(&session, 60);
        let correct = lines.iter().find(|l| l.text.starts_with("✔")).unwrap();
        let chosen = lines.iter().find(|l| l.text.starts_with("✘")).unwrap();
        assert_eq!(correct.text, "✔ 2. Option 1");
        assert_eq!(correct.color, GOOD);
        assert_eq!(chosen.text, "✘ 3. Option 2");
        assert!(texts(&lines).contains(&"  Solution 0"));
        assert!(texts(&lines).contains(&"[N] Next Question    [Esc] Leave"));
        assert!(texts(&lines).contains(&"Incorrect"));
        assert!(!texts(&lines).contains(&"Correct!"));
    }

    #[test]
    fn right_answer_shows_verdict() {
        let mut session = running(10, 9);
        assert!(!texts(&quiz_lines(&session, 60)).contains(&"Correct!"));
        session.answer(1).unwrap();
        assert!(texts(&quiz_lines(&session, 60)).contains(&"Correct!"));
    }

    #[test]
    fn debug_overlay_marks_a_running_fade() {
        use crate::config::FieldConfig;
        use crate::field::ParticleField;
        use std::time::Instant;

        let config = FieldConfig {
            particle_count: 5,
            ..FieldConfig::default()
        };
        let (mut field, handle) =
            ParticleField::new(config, (80, 24), &mut StdRng::seed_from_u64(3));
        let row = |canvas: &Canvas| -> String {
            (0..canvas.cols())
                .map(|col| canvas.cell(col, 3).unwrap().glyph)
                .collect()
        };

        let mut canvas = Canvas::new(80, 24, Rgb::BLACK);
        draw_debug(&mut canvas, &field, 60.0);
        assert!(!row(&canvas).contains("(fading)"));

        handle.change_color(Rgb::WHITE, None, Duration::from_secs(10));
        field.step(Instant::now());
        let mut canvas = Canvas::new(80, 24, Rgb::BLACK);
        draw_debug(&mut canvas, &field, 60.0);
        assert!(row(&canvas).contains("(fading)"));
    }

    #[test]
    fn streak_badge_appears_after_three_in_a_row() {
        let mut session = running(10, 9);
        for _ in 0..3 {
            session.answer(1).unwrap();
            session.next().unwrap();
        }
        let lines = quiz_lines(&session, 60);
        assert!(texts(&lines).contains(&"Question 4/10   12 pts   3x streak!"));
    }

    #[test]
    fn summary_shows_badge_only_for_top_tier() {
        let mut session = running(1, 9);
        session.answer(1).unwrap();
        session.next().unwrap();
        let lines = quiz_lines(&session, 60);
        assert!(texts(&lines).contains(&"You scored 100%"));
        assert!(texts(&lines).contains(&"★ Perfect Score! Master Badge Earned!"));

        let mut session = running(3, 1);
        session.answer(0).unwrap();
        let lines = quiz_lines(&session, 60);
        assert!(texts(&lines).contains(&"No lives left"));
        assert!(!texts(&lines).iter().any(|l| l.contains("Badge")));
    }

    #[test]
    fn guidelines_state_the_answer_keys() {
        assert!(texts(&guidelines_lines())
            .iter()
            .any(|l| l.starts_with("Answer with the number keys 1-9")));
    }

    #[test]
    fn welcome_mentions_last_attempt() {
        assert!(!texts(&welcome_lines(None))
            .iter()
            .any(|l| l.starts_with("Last attempt")));
        let summary = Summary {
            score: 12,
            percentage: 30,
            lives_left: 2,
            top_tier: false,
            reason: CompletionReason::OutOfTime,
        };
        assert!(texts(&welcome_lines(Some(&summary))).contains(&"Last attempt: 12 points (30%)"));
    }

    #[test]
    fn panel_is_centered_and_clipped() {
        let mut canvas = Canvas::new(40, 6, Rgb::BLACK);
        draw_panel(&mut canvas, &guidelines_lines());
        assert_eq!(canvas.cell(2, 0).unwrap().bg, Some(PANEL_BG));
        assert_eq!(canvas.cell(4, 1).unwrap().glyph, 'Q');
        assert_eq!(canvas.cell(0, 0).unwrap().bg, None);
    }
}
