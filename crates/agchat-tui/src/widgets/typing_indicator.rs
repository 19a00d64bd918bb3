//! Three bouncing dots shown while the assistant is thinking

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::Widget,
};
use std::time::{Duration, Instant};

/// Length of one bounce
pub const CYCLE: Duration = Duration::from_millis(1200);

/// Start offset of each dot
pub const DOT_DELAYS: [Duration; 3] = [
    Duration::ZERO,
    Duration::from_millis(300),
    Duration::from_millis(600),
];

/// Fade-in after the indicator appears
const APPEAR: Duration = Duration::from_millis(300);

/// Dot glyphs from resting to fully raised
const HEIGHTS: [&str; 3] = ["⠄", "⠂", "⠁"];

/// Raise of one dot in `0.0..=1.0`: up over the first 40% of its cycle,
/// back down by 80%, resting for the rest and before its delay has passed.
pub fn lift(elapsed: Duration, delay: Duration) -> f32 {
    let Some(since) = elapsed.checked_sub(delay) else {
        return 0.0;
    };
    let phase = (since.as_millis() % CYCLE.as_millis()) as f32 / CYCLE.as_millis() as f32;
    if phase < 0.4 {
        phase / 0.4
    } else if phase < 0.8 {
        (0.8 - phase) / 0.4
    } else {
        0.0
    }
}

/// Glyph for each dot at a point of the animation
pub fn frame(elapsed: Duration) -> [&'static str; 3] {
    DOT_DELAYS.map(|delay| {
        let level = (lift(elapsed, delay) * HEIGHTS.len() as f32) as usize;
        HEIGHTS[level.min(HEIGHTS.len() - 1)]
    })
}

/// Animated typing indicator; the only input is the clock
pub struct TypingIndicator<'a> {
    theme: &'a Theme,
    start_time: Instant,
    now: Option<Instant>,
}

impl<'a> TypingIndicator<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            start_time: Instant::now(),
            now: None,
        }
    }

    /// Animate from a fixed start so redraws continue the same bounce
    pub fn with_start_time(mut self, start: Instant) -> Self {
        self.start_time = start;
        self
    }

    /// Render as of a given instant instead of the current time
    pub fn at(mut self, now: Instant) -> Self {
        self.now = Some(now);
        self
    }

    fn elapsed(&self) -> Duration {
        self.now
            .unwrap_or_else(Instant::now)
            .saturating_duration_since(self.start_time)
    }

    /// The dots as spans, for embedding in a longer line
    pub fn spans(&self) -> Vec<Span<'static>> {
        let elapsed = self.elapsed();
        let mut style = self.theme.indicator_style();
        if elapsed < APPEAR {
            style = style.add_modifier(Modifier::DIM);
        }
        let dots = frame(elapsed);
        let mut spans = Vec::with_capacity(5);
        for (i, dot) in dots.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(dot, style));
        }
        spans
    }
}

impl Widget for TypingIndicator<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 5 || area.height == 0 {
            return;
        }
        buf.set_line(area.x, area.y, &Line::from(self.spans()), area.width);
    }
}
