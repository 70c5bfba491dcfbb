use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::Stylize,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use simon_core::{
    Phase,
    segments::{self, Segment},
};

use crate::logger::LogRing;

const HELP: &str =
    "1-4/qwer press   ,/. octave   0/p reset   9/o + 8 hex digits seed   up/down knob   esc quit";

/// Everything drawn in one frame.
#[derive(Debug)]
pub struct View<'a> {
    pub digits: [u8; 2],
    pub tone: Option<u8>,
    pub frequency_hz: Option<u32>,
    pub octave: i8,
    pub phase: Phase,
    pub length: u16,
    pub rank: u16,
    pub knob: u8,
    pub playback_ms: u16,
    pub logs: &'a LogRing,
}

/// Three text rows drawing one seven segment digit.
fn digit_rows(pattern: u8) -> [String; 3] {
    let seg = |segment, c| {
        if segments::is_lit(pattern, segment) {
            c
        } else {
            ' '
        }
    };

    [
        format!(" {} ", seg(Segment::A, '_')),
        format!(
            "{}{}{}",
            seg(Segment::F, '|'),
            seg(Segment::G, '_'),
            seg(Segment::B, '|')
        ),
        format!(
            "{}{}{}",
            seg(Segment::E, '|'),
            seg(Segment::D, '_'),
            seg(Segment::C, '|')
        ),
    ]
}

pub fn draw(frame: &mut Frame, view: &View<'_>) {
    let [display_area, status_area, log_area, help_area] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [left, right] = view.digits.map(digit_rows);
    let display: Vec<Line> = left
        .iter()
        .zip(&right)
        .map(|(l, r)| Line::from(format!(" {l}  {r}")).red().bold())
        .collect();
    frame.render_widget(
        Paragraph::new(display).block(Block::bordered().title("Display")),
        display_area,
    );

    let tone = match (view.tone, view.frequency_hz) {
        (Some(digit), Some(hz)) => Span::from(format!("tone {digit} at {hz} Hz")).light_green(),
        _ => Span::from("silent"),
    };
    let status = vec![
        Line::from(vec![
            Span::from("Phase: "),
            format!("{:?}", view.phase).light_blue(),
        ]),
        Line::from(vec![
            Span::from("Length: "),
            view.length.to_string().light_blue(),
            Span::from("  Rank: "),
            view.rank.to_string().light_blue(),
        ]),
        Line::from(vec![
            Span::from("Buzzer: "),
            tone,
            Span::from(format!("  octave {:+}", view.octave)),
        ]),
        Line::from(format!(
            "Knob: {}  playback {} ms",
            view.knob, view.playback_ms
        )),
    ];
    frame.render_widget(
        Paragraph::new(status).block(Block::bordered().title("Game")),
        status_area,
    );

    let visible = usize::from(log_area.height.saturating_sub(2));
    let logs: Vec<Line> = view
        .logs
        .tail(visible)
        .into_iter()
        .map(Line::from)
        .collect();
    frame.render_widget(
        Paragraph::new(logs).block(Block::bordered().title("Log")),
        log_area,
    );

    frame.render_widget(Paragraph::new(HELP).dark_gray(), help_area);
}

#[cfg(test)]
mod tests {
    use simon_core::segments::{DEFEAT, NUMBERS, OFF};

    use super::*;

    #[test]
    fn digits_are_drawn_from_segments() {
        assert_eq!(digit_rows(NUMBERS[8]), [" _ ", "|_|", "|_|"]);
        assert_eq!(digit_rows(NUMBERS[1]), ["   ", "  |", "  |"]);
        assert_eq!(digit_rows(DEFEAT), ["   ", " _ ", "   "]);
        assert_eq!(digit_rows(OFF), ["   ", "   ", "   "]);
    }
}
