use clogc_model::{Glyph, LayoutToken};
use crossterm::queue;
use crossterm::style::{style, Color, PrintStyledContent, Stylize};
use std::io::{self, Write};

/// Writes layout tokens to a terminal, flushing after every glyph.
pub struct TerminalSink<W: Write> {
    out: W,
    plain: bool,
    at_line_start: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, plain: bool) -> Self {
        Self {
            out,
            plain,
            at_line_start: true,
        }
    }

    pub fn write_token(&mut self, token: &LayoutToken) -> io::Result<()> {
        match token {
            LayoutToken::Label(text) => write!(self.out, "{text}")?,
            LayoutToken::Gap(width) => write!(self.out, "{:width$}", "", width = *width)?,
            LayoutToken::LineBreak => writeln!(self.out)?,
            LayoutToken::Separator(glyph) => self.write_glyph(glyph)?,
            LayoutToken::Glyph(glyph) => {
                self.write_glyph(glyph)?;
                self.out.flush()?;
            }
        }
        self.at_line_start = matches!(token, LayoutToken::LineBreak);
        Ok(())
    }

    /// Terminate the current row so the shell prompt starts on a fresh line.
    pub fn finish(&mut self) -> io::Result<()> {
        if !self.at_line_start {
            writeln!(self.out)?;
            self.at_line_start = true;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_glyph(&mut self, glyph: &Glyph) -> io::Result<()> {
        if self.plain || glyph.paint.is_plain() {
            return write!(self.out, "{}", glyph.symbol);
        }
        let mut styled = style(glyph.symbol);
        if let Some(fg) = glyph.paint.fg {
            styled = styled.with(Color::AnsiValue(fg));
        }
        if let Some(bg) = glyph.paint.bg {
            styled = styled.on(Color::AnsiValue(bg));
        }
        queue!(self.out, PrintStyledContent(styled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clogc_model::Paint;

    fn render(tokens: &[LayoutToken], plain: bool) -> String {
        let mut sink = TerminalSink::new(Vec::new(), plain);
        for token in tokens {
            sink.write_token(token).unwrap();
        }
        sink.finish().unwrap();
        String::from_utf8(sink.into_inner()).unwrap()
    }

    fn row() -> Vec<LayoutToken> {
        vec![
            LayoutToken::Label("09:41".to_string()),
            LayoutToken::Gap(2),
            LayoutToken::Gap(3),
            LayoutToken::Glyph(Glyph::new('●', Paint::fg(231))),
            LayoutToken::Separator(Glyph::plain('—')),
            LayoutToken::Glyph(Glyph::new('·', Paint::bg(202))),
        ]
    }

    #[test]
    fn plain_mode_has_no_ansi() {
        assert_eq!(render(&row(), true), "09:41     ●—·\n");
    }

    #[test]
    fn colored_glyphs_use_xterm_palette() {
        let output = render(&row(), false);
        assert!(output.starts_with("09:41     "));
        assert!(output.contains("\x1b[38;5;231m"));
        assert!(output.contains("\x1b[48;5;202m"));
        assert!(output.contains('—'));
    }

    #[test]
    fn finish_does_not_double_a_trailing_break() {
        let tokens = vec![
            LayoutToken::Label("09:00".to_string()),
            LayoutToken::Gap(2),
            LayoutToken::LineBreak,
        ];
        assert_eq!(render(&tokens, true), "09:00  \n");
    }
}
