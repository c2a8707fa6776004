//! Rendering: drawing the editor UI to the terminal.
//!
//! Full-redraw strategy, line by line: simple and reliable. Every cell is
//! painted with the active palette's colors; syntax spans pick the
//! foreground, the selection inverts it.

use super::Editor;
use crate::highlight::StyledSpan;
use crate::theme::Palette;
use crate::types::{Pos, PromptKind};
use crate::utils::digits;
use anyhow::Result;
use crossterm::{
    cursor,
    style::{self, Color},
    terminal::{self, ClearType},
    QueueableCommand,
};
use std::cmp::{max, min};
use std::io::{Stdout, Write};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Terminal size with a sane fallback for headless environments.
pub(crate) fn term_size() -> (usize, usize) {
    terminal::size().map_or((80, 24), |(w, h)| (w as usize, h as usize))
}

/// Split a line into `(start char index, char count)` display segments no
/// wider than `avail` columns. Always returns at least one segment, so an
/// empty line still occupies a screen row.
pub(crate) fn wrap_segments(line: &str, avail: usize) -> Vec<(usize, usize)> {
    let avail = avail.max(1);
    let mut segs = Vec::new();
    let mut start = 0;
    let mut count = 0;
    let mut col = 0;
    for (i, ch) in line.chars().enumerate() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(1);
        if col + w > avail && count > 0 {
            segs.push((start, count));
            start = i;
            count = 0;
            col = 0;
        }
        count += 1;
        col += w;
    }
    segs.push((start, count));
    segs
}

fn width_of(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

/// Is `p` inside the half-open selection range `a..b`?
fn in_selection(p: Pos, sel: Option<(Pos, Pos)>) -> bool {
    sel.is_some_and(|(a, b)| p >= a && p < b)
}

/// Foreground color at char `i` given the line's spans.
fn span_color(spans: &[StyledSpan], i: usize, pal: &Palette) -> Color {
    spans
        .iter()
        .find(|s| i >= s.start && i < s.start + s.len)
        .map_or(pal.foreground, |s| pal.color_for(s.kind))
}

/// Paint the line-number gutter cell for one screen row.
fn draw_gutter(stdout: &mut Stdout, number: Option<usize>, lnw: usize, pal: &Palette) -> Result<()> {
    stdout.queue(style::SetBackgroundColor(pal.background))?;
    stdout.queue(style::SetForegroundColor(pal.comment))?;
    match number {
        Some(n) => stdout.queue(style::Print(format!("{n:>lnw$}")))?,
        None => stdout.queue(style::Print(" ".repeat(lnw)))?,
    };
    stdout.queue(style::Print("│ "))?;
    Ok(())
}

/// Paint a window of one buffer line: chars `start..start+limit`, clipped
/// to `avail` display columns. Batches runs of identically-styled chars.
#[allow(clippy::too_many_arguments)]
fn draw_line_window(
    stdout: &mut Stdout,
    line: &str,
    spans: &[StyledSpan],
    y: usize,
    start: usize,
    limit: usize,
    avail: usize,
    sel: Option<(Pos, Pos)>,
    pal: &Palette,
) -> Result<()> {
    let mut run = String::new();
    let mut run_style: Option<(Color, bool)> = None;
    let mut col = 0;

    let flush = |stdout: &mut Stdout, run: &mut String, style_key: Option<(Color, bool)>| -> Result<()> {
        if run.is_empty() {
            return Ok(());
        }
        let (fg, selected) = style_key.unwrap_or((pal.foreground, false));
        if selected {
            stdout.queue(style::SetForegroundColor(pal.background))?;
            stdout.queue(style::SetBackgroundColor(pal.comment))?;
        } else {
            stdout.queue(style::SetForegroundColor(fg))?;
            stdout.queue(style::SetBackgroundColor(pal.background))?;
        }
        stdout.queue(style::Print(run.as_str()))?;
        run.clear();
        Ok(())
    };

    for (i, ch) in line.chars().enumerate().skip(start).take(limit) {
        let w = width_of(ch);
        if col + w > avail {
            break;
        }
        let key = (
            span_color(spans, i, pal),
            in_selection(Pos { y, x: i }, sel),
        );
        if run_style != Some(key) {
            flush(stdout, &mut run, run_style)?;
            run_style = Some(key);
        }
        run.push(ch);
        col += w;
    }
    flush(stdout, &mut run, run_style)?;
    Ok(())
}

impl Editor {
    /// Render the entire UI. Skips the work when nothing changed.
    pub fn render(&mut self, stdout: &mut Stdout) -> Result<()> {
        if !self.needs_redraw {
            return Ok(());
        }
        self.needs_redraw = false;

        let (width, height) = term_size();
        let pal = self.settings.theme.palette();
        let lnw = max(2, digits(self.buf.line_count()));
        let gutter = lnw + 2;
        let has_prompt = self.prompt.is_some();
        let editor_h = height.saturating_sub(1 + usize::from(has_prompt));
        let status_y = height.saturating_sub(1);

        stdout.queue(cursor::Hide)?;

        if self.word_wrap {
            self.render_wrapped(stdout, width, editor_h, lnw, pal)?;
        } else {
            self.render_normal(stdout, width, editor_h, lnw, pal)?;
        }

        self.render_calltip(stdout, width, editor_h, gutter, pal)?;
        let prompt_cursor = if has_prompt {
            Some(self.render_prompt(stdout, editor_h, width, pal)?)
        } else {
            None
        };
        self.render_status(stdout, status_y, width, pal)?;

        if let Some(px) = prompt_cursor {
            stdout.queue(cursor::MoveTo(min(px, width.saturating_sub(1)) as u16, editor_h as u16))?;
            stdout.queue(cursor::Show)?;
        } else if let Some((cx, cy)) = self.screen_pos_of(self.cursor, width, editor_h, gutter) {
            stdout.queue(cursor::MoveTo(cx as u16, cy as u16))?;
            stdout.queue(cursor::Show)?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn render_normal(
        &mut self,
        stdout: &mut Stdout,
        width: usize,
        editor_h: usize,
        lnw: usize,
        pal: &Palette,
    ) -> Result<()> {
        let gutter = lnw + 2;
        let avail = width.saturating_sub(gutter).max(1);
        let sel = self.selection_range();

        for row in 0..editor_h {
            let y = self.scroll_y + row;
            stdout.queue(cursor::MoveTo(0, row as u16))?;
            stdout.queue(style::SetBackgroundColor(pal.background))?;
            stdout.queue(terminal::Clear(ClearType::CurrentLine))?;

            if y >= self.buf.line_count() {
                stdout.queue(style::SetForegroundColor(pal.comment))?;
                stdout.queue(style::Print("~"))?;
                continue;
            }

            draw_gutter(stdout, Some(y + 1), lnw, pal)?;
            let line = self.buf.line(y).to_string();
            let spans = self.highlighter.spans_for_line(y, &line);
            let len = line.chars().count();
            draw_line_window(stdout, &line, &spans, y, self.scroll_x, len, avail, sel, pal)?;
        }
        Ok(())
    }

    fn render_wrapped(
        &mut self,
        stdout: &mut Stdout,
        width: usize,
        editor_h: usize,
        lnw: usize,
        pal: &Palette,
    ) -> Result<()> {
        let gutter = lnw + 2;
        let avail = width.saturating_sub(gutter).max(1);
        let sel = self.selection_range();

        let mut screen_row = 0;
        let mut rendered = 0;
        'outer: for y in 0..self.buf.line_count() {
            let line = self.buf.line(y).to_string();
            let spans = self.highlighter.spans_for_line(y, &line);
            for (seg_idx, &(start, count)) in wrap_segments(&line, avail).iter().enumerate() {
                if screen_row >= self.scroll_y {
                    if rendered >= editor_h {
                        break 'outer;
                    }
                    stdout.queue(cursor::MoveTo(0, rendered as u16))?;
                    stdout.queue(style::SetBackgroundColor(pal.background))?;
                    stdout.queue(terminal::Clear(ClearType::CurrentLine))?;
                    draw_gutter(stdout, (seg_idx == 0).then_some(y + 1), lnw, pal)?;
                    draw_line_window(stdout, &line, &spans, y, start, count, avail, sel, pal)?;
                    rendered += 1;
                }
                screen_row += 1;
            }
        }

        for row in rendered..editor_h {
            stdout.queue(cursor::MoveTo(0, row as u16))?;
            stdout.queue(style::SetBackgroundColor(pal.background))?;
            stdout.queue(terminal::Clear(ClearType::CurrentLine))?;
            stdout.queue(style::SetForegroundColor(pal.comment))?;
            stdout.queue(style::Print("~"))?;
        }
        Ok(())
    }

    /// Screen cell of a buffer position, `None` when scrolled out of view.
    fn screen_pos_of(
        &self,
        p: Pos,
        width: usize,
        editor_h: usize,
        gutter: usize,
    ) -> Option<(usize, usize)> {
        let avail = width.saturating_sub(gutter).max(1);
        let line = self.buf.line(p.y);

        let (row, col) = if self.word_wrap {
            let mut row = 0;
            for y in 0..p.y {
                row += wrap_segments(self.buf.line(y), avail).len();
            }
            let segs = wrap_segments(line, avail);
            let idx = segs.iter().rposition(|&(s, _)| p.x >= s).unwrap_or(0);
            let (seg_start, _) = segs[idx];
            let col: usize = line
                .chars()
                .skip(seg_start)
                .take(p.x - seg_start)
                .map(width_of)
                .sum();
            (row + idx, col)
        } else {
            let col: usize = line
                .chars()
                .skip(self.scroll_x)
                .take(p.x.checked_sub(self.scroll_x)?)
                .map(width_of)
                .sum();
            (p.y, col)
        };

        let r = row.checked_sub(self.scroll_y)?;
        if r >= editor_h {
            return None;
        }
        Some((min(gutter + col, width.saturating_sub(1)), r))
    }

    /// Draw the calltip popup above (or, at the top edge, below) its anchor.
    fn render_calltip(
        &self,
        stdout: &mut Stdout,
        width: usize,
        editor_h: usize,
        gutter: usize,
        pal: &Palette,
    ) -> Result<()> {
        let Some(ct) = &self.calltip else { return Ok(()) };
        let Some((ax, ay)) = self.screen_pos_of(ct.anchor, width, editor_h, gutter) else {
            return Ok(());
        };

        let lines: Vec<&str> = ct.text.lines().collect();
        let box_w = lines.iter().map(|l| UnicodeWidthStr::width(*l) + 2).max().unwrap_or(2);
        let box_w = min(box_w, width);
        let x = min(ax, width.saturating_sub(box_w));
        let first_row = if ay >= lines.len() {
            ay - lines.len()
        } else {
            min(ay + 1, editor_h.saturating_sub(1))
        };

        stdout.queue(style::SetBackgroundColor(pal.comment))?;
        stdout.queue(style::SetForegroundColor(pal.background))?;
        for (i, text) in lines.iter().enumerate() {
            let row = first_row + i;
            if row >= editor_h {
                break;
            }
            stdout.queue(cursor::MoveTo(x as u16, row as u16))?;
            let mut cell = format!(" {text}");
            while UnicodeWidthStr::width(cell.as_str()) < box_w {
                cell.push(' ');
            }
            // clip to the box width (popup text is plain ASCII signatures)
            let clipped: String = cell.chars().take(box_w).collect();
            stdout.queue(style::Print(clipped))?;
        }
        Ok(())
    }

    /// Draw the bottom prompt line; returns the cursor's screen column.
    fn render_prompt(
        &self,
        stdout: &mut Stdout,
        y: usize,
        width: usize,
        pal: &Palette,
    ) -> Result<usize> {
        let Some(p) = &self.prompt else { return Ok(0) };

        stdout.queue(cursor::MoveTo(0, y as u16))?;
        stdout.queue(style::SetBackgroundColor(pal.background))?;
        stdout.queue(terminal::Clear(ClearType::CurrentLine))?;

        let label = self.prompt_label(p.kind);
        stdout.queue(style::SetForegroundColor(pal.keyword))?;
        stdout.queue(style::Print(&label))?;
        stdout.queue(style::SetForegroundColor(pal.foreground))?;
        let shown: String = p.input.chars().take(width.saturating_sub(label.len() + 1)).collect();
        stdout.queue(style::Print(shown))?;

        let input_w: usize = p.input.chars().take(p.cursor).map(width_of).sum();
        Ok(UnicodeWidthStr::width(label.as_str()) + input_w)
    }

    fn prompt_label(&self, kind: PromptKind) -> String {
        let flags = match (self.find.opts.case_sensitive, self.find.opts.whole_word) {
            (false, false) => "",
            (true, false) => " [case]",
            (false, true) => " [word]",
            (true, true) => " [case,word]",
        };
        match kind {
            PromptKind::Open => "Open: ".to_string(),
            PromptKind::SaveAs => "Save as: ".to_string(),
            PromptKind::GotoLine => "Goto line: ".to_string(),
            PromptKind::Find => format!("Find{flags}: "),
            PromptKind::ReplaceQuery => format!("Replace{flags}: "),
            PromptKind::ReplaceWith => "With: ".to_string(),
        }
    }

    /// Draw the inverted status bar: file + modified marker (or transient
    /// message) on the left, cursor position on the right.
    fn render_status(&self, stdout: &mut Stdout, y: usize, width: usize, pal: &Palette) -> Result<()> {
        let left = if let Some(n) = self.find.session {
            format!("Replace: Enter/y=replace  n=skip  a=all  q=done ({n} replaced)")
        } else if let Some(st) = &self.status {
            st.text.clone()
        } else {
            let path = self
                .file_path
                .as_ref()
                .map_or_else(|| "Untitled".to_string(), |p| p.display().to_string());
            let marker = if self.buf.modified { " •" } else { "" };
            format!("{path}{marker}")
        };
        let right = format!("Ln {}, Col {}", self.cursor.y + 1, self.cursor.x + 1);

        stdout.queue(cursor::MoveTo(0, y as u16))?;
        stdout.queue(style::SetBackgroundColor(pal.foreground))?;
        stdout.queue(style::SetForegroundColor(pal.background))?;

        let left_w = UnicodeWidthStr::width(left.as_str());
        let right_w = UnicodeWidthStr::width(right.as_str());
        let mut bar = String::new();
        if left_w + right_w + 2 <= width {
            bar.push_str(&left);
            bar.push_str(&" ".repeat(width - left_w - right_w));
            bar.push_str(&right);
        } else {
            bar = left.chars().take(width).collect();
            let used = UnicodeWidthStr::width(bar.as_str());
            bar.push_str(&" ".repeat(width.saturating_sub(used)));
        }
        stdout.queue(style::Print(bar))?;
        stdout.queue(style::ResetColor)?;
        Ok(())
    }
}
