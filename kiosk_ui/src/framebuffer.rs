//! Character framebuffers.

use kiosk_traits::Display;

/// In-memory HD44780-style display: fixed grid, text clipped at the row end.
#[derive(Debug, Clone)]
pub struct CharDisplay {
    cols: usize,
    rows: Vec<Vec<char>>,
    col: usize,
    row: usize,
}

impl CharDisplay {
    pub fn new(cols: u8, rows: u8) -> Self {
        let cols = usize::from(cols.max(1));
        Self {
            cols,
            rows: vec![vec![' '; cols]; usize::from(rows.max(1))],
            col: 0,
            row: 0,
        }
    }

    /// Contents of `row` including trailing spaces; empty when out of range.
    pub fn line(&self, row: usize) -> String {
        self.rows
            .get(row)
            .map(|r| r.iter().collect())
            .unwrap_or_default()
    }

    pub fn lines(&self) -> Vec<String> {
        (0..self.rows.len()).map(|r| self.line(r)).collect()
    }

    /// All rows trimmed and joined with " | ", handy for assertions and logs.
    pub fn text(&self) -> String {
        self.lines()
            .iter()
            .map(|l| l.trim_end().to_string())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl Display for CharDisplay {
    fn clear(&mut self) {
        for r in &mut self.rows {
            r.fill(' ');
        }
        self.col = 0;
        self.row = 0;
    }

    fn set_cursor(&mut self, col: u8, row: u8) {
        self.col = usize::from(col);
        self.row = usize::from(row);
    }

    fn print(&mut self, text: &str) {
        let Some(line) = self.rows.get_mut(self.row) else {
            return;
        };
        for ch in text.chars() {
            if self.col >= self.cols {
                break;
            }
            line[self.col] = ch;
            self.col += 1;
        }
    }
}

/// Framebuffer that echoes each row to stdout when its content changes.
#[derive(Debug)]
pub struct ConsoleDisplay {
    inner: CharDisplay,
    shown: Vec<String>,
}

impl ConsoleDisplay {
    pub fn new(cols: u8, rows: u8) -> Self {
        let inner = CharDisplay::new(cols, rows);
        let shown = inner.lines();
        Self { inner, shown }
    }

    fn flush_row(&mut self) {
        let row = self.inner.row;
        let now = self.inner.line(row);
        if let Some(prev) = self.shown.get_mut(row) {
            if *prev != now {
                println!("LCD[{row}] {}", now.trim_end());
                *prev = now;
            }
        }
    }
}

impl Display for ConsoleDisplay {
    fn clear(&mut self) {
        self.inner.clear();
        for s in &mut self.shown {
            s.clear();
        }
    }

    fn set_cursor(&mut self, col: u8, row: u8) {
        self.inner.set_cursor(col, row);
    }

    fn print(&mut self, text: &str) {
        self.inner.print(text);
        self.flush_row();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_clips_at_row_end() {
        let mut d = CharDisplay::new(8, 2);
        d.set_cursor(5, 1);
        d.print("abcdef");
        assert_eq!(d.line(1), "     abc");
    }

    #[test]
    fn out_of_range_row_is_ignored() {
        let mut d = CharDisplay::new(8, 2);
        d.set_cursor(0, 3);
        d.print("x");
        assert_eq!(d.text(), " | ");
    }

    #[test]
    fn clear_resets_cursor() {
        let mut d = CharDisplay::new(8, 2);
        d.set_cursor(3, 1);
        d.print("zz");
        d.clear();
        d.print("hi");
        assert_eq!(d.text(), "hi | ");
    }
}
