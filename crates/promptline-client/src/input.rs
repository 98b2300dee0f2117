use promptline_core::{KeyCode, KeyEvent};

#[derive(Debug, PartialEq)]
enum State {
    Ground,
    /// Saw ESC.
    Escape,
    /// Inside `ESC [`, collecting parameter bytes.
    Csi(Vec<u8>),
    /// Saw `ESC O`.
    Ss3,
}

/// Turns raw terminal bytes into key events.
///
/// Escape sequences and UTF-8 characters may be split across reads; the
/// partial state is kept until the next `feed`.
pub struct KeyDecoder {
    state: State,
    utf8: Vec<u8>,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            utf8: Vec::new(),
        }
    }

    pub fn feed(&mut self, bytes: &[u8]) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        for &b in bytes {
            let state = std::mem::replace(&mut self.state, State::Ground);
            match state {
                State::Ground => self.ground(b, &mut events),
                State::Escape => self.escape(b, &mut events),
                State::Csi(mut params) => match b {
                    0x30..=0x3f => {
                        params.push(b);
                        self.state = State::Csi(params);
                    }
                    0x40..=0x7e => events.extend(csi_key(&params, b)),
                    _ => {}
                },
                State::Ss3 => events.extend(cursor_key(b).map(KeyEvent::new)),
            }
        }
        events
    }

    fn ground(&mut self, b: u8, events: &mut Vec<KeyEvent>) {
        match b {
            0x1b => self.state = State::Escape,
            // Enter
            0x0d | 0x0a => events.push(KeyEvent::new(KeyCode::Enter)),
            0x09 => events.push(KeyEvent::new(KeyCode::Tab)),
            // Backspace / DEL
            0x7f | 0x08 => events.push(KeyEvent::new(KeyCode::Backspace)),
            // Ctrl+A .. Ctrl+Z
            0x01..=0x1a => events.push(KeyEvent::ctrl(KeyCode::Char((b - 1 + b'a') as char))),
            0x20..=0x7e => events.push(KeyEvent::new(KeyCode::Char(b as char))),
            0x80..=0xff => {
                self.utf8.push(b);
                match std::str::from_utf8(&self.utf8) {
                    Ok(s) => {
                        events.extend(s.chars().map(|c| KeyEvent::new(KeyCode::Char(c))));
                        self.utf8.clear();
                    }
                    // Invalid, not merely incomplete.
                    Err(e) if e.error_len().is_some() => self.utf8.clear(),
                    Err(_) => {}
                }
            }
            _ => {}
        }
    }

    fn escape(&mut self, b: u8, events: &mut Vec<KeyEvent>) {
        match b {
            b'[' => self.state = State::Csi(Vec::new()),
            b'O' => self.state = State::Ss3,
            0x0d | 0x0a => events.push(KeyEvent::alt(KeyCode::Enter)),
            0x7f => events.push(KeyEvent::alt(KeyCode::Backspace)),
            0x1b => {
                events.push(KeyEvent::new(KeyCode::Escape));
                self.state = State::Escape;
            }
            0x20..=0x7e => events.push(KeyEvent::alt(KeyCode::Char(b as char))),
            _ => {}
        }
    }
}

fn cursor_key(b: u8) -> Option<KeyCode> {
    match b {
        b'A' => Some(KeyCode::Up),
        b'B' => Some(KeyCode::Down),
        b'C' => Some(KeyCode::Right),
        b'D' => Some(KeyCode::Left),
        b'H' => Some(KeyCode::Home),
        b'F' => Some(KeyCode::End),
        _ => None,
    }
}

/// Decode `ESC [ params final`, e.g. `ESC [ 1 ; 5 A` (Ctrl+Up) or `ESC [ 3 ~`.
fn csi_key(params: &[u8], final_byte: u8) -> Option<KeyEvent> {
    let params = std::str::from_utf8(params).ok()?;
    let mut fields = params.split(';');
    let first = fields.next().unwrap_or("");
    let modifier: u8 = fields.next().and_then(|m| m.parse().ok()).unwrap_or(1);

    let key_code = if final_byte == b'~' {
        match first {
            "1" | "7" => KeyCode::Home,
            "4" | "8" => KeyCode::End,
            "3" => KeyCode::Delete,
            _ => return None,
        }
    } else {
        cursor_key(final_byte)?
    };

    // xterm encodes modifiers as 1 + (shift | alt << 1 | ctrl << 2).
    let bits = modifier.saturating_sub(1);
    Some(KeyEvent {
        key_code,
        shift: bits & 1 != 0,
        alt: bits & 2 != 0,
        ctrl: bits & 4 != 0,
        meta: bits & 8 != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(events: &[KeyEvent]) -> Vec<KeyCode> {
        events.iter().map(|e| e.key_code).collect()
    }

    #[test]
    fn test_printable_and_enter() {
        let mut d = KeyDecoder::new();
        let events = d.feed(b"ls\r");
        assert_eq!(
            codes(&events),
            vec![KeyCode::Char('l'), KeyCode::Char('s'), KeyCode::Enter]
        );
    }

    #[test]
    fn test_ctrl_letters() {
        let mut d = KeyDecoder::new();
        let events = d.feed(&[0x10, 0x0e, 0x03]);
        assert_eq!(
            events,
            vec![
                KeyEvent::ctrl(KeyCode::Char('p')),
                KeyEvent::ctrl(KeyCode::Char('n')),
                KeyEvent::ctrl(KeyCode::Char('c')),
            ]
        );
    }

    #[test]
    fn test_tab_and_backspace_not_ctrl() {
        let mut d = KeyDecoder::new();
        assert_eq!(codes(&d.feed(&[0x09, 0x7f, 0x08])), vec![KeyCode::Tab, KeyCode::Backspace, KeyCode::Backspace]);
    }

    #[test]
    fn test_arrow_keys() {
        let mut d = KeyDecoder::new();
        let events = d.feed(b"\x1b[A\x1b[B\x1bOC\x1b[D");
        assert_eq!(
            codes(&events),
            vec![KeyCode::Up, KeyCode::Down, KeyCode::Right, KeyCode::Left]
        );
        assert!(events.iter().all(|e| !e.ctrl && !e.alt));
    }

    #[test]
    fn test_modified_arrow() {
        let mut d = KeyDecoder::new();
        let events = d.feed(b"\x1b[1;5A");
        assert_eq!(events, vec![KeyEvent::ctrl(KeyCode::Up)]);
    }

    #[test]
    fn test_tilde_keys() {
        let mut d = KeyDecoder::new();
        let events = d.feed(b"\x1b[3~\x1b[1~\x1b[4~\x1b[99~");
        assert_eq!(codes(&events), vec![KeyCode::Delete, KeyCode::Home, KeyCode::End]);
    }

    #[test]
    fn test_sequence_split_across_reads() {
        let mut d = KeyDecoder::new();
        assert!(d.feed(b"\x1b").is_empty());
        assert!(d.feed(b"[").is_empty());
        assert_eq!(codes(&d.feed(b"A")), vec![KeyCode::Up]);
    }

    #[test]
    fn test_alt_enter_and_alt_char() {
        let mut d = KeyDecoder::new();
        let events = d.feed(b"\x1b\r\x1bb");
        assert_eq!(
            events,
            vec![KeyEvent::alt(KeyCode::Enter), KeyEvent::alt(KeyCode::Char('b'))]
        );
    }

    #[test]
    fn test_utf8_split_across_reads() {
        let mut d = KeyDecoder::new();
        let bytes = "é".as_bytes();
        assert!(d.feed(&bytes[..1]).is_empty());
        assert_eq!(codes(&d.feed(&bytes[1..])), vec![KeyCode::Char('é')]);
    }

    #[test]
    fn test_invalid_utf8_dropped() {
        let mut d = KeyDecoder::new();
        assert!(d.feed(&[0xff]).is_empty());
        assert_eq!(codes(&d.feed(b"a")), vec![KeyCode::Char('a')]);
    }
}
