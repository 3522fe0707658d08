use bytes::BytesMut;

/// Splits a raw byte stream into lines.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. Terminators are stripped; everything else,
/// empty lines included, is passed through. Invalid UTF-8 is replaced, not rejected.
#[derive(Default)]
pub struct LineFramer {
    buf: BytesMut,
}

impl LineFramer {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(4096),
        }
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Take the next complete line, if the buffer holds one.
    pub fn next_line(&mut self) -> Option<String> {
        let pos = self.buf.iter().position(|&b| b == b'\n' || b == b'\r')?;
        let terminator_len = match (self.buf[pos], self.buf.get(pos + 1)) {
            (b'\r', Some(b'\n')) => 2,
            // a trailing `\r` might be the first half of `\r\n`; wait for the next chunk
            (b'\r', None) => return None,
            _ => 1,
        };
        let raw = self.buf.split_to(pos + terminator_len);
        Some(String::from_utf8_lossy(&raw[..pos]).into_owned())
    }

    /// Flush whatever is left once the stream has ended.
    pub fn finish(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let raw = self.buf.split();
        let raw = raw.strip_suffix(b"\r").unwrap_or(&raw[..]);
        Some(String::from_utf8_lossy(raw).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(framer: &mut LineFramer) -> Vec<String> {
        std::iter::from_fn(|| framer.next_line()).collect()
    }

    #[test]
    fn strips_all_terminator_styles() {
        let mut framer = LineFramer::new();
        framer.push(b"unix\nwindows\r\nprogress 50%\rprogress 100%\n");
        assert_eq!(
            drain(&mut framer),
            vec!["unix", "windows", "progress 50%", "progress 100%"]
        );
        assert_eq!(framer.finish(), None);
    }

    #[test]
    fn lines_split_across_chunks() {
        let mut framer = LineFramer::new();
        framer.push(b"Connecting to tar");
        assert!(drain(&mut framer).is_empty());
        framer.push(b"get...\r");
        // could still become `\r\n`
        assert!(drain(&mut framer).is_empty());
        framer.push(b"\nDone");
        assert_eq!(drain(&mut framer), vec!["Connecting to target..."]);
        assert_eq!(framer.finish().as_deref(), Some("Done"));
    }

    #[test]
    fn keeps_empty_lines_and_whitespace() {
        let mut framer = LineFramer::new();
        framer.push(b"  indented \n\n\ttab\n");
        assert_eq!(drain(&mut framer), vec!["  indented ", "", "\ttab"]);
    }

    #[test]
    fn trailing_carriage_return_at_eof() {
        let mut framer = LineFramer::new();
        framer.push(b"last\r");
        assert!(drain(&mut framer).is_empty());
        assert_eq!(framer.finish().as_deref(), Some("last"));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut framer = LineFramer::new();
        framer.push(b"bad \xff byte\n");
        assert_eq!(drain(&mut framer), vec!["bad \u{fffd} byte"]);
    }
}
