use std::io::{self, Read};

use aho_corasick::{AhoCorasick, BuildError, MatchKind};
use core_2048::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Move(Direction),
    Quit,
}

const KEY_BINDINGS: [(&[u8], Key); 10] = [
    (b"\x1b[A", Key::Move(Direction::Up)),
    (b"\x1b[B", Key::Move(Direction::Down)),
    (b"\x1b[C", Key::Move(Direction::Right)),
    (b"\x1b[D", Key::Move(Direction::Left)),
    (b"w", Key::Move(Direction::Up)),
    (b"s", Key::Move(Direction::Down)),
    (b"d", Key::Move(Direction::Right)),
    (b"a", Key::Move(Direction::Left)),
    (b"q", Key::Quit),
    (b"\x04", Key::Quit),
];

/// Turns raw terminal bytes into keys. Escape sequences cut short by the end
/// of a read are completed by the next one.
pub struct KeyReader {
    searcher: AhoCorasick,
    buf: [u8; 128],
    buf_len: usize,
}

impl KeyReader {
    pub fn new() -> Result<Self, BuildError> {
        let searcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(KEY_BINDINGS.map(|(pattern, _)| pattern))?;

        Ok(Self {
            searcher,
            buf: [0; 128],
            buf_len: 0,
        })
    }

    /// Blocks for one read from `input`. End of input reads as [`Key::Quit`].
    pub fn read_keys(&mut self, input: &mut impl Read) -> io::Result<Vec<Key>> {
        let read = input.read(&mut self.buf[self.buf_len..])?;

        if read == 0 {
            return Ok(vec![Key::Quit]);
        }

        self.buf_len += read;

        let keys = self
            .searcher
            .find_iter(&self.buf[..self.buf_len])
            .map(|m| KEY_BINDINGS[m.pattern().as_usize()].1)
            .collect();

        self.buf_len = match &self.buf[..self.buf_len] {
            [.., 0x1b, b'['] => {
                self.buf[..2].copy_from_slice(b"\x1b[");
                2
            }
            [.., 0x1b] => {
                self.buf[0] = 0x1b;
                1
            }
            _ => 0,
        };

        Ok(keys)
    }
}
