#![no_main]
use std::cell::RefCell;

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use sparse::{Event, EventKind, EventLog, Parser, ParserOptions};

const HEADER: usize = 5; // 1 flag + 4-byte seed

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// One syntactic fragment of a sparse document.
#[derive(Debug, Arbitrary)]
enum Piece {
    Pair(Word, Word),
    Open(Option<Word>),
    Close,
    Comment(String),
    Terminator(bool),
    Escape(u8),
    Blanks(u8),
}

#[derive(Debug, Arbitrary)]
struct Word(String);

impl Word {
    fn render(&self, out: &mut String) {
        out.extend(self.0.chars().filter(|c| !matches!(c, ' ' | '\t' | '\n' | '{' | '}' | ';' | '#' | '\\')));
        if self.0.is_empty() {
            out.push('w');
        }
    }
}

impl Piece {
    fn render(&self, out: &mut String) {
        match self {
            Piece::Pair(name, value) => {
                name.render(out);
                out.push(' ');
                value.render(out);
                out.push('\n');
            }
            Piece::Open(name) => {
                if let Some(name) = name {
                    name.render(out);
                    out.push(' ');
                }
                out.push('{');
            }
            Piece::Close => out.push('}'),
            Piece::Comment(text) => {
                out.push('#');
                out.extend(text.chars().filter(|&c| c != '\n'));
                out.push('\n');
            }
            Piece::Terminator(semicolon) => out.push(if *semicolon { ';' } else { '\n' }),
            Piece::Escape(b) => {
                out.push('\\');
                out.push(char::from(b"nrabft0\\{} ;#x"[usize::from(*b) % 14]));
            }
            Piece::Blanks(n) => {
                for i in 0..(n % 4) {
                    out.push(if i % 2 == 0 { ' ' } else { '\t' });
                }
            }
        }
    }
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x0F);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;
        while prefix < size.max(HEADER + 1) && prefix < max_size {
            let written = append_piece(&mut data[prefix..max_size]);
            if written == 0 {
                break;
            }
            prefix += written;
        }
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fn append_piece(buf: &mut [u8]) -> usize {
    let piece = loop {
        let bytes: Vec<u8> = with_rng(|rng| {
            let len = rng.random_range(4..64);
            (0..len).map(|_| rng.random::<u8>()).collect()
        });
        if let Ok(piece) = Piece::arbitrary(&mut Unstructured::new(&bytes)) {
            break piece;
        }
    };
    let mut text = String::new();
    piece.render(&mut text);
    let len = text.len().min(buf.len());
    buf[..len].copy_from_slice(&text.as_bytes()[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

fn run<'a>(options: ParserOptions, chunks: impl IntoIterator<Item = &'a str>) -> Vec<Event> {
    let mut parser = Parser::new(options, EventLog::new());
    for chunk in chunks {
        if parser.feed(chunk).is_err() {
            break;
        }
    }
    if parser.is_open() {
        let _ = parser.finish();
    }
    parser.into_sink().unwrap().into_events()
}

fn run_bytes<'a>(options: ParserOptions, chunks: impl IntoIterator<Item = &'a [u8]>) -> Vec<Event> {
    let mut parser = Parser::new(options, EventLog::new());
    for chunk in chunks {
        if parser.feed_bytes(chunk).is_err() {
            break;
        }
    }
    if parser.is_open() {
        let _ = parser.finish();
    }
    parser.into_sink().unwrap().into_events()
}

fn check_invariants(events: &[Event]) {
    let mut depth = 0usize;
    for (i, event) in events.iter().enumerate() {
        let last = i + 1 == events.len();
        match event.kind {
            EventKind::OpenNode => depth += 1,
            EventKind::CloseNode => depth = depth.checked_sub(1).expect("close without open"),
            EventKind::Done => assert!(last && depth == 0, "misplaced done"),
            EventKind::Error => assert!(last, "events after error"),
            EventKind::Name | EventKind::Value => {}
        }
    }
}

fn parser(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let split_seed = u32::from_le_bytes(data[1..5].try_into().unwrap()) as u64;
    let data = &data[HEADER..];

    let options = ParserOptions {
        consume_whitespace: flags & 1 != 0,
        trim_trailing_spaces: flags & 2 != 0,
        nameless_root_nodes: flags & 4 != 0,
        nameless_nodes: flags & 8 != 0,
    };

    let text = String::from_utf8_lossy(data).into_owned();
    let whole = run(options, [text.as_str()]);
    check_invariants(&whole);

    let chunks = split_into_safe_chunks(&text, split_seed);
    assert_eq!(whole, run(options, chunks), "str chunking changed events");

    let byte_chunks = split_bytes(data, split_seed);
    assert_eq!(whole, run_bytes(options, byte_chunks), "byte chunking changed events");
}

fuzz_target!(|data: &[u8]| parser(data));

/// Split a UTF-8 `&str` into boundary-safe chunks using a deterministic random
/// value to generate splits.
fn split_into_safe_chunks(text: &str, split_seed: u64) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let len = text.len();

    while start < len {
        let remaining = len - start;
        let mut size = (split_seed as usize % remaining) + 1;
        while start + size < len && !text.is_char_boundary(start + size) {
            size += 1;
        }
        chunks.push(&text[start..start + size]);
        start += size;
    }

    chunks
}

/// Split raw bytes anywhere, including inside multi-byte sequences.
fn split_bytes(data: &[u8], split_seed: u64) -> Vec<&[u8]> {
    let mut chunks = Vec::new();
    let mut rest = data;
    let mut seed = split_seed;
    while !rest.is_empty() {
        let size = (seed as usize % rest.len()) + 1;
        let (head, tail) = rest.split_at(size);
        chunks.push(head);
        rest = tail;
        seed = seed.rotate_left(7) ^ 0x9E37_79B9;
    }
    chunks
}
