#![allow(missing_docs)]
#![allow(dead_code)]

use core::fmt::Write;

use sparse::{Event, EventLog, Parser, ParserOptions};

pub const DOCUMENT: &str = "window {
  title   Main  window   # the caption
  size 640x480; visible yes
  { anonymous }
}
";

// The same document cut on seams: inside a token, inside a run of blanks,
// right after a terminator and just before a closing brace.
#[rustfmt::skip]
pub const STREAM: [&str; 9] = [
    "win",                          // inside a name
    "dow {\n  title ",              // name -> open node -> name
    "  Main ",                      // inside a collapsed run of blanks
    " window   # the ",             // value ends at a comment
    "caption\n  size 640x4",        // comment ends, value split
    "80;",                          // terminator at chunk end
    " visible yes\n  {",            // nameless open at chunk end
    " anonymous ",                  // name, then an empty value pending
    "}\n}\n",                       // both closes
];

pub fn parse_chunks(options: ParserOptions, chunks: &[&str]) -> Vec<Event> {
    let mut parser = Parser::new(options, EventLog::new());
    for chunk in chunks {
        if parser.feed(chunk).is_err() {
            break;
        }
    }
    if parser.is_open() {
        let _ = parser.finish();
    }
    parser.into_sink().expect("sink").into_events()
}

pub fn render(events: &[Event]) -> String {
    let mut out = String::new();
    for event in events {
        writeln!(out, "{event}").unwrap();
    }
    out
}
