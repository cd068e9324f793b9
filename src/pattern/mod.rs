//! Lua-style pattern matching engine used by textobject definitions.
//!
//! # Pattern syntax
//!
//! | Token        | Meaning                                             |
//! |--------------|-----------------------------------------------------|
//! | `x`          | The literal byte `x` (any non-magic byte)           |
//! | `.`          | Any byte                                            |
//! | `%a`         | ASCII letter (`%A` is the complement)               |
//! | `%c`         | Control byte                                        |
//! | `%d`         | ASCII digit                                         |
//! | `%g`         | Printable byte except space                         |
//! | `%l` / `%u`  | Lower / upper case letter                           |
//! | `%p`         | ASCII punctuation                                   |
//! | `%s`         | Whitespace (including vertical tab)                 |
//! | `%w`         | Letter or digit                                     |
//! | `%x`         | Hexadecimal digit                                   |
//! | `%.`         | Escaped magic byte, matched literally               |
//! | `[set]`      | Bytes, `a-z` ranges and `%` classes; `[^set]` negates |
//! | `X*`, `X+`   | Greedy repetition (zero/one or more)                |
//! | `X-`         | Lazy repetition (zero or more, shortest first)      |
//! | `X?`         | Optional                                            |
//! | `%bxy`       | Balanced run from `x` to its matching `y`           |
//! | `%f[set]`    | Frontier: previous byte not in `set`, next one in it |
//! | `%1`..`%9`   | Text of an earlier closed capture                   |
//! | `(...)`      | Substring capture                                   |
//! | `()`         | Position capture                                    |
//! | `^` / `$`    | Anchor at start / end (only as first / last byte)   |
//!
//! A `^`-anchored pattern matches only at the start of its subject, even
//! when a search starts further in.

pub mod ast;
pub mod char_class;
pub mod matcher;
pub mod parser;

pub use ast::Pattern;
pub use matcher::{Capture, Match};
pub use parser::{PatternError, parse};

const MAGIC: &[u8] = b"^$()%.[]*+-?";

/// Escape every magic byte in `text` so it matches literally.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii() && MAGIC.contains(&(ch as u8)) {
            out.push('%');
        }
        out.push(ch);
    }
    out
}
