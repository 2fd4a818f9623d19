//! Bounded stack capture for log records
//!
//! Attack and policy log records carry a call-site stack trace so a hit can
//! be attributed to application code. Depth is bounded by configuration;
//! capture cost is only paid on non-Ignore decisions.

use std::backtrace::Backtrace;

/// Captures the current stack, formatted one frame per line, truncated to
/// `max_depth` frames. Returns an empty string when capture is unavailable.
pub fn capture(max_depth: usize) -> String {
    if max_depth == 0 {
        return String::new();
    }
    format_frames(&Backtrace::force_capture().to_string(), max_depth)
}

/// Truncates a rendered backtrace to `max_depth` frames.
///
/// The std renderer emits one `N: symbol` line per frame, with indented
/// `at file:line` continuation lines; a frame and its continuations count
/// once.
fn format_frames(rendered: &str, max_depth: usize) -> String {
    let mut frames = 0usize;
    let mut out = Vec::new();

    for line in rendered.lines() {
        if is_frame_start(line) {
            frames += 1;
            if frames > max_depth {
                break;
            }
        } else if frames == 0 {
            // preamble before the first frame
            continue;
        }
        out.push(line);
    }

    out.join("\n")
}

fn is_frame_start(line: &str) -> bool {
    let trimmed = line.trim_start();
    let Some((index, _)) = trimmed.split_once(':') else {
        return false;
    };
    !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())
}
