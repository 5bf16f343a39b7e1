//! Rewriting SyncTeX records
//!
//! SyncTeX files are line oriented.
//! The engine declares each input file once, as `Input:<id>:<path>`,
//!     and later records refer to the file by its id together with a line number.
//! Correction works on bytes so that records this module does not understand,
//!     and any non-UTF-8 content, are passed through unchanged.

use regex::bytes::Regex;
use std::sync::LazyLock;
use texpp::SyncMap;
use tracing::{debug, warn};

/// `Input:<id>:<path>`; the keyword is matched case-insensitively.
static INPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i-u)^(input:(\d+):)([^\r\n]*)").unwrap());

/// `<kind><id>,<line>` followed by `:` or by `,<column>`.
static RECORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)^[^0-9\r\n](\d+),(\d+)[:,]").unwrap());

/// Result of correcting SyncTeX data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub data: Vec<u8>,

    /// Identifier the engine assigned to the expanded file.
    ///
    /// If this is [`None`] the file was not declared in the data,
    ///     and `data` is identical to the input.
    pub file_id: Option<u64>,

    /// Number of records whose line was rewritten.
    pub records: usize,
}

impl Correction {
    pub fn is_applied(&self) -> bool {
        self.file_id.is_some()
    }
}

/// Rewrite SyncTeX data so that it refers to lines of the original file.
///
/// `intermediate` is the path of the expanded file as recorded by the engine;
///     it is compared ignoring case, path separator style and `./` components,
///     and a relative path matches any recorded path it is a suffix of.
/// Lines outside the sync map are left unchanged.
pub fn correct(data: &[u8], intermediate: &str, original: &str, sync_map: &SyncMap) -> Correction {
    let intermediate = normalize(intermediate);
    let mut out = Vec::with_capacity(data.len());
    let mut file_id: Option<u64> = None;
    let mut records = 0_usize;
    for line in data.split_inclusive(|b| *b == b'\n') {
        let Some(id) = file_id else {
            match declared_file(line, &intermediate) {
                None => out.extend_from_slice(line),
                Some((id, prefix_len, path_end)) => {
                    debug!("Expanded file has SyncTeX id {id}");
                    file_id = Some(id);
                    out.extend_from_slice(&line[..prefix_len]);
                    out.extend_from_slice(original.as_bytes());
                    out.extend_from_slice(&line[path_end..]);
                }
            }
            continue;
        };
        match rewrite_record(line, id, sync_map) {
            None => out.extend_from_slice(line),
            Some(rewritten) => {
                records += 1;
                out.extend_from_slice(&rewritten);
            }
        }
    }
    if file_id.is_none() {
        warn!("No SyncTeX input declaration for `{intermediate}`; leaving the data unchanged");
    }
    Correction {
        data: out,
        file_id,
        records,
    }
}

/// If the line declares the intermediate file,
///     return its id and the byte range of the declared path.
fn declared_file(line: &[u8], intermediate: &str) -> Option<(u64, usize, usize)> {
    let captures = INPUT_RE.captures(line)?;
    let path = captures.get(3)?;
    if !same_file(&normalize(&String::from_utf8_lossy(path.as_bytes())), intermediate) {
        return None;
    }
    let id = parse_number(captures.get(2)?.as_bytes())?;
    Some((id, path.start(), path.end()))
}

fn rewrite_record(line: &[u8], file_id: u64, sync_map: &SyncMap) -> Option<Vec<u8>> {
    let captures = RECORD_RE.captures(line)?;
    if parse_number(captures.get(1)?.as_bytes())? != file_id {
        return None;
    }
    let line_number = captures.get(2)?;
    let original = sync_map.original_line(parse_number(line_number.as_bytes())? as usize)?;
    let mut rewritten = Vec::with_capacity(line.len());
    rewritten.extend_from_slice(&line[..line_number.start()]);
    rewritten.extend_from_slice(original.to_string().as_bytes());
    rewritten.extend_from_slice(&line[line_number.end()..]);
    Some(rewritten)
}

fn parse_number(digits: &[u8]) -> Option<u64> {
    std::str::from_utf8(digits).ok()?.parse().ok()
}

fn normalize(path: &str) -> String {
    let mut path = path.trim().replace('\\', "/").to_lowercase();
    while path.contains("/./") {
        path = path.replace("/./", "/");
    }
    match path.strip_prefix("./") {
        Some(stripped) => stripped.to_string(),
        None => path,
    }
}

fn same_file(a: &str, b: &str) -> bool {
    a == b || a.ends_with(&format!["/{b}"]) || b.ends_with(&format!["/{a}"])
}
