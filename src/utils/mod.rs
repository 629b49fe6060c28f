//! Reading and writing JSON files.

#[cfg(feature = "cli")]
pub mod verbosity;

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fmt::Debug;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Stack size of the thread that loads, remaps and writes a tree, see [`with_large_stack`].
pub const STACK_SIZE: usize = 256 * 1024 * 1024;

/// Maximum nesting of objects and arrays accepted by [`read_json`].
///
/// A tree node nests two levels (the node and its `children`), so this allows trees
/// 50,000 nodes deep. Parsing, writing and dropping JSON this deep fits in [`STACK_SIZE`].
pub const MAX_DEPTH: usize = 100_000;

/// Run `f` on a thread with a [`STACK_SIZE`] stack and return its result.
///
/// Parsing, serializing and dropping JSON recurse once per nesting level, so anything
/// that holds a deep tree must run through here.
///
/// ## Examples
///
/// ```rust
/// use reannotate::utils::with_large_stack;
///
/// let answer = with_large_stack(|| Ok(6 * 7))?;
/// assert_eq!(answer, 42);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn with_large_stack<F, T>(f: F) -> Result<T, Report>
where
    F: FnOnce() -> Result<T, Report> + Send,
    T: Send,
{
    std::thread::scope(|scope| {
        let handle = std::thread::Builder::new()
            .name("reannotate".to_string())
            .stack_size(STACK_SIZE)
            .spawn_scoped(scope, f)
            .wrap_err("Failed to spawn worker thread.")?;
        handle.join().map_err(|_| eyre!("Worker thread panicked."))?
    })
}

/// Returns the deepest nesting of objects and arrays in a JSON text.
///
/// Brackets inside strings are ignored.
///
/// ## Examples
///
/// ```rust
/// use reannotate::utils::json_depth;
///
/// assert_eq!(json_depth(br#"{"a": [1, {"b": "[[["}]}"#), 3);
/// assert_eq!(json_depth(br#""\"{""#), 0);
/// ```
pub fn json_depth(json: &[u8]) -> usize {
    let (mut depth, mut max_depth) = (0_usize, 0_usize);
    let (mut in_string, mut escaped) = (false, false);

    for byte in json {
        match (in_string, byte) {
            (true, _) if escaped => escaped = false,
            (true, b'\\') => escaped = true,
            (true, b'"') => in_string = false,
            (true, _) => (),
            (false, b'"') => in_string = true,
            (false, b'{' | b'[') => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            (false, b'}' | b']') => depth = depth.saturating_sub(1),
            (false, _) => (),
        }
    }

    max_depth
}

/// Read a whole JSON file.
///
/// Files nested deeper than [`MAX_DEPTH`] are an error. Deep files must be read, and the
/// result dropped, inside [`with_large_stack`].
pub fn read_json<T, P>(path: &P) -> Result<T, Report>
where
    T: DeserializeOwned,
    P: AsRef<Path> + Debug,
{
    let json = std::fs::read(path).wrap_err_with(|| eyre!("Failed to open JSON file: {path:?}"))?;

    let depth = json_depth(&json);
    if depth > MAX_DEPTH {
        Err(eyre!("JSON file is nested {depth} levels deep, more than the maximum of {MAX_DEPTH}: {path:?}")
            .suggestion("Is the tree a single unbranched chain of nodes?"))?;
    }

    let mut deserializer = serde_json::Deserializer::from_slice(&json);
    deserializer.disable_recursion_limit();
    let value: T = serde::Deserialize::deserialize(&mut deserializer)
        .wrap_err_with(|| eyre!("Failed to deserialize JSON file: {path:?}"))?;
    deserializer.end().wrap_err_with(|| eyre!("Trailing characters in JSON file: {path:?}"))?;
    Ok(value)
}

/// Serialize `value` as JSON, one key per line, indented by `indent` spaces per level.
pub fn to_json_writer<T, W>(writer: W, value: &T, indent: usize) -> Result<W, Report>
where
    T: Serialize + ?Sized,
    W: Write,
{
    let indent = " ".repeat(indent);
    let mut serializer = Serializer::with_formatter(writer, PrettyFormatter::with_indent(indent.as_bytes()));
    value.serialize(&mut serializer).wrap_err("Failed to serialize JSON.")?;
    Ok(serializer.into_inner())
}

/// Write a JSON file, indented by `indent` spaces per level.
///
/// The JSON is written to a temporary file next to `path`, which then replaces `path`.
/// A failure part way through never leaves a partial file behind. Missing parent
/// directories are created.
///
/// ## Examples
///
/// ```rust
/// use reannotate::utils::{read_json, write_json};
/// use serde_json::{json, Value};
///
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("nested").join("out.json");
/// write_json(&json!({"b": 1, "a": [2]}), &path, 0)?;
///
/// assert_eq!(std::fs::read_to_string(&path)?, "{\n\"b\": 1,\n\"a\": [\n2\n]\n}");
/// assert_eq!(read_json::<Value, _>(&path)?, json!({"b": 1, "a": [2]}));
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn write_json<T, P>(value: &T, path: &P, indent: usize) -> Result<(), Report>
where
    T: Serialize + ?Sized,
    P: AsRef<Path> + Debug,
{
    let dir = match path.as_ref().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).wrap_err_with(|| eyre!("Failed to create directory: {dir:?}"))?;

    let file = NamedTempFile::new_in(dir)
        .wrap_err_with(|| eyre!("Failed to create temporary file in: {dir:?}"))?;
    let mut writer = to_json_writer(BufWriter::new(file), value, indent)
        .wrap_err_with(|| eyre!("Failed to write JSON file: {path:?}"))?;
    writer.flush().wrap_err_with(|| eyre!("Failed to write JSON file: {path:?}"))?;

    let file = writer.into_inner().wrap_err_with(|| eyre!("Failed to write JSON file: {path:?}"))?;
    file.persist(path).wrap_err_with(|| eyre!("Failed to write JSON file: {path:?}"))?;

    Ok(())
}

#[cfg(test)]
mod tests;
