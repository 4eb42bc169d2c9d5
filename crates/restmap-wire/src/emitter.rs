//! `Emitter` — streaming JSON text accumulator.
//!
//! Unlike a whole-value serializer, the emitter receives tokens one at a
//! time (keys, literals, raw fragments) and inserts the `,`/`:` separators
//! itself, so a caller can build an object incrementally across many calls.

/// Accumulates one JSON value as UTF-8 text.
#[derive(Debug)]
pub struct Emitter {
    out: String,
    needs_comma: bool,
    after_key: bool,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            needs_comma: false,
            after_key: false,
        }
    }

    /// Open an object. Separated by a comma if it follows a completed value.
    pub fn emit_map_open(&mut self) {
        self.separate();
        self.out.push('{');
        self.needs_comma = false;
    }

    /// Close the current object.
    pub fn emit_map_close(&mut self) {
        self.out.push('}');
        self.needs_comma = true;
    }

    /// Emit an object key followed by `:`. The next token is its value and
    /// gets no comma before it.
    pub fn emit_key(&mut self, key: &str) {
        self.separate();
        write_escaped_str(&mut self.out, key);
        self.out.push(':');
        self.after_key = true;
    }

    pub fn emit_str(&mut self, s: &str) {
        self.separate();
        write_escaped_str(&mut self.out, s);
        self.needs_comma = true;
    }

    pub fn emit_i64(&mut self, int: i64) {
        self.separate();
        self.out.push_str(&int.to_string());
        self.needs_comma = true;
    }

    pub fn emit_f64(&mut self, float: f64) {
        self.separate();
        self.out.push_str(&format_float(float));
        self.needs_comma = true;
    }

    pub fn emit_bool(&mut self, b: bool) {
        self.separate();
        self.out.push_str(if b { "true" } else { "false" });
        self.needs_comma = true;
    }

    pub fn emit_null(&mut self) {
        self.separate();
        self.out.push_str("null");
        self.needs_comma = true;
    }

    /// Emit pre-serialized JSON text verbatim, as one value.
    pub fn emit_json(&mut self, json: &str) {
        self.separate();
        self.out.push_str(json);
        self.needs_comma = true;
    }

    /// Consume the emitter and return the accumulated text.
    pub fn dump(self) -> String {
        self.out
    }

    fn separate(&mut self) {
        if self.after_key {
            self.after_key = false;
        } else if self.needs_comma {
            self.out.push(',');
        }
    }
}

/// Write a JSON-encoded string (with escaping).
fn write_escaped_str(out: &mut String, s: &str) {
    // Fast path: plain ASCII, no quotes or backslash
    let plain = s
        .bytes()
        .all(|b| (32..=126).contains(&b) && b != b'"' && b != b'\\');
    if plain {
        out.push('"');
        out.push_str(s);
        out.push('"');
        return;
    }

    // Fall back to serde_json for proper escaping
    let escaped = serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string());
    out.push_str(&escaped);
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "null".to_string()
    } else if f.is_infinite() {
        if f > 0.0 {
            "1e308".to_string()
        } else {
            "-1e308".to_string()
        }
    } else if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object() {
        let mut e = Emitter::new();
        e.emit_map_open();
        e.emit_map_close();
        assert_eq!(e.dump(), "{}");
    }

    #[test]
    fn test_key_value_pairs_get_commas() {
        let mut e = Emitter::new();
        e.emit_map_open();
        e.emit_key("a");
        e.emit_i64(1);
        e.emit_key("b");
        e.emit_str("two");
        e.emit_key("c");
        e.emit_null();
        e.emit_map_close();
        assert_eq!(e.dump(), r#"{"a":1,"b":"two","c":null}"#);
    }

    #[test]
    fn test_raw_json_value() {
        let mut e = Emitter::new();
        e.emit_map_open();
        e.emit_key("rel");
        e.emit_json(r#"{"id":3}"#);
        e.emit_key("tags");
        e.emit_json("[1,2]");
        e.emit_map_close();
        assert_eq!(e.dump(), r#"{"rel":{"id":3},"tags":[1,2]}"#);
    }

    #[test]
    fn test_bare_value_without_braces() {
        // Single-field output mode emits one value and no enclosing object
        let mut e = Emitter::new();
        e.emit_str("only");
        assert_eq!(e.dump(), r#""only""#);
    }

    #[test]
    fn test_string_escaping() {
        let mut e = Emitter::new();
        e.emit_str("a\"b\\c\nd");
        assert_eq!(e.dump(), r#""a\"b\\c\nd""#);
    }

    #[test]
    fn test_non_ascii_string() {
        let mut e = Emitter::new();
        e.emit_str("héllo");
        let out = e.dump();
        assert_eq!(
            serde_json::from_str::<String>(&out).unwrap(),
            "héllo".to_string()
        );
    }

    #[test]
    fn test_bool_values() {
        let mut e = Emitter::new();
        e.emit_map_open();
        e.emit_key("on");
        e.emit_bool(true);
        e.emit_key("off");
        e.emit_bool(false);
        e.emit_map_close();
        assert_eq!(e.dump(), r#"{"on":true,"off":false}"#);
    }

    #[test]
    fn test_float_formatting() {
        assert_eq!(format_float(1.5), "1.5");
        assert_eq!(format_float(2.0), "2");
        assert_eq!(format_float(-3.0), "-3");
        assert_eq!(format_float(f64::NAN), "null");
        assert_eq!(format_float(f64::INFINITY), "1e308");
        assert_eq!(format_float(f64::NEG_INFINITY), "-1e308");
    }
}
