//! # Template
//!
//! Named-placeholder substitution in the style of Python's `str.format`:
//!
//! ```text
//! "{ckpt_name}_{date}"    -> fields looked up by name, rendered with str()
//! "{{literal}}"           -> "{literal}"
//! "{date:%Y%m%d}"         -> strftime pattern for datetime/date/time
//! "{cfg:.1f}"             -> format spec for numbers and text
//! "{ckpt_name!r}"         -> conversion (!s, !r, !a) before the spec
//! ```
//!
//! Positional placeholders (`{}`, `{0}`) and nested fields inside a spec
//! are not supported. A spec this module cannot honour is an error, never
//! silently dropped.
//!
//! Supported spec grammar for text and numbers:
//!
//! ```text
//! [[fill]align][sign][0][width][.precision][type]
//! align: < > ^ =     sign: + - space
//! type:  s (text)  d x X o b (int)  f F e E % (float, int)
//! ```

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::error::{PackError, PackResult};

/// A value a placeholder can refer to
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Float(f64),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl FieldValue {
    /// Python `str()` of the value
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(f) => float_text(*f),
            FieldValue::DateTime(dt) => format!("{} {}", date_text(dt.date()), time_text(dt.time())),
            FieldValue::Date(d) => date_text(*d),
            FieldValue::Time(t) => time_text(*t),
        }
    }

    /// Python `repr()`; only text differs from `str()` here
    fn repr(&self) -> String {
        match self {
            FieldValue::Text(s) => py_repr_str(s),
            _ => self.to_text(),
        }
    }

    /// Python `format(value, spec)`
    pub fn format(&self, spec: &str) -> PackResult<String> {
        match self {
            FieldValue::DateTime(dt) => strftime(*dt, spec, self),
            FieldValue::Date(d) => {
                let midnight = d.and_hms_opt(0, 0, 0).ok_or_else(|| bad_spec(spec))?;
                strftime(midnight, spec, self)
            }
            FieldValue::Time(t) => {
                // Python formats a bare time on 1900-01-01
                let day = NaiveDate::from_ymd_opt(1900, 1, 1).ok_or_else(|| bad_spec(spec))?;
                strftime(day.and_time(*t), spec, self)
            }
            FieldValue::Text(s) => FormatSpec::parse(spec)?.format_text(s),
            FieldValue::Int(i) => FormatSpec::parse(spec)?.format_int(*i),
            FieldValue::Float(f) => FormatSpec::parse(spec)?.format_float(*f),
        }
    }
}

fn bad_spec(spec: &str) -> PackError {
    PackError::Template(format!("invalid format spec '{}'", spec))
}

fn unsupported(spec: &str, what: &str) -> PackError {
    PackError::Template(format!("format spec '{}': {}", spec, what))
}

/// Substitute every `{name[!conv][:spec]}` with the looked-up value
pub fn render<F>(template: &str, lookup: F) -> PackResult<String>
where
    F: Fn(&str) -> Option<FieldValue>,
{
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    out.push('{');
                    continue;
                }

                let mut placeholder = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    if inner == '{' {
                        return Err(PackError::Template(
                            "nested '{' in placeholder".to_string(),
                        ));
                    }
                    placeholder.push(inner);
                }
                if !closed {
                    return Err(PackError::Template(
                        "expected '}' before end of string".to_string(),
                    ));
                }

                out.push_str(&substitute(&placeholder, &lookup)?);
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(PackError::Template(
                        "single '}' encountered in template".to_string(),
                    ));
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// Render one placeholder body: `name`, `name!r`, `name:spec`, `name!s:spec`
fn substitute<F>(placeholder: &str, lookup: &F) -> PackResult<String>
where
    F: Fn(&str) -> Option<FieldValue>,
{
    let (head, spec) = match placeholder.find(':') {
        Some(pos) => (&placeholder[..pos], &placeholder[pos + 1..]),
        None => (placeholder, ""),
    };
    let (name, conversion) = match head.find('!') {
        Some(pos) => (&head[..pos], Some(&head[pos + 1..])),
        None => (head, None),
    };

    if name.is_empty() {
        return Err(PackError::Template(
            "placeholder must name a field".to_string(),
        ));
    }

    let value = lookup(name)
        .ok_or_else(|| PackError::Template(format!("unknown field '{}'", name)))?;

    let value = match conversion {
        None => value,
        Some("s") => FieldValue::Text(value.to_text()),
        Some("r") | Some("a") => FieldValue::Text(value.repr()),
        Some(other) => {
            return Err(PackError::Template(format!(
                "unknown conversion '!{}' for field '{}'",
                other, name
            )))
        }
    };

    value.format(spec)
}

/// strftime a temporal value; an empty spec means `str()`
///
/// `%f` is microseconds as in Python. Unknown directives are errors.
fn strftime(instant: NaiveDateTime, spec: &str, value: &FieldValue) -> PackResult<String> {
    if spec.is_empty() {
        return Ok(value.to_text());
    }

    let pattern = python_strftime_pattern(spec);
    let items: Vec<Item<'_>> = StrftimeItems::new(&pattern).collect();
    if items.iter().any(|i| matches!(i, Item::Error)) {
        return Err(bad_spec(spec));
    }

    let mut out = String::new();
    write!(out, "{}", instant.format_with_items(items.iter())).map_err(|_| bad_spec(spec))?;
    Ok(out)
}

/// Translate Python strftime directives chrono spells differently
fn python_strftime_pattern(spec: &str) -> String {
    let mut pattern = String::with_capacity(spec.len() + 2);
    let mut chars = spec.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            pattern.push(c);
            continue;
        }
        match chars.next() {
            // chrono's %f is nanoseconds
            Some('f') => pattern.push_str("%6f"),
            Some(d) => {
                pattern.push('%');
                pattern.push(d);
            }
            None => pattern.push('%'),
        }
    }
    pattern
}

/// Parsed `[[fill]align][sign][0][width][.precision][type]`
#[derive(Debug, Clone, Copy, PartialEq)]
struct FormatSpec<'a> {
    raw: &'a str,
    fill: char,
    align: Option<char>,
    sign: Option<char>,
    width: usize,
    precision: Option<usize>,
    ty: Option<char>,
}

fn is_align(c: char) -> bool {
    matches!(c, '<' | '>' | '^' | '=')
}

impl<'a> FormatSpec<'a> {
    fn parse(raw: &'a str) -> PackResult<Self> {
        let chars: Vec<char> = raw.chars().collect();
        let mut i = 0;

        let mut fill = ' ';
        let mut align = None;
        if chars.len() >= 2 && is_align(chars[1]) {
            fill = chars[0];
            align = Some(chars[1]);
            i = 2;
        } else if chars.first().copied().is_some_and(is_align) {
            align = Some(chars[0]);
            i = 1;
        }

        let mut sign = None;
        if let Some(&(c @ ('+' | '-' | ' '))) = chars.get(i) {
            sign = Some(c);
            i += 1;
        }

        if chars.get(i) == Some(&'#') {
            return Err(unsupported(raw, "'#' is not supported"));
        }

        if chars.get(i) == Some(&'0') {
            if align.is_none() {
                fill = '0';
                align = Some('=');
            }
            i += 1;
        }

        let width = digits(&chars, &mut i, raw)?.unwrap_or(0);

        if let Some(',' | '_') = chars.get(i) {
            return Err(unsupported(raw, "digit grouping is not supported"));
        }

        let mut precision = None;
        if chars.get(i) == Some(&'.') {
            i += 1;
            precision = Some(digits(&chars, &mut i, raw)?.ok_or_else(|| bad_spec(raw))?);
        }

        let ty = chars.get(i).copied();
        if ty.is_some() {
            i += 1;
        }
        if i != chars.len() {
            return Err(bad_spec(raw));
        }

        Ok(Self { raw, fill, align, sign, width, precision, ty })
    }

    fn sign_text(&self, negative: bool) -> &'static str {
        if negative {
            "-"
        } else {
            match self.sign {
                Some('+') => "+",
                Some(' ') => " ",
                _ => "",
            }
        }
    }

    fn pad(&self, sign: &str, body: &str, default_align: char) -> String {
        let len = sign.chars().count() + body.chars().count();
        if len >= self.width {
            return format!("{}{}", sign, body);
        }
        let pad = self.width - len;
        let fill = |n: usize| self.fill.to_string().repeat(n);
        match self.align.unwrap_or(default_align) {
            '<' => format!("{}{}{}", sign, body, fill(pad)),
            '^' => format!("{}{}{}{}", fill(pad / 2), sign, body, fill(pad - pad / 2)),
            '=' => format!("{}{}{}", sign, fill(pad), body),
            _ => format!("{}{}{}", fill(pad), sign, body),
        }
    }

    fn format_text(&self, s: &str) -> PackResult<String> {
        if !matches!(self.ty, None | Some('s')) {
            return Err(unsupported(self.raw, "numeric format code for a text field"));
        }
        if self.sign.is_some() || self.align == Some('=') {
            return Err(unsupported(self.raw, "sign or '=' alignment on a text field"));
        }
        let body: String = match self.precision {
            Some(p) => s.chars().take(p).collect(),
            None => s.to_string(),
        };
        Ok(self.pad("", &body, '<'))
    }

    fn format_int(&self, v: i64) -> PackResult<String> {
        let magnitude = v.unsigned_abs();
        let body = match self.ty {
            None | Some('d') => format!("{}", magnitude),
            Some('x') => format!("{:x}", magnitude),
            Some('X') => format!("{:X}", magnitude),
            Some('o') => format!("{:o}", magnitude),
            Some('b') => format!("{:b}", magnitude),
            Some('f' | 'F' | 'e' | 'E' | '%') => return self.format_float(v as f64),
            Some(_) => return Err(unsupported(self.raw, "unknown format code for an int field")),
        };
        if self.precision.is_some() {
            return Err(unsupported(self.raw, "precision on an int field"));
        }
        Ok(self.pad(self.sign_text(v < 0), &body, '>'))
    }

    fn format_float(&self, v: f64) -> PackResult<String> {
        let negative = v.is_sign_negative() && !v.is_nan();
        let magnitude = v.abs();

        let body = match self.ty {
            None => {
                if self.precision.is_some() {
                    return Err(unsupported(self.raw, "precision needs a type such as 'f'"));
                }
                float_text(magnitude)
            }
            Some(t @ ('f' | 'F')) => {
                let p = self.precision.unwrap_or(6);
                if magnitude.is_finite() {
                    format!("{:.*}", p, magnitude)
                } else {
                    cased(float_text(magnitude), t == 'F')
                }
            }
            Some(t @ ('e' | 'E')) => {
                let p = self.precision.unwrap_or(6);
                if magnitude.is_finite() {
                    cased(python_exponent(&format!("{:.*e}", p, magnitude)), t == 'E')
                } else {
                    cased(float_text(magnitude), t == 'E')
                }
            }
            Some('%') => {
                let p = self.precision.unwrap_or(6);
                if magnitude.is_finite() {
                    format!("{:.*}%", p, magnitude * 100.0)
                } else {
                    format!("{}%", float_text(magnitude))
                }
            }
            Some(_) => return Err(unsupported(self.raw, "unknown format code for a float field")),
        };

        Ok(self.pad(self.sign_text(negative), &body, '>'))
    }
}

fn cased(text: String, upper: bool) -> String {
    if upper {
        text.to_uppercase()
    } else {
        text
    }
}

/// `7.25e0` -> `7.25e+00`
fn python_exponent(rust: &str) -> String {
    match rust.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => rust.to_string(),
    }
}

/// Consume a run of ASCII digits
fn digits(chars: &[char], i: &mut usize, raw: &str) -> PackResult<Option<usize>> {
    let start = *i;
    let mut n: usize = 0;
    while let Some(d) = chars.get(*i).and_then(|c| c.to_digit(10)) {
        n = n
            .checked_mul(10)
            .and_then(|n| n.checked_add(d as usize))
            .ok_or_else(|| bad_spec(raw))?;
        *i += 1;
    }
    Ok((*i > start).then_some(n))
}

/// Python-style float text: `8.0`, `0.125`, `inf`, `nan`
pub fn float_text(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "inf" } else { "-inf" };
        text.to_string()
    } else {
        format!("{:?}", value)
    }
}

/// `2024-03-09`
pub fn date_text(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `08:05:01`, or `08:05:01.250000` when there is a fraction
pub fn time_text(time: NaiveTime) -> String {
    let micros = (time.nanosecond() % 1_000_000_000) / 1_000;
    let mut text = time.format("%H:%M:%S").to_string();
    if micros != 0 {
        text.push_str(&format!(".{:06}", micros));
    }
    text
}

/// Python `repr()` of a string: single quotes unless the text holds a `'`
/// and no `"`
pub fn py_repr_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
