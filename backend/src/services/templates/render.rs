//! # Report Generator
//!
//! Looks up the active template for a topic and substitutes named values into
//! its placeholders. Nothing is persisted here; archiving the result is a
//! separate step (`services::reports::archive`).
//!
//! Placeholders are `{name}` or `{name:spec}` where `spec` is `d`, `f` or
//! `.Nf`. `{{` and `}}` produce literal braces; any other brace is copied
//! through as-is, so inline CSS in a template body survives.

use crate::error::{ServiceError, ServiceResult};
use regex::{Captures, Regex};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::OnceLock;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)(?::([^{}]*))?\}")
            .expect("placeholder pattern is valid")
    })
}

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    /// Rendered as `N/A`.
    Null,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

enum Spec {
    Plain,
    Integer,
    Fixed(usize),
}

fn parse_spec(spec: &str) -> Option<Spec> {
    match spec {
        "" => Some(Spec::Plain),
        "d" => Some(Spec::Integer),
        "f" => Some(Spec::Fixed(6)),
        _ => {
            let digits = spec.strip_prefix('.')?.strip_suffix('f')?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse().ok().map(Spec::Fixed)
        }
    }
}

impl Value {
    fn render(&self, name: &str, spec_text: &str) -> ServiceResult<String> {
        let invalid = || ServiceError::InvalidFormat {
            name: name.to_string(),
            spec: spec_text.to_string(),
        };
        if *self == Value::Null {
            return Ok("N/A".to_string());
        }
        let spec = parse_spec(spec_text).ok_or_else(invalid)?;
        match (self, spec) {
            (Value::Text(s), Spec::Plain) => Ok(s.clone()),
            (Value::Int(i), Spec::Plain | Spec::Integer) => Ok(i.to_string()),
            (Value::Int(i), Spec::Fixed(precision)) => Ok(format!("{:.*}", precision, *i as f64)),
            // Debug keeps the trailing `.0` on whole numbers.
            (Value::Float(f), Spec::Plain) => Ok(format!("{:?}", f)),
            (Value::Float(f), Spec::Fixed(precision)) => Ok(format!("{:.*}", precision, f)),
            _ => Err(invalid()),
        }
    }
}

/// Named values handed to the generator.
#[derive(Debug, Clone, Default)]
pub struct Values(HashMap<String, Value>);

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

#[derive(Debug, Clone)]
pub struct Rendered {
    pub template_id: i64,
    pub html: String,
}

/// Returns the id and body of the active template for `topic`.
pub fn find_active_template(conn: &Connection, topic: &str) -> ServiceResult<(i64, String)> {
    conn.query_row(
        "SELECT id, content_html FROM templates WHERE topic = ?1 AND active = 1",
        params![topic],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()?
    .ok_or_else(|| ServiceError::TemplateNotFound(topic.to_string()))
}

pub fn render_topic(conn: &Connection, topic: &str, values: &Values) -> ServiceResult<Rendered> {
    let (template_id, body) = find_active_template(conn, topic)?;
    let html = substitute(&body, values)?;
    Ok(Rendered { template_id, html })
}

/// Replaces every placeholder in `body`.
///
/// Fails on the first placeholder whose name is not in `values`.
pub fn substitute(body: &str, values: &Values) -> ServiceResult<String> {
    let mut out = String::with_capacity(body.len());
    let mut last = 0;
    for caps in placeholder_re().captures_iter(body) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&body[last..whole.start()]);
        last = whole.end();
        match whole.as_str() {
            "{{" => out.push('{'),
            "}}" => out.push('}'),
            _ => out.push_str(&render_placeholder(&caps, values)?),
        }
    }
    out.push_str(&body[last..]);
    Ok(out)
}

fn render_placeholder(caps: &Captures<'_>, values: &Values) -> ServiceResult<String> {
    let name = caps.get(1).map_or("", |m| m.as_str());
    let spec = caps.get(2).map_or("", |m| m.as_str());
    let value = values
        .get(name)
        .ok_or_else(|| ServiceError::MissingPlaceholder(name.to_string()))?;
    value.render(name, spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing;

    #[test]
    fn unknown_topic_is_template_not_found() {
        let conn = testing::memory();
        let err = render_topic(&conn, "box_office", &Values::new()).unwrap_err();
        match err {
            ServiceError::TemplateNotFound(topic) => assert_eq!(topic, "box_office"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn inactive_template_is_not_used() {
        let conn = testing::memory();
        conn.execute("UPDATE templates SET active = 0 WHERE topic = 'hidden_gems'", [])
            .unwrap();
        assert!(matches!(
            render_topic(&conn, "hidden_gems", &Values::new()),
            Err(ServiceError::TemplateNotFound(_))
        ));
    }

    #[test]
    fn missing_value_names_the_placeholder() {
        let values = Values::new().with("a", 1_i64);
        let err = substitute("<p>{a}</p><p>{b}</p>", &values).unwrap_err();
        match err {
            ServiceError::MissingPlaceholder(name) => assert_eq!(name, "b"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn null_renders_as_na_even_with_a_format_spec() {
        let values = Values::new()
            .with("a", "x")
            .with("b", None::<f64>)
            .with("c", Value::Null);
        let html = substitute("{a}|{b}|{c:.2f}", &values).unwrap();
        assert_eq!(html, "x|N/A|N/A");
    }

    #[test]
    fn null_ignores_unsupported_specs() {
        let values = Values::new().with("b", Value::Null);
        assert_eq!(substitute("{b:>10}", &values).unwrap(), "N/A");
        assert_eq!(substitute("[{b:,}]", &values).unwrap(), "[N/A]");
    }

    #[test]
    fn numeric_specs_follow_fixed_point_rules() {
        let values = Values::new()
            .with("rating", 7.4567)
            .with("count", 12_i64)
            .with("whole", 8.0);
        assert_eq!(
            substitute("{rating:.2f} {rating:.1f} {count} {count:.1f} {count:d} {whole}", &values)
                .unwrap(),
            "7.46 7.5 12 12.0 12 8.0"
        );
    }

    #[test]
    fn incompatible_spec_is_rejected() {
        let values = Values::new().with("title", "Up").with("score", 1.5);
        assert!(matches!(
            substitute("{title:.2f}", &values),
            Err(ServiceError::InvalidFormat { .. })
        ));
        assert!(matches!(
            substitute("{score:d}", &values),
            Err(ServiceError::InvalidFormat { .. })
        ));
        assert!(matches!(
            substitute("{score:>10}", &values),
            Err(ServiceError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn doubled_braces_are_literal_and_stray_braces_pass_through() {
        let values = Values::new().with("n", 3_i64);
        assert_eq!(
            substitute("{{n}} = {n}; p { color: red }", &values).unwrap(),
            "{n} = 3; p { color: red }"
        );
    }

    #[test]
    fn renders_seeded_template() {
        let conn = testing::memory();
        let values = Values::new()
            .with("min_rating", 8.0)
            .with("max_popularity", 200.0)
            .with("movie_count", 2_i64)
            .with("movie_list", "1. A\n2. B");
        let rendered = render_topic(&conn, "hidden_gems", &values).unwrap();
        assert!(rendered.html.contains("min rating 8.0, max popularity 200.0"));
        assert!(rendered.html.contains("<strong>2</strong>"));
        assert!(rendered.html.contains("<pre>1. A\n2. B</pre>"));
    }
}
