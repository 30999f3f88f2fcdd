//! ClickHouse values and literal rendering.
//!
//! Statements are sent as plain text with no parameter binding, so every
//! value is inlined as a literal. The string escaping below is the only
//! thing standing between caller input and the statement grammar.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

/// A value that can be rendered as a ClickHouse literal.
///
/// The set of kinds is closed: anything else has to be converted into one of
/// these variants before it can reach a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value, for `UInt64` data above `i64::MAX`.
    UInt(u64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Timestamp, rendered with second precision.
    DateTime(NaiveDateTime),
    /// Tuple of values, also used for whole rows.
    Tuple(Vec<Value>),
    /// Array of values.
    Array(Vec<Value>),
    /// A literal the caller has already validated. Emitted verbatim.
    Raw(String),
}

/// A single row of an INSERT statement.
pub type Row = Vec<Value>;

impl Value {
    /// Creates a pre-validated raw literal.
    ///
    /// **Warning**: raw literals bypass escaping entirely.
    #[must_use]
    pub fn raw(literal: impl Into<String>) -> Self {
        Self::Raw(literal.into())
    }

    /// Returns the literal for inline use in a statement.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }

    fn write_sql(&self, out: &mut String) {
        match self {
            Self::Null => out.push_str("NULL"),
            Self::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Self::Int(n) => out.push_str(&n.to_string()),
            Self::UInt(n) => out.push_str(&n.to_string()),
            Self::Float(f) => write_float(*f, out),
            Self::Text(s) => write_quoted(s, out),
            Self::Date(d) => write_quoted(&d.format("%Y-%m-%d").to_string(), out),
            Self::DateTime(dt) => {
                write_quoted(&dt.format("%Y-%m-%d %H:%M:%S").to_string(), out);
            }
            Self::Tuple(items) => write_seq('(', ')', items, out),
            Self::Array(items) => write_seq('[', ']', items, out),
            Self::Raw(s) => out.push_str(s),
        }
    }
}

fn write_float(f: f64, out: &mut String) {
    if f.is_nan() {
        out.push_str("nan");
    } else if f.is_infinite() {
        out.push_str(if f > 0.0 { "inf" } else { "-inf" });
    } else {
        // Debug keeps the fractional part ("1.0") and never uses locale separators.
        out.push_str(&format!("{f:?}"));
    }
}

fn write_seq(open: char, close: char, items: &[Value], out: &mut String) {
    out.push(open);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        item.write_sql(out);
    }
    out.push(close);
}

fn write_quoted(s: &str, out: &mut String) {
    out.reserve(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\0' => out.push_str("\\0"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{b}' => out.push_str("\\v"),
            '\u{c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('\'');
}

/// Quotes and escapes a string as a ClickHouse string literal.
#[must_use]
pub fn quote(s: &str) -> String {
    let mut out = String::new();
    write_quoted(s, &mut out);
    out
}

/// Renders rows for a `VALUES` list: each row as a tuple, rows joined by `,`.
#[must_use]
pub fn rows_to_sql(rows: &[Row]) -> String {
    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_seq('(', ')', row, &mut out);
    }
    out
}

/// Trait for types that can be converted to values.
pub trait ToValue {
    /// Converts the value to a `Value`.
    fn to_value(self) -> Value;
}

impl ToValue for Value {
    fn to_value(self) -> Value {
        self
    }
}

impl ToValue for bool {
    fn to_value(self) -> Value {
        Value::Bool(self)
    }
}

macro_rules! impl_to_value_int {
    ($($ty:ty),*) => {
        $(
            impl ToValue for $ty {
                fn to_value(self) -> Value {
                    Value::Int(i64::from(self))
                }
            }
        )*
    };
}

impl_to_value_int!(i8, i16, i32, i64, u8, u16, u32);

impl ToValue for u64 {
    fn to_value(self) -> Value {
        Value::UInt(self)
    }
}

impl ToValue for f64 {
    fn to_value(self) -> Value {
        Value::Float(self)
    }
}

/// Goes through the shortest `f32` text so `0.1f32` stays `0.1` instead of
/// picking up the widened binary digits.
impl ToValue for f32 {
    fn to_value(self) -> Value {
        let widened = format!("{self:?}").parse().unwrap_or_else(|_| f64::from(self));
        Value::Float(widened)
    }
}

impl ToValue for String {
    fn to_value(self) -> Value {
        Value::Text(self)
    }
}

impl ToValue for &str {
    fn to_value(self) -> Value {
        Value::Text(String::from(self))
    }
}

impl ToValue for &String {
    fn to_value(self) -> Value {
        Value::Text(self.clone())
    }
}

impl ToValue for NaiveDate {
    fn to_value(self) -> Value {
        Value::Date(self)
    }
}

impl ToValue for NaiveDateTime {
    fn to_value(self) -> Value {
        Value::DateTime(self)
    }
}

/// Aware timestamps are rendered in their own offset's wall-clock time.
impl<Tz: TimeZone> ToValue for DateTime<Tz> {
    fn to_value(self) -> Value {
        Value::DateTime(self.naive_local())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(self) -> Value {
        Value::Array(self.into_iter().map(ToValue::to_value).collect())
    }
}

macro_rules! impl_to_value_tuple {
    ($($name:ident),+) => {
        impl<$($name: ToValue),+> ToValue for ($($name,)+) {
            #[allow(non_snake_case)]
            fn to_value(self) -> Value {
                let ($($name,)+) = self;
                Value::Tuple(vec![$($name.to_value()),+])
            }
        }
    };
}

impl_to_value_tuple!(A);
impl_to_value_tuple!(A, B);
impl_to_value_tuple!(A, B, C);
impl_to_value_tuple!(A, B, C, D);
impl_to_value_tuple!(A, B, C, D, E);
impl_to_value_tuple!(A, B, C, D, E, F);
impl_to_value_tuple!(A, B, C, D, E, F, G);
impl_to_value_tuple!(A, B, C, D, E, F, G, H);

/// Builds a [`Row`] from a list of expressions implementing [`ToValue`].
///
/// ```rust
/// use chsql_core::row;
///
/// let row = row![1, "a", (2.5, None::<i32>)];
/// assert_eq!(row.len(), 3);
/// ```
#[macro_export]
macro_rules! row {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::value::ToValue::to_value($value)),*]
    };
}

#[cfg(feature = "json")]
impl TryFrom<serde_json::Value> for Value {
    type Error = crate::Error;

    /// JSON arrays become tuples so that nested rows can be written as JSON.
    fn try_from(json: serde_json::Value) -> crate::Result<Self> {
        use serde_json::Value as Json;

        match json {
            Json::Null => Ok(Self::Null),
            Json::Bool(b) => Ok(Self::Bool(b)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Self::UInt(u))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Float(f))
                } else {
                    Err(crate::Error::UnmappableValue(format!("number {n}")))
                }
            }
            Json::String(s) => Ok(Self::Text(s)),
            Json::Array(items) => items
                .into_iter()
                .map(Self::try_from)
                .collect::<crate::Result<Vec<_>>>()
                .map(Self::Tuple),
            Json::Object(_) => Err(crate::Error::UnmappableValue(String::from(
                "object cannot be rendered as a literal",
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Scans a quoted literal and returns the byte index of the closing quote.
    fn closing_quote(literal: &str) -> Option<usize> {
        let bytes = literal.as_bytes();
        assert_eq!(bytes[0], b'\'');
        let mut i = 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'\'' => return Some(i),
                _ => i += 1,
            }
        }
        None
    }

    #[test]
    fn test_value_null() {
        assert_eq!(Value::Null.to_sql(), "NULL");
        assert_eq!(None::<i32>.to_value().to_sql(), "NULL");
    }

    #[test]
    fn test_value_bool() {
        assert_eq!(Value::Bool(true).to_sql(), "true");
        assert_eq!(Value::Bool(false).to_sql(), "false");
    }

    #[test]
    fn test_value_numbers() {
        assert_eq!(Value::Int(42).to_sql(), "42");
        assert_eq!(Value::Int(-100).to_sql(), "-100");
        assert_eq!(u64::MAX.to_value().to_sql(), "18446744073709551615");
        assert_eq!(Value::Float(2.75).to_sql(), "2.75");
        assert_eq!(Value::Float(1.0).to_sql(), "1.0");
        assert_eq!(Value::Float(-0.5).to_sql(), "-0.5");
        assert_eq!(Value::Float(1_234_567.25).to_sql(), "1234567.25");
    }

    #[test]
    fn test_value_f32_keeps_short_form() {
        assert_eq!(0.1_f32.to_value().to_sql(), "0.1");
        assert_eq!(2.75_f32.to_value().to_sql(), "2.75");
        assert_eq!(f32::INFINITY.to_value().to_sql(), "inf");
        assert_eq!(f32::NAN.to_value().to_sql(), "nan");
    }

    #[test]
    fn test_value_non_finite_floats() {
        assert_eq!(Value::Float(f64::NAN).to_sql(), "nan");
        assert_eq!(Value::Float(f64::INFINITY).to_sql(), "inf");
        assert_eq!(Value::Float(f64::NEG_INFINITY).to_sql(), "-inf");
    }

    #[test]
    fn test_value_text() {
        assert_eq!("hello".to_value().to_sql(), "'hello'");
        assert_eq!("".to_value().to_sql(), "''");
    }

    #[test]
    fn test_value_text_escaping() {
        assert_eq!("it's".to_value().to_sql(), r"'it\'s'");
        assert_eq!(r"C:\tmp".to_value().to_sql(), r"'C:\\tmp'");
        assert_eq!("a\nb\tc\0".to_value().to_sql(), r"'a\nb\tc\0'");
    }

    #[test]
    fn test_sql_injection_prevention() {
        let malicious = "'; DROP TABLE users; --";
        assert_eq!(
            malicious.to_value().to_sql(),
            r"'\'; DROP TABLE users; --'"
        );
    }

    #[test]
    fn test_literal_terminates_at_closing_quote() {
        let inputs = [
            "plain",
            "'",
            "\\",
            "\\'",
            "'\\",
            "x\\' OR 1=1 --",
            "\\\\''\\\\",
            "end\\",
            "'''",
        ];
        for input in inputs {
            let literal = quote(input);
            assert_eq!(
                closing_quote(&literal),
                Some(literal.len() - 1),
                "literal {literal} for {input:?} closes early"
            );
        }
    }

    #[test]
    fn test_value_date() {
        assert_eq!(date(2018, 9, 7).to_value().to_sql(), "'2018-09-07'");
    }

    #[test]
    fn test_value_datetime_truncates_subseconds() {
        let dt = date(2020, 1, 2).and_hms_micro_opt(3, 4, 5, 678_901).unwrap();
        assert_eq!(dt.to_value().to_sql(), "'2020-01-02 03:04:05'");
    }

    #[test]
    fn test_value_tuple_and_array() {
        let value = (1, (date(2018, 9, 7), None::<f64>)).to_value();
        assert_eq!(value.to_sql(), "(1,('2018-09-07',NULL))");
        assert_eq!(vec![1, 2, 3].to_value().to_sql(), "[1,2,3]");
        assert_eq!(Vec::<i32>::new().to_value().to_sql(), "[]");
    }

    #[test]
    fn test_value_raw_is_verbatim() {
        assert_eq!(Value::raw("now()").to_sql(), "now()");
    }

    #[test]
    fn test_rows_to_sql() {
        let rows = vec![
            row![1, (date(2018, 9, 7), None::<f64>)],
            row![2, (date(2018, 9, 8), 2.75)],
        ];
        assert_eq!(
            rows_to_sql(&rows),
            "(1,('2018-09-07',NULL)),(2,('2018-09-08',2.75))"
        );
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_value_from_json() {
        let value = Value::try_from(serde_json::json!([1, "a", null, true, 2.5, [3]])).unwrap();
        assert_eq!(value.to_sql(), "(1,'a',NULL,true,2.5,(3))");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_value_from_json_object_is_unmappable() {
        let err = Value::try_from(serde_json::json!({"a": 1})).unwrap_err();
        assert!(matches!(err, crate::Error::UnmappableValue(_)));
    }
}
