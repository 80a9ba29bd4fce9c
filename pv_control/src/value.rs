/*
    Typed view of the text pvcmd hands back for a parameter read.
    Lists come back brace-delimited and whitespace separated: {1 2 3}
 */
use std::fmt;

#[derive(Clone,Debug,PartialEq)]
pub enum PvValue {
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<PvValue>),
}

impl PvValue {

    /// parse a raw pvcmd response into a value
    pub fn parse(raw:&str) -> Self {
        let raw = raw.trim();
        match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(inner) => PvValue::List(inner.split_whitespace().map(PvValue::scalar).collect()),
            None => PvValue::scalar(raw)
        }
    }

    /// numbers whose truncation matches their float value become integers, as long
    /// as they fit in an i64; larger whole numbers stay Float.
    /// Anything that isn't a finite number is returned as text unchanged
    pub fn scalar(s:&str) -> Self {
        match s.parse::<f64>() {
            Ok(f) if f.is_finite() => {
                if f.trunc() == f && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    PvValue::Int(f as i64)
                } else {
                    PvValue::Float(f)
                }
            }
            _=> PvValue::Text(s.to_string())
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PvValue::Int(i) => Some(*i),
            _=> None
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PvValue::Int(i) => Some(*i as f64),
            PvValue::Float(f) => Some(*f),
            _=> None
        }
    }

    pub fn as_list(&self) -> Option<&[PvValue]> {
        match self {
            PvValue::List(l) => Some(l),
            _=> None
        }
    }
}

// lists are written back in the same brace syntax they are read in
impl fmt::Display for PvValue {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PvValue::Int(i) => write!(f,"{}",i),
            PvValue::Float(x) => write!(f,"{}",x),
            PvValue::Text(s) => write!(f,"{}",s),
            PvValue::List(items) => {
                let items:Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f,"{{{}}}",items.join(" "))
            }
        }
    }
}

impl From<i64> for PvValue {
    fn from(i:i64) -> Self {
        PvValue::Int(i)
    }
}

impl From<f64> for PvValue {
    fn from(f:f64) -> Self {
        PvValue::Float(f)
    }
}

impl From<&str> for PvValue {
    fn from(s:&str) -> Self {
        PvValue::Text(s.to_string())
    }
}

impl From<String> for PvValue {
    fn from(s:String) -> Self {
        PvValue::Text(s)
    }
}
