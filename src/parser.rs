use crate::error::PointError;

/// A point in model space, `[x, y, z]`.
pub type Point3 = [f64; 3];

/// Outcome of reading one "Data points" cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedPoint {
    Valid(Point3),
    Invalid { raw: String, reason: PointError },
}

impl ParsedPoint {
    pub fn is_valid(&self) -> bool {
        matches!(self, ParsedPoint::Valid(_))
    }

    pub fn point(&self) -> Option<Point3> {
        match self {
            ParsedPoint::Valid(p) => Some(*p),
            ParsedPoint::Invalid { .. } => None,
        }
    }
}

/// Rewrites whitespace-separated numbers into comma-separated form.
///
/// Runs of whitespace between two values become a single comma; whitespace
/// next to an existing comma or a bracket is dropped. `"1 2 3"` and
/// `"[1, 2, 3]"` become `"1,2,3"` and `"[1,2,3]"`.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut gap = false;
    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            gap = true;
            continue;
        }
        if gap {
            let after_sep = matches!(out.chars().last(), None | Some(',' | '[' | '('));
            let before_sep = matches!(ch, ',' | ']' | ')');
            if !after_sep && !before_sep {
                out.push(',');
            }
            gap = false;
        }
        out.push(ch);
    }
    out
}

/// Parses a coordinate cell into three numbers.
///
/// Never fails: anything that is not exactly three finite numbers comes back
/// as `ParsedPoint::Invalid` with the original text and the reason.
pub fn parse_coordinates(raw: &str) -> ParsedPoint {
    match parse_triple(raw) {
        Ok(point) => ParsedPoint::Valid(point),
        Err(reason) => ParsedPoint::Invalid {
            raw: raw.to_string(),
            reason,
        },
    }
}

fn parse_triple(raw: &str) -> Result<Point3, PointError> {
    let text = normalize(raw);
    if text.is_empty() {
        return Err(PointError::Empty);
    }

    let (body, bracketed) = strip_brackets(&text)?;
    if body.is_empty() {
        return Err(PointError::WrongCount { found: 0 });
    }

    let mut tokens: Vec<&str> = body.split(',').collect();
    // list literals allow one trailing comma
    if bracketed && tokens.len() > 1 && tokens.last() == Some(&"") {
        tokens.pop();
    }
    if tokens.iter().any(|t| t.is_empty()) {
        return Err(PointError::Malformed("empty element".to_string()));
    }

    let values = tokens
        .iter()
        .map(|t| parse_number(t))
        .collect::<Result<Vec<f64>, _>>()?;

    match values.as_slice() {
        [x, y, z] => Ok([*x, *y, *z]),
        _ => Err(PointError::WrongCount {
            found: values.len(),
        }),
    }
}

// Returns the text inside one enclosing `[...]` or `(...)`, if present.
fn strip_brackets(text: &str) -> Result<(&str, bool), PointError> {
    let closer = match text.chars().next() {
        Some('[') => Some(']'),
        Some('(') => Some(')'),
        _ => None,
    };

    let (inner, bracketed) = match closer {
        Some(close) if text.len() >= 2 && text.ends_with(close) => (&text[1..text.len() - 1], true),
        Some(_) => return Err(PointError::Malformed("unbalanced brackets".to_string())),
        None if text.ends_with(']') || text.ends_with(')') => {
            return Err(PointError::Malformed("unbalanced brackets".to_string()))
        }
        None => (text, false),
    };

    if inner.contains(['[', ']', '(', ')']) {
        return Err(PointError::Malformed("nested brackets".to_string()));
    }
    Ok((inner, bracketed))
}

fn parse_number(token: &str) -> Result<f64, PointError> {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(PointError::NotANumber {
            token: token.to_string(),
        }),
    }
}
