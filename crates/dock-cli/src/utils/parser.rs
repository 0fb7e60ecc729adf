use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Expected three comma-separated numbers (e.g., '10.5,-3.2,7.0'), got '{0}'.")]
    WrongArity(String),

    #[error("Component '{component}' of '{value}' is not a number.")]
    InvalidNumber { component: String, value: String },
}

/// Parses `"x,y,z"` into three floats. Whitespace around each component is ignored.
pub fn parse_triple(value: &str) -> Result<[f64; 3], ParseError> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [x, y, z] = parts[..] else {
        return Err(ParseError::WrongArity(value.to_string()));
    };

    let parse = |component: &str| {
        component
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ParseError::InvalidNumber {
                component: component.to_string(),
                value: value.to_string(),
            })
    };
    Ok([parse(x)?, parse(y)?, parse(z)?])
}
