/// Outcome of parsing the system-size field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeParse {
    /// Peak power in kWp, finite and > 0.
    Valid(f64),
    Empty,
    NotANumber,
    NonPositive,
}

impl SizeParse {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return SizeParse::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if !v.is_finite() => SizeParse::NotANumber,
            Ok(v) if v <= 0.0 => SizeParse::NonPositive,
            Ok(v) => SizeParse::Valid(v),
            Err(_) => SizeParse::NotANumber,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            SizeParse::Valid(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, SizeParse::Valid(_))
    }

    /// Prompt shown next to an unusable size.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            SizeParse::Valid(_) => None,
            SizeParse::Empty => Some("Enter a system size in kWp"),
            SizeParse::NotANumber => Some("System size must be a number"),
            SizeParse::NonPositive => Some("System size must be greater than 0"),
        }
    }
}

/// The text in the size field together with its parse result.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemSizeInput {
    raw: String,
    parsed: SizeParse,
}

impl SystemSizeInput {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = SizeParse::parse(&raw);
        Self { raw, parsed }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn parsed(&self) -> SizeParse {
        self.parsed
    }

    pub fn value(&self) -> Option<f64> {
        self.parsed.value()
    }
}
