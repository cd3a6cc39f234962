//! Number formatting for value labels

use serde::{Deserialize, Serialize};

/// Formatting kind for numeric labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberFormatKind {
    Number,
    Percent,
    Currency,
}

impl Default for NumberFormatKind {
    fn default() -> Self {
        NumberFormatKind::Number
    }
}

/// Number-format specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberFormat {
    /// Plain number, percentage, or currency
    pub kind: NumberFormatKind,
    /// ISO currency code when `kind` is Currency
    pub currency: Option<String>,
    /// Decimal places
    pub decimals: usize,
    /// Divisor applied before formatting (e.g. 1000 to show thousands)
    pub scale: f64,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            kind: NumberFormatKind::default(),
            currency: None,
            decimals: 0,
            scale: 1.0,
        }
    }
}

impl NumberFormat {
    /// Format a value according to this specification
    pub fn format(&self, value: f64) -> String {
        let scale = if self.scale.is_finite() && self.scale != 0.0 {
            self.scale
        } else {
            1.0
        };
        let scaled = value / scale;
        let body = format!("{:.*}", self.decimals, scaled);

        match self.kind {
            NumberFormatKind::Number => body,
            NumberFormatKind::Percent => format!("{}%", body),
            NumberFormatKind::Currency => {
                match self.currency.as_deref() {
                    Some("USD") | None => format!("${}", body),
                    Some("EUR") => format!("\u{20AC}{}", body),
                    Some("GBP") => format!("\u{A3}{}", body),
                    Some(code) => format!("{} {}", code, body),
                }
            }
        }
    }
}
