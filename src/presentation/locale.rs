//! Locale numeric formatting

/// Fixed number formatting convention, injected wherever prices are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberLocale {
    /// Glyphs for 0 through 9
    pub digits: [char; 10],
    /// Thousands separator
    pub group_separator: char,
    /// Separator between integer and fraction
    pub decimal_separator: char,
    /// Prefix for negative numbers
    pub minus_sign: &'static str,
    /// Fraction digits kept after rounding; trailing zeros are dropped
    pub max_fraction_digits: usize,
}

impl NumberLocale {
    /// fa-IR: `1234567.5` formats as `۱٬۲۳۴٬۵۶۷٫۵`
    pub fn persian() -> Self {
        Self {
            digits: ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'],
            group_separator: '\u{066C}',
            decimal_separator: '\u{066B}',
            minus_sign: "\u{200E}\u{2212}",
            max_fraction_digits: 3,
        }
    }

    /// en-US style: `1234567.5` formats as `1,234,567.5`
    pub fn latin() -> Self {
        Self {
            digits: ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'],
            group_separator: ',',
            decimal_separator: '.',
            minus_sign: "-",
            max_fraction_digits: 3,
        }
    }

    /// Format a number with grouped integer digits.
    ///
    /// Rounds half away from zero on the shortest decimal form of `value`,
    /// so `1.0005` keeps its last digit. Negative zero keeps its sign.
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let shortest = value.abs().to_string();
        let (int_part, frac_part) = round_decimal(&shortest, self.max_fraction_digits);
        let frac_part = frac_part.trim_end_matches('0');

        let mut out = String::with_capacity(int_part.len() * 3 + frac_part.len() * 2 + 4);
        if value.is_sign_negative() {
            out.push_str(self.minus_sign);
        }

        let len = int_part.len();
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(self.group_separator);
            }
            out.push(self.digit(ch));
        }

        if !frac_part.is_empty() {
            out.push(self.decimal_separator);
            out.extend(frac_part.chars().map(|ch| self.digit(ch)));
        }

        out
    }

    fn digit(&self, ascii: char) -> char {
        ascii
            .to_digit(10)
            .map_or(ascii, |d| self.digits[d as usize])
    }
}

/// Round a plain decimal string (`"123.4567"`) to `digits` fraction digits,
/// half away from zero. Returns the integer and fraction digits.
fn round_decimal(decimal: &str, digits: usize) -> (String, String) {
    let (int_part, frac_part) = decimal.split_once('.').unwrap_or((decimal, ""));
    if frac_part.len() <= digits {
        return (int_part.to_string(), frac_part.to_string());
    }

    let round_up = frac_part.as_bytes()[digits] >= b'5';
    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(digits))
        .collect();

    if round_up {
        let mut carry = true;
        for b in kept.iter_mut().rev() {
            if *b == b'9' {
                *b = b'0';
            } else {
                *b += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let int_len = kept.len() - digits;
    let (int_digits, frac_digits) = kept.split_at(int_len);
    (
        String::from_utf8_lossy(int_digits).into_owned(),
        String::from_utf8_lossy(frac_digits).into_owned(),
    )
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::persian()
    }
}
