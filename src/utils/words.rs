//! Spelling numbers as English words
//!
//! Part and voice names are coined from MusicXML ids such as `P12`, which
//! downstream tools cannot use as identifiers when they contain digits:
//! `P12` becomes `PTwelve`.

const UNITS: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const SCALES: [(i64, &str); 3] = [
    (1_000_000_000, "Billion"),
    (1_000_000, "Million"),
    (1_000, "Thousand"),
];

/// `112` → `"OneHundredTwelve"`, `-3` → `"MinusThree"`
pub fn int_to_english_words(n: i64) -> String {
    if n < 0 {
        return format!("Minus{}", int_to_english_words(n.unsigned_abs().min(i64::MAX as u64) as i64));
    }
    if n < 20 {
        return UNITS[n as usize].to_string();
    }

    let mut words = String::new();
    let mut rest = n;

    for (scale, name) in SCALES {
        if rest >= scale {
            words.push_str(&int_to_english_words(rest / scale));
            words.push_str(name);
            rest %= scale;
        }
    }

    if rest >= 100 {
        words.push_str(UNITS[(rest / 100) as usize]);
        words.push_str("Hundred");
        rest %= 100;
    }

    if rest >= 20 {
        words.push_str(TENS[(rest / 10) as usize]);
        rest %= 10;
        if rest > 0 {
            words.push_str(UNITS[rest as usize]);
        }
    } else if rest > 0 {
        words.push_str(UNITS[rest as usize]);
    }

    words
}

/// Replace every run of ASCII digits in `text` by its English spelling
pub fn spell_out_numbers(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    let mut digits = String::new();

    for ch in text.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        flush_digits(&mut digits, &mut out);
        out.push(ch);
    }
    flush_digits(&mut digits, &mut out);

    out
}

fn flush_digits(digits: &mut String, out: &mut String) {
    if digits.is_empty() {
        return;
    }
    match digits.parse::<i64>() {
        Ok(n) => out.push_str(&int_to_english_words(n)),
        // too long for i64: keep as written
        Err(_) => out.push_str(digits),
    }
    digits.clear();
}
