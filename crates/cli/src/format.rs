/// Significant digits in the result line.
const PRECISION: usize = 6;

/// Formats `x` like C's `%g`: six significant digits, fixed or exponential
/// notation, whichever `%g` would pick, with trailing zeros removed.
pub fn general(x: f64) -> String {
    if x.is_nan() {
        return String::from("nan");
    }
    if x.is_infinite() {
        return String::from(if x < 0.0 { "-inf" } else { "inf" });
    }
    if x == 0.0 {
        return String::from(if x.is_sign_negative() { "-0" } else { "0" });
    }

    // Round first: the exponent of the rounded value picks the notation.
    let scientific = format!("{:.*e}", PRECISION - 1, x);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if exponent < -4 || exponent >= PRECISION as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.unsigned_abs())
    } else {
        let decimals = (PRECISION as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{x:.decimals$}")).to_owned()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
