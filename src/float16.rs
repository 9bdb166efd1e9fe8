//! IEEE-754 binary16 conversion for the `e` format code, done on the bit patterns so no
//! intermediate rounding step can carry into the exponent.

const F64_MANTISSA_BITS: u32 = 52;
const F64_EXP_BIAS: i32 = 1023;
const F16_EXP_BIAS: i32 = 15;
const F16_INFINITY: u16 = 0x7c00;
const F16_QUIET_NAN: u16 = 0x7e00;

/// Converts `x` to binary16 bits, rounding to nearest with ties to even.
///
/// Returns `None` when `x` is finite but too large for binary16. Infinities and NaN convert.
pub(crate) fn from_f64(x: f64) -> Option<u16> {
    let bits = x.to_bits();
    let sign = ((bits >> 63) as u16) << 15;
    let exp = ((bits >> F64_MANTISSA_BITS) & 0x7ff) as i32;
    let mantissa = bits & ((1u64 << F64_MANTISSA_BITS) - 1);

    if exp == 0x7ff {
        return Some(sign | if mantissa == 0 { F16_INFINITY } else { F16_QUIET_NAN });
    }
    if exp == 0 {
        // Zero, or an f64 subnormal far below the smallest binary16 subnormal.
        return Some(sign);
    }

    let unbiased = exp - F64_EXP_BIAS;
    let half_exp = unbiased + F16_EXP_BIAS;
    if half_exp >= 0x1f {
        return None;
    }

    let magnitude = if half_exp >= 1 {
        // Normal: keep the top 10 mantissa bits. A carry out of the mantissa correctly bumps
        // the exponent.
        let shift = F64_MANTISSA_BITS - 10;
        let kept = (((half_exp as u64) << 10) | (mantissa >> shift)) as u16;
        kept + round_up(mantissa, shift, kept) as u16
    } else {
        // Subnormal: the value is `full * 2^(unbiased - 52)`, and a binary16 subnormal counts
        // units of 2^-24.
        let full = mantissa | (1u64 << F64_MANTISSA_BITS);
        let shift = (28 - unbiased) as u32;
        if shift >= 64 {
            0
        } else {
            let kept = (full >> shift) as u16;
            kept + round_up(full, shift, kept) as u16
        }
    };

    if magnitude >= F16_INFINITY {
        return None;
    }
    Some(sign | magnitude)
}

/// Whether discarding the low `shift` bits of `bits` rounds `kept` up (ties to even).
fn round_up(bits: u64, shift: u32, kept: u16) -> bool {
    let discarded = bits & ((1u64 << shift) - 1);
    let halfway = 1u64 << (shift - 1);
    discarded > halfway || (discarded == halfway && kept & 1 == 1)
}

/// Converts binary16 bits to `f64`. Every binary16 value is exactly representable.
pub(crate) fn to_f64(h: u16) -> f64 {
    let sign = ((h >> 15) as u64) << 63;
    let exp = ((h >> 10) & 0x1f) as i32;
    let mantissa = (h & 0x3ff) as u64;

    let bits = match exp {
        0 if mantissa == 0 => sign,
        0 => {
            // Subnormal: normalize around the highest set bit.
            let top = 63 - mantissa.leading_zeros();
            let e = top as i32 - 24 + F64_EXP_BIAS;
            let frac = (mantissa ^ (1 << top)) << (F64_MANTISSA_BITS - top);
            sign | ((e as u64) << F64_MANTISSA_BITS) | frac
        }
        0x1f if mantissa == 0 => sign | (0x7ffu64 << F64_MANTISSA_BITS),
        0x1f => sign | (0x7ffu64 << F64_MANTISSA_BITS) | (mantissa << 42) | (1 << 51),
        _ => {
            let e = exp - F16_EXP_BIAS + F64_EXP_BIAS;
            sign | ((e as u64) << F64_MANTISSA_BITS) | (mantissa << 42)
        }
    };
    f64::from_bits(bits)
}
