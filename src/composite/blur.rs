use crate::foundation::error::{DuotoneError, DuotoneResult};

/// Gaussian approximation by three successive box blurs; cost is independent of `sigma`.
pub fn box_blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    sigma: f32,
) -> DuotoneResult<Vec<u8>> {
    let expected_len = expected_len(width, height)?;
    if src.len() != expected_len {
        return Err(DuotoneError::validation(
            "box blur expects src matching width*height*4",
        ));
    }
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(DuotoneError::validation("blur sigma must be finite and >= 0"));
    }

    let mut cur = src.to_vec();
    let mut tmp = vec![0u8; expected_len];
    for size in boxes_for_gauss(sigma, 3) {
        let r = (size - 1) / 2;
        if r == 0 {
            continue;
        }
        box_pass(&cur, &mut tmp, width, height, r, false);
        box_pass(&tmp, &mut cur, width, height, r, true);
    }
    Ok(cur)
}

fn expected_len(width: u32, height: u32) -> DuotoneResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| DuotoneError::validation("blur buffer size overflow"))
}

/// Odd box widths whose successive application approximates a Gaussian of `sigma`.
pub(crate) fn boxes_for_gauss(sigma: f32, n: usize) -> Vec<usize> {
    let sigma = f64::from(sigma);
    let nf = n as f64;
    let w_ideal = (12.0 * sigma * sigma / nf + 1.0).sqrt();
    let mut wl = w_ideal.floor() as i64;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wl = wl.max(1);
    let wu = wl + 2;
    let wlf = wl as f64;
    let m_ideal =
        (12.0 * sigma * sigma - nf * wlf * wlf - 4.0 * nf * wlf - 3.0 * nf) / (-4.0 * wlf - 4.0);
    let m = m_ideal.round().max(0.0) as usize;

    (0..n)
        .map(|i| if i < m { wl as usize } else { wu as usize })
        .collect()
}

/// One running-sum box pass of radius `r` along rows (`vertical == false`) or columns.
///
/// Samples past the edge repeat the edge pixel.
fn box_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, r: usize, vertical: bool) {
    let (w, h) = (width as usize, height as usize);
    let (lines, len) = if vertical { (w, h) } else { (h, w) };
    let index = |line: usize, i: usize| if vertical { i * w + line } else { line * w + i };
    let span = (2 * r + 1) as u32;
    let reach = r as isize;

    for line in 0..lines {
        let at = |i: isize, c: usize| -> u32 {
            let i = i.clamp(0, len as isize - 1) as usize;
            u32::from(src[index(line, i) * 4 + c])
        };
        for c in 0..4 {
            let mut acc: u32 = (-reach..=reach).map(|i| at(i, c)).sum();
            for i in 0..len {
                dst[index(line, i) * 4 + c] = ((acc + span / 2) / span) as u8;
                let ii = i as isize;
                acc = acc + at(ii + reach + 1, c) - at(ii - reach, c);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blur.rs"]
mod tests;
